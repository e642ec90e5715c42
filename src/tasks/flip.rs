//! FLIP entry animation for one element and one image.
//!
//! `play()` walks `Idle -> Measuring -> Correcting -> Animating`: it resolves
//! the image's natural size, measures the element's final box, writes the
//! corrective width and scale onto the image layer, then starts the outer box
//! transition while the inner correction relaxes to identity over the same
//! duration. `reset()` is the only way back to `Idle` and doubles as
//! cancellation. A play abandoned after the element was shown resets too, so
//! an `Idle` element is always hidden.

mod state;

use futures::future;
use serde::Serialize;
use tracing::{debug, warn};

pub use state::{FlipSM, FlipState, FlipStateChange};

use crate::config::FlipOptions;
use crate::correction;
use crate::error::Error;
use crate::geometry::{BoundingBox, CorrectionResult, NaturalSize};
use crate::surface::{Layer, Surface};
use crate::tasks::loader::{ImageLoader, NaturalSizeCache};
use crate::transition::{ClassSwapDriver, Scheduler, TransitionDriver, YieldScheduler};

/// Class that selects the outer layer's final geometry.
pub const LAST_CLASS: &str = "last";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum PlayOutcome {
    /// Both the box transition and the inner correction finished.
    Completed,
    /// The settle timeout elapsed first; styles are left as applied.
    TimedOut,
    /// The element left the document mid-play.
    Abandoned,
}

pub struct FlipController<S, L, D = ClassSwapDriver, K = YieldScheduler> {
    surface: S,
    loader: L,
    driver: D,
    scheduler: K,
    options: FlipOptions,
    cache: NaturalSizeCache,
    src: Option<String>,
    measurements: Option<BoundingBox>,
    correction: Option<CorrectionResult>,
    sm: FlipSM,
}

impl<S: Surface, L: ImageLoader> FlipController<S, L> {
    /// Fails with [`Error::InvalidOptions`] unless `options` pass
    /// [`FlipOptions::validated`].
    pub fn new(surface: S, loader: L, options: FlipOptions) -> Result<Self, Error> {
        Self::with_parts(surface, loader, ClassSwapDriver, YieldScheduler, options)
    }
}

impl<S, L, D, K> FlipController<S, L, D, K>
where
    S: Surface,
    L: ImageLoader,
    D: TransitionDriver,
    K: Scheduler,
{
    pub fn with_parts(
        surface: S,
        loader: L,
        driver: D,
        scheduler: K,
        options: FlipOptions,
    ) -> Result<Self, Error> {
        Ok(Self {
            surface,
            loader,
            driver,
            scheduler,
            options: check_options(options)?,
            cache: NaturalSizeCache::new(),
            src: None,
            measurements: None,
            correction: None,
            sm: FlipSM::new(),
        })
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn options(&self) -> &FlipOptions {
        &self.options
    }

    /// Replaces the options for the next play; invalid options are rejected
    /// and the current ones kept.
    pub fn set_options(&mut self, options: FlipOptions) -> Result<(), Error> {
        self.options = check_options(options)?;
        Ok(())
    }

    pub fn cache(&self) -> &NaturalSizeCache {
        &self.cache
    }

    pub fn state(&self) -> FlipState {
        self.sm.current()
    }

    /// Correction applied by the most recent play.
    pub fn correction(&self) -> Option<CorrectionResult> {
        self.correction
    }

    /// Sets the image source. Changing it drops the cached size of the
    /// previous source.
    pub fn set_src(&mut self, src: impl Into<String>) {
        let src = src.into();
        if let Some(prev) = self.src.as_deref() {
            if prev != src {
                self.cache.evict(prev);
            }
        }
        self.src = Some(src);
    }

    /// Starting box of the element in viewport coordinates.
    pub fn set_measurements(&mut self, measurements: BoundingBox) {
        self.measurements = Some(measurements);
    }

    pub async fn play(&mut self) -> Result<PlayOutcome, Error> {
        if self.sm.current() != FlipState::Idle {
            debug!(state = ?self.sm.current(), "play without reset; resetting first");
            self.reset();
        }
        let src = self.src.clone().ok_or(Error::MissingInput("src"))?;
        let first_abs = self.measurements.ok_or(Error::MissingInput("measurements"))?;

        let ch = self.sm.on_play();
        self.log_change(ch);

        let resolved = self.resolve_natural(&src).await;
        let natural = match resolved {
            Ok(n) => n,
            Err(Error::Detached) => return Ok(self.abandon(false)),
            Err(e) => {
                warn!(src = %src, error = %e, "natural size unavailable");
                let ch = self.sm.on_reset();
                self.log_change(ch);
                return Err(e);
            }
        };
        if !self.surface.is_connected() {
            return Ok(self.abandon(false));
        }

        let rotation = self.options.rotation();
        if rotation.degrees() != 0 {
            self.surface.set_style(
                Layer::Rotation,
                "transform",
                &format!("rotate({}deg)", rotation.degrees()),
            );
        }

        self.surface.set_style(Layer::Host, "display", "flex");
        let Some(last) = self.surface.bounding_box() else {
            return Ok(self.abandon(true));
        };
        let first = first_abs.offset_from(&last);
        self.set_first_properties(&first);
        let ch = self.sm.on_measured();
        self.log_change(ch);

        let correction = match correction::correct_checked(
            &first,
            &last,
            &natural,
            rotation,
            self.options.sizing,
        ) {
            Ok(c) => c,
            Err(e) => {
                warn!(error = %e, "cannot correct flip geometry");
                self.reset();
                return Err(e);
            }
        };
        debug!(?first, ?last, ?natural, ?rotation, ?correction, "flip correction");
        self.apply_correction(&correction);
        self.correction = Some(correction);
        let ch = self.sm.on_corrected();
        self.log_change(ch);

        let transition = self.options.transition.as_str();
        let surface = &self.surface;
        let scheduler = &self.scheduler;

        let outer = self.driver.flip(surface, Layer::Outer, LAST_CLASS, transition);
        let inner = async move {
            // The corrected frame must be painted before it starts relaxing.
            scheduler.tick().await;
            if !surface.is_connected() {
                return false;
            }
            surface.set_style(Layer::Image, "transform", "");
            surface.set_style(Layer::Image, "transition", transition);
            surface.transition_end(Layer::Image).await;
            true
        };

        let joined = future::join(outer, inner);
        let settled = tokio::time::timeout(self.options.settle_timeout, joined).await;
        let outcome = match settled {
            Ok(((), true)) => PlayOutcome::Completed,
            Ok(((), false)) => {
                debug!(src = %src, "element detached during flip");
                self.abandon(true)
            }
            Err(_) => {
                warn!(
                    timeout = %humantime::format_duration(self.options.settle_timeout),
                    "transition did not settle"
                );
                PlayOutcome::TimedOut
            }
        };
        Ok(outcome)
    }

    /// Clears everything `play()` applied and hides the element. Idempotent.
    pub fn reset(&mut self) {
        let s = &self.surface;
        s.set_style(Layer::Host, "display", "none");
        s.remove_class(Layer::Outer, LAST_CLASS);
        s.set_style(Layer::Outer, "transition", "none");
        s.set_style(Layer::Rotation, "transform", "");
        s.set_style(Layer::Image, "transform", "");
        s.set_style(Layer::Image, "transform-origin", "");
        s.set_style(Layer::Image, "transition", "none");
        s.set_style(Layer::Image, "width", "100%");
        let ch = self.sm.on_reset();
        self.log_change(ch);
    }

    async fn resolve_natural(&self, src: &str) -> Result<NaturalSize, Error> {
        if self.options.cache_naturals {
            self.cache.resolve(&self.loader, src).await
        } else {
            self.loader.natural_size(src).await
        }
    }

    fn set_first_properties(&self, first: &BoundingBox) {
        let s = &self.surface;
        s.set_custom_property("--first-top", &format!("{}px", first.top));
        s.set_custom_property("--first-left", &format!("{}px", first.left));
        s.set_custom_property("--first-height", &format!("{}px", first.height));
        s.set_custom_property("--first-width", &format!("{}px", first.width));
    }

    fn apply_correction(&self, c: &CorrectionResult) {
        let s = &self.surface;
        s.set_style(Layer::Image, "transition", "none");
        s.set_style(Layer::Image, "width", &format!("{}px", c.w));
        s.set_style(Layer::Image, "transform-origin", "center");
        s.set_style(
            Layer::Image,
            "transform",
            &format!("translate(-50%, -50%) scale({}, {})", c.x, c.y),
        );
    }

    /// `shown` is set once styles have been written, which then get cleared.
    fn abandon(&mut self, shown: bool) -> PlayOutcome {
        debug!(shown, "element detached; abandoning flip");
        if shown {
            self.reset();
        } else {
            let ch = self.sm.on_reset();
            self.log_change(ch);
        }
        PlayOutcome::Abandoned
    }

    fn log_change(&self, ch: Option<FlipStateChange>) {
        if let Some(FlipStateChange { from, to }) = ch {
            debug!(?from, ?to, "flip state");
        }
    }
}

fn check_options(options: FlipOptions) -> Result<FlipOptions, Error> {
    options
        .validated()
        .map_err(|e| Error::InvalidOptions(format!("{e:#}")))
}
