use std::future::Future;
use std::time::Duration;

use tracing::trace;

use crate::surface::{Layer, Surface};

pub const DEFAULT_TRANSITION: &str = "transform 0.5s cubic-bezier(0.49, 0.01, 0, 1)";

/// Yields one scheduling tick so pending style writes get painted.
pub trait Scheduler {
    fn tick(&self) -> impl Future<Output = ()>;
}

impl<T: Scheduler + ?Sized> Scheduler for &T {
    fn tick(&self) -> impl Future<Output = ()> {
        (**self).tick()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct YieldScheduler;

impl Scheduler for YieldScheduler {
    async fn tick(&self) {
        tokio::task::yield_now().await;
    }
}

/// Animates a layer from its "first" geometry to the geometry selected by a
/// CSS class.
pub trait TransitionDriver {
    fn flip<S: Surface>(
        &self,
        surface: &S,
        layer: Layer,
        css: &str,
        transition: &str,
    ) -> impl Future<Output = ()>;
}

/// Sets the transition on the layer, swaps in the target class and waits for
/// the transition to end.
#[derive(Debug, Clone, Copy, Default)]
pub struct ClassSwapDriver;

impl TransitionDriver for ClassSwapDriver {
    async fn flip<S: Surface>(&self, surface: &S, layer: Layer, css: &str, transition: &str) {
        trace!(?layer, css, transition, "flip");
        surface.set_style(layer, "transition", transition);
        surface.add_class(layer, css);
        surface.transition_end(layer).await;
    }
}

/// Duration of the first time value in a CSS transition shorthand
/// (`0.5s`, `250ms`).
pub fn parse_duration(transition: &str) -> Option<Duration> {
    transition
        .split(|c: char| c.is_whitespace() || c == ',')
        .find_map(parse_time_token)
}

fn parse_time_token(token: &str) -> Option<Duration> {
    let (num, scale) = if let Some(n) = token.strip_suffix("ms") {
        (n, 0.001)
    } else if let Some(n) = token.strip_suffix('s') {
        (n, 1.0)
    } else {
        return None;
    };
    let v: f64 = num.parse().ok()?;
    if !v.is_finite() || v < 0.0 {
        return None;
    }
    Some(Duration::from_secs_f64(v * scale))
}
