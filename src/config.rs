use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result, ensure};
use serde::Deserialize;

use crate::geometry::{Rotation, SizingMode};
use crate::transition::{self, DEFAULT_TRANSITION};

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct FlipOptions {
    /// How the image fills its final box.
    pub sizing: SizingMode,
    /// EXIF orientation code of the source photo, if known.
    pub orientation: Option<u16>,
    /// CSS transition shorthand, passed through to the transition driver.
    pub transition: String,
    /// Upper bound on waiting for transition-end signals.
    #[serde(with = "humantime_serde")]
    pub settle_timeout: Duration,
    /// Remember natural sizes per source between plays.
    pub cache_naturals: bool,
}

impl FlipOptions {
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self> {
        let s = std::fs::read_to_string(path)?;
        Ok(serde_yaml::from_str(&s)?)
    }

    pub fn rotation(&self) -> Rotation {
        Rotation::from_orientation(self.orientation)
    }

    /// Duration parsed from `transition`.
    pub fn transition_duration(&self) -> Option<Duration> {
        transition::parse_duration(&self.transition)
    }

    /// Validate runtime invariants that cannot be expressed via serde defaults alone.
    pub fn validated(self) -> Result<Self> {
        ensure!(
            !self.transition.trim().is_empty(),
            "transition must not be empty"
        );
        let duration = self
            .transition_duration()
            .with_context(|| format!("transition {:?} has no duration", self.transition))?;
        ensure!(
            self.settle_timeout > duration,
            "settle-timeout ({}) must exceed the transition duration ({})",
            humantime::format_duration(self.settle_timeout),
            humantime::format_duration(duration)
        );
        if let Some(o) = self.orientation {
            ensure!((1..=8).contains(&o), "orientation must be 1..=8 (got {o})");
        }
        Ok(self)
    }

    const fn default_settle_timeout() -> Duration {
        Duration::from_secs(2)
    }
}

impl Default for FlipOptions {
    fn default() -> Self {
        Self {
            sizing: SizingMode::Cover,
            orientation: None,
            transition: DEFAULT_TRANSITION.to_owned(),
            settle_timeout: Self::default_settle_timeout(),
            cache_naturals: true,
        }
    }
}
