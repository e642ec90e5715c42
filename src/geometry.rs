use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Rectangle in viewport pixels, as returned by a layout query.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BoundingBox {
    pub top: f64,
    pub left: f64,
    pub height: f64,
    pub width: f64,
}

impl BoundingBox {
    pub const fn new(top: f64, left: f64, width: f64, height: f64) -> Self {
        Self {
            top,
            left,
            height,
            width,
        }
    }

    /// Width over height.
    pub fn aspect(&self) -> f64 {
        self.width / self.height
    }

    /// The same box expressed relative to `origin`'s top-left corner.
    pub fn offset_from(&self, origin: &BoundingBox) -> Self {
        Self {
            top: self.top - origin.top,
            left: self.left - origin.left,
            ..*self
        }
    }

    pub(crate) fn check(&self, name: &str) -> Result<(), Error> {
        let dims_ok = self.width.is_finite()
            && self.height.is_finite()
            && self.width > 0.0
            && self.height > 0.0;
        if !dims_ok {
            return Err(Error::InvalidGeometry(format!(
                "{name} box must have positive, finite size (got {}x{})",
                self.width, self.height
            )));
        }
        if !(self.top.is_finite() && self.left.is_finite()) {
            return Err(Error::InvalidGeometry(format!(
                "{name} box has a non-finite position"
            )));
        }
        Ok(())
    }
}

/// Intrinsic pixel dimensions of an image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NaturalSize {
    pub natural_width: u32,
    pub natural_height: u32,
}

impl NaturalSize {
    pub const fn new(natural_width: u32, natural_height: u32) -> Self {
        Self {
            natural_width,
            natural_height,
        }
    }

    pub fn aspect(&self) -> f64 {
        f64::from(self.natural_width) / f64::from(self.natural_height)
    }

    pub(crate) fn check(&self) -> Result<(), Error> {
        if self.natural_width == 0 || self.natural_height == 0 {
            return Err(Error::InvalidGeometry(format!(
                "natural size must be non-zero (got {}x{})",
                self.natural_width, self.natural_height
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SizingMode {
    /// Fill the box, cropping overflow.
    #[default]
    Cover,
    /// Fit entirely within the box, letterboxing if needed.
    Contain,
}

impl SizingMode {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Cover => "cover",
            Self::Contain => "contain",
        }
    }
}

impl fmt::Display for SizingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Camera-sensor rotation correction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum Rotation {
    #[default]
    Upright,
    Half,
    Clockwise,
    CounterClockwise,
}

impl Rotation {
    /// Maps an EXIF orientation code: 3 => 180°, 6 => 90°, 8 => -90°,
    /// everything else (mirrored codes included) => 0°.
    pub const fn from_orientation(orientation: Option<u16>) -> Self {
        match orientation {
            Some(3) => Self::Half,
            Some(6) => Self::Clockwise,
            Some(8) => Self::CounterClockwise,
            _ => Self::Upright,
        }
    }

    pub const fn degrees(&self) -> i32 {
        match self {
            Self::Upright => 0,
            Self::Half => 180,
            Self::Clockwise => 90,
            Self::CounterClockwise => -90,
        }
    }

    /// True for ±90°, where the image's long axis swaps relative to the box.
    pub const fn is_sideways(&self) -> bool {
        matches!(self, Self::Clockwise | Self::CounterClockwise)
    }
}

/// Width and scale factors to apply to the inner image before playing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CorrectionResult {
    pub w: f64,
    pub x: f64,
    pub y: f64,
}

impl CorrectionResult {
    pub fn is_finite(&self) -> bool {
        self.w.is_finite() && self.x.is_finite() && self.y.is_finite()
    }
}
