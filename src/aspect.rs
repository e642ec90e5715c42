//! Aspect-ratio sizing for image frames.

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

use crate::error::Error;
use crate::geometry::NaturalSize;

#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize)]
#[serde(try_from = "String")]
pub enum AspectRatio {
    /// Grow to fill the parent.
    #[default]
    Fill,
    /// Follow the image's natural aspect. Causes layout shift once loaded.
    Auto,
    /// Width over height.
    Fixed(f64),
}

impl AspectRatio {
    pub const CLASSIC: Self = Self::Fixed(4.0 / 3.0);
    pub const LANDSCAPE: Self = Self::Fixed(16.0 / 9.0);
    pub const PORTRAIT: Self = Self::Fixed(9.0 / 16.0);
    pub const SQUARE: Self = Self::Fixed(1.0);

    pub const fn ratio(&self) -> Option<f64> {
        match self {
            Self::Fixed(r) => Some(*r),
            _ => None,
        }
    }

    /// Frame height for `width`. `None` means the height comes from the
    /// parent (fill) or is not known yet (auto before load).
    pub fn height_for(&self, width: f64, natural: Option<NaturalSize>) -> Option<f64> {
        match self {
            Self::Fill => None,
            Self::Auto => natural.and_then(|n| auto_height(width, n)),
            Self::Fixed(r) => Some(width / r),
        }
    }
}

/// Height that preserves the image's natural aspect at `width`.
pub fn auto_height(width: f64, natural: NaturalSize) -> Option<f64> {
    if natural.natural_width == 0 || natural.natural_height == 0 {
        return None;
    }
    Some(width / natural.aspect())
}

impl FromStr for AspectRatio {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw = s.trim();
        let invalid = || Error::InvalidGeometry(format!("unknown aspect ratio {raw:?}"));
        let parsed = match raw {
            "fill" => Self::Fill,
            "auto" => Self::Auto,
            "classic" => Self::CLASSIC,
            "landscape" => Self::LANDSCAPE,
            "portrait" => Self::PORTRAIT,
            "square" => Self::SQUARE,
            _ => {
                let ratio = if let Some(pct) = raw.strip_suffix('%') {
                    // Height as a percentage of width.
                    let p: f64 = pct.trim().parse().map_err(|_| invalid())?;
                    100.0 / p
                } else if let Some((w, h)) = raw.split_once('/') {
                    let w: f64 = w.trim().parse().map_err(|_| invalid())?;
                    let h: f64 = h.trim().parse().map_err(|_| invalid())?;
                    w / h
                } else {
                    raw.parse().map_err(|_| invalid())?
                };
                if !(ratio.is_finite() && ratio > 0.0) {
                    return Err(invalid());
                }
                Self::Fixed(ratio)
            }
        };
        Ok(parsed)
    }
}

impl TryFrom<String> for AspectRatio {
    type Error = Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl fmt::Display for AspectRatio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fill => f.write_str("fill"),
            Self::Auto => f.write_str("auto"),
            Self::Fixed(r) => write!(f, "{r}"),
        }
    }
}
