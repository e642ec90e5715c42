//! Geometry correction for the FLIP entry animation.
//!
//! The outer FLIP animation scales the container uniformly from the first box
//! to the last one, which stretches the image inside it whenever the two
//! boxes differ in shape. [`correct`] computes an inner width and a
//! non-uniform `scale(x, y)` that cancels that stretch at the first frame;
//! relaxing the inner transform to identity alongside the outer animation
//! then keeps the image undistorted for the whole transition.
//!
//! The tables below are exact case analysis, tuned against real photos and
//! devices. Comparison operators matter at boundary aspect ratios; keep them
//! as they are unless the fixtures in the tests are re-validated.

use tracing::trace;

use crate::error::Error;
use crate::geometry::{BoundingBox, CorrectionResult, NaturalSize, Rotation, SizingMode};

/// Quantities derived once per correction.
#[derive(Debug, Clone, Copy)]
struct Ratios {
    sizing: SizingMode,
    img_aspect: f64,
    first_aspect: f64,
    last_aspect: f64,
    inv_img_aspect: f64,
    inv_first_aspect: f64,
    inv_last_aspect: f64,
    img_width: f64,
    img_height: f64,
    width_ratio: f64,
    // Normalised against img_width, not img_height.
    height_ratio: f64,
}

impl Ratios {
    fn derive(
        first: &BoundingBox,
        last: &BoundingBox,
        natural: &NaturalSize,
        sizing: SizingMode,
    ) -> Self {
        let img_aspect = natural.aspect();
        let first_aspect = first.aspect();
        let last_aspect = last.aspect();
        let img_width = image_width(last, img_aspect, sizing);

        Self {
            sizing,
            img_aspect,
            first_aspect,
            last_aspect,
            inv_img_aspect: 1.0 / img_aspect,
            inv_first_aspect: 1.0 / first_aspect,
            inv_last_aspect: 1.0 / last_aspect,
            img_width,
            img_height: last.height,
            width_ratio: last.width / img_width,
            height_ratio: last.height / img_width,
        }
    }
}

/// Width the image occupies inside `last` under `sizing`, ignoring rotation.
pub fn image_width(last: &BoundingBox, img_aspect: f64, sizing: SizingMode) -> f64 {
    let fitted = last.height * img_aspect;
    match sizing {
        SizingMode::Cover => last.width.max(fitted),
        SizingMode::Contain => last.width.min(fitted),
    }
}

/// Computes the corrective width and scale for one FLIP play.
///
/// Pure and total: degenerate inputs (zero or negative sizes) produce
/// non-finite output instead of an error. Use [`correct_checked`] at
/// boundaries that receive measured values.
pub fn correct(
    first: &BoundingBox,
    last: &BoundingBox,
    natural: &NaturalSize,
    rotation: Rotation,
    sizing: SizingMode,
) -> CorrectionResult {
    let d = Ratios::derive(first, last, natural, sizing);
    trace!(?d, ?rotation, "derived correction ratios");

    if !rotation.is_sideways() {
        return CorrectionResult {
            w: d.img_width,
            x: x_upright(&d),
            y: y_upright(&d),
        };
    }

    match sizing {
        SizingMode::Cover if d.last_aspect >= 1.0 => CorrectionResult {
            w: d.img_width * d.img_aspect,
            x: x_side_cover_landscape(&d),
            y: y_side_cover_landscape(&d),
        },
        SizingMode::Cover => CorrectionResult {
            w: d.img_height.max(d.img_width * d.last_aspect),
            x: x_side_cover_portrait(&d),
            y: y_side_cover_portrait(&d),
        },
        SizingMode::Contain if d.last_aspect > 1.0 => CorrectionResult {
            w: d.img_height,
            x: x_side_contain_landscape(&d),
            y: y_side_contain_landscape(&d),
        },
        SizingMode::Contain => CorrectionResult {
            w: d.img_height.min(d.img_width * d.img_aspect),
            x: x_side_contain_portrait(&d),
            y: y_side_contain_portrait(&d),
        },
    }
}

/// [`correct`] with the inputs validated first.
pub fn correct_checked(
    first: &BoundingBox,
    last: &BoundingBox,
    natural: &NaturalSize,
    rotation: Rotation,
    sizing: SizingMode,
) -> Result<CorrectionResult, Error> {
    first.check("first")?;
    last.check("last")?;
    natural.check()?;
    let result = correct(first, last, natural, rotation, sizing);
    if !result.is_finite() {
        return Err(Error::InvalidGeometry(format!(
            "correction produced non-finite output {result:?}"
        )));
    }
    Ok(result)
}

fn x_upright(d: &Ratios) -> f64 {
    if d.first_aspect > d.img_aspect {
        return d.width_ratio;
    }
    match d.sizing {
        SizingMode::Cover => d.inv_first_aspect * d.last_aspect.min(d.img_aspect),
        SizingMode::Contain => d.inv_first_aspect * d.last_aspect.max(d.img_aspect),
    }
}

fn y_upright(d: &Ratios) -> f64 {
    d.height_ratio * d.first_aspect.max(d.img_aspect)
}

fn x_side_cover_landscape(d: &Ratios) -> f64 {
    if d.first_aspect > d.img_aspect {
        return d.height_ratio * d.first_aspect.max(d.img_aspect);
    }
    if d.img_aspect > d.last_aspect {
        if d.height_ratio > d.first_aspect {
            return d.inv_img_aspect * d.height_ratio;
        }
        return d.height_ratio * d.first_aspect;
    }
    if d.first_aspect > d.inv_img_aspect {
        return d.first_aspect * d.height_ratio;
    }
    if d.img_aspect > d.inv_first_aspect {
        return (d.img_aspect / d.last_aspect) * d.height_ratio;
    }
    d.inv_img_aspect * d.height_ratio
}

fn y_side_cover_landscape(d: &Ratios) -> f64 {
    if d.first_aspect > d.img_aspect {
        return d.width_ratio;
    }
    if d.img_aspect > d.last_aspect {
        if d.height_ratio > d.first_aspect {
            return (d.width_ratio * d.height_ratio) / d.first_aspect;
        }
        return d.width_ratio;
    }
    if d.first_aspect > d.inv_img_aspect {
        return d.last_aspect * d.height_ratio;
    }
    d.inv_img_aspect / d.first_aspect
}

fn x_side_cover_portrait(d: &Ratios) -> f64 {
    if d.first_aspect > d.img_aspect && d.height_ratio > d.last_aspect {
        return d.first_aspect * d.last_aspect.max(d.img_aspect);
    }
    if d.height_ratio > d.last_aspect {
        if d.first_aspect > d.height_ratio {
            return d.img_aspect * d.first_aspect;
        }
        return d.inv_img_aspect / d.height_ratio;
    }
    if d.inv_img_aspect > d.first_aspect {
        return d.inv_last_aspect * d.first_aspect.max(d.height_ratio);
    }
    if d.img_aspect > d.inv_first_aspect || d.first_aspect > d.last_aspect {
        return d.first_aspect / d.last_aspect;
    }
    1.0 / (d.img_aspect * d.last_aspect)
}

fn y_side_cover_portrait(d: &Ratios) -> f64 {
    if d.first_aspect > d.img_aspect {
        if d.img_aspect > d.height_ratio {
            if d.last_aspect > d.height_ratio {
                return 1.0;
            }
            return d.img_aspect * d.last_aspect;
        }
        if d.height_ratio > d.last_aspect {
            return d.height_ratio;
        }
        return (d.first_aspect / d.img_aspect).min(1.0);
    }
    if d.height_ratio > d.last_aspect {
        if d.img_aspect > d.height_ratio {
            return d.img_aspect.max(d.inv_first_aspect) * d.last_aspect;
        }
        if d.first_aspect > d.height_ratio {
            return d.inv_img_aspect;
        }
        return d.last_aspect / d.first_aspect;
    }
    if d.inv_img_aspect > d.first_aspect {
        return 1.0 / (d.img_aspect * d.first_aspect);
    }
    d.inv_img_aspect / d.height_ratio
}

fn x_side_contain_landscape(d: &Ratios) -> f64 {
    if d.first_aspect > d.inv_img_aspect {
        return d.first_aspect * d.img_aspect;
    }
    1.0
}

fn y_side_contain_landscape(d: &Ratios) -> f64 {
    if d.first_aspect > d.inv_img_aspect {
        return d.last_aspect * d.img_aspect;
    }
    d.last_aspect / d.first_aspect
}

fn x_side_contain_portrait(d: &Ratios) -> f64 {
    if d.first_aspect > d.inv_img_aspect {
        return d.first_aspect * d.img_aspect.max(d.height_ratio);
    }
    if d.height_ratio > d.img_aspect {
        if d.last_aspect > d.first_aspect {
            return d.img_aspect;
        }
        return 1.0 / (d.img_aspect * d.last_aspect);
    }
    d.width_ratio
}

fn y_side_contain_portrait(d: &Ratios) -> f64 {
    if d.first_aspect > d.inv_img_aspect {
        if d.img_aspect > d.height_ratio {
            return d.img_aspect * d.last_aspect;
        }
        return d.width_ratio;
    }
    if d.height_ratio > d.img_aspect {
        return 1.0 / (d.img_aspect * d.first_aspect);
    }
    d.last_aspect / d.first_aspect
}
