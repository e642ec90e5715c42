use std::{fs, io::BufReader, path::Path};

use anyhow::Result;
use tracing::debug;

use crate::geometry::{NaturalSize, Rotation};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageMeta {
    pub natural: NaturalSize,
    pub exif_orientation: Option<u16>,
}

impl ImageMeta {
    pub const fn rotation(&self) -> Rotation {
        Rotation::from_orientation(self.exif_orientation)
    }
}

/// FAST: read only the header for dimensions; optionally read EXIF.
pub fn read_image_meta(path: &Path, read_exif: bool) -> Result<ImageMeta> {
    let (w, h) = image::image_dimensions(path)?;
    let exif_orientation = if read_exif {
        read_exif_orientation(path)
    } else {
        None
    };
    Ok(ImageMeta {
        natural: NaturalSize::new(w, h),
        exif_orientation,
    })
}

pub fn read_exif_orientation(path: &Path) -> Option<u16> {
    let f = fs::File::open(path).ok()?;
    let mut buf = BufReader::new(f);
    let reader = exif::Reader::new().read_from_container(&mut buf).ok()?;
    let field = reader.get_field(exif::Tag::Orientation, exif::In::PRIMARY)?;
    let o = field.value.get_uint(0)? as u16;
    debug!(
        orientation = o,
        label = exif_orientation_label(o),
        "exif orientation for {}",
        path.display()
    );
    Some(o)
}

#[inline]
pub fn exif_orientation_label(v: u16) -> &'static str {
    match v {
        1 => "Normal (1)",
        2 => "Mirrored horizontal (2)",
        3 => "Rotated 180° (3)",
        4 => "Mirrored vertical (4)",
        5 => "Mirrored horizontal + Rotated 270° (5)",
        6 => "Rotated 90° CW (6)",
        7 => "Mirrored horizontal + Rotated 90° (7)",
        8 => "Rotated 270° CW (8)",
        _ => "Unknown",
    }
}
