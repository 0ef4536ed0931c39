//! `Image.*` model metadata attached to features denoted as images.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::metadata::MetadataTable;

pub const KEY_PIXEL_FORMAT: &str = "Image.BitmapPixelFormat";
pub const KEY_COLOR_SPACE_GAMMA: &str = "Image.ColorSpaceGamma";
pub const KEY_NOMINAL_PIXEL_RANGE: &str = "Image.NominalPixelRange";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BitmapPixelFormat {
    Gray8,
    Rgb8,
    Bgr8,
    Rgba8,
    Bgra8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ColorSpaceGamma {
    Linear,
    Srgb,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NominalPixelRange {
    NominalRange0To255,
    Normalized0To1,
    NormalizedMinus1To1,
    NominalRange16To235,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ImageProperties {
    pub pixel_format: Option<BitmapPixelFormat>,
    pub color_space_gamma: Option<ColorSpaceGamma>,
    pub nominal_pixel_range: Option<NominalPixelRange>,
}

impl ImageProperties {
    /// Read the model-wide image keys; unknown values are logged and left unset.
    pub fn from_metadata(metadata: &MetadataTable) -> Self {
        Self {
            pixel_format: pick(metadata, KEY_PIXEL_FORMAT, |v| match v {
                "Gray8" => Some(BitmapPixelFormat::Gray8),
                "Rgb8" => Some(BitmapPixelFormat::Rgb8),
                "Bgr8" => Some(BitmapPixelFormat::Bgr8),
                "Rgba8" => Some(BitmapPixelFormat::Rgba8),
                "Bgra8" => Some(BitmapPixelFormat::Bgra8),
                _ => None,
            }),
            color_space_gamma: pick(metadata, KEY_COLOR_SPACE_GAMMA, |v| match v {
                "Linear" => Some(ColorSpaceGamma::Linear),
                "SRGB" => Some(ColorSpaceGamma::Srgb),
                _ => None,
            }),
            nominal_pixel_range: pick(metadata, KEY_NOMINAL_PIXEL_RANGE, |v| match v {
                "NominalRange_0_255" => Some(NominalPixelRange::NominalRange0To255),
                "Normalized_0_1" => Some(NominalPixelRange::Normalized0To1),
                "Normalized_1_1" => Some(NominalPixelRange::NormalizedMinus1To1),
                "NominalRange_16_235" => Some(NominalPixelRange::NominalRange16To235),
                _ => None,
            }),
        }
    }
}

fn pick<T>(metadata: &MetadataTable, key: &str, parse: impl Fn(&str) -> Option<T>) -> Option<T> {
    let raw = metadata.get(key)?;
    let parsed = parse(raw.trim());
    if parsed.is_none() {
        warn!(key, value = %raw, "unrecognized image metadata value");
    }
    parsed
}
