//! Typed feature descriptors and the builder that produces them from engine type-info.

mod builder;
mod image;
mod types;

pub use builder::{DescriptorBuilder, MAX_NESTING_DEPTH, MAX_TENSOR_RANK};
pub use image::{BitmapPixelFormat, ColorSpaceGamma, ImageProperties, NominalPixelRange};
pub use types::{Denotation, Dimension, FeatureDescriptor, FeatureKind, TensorElementType};
