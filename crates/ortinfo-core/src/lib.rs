//! ortinfo core: owns native engine models and turns their raw feature
//! tables into immutable, typed descriptors.
//!
//! Layout:
//! - `handle` / `model`: exclusive ownership of engine resources (release once, clone, detach).
//! - `features` / `metadata`: walk the engine's accessor protocol.
//! - `descriptor`: classify raw type-info into `FeatureDescriptor`s.
//! - `info`: the cached `ModelInfo` snapshot built from all of the above.

pub mod config;
pub mod descriptor;
pub mod engine;
pub mod error;
pub mod features;
pub mod handle;
pub mod info;
pub mod logging;
pub mod metadata;
pub mod model;

pub use config::{ConfigError, ConverterConfig};
pub use descriptor::{
    DescriptorBuilder, Denotation, Dimension, FeatureDescriptor, FeatureKind, ImageProperties,
    TensorElementType,
};
pub use engine::Engine;
pub use error::{ModelError, Result};
pub use features::{FeatureEnumerator, FeatureOps, FeatureRecord, FeatureSide};
pub use handle::NativeHandle;
pub use info::ModelInfo;
pub use metadata::{DescriptiveFields, MetadataReader, MetadataTable};
pub use model::ModelHandle;
