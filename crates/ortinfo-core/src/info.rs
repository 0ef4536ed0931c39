//! Immutable snapshot of one model's shape and metadata.

use ortinfo_abi::OrtModel;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::ConverterConfig;
use crate::descriptor::{DescriptorBuilder, FeatureDescriptor};
use crate::engine::Engine;
use crate::error::Result;
use crate::features::{FeatureEnumerator, FeatureSide};
use crate::metadata::{DescriptiveFields, MetadataReader, MetadataTable};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelInfo {
    author: String,
    name: String,
    domain: String,
    description: String,
    version: i64,
    metadata: MetadataTable,
    inputs: Vec<FeatureDescriptor>,
    outputs: Vec<FeatureDescriptor>,
}

impl ModelInfo {
    /// Query everything the engine knows about `model`. All-or-nothing.
    ///
    /// # Safety
    /// `model` must be a live model owned by `engine`, and no other thread may
    /// issue engine calls against it for the duration of the build.
    pub unsafe fn build(
        engine: Engine,
        model: *const OrtModel,
        config: &ConverterConfig,
    ) -> Result<Self> {
        let reader = MetadataReader::new(engine);
        let metadata = unsafe { reader.read_metadata(model) }?;

        let builder = DescriptorBuilder::new(engine, &metadata, config);
        let inputs = unsafe { convert_pass(engine, FeatureSide::Input, model, &builder) }?;
        let outputs = unsafe { convert_pass(engine, FeatureSide::Output, model, &builder) }?;

        let DescriptiveFields {
            author,
            name,
            domain,
            description,
            version,
        } = unsafe { reader.read_descriptive_fields(model) }?;

        debug!(
            model = %name,
            version,
            inputs = inputs.len(),
            outputs = outputs.len(),
            metadata = metadata.len(),
            "built model info"
        );

        Ok(Self {
            author,
            name,
            domain,
            description,
            version,
            metadata,
            inputs,
            outputs,
        })
    }

    #[inline]
    pub fn author(&self) -> &str {
        &self.author
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn domain(&self) -> &str {
        &self.domain
    }

    #[inline]
    pub fn description(&self) -> &str {
        &self.description
    }

    #[inline]
    pub fn version(&self) -> i64 {
        self.version
    }

    #[inline]
    pub fn metadata(&self) -> &MetadataTable {
        &self.metadata
    }

    /// Inputs in engine index order.
    #[inline]
    pub fn input_features(&self) -> &[FeatureDescriptor] {
        &self.inputs
    }

    /// Outputs in engine index order.
    #[inline]
    pub fn output_features(&self) -> &[FeatureDescriptor] {
        &self.outputs
    }

    pub fn input(&self, name: &str) -> Option<&FeatureDescriptor> {
        self.inputs.iter().find(|f| f.name() == name)
    }

    pub fn output(&self, name: &str) -> Option<&FeatureDescriptor> {
        self.outputs.iter().find(|f| f.name() == name)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

// Records (and their engine type-infos) live only until the pass is converted.
unsafe fn convert_pass(
    engine: Engine,
    side: FeatureSide,
    model: *const OrtModel,
    builder: &DescriptorBuilder<'_>,
) -> Result<Vec<FeatureDescriptor>> {
    let records = unsafe { FeatureEnumerator::new(engine, side).enumerate(model) }?;
    builder.build_all(&records)
}
