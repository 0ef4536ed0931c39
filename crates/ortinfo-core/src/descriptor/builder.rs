// Converts one raw feature record into a `FeatureDescriptor`.
//
// Structure (kind, element type, shape) comes only from engine type-info.
// Metadata may only add annotations: the denotation and, for images, the
// `Image.*` properties.

use core::ffi::c_char;

use ortinfo_abi::*;
use tracing::warn;

use super::image::ImageProperties;
use super::types::{Denotation, Dimension, FeatureDescriptor, FeatureKind, TensorElementType};
use crate::config::ConverterConfig;
use crate::engine::{Engine, check, copy_c_str, copy_string};
use crate::error::{ModelError, Result};
use crate::features::FeatureRecord;
use crate::handle::NativeHandle;
use crate::metadata::MetadataTable;

/// Deepest sequence/map nesting accepted before the type-info is treated as malformed.
pub const MAX_NESTING_DEPTH: usize = 64;

/// Largest tensor rank accepted from the engine; anything above is malformed.
pub const MAX_TENSOR_RANK: usize = 1024;

pub struct DescriptorBuilder<'a> {
    engine: Engine,
    metadata: &'a MetadataTable,
    config: &'a ConverterConfig,
}

impl<'a> DescriptorBuilder<'a> {
    pub fn new(engine: Engine, metadata: &'a MetadataTable, config: &'a ConverterConfig) -> Self {
        Self {
            engine,
            metadata,
            config,
        }
    }

    pub fn build(&self, record: &FeatureRecord) -> Result<FeatureDescriptor> {
        let info = record.type_info.as_ptr();

        // SAFETY: the record owns a live type-info from this engine.
        let kind = unsafe { self.classify(info, 0) }?;
        let structural = unsafe { self.type_denotation(info) }?;

        let denotation = self.resolve_denotation(&record.name, structural.as_deref());
        let image = match denotation {
            Some(Denotation::Image) if self.config.read_image_properties => {
                Some(ImageProperties::from_metadata(self.metadata))
            }
            _ => None,
        };

        Ok(FeatureDescriptor::new(
            record.name.clone(),
            record.description.clone(),
            kind,
            denotation,
            image,
        ))
    }

    /// Convert a whole pass; the first failure discards everything.
    pub fn build_all(&self, records: &[FeatureRecord]) -> Result<Vec<FeatureDescriptor>> {
        records.iter().map(|r| self.build(r)).collect()
    }

    /// Metadata wins over the type-info's own denotation when it names a known value.
    fn resolve_denotation(&self, feature: &str, structural: Option<&str>) -> Option<Denotation> {
        let key = self.config.denotation_key(feature);
        if let Some(raw) = self.metadata.get(&key) {
            match Denotation::parse(raw) {
                Some(d) => return Some(d),
                None => warn!(feature, key = %key, value = %raw, "unrecognized denotation in metadata"),
            }
        }

        let raw = structural?;
        let parsed = Denotation::parse(raw);
        if parsed.is_none() {
            warn!(feature, value = %raw, "unrecognized denotation in type info");
        }
        parsed
    }

    unsafe fn classify(&self, info: *const OrtTypeInfo, depth: usize) -> Result<FeatureKind> {
        if depth > MAX_NESTING_DEPTH {
            return Err(ModelError::MalformedTypeInfo(format!(
                "type nesting deeper than {MAX_NESTING_DEPTH}"
            )));
        }
        let api = self.engine.type_info_api();

        let mut kind = TYPE_KIND_UNKNOWN;
        check("type_kind", unsafe { (api.kind)(info, &mut kind) })?;

        match kind {
            TYPE_KIND_TENSOR => unsafe { self.tensor(info) },
            TYPE_KIND_SEQUENCE => {
                let element =
                    unsafe { self.nested("sequence_element_type", api.sequence_element_type, info) }?;
                let element = unsafe { self.classify(element.as_ptr(), depth + 1) }?;
                Ok(FeatureKind::Sequence {
                    element: Box::new(element),
                })
            }
            TYPE_KIND_MAP => {
                let mut key_code = ELEMENT_UNDEFINED;
                check("map_key_type", unsafe { (api.map_key_type)(info, &mut key_code) })?;
                let key = TensorElementType::from_code(key_code)?;

                let value = unsafe { self.nested("map_value_type", api.map_value_type, info) }?;
                let value = unsafe { self.classify(value.as_ptr(), depth + 1) }?;
                Ok(FeatureKind::Map {
                    key,
                    value: Box::new(value),
                })
            }
            TYPE_KIND_UNKNOWN => Err(ModelError::UnsupportedFeatureType("unknown".into())),
            TYPE_KIND_OPAQUE => Err(ModelError::UnsupportedFeatureType("opaque".into())),
            TYPE_KIND_SPARSE_TENSOR => {
                Err(ModelError::UnsupportedFeatureType("sparse tensor".into()))
            }
            TYPE_KIND_OPTIONAL => Err(ModelError::UnsupportedFeatureType("optional".into())),
            other => Err(ModelError::UnsupportedFeatureType(format!(
                "type kind code {other}"
            ))),
        }
    }

    unsafe fn tensor(&self, info: *const OrtTypeInfo) -> Result<FeatureKind> {
        let api = self.engine.type_info_api();

        let mut code = ELEMENT_UNDEFINED;
        check("tensor_element_type", unsafe {
            (api.tensor_element_type)(info, &mut code)
        })?;
        let element_type = TensorElementType::from_code(code)?;

        let mut rank = 0usize;
        check("tensor_dim_count", unsafe {
            (api.tensor_dim_count)(info, &mut rank)
        })?;
        if rank > MAX_TENSOR_RANK {
            return Err(ModelError::MalformedTypeInfo(format!(
                "tensor rank {rank} exceeds {MAX_TENSOR_RANK}"
            )));
        }

        let mut values = vec![0i64; rank];
        let mut symbols: Vec<*const c_char> = vec![std::ptr::null(); rank];
        if rank > 0 {
            check("tensor_dims", unsafe {
                (api.tensor_dims)(info, values.as_mut_ptr(), rank)
            })?;
            check("tensor_symbolic_dims", unsafe {
                (api.tensor_symbolic_dims)(info, symbols.as_mut_ptr(), rank)
            })?;
        }

        let shape = values
            .into_iter()
            .zip(symbols)
            .map(|(v, sym)| {
                let symbol = unsafe { copy_c_str(sym) }.map_err(|_| {
                    ModelError::MalformedTypeInfo("symbolic dimension is not valid UTF-8".into())
                })?;
                Dimension::from_raw(v, Some(symbol))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(FeatureKind::Tensor {
            element_type,
            shape,
        })
    }

    unsafe fn nested(
        &self,
        call: &'static str,
        f: NestedTypeInfoFn,
        info: *const OrtTypeInfo,
    ) -> Result<NativeHandle<OrtTypeInfo>> {
        let mut out: *mut OrtTypeInfo = std::ptr::null_mut();
        check(call, unsafe { f(info, &mut out) })?;
        let release = self.engine.type_info_api().release_type_info;
        unsafe { NativeHandle::from_raw(out, release) }
            .map_err(|_| ModelError::MalformedTypeInfo(format!("`{call}` returned no type info")))
    }

    unsafe fn type_denotation(&self, info: *const OrtTypeInfo) -> Result<Option<String>> {
        let api = self.engine.type_info_api();
        let mut ptr: *const c_char = std::ptr::null();
        let mut len = 0usize;
        check("type_denotation", unsafe { (api.denotation)(info, &mut ptr, &mut len) })?;
        let s = unsafe { copy_string(ptr, len) }.map_err(|_| {
            ModelError::MalformedTypeInfo("type denotation is not valid UTF-8".into())
        })?;
        Ok((!s.is_empty()).then_some(s))
    }
}
