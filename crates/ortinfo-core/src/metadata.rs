//! Model-level metadata: the free-form key/value table and the five scalar fields.

use core::ffi::c_char;
use std::collections::HashMap;

use ortinfo_abi::{ModelStringFn, OrtModel};
use serde::{Deserialize, Serialize};

use crate::engine::{Engine, check, copy_string};
use crate::error::{ModelError, Result};

/// Flattened model annotations. Later duplicates overwrite earlier ones.
pub type MetadataTable = HashMap<String, String>;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DescriptiveFields {
    pub author: String,
    pub name: String,
    pub domain: String,
    pub description: String,
    pub version: i64,
}

pub struct MetadataReader {
    engine: Engine,
}

impl MetadataReader {
    #[inline]
    pub fn new(engine: Engine) -> Self {
        Self { engine }
    }

    /// Read every metadata pair in engine order (last write wins on duplicate keys).
    ///
    /// A key or value that is not valid UTF-8 fails the read with `EngineFailure`.
    ///
    /// # Safety
    /// `model` must be a live model owned by this reader's engine.
    pub unsafe fn read_metadata(&self, model: *const OrtModel) -> Result<MetadataTable> {
        let api = self.engine.model_api();

        let mut count = 0usize;
        check("metadata_count", unsafe { (api.metadata_count)(model, &mut count) })?;

        let mut table = MetadataTable::new();
        for i in 0..count {
            let (mut key, mut key_len) = (std::ptr::null::<c_char>(), 0usize);
            let (mut val, mut val_len) = (std::ptr::null::<c_char>(), 0usize);
            check("metadata_at", unsafe {
                (api.metadata_at)(model, i, &mut key, &mut key_len, &mut val, &mut val_len)
            })?;
            let key = unsafe { copy_string(key, key_len) }
                .map_err(|_| ModelError::engine("metadata_at"))?;
            let val = unsafe { copy_string(val, val_len) }
                .map_err(|_| ModelError::engine("metadata_at"))?;
            table.insert(key, val);
        }
        Ok(table)
    }

    /// Author, name, domain, description and version; any failure aborts the whole read.
    ///
    /// # Safety
    /// `model` must be a live model owned by this reader's engine.
    pub unsafe fn read_descriptive_fields(&self, model: *const OrtModel) -> Result<DescriptiveFields> {
        let api = self.engine.model_api();

        let author = unsafe { read_string("author", api.author, model) }?;
        let name = unsafe { read_string("name", api.name, model) }?;
        let domain = unsafe { read_string("domain", api.domain, model) }?;
        let description = unsafe { read_string("description", api.description, model) }?;

        let mut version = 0i64;
        check("version", unsafe { (api.version)(model, &mut version) })?;

        Ok(DescriptiveFields {
            author,
            name,
            domain,
            description,
            version,
        })
    }
}

unsafe fn read_string(call: &'static str, f: ModelStringFn, model: *const OrtModel) -> Result<String> {
    let mut ptr: *const c_char = std::ptr::null();
    let mut len = 0usize;
    check(call, unsafe { f(model, &mut ptr, &mut len) })?;
    unsafe { copy_string(ptr, len) }.map_err(|_| ModelError::engine(call))
}
