//! One enumeration algorithm for both feature groups.
//!
//! The engine exposes inputs and outputs through two parallel sets of four
//! calls; `FeatureOps` picks one set and `FeatureEnumerator` walks it.

use core::ffi::c_char;
use std::fmt;

use ortinfo_abi::{CountFn, ERR_OK, ModelApi, OrtModel, OrtTypeInfo, StringAtFn, TypeInfoAtFn};
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::engine::{Engine, copy_string};
use crate::error::{ModelError, Result};
use crate::handle::NativeHandle;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FeatureSide {
    Input,
    Output,
}

impl fmt::Display for FeatureSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            FeatureSide::Input => "input",
            FeatureSide::Output => "output",
        })
    }
}

/// The four engine calls an enumeration pass needs, plus their names for error reporting.
#[derive(Clone, Copy)]
pub struct FeatureOps {
    pub count: CountFn,
    pub name: StringAtFn,
    pub description: StringAtFn,
    pub type_info: TypeInfoAtFn,
    pub call_names: [&'static str; 4],
}

impl FeatureOps {
    pub fn for_side(api: &ModelApi, side: FeatureSide) -> Self {
        match side {
            FeatureSide::Input => Self {
                count: api.input_count,
                name: api.input_name,
                description: api.input_description,
                type_info: api.input_type_info,
                call_names: [
                    "input_count",
                    "input_name",
                    "input_description",
                    "input_type_info",
                ],
            },
            FeatureSide::Output => Self {
                count: api.output_count,
                name: api.output_name,
                description: api.output_description,
                type_info: api.output_type_info,
                call_names: [
                    "output_count",
                    "output_name",
                    "output_description",
                    "output_type_info",
                ],
            },
        }
    }
}

/// One raw feature slot, copied out of engine buffers.
///
/// Owns the engine type-info; it is released when the record drops.
#[derive(Debug)]
pub struct FeatureRecord {
    pub name: String,
    pub description: String,
    pub type_info: NativeHandle<OrtTypeInfo>,
}

pub struct FeatureEnumerator {
    engine: Engine,
    side: FeatureSide,
    ops: FeatureOps,
}

impl FeatureEnumerator {
    pub fn new(engine: Engine, side: FeatureSide) -> Self {
        Self {
            engine,
            side,
            ops: FeatureOps::for_side(engine.model_api(), side),
        }
    }

    #[inline]
    pub fn side(&self) -> FeatureSide {
        self.side
    }

    /// Walk `count`, then `name`, `description`, `type_info` for each index, in engine order.
    ///
    /// The first failing call aborts the pass with `EnumerationFailure`; records
    /// gathered so far are dropped (and their type-infos released).
    ///
    /// # Safety
    /// `model` must be a live model owned by this enumerator's engine.
    pub unsafe fn enumerate(&self, model: *const OrtModel) -> Result<Vec<FeatureRecord>> {
        let [count_call, name_call, desc_call, type_call] = self.ops.call_names;

        let mut count = 0usize;
        if unsafe { (self.ops.count)(model, &mut count) } != ERR_OK {
            return Err(self.failure(None, count_call));
        }
        trace!(side = %self.side, count, "enumerating features");

        let release = self.engine.type_info_api().release_type_info;
        // `count` is engine-reported; grow per record instead of pre-sizing.
        let mut records = Vec::new();
        for i in 0..count {
            let name = unsafe { self.string_at(self.ops.name, model, i) }
                .ok_or_else(|| self.failure(Some(i), name_call))?;
            let description = unsafe { self.string_at(self.ops.description, model, i) }
                .ok_or_else(|| self.failure(Some(i), desc_call))?;

            let mut info: *mut OrtTypeInfo = std::ptr::null_mut();
            if unsafe { (self.ops.type_info)(model, i, &mut info) } != ERR_OK {
                return Err(self.failure(Some(i), type_call));
            }
            let type_info = unsafe { NativeHandle::from_raw(info, release) }
                .map_err(|_| self.failure(Some(i), type_call))?;

            records.push(FeatureRecord {
                name,
                description,
                type_info,
            });
        }
        Ok(records)
    }

    /// `None` on a failed call or a name that is not valid UTF-8.
    unsafe fn string_at(&self, f: StringAtFn, model: *const OrtModel, i: usize) -> Option<String> {
        let mut ptr: *const c_char = std::ptr::null();
        let mut len = 0usize;
        if unsafe { f(model, i, &mut ptr, &mut len) } != ERR_OK {
            return None;
        }
        unsafe { copy_string(ptr, len) }.ok()
    }

    fn failure(&self, index: Option<usize>, call: &'static str) -> ModelError {
        ModelError::EnumerationFailure {
            side: self.side,
            index,
            call,
        }
    }
}
