//! Thin typed access to the engine's function table.
//!
//! All pointer-level string copying lives here so the walkers stay readable.

use core::ffi::c_char;
use std::ffi::CStr;
use std::str::{self, Utf8Error};
use std::{fmt, slice};

use ortinfo_abi::{ERR_OK, EngineApi, ModelApi, TypeInfoApi};

use crate::error::{ModelError, Result};

/// Copyable reference to a published engine table.
#[derive(Clone, Copy)]
pub struct Engine {
    api: &'static EngineApi,
}

impl Engine {
    #[inline]
    pub fn new(api: &'static EngineApi) -> Self {
        Self { api }
    }

    #[inline]
    pub fn api(&self) -> &'static EngineApi {
        self.api
    }

    #[inline]
    pub fn model_api(&self) -> &'static ModelApi {
        &self.api.model
    }

    #[inline]
    pub fn type_info_api(&self) -> &'static TypeInfoApi {
        &self.api.type_info
    }

    pub fn abi_version(&self) -> u32 {
        self.api.info.abi_version
    }

    /// Engine id as published in its info block ("" if absent).
    pub fn id(&self) -> String {
        unsafe { c_str_lossy(self.api.info.id) }
    }

    pub fn semver(&self) -> String {
        unsafe { c_str_lossy(self.api.info.semver) }
    }
}

impl fmt::Debug for Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Engine")
            .field("id", &self.id())
            .field("semver", &self.semver())
            .field("abi_version", &self.abi_version())
            .finish()
    }
}

/// Map an engine status code to `EngineFailure { call }`.
#[inline]
pub(crate) fn check(call: &'static str, rc: i32) -> Result<()> {
    if rc == ERR_OK {
        Ok(())
    } else {
        Err(ModelError::engine(call))
    }
}

/// Copy an engine-owned `(ptr, len)` buffer before the next engine call invalidates it.
///
/// Invalid UTF-8 is an error; callers map it to the failing call.
///
/// # Safety
/// `ptr` must be null or valid for `len` bytes.
pub(crate) unsafe fn copy_string(
    ptr: *const c_char,
    len: usize,
) -> std::result::Result<String, Utf8Error> {
    if ptr.is_null() || len == 0 {
        return Ok(String::new());
    }
    let bytes = unsafe { slice::from_raw_parts(ptr as *const u8, len) };
    str::from_utf8(bytes).map(ToOwned::to_owned)
}

/// NUL-terminated counterpart of [`copy_string`].
///
/// # Safety
/// `ptr` must be null or point at a NUL-terminated string.
pub(crate) unsafe fn copy_c_str(ptr: *const c_char) -> std::result::Result<String, Utf8Error> {
    if ptr.is_null() {
        return Ok(String::new());
    }
    unsafe { CStr::from_ptr(ptr) }.to_str().map(ToOwned::to_owned)
}

/// For display-only engine info.
///
/// # Safety
/// `ptr` must be null or point at a NUL-terminated string.
pub(crate) unsafe fn c_str_lossy(ptr: *const c_char) -> String {
    if ptr.is_null() {
        return String::new();
    }
    unsafe { CStr::from_ptr(ptr) }
        .to_string_lossy()
        .into_owned()
}
