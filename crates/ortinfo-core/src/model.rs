//! Owned engine model: clone, detach, and the lazily built `ModelInfo`.

use std::sync::Arc;

use once_cell::sync::OnceCell;
use ortinfo_abi::OrtModel;
use tracing::debug;

use crate::config::ConverterConfig;
use crate::engine::{Engine, check};
use crate::error::{ModelError, Result};
use crate::handle::NativeHandle;
use crate::info::ModelInfo;

/// Safe wrapper around an engine `OrtModel*`.
///
/// After `detach` the handle is inert and every operation returns `UseAfterDetach`.
pub struct ModelHandle {
    engine: Engine,
    native: Option<NativeHandle<OrtModel>>,
    config: ConverterConfig,
    info: OnceCell<Arc<ModelInfo>>,
}

impl ModelHandle {
    /// Take ownership of `raw`. Null fails with `InvalidArgument` and nothing is released.
    ///
    /// # Safety
    /// `raw` must be an engine model owned by the caller and created by `engine`.
    pub unsafe fn from_raw(engine: Engine, raw: *mut OrtModel) -> Result<Self> {
        let release = engine.model_api().release_model;
        let native = unsafe { NativeHandle::from_raw(raw, release) }?;
        Ok(Self {
            engine,
            native: Some(native),
            config: ConverterConfig::default(),
            info: OnceCell::new(),
        })
    }

    /// Replace the conversion settings. Drops any snapshot built with the old ones.
    pub fn with_config(mut self, config: ConverterConfig) -> Self {
        self.config = config;
        self.info = OnceCell::new();
        self
    }

    #[inline]
    pub fn engine(&self) -> Engine {
        self.engine
    }

    #[inline]
    pub fn config(&self) -> &ConverterConfig {
        &self.config
    }

    #[inline]
    pub fn is_detached(&self) -> bool {
        self.native.is_none()
    }

    /// Opaque pointer for passing back into the engine. Ownership stays here.
    pub fn as_raw(&self) -> Result<*mut OrtModel> {
        Ok(self.native()?.as_ptr())
    }

    /// The model's snapshot, built on first call and shared afterwards.
    ///
    /// Concurrent first calls build once; the others wait and get the same `Arc`.
    pub fn model_info(&self) -> Result<Arc<ModelInfo>> {
        let native = self.native()?;
        self.info
            .get_or_try_init(|| {
                // SAFETY: the model is live while `native` is borrowed, and the
                // cell serializes builders.
                unsafe { ModelInfo::build(self.engine, native.as_ptr(), &self.config) }.map(Arc::new)
            })
            .cloned()
    }

    /// Deep copy at the engine level. The copy owns its own resource and
    /// builds its own snapshot; `self` is untouched on failure.
    ///
    /// Takes `&mut self` so no snapshot build can be running on the same model.
    ///
    /// ```compile_fail
    /// fn clone_shared(h: std::sync::Arc<ortinfo_core::ModelHandle>) {
    ///     let _copy = h.try_clone();
    /// }
    /// ```
    pub fn try_clone(&mut self) -> Result<ModelHandle> {
        let native = self.native()?;
        let api = self.engine.model_api();

        let mut copy: *mut OrtModel = std::ptr::null_mut();
        check("clone_model", unsafe { (api.clone_model)(native.as_ptr(), &mut copy) })?;
        let copy = unsafe { NativeHandle::from_raw(copy, api.release_model) }
            .map_err(|_| ModelError::EngineFailure { call: "clone_model" })?;
        debug!(from = ?native, to = ?copy, "cloned model");

        Ok(Self {
            engine: self.engine,
            native: Some(copy),
            config: self.config.clone(),
            info: OnceCell::new(),
        })
    }

    /// Hand the raw model back to the caller; the caller now owns its release.
    pub fn detach(&mut self) -> Result<*mut OrtModel> {
        let native = self.native.take().ok_or(ModelError::UseAfterDetach)?;
        let raw = native.into_raw();
        debug!(model = ?raw, "detached model");
        Ok(raw)
    }

    /// Ask the engine to convert any float16 tensors in place.
    ///
    /// A snapshot already built is kept as is.
    pub fn ensure_no_float16(&mut self) -> Result<()> {
        let native = self.native()?;
        let api = self.engine.model_api();
        check("ensure_no_float16", unsafe {
            (api.ensure_no_float16)(native.as_ptr())
        })
    }

    #[inline]
    fn native(&self) -> Result<&NativeHandle<OrtModel>> {
        self.native.as_ref().ok_or(ModelError::UseAfterDetach)
    }
}

impl Drop for ModelHandle {
    fn drop(&mut self) {
        if let Some(native) = self.native.take() {
            debug!(model = ?native, "releasing model");
        }
    }
}

// SAFETY: the only engine calls reachable through `&self` run inside the
// `OnceCell` initializer, which admits one builder at a time. Clone, detach,
// float16 conversion and release need `&mut self` or ownership, so they never
// interleave with a build.
unsafe impl Send for ModelHandle {}
unsafe impl Sync for ModelHandle {}
