use std::path::Path;
use std::sync::OnceLock;

use libloading::Library;
use ortinfo_abi::{ENGINE_ENTRY_SYMBOL, EngineApi, EngineEntryFn, ORTINFO_ABI_VERSION};
use ortinfo_core::Engine;
use tracing::{info, warn};

use crate::error::LoadError;
use crate::locate::locate_engine_library;

/// An opened adapter library and the table it exported.
pub struct LoadedEngine {
    _lib: Library,
    api: &'static EngineApi,
}

impl LoadedEngine {
    /// Handle for building `ModelHandle`s.
    pub fn engine(&self) -> Engine {
        Engine::new(self.api)
    }

    pub fn api(&self) -> &'static EngineApi {
        self.api
    }
}

impl std::fmt::Debug for LoadedEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoadedEngine")
            .field("abi_version", &self.api.info.abi_version)
            .finish_non_exhaustive()
    }
}

static ENGINE: OnceLock<Result<LoadedEngine, LoadError>> = OnceLock::new();

/// Locate and load the adapter once per process; later calls return the cached outcome.
pub fn load_engine_once() -> Result<&'static LoadedEngine, LoadError> {
    ENGINE
        .get_or_init(|| {
            let path = locate_engine_library().ok_or(LoadError::NotFound)?;
            let loaded = open(&path);
            if let Err(e) = &loaded {
                warn!(path = %path.display(), error = %e, "failed to load engine");
            }
            loaded
        })
        .as_ref()
        .map_err(|e| e.clone())
}

/// Load the adapter at `path` without touching the process-wide cache.
///
/// The library is never unloaded: the returned reference lives for the rest of the process.
pub fn load_engine_from(path: &Path) -> Result<&'static LoadedEngine, LoadError> {
    open(path).map(|loaded| &*Box::leak(Box::new(loaded)))
}

fn open(path: &Path) -> Result<LoadedEngine, LoadError> {
    // SAFETY: loading runs the library's initializers; the adapter is trusted code.
    let lib = unsafe { Library::new(path) }.map_err(|e| LoadError::Open {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    init_loaded(lib)
}

fn init_loaded(lib: Library) -> Result<LoadedEngine, LoadError> {
    let api_ptr = {
        let entry: libloading::Symbol<EngineEntryFn> =
            unsafe { lib.get(ENGINE_ENTRY_SYMBOL.as_bytes()) }.map_err(|e| {
                LoadError::MissingSymbol {
                    symbol: ENGINE_ENTRY_SYMBOL,
                    reason: e.to_string(),
                }
            })?;
        unsafe { entry() }
    };
    if api_ptr.is_null() {
        return Err(LoadError::NullEntry);
    }

    // SAFETY: the table is static data inside `lib`, which `LoadedEngine` keeps open.
    let api: &'static EngineApi = unsafe { &*api_ptr };
    if api.info.abi_version != ORTINFO_ABI_VERSION {
        return Err(LoadError::AbiMismatch {
            host: ORTINFO_ABI_VERSION,
            engine: api.info.abi_version,
        });
    }

    let engine = Engine::new(api);
    info!(id = %engine.id(), semver = %engine.semver(), "engine loaded");
    Ok(LoadedEngine { _lib: lib, api })
}
