//! Runtime discovery of an engine adapter library.
//!
//! The adapter exports `ortinfo_engine_entry_v1`, which hands back a static
//! `EngineApi` table. Hosts call [`load_engine_once`] and wrap any model the
//! adapter opened with `ortinfo_core::ModelHandle`.

mod error;
mod loader;
mod locate;

pub use error::LoadError;
pub use loader::{LoadedEngine, load_engine_from, load_engine_once};
pub use locate::{
    ENV_ENGINE_DIR, ENV_ENGINE_PATH, default_engine_dir, library_file_name, locate_engine_library,
};
