use std::{
    env,
    path::{Path, PathBuf},
};

use tracing::{info, warn};

pub const ENV_ENGINE_PATH: &str = "ORTINFO_ENGINE_PATH";
pub const ENV_ENGINE_DIR: &str = "ORTINFO_ENGINE_DIR";

const LIB_STEM: &str = "ortinfo_engine";

/// Platform file name of the adapter library.
pub fn library_file_name() -> String {
    format!(
        "{}{LIB_STEM}{}",
        env::consts::DLL_PREFIX,
        env::consts::DLL_SUFFIX
    )
}

/// ~/.local/share/ortinfo/engine   (or platform-equivalent)
pub fn default_engine_dir() -> Option<PathBuf> {
    dirs::data_local_dir().map(|d| d.join("ortinfo").join("engine"))
}

/// Resolve the adapter library from the environment, falling back to the default directory.
pub fn locate_engine_library() -> Option<PathBuf> {
    resolve(
        env::var_os(ENV_ENGINE_PATH).map(PathBuf::from),
        env::var_os(ENV_ENGINE_DIR).map(PathBuf::from),
    )
}

pub(crate) fn resolve(engine_path: Option<PathBuf>, engine_dir: Option<PathBuf>) -> Option<PathBuf> {
    if let Some(p) = engine_path {
        if p.is_file() {
            info!(path = %p.display(), "{ENV_ENGINE_PATH} set");
            return Some(p);
        }
        warn!(path = %p.display(), "{ENV_ENGINE_PATH} points to missing file");
    }

    let dir = engine_dir.or_else(default_engine_dir)?;
    in_dir(&dir)
}

fn in_dir(dir: &Path) -> Option<PathBuf> {
    let p = dir.join(library_file_name());
    if p.is_file() {
        info!(path = %p.display(), "engine library from directory");
        Some(p)
    } else {
        None
    }
}
