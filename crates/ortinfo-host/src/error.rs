use std::path::PathBuf;

use thiserror::Error;

/// Why an engine adapter could not be loaded.
///
/// `Clone` so the process-wide cache can hand the same failure to every caller;
/// underlying `libloading` errors are kept as text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoadError {
    #[error("engine library not found; set ORTINFO_ENGINE_PATH or ORTINFO_ENGINE_DIR")]
    NotFound,

    #[error("failed to open {}: {reason}", .path.display())]
    Open { path: PathBuf, reason: String },

    #[error("missing symbol {symbol}: {reason}")]
    MissingSymbol {
        symbol: &'static str,
        reason: String,
    },

    #[error("engine entry returned null")]
    NullEntry,

    #[error("ABI mismatch: host={host} engine={engine}")]
    AbiMismatch { host: u32, engine: u32 },
}
