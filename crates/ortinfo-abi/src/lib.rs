//! ortinfo ABI crate: the C-style contract an engine adapter exports and the core consumes.

pub mod codes;
pub mod ffi;

pub use codes::*;
pub use ffi::*;
