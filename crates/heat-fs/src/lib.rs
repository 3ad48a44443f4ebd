//! Filesystem layer for heat-config
//!
//! Provides atomic locked writes, line-preserving INI editing for service
//! configuration files, and format-agnostic parameter file loading.

pub mod error;
pub mod ini;
pub mod io;
pub mod store;

pub use error::{Error, Result};
pub use ini::{IniDocument, SetOutcome};
pub use store::FileFormat;
