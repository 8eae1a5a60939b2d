//! High-level commands for dwgen operations.
//!
//! These are the entry points frontends call; each takes an options value
//! and returns a report.

pub mod generate;

pub use generate::{
    DEVFILE_NAMES, DevfileSource, GenerateCommand, GenerateOptions, GenerateReport,
};
pub use crate::devfile::ProjectOverride;
