//! Generator configuration
//!
//! Settings are read from two optional layers:
//! - Global: `<config dir>/dwgen/dwgen.toml`
//! - Project: `./dwgen.toml`
//!
//! An explicit file given on the command line replaces both layers.

pub mod merge;
pub mod parser;
pub mod paths;
pub mod schema;

use std::path::Path;

use tracing::debug;

use crate::error::Result;

pub use merge::merge_configs;
pub use parser::{parse_config, parse_config_str, to_toml};
pub use paths::{global_config_path, global_config_path_in, project_config_path};
pub use schema::{
    DEFAULT_COMPONENT_IMAGE, DEFAULT_HTTP_TIMEOUT_SECS, EditorSection, GeneratorConfig,
    GeneratorSection, HttpSection,
};

/// File name of every configuration layer
pub const CONFIG_FILE_NAME: &str = "dwgen.toml";

/// Load the global and project layers and merge them.
///
/// Missing files are skipped; malformed files are errors.
pub fn load_layered(project_root: &Path) -> Result<GeneratorConfig> {
    let global = match global_config_path() {
        Some(path) => load_optional(&path)?,
        None => None,
    };
    let project = load_optional(&project_config_path(project_root))?;

    Ok(merge_configs(global, project))
}

/// Load the global layer from `config_dir` instead of the platform default.
pub fn load_layered_in(config_dir: &Path, project_root: &Path) -> Result<GeneratorConfig> {
    let global = load_optional(&global_config_path_in(config_dir))?;
    let project = load_optional(&project_config_path(project_root))?;

    Ok(merge_configs(global, project))
}

/// Load a single file given explicitly; it must exist.
pub fn load_explicit(path: &Path) -> Result<GeneratorConfig> {
    debug!("Loading configuration from {}", path.display());
    parse_config(path)
}

fn load_optional(path: &Path) -> Result<Option<GeneratorConfig>> {
    if !path.is_file() {
        debug!("No configuration at {}", path.display());
        return Ok(None);
    }
    debug!("Loading configuration from {}", path.display());
    parse_config(path).map(Some)
}
