//! Config path resolution helpers.

use std::path::{Path, PathBuf};

use super::CONFIG_FILE_NAME;

/// Global config file, `None` when the platform has no config directory.
pub fn global_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| global_config_path_in(&dir))
}

pub fn global_config_path_in(config_dir: &Path) -> PathBuf {
    config_dir.join("dwgen").join(CONFIG_FILE_NAME)
}

pub fn project_config_path(project_root: &Path) -> PathBuf {
    project_root.join(CONFIG_FILE_NAME)
}
