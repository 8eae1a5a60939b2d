//! Devcontainer descriptors
//!
//! Projects that only ship a `devcontainer.json` are converted to an
//! equivalent devfile so the rest of the pipeline sees a single format.

mod convert;
mod model;

pub use convert::{
    DEFAULT_DEVFILE_CONTAINER_IMAGE, DEFAULT_DEVFILE_NAME, DEFAULT_WORKSPACE_DIR,
    DEV_CONTAINER_COMPONENT, convert_dev_container_to_devfile, convert_memory, normalize_name,
    parse_dev_container,
};
pub use model::{BuildSection, DevContainer, POST_START_HOOKS, PRE_START_HOOK};
