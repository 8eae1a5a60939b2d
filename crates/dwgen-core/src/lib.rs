//! dwgen Core Library
//!
//! Turns devfiles, devcontainer descriptors and editor definitions into
//! `DevWorkspaceTemplate` and `DevWorkspace` resources, fetching devfiles
//! from GitHub, Bitbucket Cloud, Bitbucket Server or plain HTTP hosts.

pub mod commands;
pub mod config;
pub mod context;
pub mod devcontainer;
pub mod devfile;
pub mod editor;
pub mod error;
pub mod fetch;
pub mod generate;
pub mod git;

pub use error::{Error, Phase, Result};

/// Re-exports of commonly used types
pub mod prelude {
    // Commands
    pub use crate::commands::{
        DevfileSource, GenerateCommand, GenerateOptions, GenerateReport, ProjectOverride,
    };
    pub use crate::context::AppContext;

    // Configuration
    pub use crate::config::GeneratorConfig;

    // Generation
    pub use crate::devfile::{ComponentResolver, DevfileSchemaValidator};
    pub use crate::generate::{DevfileContext, Generate};

    // Git
    pub use crate::git::{GitProvider, GitUrlResolver, ResolvedGitUrl};

    // Fetching
    pub use crate::editor::EditorResolver;
    pub use crate::fetch::{HttpUrlFetcher, UrlFetcher};

    pub use crate::error::{Error, Phase, Result};
}
