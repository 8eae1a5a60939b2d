//! Application context for unified dependency injection.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::commands::GenerateCommand;
use crate::config::{self, GeneratorConfig};
use crate::devfile::{ComponentResolver, DevfileSchemaValidator};
use crate::editor::EditorResolver;
use crate::error::Result;
use crate::fetch::{HttpUrlFetcher, UrlFetcher};
use crate::generate::Generate;
use crate::git::GitUrlResolver;

/// Composition root.
///
/// Frontends create this once per process, after configuration is loaded,
/// and ask it for commands.
#[derive(Clone)]
pub struct AppContext {
    project_root: PathBuf,
    config: GeneratorConfig,
    fetcher: Arc<dyn UrlFetcher>,
}

impl AppContext {
    /// Create a context with an HTTP fetcher configured from `config`.
    pub fn new(project_root: PathBuf, config: GeneratorConfig) -> Result<Self> {
        let fetcher = Arc::new(HttpUrlFetcher::from_config(&config.http)?);
        Ok(Self::with_fetcher(project_root, config, fetcher))
    }

    /// Create a context around an existing fetcher (for testing).
    pub fn with_fetcher(
        project_root: PathBuf,
        config: GeneratorConfig,
        fetcher: Arc<dyn UrlFetcher>,
    ) -> Self {
        Self {
            project_root,
            config,
            fetcher,
        }
    }

    /// Load layered configuration for `project_root` and build the context.
    pub fn load(project_root: PathBuf) -> Result<Self> {
        let config = config::load_layered(&project_root)?;
        Self::new(project_root, config)
    }

    /// Build the context from a single explicit configuration file.
    pub fn load_from(project_root: PathBuf, config_path: &Path) -> Result<Self> {
        let config = config::load_explicit(config_path)?;
        Self::new(project_root, config)
    }

    pub fn project_root(&self) -> &Path {
        &self.project_root
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    pub fn fetcher(&self) -> Arc<dyn UrlFetcher> {
        Arc::clone(&self.fetcher)
    }

    pub fn git_url_resolver(&self) -> GitUrlResolver {
        GitUrlResolver::default()
    }

    pub fn editor_resolver(&self) -> EditorResolver {
        EditorResolver::new(self.fetcher())
    }

    pub fn generator(&self) -> Generate {
        Generate::new(ComponentResolver::new())
    }

    /// Get a GenerateCommand wired to this context.
    pub fn generate_command(&self) -> Result<GenerateCommand> {
        Ok(GenerateCommand::new(
            self.config.clone(),
            self.git_url_resolver(),
            self.fetcher(),
            DevfileSchemaValidator::new()?,
            self.generator(),
        ))
    }
}

impl std::fmt::Debug for AppContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppContext")
            .field("project_root", &self.project_root)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
