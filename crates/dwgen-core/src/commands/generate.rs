//! Generate command implementation.
//!
//! Acquires the devfile and the editor from whichever source was given,
//! validates the devfile, applies project overrides and hands everything to
//! the generation engine.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde_yaml::Mapping;
use tracing::{debug, info};

use crate::config::GeneratorConfig;
use crate::devcontainer::{convert_dev_container_to_devfile, parse_dev_container};
use crate::devfile::{
    DevfileSchemaValidator, ProjectOverride, add_provenance_attributes, parse_document,
    replace_if_existing_projects, schema_version, synthesize_project_if_missing, to_yaml,
};
use crate::editor::EditorResolver;
use crate::error::{Error, Result};
use crate::fetch::UrlFetcher;
use crate::generate::{DevfileContext, Generate};
use crate::git::{GitUrlResolver, ResolvedGitUrl};

/// Devfile names looked up in a repository, in order
pub const DEVFILE_NAMES: [&str; 2] = ["devfile.yaml", ".devfile.yaml"];

const MISSING_EDITOR: &str = "missing editorPath or editorUrl or editorContent";
const MISSING_DEVFILE: &str =
    "missing devfilePath or devfileUrl or devfileContent or devContainerJsonContent";

/// Options for the generate command
#[derive(Debug, Clone, Default)]
pub struct GenerateOptions {
    /// Local devfile
    pub devfile_path: Option<PathBuf>,
    /// Repository URL to fetch the devfile from
    pub devfile_url: Option<String>,
    /// Devfile text
    pub devfile_content: Option<String>,
    /// devcontainer.json text
    pub dev_container_json: Option<String>,
    /// Local devcontainer.json
    pub dev_container_path: Option<PathBuf>,
    /// Local editor devfile
    pub editor_path: Option<PathBuf>,
    /// Editor devfile URL
    pub editor_url: Option<String>,
    /// Editor devfile text
    pub editor_content: Option<String>,
    /// Where to write the generated resources
    pub output_file: Option<PathBuf>,
    /// Project location overrides
    pub projects: Vec<ProjectOverride>,
    /// Inject a runtime component when missing; falls back to configuration
    pub inject_default_component: Option<bool>,
    /// Image of the injected component; falls back to configuration
    pub default_component_image: Option<String>,
}

impl GenerateOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_devfile_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.devfile_path = Some(path.into());
        self
    }

    pub fn with_devfile_url(mut self, url: impl Into<String>) -> Self {
        self.devfile_url = Some(url.into());
        self
    }

    pub fn with_devfile_content(mut self, content: impl Into<String>) -> Self {
        self.devfile_content = Some(content.into());
        self
    }

    pub fn with_dev_container_json(mut self, content: impl Into<String>) -> Self {
        self.dev_container_json = Some(content.into());
        self
    }

    pub fn with_dev_container_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.dev_container_path = Some(path.into());
        self
    }

    pub fn with_editor_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.editor_path = Some(path.into());
        self
    }

    pub fn with_editor_url(mut self, url: impl Into<String>) -> Self {
        self.editor_url = Some(url.into());
        self
    }

    pub fn with_editor_content(mut self, content: impl Into<String>) -> Self {
        self.editor_content = Some(content.into());
        self
    }

    pub fn with_output_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_file = Some(path.into());
        self
    }

    /// Add a project override
    pub fn with_project(mut self, project: ProjectOverride) -> Self {
        self.projects.push(project);
        self
    }

    pub fn with_inject_default_component(mut self, inject: bool) -> Self {
        self.inject_default_component = Some(inject);
        self
    }

    pub fn with_default_component_image(mut self, image: impl Into<String>) -> Self {
        self.default_component_image = Some(image.into());
        self
    }
}

/// Where the devfile of a run came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DevfileSource {
    Repository(ResolvedGitUrl),
    Path(PathBuf),
    Content,
    DevContainer,
}

/// Result of a generate run
#[derive(Debug, Clone)]
pub struct GenerateReport {
    pub context: DevfileContext,
    pub devfile_source: DevfileSource,
    /// File the resources were written to, if any
    pub output_file: Option<PathBuf>,
}

impl GenerateReport {
    /// Generated resources as multi-document YAML.
    pub fn to_yaml(&self) -> Result<String> {
        self.context.to_yaml()
    }
}

/// Generate command orchestrator
pub struct GenerateCommand {
    config: GeneratorConfig,
    resolver: GitUrlResolver,
    fetcher: Arc<dyn UrlFetcher>,
    editors: EditorResolver,
    validator: DevfileSchemaValidator,
    generate: Generate,
}

impl GenerateCommand {
    pub fn new(
        config: GeneratorConfig,
        resolver: GitUrlResolver,
        fetcher: Arc<dyn UrlFetcher>,
        validator: DevfileSchemaValidator,
        generate: Generate,
    ) -> Self {
        let editors = EditorResolver::new(Arc::clone(&fetcher));
        Self {
            config,
            resolver,
            fetcher,
            editors,
            validator,
            generate,
        }
    }

    /// Execute the generate command
    pub async fn execute(&self, options: &GenerateOptions) -> Result<GenerateReport> {
        self.check_inputs(options)?;

        let (devfile_content, devfile_source) = self.acquire_devfile(options).await?;
        let mut devfile = parse_document(&devfile_content, "devfile")?;

        let version = schema_version(&devfile).ok_or(Error::MissingSchemaVersion)?;
        info!("Validating devfile");
        self.validator.validate_devfile(&devfile, &version)?;
        info!("Devfile is valid with schema version {}", version);

        let devfile_content = if apply_overrides(&mut devfile, &options.projects) {
            to_yaml(&devfile)?
        } else {
            devfile_content
        };

        let editor_content = self.acquire_editor(options).await?;

        let inject = options
            .inject_default_component
            .unwrap_or_else(|| self.config.inject_default_component());
        let image = present(&options.default_component_image)
            .or(self.config.generator.default_component_image.as_deref());

        let context = self.generate.generate(
            &devfile_content,
            &editor_content,
            options.output_file.as_deref(),
            inject,
            image,
        )?;

        Ok(GenerateReport {
            context,
            devfile_source,
            output_file: options.output_file.clone(),
        })
    }

    fn check_inputs(&self, options: &GenerateOptions) -> Result<()> {
        let has_editor = present(&options.editor_content).is_some()
            || present(&options.editor_url).is_some()
            || options.editor_path.is_some()
            || self.config.editor_url().is_some();
        if !has_editor {
            return Err(Error::MissingInput(MISSING_EDITOR.to_string()));
        }

        let has_devfile = present(&options.devfile_url).is_some()
            || options.devfile_path.is_some()
            || present(&options.devfile_content).is_some()
            || present(&options.dev_container_json).is_some()
            || options.dev_container_path.is_some();
        if !has_devfile {
            return Err(Error::MissingInput(MISSING_DEVFILE.to_string()));
        }
        Ok(())
    }

    async fn acquire_devfile(&self, options: &GenerateOptions) -> Result<(String, DevfileSource)> {
        if let Some(url) = present(&options.devfile_url) {
            let resolved = self.resolver.resolve(url)?;
            let content = self.devfile_from_repository(url, &resolved).await?;
            return Ok((content, DevfileSource::Repository(resolved)));
        }
        if let Some(path) = &options.devfile_path {
            return Ok((read_file(path)?, DevfileSource::Path(path.clone())));
        }
        if let Some(content) = present(&options.devfile_content) {
            return Ok((content.to_string(), DevfileSource::Content));
        }

        let json = match (present(&options.dev_container_json), &options.dev_container_path) {
            (Some(json), _) => json.to_string(),
            (None, Some(path)) => read_file(path)?,
            (None, None) => return Err(Error::MissingInput(MISSING_DEVFILE.to_string())),
        };
        let dev_container = parse_dev_container(&json)?;
        debug!("Converting devcontainer descriptor to a devfile");
        Ok((
            convert_dev_container_to_devfile(&dev_container)?,
            DevfileSource::DevContainer,
        ))
    }

    /// Fetch the repository devfile and record where it came from.
    async fn devfile_from_repository(&self, raw_url: &str, url: &ResolvedGitUrl) -> Result<String> {
        let mut fetched = None;
        for name in DEVFILE_NAMES {
            let content_url = url.content_url(name);
            if let Some(content) = self.fetcher.fetch_text_optional(&content_url).await? {
                debug!("Found devfile at {}", content_url);
                fetched = Some(content);
                break;
            }
        }
        let raw_devfile =
            fetched.ok_or_else(|| Error::DevfileNotFound(url.clone_url().to_string()))?;

        let mut devfile = parse_document(&raw_devfile, "devfile")?;
        add_provenance_attributes(&mut devfile, &raw_devfile, raw_url)?;
        if synthesize_project_if_missing(&mut devfile, url) {
            debug!("Added project {} from {}", url.repo_name(), url.clone_url());
        }
        to_yaml(&devfile)
    }

    async fn acquire_editor(&self, options: &GenerateOptions) -> Result<String> {
        if let Some(content) = present(&options.editor_content) {
            return Ok(content.to_string());
        }
        if let Some(url) = present(&options.editor_url) {
            return to_yaml(&self.editors.load_editor(url).await?);
        }
        if let Some(path) = &options.editor_path {
            return read_file(path);
        }
        match self.config.editor_url() {
            Some(url) => {
                debug!("Using editor {} from configuration", url);
                to_yaml(&self.editors.load_editor(url).await?)
            }
            None => Err(Error::MissingInput(MISSING_EDITOR.to_string())),
        }
    }
}

impl std::fmt::Debug for GenerateCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GenerateCommand")
            .field("config", &self.config)
            .field("resolver", &self.resolver)
            .finish_non_exhaustive()
    }
}

/// Apply overrides; `true` when the devfile had projects to override.
fn apply_overrides(devfile: &mut Mapping, projects: &[ProjectOverride]) -> bool {
    if projects.is_empty() || !devfile.contains_key("projects") {
        return false;
    }
    replace_if_existing_projects(devfile, projects);
    true
}

/// Empty strings count as not given.
fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|value| !value.is_empty())
}

fn read_file(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|e| Error::io(path, e))
}
