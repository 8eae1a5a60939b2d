//! dwgen - DevWorkspace generator
//!
//! Usage:
//!   dwgen --devfile-url https://github.com/o/r --editor-url https://…/che-code.yaml
//!   dwgen --devfile-path devfile.yaml --editor-path editor.yaml --output-file out.yaml
//!   dwgen --devcontainer-path .devcontainer/devcontainer.json --editor-path editor.yaml

mod legacy;

use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use dwgen_core::commands::{GenerateOptions, ProjectOverride};
use dwgen_core::context::AppContext;

#[derive(Parser, Debug)]
#[command(name = "dwgen")]
#[command(version)]
#[command(about = "Generate DevWorkspace resources from devfiles and editors", long_about = None)]
struct Cli {
    /// Local devfile
    #[arg(long, value_name = "PATH")]
    devfile_path: Option<PathBuf>,

    /// Repository or devfile URL (GitHub, Bitbucket, Bitbucket Server or plain HTTP)
    #[arg(long, value_name = "URL")]
    devfile_url: Option<String>,

    /// Devfile content
    #[arg(long, value_name = "YAML")]
    devfile_content: Option<String>,

    /// devcontainer.json content, used when no devfile is given
    #[arg(long = "devcontainer-json", value_name = "JSON")]
    dev_container_json: Option<String>,

    /// Local devcontainer.json, used when no devfile is given
    #[arg(long = "devcontainer-path", value_name = "PATH")]
    dev_container_path: Option<PathBuf>,

    /// Local editor devfile
    #[arg(long, value_name = "PATH")]
    editor_path: Option<PathBuf>,

    /// Editor devfile URL
    #[arg(long, value_name = "URL")]
    editor_url: Option<String>,

    /// Editor devfile content
    #[arg(long, value_name = "YAML")]
    editor_content: Option<String>,

    /// Write the resources to this file instead of stdout
    #[arg(long, value_name = "PATH")]
    output_file: Option<PathBuf>,

    /// Override a project location (NAME=LOCATION, repeatable)
    #[arg(long = "project", value_name = "NAME=LOCATION")]
    projects: Vec<ProjectOverride>,

    /// Inject a runtime container when the devfile has none
    #[arg(long, num_args = 0..=1, default_missing_value = "true", value_name = "BOOL")]
    inject_default_component: Option<bool>,

    /// Image of the injected runtime container
    #[arg(long, value_name = "IMAGE")]
    default_component_image: Option<String>,

    /// Configuration file to use instead of the global and project dwgen.toml
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn generate_options(&self) -> GenerateOptions {
        GenerateOptions {
            devfile_path: self.devfile_path.clone(),
            devfile_url: self.devfile_url.clone(),
            devfile_content: self.devfile_content.clone(),
            dev_container_json: self.dev_container_json.clone(),
            dev_container_path: self.dev_container_path.clone(),
            editor_path: self.editor_path.clone(),
            editor_url: self.editor_url.clone(),
            editor_content: self.editor_content.clone(),
            output_file: self.output_file.clone(),
            projects: self.projects.clone(),
            inject_default_component: self.inject_default_component,
            default_component_image: self.default_component_image.clone(),
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse_from(legacy::normalize_args(
        std::env::args_os().map(|arg| arg.to_string_lossy().into_owned()),
    ));

    init_tracing(cli.verbose);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{}", failure_message(&err));
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose { "dwgen=debug" } else { "dwgen=info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn run(cli: &Cli) -> Result<()> {
    let project_root = std::env::current_dir().context("Failed to determine working directory")?;
    let context = match &cli.config {
        Some(path) => AppContext::load_from(project_root, path)?,
        None => AppContext::load(project_root)?,
    };
    let command = context.generate_command()?;
    let options = cli.generate_options();

    let runtime = tokio::runtime::Runtime::new().context("Failed to start async runtime")?;
    let report = runtime.block_on(command.execute(&options))?;

    match &report.output_file {
        Some(path) => tracing::debug!("Resources written to {}", path.display()),
        None => {
            let yaml = report.to_yaml()?;
            std::io::stdout()
                .lock()
                .write_all(yaml.as_bytes())
                .context("Failed to write to stdout")?;
        }
    }
    Ok(())
}

/// `<phase> failed: <error>` for library errors, the plain chain otherwise.
fn failure_message(err: &anyhow::Error) -> String {
    match err.downcast_ref::<dwgen_core::Error>() {
        Some(core) => format!("{} failed: {}", core.phase(), core),
        None => format!("dwgen failed: {:#}", err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(legacy::normalize_args(args.iter().map(|s| s.to_string()))).unwrap()
    }

    #[test]
    fn parses_modern_flags() {
        let cli = parse(&[
            "dwgen",
            "--devfile-url",
            "https://github.com/o/r",
            "--editor-path",
            "editor.yaml",
            "--project",
            "r=https://example.com/r.zip",
            "--inject-default-component",
        ]);
        let options = cli.generate_options();
        assert_eq!(options.devfile_url.as_deref(), Some("https://github.com/o/r"));
        assert_eq!(options.editor_path, Some(PathBuf::from("editor.yaml")));
        assert_eq!(
            options.projects,
            vec![ProjectOverride::new("r", "https://example.com/r.zip")]
        );
        assert_eq!(options.inject_default_component, Some(true));
    }

    #[test]
    fn parses_legacy_flags() {
        let cli = parse(&[
            "dwgen",
            "--devfile-path:devfile.yaml",
            "--editor-url:https://example.com/editor.yaml",
            "--output-file:/tmp/out.yaml",
            "--project.web={{_INTERNAL_URL_}}/web.zip",
            "--injectDefaultComponent:false",
            "--defaultComponentImage:quay.io/x:1",
        ]);
        assert_eq!(cli.devfile_path, Some(PathBuf::from("devfile.yaml")));
        assert_eq!(cli.editor_url.as_deref(), Some("https://example.com/editor.yaml"));
        assert_eq!(cli.output_file, Some(PathBuf::from("/tmp/out.yaml")));
        assert_eq!(
            cli.projects,
            vec![ProjectOverride::new("web", "{{ INTERNAL_URL }}/web.zip")]
        );
        assert_eq!(cli.inject_default_component, Some(false));
        assert_eq!(cli.default_component_image.as_deref(), Some("quay.io/x:1"));
    }

    #[test]
    fn rejects_malformed_project() {
        let result = Cli::try_parse_from(["dwgen", "--project", "no-location"]);
        assert!(result.is_err());
    }

    #[test]
    fn failure_message_names_the_phase() {
        let err = anyhow::Error::new(dwgen_core::Error::MissingSchemaVersion);
        assert_eq!(
            failure_message(&err),
            "validation failed: Devfile is not valid, schemaVersion is required"
        );
    }
}
