use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use dwgen_core::commands::{DevfileSource, GenerateCommand, GenerateOptions, ProjectOverride};
use dwgen_core::config::GeneratorConfig;
use dwgen_core::context::AppContext;
use dwgen_core::devfile::{DEVFILE_ATTRIBUTE, DEVFILE_SOURCE_ATTRIBUTE};
use dwgen_core::fetch::UrlFetcher;
use dwgen_core::{Error, Phase, Result};
use serde_yaml::{Mapping, Value};
use tempfile::TempDir;

/// Serves fixed documents keyed by URL; anything else is a 404.
#[derive(Default)]
struct StaticFetcher {
    documents: HashMap<String, String>,
}

impl StaticFetcher {
    fn with(mut self, url: &str, body: &str) -> Self {
        self.documents.insert(url.to_string(), body.to_string());
        self
    }
}

#[async_trait]
impl UrlFetcher for StaticFetcher {
    async fn fetch_text(&self, url: &str) -> Result<String> {
        self.documents.get(url).cloned().ok_or_else(|| Error::HttpStatus {
            url: url.to_string(),
            status: 404,
        })
    }

    async fn fetch_text_optional(&self, url: &str) -> Result<Option<String>> {
        Ok(self.documents.get(url).cloned())
    }
}

const EDITOR_URL: &str = "https://editors.example.com/che-code.yaml";

const EDITOR: &str = r#"schemaVersion: 2.2.0
metadata:
  name: che-code
components:
  - name: che-code-injector
    container:
      image: quay.io/che-incubator/che-code:latest
"#;

const DEVFILE: &str = r#"schemaVersion: 2.2.0
metadata:
  name: demo
components:
  - name: tools
    container:
      image: quay.io/devfile/universal-developer-image:ubi9-latest
"#;

fn command(config: GeneratorConfig, fetcher: StaticFetcher) -> GenerateCommand {
    let temp = TempDir::new().unwrap();
    AppContext::with_fetcher(temp.path().to_path_buf(), config, Arc::new(fetcher))
        .generate_command()
        .unwrap()
}

fn default_command(fetcher: StaticFetcher) -> GenerateCommand {
    command(GeneratorConfig::default(), fetcher)
}

fn template(workspace: &Mapping) -> &Mapping {
    workspace["spec"]["template"].as_mapping().unwrap()
}

#[tokio::test]
async fn content_inputs_generate_template_and_workspace() {
    let report = default_command(StaticFetcher::default())
        .execute(
            &GenerateOptions::new()
                .with_devfile_content(DEVFILE)
                .with_editor_content(EDITOR),
        )
        .await
        .unwrap();

    assert_eq!(report.devfile_source, DevfileSource::Content);
    assert!(report.output_file.is_none());

    let context = &report.context;
    assert_eq!(context.editor_template_name(), Some("che-code-demo"));
    assert_eq!(context.dev_workspace["kind"].as_str(), Some("DevWorkspace"));
    assert_eq!(context.dev_workspace["metadata"]["name"].as_str(), Some("demo"));
    assert_eq!(
        context.dev_workspace["spec"]["contributions"][0]["kubernetes"]["name"].as_str(),
        Some("che-code-demo")
    );

    let yaml = report.to_yaml().unwrap();
    let template_at = yaml.find("kind: DevWorkspaceTemplate").unwrap();
    let workspace_at = yaml.find("kind: DevWorkspace\n").unwrap();
    assert!(template_at < workspace_at);
}

#[tokio::test]
async fn output_file_receives_both_documents() {
    let temp = TempDir::new().unwrap();
    let devfile_path = temp.path().join("devfile.yaml");
    let editor_path = temp.path().join("editor.yaml");
    let output = temp.path().join("out.yaml");
    std::fs::write(&devfile_path, DEVFILE).unwrap();
    std::fs::write(&editor_path, EDITOR).unwrap();

    let report = default_command(StaticFetcher::default())
        .execute(
            &GenerateOptions::new()
                .with_devfile_path(&devfile_path)
                .with_editor_path(&editor_path)
                .with_output_file(&output),
        )
        .await
        .unwrap();

    assert_eq!(report.devfile_source, DevfileSource::Path(devfile_path));
    assert_eq!(report.output_file.as_deref(), Some(output.as_path()));

    let written = std::fs::read_to_string(&output).unwrap();
    assert_eq!(written, report.to_yaml().unwrap());
    assert_eq!(written.matches("apiVersion: workspace.devfile.io/v1alpha2").count(), 2);
}

#[tokio::test]
async fn github_url_synthesizes_project_and_annotations() {
    let fetcher = StaticFetcher::default()
        .with("https://raw.githubusercontent.com/o/r/main/devfile.yaml", DEVFILE)
        .with(EDITOR_URL, EDITOR);

    let report = default_command(fetcher)
        .execute(
            &GenerateOptions::new()
                .with_devfile_url("https://github.com/o/r/tree/main")
                .with_editor_url(EDITOR_URL),
        )
        .await
        .unwrap();

    match &report.devfile_source {
        DevfileSource::Repository(url) => assert_eq!(url.repo_name(), "r"),
        other => panic!("unexpected source {:?}", other),
    }

    let workspace = &report.context.dev_workspace;
    let project = &template(workspace)["projects"][0];
    assert_eq!(project["name"].as_str(), Some("r"));
    assert_eq!(
        project["git"]["remotes"]["origin"].as_str(),
        Some("https://github.com/o/r.git")
    );
    assert_eq!(project["git"]["checkoutFrom"]["revision"].as_str(), Some("main"));

    let annotations = workspace["metadata"]["annotations"].as_mapping().unwrap();
    assert_eq!(annotations[DEVFILE_ATTRIBUTE].as_str(), Some(DEVFILE));
    let source: Value =
        serde_yaml::from_str(annotations[DEVFILE_SOURCE_ATTRIBUTE].as_str().unwrap()).unwrap();
    assert_eq!(
        source["factory"]["params"].as_str(),
        Some("url=https://github.com/o/r/tree/main")
    );
    assert!(template(workspace).get("attributes").is_none());
}

#[tokio::test]
async fn hidden_devfile_is_used_as_fallback() {
    let fetcher = StaticFetcher::default()
        .with("https://raw.githubusercontent.com/o/r/HEAD/.devfile.yaml", DEVFILE);

    let report = default_command(fetcher)
        .execute(
            &GenerateOptions::new()
                .with_devfile_url("https://github.com/o/r")
                .with_editor_content(EDITOR),
        )
        .await
        .unwrap();

    let project = &template(&report.context.dev_workspace)["projects"][0];
    assert_eq!(project["git"]["checkoutFrom"]["revision"].as_str(), Some("HEAD"));
}

#[tokio::test]
async fn repository_without_devfile_fails() {
    let err = default_command(StaticFetcher::default())
        .execute(
            &GenerateOptions::new()
                .with_devfile_url("https://github.com/o/r")
                .with_editor_content(EDITOR),
        )
        .await
        .unwrap_err();

    assert!(matches!(&err, Error::DevfileNotFound(url) if url == "https://github.com/o/r.git"));
    assert_eq!(err.phase(), Phase::Fetch);
}

#[tokio::test]
async fn unsupported_url_fails_resolution() {
    let err = default_command(StaticFetcher::default())
        .execute(
            &GenerateOptions::new()
                .with_devfile_url("ftp://example.com/o/r")
                .with_editor_content(EDITOR),
        )
        .await
        .unwrap_err();

    assert_eq!(err.phase(), Phase::Resolution);
}

#[tokio::test]
async fn zip_override_replaces_git_source() {
    let devfile = r#"schemaVersion: 2.2.0
metadata:
  name: demo
projects:
  - name: r
    git:
      remotes:
        origin: https://github.com/o/r.git
"#;

    let report = default_command(StaticFetcher::default())
        .execute(
            &GenerateOptions::new()
                .with_devfile_content(devfile)
                .with_editor_content(EDITOR)
                .with_project(ProjectOverride::new("r", "https://example.com/r.zip"))
                .with_project(ProjectOverride::new("missing", "https://example.com/x.zip")),
        )
        .await
        .unwrap();

    let projects = template(&report.context.dev_workspace)["projects"]
        .as_sequence()
        .unwrap();
    assert_eq!(projects.len(), 1);
    assert!(projects[0].get("git").is_none());
    assert_eq!(
        projects[0]["zip"]["location"].as_str(),
        Some("https://example.com/r.zip")
    );
}

#[tokio::test]
async fn missing_editor_is_reported_first() {
    let err = default_command(StaticFetcher::default())
        .execute(&GenerateOptions::new())
        .await
        .unwrap_err();

    assert_eq!(
        err.to_string(),
        "missing editorPath or editorUrl or editorContent"
    );
    assert_eq!(err.phase(), Phase::Input);
}

#[tokio::test]
async fn missing_devfile_is_reported() {
    let err = default_command(StaticFetcher::default())
        .execute(
            &GenerateOptions::new()
                .with_editor_content(EDITOR)
                .with_devfile_content(""),
        )
        .await
        .unwrap_err();

    assert_eq!(
        err.to_string(),
        "missing devfilePath or devfileUrl or devfileContent or devContainerJsonContent"
    );
}

#[tokio::test]
async fn schema_version_is_required() {
    let err = default_command(StaticFetcher::default())
        .execute(
            &GenerateOptions::new()
                .with_devfile_content("metadata:\n  name: demo\n")
                .with_editor_content(EDITOR),
        )
        .await
        .unwrap_err();

    assert!(matches!(err, Error::MissingSchemaVersion));
}

#[tokio::test]
async fn invalid_devfile_fails_validation() {
    let err = default_command(StaticFetcher::default())
        .execute(
            &GenerateOptions::new()
                .with_devfile_content("schemaVersion: 2.2.0\ncomponents: nope\n")
                .with_editor_content(EDITOR),
        )
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Validation(_)));
    assert!(err.to_string().starts_with("Devfile schema validation failed. Error: "));
}

#[tokio::test]
async fn dev_container_json_is_converted() {
    let report = default_command(StaticFetcher::default())
        .execute(
            &GenerateOptions::new()
                .with_dev_container_json(r#"{"name": "Web App", "image": "node:20", "forwardPorts": [3000]}"#)
                .with_editor_content(EDITOR),
        )
        .await
        .unwrap();

    assert_eq!(report.devfile_source, DevfileSource::DevContainer);
    assert_eq!(report.context.editor_template_name(), Some("che-code-web-app"));
    let component = &template(&report.context.dev_workspace)["components"][0];
    assert_eq!(component["container"]["image"].as_str(), Some("node:20"));
    assert_eq!(
        component["container"]["endpoints"][0]["targetPort"].as_i64(),
        Some(3000)
    );
}

#[tokio::test]
async fn configuration_supplies_editor_and_injection() {
    let config = dwgen_core::config::parse_config_str(
        r#"
[generator]
inject_default_component = true
default_component_image = "quay.io/example/runtime:1"

[editor]
url = "https://editors.example.com/che-code.yaml"
"#,
    )
    .unwrap();
    let fetcher = StaticFetcher::default().with(EDITOR_URL, EDITOR);

    let report = command(config, fetcher)
        .execute(&GenerateOptions::new().with_devfile_content(
            "schemaVersion: 2.2.0\nmetadata:\n  name: bare\n",
        ))
        .await
        .unwrap();

    assert_eq!(report.context.editor_template_name(), Some("che-code-bare"));
    let components = template(&report.context.dev_workspace)["components"]
        .as_sequence()
        .unwrap();
    assert_eq!(components.len(), 1);
    assert_eq!(components[0]["name"].as_str(), Some("dev"));
    assert_eq!(
        components[0]["container"]["image"].as_str(),
        Some("quay.io/example/runtime:1")
    );
}

#[tokio::test]
async fn explicit_options_override_configuration() {
    let config = dwgen_core::config::parse_config_str(
        "[generator]\ninject_default_component = true\n",
    )
    .unwrap();

    let report = command(config, StaticFetcher::default())
        .execute(
            &GenerateOptions::new()
                .with_devfile_content("schemaVersion: 2.2.0\nmetadata:\n  name: bare\n")
                .with_editor_content(EDITOR)
                .with_inject_default_component(false),
        )
        .await
        .unwrap();

    assert!(template(&report.context.dev_workspace).get("components").is_none());
}
