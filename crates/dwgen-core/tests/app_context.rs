use std::path::PathBuf;

use dwgen_core::commands::{DevfileSource, GenerateOptions};
use dwgen_core::config::GeneratorConfig;
use dwgen_core::context::AppContext;
use dwgen_core::git::GitProvider;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const EDITOR: &str = "schemaVersion: 2.2.0\nmetadata:\n  name: che-code\n";
const DEVFILE: &str = "schemaVersion: 2.2.0\nmetadata:\n  name: served\n";

#[test]
fn app_context_exposes_configuration() {
    let temp = TempDir::new().unwrap();
    let ctx = AppContext::new(temp.path().to_path_buf(), GeneratorConfig::default()).unwrap();

    assert_eq!(ctx.project_root(), temp.path());
    assert!(!ctx.config().inject_default_component());
    assert!(ctx.generate_command().is_ok());
}

#[test]
fn app_context_loads_project_configuration() {
    let temp = TempDir::new().unwrap();
    std::fs::write(
        temp.path().join("dwgen.toml"),
        "[editor]\nurl = \"https://editors.example.com/che-code.yaml\"\n",
    )
    .unwrap();

    let ctx = AppContext::load_from(PathBuf::from("/unused"), &temp.path().join("dwgen.toml"))
        .unwrap();
    assert_eq!(
        ctx.config().editor_url(),
        Some("https://editors.example.com/che-code.yaml")
    );
}

#[test]
fn app_context_rejects_invalid_configuration() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("dwgen.toml");
    std::fs::write(&path, "[http]\ntimeout_secs = 0\n").unwrap();

    let err = AppContext::load_from(temp.path().to_path_buf(), &path).unwrap_err();
    assert_eq!(err.phase(), dwgen_core::Phase::Configuration);
}

#[tokio::test]
async fn generate_over_http() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/git/team/app/devfile.yaml"))
        .respond_with(ResponseTemplate::new(200).set_body_string(DEVFILE))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/editors/che-code.yaml"))
        .respond_with(ResponseTemplate::new(200).set_body_string(EDITOR))
        .mount(&server)
        .await;

    let temp = TempDir::new().unwrap();
    let ctx = AppContext::new(temp.path().to_path_buf(), GeneratorConfig::default()).unwrap();
    let repository = format!("{}/git/team/app.git", server.uri());

    let report = ctx
        .generate_command()
        .unwrap()
        .execute(
            &GenerateOptions::new()
                .with_devfile_url(&repository)
                .with_editor_url(format!("{}/editors/che-code.yaml", server.uri())),
        )
        .await
        .unwrap();

    match &report.devfile_source {
        DevfileSource::Repository(url) => {
            assert_eq!(url.provider(), GitProvider::Plain);
            assert_eq!(url.clone_url(), repository);
        }
        other => panic!("unexpected source {:?}", other),
    }
    assert_eq!(report.context.editor_template_name(), Some("che-code-served"));

    let project = &report.context.dev_workspace["spec"]["template"]["projects"][0];
    assert_eq!(project["name"].as_str(), Some("app"));
    assert_eq!(project["git"]["remotes"]["origin"].as_str(), Some(repository.as_str()));
}

#[tokio::test]
async fn generate_fails_when_editor_is_unavailable() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/editors/che-code.yaml"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let temp = TempDir::new().unwrap();
    let ctx = AppContext::new(temp.path().to_path_buf(), GeneratorConfig::default()).unwrap();

    let err = ctx
        .generate_command()
        .unwrap()
        .execute(
            &GenerateOptions::new()
                .with_devfile_content(DEVFILE)
                .with_editor_url(format!("{}/editors/che-code.yaml", server.uri())),
        )
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        dwgen_core::Error::HttpStatus { status: 500, .. }
    ));
}
