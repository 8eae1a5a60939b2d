//! devcontainer.json to devfile conversion.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value as Json;
use serde_yaml::{Mapping, Value};
use tracing::{debug, warn};

use super::model::{DevContainer, POST_START_HOOKS, PRE_START_HOOK, scalar_to_string};
use crate::devfile::to_yaml;
use crate::error::{Error, Result};

pub const DEFAULT_DEVFILE_CONTAINER_IMAGE: &str =
    "quay.io/devfile/universal-developer-image:ubi9-latest";
pub const DEFAULT_DEVFILE_NAME: &str = "default-devfile";
pub const DEFAULT_WORKSPACE_DIR: &str = "/projects";
pub const DEV_CONTAINER_COMPONENT: &str = "dev-container";

const DEVFILE_SCHEMA_VERSION: &str = "2.2.0";
const DEFAULT_IMAGE_NAME: &str = "default-devfile-image";
const SLEEP_FOREVER: &str = "while true; do sleep 1000; done";

static WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("valid whitespace regex"));
static NAMED_PORT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(.*):(\d+)$").expect("valid port regex"));

/// Parse devcontainer.json text.
pub fn parse_dev_container(content: &str) -> Result<Json> {
    Ok(serde_json::from_str(content)?)
}

/// Convert a devcontainer descriptor into devfile YAML.
///
/// Entries that cannot be represented (bind mounts, unparsable ports) are
/// dropped with a warning; only a non-object descriptor is an error.
pub fn convert_dev_container_to_devfile(dev_container: &Json) -> Result<String> {
    let dc = DevContainer::new(dev_container).ok_or_else(|| {
        Error::InvalidDocument("devcontainer descriptor must be a JSON object".to_string())
    })?;
    to_yaml(&Value::Mapping(build_devfile(&dc)))
}

fn build_devfile(dc: &DevContainer<'_>) -> Mapping {
    let working_dir = dc.workspace_folder().unwrap_or(DEFAULT_WORKSPACE_DIR);

    let mut metadata = Mapping::new();
    metadata.insert(
        "name".into(),
        normalize_name(dc.name().unwrap_or(DEFAULT_DEVFILE_NAME)).into(),
    );
    if let Some(description) = dc.description() {
        metadata.insert("description".into(), description.into());
    }

    let (volume_components, volume_mounts) = convert_mounts(dc.mounts());

    let main_component = match dc.build() {
        Some(_) => image_component(dc),
        None => container_component(dc, volume_mounts),
    };

    let mut components = vec![Value::Mapping(main_component)];
    components.extend(volume_components.into_iter().map(Value::Mapping));

    let mut commands = Vec::new();
    let mut post_start = Vec::new();
    for (key, id) in POST_START_HOOKS {
        if let Some(command_line) = dc.hook(key).and_then(command_line) {
            commands.push(exec_command(id, &command_line, working_dir));
            post_start.push(Value::from(id));
        }
    }
    let mut pre_start = Vec::new();
    let (key, id) = PRE_START_HOOK;
    if let Some(command_line) = dc.hook(key).and_then(command_line) {
        commands.push(exec_command(id, &command_line, working_dir));
        pre_start.push(Value::from(id));
    }

    let mut events = Mapping::new();
    if !pre_start.is_empty() {
        events.insert("preStart".into(), Value::Sequence(pre_start));
    }
    if !post_start.is_empty() {
        events.insert("postStart".into(), Value::Sequence(post_start));
    }

    let mut devfile = Mapping::new();
    devfile.insert("schemaVersion".into(), DEVFILE_SCHEMA_VERSION.into());
    devfile.insert("metadata".into(), Value::Mapping(metadata));
    devfile.insert("components".into(), Value::Sequence(components));
    if !commands.is_empty() {
        devfile.insert("commands".into(), Value::Sequence(commands));
    }
    if !events.is_empty() {
        devfile.insert("events".into(), Value::Mapping(events));
    }
    devfile
}

fn container_component(dc: &DevContainer<'_>, volume_mounts: Vec<Value>) -> Mapping {
    let mut container = Mapping::new();
    container.insert(
        "image".into(),
        dc.image().unwrap_or(DEFAULT_DEVFILE_CONTAINER_IMAGE).into(),
    );

    let endpoints = convert_ports(dc.forward_ports());
    if !endpoints.is_empty() {
        container.insert("endpoints".into(), Value::Sequence(endpoints));
    }

    let env = merge_env(dc);
    if !env.is_empty() {
        container.insert("env".into(), Value::Sequence(env));
    }

    if dc.override_command() {
        container.insert("command".into(), Value::Sequence(vec!["/bin/bash".into()]));
        container.insert(
            "args".into(),
            Value::Sequence(vec!["-c".into(), SLEEP_FOREVER.into()]),
        );
    }

    if let Some(cpus) = dc.cpus() {
        container.insert("cpuRequest".into(), cpus.into());
    }
    if let Some(memory) = dc.memory() {
        container.insert("memoryRequest".into(), convert_memory(&memory).into());
    }

    if let Some(folder) = dc.workspace_folder() {
        container.insert("mountSources".into(), true.into());
        container.insert("sourceMapping".into(), folder.into());
    }

    if !volume_mounts.is_empty() {
        container.insert("volumeMounts".into(), Value::Sequence(volume_mounts));
    }

    let mut component = Mapping::new();
    component.insert("name".into(), DEV_CONTAINER_COMPONENT.into());
    component.insert("container".into(), Value::Mapping(container));
    component
}

fn image_component(dc: &DevContainer<'_>) -> Mapping {
    let mut dockerfile = Mapping::new();
    if let Some(build) = dc.build() {
        dockerfile.insert("uri".into(), build.dockerfile().unwrap_or("Dockerfile").into());
        dockerfile.insert("buildContext".into(), build.context().unwrap_or(".").into());
        let args = build.args();
        if !args.is_empty() {
            dockerfile.insert(
                "args".into(),
                Value::Sequence(args.into_iter().map(Value::from).collect()),
            );
        }
    }

    let mut image = Mapping::new();
    image.insert(
        "imageName".into(),
        normalize_name(dc.name().unwrap_or(DEFAULT_IMAGE_NAME)).into(),
    );
    image.insert("dockerfile".into(), Value::Mapping(dockerfile));

    let mut component = Mapping::new();
    component.insert("name".into(), DEV_CONTAINER_COMPONENT.into());
    component.insert("image".into(), Value::Mapping(image));
    component
}

/// Lower-case the name and collapse whitespace runs into `-`.
pub fn normalize_name(name: &str) -> String {
    WHITESPACE
        .replace_all(name.trim(), "-")
        .to_lowercase()
}

/// Rewrite decimal memory units to the binary labels Kubernetes expects.
///
/// Only the unit label changes, the number is kept as written.
pub fn convert_memory(value: &str) -> String {
    const UNITS: [(&str, &str); 4] = [("tb", "TiB"), ("gb", "GiB"), ("mb", "MiB"), ("kb", "KiB")];

    let lower = value.to_lowercase();
    for (decimal, binary) in UNITS {
        if let Some(number) = lower.strip_suffix(decimal) {
            return format!("{}{}", number, binary);
        }
    }
    value.to_string()
}

/// Endpoints for `forwardPorts`; unusable entries are skipped.
fn convert_ports(ports: &[Json]) -> Vec<Value> {
    ports
        .iter()
        .filter_map(|port| {
            let endpoint = parse_port(port);
            if endpoint.is_none() {
                warn!("Skipping unsupported forwardPorts entry {}", port);
            }
            endpoint
        })
        .map(|(name, target_port)| {
            let mut endpoint = Mapping::new();
            endpoint.insert("name".into(), name.into());
            endpoint.insert("targetPort".into(), target_port.into());
            Value::Mapping(endpoint)
        })
        .collect()
}

fn parse_port(port: &Json) -> Option<(String, u16)> {
    match port {
        Json::Number(number) => {
            let port = u16::try_from(number.as_u64()?).ok().filter(|p| *p > 0)?;
            Some((format!("port-{}", port), port))
        }
        Json::String(text) => {
            let text = text.trim();
            if let Ok(port) = text.parse::<u16>() {
                return (port > 0).then(|| (format!("port-{}", port), port));
            }
            let captures = NAMED_PORT.captures(text)?;
            let port = captures[2].parse::<u16>().ok().filter(|p| *p > 0)?;
            let name = text
                .split_once(':')
                .map(|(name, _)| name.trim())
                .filter(|name| !name.is_empty())
                .map(str::to_string)
                .unwrap_or_else(|| format!("port-{}", port));
            Some((name, port))
        }
        _ => None,
    }
}

/// `remoteEnv` then `containerEnv`; a key set by both keeps its first
/// position and takes the `containerEnv` value.
fn merge_env(dc: &DevContainer<'_>) -> Vec<Value> {
    let mut merged = Mapping::new();
    for env in [dc.remote_env(), dc.container_env()].into_iter().flatten() {
        for (name, value) in env {
            if value.is_null() {
                continue;
            }
            merged.insert(name.as_str().into(), scalar_to_string(value).into());
        }
    }

    merged
        .into_iter()
        .map(|(name, value)| {
            let mut entry = Mapping::new();
            entry.insert("name".into(), name);
            entry.insert("value".into(), value);
            Value::Mapping(entry)
        })
        .collect()
}

/// Flatten a lifecycle hook into one shell command line.
///
/// Lists are joined with spaces; named parallel commands are chained with
/// `&&` in document order.
fn command_line(hook: &Json) -> Option<String> {
    match hook {
        Json::String(line) => Some(line.clone()),
        Json::Array(tokens) => Some(join_tokens(tokens)),
        Json::Object(named) => {
            let parts: Vec<String> = named
                .values()
                .filter_map(|value| match value {
                    Json::String(line) => Some(line.trim().to_string()),
                    Json::Array(tokens) => Some(join_tokens(tokens)),
                    _ => None,
                })
                .filter(|part| !part.is_empty())
                .collect();
            (!parts.is_empty()).then(|| parts.join(" && "))
        }
        _ => None,
    }
}

fn join_tokens(tokens: &[Json]) -> String {
    tokens
        .iter()
        .map(scalar_to_string)
        .collect::<Vec<_>>()
        .join(" ")
}

fn exec_command(id: &str, command_line: &str, working_dir: &str) -> Value {
    let mut exec = Mapping::new();
    exec.insert("component".into(), DEV_CONTAINER_COMPONENT.into());
    exec.insert("commandLine".into(), command_line.into());
    exec.insert("workingDir".into(), working_dir.into());

    let mut command = Mapping::new();
    command.insert("id".into(), id.into());
    command.insert("exec".into(), Value::Mapping(exec));
    Value::Mapping(command)
}

/// Volume components and container mounts for `mounts`.
fn convert_mounts(mounts: &[Json]) -> (Vec<Mapping>, Vec<Value>) {
    let mut components = Vec::new();
    let mut volume_mounts = Vec::new();

    for mount in mounts {
        let Some(spec) = MountSpec::parse(mount) else {
            warn!("Skipping unsupported mount {}", mount);
            continue;
        };
        if spec.kind == "bind" {
            debug!("Skipping bind mount {} -> {}", spec.source, spec.target);
            continue;
        }

        let mut volume = Mapping::new();
        volume.insert("ephemeral".into(), (spec.kind == "tmpfs").into());
        let mut component = Mapping::new();
        component.insert("name".into(), spec.source.as_str().into());
        component.insert("volume".into(), Value::Mapping(volume));
        components.push(component);

        let mut volume_mount = Mapping::new();
        volume_mount.insert("name".into(), spec.source.into());
        volume_mount.insert("path".into(), spec.target.into());
        volume_mounts.push(Value::Mapping(volume_mount));
    }

    (components, volume_mounts)
}

/// A mount with every field the conversion needs.
#[derive(Debug, PartialEq, Eq)]
struct MountSpec {
    source: String,
    target: String,
    kind: String,
}

impl MountSpec {
    /// Accepts `source=a,target=/b,type=volume` strings and
    /// `{"source", "target", "type"}` objects.
    fn parse(mount: &Json) -> Option<Self> {
        let mut source = None;
        let mut target = None;
        let mut kind = None;

        let mut assign = |key: &str, value: String| match key {
            "source" | "src" => source = Some(value),
            "target" | "dst" | "destination" => target = Some(value),
            "type" => kind = Some(value),
            _ => {}
        };

        match mount {
            Json::String(text) => {
                for segment in text.split(',') {
                    if let Some((key, value)) = segment.split_once('=') {
                        assign(key.trim(), value.trim().to_string());
                    }
                }
            }
            Json::Object(fields) => {
                for (key, value) in fields {
                    if let Some(value) = value.as_str() {
                        assign(key.as_str(), value.trim().to_string());
                    }
                }
            }
            _ => return None,
        }

        let non_empty = |value: Option<String>| value.filter(|v| !v.is_empty());
        Some(Self {
            source: non_empty(source)?,
            target: non_empty(target)?,
            kind: non_empty(kind)?,
        })
    }
}
