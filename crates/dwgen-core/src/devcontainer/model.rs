//! Lenient read-only view over a devcontainer.json document.
//!
//! Fields of an unexpected type read as absent so that conversion can go on
//! with whatever is usable.

use serde_json::{Map, Value};

/// Lifecycle hooks run once the workspace is up, in execution order.
pub const POST_START_HOOKS: [(&str, &str); 5] = [
    ("onCreateCommand", "on-create-command"),
    ("updateContentCommand", "update-content-command"),
    ("postCreateCommand", "post-create-command"),
    ("postStartCommand", "post-start-command"),
    ("postAttachCommand", "post-attach-command"),
];

/// Hook run before the workspace starts.
pub const PRE_START_HOOK: (&str, &str) = ("initializeCommand", "initialize-command");

#[derive(Debug, Clone, Copy)]
pub struct DevContainer<'a> {
    raw: &'a Map<String, Value>,
}

/// `build` section.
#[derive(Debug, Clone, Copy)]
pub struct BuildSection<'a> {
    raw: &'a Map<String, Value>,
}

impl<'a> DevContainer<'a> {
    /// View over `value`, `None` unless it is a JSON object.
    pub fn new(value: &'a Value) -> Option<Self> {
        value.as_object().map(|raw| Self { raw })
    }

    fn str_field(&self, key: &str) -> Option<&'a str> {
        self.raw
            .get(key)
            .and_then(Value::as_str)
            .filter(|value| !value.trim().is_empty())
    }

    fn array_field(&self, key: &str) -> &'a [Value] {
        self.raw
            .get(key)
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn name(&self) -> Option<&'a str> {
        self.str_field("name")
    }

    pub fn description(&self) -> Option<&'a str> {
        self.str_field("description")
    }

    pub fn image(&self) -> Option<&'a str> {
        self.str_field("image")
    }

    pub fn workspace_folder(&self) -> Option<&'a str> {
        self.str_field("workspaceFolder")
    }

    pub fn build(&self) -> Option<BuildSection<'a>> {
        self.raw
            .get("build")
            .and_then(Value::as_object)
            .map(|raw| BuildSection { raw })
    }

    pub fn forward_ports(&self) -> &'a [Value] {
        self.array_field("forwardPorts")
    }

    pub fn mounts(&self) -> &'a [Value] {
        self.array_field("mounts")
    }

    pub fn remote_env(&self) -> Option<&'a Map<String, Value>> {
        self.raw.get("remoteEnv").and_then(Value::as_object)
    }

    pub fn container_env(&self) -> Option<&'a Map<String, Value>> {
        self.raw.get("containerEnv").and_then(Value::as_object)
    }

    pub fn override_command(&self) -> bool {
        self.raw
            .get("overrideCommand")
            .and_then(Value::as_bool)
            .unwrap_or(false)
    }

    /// Lifecycle hook value, ignoring empty strings, lists and objects.
    pub fn hook(&self, key: &str) -> Option<&'a Value> {
        self.raw.get(key).filter(|value| match value {
            Value::String(s) => !s.trim().is_empty(),
            Value::Array(items) => !items.is_empty(),
            Value::Object(entries) => !entries.is_empty(),
            _ => false,
        })
    }

    /// `hostRequirements.cpus`, as a string.
    pub fn cpus(&self) -> Option<String> {
        self.host_requirement("cpus")
    }

    /// `hostRequirements.memory`, as a string.
    pub fn memory(&self) -> Option<String> {
        self.host_requirement("memory")
    }

    fn host_requirement(&self, key: &str) -> Option<String> {
        match self.raw.get("hostRequirements")?.get(key)? {
            Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }
}

impl<'a> BuildSection<'a> {
    pub fn dockerfile(&self) -> Option<&'a str> {
        self.raw.get("dockerfile").and_then(Value::as_str)
    }

    pub fn context(&self) -> Option<&'a str> {
        self.raw.get("context").and_then(Value::as_str)
    }

    /// Build arguments as `KEY=VALUE`, in document order.
    pub fn args(&self) -> Vec<String> {
        self.raw
            .get("args")
            .and_then(Value::as_object)
            .map(|args| {
                args.iter()
                    .map(|(key, value)| format!("{}={}", key, scalar_to_string(value)))
                    .collect()
            })
            .unwrap_or_default()
    }
}

/// Render a JSON scalar the way it would appear in a shell or env file.
pub(crate) fn scalar_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
