//! Configuration schema for dwgen.toml
//!
//! Every field is optional so that a project file can override only the
//! values it names on top of the global file.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Image used for injected runtime components when nothing else is configured
pub const DEFAULT_COMPONENT_IMAGE: &str = "quay.io/devfile/universal-developer-image:ubi9-latest";

/// HTTP timeout applied to every fetch when not configured
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

/// Root configuration structure for dwgen.toml
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratorConfig {
    /// DevWorkspace generation defaults
    #[serde(default)]
    pub generator: GeneratorSection,

    /// Editor used when none is given on the command line
    #[serde(default)]
    pub editor: EditorSection,

    /// HTTP client settings for remote devfiles and editors
    #[serde(default)]
    pub http: HttpSection,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratorSection {
    /// Inject a runtime container component when the devfile has none
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inject_default_component: Option<bool>,

    /// Image for the injected component
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_component_image: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditorSection {
    /// Editor devfile URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpSection {
    /// Request timeout in seconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,

    /// User-Agent header sent with every request
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
}

impl GeneratorConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a default runtime component should be injected.
    pub fn inject_default_component(&self) -> bool {
        self.generator.inject_default_component.unwrap_or(false)
    }

    /// Image for injected runtime components.
    pub fn default_component_image(&self) -> &str {
        self.generator
            .default_component_image
            .as_deref()
            .unwrap_or(DEFAULT_COMPONENT_IMAGE)
    }

    pub fn editor_url(&self) -> Option<&str> {
        self.editor.url.as_deref()
    }

    /// Validate value ranges that serde cannot express.
    pub fn validate(&self) -> Result<()> {
        if self.http.timeout_secs == Some(0) {
            return Err(Error::Config(
                "Invalid [http] section: timeout_secs must be greater than zero".to_string(),
            ));
        }
        if let Some(image) = &self.generator.default_component_image
            && image.trim().is_empty()
        {
            return Err(Error::Config(
                "Invalid [generator] section: default_component_image cannot be empty".to_string(),
            ));
        }
        if let Some(url) = &self.editor.url
            && !(url.starts_with("http://") || url.starts_with("https://"))
        {
            return Err(Error::Config(format!(
                "Invalid [editor] section: url must be an http(s) URL, got '{}'",
                url
            )));
        }
        Ok(())
    }
}

impl HttpSection {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.unwrap_or(DEFAULT_HTTP_TIMEOUT_SECS))
    }

    pub fn user_agent(&self) -> String {
        self.user_agent
            .clone()
            .unwrap_or_else(|| format!("dwgen/{}", env!("CARGO_PKG_VERSION")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_when_unset() {
        let config = GeneratorConfig::new();
        assert!(!config.inject_default_component());
        assert_eq!(config.default_component_image(), DEFAULT_COMPONENT_IMAGE);
        assert_eq!(config.http.timeout(), Duration::from_secs(30));
        assert!(config.http.user_agent().starts_with("dwgen/"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let mut config = GeneratorConfig::new();
        config.http.timeout_secs = Some(0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn editor_url_must_be_http() {
        let mut config = GeneratorConfig::new();
        config.editor.url = Some("/local/editor.yaml".to_string());
        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("[editor]"));
    }
}
