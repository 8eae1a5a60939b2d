//! Error taxonomy for devfile generation.
//!
//! Every failure is fatal for the run that produced it; nothing in this crate
//! retries. [`Error::phase`] tells the caller which stage of the pipeline gave
//! up so that it can be reported without inspecting the message.

use std::fmt;
use std::path::PathBuf;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Stage of a generation run in which an error was raised.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Missing or conflicting inputs
    Input,
    /// Classifying a repository URL
    Resolution,
    /// Retrieving remote content
    Fetch,
    /// Devfile schema checks
    Validation,
    /// Building the DevWorkspace resources
    Generation,
    /// Local file access
    Io,
    /// Loading dwgen.toml
    Configuration,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::Input => "input",
            Phase::Resolution => "resolution",
            Phase::Fetch => "fetch",
            Phase::Validation => "validation",
            Phase::Generation => "generation",
            Phase::Io => "io",
            Phase::Configuration => "configuration",
        };
        f.write_str(name)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("{0}")]
    MissingInput(String),

    #[error("Devfile is not valid, schemaVersion is required")]
    MissingSchemaVersion,

    #[error("Devfile schema validation failed. Error: {0}")]
    Validation(String),

    #[error("No resolver found for url {0}")]
    UnsupportedUrl(String),

    #[error("No devfile found in repository {0}")]
    DevfileNotFound(String),

    #[error("Failed to parse {what}: {source}")]
    Yaml {
        what: &'static str,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Failed to parse devcontainer JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to fetch {url}: {message}")]
    Fetch { url: String, message: String },

    #[error("Failed to fetch {url}: HTTP {status}")]
    HttpStatus { url: String, status: u16 },

    #[error("Failed to access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid document: {0}")]
    InvalidDocument(String),

    #[error("{0}")]
    Config(String),
}

impl Error {
    /// Pipeline stage this error belongs to.
    pub fn phase(&self) -> Phase {
        match self {
            Error::MissingInput(_) => Phase::Input,
            Error::MissingSchemaVersion | Error::Validation(_) => Phase::Validation,
            Error::UnsupportedUrl(_) => Phase::Resolution,
            Error::DevfileNotFound(_) | Error::Fetch { .. } | Error::HttpStatus { .. } => {
                Phase::Fetch
            }
            Error::Yaml { .. } | Error::Json(_) | Error::InvalidDocument(_) => Phase::Generation,
            Error::Io { .. } => Phase::Io,
            Error::Config(_) => Phase::Configuration,
        }
    }

    pub(crate) fn yaml(what: &'static str, source: serde_yaml::Error) -> Self {
        Error::Yaml { what, source }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_version_error_message() {
        assert_eq!(
            Error::MissingSchemaVersion.to_string(),
            "Devfile is not valid, schemaVersion is required"
        );
        assert_eq!(Error::MissingSchemaVersion.phase(), Phase::Validation);
    }

    #[test]
    fn unsupported_url_is_a_resolution_error() {
        let err = Error::UnsupportedUrl("ftp://example.com/repo".to_string());
        assert_eq!(err.phase(), Phase::Resolution);
        assert!(err.to_string().contains("ftp://example.com/repo"));
    }

    #[test]
    fn io_error_reports_path() {
        let err = Error::io(
            "/missing/devfile.yaml",
            std::io::Error::new(std::io::ErrorKind::NotFound, "not found"),
        );
        assert_eq!(err.phase(), Phase::Io);
        assert!(err.to_string().contains("/missing/devfile.yaml"));
    }
}
