//! Devfile schema validation.

use semver::Version;
use serde_yaml::Mapping;

use crate::error::{Error, Result};

const DEVFILE_SCHEMA: &str = include_str!("schema/devfile.json");

/// Only 2.x devfiles can be turned into DevWorkspaces.
const SUPPORTED_MAJOR: u64 = 2;

/// Newest 2.x minor release the bundled schema covers.
const LATEST_MINOR: u64 = 3;

/// Validates devfiles against the bundled 2.x JSON Schema.
///
/// One schema serves every release from 2.0 to 2.3; the version only decides
/// whether the devfile is accepted at all.
pub struct DevfileSchemaValidator {
    validator: jsonschema::Validator,
}

impl DevfileSchemaValidator {
    pub fn new() -> Result<Self> {
        let schema: serde_json::Value = serde_json::from_str(DEVFILE_SCHEMA)
            .map_err(|e| Error::InvalidDocument(format!("Bundled devfile schema is invalid: {}", e)))?;
        let validator = jsonschema::validator_for(&schema)
            .map_err(|e| Error::InvalidDocument(format!("Bundled devfile schema is invalid: {}", e)))?;
        Ok(Self { validator })
    }

    /// Check `devfile` against the bundled schema.
    ///
    /// `schema_version` must be a 2.0 to 2.3 release. All violations are
    /// reported together, one per line.
    pub fn validate_devfile(&self, devfile: &Mapping, schema_version: &str) -> Result<()> {
        let version = Version::parse(schema_version).map_err(|e| {
            Error::Validation(format!("invalid schemaVersion '{}': {}", schema_version, e))
        })?;
        if version.major != SUPPORTED_MAJOR || version.minor > LATEST_MINOR {
            return Err(Error::Validation(format!(
                "unsupported schemaVersion '{}', only {}.0 to {}.{} devfiles are supported",
                schema_version, SUPPORTED_MAJOR, SUPPORTED_MAJOR, LATEST_MINOR
            )));
        }

        let instance = serde_json::to_value(devfile).map_err(|e| {
            Error::Validation(format!("devfile cannot be represented as JSON: {}", e))
        })?;

        let errors: Vec<String> = self
            .validator
            .iter_errors(&instance)
            .map(|error| error.to_string())
            .collect();

        if errors.is_empty() {
            Ok(())
        } else {
            Err(Error::Validation(errors.join("\n")))
        }
    }
}

impl std::fmt::Debug for DevfileSchemaValidator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DevfileSchemaValidator")
            .field("supported_major", &SUPPORTED_MAJOR)
            .field("latest_minor", &LATEST_MINOR)
            .finish()
    }
}
