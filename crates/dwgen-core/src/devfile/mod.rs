//! Devfile documents
//!
//! Devfiles are handled as semi-structured YAML trees rather than typed
//! models: schema versions disagree on optional fields, and everything this
//! crate does not touch must survive unchanged.

mod components;
mod projects;
mod validator;

use serde_yaml::{Mapping, Value};

use crate::error::{Error, Result};

pub use components::{ComponentResolver, DEFAULT_COMPONENT_NAME, MERGE_CONTRIBUTION_ATTRIBUTE};
pub use projects::{
    DEVFILE_ATTRIBUTE, DEVFILE_SOURCE_ATTRIBUTE, ProjectOverride, add_provenance_attributes,
    replace_if_existing_projects, synthesize_project_if_missing,
};
pub use validator::DevfileSchemaValidator;

/// Attribute whose mapping becomes the DevWorkspace `metadata.annotations`
pub const METADATA_ANNOTATIONS_ATTRIBUTE: &str = "dw.metadata.annotations";

/// Parse YAML text; `what` names the document in error messages.
pub fn parse_yaml(content: &str, what: &'static str) -> Result<Value> {
    serde_yaml::from_str(content).map_err(|e| Error::yaml(what, e))
}

/// Parse YAML text that must be a mapping at the top level.
pub fn parse_document(content: &str, what: &'static str) -> Result<Mapping> {
    match parse_yaml(content, what)? {
        Value::Mapping(mapping) => Ok(mapping),
        Value::Null => Err(Error::InvalidDocument(format!("{} is empty", what))),
        _ => Err(Error::InvalidDocument(format!(
            "{} must be a mapping at the top level",
            what
        ))),
    }
}

/// Serialize a YAML document.
pub fn to_yaml<T: serde::Serialize>(document: &T) -> Result<String> {
    serde_yaml::to_string(document)
        .map_err(|e| Error::InvalidDocument(format!("Failed to serialize document: {}", e)))
}

/// Declared `schemaVersion`, accepting the unquoted numeric form.
pub fn schema_version(document: &Mapping) -> Option<String> {
    match document.get("schemaVersion")? {
        Value::String(version) if !version.trim().is_empty() => Some(version.trim().to_string()),
        Value::Number(version) => Some(version.to_string()),
        _ => None,
    }
}

/// `metadata.<field>` as a string, if present and non-empty.
pub fn metadata_str<'a>(document: &'a Mapping, field: &str) -> Option<&'a str> {
    document
        .get("metadata")?
        .get(field)?
        .as_str()
        .filter(|value| !value.is_empty())
}

/// Mutable access to `document[key]` as a mapping, creating it when absent.
///
/// A non-mapping value under `key` is replaced.
pub(crate) fn mapping_entry<'a>(document: &'a mut Mapping, key: &str) -> &'a mut Mapping {
    let slot = document
        .entry(Value::from(key))
        .or_insert_with(|| Value::Mapping(Mapping::new()));
    if !slot.is_mapping() {
        *slot = Value::Mapping(Mapping::new());
    }
    match slot {
        Value::Mapping(mapping) => mapping,
        _ => unreachable!("slot was just made a mapping"),
    }
}
