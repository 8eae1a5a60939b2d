//! Attribute propagation from devfile metadata to the workspace template.

use serde_yaml::{Mapping, Value};
use tracing::warn;

use crate::devfile::METADATA_ANNOTATIONS_ATTRIBUTE;

/// Fold `metadata.attributes` into the top-level `attributes` of `devfile`.
///
/// Top-level entries win. When both sides hold a mapping under the same key
/// the two are merged recursively with the same rule; any other collision
/// keeps the top-level value.
pub fn merge_metadata_attributes(devfile: &mut Mapping) {
    let Some(metadata_attributes) = devfile
        .get("metadata")
        .and_then(|metadata| metadata.get("attributes"))
        .and_then(Value::as_mapping)
        .cloned()
    else {
        return;
    };

    match devfile.get_mut("attributes").and_then(Value::as_mapping_mut) {
        Some(attributes) => merge_missing(attributes, metadata_attributes),
        None => {
            devfile.insert("attributes".into(), Value::Mapping(metadata_attributes));
        }
    }
}

/// Copy entries of `from` that `into` lacks, recursing into shared mappings.
fn merge_missing(into: &mut Mapping, from: Mapping) {
    for (key, value) in from {
        match into.get_mut(&key) {
            None => {
                into.insert(key, value);
            }
            Some(Value::Mapping(existing)) => {
                if let Value::Mapping(incoming) = value {
                    merge_missing(existing, incoming);
                }
            }
            Some(_) => {}
        }
    }
}

/// Remove the annotations carrier from `attributes`, returning its entries.
///
/// An `attributes` mapping left empty is removed as well.
pub fn extract_annotations(template: &mut Mapping) -> Option<Mapping> {
    let attributes = template.get_mut("attributes").and_then(Value::as_mapping_mut)?;
    let carrier = attributes.shift_remove(METADATA_ANNOTATIONS_ATTRIBUTE)?;
    if attributes.is_empty() {
        template.shift_remove("attributes");
    }

    match carrier {
        Value::Mapping(annotations) => Some(annotations),
        other => {
            warn!(
                "Ignoring {} attribute that is not a mapping: {:?}",
                METADATA_ANNOTATIONS_ATTRIBUTE, other
            );
            None
        }
    }
}
