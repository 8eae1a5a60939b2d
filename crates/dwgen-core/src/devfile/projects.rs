//! Project entries: caller overrides and repository-derived defaults.

use std::fmt;
use std::str::FromStr;

use serde_yaml::{Mapping, Value};
use tracing::debug;

use super::{METADATA_ANNOTATIONS_ATTRIBUTE, mapping_entry, to_yaml};
use crate::error::{Error, Result};
use crate::git::ResolvedGitUrl;

/// Annotation holding the devfile text as fetched
pub const DEVFILE_ATTRIBUTE: &str = "che.eclipse.org/devfile";

/// Annotation describing where the devfile came from
pub const DEVFILE_SOURCE_ATTRIBUTE: &str = "che.eclipse.org/devfile-source";

/// Caller-supplied replacement location for a devfile project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectOverride {
    pub name: String,
    pub location: String,
}

impl ProjectOverride {
    pub fn new(name: impl Into<String>, location: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            location: location.into(),
        }
    }

    /// Archive locations replace the git source entirely.
    pub fn is_zip(&self) -> bool {
        self.location.ends_with(".zip")
    }
}

impl FromStr for ProjectOverride {
    type Err = Error;

    /// Parse `NAME=LOCATION`.
    fn from_str(s: &str) -> Result<Self> {
        match s.split_once('=') {
            Some((name, location)) if !name.trim().is_empty() && !location.is_empty() => {
                Ok(Self::new(name.trim(), location))
            }
            _ => Err(Error::MissingInput(format!(
                "invalid project override '{}', expected NAME=LOCATION",
                s
            ))),
        }
    }
}

impl fmt::Display for ProjectOverride {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.name, self.location)
    }
}

/// Point existing projects at the override locations.
///
/// Overrides naming a project the devfile does not declare are ignored. The
/// first override for a name wins.
pub fn replace_if_existing_projects(devfile: &mut Mapping, overrides: &[ProjectOverride]) {
    if overrides.is_empty() {
        return;
    }
    let Some(projects) = devfile.get_mut("projects").and_then(Value::as_sequence_mut) else {
        return;
    };

    for project in projects.iter_mut().filter_map(Value::as_mapping_mut) {
        let Some(name) = project.get("name").and_then(Value::as_str) else {
            continue;
        };
        let Some(replacement) = overrides.iter().find(|o| o.name == name) else {
            continue;
        };
        debug!("Overriding project {} with {}", replacement.name, replacement.location);

        if replacement.is_zip() {
            project.shift_remove("git");
            let mut zip = Mapping::new();
            zip.insert("location".into(), replacement.location.as_str().into());
            project.insert("zip".into(), Value::Mapping(zip));
        } else {
            project.shift_remove("zip");
            let git = mapping_entry(project, "git");
            mapping_entry(git, "remotes").insert("origin".into(), replacement.location.as_str().into());
        }
    }
}

/// Add the repository itself as the only project when the devfile has no
/// `projects` key.
pub fn synthesize_project_if_missing(devfile: &mut Mapping, url: &ResolvedGitUrl) -> bool {
    if devfile.contains_key("projects") {
        return false;
    }

    let mut remotes = Mapping::new();
    remotes.insert("origin".into(), url.clone_url().into());
    let mut checkout_from = Mapping::new();
    checkout_from.insert("revision".into(), url.branch_name().into());
    let mut git = Mapping::new();
    git.insert("remotes".into(), Value::Mapping(remotes));
    git.insert("checkoutFrom".into(), Value::Mapping(checkout_from));
    let mut project = Mapping::new();
    project.insert("name".into(), url.repo_name().into());
    project.insert("git".into(), Value::Mapping(git));

    devfile.insert("projects".into(), Value::Sequence(vec![Value::Mapping(project)]));
    true
}

/// Record the fetched devfile text and its origin as workspace annotations.
pub fn add_provenance_attributes(
    devfile: &mut Mapping,
    raw_devfile: &str,
    devfile_url: &str,
) -> Result<()> {
    let mut factory = Mapping::new();
    factory.insert("params".into(), format!("url={}", devfile_url).into());
    let mut source = Mapping::new();
    source.insert("factory".into(), Value::Mapping(factory));

    let mut annotations = Mapping::new();
    annotations.insert(DEVFILE_ATTRIBUTE.into(), raw_devfile.into());
    annotations.insert(DEVFILE_SOURCE_ATTRIBUTE.into(), to_yaml(&source)?.into());

    mapping_entry(devfile, "attributes").insert(
        METADATA_ANNOTATIONS_ATTRIBUTE.into(),
        Value::Mapping(annotations),
    );
    Ok(())
}
