//! DevWorkspace generation
//!
//! Turns an editor devfile and a project devfile into one
//! `DevWorkspaceTemplate` (the editor) and one `DevWorkspace` (the project)
//! that references it.

mod attributes;

use std::path::Path;

use serde_yaml::{Mapping, Value};
use tracing::info;

use crate::config::DEFAULT_COMPONENT_IMAGE;
use crate::devfile::{ComponentResolver, mapping_entry, metadata_str, parse_document, to_yaml};
use crate::error::{Error, Result};

pub use attributes::{extract_annotations, merge_metadata_attributes};

pub const API_VERSION: &str = "workspace.devfile.io/v1alpha2";
pub const DEV_WORKSPACE_KIND: &str = "DevWorkspace";
pub const DEV_WORKSPACE_TEMPLATE_KIND: &str = "DevWorkspaceTemplate";

/// Template attribute naming the starter project to materialize
pub const USE_STARTER_PROJECT_ATTRIBUTE: &str = "controller.devfile.io/use-starter-project";

/// Name of the contribution that pulls the editor into the workspace
pub const EDITOR_CONTRIBUTION: &str = "editor";

const DOCUMENT_SEPARATOR: &str = "---\n";

/// Working state of a single generation run.
#[derive(Debug, Clone, PartialEq)]
pub struct DevfileContext {
    /// Devfile as parsed from the input, never modified
    pub devfile: Mapping,
    pub dev_workspace: Mapping,
    pub dev_workspace_templates: Vec<Mapping>,
    /// Devfile name appended to editor template names
    pub suffix: String,
}

impl DevfileContext {
    /// Name of the editor template the workspace contributes.
    pub fn editor_template_name(&self) -> Option<&str> {
        self.dev_workspace_templates
            .first()
            .and_then(|template| metadata_str(template, "name"))
    }

    /// Templates first, then the workspace, as one multi-document YAML text.
    pub fn to_yaml(&self) -> Result<String> {
        let mut documents = self
            .dev_workspace_templates
            .iter()
            .map(to_yaml)
            .collect::<Result<Vec<_>>>()?;
        documents.push(to_yaml(&self.dev_workspace)?);
        Ok(documents.join(DOCUMENT_SEPARATOR))
    }
}

/// The generation engine.
#[derive(Debug, Clone, Default)]
pub struct Generate {
    components: ComponentResolver,
}

impl Generate {
    pub fn new(components: ComponentResolver) -> Self {
        Self { components }
    }

    /// Generate the resources and optionally write them to `output_file`.
    pub fn generate(
        &self,
        devfile_content: &str,
        editor_content: &str,
        output_file: Option<&Path>,
        inject_default_component: bool,
        default_component_image: Option<&str>,
    ) -> Result<DevfileContext> {
        let context = self.generate_content(
            devfile_content,
            editor_content,
            inject_default_component,
            default_component_image,
        )?;

        if let Some(path) = output_file {
            std::fs::write(path, context.to_yaml()?).map_err(|e| Error::io(path, e))?;
        }

        info!(
            "DevWorkspace {} was generated",
            context.editor_template_name().unwrap_or_default()
        );
        Ok(context)
    }

    /// Build the editor template and the workspace in memory.
    pub fn generate_content(
        &self,
        devfile_content: &str,
        editor_content: &str,
        inject_default_component: bool,
        default_component_image: Option<&str>,
    ) -> Result<DevfileContext> {
        let devfile = parse_document(devfile_content, "devfile")?;
        let editor = parse_document(editor_content, "editor devfile")?;

        let suffix = metadata_str(&devfile, "name").unwrap_or_default().to_string();

        let editor_template = editor_template(editor, &suffix);
        let template_name = metadata_str(&editor_template, "name")
            .unwrap_or_default()
            .to_string();

        let dev_workspace = dev_workspace(&devfile, &template_name);

        let mut context = DevfileContext {
            devfile,
            dev_workspace,
            dev_workspace_templates: vec![editor_template],
            suffix,
        };

        self.components.ensure_dev_container_component(
            &mut context,
            inject_default_component,
            default_component_image.unwrap_or(DEFAULT_COMPONENT_IMAGE),
        );

        Ok(context)
    }
}

/// Wrap the editor devfile body into a `DevWorkspaceTemplate`.
fn editor_template(mut editor: Mapping, suffix: &str) -> Mapping {
    let mut metadata = Mapping::new();
    let generate_name = metadata_str(&editor, "generateName").map(str::to_string);
    let base_name = metadata_str(&editor, "name")
        .map(str::to_string)
        .or_else(|| {
            generate_name
                .as_deref()
                .map(|name| name.trim_end_matches('-').to_string())
                .filter(|name| !name.is_empty())
        })
        .unwrap_or_else(|| EDITOR_CONTRIBUTION.to_string());
    let name = if suffix.is_empty() {
        base_name
    } else {
        format!("{}-{}", base_name, suffix)
    };
    metadata.insert("name".into(), name.into());
    if let Some(generate_name) = generate_name {
        metadata.insert("generateName".into(), generate_name.into());
    }

    editor.shift_remove("metadata");
    editor.shift_remove("schemaVersion");

    resource(DEV_WORKSPACE_TEMPLATE_KIND, metadata, Value::Mapping(editor))
}

/// Wrap a copy of the devfile into a `DevWorkspace` contributing `editor_template`.
fn dev_workspace(devfile: &Mapping, editor_template: &str) -> Mapping {
    let mut metadata = Mapping::new();
    if let Some(name) = metadata_str(devfile, "name") {
        metadata.insert("name".into(), name.into());
    }
    if let Some(generate_name) = metadata_str(devfile, "generateName") {
        metadata.insert("generateName".into(), generate_name.into());
    }

    let mut template = devfile.clone();
    merge_metadata_attributes(&mut template);
    template.shift_remove("schemaVersion");
    template.shift_remove("metadata");

    if let Some(annotations) = extract_annotations(&mut template) {
        metadata.insert("annotations".into(), Value::Mapping(annotations));
    }

    // Only the first starter project is used
    let starter = template
        .get("starterProjects")
        .and_then(Value::as_sequence)
        .and_then(|projects| projects.first())
        .and_then(|project| project.get("name"))
        .cloned();
    if let Some(starter) = starter {
        mapping_entry(&mut template, "attributes")
            .insert(USE_STARTER_PROJECT_ATTRIBUTE.into(), starter);
    }

    let mut kubernetes = Mapping::new();
    kubernetes.insert("name".into(), editor_template.into());
    let mut contribution = Mapping::new();
    contribution.insert("name".into(), EDITOR_CONTRIBUTION.into());
    contribution.insert("kubernetes".into(), Value::Mapping(kubernetes));

    let mut spec = Mapping::new();
    spec.insert("started".into(), true.into());
    spec.insert("routingClass".into(), "che".into());
    spec.insert("template".into(), Value::Mapping(template));
    spec.insert(
        "contributions".into(),
        Value::Sequence(vec![Value::Mapping(contribution)]),
    );

    resource(DEV_WORKSPACE_KIND, metadata, Value::Mapping(spec))
}

fn resource(kind: &str, metadata: Mapping, spec: Value) -> Mapping {
    let mut resource = Mapping::new();
    resource.insert("apiVersion".into(), API_VERSION.into());
    resource.insert("kind".into(), kind.into());
    resource.insert("metadata".into(), Value::Mapping(metadata));
    resource.insert("spec".into(), spec);
    resource
}
