//! Configuration layer merging logic
//!
//! Implements the 2-layer merge strategy:
//! Global -> Project

use super::schema::{EditorSection, GeneratorConfig, GeneratorSection, HttpSection};

/// Merge configuration layers
///
/// # Arguments
/// * `global` - Global configuration from ~/.config/dwgen/dwgen.toml
/// * `project` - Project configuration from ./dwgen.toml
///
/// # Returns
/// Merged configuration where every value set in the project layer wins
pub fn merge_configs(
    global: Option<GeneratorConfig>,
    project: Option<GeneratorConfig>,
) -> GeneratorConfig {
    let mut merged = global.unwrap_or_default();

    if let Some(layer) = project {
        merge_generator_section(&mut merged.generator, layer.generator);
        merge_editor_section(&mut merged.editor, layer.editor);
        merge_http_section(&mut merged.http, layer.http);
    }

    merged
}

fn merge_generator_section(base: &mut GeneratorSection, layer: GeneratorSection) {
    if layer.inject_default_component.is_some() {
        base.inject_default_component = layer.inject_default_component;
    }
    if layer.default_component_image.is_some() {
        base.default_component_image = layer.default_component_image;
    }
}

fn merge_editor_section(base: &mut EditorSection, layer: EditorSection) {
    if layer.url.is_some() {
        base.url = layer.url;
    }
}

fn merge_http_section(base: &mut HttpSection, layer: HttpSection) {
    if layer.timeout_secs.is_some() {
        base.timeout_secs = layer.timeout_secs;
    }
    if layer.user_agent.is_some() {
        base.user_agent = layer.user_agent;
    }
}
