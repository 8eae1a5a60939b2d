//! Runtime container lookup and injection.

use serde_yaml::{Mapping, Value};
use tracing::{debug, warn};

use crate::generate::DevfileContext;

/// Name of the injected runtime component
pub const DEFAULT_COMPONENT_NAME: &str = "dev";

/// Component attribute controlling whether a container takes editor contributions
pub const MERGE_CONTRIBUTION_ATTRIBUTE: &str = "controller.devfile.io/merge-contribution";

/// Finds the container component a workspace runs in, and adds one when the
/// devfile has none.
#[derive(Debug, Clone, Default)]
pub struct ComponentResolver;

impl ComponentResolver {
    pub fn new() -> Self {
        Self
    }

    /// Name of the runtime container among `components`.
    ///
    /// Containers opted out of merge contributions are not candidates; among
    /// the rest, one opted in explicitly wins over document order.
    pub fn find_dev_container<'a>(&self, components: &'a [Value]) -> Option<&'a Value> {
        let candidates: Vec<&Value> = components
            .iter()
            .filter(|component| component.get("container").is_some_and(Value::is_mapping))
            .filter(|component| merge_contribution(component) != Some(false))
            .collect();

        candidates
            .iter()
            .find(|component| merge_contribution(component) == Some(true))
            .or_else(|| candidates.first())
            .copied()
    }

    /// Make sure the DevWorkspace template has a runtime container.
    ///
    /// Returns the name of the injected component, if any. Devfiles with a
    /// `parent` are left alone since the parent provides the runtime.
    pub fn ensure_dev_container_component(
        &self,
        context: &mut DevfileContext,
        inject_default_component: bool,
        default_component_image: &str,
    ) -> Option<String> {
        let Some(template) = context
            .dev_workspace
            .get_mut("spec")
            .and_then(|spec| spec.get_mut("template"))
            .and_then(Value::as_mapping_mut)
        else {
            warn!("DevWorkspace has no template, skipping runtime component lookup");
            return None;
        };

        if template.contains_key("parent") {
            debug!("Devfile has a parent, runtime component is inherited");
            return None;
        }

        let components = template
            .get("components")
            .and_then(Value::as_sequence)
            .map(Vec::as_slice)
            .unwrap_or_default();

        if let Some(found) = self.find_dev_container(components) {
            let name = found.get("name").and_then(Value::as_str).unwrap_or("<unnamed>");
            debug!("Using component {} as runtime container", name);
            return None;
        }

        if !inject_default_component {
            warn!("No runtime container component found in devfile");
            return None;
        }

        let name = unique_name(components, DEFAULT_COMPONENT_NAME);
        let mut container = Mapping::new();
        container.insert("image".into(), default_component_image.into());
        let mut component = Mapping::new();
        component.insert("name".into(), name.clone().into());
        component.insert("container".into(), Value::Mapping(container));

        let slot = template
            .entry("components".into())
            .or_insert_with(|| Value::Sequence(Vec::new()));
        if !slot.is_sequence() {
            *slot = Value::Sequence(Vec::new());
        }
        if let Value::Sequence(components) = slot {
            components.push(Value::Mapping(component));
        }

        debug!(
            "Injected runtime component {} with image {}",
            name, default_component_image
        );
        Some(name)
    }
}

fn merge_contribution(component: &Value) -> Option<bool> {
    component
        .get("attributes")?
        .get(MERGE_CONTRIBUTION_ATTRIBUTE)?
        .as_bool()
}

/// `base`, or `base-<n>` when a component already uses that name.
fn unique_name(components: &[Value], base: &str) -> String {
    let taken = |name: &str| {
        components
            .iter()
            .any(|component| component.get("name").and_then(Value::as_str) == Some(name))
    };
    if !taken(base) {
        return base.to_string();
    }
    (1..)
        .map(|n| format!("{}-{}", base, n))
        .find(|name| !taken(name))
        .unwrap_or_else(|| base.to_string())
}
