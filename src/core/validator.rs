use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap, HashSet};
use tracing::debug;

use super::composition::ConstructComposition;
use super::construct::ConstructCatalog;

const AUTH_KEYWORDS: &[&str] = &["auth", "security"];
const COST_OPTIMIZED_TAG: &str = "cost-optimized";
const MAX_DISTINCT_LEVELS: usize = 2;
const MAX_DISTINCT_PROVIDERS: usize = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueSeverity {
    Error,
}

/// A structural problem located by its path inside the composition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationError {
    pub path: String,
    pub message: String,
    pub severity: IssueSeverity,
}

impl ValidationError {
    fn new(path: String, message: String) -> Self {
        Self {
            path,
            message,
            severity: IssueSeverity::Error,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub valid: bool,
    pub errors: Vec<ValidationError>,
    pub warnings: Vec<String>,
    pub suggestions: Vec<String>,
}

/// Checks a composition against a catalog, collecting every problem in one pass
pub struct CompositionValidator<'a> {
    catalog: &'a ConstructCatalog,
}

impl<'a> CompositionValidator<'a> {
    pub fn new(catalog: &'a ConstructCatalog) -> Self {
        Self { catalog }
    }

    pub fn validate(&self, composition: &ConstructComposition) -> ValidationResult {
        let mut errors = Vec::new();

        self.check_instance_names(composition, &mut errors);
        self.check_references(composition, &mut errors);
        self.check_connections(composition, &mut errors);

        let warnings = self.compatibility_warnings(composition);
        let suggestions = self.suggestions(composition);

        debug!(
            "Validated composition '{}': {} errors, {} warnings, {} suggestions",
            composition.name,
            errors.len(),
            warnings.len(),
            suggestions.len()
        );

        ValidationResult {
            valid: errors.is_empty(),
            errors,
            warnings,
            suggestions,
        }
    }

    fn check_instance_names(&self, composition: &ConstructComposition, errors: &mut Vec<ValidationError>) {
        let mut seen = HashSet::new();

        for (index, instance) in composition.instances.iter().enumerate() {
            if !seen.insert(instance.instance_name.as_str()) {
                errors.push(ValidationError::new(
                    format!("instances[{}].instanceName", index),
                    format!("Duplicate instance name '{}'", instance.instance_name),
                ));
            }
        }
    }

    fn check_references(&self, composition: &ConstructComposition, errors: &mut Vec<ValidationError>) {
        for (index, instance) in composition.instances.iter().enumerate() {
            let Some(definition) = self.catalog.get(&instance.construct_id) else {
                errors.push(ValidationError::new(
                    format!("instances[{}].constructId", index),
                    format!(
                        "Construct '{}' referenced by instance '{}' not found in catalog",
                        instance.construct_id, instance.instance_name
                    ),
                ));
                continue;
            };

            for (input_name, input) in &definition.inputs {
                if input.required && !instance.config.contains_key(input_name) {
                    errors.push(ValidationError::new(
                        format!("instances[{}].config.{}", index, input_name),
                        format!(
                            "Missing required input '{}' for construct '{}'",
                            input_name, definition.id
                        ),
                    ));
                }
            }
        }
    }

    /// Unknown targets and cycles
    ///
    /// Edges are accepted in declaration order; a proposed edge closes a cycle
    /// when its target already reaches its source through accepted edges.
    fn check_connections(&self, composition: &ConstructComposition, errors: &mut Vec<ValidationError>) {
        let known: HashSet<&str> = composition
            .instances
            .iter()
            .map(|i| i.instance_name.as_str())
            .collect();
        let mut accepted: HashMap<&str, Vec<&str>> = HashMap::new();

        for (index, instance) in composition.instances.iter().enumerate() {
            let source = instance.instance_name.as_str();

            for (conn_index, connection) in instance.connections.iter().enumerate() {
                let target = connection.target_instance.as_str();

                if !known.contains(target) {
                    errors.push(ValidationError::new(
                        format!("instances[{}].connections[{}].targetInstance", index, conn_index),
                        format!(
                            "Connection from '{}' targets unknown instance '{}'",
                            source, target
                        ),
                    ));
                    continue;
                }

                if reaches(&accepted, target, source) {
                    errors.push(ValidationError::new(
                        format!("instances[{}].connections[{}]", index, conn_index),
                        format!(
                            "Connection from '{}' to '{}' would create a cycle",
                            source, target
                        ),
                    ));
                    continue;
                }

                accepted.entry(source).or_default().push(target);
            }
        }
    }

    fn compatibility_warnings(&self, composition: &ConstructComposition) -> Vec<String> {
        let mut warnings = Vec::new();
        let mut levels = BTreeSet::new();
        let mut providers = BTreeSet::new();

        for definition in composition
            .instances
            .iter()
            .filter_map(|i| self.catalog.get(&i.construct_id))
        {
            levels.insert(definition.level);
            providers.extend(definition.providers.iter().map(String::as_str));
        }

        if levels.len() > MAX_DISTINCT_LEVELS {
            let names: Vec<&str> = levels.iter().map(|l| l.as_str()).collect();
            warnings.push(format!(
                "Composition mixes {} construct levels ({}); consider aligning abstraction levels",
                levels.len(),
                names.join(", ")
            ));
        }

        if providers.len() > MAX_DISTINCT_PROVIDERS {
            let names: Vec<&str> = providers.into_iter().collect();
            warnings.push(format!(
                "Composition spans multiple providers: {}",
                names.join(", ")
            ));
        }

        warnings
    }

    fn suggestions(&self, composition: &ConstructComposition) -> Vec<String> {
        let mut suggestions = Vec::new();

        let has_security = composition.instances.iter().any(|instance| {
            let id = instance.construct_id.to_lowercase();
            let category = self
                .catalog
                .get(&instance.construct_id)
                .map(|d| d.category().to_lowercase())
                .unwrap_or_default();
            AUTH_KEYWORDS
                .iter()
                .any(|k| id.contains(k) || category.contains(k))
        });
        if !has_security {
            suggestions.push(
                "Consider adding an authentication or security construct to protect this composition"
                    .to_string(),
            );
        }

        let has_cost_optimized = composition
            .instances
            .iter()
            .filter_map(|i| self.catalog.get(&i.construct_id))
            .any(|d| d.has_tag(COST_OPTIMIZED_TAG));
        if !has_cost_optimized {
            suggestions.push(
                "Review cost-optimized variants of the selected constructs".to_string(),
            );
        }

        suggestions
    }
}

/// Depth-first search over accepted edges from `start` looking for `goal`
fn reaches(adjacency: &HashMap<&str, Vec<&str>>, start: &str, goal: &str) -> bool {
    let mut visited = HashSet::new();
    let mut stack = vec![start];

    while let Some(node) = stack.pop() {
        if node == goal {
            return true;
        }
        if !visited.insert(node) {
            continue;
        }
        if let Some(next) = adjacency.get(node) {
            stack.extend(next.iter().copied());
        }
    }

    false
}
