//! Level-specific diagram graphs shared by every output format

use std::collections::{BTreeSet, HashMap, HashSet};

use super::super::composition::ConstructComposition;
use super::super::construct::{ConstructCatalog, ConstructDefinition};
use super::DiagramLevel;

const DEFAULT_TECHNOLOGY: &str = "Cloud Resource";

/// Words Mermaid treats as syntax; an id equal to one of these breaks the script
const RESERVED_IDS: &[&str] = &[
    "end",
    "graph",
    "flowchart",
    "subgraph",
    "direction",
    "class",
    "classdef",
    "style",
    "linkstyle",
    "click",
    "call",
    "href",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Person,
    System,
    ExternalSystem,
    Container,
    Component,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContainerType {
    Database,
    MessageBus,
    FileSystem,
    WebApp,
    Container,
}

impl ContainerType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContainerType::Database => "Database",
            ContainerType::MessageBus => "MessageBus",
            ContainerType::FileSystem => "FileSystem",
            ContainerType::WebApp => "WebApp",
            ContainerType::Container => "Container",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DiagramNode {
    pub id: String,
    pub kind: NodeKind,
    pub label: String,
    pub description: String,
    pub technology: Option<String>,
    pub container_type: Option<ContainerType>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DiagramEdge {
    pub id: String,
    pub source: String,
    pub target: String,
    pub label: String,
    pub asynchronous: bool,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DiagramGraph {
    pub nodes: Vec<DiagramNode>,
    pub edges: Vec<DiagramEdge>,
}

impl DiagramGraph {
    fn add_node(
        &mut self,
        id: String,
        kind: NodeKind,
        label: impl Into<String>,
        description: impl Into<String>,
    ) -> &mut DiagramNode {
        self.nodes.push(DiagramNode {
            id,
            kind,
            label: label.into(),
            description: description.into(),
            technology: None,
            container_type: None,
        });
        let last = self.nodes.len() - 1;
        &mut self.nodes[last]
    }

    fn add_edge(&mut self, source: &str, target: &str, label: impl Into<String>, asynchronous: bool) {
        let id = format!("e{}_{}_{}", self.edges.len(), source, target);
        self.edges.push(DiagramEdge {
            id,
            source: source.to_string(),
            target: target.to_string(),
            label: label.into(),
            asynchronous,
        });
    }
}

struct ComponentTemplate {
    suffix: &'static str,
    label: &'static str,
    description: &'static str,
}

/// Extra components (and links between them) added for instances of one category
struct ComponentExpansion {
    category: &'static str,
    components: &'static [ComponentTemplate],
    /// (from suffix, to suffix, label); `core` names the instance's Core node
    links: &'static [(&'static str, &'static str, &'static str)],
}

const CORE_SUFFIX: &str = "core";

const COMPONENT_EXPANSIONS: &[ComponentExpansion] = &[ComponentExpansion {
    category: "api",
    components: &[
        ComponentTemplate {
            suffix: "router",
            label: "Router",
            description: "Routes incoming requests",
        },
        ComponentTemplate {
            suffix: "auth",
            label: "Auth",
            description: "Authenticates and authorizes callers",
        },
    ],
    links: &[
        ("router", "auth", "Forwards requests"),
        ("auth", CORE_SUFFIX, "Passes authorized requests"),
    ],
}];

/// Technology label: runtime, else language, else a generic default
pub fn technology_for(definition: Option<&ConstructDefinition>) -> String {
    definition
        .and_then(|d| {
            d.implementation
                .runtime
                .clone()
                .or_else(|| d.implementation.language.clone())
        })
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| DEFAULT_TECHNOLOGY.to_string())
}

pub fn container_type_for(category: &str) -> ContainerType {
    match category {
        "database" => ContainerType::Database,
        "messaging" => ContainerType::MessageBus,
        "storage" => ContainerType::FileSystem,
        "api" => ContainerType::WebApp,
        _ => ContainerType::Container,
    }
}

pub fn provider_label(provider: &str) -> String {
    match provider.to_ascii_lowercase().as_str() {
        "aws" => "AWS".to_string(),
        "gcp" => "Google Cloud".to_string(),
        "azure" => "Azure".to_string(),
        "firebase" => "Firebase".to_string(),
        "kubernetes" => "Kubernetes".to_string(),
        _ => provider.to_string(),
    }
}

/// Identifier safe for PlantUML and Mermaid
pub fn node_id(name: &str) -> String {
    let mut id: String = name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();
    if id.is_empty() || id.starts_with(|c: char| c.is_ascii_digit()) {
        id.insert(0, 'n');
    }
    if RESERVED_IDS.contains(&id.to_ascii_lowercase().as_str()) {
        id.insert_str(0, "n_");
    }
    id
}

/// One node id per instance, unique across the composition
///
/// Names that sanitize to the same id get a numeric suffix in declaration
/// order. Connections resolve through the first instance carrying a name.
#[derive(Debug, Clone, Default)]
pub struct NodeIds {
    by_index: Vec<String>,
    by_name: HashMap<String, String>,
}

impl NodeIds {
    pub fn for_composition(composition: &ConstructComposition) -> Self {
        let mut ids = Self::default();
        let mut taken = HashSet::new();

        for instance in &composition.instances {
            let base = node_id(&instance.instance_name);
            let mut id = base.clone();
            let mut n = 2;
            while taken.contains(&id) {
                id = format!("{}_{}", base, n);
                n += 1;
            }
            taken.insert(id.clone());

            ids.by_name
                .entry(instance.instance_name.clone())
                .or_insert_with(|| id.clone());
            ids.by_index.push(id);
        }

        ids
    }

    /// Id of the instance at `index`
    pub fn instance(&self, index: usize) -> &str {
        &self.by_index[index]
    }

    /// Id of the instance named `instance_name`, if there is one
    pub fn lookup(&self, instance_name: &str) -> Option<&str> {
        self.by_name.get(instance_name).map(String::as_str)
    }
}

pub fn build(
    composition: &ConstructComposition,
    level: DiagramLevel,
    catalog: &ConstructCatalog,
) -> DiagramGraph {
    match level {
        DiagramLevel::Context => build_context(composition, catalog),
        DiagramLevel::Container => build_container(composition, catalog),
        DiagramLevel::Component => build_component(composition, catalog),
        DiagramLevel::Code => DiagramGraph::default(),
    }
}

fn build_context(composition: &ConstructComposition, catalog: &ConstructCatalog) -> DiagramGraph {
    let mut graph = DiagramGraph::default();

    graph.add_node("user".to_string(), NodeKind::Person, "User", "Uses the system");
    graph.add_node(
        "system".to_string(),
        NodeKind::System,
        composition.name.clone(),
        composition
            .metadata
            .description
            .clone()
            .unwrap_or_else(|| format!("{} instances", composition.instances.len())),
    );
    graph.add_edge("user", "system", "Uses", false);

    let providers: BTreeSet<&str> = composition
        .instances
        .iter()
        .filter_map(|i| catalog.get(&i.construct_id))
        .flat_map(|d| d.providers.iter().map(String::as_str))
        .collect();

    for provider in providers {
        let id = format!("provider_{}", node_id(provider));
        graph.add_node(
            id.clone(),
            NodeKind::ExternalSystem,
            provider_label(provider),
            "Cloud provider",
        );
        graph.add_edge("system", &id, "Deploys to", false);
    }

    graph
}

fn build_container(composition: &ConstructComposition, catalog: &ConstructCatalog) -> DiagramGraph {
    let mut graph = DiagramGraph::default();
    let ids = NodeIds::for_composition(composition);

    for (index, instance) in composition.instances.iter().enumerate() {
        let definition = catalog.get(&instance.construct_id);
        let description = definition
            .map(|d| d.metadata.description.clone())
            .unwrap_or_default();
        let category = definition.map(|d| d.category()).unwrap_or_default();

        let node = graph.add_node(
            ids.instance(index).to_string(),
            NodeKind::Container,
            instance.instance_name.clone(),
            description,
        );
        node.technology = Some(technology_for(definition));
        node.container_type = Some(container_type_for(category));
    }

    for (index, instance) in composition.instances.iter().enumerate() {
        for connection in &instance.connections {
            let Some(target) = ids.lookup(&connection.target_instance) else {
                continue;
            };
            graph.add_edge(
                ids.instance(index),
                target,
                connection.connection_type.clone(),
                connection.is_async(),
            );
        }
    }

    graph
}

fn build_component(composition: &ConstructComposition, catalog: &ConstructCatalog) -> DiagramGraph {
    let mut graph = DiagramGraph::default();
    let ids = NodeIds::for_composition(composition);

    for (index, instance) in composition.instances.iter().enumerate() {
        let definition = catalog.get(&instance.construct_id);
        let technology = technology_for(definition);
        let base = ids.instance(index);
        let category = definition.map(|d| d.category()).unwrap_or_default();

        let core = graph.add_node(
            format!("{}_{}", base, CORE_SUFFIX),
            NodeKind::Component,
            format!("{} Core", instance.instance_name),
            definition
                .map(|d| d.metadata.description.clone())
                .unwrap_or_default(),
        );
        core.technology = Some(technology.clone());

        let Some(expansion) = COMPONENT_EXPANSIONS.iter().find(|e| e.category == category) else {
            continue;
        };

        for template in expansion.components {
            let node = graph.add_node(
                format!("{}_{}", base, template.suffix),
                NodeKind::Component,
                template.label,
                template.description,
            );
            node.technology = Some(technology.clone());
        }

        for (from, to, label) in expansion.links {
            graph.add_edge(
                &format!("{}_{}", base, from),
                &format!("{}_{}", base, to),
                *label,
                false,
            );
        }
    }

    graph
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_container_type_lookup() {
        assert_eq!(container_type_for("database"), ContainerType::Database);
        assert_eq!(container_type_for("messaging"), ContainerType::MessageBus);
        assert_eq!(container_type_for("storage"), ContainerType::FileSystem);
        assert_eq!(container_type_for("api"), ContainerType::WebApp);
        assert_eq!(container_type_for("compute"), ContainerType::Container);
    }

    #[test]
    fn test_technology_without_definition() {
        assert_eq!(technology_for(None), "Cloud Resource");
    }

    #[test]
    fn test_node_id_sanitizes() {
        assert_eq!(node_id("orders-db"), "orders_db");
        assert_eq!(node_id("2nd api"), "n2nd_api");
        assert_eq!(node_id(""), "n");
    }

    #[test]
    fn test_node_id_avoids_reserved_words() {
        assert_eq!(node_id("end"), "n_end");
        assert_eq!(node_id("classDef"), "n_classDef");
        assert_eq!(node_id("endpoint"), "endpoint");
    }

    #[test]
    fn test_technology_falls_back_to_language() {
        let mut definition: ConstructDefinition = serde_json::from_value(serde_json::json!({
            "id": "gcp-l1-worker",
            "level": "L1",
            "metadata": {
                "name": "worker",
                "description": "",
                "version": "1.0.0",
                "category": "compute",
                "tags": []
            },
            "providers": ["gcp"],
            "implementation": { "source": "", "language": "python", "runtime": "python3" }
        }))
        .unwrap();
        assert_eq!(technology_for(Some(&definition)), "python3");

        definition.implementation.runtime = None;
        assert_eq!(technology_for(Some(&definition)), "python");

        definition.implementation.language = None;
        assert_eq!(technology_for(Some(&definition)), "Cloud Resource");
    }
}
