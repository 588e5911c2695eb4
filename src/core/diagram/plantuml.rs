use super::graph::{ContainerType, DiagramGraph, DiagramNode, NodeKind};
use super::DiagramLevel;

const C4_STDLIB: &str = "https://raw.githubusercontent.com/plantuml-stdlib/C4-PlantUML/master";
const ASYNC_TAG: &str = "async";

pub(super) fn render(graph: &DiagramGraph, level: DiagramLevel, title: &str) -> String {
    let mut puml = String::new();

    puml.push_str("@startuml\n");
    puml.push_str(&format!("!include {}/{}\n\n", C4_STDLIB, include_for(level)));
    puml.push_str(&format!("title {}\n\n", title));

    if graph.edges.iter().any(|e| e.asynchronous) {
        puml.push_str(&format!(
            "AddRelTag(\"{}\", $lineStyle = DashedLine())\n\n",
            ASYNC_TAG
        ));
    }

    if level == DiagramLevel::Code {
        puml.push_str("' Code-level diagrams are not generated for constructs\n");
    }

    for node in &graph.nodes {
        puml.push_str(&node_statement(node));
        puml.push('\n');
    }

    if !graph.edges.is_empty() {
        puml.push('\n');
    }

    for edge in &graph.edges {
        if edge.asynchronous {
            puml.push_str(&format!(
                "Rel({}, {}, \"{}\", $tags=\"{}\")\n",
                edge.source,
                edge.target,
                escape(&edge.label),
                ASYNC_TAG
            ));
        } else {
            puml.push_str(&format!(
                "Rel({}, {}, \"{}\")\n",
                edge.source,
                edge.target,
                escape(&edge.label)
            ));
        }
    }

    puml.push_str("@enduml\n");
    puml
}

fn include_for(level: DiagramLevel) -> &'static str {
    match level {
        DiagramLevel::Context => "C4_Context.puml",
        DiagramLevel::Container => "C4_Container.puml",
        DiagramLevel::Component | DiagramLevel::Code => "C4_Component.puml",
    }
}

fn node_statement(node: &DiagramNode) -> String {
    let label = escape(&node.label);
    let description = escape(&node.description);
    let technology = escape(node.technology.as_deref().unwrap_or_default());

    match node.kind {
        NodeKind::Person => format!("Person({}, \"{}\", \"{}\")", node.id, label, description),
        NodeKind::System => format!("System({}, \"{}\", \"{}\")", node.id, label, description),
        NodeKind::ExternalSystem => {
            format!("System_Ext({}, \"{}\", \"{}\")", node.id, label, description)
        }
        NodeKind::Container => {
            let macro_name = match node.container_type {
                Some(ContainerType::Database) | Some(ContainerType::FileSystem) => "ContainerDb",
                Some(ContainerType::MessageBus) => "ContainerQueue",
                _ => "Container",
            };
            format!(
                "{}({}, \"{}\", \"{}\", \"{}\")",
                macro_name, node.id, label, technology, description
            )
        }
        NodeKind::Component => format!(
            "Component({}, \"{}\", \"{}\", \"{}\")",
            node.id, label, technology, description
        ),
    }
}

fn escape(text: &str) -> String {
    text.replace('"', "'").replace('\n', " ")
}
