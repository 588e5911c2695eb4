use std::collections::BTreeMap;

use super::graph::{ContainerType, DiagramGraph, DiagramNode, NodeKind};
use super::DiagramLevel;

/// Style class name and its `classDef` body, per node type
const CLASS_STYLES: &[(&str, &str)] = &[
    ("person", "fill:#08427b,stroke:#052e56,color:#ffffff"),
    ("system", "fill:#1168bd,stroke:#0b4884,color:#ffffff"),
    ("external", "fill:#999999,stroke:#6b6b6b,color:#ffffff"),
    ("container", "fill:#438dd5,stroke:#2e6295,color:#ffffff"),
    ("database", "fill:#438dd5,stroke:#2e6295,color:#ffffff"),
    ("queue", "fill:#6f9fd8,stroke:#2e6295,color:#ffffff"),
    ("filesystem", "fill:#5a8fc7,stroke:#2e6295,color:#ffffff"),
    ("webapp", "fill:#3c7fc0,stroke:#2e6295,color:#ffffff"),
    ("component", "fill:#85bbf0,stroke:#5d82a8,color:#000000"),
];

pub(super) fn render(graph: &DiagramGraph, level: DiagramLevel) -> String {
    let direction = match level {
        DiagramLevel::Component => "LR",
        _ => "TB",
    };

    let mut mmd = format!("graph {}\n", direction);

    for node in &graph.nodes {
        mmd.push_str(&format!("    {}\n", node_line(node)));
    }

    for edge in &graph.edges {
        let arrow = if edge.asynchronous { "-.->" } else { "-->" };
        mmd.push_str(&format!(
            "    {} {}|{}| {}\n",
            edge.source,
            arrow,
            escape(&edge.label),
            edge.target
        ));
    }

    // Styling pass
    let mut by_class: BTreeMap<&str, Vec<&str>> = BTreeMap::new();
    for node in &graph.nodes {
        by_class.entry(style_class(node)).or_default().push(&node.id);
    }

    for (class, body) in CLASS_STYLES {
        if by_class.contains_key(class) {
            mmd.push_str(&format!("    classDef {} {}\n", class, body));
        }
    }
    for (class, ids) in &by_class {
        mmd.push_str(&format!("    class {} {}\n", ids.join(","), class));
    }

    mmd
}

fn node_line(node: &DiagramNode) -> String {
    let label = match &node.technology {
        Some(technology) => format!("{}<br/>[{}]", escape(&node.label), escape(technology)),
        None => escape(&node.label),
    };

    match (node.kind, node.container_type) {
        (NodeKind::Person, _) => format!("{}([\"{}\"])", node.id, label),
        (NodeKind::Container, Some(ContainerType::Database)) => {
            format!("{}[(\"{}\")]", node.id, label)
        }
        (NodeKind::Container, Some(ContainerType::MessageBus)) => {
            format!("{}>\"{}\"]", node.id, label)
        }
        (NodeKind::Container, Some(ContainerType::FileSystem)) => {
            format!("{}[[\"{}\"]]", node.id, label)
        }
        _ => format!("{}[\"{}\"]", node.id, label),
    }
}

fn style_class(node: &DiagramNode) -> &'static str {
    match (node.kind, node.container_type) {
        (NodeKind::Person, _) => "person",
        (NodeKind::System, _) => "system",
        (NodeKind::ExternalSystem, _) => "external",
        (NodeKind::Container, Some(ContainerType::Database)) => "database",
        (NodeKind::Container, Some(ContainerType::MessageBus)) => "queue",
        (NodeKind::Container, Some(ContainerType::FileSystem)) => "filesystem",
        (NodeKind::Container, Some(ContainerType::WebApp)) => "webapp",
        (NodeKind::Container, _) => "container",
        (NodeKind::Component, _) => "component",
    }
}

/// Entity-encode characters that end a label early
fn escape(text: &str) -> String {
    text.replace('"', "#quot;").replace('|', "#124;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_label_delimiters() {
        assert_eq!(escape("a|b"), "a#124;b");
        assert_eq!(escape("say \"hi\""), "say #quot;hi#quot;");
    }
}
