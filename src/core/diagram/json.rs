use serde_json::{json, Map, Value};

use super::graph::{DiagramGraph, DiagramNode, NodeKind};

pub(super) fn render(graph: &DiagramGraph) -> Value {
    let nodes: Vec<Value> = graph.nodes.iter().map(render_node).collect();

    let edges: Vec<Value> = graph
        .edges
        .iter()
        .map(|edge| {
            json!({
                "id": edge.id,
                "source": edge.source,
                "target": edge.target,
                "type": "relationship",
                "data": {
                    "label": edge.label,
                    "async": edge.asynchronous,
                    "style": if edge.asynchronous { "dashed" } else { "solid" },
                },
            })
        })
        .collect();

    json!({ "nodes": nodes, "edges": edges })
}

fn render_node(node: &DiagramNode) -> Value {
    let node_type = match node.kind {
        NodeKind::Person => "person",
        NodeKind::System | NodeKind::ExternalSystem => "system",
        NodeKind::Container => "container",
        NodeKind::Component => "component",
    };

    let mut data = Map::new();
    data.insert("label".to_string(), json!(node.label));
    data.insert("description".to_string(), json!(node.description));
    if matches!(node.kind, NodeKind::System | NodeKind::ExternalSystem) {
        data.insert(
            "external".to_string(),
            json!(node.kind == NodeKind::ExternalSystem),
        );
    }
    if let Some(technology) = &node.technology {
        data.insert("technology".to_string(), json!(technology));
    }
    if let Some(container_type) = node.container_type {
        data.insert("containerType".to_string(), json!(container_type.as_str()));
    }

    json!({
        "id": node.id,
        "type": node_type,
        "data": data,
    })
}
