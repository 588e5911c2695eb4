// src/core/composition.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Canvas coordinates of an instance
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

/// Directed link from one instance to another
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Connection {
    pub target_instance: String,
    /// Communication style, e.g. `sync`, `async`, `event`
    #[serde(rename = "type")]
    pub connection_type: String,
    #[serde(default)]
    pub config: BTreeMap<String, serde_json::Value>,
}

impl Connection {
    pub fn new(target_instance: impl Into<String>, connection_type: impl Into<String>) -> Self {
        Self {
            target_instance: target_instance.into(),
            connection_type: connection_type.into(),
            config: BTreeMap::new(),
        }
    }

    /// Whether the connection denotes asynchronous communication
    pub fn is_async(&self) -> bool {
        let kind = self.connection_type.to_ascii_lowercase();
        kind.contains("async")
            || matches!(
                kind.as_str(),
                "event" | "events" | "queue" | "pubsub" | "stream" | "message" | "messaging"
            )
    }
}

/// A construct placed into a composition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConstructInstance {
    pub construct_id: String,
    pub instance_name: String,
    #[serde(default)]
    pub config: BTreeMap<String, serde_json::Value>,
    #[serde(default)]
    pub connections: Vec<Connection>,
    pub position: Position,
}

/// Caller-supplied description of one instance, before layout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstanceSpec {
    pub construct_id: String,
    pub instance_name: String,
    #[serde(default)]
    pub config: BTreeMap<String, serde_json::Value>,
    #[serde(default)]
    pub connections: Vec<Connection>,
    #[serde(default)]
    pub position: Option<Position>,
}

impl InstanceSpec {
    pub fn new(construct_id: impl Into<String>, instance_name: impl Into<String>) -> Self {
        Self {
            construct_id: construct_id.into(),
            instance_name: instance_name.into(),
            config: BTreeMap::new(),
            connections: Vec::new(),
            position: None,
        }
    }

    pub fn with_config(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.config.insert(key.into(), value);
        self
    }

    pub fn connect(mut self, target_instance: impl Into<String>, connection_type: impl Into<String>) -> Self {
        self.connections.push(Connection::new(target_instance, connection_type));
        self
    }

    pub fn at(mut self, x: f64, y: f64) -> Self {
        self.position = Some(Position { x, y });
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompositionMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// A directed graph of named construct instances
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConstructComposition {
    pub id: String,
    pub name: String,
    pub metadata: CompositionMetadata,
    pub instances: Vec<ConstructInstance>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_async_connection_types() {
        assert!(Connection::new("b", "async").is_async());
        assert!(Connection::new("b", "async-http").is_async());
        assert!(Connection::new("b", "event").is_async());
        assert!(Connection::new("b", "Queue").is_async());
        assert!(!Connection::new("b", "sync").is_async());
        assert!(!Connection::new("b", "http").is_async());
    }

    #[test]
    fn test_instance_spec_wire_format() {
        let spec: InstanceSpec = serde_json::from_value(serde_json::json!({
            "constructId": "aws-l1-api",
            "instanceName": "api",
            "connections": [{ "targetInstance": "db", "type": "sync" }]
        }))
        .unwrap();

        assert_eq!(spec.connections[0].target_instance, "db");
        assert_eq!(spec.connections[0].connection_type, "sync");
        assert!(spec.position.is_none());
        assert!(spec.config.is_empty());
    }
}
