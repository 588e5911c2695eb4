//! C4 architecture diagrams for compositions
//!
//! A diagram is produced in two steps: the requested level decides which nodes
//! and edges exist (see [`graph`]), and the requested format decides how that
//! graph is written out. Keeping the steps apart means every format shows the
//! same nodes with the same labels.

pub mod graph;
mod json;
mod mermaid;
mod plantuml;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::debug;

use crate::config::DiagramConfig;
use crate::error::EngineError;
use super::composition::ConstructComposition;
use super::construct::ConstructCatalog;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagramLevel {
    Context,
    Container,
    Component,
    /// Source-level diagrams are not generated; the graph is always empty
    Code,
}

impl DiagramLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            DiagramLevel::Context => "context",
            DiagramLevel::Container => "container",
            DiagramLevel::Component => "component",
            DiagramLevel::Code => "code",
        }
    }

    fn title(&self) -> &'static str {
        match self {
            DiagramLevel::Context => "Context",
            DiagramLevel::Container => "Container",
            DiagramLevel::Component => "Component",
            DiagramLevel::Code => "Code",
        }
    }
}

impl fmt::Display for DiagramLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DiagramLevel {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "context" => Ok(DiagramLevel::Context),
            "container" => Ok(DiagramLevel::Container),
            "component" => Ok(DiagramLevel::Component),
            "code" => Ok(DiagramLevel::Code),
            other => Err(EngineError::InvalidArgument(format!(
                "unknown diagram level '{}'",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagramFormat {
    Json,
    PlantUml,
    Mermaid,
}

impl DiagramFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            DiagramFormat::Json => "json",
            DiagramFormat::PlantUml => "plantuml",
            DiagramFormat::Mermaid => "mermaid",
        }
    }
}

impl fmt::Display for DiagramFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DiagramFormat {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(DiagramFormat::Json),
            "plantuml" | "puml" => Ok(DiagramFormat::PlantUml),
            "mermaid" | "mmd" => Ok(DiagramFormat::Mermaid),
            other => Err(EngineError::InvalidArgument(format!(
                "unknown diagram format '{}'",
                other
            ))),
        }
    }
}

/// Rendered diagram body: script text or a structured node/edge document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DiagramContent {
    Text(String),
    Structured(serde_json::Value),
}

impl DiagramContent {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            DiagramContent::Text(text) => Some(text),
            DiagramContent::Structured(_) => None,
        }
    }

    pub fn as_structured(&self) -> Option<&serde_json::Value> {
        match self {
            DiagramContent::Structured(value) => Some(value),
            DiagramContent::Text(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiagramMetadata {
    pub title: String,
    pub description: String,
    pub author: String,
    pub version: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct C4Diagram {
    pub level: DiagramLevel,
    pub format: DiagramFormat,
    pub content: DiagramContent,
    pub metadata: DiagramMetadata,
}

/// Renders compositions as C4 diagrams
pub struct DiagramGenerator {
    config: DiagramConfig,
}

impl DiagramGenerator {
    pub fn new() -> Self {
        Self::with_config(DiagramConfig::default())
    }

    pub fn with_config(config: DiagramConfig) -> Self {
        Self { config }
    }

    pub fn generate(
        &self,
        composition: &ConstructComposition,
        level: DiagramLevel,
        format: DiagramFormat,
        catalog: &ConstructCatalog,
    ) -> C4Diagram {
        let graph = graph::build(composition, level, catalog);
        let metadata = self.metadata(composition, level);

        debug!(
            "Generating {} {} diagram for '{}': {} nodes, {} edges",
            level,
            format,
            composition.name,
            graph.nodes.len(),
            graph.edges.len()
        );

        let content = match format {
            DiagramFormat::Json => DiagramContent::Structured(json::render(&graph)),
            DiagramFormat::PlantUml => {
                DiagramContent::Text(plantuml::render(&graph, level, &metadata.title))
            }
            DiagramFormat::Mermaid => DiagramContent::Text(mermaid::render(&graph, level)),
        };

        C4Diagram {
            level,
            format,
            content,
            metadata,
        }
    }

    fn metadata(&self, composition: &ConstructComposition, level: DiagramLevel) -> DiagramMetadata {
        DiagramMetadata {
            title: format!("{} - {} Diagram", composition.name, level.title()),
            description: composition.metadata.description.clone().unwrap_or_else(|| {
                format!("C4 {} diagram for {}", level.as_str(), composition.name)
            }),
            author: composition
                .metadata
                .author
                .clone()
                .unwrap_or_else(|| self.config.author.clone()),
            version: composition.metadata.version.clone(),
        }
    }
}

impl Default for DiagramGenerator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_parsing() {
        assert_eq!("PlantUML".parse::<DiagramFormat>().unwrap(), DiagramFormat::PlantUml);
        assert_eq!("mmd".parse::<DiagramFormat>().unwrap(), DiagramFormat::Mermaid);
        assert!("svg".parse::<DiagramFormat>().is_err());
    }

    #[test]
    fn test_level_parsing() {
        assert_eq!("Component".parse::<DiagramLevel>().unwrap(), DiagramLevel::Component);
        assert!("deployment".parse::<DiagramLevel>().is_err());
    }

    #[test]
    fn test_content_serializes_untagged() {
        let text = serde_json::to_value(DiagramContent::Text("graph TB".to_string())).unwrap();
        assert_eq!(text, serde_json::json!("graph TB"));
    }
}
