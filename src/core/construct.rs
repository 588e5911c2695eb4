// src/core/construct.rs
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

use crate::error::EngineError;

/// Abstraction tier of a construct
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ConstructLevel {
    /// Raw provider resource
    L0,
    /// Resource with built-in best practices
    L1,
    /// Pattern combining L1 constructs
    L2,
    /// Full application assembled from patterns
    L3,
}

impl ConstructLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConstructLevel::L0 => "L0",
            ConstructLevel::L1 => "L1",
            ConstructLevel::L2 => "L2",
            ConstructLevel::L3 => "L3",
        }
    }
}

impl fmt::Display for ConstructLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ConstructLevel {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "L0" => Ok(ConstructLevel::L0),
            "L1" => Ok(ConstructLevel::L1),
            "L2" => Ok(ConstructLevel::L2),
            "L3" => Ok(ConstructLevel::L3),
            other => Err(EngineError::InvalidArgument(format!(
                "unknown construct level '{}' (expected L0-L3)",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConstructMetadata {
    pub name: String,
    pub description: String,
    pub version: String,
    pub category: String,
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
}

/// A named, typed input or output of a construct
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyDescriptor {
    #[serde(rename = "type")]
    pub property_type: String,
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<serde_json::Value>,
}

impl PropertyDescriptor {
    pub fn new(property_type: impl Into<String>, required: bool) -> Self {
        Self {
            property_type: property_type.into(),
            required,
            description: None,
            default: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecurityConsideration {
    #[serde(rename = "type")]
    pub kind: String,
    pub description: String,
    pub severity: Severity,
    pub mitigation: String,
}

/// Per-unit usage prices; absent dimensions are not billed
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsagePricing {
    /// Price per request
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requests: Option<f64>,
    /// Price per GB-month of storage
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage: Option<f64>,
    /// Price per compute hour
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compute: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CostModel {
    /// Fixed monthly cost in `currency`
    pub base_cost: f64,
    #[serde(default = "default_currency")]
    pub currency: String,
    #[serde(default)]
    pub usage_pricing: UsagePricing,
}

fn default_currency() -> String {
    "USD".to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Implementation {
    pub source: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub runtime: Option<String>,
    /// SHA-256 of `source`, for change detection in external catalogs
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_hash: Option<String>,
}

/// A reusable, versioned infrastructure building block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConstructDefinition {
    pub id: String,
    pub level: ConstructLevel,
    pub metadata: ConstructMetadata,
    pub providers: BTreeSet<String>,
    #[serde(default)]
    pub inputs: BTreeMap<String, PropertyDescriptor>,
    #[serde(default)]
    pub outputs: BTreeMap<String, PropertyDescriptor>,
    #[serde(default)]
    pub dependencies: Vec<String>,
    #[serde(default)]
    pub security: Vec<SecurityConsideration>,
    /// Cost models keyed by provider
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub costs: Option<BTreeMap<String, CostModel>>,
    pub implementation: Implementation,
}

impl ConstructDefinition {
    pub fn category(&self) -> &str {
        &self.metadata.category
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.metadata.tags.iter().any(|t| t == tag)
    }

    pub fn cost_model(&self, provider: &str) -> Option<&CostModel> {
        self.costs.as_ref().and_then(|costs| costs.get(provider))
    }
}

/// Externally owned snapshot of construct definitions keyed by id
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConstructCatalog {
    constructs: BTreeMap<String, ConstructDefinition>,
}

impl ConstructCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a definition, returning the one it replaced
    pub fn insert(&mut self, definition: ConstructDefinition) -> Option<ConstructDefinition> {
        self.constructs.insert(definition.id.clone(), definition)
    }

    pub fn get(&self, construct_id: &str) -> Option<&ConstructDefinition> {
        self.constructs.get(construct_id)
    }

    pub fn contains(&self, construct_id: &str) -> bool {
        self.constructs.contains_key(construct_id)
    }

    pub fn len(&self) -> usize {
        self.constructs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.constructs.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ConstructDefinition> {
        self.constructs.values()
    }
}

impl FromIterator<ConstructDefinition> for ConstructCatalog {
    fn from_iter<I: IntoIterator<Item = ConstructDefinition>>(iter: I) -> Self {
        let mut catalog = Self::new();
        for definition in iter {
            catalog.insert(definition);
        }
        catalog
    }
}

/// Lower-case, hyphen-separated form of a display name
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut pending_dash = false;

    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(c.to_ascii_lowercase());
        } else {
            pending_dash = true;
        }
    }

    slug
}

/// Append `value` unless an equal string is already present, keeping first-seen order
pub(crate) fn push_unique(values: &mut Vec<String>, value: impl AsRef<str> + Into<String>) {
    if !values.iter().any(|v| v == value.as_ref()) {
        values.push(value.into());
    }
}
