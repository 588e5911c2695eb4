// Shared fixtures for construct-engine integration tests
#![allow(dead_code)]

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use construct_engine::core::{
    ConstructCatalog, ConstructComposer, ConstructDefinition, ConstructLevel, ConstructMetadata,
    CostModel, FixedClock, Implementation, PropertyDescriptor, UsagePricing,
};

/// 2023-11-14T22:13:20Z
pub const FIXED_MILLIS: i64 = 1_700_000_000_000;

/// Minimal definition with no inputs, outputs or costs
pub fn definition(id: &str, level: ConstructLevel, provider: &str, category: &str) -> ConstructDefinition {
    ConstructDefinition {
        id: id.to_string(),
        level,
        metadata: ConstructMetadata {
            name: id.to_string(),
            description: format!("{} construct", id),
            version: "1.0.0".to_string(),
            category: category.to_string(),
            tags: Vec::new(),
            author: None,
        },
        providers: BTreeSet::from([provider.to_string()]),
        inputs: BTreeMap::new(),
        outputs: BTreeMap::new(),
        dependencies: Vec::new(),
        security: Vec::new(),
        costs: None,
        implementation: Implementation {
            source: String::new(),
            language: Some("typescript".to_string()),
            runtime: Some("nodejs".to_string()),
            content_hash: None,
        },
    }
}

pub fn with_required_input(mut definition: ConstructDefinition, name: &str) -> ConstructDefinition {
    definition
        .inputs
        .insert(name.to_string(), PropertyDescriptor::new("string", true));
    definition
}

pub fn with_tags(mut definition: ConstructDefinition, tags: &[&str]) -> ConstructDefinition {
    definition.metadata.tags = tags.iter().map(|t| t.to_string()).collect();
    definition
}

pub fn with_cost(
    mut definition: ConstructDefinition,
    provider: &str,
    base_cost: f64,
    usage_pricing: UsagePricing,
) -> ConstructDefinition {
    definition.costs.get_or_insert_with(BTreeMap::new).insert(
        provider.to_string(),
        CostModel {
            base_cost,
            currency: "USD".to_string(),
            usage_pricing,
        },
    );
    definition
}

pub fn catalog_of(definitions: impl IntoIterator<Item = ConstructDefinition>) -> ConstructCatalog {
    definitions.into_iter().collect()
}

/// Composer with a frozen clock so ids are reproducible
pub fn fixed_composer() -> ConstructComposer {
    ConstructComposer::new().with_clock(Arc::new(FixedClock::from_millis(FIXED_MILLIS)))
}

/// An API construct calling a database, both on AWS
pub fn api_and_database_catalog() -> ConstructCatalog {
    catalog_of([
        definition("aws-l1-api", ConstructLevel::L1, "aws", "api"),
        definition("aws-l1-db", ConstructLevel::L1, "aws", "database"),
    ])
}
