// src/core/mod.rs
mod analyzer;
mod catalog_builder;
mod clock;
mod composer;
mod composition;
mod construct;
mod cost;
mod engine;
mod security;
mod validator;

// Diagram generation
pub mod diagram;

// Language-specific source scanners
pub mod languages;

pub use analyzer::{runtime_for, ConstructAnalyzer, ConstructSource};
pub use catalog_builder::CatalogBuilder;
pub use clock::{to_base36, Clock, FixedClock, SystemClock};
pub use composer::ConstructComposer;
pub use composition::{
    CompositionMetadata, Connection, ConstructComposition, ConstructInstance, InstanceSpec,
    Position,
};
pub use construct::{
    slugify, ConstructCatalog, ConstructDefinition, ConstructLevel, ConstructMetadata, CostModel,
    Implementation, PropertyDescriptor, SecurityConsideration, Severity, UsagePricing,
};
pub use cost::{
    region_multiplier, CostCalculator, CostEstimate, CostLineItem, CostTotals, UsageAssumptions,
};
pub use diagram::{
    C4Diagram, DiagramContent, DiagramFormat, DiagramGenerator, DiagramLevel, DiagramMetadata,
};
pub use engine::{read_json, write_json, CompositionRequest, Engine};
pub use security::SecurityScanner;
pub use validator::{CompositionValidator, IssueSeverity, ValidationError, ValidationResult};
