// src/core/engine.rs
use std::path::Path;

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config::Config;
use super::{
    C4Diagram, CatalogBuilder, ConstructAnalyzer, ConstructCatalog, ConstructComposer,
    ConstructComposition, ConstructDefinition, ConstructLevel, ConstructSource, CostCalculator,
    CostEstimate, DiagramFormat, DiagramGenerator, DiagramLevel, InstanceSpec, UsageAssumptions,
    ValidationResult,
};

/// File format accepted by `compose`: a name plus ordered instance specs
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompositionRequest {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub author: Option<String>,
    pub instances: Vec<InstanceSpec>,
}

/// Wires configuration, the four engine components and file I/O together
pub struct Engine {
    config: Config,
    analyzer: ConstructAnalyzer,
    composer: ConstructComposer,
    cost_calculator: CostCalculator,
    diagram_generator: DiagramGenerator,
}

impl Engine {
    pub fn new(config_path: Option<&Path>) -> Result<Self> {
        let config = Config::load_or_default(config_path)?;
        Self::with_config(config)
    }

    pub fn with_config(config: Config) -> Result<Self> {
        debug!("Loaded configuration: {:?}", config);

        let analyzer = ConstructAnalyzer::with_config(&config.analysis)?;
        let composer = ConstructComposer::with_layout(config.layout.clone());
        let cost_calculator = CostCalculator::with_config(config.cost.clone());
        let diagram_generator = DiagramGenerator::with_config(config.diagram.clone());

        Ok(Self {
            config,
            analyzer,
            composer,
            cost_calculator,
            diagram_generator,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Analyze one source file into a construct definition
    pub fn analyze(&self, path: &Path, mut source: ConstructSource) -> Result<ConstructDefinition> {
        source.source_code = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;

        info!("🔍 Analyzing {} as {} construct '{}'", path.display(), source.level, source.name);
        let definition = self.analyzer.create_from_code(&source);

        if !definition.security.is_empty() {
            warn!(
                "{} security considerations found for '{}'",
                definition.security.len(),
                definition.id
            );
        }

        Ok(definition)
    }

    /// Language for a file from the configured extension map
    pub fn detect_language(&self, path: &Path) -> Option<String> {
        CatalogBuilder::new(&self.config.analysis, &self.analyzer)
            .detect_language(path)
            .map(str::to_string)
    }

    /// Build a catalog from every supported source file under `dir`
    pub fn build_catalog(&self, dir: &Path, level: ConstructLevel, provider: &str) -> Result<ConstructCatalog> {
        info!("📚 Building {} catalog from {}", provider, dir.display());

        let catalog = CatalogBuilder::new(&self.config.analysis, &self.analyzer)
            .build_from_directory(dir, level, provider)
            .with_context(|| format!("Failed to build catalog from {}", dir.display()))?;

        info!("Catalog contains {} constructs", catalog.len());
        Ok(catalog)
    }

    pub fn compose(&self, request: CompositionRequest, catalog: &ConstructCatalog) -> Result<ConstructComposition> {
        let mut composition = self.composer.compose(&request.name, request.instances, catalog)?;
        composition.metadata.description = request.description;
        composition.metadata.author = request.author;
        Ok(composition)
    }

    pub fn validate(&self, composition: &ConstructComposition, catalog: &ConstructCatalog) -> ValidationResult {
        let result = self.composer.validate(composition, catalog);

        if result.valid {
            info!("✅ Composition '{}' is valid", composition.name);
        } else {
            warn!(
                "❌ Composition '{}' has {} errors",
                composition.name,
                result.errors.len()
            );
        }

        result
    }

    pub fn estimate(
        &self,
        composition: &ConstructComposition,
        provider: &str,
        region: Option<&str>,
        usage: Option<&UsageAssumptions>,
        catalog: &ConstructCatalog,
    ) -> CostEstimate {
        self.cost_calculator
            .estimate_composition(composition, provider, region, usage, catalog)
    }

    /// Estimate a single catalog construct outside any composition
    pub fn estimate_construct(
        &self,
        construct_id: &str,
        provider: &str,
        region: Option<&str>,
        usage: Option<&UsageAssumptions>,
        catalog: &ConstructCatalog,
    ) -> Result<CostEstimate> {
        let definition = catalog
            .get(construct_id)
            .with_context(|| format!("Construct '{}' is not in the catalog", construct_id))?;

        Ok(self
            .cost_calculator
            .estimate_construct(definition, provider, region, usage))
    }

    pub fn diagram(
        &self,
        composition: &ConstructComposition,
        level: DiagramLevel,
        format: DiagramFormat,
        catalog: &ConstructCatalog,
    ) -> C4Diagram {
        self.diagram_generator.generate(composition, level, format, catalog)
    }
}

/// Read and deserialize a JSON file
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("Failed to parse {}", path.display()))
}

/// Write a value as pretty JSON to `path`, or stdout when no path is given
pub fn write_json<T: Serialize>(value: &T, path: Option<&Path>) -> Result<()> {
    let content = serde_json::to_string_pretty(value)?;

    match path {
        Some(path) => std::fs::write(path, content)
            .with_context(|| format!("Failed to write {}", path.display()))?,
        None => println!("{}", content),
    }

    Ok(())
}
