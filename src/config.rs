use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

use crate::error::{EngineError, Result};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Source analysis settings
    pub analysis: AnalysisConfig,

    /// Default grid layout for composition instances
    pub layout: LayoutConfig,

    /// Cost estimation rates
    pub cost: CostConfig,

    /// Diagram metadata defaults
    pub diagram: DiagramConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Languages to scan
    pub languages: Vec<String>,

    /// Maximum source file size to analyze (in bytes)
    pub max_file_size: usize,

    /// Extra extension to language mappings, checked before the scanners' own extensions
    pub file_extensions: HashMap<String, String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub origin_x: f64,
    pub origin_y: f64,
    pub cell_width: f64,
    pub cell_height: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CostConfig {
    /// Share of the composition total added as management overhead
    pub management_overhead_rate: f64,

    /// Share of the post-overhead total taken off for larger compositions
    pub efficiency_discount_rate: f64,

    /// Discount applies when the instance count is strictly above this
    pub efficiency_discount_threshold: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DiagramConfig {
    /// Author recorded when a composition has none
    pub author: String,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            languages: vec![
                "typescript".to_string(),
                "python".to_string(),
                "go".to_string(),
            ],
            max_file_size: 1024 * 1024, // 1MB
            file_extensions: HashMap::new(),
        }
    }
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            origin_x: 100.0,
            origin_y: 100.0,
            cell_width: 300.0,
            cell_height: 200.0,
        }
    }
}

impl Default for CostConfig {
    fn default() -> Self {
        Self {
            management_overhead_rate: 0.10,
            efficiency_discount_rate: 0.05,
            efficiency_discount_threshold: 3,
        }
    }
}

impl Default for DiagramConfig {
    fn default() -> Self {
        Self {
            author: "construct-engine".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config =
            toml::from_str(&content).map_err(|e| EngineError::Config(e.to_string()))?;
        Ok(config)
    }

    /// Save configuration to file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content =
            toml::to_string_pretty(self).map_err(|e| EngineError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Load configuration with fallback to default
    pub fn load_or_default<P: AsRef<Path>>(path: Option<P>) -> Result<Self> {
        match path {
            Some(p) => {
                if p.as_ref().exists() {
                    Self::load(p)
                } else {
                    Ok(Self::default())
                }
            }
            None => {
                let candidates = ["Constructs.toml", "constructs.toml", ".constructs.toml"];

                for candidate in &candidates {
                    if Path::new(candidate).exists() {
                        return Self::load(candidate);
                    }
                }

                Ok(Self::default())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("constructs.toml");

        let mut config = Config::default();
        config.cost.management_overhead_rate = 0.2;
        config.diagram.author = "platform-team".to_string();
        config.save(&path).unwrap();

        let loaded = Config::load(&path).unwrap();
        assert_eq!(loaded.cost.management_overhead_rate, 0.2);
        assert_eq!(loaded.diagram.author, "platform-team");
        assert_eq!(loaded.layout.cell_width, 300.0);
    }

    #[test]
    fn test_partial_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("constructs.toml");
        std::fs::write(&path, "[cost]\nefficiency_discount_threshold = 5\n").unwrap();

        let loaded = Config::load(&path).unwrap();
        assert_eq!(loaded.cost.efficiency_discount_threshold, 5);
        assert_eq!(loaded.cost.efficiency_discount_rate, 0.05);
        assert_eq!(loaded.layout.origin_x, 100.0);
        assert!(loaded.analysis.languages.contains(&"go".to_string()));
    }

    #[test]
    fn test_missing_explicit_path_uses_defaults() {
        let config = Config::load_or_default(Some("/nonexistent/constructs.toml")).unwrap();
        assert_eq!(config.cost.management_overhead_rate, 0.10);
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.toml");
        std::fs::write(&path, "[cost\n").unwrap();

        assert!(matches!(Config::load(&path), Err(EngineError::Config(_))));
    }
}
