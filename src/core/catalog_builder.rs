use std::path::Path;

use ignore::WalkBuilder;
use tracing::{debug, warn};

use crate::config::AnalysisConfig;
use crate::error::{EngineError, Result};
use super::analyzer::{ConstructAnalyzer, ConstructSource};
use super::construct::{ConstructCatalog, ConstructDefinition, ConstructLevel};

/// Builds a catalog from a directory of construct sources, one construct per file
pub struct CatalogBuilder<'a> {
    config: &'a AnalysisConfig,
    analyzer: &'a ConstructAnalyzer,
}

impl<'a> CatalogBuilder<'a> {
    pub fn new(config: &'a AnalysisConfig, analyzer: &'a ConstructAnalyzer) -> Self {
        Self { config, analyzer }
    }

    /// Analyze every supported file under `dir`, honouring ignore files
    pub fn build_from_directory<P: AsRef<Path>>(
        &self,
        dir: P,
        level: ConstructLevel,
        provider: &str,
    ) -> Result<ConstructCatalog> {
        let mut catalog = ConstructCatalog::new();

        let walker = WalkBuilder::new(dir)
            .hidden(false)
            .git_ignore(true)
            .build();

        for entry in walker {
            let entry = entry.map_err(|e| EngineError::FileSystem(e.to_string()))?;
            let path = entry.path();

            if !path.is_file() {
                continue;
            }
            let Some(language) = self.detect_language(path) else {
                continue;
            };

            match self.analyze_file(path, language, level, provider) {
                Ok(definition) => {
                    debug!("Analyzed {} as '{}'", path.display(), definition.id);
                    if let Some(previous) = catalog.insert(definition) {
                        warn!("Construct '{}' defined by more than one file", previous.id);
                    }
                }
                Err(e) => warn!("Skipping {}: {}", path.display(), e),
            }
        }

        Ok(catalog)
    }

    /// Analyze a single source file; the construct is named after the file stem
    pub fn analyze_file(
        &self,
        path: &Path,
        language: &str,
        level: ConstructLevel,
        provider: &str,
    ) -> Result<ConstructDefinition> {
        let source_code = std::fs::read_to_string(path)?;

        if source_code.len() > self.config.max_file_size {
            return Err(EngineError::FileSystem(format!(
                "File {} exceeds maximum size limit",
                path.display()
            )));
        }

        let name = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().to_string())
            .unwrap_or_default();

        Ok(self.analyzer.create_from_code(&ConstructSource {
            description: format!("Construct analyzed from {}", path.display()),
            name,
            level,
            source_code,
            language: language.to_string(),
            provider: provider.to_string(),
            category: None,
            tags: None,
        }))
    }

    /// Language for a file: configured overrides first, then the enabled scanners
    pub fn detect_language(&self, path: &Path) -> Option<&str> {
        let extension = path.extension().and_then(|ext| ext.to_str())?;
        self.config
            .file_extensions
            .get(extension)
            .map(String::as_str)
            .or_else(|| self.analyzer.language_for_extension(extension))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detects_every_scanner_extension() {
        let config = AnalysisConfig::default();
        let analyzer = ConstructAnalyzer::with_config(&config).unwrap();
        let builder = CatalogBuilder::new(&config, &analyzer);

        assert_eq!(builder.detect_language(Path::new("app.ts")), Some("typescript"));
        assert_eq!(builder.detect_language(Path::new("ui/App.jsx")), Some("typescript"));
        assert_eq!(builder.detect_language(Path::new("queue.py")), Some("python"));
        assert_eq!(builder.detect_language(Path::new("bucket.go")), Some("go"));
        assert_eq!(builder.detect_language(Path::new("README.md")), None);
        assert_eq!(builder.detect_language(Path::new("Makefile")), None);
    }

    #[test]
    fn test_configured_extension_overrides_scanners() {
        let mut config = AnalysisConfig::default();
        config
            .file_extensions
            .insert("mts".to_string(), "typescript".to_string());
        config
            .file_extensions
            .insert("js".to_string(), "javascript".to_string());
        let analyzer = ConstructAnalyzer::with_config(&config).unwrap();
        let builder = CatalogBuilder::new(&config, &analyzer);

        assert_eq!(builder.detect_language(Path::new("stack.mts")), Some("typescript"));
        assert_eq!(builder.detect_language(Path::new("legacy.js")), Some("javascript"));
    }

    #[test]
    fn test_disabled_languages_are_not_detected() {
        let config = AnalysisConfig {
            languages: vec!["python".to_string()],
            ..AnalysisConfig::default()
        };
        let analyzer = ConstructAnalyzer::with_config(&config).unwrap();
        let builder = CatalogBuilder::new(&config, &analyzer);

        assert_eq!(builder.detect_language(Path::new("api.ts")), None);
        assert_eq!(builder.detect_language(Path::new("queue.py")), Some("python"));
    }
}
