// src/core/analyzer.rs
use std::collections::{BTreeMap, BTreeSet, HashMap};

use regex::Regex;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::{debug, warn};

use crate::config::AnalysisConfig;
use crate::error::Result;
use super::construct::{
    push_unique, slugify, ConstructDefinition, ConstructLevel, ConstructMetadata, Implementation,
    PropertyDescriptor,
};
use super::languages::{canonical_language, scanner_for, SourceAnalysis, SourceScanner};
use super::security::SecurityScanner;

/// Ordered keyword table for category inference; first match wins
const CATEGORY_RULES: &[(&[&str], &str)] = &[
    (&["api", "gateway"], "api"),
    (&["database", "db"], "database"),
    (&["storage", "bucket"], "storage"),
    (&["queue", "topic"], "messaging"),
    (&["function", "lambda"], "compute"),
    (&["auth", "identity"], "security"),
    (&["network", "vpc"], "networking"),
    (&["monitor", "log"], "observability"),
];

const DEFAULT_CATEGORY: &str = "general";

/// Import fragment → technology tag
const FRAMEWORK_TAGS: &[(&str, &str)] = &[
    ("pulumi", "pulumi"),
    ("aws-cdk", "aws-cdk"),
    ("cdktf", "cdktf"),
    ("firebase", "firebase"),
    ("express", "express"),
    ("fastapi", "fastapi"),
    ("flask", "flask"),
    ("boto3", "boto3"),
];

const FEATURE_TAGS: &[&str] = &[
    "serverless",
    "container",
    "microservice",
    "rest",
    "graphql",
    "websocket",
];

const INPUT_TYPE_SUFFIXES: &[&str] = &["Args", "Config", "Props"];
const OUTPUT_TYPE_SUFFIXES: &[&str] = &["Outputs", "Result"];

/// Everything an author supplies when turning source code into a construct
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConstructSource {
    pub name: String,
    pub description: String,
    pub level: ConstructLevel,
    pub source_code: String,
    pub language: String,
    pub provider: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
}

/// Turns construct source code and declared metadata into definitions
pub struct ConstructAnalyzer {
    scanners: HashMap<String, Box<dyn SourceScanner>>,
    security: SecurityScanner,
    ref_regex: Regex,
    property_regex: Regex,
    go_field_regex: Regex,
}

impl ConstructAnalyzer {
    /// Analyzer with every built-in language scanner enabled
    pub fn new() -> Result<Self> {
        Self::with_config(&AnalysisConfig::default())
    }

    pub fn with_config(config: &AnalysisConfig) -> Result<Self> {
        let mut scanners: HashMap<String, Box<dyn SourceScanner>> = HashMap::new();

        for language in &config.languages {
            match scanner_for(language)? {
                Some(scanner) => {
                    scanners.insert(scanner.language_name().to_string(), scanner);
                }
                None => {
                    warn!("No scanner available for configured language '{}'", language);
                }
            }
        }

        Ok(Self {
            scanners,
            security: SecurityScanner::new()?,
            ref_regex: Regex::new(r"^\s*Ref<\s*([^<>]+?)\s*>\s*$")?,
            property_regex: Regex::new(
                r"^\s*(?:readonly\s+)?(\w+)(\?)?\s*:\s*([^;=]+?)\s*(?:=.*?)?;?\s*$",
            )?,
            go_field_regex: Regex::new(r"^\s*([A-Za-z_]\w*)\s+(\*?[\w.\[\]*]+)")?,
        })
    }

    /// Language whose enabled scanner claims `extension`
    pub fn language_for_extension(&self, extension: &str) -> Option<&str> {
        self.scanners
            .values()
            .find(|scanner| {
                scanner
                    .file_extensions()
                    .iter()
                    .any(|ext| ext.eq_ignore_ascii_case(extension))
            })
            .map(|scanner| scanner.language_name())
    }

    /// Declared dependencies plus every construct referenced through a `Ref<...>` input
    ///
    /// Only inputs typed exactly `Ref<target>` count; a `Ref` nested inside another
    /// type is left alone.
    pub fn get_dependencies(&self, definition: &ConstructDefinition) -> BTreeSet<String> {
        let mut dependencies: BTreeSet<String> = definition.dependencies.iter().cloned().collect();

        for input in definition.inputs.values() {
            if let Some(caps) = self.ref_regex.captures(&input.property_type) {
                let target = &caps[1];
                let construct_id = target.split('.').next().unwrap_or(target);
                if !construct_id.is_empty() {
                    dependencies.insert(construct_id.to_string());
                }
            }
        }

        dependencies
    }

    /// Scan source code with the scanner for `language`
    ///
    /// Unsupported languages yield an empty analysis.
    pub fn scan(&self, source_code: &str, language: &str) -> SourceAnalysis {
        let scanner = canonical_language(language).and_then(|lang| self.scanners.get(lang));

        match scanner {
            Some(scanner) => scanner.scan(source_code),
            None => {
                warn!("Unsupported language '{}', skipping structural analysis", language);
                SourceAnalysis::default()
            }
        }
    }

    /// Build a construct definition from source code
    pub fn create_from_code(&self, request: &ConstructSource) -> ConstructDefinition {
        let analysis = self.scan(&request.source_code, &request.language);

        debug!(
            "Scanned '{}': {} imports, {} classes, {} types, {} functions",
            request.name,
            analysis.imports.len(),
            analysis.classes.len(),
            analysis.types.len(),
            analysis.functions.len()
        );

        let id = format!(
            "{}-{}-{}",
            request.provider,
            request.level.as_str().to_ascii_lowercase(),
            slugify(&request.name)
        );

        let category = request
            .category
            .clone()
            .unwrap_or_else(|| infer_category(&request.name).to_string());

        let mut tags = infer_tags(&request.name, &request.provider, &analysis);
        if let Some(explicit) = &request.tags {
            for tag in explicit {
                push_unique(&mut tags, tag.as_str());
            }
        }

        let is_go = canonical_language(&request.language) == Some("go");
        let inputs = self.extract_properties(&analysis, INPUT_TYPE_SUFFIXES, is_go);
        let outputs = self.extract_properties(&analysis, OUTPUT_TYPE_SUFFIXES, is_go);

        let security = self.security.scan(&request.source_code, &request.provider);

        ConstructDefinition {
            id,
            level: request.level,
            metadata: ConstructMetadata {
                name: request.name.clone(),
                description: request.description.clone(),
                version: "1.0.0".to_string(),
                category,
                tags,
                author: None,
            },
            providers: BTreeSet::from([request.provider.clone()]),
            inputs,
            outputs,
            dependencies: Vec::new(),
            security,
            costs: None,
            implementation: Implementation {
                source: request.source_code.clone(),
                language: Some(request.language.clone()),
                runtime: runtime_for(&request.language).map(str::to_string),
                content_hash: Some(content_hash(&request.source_code)),
            },
        }
    }

    /// Parse the first scanned type whose name ends in one of `suffixes`
    fn extract_properties(
        &self,
        analysis: &SourceAnalysis,
        suffixes: &[&str],
        is_go: bool,
    ) -> BTreeMap<String, PropertyDescriptor> {
        let mut properties = BTreeMap::new();

        let Some(declared) = analysis
            .types
            .iter()
            .find(|t| suffixes.iter().any(|suffix| t.name.ends_with(suffix)))
        else {
            return properties;
        };

        for line in declared.body.lines() {
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with("//") || trimmed.starts_with('#') {
                continue;
            }

            if let Some(caps) = self.property_regex.captures(trimmed) {
                let property_type = caps[3].trim().to_string();
                let optional = caps.get(2).is_some() || property_type.starts_with("Optional[");
                properties.insert(
                    caps[1].to_string(),
                    PropertyDescriptor::new(property_type, !optional),
                );
            } else if is_go {
                if let Some(caps) = self.go_field_regex.captures(trimmed) {
                    let property_type = caps[2].to_string();
                    let optional = property_type.starts_with('*');
                    properties.insert(
                        caps[1].to_string(),
                        PropertyDescriptor::new(property_type, !optional),
                    );
                }
            }
        }

        properties
    }
}

fn infer_category(name: &str) -> &'static str {
    let lowered = name.to_lowercase();

    CATEGORY_RULES
        .iter()
        .find(|(keywords, _)| keywords.iter().any(|k| lowered.contains(k)))
        .map(|(_, category)| *category)
        .unwrap_or(DEFAULT_CATEGORY)
}

fn infer_tags(name: &str, provider: &str, analysis: &SourceAnalysis) -> Vec<String> {
    let mut tags = vec![provider.to_string()];
    let lowered = name.to_lowercase();

    for import in &analysis.imports {
        let import = import.to_lowercase();
        if let Some((_, tag)) = FRAMEWORK_TAGS.iter().find(|(fragment, _)| import.contains(fragment)) {
            push_unique(&mut tags, *tag);
        }
    }

    for feature in FEATURE_TAGS {
        if lowered.contains(feature) {
            push_unique(&mut tags, *feature);
        }
    }

    tags
}

/// Runtime tag for a source language
pub fn runtime_for(language: &str) -> Option<&'static str> {
    match language.to_ascii_lowercase().as_str() {
        "typescript" | "javascript" => Some("nodejs"),
        "python" => Some("python3"),
        "go" => Some("go"),
        _ => None,
    }
}

fn content_hash(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    format!("{:x}", hasher.finalize())
}
