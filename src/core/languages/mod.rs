//! Language-specific source scanners
//!
//! Each supported language gets its own module with a consistent interface for
//! extracting imports, classes, types and functions from construct source code.
//! Scanners use lightweight pattern matching rather than a full parser, so they
//! can be swapped out one language at a time.

mod go;
mod python;
mod typescript;

pub use go::GoScanner;
pub use python::PythonScanner;
pub use typescript::TypeScriptScanner;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// A class declaration and the class it extends
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScannedClass {
    pub name: String,
    pub extends: Option<String>,
}

/// A type, struct or interface declaration with its raw body text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScannedType {
    pub name: String,
    pub body: String,
}

/// Structural summary of one source file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceAnalysis {
    pub imports: Vec<String>,
    pub classes: Vec<ScannedClass>,
    pub types: Vec<ScannedType>,
    pub functions: Vec<String>,
}

impl SourceAnalysis {
    pub fn is_empty(&self) -> bool {
        self.imports.is_empty()
            && self.classes.is_empty()
            && self.types.is_empty()
            && self.functions.is_empty()
    }
}

/// Trait that all language scanners must implement
pub trait SourceScanner: Send + Sync {
    /// Extract structural information from source code
    fn scan(&self, source: &str) -> SourceAnalysis;

    /// Get the file extensions this scanner handles
    fn file_extensions(&self) -> &[&str];

    /// Get the language name
    fn language_name(&self) -> &str;
}

/// Map a language name or alias onto the scanner that handles it
pub fn canonical_language(language: &str) -> Option<&'static str> {
    match language.to_ascii_lowercase().as_str() {
        "typescript" | "ts" | "javascript" | "js" => Some("typescript"),
        "python" | "py" => Some("python"),
        "go" | "golang" => Some("go"),
        _ => None,
    }
}

/// Build the scanner for a language name, if the language is supported
pub fn scanner_for(language: &str) -> Result<Option<Box<dyn SourceScanner>>> {
    let scanner: Box<dyn SourceScanner> = match canonical_language(language) {
        Some("typescript") => Box::new(TypeScriptScanner::new()?),
        Some("python") => Box::new(PythonScanner::new()?),
        Some("go") => Box::new(GoScanner::new()?),
        _ => return Ok(None),
    };
    Ok(Some(scanner))
}
