use regex::Regex;

use crate::error::Result;
use super::super::construct::push_unique;
use super::{ScannedClass, ScannedType, SourceAnalysis, SourceScanner};

/// TypeScript/JavaScript scanner
pub struct TypeScriptScanner {
    import_regex: Regex,
    require_regex: Regex,
    class_regex: Regex,
    type_regex: Regex,
    function_regex: Regex,
    exported_const_regex: Regex,
}

impl TypeScriptScanner {
    pub fn new() -> Result<Self> {
        Ok(Self {
            import_regex: Regex::new(
                r#"(?m)^\s*import\s+(?:type\s+)?(?:[\w*{}\s,]+?\s+from\s+)?['"]([^'"]+)['"]"#,
            )?,
            require_regex: Regex::new(r#"require\(\s*['"]([^'"]+)['"]\s*\)"#)?,
            class_regex: Regex::new(
                r"\bclass\s+(\w+)(?:\s*<[^>{]*>)?(?:\s+extends\s+([\w.]+))?",
            )?,
            type_regex: Regex::new(
                r"\b(?:interface|type)\s+(\w+)(?:\s*<[^>{]*>)?(?:\s+extends\s+[^{]+?)?\s*=?\s*\{([^}]*)\}",
            )?,
            function_regex: Regex::new(
                r"(?m)^\s*(?:export\s+)?(?:default\s+)?(?:async\s+)?function\*?\s+(\w+)",
            )?,
            exported_const_regex: Regex::new(r"(?m)^\s*export\s+(?:const|let)\s+(\w+)")?,
        })
    }
}

impl SourceScanner for TypeScriptScanner {
    fn scan(&self, source: &str) -> SourceAnalysis {
        let mut analysis = SourceAnalysis::default();

        for caps in self.import_regex.captures_iter(source) {
            push_unique(&mut analysis.imports, &caps[1]);
        }
        for caps in self.require_regex.captures_iter(source) {
            push_unique(&mut analysis.imports, &caps[1]);
        }

        for caps in self.class_regex.captures_iter(source) {
            analysis.classes.push(ScannedClass {
                name: caps[1].to_string(),
                extends: caps.get(2).map(|m| m.as_str().to_string()),
            });
        }

        for caps in self.type_regex.captures_iter(source) {
            analysis.types.push(ScannedType {
                name: caps[1].to_string(),
                body: caps[2].to_string(),
            });
        }

        for caps in self.function_regex.captures_iter(source) {
            push_unique(&mut analysis.functions, &caps[1]);
        }
        for caps in self.exported_const_regex.captures_iter(source) {
            push_unique(&mut analysis.functions, &caps[1]);
        }

        analysis
    }

    fn file_extensions(&self) -> &[&str] {
        &["ts", "tsx", "js", "jsx"]
    }

    fn language_name(&self) -> &str {
        "typescript"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PULUMI_COMPONENT: &str = r#"
import * as aws from "@pulumi/aws";
import * as pulumi from "@pulumi/pulumi";
import { Construct } from 'constructs';
const express = require("express");

export interface SecureBucketArgs {
    bucketName: string;
    versioning?: boolean;
}

export interface SecureBucketOutputs {
    bucketArn: pulumi.Output<string>;
}

export class SecureBucket extends pulumi.ComponentResource {
    constructor(name: string, args: SecureBucketArgs) {
        super("custom:SecureBucket", name);
    }
}

export function createBucket(name: string) {}
export const handler = async () => {};
"#;

    #[test]
    fn test_scan_imports() {
        let analysis = TypeScriptScanner::new().unwrap().scan(PULUMI_COMPONENT);
        assert_eq!(
            analysis.imports,
            vec!["@pulumi/aws", "@pulumi/pulumi", "constructs", "express"]
        );
    }

    #[test]
    fn test_scan_classes_and_types() {
        let analysis = TypeScriptScanner::new().unwrap().scan(PULUMI_COMPONENT);

        assert_eq!(analysis.classes.len(), 1);
        assert_eq!(analysis.classes[0].name, "SecureBucket");
        assert_eq!(
            analysis.classes[0].extends.as_deref(),
            Some("pulumi.ComponentResource")
        );

        let names: Vec<_> = analysis.types.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["SecureBucketArgs", "SecureBucketOutputs"]);
        assert!(analysis.types[0].body.contains("versioning?: boolean;"));
    }

    #[test]
    fn test_scan_functions() {
        let analysis = TypeScriptScanner::new().unwrap().scan(PULUMI_COMPONENT);
        assert_eq!(analysis.functions, vec!["createBucket", "handler"]);
    }

    #[test]
    fn test_scan_empty_source() {
        let analysis = TypeScriptScanner::new().unwrap().scan("");
        assert!(analysis.is_empty());
    }
}
