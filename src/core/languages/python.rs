use regex::Regex;

use crate::error::Result;
use super::super::construct::push_unique;
use super::{ScannedClass, ScannedType, SourceAnalysis, SourceScanner};

/// Python scanner
pub struct PythonScanner {
    import_regex: Regex,
    from_import_regex: Regex,
    class_regex: Regex,
    class_body_regex: Regex,
    function_regex: Regex,
}

impl PythonScanner {
    pub fn new() -> Result<Self> {
        Ok(Self {
            import_regex: Regex::new(r"(?m)^\s*import\s+([\w.]+)")?,
            from_import_regex: Regex::new(r"(?m)^\s*from\s+([\w.]+)\s+import\b")?,
            class_regex: Regex::new(r"(?m)^\s*class\s+(\w+)\s*(?:\(\s*([\w.]+)[^)]*\))?\s*:")?,
            // Top-level class followed by its indented block
            class_body_regex: Regex::new(
                r"(?m)^class\s+(\w+)[^:\n]*:[ \t]*\n((?:[ \t]+[^\n]*\n?|[ \t]*\n)*)",
            )?,
            function_regex: Regex::new(r"(?m)^(?:async\s+)?def\s+(\w+)")?,
        })
    }
}

impl SourceScanner for PythonScanner {
    fn scan(&self, source: &str) -> SourceAnalysis {
        let mut analysis = SourceAnalysis::default();

        for caps in self.import_regex.captures_iter(source) {
            push_unique(&mut analysis.imports, &caps[1]);
        }
        for caps in self.from_import_regex.captures_iter(source) {
            push_unique(&mut analysis.imports, &caps[1]);
        }

        for caps in self.class_regex.captures_iter(source) {
            analysis.classes.push(ScannedClass {
                name: caps[1].to_string(),
                extends: caps.get(2).map(|m| m.as_str().to_string()),
            });
        }

        for caps in self.class_body_regex.captures_iter(source) {
            analysis.types.push(ScannedType {
                name: caps[1].to_string(),
                body: caps[2].to_string(),
            });
        }

        for caps in self.function_regex.captures_iter(source) {
            push_unique(&mut analysis.functions, &caps[1]);
        }

        analysis
    }

    fn file_extensions(&self) -> &[&str] {
        &["py"]
    }

    fn language_name(&self) -> &str {
        "python"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const COMPONENT: &str = r#"import pulumi
import pulumi_gcp as gcp
from dataclasses import dataclass
from typing import Optional


@dataclass
class TopicArgs:
    topic_name: str
    retention_days: Optional[int] = None


class MessagingTopic(pulumi.ComponentResource):
    def __init__(self, name: str, args: TopicArgs):
        super().__init__("custom:MessagingTopic", name)


def create_topic(name):
    return MessagingTopic(name, TopicArgs(topic_name=name))
"#;

    #[test]
    fn test_scan_imports() {
        let analysis = PythonScanner::new().unwrap().scan(COMPONENT);
        assert_eq!(
            analysis.imports,
            vec!["pulumi", "pulumi_gcp", "dataclasses", "typing"]
        );
    }

    #[test]
    fn test_scan_classes() {
        let analysis = PythonScanner::new().unwrap().scan(COMPONENT);
        assert_eq!(analysis.classes.len(), 2);
        assert_eq!(analysis.classes[0].name, "TopicArgs");
        assert_eq!(analysis.classes[0].extends, None);
        assert_eq!(analysis.classes[1].name, "MessagingTopic");
        assert_eq!(
            analysis.classes[1].extends.as_deref(),
            Some("pulumi.ComponentResource")
        );
    }

    #[test]
    fn test_scan_class_bodies() {
        let analysis = PythonScanner::new().unwrap().scan(COMPONENT);
        let args = analysis.types.iter().find(|t| t.name == "TopicArgs").unwrap();
        assert!(args.body.contains("topic_name: str"));
        assert!(args.body.contains("retention_days: Optional[int] = None"));
        assert!(!args.body.contains("def __init__"));
    }

    #[test]
    fn test_scan_functions() {
        let analysis = PythonScanner::new().unwrap().scan(COMPONENT);
        assert_eq!(analysis.functions, vec!["create_topic"]);
    }
}
