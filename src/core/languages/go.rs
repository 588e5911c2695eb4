use regex::Regex;

use crate::error::Result;
use super::super::construct::push_unique;
use super::{ScannedClass, ScannedType, SourceAnalysis, SourceScanner};

/// Go scanner
///
/// Go has no classes; a struct whose first field is an embedded type is
/// reported as a class extending that type.
pub struct GoScanner {
    import_regex: Regex,
    import_block_regex: Regex,
    quoted_regex: Regex,
    type_regex: Regex,
    function_regex: Regex,
}

impl GoScanner {
    pub fn new() -> Result<Self> {
        Ok(Self {
            import_regex: Regex::new(r#"(?m)^\s*import\s+(?:[\w.]+\s+)?"([^"]+)""#)?,
            import_block_regex: Regex::new(r"(?m)^\s*import\s*\(([^)]*)\)")?,
            quoted_regex: Regex::new(r#""([^"]+)""#)?,
            type_regex: Regex::new(r"(?m)^type\s+(\w+)\s+(struct|interface)\s*\{([^}]*)\}")?,
            function_regex: Regex::new(r"(?m)^func\s+(\w+)")?,
        })
    }

    fn embedded_parent(body: &str) -> Option<String> {
        let first = body.lines().map(str::trim).find(|l| !l.is_empty())?;
        let is_embedded = !first.contains(char::is_whitespace)
            && !first.starts_with("//")
            && first.trim_start_matches('*').chars().next().is_some_and(char::is_alphabetic);

        is_embedded.then(|| first.trim_start_matches('*').to_string())
    }
}

impl SourceScanner for GoScanner {
    fn scan(&self, source: &str) -> SourceAnalysis {
        let mut analysis = SourceAnalysis::default();

        for caps in self.import_regex.captures_iter(source) {
            push_unique(&mut analysis.imports, &caps[1]);
        }
        for block in self.import_block_regex.captures_iter(source) {
            for caps in self.quoted_regex.captures_iter(&block[1]) {
                push_unique(&mut analysis.imports, &caps[1]);
            }
        }

        for caps in self.type_regex.captures_iter(source) {
            let name = caps[1].to_string();
            let body = caps[3].to_string();

            if &caps[2] == "struct" {
                if let Some(parent) = Self::embedded_parent(&body) {
                    analysis.classes.push(ScannedClass {
                        name: name.clone(),
                        extends: Some(parent),
                    });
                }
            }

            analysis.types.push(ScannedType { name, body });
        }

        for caps in self.function_regex.captures_iter(source) {
            push_unique(&mut analysis.functions, &caps[1]);
        }

        analysis
    }

    fn file_extensions(&self) -> &[&str] {
        &["go"]
    }

    fn language_name(&self) -> &str {
        "go"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const COMPONENT: &str = r#"package network

import (
	"fmt"

	ec2 "github.com/pulumi/pulumi-aws/sdk/v6/go/aws/ec2"
	"github.com/pulumi/pulumi/sdk/v3/go/pulumi"
)

type VpcArgs struct {
	CidrBlock string
	EnableDns *bool
}

type Vpc struct {
	pulumi.ResourceState

	VpcId pulumi.StringOutput
}

func NewVpc(ctx *pulumi.Context, name string, args *VpcArgs) (*Vpc, error) {
	return nil, fmt.Errorf("not implemented")
}

func (v *Vpc) Describe() string { return "" }
"#;

    #[test]
    fn test_scan_import_block() {
        let analysis = GoScanner::new().unwrap().scan(COMPONENT);
        assert_eq!(
            analysis.imports,
            vec![
                "fmt",
                "github.com/pulumi/pulumi-aws/sdk/v6/go/aws/ec2",
                "github.com/pulumi/pulumi/sdk/v3/go/pulumi",
            ]
        );
    }

    #[test]
    fn test_single_import() {
        let analysis = GoScanner::new().unwrap().scan("package x\n\nimport \"os\"\n");
        assert_eq!(analysis.imports, vec!["os"]);
    }

    #[test]
    fn test_scan_structs() {
        let analysis = GoScanner::new().unwrap().scan(COMPONENT);

        let names: Vec<_> = analysis.types.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["VpcArgs", "Vpc"]);

        assert_eq!(analysis.classes.len(), 1);
        assert_eq!(analysis.classes[0].name, "Vpc");
        assert_eq!(
            analysis.classes[0].extends.as_deref(),
            Some("pulumi.ResourceState")
        );
    }

    #[test]
    fn test_scan_functions_skips_methods() {
        let analysis = GoScanner::new().unwrap().scan(COMPONENT);
        assert_eq!(analysis.functions, vec!["NewVpc"]);
    }
}
