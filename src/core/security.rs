// src/core/security.rs
use regex::Regex;

use crate::error::Result;
use super::construct::{SecurityConsideration, Severity};

/// Text-level security rules applied to construct source code
///
/// Every rule is independent; a single source can trigger all of them.
pub struct SecurityScanner {
    secret_regex: Regex,
    encryption_regex: Regex,
    public_access_regex: Regex,
    iam_regex: Regex,
    firebase_rules_regex: Regex,
}

impl SecurityScanner {
    pub fn new() -> Result<Self> {
        Ok(Self {
            secret_regex: Regex::new(
                r#"(?i)\b(password|passwd|secret|api[_-]?key|access[_-]?key|private[_-]?key|token)\w*["']?\s*[:=]\s*["'][^"']+["']"#,
            )?,
            encryption_regex: Regex::new(r"(?i)encrypt|kms|tls")?,
            public_access_regex: Regex::new(
                r#"0\.0\.0\.0(?:/0)?|::/0|(?i)public[_-]?read|publicly[_-]?accessible\s*[:=]\s*true"#,
            )?,
            iam_regex: Regex::new(r"(?i)iam|role|polic(?:y|ies)")?,
            firebase_rules_regex: Regex::new(r"(?i)rules|auth")?,
        })
    }

    /// Scan source text for the considerations that apply to `provider`
    pub fn scan(&self, source: &str, provider: &str) -> Vec<SecurityConsideration> {
        let mut findings = Vec::new();

        if self.secret_regex.is_match(source) {
            findings.push(SecurityConsideration {
                kind: "secrets".to_string(),
                description: "Hardcoded secret or credential literal detected in source".to_string(),
                severity: Severity::Critical,
                mitigation: "Move secrets to a secret manager or inject them through configuration".to_string(),
            });
        }

        if !self.encryption_regex.is_match(source) {
            findings.push(SecurityConsideration {
                kind: "encryption".to_string(),
                description: "No encryption at rest or in transit is configured".to_string(),
                severity: Severity::Medium,
                mitigation: "Enable provider-managed encryption (KMS) and enforce TLS".to_string(),
            });
        }

        if self.public_access_regex.is_match(source) {
            findings.push(SecurityConsideration {
                kind: "network-exposure".to_string(),
                description: "Resource is reachable from any address or allows public access".to_string(),
                severity: Severity::High,
                mitigation: "Restrict ingress to known CIDR ranges and disable public access".to_string(),
            });
        }

        match provider.to_ascii_lowercase().as_str() {
            "aws" if !self.iam_regex.is_match(source) => {
                findings.push(SecurityConsideration {
                    kind: "access-control".to_string(),
                    description: "No IAM role or policy is defined for this construct".to_string(),
                    severity: Severity::High,
                    mitigation: "Attach a least-privilege IAM role and policy".to_string(),
                });
            }
            "firebase" if !self.firebase_rules_regex.is_match(source) => {
                findings.push(SecurityConsideration {
                    kind: "access-control".to_string(),
                    description: "No security rules or authentication checks are defined".to_string(),
                    severity: Severity::High,
                    mitigation: "Define Firebase security rules and require authentication".to_string(),
                });
            }
            _ => {}
        }

        findings
    }
}
