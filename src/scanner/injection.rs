//! Injection risk check
//!
//! Static pattern matching over the URL query string and page content:
//! named regex families for SQL, XSS, and path traversal indicators, CSRF
//! token presence in forms, and database error fingerprints in the body.
//! Everything here flags potential issues from observation only; no payloads
//! are sent to the target.

use crate::error::Result;
use crate::models::{Finding, Severity};
use async_trait::async_trait;
use regex::Regex;
use scraper::{Html, Selector};

use super::{Check, ScanContext};

/// An ordered, named family of detection patterns
pub struct PatternFamily {
    pub name: &'static str,
    pub patterns: &'static [&'static str],
}

/// Data-driven pattern tables, safe for concurrent read-only access
pub const PATTERN_FAMILIES: &[PatternFamily] = &[
    PatternFamily {
        name: "sql",
        patterns: &[
            r"(?i)('|%27)\s*(or|and)\s*('|%27)",
            r"(?i)\b(union\s+select|select\s+.+\s+from|insert\s+into|drop\s+table|delete\s+from)\b",
            r"(?i)'\s*(or|and)\s*\d+\s*=\s*\d+",
            r"(--|#|/\*)\s*$",
        ],
    },
    PatternFamily {
        name: "xss",
        patterns: &[
            r"(?is)<script[^>]*>",
            r"(?i)javascript:",
            r"(?i)\bon\w+\s*=",
        ],
    },
    PatternFamily {
        name: "path traversal",
        patterns: &[
            r"\.\./",
            r"\.\.\\",
            r"(?i)%2e%2e(%2f|%5c)",
            r"(?i)/etc/passwd",
        ],
    },
];

/// Database error fingerprints, each paired with the engine it identifies
const SQL_ERROR_FINGERPRINTS: &[(&str, &str)] = &[
    (r"(?i)you have an error in your sql syntax", "MySQL"),
    (r"(?i)warning:.*mysql", "MySQL"),
    (r"(?i)unclosed quotation mark", "MSSQL"),
    (r"(?i)microsoft sql server", "MSSQL"),
    (r"(?i)ora-\d{5}", "Oracle"),
    (r"(?i)postgresql.*error", "PostgreSQL"),
    (r"(?i)sqlite3?\.operationalerror", "SQLite"),
    (r"(?i)sqlstate\[", "Generic SQL (PDO)"),
];

/// Field names that look like a CSRF token
fn is_csrf_field(name: &str) -> bool {
    let lower = name.to_lowercase();
    lower.contains("csrf")
        || lower.contains("token")
        || lower.contains("nonce")
        || lower.contains("authenticity")
}

/// Returns the first family whose patterns match `value`
pub(crate) fn match_family(value: &str) -> Option<&'static str> {
    for family in PATTERN_FAMILIES {
        for pattern in family.patterns {
            if let Ok(re) = Regex::new(pattern) {
                if re.is_match(value) {
                    return Some(family.name);
                }
            }
        }
    }
    None
}

/// Returns the database engine named by an error fingerprint in `body`
pub(crate) fn match_sql_error(body: &str) -> Option<&'static str> {
    for (pattern, engine) in SQL_ERROR_FINGERPRINTS {
        if let Ok(re) = Regex::new(pattern) {
            if re.is_match(body) {
                return Some(engine);
            }
        }
    }
    None
}

/// Detects injection risk indicators in the URL and page content
pub struct InjectionRiskCheck;

impl InjectionRiskCheck {
    fn inspect(&self, ctx: &ScanContext) -> Vec<String> {
        let mut issues = Vec::new();

        // Query parameter values carried by the scanned URL itself
        for (name, value) in ctx.url.query_pairs() {
            if let Some(family) = match_family(&value) {
                issues.push(format!(
                    "potential {family} pattern detected in query parameter '{name}'"
                ));
            }
        }

        let document = Html::parse_document(&ctx.page.body);

        // Forms without a CSRF-token-like field
        if let (Ok(form_sel), Ok(input_sel)) =
            (Selector::parse("form"), Selector::parse("input[name]"))
        {
            for (index, form) in document.select(&form_sel).enumerate() {
                let has_token = form
                    .select(&input_sel)
                    .filter_map(|i| i.value().attr("name"))
                    .any(is_csrf_field);
                if !has_token {
                    issues.push(format!(
                        "form #{} has no CSRF-token-like field",
                        index + 1
                    ));
                }
            }
        }

        // Pre-filled input values carrying suspicious content
        if let Ok(value_sel) = Selector::parse("input[value]") {
            for input in document.select(&value_sel) {
                if let Some(value) = input.value().attr("value") {
                    if let Some(family) = match_family(value) {
                        let name = input.value().attr("name").unwrap_or("unnamed");
                        issues.push(format!(
                            "potential {family} pattern detected in input field '{name}'"
                        ));
                    }
                }
            }
        }

        // Database error fingerprints leaking through the response
        if let Some(engine) = match_sql_error(&ctx.page.body) {
            issues.push(format!(
                "database error fingerprint detected in response body ({engine})"
            ));
        }

        issues
    }
}

#[async_trait]
impl Check for InjectionRiskCheck {
    fn name(&self) -> &'static str {
        "Injection Risk"
    }

    fn description(&self) -> &'static str {
        "Detects injection risk indicators: suspicious parameter values, missing CSRF tokens, and database error leakage"
    }

    fn worst_severity(&self) -> Severity {
        Severity::High
    }

    async fn run(&self, ctx: &ScanContext) -> Result<Vec<Finding>> {
        let issues = self.inspect(ctx);

        let finding = if issues.is_empty() {
            Finding::passed(
                self.name(),
                self.description(),
                "No injection risk indicators detected",
            )
        } else {
            Finding::failed(
                self.name(),
                self.description(),
                issues.join(" | "),
                Severity::High,
            )
            .with_recommendation(
                "Use parameterized queries, validate and encode all user input, and add CSRF tokens to every state-changing form.",
            )
        };
        Ok(vec![finding])
    }
}
