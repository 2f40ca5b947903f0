//! XSS protection check: response header plus heuristic content patterns

use crate::error::Result;
use crate::models::{Finding, Severity};
use async_trait::async_trait;
use regex::Regex;

use super::{Check, ScanContext};

/// Heuristic patterns over unescaped response content. These flag potential
/// issues, not confirmed exploitation.
const XSS_PATTERNS: &[(&str, &str)] = &[
    (r"(?is)<script[^>]*>.*?</script>", "inline script tag"),
    (r"(?i)javascript:", "javascript: scheme"),
    (r"(?i)\bon\w+\s*=", "inline event handler"),
];

/// Returns the descriptions of XSS patterns matched in the body
pub(crate) fn detect_xss_patterns(body: &str) -> Vec<&'static str> {
    let mut matched = Vec::new();
    for (pattern, label) in XSS_PATTERNS {
        if let Ok(re) = Regex::new(pattern) {
            if re.is_match(body) {
                matched.push(*label);
            }
        }
    }
    matched
}

/// Checks for cross-site scripting protection mechanisms
pub struct XssProtectionCheck;

#[async_trait]
impl Check for XssProtectionCheck {
    fn name(&self) -> &'static str {
        "XSS Protection"
    }

    fn description(&self) -> &'static str {
        "Checks for Cross-Site Scripting protection mechanisms"
    }

    fn worst_severity(&self) -> Severity {
        Severity::High
    }

    async fn run(&self, ctx: &ScanContext) -> Result<Vec<Finding>> {
        let header = ctx.page.header("x-xss-protection");
        let has_protection = header.is_some_and(|v| v.contains('1'));
        let suspicious = detect_xss_patterns(&ctx.page.body);

        let mut details = Vec::new();
        match header {
            Some(v) => details.push(format!("X-XSS-Protection: {v}")),
            None => details.push("No X-XSS-Protection header found".to_string()),
        }
        if !suspicious.is_empty() {
            details.push(format!(
                "Potential XSS patterns detected in content: {}",
                suspicious.join(", ")
            ));
        }

        let finding = if has_protection && suspicious.is_empty() {
            Finding::passed(self.name(), self.description(), details.join(" | "))
        } else {
            let severity = if suspicious.is_empty() {
                Severity::Medium
            } else {
                Severity::High
            };
            Finding::failed(self.name(), self.description(), details.join(" | "), severity)
                .with_recommendation(
                    "Sanitize user-supplied content, deploy a Content-Security-Policy, and set 'X-XSS-Protection: 1; mode=block' for legacy browsers.",
                )
        };
        Ok(vec![finding])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_inline_script() {
        let matched = detect_xss_patterns("<html><script>alert(1)</script></html>");
        assert!(matched.contains(&"inline script tag"));
    }

    #[test]
    fn detects_event_handler() {
        let matched = detect_xss_patterns(r#"<img src=x onerror="steal()">"#);
        assert!(matched.contains(&"inline event handler"));
    }

    #[test]
    fn clean_body_matches_nothing() {
        assert!(detect_xss_patterns("<html><p>hello</p></html>").is_empty());
    }
}
