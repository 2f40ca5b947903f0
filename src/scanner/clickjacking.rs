//! Clickjacking protection check

use crate::error::Result;
use crate::models::{Finding, Severity};
use async_trait::async_trait;

use super::headers::frame_options_valid;
use super::{Check, ScanContext};

/// Verifies the page cannot be embedded in malicious frames, via either a
/// valid X-Frame-Options header or a CSP frame-ancestors directive
pub struct ClickjackingCheck;

#[async_trait]
impl Check for ClickjackingCheck {
    fn name(&self) -> &'static str {
        "Clickjacking Protection"
    }

    fn description(&self) -> &'static str {
        "Prevents the website from being embedded in malicious frames"
    }

    fn worst_severity(&self) -> Severity {
        Severity::Medium
    }

    async fn run(&self, ctx: &ScanContext) -> Result<Vec<Finding>> {
        let frame_options = ctx.page.header("x-frame-options");
        let csp = ctx.page.header("content-security-policy");

        let xfo_protection = frame_options.is_some_and(frame_options_valid);
        let csp_protection = csp.is_some_and(|v| v.to_lowercase().contains("frame-ancestors"));

        let mut details = Vec::new();
        if let Some(v) = frame_options {
            details.push(format!("X-Frame-Options: {v}"));
        }
        if csp_protection {
            details.push("CSP frame-ancestors directive found".to_string());
        }

        let finding = if xfo_protection || csp_protection {
            Finding::passed(self.name(), self.description(), details.join(" | "))
        } else {
            details.push("No clickjacking protection found".to_string());
            Finding::failed(
                self.name(),
                self.description(),
                details.join(" | "),
                Severity::Medium,
            )
            .with_recommendation(
                "Add 'X-Frame-Options: DENY' or a CSP 'frame-ancestors' directive.",
            )
        };
        Ok(vec![finding])
    }
}
