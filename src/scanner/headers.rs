//! Security header checks: HSTS, X-Content-Type-Options, X-Frame-Options,
//! server information disclosure, and Content-Security-Policy

use crate::error::Result;
use crate::models::{Finding, Severity};
use async_trait::async_trait;

use super::{Check, ScanContext};

/// Returns true when an X-Frame-Options value is one of the two valid forms
pub(crate) fn frame_options_valid(value: &str) -> bool {
    let upper = value.trim().to_uppercase();
    upper == "DENY" || upper == "SAMEORIGIN"
}

/// Verifies the Strict-Transport-Security header is present
pub struct HstsCheck;

#[async_trait]
impl Check for HstsCheck {
    fn name(&self) -> &'static str {
        "HTTP Strict Transport Security (HSTS)"
    }

    fn description(&self) -> &'static str {
        "Forces browsers to use HTTPS connections only"
    }

    fn worst_severity(&self) -> Severity {
        Severity::Medium
    }

    async fn run(&self, ctx: &ScanContext) -> Result<Vec<Finding>> {
        let finding = match ctx.page.header("strict-transport-security") {
            Some(value) => Finding::passed(
                self.name(),
                self.description(),
                format!("HSTS header: {value}"),
            ),
            None => Finding::failed(
                self.name(),
                self.description(),
                "No HSTS header found - browsers may connect via HTTP",
                Severity::Medium,
            )
            .with_recommendation(
                "Add 'Strict-Transport-Security: max-age=31536000; includeSubDomains'.",
            ),
        };
        Ok(vec![finding])
    }
}

/// Verifies the X-Content-Type-Options header forbids MIME sniffing
pub struct ContentTypeOptionsCheck;

#[async_trait]
impl Check for ContentTypeOptionsCheck {
    fn name(&self) -> &'static str {
        "X-Content-Type-Options"
    }

    fn description(&self) -> &'static str {
        "Prevents MIME type sniffing attacks"
    }

    fn worst_severity(&self) -> Severity {
        Severity::Medium
    }

    async fn run(&self, ctx: &ScanContext) -> Result<Vec<Finding>> {
        let value = ctx.page.header("x-content-type-options");
        let finding = match value {
            Some(v) if v.to_lowercase().contains("nosniff") => Finding::passed(
                self.name(),
                self.description(),
                format!("X-Content-Type-Options: {v}"),
            ),
            Some(v) => Finding::failed(
                self.name(),
                self.description(),
                format!("X-Content-Type-Options present but not 'nosniff': {v}"),
                Severity::Medium,
            )
            .with_recommendation("Set 'X-Content-Type-Options: nosniff'."),
            None => Finding::failed(
                self.name(),
                self.description(),
                "No X-Content-Type-Options header found",
                Severity::Medium,
            )
            .with_recommendation("Add 'X-Content-Type-Options: nosniff'."),
        };
        Ok(vec![finding])
    }
}

/// Verifies the X-Frame-Options header carries a valid value
pub struct FrameOptionsCheck;

#[async_trait]
impl Check for FrameOptionsCheck {
    fn name(&self) -> &'static str {
        "X-Frame-Options"
    }

    fn description(&self) -> &'static str {
        "Prevents clickjacking attacks by controlling iframe embedding"
    }

    fn worst_severity(&self) -> Severity {
        Severity::Medium
    }

    async fn run(&self, ctx: &ScanContext) -> Result<Vec<Finding>> {
        let value = ctx.page.header("x-frame-options");
        let finding = match value {
            Some(v) if frame_options_valid(v) => Finding::passed(
                self.name(),
                self.description(),
                format!("X-Frame-Options: {v}"),
            ),
            Some(v) => Finding::failed(
                self.name(),
                self.description(),
                format!("X-Frame-Options has an unexpected value: {v}"),
                Severity::Medium,
            )
            .with_recommendation("Set 'X-Frame-Options: DENY' or 'SAMEORIGIN'."),
            None => Finding::failed(
                self.name(),
                self.description(),
                "No X-Frame-Options header found",
                Severity::Medium,
            )
            .with_recommendation("Add 'X-Frame-Options: DENY' or 'SAMEORIGIN'."),
        };
        Ok(vec![finding])
    }
}

/// Verifies server details are hidden from potential attackers
pub struct ServerInfoCheck;

#[async_trait]
impl Check for ServerInfoCheck {
    fn name(&self) -> &'static str {
        "Server Information Disclosure"
    }

    fn description(&self) -> &'static str {
        "Checks if server details are hidden from potential attackers"
    }

    fn worst_severity(&self) -> Severity {
        Severity::Low
    }

    async fn run(&self, ctx: &ScanContext) -> Result<Vec<Finding>> {
        let mut exposed = Vec::new();
        if let Some(server) = ctx.page.header("server") {
            exposed.push(format!("Server: {server}"));
        }
        if let Some(powered_by) = ctx.page.header("x-powered-by") {
            exposed.push(format!("X-Powered-By: {powered_by}"));
        }

        let finding = if exposed.is_empty() {
            Finding::passed(self.name(), self.description(), "No server information exposed")
        } else {
            Finding::failed(
                self.name(),
                self.description(),
                format!("Server information exposed: {}", exposed.join(", ")),
                Severity::Low,
            )
            .with_recommendation("Remove or genericize the Server and X-Powered-By headers.")
        };
        Ok(vec![finding])
    }
}

/// Verifies a Content-Security-Policy header is present
pub struct CspCheck;

#[async_trait]
impl Check for CspCheck {
    fn name(&self) -> &'static str {
        "Content Security Policy (CSP)"
    }

    fn description(&self) -> &'static str {
        "Prevents XSS attacks by controlling resource loading"
    }

    fn worst_severity(&self) -> Severity {
        Severity::Medium
    }

    async fn run(&self, ctx: &ScanContext) -> Result<Vec<Finding>> {
        let finding = match ctx.page.header("content-security-policy") {
            Some(_) => Finding::passed(self.name(), self.description(), "CSP header found"),
            None => Finding::failed(
                self.name(),
                self.description(),
                "No Content Security Policy header found",
                Severity::Medium,
            )
            .with_recommendation(
                "Implement a strict Content-Security-Policy header, avoiding 'unsafe-inline' and 'unsafe-eval'.",
            ),
        };
        Ok(vec![finding])
    }
}
