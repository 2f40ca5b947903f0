//! Cookie security flag check

use crate::error::Result;
use crate::models::{Finding, Severity};
use async_trait::async_trait;

use super::{Check, ScanContext};

/// Verifies every Set-Cookie header carries Secure, HttpOnly, and SameSite
pub struct CookieSecurityCheck;

#[async_trait]
impl Check for CookieSecurityCheck {
    fn name(&self) -> &'static str {
        "Cookie Security"
    }

    fn description(&self) -> &'static str {
        "Checks for secure cookie attributes (Secure, HttpOnly, SameSite)"
    }

    fn worst_severity(&self) -> Severity {
        Severity::Medium
    }

    async fn run(&self, ctx: &ScanContext) -> Result<Vec<Finding>> {
        let cookies = ctx.page.header_all("set-cookie");

        if cookies.is_empty() {
            return Ok(vec![Finding::passed(
                self.name(),
                self.description(),
                "No cookies set by the server",
            )]);
        }

        let mut issues = Vec::new();
        for cookie in &cookies {
            let name = cookie
                .split(';')
                .next()
                .and_then(|p| p.split('=').next())
                .unwrap_or("unknown")
                .trim();
            let lower = cookie.to_lowercase();

            let mut missing = Vec::new();
            if !lower.contains("secure") {
                missing.push("Secure");
            }
            if !lower.contains("httponly") {
                missing.push("HttpOnly");
            }
            if !lower.contains("samesite") {
                missing.push("SameSite");
            }
            if !missing.is_empty() {
                issues.push(format!(
                    "cookie '{name}' missing flags: {}",
                    missing.join(", ")
                ));
            }
        }

        let finding = if issues.is_empty() {
            Finding::passed(
                self.name(),
                self.description(),
                "All security flags present on every cookie",
            )
        } else {
            Finding::failed(
                self.name(),
                self.description(),
                issues.join(" | "),
                Severity::Medium,
            )
            .with_recommendation(
                "Set the Secure, HttpOnly, and SameSite attributes on every cookie.",
            )
        };
        Ok(vec![finding])
    }
}
