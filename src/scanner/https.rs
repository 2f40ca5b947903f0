//! HTTPS usage check

use crate::error::Result;
use crate::models::{Finding, Severity};
use async_trait::async_trait;

use super::{Check, ScanContext};

/// Verifies the target is served over HTTPS
pub struct HttpsCheck;

#[async_trait]
impl Check for HttpsCheck {
    fn name(&self) -> &'static str {
        "HTTPS Encryption"
    }

    fn description(&self) -> &'static str {
        "Ensures data transmission is encrypted using the HTTPS protocol"
    }

    fn worst_severity(&self) -> Severity {
        Severity::High
    }

    async fn run(&self, ctx: &ScanContext) -> Result<Vec<Finding>> {
        let finding = if ctx.url.scheme() == "https" {
            Finding::passed(
                self.name(),
                self.description(),
                "Website uses HTTPS encryption",
            )
        } else {
            Finding::failed(
                self.name(),
                self.description(),
                "Website does not use HTTPS - data transmission is not encrypted",
                Severity::High,
            )
            .with_recommendation("Serve the site over HTTPS and redirect all HTTP traffic.")
        };
        Ok(vec![finding])
    }
}
