//! Directory and file exposure check
//!
//! Runs the bounded path probe and validates 200 responses against
//! content markers before reporting, so soft-404 pages that answer 200 for
//! everything do not produce false positives.

use crate::error::Result;
use crate::models::{Finding, Severity};
use crate::probe::{probe_paths, PathProbeResult};
use async_trait::async_trait;

use super::{Check, ScanContext};

/// Markers of a server-generated directory listing
const LISTING_MARKERS: &[&str] = &["index of /", "<title>index of", "directory listing for"];

/// Classifies a 200 response for a probed path. Returns a description of the
/// exposure, or None when the content does not look like the real thing.
pub(crate) fn classify_exposure(result: &PathProbeResult) -> Option<String> {
    if result.status != 200 {
        return None;
    }
    let body = &result.body_snippet;
    let lower = body.to_lowercase();

    if LISTING_MARKERS.iter().any(|m| lower.contains(m)) {
        return Some(format!(
            "directory listing exposed at /{}",
            result.path.trim_end_matches('/')
        ));
    }

    match result.path {
        ".env" => {
            // Real .env files are KEY=VALUE lines, not HTML
            let has_secrets = body
                .lines()
                .any(|line| line.contains('=') && !line.trim_start().starts_with('<'));
            has_secrets.then(|| ".env file with configuration values is publicly readable".to_string())
        }
        ".git/config" => (body.contains("[core]") || body.contains("[remote"))
            .then(|| "git repository metadata is publicly readable".to_string()),
        ".git/HEAD" => body
            .starts_with("ref: ")
            .then(|| "git repository metadata is publicly readable".to_string()),
        ".htaccess" => (body.contains("RewriteRule")
            || body.contains("Deny from")
            || body.contains("AuthType"))
        .then(|| ".htaccess configuration is publicly readable".to_string()),
        "phpinfo.php" => (body.contains("phpinfo()") || body.contains("PHP Version"))
            .then(|| "phpinfo page exposes server configuration".to_string()),
        "config.php.bak" => (body.contains("<?php") || body.contains("define("))
            .then(|| "PHP configuration backup is publicly readable".to_string()),
        "error_log" | "access_log" => {
            (!body.is_empty() && !body.trim_start().starts_with('<'))
                .then(|| format!("server log file /{} is publicly readable", result.path))
        }
        "server-status" => lower
            .contains("apache server status")
            .then(|| "Apache server-status page is publicly accessible".to_string()),
        // Admin panels count as exposed when the page presents a login form
        "admin/" | "admin/login" | "administrator/" | "wp-admin/" => {
            (lower.contains("type=\"password\"") || lower.contains("type='password'"))
                .then(|| format!("{} is accessible at /{}", result.description, result.path))
        }
        _ => None,
    }
}

/// Probes well-known sensitive paths and reports confirmed exposures
pub struct ExposureCheck;

#[async_trait]
impl Check for ExposureCheck {
    fn name(&self) -> &'static str {
        "Directory/File Exposure"
    }

    fn description(&self) -> &'static str {
        "Probes well-known sensitive paths for exposed files, listings, and admin pages"
    }

    fn worst_severity(&self) -> Severity {
        Severity::High
    }

    async fn run(&self, ctx: &ScanContext) -> Result<Vec<Finding>> {
        let results = probe_paths(&ctx.client, &ctx.target, ctx.config.concurrency).await;

        let exposures: Vec<String> = results.iter().filter_map(classify_exposure).collect();

        let finding = if exposures.is_empty() {
            Finding::passed(
                self.name(),
                self.description(),
                format!("None of the {} probed paths appear exposed", results.len()),
            )
        } else {
            Finding::failed(
                self.name(),
                self.description(),
                exposures.join(" | "),
                Severity::High,
            )
            .with_recommendation(
                "Restrict access to sensitive paths via web server configuration and remove secrets from the web root.",
            )
        };
        Ok(vec![finding])
    }
}
