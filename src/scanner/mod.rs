//! Scanner engine: check trait, registry, and result aggregation

pub mod clickjacking;
pub mod cookies;
pub mod exposure;
pub mod forms;
pub mod headers;
pub mod https;
pub mod injection;
pub mod libraries;
pub mod tls;
pub mod xss;

use crate::config::ScanConfig;
use crate::error::{Result, ScanError};
use crate::http::{FetchedPage, HttpClient};
use crate::models::{Finding, ScanReport, Severity};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{timeout, Instant};
use tracing::{error, info, warn};
use url::Url;

/// A single security check.
///
/// Most checks are pure functions over the already-fetched page; the TLS and
/// exposure checks perform their own bounded I/O through the context.
#[async_trait]
pub trait Check: Send + Sync {
    /// Human-readable name, used as the finding's `check` field
    fn name(&self) -> &'static str;

    /// Static explanation of what the check verifies
    fn description(&self) -> &'static str;

    /// Severity assigned when the check itself fails to execute
    fn worst_severity(&self) -> Severity;

    /// Runs the check and returns its findings
    async fn run(&self, ctx: &ScanContext) -> Result<Vec<Finding>>;
}

/// Everything a check may consume: the normalized target, the parsed URL,
/// the primary fetch result, and a client for checks that do their own I/O.
pub struct ScanContext {
    pub target: String,
    pub url: Url,
    pub page: FetchedPage,
    pub client: HttpClient,
    pub config: ScanConfig,
}

impl ScanContext {
    pub fn new(url: Url, page: FetchedPage, client: HttpClient, config: ScanConfig) -> Self {
        Self {
            target: display_target(&url),
            url,
            page,
            client,
            config,
        }
    }
}

/// Normalizes a raw target: trims whitespace and prepends `https://` when no
/// scheme is present. Fails fast on empty or unparseable input.
pub fn normalize_target(raw: &str) -> Result<Url> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ScanError::InvalidTarget("empty URL".to_string()));
    }
    let with_scheme = if trimmed.contains("://") {
        trimmed.to_string()
    } else {
        format!("https://{trimmed}")
    };
    let url = Url::parse(&with_scheme)?;
    if url.host_str().is_none() {
        return Err(ScanError::InvalidTarget(format!("no host in '{raw}'")));
    }
    Ok(url)
}

/// Display form of a target URL. `Url` renders an empty path as a trailing
/// slash; a bare origin is reported without it.
pub fn display_target(url: &Url) -> String {
    let rendered = url.to_string();
    if url.path() == "/" && url.query().is_none() && url.fragment().is_none() {
        rendered.trim_end_matches('/').to_string()
    } else {
        rendered
    }
}

/// Orchestrates the execution of all registered checks
pub struct ScanEngine {
    checks: Vec<Arc<dyn Check>>,
}

impl ScanEngine {
    /// Creates a ScanEngine with no registered checks
    pub fn new() -> Self {
        Self { checks: Vec::new() }
    }

    /// Creates a ScanEngine with the full default registry, in the fixed
    /// execution order findings are reported in.
    pub fn with_defaults() -> Self {
        let mut engine = Self::new();
        engine.register(Arc::new(https::HttpsCheck));
        engine.register(Arc::new(headers::HstsCheck));
        engine.register(Arc::new(headers::ContentTypeOptionsCheck));
        engine.register(Arc::new(headers::FrameOptionsCheck));
        engine.register(Arc::new(headers::ServerInfoCheck));
        engine.register(Arc::new(tls::TlsConfigCheck));
        engine.register(Arc::new(xss::XssProtectionCheck));
        engine.register(Arc::new(headers::CspCheck));
        engine.register(Arc::new(cookies::CookieSecurityCheck));
        engine.register(Arc::new(clickjacking::ClickjackingCheck));
        engine.register(Arc::new(injection::InjectionRiskCheck));
        engine.register(Arc::new(libraries::VulnerableLibrariesCheck));
        engine.register(Arc::new(exposure::ExposureCheck));
        engine.register(Arc::new(tls::TlsAnalysisCheck));
        engine.register(Arc::new(forms::FormSecurityCheck));
        engine
    }

    /// Registers a check at the end of the execution order
    pub fn register(&mut self, check: Arc<dyn Check>) {
        self.checks.push(check);
    }

    /// Returns information about all registered checks
    pub fn list_checks(&self) -> Vec<(&'static str, &'static str)> {
        self.checks
            .iter()
            .map(|c| (c.name(), c.description()))
            .collect()
    }

    /// Runs a full scan against `raw_target` and returns the report.
    ///
    /// Errors are returned only for trivially invalid input; every other
    /// failure path produces findings inside the report.
    pub async fn scan(&self, config: &ScanConfig, raw_target: &str) -> Result<ScanReport> {
        let url = normalize_target(raw_target)?;
        let target = display_target(&url);
        let deadline = Instant::now() + Duration::from_secs(config.deadline_secs);

        info!("Starting scan of {target}");
        let client = HttpClient::from_config(config)?;

        let page = match timeout(deadline - Instant::now(), client.fetch(&target)).await {
            Ok(Ok(page)) => page,
            Ok(Err(e)) => {
                warn!("Initial fetch of {target} failed: {e}");
                return Ok(ScanReport::new(target, vec![accessibility_finding(&e)]));
            }
            Err(_) => {
                warn!("Initial fetch of {target} hit the scan deadline");
                return Ok(ScanReport::new(
                    target,
                    vec![accessibility_finding(&ScanError::ScanTimeout(
                        config.deadline_secs,
                    ))],
                ));
            }
        };

        let ctx = ScanContext::new(url, page, client, config.clone());
        let mut findings = Vec::new();

        for check in &self.checks {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                warn!("Scan deadline reached before '{}'", check.name());
                findings.push(degraded_finding(
                    check.as_ref(),
                    &ScanError::ScanTimeout(config.deadline_secs),
                ));
                break;
            }

            match timeout(remaining, check.run(&ctx)).await {
                Ok(Ok(results)) => {
                    info!("Check '{}' produced {} findings", check.name(), results.len());
                    findings.extend(results);
                }
                Ok(Err(e)) => {
                    error!("Check '{}' failed: {e}", check.name());
                    findings.push(degraded_finding(check.as_ref(), &e));
                }
                Err(_) => {
                    warn!("Check '{}' hit the scan deadline", check.name());
                    findings.push(degraded_finding(
                        check.as_ref(),
                        &ScanError::ScanTimeout(config.deadline_secs),
                    ));
                    break;
                }
            }
        }

        Ok(ScanReport::new(ctx.target, findings))
    }
}

impl Default for ScanEngine {
    fn default() -> Self {
        Self::with_defaults()
    }
}

/// The single finding reported when the initial fetch fails
fn accessibility_finding(e: &ScanError) -> Finding {
    Finding::failed(
        "Website Accessibility",
        "Check if the website is accessible and responding",
        format!("Failed to access website: {e}"),
        Severity::High,
    )
    .with_recommendation("Verify the URL is correct and the site is reachable before rescanning.")
}

/// Converts a check execution error into that check's degraded finding
fn degraded_finding(check: &dyn Check, e: &ScanError) -> Finding {
    Finding::failed(
        check.name(),
        check.description(),
        format!("Check could not complete: {e}"),
        check.worst_severity(),
    )
    .with_recommendation("Re-run the scan; if the error persists, investigate connectivity to the target.")
}
