//! Core data models for WebSecura

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Qualitative risk level assigned per finding.
///
/// `None` is reserved for passing findings; a failing check always carries
/// `Low`, `Medium`, or `High`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    None,
    Low,
    Medium,
    High,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::None => write!(f, "none"),
            Severity::Low => write!(f, "low"),
            Severity::Medium => write!(f, "medium"),
            Severity::High => write!(f, "high"),
        }
    }
}

impl Severity {
    /// Returns the color name used for terminal output
    pub fn color(&self) -> &'static str {
        match self {
            Severity::None => "green",
            Severity::Low => "blue",
            Severity::Medium => "yellow",
            Severity::High => "red",
        }
    }

    /// Parses a severity name (used by the CLI `--fail-on` flag)
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "none" => Some(Severity::None),
            "low" => Some(Severity::Low),
            "medium" => Some(Severity::Medium),
            "high" => Some(Severity::High),
            _ => None,
        }
    }
}

/// One check's structured result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Finding {
    /// Human-readable name of the check
    pub check: String,
    /// Static explanation of what the check verifies
    pub description: String,
    /// Whether the check passed
    pub passed: bool,
    /// Free-text explanation of what was observed
    pub details: String,
    /// Risk level; `none` iff the check passed
    pub severity: Severity,
    /// Remediation guidance, always populated
    pub recommendation: String,
}

impl Finding {
    /// Creates a passing finding with severity `none` and a default
    /// "no action needed" recommendation.
    pub fn passed(
        check: impl Into<String>,
        description: impl Into<String>,
        details: impl Into<String>,
    ) -> Self {
        Self {
            check: check.into(),
            description: description.into(),
            passed: true,
            details: details.into(),
            severity: Severity::None,
            recommendation: "No action needed.".to_string(),
        }
    }

    /// Creates a failing finding at the given severity.
    pub fn failed(
        check: impl Into<String>,
        description: impl Into<String>,
        details: impl Into<String>,
        severity: Severity,
    ) -> Self {
        Self {
            check: check.into(),
            description: description.into(),
            passed: false,
            details: details.into(),
            severity,
            recommendation: String::new(),
        }
    }

    /// Sets the remediation recommendation
    pub fn with_recommendation(mut self, rec: impl Into<String>) -> Self {
        self.recommendation = rec.into();
        self
    }
}

/// Derived counts over a report's findings
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ScanSummary {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
}

/// The aggregate result of one scan, immutable once returned
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanReport {
    /// Normalized target URL
    pub url: String,
    /// Timestamp at which the report was produced
    pub scan_time: DateTime<Local>,
    /// Findings in check execution order
    pub findings: Vec<Finding>,
    /// Derived counts
    pub summary: ScanSummary,
}

impl ScanReport {
    /// Builds a report from collected findings, computing the summary.
    pub fn new(url: impl Into<String>, findings: Vec<Finding>) -> Self {
        let passed = findings.iter().filter(|f| f.passed).count();
        let summary = ScanSummary {
            total: findings.len(),
            passed,
            failed: findings.len() - passed,
        };
        Self {
            url: url.into(),
            scan_time: Local::now(),
            findings,
            summary,
        }
    }

    /// Returns true if any failed finding is at or above the given severity
    pub fn has_failures_at(&self, threshold: Severity) -> bool {
        self.findings
            .iter()
            .any(|f| !f.passed && f.severity >= threshold)
    }
}
