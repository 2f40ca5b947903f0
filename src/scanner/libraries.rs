//! Vulnerable JavaScript library fingerprinting
//!
//! Detects `name/version` and `name-version` tokens for well-known libraries
//! in the page content and compares the parsed version against a static
//! reference table of known-vulnerable ranges.

use crate::error::Result;
use crate::models::{Finding, Severity};
use async_trait::async_trait;
use regex::Regex;

use super::{Check, ScanContext};

/// Static reference data: library name, first fixed version, reason, upgrade
/// guidance. Loaded once, never mutated.
pub struct VulnerableLibraryEntry {
    pub name: &'static str,
    pub fixed_in: (u32, u32, u32),
    pub reason: &'static str,
    pub recommendation: &'static str,
}

pub const VULNERABLE_LIBRARIES: &[VulnerableLibraryEntry] = &[
    VulnerableLibraryEntry {
        name: "jquery",
        fixed_in: (3, 5, 0),
        reason: "versions before 3.5.0 allow XSS via jQuery.htmlPrefilter (CVE-2020-11022, CVE-2020-11023)",
        recommendation: "Upgrade jQuery to 3.5.0 or later.",
    },
    VulnerableLibraryEntry {
        name: "angular",
        fixed_in: (1, 8, 0),
        reason: "AngularJS before 1.8.0 is affected by sandbox escape and XSS issues (CVE-2020-7676), and the 1.x line is end-of-life",
        recommendation: "Upgrade to AngularJS 1.8.x or migrate off the end-of-life 1.x line.",
    },
    VulnerableLibraryEntry {
        name: "bootstrap",
        fixed_in: (4, 3, 1),
        reason: "versions before 4.3.1 allow XSS via the tooltip/popover data-template attribute (CVE-2019-8331)",
        recommendation: "Upgrade Bootstrap to 4.3.1 or later.",
    },
];

/// Matches library references like `jquery-1.12.4`, `jquery/3.3.1/`,
/// or `bootstrap-3.3.7.min.js`
const LIBRARY_TOKEN: &str = r"(?i)\b(jquery|angular|bootstrap)[/-]v?(\d+)\.(\d+)(?:\.(\d+))?";

/// A detected library reference with its parsed version
#[derive(Debug, PartialEq, Eq)]
pub(crate) struct DetectedLibrary {
    pub name: String,
    pub version: (u32, u32, u32),
}

/// Extracts library-version tokens from page content, deduplicated
pub(crate) fn detect_libraries(body: &str) -> Vec<DetectedLibrary> {
    let mut detected: Vec<DetectedLibrary> = Vec::new();
    let Ok(re) = Regex::new(LIBRARY_TOKEN) else {
        return detected;
    };

    for caps in re.captures_iter(body) {
        let name = caps[1].to_lowercase();
        let major = caps[2].parse().unwrap_or(0);
        let minor = caps[3].parse().unwrap_or(0);
        let patch = caps.get(4).and_then(|m| m.as_str().parse().ok()).unwrap_or(0);
        let lib = DetectedLibrary {
            name,
            version: (major, minor, patch),
        };
        if !detected.contains(&lib) {
            detected.push(lib);
        }
    }
    detected
}

/// Looks up a detected library in the reference table; returns the entry when
/// the version falls in the known-vulnerable range
pub(crate) fn vulnerable_entry(lib: &DetectedLibrary) -> Option<&'static VulnerableLibraryEntry> {
    VULNERABLE_LIBRARIES
        .iter()
        .find(|entry| entry.name == lib.name && lib.version < entry.fixed_in)
}

/// Fingerprints known-vulnerable JavaScript library versions
pub struct VulnerableLibrariesCheck;

#[async_trait]
impl Check for VulnerableLibrariesCheck {
    fn name(&self) -> &'static str {
        "Vulnerable JS Libraries"
    }

    fn description(&self) -> &'static str {
        "Detects references to JavaScript library versions with known vulnerabilities"
    }

    fn worst_severity(&self) -> Severity {
        Severity::Medium
    }

    async fn run(&self, ctx: &ScanContext) -> Result<Vec<Finding>> {
        let detected = detect_libraries(&ctx.page.body);
        let mut issues = Vec::new();
        let mut recommendations = Vec::new();

        for lib in &detected {
            if let Some(entry) = vulnerable_entry(lib) {
                let (major, minor, patch) = lib.version;
                issues.push(format!(
                    "detected {} {major}.{minor}.{patch}: {}",
                    entry.name, entry.reason
                ));
                if !recommendations.contains(&entry.recommendation) {
                    recommendations.push(entry.recommendation);
                }
            }
        }

        let finding = if issues.is_empty() {
            let details = if detected.is_empty() {
                "No known library references detected".to_string()
            } else {
                format!(
                    "{} library reference(s) detected, none in a known-vulnerable range",
                    detected.len()
                )
            };
            Finding::passed(self.name(), self.description(), details)
        } else {
            Finding::failed(
                self.name(),
                self.description(),
                issues.join(" | "),
                Severity::Medium,
            )
            .with_recommendation(recommendations.join(" "))
        };
        Ok(vec![finding])
    }
}
