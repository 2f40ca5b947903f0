//! Configuration management for WebSecura

use crate::error::Result;
use serde::Deserialize;
use std::path::Path;

/// Immutable scan configuration, passed into the fetcher, probes, and
/// aggregator. No process-wide singleton; callers construct one per scan.
#[derive(Debug, Clone)]
pub struct ScanConfig {
    /// User-Agent header value
    pub user_agent: String,
    /// Per-request timeout for the primary fetch and TLS probe, in seconds
    pub timeout_secs: u64,
    /// Per-request timeout for path probes, in seconds
    pub probe_timeout_secs: u64,
    /// Maximum fetch attempts on retryable status codes
    pub max_retries: u32,
    /// Initial retry backoff in seconds (doubles per attempt)
    pub backoff_secs: u64,
    /// Bounded concurrent outbound connections for the path probe
    pub concurrency: usize,
    /// Global scan deadline in seconds; expiry yields a partial report
    pub deadline_secs: u64,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            user_agent: "WebSecura-Scanner/0.1.0 (Security Testing Tool)".to_string(),
            timeout_secs: 10,
            probe_timeout_secs: 5,
            max_retries: 3,
            backoff_secs: 1,
            concurrency: 5,
            deadline_secs: 60,
        }
    }
}

/// File-based configuration structure matching websecura.toml
#[derive(Debug, Deserialize)]
struct FileConfig {
    scan: Option<ScanSection>,
    client: Option<ClientSection>,
}

#[derive(Debug, Deserialize)]
struct ScanSection {
    deadline_secs: Option<u64>,
    concurrency: Option<usize>,
}

#[derive(Debug, Deserialize)]
struct ClientSection {
    user_agent: Option<String>,
    timeout_secs: Option<u64>,
    probe_timeout_secs: Option<u64>,
    max_retries: Option<u32>,
    backoff_secs: Option<u64>,
}

/// Loads configuration from a TOML file and merges with defaults
pub fn load_config(path: &Path) -> Result<ScanConfig> {
    let content = std::fs::read_to_string(path)?;
    let file_config: FileConfig = toml::from_str(&content)?;

    let mut config = ScanConfig::default();

    if let Some(scan) = file_config.scan {
        if let Some(deadline) = scan.deadline_secs {
            config.deadline_secs = deadline;
        }
        if let Some(concurrency) = scan.concurrency {
            config.concurrency = concurrency;
        }
    }

    if let Some(client) = file_config.client {
        if let Some(ua) = client.user_agent {
            config.user_agent = ua;
        }
        if let Some(timeout) = client.timeout_secs {
            config.timeout_secs = timeout;
        }
        if let Some(timeout) = client.probe_timeout_secs {
            config.probe_timeout_secs = timeout;
        }
        if let Some(retries) = client.max_retries {
            config.max_retries = retries;
        }
        if let Some(backoff) = client.backoff_secs {
            config.backoff_secs = backoff;
        }
    }

    Ok(config)
}

/// Merges CLI arguments into an existing ScanConfig
pub fn merge_cli_args(config: &mut ScanConfig, timeout: Option<u64>, deadline: Option<u64>) {
    if let Some(t) = timeout {
        config.timeout_secs = t;
    }
    if let Some(d) = deadline {
        config.deadline_secs = d;
    }
}
