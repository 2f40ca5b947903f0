//! Sensitive path probe
//!
//! Issues a bounded set of speculative GET requests against well-known
//! sensitive paths. Redirects are not followed and individual connection
//! errors are treated as "not exposed", never as scan failure.

use crate::http::HttpClient;
use futures::stream::{self, StreamExt};
use tracing::debug;

/// Fixed candidate list of sensitive paths with a short description each
pub const SENSITIVE_PATHS: &[(&str, &str)] = &[
    ("admin/", "Admin panel"),
    ("admin/login", "Admin login page"),
    ("administrator/", "Administrator panel"),
    ("wp-admin/", "WordPress admin panel"),
    (".env", "Environment configuration file"),
    (".git/config", "Git configuration file"),
    (".git/HEAD", "Git HEAD reference"),
    ("backup/", "Backup directory"),
    ("config.php.bak", "PHP configuration backup"),
    ("phpinfo.php", "PHP info page"),
    ("error_log", "Error log file"),
    ("access_log", "Access log file"),
    (".htaccess", "Apache configuration file"),
    ("server-status", "Apache server status"),
];

/// Body snippet length kept per probed path
const SNIPPET_LEN: usize = 2048;

/// Result of probing one candidate path
#[derive(Debug, Clone)]
pub struct PathProbeResult {
    pub path: &'static str,
    pub description: &'static str,
    pub status: u16,
    pub body_snippet: String,
}

/// Probes every candidate path under `base`, with a bounded number of
/// concurrent outbound connections. Paths that fail at the connection level
/// are omitted from the result.
pub async fn probe_paths(
    client: &HttpClient,
    base: &str,
    concurrency: usize,
) -> Vec<PathProbeResult> {
    let base = base.trim_end_matches('/');

    let mut futures = Vec::with_capacity(SENSITIVE_PATHS.len());
    for &(path, description) in SENSITIVE_PATHS {
        futures.push(probe_one(client, format!("{base}/{path}"), path, description));
    }

    let mut results: Vec<PathProbeResult> = stream::iter(futures)
        .buffer_unordered(concurrency.max(1))
        .filter_map(|r| async { r })
        .collect()
        .await;

    // Stable output order regardless of completion order
    results.sort_by_key(|r| {
        SENSITIVE_PATHS
            .iter()
            .position(|&(p, _)| p == r.path)
            .unwrap_or(usize::MAX)
    });
    results
}

/// Probes a single candidate path. Connection-level failures resolve to
/// `None`, meaning "not exposed".
async fn probe_one(
    client: &HttpClient,
    url: String,
    path: &'static str,
    description: &'static str,
) -> Option<PathProbeResult> {
    match client.probe_get(&url).await {
        Ok(response) => {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            debug!("Path probe {url}: {status}");
            Some(PathProbeResult {
                path,
                description,
                status,
                body_snippet: body.chars().take(SNIPPET_LEN).collect(),
            })
        }
        Err(e) => {
            debug!("Path probe {url} failed: {e}");
            None
        }
    }
}
