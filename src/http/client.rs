//! HTTP client wrapper with retry/backoff and bounded probe requests

use crate::config::ScanConfig;
use crate::error::{Result, ScanError};
use reqwest::header::HeaderMap;
use reqwest::{Client, Response, StatusCode};
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, warn};

/// Response codes that trigger a retry of the primary fetch
const RETRYABLE_STATUS: &[u16] = &[429, 500, 502, 503, 504];

/// The primary fetch result: status, case-insensitive headers, and body text.
///
/// Header lookup goes through reqwest's `HeaderMap`, which is case-insensitive
/// by construction.
#[derive(Debug, Clone)]
pub struct FetchedPage {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: String,
}

impl FetchedPage {
    /// Returns the first value of a header as a string, if present
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Returns all values of a header (Set-Cookie may repeat)
    pub fn header_all(&self, name: &str) -> Vec<String> {
        self.headers
            .get_all(name)
            .iter()
            .filter_map(|v| v.to_str().ok().map(String::from))
            .collect()
    }
}

/// HTTP client shared by the fetcher and the path probe.
///
/// The content client disables certificate verification: the goal of the fetch
/// is content inspection, trust validation happens in the TLS prober. The
/// probe client additionally disables redirect following.
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
    probe_client: Client,
    max_retries: u32,
    backoff: Duration,
}

impl HttpClient {
    /// Creates a new HttpClient from scan configuration
    pub fn from_config(config: &ScanConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(&config.user_agent)
            .redirect(reqwest::redirect::Policy::limited(10))
            .danger_accept_invalid_certs(true)
            .build()?;

        let probe_client = Client::builder()
            .timeout(Duration::from_secs(config.probe_timeout_secs))
            .user_agent(&config.user_agent)
            .redirect(reqwest::redirect::Policy::none())
            .danger_accept_invalid_certs(true)
            .build()?;

        Ok(Self {
            client,
            probe_client,
            max_retries: config.max_retries,
            backoff: Duration::from_secs(config.backoff_secs),
        })
    }

    /// Issues the primary GET request and captures status, headers, and body.
    ///
    /// Retries on {429,500,502,503,504} with exponential backoff. Connection
    /// level failures surface immediately without retry.
    pub async fn fetch(&self, url: &str) -> Result<FetchedPage> {
        let mut last_status = None;

        for attempt in 0..self.max_retries {
            if attempt > 0 {
                let backoff = self.backoff * 2u32.pow(attempt - 1);
                debug!("Retry attempt {attempt} for {url}, waiting {backoff:?}");
                sleep(backoff).await;
            }

            let response = self.client.get(url).send().await?;
            let status = response.status();
            debug!("Response {status} for {url}");

            if RETRYABLE_STATUS.contains(&status.as_u16()) {
                warn!("Retryable status {status} from {url}");
                last_status = Some(status);
                continue;
            }

            let headers = response.headers().clone();
            // A failure while reading the body is a network failure like any
            // other and must surface, not degrade into an empty body.
            let body = response.text().await?;
            return Ok(FetchedPage {
                status,
                headers,
                body,
            });
        }

        Err(ScanError::TargetUnreachable(format!(
            "{url} kept responding with {} after {} attempts",
            last_status.map_or_else(|| "errors".to_string(), |s| s.to_string()),
            self.max_retries
        )))
    }

    /// Issues a single bounded GET without redirect following, for path probes
    pub async fn probe_get(&self, url: &str) -> Result<Response> {
        Ok(self.probe_client.get(url).send().await?)
    }
}
