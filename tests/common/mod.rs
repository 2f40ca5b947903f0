//! Common test utilities

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::StatusCode;
use url::Url;
use websecura::config::ScanConfig;
use websecura::http::{FetchedPage, HttpClient};
use websecura::scanner::ScanContext;

/// Builds a FetchedPage from literal status/headers/body
pub fn page(status: u16, headers: &[(&str, &str)], body: &str) -> FetchedPage {
    let mut header_map = HeaderMap::new();
    for (name, value) in headers {
        let name = HeaderName::from_bytes(name.as_bytes()).expect("valid header name");
        let value = HeaderValue::from_str(value).expect("valid header value");
        header_map.append(name, value);
    }
    FetchedPage {
        status: StatusCode::from_u16(status).expect("valid status"),
        headers: header_map,
        body: body.to_string(),
    }
}

/// Builds a ScanContext around an already-fetched page, without touching the
/// network
pub fn ctx(target: &str, fetched: FetchedPage) -> ScanContext {
    let config = ScanConfig::default();
    let client = HttpClient::from_config(&config).expect("client");
    let url = Url::parse(target).expect("valid target");
    ScanContext::new(url, fetched, client, config)
}
