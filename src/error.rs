//! Error types for WebSecura

use thiserror::Error;

/// Main error type for scan operations
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("URL parse error: {0}")]
    UrlError(#[from] url::ParseError),

    #[error("TLS error: {0}")]
    TlsError(#[from] openssl::error::ErrorStack),

    #[error("TLS handshake failed: {0}")]
    TlsHandshake(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Task join error: {0}")]
    JoinError(#[from] tokio::task::JoinError),

    #[error("Invalid target: {0}")]
    InvalidTarget(String),

    #[error("Target unreachable: {0}")]
    TargetUnreachable(String),

    #[error("Scan deadline of {0} seconds exceeded")]
    ScanTimeout(u64),
}

/// Result type alias for scan operations
pub type Result<T> = std::result::Result<T, ScanError>;
