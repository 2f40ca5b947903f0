//! WebSecura - Passive Web Security Scanner
//!
//! Performs a read-only security assessment of a single website: fetches the
//! page, inspects response headers, TLS configuration, and HTML content, and
//! produces an ordered list of pass/fail findings with severity and
//! remediation guidance.

pub mod config;
pub mod error;
pub mod http;
pub mod models;
pub mod probe;
pub mod scanner;
