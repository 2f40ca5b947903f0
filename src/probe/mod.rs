//! Network probes owned by individual checks: raw TLS handshake and
//! speculative requests against well-known sensitive paths

pub mod paths;
pub mod tls;

pub use paths::{probe_paths, PathProbeResult, SENSITIVE_PATHS};
pub use tls::{probe_tls, TlsProbe};
