//! TLS checks: certificate configuration and protocol/cipher analysis
//!
//! Both checks open their own handshake through the TLS prober, independent
//! of the content fetch. A prober failure degrades the individual check,
//! never the whole scan.

use crate::error::Result;
use crate::models::{Finding, Severity};
use crate::probe::{probe_tls, TlsProbe};
use async_trait::async_trait;
use std::time::Duration;

use super::{Check, ScanContext};

/// Protocol versions considered broken or deprecated
const WEAK_PROTOCOLS: &[&str] = &["SSLv2", "SSLv3", "TLSv1", "TLSv1.1"];

/// Cipher name fragments that indicate a weak algorithm
const WEAK_CIPHER_TOKENS: &[&str] = &["RC4", "DES", "MD5"];

/// Minimum acceptable cipher strength in bits
const MIN_CIPHER_BITS: u32 = 128;

/// Evaluates a completed handshake against the protocol/cipher policy.
/// Returns the list of weaknesses; empty means the configuration passes.
pub fn evaluate_tls(probe: &TlsProbe) -> Vec<String> {
    let mut weaknesses = Vec::new();

    if let Some(protocol) = &probe.protocol {
        if WEAK_PROTOCOLS.contains(&protocol.as_str()) {
            weaknesses.push(format!(
                "negotiated protocol {protocol} is weak and should be disabled"
            ));
        }
    }

    if let Some(bits) = probe.cipher_bits {
        if bits < MIN_CIPHER_BITS {
            weaknesses.push(format!(
                "negotiated cipher provides only {bits}-bit keys (minimum {MIN_CIPHER_BITS})"
            ));
        }
    }

    if let Some(cipher) = &probe.cipher_suite {
        let upper = cipher.to_uppercase();
        for token in WEAK_CIPHER_TOKENS {
            if upper.contains(token) {
                weaknesses.push(format!("cipher suite {cipher} uses weak algorithm {token}"));
            }
        }
    }

    weaknesses
}

fn host_and_port(ctx: &ScanContext) -> Option<(String, u16)> {
    let host = ctx.url.host_str()?.to_string();
    let port = ctx.url.port().unwrap_or(443);
    Some((host, port))
}

/// Validates the certificate: handshake against trusted roots and hostname
/// match via subject CN or SAN
pub struct TlsConfigCheck;

#[async_trait]
impl Check for TlsConfigCheck {
    fn name(&self) -> &'static str {
        "SSL/TLS Configuration"
    }

    fn description(&self) -> &'static str {
        "Validates the SSL certificate and TLS configuration"
    }

    fn worst_severity(&self) -> Severity {
        Severity::High
    }

    async fn run(&self, ctx: &ScanContext) -> Result<Vec<Finding>> {
        if ctx.url.scheme() != "https" {
            return Ok(vec![Finding::failed(
                self.name(),
                self.description(),
                "Website does not use HTTPS",
                Severity::High,
            )
            .with_recommendation("Enable HTTPS with a valid TLS certificate.")]);
        }

        let Some((host, port)) = host_and_port(ctx) else {
            return Ok(vec![Finding::failed(
                self.name(),
                self.description(),
                "Target URL has no hostname to validate against",
                Severity::High,
            )
            .with_recommendation("Scan a URL with an explicit hostname.")]);
        };

        let timeout = Duration::from_secs(ctx.config.timeout_secs);
        let finding = match probe_tls(&host, port, timeout).await {
            Ok(probe) if probe.verified => {
                let mut details = vec!["Valid SSL certificate found".to_string()];
                if let Some(subject) = &probe.cert_subject {
                    details.push(format!("Subject: {subject}"));
                }
                if let Some(protocol) = &probe.protocol {
                    details.push(format!("TLS Version: {protocol}"));
                }
                Finding::passed(self.name(), self.description(), details.join(" | "))
            }
            Ok(probe) => {
                let detail = probe
                    .verify_detail
                    .unwrap_or_else(|| "certificate verification failed".to_string());
                Finding::failed(
                    self.name(),
                    self.description(),
                    format!("SSL/TLS configuration issue: {detail}"),
                    Severity::High,
                )
                .with_recommendation(
                    "Install a certificate from a trusted CA whose CN or SAN matches the hostname.",
                )
            }
            Err(e) => Finding::failed(
                self.name(),
                self.description(),
                format!("SSL/TLS configuration issue: {e}"),
                Severity::High,
            )
            .with_recommendation(
                "Ensure the server completes TLS handshakes with a valid certificate.",
            ),
        };
        Ok(vec![finding])
    }
}

/// Analyzes the negotiated protocol version and cipher strength
pub struct TlsAnalysisCheck;

#[async_trait]
impl Check for TlsAnalysisCheck {
    fn name(&self) -> &'static str {
        "Enhanced TLS Analysis"
    }

    fn description(&self) -> &'static str {
        "Analyzes the negotiated TLS protocol version and cipher suite strength"
    }

    fn worst_severity(&self) -> Severity {
        Severity::Medium
    }

    async fn run(&self, ctx: &ScanContext) -> Result<Vec<Finding>> {
        if ctx.url.scheme() != "https" {
            return Ok(vec![Finding::failed(
                self.name(),
                self.description(),
                "Website does not use HTTPS, so no TLS configuration exists to analyze",
                Severity::Medium,
            )
            .with_recommendation("Enable HTTPS before assessing TLS strength.")]);
        }

        let Some((host, port)) = host_and_port(ctx) else {
            return Ok(vec![Finding::failed(
                self.name(),
                self.description(),
                "Target URL has no hostname to probe",
                Severity::Medium,
            )
            .with_recommendation("Scan a URL with an explicit hostname.")]);
        };

        let timeout = Duration::from_secs(ctx.config.timeout_secs);
        let finding = match probe_tls(&host, port, timeout).await {
            Ok(probe) => {
                let weaknesses = evaluate_tls(&probe);
                if weaknesses.is_empty() {
                    Finding::passed(
                        self.name(),
                        self.description(),
                        format!(
                            "Protocol {} with cipher {} is acceptable",
                            probe.protocol.as_deref().unwrap_or("unknown"),
                            probe.cipher_suite.as_deref().unwrap_or("unknown"),
                        ),
                    )
                } else {
                    Finding::failed(
                        self.name(),
                        self.description(),
                        weaknesses.join(" | "),
                        Severity::Medium,
                    )
                    .with_recommendation(
                        "Disable SSLv3/TLS 1.0/TLS 1.1 and weak ciphers; prefer TLS 1.2+ with AEAD suites.",
                    )
                }
            }
            Err(e) => Finding::failed(
                self.name(),
                self.description(),
                format!("TLS probe failed: {e}"),
                Severity::Medium,
            )
            .with_recommendation("Verify the host accepts TLS connections on the scanned port."),
        };
        Ok(vec![finding])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weak_protocol_is_flagged() {
        let probe = TlsProbe {
            protocol: Some("TLSv1.1".to_string()),
            cipher_suite: Some("ECDHE-RSA-AES128-GCM-SHA256".to_string()),
            cipher_bits: Some(128),
            ..TlsProbe::default()
        };
        let weaknesses = evaluate_tls(&probe);
        assert_eq!(weaknesses.len(), 1);
        assert!(weaknesses[0].contains("TLSv1.1"));
    }

    #[test]
    fn short_key_is_flagged() {
        let probe = TlsProbe {
            protocol: Some("TLSv1.2".to_string()),
            cipher_suite: Some("ECDHE-RSA-DES-CBC3-SHA".to_string()),
            cipher_bits: Some(112),
            ..TlsProbe::default()
        };
        let weaknesses = evaluate_tls(&probe);
        assert!(weaknesses.iter().any(|w| w.contains("112-bit")));
        assert!(weaknesses.iter().any(|w| w.contains("DES")));
    }

    #[test]
    fn modern_configuration_passes() {
        let probe = TlsProbe {
            protocol: Some("TLSv1.3".to_string()),
            cipher_suite: Some("TLS_AES_256_GCM_SHA384".to_string()),
            cipher_bits: Some(256),
            verified: true,
            ..TlsProbe::default()
        };
        assert!(evaluate_tls(&probe).is_empty());
    }
}
