//! Raw TLS handshake probe
//!
//! Opens a direct connection to the target host, separate from the content
//! fetch, to extract the negotiated protocol version, cipher suite, and
//! certificate attributes. A verifying handshake runs first; on verification
//! failure a permissive handshake extracts protocol/cipher for diagnostics
//! and the probe is marked unverified.

use crate::error::{Result, ScanError};
use openssl::ssl::{SslConnector, SslMethod, SslVerifyMode};
use std::net::{TcpStream, ToSocketAddrs};
use std::time::Duration;
use tracing::{debug, warn};

/// Outcome of one TLS handshake against the target
#[derive(Debug, Clone, Default)]
pub struct TlsProbe {
    /// Negotiated protocol version, e.g. "TLSv1.3"
    pub protocol: Option<String>,
    /// Negotiated cipher suite name, e.g. "TLS_AES_256_GCM_SHA384"
    pub cipher_suite: Option<String>,
    /// Secret key bits of the negotiated cipher
    pub cipher_bits: Option<u32>,
    /// Certificate subject, e.g. "CN=example.com"
    pub cert_subject: Option<String>,
    /// DNS names from the certificate's Subject Alternative Name extension
    pub cert_sans: Vec<String>,
    /// True when the verifying handshake (trusted roots + hostname) succeeded
    pub verified: bool,
    /// Verification error detail when `verified` is false
    pub verify_detail: Option<String>,
}

/// Performs the TLS probe against `host:port` with the given connect timeout.
///
/// The openssl handshake is blocking, so the whole probe runs on the blocking
/// thread pool.
pub async fn probe_tls(host: &str, port: u16, timeout: Duration) -> Result<TlsProbe> {
    let host = host.to_string();
    tokio::task::spawn_blocking(move || probe_blocking(&host, port, timeout)).await?
}

fn probe_blocking(host: &str, port: u16, timeout: Duration) -> Result<TlsProbe> {
    let addr = format!("{host}:{port}")
        .to_socket_addrs()?
        .next()
        .ok_or_else(|| ScanError::TargetUnreachable(format!("could not resolve {host}:{port}")))?;

    // Verifying handshake first: trusted root store plus hostname check.
    match handshake(host, &addr, timeout, true) {
        Ok(probe) => Ok(probe),
        Err(verify_err) => {
            warn!("Verified TLS handshake with {host}:{port} failed: {verify_err}");
            // Fall back to a permissive handshake solely to extract
            // protocol/cipher for diagnostic purposes.
            let mut probe = handshake(host, &addr, timeout, false)
                .map_err(|e| ScanError::TlsHandshake(e.to_string()))?;
            probe.verified = false;
            probe.verify_detail = Some(verify_err.to_string());
            Ok(probe)
        }
    }
}

fn handshake(
    host: &str,
    addr: &std::net::SocketAddr,
    timeout: Duration,
    verify: bool,
) -> Result<TlsProbe> {
    let mut builder = SslConnector::builder(SslMethod::tls())?;
    if !verify {
        builder.set_verify(SslVerifyMode::NONE);
    }
    let connector = builder.build();

    let tcp = TcpStream::connect_timeout(addr, timeout)?;
    tcp.set_read_timeout(Some(timeout))?;
    tcp.set_write_timeout(Some(timeout))?;

    let stream = if verify {
        connector
            .connect(host, tcp)
            .map_err(|e| ScanError::TlsHandshake(e.to_string()))?
    } else {
        // Skips hostname verification along with the cert chain check.
        let mut configuration = connector.configure()?;
        configuration.set_verify_hostname(false);
        configuration
            .connect(host, tcp)
            .map_err(|e| ScanError::TlsHandshake(e.to_string()))?
    };

    let ssl = stream.ssl();
    let mut probe = TlsProbe {
        protocol: Some(ssl.version_str().to_string()),
        cipher_suite: ssl.current_cipher().map(|c| c.name().to_string()),
        cipher_bits: ssl.current_cipher().map(|c| c.bits().secret as u32),
        verified: verify,
        ..TlsProbe::default()
    };

    if let Some(cert) = ssl.peer_certificate() {
        let subject = cert
            .subject_name()
            .entries()
            .filter_map(|e| {
                let key = e.object().nid().short_name().ok()?;
                let value = e.data().to_string().ok()?;
                Some(format!("{key}={value}"))
            })
            .collect::<Vec<_>>()
            .join(", ");
        if !subject.is_empty() {
            probe.cert_subject = Some(subject);
        }
        if let Some(sans) = cert.subject_alt_names() {
            probe.cert_sans = sans
                .iter()
                .filter_map(|san| san.dnsname().map(String::from))
                .collect();
        }
    }

    debug!(
        "TLS handshake with {host} (verify={verify}): {:?} {:?}",
        probe.protocol, probe.cipher_suite
    );
    Ok(probe)
}
