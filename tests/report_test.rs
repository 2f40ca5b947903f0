//! End-to-end aggregator tests: report shape, invariants, and the
//! accessibility failure path

use websecura::config::ScanConfig;
use websecura::models::Severity;
use websecura::scanner::ScanEngine;
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn fast_config() -> ScanConfig {
    ScanConfig {
        timeout_secs: 5,
        probe_timeout_secs: 2,
        deadline_secs: 30,
        ..ScanConfig::default()
    }
}

#[tokio::test]
async fn unreachable_target_yields_single_accessibility_finding() {
    let engine = ScanEngine::with_defaults();
    // Nothing listens on port 1
    let report = engine
        .scan(&fast_config(), "http://127.0.0.1:1")
        .await
        .expect("scan returns a report, not an error");

    assert_eq!(report.findings.len(), 1);
    let finding = &report.findings[0];
    assert_eq!(finding.check, "Website Accessibility");
    assert!(!finding.passed);
    assert_eq!(finding.severity, Severity::High);
    assert_eq!(report.summary.total, 1);
    assert_eq!(report.summary.failed, 1);
}

#[tokio::test]
async fn schemeless_target_is_normalized_to_https() {
    // https:// is prepended, so the fetch targets a TLS port nothing
    // listens on and the report short-circuits to the accessibility finding
    let engine = ScanEngine::with_defaults();
    let report = engine
        .scan(&fast_config(), "127.0.0.1:1")
        .await
        .expect("report");

    assert!(
        report.url.starts_with("https://127.0.0.1:1"),
        "reported URL should be normalized: {}",
        report.url
    );
}

#[tokio::test]
async fn empty_target_fails_fast() {
    let engine = ScanEngine::with_defaults();
    assert!(engine.scan(&fast_config(), "   ").await.is_err());
}

#[tokio::test]
async fn full_scan_produces_consistent_report() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("Content-Type", "text/html")
                .insert_header("Strict-Transport-Security", "max-age=31536000")
                .insert_header("X-Content-Type-Options", "nosniff")
                .insert_header("X-Frame-Options", "DENY")
                .insert_header("Content-Security-Policy", "default-src 'self'")
                .insert_header("X-XSS-Protection", "1; mode=block")
                .set_body_string("<html><body><p>hello</p></body></html>"),
        )
        .mount(&mock_server)
        .await;

    let engine = ScanEngine::with_defaults();
    let report = engine
        .scan(&fast_config(), &mock_server.uri())
        .await
        .expect("report");

    // Summary invariants
    assert_eq!(report.summary.total, report.findings.len());
    assert_eq!(
        report.summary.passed + report.summary.failed,
        report.summary.total
    );

    // Severity is none exactly when the finding passed
    for finding in &report.findings {
        assert_eq!(
            finding.severity == Severity::None,
            finding.passed,
            "severity/passed mismatch in '{}'",
            finding.check
        );
        assert!(
            !finding.recommendation.is_empty(),
            "'{}' should always carry a recommendation",
            finding.check
        );
    }

    // Execution order is the registry order
    assert_eq!(report.findings[0].check, "HTTPS Encryption");
    assert_eq!(report.findings.len(), 15);

    // The mock serves plain HTTP, so HTTPS-dependent checks fail while the
    // well-configured headers pass
    let by_name = |name: &str| {
        report
            .findings
            .iter()
            .find(|f| f.check == name)
            .unwrap_or_else(|| panic!("missing finding {name}"))
    };
    assert!(!by_name("HTTPS Encryption").passed);
    assert!(by_name("HTTP Strict Transport Security (HSTS)").passed);
    assert!(by_name("X-Frame-Options").passed);
    assert!(by_name("Clickjacking Protection").passed);
    assert!(by_name("Content Security Policy (CSP)").passed);
    assert!(!by_name("SSL/TLS Configuration").passed);
    assert!(by_name("Directory/File Exposure").passed);
}

#[tokio::test]
async fn truncated_body_surfaces_as_accessibility_finding() {
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    // A server that advertises a 1000 byte body but closes after 7 bytes.
    // Reading the body must fail the fetch, not yield an empty page.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind");
    let addr = listener.local_addr().expect("addr");
    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            let mut buf = [0u8; 1024];
            let _ = socket.read(&mut buf).await;
            let _ = socket
                .write_all(b"HTTP/1.1 200 OK\r\nContent-Length: 1000\r\n\r\npartial")
                .await;
            let _ = socket.shutdown().await;
        }
    });

    let engine = ScanEngine::with_defaults();
    let report = engine
        .scan(&fast_config(), &format!("http://{addr}"))
        .await
        .expect("report");

    assert_eq!(report.findings.len(), 1);
    assert_eq!(report.findings[0].check, "Website Accessibility");
    assert!(!report.findings[0].passed);
    assert_eq!(report.findings[0].severity, Severity::High);
}

#[tokio::test]
async fn deadline_expiry_yields_partial_report() {
    let mock_server = MockServer::start().await;

    // The landing page responds instantly; every probed path stalls well
    // past the scan deadline, cutting the scan off at the exposure check.
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("Content-Type", "text/html")
                .set_body_string("<html><body><p>hello</p></body></html>"),
        )
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404).set_delay(Duration::from_secs(30)))
        .mount(&mock_server)
        .await;

    let config = ScanConfig {
        deadline_secs: 2,
        probe_timeout_secs: 60,
        ..fast_config()
    };
    let engine = ScanEngine::with_defaults();
    let report = engine
        .scan(&config, &mock_server.uri())
        .await
        .expect("report");

    // Checks before the stalled one completed; checks after it never ran
    assert!(
        report.findings.len() < 15,
        "expected a partial report, got {} findings",
        report.findings.len()
    );
    let last = report.findings.last().expect("at least one finding");
    assert_eq!(last.check, "Directory/File Exposure");
    assert!(!last.passed);
    assert!(last.details.contains("could not complete"));

    // Summary invariants hold for partial reports too
    assert_eq!(report.summary.total, report.findings.len());
    assert_eq!(
        report.summary.passed + report.summary.failed,
        report.summary.total
    );
}

#[tokio::test]
async fn retry_exhaustion_surfaces_as_accessibility_finding() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&mock_server)
        .await;

    let config = ScanConfig {
        backoff_secs: 0,
        ..fast_config()
    };
    let engine = ScanEngine::with_defaults();
    let report = engine
        .scan(&config, &mock_server.uri())
        .await
        .expect("report");

    assert_eq!(report.findings.len(), 1);
    assert_eq!(report.findings[0].check, "Website Accessibility");
    assert!(report.findings[0].details.contains("Failed to access website"));
}
