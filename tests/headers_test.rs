//! Integration tests for the header-based checks

mod common;

use common::{ctx, page};
use websecura::models::Severity;
use websecura::scanner::clickjacking::ClickjackingCheck;
use websecura::scanner::cookies::CookieSecurityCheck;
use websecura::scanner::headers::{
    ContentTypeOptionsCheck, CspCheck, FrameOptionsCheck, HstsCheck, ServerInfoCheck,
};
use websecura::scanner::Check;

const TARGET: &str = "https://example.com/";

#[tokio::test]
async fn hsts_passes_when_header_present() {
    let context = ctx(
        TARGET,
        page(200, &[("Strict-Transport-Security", "max-age=31536000")], ""),
    );
    let findings = HstsCheck.run(&context).await.expect("check");
    assert_eq!(findings.len(), 1);
    assert!(findings[0].passed);
    assert_eq!(findings[0].severity, Severity::None);
    assert!(findings[0].details.contains("max-age=31536000"));
}

#[tokio::test]
async fn hsts_fails_when_header_missing() {
    let context = ctx(TARGET, page(200, &[], ""));
    let findings = HstsCheck.run(&context).await.expect("check");
    assert!(!findings[0].passed);
    assert_eq!(findings[0].severity, Severity::Medium);
    assert!(!findings[0].recommendation.is_empty());
}

#[tokio::test]
async fn content_type_options_is_case_insensitive() {
    let context = ctx(TARGET, page(200, &[("X-Content-Type-Options", "NOSNIFF")], ""));
    let findings = ContentTypeOptionsCheck.run(&context).await.expect("check");
    assert!(findings[0].passed);
}

#[tokio::test]
async fn frame_options_rejects_unexpected_value() {
    let context = ctx(TARGET, page(200, &[("X-Frame-Options", "ALLOW-FROM https://a")], ""));
    let findings = FrameOptionsCheck.run(&context).await.expect("check");
    assert!(!findings[0].passed);
    assert_eq!(findings[0].severity, Severity::Medium);
}

#[tokio::test]
async fn frame_options_accepts_sameorigin() {
    let context = ctx(TARGET, page(200, &[("X-Frame-Options", "sameorigin")], ""));
    let findings = FrameOptionsCheck.run(&context).await.expect("check");
    assert!(findings[0].passed);
}

#[tokio::test]
async fn server_info_disclosure_is_low_severity() {
    let context = ctx(
        TARGET,
        page(
            200,
            &[("Server", "Apache/2.4.51"), ("X-Powered-By", "PHP/8.1.2")],
            "",
        ),
    );
    let findings = ServerInfoCheck.run(&context).await.expect("check");
    assert!(!findings[0].passed);
    assert_eq!(findings[0].severity, Severity::Low);
    assert!(findings[0].details.contains("Apache/2.4.51"));
    assert!(findings[0].details.contains("PHP/8.1.2"));
}

#[tokio::test]
async fn csp_presence_passes() {
    let context = ctx(
        TARGET,
        page(200, &[("Content-Security-Policy", "default-src 'self'")], ""),
    );
    let findings = CspCheck.run(&context).await.expect("check");
    assert!(findings[0].passed);
}

#[tokio::test]
async fn clickjacking_fails_without_any_protection() {
    let context = ctx(TARGET, page(200, &[], ""));
    let findings = ClickjackingCheck.run(&context).await.expect("check");
    assert!(!findings[0].passed);
    assert_eq!(findings[0].severity, Severity::Medium);
    assert!(findings[0].details.contains("No clickjacking protection"));
}

#[tokio::test]
async fn clickjacking_accepts_csp_frame_ancestors() {
    let context = ctx(
        TARGET,
        page(
            200,
            &[("Content-Security-Policy", "frame-ancestors 'none'")],
            "",
        ),
    );
    let findings = ClickjackingCheck.run(&context).await.expect("check");
    assert!(findings[0].passed);
}

#[tokio::test]
async fn cookies_pass_when_none_are_set() {
    let context = ctx(TARGET, page(200, &[], ""));
    let findings = CookieSecurityCheck.run(&context).await.expect("check");
    assert!(findings[0].passed);
    assert!(findings[0].details.contains("No cookies"));
}

#[tokio::test]
async fn cookies_fail_and_name_missing_flags() {
    let context = ctx(
        TARGET,
        page(200, &[("Set-Cookie", "session=abc123; Path=/")], ""),
    );
    let findings = CookieSecurityCheck.run(&context).await.expect("check");
    assert!(!findings[0].passed);
    assert_eq!(findings[0].severity, Severity::Medium);
    for flag in ["Secure", "HttpOnly", "SameSite"] {
        assert!(
            findings[0].details.contains(flag),
            "details should name missing flag {flag}: {}",
            findings[0].details
        );
    }
}

#[tokio::test]
async fn cookies_pass_with_all_flags_on_every_cookie() {
    let context = ctx(
        TARGET,
        page(
            200,
            &[
                ("Set-Cookie", "session=abc; Secure; HttpOnly; SameSite=Lax"),
                ("Set-Cookie", "pref=1; Secure; HttpOnly; SameSite=Strict"),
            ],
            "",
        ),
    );
    let findings = CookieSecurityCheck.run(&context).await.expect("check");
    assert!(findings[0].passed);
}
