//! Form security check: password autocomplete, explicit form methods, and
//! sensitive fields submitted over GET

use crate::error::Result;
use crate::models::{Finding, Severity};
use async_trait::async_trait;
use scraper::{ElementRef, Html, Selector};

use super::{Check, ScanContext};

/// Input types that should never travel in a query string
const SENSITIVE_INPUT_TYPES: &[&str] = &["password", "email", "tel"];

fn attr_lower(element: ElementRef<'_>, name: &str) -> Option<String> {
    element.value().attr(name).map(|v| v.trim().to_lowercase())
}

/// Inspects every form in the document and describes each issue found
pub(crate) fn inspect_forms(body: &str) -> Vec<String> {
    let mut issues = Vec::new();
    let document = Html::parse_document(body);

    let Ok(form_sel) = Selector::parse("form") else {
        return issues;
    };
    let Ok(input_sel) = Selector::parse("input") else {
        return issues;
    };

    for (index, form) in document.select(&form_sel).enumerate() {
        let label = format!("form #{}", index + 1);
        let method = attr_lower(form, "method");
        let form_autocomplete_off =
            attr_lower(form, "autocomplete").as_deref() == Some("off");

        if method.is_none() {
            issues.push(format!("{label} has no explicit method attribute"));
        }

        let uses_get = method.as_deref().map_or(false, |m| m == "get");
        let mut sensitive_over_get = Vec::new();

        for input in form.select(&input_sel) {
            let input_type = attr_lower(input, "type").unwrap_or_else(|| "text".to_string());
            let name = input.value().attr("name").unwrap_or("unnamed");

            if input_type == "password" {
                let input_autocomplete_off =
                    attr_lower(input, "autocomplete").as_deref() == Some("off");
                if !input_autocomplete_off && !form_autocomplete_off {
                    issues.push(format!(
                        "{label} password field '{name}' is missing autocomplete=\"off\""
                    ));
                }
            }

            if uses_get && SENSITIVE_INPUT_TYPES.contains(&input_type.as_str()) {
                sensitive_over_get.push(format!("{input_type} field '{name}'"));
            }
        }

        if !sensitive_over_get.is_empty() {
            issues.push(format!(
                "{label} submits sensitive fields via GET: {}",
                sensitive_over_get.join(", ")
            ));
        }
    }

    issues
}

/// Analyzes form markup for insecure submission patterns
pub struct FormSecurityCheck;

#[async_trait]
impl Check for FormSecurityCheck {
    fn name(&self) -> &'static str {
        "Form Security"
    }

    fn description(&self) -> &'static str {
        "Checks form markup for insecure methods and unsafe password field handling"
    }

    fn worst_severity(&self) -> Severity {
        Severity::Medium
    }

    async fn run(&self, ctx: &ScanContext) -> Result<Vec<Finding>> {
        let issues = inspect_forms(&ctx.page.body);

        let finding = if issues.is_empty() {
            Finding::passed(
                self.name(),
                self.description(),
                "No insecure form patterns detected",
            )
        } else {
            Finding::failed(
                self.name(),
                self.description(),
                issues.join(" | "),
                Severity::Medium,
            )
            .with_recommendation(
                "Use POST with an explicit method attribute for forms carrying credentials and set autocomplete=\"off\" on password fields.",
            )
        };
        Ok(vec![finding])
    }
}
