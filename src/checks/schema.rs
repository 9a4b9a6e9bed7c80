//! Structured data (JSON-LD) validation.
//!
//! Blocks whose body is a JSX expression such as `{JSON.stringify(x)}` or
//! a `dangerouslySetInnerHTML` prop count as present but cannot be
//! validated from source; the rendered page covers them in live mode.

use crate::models::{Category, Issue, Severity};
use regex::Regex;
use serde_json::{json, Value as Json};
use std::sync::LazyLock;

static LD_BLOCK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<script\b[^>]*application/ld\+json[^>]*?(?:/>|>(.*?)</script\s*>)")
        .expect("ld+json block regex")
});
static JSX_EXPRESSION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)^\{\s*[A-Za-z_$][\w$.]*\s*(?:\(.*\))?\s*\}$").expect("jsx expression regex")
});

const BUSINESS_TYPES: [&str; 7] = [
    "LocalBusiness",
    "MedicalBusiness",
    "MedicalClinic",
    "Physician",
    "Dentist",
    "Physiotherapy",
    "HealthAndBeautyBusiness",
];
const BUSINESS_REQUIRED: [&str; 2] = ["address", "telephone"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    /// Literal JSON text to validate.
    Literal(String),
    /// Present, but generated at render time.
    Opaque,
}

pub fn blocks(text: &str) -> Vec<Block> {
    LD_BLOCK
        .captures_iter(text)
        .map(|caps| {
            let body = caps.get(1).map(|m| m.as_str().trim()).unwrap_or("");
            if body.is_empty() || JSX_EXPRESSION.is_match(body) {
                Block::Opaque
            } else {
                Block::Literal(body.to_string())
            }
        })
        .collect()
}

fn is_business(t: &str) -> bool {
    BUSINESS_TYPES.contains(&t) || t.ends_with("Business")
}

fn types_of(node: &serde_json::Map<String, Json>) -> Vec<String> {
    match node.get("@type") {
        Some(Json::String(s)) => vec![s.clone()],
        Some(Json::Array(items)) => items
            .iter()
            .filter_map(|v| v.as_str().map(String::from))
            .collect(),
        _ => Vec::new(),
    }
}

fn validate_node(file: &str, node: &Json, issues: &mut Vec<Issue>) {
    let Some(obj) = node.as_object() else {
        issues.push(Issue::new(
            Category::Schema,
            Severity::High,
            file,
            "Structured data entry is not an object",
        ));
        return;
    };
    let types = types_of(obj);
    if types.is_empty() {
        issues.push(Issue::new(
            Category::Schema,
            Severity::High,
            file,
            "Structured data missing @type",
        ));
        return;
    }
    if let Some(t) = types.iter().find(|t| is_business(t)) {
        for field in BUSINESS_REQUIRED {
            if obj.get(field).map_or(true, Json::is_null) {
                issues.push(
                    Issue::new(
                        Category::Schema,
                        Severity::High,
                        file,
                        format!("{} schema missing required field: {}", t, field),
                    )
                    .with_details(json!({ "type": t, "field": field })),
                );
            }
        }
    }
    if types.iter().any(|t| t == "BreadcrumbList")
        && !obj.get("itemListElement").is_some_and(Json::is_array)
    {
        issues.push(Issue::new(
            Category::Schema,
            Severity::High,
            file,
            "BreadcrumbList schema missing itemListElement array",
        ));
    }
}

/// Validate literal structured-data blocks. Returns issues plus the total
/// block count (literal and opaque).
pub fn validate(file: &str, text: &str) -> (Vec<Issue>, usize) {
    let found = blocks(text);
    let mut issues = Vec::new();
    for block in &found {
        let Block::Literal(body) = block else { continue };
        let value: Json = match serde_json::from_str(body) {
            Ok(v) => v,
            Err(e) => {
                issues.push(
                    Issue::new(
                        Category::Schema,
                        Severity::High,
                        file,
                        format!("Invalid structured data JSON: {}", e),
                    )
                    .with_details(json!({ "line": e.line(), "column": e.column() })),
                );
                continue;
            }
        };
        match &value {
            Json::Array(items) => items.iter().for_each(|n| validate_node(file, n, &mut issues)),
            Json::Object(obj) if obj.get("@graph").is_some_and(Json::is_array) => {
                if let Some(Json::Array(items)) = obj.get("@graph") {
                    items.iter().for_each(|n| validate_node(file, n, &mut issues));
                }
            }
            other => validate_node(file, other, &mut issues),
        }
    }
    (issues, found.len())
}

pub fn is_critical(file: &str, critical_pages: &[String]) -> bool {
    critical_pages
        .iter()
        .any(|c| !c.is_empty() && file.contains(c.as_str()))
}

pub fn check(file: &str, text: &str, critical_pages: &[String]) -> Vec<Issue> {
    let (mut issues, count) = validate(file, text);
    if count == 0 && is_critical(file, critical_pages) {
        issues.push(Issue::new(
            Category::Schema,
            Severity::Medium,
            file,
            "Critical page missing structured data",
        ));
    }
    issues
}
