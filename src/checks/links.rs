//! Hyperlink extraction and internal link validation.
//!
//! Targets are pulled from `href=` attributes and `href:` object fields with
//! a tolerant pattern, since source files are not valid markup on their own.
//! Validity depends only on the target and the static route set, so results
//! are memoized per run.

use crate::config::Effective;
use crate::error::Result;
use crate::models::{Category, Issue, Route, RoutePattern, Severity};
use crate::sources::compile_patterns;
use glob::Pattern;
use regex::Regex;
use serde_json::json;
use std::collections::{BTreeSet, HashMap, HashSet};
use std::fs;
use std::sync::LazyLock;

static HREF: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"\bhref\s*[:=]\s*\{?\s*(?:"([^"]*)"|'([^']*)'|`([^`]*)`)"#).expect("href regex")
});

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkTarget {
    /// Site-relative path with query and fragment removed.
    Internal(String),
    External(String),
    /// Anchors, mail/phone links, relative and interpolated targets.
    Skip,
}

/// Distinct raw targets referenced in a file.
pub fn extract_targets(text: &str) -> BTreeSet<String> {
    HREF.captures_iter(text)
        .filter_map(|caps| (1..=3).find_map(|i| caps.get(i)))
        .map(|m| m.as_str().trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

pub fn classify(raw: &str) -> LinkTarget {
    let raw = raw.trim();
    if raw.is_empty()
        || raw.starts_with('#')
        || ["mailto:", "tel:", "sms:", "javascript:"]
            .iter()
            .any(|p| raw.starts_with(p))
        || raw.contains("${")
        || raw.contains(['{', '}'])
    {
        return LinkTarget::Skip;
    }
    if raw.starts_with("http://") || raw.starts_with("https://") {
        return LinkTarget::External(raw.to_string());
    }
    if let Some(rest) = raw.strip_prefix("//") {
        return LinkTarget::External(format!("https://{}", rest));
    }
    if raw.starts_with('/') {
        return LinkTarget::Internal(normalize_path(raw));
    }
    LinkTarget::Skip
}

/// Drop query/fragment and trailing slash; `/` stays `/`.
pub fn normalize_path(raw: &str) -> String {
    let cut = raw.find(['?', '#']).map_or(raw, |i| &raw[..i]);
    let trimmed = cut.trim_end_matches('/');
    if trimmed.is_empty() {
        "/".to_string()
    } else {
        trimmed.to_string()
    }
}

/// Internal paths referenced by a file.
pub fn internal_targets(text: &str) -> BTreeSet<String> {
    extract_targets(text)
        .iter()
        .filter_map(|raw| match classify(raw) {
            LinkTarget::Internal(p) => Some(p),
            _ => None,
        })
        .collect()
}

/// Checks internal link targets against discovered routes.
pub struct LinkValidator<'a> {
    eff: &'a Effective,
    static_paths: HashSet<String>,
    dynamic: Vec<&'a RoutePattern>,
    page_patterns: Vec<Pattern>,
    cache: HashMap<String, bool>,
}

impl<'a> LinkValidator<'a> {
    pub fn new(eff: &'a Effective, routes: &'a [Route]) -> Result<Self> {
        Ok(LinkValidator {
            eff,
            static_paths: routes.iter().map(|r| r.path.clone()).collect(),
            dynamic: routes.iter().filter_map(|r| r.pattern.as_ref()).collect(),
            page_patterns: compile_patterns(&eff.page_patterns)?,
            cache: HashMap::new(),
        })
    }

    /// Whether `path` (already normalized) resolves to a page or asset.
    pub fn is_valid(&mut self, path: &str) -> bool {
        if let Some(hit) = self.cache.get(path) {
            return *hit;
        }
        let ok = self.resolve(path);
        self.cache.insert(path.to_string(), ok);
        ok
    }

    /// Number of distinct targets checked so far.
    pub fn checked(&self) -> usize {
        self.cache.len()
    }

    fn resolve(&self, path: &str) -> bool {
        if self.static_paths.contains(path) {
            return true;
        }
        let rel = path.trim_start_matches('/');
        if self.page_on_disk(rel) {
            return true;
        }
        if !rel.is_empty() && self.eff.public_dir.join(rel).is_file() {
            return true;
        }
        self.dynamic.iter().any(|p| p.matches(path))
    }

    fn page_on_disk(&self, rel: &str) -> bool {
        let dir = self.eff.app_dir.join(rel);
        let Ok(entries) = fs::read_dir(&dir) else {
            return false;
        };
        entries.flatten().any(|e| {
            let name = e.file_name().to_string_lossy().to_string();
            self.page_patterns.iter().any(|p| p.matches(&name))
        })
    }

    /// Broken internal links referenced from one file.
    pub fn check_file(&mut self, file: &str, text: &str) -> Vec<Issue> {
        let mut issues = Vec::new();
        for raw in extract_targets(text) {
            let LinkTarget::Internal(path) = classify(&raw) else {
                continue;
            };
            if !self.is_valid(&path) {
                issues.push(
                    Issue::new(
                        Category::BrokenLinks,
                        Severity::High,
                        file,
                        format!("Broken internal link: {}", raw),
                    )
                    .with_details(json!({ "target": path })),
                );
            }
        }
        issues
    }
}
