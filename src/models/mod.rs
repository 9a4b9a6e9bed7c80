//! Shared data models for audit findings, routes, and crawl results.

pub mod crawl;
pub mod route;

use serde::Serialize;
use serde_json::Value as Json;
use std::fmt;

pub use crawl::{CrawlResult, CrawlStats};
pub use route::{Route, RoutePattern, Segment};

/// Sentinel file name for repository-wide findings.
pub const ROOT_FILE: &str = "ROOT";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
/// Issue severity. Weights feed the health score.
pub enum Severity {
    High,
    Medium,
    Low,
}

impl Severity {
    pub const ALL: [Severity; 3] = [Severity::High, Severity::Medium, Severity::Low];

    /// Score penalty per issue of this severity.
    pub fn weight(self) -> f64 {
        match self {
            Severity::High => 5.0,
            Severity::Medium => 2.0,
            Severity::Low => 0.5,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Severity::High => "HIGH",
            Severity::Medium => "MEDIUM",
            Severity::Low => "LOW",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Issue category. Declaration order is the report's grouping order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Category {
    Metadata,
    Structure,
    ContentQuality,
    Schema,
    BrokenLinks,
    Sitemap,
    GlobalFiles,
    Performance,
    Crawlability,
    LinkGraph,
    ExternalLinks,
    Keywords,
}

impl Category {
    pub fn as_str(self) -> &'static str {
        match self {
            Category::Metadata => "Metadata",
            Category::Structure => "Structure",
            Category::ContentQuality => "Content Quality",
            Category::Schema => "Schema",
            Category::BrokenLinks => "Broken Links",
            Category::Sitemap => "Sitemap",
            Category::GlobalFiles => "Global Files",
            Category::Performance => "Performance",
            Category::Crawlability => "Crawlability",
            Category::LinkGraph => "Link Graph",
            Category::ExternalLinks => "External Links",
            Category::Keywords => "Keywords",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Category {
    fn serialize<S: serde::Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
/// A single audit finding attributed to a file (or `ROOT`).
pub struct Issue {
    pub category: Category,
    pub severity: Severity,
    pub file: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Json>,
}

impl Issue {
    pub fn new(
        category: Category,
        severity: Severity,
        file: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Issue {
            category,
            severity,
            file: file.into(),
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: Json) -> Self {
        self.details = Some(details);
        self
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
/// Per-severity issue counts.
pub struct SeverityCounts {
    pub high: usize,
    pub medium: usize,
    pub low: usize,
}

impl SeverityCounts {
    pub fn from_issues(issues: &[Issue]) -> Self {
        let mut counts = SeverityCounts::default();
        for is in issues {
            match is.severity {
                Severity::High => counts.high += 1,
                Severity::Medium => counts.medium += 1,
                Severity::Low => counts.low += 1,
            }
        }
        counts
    }

    pub fn get(&self, sev: Severity) -> usize {
        match sev {
            Severity::High => self.high,
            Severity::Medium => self.medium,
            Severity::Low => self.low,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Static,
    Live,
}

impl Mode {
    pub fn as_str(self) -> &'static str {
        match self {
            Mode::Static => "static",
            Mode::Live => "live",
        }
    }
}

#[derive(Debug, Clone)]
/// Everything one audit run produced, ready for rendering.
pub struct AuditOutcome {
    pub mode: Mode,
    pub routes: Vec<Route>,
    pub files_scanned: usize,
    pub issues: Vec<Issue>,
    pub crawl: Option<CrawlStats>,
}

impl AuditOutcome {
    pub fn counts(&self) -> SeverityCounts {
        SeverityCounts::from_issues(&self.issues)
    }

    pub fn pages(&self) -> usize {
        self.routes.len()
    }
}
