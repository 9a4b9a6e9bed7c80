//! Route records and compiled matchers for parameterized routes.

use serde::Serialize;
use std::fmt;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
/// One segment of a route template.
pub enum Segment {
    Static(String),
    /// `[name]`: exactly one path segment.
    Param(String),
    /// `[...name]` (one or more segments) or `[[...name]]` (zero or more).
    CatchAll { name: String, optional: bool },
}

impl Segment {
    /// Parse a directory name into a segment.
    pub fn parse(raw: &str) -> Segment {
        if let Some(inner) = raw
            .strip_prefix("[[...")
            .and_then(|s| s.strip_suffix("]]"))
        {
            return Segment::CatchAll {
                name: inner.to_string(),
                optional: true,
            };
        }
        if let Some(inner) = raw.strip_prefix("[...").and_then(|s| s.strip_suffix(']')) {
            return Segment::CatchAll {
                name: inner.to_string(),
                optional: false,
            };
        }
        if let Some(inner) = raw.strip_prefix('[').and_then(|s| s.strip_suffix(']')) {
            return Segment::Param(inner.to_string());
        }
        Segment::Static(raw.to_string())
    }

    pub fn is_dynamic(&self) -> bool {
        !matches!(self, Segment::Static(_))
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Segment::Static(s) => f.write_str(s),
            Segment::Param(name) => write!(f, ":{}", name),
            Segment::CatchAll {
                name,
                optional: false,
            } => write!(f, "*{}", name),
            Segment::CatchAll {
                name,
                optional: true,
            } => write!(f, "*{}?", name),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
/// A route template compiled once during discovery and reused for every
/// link check.
pub struct RoutePattern {
    pub segments: Vec<Segment>,
}

impl RoutePattern {
    pub fn from_segments(raw: &[&str]) -> RoutePattern {
        RoutePattern {
            segments: raw.iter().map(|s| Segment::parse(s)).collect(),
        }
    }

    /// Normalized wildcard form, e.g. `/conditions/:slug`.
    pub fn normalized(&self) -> String {
        if self.segments.is_empty() {
            return "/".to_string();
        }
        let parts: Vec<String> = self.segments.iter().map(|s| s.to_string()).collect();
        format!("/{}", parts.join("/"))
    }

    /// Whether a concrete path (no query or fragment) matches this template.
    pub fn matches(&self, path: &str) -> bool {
        let parts: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        match_from(&self.segments, &parts)
    }
}

fn match_from(segs: &[Segment], parts: &[&str]) -> bool {
    match segs.split_first() {
        None => parts.is_empty(),
        Some((Segment::Static(s), rest)) => {
            parts.first() == Some(&s.as_str()) && match_from(rest, &parts[1..])
        }
        Some((Segment::Param(_), rest)) => !parts.is_empty() && match_from(rest, &parts[1..]),
        Some((Segment::CatchAll { optional, .. }, rest)) => {
            let min = if *optional { 0 } else { 1 };
            (min..=parts.len()).any(|n| match_from(rest, &parts[n..]))
        }
    }
}

#[derive(Debug, Clone, Serialize)]
/// A page discovered on disk and the logical URL it serves.
pub struct Route {
    pub path: String,
    /// Absolute location of the page file.
    #[serde(skip)]
    pub source_file: PathBuf,
    /// Source file relative to the project root, used in issues.
    pub file: String,
    pub is_dynamic: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pattern: Option<RoutePattern>,
}

impl Route {
    /// Build a route from the URL-visible directory names under the app dir.
    pub fn new(segments: &[&str], source_file: PathBuf, file: String) -> Route {
        let compiled = RoutePattern::from_segments(segments);
        let is_dynamic = compiled.segments.iter().any(Segment::is_dynamic);
        let path = if segments.is_empty() {
            "/".to_string()
        } else {
            format!("/{}", segments.join("/"))
        };
        Route {
            path,
            source_file,
            file,
            is_dynamic,
            pattern: if is_dynamic { Some(compiled) } else { None },
        }
    }

    pub fn is_home(&self) -> bool {
        self.path == "/"
    }
}
