//! Static metadata checks: presence, title/description length, canonical,
//! and noindex markers.
//!
//! Only literal declarations are inspected. Pages that compute metadata via
//! `generateMetadata` are left to the live crawler.

use crate::config::Thresholds;
use crate::models::{Category, Issue, Severity};
use regex::Regex;
use serde_json::json;
use std::sync::LazyLock;

static METADATA_EXPORT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"export\s+(?:const|let|var)\s+metadata\b").expect("metadata export regex")
});
static GENERATE_METADATA: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\bgenerateMetadata\b").expect("generateMetadata regex"));
static TITLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"\btitle\s*:\s*(?:"([^"]*)"|'([^']*)'|`([^`]*)`)"#).expect("title regex")
});
static TITLE_DEFAULT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?s)\btitle\s*:\s*\{[^}]*?\bdefault\s*:\s*(?:"([^"]*)"|'([^']*)'|`([^`]*)`)"#)
        .expect("title default regex")
});
static DESCRIPTION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"\bdescription\s*:\s*(?:"([^"]*)"|'([^']*)'|`([^`]*)`)"#)
        .expect("description regex")
});
static CANONICAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(?:canonical|alternates)\s*:").expect("canonical regex"));
static NOINDEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)\brobots\s*:\s*\{[^}]*?\bindex\s*:\s*false\b|\bnoindex\b")
        .expect("noindex regex")
});

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticMetadata {
    pub title: Option<String>,
    pub description: Option<String>,
    pub has_canonical: bool,
    pub noindex: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MetadataDecl {
    Static(StaticMetadata),
    Dynamic,
    Missing,
}

fn first_string(caps: &regex::Captures<'_>) -> Option<String> {
    (1..=3).find_map(|i| caps.get(i)).map(|m| m.as_str().to_string())
}

/// The object literal assigned to `metadata`, with comments blanked out.
/// An unterminated literal runs to the end of the text; a non-literal
/// initializer (`= base;`) yields an empty string.
fn object_literal(decl: &str) -> String {
    let Some(eq) = decl.find('=') else {
        return String::new();
    };
    let rest = &decl[eq..];
    let open = match rest.find(['{', ';']) {
        Some(i) if rest[i..].starts_with('{') => i,
        _ => return String::new(),
    };
    let mut out = String::new();
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut chars = rest[open..].chars().peekable();
    while let Some(c) = chars.next() {
        if let Some(q) = quote {
            out.push(c);
            if c == '\\' {
                if let Some(n) = chars.next() {
                    out.push(n);
                }
            } else if c == q {
                quote = None;
            }
            continue;
        }
        match c {
            '"' | '\'' | '`' => {
                quote = Some(c);
                out.push(c);
            }
            '/' if chars.peek() == Some(&'/') => {
                for n in chars.by_ref() {
                    if n == '\n' {
                        out.push('\n');
                        break;
                    }
                }
            }
            '/' if chars.peek() == Some(&'*') => {
                chars.next();
                let mut prev = ' ';
                for n in chars.by_ref() {
                    if prev == '*' && n == '/' {
                        break;
                    }
                    prev = n;
                }
                out.push(' ');
            }
            '{' => {
                depth += 1;
                out.push(c);
            }
            '}' => {
                out.push(c);
                depth -= 1;
                if depth == 0 {
                    break;
                }
            }
            _ => out.push(c),
        }
    }
    out
}

/// Locate and extract the page's metadata declaration.
pub fn extract(text: &str) -> MetadataDecl {
    let Some(export) = METADATA_EXPORT.find(text) else {
        if GENERATE_METADATA.is_match(text) {
            return MetadataDecl::Dynamic;
        }
        return MetadataDecl::Missing;
    };
    let literal = object_literal(&text[export.end()..]);
    let decl = literal.as_str();
    let plain = TITLE.captures(decl);
    let templated = TITLE_DEFAULT.captures(decl);
    let title = match (plain, templated) {
        (Some(p), Some(t)) => {
            let p_at = p.get(0).map(|m| m.start()).unwrap_or(usize::MAX);
            let t_at = t.get(0).map(|m| m.start()).unwrap_or(usize::MAX);
            if t_at < p_at {
                first_string(&t)
            } else {
                first_string(&p)
            }
        }
        (Some(p), None) => first_string(&p),
        (None, Some(t)) => first_string(&t),
        (None, None) => None,
    };
    let description = DESCRIPTION.captures(decl).and_then(|c| first_string(&c));
    MetadataDecl::Static(StaticMetadata {
        title,
        description,
        has_canonical: CANONICAL.is_match(decl),
        noindex: NOINDEX.is_match(decl),
    })
}

fn length_issue(file: &str, label: &str, value: &str, min: usize, max: usize) -> Option<Issue> {
    let n = value.chars().count();
    let details = json!({ "length": n, "min": min, "max": max, "value": value });
    if n < min {
        Some(
            Issue::new(
                Category::Metadata,
                Severity::Low,
                file,
                format!("{} too short: {} chars (min {})", label, n, min),
            )
            .with_details(details),
        )
    } else if n > max {
        Some(
            Issue::new(
                Category::Metadata,
                Severity::Medium,
                file,
                format!("{} too long: {} chars (max {})", label, n, max),
            )
            .with_details(details),
        )
    } else {
        None
    }
}

pub fn check(file: &str, text: &str, t: &Thresholds) -> Vec<Issue> {
    let mut issues = Vec::new();
    let meta = match extract(text) {
        MetadataDecl::Missing => {
            issues.push(Issue::new(
                Category::Metadata,
                Severity::High,
                file,
                "Missing metadata export (no `metadata` or `generateMetadata`)",
            ));
            return issues;
        }
        MetadataDecl::Dynamic => return issues,
        MetadataDecl::Static(m) => m,
    };

    match meta.title.as_deref() {
        Some(title) => issues.extend(length_issue(file, "Title", title, t.title_min, t.title_max)),
        None => issues.push(Issue::new(
            Category::Metadata,
            Severity::Medium,
            file,
            "Metadata declares no title",
        )),
    }
    match meta.description.as_deref() {
        Some(desc) => issues.extend(length_issue(
            file,
            "Description",
            desc,
            t.description_min,
            t.description_max,
        )),
        None => issues.push(Issue::new(
            Category::Metadata,
            Severity::Medium,
            file,
            "Metadata declares no description",
        )),
    }
    if !meta.has_canonical {
        issues.push(Issue::new(
            Category::Metadata,
            Severity::Medium,
            file,
            "Missing canonical URL (alternates.canonical)",
        ));
    }
    if meta.noindex {
        issues.push(Issue::new(
            Category::Crawlability,
            Severity::Medium,
            file,
            "Page is marked noindex",
        ));
    }
    issues
}

#[cfg(test)]
mod tests {
    use super::*;

    const DESC: &str = "Expert physiotherapy care for back pain, sports injuries and post-surgical rehabilitation from licensed clinicians near you.";

    fn page(title: &str) -> String {
        page_with(title, DESC)
    }

    fn page_with(title: &str, desc: &str) -> String {
        format!(
            r#"import type {{ Metadata }} from "next";
export const metadata: Metadata = {{
  title: "{}",
  description: "{}",
  alternates: {{ canonical: "/about" }},
}};
export default function Page() {{ return <h1>About</h1>; }}"#,
            title, desc
        )
    }

    fn metadata_issues(text: &str) -> Vec<Issue> {
        check("app/about/page.tsx", text, &Thresholds::default())
    }

    #[test]
    fn test_title_length_boundaries() {
        assert!(DESC.chars().count() >= 120 && DESC.chars().count() <= 160);
        assert!(metadata_issues(&page(&"a".repeat(30))).is_empty());
        assert!(metadata_issues(&page(&"a".repeat(60))).is_empty());

        let short = metadata_issues(&page(&"a".repeat(29)));
        assert_eq!(short.len(), 1);
        assert_eq!(short[0].severity, Severity::Low);
        assert!(short[0].message.starts_with("Title too short"));

        let long = metadata_issues(&page(&"a".repeat(61)));
        assert_eq!(long.len(), 1);
        assert_eq!(long[0].severity, Severity::Medium);
        assert!(long[0].message.starts_with("Title too long"));
    }

    #[test]
    fn test_description_length_boundaries() {
        let title = "a".repeat(40);
        for n in [120, 160] {
            assert!(metadata_issues(&page_with(&title, &"d".repeat(n))).is_empty(), "{}", n);
        }

        let short = metadata_issues(&page_with(&title, &"d".repeat(119)));
        assert_eq!(short.len(), 1);
        assert_eq!(short[0].severity, Severity::Low);
        assert_eq!(short[0].message, "Description too short: 119 chars (min 120)");

        let long = metadata_issues(&page_with(&title, &"d".repeat(161)));
        assert_eq!(long.len(), 1);
        assert_eq!(long[0].severity, Severity::Medium);
        assert_eq!(long[0].message, "Description too long: 161 chars (max 160)");
    }

    #[test]
    fn test_missing_title_and_description_are_medium() {
        let src = r#"export const metadata = { alternates: { canonical: "/about" } };"#;
        let issues = metadata_issues(src);
        let found: Vec<(Severity, &str)> = issues
            .iter()
            .map(|i| (i.severity, i.message.as_str()))
            .collect();
        assert_eq!(
            found,
            vec![
                (Severity::Medium, "Metadata declares no title"),
                (Severity::Medium, "Metadata declares no description"),
            ]
        );
    }

    #[test]
    fn test_fields_outside_the_metadata_object_are_ignored() {
        let src = r#"export const metadata: Metadata = {
  // noindex while the page is in review
  alternates: { canonical: "/team" },
  /* title: "Commented out" */
  other: { note: "braces } inside strings" },
};
const members = [{ title: "Lead physiotherapist", description: "Ten years of sports rehab" }];
// noindex
export default function Team() { return <h1>Team</h1>; }"#;
        match extract(src) {
            MetadataDecl::Static(m) => {
                assert_eq!(m.title, None);
                assert_eq!(m.description, None);
                assert!(m.has_canonical);
                assert!(!m.noindex);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_missing_metadata_is_high() {
        let issues = metadata_issues("export default function Page() { return null }");
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].severity, Severity::High);
    }

    #[test]
    fn test_generate_metadata_is_skipped() {
        let src = "export async function generateMetadata({ params }) { return {} }";
        assert_eq!(extract(src), MetadataDecl::Dynamic);
        assert!(metadata_issues(src).is_empty());
    }

    #[test]
    fn test_missing_canonical_and_noindex() {
        let src = format!(
            "export const metadata = {{ title: '{}', description: '{}', robots: {{ index: false }} }}",
            "a".repeat(40),
            DESC
        );
        let issues = metadata_issues(&src);
        let msgs: Vec<&str> = issues.iter().map(|i| i.message.as_str()).collect();
        assert_eq!(
            msgs,
            vec!["Missing canonical URL (alternates.canonical)", "Page is marked noindex"]
        );
        assert_eq!(issues[1].category, Category::Crawlability);
    }

    #[test]
    fn test_title_template_default_is_used() {
        let src = r#"export const metadata = {
  title: { default: "Short", template: "%s | Clinic" },
  openGraph: { title: "A much longer open graph title that is fine" },
}"#;
        match extract(src) {
            MetadataDecl::Static(m) => assert_eq!(m.title.as_deref(), Some("Short")),
            other => panic!("unexpected {:?}", other),
        }
    }
}
