//! Content quality: text-to-markup ratio and word count.
//!
//! Thin wrapper pages that import a `*Content` component are skipped in
//! static mode; their real text is only measurable on the rendered page.

use crate::config::Thresholds;
use crate::models::{Category, Issue, Severity};
use crate::text::{analyze, TextStats};
use regex::Regex;
use serde_json::json;
use std::sync::LazyLock;

static IMPORT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^\s*import\s").expect("import regex"));
static CONTENT_COMPONENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b[A-Z][A-Za-z0-9]*Content\b").expect("content ident regex"));

pub fn is_wrapper(text: &str) -> bool {
    IMPORT.is_match(text) && CONTENT_COMPONENT.is_match(text)
}

/// Threshold issues for measured text stats. Shared with the live crawler.
pub fn stats_issues(file: &str, stats: &TextStats, t: &Thresholds) -> Vec<Issue> {
    let mut issues = Vec::new();
    if stats.ratio < t.min_text_ratio {
        issues.push(
            Issue::new(
                Category::ContentQuality,
                Severity::High,
                file,
                format!(
                    "Low text-to-HTML ratio: {:.1}% (min {:.0}%)",
                    stats.ratio * 100.0,
                    t.min_text_ratio * 100.0
                ),
            )
            .with_details(json!({ "text_len": stats.text_len, "total_len": stats.total_len })),
        );
    }
    if stats.words < t.min_word_count {
        issues.push(
            Issue::new(
                Category::ContentQuality,
                Severity::Medium,
                file,
                format!("Thin content: {} words (min {})", stats.words, t.min_word_count),
            )
            .with_details(json!({ "words": stats.words })),
        );
    }
    issues
}

pub fn check(file: &str, text: &str, t: &Thresholds) -> Vec<Issue> {
    if is_wrapper(text) {
        tracing::debug!(file, "skipping content check for wrapper page");
        return Vec::new();
    }
    stats_issues(file, &analyze(text), t)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prose(words: usize) -> String {
        vec!["treatment"; words].join(" ")
    }

    #[test]
    fn test_wrapper_pages_are_skipped() {
        let src = "import AboutContent from '@/components/AboutContent'\n\
                   export default function Page() { return <AboutContent /> }";
        assert!(is_wrapper(src));
        assert!(check("app/about/page.tsx", src, &Thresholds::default()).is_empty());
    }

    #[test]
    fn test_thin_markup_heavy_page() {
        let src = "<div className=\"grid grid-cols-3 gap-4 p-8\"><span className=\"x\">Hi</span></div>";
        let issues = check("app/page.tsx", src, &Thresholds::default());
        let sevs: Vec<Severity> = issues.iter().map(|i| i.severity).collect();
        assert_eq!(sevs, vec![Severity::High, Severity::Medium]);
    }

    #[test]
    fn test_rich_page_is_clean() {
        let src = format!("<main><p>{}</p></main>", prose(300));
        assert!(check("app/page.tsx", &src, &Thresholds::default()).is_empty());
    }

    #[test]
    fn test_word_floor_is_configurable() {
        let src = format!("<p>{}</p>", prose(50));
        let t = Thresholds {
            min_word_count: 40,
            ..Thresholds::default()
        };
        assert!(check("app/page.tsx", &src, &t).is_empty());
    }
}
