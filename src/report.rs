//! Health score and Markdown report rendering.
//!
//! Rendering is pure: the same outcome and metadata always produce the same
//! bytes. Only the optional timestamp varies between runs.

use crate::error::Result;
use crate::models::{AuditOutcome, Category, Issue, Mode, Severity, SeverityCounts};
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::fs;
use std::path::Path;

/// Header values not derived from the issue list.
#[derive(Debug, Clone, Default)]
pub struct ReportMeta {
    pub generated_at: Option<String>,
    pub project: String,
    pub base_url: Option<String>,
}

/// `100 - Σ weight`, floored at 0.
pub fn health_score(issues: &[Issue]) -> f64 {
    let penalty: f64 = issues.iter().map(|i| i.severity.weight()).sum();
    (100.0 - penalty).max(0.0)
}

pub fn format_score(score: f64) -> String {
    if score.fract() == 0.0 {
        format!("{:.0}", score)
    } else {
        format!("{:.1}", score)
    }
}

pub fn traffic_light(score: f64) -> &'static str {
    if score >= 80.0 {
        "🟢 Good"
    } else if score >= 50.0 {
        "🟡 Needs work"
    } else {
        "🔴 Poor"
    }
}

pub fn severity_icon(sev: Severity) -> &'static str {
    match sev {
        Severity::High => "✖",
        Severity::Medium => "▲",
        Severity::Low => "◆",
    }
}

/// Timestamp for the report header. `SOURCE_DATE_EPOCH` pins it for
/// reproducible output.
pub fn report_timestamp(enabled: bool) -> Option<String> {
    if !enabled {
        return None;
    }
    let at: DateTime<Utc> = std::env::var("SOURCE_DATE_EPOCH")
        .ok()
        .and_then(|v| v.trim().parse::<i64>().ok())
        .and_then(|secs| DateTime::from_timestamp(secs, 0))
        .unwrap_or_else(Utc::now);
    Some(at.format("%Y-%m-%d %H:%M:%S UTC").to_string())
}

fn render_live_stats(out: &mut String, outcome: &AuditOutcome, meta: &ReportMeta) {
    let Some(stats) = outcome.crawl.as_ref() else {
        return;
    };
    let _ = writeln!(out, "## Live Crawl Statistics\n");
    if let Some(url) = meta.base_url.as_deref() {
        let _ = writeln!(out, "Base URL: `{}`\n", url);
    }
    let _ = writeln!(out, "| Metric | Value |");
    let _ = writeln!(out, "|--------|-------|");
    let _ = writeln!(out, "| Pages crawled | {} |", stats.pages_crawled);
    let _ = writeln!(out, "| Avg load time | {} ms |", stats.avg_load_time_ms);
    if let Some(url) = stats.slowest_url.as_deref() {
        let _ = writeln!(
            out,
            "| Slowest page | {} ({} ms) |",
            url, stats.slowest_load_time_ms
        );
    }
    let _ = writeln!(out, "| Avg word count | {} |", stats.avg_word_count);
    let _ = writeln!(
        out,
        "| Avg text/HTML ratio | {:.1}% |",
        stats.avg_text_html_ratio * 100.0
    );
    let _ = writeln!(out, "| Total HTML size | {} KB |", stats.total_html_bytes / 1024);
    let _ = writeln!(
        out,
        "| Pages with structured data | {} / {} |",
        stats.pages_with_schema, stats.pages_crawled
    );
    let _ = writeln!(
        out,
        "| External links checked | {} |\n",
        stats.external_links_checked
    );
}

fn render_issues(out: &mut String, issues: &[Issue]) {
    let _ = writeln!(out, "## Issues\n");
    if issues.is_empty() {
        let _ = writeln!(out, "No issues found.");
        return;
    }
    let mut grouped: BTreeMap<Category, Vec<&Issue>> = BTreeMap::new();
    for is in issues {
        grouped.entry(is.category).or_default().push(is);
    }
    for (cat, list) in grouped {
        let _ = writeln!(out, "### {} ({})\n", cat, list.len());
        for is in list {
            let _ = writeln!(
                out,
                "- {} **{}** `{}`: {}",
                severity_icon(is.severity),
                is.severity,
                is.file,
                is.message
            );
        }
        let _ = writeln!(out);
    }
}

/// Render the full Markdown report.
pub fn render_markdown(outcome: &AuditOutcome, meta: &ReportMeta) -> String {
    let score = health_score(&outcome.issues);
    let counts: SeverityCounts = outcome.counts();
    let mut out = String::new();

    let _ = writeln!(out, "# SEO Audit Report\n");
    if let Some(at) = meta.generated_at.as_deref() {
        let _ = writeln!(out, "- **Generated:** {}", at);
    }
    if !meta.project.is_empty() {
        let _ = writeln!(out, "- **Project:** {}", meta.project);
    }
    let _ = writeln!(out, "- **Mode:** {}", outcome.mode.as_str());
    let _ = writeln!(out, "- **Pages analyzed:** {}", outcome.pages());
    let _ = writeln!(out, "- **Source files scanned:** {}\n", outcome.files_scanned);

    let _ = writeln!(
        out,
        "## Health Score: {}/100 {}\n",
        format_score(score),
        traffic_light(score)
    );
    let _ = writeln!(out, "| Severity | Count | Weight |");
    let _ = writeln!(out, "|----------|-------|--------|");
    for sev in Severity::ALL {
        let _ = writeln!(
            out,
            "| {} {} | {} | {} |",
            severity_icon(sev),
            sev,
            counts.get(sev),
            sev.weight()
        );
    }
    let _ = writeln!(out, "| **Total** | {} | |\n", outcome.issues.len());

    if outcome.mode == Mode::Live {
        render_live_stats(&mut out, outcome, meta);
    }
    render_issues(&mut out, &outcome.issues);
    out
}

/// Write the report, replacing any previous file.
pub fn write_report(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    fs::write(path, content)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CrawlStats, ROOT_FILE};

    fn issue(cat: Category, sev: Severity) -> Issue {
        Issue::new(cat, sev, "app/page.tsx", "m")
    }

    fn outcome(issues: Vec<Issue>) -> AuditOutcome {
        AuditOutcome {
            mode: Mode::Static,
            routes: Vec::new(),
            files_scanned: 3,
            issues,
            crawl: None,
        }
    }

    #[test]
    fn test_score_weights_and_floor() {
        assert_eq!(health_score(&[]), 100.0);
        let issues = vec![
            issue(Category::Metadata, Severity::High),
            issue(Category::Metadata, Severity::Medium),
            issue(Category::Metadata, Severity::Low),
        ];
        assert_eq!(health_score(&issues), 92.5);
        let many: Vec<Issue> = (0..30).map(|_| issue(Category::Schema, Severity::High)).collect();
        assert_eq!(health_score(&many), 0.0);
    }

    #[test]
    fn test_score_is_monotone_and_order_independent() {
        let mut issues = Vec::new();
        let mut last = health_score(&issues);
        for sev in [Severity::Low, Severity::High, Severity::Medium, Severity::High] {
            issues.push(issue(Category::Structure, sev));
            let now = health_score(&issues);
            assert!(now <= last);
            last = now;
        }
        let mut reversed = issues.clone();
        reversed.reverse();
        assert_eq!(health_score(&issues), health_score(&reversed));
    }

    #[test]
    fn test_format_and_light() {
        assert_eq!(format_score(100.0), "100");
        assert_eq!(format_score(92.5), "92.5");
        assert_eq!(traffic_light(80.0), "🟢 Good");
        assert_eq!(traffic_light(79.5), "🟡 Needs work");
        assert_eq!(traffic_light(10.0), "🔴 Poor");
    }

    #[test]
    fn test_render_groups_by_category_order() {
        let out = outcome(vec![
            Issue::new(Category::GlobalFiles, Severity::High, ROOT_FILE, "Missing favicon"),
            Issue::new(Category::Metadata, Severity::Low, "app/page.tsx", "Title too short"),
        ]);
        let md = render_markdown(&out, &ReportMeta::default());
        assert!(md.starts_with("# SEO Audit Report\n"));
        assert!(md.contains("## Health Score: 94.5/100 🟢 Good"));
        assert!(md.contains("| ✖ HIGH | 1 | 5 |"));
        assert!(md.contains("| ◆ LOW | 1 | 0.5 |"));
        let meta_at = md.find("### Metadata (1)").unwrap();
        let global_at = md.find("### Global Files (1)").unwrap();
        assert!(meta_at < global_at);
        assert!(md.contains("- ✖ **HIGH** `ROOT`: Missing favicon"));
        assert!(!md.contains("Live Crawl Statistics"));
        assert_eq!(md, render_markdown(&out, &ReportMeta::default()));
    }

    #[test]
    fn test_render_live_block() {
        let mut out = outcome(Vec::new());
        out.mode = Mode::Live;
        out.crawl = Some(CrawlStats {
            pages_crawled: 2,
            avg_load_time_ms: 150,
            slowest_url: Some("http://localhost:3000/about".into()),
            slowest_load_time_ms: 200,
            ..CrawlStats::default()
        });
        let meta = ReportMeta {
            generated_at: Some("2026-01-01 00:00:00 UTC".into()),
            project: "clinic".into(),
            base_url: Some("http://localhost:3000".into()),
        };
        let md = render_markdown(&out, &meta);
        assert!(md.contains("- **Generated:** 2026-01-01 00:00:00 UTC"));
        assert!(md.contains("## Live Crawl Statistics"));
        assert!(md.contains("| Slowest page | http://localhost:3000/about (200 ms) |"));
        assert!(md.contains("No issues found."));
    }

    #[test]
    fn test_timestamp_disabled() {
        assert!(report_timestamp(false).is_none());
    }
}
