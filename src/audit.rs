//! Audit runner: route discovery, static analyzers, optional live crawl.
//!
//! Produces an `AuditOutcome` with all issues in a deterministic order.
//! Per-file read failures become diagnostic issues; only precondition
//! failures (missing directories, unreachable server) abort the run.

use crate::checks::{self, global_files, graph, keywords, links, PageRules};
use crate::config::Effective;
use crate::error::Result;
use crate::live::LiveCrawler;
use crate::models::{AuditOutcome, Category, Issue, Mode, Route, Severity};
use crate::routes::discover_routes;
use crate::sources::collect_sources;
use rayon::prelude::*;
use std::fs;
use std::path::PathBuf;

/// Read files into (relative path, text) pairs. Unreadable files become a
/// LOW issue in `category` and are left out.
fn load_texts(
    eff: &Effective,
    files: &[PathBuf],
    category: Category,
) -> (Vec<(String, String)>, Vec<Issue>) {
    let mut texts = Vec::with_capacity(files.len());
    let mut issues = Vec::new();
    for path in files {
        let rel = eff.rel(path);
        match fs::read_to_string(path) {
            Ok(t) => texts.push((rel, t)),
            Err(e) => {
                tracing::debug!(file = %rel, error = %e, "read failed");
                issues.push(Issue::new(
                    category,
                    Severity::Low,
                    rel,
                    format!("Could not analyze file: {}", e),
                ));
            }
        }
    }
    (texts, issues)
}

/// Run the full audit. `progress` receives one line per completed phase.
pub fn run_audit(eff: &Effective, progress: &mut dyn FnMut(&str)) -> Result<AuditOutcome> {
    let crawler = if eff.live.enabled {
        let c = LiveCrawler::new(&eff.live)?;
        c.probe()?;
        progress(&format!("Server reachable at {}", eff.live.base_url));
        Some(c)
    } else {
        None
    };

    let routes = discover_routes(eff)?;
    let dynamic = routes.iter().filter(|r| r.is_dynamic).count();
    progress(&format!(
        "Discovered {} routes ({} dynamic)",
        routes.len(),
        dynamic
    ));

    let mut issues = Vec::new();

    let page_files: Vec<PathBuf> = routes.iter().map(|r| r.source_file.clone()).collect();
    let (pages, read_issues) = load_texts(eff, &page_files, Category::ContentQuality);
    issues.extend(read_issues);
    let rules = PageRules::new(eff)?;
    let per_page: Vec<Vec<Issue>> = pages
        .par_iter()
        .map(|(file, text)| checks::run_page_checks(file, text, eff, &rules))
        .collect();
    issues.extend(per_page.into_iter().flatten());
    progress(&format!(
        "Analyzed metadata, structure, content and schema on {} pages",
        pages.len()
    ));

    let source_files = collect_sources(eff)?;
    let (sources, read_issues) = load_texts(eff, &source_files, Category::BrokenLinks);
    issues.extend(read_issues);
    let mut validator = links::LinkValidator::new(eff, &routes)?;
    for (file, text) in &sources {
        issues.extend(validator.check_file(file, text));
    }
    progress(&format!(
        "Validated {} distinct internal links across {} files",
        validator.checked(),
        sources.len()
    ));

    issues.extend(global_files::check(eff, &routes));
    progress("Checked sitemap, robots, favicon and llms.txt");

    let link_graph = graph::LinkGraph::build(&sources);
    issues.extend(graph::check(&link_graph, &routes));
    progress("Built internal link graph");

    if !eff.keywords.is_empty() {
        issues.extend(keywords::check_site(&pages, &eff.keywords));
    }

    let mut crawl = None;
    if let Some(crawler) = crawler {
        let report = crawler.crawl(eff, &routes, &sources)?;
        progress(&format!(
            "Crawled {} pages, checked {} external links",
            report.stats.pages_crawled, report.stats.external_links_checked
        ));
        issues.extend(report.issues);
        crawl = Some(report.stats);
    }

    Ok(AuditOutcome {
        mode: if crawl.is_some() { Mode::Live } else { Mode::Static },
        files_scanned: sources.len(),
        routes,
        issues,
        crawl,
    })
}

/// Discover routes only, for the `routes` command.
pub fn list_routes(eff: &Effective) -> Result<Vec<Route>> {
    discover_routes(eff)
}
