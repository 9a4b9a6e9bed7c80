//! Live crawler: fetches static routes from an already running server and
//! re-checks the rendered HTML, then probes external links.
//!
//! Requests run in a bounded worker pool; every request carries its own
//! timeout and failures are reported once, without retries.

use crate::checks::{content, links, schema, structure};
use crate::config::{Effective, LiveSettings};
use crate::error::{AuditError, Result};
use crate::models::{Category, CrawlResult, CrawlStats, Issue, Route, Severity};
use crate::text;
use rayon::prelude::*;
use reqwest::blocking::Client;
use reqwest::redirect::Policy;
use serde_json::json;
use std::collections::BTreeMap;
use std::time::Instant;

const USER_AGENT: &str = concat!("seo-audit/", env!("CARGO_PKG_VERSION"));

/// Outcome of fetching one internal route.
#[derive(Debug, Clone)]
pub enum Fetch {
    Page { result: CrawlResult, html: String },
    Status(u16),
    Failed(String),
}

#[derive(Debug, Clone, Default)]
pub struct LiveReport {
    pub issues: Vec<Issue>,
    pub results: Vec<CrawlResult>,
    pub stats: CrawlStats,
}

pub struct LiveCrawler {
    settings: LiveSettings,
    client: Client,
    external: Client,
}

impl LiveCrawler {
    pub fn new(settings: &LiveSettings) -> Result<Self> {
        let client = Client::builder()
            .timeout(settings.request_timeout)
            .redirect(Policy::limited(10))
            .user_agent(USER_AGENT)
            .build()?;
        let external = Client::builder()
            .timeout(settings.external_timeout)
            .redirect(Policy::limited(10))
            .user_agent(USER_AGENT)
            .build()?;
        Ok(LiveCrawler {
            settings: settings.clone(),
            client,
            external,
        })
    }

    /// Fail fast when nothing answers at the base URL. Any HTTP response,
    /// whatever its status, counts as reachable.
    pub fn probe(&self) -> Result<()> {
        let probe = Client::builder()
            .timeout(self.settings.probe_timeout)
            .user_agent(USER_AGENT)
            .build()?;
        let url = self.settings.base_url.clone();
        match probe.get(&url).send() {
            Ok(resp) => {
                tracing::info!(url = %url, status = resp.status().as_u16(), "server reachable");
                Ok(())
            }
            Err(source) => Err(AuditError::ServerUnreachable { url, source }),
        }
    }

    pub fn url_for(&self, path: &str) -> String {
        format!("{}{}", self.settings.base_url, path)
    }

    pub fn fetch(&self, url: &str) -> Fetch {
        let started = Instant::now();
        let resp = match self.client.get(url).send() {
            Ok(r) => r,
            Err(e) => return Fetch::Failed(e.to_string()),
        };
        let status = resp.status();
        if !status.is_success() {
            return Fetch::Status(status.as_u16());
        }
        let html = match resp.text() {
            Ok(t) => t,
            Err(e) => return Fetch::Failed(e.to_string()),
        };
        let load_time_ms = started.elapsed().as_millis() as u64;
        let stats = text::analyze(&html);
        tracing::debug!(url, load_time_ms, bytes = html.len(), "fetched page");
        Fetch::Page {
            result: CrawlResult {
                url: url.to_string(),
                status_code: status.as_u16(),
                word_count: stats.words,
                text_html_ratio: stats.ratio,
                h1_count: text::count_h1(&html),
                has_schema: text::has_structured_data(&html),
                load_time_ms,
                html_size_bytes: html.len(),
            },
            html,
        }
    }

    /// HEAD an external URL. Non-2xx is MEDIUM, a network failure LOW.
    pub fn check_external(&self, url: &str, file: &str) -> Option<Issue> {
        match self.external.head(url).send() {
            Ok(resp) if resp.status().is_success() => None,
            Ok(resp) => Some(
                Issue::new(
                    Category::ExternalLinks,
                    Severity::Medium,
                    file,
                    format!("External link returned {}: {}", resp.status().as_u16(), url),
                )
                .with_details(json!({ "url": url, "status": resp.status().as_u16() })),
            ),
            Err(e) => Some(
                Issue::new(
                    Category::ExternalLinks,
                    Severity::Low,
                    file,
                    format!("External link unreachable: {} ({})", url, e),
                )
                .with_details(json!({ "url": url })),
            ),
        }
    }

    /// Crawl every static route and, when enabled, every external link found
    /// in `sources` (relative file, text).
    pub fn crawl(
        &self,
        eff: &Effective,
        routes: &[Route],
        sources: &[(String, String)],
    ) -> Result<LiveReport> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.settings.concurrency)
            .build()?;
        let targets: Vec<&Route> = routes.iter().filter(|r| !r.is_dynamic).collect();

        let fetched: Vec<(&Route, Fetch)> = pool.install(|| {
            targets
                .par_iter()
                .map(|r| (*r, self.fetch(&self.url_for(&r.path))))
                .collect()
        });

        let mut report = LiveReport::default();
        for (route, fetch) in &fetched {
            report
                .issues
                .extend(evaluate(&route.file, &route.path, fetch, eff));
            if let Fetch::Page { result, .. } = fetch {
                report.results.push(result.clone());
            }
        }

        let mut external_checked = 0;
        if self.settings.check_external {
            let externals = external_targets(sources);
            external_checked = externals.len();
            let found: Vec<Option<Issue>> = pool.install(|| {
                externals
                    .par_iter()
                    .map(|(url, file)| self.check_external(url, file))
                    .collect()
            });
            report.issues.extend(found.into_iter().flatten());
        }
        report.stats = CrawlStats::from_results(&report.results, external_checked);
        Ok(report)
    }
}

/// Distinct external URLs mapped to the first file that references them.
pub fn external_targets(sources: &[(String, String)]) -> BTreeMap<String, String> {
    let mut out = BTreeMap::new();
    for (file, text) in sources {
        for raw in links::extract_targets(text) {
            if let links::LinkTarget::External(url) = links::classify(&raw) {
                out.entry(url).or_insert_with(|| file.clone());
            }
        }
    }
    out
}

fn rendered(mut issues: Vec<Issue>) -> Vec<Issue> {
    for is in issues.iter_mut() {
        is.message.push_str(" (rendered)");
    }
    issues
}

/// Issues derived from one route's fetch. Failed fetches yield no content
/// findings.
pub fn evaluate(file: &str, path: &str, fetch: &Fetch, eff: &Effective) -> Vec<Issue> {
    let t = &eff.thresholds;
    match fetch {
        Fetch::Status(code) => vec![Issue::new(
            Category::Crawlability,
            Severity::High,
            file,
            format!("Unexpected status code {} for {}", code, path),
        )
        .with_details(json!({ "status": code }))],
        Fetch::Failed(err) => vec![Issue::new(
            Category::Crawlability,
            Severity::Medium,
            file,
            format!("Failed to fetch {}: {}", path, err),
        )],
        Fetch::Page { result, html } => {
            let mut issues = Vec::new();
            if result.load_time_ms > t.slow_response_ms {
                issues.push(Issue::new(
                    Category::Performance,
                    Severity::Medium,
                    file,
                    format!(
                        "Slow response for {}: {} ms (max {} ms)",
                        path, result.load_time_ms, t.slow_response_ms
                    ),
                ));
            }
            if result.html_size_bytes > t.max_html_bytes {
                issues.push(Issue::new(
                    Category::Performance,
                    Severity::Medium,
                    file,
                    format!(
                        "Large HTML payload for {}: {} bytes (max {})",
                        path, result.html_size_bytes, t.max_html_bytes
                    ),
                ));
            }
            let stats = text::analyze(html);
            let mut checks = content::stats_issues(file, &stats, t);
            checks.extend(structure::h1_issues(file, result.h1_count, 0));
            checks.extend(schema::check(file, html, &eff.critical_pages));
            issues.extend(rendered(checks));
            issues
        }
    }
}
