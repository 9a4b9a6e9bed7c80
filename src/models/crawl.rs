//! Live-mode crawl records and their aggregate statistics.

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
/// Measurements taken from one successfully fetched page.
pub struct CrawlResult {
    pub url: String,
    pub status_code: u16,
    pub word_count: usize,
    pub text_html_ratio: f64,
    pub h1_count: usize,
    pub has_schema: bool,
    pub load_time_ms: u64,
    pub html_size_bytes: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
/// Summary figures shown in the report's live statistics block.
pub struct CrawlStats {
    pub pages_crawled: usize,
    pub avg_load_time_ms: u64,
    pub slowest_url: Option<String>,
    pub slowest_load_time_ms: u64,
    pub avg_word_count: usize,
    pub avg_text_html_ratio: f64,
    pub total_html_bytes: usize,
    pub pages_with_schema: usize,
    pub external_links_checked: usize,
}

impl CrawlStats {
    pub fn from_results(results: &[CrawlResult], external_links_checked: usize) -> CrawlStats {
        let n = results.len();
        if n == 0 {
            return CrawlStats {
                external_links_checked,
                ..CrawlStats::default()
            };
        }
        let slowest = results
            .iter()
            .max_by(|a, b| a.load_time_ms.cmp(&b.load_time_ms).then(b.url.cmp(&a.url)));
        CrawlStats {
            pages_crawled: n,
            avg_load_time_ms: results.iter().map(|r| r.load_time_ms).sum::<u64>() / n as u64,
            slowest_url: slowest.map(|r| r.url.clone()),
            slowest_load_time_ms: slowest.map(|r| r.load_time_ms).unwrap_or(0),
            avg_word_count: results.iter().map(|r| r.word_count).sum::<usize>() / n,
            avg_text_html_ratio: results.iter().map(|r| r.text_html_ratio).sum::<f64>() / n as f64,
            total_html_bytes: results.iter().map(|r| r.html_size_bytes).sum(),
            pages_with_schema: results.iter().filter(|r| r.has_schema).count(),
            external_links_checked,
        }
    }
}
