//! Static analyzers. Each returns its findings as a list of issues; the
//! audit runner aggregates them.

pub mod content;
pub mod global_files;
pub mod graph;
pub mod keywords;
pub mod links;
pub mod metadata;
pub mod schema;
pub mod structure;

use crate::config::Effective;
use crate::error::Result;
use crate::models::Issue;
use regex::Regex;

/// Per-run compiled inputs for the per-page analyzers.
pub struct PageRules {
    pub hero: Regex,
}

impl PageRules {
    pub fn new(eff: &Effective) -> Result<Self> {
        Ok(PageRules {
            hero: structure::hero_matcher(&eff.hero_component)?,
        })
    }
}

/// Run metadata, structure, content, schema, and keyword checks on one page.
pub fn run_page_checks(file: &str, text: &str, eff: &Effective, rules: &PageRules) -> Vec<Issue> {
    let mut issues = metadata::check(file, text, &eff.thresholds);
    issues.extend(structure::check(file, text, &rules.hero));
    issues.extend(content::check(file, text, &eff.thresholds));
    issues.extend(schema::check(file, text, &eff.critical_pages));
    issues.extend(keywords::check_page(file, text, &eff.keywords));
    issues
}
