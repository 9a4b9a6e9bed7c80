//! Internal link graph and in-degree based orphan detection.
//!
//! In-degree stands in for crawl depth: a static page linked from a single
//! source file is a near-orphan. The home page is always exempt.

use crate::checks::links::internal_targets;
use crate::models::{Category, Issue, Route, Severity};
use serde_json::json;
use std::collections::{BTreeMap, BTreeSet};

#[derive(Debug, Default, Clone)]
pub struct LinkGraph {
    /// Source file (relative) -> internal paths it links to.
    pub edges: BTreeMap<String, BTreeSet<String>>,
}

impl LinkGraph {
    pub fn build(sources: &[(String, String)]) -> LinkGraph {
        let edges = sources
            .iter()
            .map(|(file, text)| (file.clone(), internal_targets(text)))
            .collect();
        LinkGraph { edges }
    }

    /// Number of distinct files, other than the route's own page, linking
    /// to each static route.
    pub fn in_degrees(&self, routes: &[Route]) -> BTreeMap<String, usize> {
        routes
            .iter()
            .filter(|r| !r.is_dynamic)
            .map(|r| {
                let n = self
                    .edges
                    .iter()
                    .filter(|(file, targets)| **file != r.file && targets.contains(&r.path))
                    .count();
                (r.path.clone(), n)
            })
            .collect()
    }
}

pub fn check(graph: &LinkGraph, routes: &[Route]) -> Vec<Issue> {
    let degrees = graph.in_degrees(routes);
    let mut issues = Vec::new();
    for r in routes.iter().filter(|r| !r.is_dynamic && !r.is_home()) {
        match degrees.get(&r.path).copied().unwrap_or(0) {
            0 => issues.push(
                Issue::new(
                    Category::LinkGraph,
                    Severity::Medium,
                    &r.file,
                    format!("Orphan page {}: no internal links point here", r.path),
                )
                .with_details(json!({ "in_degree": 0 })),
            ),
            1 => issues.push(
                Issue::new(
                    Category::LinkGraph,
                    Severity::Low,
                    &r.file,
                    format!(
                        "Near-orphan page {}: only 1 internal link, add more internal links",
                        r.path
                    ),
                )
                .with_details(json!({ "in_degree": 1 })),
            ),
            _ => {}
        }
    }
    issues
}
