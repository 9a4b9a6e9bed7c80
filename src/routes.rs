//! Route discovery: maps page files under the app directory to URL paths.
//!
//! Route groups (`(name)`) and parallel-route slots (`@name`) do not
//! appear in URLs and are dropped. Bracketed segments make a route dynamic;
//! its compiled [`RoutePattern`](crate::models::RoutePattern) is kept for
//! link matching.

use crate::config::Effective;
use crate::error::{AuditError, Result};
use crate::models::Route;
use crate::sources::{compile_patterns, walk_files};
use std::path::Path;

/// Discover all routes under `eff.app_dir`, sorted by source file.
pub fn discover_routes(eff: &Effective) -> Result<Vec<Route>> {
    if !eff.app_dir.is_dir() {
        return Err(AuditError::AppDirNotFound(eff.app_dir.clone()));
    }
    let patterns = compile_patterns(&eff.page_patterns)?;
    let exclude = compile_patterns(&eff.exclude_dirs)?;
    let pages = walk_files(&eff.app_dir, &exclude, &patterns);
    let routes: Vec<Route> = pages
        .into_iter()
        .map(|page| {
            let segs = url_segments(&eff.app_dir, &page);
            let segs: Vec<&str> = segs.iter().map(String::as_str).collect();
            let file = eff.rel(&page);
            Route::new(&segs, page, file)
        })
        .collect();
    tracing::debug!(count = routes.len(), "discovered routes");
    Ok(routes)
}

/// URL-visible directory names between `app_dir` and the page file.
fn url_segments(app_dir: &Path, page: &Path) -> Vec<String> {
    let rel = page.strip_prefix(app_dir).unwrap_or(page);
    let Some(parent) = rel.parent() else {
        return Vec::new();
    };
    parent
        .components()
        .map(|c| c.as_os_str().to_string_lossy().to_string())
        .filter(|s| !is_route_group(s) && !s.starts_with('@') && !s.is_empty())
        .collect()
}

fn is_route_group(seg: &str) -> bool {
    seg.starts_with('(') && seg.ends_with(')')
}
