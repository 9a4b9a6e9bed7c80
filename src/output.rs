//! Console rendering for audit progress, summaries, and route listings.
//!
//! Supports `human` (default) and `json` outputs. The JSON form carries the
//! score, counts, and the full issue list.

use crate::models::{AuditOutcome, Route, Severity};
use crate::report::{format_score, health_score};
use crate::utils::use_colors;
use owo_colors::OwoColorize;
use serde_json::json;
use serde_json::Value as JsonVal;
use std::path::Path;

/// Print one progress line. Silent in json mode.
pub fn print_phase(line: &str, output: &str) {
    if output == "json" {
        return;
    }
    if use_colors(output) {
        println!("{} {}", "✔".green(), line);
    } else {
        println!("✔ {}", line);
    }
}

/// Print the end-of-run summary in the requested format.
pub fn print_summary(res: &AuditOutcome, report_path: &Path, output: &str) {
    match output {
        "json" => match serde_json::to_string_pretty(&compose_audit_json(res, report_path)) {
            Ok(s) => println!("{}", s),
            Err(e) => eprintln!("{} {}", crate::utils::error_prefix(), e),
        },
        _ => {
            let color = use_colors(output);
            let counts = res.counts();
            for sev in Severity::ALL {
                let n = counts.get(sev);
                if n == 0 {
                    continue;
                }
                let label = format!("{} {}", n, sev);
                let painted = if !color {
                    label
                } else {
                    match sev {
                        Severity::High => label.red().bold().to_string(),
                        Severity::Medium => label.yellow().bold().to_string(),
                        Severity::Low => label.blue().bold().to_string(),
                    }
                };
                println!("  {}", painted);
            }
            let summary = format!(
                "— Summary — score={} high={} medium={} low={} pages={}",
                format_score(health_score(&res.issues)),
                counts.high,
                counts.medium,
                counts.low,
                res.pages()
            );
            if color {
                println!("{}", summary.bold());
            } else {
                println!("{}", summary);
            }
            println!("📄 report: {}", report_path.to_string_lossy());
        }
    }
}

/// Print discovered routes.
pub fn print_routes(routes: &[Route], output: &str) {
    match output {
        "json" => match serde_json::to_string_pretty(&compose_routes_json(routes)) {
            Ok(s) => println!("{}", s),
            Err(e) => eprintln!("{} {}", crate::utils::error_prefix(), e),
        },
        _ => {
            let color = use_colors(output);
            for r in routes {
                let pattern = r
                    .pattern
                    .as_ref()
                    .map(|p| format!(" [{}]", p.normalized()))
                    .unwrap_or_default();
                if color {
                    println!("{}{} {}", r.path.bold(), pattern.cyan(), r.file.bright_black());
                } else {
                    println!("{}{} {}", r.path, pattern, r.file);
                }
            }
        }
    }
}

/// Compose audit JSON object (pure) for testing/snapshot purposes.
pub fn compose_audit_json(res: &AuditOutcome, report_path: &Path) -> JsonVal {
    json!({
        "score": health_score(&res.issues),
        "counts": res.counts(),
        "pages": res.pages(),
        "files": res.files_scanned,
        "mode": res.mode,
        "report": report_path.to_string_lossy(),
        "crawl": res.crawl,
        "issues": res.issues,
    })
}

/// Compose routes JSON array (pure).
pub fn compose_routes_json(routes: &[Route]) -> JsonVal {
    let items: Vec<_> = routes
        .iter()
        .map(|r| {
            json!({
                "path": r.path,
                "file": r.file,
                "dynamic": r.is_dynamic,
                "pattern": r.pattern.as_ref().map(|p| p.normalized()),
            })
        })
        .collect();
    JsonVal::Array(items)
}
