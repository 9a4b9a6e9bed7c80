//! Site-wide artifacts: sitemap, robots, favicon, llms.txt, plus sitemap
//! coverage of static routes.
//!
//! Each artifact is satisfied by a static file or a recognized generator
//! file. Sitemap coverage is a substring check on the sitemap text.

use crate::config::Effective;
use crate::models::{Category, Issue, Route, Severity, ROOT_FILE};
use regex::Regex;
use serde_json::json;
use std::collections::BTreeSet;
use std::fs;
use std::path::PathBuf;
use std::sync::LazyLock;

static TS_DISALLOW: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)\bdisallow\s*:\s*(\[[^\]]*\]|"[^"]*"|'[^']*'|`[^`]*`)"#)
        .expect("disallow regex")
});
static QUOTED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#""([^"]*)"|'([^']*)'|`([^`]*)`"#).expect("quoted string regex")
});

const GENERATOR_EXT: [&str; 4] = ["ts", "js", "tsx", "jsx"];

struct Artifact {
    name: &'static str,
    severity: Severity,
    candidates: Vec<PathBuf>,
    hint: &'static str,
}

fn artifacts(eff: &Effective) -> Vec<Artifact> {
    let app = &eff.app_dir;
    let public = &eff.public_dir;
    let generated = |stem: &str| -> Vec<PathBuf> {
        GENERATOR_EXT
            .iter()
            .map(|ext| app.join(format!("{}.{}", stem, ext)))
            .collect()
    };
    let mut sitemap = vec![public.join("sitemap.xml"), app.join("sitemap.xml")];
    sitemap.extend(generated("sitemap"));
    let mut robots = vec![public.join("robots.txt"), app.join("robots.txt")];
    robots.extend(generated("robots"));
    let mut favicon = vec![
        public.join("favicon.ico"),
        app.join("favicon.ico"),
        public.join("favicon.svg"),
        public.join("favicon.png"),
    ];
    for stem in ["icon.ico", "icon.png", "icon.svg", "icon.jpg"] {
        favicon.push(app.join(stem));
    }
    favicon.extend(generated("icon"));
    let mut llms = vec![public.join("llms.txt")];
    llms.extend(
        GENERATOR_EXT
            .iter()
            .map(|ext| app.join("llms.txt").join(format!("route.{}", ext))),
    );
    vec![
        Artifact {
            name: "sitemap",
            severity: Severity::High,
            candidates: sitemap,
            hint: "public/sitemap.xml or app/sitemap.ts",
        },
        Artifact {
            name: "robots.txt",
            severity: Severity::High,
            candidates: robots,
            hint: "public/robots.txt or app/robots.ts",
        },
        Artifact {
            name: "favicon",
            severity: Severity::High,
            candidates: favicon,
            hint: "public/favicon.ico or app/icon.png",
        },
        Artifact {
            name: "llms.txt",
            severity: Severity::Low,
            candidates: llms,
            hint: "public/llms.txt",
        },
    ]
}

fn first_existing(candidates: &[PathBuf]) -> Option<PathBuf> {
    candidates.iter().find(|p| p.is_file()).cloned()
}

/// Disallow values declared by a robots file, in order of appearance.
pub fn disallow_rules(text: &str, is_generator: bool) -> Vec<String> {
    if !is_generator {
        return text
            .lines()
            .map(|l| l.split('#').next().unwrap_or("").trim())
            .filter_map(|l| {
                let (key, value) = l.split_once(':')?;
                key.trim()
                    .eq_ignore_ascii_case("disallow")
                    .then(|| value.trim().to_string())
            })
            .collect();
    }
    TS_DISALLOW
        .captures_iter(text)
        .filter_map(|c| c.get(1))
        .flat_map(|m| {
            QUOTED
                .captures_iter(m.as_str())
                .filter_map(|q| (1..=3).find_map(|i| q.get(i)))
                .map(|q| q.as_str().trim().to_string())
                .collect::<Vec<_>>()
        })
        .collect()
}

pub fn robots_issues(file: &str, text: &str, is_generator: bool, max_rules: usize) -> Vec<Issue> {
    let rules = disallow_rules(text, is_generator);
    let mut issues = Vec::new();
    if rules.iter().any(|r| r == "/") {
        issues.push(Issue::new(
            Category::Crawlability,
            Severity::High,
            file,
            "robots.txt blocks all crawlers (Disallow: /)",
        ));
    }
    let distinct: BTreeSet<&str> = rules
        .iter()
        .map(String::as_str)
        .filter(|r| !r.is_empty())
        .collect();
    if distinct.len() > max_rules {
        issues.push(
            Issue::new(
                Category::Crawlability,
                Severity::Medium,
                file,
                format!(
                    "robots.txt has {} disallow rules (max {}); verify none block important pages",
                    distinct.len(),
                    max_rules
                ),
            )
            .with_details(json!({ "rules": distinct })),
        );
    }
    issues
}

/// Static routes whose path does not occur in the sitemap text.
pub fn sitemap_issues(sitemap_file: &str, sitemap: &str, routes: &[Route]) -> Vec<Issue> {
    routes
        .iter()
        .filter(|r| !r.is_dynamic && !sitemap.contains(r.path.as_str()))
        .map(|r| {
            Issue::new(
                Category::Sitemap,
                Severity::Medium,
                &r.file,
                format!("Route {} not found in sitemap", r.path),
            )
            .with_details(json!({ "sitemap": sitemap_file }))
        })
        .collect()
}

pub fn check(eff: &Effective, routes: &[Route]) -> Vec<Issue> {
    let mut issues = Vec::new();
    for art in artifacts(eff) {
        let Some(found) = first_existing(&art.candidates) else {
            issues.push(Issue::new(
                Category::GlobalFiles,
                art.severity,
                ROOT_FILE,
                format!("Missing {} ({})", art.name, art.hint),
            ));
            continue;
        };
        let rel = eff.rel(&found);
        let is_generator = found
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| GENERATOR_EXT.contains(&e));
        let text = match fs::read_to_string(&found) {
            Ok(t) => t,
            Err(e) => {
                if art.name == "sitemap" || art.name == "robots.txt" {
                    issues.push(Issue::new(
                        Category::GlobalFiles,
                        Severity::Low,
                        &rel,
                        format!("Could not analyze {}: {}", art.name, e),
                    ));
                }
                continue;
            }
        };
        match art.name {
            "sitemap" => issues.extend(sitemap_issues(&rel, &text, routes)),
            "robots.txt" => issues.extend(robots_issues(
                &rel,
                &text,
                is_generator,
                eff.thresholds.max_disallow_rules,
            )),
            _ => {}
        }
    }
    issues
}
