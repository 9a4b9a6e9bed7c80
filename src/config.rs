//! Configuration discovery and effective settings resolution.
//!
//! seo-audit reads `seo-audit.toml|yaml|yml` from the project root (or the
//! closest ancestor when `--root` is not given) and merges it with CLI flags
//! to produce an `Effective` config.
//! Defaults:
//! - `app_dir`: `app`, `components_dir`: `components`, `public_dir`: `public`
//! - `output`: `human`
//! - `report.path`: `SEO_AUDIT_REPORT.md`, `report.timestamp`: true
//! - `live.base_url`: `http://localhost:3000`, `live.concurrency`: 4
//! - thresholds: title 30..=60, description 120..=160, ratio 0.10, 250 words
//!
//! Overrides precedence: CLI > config file > defaults.

use crate::error::{AuditError, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const CONFIG_FILES: [&str; 3] = ["seo-audit.toml", "seo-audit.yaml", "seo-audit.yml"];

#[derive(Debug, Default, Deserialize, Clone)]
/// Validation thresholds under `[thresholds]`.
pub struct ThresholdsCfg {
    pub title_min: Option<usize>,
    pub title_max: Option<usize>,
    pub description_min: Option<usize>,
    pub description_max: Option<usize>,
    pub min_text_ratio: Option<f64>,
    pub min_word_count: Option<usize>,
    pub slow_response_ms: Option<u64>,
    pub max_html_bytes: Option<usize>,
    pub max_disallow_rules: Option<usize>,
}

#[derive(Debug, Default, Deserialize, Clone)]
/// Report output section under `[report]`.
pub struct ReportCfg {
    pub path: Option<String>,
    pub timestamp: Option<bool>,
}

#[derive(Debug, Default, Deserialize, Clone)]
/// Live crawl section under `[live]`.
pub struct LiveCfg {
    pub base_url: Option<String>,
    pub concurrency: Option<usize>,
    pub probe_timeout_ms: Option<u64>,
    pub request_timeout_ms: Option<u64>,
    pub external_timeout_ms: Option<u64>,
    pub check_external: Option<bool>,
}

#[derive(Debug, Default, Deserialize, Clone)]
/// Root configuration loaded from `seo-audit.toml|yaml`.
pub struct AuditConfig {
    pub app_dir: Option<String>,
    pub components_dir: Option<String>,
    pub public_dir: Option<String>,
    pub page_patterns: Option<Vec<String>>,
    pub source_patterns: Option<Vec<String>>,
    pub exclude_dirs: Option<Vec<String>>,
    pub hero_component: Option<String>,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub critical_pages: Vec<String>,
    pub output: Option<String>,
    #[serde(default)]
    pub thresholds: ThresholdsCfg,
    #[serde(default)]
    pub report: ReportCfg,
    #[serde(default)]
    pub live: LiveCfg,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Thresholds {
    pub title_min: usize,
    pub title_max: usize,
    pub description_min: usize,
    pub description_max: usize,
    pub min_text_ratio: f64,
    pub min_word_count: usize,
    pub slow_response_ms: u64,
    pub max_html_bytes: usize,
    pub max_disallow_rules: usize,
}

impl Default for Thresholds {
    fn default() -> Self {
        Thresholds {
            title_min: 30,
            title_max: 60,
            description_min: 120,
            description_max: 160,
            min_text_ratio: 0.10,
            min_word_count: 250,
            slow_response_ms: 3000,
            max_html_bytes: 512_000,
            max_disallow_rules: 5,
        }
    }
}

#[derive(Debug, Clone)]
pub struct LiveSettings {
    pub enabled: bool,
    pub base_url: String,
    pub concurrency: usize,
    pub probe_timeout: Duration,
    pub request_timeout: Duration,
    pub external_timeout: Duration,
    pub check_external: bool,
}

#[derive(Debug, Clone)]
/// Fully-resolved configuration used by the audit after applying precedence.
pub struct Effective {
    pub repo_root: PathBuf,
    pub app_dir: PathBuf,
    pub components_dir: PathBuf,
    pub public_dir: PathBuf,
    pub page_patterns: Vec<String>,
    pub source_patterns: Vec<String>,
    pub exclude_dirs: Vec<String>,
    pub hero_component: String,
    pub keywords: Vec<String>,
    pub critical_pages: Vec<String>,
    pub thresholds: Thresholds,
    pub report_path: PathBuf,
    pub timestamp: bool,
    pub output: String,
    pub live: LiveSettings,
    pub config_file: Option<PathBuf>,
}

#[derive(Debug, Default, Clone)]
/// Values taken from the command line; `None` defers to config/defaults.
pub struct CliOverrides {
    pub repo_root: Option<String>,
    pub config: Option<String>,
    pub report: Option<String>,
    pub output: Option<String>,
    pub live: bool,
    pub base_url: Option<String>,
    pub no_external: bool,
    pub no_timestamp: bool,
}

/// Walk upward from `start` to detect the project root.
///
/// Stops when a `seo-audit.toml|yaml|yml` or a `.git` directory is found.
pub fn detect_repo_root(start: &Path) -> PathBuf {
    let mut cur = start;
    loop {
        if CONFIG_FILES.iter().any(|f| cur.join(f).exists()) || cur.join(".git").exists() {
            return cur.to_path_buf();
        }
        match cur.parent() {
            Some(p) => cur = p,
            None => return start.to_path_buf(),
        }
    }
}

/// Path of the first config file present under `root`.
pub fn find_config(root: &Path) -> Option<PathBuf> {
    CONFIG_FILES
        .iter()
        .map(|f| root.join(f))
        .find(|p| p.is_file())
}

/// Parse a config file; the format follows its extension.
pub fn load_config_file(path: &Path) -> Result<AuditConfig> {
    let s = fs::read_to_string(path)?;
    let is_yaml = matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("yaml") | Some("yml")
    );
    let parsed = if is_yaml {
        serde_yaml::from_str::<AuditConfig>(&s).map_err(|e| e.to_string())
    } else {
        toml::from_str::<AuditConfig>(&s).map_err(|e| e.to_string())
    };
    parsed.map_err(|message| AuditError::Config {
        path: path.to_path_buf(),
        message,
    })
}

fn strings(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

/// Resolve `Effective` by merging CLI flags, discovered config, and defaults.
pub fn resolve_effective(cli: &CliOverrides) -> Result<Effective> {
    let repo_root = match cli.repo_root.as_deref() {
        Some(r) => PathBuf::from(r),
        None => detect_repo_root(&std::env::current_dir()?),
    };
    if !repo_root.is_dir() {
        return Err(AuditError::RootNotFound(repo_root));
    }
    let config_file = match cli.config.as_deref() {
        Some(p) => Some(PathBuf::from(p)),
        None => find_config(&repo_root),
    };
    let cfg = match config_file.as_deref() {
        Some(p) => load_config_file(p)?,
        None => AuditConfig::default(),
    };
    Ok(build_effective(repo_root, cfg, config_file, cli))
}

/// Apply precedence for an already-loaded config.
pub fn build_effective(
    repo_root: PathBuf,
    cfg: AuditConfig,
    config_file: Option<PathBuf>,
    cli: &CliOverrides,
) -> Effective {
    let defaults = Thresholds::default();
    let t = &cfg.thresholds;
    let thresholds = Thresholds {
        title_min: t.title_min.unwrap_or(defaults.title_min),
        title_max: t.title_max.unwrap_or(defaults.title_max),
        description_min: t.description_min.unwrap_or(defaults.description_min),
        description_max: t.description_max.unwrap_or(defaults.description_max),
        min_text_ratio: t.min_text_ratio.unwrap_or(defaults.min_text_ratio),
        min_word_count: t.min_word_count.unwrap_or(defaults.min_word_count),
        slow_response_ms: t.slow_response_ms.unwrap_or(defaults.slow_response_ms),
        max_html_bytes: t.max_html_bytes.unwrap_or(defaults.max_html_bytes),
        max_disallow_rules: t.max_disallow_rules.unwrap_or(defaults.max_disallow_rules),
    };

    let output = cli
        .output
        .clone()
        .or(cfg.output)
        .unwrap_or_else(|| "human".to_string());

    let report_rel = cli
        .report
        .clone()
        .or(cfg.report.path)
        .unwrap_or_else(|| "SEO_AUDIT_REPORT.md".to_string());
    let timestamp = !cli.no_timestamp && cfg.report.timestamp.unwrap_or(true);

    let l = &cfg.live;
    let live = LiveSettings {
        enabled: cli.live,
        base_url: cli
            .base_url
            .clone()
            .or_else(|| l.base_url.clone())
            .unwrap_or_else(|| "http://localhost:3000".to_string())
            .trim_end_matches('/')
            .to_string(),
        concurrency: l.concurrency.unwrap_or(4).max(1),
        probe_timeout: Duration::from_millis(l.probe_timeout_ms.unwrap_or(2000)),
        request_timeout: Duration::from_millis(l.request_timeout_ms.unwrap_or(10_000)),
        external_timeout: Duration::from_millis(l.external_timeout_ms.unwrap_or(5000)),
        check_external: !cli.no_external && l.check_external.unwrap_or(true),
    };

    Effective {
        app_dir: repo_root.join(cfg.app_dir.as_deref().unwrap_or("app")),
        components_dir: repo_root.join(cfg.components_dir.as_deref().unwrap_or("components")),
        public_dir: repo_root.join(cfg.public_dir.as_deref().unwrap_or("public")),
        page_patterns: cfg
            .page_patterns
            .unwrap_or_else(|| strings(&["page.tsx", "page.jsx", "page.ts", "page.js"])),
        source_patterns: cfg
            .source_patterns
            .unwrap_or_else(|| strings(&["*.tsx", "*.jsx", "*.ts", "*.js", "*.mdx"])),
        exclude_dirs: cfg.exclude_dirs.unwrap_or_else(|| {
            strings(&[
                "node_modules",
                ".next",
                ".git",
                "dist",
                "build",
                "out",
                ".turbo",
                "coverage",
            ])
        }),
        hero_component: cfg.hero_component.unwrap_or_else(|| "Hero".to_string()),
        keywords: cfg.keywords,
        critical_pages: cfg.critical_pages,
        thresholds,
        report_path: repo_root.join(report_rel),
        timestamp,
        output,
        live,
        config_file,
        repo_root,
    }
}

impl Effective {
    /// Defaults for `root` with no config file and no CLI flags.
    pub fn for_root(root: &Path) -> Effective {
        build_effective(
            root.to_path_buf(),
            AuditConfig::default(),
            None,
            &CliOverrides::default(),
        )
    }

    /// Display form of `path` relative to the project root.
    pub fn rel(&self, path: &Path) -> String {
        pathdiff::diff_paths(path, &self.repo_root)
            .unwrap_or_else(|| path.to_path_buf())
            .to_string_lossy()
            .replace('\\', "/")
    }
}
