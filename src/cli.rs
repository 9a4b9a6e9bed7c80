//! CLI argument parsing via `clap`.

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "seo-audit",
    version,
    about = "SEO audit for file-routed web projects",
    long_about = "seo-audit — scan a project's page sources (and optionally a running server) for SEO defects and write a Markdown report.\n\nConfiguration precedence: CLI > seo-audit.toml > defaults.",
    after_help = "Examples:\n  seo-audit audit\n  seo-audit audit --root ./site --report reports/seo.md\n  seo-audit audit --live --base-url http://localhost:3000\n  seo-audit routes --output json",
    arg_required_else_help = true
)]
/// Top-level CLI options and subcommands.
pub struct Cli {
    #[arg(short, long, global = true, action = clap::ArgAction::SetTrue, help = "Enable debug logging on stderr")]
    pub verbose: bool,
    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Args, Clone, Default)]
/// Options shared by commands that read the project.
pub struct ProjectArgs {
    #[arg(long, help = "Project root (default: detected from current dir)")]
    pub root: Option<String>,
    #[arg(long, help = "Path to seo-audit.toml|yaml (default: <root>/seo-audit.toml)")]
    pub config: Option<String>,
    #[arg(long, help = "Output mode: human|json (default: human)")]
    pub output: Option<String>,
}

#[derive(Subcommand)]
/// Supported subcommands.
pub enum Commands {
    /// Show version
    #[command(about = "Show version", long_about = "Print the current seo-audit version.")]
    Version,
    /// Run the audit and write the report
    #[command(
        about = "Run the SEO audit",
        long_about = "Discover routes, run static analyzers, optionally crawl a running server, and write a Markdown report.",
        after_help = "Examples:\n  seo-audit audit --fail-on-high\n  seo-audit audit --live --no-external\n  seo-audit audit --no-timestamp\n\nReports carry a generation timestamp. Use --no-timestamp (or report.timestamp = false) or set SOURCE_DATE_EPOCH to make reruns byte-identical."
    )]
    Audit {
        #[command(flatten)]
        project: ProjectArgs,
        #[arg(long, help = "Report file path (default: SEO_AUDIT_REPORT.md under root)")]
        report: Option<String>,
        #[arg(long, action = clap::ArgAction::SetTrue, help = "Also crawl a running server")]
        live: bool,
        #[arg(long, help = "Base URL of the running server (default: http://localhost:3000)")]
        base_url: Option<String>,
        #[arg(long, action = clap::ArgAction::SetTrue, help = "Skip external link checks in live mode")]
        no_external: bool,
        #[arg(long, action = clap::ArgAction::SetTrue, help = "Exit non-zero when any HIGH issue exists")]
        fail_on_high: bool,
        #[arg(long, action = clap::ArgAction::SetTrue, help = "Omit the generation timestamp from the report")]
        no_timestamp: bool,
    },
    /// List discovered routes
    #[command(
        about = "List discovered routes",
        long_about = "Print every page route with its dynamic pattern and source file."
    )]
    Routes {
        #[command(flatten)]
        project: ProjectArgs,
    },
}
