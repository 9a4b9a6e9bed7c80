//! seo-audit CLI binary entry point.
//! Resolves configuration, runs the audit, writes the report and prints results.

use clap::Parser;
use seo_audit::audit::{list_routes, run_audit};
use seo_audit::cli::{Cli, Commands, ProjectArgs};
use seo_audit::config::{self, CliOverrides, Effective};
use seo_audit::error::Result;
use seo_audit::models::Mode;
use seo_audit::output;
use seo_audit::report::{self, ReportMeta};
use seo_audit::utils::{error_prefix, info_prefix, note_prefix};
use tracing_subscriber::EnvFilter;

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = std::env::var("SEO_AUDIT_LOG")
        .ok()
        .filter(|_| !verbose)
        .and_then(|v| EnvFilter::try_new(v).ok())
        .unwrap_or_else(|| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn overrides(project: &ProjectArgs) -> CliOverrides {
    CliOverrides {
        repo_root: project.root.clone(),
        config: project.config.clone(),
        output: project.output.clone(),
        ..CliOverrides::default()
    }
}

fn resolve(cli: &CliOverrides) -> Effective {
    match config::resolve_effective(cli) {
        Ok(eff) => {
            if eff.config_file.is_none() && eff.output != "json" {
                eprintln!("{} No seo-audit.toml found; using defaults.", note_prefix());
            }
            eff
        }
        Err(e) => {
            eprintln!("{} {}", error_prefix(), e);
            std::process::exit(2);
        }
    }
}

fn project_name(eff: &Effective) -> String {
    eff.repo_root
        .canonicalize()
        .unwrap_or_else(|_| eff.repo_root.clone())
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Run the audit and write the report. Returns the HIGH count.
fn audit(eff: &Effective) -> Result<usize> {
    if eff.live.enabled && eff.output != "json" {
        println!("{} probing {}", info_prefix(), eff.live.base_url);
    }
    if eff.timestamp && std::env::var_os("SOURCE_DATE_EPOCH").is_none() && eff.output != "json" {
        eprintln!(
            "{} Report header carries the current time; pass --no-timestamp or set SOURCE_DATE_EPOCH for byte-identical reruns.",
            note_prefix()
        );
    }
    let out_mode = eff.output.clone();
    let outcome = run_audit(eff, &mut |line: &str| output::print_phase(line, &out_mode))?;
    let meta = ReportMeta {
        generated_at: report::report_timestamp(eff.timestamp),
        project: project_name(eff),
        base_url: (outcome.mode == Mode::Live).then(|| eff.live.base_url.clone()),
    };
    let md = report::render_markdown(&outcome, &meta);
    report::write_report(&eff.report_path, &md)?;
    tracing::debug!(path = %eff.report_path.display(), bytes = md.len(), "report written");
    output::print_summary(&outcome, &eff.report_path, &eff.output);
    Ok(outcome.counts().high)
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match cli.cmd {
        Commands::Version => {
            println!("{}", env!("CARGO_PKG_VERSION"));
        }
        Commands::Audit {
            project,
            report,
            live,
            base_url,
            no_external,
            fail_on_high,
            no_timestamp,
        } => {
            let eff = resolve(&CliOverrides {
                report,
                live,
                base_url,
                no_external,
                no_timestamp,
                ..overrides(&project)
            });
            match audit(&eff) {
                Ok(high) if fail_on_high && high > 0 => std::process::exit(1),
                Ok(_) => {}
                Err(e) => {
                    eprintln!("{} {}", error_prefix(), e);
                    std::process::exit(2);
                }
            }
        }
        Commands::Routes { project } => {
            let eff = resolve(&overrides(&project));
            match list_routes(&eff) {
                Ok(routes) => output::print_routes(&routes, &eff.output),
                Err(e) => {
                    eprintln!("{} {}", error_prefix(), e);
                    std::process::exit(2);
                }
            }
        }
    }
}
