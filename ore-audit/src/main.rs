//! ore-audit - Write-boundary validation for a snapshot file
//!
//! Runs the optional validation pass over an Oredesk snapshot: flow-step
//! geometry per order and dangling soft references across collections.

use std::path::PathBuf;

use clap::Parser;
use liboredesk::logging::{LogFormat, LoggingConfig};
use liboredesk::validation::{audit_snapshot, SnapshotAudit};
use liboredesk::{Config, DeskError, Result, Snapshot};

#[derive(Parser, Debug)]
#[command(name = "ore-audit")]
#[command(version)]
#[command(about = "Audit an Oredesk snapshot for consistency problems")]
#[command(long_about = "\
ore-audit - Write-boundary validation for a snapshot file

DESCRIPTION:
    ore-audit loads an Oredesk snapshot (a JSON seed file) and checks it
    for problems the store itself tolerates by design: order flow steps
    that do not match the order's status, statuses outside the pipeline
    vocabulary, and soft references (transactions, payment methods,
    third-party entries, logistics records) pointing at records that do
    not exist.

    Step-geometry mismatches are errors: they cannot arise through the
    store's dispatch path, so their presence means the snapshot was built
    or edited by hand. Dangling references are warnings, since the
    dashboard views degrade to sentinels for them.

USAGE EXAMPLES:
    # Audit a snapshot
    ore-audit --snapshot ./desk.json

    # Fail on warnings too
    ore-audit --snapshot ./desk.json --strict

    # Machine-readable findings
    ore-audit --snapshot ./desk.json --format json

EXIT CODES:
    0 - Snapshot is acceptable (no errors; no warnings with --strict)
    1 - Findings at failing severity, or the snapshot could not be loaded
    3 - Invalid input (bad format name, no snapshot path)
")]
struct Cli {
    /// Path to the snapshot JSON file
    #[arg(short, long, env = "OREDESK_SNAPSHOT")]
    snapshot: Option<PathBuf>,

    /// Output format: text or json
    #[arg(short, long)]
    format: Option<String>,

    /// Treat warnings as failures
    #[arg(long)]
    strict: bool,

    /// Enable verbose logging to stderr
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "error" };
    LoggingConfig::new(LogFormat::Text, level.to_string(), cli.verbose).init();

    match run(cli) {
        Ok(passed) => {
            if !passed {
                std::process::exit(1);
            }
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(e.exit_code());
        }
    }
}

fn run(cli: Cli) -> Result<bool> {
    let config = Config::load().ok();

    let snapshot_path = match cli.snapshot {
        Some(path) => path,
        None => config
            .as_ref()
            .map(|c| c.snapshot_path())
            .ok_or_else(|| {
                DeskError::InvalidInput(
                    "No snapshot file given. Pass --snapshot, set OREDESK_SNAPSHOT, \
                     or configure snapshot.path"
                        .to_string(),
                )
            })?,
    };

    let format = cli
        .format
        .or_else(|| config.map(|c| c.defaults.format))
        .unwrap_or_else(|| "text".to_string());
    if format != "text" && format != "json" {
        return Err(DeskError::InvalidInput(format!(
            "Invalid format '{}'. Must be 'text' or 'json'",
            format
        )));
    }

    tracing::debug!(path = %snapshot_path.display(), "loading snapshot");
    let snapshot = Snapshot::from_json_file(&snapshot_path)?;
    let audit = audit_snapshot(&snapshot);

    if format == "json" {
        output_json(&audit)?;
    } else {
        output_text(&audit);
    }

    let passed = if cli.strict {
        audit.is_clean()
    } else {
        !audit.has_errors()
    };
    Ok(passed)
}

fn output_json(audit: &SnapshotAudit) -> Result<()> {
    let json = serde_json::to_string_pretty(audit)
        .map_err(liboredesk::error::SnapshotError::Parse)?;
    println!("{}", json);
    Ok(())
}

fn output_text(audit: &SnapshotAudit) {
    if audit.is_clean() {
        println!("Snapshot is clean");
        return;
    }

    for finding in &audit.findings {
        println!(
            "{} {} {}: {}",
            finding.severity, finding.entity, finding.id, finding.message
        );
    }
    println!(
        "{} error(s), {} warning(s)",
        audit.error_count(),
        audit.warning_count()
    );
}
