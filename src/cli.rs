use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::commands::build_now::{self, BuildOptions};
use crate::commands::export_now::{self, ExportOptions};
use crate::commands::import_receipts::{self, ImportOptions};
use crate::commands::inspect::{self, InspectOptions};
use crate::commands::{CommandReport, status};

#[derive(Debug, Parser)]
#[command(
    name = "wakama-now",
    version,
    about = "Reconcile publish receipts into the dashboard snapshot"
)]
struct Cli {
    /// Print the command report as JSON.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Load every receipt and write the snapshot.
    Build {
        /// Receipts directory (flat `*.json` or a tree of `receipts/*-receipt.json`).
        receipts_dir: Option<PathBuf>,
        /// Snapshot output path.
        output_path: Option<PathBuf>,
    },
    /// Build from the configured receipts dir into an explicit output path.
    Export { output_path: PathBuf },
    /// Copy upstream receipts into the configured receipts dir.
    Import {
        #[arg(long)]
        from: Option<PathBuf>,
    },
    /// Show how a single receipt file normalizes.
    Inspect { path: PathBuf },
    /// Show resolved configuration.
    Status,
}

fn print_report(report: &CommandReport, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(report)?);
        return Ok(());
    }
    for detail in &report.details {
        println!("{detail}");
    }
    for issue in &report.issues {
        eprintln!("issue: {issue}");
    }
    Ok(())
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    let report = match &cli.command {
        Command::Build {
            receipts_dir,
            output_path,
        } => build_now::run(&BuildOptions {
            receipts_dir: receipts_dir.clone(),
            output_path: output_path.clone(),
        })?,
        Command::Export { output_path } => export_now::run(&ExportOptions {
            output_path: output_path.clone(),
        })?,
        Command::Import { from } => import_receipts::run(&ImportOptions { from: from.clone() })?,
        Command::Inspect { path } => inspect::run(&InspectOptions { path: path.clone() })?,
        Command::Status => status::run()?,
    };

    print_report(&report, cli.json)?;
    if !report.ok {
        anyhow::bail!("{} reported {} issue(s)", report.command, report.issues.len());
    }
    Ok(())
}
