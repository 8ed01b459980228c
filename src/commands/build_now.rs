use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::commands::CommandReport;
use crate::wakama::config::{WakamaConfig, load_config};
use crate::wakama::loader::load_receipts;
use crate::wakama::snapshot::{build_snapshot, write_snapshot};
use crate::wakama::warn;

#[derive(Debug, Clone, Default)]
pub struct BuildOptions {
    pub receipts_dir: Option<PathBuf>,
    pub output_path: Option<PathBuf>,
}

pub fn run(opts: &BuildOptions) -> Result<CommandReport> {
    let cfg = load_config()?;
    let receipts_dir = opts
        .receipts_dir
        .clone()
        .unwrap_or_else(|| cfg.paths.receipts_dir.clone());
    let output_path = opts
        .output_path
        .clone()
        .unwrap_or_else(|| cfg.paths.snapshot_path.clone());

    let mut report = CommandReport::new("build");
    build_into(&mut report, &cfg, &receipts_dir, &output_path)?;
    Ok(report)
}

/// Load, aggregate and persist. Only the final write can fail.
pub fn build_into(
    report: &mut CommandReport,
    cfg: &WakamaConfig,
    receipts_dir: &Path,
    output_path: &Path,
) -> Result<()> {
    report.detail(format!("receipts_dir={}", receipts_dir.display()));

    let outcome = load_receipts(receipts_dir);
    report.detail(format!("discovery={}", outcome.mode.as_str()));
    report.detail(format!("receipts.accepted={}", outcome.records.len()));
    report.detail(format!("receipts.skipped={}", outcome.skipped.len()));

    if cfg.loader.warn_skipped {
        for skipped in &outcome.skipped {
            warn::emit(
                "W_RECEIPT_SKIPPED",
                "load",
                &skipped.path.display().to_string(),
                skipped.reason.as_str(),
            );
        }
    }

    let snapshot = build_snapshot(outcome.records);
    report.detail(format!("totals.cids={}", snapshot.totals.cids));
    report.detail(format!("totals.onchain_tx={}", snapshot.totals.onchain_tx));

    let written = write_snapshot(&snapshot, output_path)?;
    report.detail(format!("snapshot.bytes={}", written.bytes));
    report.detail(format!("Wrote snapshot: {}", written.output_path.display()));
    Ok(())
}
