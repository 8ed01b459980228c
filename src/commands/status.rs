use anyhow::Result;

use crate::commands::CommandReport;
use crate::wakama::config::{load_config, unknown_env_keys};

pub fn run() -> Result<CommandReport> {
    let cfg = load_config()?;
    let mut report = CommandReport::new("status");

    report.detail(format!(
        "config_file={}",
        cfg.source_file
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "none".to_string())
    ));
    report.detail(format!("receipts_dir={}", cfg.paths.receipts_dir.display()));
    report.detail(format!("snapshot_path={}", cfg.paths.snapshot_path.display()));
    report.detail(format!("import_dir={}", cfg.paths.import_dir.display()));
    report.detail(format!("warn_skipped={}", cfg.loader.warn_skipped));

    if !cfg.paths.receipts_dir.is_dir() {
        report.issue("missing receipts dir (set WAKAMA_RECEIPTS_DIR or [paths].receipts_dir)");
    }
    for key in unknown_env_keys() {
        report.issue(format!("unrecognized environment variable {key}"));
    }

    Ok(report)
}
