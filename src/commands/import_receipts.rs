use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::commands::CommandReport;
use crate::error::WakamaError;
use crate::wakama::config::load_config;

#[derive(Debug, Clone, Default)]
pub struct ImportOptions {
    pub from: Option<PathBuf>,
}

/// Copy upstream receipts (`*.json`) into the local receipts dir. Existing
/// files with the same name are overwritten.
pub fn run(opts: &ImportOptions) -> Result<CommandReport> {
    let cfg = load_config()?;
    let source_dir = opts
        .from
        .clone()
        .unwrap_or_else(|| cfg.paths.import_dir.clone());
    let dest_dir = cfg.paths.receipts_dir.clone();

    if !source_dir.is_dir() {
        return Err(WakamaError::ImportSourceMissing(source_dir).into());
    }
    fs::create_dir_all(&dest_dir)
        .with_context(|| format!("failed to create {}", dest_dir.display()))?;

    let mut report = CommandReport::new("import");
    report.detail(format!("from={}", source_dir.display()));
    report.detail(format!("to={}", dest_dir.display()));

    let mut names = fs::read_dir(&source_dir)
        .with_context(|| format!("failed to read {}", source_dir.display()))?
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().map(|t| t.is_file()).unwrap_or(false))
        .filter_map(|entry| entry.file_name().into_string().ok())
        .filter(|name| name.ends_with(".json"))
        .collect::<Vec<_>>();
    names.sort();

    for name in &names {
        let src = source_dir.join(name);
        let dst = dest_dir.join(name);
        fs::copy(&src, &dst).with_context(|| {
            format!("failed to copy {} to {}", src.display(), dst.display())
        })?;
        report.detail(format!("Imported {name}"));
    }
    report.detail(format!("imported_total={}", names.len()));

    Ok(report)
}
