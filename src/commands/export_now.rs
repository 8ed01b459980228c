use std::env;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::commands::CommandReport;
use crate::commands::build_now::build_into;
use crate::wakama::config::load_config;

#[derive(Debug, Clone)]
pub struct ExportOptions {
    pub output_path: PathBuf,
}

fn absolutize(path: &Path, cwd: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        cwd.join(path)
    }
}

/// Build against the configured receipts dir, writing to an explicit path
/// resolved against the current directory.
pub fn run(opts: &ExportOptions) -> Result<CommandReport> {
    let cfg = load_config()?;
    let cwd = env::current_dir().context("failed to resolve current directory")?;
    let output_path = absolutize(&opts.output_path, &cwd);

    let mut report = CommandReport::new("export");
    build_into(&mut report, &cfg, &cfg.paths.receipts_dir, &output_path)?;
    Ok(report)
}
