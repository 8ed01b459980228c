use std::path::PathBuf;

use anyhow::Result;

use crate::commands::CommandReport;
use crate::wakama::loader::load_receipt_file;

#[derive(Debug, Clone)]
pub struct InspectOptions {
    pub path: PathBuf,
}

pub fn run(opts: &InspectOptions) -> Result<CommandReport> {
    let mut report = CommandReport::new("inspect");
    report.detail(format!("path={}", opts.path.display()));

    match load_receipt_file(&opts.path) {
        Ok(record) => report.detail(serde_json::to_string_pretty(&record)?),
        Err(reason) => report.issue(format!("receipt would be skipped: {}", reason.as_str())),
    }

    Ok(report)
}
