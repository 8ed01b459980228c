use std::collections::BTreeSet;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Serialize;
use tempfile::NamedTempFile;

use crate::error::WakamaError;
use crate::wakama::receipt::NormalizedRecord;

/// `lastTs` when there is nothing to report.
pub const EMPTY_LAST_TS: &str = "—";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SnapshotTotals {
    pub files: usize,
    pub cids: usize,
    #[serde(rename = "onchainTx")]
    pub onchain_tx: usize,
    #[serde(rename = "lastTs")]
    pub last_ts: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    pub totals: SnapshotTotals,
    pub items: Vec<NormalizedRecord>,
}

#[derive(Debug, Clone)]
pub struct SnapshotOutcome {
    pub output_path: PathBuf,
    pub bytes: usize,
}

/// Newest first by byte-wise `ts` comparison. The sort is stable, so equal
/// timestamps keep discovery order.
pub fn build_snapshot(mut records: Vec<NormalizedRecord>) -> Snapshot {
    records.sort_by(|a, b| b.ts.cmp(&a.ts));

    let cids = records
        .iter()
        .map(|r| r.cid.as_str())
        .collect::<BTreeSet<_>>()
        .len();
    let totals = SnapshotTotals {
        files: records.len(),
        cids,
        onchain_tx: records.iter().filter(|r| r.has_tx()).count(),
        last_ts: records
            .first()
            .map(|r| r.ts.clone())
            .unwrap_or_else(|| EMPTY_LAST_TS.to_string()),
    };

    Snapshot {
        totals,
        items: records,
    }
}

pub fn render_snapshot(snapshot: &Snapshot) -> Result<String> {
    let data = serde_json::to_string_pretty(snapshot).context("failed to serialize snapshot")?;
    Ok(format!("{data}\n"))
}

/// Replace `output_path` with the rendered snapshot. The file is staged next
/// to the target and renamed into place, so an interrupted run leaves the
/// previous snapshot intact.
pub fn write_snapshot(snapshot: &Snapshot, output_path: &Path) -> Result<SnapshotOutcome> {
    let rendered = render_snapshot(snapshot)?;
    let write_err = |source: std::io::Error| WakamaError::SnapshotWrite {
        path: output_path.to_path_buf(),
        source,
    };

    let parent = match output_path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    };
    fs::create_dir_all(&parent).map_err(write_err)?;

    let mut staged = NamedTempFile::new_in(&parent).map_err(write_err)?;
    staged.write_all(rendered.as_bytes()).map_err(write_err)?;
    staged.flush().map_err(write_err)?;
    if let Some(perms) = target_permissions(output_path) {
        fs::set_permissions(staged.path(), perms).map_err(write_err)?;
    }
    staged
        .persist(output_path)
        .map_err(|err| write_err(err.error))?;

    Ok(SnapshotOutcome {
        output_path: output_path.to_path_buf(),
        bytes: rendered.len(),
    })
}

/// Mode for a snapshot written where none existed before.
#[cfg(unix)]
const DEFAULT_SNAPSHOT_MODE: u32 = 0o644;

/// Permissions for the replacement file: whatever the previous snapshot had,
/// otherwise world-readable. Temp files start out owner-only.
fn target_permissions(output_path: &Path) -> Option<fs::Permissions> {
    if let Ok(meta) = fs::metadata(output_path) {
        return Some(meta.permissions());
    }
    default_permissions()
}

#[cfg(unix)]
fn default_permissions() -> Option<fs::Permissions> {
    use std::os::unix::fs::PermissionsExt;
    Some(fs::Permissions::from_mode(DEFAULT_SNAPSHOT_MODE))
}

#[cfg(not(unix))]
fn default_permissions() -> Option<fs::Permissions> {
    None
}
