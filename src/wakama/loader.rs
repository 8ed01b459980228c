use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::wakama::count::resolve_count;
use crate::wakama::discovery::{DiscoveryMode, discover};
use crate::wakama::receipt::{NormalizedRecord, RawReceipt};
use crate::wakama::status::resolve_status;
use crate::wakama::team::{infer_team_from_file, normalize_team};

/// Explicit team fields, oldest naming last. The first non-empty string wins.
const TEAM_FIELDS: &[&str] = &["team", "team_id", "teamKey"];

const CID_FIELDS: &[&str] = &["cid", "IpfsHash"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    Unreadable,
    InvalidJson,
    NotAnObject,
    MissingCid,
}

impl SkipReason {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Unreadable => "unreadable",
            Self::InvalidJson => "invalid_json",
            Self::NotAnObject => "not_an_object",
            Self::MissingCid => "missing_cid",
        }
    }
}

#[derive(Debug, Clone)]
pub struct SkippedReceipt {
    pub path: PathBuf,
    pub reason: SkipReason,
}

#[derive(Debug, Clone)]
pub struct LoadOutcome {
    pub mode: DiscoveryMode,
    pub records: Vec<NormalizedRecord>,
    pub skipped: Vec<SkippedReceipt>,
}

/// Discover and normalize every receipt under `root`. Bad files are
/// collected in `skipped` and never abort the load.
pub fn load_receipts(root: &Path) -> LoadOutcome {
    let discovered = discover(root);
    let mut records = Vec::with_capacity(discovered.paths.len());
    let mut skipped = Vec::new();

    for path in discovered.paths {
        match load_receipt_file(&path) {
            Ok(record) => records.push(record),
            Err(reason) => skipped.push(SkippedReceipt { path, reason }),
        }
    }

    LoadOutcome {
        mode: discovered.mode,
        records,
        skipped,
    }
}

pub fn load_receipt_file(path: &Path) -> Result<NormalizedRecord, SkipReason> {
    let raw = fs::read_to_string(path).map_err(|_| SkipReason::Unreadable)?;
    let value: Value = serde_json::from_str(&raw).map_err(|_| SkipReason::InvalidJson)?;
    let receipt = RawReceipt::from_value(value).ok_or(SkipReason::NotAnObject)?;
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    normalize_receipt(&receipt, &file_name).ok_or(SkipReason::MissingCid)
}

/// Build the canonical record for one raw receipt. `None` when the receipt
/// carries no content identifier.
pub fn normalize_receipt(raw: &RawReceipt, file_name: &str) -> Option<NormalizedRecord> {
    let cid = CID_FIELDS
        .iter()
        .find_map(|key| raw.non_empty_str(key))?
        .to_string();

    let tx = raw.non_empty_str("tx").unwrap_or_default().to_string();
    let count = resolve_count(raw, file_name);

    Some(NormalizedRecord {
        cid,
        file: raw.non_empty_str("file").unwrap_or(file_name).to_string(),
        sha256: raw.non_empty_str("sha256").unwrap_or_default().to_string(),
        gw: optional_string(raw, "gw"),
        ts: resolve_ts(raw, file_name),
        ts_min: optional_string(raw, "ts_min"),
        ts_max: optional_string(raw, "ts_max"),
        points: count.clone(),
        count,
        status: resolve_status(&raw.scalar_text("status"), &tx),
        slot: raw.number_at(&["slot"]).cloned(),
        source: raw.scalar_text("source").trim().to_string(),
        team: resolve_team(raw, file_name),
        tx,
    })
}

fn optional_string(raw: &RawReceipt, key: &str) -> Option<String> {
    raw.value_at(&[key])
        .and_then(Value::as_str)
        .map(ToOwned::to_owned)
}

fn resolve_ts(raw: &RawReceipt, file_name: &str) -> String {
    let explicit = match raw.value_at(&["ts"]) {
        Some(Value::Bool(false)) => None,
        Some(Value::Number(n)) if n.as_f64() == Some(0.0) => None,
        _ => Some(raw.scalar_text("ts")).filter(|ts| !ts.is_empty()),
    };
    explicit.unwrap_or_else(|| {
        file_name
            .strip_suffix(".json")
            .unwrap_or(file_name)
            .to_string()
    })
}

fn resolve_team(raw: &RawReceipt, file_name: &str) -> String {
    let explicit = TEAM_FIELDS.iter().find_map(|key| raw.non_empty_str(key));
    match explicit {
        Some(team) => normalize_team(team),
        None => normalize_team(&infer_team_from_file(file_name)),
    }
}
