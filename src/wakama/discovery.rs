//! Receipt discovery over the two supported directory shapes.
//!
//! A publisher repo keeps receipts flat (`receipts/*.json`). A workspace of
//! several projects keeps them per project (`<project>/receipts/*-receipt.json`).
//! The shape is probed once per run and the matching strategy is used for the
//! whole run.

use std::fs;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

const RECEIPTS_SEGMENT: &str = "receipts";
const SCAN_FILE_SUFFIX: &str = "-receipt.json";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiscoveryMode {
    Flat,
    Scan,
}

impl DiscoveryMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Flat => "flat",
            Self::Scan => "scan",
        }
    }
}

pub trait ReceiptDiscovery {
    fn mode(&self) -> DiscoveryMode;

    /// Candidate receipt files in deterministic order.
    fn discover(&self, root: &Path) -> Vec<PathBuf>;
}

/// `*.json` files directly under the root, ordered by file name.
pub struct FlatDiscovery;

impl ReceiptDiscovery for FlatDiscovery {
    fn mode(&self) -> DiscoveryMode {
        DiscoveryMode::Flat
    }

    fn discover(&self, root: &Path) -> Vec<PathBuf> {
        let Ok(read_dir) = fs::read_dir(root) else {
            return Vec::new();
        };

        let mut named = read_dir
            .filter_map(Result::ok)
            .filter(|entry| entry.path().is_file())
            .filter_map(|entry| {
                let name = entry.file_name().to_str()?.to_string();
                name.ends_with(".json").then(|| (name, entry.path()))
            })
            .collect::<Vec<_>>();
        named.sort_by(|a, b| a.0.cmp(&b.0));
        named.into_iter().map(|(_, path)| path).collect()
    }
}

/// `*-receipt.json` files anywhere below the root that sit under a
/// `receipts` directory, ordered by path.
pub struct ScanDiscovery;

impl ReceiptDiscovery for ScanDiscovery {
    fn mode(&self) -> DiscoveryMode {
        DiscoveryMode::Scan
    }

    fn discover(&self, root: &Path) -> Vec<PathBuf> {
        let mut candidates = WalkDir::new(root)
            .follow_links(true)
            .into_iter()
            .filter_map(Result::ok)
            .filter(|entry| entry.file_type().is_file())
            .map(|entry| entry.into_path())
            .filter(|path| is_scan_candidate(path))
            .collect::<Vec<_>>();
        candidates.sort_by(|a, b| a.as_os_str().cmp(b.as_os_str()));
        candidates
    }
}

fn is_scan_candidate(path: &Path) -> bool {
    let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
        return false;
    };
    if !name.ends_with(SCAN_FILE_SUFFIX) {
        return false;
    }
    path.parent()
        .map(|dir| {
            dir.components()
                .any(|c| c.as_os_str() == RECEIPTS_SEGMENT)
        })
        .unwrap_or(false)
}

#[derive(Debug, Clone)]
pub struct Discovered {
    pub mode: DiscoveryMode,
    pub paths: Vec<PathBuf>,
}

/// Pick the strategy for `root` and list its receipts. A missing root or a
/// plain file yields nothing.
pub fn discover(root: &Path) -> Discovered {
    if !root.is_dir() {
        return Discovered {
            mode: DiscoveryMode::Flat,
            paths: Vec::new(),
        };
    }

    let flat = FlatDiscovery.discover(root);
    if !flat.is_empty() {
        return Discovered {
            mode: FlatDiscovery.mode(),
            paths: flat,
        };
    }

    Discovered {
        mode: ScanDiscovery.mode(),
        paths: ScanDiscovery.discover(root),
    }
}
