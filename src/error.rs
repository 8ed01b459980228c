use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum WakamaError {
    #[error("config file invalid or unreadable: {0}")]
    InvalidConfig(String),
    #[error("upstream receipts dir not found: {}", .0.display())]
    ImportSourceMissing(PathBuf),
    #[error("failed to write snapshot {}: {source}", .path.display())]
    SnapshotWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
