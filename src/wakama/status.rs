const UNKNOWN_STATUS: &str = "unknown";

/// User-facing status. A transaction reference counts as evidence the
/// receipt went past submission even when the raw status is stale.
pub fn resolve_status(raw_status: &str, tx: &str) -> String {
    let trimmed = raw_status.trim();
    if !trimmed.is_empty() && trimmed != UNKNOWN_STATUS {
        return trimmed.to_string();
    }
    if tx.is_empty() {
        "n/a".to_string()
    } else {
        "submitted".to_string()
    }
}
