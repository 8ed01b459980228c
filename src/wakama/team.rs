//! Team identity resolution.
//!
//! Producers have spelled the Wakama team several ways over time. Every
//! spelling collapses onto [`CANONICAL_TEAM_ID`] so aggregate counts do not
//! fragment per variant. Unknown teams pass through untouched.

pub const CANONICAL_TEAM_ID: &str = "Wakama_team";

const TEAM_ALIASES: &[(&str, &str)] = &[
    ("Wakama Core", CANONICAL_TEAM_ID),
    ("team_wakama", CANONICAL_TEAM_ID),
    ("Wakama Team", CANONICAL_TEAM_ID),
    ("Wakama team", CANONICAL_TEAM_ID),
    ("Wakama_team", CANONICAL_TEAM_ID),
];

/// Filename prefix tokens (matched case-insensitively, followed by `-`) and
/// the team slug they imply.
const TEAM_FILE_PREFIXES: &[(&str, &str)] = &[("scak", "team_scak"), ("wakama", "team_wakama")];

pub fn normalize_team(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return CANONICAL_TEAM_ID.to_string();
    }
    TEAM_ALIASES
        .iter()
        .find(|(alias, _)| *alias == trimmed)
        .map(|(_, canonical)| (*canonical).to_string())
        .unwrap_or_else(|| trimmed.to_string())
}

/// Derive a team slug from a receipt file name, or an empty string when no
/// known prefix convention matches.
pub fn infer_team_from_file(file_name: &str) -> String {
    let lower = file_name.to_ascii_lowercase();
    for (token, slug) in TEAM_FILE_PREFIXES {
        if has_prefix_token(&lower, token) {
            return (*slug).to_string();
        }
    }
    String::new()
}

fn has_prefix_token(name: &str, token: &str) -> bool {
    let needle = format!("{token}-");
    name.match_indices(&needle).any(|(idx, _)| {
        idx == 0 || matches!(name.as_bytes()[idx - 1], b'-' | b'_' | b'/')
    })
}
