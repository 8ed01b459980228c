use std::env;
use std::path::PathBuf;

pub const CONFIG_FILE_NAME: &str = "wakama.toml";

pub fn env_or_default_path(var: &str, fallback: PathBuf) -> PathBuf {
    match env::var(var) {
        Ok(v) if !v.trim().is_empty() => PathBuf::from(v.trim()),
        _ => fallback,
    }
}

/// `WAKAMA_HOME`, else `~/.wakama`. `None` when neither can be resolved.
pub fn wakama_home() -> Option<PathBuf> {
    match env::var("WAKAMA_HOME") {
        Ok(v) if !v.trim().is_empty() => Some(PathBuf::from(v.trim())),
        _ => dirs::home_dir().map(|home| home.join(".wakama")),
    }
}

pub fn resolve_config_path() -> Option<PathBuf> {
    if let Ok(custom) = env::var("WAKAMA_CONFIG_PATH") {
        let trimmed = custom.trim();
        if !trimmed.is_empty() {
            return Some(PathBuf::from(trimmed));
        }
    }
    Some(wakama_home()?.join(CONFIG_FILE_NAME))
}
