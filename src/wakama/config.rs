use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::error::WakamaError;
use crate::wakama::paths::{env_or_default_path, resolve_config_path};

include!(concat!(env!("OUT_DIR"), "/wakama_env_allowlist.rs"));

pub const DEFAULT_RECEIPTS_DIR: &str = "receipts";
pub const DEFAULT_SNAPSHOT_PATH: &str = "public/now.json";
pub const DEFAULT_IMPORT_DIR: &str = "../wakama-rwa-templates/receipts";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WakamaPathsConfig {
    pub receipts_dir: PathBuf,
    pub snapshot_path: PathBuf,
    pub import_dir: PathBuf,
}

impl Default for WakamaPathsConfig {
    fn default() -> Self {
        Self {
            receipts_dir: PathBuf::from(DEFAULT_RECEIPTS_DIR),
            snapshot_path: PathBuf::from(DEFAULT_SNAPSHOT_PATH),
            import_dir: PathBuf::from(DEFAULT_IMPORT_DIR),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WakamaLoaderConfig {
    #[serde(default)]
    pub warn_skipped: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WakamaConfig {
    pub paths: WakamaPathsConfig,
    pub loader: WakamaLoaderConfig,
    /// File the config was merged from, if one existed.
    #[serde(skip)]
    pub source_file: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct PartialPathsConfig {
    receipts_dir: Option<PathBuf>,
    snapshot_path: Option<PathBuf>,
    import_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct PartialWakamaConfig {
    paths: Option<PartialPathsConfig>,
    loader: Option<WakamaLoaderConfig>,
}

fn env_or_bool(var: &str, fallback: bool) -> bool {
    match env::var(var) {
        Ok(v) => match v.trim() {
            "1" | "true" | "TRUE" | "yes" | "on" => true,
            "0" | "false" | "FALSE" | "no" | "off" => false,
            _ => fallback,
        },
        Err(_) => fallback,
    }
}

fn validate(cfg: &WakamaConfig) -> Result<()> {
    let checks: [(&str, &Path); 3] = [
        ("receipts_dir", &cfg.paths.receipts_dir),
        ("snapshot_path", &cfg.paths.snapshot_path),
        ("import_dir", &cfg.paths.import_dir),
    ];
    for (name, path) in checks {
        if path.as_os_str().to_string_lossy().trim().is_empty() {
            return Err(WakamaError::InvalidConfig(format!("{name} cannot be empty")).into());
        }
    }
    Ok(())
}

fn merge_file_config(base: &mut WakamaConfig, path: &Path) -> Result<()> {
    if !path.exists() {
        return Ok(());
    }

    let raw = fs::read_to_string(path)
        .map_err(|err| WakamaError::InvalidConfig(format!("{}: {err}", path.display())))?;
    let parsed: PartialWakamaConfig = toml::from_str(&raw)
        .map_err(|err| WakamaError::InvalidConfig(format!("{}: {err}", path.display())))?;

    if let Some(paths) = parsed.paths {
        if let Some(receipts_dir) = paths.receipts_dir {
            base.paths.receipts_dir = receipts_dir;
        }
        if let Some(snapshot_path) = paths.snapshot_path {
            base.paths.snapshot_path = snapshot_path;
        }
        if let Some(import_dir) = paths.import_dir {
            base.paths.import_dir = import_dir;
        }
    }
    if let Some(loader) = parsed.loader {
        base.loader = loader;
    }
    base.source_file = Some(path.to_path_buf());
    Ok(())
}

/// Defaults, then the TOML file, then `WAKAMA_*` env overrides.
pub fn load_config() -> Result<WakamaConfig> {
    let mut cfg = WakamaConfig::default();
    if let Some(path) = resolve_config_path() {
        merge_file_config(&mut cfg, &path)?;
    }

    cfg.paths.receipts_dir = env_or_default_path("WAKAMA_RECEIPTS_DIR", cfg.paths.receipts_dir);
    cfg.paths.snapshot_path =
        env_or_default_path("WAKAMA_SNAPSHOT_PATH", cfg.paths.snapshot_path);
    cfg.paths.import_dir = env_or_default_path("WAKAMA_IMPORT_DIR", cfg.paths.import_dir);
    cfg.loader.warn_skipped = env_or_bool("WAKAMA_WARN_SKIPPED", cfg.loader.warn_skipped);

    validate(&cfg)?;
    Ok(cfg)
}

/// `WAKAMA_*` variables set in the environment that nothing reads. Usually a
/// typo in a `.env` file.
pub fn unknown_env_keys() -> Vec<String> {
    let mut unknown = env::vars_os()
        .filter_map(|(key, _)| key.into_string().ok())
        .filter(|key| key.starts_with("WAKAMA_"))
        .filter(|key| !GENERATED_WAKAMA_ENV_ALLOWLIST.contains(&key.as_str()))
        .collect::<Vec<_>>();
    unknown.sort();
    unknown
}
