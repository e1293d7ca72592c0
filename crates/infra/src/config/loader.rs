//! Configuration loader
//!
//! Loads application configuration from environment variables or files.
//!
//! ## Loading Strategy
//! 1. First, attempts to load from environment variables
//! 2. If incomplete, falls back to loading from file
//! 3. Probes multiple paths for config files
//! 4. Supports JSON and TOML formats
//!
//! ## Environment Variables
//! - `MEMORA_DB_PATH`: Database file path (required for env loading)
//! - `MEMORA_DB_POOL_SIZE`: Connection pool size (required for env loading)
//! - `MEMORA_CALENDAR_API_BASE`: Calendar API base URL
//! - `MEMORA_CALENDAR_TIMEZONE`: IANA timezone for event payloads
//! - `MEMORA_ASSISTANT_API_URL`: Chat completions endpoint
//! - `MEMORA_ASSISTANT_MODEL`: Model identifier
//! - `MEMORA_ASSISTANT_API_KEY`: Assistant API key
//! - `MEMORA_CHAT_HISTORY_LIMIT`: History window for the extractor
//!
//! Optional variables fall back to the defaults in `Config::default()`.

use std::path::{Path, PathBuf};

use memora_domain::{Config, MemoraError, Result};

/// Load configuration with automatic fallback strategy
///
/// First attempts to load from environment variables. If the required
/// variables are missing, falls back to loading from a config file.
///
/// # Errors
/// Returns `MemoraError::Config` if configuration cannot be loaded from
/// either source.
pub fn load() -> Result<Config> {
    // Pick up a local .env before reading the environment.
    dotenvy::dotenv().ok();

    match load_from_env() {
        Ok(config) => {
            tracing::info!("Configuration loaded from environment variables");
            Ok(config)
        }
        Err(e) => {
            tracing::debug!(error = ?e, "Failed to load from environment, trying file");
            load_from_file(None)
        }
    }
}

/// Load configuration from environment variables
///
/// `MEMORA_DB_PATH` and `MEMORA_DB_POOL_SIZE` must be present; every other
/// variable falls back to its default.
///
/// # Errors
/// Returns `MemoraError::Config` if required variables are missing or have
/// invalid values.
pub fn load_from_env() -> Result<Config> {
    let mut config = Config::default();

    config.database.path = env_var("MEMORA_DB_PATH")?;
    config.database.pool_size = env_var("MEMORA_DB_POOL_SIZE").and_then(|s| {
        s.parse::<u32>().map_err(|e| MemoraError::Config(format!("Invalid pool size: {}", e)))
    })?;

    if let Ok(base) = std::env::var("MEMORA_CALENDAR_API_BASE") {
        config.calendar.api_base_url = base;
    }
    if let Ok(timezone) = std::env::var("MEMORA_CALENDAR_TIMEZONE") {
        config.calendar.timezone = timezone;
    }
    if let Ok(url) = std::env::var("MEMORA_ASSISTANT_API_URL") {
        config.assistant.api_url = url;
    }
    if let Ok(model) = std::env::var("MEMORA_ASSISTANT_MODEL") {
        config.assistant.model = model;
    }
    config.assistant.api_key = std::env::var("MEMORA_ASSISTANT_API_KEY").ok();

    if let Ok(limit) = std::env::var("MEMORA_CHAT_HISTORY_LIMIT") {
        config.chat.history_limit = limit
            .parse::<usize>()
            .map_err(|e| MemoraError::Config(format!("Invalid history limit: {}", e)))?;
    }

    Ok(config)
}

/// Load configuration from a file
///
/// If `path` is `None`, probes multiple locations for config files.
/// Supports both JSON and TOML formats (detected by file extension).
///
/// # Errors
/// Returns `MemoraError::Config` if the file is missing, no probe location
/// matches, or the contents fail to parse.
pub fn load_from_file(path: Option<PathBuf>) -> Result<Config> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(MemoraError::Config(format!(
                    "Config file not found: {}",
                    p.display()
                )));
            }
            p
        }
        None => probe_config_paths().ok_or_else(|| {
            MemoraError::Config("No config file found in any of the standard locations".to_string())
        })?,
    };

    tracing::info!(path = %config_path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| MemoraError::Config(format!("Failed to read config file: {}", e)))?;

    parse_config(&contents, &config_path)
}

/// Parse configuration from string content
///
/// Format is detected by file extension (`.json` or `.toml`).
fn parse_config(contents: &str, path: &Path) -> Result<Config> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| MemoraError::Config(format!("Invalid TOML config: {}", e))),
        "json" => serde_json::from_str(contents)
            .map_err(|e| MemoraError::Config(format!("Invalid JSON config: {}", e))),
        other => Err(MemoraError::Config(format!("Unsupported config format: .{}", other))),
    }
}

/// Probe the standard locations for a config file.
fn probe_config_paths() -> Option<PathBuf> {
    let candidates = [
        "config.toml",
        "config.json",
        "memora.toml",
        "memora.json",
        "../config.toml",
        "../config.json",
    ];

    candidates.iter().map(PathBuf::from).find(|p| p.exists())
}

fn env_var(name: &str) -> Result<String> {
    std::env::var(name)
        .map_err(|_| MemoraError::Config(format!("Missing environment variable: {}", name)))
}
