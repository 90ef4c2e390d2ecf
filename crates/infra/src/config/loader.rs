//! Runtime configuration loading.
//!
//! The environment wins when it carries every required variable; otherwise
//! the first config file found is used. Either way the result goes through
//! validation (http(s) URL, positive timeout) before it is returned.
//!
//! Variables:
//! - `LAGO_API_URL`: API base URL without `/graphql` (required)
//! - `LAGO_APP_VERSION`: client version, also versions the persisted
//!   response cache (required)
//! - `LAGO_STORAGE_PATH`: SQLite file backing local storage (required)
//! - `LAGO_APP_NAME`: client name sent with every request
//! - `LAGO_REQUEST_TIMEOUT_SECS`: per-request limit, 300 when unset
//!
//! Files are JSON or TOML, picked by extension. Probe order: `lago.*` then
//! `config.*` in the working directory, `config.*` in its parent, then the
//! same names next to the executable.

use std::path::{Path, PathBuf};

use lago_domain::constants::REQUEST_TIMEOUT_SECS;
use lago_domain::{ApiConfig, AppInfo, Config, LagoError, Result, StorageConfig};
use url::Url;

/// Variables without which the environment alone cannot configure the client.
const REQUIRED_ENV_VARS: [&str; 3] = ["LAGO_API_URL", "LAGO_APP_VERSION", "LAGO_STORAGE_PATH"];

/// Load configuration with automatic fallback strategy
///
/// Uses the environment when every required variable is set; only a missing
/// variable sends the loader to the config files. Values that are present
/// but invalid are an error, never a reason to fall back.
///
/// # Errors
/// Returns `LagoError::Config` if:
/// - An environment value is invalid (bad URL or scheme, bad timeout)
/// - The environment is incomplete and no valid config file is found
/// - File format is invalid
pub fn load() -> Result<Config> {
    if let Some(missing) = REQUIRED_ENV_VARS.iter().find(|key| std::env::var_os(key).is_none()) {
        tracing::debug!(missing, "Environment incomplete, trying config file");
        return load_from_file(None);
    }

    let config = load_from_env()?;
    tracing::info!("Configuration loaded from environment variables");
    Ok(config)
}

/// Load configuration from environment variables
///
/// # Errors
/// Returns `LagoError::Config` if required variables are missing
/// or have invalid values.
pub fn load_from_env() -> Result<Config> {
    let url = env_var("LAGO_API_URL")?;
    let version = env_var("LAGO_APP_VERSION")?;
    let storage_path = env_var("LAGO_STORAGE_PATH")?;

    let timeout_secs = match std::env::var("LAGO_REQUEST_TIMEOUT_SECS") {
        Ok(raw) => raw
            .parse::<u64>()
            .map_err(|e| LagoError::Config(format!("Invalid request timeout: {e}")))?,
        Err(_) => REQUEST_TIMEOUT_SECS,
    };

    let mut app = AppInfo { version, ..AppInfo::default() };
    if let Ok(name) = std::env::var("LAGO_APP_NAME") {
        app.name = name;
    }

    let config = Config {
        api: ApiConfig { url, timeout_secs },
        app,
        storage: StorageConfig { path: storage_path },
    };
    validate(&config)?;
    Ok(config)
}

/// Load configuration from a file
///
/// If `path` is `None`, probes multiple locations for config files.
/// Supports both JSON and TOML formats (detected by file extension).
///
/// # Errors
/// Returns `LagoError::Config` if:
/// - File not found (when path is specified)
/// - No config file found (when path is `None`)
/// - File format is invalid
pub fn load_from_file(path: Option<PathBuf>) -> Result<Config> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(LagoError::Config(format!("Config file not found: {}", p.display())));
            }
            p
        }
        None => probe_config_paths().ok_or_else(|| {
            LagoError::Config("No config file found in any of the standard locations".to_string())
        })?,
    };

    tracing::info!(path = %config_path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| LagoError::Config(format!("Failed to read config file: {e}")))?;

    let config = parse_config(&contents, &config_path)?;
    validate(&config)?;
    Ok(config)
}

/// Parse configuration from string content
///
/// Format is detected by file extension (`.json` or `.toml`).
fn parse_config(contents: &str, path: &Path) -> Result<Config> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| LagoError::Config(format!("Invalid TOML format: {e}"))),
        "json" => serde_json::from_str(contents)
            .map_err(|e| LagoError::Config(format!("Invalid JSON format: {e}"))),
        _ => Err(LagoError::Config(format!("Unsupported config format: {extension}"))),
    }
}

fn validate(config: &Config) -> Result<()> {
    let url = Url::parse(&config.api.url)
        .map_err(|e| LagoError::Config(format!("Invalid API URL '{}': {e}", config.api.url)))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(LagoError::Config(format!("Unsupported API URL scheme: {}", url.scheme())));
    }

    if config.api.timeout_secs == 0 {
        return Err(LagoError::Config("Request timeout must be greater than zero".to_string()));
    }

    Ok(())
}

/// Probe multiple paths for configuration files
///
/// # Returns
/// The first config file found, or `None` if no file exists.
pub fn probe_config_paths() -> Option<PathBuf> {
    const NAMES: [&str; 6] =
        ["lago.json", "lago.toml", "config.json", "config.toml", "../config.json", "../config.toml"];

    let mut candidates = Vec::new();

    if let Ok(cwd) = std::env::current_dir() {
        candidates.extend(NAMES.iter().map(|name| cwd.join(name)));
    }

    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            candidates.extend(NAMES.iter().map(|name| exe_dir.join(name)));
        }
    }

    candidates.into_iter().find(|path| path.exists())
}

/// Get required environment variable
fn env_var(key: &str) -> Result<String> {
    std::env::var(key)
        .map_err(|_| LagoError::Config(format!("Missing required environment variable: {key}")))
}
