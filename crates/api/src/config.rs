use std::path::PathBuf;
use std::str::FromStr;

use devices_core::validation::source::ReloadMode;
use devices_core::validation::validator::UnknownTypePolicy;

/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development.
/// In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Largest device request body the validation middleware will buffer.
    pub max_body_bytes: usize,
    /// Rule catalog settings.
    pub rules: RulesConfig,
}

/// Where the validation rule catalog lives and how it is refreshed.
#[derive(Debug, Clone)]
pub struct RulesConfig {
    pub path: PathBuf,
    pub load_timeout_secs: u64,
    pub reload_mode: ReloadMode,
    /// Only used in [`ReloadMode::Cached`].
    pub refresh_interval_secs: u64,
    pub unknown_type_policy: UnknownTypePolicy,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                    |
    /// |------------------------|----------------------------|
    /// | `HOST`                 | `0.0.0.0`                  |
    /// | `PORT`                 | `3000`                     |
    /// | `CORS_ORIGINS`         | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                       |
    /// | `MAX_BODY_BYTES`       | `1048576`                  |
    ///
    /// Panics on unparseable values; misconfiguration should fail at startup.
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        Self {
            host,
            port: env_or("PORT", 3000),
            cors_origins,
            request_timeout_secs: env_or("REQUEST_TIMEOUT_SECS", 30),
            max_body_bytes: env_or("MAX_BODY_BYTES", 1024 * 1024),
            rules: RulesConfig::from_env(),
        }
    }
}

impl RulesConfig {
    /// | Env Var                       | Default                        |
    /// |-------------------------------|--------------------------------|
    /// | `VALIDATION_RULES_PATH`       | `config/validation_rules.json` |
    /// | `RULES_LOAD_TIMEOUT_SECS`     | `5`                            |
    /// | `RULES_RELOAD_MODE`           | `per_request`                  |
    /// | `RULES_REFRESH_INTERVAL_SECS` | `60`                           |
    /// | `UNKNOWN_DEVICE_TYPE_POLICY`  | `allow`                        |
    pub fn from_env() -> Self {
        let path = std::env::var("VALIDATION_RULES_PATH")
            .unwrap_or_else(|_| "config/validation_rules.json".into())
            .into();

        Self {
            path,
            load_timeout_secs: env_or("RULES_LOAD_TIMEOUT_SECS", 5),
            reload_mode: env_or("RULES_RELOAD_MODE", ReloadMode::PerRequest),
            refresh_interval_secs: env_or("RULES_REFRESH_INTERVAL_SECS", 60),
            unknown_type_policy: env_or("UNKNOWN_DEVICE_TYPE_POLICY", UnknownTypePolicy::Allow),
        }
    }
}

/// Read `key` and parse it, falling back to `default` when unset.
fn env_or<T>(key: &str, default: T) -> T
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .parse()
            .unwrap_or_else(|e| panic!("{key} has an invalid value '{raw}': {e}")),
        Err(_) => default,
    }
}
