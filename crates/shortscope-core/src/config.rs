use std::path::PathBuf;

use crate::app_config::AppConfig;
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a set env var has an invalid value.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the
/// process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files — useful for
/// testing or when the caller manages env setup.
///
/// # Errors
///
/// Returns `ConfigError` if a set env var has an invalid value.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// This is the core parsing/validation logic, decoupled from the actual
/// environment so it can be tested with a pure `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u32>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let api_key = lookup("YOUTUBE_API_KEY").ok();

    let log_level = or_default("SHORTSCOPE_LOG_LEVEL", "info");
    let output_dir = PathBuf::from(or_default("SHORTSCOPE_OUTPUT_DIR", "./output"));
    let request_timeout_secs = parse_u64("SHORTSCOPE_REQUEST_TIMEOUT_SECS", "30")?;
    let user_agent = or_default("SHORTSCOPE_USER_AGENT", "shortscope/0.1 (shorts-analytics)");
    let quota_budget = parse_u64("SHORTSCOPE_QUOTA_BUDGET", "10000")?;
    let max_retries = parse_u32("SHORTSCOPE_MAX_RETRIES", "3")?;
    let retry_backoff_base_ms = parse_u64("SHORTSCOPE_RETRY_BACKOFF_BASE_MS", "1000")?;

    Ok(AppConfig {
        api_key,
        log_level,
        output_dir,
        request_timeout_secs,
        user_agent,
        quota_budget,
        max_retries,
        retry_backoff_base_ms,
    })
}
