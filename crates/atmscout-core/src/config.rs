use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if any configured value is invalid.
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
/// Returns `ConfigError` if any configured value is invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// This is the core parsing/validation logic, decoupled from the actual
/// environment so it can be tested with a pure `HashMap` lookup — no
/// `set_var`/`remove_var` needed.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::path::PathBuf;

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

    let env = parse_environment(&or_default("ATMSCOUT_ENV", "development"));
    let log_level = or_default("ATMSCOUT_LOG_LEVEL", "info");
    let markets_path = PathBuf::from(or_default("ATMSCOUT_MARKETS_PATH", "./config/markets.yaml"));
    let cache_dir = PathBuf::from(or_default("ATMSCOUT_CACHE_DIR", "./cache"));
    let output_csv = PathBuf::from(or_default(
        "ATMSCOUT_OUTPUT_CSV",
        "./atm_opportunities.csv",
    ));
    let places_api_key = lookup("ATMSCOUT_PLACES_API_KEY")
        .ok()
        .filter(|s| !s.is_empty());

    let http_timeout_secs = parse_u64("ATMSCOUT_HTTP_TIMEOUT_SECS", "30")?;
    let user_agent = or_default(
        "ATMSCOUT_USER_AGENT",
        "atmscout/0.1 (placement-intelligence)",
    );
    let max_retries = parse_u32("ATMSCOUT_MAX_RETRIES", "3")?;
    let retry_backoff_base_secs = parse_u64("ATMSCOUT_RETRY_BACKOFF_BASE_SECS", "5")?;
    let inter_request_delay_ms = parse_u64("ATMSCOUT_INTER_REQUEST_DELAY_MS", "250")?;

    Ok(AppConfig {
        env,
        log_level,
        markets_path,
        cache_dir,
        output_csv,
        places_api_key,
        http_timeout_secs,
        user_agent,
        max_retries,
        retry_backoff_base_secs,
        inter_request_delay_ms,
    })
}

/// Parse a string into an `Environment` variant.
///
/// Unrecognized values default to `Environment::Development`.
fn parse_environment(s: &str) -> Environment {
    match s {
        "production" => Environment::Production,
        "test" => Environment::Test,
        _ => Environment::Development,
    }
}
