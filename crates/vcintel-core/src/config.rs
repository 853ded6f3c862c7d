use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_OPENAI_API_URL: &str = "https://api.openai.com/v1/chat/completions";
pub const DEFAULT_FETCH_USER_AGENT: &str = "vcintel-enricher/0.1 (company-research)";

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but cannot be parsed.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but cannot be parsed.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Every variable has a default, so the only failure mode is a value that
/// does not parse. Blank credentials and endpoints are treated as unset.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;

    let non_blank = |var: &str| -> Option<String> {
        lookup(var)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    };

    let or_default =
        |var: &str, default: &str| -> String { non_blank(var).unwrap_or_else(|| default.to_string()) };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_addr = |var: &str, default: &str| -> Result<SocketAddr, ConfigError> {
        or_default(var, default)
            .parse::<SocketAddr>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        or_default(var, default)
            .parse::<u64>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        or_default(var, default)
            .parse::<usize>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let env = parse_environment(&or_default("VCINTEL_ENV", "development"))?;
    let bind_addr = parse_addr("VCINTEL_BIND_ADDR", "0.0.0.0:3000")?;
    let log_level = or_default("VCINTEL_LOG_LEVEL", "info");

    let openai_api_key = non_blank("OPENAI_API_KEY");
    let openai_model = or_default("OPENAI_MODEL", DEFAULT_OPENAI_MODEL);
    let openai_api_url = or_default("OPENAI_API_URL", DEFAULT_OPENAI_API_URL);
    let llm_timeout_secs = parse_u64("VCINTEL_LLM_TIMEOUT_SECS", "20")?;

    let fetch_timeout_secs = parse_u64("VCINTEL_FETCH_TIMEOUT_SECS", "15")?;
    let fetch_user_agent = or_default("VCINTEL_FETCH_USER_AGENT", DEFAULT_FETCH_USER_AGENT);

    let rate_limit_per_minute = parse_usize("VCINTEL_RATE_LIMIT_PER_MINUTE", "30")?;
    if rate_limit_per_minute == 0 {
        return Err(invalid(
            "VCINTEL_RATE_LIMIT_PER_MINUTE",
            "must be greater than zero".to_string(),
        ));
    }

    Ok(AppConfig {
        env,
        bind_addr,
        log_level,
        openai_api_key,
        openai_model,
        openai_api_url,
        llm_timeout_secs,
        fetch_timeout_secs,
        fetch_user_agent,
        rate_limit_per_minute,
    })
}

/// Parse a string into an `Environment` variant.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "VCINTEL_ENV".to_string(),
            reason: format!("expected development, test, or production; got {other:?}"),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
