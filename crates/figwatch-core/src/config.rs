use crate::app_config::{AppConfig, Environment, ResponseShape};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files — useful for testing
/// or when the caller manages env setup.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// This is the core parsing/validation logic, decoupled from the actual environment
/// so it can be tested with a pure `HashMap` lookup — no `set_var`/`remove_var` needed.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;
    use std::path::PathBuf;

    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var).map_err(|_| ConfigError::MissingEnvVar(var.to_string()))
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_addr = |var: &str, default: &str| -> Result<SocketAddr, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<SocketAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
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

    let parse_f64 = |var: &str, default: &str| -> Result<f64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<f64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_bool = |var: &str, default: &str| -> Result<bool, ConfigError> {
        let raw = or_default(var, default);
        match raw.as_str() {
            "true" | "1" | "yes" => Ok(true),
            "false" | "0" | "no" => Ok(false),
            other => Err(ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: format!("expected boolean, got '{other}'"),
            }),
        }
    };

    let database_url = require("DATABASE_URL")?;
    let source_api_key = require("FIGWATCH_SOURCE_API_KEY")?;

    let env = parse_environment(&or_default("FIGWATCH_ENV", "development"));
    let bind_addr = parse_addr("FIGWATCH_BIND_ADDR", "0.0.0.0:8000")?;
    let log_level = or_default("FIGWATCH_LOG_LEVEL", "info");
    let figures_path = PathBuf::from(or_default(
        "FIGWATCH_FIGURES_PATH",
        "./config/figures.yaml",
    ));

    let db_max_connections = parse_u32("FIGWATCH_DB_MAX_CONNECTIONS", "10")?;
    let db_min_connections = parse_u32("FIGWATCH_DB_MIN_CONNECTIONS", "1")?;
    let db_acquire_timeout_secs = parse_u64("FIGWATCH_DB_ACQUIRE_TIMEOUT_SECS", "10")?;

    let source_base_url = or_default(
        "FIGWATCH_SOURCE_BASE_URL",
        "https://api.scrapecreators.com/v1",
    );
    let source_page_size = parse_u32("FIGWATCH_SOURCE_PAGE_SIZE", "20")?;
    let source_max_retries = parse_u32("FIGWATCH_SOURCE_MAX_RETRIES", "3")?;
    let source_retry_delay_secs = parse_u64("FIGWATCH_SOURCE_RETRY_DELAY_SECS", "60")?;
    let source_request_timeout_secs = parse_u64("FIGWATCH_SOURCE_REQUEST_TIMEOUT_SECS", "30")?;
    let shape_raw = or_default("FIGWATCH_SOURCE_RESPONSE_SHAPE", "flat");
    let source_response_shape = parse_response_shape("FIGWATCH_SOURCE_RESPONSE_SHAPE", &shape_raw)?;
    let source_use_page_fallback = parse_bool("FIGWATCH_SOURCE_USE_PAGE_FALLBACK", "false")?;
    let source_web_base_url = or_default(
        "FIGWATCH_SOURCE_WEB_BASE_URL",
        "https://syndication.twitter.com",
    );

    let chat_base_url = or_default("FIGWATCH_CHAT_BASE_URL", "https://integrate.api.nvidia.com");
    let chat_api_key = or_default("FIGWATCH_CHAT_API_KEY", "");
    let chat_model = or_default(
        "FIGWATCH_CHAT_MODEL",
        "nvidia/llama-3.1-nemotron-70b-instruct",
    );
    let textgen_base_url = or_default(
        "FIGWATCH_TEXTGEN_BASE_URL",
        "https://generativelanguage.googleapis.com",
    );
    let textgen_api_key = or_default("FIGWATCH_TEXTGEN_API_KEY", "");
    let textgen_model = or_default("FIGWATCH_TEXTGEN_MODEL", "gemini-pro");
    let analyzer_request_timeout_secs = parse_u64("FIGWATCH_ANALYZER_REQUEST_TIMEOUT_SECS", "10")?;

    let notify_webhook_url = lookup("FIGWATCH_NOTIFY_WEBHOOK_URL").ok();

    let poll_interval_secs = parse_u64("FIGWATCH_POLL_INTERVAL_SECS", "300")?;
    let alert_threshold = parse_f64("FIGWATCH_ALERT_THRESHOLD", "0.7")?;

    if !(0.0..=1.0).contains(&alert_threshold) {
        return Err(ConfigError::InvalidEnvVar {
            var: "FIGWATCH_ALERT_THRESHOLD".to_string(),
            reason: format!("must be in [0.0, 1.0], got {alert_threshold}"),
        });
    }

    Ok(AppConfig {
        database_url,
        env,
        bind_addr,
        log_level,
        figures_path,
        db_max_connections,
        db_min_connections,
        db_acquire_timeout_secs,
        source_base_url,
        source_api_key,
        source_page_size,
        source_max_retries,
        source_retry_delay_secs,
        source_request_timeout_secs,
        source_response_shape,
        source_use_page_fallback,
        source_web_base_url,
        chat_base_url,
        chat_api_key,
        chat_model,
        textgen_base_url,
        textgen_api_key,
        textgen_model,
        analyzer_request_timeout_secs,
        notify_webhook_url,
        poll_interval_secs,
        alert_threshold,
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

fn parse_response_shape(var: &str, raw: &str) -> Result<ResponseShape, ConfigError> {
    match raw {
        "flat" => Ok(ResponseShape::Flat),
        "graphql" => Ok(ResponseShape::Graphql),
        other => Err(ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: format!("expected 'flat' or 'graphql', got '{other}'"),
        }),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::env::VarError;

    use super::*;

    fn lookup_from_map<'a>(
        map: &'a HashMap<&'a str, &'a str>,
    ) -> impl Fn(&str) -> Result<String, VarError> + 'a {
        move |key| {
            map.get(key)
                .map(|v| (*v).to_string())
                .ok_or(VarError::NotPresent)
        }
    }

    fn minimal_env() -> HashMap<&'static str, &'static str> {
        let mut map = HashMap::new();
        map.insert("DATABASE_URL", "postgres://localhost/figwatch");
        map.insert("FIGWATCH_SOURCE_API_KEY", "test-key");
        map
    }

    #[test]
    fn minimal_env_uses_defaults() {
        let map = minimal_env();
        let config = build_app_config(lookup_from_map(&map)).unwrap();

        assert_eq!(config.env, Environment::Development);
        assert_eq!(config.bind_addr.port(), 8000);
        assert_eq!(config.source_page_size, 20);
        assert_eq!(config.source_max_retries, 3);
        assert_eq!(config.source_retry_delay_secs, 60);
        assert_eq!(config.source_response_shape, ResponseShape::Flat);
        assert!(!config.source_use_page_fallback);
        assert_eq!(config.analyzer_request_timeout_secs, 10);
        assert_eq!(config.poll_interval_secs, 300);
        assert!((config.alert_threshold - 0.7).abs() < f64::EPSILON);
        assert!(config.notify_webhook_url.is_none());
    }

    #[test]
    fn missing_database_url_is_an_error() {
        let mut map = minimal_env();
        map.remove("DATABASE_URL");
        let err = build_app_config(lookup_from_map(&map)).unwrap_err();
        assert!(matches!(err, ConfigError::MissingEnvVar(var) if var == "DATABASE_URL"));
    }

    #[test]
    fn missing_source_api_key_is_an_error() {
        let mut map = minimal_env();
        map.remove("FIGWATCH_SOURCE_API_KEY");
        let err = build_app_config(lookup_from_map(&map)).unwrap_err();
        assert!(
            matches!(err, ConfigError::MissingEnvVar(var) if var == "FIGWATCH_SOURCE_API_KEY")
        );
    }

    #[test]
    fn graphql_response_shape_is_parsed() {
        let mut map = minimal_env();
        map.insert("FIGWATCH_SOURCE_RESPONSE_SHAPE", "graphql");
        let config = build_app_config(lookup_from_map(&map)).unwrap();
        assert_eq!(config.source_response_shape, ResponseShape::Graphql);
    }

    #[test]
    fn unknown_response_shape_is_rejected() {
        let mut map = minimal_env();
        map.insert("FIGWATCH_SOURCE_RESPONSE_SHAPE", "soap");
        let err = build_app_config(lookup_from_map(&map)).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar { var, .. }
            if var == "FIGWATCH_SOURCE_RESPONSE_SHAPE"));
    }

    #[test]
    fn out_of_range_alert_threshold_is_rejected() {
        let mut map = minimal_env();
        map.insert("FIGWATCH_ALERT_THRESHOLD", "1.5");
        let err = build_app_config(lookup_from_map(&map)).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar { var, .. }
            if var == "FIGWATCH_ALERT_THRESHOLD"));
    }

    #[test]
    fn bool_flag_accepts_common_spellings() {
        for raw in ["true", "1", "yes"] {
            let mut map = minimal_env();
            map.insert("FIGWATCH_SOURCE_USE_PAGE_FALLBACK", raw);
            let config = build_app_config(lookup_from_map(&map)).unwrap();
            assert!(config.source_use_page_fallback, "raw = {raw}");
        }
    }

    #[test]
    fn webhook_url_is_optional() {
        let mut map = minimal_env();
        map.insert("FIGWATCH_NOTIFY_WEBHOOK_URL", "https://hooks.example/send");
        let config = build_app_config(lookup_from_map(&map)).unwrap();
        assert_eq!(
            config.notify_webhook_url.as_deref(),
            Some("https://hooks.example/send")
        );
    }
}
