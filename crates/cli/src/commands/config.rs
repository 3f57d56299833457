use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use ratecard_core::config::{AppConfig, LoadOptions};
use secrecy::SecretString;
use toml::Value;

pub fn run() -> String {
    let config = match AppConfig::load(LoadOptions::default()) {
        Ok(config) => config,
        Err(error) => return format!("config validation failed: {error}"),
    };

    let config_file_path = detect_config_path();
    let config_file_doc = load_config_file_doc(config_file_path.as_deref());
    let source = |key_path: &str, env_key: Option<&str>| {
        field_source(key_path, env_key, config_file_doc.as_ref(), config_file_path.as_deref())
    };

    let mut lines = vec!["effective config (source precedence: env > file > default):".to_string()];

    lines.push(render_line(
        "database.url",
        &config.database.url,
        source("database.url", Some("RATECARD_DATABASE_URL")),
    ));
    lines.push(render_line(
        "database.max_connections",
        &config.database.max_connections.to_string(),
        source("database.max_connections", Some("RATECARD_DATABASE_MAX_CONNECTIONS")),
    ));
    lines.push(render_line(
        "database.timeout_secs",
        &config.database.timeout_secs.to_string(),
        source("database.timeout_secs", Some("RATECARD_DATABASE_TIMEOUT_SECS")),
    ));

    lines.push(render_line(
        "pricing.fallback_team_base_rate",
        &config.pricing.fallback_team_base_rate.to_string(),
        source("pricing.fallback_team_base_rate", None),
    ));
    lines.push(render_line(
        "pricing.team_discount",
        &config.pricing.team_discount.to_string(),
        source("pricing.team_discount", None),
    ));
    lines.push(render_line(
        "pricing.team_region",
        &config.pricing.team_region,
        source("pricing.team_region", None),
    ));
    lines.push(render_line(
        "pricing.team_seniority",
        config.pricing.team_seniority.as_str(),
        source("pricing.team_seniority", None),
    ));

    lines.push(render_line(
        "exchange.enabled",
        &config.exchange.enabled.to_string(),
        source("exchange.enabled", Some("RATECARD_EXCHANGE_ENABLED")),
    ));
    lines.push(render_line(
        "exchange.base_url",
        &config.exchange.base_url,
        source("exchange.base_url", Some("RATECARD_EXCHANGE_BASE_URL")),
    ));
    lines.push(render_line(
        "exchange.api_key",
        redact_secret(config.exchange.api_key.as_ref()),
        source("exchange.api_key", Some("RATECARD_EXCHANGE_API_KEY")),
    ));
    lines.push(render_line(
        "exchange.refresh_interval_secs",
        &config.exchange.refresh_interval_secs.to_string(),
        source("exchange.refresh_interval_secs", Some("RATECARD_EXCHANGE_REFRESH_INTERVAL_SECS")),
    ));

    lines.push(render_line(
        "email.enabled",
        &config.email.enabled.to_string(),
        source("email.enabled", Some("RATECARD_EMAIL_ENABLED")),
    ));
    lines.push(render_line(
        "email.api_url",
        config.email.api_url.as_deref().unwrap_or("<unset>"),
        source("email.api_url", Some("RATECARD_EMAIL_API_URL")),
    ));
    lines.push(render_line(
        "email.api_key",
        redact_secret(config.email.api_key.as_ref()),
        source("email.api_key", Some("RATECARD_EMAIL_API_KEY")),
    ));
    lines.push(render_line(
        "email.from_address",
        &config.email.from_address,
        source("email.from_address", Some("RATECARD_EMAIL_FROM")),
    ));

    lines.push(render_line(
        "server.bind_address",
        &config.server.bind_address,
        source("server.bind_address", Some("RATECARD_SERVER_BIND_ADDRESS")),
    ));
    lines.push(render_line(
        "server.port",
        &config.server.port.to_string(),
        source("server.port", Some("RATECARD_SERVER_PORT")),
    ));
    lines.push(render_line(
        "server.health_check_port",
        &config.server.health_check_port.to_string(),
        source("server.health_check_port", Some("RATECARD_SERVER_HEALTH_CHECK_PORT")),
    ));

    lines.push(render_line(
        "logging.level",
        &config.logging.level,
        source("logging.level", Some("RATECARD_LOGGING_LEVEL")),
    ));
    lines.push(render_line(
        "logging.format",
        &format!("{:?}", config.logging.format),
        source("logging.format", Some("RATECARD_LOGGING_FORMAT")),
    ));

    lines.join("\n")
}

fn detect_config_path() -> Option<PathBuf> {
    let root = PathBuf::from("ratecard.toml");
    if root.exists() {
        return Some(root);
    }

    let nested = PathBuf::from("config/ratecard.toml");
    if nested.exists() {
        return Some(nested);
    }

    None
}

fn load_config_file_doc(path: Option<&Path>) -> Option<Value> {
    let path = path?;
    let raw = fs::read_to_string(path).ok()?;
    raw.parse::<Value>().ok()
}

fn field_source(
    key_path: &str,
    env_key: Option<&str>,
    config_file_doc: Option<&Value>,
    config_file_path: Option<&Path>,
) -> String {
    if let Some(env_key) = env_key {
        if env::var_os(env_key).is_some() {
            return format!("env ({env_key})");
        }
    }

    if let Some(doc) = config_file_doc {
        if contains_path(doc, key_path) {
            let file_path = config_file_path
                .map(|path| path.display().to_string())
                .unwrap_or_else(|| "config file".to_string());
            return format!("file ({file_path})");
        }
    }

    "default".to_string()
}

fn contains_path(root: &Value, key_path: &str) -> bool {
    let mut current = root;
    for key in key_path.split('.') {
        let Some(next) = current.get(key) else {
            return false;
        };
        current = next;
    }
    true
}

fn render_line(key: &str, value: &str, source: String) -> String {
    format!("- {key} = {value} (source: {source})")
}

fn redact_secret(secret: Option<&SecretString>) -> &'static str {
    if secret.is_some() {
        "<redacted>"
    } else {
        "<unset>"
    }
}
