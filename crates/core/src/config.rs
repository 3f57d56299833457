use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use rust_decimal::Decimal;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::pricing::PricingDefaults;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub database: DatabaseConfig,
    pub pricing: PricingDefaults,
    pub exchange: ExchangeConfig,
    pub email: EmailConfig,
    pub server: ServerConfig,
    pub logging: LoggingConfig,
}

#[derive(Clone, Debug)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub timeout_secs: u64,
}

#[derive(Clone, Debug)]
pub struct ExchangeConfig {
    pub enabled: bool,
    pub base_url: String,
    pub api_key: Option<SecretString>,
    pub refresh_interval_secs: u64,
}

#[derive(Clone, Debug)]
pub struct EmailConfig {
    pub enabled: bool,
    pub api_url: Option<String>,
    pub api_key: Option<SecretString>,
    pub from_address: String,
    pub bcc: Option<String>,
    pub subject: String,
}

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub bind_address: String,
    pub port: u16,
    pub health_check_port: u16,
    pub graceful_shutdown_secs: u64,
}

#[derive(Clone, Debug)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    Compact,
    Pretty,
    Json,
}

#[derive(Clone, Debug, Default)]
pub struct ConfigOverrides {
    pub database_url: Option<String>,
    pub log_level: Option<String>,
    pub exchange_api_key: Option<String>,
    pub email_api_url: Option<String>,
    pub email_enabled: Option<bool>,
}

#[derive(Clone, Debug, Default)]
pub struct LoadOptions {
    pub config_path: Option<PathBuf>,
    pub require_file: bool,
    pub overrides: ConfigOverrides,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file `{path}`: {source}")]
    ReadFile { path: PathBuf, source: std::io::Error },
    #[error("could not parse config file `{path}`: {source}")]
    ParseFile { path: PathBuf, source: toml::de::Error },
    #[error("required config file was not found: `{0}`")]
    MissingConfigFile(PathBuf),
    #[error("environment variable interpolation failed for `{var}`")]
    MissingEnvInterpolation { var: String },
    #[error("unterminated environment interpolation expression")]
    UnterminatedInterpolation,
    #[error("invalid environment override for `{key}`: `{value}`")]
    InvalidEnvOverride { key: String, value: String },
    #[error("configuration validation failed: {0}")]
    Validation(String),
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database: DatabaseConfig {
                url: "sqlite://ratecard.db".to_string(),
                max_connections: 5,
                timeout_secs: 30,
            },
            pricing: PricingDefaults::default(),
            exchange: ExchangeConfig {
                enabled: true,
                base_url: "https://v6.exchangerate-api.com/v6".to_string(),
                api_key: None,
                refresh_interval_secs: 3600,
            },
            email: EmailConfig {
                enabled: false,
                api_url: None,
                api_key: None,
                from_address: "Ratecard Quotes <quotes@ratecard.local>".to_string(),
                bcc: None,
                subject: "Your Rate Quote".to_string(),
            },
            server: ServerConfig {
                bind_address: "127.0.0.1".to_string(),
                port: 8090,
                health_check_port: 8091,
                graceful_shutdown_secs: 15,
            },
            logging: LoggingConfig { level: "info".to_string(), format: LogFormat::Compact },
        }
    }
}

fn secret_value(value: String) -> SecretString {
    value.into()
}

impl std::str::FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "compact" => Ok(Self::Compact),
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(ConfigError::Validation(format!(
                "unsupported log format `{other}` (expected compact|pretty|json)"
            ))),
        }
    }
}

impl AppConfig {
    pub fn load(options: LoadOptions) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        let maybe_path = resolve_config_path(options.config_path.as_deref());

        if let Some(path) = maybe_path {
            let patch = read_patch(&path)?;
            config.apply_patch(patch)?;
        } else if options.require_file {
            let expected = options.config_path.unwrap_or_else(|| PathBuf::from("ratecard.toml"));
            return Err(ConfigError::MissingConfigFile(expected));
        }

        config.apply_env_overrides()?;
        config.apply_overrides(options.overrides);
        config.validate()?;

        Ok(config)
    }

    fn apply_patch(&mut self, patch: ConfigPatch) -> Result<(), ConfigError> {
        if let Some(database) = patch.database {
            if let Some(url) = database.url {
                self.database.url = url;
            }
            if let Some(max_connections) = database.max_connections {
                self.database.max_connections = max_connections;
            }
            if let Some(timeout_secs) = database.timeout_secs {
                self.database.timeout_secs = timeout_secs;
            }
        }

        if let Some(pricing) = patch.pricing {
            if let Some(value) = pricing.fallback_team_base_rate {
                self.pricing.fallback_team_base_rate =
                    parse_decimal("pricing.fallback_team_base_rate", value)?;
            }
            if let Some(value) = pricing.team_seniority_multiplier {
                self.pricing.team_seniority_multiplier =
                    parse_decimal("pricing.team_seniority_multiplier", value)?;
            }
            if let Some(value) = pricing.team_discount {
                self.pricing.team_discount = parse_decimal("pricing.team_discount", value)?;
            }
            if let Some(region) = pricing.team_region {
                self.pricing.team_region = region;
            }
            if let Some(seniority) = pricing.team_seniority {
                self.pricing.team_seniority = seniority
                    .parse()
                    .map_err(|error| ConfigError::Validation(format!("{error}")))?;
            }
        }

        if let Some(exchange) = patch.exchange {
            if let Some(enabled) = exchange.enabled {
                self.exchange.enabled = enabled;
            }
            if let Some(base_url) = exchange.base_url {
                self.exchange.base_url = base_url;
            }
            if let Some(exchange_api_key_value) = exchange.api_key {
                self.exchange.api_key = Some(secret_value(exchange_api_key_value));
            }
            if let Some(refresh_interval_secs) = exchange.refresh_interval_secs {
                self.exchange.refresh_interval_secs = refresh_interval_secs;
            }
        }

        if let Some(email) = patch.email {
            if let Some(enabled) = email.enabled {
                self.email.enabled = enabled;
            }
            if let Some(api_url) = email.api_url {
                self.email.api_url = Some(api_url);
            }
            if let Some(email_api_key_value) = email.api_key {
                self.email.api_key = Some(secret_value(email_api_key_value));
            }
            if let Some(from_address) = email.from_address {
                self.email.from_address = from_address;
            }
            if let Some(bcc) = email.bcc {
                self.email.bcc = Some(bcc);
            }
            if let Some(subject) = email.subject {
                self.email.subject = subject;
            }
        }

        if let Some(server) = patch.server {
            if let Some(bind_address) = server.bind_address {
                self.server.bind_address = bind_address;
            }
            if let Some(port) = server.port {
                self.server.port = port;
            }
            if let Some(health_check_port) = server.health_check_port {
                self.server.health_check_port = health_check_port;
            }
            if let Some(graceful_shutdown_secs) = server.graceful_shutdown_secs {
                self.server.graceful_shutdown_secs = graceful_shutdown_secs;
            }
        }

        if let Some(logging) = patch.logging {
            if let Some(level) = logging.level {
                self.logging.level = level;
            }
            if let Some(format) = logging.format {
                self.logging.format = format;
            }
        }

        Ok(())
    }

    fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        if let Some(value) = read_env("RATECARD_DATABASE_URL") {
            self.database.url = value;
        }
        if let Some(value) = read_env("RATECARD_DATABASE_MAX_CONNECTIONS") {
            self.database.max_connections =
                parse_u32("RATECARD_DATABASE_MAX_CONNECTIONS", &value)?;
        }
        if let Some(value) = read_env("RATECARD_DATABASE_TIMEOUT_SECS") {
            self.database.timeout_secs = parse_u64("RATECARD_DATABASE_TIMEOUT_SECS", &value)?;
        }

        if let Some(value) = read_env("RATECARD_EXCHANGE_ENABLED") {
            self.exchange.enabled = parse_bool("RATECARD_EXCHANGE_ENABLED", &value)?;
        }
        if let Some(value) = read_env("RATECARD_EXCHANGE_BASE_URL") {
            self.exchange.base_url = value;
        }
        if let Some(value) = read_env("RATECARD_EXCHANGE_API_KEY") {
            self.exchange.api_key = Some(secret_value(value));
        }
        if let Some(value) = read_env("RATECARD_EXCHANGE_REFRESH_INTERVAL_SECS") {
            self.exchange.refresh_interval_secs =
                parse_u64("RATECARD_EXCHANGE_REFRESH_INTERVAL_SECS", &value)?;
        }

        if let Some(value) = read_env("RATECARD_EMAIL_ENABLED") {
            self.email.enabled = parse_bool("RATECARD_EMAIL_ENABLED", &value)?;
        }
        if let Some(value) = read_env("RATECARD_EMAIL_API_URL") {
            self.email.api_url = Some(value);
        }
        if let Some(value) = read_env("RATECARD_EMAIL_API_KEY") {
            self.email.api_key = Some(secret_value(value));
        }
        if let Some(value) = read_env("RATECARD_EMAIL_FROM") {
            self.email.from_address = value;
        }
        if let Some(value) = read_env("RATECARD_EMAIL_BCC") {
            self.email.bcc = Some(value);
        }

        if let Some(value) = read_env("RATECARD_SERVER_BIND_ADDRESS") {
            self.server.bind_address = value;
        }
        if let Some(value) = read_env("RATECARD_SERVER_PORT") {
            self.server.port = parse_u16("RATECARD_SERVER_PORT", &value)?;
        }
        if let Some(value) = read_env("RATECARD_SERVER_HEALTH_CHECK_PORT") {
            self.server.health_check_port =
                parse_u16("RATECARD_SERVER_HEALTH_CHECK_PORT", &value)?;
        }
        if let Some(value) = read_env("RATECARD_SERVER_GRACEFUL_SHUTDOWN_SECS") {
            self.server.graceful_shutdown_secs =
                parse_u64("RATECARD_SERVER_GRACEFUL_SHUTDOWN_SECS", &value)?;
        }

        let log_level =
            read_env("RATECARD_LOGGING_LEVEL").or_else(|| read_env("RATECARD_LOG_LEVEL"));
        if let Some(value) = log_level {
            self.logging.level = value;
        }
        let log_format =
            read_env("RATECARD_LOGGING_FORMAT").or_else(|| read_env("RATECARD_LOG_FORMAT"));
        if let Some(value) = log_format {
            self.logging.format = value.parse()?;
        }

        Ok(())
    }

    fn apply_overrides(&mut self, overrides: ConfigOverrides) {
        if let Some(database_url) = overrides.database_url {
            self.database.url = database_url;
        }
        if let Some(log_level) = overrides.log_level {
            self.logging.level = log_level;
        }
        if let Some(exchange_api_key) = overrides.exchange_api_key {
            self.exchange.api_key = Some(secret_value(exchange_api_key));
        }
        if let Some(email_api_url) = overrides.email_api_url {
            self.email.api_url = Some(email_api_url);
        }
        if let Some(email_enabled) = overrides.email_enabled {
            self.email.enabled = email_enabled;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_database(&self.database)?;
        validate_pricing(&self.pricing)?;
        validate_exchange(&self.exchange)?;
        validate_email(&self.email)?;
        validate_server(&self.server)?;
        validate_logging(&self.logging)?;
        Ok(())
    }
}

fn resolve_config_path(explicit_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit_path {
        return path.exists().then_some(path.to_path_buf());
    }

    [PathBuf::from("ratecard.toml"), PathBuf::from("config/ratecard.toml")]
        .into_iter()
        .find(|path| path.exists())
}

fn read_patch(path: &Path) -> Result<ConfigPatch, ConfigError> {
    let raw = fs::read_to_string(path)
        .map_err(|source| ConfigError::ReadFile { path: path.to_path_buf(), source })?;

    let interpolated = interpolate_env_vars(&raw)?;
    toml::from_str::<ConfigPatch>(&interpolated)
        .map_err(|source| ConfigError::ParseFile { path: path.to_path_buf(), source })
}

fn interpolate_env_vars(input: &str) -> Result<String, ConfigError> {
    let mut output = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == '$' && matches!(chars.peek(), Some('{')) {
            chars.next();
            let mut key = String::new();

            loop {
                match chars.next() {
                    Some('}') => break,
                    Some(next) => key.push(next),
                    None => return Err(ConfigError::UnterminatedInterpolation),
                }
            }

            let value = env::var(&key)
                .map_err(|_| ConfigError::MissingEnvInterpolation { var: key.clone() })?;
            output.push_str(&value);
            continue;
        }

        output.push(ch);
    }

    Ok(output)
}

fn validate_database(database: &DatabaseConfig) -> Result<(), ConfigError> {
    let url = database.url.trim();
    let sqlite_url =
        url.starts_with("sqlite://") || url.starts_with("sqlite::") || url == ":memory:";
    if !sqlite_url {
        return Err(ConfigError::Validation(
            "database.url must be a sqlite URL (`sqlite://...`, `sqlite::...`, or `:memory:`)"
                .to_string(),
        ));
    }

    if database.max_connections == 0 {
        return Err(ConfigError::Validation(
            "database.max_connections must be greater than zero".to_string(),
        ));
    }

    if database.timeout_secs == 0 || database.timeout_secs > 300 {
        return Err(ConfigError::Validation(
            "database.timeout_secs must be in range 1..=300".to_string(),
        ));
    }

    Ok(())
}

fn validate_pricing(pricing: &PricingDefaults) -> Result<(), ConfigError> {
    if pricing.fallback_team_base_rate <= Decimal::ZERO {
        return Err(ConfigError::Validation(
            "pricing.fallback_team_base_rate must be positive".to_string(),
        ));
    }

    if pricing.team_seniority_multiplier <= Decimal::ZERO {
        return Err(ConfigError::Validation(
            "pricing.team_seniority_multiplier must be positive".to_string(),
        ));
    }

    if pricing.team_discount < Decimal::ZERO || pricing.team_discount >= Decimal::ONE {
        return Err(ConfigError::Validation(
            "pricing.team_discount must be in range 0.0..1.0".to_string(),
        ));
    }

    if pricing.team_region.trim().is_empty() {
        return Err(ConfigError::Validation("pricing.team_region must not be empty".to_string()));
    }

    Ok(())
}

fn validate_exchange(exchange: &ExchangeConfig) -> Result<(), ConfigError> {
    if !exchange.base_url.starts_with("http://") && !exchange.base_url.starts_with("https://") {
        return Err(ConfigError::Validation(
            "exchange.base_url must start with http:// or https://".to_string(),
        ));
    }

    if exchange.refresh_interval_secs == 0 {
        return Err(ConfigError::Validation(
            "exchange.refresh_interval_secs must be greater than zero".to_string(),
        ));
    }

    Ok(())
}

fn validate_email(email: &EmailConfig) -> Result<(), ConfigError> {
    if email.enabled {
        let missing_url =
            email.api_url.as_ref().map(|value| value.trim().is_empty()).unwrap_or(true);
        if missing_url {
            return Err(ConfigError::Validation(
                "email.api_url is required when email.enabled is true".to_string(),
            ));
        }

        let missing_key = email
            .api_key
            .as_ref()
            .map(|value| value.expose_secret().trim().is_empty())
            .unwrap_or(true);
        if missing_key {
            return Err(ConfigError::Validation(
                "email.api_key is required when email.enabled is true".to_string(),
            ));
        }
    }

    if let Some(api_url) = &email.api_url {
        if !api_url.starts_with("http://") && !api_url.starts_with("https://") {
            return Err(ConfigError::Validation(
                "email.api_url must start with http:// or https://".to_string(),
            ));
        }
    }

    if email.from_address.trim().is_empty() {
        return Err(ConfigError::Validation("email.from_address must not be empty".to_string()));
    }

    Ok(())
}

fn validate_server(server: &ServerConfig) -> Result<(), ConfigError> {
    if server.port == 0 {
        return Err(ConfigError::Validation("server.port must be greater than zero".to_string()));
    }

    if server.health_check_port == 0 {
        return Err(ConfigError::Validation(
            "server.health_check_port must be greater than zero".to_string(),
        ));
    }

    if server.port == server.health_check_port {
        return Err(ConfigError::Validation(
            "server.port and server.health_check_port must differ".to_string(),
        ));
    }

    if server.graceful_shutdown_secs == 0 {
        return Err(ConfigError::Validation(
            "server.graceful_shutdown_secs must be greater than zero".to_string(),
        ));
    }

    Ok(())
}

fn validate_logging(logging: &LoggingConfig) -> Result<(), ConfigError> {
    let level = logging.level.trim().to_ascii_lowercase();
    match level.as_str() {
        "trace" | "debug" | "info" | "warn" | "error" => Ok(()),
        _ => Err(ConfigError::Validation(
            "logging.level must be one of trace|debug|info|warn|error".to_string(),
        )),
    }
}

fn read_env(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn parse_u16(key: &str, value: &str) -> Result<u16, ConfigError> {
    value.parse::<u16>().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

fn parse_u32(key: &str, value: &str) -> Result<u32, ConfigError> {
    value.parse::<u32>().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

fn parse_u64(key: &str, value: &str) -> Result<u64, ConfigError> {
    value.parse::<u64>().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

fn parse_bool(key: &str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        _ => Err(ConfigError::InvalidEnvOverride {
            key: key.to_string(),
            value: value.to_string(),
        }),
    }
}

fn parse_decimal(field: &str, value: f64) -> Result<Decimal, ConfigError> {
    Decimal::try_from(value)
        .map_err(|_| ConfigError::Validation(format!("{field} is not a representable number")))
}

#[derive(Debug, Default, Deserialize)]
struct ConfigPatch {
    database: Option<DatabasePatch>,
    pricing: Option<PricingPatch>,
    exchange: Option<ExchangePatch>,
    email: Option<EmailPatch>,
    server: Option<ServerPatch>,
    logging: Option<LoggingPatch>,
}

#[derive(Debug, Default, Deserialize)]
struct DatabasePatch {
    url: Option<String>,
    max_connections: Option<u32>,
    timeout_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
struct PricingPatch {
    fallback_team_base_rate: Option<f64>,
    team_seniority_multiplier: Option<f64>,
    team_discount: Option<f64>,
    team_region: Option<String>,
    team_seniority: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct ExchangePatch {
    enabled: Option<bool>,
    base_url: Option<String>,
    api_key: Option<String>,
    refresh_interval_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
struct EmailPatch {
    enabled: Option<bool>,
    api_url: Option<String>,
    api_key: Option<String>,
    from_address: Option<String>,
    bcc: Option<String>,
    subject: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct ServerPatch {
    bind_address: Option<String>,
    port: Option<u16>,
    health_check_port: Option<u16>,
    graceful_shutdown_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
struct LoggingPatch {
    level: Option<String>,
    format: Option<LogFormat>,
}

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::path::PathBuf;

    use rust_decimal::Decimal;

    use crate::domain::rate::Seniority;

    use super::{AppConfig, ConfigError, ConfigOverrides, LoadOptions, LogFormat};

    fn load_from_toml(contents: &str) -> Result<AppConfig, ConfigError> {
        let mut file = tempfile::NamedTempFile::new().expect("temp config file");
        file.write_all(contents.as_bytes()).expect("write config");

        AppConfig::load(LoadOptions {
            config_path: Some(file.path().to_path_buf()),
            require_file: true,
            overrides: ConfigOverrides::default(),
        })
    }

    #[test]
    fn defaults_pass_validation() {
        let config = AppConfig::default();
        config.validate().expect("defaults must be valid");
        assert_eq!(config.pricing.fallback_team_base_rate, Decimal::new(1000, 0));
        assert_eq!(config.exchange.refresh_interval_secs, 3600);
    }

    #[test]
    fn file_patch_overrides_defaults() {
        let config = load_from_toml(
            r#"
            [database]
            url = "sqlite://custom.db"

            [pricing]
            fallback_team_base_rate = 1500.0
            team_seniority = "expert"

            [logging]
            level = "debug"
            format = "json"
            "#,
        )
        .expect("load");

        assert_eq!(config.database.url, "sqlite://custom.db");
        assert_eq!(config.pricing.fallback_team_base_rate, Decimal::new(1500, 0));
        assert_eq!(config.pricing.team_seniority, Seniority::Expert);
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.logging.format, LogFormat::Json);
    }

    #[test]
    fn missing_required_file_is_an_error() {
        let result = AppConfig::load(LoadOptions {
            config_path: Some(PathBuf::from("/definitely/not/here/ratecard.toml")),
            require_file: true,
            overrides: ConfigOverrides::default(),
        });

        assert!(matches!(result, Err(ConfigError::MissingConfigFile(_))));
    }

    #[test]
    fn rejects_team_discount_of_one_or_more() {
        let result = load_from_toml(
            r#"
            [pricing]
            team_discount = 1.0
            "#,
        );

        let message = result.expect_err("discount of 1.0 must fail").to_string();
        assert!(message.contains("team_discount"));
    }

    #[test]
    fn rejects_zero_refresh_interval() {
        let result = load_from_toml(
            r#"
            [exchange]
            refresh_interval_secs = 0
            "#,
        );

        assert!(result.is_err());
    }

    #[test]
    fn rejects_unknown_team_seniority() {
        let result = load_from_toml(
            r#"
            [pricing]
            team_seniority = "principal"
            "#,
        );

        let message = result.expect_err("unknown tier must fail").to_string();
        assert!(message.contains("principal"));
    }

    #[test]
    fn email_enabled_requires_transport_settings() {
        let result = load_from_toml(
            r#"
            [email]
            enabled = true
            "#,
        );

        let message = result.expect_err("enabled email needs an api url").to_string();
        assert!(message.contains("email.api_url"));
    }

    #[test]
    fn overrides_win_over_file_values() {
        let mut file = tempfile::NamedTempFile::new().expect("temp config file");
        file.write_all(b"[database]\nurl = \"sqlite://from-file.db\"\n").expect("write config");

        let config = AppConfig::load(LoadOptions {
            config_path: Some(file.path().to_path_buf()),
            require_file: true,
            overrides: ConfigOverrides {
                database_url: Some("sqlite::memory:".to_string()),
                ..ConfigOverrides::default()
            },
        })
        .expect("load");

        assert_eq!(config.database.url, "sqlite::memory:");
    }

    #[test]
    fn interpolation_reports_missing_variables() {
        let result = load_from_toml(
            r#"
            [exchange]
            api_key = "${RATECARD_TEST_UNSET_INTERPOLATION_VAR}"
            "#,
        );

        assert!(matches!(result, Err(ConfigError::MissingEnvInterpolation { .. })));
    }
}
