use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tracing::{info, warn};

use ratecard_core::cache::RateCache;
use ratecard_core::config::{AppConfig, ConfigError, LoadOptions};
use ratecard_core::lookup::RateLookup;
use ratecard_core::pricing::RateQuoter;
use ratecard_db::repositories::{SqlExchangeRateRepository, SqlRateRepository};
use ratecard_db::{connect_with_settings, migrations, DbPool, StoreRateLookup};

use crate::api::ApiState;
use crate::email::QuoteMailer;
use crate::exchange::{self, ExchangeRateProvider};
use crate::pdf::PdfGenerator;

pub struct Application {
    pub config: AppConfig,
    pub db_pool: DbPool,
    pub state: ApiState,
    pub provider: ExchangeRateProvider,
    pub exchange_repository: Arc<SqlExchangeRateRepository>,
}

#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("database connection failed: {0}")]
    DatabaseConnect(#[source] sqlx::Error),
    #[error("database migration failed: {0}")]
    Migration(#[source] sqlx::migrate::MigrateError),
}

pub async fn bootstrap(options: LoadOptions) -> Result<Application, BootstrapError> {
    let config = AppConfig::load(options)?;
    bootstrap_with_config(config).await
}

pub async fn bootstrap_with_config(config: AppConfig) -> Result<Application, BootstrapError> {
    info!(
        event_name = "system.bootstrap.start",
        correlation_id = "bootstrap",
        "starting application bootstrap"
    );

    let db_pool = connect_with_settings(
        &config.database.url,
        config.database.max_connections,
        config.database.timeout_secs,
    )
    .await
    .map_err(BootstrapError::DatabaseConnect)?;
    info!(
        event_name = "system.bootstrap.database_connected",
        correlation_id = "bootstrap",
        "database connection established"
    );

    migrations::run_pending(&db_pool).await.map_err(BootstrapError::Migration)?;
    info!(
        event_name = "system.bootstrap.migrations_applied",
        correlation_id = "bootstrap",
        "database migrations applied"
    );

    let lookup: Arc<dyn RateLookup> = Arc::new(StoreRateLookup::new(
        SqlRateRepository::new(db_pool.clone()),
        config.pricing.clone(),
    ));
    let quoter = Arc::new(RateQuoter::new(lookup.clone(), config.pricing.clone()));

    let cache =
        Arc::new(RateCache::new(Duration::from_secs(config.exchange.refresh_interval_secs)));
    let exchange_repository = Arc::new(SqlExchangeRateRepository::new(db_pool.clone()));
    exchange::warm_from_store(cache.as_ref(), exchange_repository.as_ref()).await;

    let pdf = match PdfGenerator::new("templates") {
        Ok(generator) => Arc::new(generator),
        Err(error) => {
            warn!(error = %error, "filesystem templates unavailable, using embedded rate card template");
            Arc::new(PdfGenerator::with_embedded_templates())
        }
    };

    let state = ApiState {
        lookup,
        quoter,
        cache,
        mailer: Arc::new(QuoteMailer::new(config.email.clone())),
        pdf,
    };

    let provider = ExchangeRateProvider::from_config(&config.exchange);

    Ok(Application { config, db_pool, state, provider, exchange_repository })
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use ratecard_core::config::{ConfigOverrides, LoadOptions};
    use ratecard_core::domain::quote::{PricingMode, PricingRequest};

    use crate::bootstrap::bootstrap;

    fn valid_overrides(database_url: &str) -> LoadOptions {
        LoadOptions {
            overrides: ConfigOverrides {
                database_url: Some(database_url.to_string()),
                ..ConfigOverrides::default()
            },
            ..LoadOptions::default()
        }
    }

    #[tokio::test]
    async fn bootstrap_fails_fast_on_an_invalid_database_url() {
        let result = bootstrap(valid_overrides("postgres://nope")).await;

        assert!(result.is_err());
        let message = result.err().expect("error").to_string();
        assert!(message.contains("database.url"));
    }

    #[tokio::test]
    async fn integration_smoke_covers_startup_schema_and_pricing_path() {
        let app = bootstrap(valid_overrides("sqlite::memory:?cache=shared"))
            .await
            .expect("bootstrap should succeed with valid overrides");

        let (table_count,): (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM sqlite_master \
             WHERE type = 'table' AND name IN ('rates', 'exchange_rates')",
        )
        .fetch_one(&app.db_pool)
        .await
        .expect("expected baseline tables to be available after bootstrap");
        assert_eq!(table_count, 2, "bootstrap should expose the rate-path tables");

        // empty store degrades to the catalog; unknown role degrades to
        // the configured default team rate
        let rates = app.state.cache.snapshot();
        let result = app
            .state
            .quoter
            .price(
                &PricingRequest {
                    mode: PricingMode::Team,
                    role: "Unknown Role".to_string(),
                    region: None,
                    seniority: None,
                    workload: Some("full-time".to_string()),
                    duration: Some("4-plus".to_string()),
                    display_currency: "AED".to_string(),
                },
                &rates,
            )
            .await;

        assert_eq!(
            result.base_monthly_amount,
            Decimal::new(850, 0),
            "pricing checkpoint should produce the reference amount"
        );

        app.db_pool.close().await;
    }
}
