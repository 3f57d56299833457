use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use thiserror::Error;

use ratecard_core::domain::rate::{RateEntry, Seniority};

pub mod exchange_rate;
pub mod memory;
pub mod rate;

pub use exchange_rate::SqlExchangeRateRepository;
pub use memory::{InMemoryExchangeRateRepository, InMemoryRateRepository};
pub use rate::SqlRateRepository;

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("decode error: {0}")]
    Decode(String),
}

/// Raw access to stored rate entries.
///
/// "No rows" is an `Ok` with an empty/absent value, distinct from an
/// error; callers decide what degradation looks like.
#[async_trait]
pub trait RateRepository: Send + Sync {
    async fn find_rate(
        &self,
        role: &str,
        region: &str,
        seniority: Seniority,
    ) -> Result<Option<RateEntry>, RepositoryError>;

    async fn list_rates(&self) -> Result<Vec<RateEntry>, RepositoryError>;

    async fn distinct_roles(&self) -> Result<Vec<String>, RepositoryError>;
    async fn distinct_regions(&self) -> Result<Vec<String>, RepositoryError>;
    async fn distinct_seniority_levels(&self) -> Result<Vec<String>, RepositoryError>;

    async fn upsert_rate(&self, entry: RateEntry) -> Result<(), RepositoryError>;
}

/// One persisted provider rate, units of currency per 1 AED.
#[derive(Clone, Debug, PartialEq)]
pub struct ExchangeRateRecord {
    pub currency_code: String,
    pub rate_to_base: Decimal,
    pub updated_at: DateTime<Utc>,
}

#[async_trait]
pub trait ExchangeRateRepository: Send + Sync {
    async fn list_exchange_rates(&self) -> Result<Vec<ExchangeRateRecord>, RepositoryError>;

    async fn upsert_exchange_rate(
        &self,
        currency_code: &str,
        rate_to_base: Decimal,
    ) -> Result<(), RepositoryError>;
}
