use chrono::Utc;
use rust_decimal::Decimal;
use tokio::sync::RwLock;

use ratecard_core::domain::rate::{RateEntry, Seniority};

use super::{
    ExchangeRateRecord, ExchangeRateRepository, RateRepository, RepositoryError,
};

/// Rate store backed by a `Vec`, for tests and ephemeral setups.
#[derive(Default)]
pub struct InMemoryRateRepository {
    entries: RwLock<Vec<RateEntry>>,
}

impl InMemoryRateRepository {
    pub fn with_entries(entries: Vec<RateEntry>) -> Self {
        Self { entries: RwLock::new(entries) }
    }
}

#[async_trait::async_trait]
impl RateRepository for InMemoryRateRepository {
    async fn find_rate(
        &self,
        role: &str,
        region: &str,
        seniority: Seniority,
    ) -> Result<Option<RateEntry>, RepositoryError> {
        let entries = self.entries.read().await;
        Ok(entries
            .iter()
            .find(|entry| entry.key() == (role, region, seniority))
            .cloned())
    }

    async fn list_rates(&self) -> Result<Vec<RateEntry>, RepositoryError> {
        let entries = self.entries.read().await;
        Ok(entries.clone())
    }

    async fn distinct_roles(&self) -> Result<Vec<String>, RepositoryError> {
        let entries = self.entries.read().await;
        Ok(distinct(entries.iter().map(|entry| entry.role.clone())))
    }

    async fn distinct_regions(&self) -> Result<Vec<String>, RepositoryError> {
        let entries = self.entries.read().await;
        Ok(distinct(entries.iter().map(|entry| entry.region.clone())))
    }

    async fn distinct_seniority_levels(&self) -> Result<Vec<String>, RepositoryError> {
        let entries = self.entries.read().await;
        Ok(distinct(entries.iter().map(|entry| entry.seniority.to_string())))
    }

    async fn upsert_rate(&self, entry: RateEntry) -> Result<(), RepositoryError> {
        let mut entries = self.entries.write().await;
        let key = (entry.role.clone(), entry.region.clone(), entry.seniority);
        match entries
            .iter_mut()
            .find(|existing| existing.key() == (key.0.as_str(), key.1.as_str(), key.2))
        {
            Some(existing) => *existing = entry,
            None => entries.push(entry),
        }
        Ok(())
    }
}

fn distinct(values: impl Iterator<Item = String>) -> Vec<String> {
    let mut values: Vec<String> = values.collect();
    values.sort();
    values.dedup();
    values
}

/// Exchange-rate store backed by a `Vec`, for tests.
#[derive(Default)]
pub struct InMemoryExchangeRateRepository {
    records: RwLock<Vec<ExchangeRateRecord>>,
}

#[async_trait::async_trait]
impl ExchangeRateRepository for InMemoryExchangeRateRepository {
    async fn list_exchange_rates(&self) -> Result<Vec<ExchangeRateRecord>, RepositoryError> {
        let records = self.records.read().await;
        Ok(records.clone())
    }

    async fn upsert_exchange_rate(
        &self,
        currency_code: &str,
        rate_to_base: Decimal,
    ) -> Result<(), RepositoryError> {
        let mut records = self.records.write().await;
        match records.iter_mut().find(|record| record.currency_code == currency_code) {
            Some(record) => {
                record.rate_to_base = rate_to_base;
                record.updated_at = Utc::now();
            }
            None => records.push(ExchangeRateRecord {
                currency_code: currency_code.to_string(),
                rate_to_base,
                updated_at: Utc::now(),
            }),
        }
        Ok(())
    }
}
