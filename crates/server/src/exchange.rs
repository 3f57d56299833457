//! Exchange-rate provider client and periodic refresh.
//!
//! Rates come from an ExchangeRate-API style endpoint
//! (`{base_url}/{api_key}/latest/AED`). Every failure mode (missing
//! key, network error, rejected request, malformed payload) degrades to
//! the cached or fallback table; the fetch is simply retried on the
//! next interval tick, with no in-attempt retry loop.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use reqwest::Client;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use tracing::{info, warn};

use ratecard_core::cache::RateCache;
use ratecard_core::config::ExchangeConfig;
use ratecard_core::currency::{
    currency_info, fallback_table, known_currencies, Currency, ExchangeRateTable, BASE_CURRENCY,
};
use ratecard_db::repositories::ExchangeRateRepository;

#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("no API key configured for the exchange-rate provider")]
    MissingApiKey,
    #[error("transport error: {0}")]
    Transport(String),
    #[error("provider returned status {0}")]
    Status(u16),
    #[error("unexpected provider payload: {0}")]
    Payload(String),
}

#[derive(Deserialize)]
struct ProviderPayload {
    result: String,
    #[serde(default)]
    error_type: Option<String>,
    #[serde(default)]
    conversion_rates: HashMap<String, f64>,
}

pub struct ExchangeRateProvider {
    client: Client,
    base_url: String,
    api_key: Option<SecretString>,
}

impl ExchangeRateProvider {
    pub fn from_config(config: &ExchangeConfig) -> Self {
        Self {
            client: Client::new(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        }
    }

    pub async fn fetch(&self) -> Result<ExchangeRateTable, ProviderError> {
        let api_key = self.api_key.as_ref().ok_or(ProviderError::MissingApiKey)?;
        let url = format!("{}/{}/latest/{}", self.base_url, api_key.expose_secret(), BASE_CURRENCY);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|error| ProviderError::Transport(error.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ProviderError::Status(status.as_u16()));
        }

        let payload = response
            .json::<ProviderPayload>()
            .await
            .map_err(|error| ProviderError::Payload(error.to_string()))?;

        if payload.result != "success" {
            return Err(ProviderError::Payload(
                payload.error_type.unwrap_or_else(|| "unknown provider error".to_string()),
            ));
        }

        let table = table_from_conversion_rates(&payload.conversion_rates);
        if table.len() <= 1 {
            return Err(ProviderError::Payload(
                "no usable conversion rates in provider response".to_string(),
            ));
        }

        Ok(table)
    }
}

/// Build a rate table from the provider's `conversion_rates` map.
///
/// Rates from a `latest/AED` request are already units of currency per
/// 1 AED, matching the table invariant, so they are stored as-is. Codes
/// without display conventions and non-positive or unrepresentable
/// values are dropped; the base unit is always present at exactly 1.0.
pub fn table_from_conversion_rates(rates: &HashMap<String, f64>) -> ExchangeRateTable {
    let flags: HashMap<String, String> = fallback_table()
        .into_values()
        .map(|currency| (currency.code.clone(), currency.flag))
        .collect();

    let mut table = ExchangeRateTable::new();
    for code in known_currencies() {
        let rate = if code == BASE_CURRENCY {
            Some(Decimal::ONE)
        } else {
            rates
                .get(code)
                .and_then(|raw| Decimal::try_from(*raw).ok())
                .filter(|rate| rate.is_sign_positive() && !rate.is_zero())
        };

        if let Some(rate) = rate {
            table.insert(
                code.to_string(),
                Currency {
                    code: code.to_string(),
                    rate,
                    symbol: currency_info(code)
                        .map(|info| info.symbol.to_string())
                        .unwrap_or_else(|| code.to_string()),
                    flag: flags.get(code).cloned().unwrap_or_default(),
                },
            );
        }
    }

    table
}

/// Pre-load the cache from the last persisted provider snapshot, dated
/// at the oldest persisted row so staleness errs toward refreshing.
pub async fn warm_from_store<R: ExchangeRateRepository>(cache: &RateCache, repository: &R) {
    let records = match repository.list_exchange_rates().await {
        Ok(records) if !records.is_empty() => records,
        Ok(_) => return,
        Err(error) => {
            warn!(error = %error, "could not warm exchange-rate cache from store");
            return;
        }
    };

    let fetched_at = records.iter().map(|record| record.updated_at).min().unwrap_or_else(Utc::now);
    let raw: HashMap<String, f64> = records
        .iter()
        .filter_map(|record| {
            record.rate_to_base.to_f64().map(|rate| (record.currency_code.clone(), rate))
        })
        .collect();

    let table = table_from_conversion_rates(&raw);
    if table.len() > 1 {
        info!(currencies = table.len(), "exchange-rate cache warmed from store");
        cache.refresh(table, fetched_at);
    }
}

/// One fetch attempt: refresh the cache and persist on success, keep the
/// previous snapshot on failure.
pub async fn refresh_once<R: ExchangeRateRepository>(
    provider: &ExchangeRateProvider,
    cache: &RateCache,
    repository: &R,
) -> bool {
    match provider.fetch().await {
        Ok(table) => {
            for currency in table.values() {
                if let Err(error) =
                    repository.upsert_exchange_rate(&currency.code, currency.rate).await
                {
                    warn!(code = %currency.code, error = %error, "could not persist exchange rate");
                }
            }
            info!(currencies = table.len(), "exchange rates refreshed");
            cache.refresh(table, Utc::now());
            true
        }
        Err(error) => {
            warn!(error = %error, "exchange-rate fetch failed, keeping cached table");
            false
        }
    }
}

/// Timer-driven refresh: ticks at the cache's interval and performs at
/// most one fetch per tick, skipping while the snapshot is still fresh.
pub async fn run_refresh_loop<R: ExchangeRateRepository>(
    provider: ExchangeRateProvider,
    cache: Arc<RateCache>,
    repository: Arc<R>,
) {
    let mut interval = tokio::time::interval(cache.refresh_interval());
    interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

    loop {
        interval.tick().await;
        if cache.is_stale(Utc::now()) {
            refresh_once(&provider, cache.as_ref(), repository.as_ref()).await;
        }
    }
}
