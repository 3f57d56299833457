use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::Row;

use super::{ExchangeRateRecord, ExchangeRateRepository, RepositoryError};
use crate::DbPool;

pub struct SqlExchangeRateRepository {
    pool: DbPool,
}

impl SqlExchangeRateRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl ExchangeRateRepository for SqlExchangeRateRepository {
    async fn list_exchange_rates(&self) -> Result<Vec<ExchangeRateRecord>, RepositoryError> {
        let rows = sqlx::query(
            "SELECT currency_code, rate_to_base, updated_at \
             FROM exchange_rates ORDER BY currency_code",
        )
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|row| {
                let rate_text: String = row.get("rate_to_base");
                let updated_at_text: String = row.get("updated_at");
                Ok(ExchangeRateRecord {
                    currency_code: row.get("currency_code"),
                    rate_to_base: Decimal::from_str(&rate_text).map_err(|error| {
                        RepositoryError::Decode(format!(
                            "column `rate_to_base` holds `{rate_text}`: {error}"
                        ))
                    })?,
                    updated_at: DateTime::parse_from_rfc3339(&updated_at_text)
                        .map(|parsed| parsed.with_timezone(&Utc))
                        .map_err(|error| {
                            RepositoryError::Decode(format!(
                                "column `updated_at` holds `{updated_at_text}`: {error}"
                            ))
                        })?,
                })
            })
            .collect()
    }

    async fn upsert_exchange_rate(
        &self,
        currency_code: &str,
        rate_to_base: Decimal,
    ) -> Result<(), RepositoryError> {
        sqlx::query(
            "INSERT INTO exchange_rates (currency_code, rate_to_base) VALUES (?, ?) \
             ON CONFLICT (currency_code) DO UPDATE SET \
                 rate_to_base = excluded.rate_to_base, \
                 updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')",
        )
        .bind(currency_code)
        .bind(rate_to_base.to_string())
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use crate::repositories::{ExchangeRateRepository, SqlExchangeRateRepository};
    use crate::{connect_with_settings, migrations};

    async fn repo() -> SqlExchangeRateRepository {
        let pool = connect_with_settings("sqlite::memory:", 1, 30).await.expect("connect");
        migrations::run_pending(&pool).await.expect("migrations");
        SqlExchangeRateRepository::new(pool)
    }

    #[tokio::test]
    async fn upsert_then_list_round_trips() {
        let repo = repo().await;
        repo.upsert_exchange_rate("USD", Decimal::new(272, 3)).await.expect("upsert");
        repo.upsert_exchange_rate("EUR", Decimal::new(25, 2)).await.expect("upsert");

        let rates = repo.list_exchange_rates().await.expect("list");
        assert_eq!(rates.len(), 2);
        assert_eq!(rates[0].currency_code, "EUR");
        assert_eq!(rates[1].currency_code, "USD");
        assert_eq!(rates[1].rate_to_base, Decimal::new(272, 3));
    }

    #[tokio::test]
    async fn upsert_overwrites_the_previous_rate() {
        let repo = repo().await;
        repo.upsert_exchange_rate("USD", Decimal::new(272, 3)).await.expect("insert");
        repo.upsert_exchange_rate("USD", Decimal::new(275, 3)).await.expect("update");

        let rates = repo.list_exchange_rates().await.expect("list");
        assert_eq!(rates.len(), 1);
        assert_eq!(rates[0].rate_to_base, Decimal::new(275, 3));
    }

    #[tokio::test]
    async fn empty_table_lists_no_rows() {
        let repo = repo().await;
        let rates = repo.list_exchange_rates().await.expect("list");
        assert!(rates.is_empty());
    }
}
