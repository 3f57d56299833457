use sqlx::Row;

use ratecard_core::{catalog, currency};

use crate::connection::DbPool;
use crate::repositories::{
    ExchangeRateRepository, RateRepository, RepositoryError, SqlExchangeRateRepository,
    SqlRateRepository,
};

/// Deterministic seed dataset: the full fallback catalog plus the
/// hardcoded exchange-rate table. Loading is idempotent; every row is
/// an upsert against its unique key.
pub struct SeedDataset;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SeedResult {
    pub rates_seeded: usize,
    pub exchange_rates_seeded: usize,
}

#[derive(Clone, Debug)]
pub struct VerificationResult {
    pub all_present: bool,
    pub checks: Vec<(&'static str, bool)>,
}

impl SeedDataset {
    pub async fn load(pool: &DbPool) -> Result<SeedResult, RepositoryError> {
        let rates = SqlRateRepository::new(pool.clone());
        let entries = catalog::entries();
        for entry in &entries {
            rates.upsert_rate(entry.clone()).await?;
        }

        let exchange = SqlExchangeRateRepository::new(pool.clone());
        let table = currency::fallback_table();
        for currency in table.values() {
            exchange.upsert_exchange_rate(&currency.code, currency.rate).await?;
        }

        Ok(SeedResult { rates_seeded: entries.len(), exchange_rates_seeded: table.len() })
    }

    pub async fn verify(pool: &DbPool) -> Result<VerificationResult, RepositoryError> {
        let expected_rates = catalog::entries().len() as i64;
        let expected_roles = catalog::roles().len() as i64;
        let expected_exchange_rates = currency::fallback_table().len() as i64;

        let rate_count = count(pool, "SELECT COUNT(*) AS count FROM rates").await?;
        let role_count =
            count(pool, "SELECT COUNT(DISTINCT role) AS count FROM rates").await?;
        let exchange_count =
            count(pool, "SELECT COUNT(*) AS count FROM exchange_rates").await?;
        let base_unit_count = count(
            pool,
            "SELECT COUNT(*) AS count FROM exchange_rates \
             WHERE currency_code = 'AED' AND rate_to_base = '1.000'",
        )
        .await?;

        let checks = vec![
            ("rate-entries", rate_count >= expected_rates),
            ("distinct-roles", role_count >= expected_roles),
            ("exchange-rates", exchange_count >= expected_exchange_rates),
            ("base-unit-rate", base_unit_count == 1),
        ];
        let all_present = checks.iter().all(|(_, passed)| *passed);

        Ok(VerificationResult { all_present, checks })
    }
}

async fn count(pool: &DbPool, sql: &str) -> Result<i64, RepositoryError> {
    Ok(sqlx::query(sql).fetch_one(pool).await?.get::<i64, _>("count"))
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use ratecard_core::domain::rate::Seniority;

    use crate::repositories::{RateRepository, SqlRateRepository};
    use crate::{connect_with_settings, migrations, SeedDataset};

    async fn seeded_pool() -> crate::DbPool {
        let pool = connect_with_settings("sqlite::memory:", 1, 30).await.expect("connect");
        migrations::run_pending(&pool).await.expect("migrations");
        pool
    }

    #[tokio::test]
    async fn load_seeds_the_full_catalog() {
        let pool = seeded_pool().await;
        let result = SeedDataset::load(&pool).await.expect("seed");

        assert_eq!(result.rates_seeded, 72);
        assert_eq!(result.exchange_rates_seeded, 5);

        let verification = SeedDataset::verify(&pool).await.expect("verify");
        assert!(verification.all_present, "failed checks: {:?}", verification.checks);

        pool.close().await;
    }

    #[tokio::test]
    async fn load_is_idempotent() {
        let pool = seeded_pool().await;
        SeedDataset::load(&pool).await.expect("first seed");
        SeedDataset::load(&pool).await.expect("second seed");

        let verification = SeedDataset::verify(&pool).await.expect("verify");
        assert!(verification.all_present);

        let repo = SqlRateRepository::new(pool.clone());
        assert_eq!(repo.list_rates().await.expect("list").len(), 72);

        pool.close().await;
    }

    #[tokio::test]
    async fn verify_fails_on_an_unseeded_database() {
        let pool = seeded_pool().await;
        let verification = SeedDataset::verify(&pool).await.expect("verify");
        assert!(!verification.all_present);

        pool.close().await;
    }

    #[tokio::test]
    async fn seeded_rates_are_readable_through_the_repository() {
        let pool = seeded_pool().await;
        SeedDataset::load(&pool).await.expect("seed");

        let repo = SqlRateRepository::new(pool.clone());
        let entry = repo
            .find_rate("Database Developer", "Middle East", Seniority::Intermediate)
            .await
            .expect("find")
            .expect("present");

        assert_eq!(entry.base_rate, Decimal::new(8000, 0));
        assert_eq!(entry.regional_multiplier, Decimal::new(115, 2));

        pool.close().await;
    }
}
