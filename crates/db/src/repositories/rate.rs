use std::str::FromStr;

use rust_decimal::Decimal;
use sqlx::Row;

use ratecard_core::domain::rate::{RateEntry, Seniority};

use super::{RateRepository, RepositoryError};
use crate::DbPool;

pub struct SqlRateRepository {
    pool: DbPool,
}

impl SqlRateRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    fn parse_decimal(field: &str, value: &str) -> Result<Decimal, RepositoryError> {
        Decimal::from_str(value).map_err(|error| {
            RepositoryError::Decode(format!("column `{field}` holds `{value}`: {error}"))
        })
    }

    fn entry_from_row(row: &sqlx::sqlite::SqliteRow) -> Result<RateEntry, RepositoryError> {
        let seniority_text: String = row.get("seniority");
        let base_rate_text: String = row.get("base_rate");
        let regional_multiplier_text: String = row.get("regional_multiplier");
        let seniority_multiplier_text: String = row.get("seniority_multiplier");

        Ok(RateEntry {
            role: row.get("role"),
            region: row.get("region"),
            seniority: Seniority::from_str(&seniority_text)
                .map_err(|error| RepositoryError::Decode(error.to_string()))?,
            base_rate: Self::parse_decimal("base_rate", &base_rate_text)?,
            regional_multiplier: Self::parse_decimal(
                "regional_multiplier",
                &regional_multiplier_text,
            )?,
            seniority_multiplier: Self::parse_decimal(
                "seniority_multiplier",
                &seniority_multiplier_text,
            )?,
        })
    }
}

#[async_trait::async_trait]
impl RateRepository for SqlRateRepository {
    async fn find_rate(
        &self,
        role: &str,
        region: &str,
        seniority: Seniority,
    ) -> Result<Option<RateEntry>, RepositoryError> {
        let row = sqlx::query(
            "SELECT role, region, seniority, base_rate, regional_multiplier, seniority_multiplier \
             FROM rates WHERE role = ? AND region = ? AND seniority = ?",
        )
        .bind(role)
        .bind(region)
        .bind(seniority.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.map(|row| Self::entry_from_row(&row)).transpose()
    }

    async fn list_rates(&self) -> Result<Vec<RateEntry>, RepositoryError> {
        let rows = sqlx::query(
            "SELECT role, region, seniority, base_rate, regional_multiplier, seniority_multiplier \
             FROM rates ORDER BY role, region, seniority",
        )
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(Self::entry_from_row).collect()
    }

    async fn distinct_roles(&self) -> Result<Vec<String>, RepositoryError> {
        let rows = sqlx::query("SELECT DISTINCT role FROM rates ORDER BY role")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.iter().map(|row| row.get("role")).collect())
    }

    async fn distinct_regions(&self) -> Result<Vec<String>, RepositoryError> {
        let rows = sqlx::query("SELECT DISTINCT region FROM rates ORDER BY region")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.iter().map(|row| row.get("region")).collect())
    }

    async fn distinct_seniority_levels(&self) -> Result<Vec<String>, RepositoryError> {
        let rows = sqlx::query("SELECT DISTINCT seniority FROM rates ORDER BY seniority")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.iter().map(|row| row.get("seniority")).collect())
    }

    async fn upsert_rate(&self, entry: RateEntry) -> Result<(), RepositoryError> {
        sqlx::query(
            "INSERT INTO rates (role, region, seniority, base_rate, regional_multiplier, seniority_multiplier) \
             VALUES (?, ?, ?, ?, ?, ?) \
             ON CONFLICT (role, region, seniority) DO UPDATE SET \
                 base_rate = excluded.base_rate, \
                 regional_multiplier = excluded.regional_multiplier, \
                 seniority_multiplier = excluded.seniority_multiplier, \
                 updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')",
        )
        .bind(&entry.role)
        .bind(&entry.region)
        .bind(entry.seniority.as_str())
        .bind(entry.base_rate.to_string())
        .bind(entry.regional_multiplier.to_string())
        .bind(entry.seniority_multiplier.to_string())
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use ratecard_core::domain::rate::{RateEntry, Seniority};

    use crate::repositories::{RateRepository, SqlRateRepository};
    use crate::{connect_with_settings, migrations};

    async fn repo() -> SqlRateRepository {
        let pool = connect_with_settings("sqlite::memory:", 1, 30).await.expect("connect");
        migrations::run_pending(&pool).await.expect("migrations");
        SqlRateRepository::new(pool)
    }

    fn entry(role: &str, region: &str, seniority: Seniority, base_rate: i64) -> RateEntry {
        RateEntry {
            role: role.to_string(),
            region: region.to_string(),
            seniority,
            base_rate: Decimal::new(base_rate, 0),
            regional_multiplier: Decimal::new(115, 2),
            seniority_multiplier: Decimal::new(125, 2),
        }
    }

    #[tokio::test]
    async fn upsert_then_find_round_trips_decimals() {
        let repo = repo().await;
        repo.upsert_rate(entry("Backend Developer", "Middle East", Seniority::Advanced, 9500))
            .await
            .expect("upsert");

        let found = repo
            .find_rate("Backend Developer", "Middle East", Seniority::Advanced)
            .await
            .expect("find")
            .expect("entry present");

        assert_eq!(found.base_rate, Decimal::new(9500, 0));
        assert_eq!(found.regional_multiplier, Decimal::new(115, 2));
        assert_eq!(found.seniority_multiplier, Decimal::new(125, 2));
    }

    #[tokio::test]
    async fn find_returns_none_for_missing_key() {
        let repo = repo().await;
        let found = repo
            .find_rate("Backend Developer", "Europe", Seniority::Expert)
            .await
            .expect("find");
        assert!(found.is_none());
    }

    #[tokio::test]
    async fn upsert_replaces_the_existing_key() {
        let repo = repo().await;
        repo.upsert_rate(entry("Product Owner", "Europe", Seniority::Expert, 12_000))
            .await
            .expect("insert");
        repo.upsert_rate(entry("Product Owner", "Europe", Seniority::Expert, 13_000))
            .await
            .expect("update");

        let all = repo.list_rates().await.expect("list");
        assert_eq!(all.len(), 1, "upsert must not create a second row for the same key");
        assert_eq!(all[0].base_rate, Decimal::new(13_000, 0));
    }

    #[tokio::test]
    async fn distinct_listings_are_sorted_and_deduplicated() {
        let repo = repo().await;
        for (role, region) in [
            ("Frontend Developer", "Europe"),
            ("Backend Developer", "Europe"),
            ("Backend Developer", "Euro Asia"),
        ] {
            repo.upsert_rate(entry(role, region, Seniority::Intermediate, 9000))
                .await
                .expect("upsert");
        }

        let roles = repo.distinct_roles().await.expect("roles");
        assert_eq!(roles, vec!["Backend Developer", "Frontend Developer"]);

        let regions = repo.distinct_regions().await.expect("regions");
        assert_eq!(regions, vec!["Euro Asia", "Europe"]);

        let levels = repo.distinct_seniority_levels().await.expect("levels");
        assert_eq!(levels, vec!["intermediate"]);
    }
}
