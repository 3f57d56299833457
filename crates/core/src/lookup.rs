use async_trait::async_trait;
use rust_decimal::Decimal;

use crate::catalog;
use crate::domain::rate::{RateData, Seniority};

/// Resolves rate parameters to stored amounts and multipliers.
///
/// Implementations never surface store failures: `team_base_rate` always
/// returns a positive, displayable amount (last resort: the configured
/// default), while `custom_rate_data` returns `None` for a combination
/// that genuinely has no entry, so the caller shows zero, not a guess.
#[async_trait]
pub trait RateLookup: Send + Sync {
    async fn team_base_rate(&self, role: &str) -> Decimal;

    async fn custom_rate_data(
        &self,
        role: &str,
        region: &str,
        seniority: Seniority,
    ) -> Option<RateData>;

    async fn roles(&self) -> Vec<String>;
    async fn regions(&self) -> Vec<String>;
    async fn seniority_levels(&self) -> Vec<String>;
}

#[async_trait]
impl<L: RateLookup + ?Sized> RateLookup for std::sync::Arc<L> {
    async fn team_base_rate(&self, role: &str) -> Decimal {
        (**self).team_base_rate(role).await
    }

    async fn custom_rate_data(
        &self,
        role: &str,
        region: &str,
        seniority: Seniority,
    ) -> Option<RateData> {
        (**self).custom_rate_data(role, region, seniority).await
    }

    async fn roles(&self) -> Vec<String> {
        (**self).roles().await
    }

    async fn regions(&self) -> Vec<String> {
        (**self).regions().await
    }

    async fn seniority_levels(&self) -> Vec<String> {
        (**self).seniority_levels().await
    }
}

/// Lookup over the static fallback catalog only. Serves as the degraded
/// mode when no store is configured, and as the test double everywhere.
#[derive(Clone, Debug)]
pub struct CatalogRateLookup {
    fallback_team_base_rate: Decimal,
}

impl CatalogRateLookup {
    pub fn new(fallback_team_base_rate: Decimal) -> Self {
        Self { fallback_team_base_rate }
    }
}

#[async_trait]
impl RateLookup for CatalogRateLookup {
    async fn team_base_rate(&self, role: &str) -> Decimal {
        catalog::team_base_rate(role)
            .filter(|rate| rate.is_sign_positive() && !rate.is_zero())
            .unwrap_or(self.fallback_team_base_rate)
    }

    async fn custom_rate_data(
        &self,
        role: &str,
        region: &str,
        seniority: Seniority,
    ) -> Option<RateData> {
        catalog::rate_data(role, region, seniority)
    }

    async fn roles(&self) -> Vec<String> {
        catalog::roles()
    }

    async fn regions(&self) -> Vec<String> {
        catalog::regions()
    }

    async fn seniority_levels(&self) -> Vec<String> {
        catalog::seniority_levels()
    }
}
