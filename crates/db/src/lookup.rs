use async_trait::async_trait;
use rust_decimal::Decimal;
use tracing::warn;

use ratecard_core::catalog;
use ratecard_core::domain::rate::{RateData, Seniority};
use ratecard_core::lookup::RateLookup;
use ratecard_core::pricing::PricingDefaults;

use crate::repositories::RateRepository;

/// Rate lookup over a backing store with the static catalog behind it.
///
/// Pricing must never hard-fail on a missing or broken store, so every
/// store error is swallowed here, logged, and answered from the fallback
/// catalog. The one deliberate exception: a *populated* store that has
/// no entry for a custom combination answers `None`. That is a real
/// lookup miss, and guessing a number for it would misquote.
pub struct StoreRateLookup<R> {
    repository: R,
    defaults: PricingDefaults,
}

impl<R: RateRepository> StoreRateLookup<R> {
    pub fn new(repository: R, defaults: PricingDefaults) -> Self {
        Self { repository, defaults }
    }

    /// Empty and unreachable look the same from the pricing path: both
    /// mean "serve the catalog".
    async fn store_is_usable(&self) -> bool {
        match self.repository.distinct_roles().await {
            Ok(roles) => !roles.is_empty(),
            Err(error) => {
                warn!(error = %error, "rate store unavailable, treating as empty");
                false
            }
        }
    }

    fn fallback_team_base_rate(&self, role: &str) -> Decimal {
        catalog::team_base_rate(role)
            .filter(|rate| rate.is_sign_positive() && !rate.is_zero())
            .unwrap_or(self.defaults.fallback_team_base_rate)
    }
}

#[async_trait]
impl<R: RateRepository> RateLookup for StoreRateLookup<R> {
    async fn team_base_rate(&self, role: &str) -> Decimal {
        let stored = self
            .repository
            .find_rate(role, &self.defaults.team_region, self.defaults.team_seniority)
            .await;

        match stored {
            Ok(Some(entry))
                if entry.base_rate.is_sign_positive() && !entry.base_rate.is_zero() =>
            {
                entry.base_rate
            }
            Ok(Some(entry)) => {
                warn!(role, base_rate = %entry.base_rate, "stored team base rate unusable, using fallback");
                self.fallback_team_base_rate(role)
            }
            Ok(None) => self.fallback_team_base_rate(role),
            Err(error) => {
                warn!(role, error = %error, "team base rate lookup failed, using fallback");
                self.fallback_team_base_rate(role)
            }
        }
    }

    async fn custom_rate_data(
        &self,
        role: &str,
        region: &str,
        seniority: Seniority,
    ) -> Option<RateData> {
        match self.repository.find_rate(role, region, seniority).await {
            Ok(Some(entry)) => Some(entry.data()),
            Ok(None) => {
                if self.store_is_usable().await {
                    // populated store, genuinely no entry for this key
                    None
                } else {
                    catalog::rate_data(role, region, seniority)
                }
            }
            Err(error) => {
                warn!(role, region, seniority = %seniority, error = %error, "custom rate lookup failed, using catalog");
                catalog::rate_data(role, region, seniority)
            }
        }
    }

    async fn roles(&self) -> Vec<String> {
        match self.repository.distinct_roles().await {
            Ok(roles) if !roles.is_empty() => roles,
            Ok(_) => catalog::roles(),
            Err(error) => {
                warn!(error = %error, "role listing failed, using catalog");
                catalog::roles()
            }
        }
    }

    async fn regions(&self) -> Vec<String> {
        match self.repository.distinct_regions().await {
            Ok(regions) if !regions.is_empty() => regions,
            Ok(_) => catalog::regions(),
            Err(error) => {
                warn!(error = %error, "region listing failed, using catalog");
                catalog::regions()
            }
        }
    }

    async fn seniority_levels(&self) -> Vec<String> {
        match self.repository.distinct_seniority_levels().await {
            Ok(levels) if !levels.is_empty() => levels,
            Ok(_) => catalog::seniority_levels(),
            Err(error) => {
                warn!(error = %error, "seniority listing failed, using catalog");
                catalog::seniority_levels()
            }
        }
    }
}
