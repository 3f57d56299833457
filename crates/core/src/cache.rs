//! Exchange-rate snapshot cache.
//!
//! Owned by whichever component runs the periodic refresh timer and
//! passed explicitly to everything that converts currencies. Readers get
//! an `Arc` snapshot; a refresh replaces the whole table in one
//! assignment, so a snapshot taken mid-computation stays coherent and no
//! reader ever observes a partially updated table.

use std::sync::{Arc, RwLock};
use std::time::Duration;

use chrono::{DateTime, Utc};

use crate::currency::{fallback_table, ExchangeRateTable};

pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_secs(60 * 60);

/// A read of the cache: the current snapshot plus whether the owner is
/// due for a provider fetch.
#[derive(Clone, Debug)]
pub struct CacheRead {
    pub table: Arc<ExchangeRateTable>,
    pub stale: bool,
}

#[derive(Debug)]
struct CacheState {
    table: Arc<ExchangeRateTable>,
    fetched_at: Option<DateTime<Utc>>,
}

#[derive(Debug)]
pub struct RateCache {
    refresh_interval: Duration,
    state: RwLock<CacheState>,
}

impl RateCache {
    /// Starts on the hardcoded fallback table with no fetch recorded, so
    /// the first `get` reports stale and the owner fetches immediately.
    pub fn new(refresh_interval: Duration) -> Self {
        Self {
            refresh_interval,
            state: RwLock::new(CacheState {
                table: Arc::new(fallback_table()),
                fetched_at: None,
            }),
        }
    }

    pub fn refresh_interval(&self) -> Duration {
        self.refresh_interval
    }

    pub fn get(&self, now: DateTime<Utc>) -> CacheRead {
        let state = self.state.read().unwrap_or_else(|poisoned| poisoned.into_inner());
        CacheRead { table: Arc::clone(&state.table), stale: is_stale(&state, self.refresh_interval, now) }
    }

    /// The current snapshot without a staleness check.
    pub fn snapshot(&self) -> Arc<ExchangeRateTable> {
        let state = self.state.read().unwrap_or_else(|poisoned| poisoned.into_inner());
        Arc::clone(&state.table)
    }

    /// Replace the snapshot after a successful provider fetch.
    pub fn refresh(&self, table: ExchangeRateTable, now: DateTime<Utc>) {
        let mut state = self.state.write().unwrap_or_else(|poisoned| poisoned.into_inner());
        state.table = Arc::new(table);
        state.fetched_at = Some(now);
    }

    /// Staleness points at the last *successful* fetch: a failed attempt
    /// records nothing, so the next interval tick retries.
    pub fn is_stale(&self, now: DateTime<Utc>) -> bool {
        let state = self.state.read().unwrap_or_else(|poisoned| poisoned.into_inner());
        is_stale(&state, self.refresh_interval, now)
    }
}

impl Default for RateCache {
    fn default() -> Self {
        Self::new(DEFAULT_REFRESH_INTERVAL)
    }
}

fn is_stale(state: &CacheState, refresh_interval: Duration, now: DateTime<Utc>) -> bool {
    match state.fetched_at {
        None => true,
        Some(fetched_at) => {
            let age = now.signed_duration_since(fetched_at);
            age.to_std().map(|age| age > refresh_interval).unwrap_or(true)
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use chrono::{TimeDelta, Utc};
    use rust_decimal::Decimal;

    use crate::currency::{fallback_table, Currency};

    use super::RateCache;

    #[test]
    fn starts_stale_on_the_fallback_table() {
        let cache = RateCache::new(Duration::from_secs(3600));
        let read = cache.get(Utc::now());

        assert!(read.stale);
        assert!(read.table.contains_key("AED"));
        assert_eq!(read.table.get("AED").expect("base").rate, Decimal::ONE);
    }

    #[test]
    fn reads_within_the_interval_share_one_snapshot() {
        let cache = RateCache::new(Duration::from_secs(3600));
        let refreshed_at = Utc::now();
        cache.refresh(fallback_table(), refreshed_at);

        let first = cache.get(refreshed_at + TimeDelta::minutes(10));
        let second = cache.get(refreshed_at + TimeDelta::minutes(50));

        assert!(!first.stale);
        assert!(!second.stale);
        assert!(Arc::ptr_eq(&first.table, &second.table), "no new table within the interval");
    }

    #[test]
    fn read_after_the_interval_reports_stale_but_keeps_serving() {
        let cache = RateCache::new(Duration::from_secs(3600));
        let refreshed_at = Utc::now();
        cache.refresh(fallback_table(), refreshed_at);

        let read = cache.get(refreshed_at + TimeDelta::minutes(61));
        assert!(read.stale);
        assert!(read.table.contains_key("USD"), "stale cache still serves the last table");
    }

    #[test]
    fn refresh_replaces_the_snapshot_wholesale() {
        let cache = RateCache::new(Duration::from_secs(3600));
        let before = cache.snapshot();

        let mut table = fallback_table();
        table.insert(
            "USD".to_string(),
            Currency {
                code: "USD".to_string(),
                rate: Decimal::new(275, 3),
                symbol: "$".to_string(),
                flag: String::new(),
            },
        );
        cache.refresh(table, Utc::now());

        let after = cache.snapshot();
        assert!(!Arc::ptr_eq(&before, &after));
        assert_eq!(after.get("USD").expect("usd").rate, Decimal::new(275, 3));
        // the earlier snapshot is untouched by the replacement
        assert_eq!(before.get("USD").expect("usd").rate, Decimal::new(272, 3));
    }
}
