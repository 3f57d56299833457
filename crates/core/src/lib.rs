pub mod cache;
pub mod catalog;
pub mod config;
pub mod currency;
pub mod domain;
pub mod errors;
pub mod lookup;
pub mod pricing;

pub use cache::{CacheRead, RateCache, DEFAULT_REFRESH_INTERVAL};
pub use currency::{
    convert, currency_info, exchange_rate_display, fallback_table, format_amount,
    known_currencies, Currency, CurrencyInfo, ExchangeRateTable, BASE_CURRENCY,
};
pub use domain::quote::{
    PricingMode, PricingRequest, QuoteContact, QuoteDelivery, RateParameters,
};
pub use domain::rate::{RateData, RateEntry, Seniority};
pub use errors::{ApplicationError, DomainError, InterfaceError};
pub use lookup::{CatalogRateLookup, RateLookup};
pub use pricing::{
    duration_option, duration_options, workload_option, workload_options, DurationOption,
    PricingDefaults, PricingResult, PricingTrace, PricingTraceStep, RateQuoter, WorkloadOption,
};
