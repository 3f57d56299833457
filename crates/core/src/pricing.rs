//! The quote pricing engine.
//!
//! Two calculators share one shape: resolve a base monthly amount in the
//! base currency, walk a multiplier chain, then convert for display.
//! The engine is stateless; every call takes the request and an
//! exchange-rate snapshot as values, so a concurrent table refresh can
//! never tear a computation.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::currency::{self, ExchangeRateTable, BASE_CURRENCY};
use crate::domain::quote::{PricingMode, PricingRequest, RateParameters};
use crate::domain::rate::{RateData, Seniority};
use crate::lookup::RateLookup;

/// A workload selection: fraction of a full-time month.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct WorkloadOption {
    pub id: &'static str,
    pub label: &'static str,
    pub percentage: Decimal,
    pub display: &'static str,
}

/// A commitment-length selection and the discount it earns.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DurationOption {
    pub id: &'static str,
    pub label: &'static str,
    pub discount: Decimal,
    pub display: &'static str,
}

pub fn workload_options() -> Vec<WorkloadOption> {
    vec![
        WorkloadOption { id: "2-days", label: "2 days / week", percentage: Decimal::new(40, 2), display: "40.0%" },
        WorkloadOption { id: "3-days", label: "3 days / week", percentage: Decimal::new(60, 2), display: "60.0%" },
        WorkloadOption { id: "4-days", label: "4 days / week", percentage: Decimal::new(80, 2), display: "80.0%" },
        WorkloadOption { id: "full-time", label: "Full-time", percentage: Decimal::ONE, display: "100.0%" },
    ]
}

pub fn duration_options() -> Vec<DurationOption> {
    vec![
        DurationOption { id: "1-month", label: "1 month", discount: Decimal::ZERO, display: "" },
        DurationOption { id: "2-months", label: "2 months", discount: Decimal::new(5, 2), display: "-5.0%" },
        DurationOption { id: "3-months", label: "3 months", discount: Decimal::new(10, 2), display: "-10.0%" },
        DurationOption { id: "4-plus", label: "4+ months", discount: Decimal::new(15, 2), display: "-15.0%" },
    ]
}

/// Unknown or missing ids price as full-time, the neutral multiplier.
pub fn workload_option(id: Option<&str>) -> WorkloadOption {
    let id = id.unwrap_or("full-time");
    workload_options()
        .into_iter()
        .find(|option| option.id == id)
        .unwrap_or_else(|| workload_options().pop().expect("full-time option"))
}

/// Unknown or missing ids price as a single month with no discount.
pub fn duration_option(id: Option<&str>) -> DurationOption {
    let id = id.unwrap_or("1-month");
    duration_options()
        .into_iter()
        .find(|option| option.id == id)
        .unwrap_or_else(|| duration_options().remove(0))
}

/// The business constants team pricing runs on. All of them live in one
/// place; the fallback amount in particular is referenced from every
/// call site through here, never duplicated.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricingDefaults {
    /// Last-resort team base rate when a role has no usable stored rate.
    pub fallback_team_base_rate: Decimal,
    /// Teams are always quoted at the advanced tier.
    pub team_seniority_multiplier: Decimal,
    /// Pre-negotiated team discount applied after all other modifiers.
    pub team_discount: Decimal,
    pub team_region: String,
    pub team_seniority: Seniority,
}

impl Default for PricingDefaults {
    fn default() -> Self {
        Self {
            fallback_team_base_rate: Decimal::new(1000, 0),
            team_seniority_multiplier: Decimal::new(125, 2),
            team_discount: Decimal::new(20, 2),
            team_region: "Middle East".to_string(),
            team_seniority: Seniority::Advanced,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricingTraceStep {
    pub stage: String,
    pub detail: String,
    pub amount: Decimal,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricingTrace {
    pub mode: PricingMode,
    pub currency: String,
    pub steps: Vec<PricingTraceStep>,
}

/// One computed price: the base-unit amount, its display conversion, and
/// the effective parameters that produced it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PricingResult {
    pub mode: PricingMode,
    pub base_monthly_amount: Decimal,
    pub display_amount: Decimal,
    pub display_currency: String,
    pub display_currency_formatted: String,
    pub parameters: RateParameters,
    pub trace: PricingTrace,
}

/// Team pricing: fixed advanced tier, workload fraction, duration
/// discount, then the pre-negotiated team discount. A non-positive base
/// substitutes the configured fallback so a selected role always yields
/// a positive price.
pub fn team_monthly_amount(
    base: Decimal,
    workload: &WorkloadOption,
    duration: &DurationOption,
    defaults: &PricingDefaults,
) -> (Decimal, Vec<PricingTraceStep>) {
    let valid_base = if base.is_sign_positive() && !base.is_zero() {
        base
    } else {
        defaults.fallback_team_base_rate
    };

    let after_seniority = valid_base * defaults.team_seniority_multiplier;
    let after_workload = after_seniority * workload.percentage;
    let after_duration = after_workload * (Decimal::ONE - duration.discount);
    let final_amount = after_duration * (Decimal::ONE - defaults.team_discount);

    let steps = vec![
        PricingTraceStep {
            stage: "base".to_string(),
            detail: if valid_base == base {
                "stored base rate".to_string()
            } else {
                "fallback base rate substituted".to_string()
            },
            amount: valid_base,
        },
        PricingTraceStep {
            stage: "seniority".to_string(),
            detail: format!("x {} ({} tier)", defaults.team_seniority_multiplier, defaults.team_seniority),
            amount: after_seniority,
        },
        PricingTraceStep {
            stage: "workload".to_string(),
            detail: format!("x {} ({})", workload.percentage, workload.label),
            amount: after_workload,
        },
        PricingTraceStep {
            stage: "duration".to_string(),
            detail: format!("x (1 - {}) ({})", duration.discount, duration.label),
            amount: after_duration,
        },
        PricingTraceStep {
            stage: "team_discount".to_string(),
            detail: format!("x (1 - {})", defaults.team_discount),
            amount: final_amount,
        },
    ];

    (final_amount, steps)
}

/// Custom-resource pricing: straight multiplier product, no discounts.
/// An absent entry prices at zero, never a guessed number.
pub fn custom_monthly_amount(data: Option<&RateData>) -> (Decimal, Vec<PricingTraceStep>) {
    match data {
        None => (
            Decimal::ZERO,
            vec![PricingTraceStep {
                stage: "lookup".to_string(),
                detail: "no matching rate entry".to_string(),
                amount: Decimal::ZERO,
            }],
        ),
        Some(data) => {
            let after_regional = data.base_rate * data.regional_multiplier;
            let final_amount = after_regional * data.seniority_multiplier;
            let steps = vec![
                PricingTraceStep {
                    stage: "base".to_string(),
                    detail: "stored base rate".to_string(),
                    amount: data.base_rate,
                },
                PricingTraceStep {
                    stage: "region".to_string(),
                    detail: format!("x {}", data.regional_multiplier),
                    amount: after_regional,
                },
                PricingTraceStep {
                    stage: "seniority".to_string(),
                    detail: format!("x {}", data.seniority_multiplier),
                    amount: final_amount,
                },
            ];
            (final_amount, steps)
        }
    }
}

/// The pricing engine: a lookup plus the business constants. Stateless
/// per call; callers pass whichever rate-table snapshot is current.
#[derive(Clone, Debug)]
pub struct RateQuoter<L> {
    lookup: L,
    defaults: PricingDefaults,
}

impl<L: RateLookup> RateQuoter<L> {
    pub fn new(lookup: L, defaults: PricingDefaults) -> Self {
        Self { lookup, defaults }
    }

    pub fn defaults(&self) -> &PricingDefaults {
        &self.defaults
    }

    pub async fn price(&self, request: &PricingRequest, rates: &ExchangeRateTable) -> PricingResult {
        let (base_monthly_amount, mut steps, parameters) = match request.mode {
            PricingMode::Team => self.price_team(request).await,
            PricingMode::Custom => self.price_custom(request).await,
        };

        let display_amount =
            currency::convert(base_monthly_amount, BASE_CURRENCY, &request.display_currency, rates);
        steps.push(PricingTraceStep {
            stage: "display_conversion".to_string(),
            detail: currency::exchange_rate_display(BASE_CURRENCY, &request.display_currency, rates),
            amount: display_amount,
        });

        PricingResult {
            mode: request.mode,
            base_monthly_amount,
            display_amount,
            display_currency: request.display_currency.clone(),
            display_currency_formatted: currency::format_amount(
                display_amount,
                &request.display_currency,
            ),
            parameters,
            trace: PricingTrace {
                mode: request.mode,
                currency: request.display_currency.clone(),
                steps,
            },
        }
    }

    async fn price_team(
        &self,
        request: &PricingRequest,
    ) -> (Decimal, Vec<PricingTraceStep>, RateParameters) {
        let workload = workload_option(request.workload.as_deref());
        let duration = duration_option(request.duration.as_deref());
        let base = self.lookup.team_base_rate(&request.role).await;
        let (amount, steps) = team_monthly_amount(base, &workload, &duration, &self.defaults);

        // Caller-supplied region/seniority are ignored on purpose: the
        // team tier is a fixed offering.
        let parameters = RateParameters {
            role: request.role.clone(),
            region: self.defaults.team_region.clone(),
            seniority: self.defaults.team_seniority.to_string(),
            workload: workload.label.to_string(),
            duration: duration.label.to_string(),
            currency: request.display_currency.clone(),
        };

        (amount, steps, parameters)
    }

    async fn price_custom(
        &self,
        request: &PricingRequest,
    ) -> (Decimal, Vec<PricingTraceStep>, RateParameters) {
        let data = match (&request.region, request.seniority) {
            (Some(region), Some(seniority)) => {
                self.lookup.custom_rate_data(&request.role, region, seniority).await
            }
            _ => None,
        };
        let (amount, steps) = custom_monthly_amount(data.as_ref());

        let parameters = RateParameters {
            role: request.role.clone(),
            region: request.region.clone().unwrap_or_default(),
            seniority: request
                .seniority
                .map(|seniority| seniority.to_string())
                .unwrap_or_default(),
            // display-only labels: custom resources are quoted full-time
            // for one month, with no multiplier applied for either
            workload: "Full-time".to_string(),
            duration: "1 month".to_string(),
            currency: request.display_currency.clone(),
        };

        (amount, steps, parameters)
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use crate::currency::fallback_table;
    use crate::domain::quote::{PricingMode, PricingRequest};
    use crate::domain::rate::{RateData, Seniority};
    use crate::lookup::CatalogRateLookup;

    use super::{
        custom_monthly_amount, duration_option, duration_options, team_monthly_amount,
        workload_option, workload_options, PricingDefaults, RateQuoter,
    };

    fn defaults() -> PricingDefaults {
        PricingDefaults::default()
    }

    fn quoter() -> RateQuoter<CatalogRateLookup> {
        let defaults = defaults();
        RateQuoter::new(CatalogRateLookup::new(defaults.fallback_team_base_rate), defaults)
    }

    fn team_request(currency: &str, workload: &str, duration: &str) -> PricingRequest {
        PricingRequest {
            mode: PricingMode::Team,
            role: "Database Developer".to_string(),
            region: None,
            seniority: None,
            workload: Some(workload.to_string()),
            duration: Some(duration.to_string()),
            display_currency: currency.to_string(),
        }
    }

    #[test]
    fn team_reference_computation() {
        // 1000 * 1.25 * 1.0 * 0.85 * 0.80 = 850
        let (amount, steps) = team_monthly_amount(
            Decimal::new(1000, 0),
            &workload_option(Some("full-time")),
            &duration_option(Some("4-plus")),
            &defaults(),
        );

        assert_eq!(amount, Decimal::new(850, 0));
        assert_eq!(steps.len(), 5);
        assert_eq!(steps.last().expect("final step").amount, amount);
    }

    #[test]
    fn team_price_is_monotone_in_workload_and_duration() {
        let defaults = defaults();
        let base = Decimal::new(9500, 0);

        let mut previous = Decimal::MIN;
        for workload in workload_options() {
            let (amount, _) = team_monthly_amount(
                base,
                &workload,
                &duration_option(Some("1-month")),
                &defaults,
            );
            assert!(amount >= previous, "workload increase must not lower the price");
            previous = amount;
        }

        let mut previous = Decimal::MAX;
        for duration in duration_options() {
            let (amount, _) = team_monthly_amount(
                base,
                &workload_option(Some("full-time")),
                &duration,
                &defaults,
            );
            assert!(amount <= previous, "longer commitment must not raise the price");
            previous = amount;
        }
    }

    #[test]
    fn non_positive_base_substitutes_the_fallback() {
        for bad_base in [Decimal::ZERO, Decimal::new(-500, 0)] {
            let (amount, steps) = team_monthly_amount(
                bad_base,
                &workload_option(Some("full-time")),
                &duration_option(Some("1-month")),
                &defaults(),
            );
            // 1000 * 1.25 * 0.8
            assert_eq!(amount, Decimal::new(1000, 0));
            assert!(steps[0].detail.contains("fallback"));
        }
    }

    #[test]
    fn unknown_option_ids_price_neutrally() {
        assert_eq!(workload_option(Some("9-days")).percentage, Decimal::ONE);
        assert_eq!(duration_option(Some("forever")).discount, Decimal::ZERO);
        assert_eq!(workload_option(None).id, "full-time");
        assert_eq!(duration_option(None).id, "1-month");
    }

    #[test]
    fn custom_reference_computation() {
        let data = RateData {
            base_rate: Decimal::new(8000, 0),
            regional_multiplier: Decimal::new(115, 2),
            seniority_multiplier: Decimal::ONE,
        };
        let (amount, _) = custom_monthly_amount(Some(&data));
        assert_eq!(amount, Decimal::new(9200, 0));
    }

    #[test]
    fn absent_custom_entry_prices_at_zero() {
        let (amount, steps) = custom_monthly_amount(None);
        assert_eq!(amount, Decimal::ZERO);
        assert_eq!(steps.len(), 1);
        assert!(steps[0].detail.contains("no matching"));
    }

    #[tokio::test]
    async fn quoter_prices_team_requests_end_to_end() {
        let result = quoter()
            .price(&team_request("AED", "full-time", "1-month"), &fallback_table())
            .await;

        // 8000 * 1.25 * 1.0 * 1.0 * 0.80
        assert_eq!(result.base_monthly_amount, Decimal::new(8000, 0));
        assert_eq!(result.display_amount, Decimal::new(8000, 0));
        assert_eq!(result.parameters.region, "Middle East");
        assert_eq!(result.parameters.seniority, "advanced");
        assert!(result.display_currency_formatted.contains("8,000.00"));
    }

    #[tokio::test]
    async fn quoter_converts_to_the_display_currency() {
        let result = quoter()
            .price(&team_request("USD", "full-time", "1-month"), &fallback_table())
            .await;

        assert_eq!(result.base_monthly_amount, Decimal::new(8000, 0));
        assert_eq!(result.display_amount, Decimal::new(2176, 0));
        assert!(result.display_currency_formatted.starts_with('$'));
        assert_eq!(
            result.trace.steps.last().expect("conversion step").stage,
            "display_conversion"
        );
    }

    #[tokio::test]
    async fn quoter_prices_custom_requests_and_misses() {
        let hit = quoter()
            .price(
                &PricingRequest {
                    mode: PricingMode::Custom,
                    role: "Database Developer".to_string(),
                    region: Some("Middle East".to_string()),
                    seniority: Some(Seniority::Intermediate),
                    workload: None,
                    duration: None,
                    display_currency: "AED".to_string(),
                },
                &fallback_table(),
            )
            .await;
        assert_eq!(hit.base_monthly_amount, Decimal::new(9200, 0));
        assert_eq!(hit.parameters.workload, "Full-time");

        let miss = quoter()
            .price(
                &PricingRequest {
                    mode: PricingMode::Custom,
                    role: "Database Developer".to_string(),
                    region: None,
                    seniority: Some(Seniority::Intermediate),
                    workload: None,
                    duration: None,
                    display_currency: "AED".to_string(),
                },
                &fallback_table(),
            )
            .await;
        assert_eq!(miss.base_monthly_amount, Decimal::ZERO);
    }
}
