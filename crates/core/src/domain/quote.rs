use serde::{Deserialize, Serialize};

use crate::domain::rate::Seniority;

/// Which calculator produced a price.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PricingMode {
    Team,
    Custom,
}

/// Input to one pricing computation.
///
/// Team mode forces region and seniority to the configured team tier
/// (Middle East / advanced) regardless of what the caller sends; custom
/// mode requires all three key fields. Workload and duration ids are
/// only priced in team mode; custom resources carry the "full-time /
/// 1 month" labels for display without any multiplier applied.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PricingRequest {
    pub mode: PricingMode,
    pub role: String,
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default)]
    pub seniority: Option<Seniority>,
    #[serde(default)]
    pub workload: Option<String>,
    #[serde(default)]
    pub duration: Option<String>,
    pub display_currency: String,
}

/// The effective parameter set a price was computed from, echoed back to
/// callers and forwarded verbatim to delivery collaborators.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateParameters {
    pub role: String,
    pub region: String,
    pub seniority: String,
    pub workload: String,
    pub duration: String,
    pub currency: String,
}

/// Contact details attached to an outgoing quote.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuoteContact {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Payload handed to delivery collaborators (email, PDF export).
///
/// Rates cross this boundary as pre-formatted display strings, never raw
/// numbers, so delivery templates need no knowledge of currency rules.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuoteDelivery {
    pub team_rate: String,
    pub custom_rate: String,
    pub team_parameters: RateParameters,
    pub custom_parameters: RateParameters,
}

impl QuoteContact {
    /// Minimal sanity check on the recipient address: one `@`, with a
    /// dot somewhere in the domain part. Full RFC validation is the
    /// transport's job.
    pub fn has_plausible_email(&self) -> bool {
        let mut parts = self.email.split('@');
        match (parts.next(), parts.next(), parts.next()) {
            (Some(local), Some(domain), None) => {
                !local.is_empty()
                    && domain.contains('.')
                    && !domain.starts_with('.')
                    && !domain.ends_with('.')
            }
            _ => false,
        }
    }
}
