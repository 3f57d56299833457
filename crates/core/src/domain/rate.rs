use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::errors::DomainError;

/// Seniority tiers a rate can be quoted at. Stored lowercase.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Seniority {
    Intermediate,
    Advanced,
    Expert,
}

impl Seniority {
    pub const ALL: [Seniority; 3] =
        [Seniority::Intermediate, Seniority::Advanced, Seniority::Expert];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Intermediate => "intermediate",
            Self::Advanced => "advanced",
            Self::Expert => "expert",
        }
    }
}

impl std::fmt::Display for Seniority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Seniority {
    type Err = DomainError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "intermediate" => Ok(Self::Intermediate),
            "advanced" => Ok(Self::Advanced),
            "expert" => Ok(Self::Expert),
            other => Err(DomainError::UnknownSeniority(other.to_string())),
        }
    }
}

/// One priced offering. At most one entry exists per
/// (role, region, seniority) key; entries are read-only at pricing time.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RateEntry {
    pub role: String,
    pub region: String,
    pub seniority: Seniority,
    pub base_rate: Decimal,
    pub regional_multiplier: Decimal,
    pub seniority_multiplier: Decimal,
}

impl RateEntry {
    pub fn key(&self) -> (&str, &str, Seniority) {
        (self.role.as_str(), self.region.as_str(), self.seniority)
    }

    pub fn data(&self) -> RateData {
        RateData {
            base_rate: self.base_rate,
            regional_multiplier: self.regional_multiplier,
            seniority_multiplier: self.seniority_multiplier,
        }
    }
}

/// The multipliers resolved for a custom-resource lookup.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct RateData {
    pub base_rate: Decimal,
    pub regional_multiplier: Decimal,
    pub seniority_multiplier: Decimal,
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use rust_decimal::Decimal;

    use super::{RateEntry, Seniority};

    #[test]
    fn seniority_parses_case_insensitively() {
        assert_eq!(Seniority::from_str("Advanced").expect("parse"), Seniority::Advanced);
        assert_eq!(Seniority::from_str(" expert ").expect("parse"), Seniority::Expert);
    }

    #[test]
    fn seniority_rejects_unknown_tier() {
        let error = Seniority::from_str("principal").expect_err("unknown tier");
        assert!(error.to_string().contains("principal"));
    }

    #[test]
    fn seniority_round_trips_through_display() {
        for level in Seniority::ALL {
            assert_eq!(Seniority::from_str(level.as_str()).expect("round trip"), level);
        }
    }

    #[test]
    fn entry_data_carries_all_multipliers() {
        let entry = RateEntry {
            role: "Backend Developer".to_string(),
            region: "Middle East".to_string(),
            seniority: Seniority::Intermediate,
            base_rate: Decimal::new(9500, 0),
            regional_multiplier: Decimal::new(115, 2),
            seniority_multiplier: Decimal::ONE,
        };

        let data = entry.data();
        assert_eq!(data.base_rate, Decimal::new(9500, 0));
        assert_eq!(data.regional_multiplier, Decimal::new(115, 2));
        assert_eq!(data.seniority_multiplier, Decimal::ONE);
    }
}
