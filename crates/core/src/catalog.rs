//! Static fallback catalog.
//!
//! Used whenever the rate store is unreachable, misconfigured, or empty:
//! pricing must keep producing sensible numbers without it. The table
//! mirrors the seed spreadsheet: one base rate per role, a multiplier
//! per region, a multiplier per seniority tier.

use rust_decimal::Decimal;

use crate::domain::rate::{RateData, RateEntry, Seniority};

const ROLE_BASE_RATES: &[(&str, i64)] = &[
    ("Database Developer", 8_000),
    ("Full Stack Developer", 10_000),
    ("Frontend Developer", 9_000),
    ("Backend Developer", 9_500),
    ("Quality Assurance", 7_000),
    ("Product Owner", 12_000),
];

// (region, multiplier scaled by 100)
const REGION_MULTIPLIERS: &[(&str, i64)] = &[
    ("Euro Asia", 100),
    ("Middle East", 115),
    ("Europe", 130),
    ("North America", 140),
];

pub fn seniority_multiplier(seniority: Seniority) -> Decimal {
    match seniority {
        Seniority::Intermediate => Decimal::new(100, 2),
        Seniority::Advanced => Decimal::new(125, 2),
        Seniority::Expert => Decimal::new(160, 2),
    }
}

/// The full catalog, one entry per (role, region, seniority) key.
pub fn entries() -> Vec<RateEntry> {
    let mut entries = Vec::with_capacity(
        ROLE_BASE_RATES.len() * REGION_MULTIPLIERS.len() * Seniority::ALL.len(),
    );
    for (role, base_rate) in ROLE_BASE_RATES {
        for (region, regional_multiplier) in REGION_MULTIPLIERS {
            for seniority in Seniority::ALL {
                entries.push(RateEntry {
                    role: (*role).to_string(),
                    region: (*region).to_string(),
                    seniority,
                    base_rate: Decimal::new(*base_rate, 0),
                    regional_multiplier: Decimal::new(*regional_multiplier, 2),
                    seniority_multiplier: seniority_multiplier(seniority),
                });
            }
        }
    }
    entries
}

/// Exact-key lookup against the static table.
pub fn rate_data(role: &str, region: &str, seniority: Seniority) -> Option<RateData> {
    let (_, base_rate) = ROLE_BASE_RATES.iter().find(|(name, _)| *name == role)?;
    let (_, regional) = REGION_MULTIPLIERS.iter().find(|(name, _)| *name == region)?;
    Some(RateData {
        base_rate: Decimal::new(*base_rate, 0),
        regional_multiplier: Decimal::new(*regional, 2),
        seniority_multiplier: seniority_multiplier(seniority),
    })
}

/// Base monthly rate for a role, independent of region and seniority;
/// the team calculator applies its own fixed tier on top.
pub fn team_base_rate(role: &str) -> Option<Decimal> {
    ROLE_BASE_RATES
        .iter()
        .find(|(name, _)| *name == role)
        .map(|(_, base_rate)| Decimal::new(*base_rate, 0))
}

pub fn roles() -> Vec<String> {
    sorted(ROLE_BASE_RATES.iter().map(|(name, _)| *name))
}

pub fn regions() -> Vec<String> {
    sorted(REGION_MULTIPLIERS.iter().map(|(name, _)| *name))
}

pub fn seniority_levels() -> Vec<String> {
    sorted(Seniority::ALL.iter().map(|level| level.as_str()))
}

fn sorted<'a>(names: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut names: Vec<String> = names.map(str::to_string).collect();
    names.sort();
    names.dedup();
    names
}
