//! Currency conversion and display formatting.
//!
//! All rate storage and pricing happen in the base unit (AED); a quoted
//! price is converted to the caller's display currency at the last step.
//! Table rates are units of currency per 1 AED, so the base unit's own
//! rate is always 1.0. Conversion and formatting never fail: unknown
//! codes degrade to the hardcoded fallback rate or a generic rendering.

use std::collections::BTreeMap;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// One display currency: rate relative to the base unit plus UI metadata.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Currency {
    pub code: String,
    pub rate: Decimal,
    pub symbol: String,
    pub flag: String,
}

/// Snapshot of exchange rates keyed by currency code.
pub type ExchangeRateTable = BTreeMap<String, Currency>;

pub const BASE_CURRENCY: &str = "AED";

// (code, rate-per-AED scaled by 1000, flag)
const FALLBACK_RATES: &[(&str, i64, &str)] = &[
    ("AED", 1_000, "\u{1F1E6}\u{1F1EA}"),
    ("USD", 272, "\u{1F1FA}\u{1F1F8}"),
    ("EUR", 250, "\u{1F1EA}\u{1F1FA}"),
    ("GBP", 210, "\u{1F1EC}\u{1F1E7}"),
    ("PKR", 76_500, "\u{1F1F5}\u{1F1F0}"),
];

// (code, symbol, name, decimal places, space between symbol and amount)
const CURRENCY_INFO: &[(&str, &str, &str, u32, bool)] = &[
    ("AED", "\u{62F}.\u{625}", "UAE Dirham", 2, true),
    ("USD", "$", "US Dollar", 2, false),
    ("EUR", "\u{20AC}", "Euro", 2, false),
    ("GBP", "\u{A3}", "British Pound", 2, false),
    ("PKR", "\u{20A8}", "Pakistani Rupee", 0, true),
    ("INR", "\u{20B9}", "Indian Rupee", 2, false),
    ("CAD", "C$", "Canadian Dollar", 2, false),
    ("AUD", "A$", "Australian Dollar", 2, false),
    ("JPY", "\u{A5}", "Japanese Yen", 0, false),
    ("CNY", "\u{A5}", "Chinese Yuan", 2, false),
    ("SAR", "\u{FDFC}", "Saudi Riyal", 2, true),
    ("QAR", "\u{631}.\u{642}", "Qatari Riyal", 2, true),
    ("BHD", ".\u{62F}.\u{628}", "Bahraini Dinar", 3, true),
    ("KWD", "\u{62F}.\u{643}", "Kuwaiti Dinar", 3, true),
    ("OMR", "\u{631}.\u{639}.", "Omani Rial", 3, true),
];

/// Display metadata for a currency code.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CurrencyInfo {
    pub symbol: &'static str,
    pub name: &'static str,
    pub decimal_places: u32,
    pub spaced: bool,
}

pub fn currency_info(code: &str) -> Option<CurrencyInfo> {
    CURRENCY_INFO.iter().find(|(c, ..)| *c == code).map(
        |(_, symbol, name, decimal_places, spaced)| CurrencyInfo {
            symbol: *symbol,
            name: *name,
            decimal_places: *decimal_places,
            spaced: *spaced,
        },
    )
}

/// Codes the system knows display conventions for; the provider client
/// filters fetched rates down to this set.
pub fn known_currencies() -> Vec<&'static str> {
    CURRENCY_INFO.iter().map(|(code, ..)| *code).collect()
}

/// The hardcoded table used when no provider fetch has succeeded yet.
pub fn fallback_table() -> ExchangeRateTable {
    FALLBACK_RATES
        .iter()
        .map(|(code, rate, flag)| {
            (
                (*code).to_string(),
                Currency {
                    code: (*code).to_string(),
                    rate: Decimal::new(*rate, 3),
                    symbol: currency_info(code).map(|i| i.symbol.to_string()).unwrap_or_else(|| (*code).to_string()),
                    flag: (*flag).to_string(),
                },
            )
        })
        .collect()
}

pub fn fallback_rate(code: &str) -> Option<Decimal> {
    FALLBACK_RATES.iter().find(|(c, ..)| *c == code).map(|(_, rate, _)| Decimal::new(*rate, 3))
}

/// Convert through the base unit. A code missing from the table uses the
/// hardcoded fallback rate; a code missing from both is treated as the
/// base unit (rate 1.0) rather than failing.
pub fn convert(amount: Decimal, from: &str, to: &str, table: &ExchangeRateTable) -> Decimal {
    let amount_in_base = amount / effective_rate(from, table);
    amount_in_base * effective_rate(to, table)
}

fn effective_rate(code: &str, table: &ExchangeRateTable) -> Decimal {
    table
        .get(code)
        .map(|currency| currency.rate)
        .filter(|rate| rate.is_sign_positive() && !rate.is_zero())
        .or_else(|| fallback_rate(code))
        .unwrap_or(Decimal::ONE)
}

/// Render an amount in a currency's display convention. Unknown codes
/// fall back to `"<code> <amount>"` with two decimals; never fails.
pub fn format_amount(amount: Decimal, code: &str) -> String {
    match currency_info(code) {
        Some(info) => {
            let rendered = group_thousands(&fixed(amount, info.decimal_places));
            if info.spaced {
                format!("{} {}", info.symbol, rendered)
            } else {
                format!("{}{}", info.symbol, rendered)
            }
        }
        None => format!("{} {}", code, group_thousands(&fixed(amount, 2))),
    }
}

/// `"1 AED = 0.2720 USD"` style display for the current table.
pub fn exchange_rate_display(from: &str, to: &str, table: &ExchangeRateTable) -> String {
    let rate = effective_rate(to, table) / effective_rate(from, table);
    format!("1 {} = {} {}", from, fixed(rate, 4), to)
}

fn fixed(amount: Decimal, decimal_places: u32) -> String {
    let rounded =
        amount.round_dp_with_strategy(decimal_places, RoundingStrategy::MidpointAwayFromZero);
    format!("{:.*}", decimal_places as usize, rounded)
}

fn group_thousands(rendered: &str) -> String {
    let (number, fraction) = match rendered.split_once('.') {
        Some((whole, fraction)) => (whole, Some(fraction)),
        None => (rendered, None),
    };
    let (sign, digits) = match number.strip_prefix('-') {
        Some(digits) => ("-", digits),
        None => ("", number),
    };

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, ch) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    match fraction {
        Some(fraction) => format!("{sign}{grouped}.{fraction}"),
        None => format!("{sign}{grouped}"),
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::{
        convert, currency_info, exchange_rate_display, fallback_table, format_amount,
        known_currencies, Currency, ExchangeRateTable,
    };

    fn table_with(code: &str, rate: Decimal) -> ExchangeRateTable {
        let mut table = fallback_table();
        table.insert(
            code.to_string(),
            Currency { code: code.to_string(), rate, symbol: code.to_string(), flag: String::new() },
        );
        table
    }

    #[test]
    fn converts_through_the_base_unit() {
        let table = fallback_table();
        let usd = convert(Decimal::new(1000, 0), "AED", "USD", &table);
        assert_eq!(usd, Decimal::new(272, 0));
    }

    #[test]
    fn round_trip_is_identity_within_tolerance() {
        let table = fallback_table();
        let amount = Decimal::new(987_654, 2);
        for from in ["AED", "USD", "EUR", "GBP", "PKR"] {
            for to in ["AED", "USD", "EUR", "GBP", "PKR"] {
                let there = convert(amount, from, to, &table);
                let back = convert(there, to, from, &table);
                let drift = (back - amount).abs();
                assert!(
                    drift < Decimal::new(1, 6),
                    "round trip {from}->{to} drifted by {drift}"
                );
            }
        }
    }

    #[test]
    fn missing_code_uses_hardcoded_fallback_rate() {
        // USD deliberately absent from the live table
        let mut table = fallback_table();
        table.remove("USD");
        let usd = convert(Decimal::new(100, 0), "AED", "USD", &table);
        assert_eq!(usd, Decimal::new(272, 1));
    }

    #[test]
    fn unrecognized_code_is_treated_as_base_unit() {
        let table = fallback_table();
        let same = convert(Decimal::new(500, 0), "AED", "XXX", &table);
        assert_eq!(same, Decimal::new(500, 0));
    }

    #[test]
    fn zero_or_negative_table_rate_is_ignored() {
        let table = table_with("USD", Decimal::ZERO);
        let usd = convert(Decimal::new(100, 0), "AED", "USD", &table);
        assert_eq!(usd, Decimal::new(272, 1), "zero rate must fall back, not divide");
    }

    #[test]
    fn formats_with_per_currency_decimal_places() {
        assert_eq!(format_amount(Decimal::new(1_062_550, 2), "USD"), "$10,625.50");
        assert_eq!(format_amount(Decimal::new(76_500, 0), "PKR"), "\u{20A8} 76,500");
        assert_eq!(format_amount(Decimal::new(123_456, 3), "BHD"), ".\u{62F}.\u{628} 123.456");
    }

    #[test]
    fn format_never_fails_for_any_code() {
        for code in ["", "usd", "XYZ", "??", "VERYLONGCODE"] {
            let rendered = format_amount(Decimal::new(-123_456, 2), code);
            assert!(rendered.contains("1,234.56"), "got {rendered}");
            assert!(rendered.contains('-'));
        }
        // extremes must not panic either
        let _ = format_amount(Decimal::MAX, "USD");
        let _ = format_amount(Decimal::MIN, "JPY");
    }

    #[test]
    fn exchange_display_shows_four_decimals() {
        let table = fallback_table();
        assert_eq!(exchange_rate_display("AED", "USD", &table), "1 AED = 0.2720 USD");
    }

    #[test]
    fn known_currencies_cover_the_fallback_table() {
        let known = known_currencies();
        for code in fallback_table().keys() {
            assert!(known.contains(&code.as_str()));
        }
        assert_eq!(currency_info("AED").expect("base").decimal_places, 2);
    }
}
