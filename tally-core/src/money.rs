//! Monetary amounts: parsing loose extractor input and half-up rounding.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Currencies accepted on a validated transaction. Currently only EUR.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Currency {
    #[default]
    #[serde(rename = "EUR")]
    Eur,
}

impl Currency {
    pub const ALL: [Currency; 1] = [Currency::Eur];

    pub fn code(&self) -> &'static str {
        match self {
            Currency::Eur => "EUR",
        }
    }

    /// Parse a currency code or symbol ("eur", "€", "Euro").
    pub fn parse(s: &str) -> Option<Currency> {
        match s.trim().to_uppercase().as_str() {
            "EUR" | "€" | "EURO" | "EUROS" => Some(Currency::Eur),
            _ => None,
        }
    }

    pub fn allowed_codes() -> Vec<String> {
        Self::ALL.iter().map(|c| c.code().to_string()).collect()
    }
}

/// Round to two fractional digits, ties away from zero (1.005 -> 1.01).
/// The result always carries exactly two fractional digits.
pub fn round_half_up(amount: Decimal) -> Decimal {
    let mut rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(2);
    rounded
}

/// Parse a textual amount as produced by an extractor or a user:
/// "12.50", "12,50", "1.234,56", "€ 3", "1e2".
pub fn parse_amount(raw: &str) -> Option<Decimal> {
    let cleaned: String = raw
        .trim()
        .trim_start_matches('€')
        .trim_end_matches('€')
        .trim()
        .trim_end_matches("EUR")
        .trim()
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();
    if cleaned.is_empty() {
        return None;
    }

    // With both separators present the last one is the decimal mark.
    let normalized = match (cleaned.rfind('.'), cleaned.rfind(',')) {
        (Some(dot), Some(comma)) if comma > dot => cleaned.replace('.', "").replace(',', "."),
        (Some(_), Some(_)) => cleaned.replace(',', ""),
        (None, Some(_)) => cleaned.replace(',', "."),
        _ => cleaned,
    };

    Decimal::from_str(&normalized)
        .or_else(|_| Decimal::from_scientific(&normalized))
        .ok()
}
