//! Conversion between user-facing decimal amounts and cents.
//!
//! All money arithmetic in this crate happens on integer cents; these helpers
//! are the only place where decimal text enters or leaves that domain.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

use crate::models::Cents;

/// Currency suffix appended to every displayed amount.
pub const CURRENCY_SUFFIX: &str = " €";

/// Normalizes input for decimal parsing: trims whitespace and handles commas.
///
/// A single comma in text without a period is the German decimal separator
/// (`"2,5"` is 2.5). Otherwise commas are thousands separators and removed.
fn normalize_decimal_input(s: &str) -> String {
    let trimmed = s.trim();
    if !trimmed.contains('.') && trimmed.matches(',').count() == 1 {
        trimmed.replace(',', ".")
    } else {
        trimmed.replace(',', "")
    }
}

/// Parses decimal text, `None` for empty or invalid input.
pub fn parse_decimal(s: &str) -> Option<Decimal> {
    let normalized = normalize_decimal_input(s);
    if normalized.is_empty() {
        return None;
    }
    normalized
        .parse::<Decimal>()
        .or_else(|_| Decimal::from_scientific(&normalized))
        .ok()
}

/// Rounds to a whole number using half-away-from-zero.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use payroll_core::calculations::money::round_half_up;
///
/// assert_eq!(round_half_up(dec!(12.5)), dec!(13));
/// assert_eq!(round_half_up(dec!(-12.5)), dec!(-13));
/// assert_eq!(round_half_up(dec!(12.49)), dec!(12));
/// ```
pub fn round_half_up(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
}

/// Converts a whole-cent decimal into [`Cents`], `None` if out of range.
pub fn decimal_to_cents(value: Decimal) -> Option<Cents> {
    round_half_up(value).to_i64().map(Cents)
}

/// Converts a euro amount such as `"1,234.56"` into cents.
///
/// The multiplication by 100 is rounded half-away-from-zero. Empty or
/// unparseable input yields zero cents.
///
/// # Examples
///
/// ```
/// use payroll_core::calculations::money::to_minor_units;
/// use payroll_core::Cents;
///
/// assert_eq!(to_minor_units("3500"), Cents(350000));
/// assert_eq!(to_minor_units("19.995"), Cents(2000));
/// assert_eq!(to_minor_units("abc"), Cents(0));
/// ```
pub fn to_minor_units(s: &str) -> Cents {
    match parse_decimal(s) {
        Some(euros) => euros
            .checked_mul(Decimal::ONE_HUNDRED)
            .and_then(decimal_to_cents)
            .unwrap_or_else(|| {
                tracing::warn!(input = %s, "amount out of range, using 0");
                Cents::ZERO
            }),
        None => {
            if !s.trim().is_empty() {
                tracing::warn!(input = %s, "invalid amount, using 0");
            }
            Cents::ZERO
        }
    }
}

/// Parses text that already denotes cents (e.g. `"45000"` or `"45000.00"`).
pub fn parse_cents(s: &str) -> Option<Cents> {
    parse_decimal(s).and_then(decimal_to_cents)
}

/// Formats cents as a plain decimal with two fraction digits, e.g. `3050.00`.
pub fn format_amount(amount: Cents) -> String {
    format!("{:.2}", Decimal::new(amount.value(), 2))
}

/// Formats cents for display, e.g. `3050.00 €`.
pub fn to_display_string(amount: Cents) -> String {
    format!("{}{}", format_amount(amount), CURRENCY_SUFFIX)
}

/// Formats a percentage with one fraction digit, e.g. `12.9 %`.
///
/// Non-finite values are shown as `0.0 %`.
pub fn to_percent_string(value: f64) -> String {
    let value = if value.is_finite() { value } else { 0.0 };
    format!("{value:.1} %")
}
