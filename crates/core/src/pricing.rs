//! Pricing
//!
//! Money helpers shared by the catalog, the cart and checkout. All amounts are
//! held as [`Money`] in the store currency and multiplied in minor units.

use rust_decimal::{Decimal, prelude::ToPrimitive};
use rusty_money::{
    Money, MoneyError,
    iso::{self, Currency},
};
use thiserror::Error;

/// A price in the store currency.
pub type Price = Money<'static, Currency>;

/// Errors that can occur while computing prices.
#[derive(Debug, Error, PartialEq)]
pub enum PricingError {
    /// Multiplying a unit price by a quantity overflowed.
    #[error("line total overflowed: {quantity} x {unit_minor} minor units")]
    Overflow {
        /// Unit price in minor units
        unit_minor: i64,
        /// Quantity requested
        quantity: u32,
    },

    /// Wrapped money arithmetic or currency mismatch error.
    #[error(transparent)]
    Money(#[from] MoneyError),
}

/// Errors raised while parsing a price string.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PriceParseError {
    /// The string is not a decimal amount (optionally followed by a currency code).
    #[error("invalid price format: {0}")]
    InvalidFormat(String),

    /// The currency code is not an ISO 4217 code.
    #[error("unknown currency code: {0}")]
    UnknownCurrency(String),
}

/// Calculates `unit_price x quantity`.
///
/// # Errors
///
/// Returns [`PricingError::Overflow`] if the product does not fit in minor units.
pub fn line_total<'a>(
    unit_price: &Money<'a, Currency>,
    quantity: u32,
) -> Result<Money<'a, Currency>, PricingError> {
    let unit_minor = unit_price.to_minor_units();

    let total_minor = unit_minor
        .checked_mul(i64::from(quantity))
        .ok_or(PricingError::Overflow {
            unit_minor,
            quantity,
        })?;

    Ok(Money::from_minor(total_minor, unit_price.currency()))
}

/// Sums amounts, starting from zero in `currency`.
///
/// # Errors
///
/// Returns [`PricingError::Money`] if an amount is in a different currency.
pub fn sum<'a>(
    amounts: impl IntoIterator<Item = Money<'a, Currency>>,
    currency: &'a Currency,
) -> Result<Money<'a, Currency>, PricingError> {
    let total = amounts
        .into_iter()
        .try_fold(Money::from_minor(0, currency), |acc, amount| acc.add(amount))?;

    Ok(total)
}

/// Formats an amount without trailing zero decimals (`95`, `27.5`).
pub fn format_plain(amount: &Money<'_, Currency>) -> String {
    amount.amount().normalize().to_string()
}

/// Formats an amount with exactly two decimals (`160.00`).
pub fn format_fixed(amount: &Money<'_, Currency>) -> String {
    let mut value = *amount.amount();
    value.rescale(2);

    value.to_string()
}

/// Parse a price string (e.g. `"10.00 SAR"`) into money.
///
/// # Errors
///
/// Returns an error if the string is not in the format `AMOUNT CURRENCY`, if the
/// amount is not a decimal, or if the currency code is not recognised.
pub fn parse_price(s: &str) -> Result<Money<'static, Currency>, PriceParseError> {
    let mut parts = s.split_whitespace();

    let (Some(amount), Some(code), None) = (parts.next(), parts.next(), parts.next()) else {
        return Err(PriceParseError::InvalidFormat(format!(
            "expected format 'AMOUNT CURRENCY', got: {s}"
        )));
    };

    let currency =
        iso::find(code).ok_or_else(|| PriceParseError::UnknownCurrency(code.to_string()))?;

    parse_amount(amount, currency)
}

/// Parse a bare decimal amount (e.g. `"27.5"`) in the given currency.
///
/// # Errors
///
/// Returns [`PriceParseError::InvalidFormat`] if the amount is not a decimal or
/// does not fit in minor units.
pub fn parse_amount(
    s: &str,
    currency: &'static Currency,
) -> Result<Money<'static, Currency>, PriceParseError> {
    let invalid = || PriceParseError::InvalidFormat(s.to_string());

    let amount = s.trim().parse::<Decimal>().map_err(|_err| invalid())?;

    let minor_units = 10_i64
        .checked_pow(currency.exponent)
        .and_then(|factor| amount.checked_mul(Decimal::from(factor)))
        .and_then(|value| value.round_dp(0).to_i64())
        .ok_or_else(invalid)?;

    Ok(Money::from_minor(minor_units, currency))
}
