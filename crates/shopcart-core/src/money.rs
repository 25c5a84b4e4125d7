//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Fixed-Point Decimal?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In binary floating point:                                              │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │                                                                         │
//! │  Delivery pricing multiplies a distance with 8 fractional digits by a  │
//! │  per-km rate, then adds it to every line. Drift compounds per line.    │
//! │                                                                         │
//! │  OUR SOLUTION: rust_decimal::Decimal                                    │
//! │    Exact base-10 arithmetic, explicit round-half-up at 2 digits.       │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use rust_decimal::Decimal;
//! use shopcart_core::money::Money;
//!
//! let unit = Money::from_minor(1500); // 15.00
//! let line = unit.multiply_quantity(3).unwrap();
//! assert_eq!(line.to_string(), "45.00");
//!
//! // Products past the decimal range are refused, not wrapped
//! assert!(Money::line_cost(Decimal::MAX, 2).is_none());
//!
//! // Construction always rounds half-up to 2 fractional digits
//! let rounded = Money::new(Decimal::new(12345, 3)); // 12.345
//! assert_eq!(rounded.to_string(), "12.35");
//! ```

use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign};
use std::str::FromStr;

use rust_decimal::prelude::FromPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Fractional digits carried by every monetary value.
pub const MONEY_SCALE: u32 = 2;

// =============================================================================
// Rounding
// =============================================================================

/// Rounds `value` half-up (away from zero on ties) to exactly `dp`
/// fractional digits.
///
/// The result always carries `dp` digits of scale, so `45` becomes `45.00`
/// for `dp = 2`. `Decimal::round_dp` alone never widens the scale.
///
/// ## Example
/// ```rust
/// use rust_decimal::Decimal;
/// use shopcart_core::money::round_half_up;
///
/// assert_eq!(round_half_up(Decimal::new(125, 3), 2).to_string(), "0.13");
/// assert_eq!(round_half_up(Decimal::new(-125, 3), 2).to_string(), "-0.13");
/// assert_eq!(round_half_up(Decimal::from(45), 2).to_string(), "45.00");
/// ```
pub fn round_half_up(value: Decimal, dp: u32) -> Decimal {
    let mut rounded = value.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(dp);
    rounded
}

/// Converts a float to a decimal rounded half-up to `dp` digits.
///
/// Returns `None` for NaN, infinities and magnitudes beyond `Decimal`.
pub fn quantize_f64(value: f64, dp: u32) -> Option<Decimal> {
    Decimal::from_f64(value).map(|d| round_half_up(d, dp))
}

// =============================================================================
// Money Type
// =============================================================================

/// A monetary amount rounded half-up to exactly two fractional digits.
///
/// ## Design Decisions
/// - **Decimal, not cents**: distances carry 8 fractional digits and are
///   multiplied into charges, so integer cents would need a second scale.
/// - **Rounded on construction**: a `Money` is always a finished amount.
///   Raw inputs such as a unit cost stay `Decimal` until priced.
/// - **Serde via Decimal**: serialized as a string (`"65.00"`), and
///   deserialized values are rounded through [`Money::new`].
///
/// ## Where Money is Used
/// ```text
/// unit_cost × quantity ──► PricedLine.cost ─┐
///                                           ├──► PricedLine.final_cost ──► PricedOrder.final_cost
/// distance_km × rate ──► delivery_charge ──┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "Decimal", into = "Decimal")]
pub struct Money(Decimal);

impl Money {
    /// Creates a Money value, rounding half-up to two fractional digits.
    pub fn new(amount: Decimal) -> Self {
        Money(round_half_up(amount, MONEY_SCALE))
    }

    /// Like [`Money::new`], but `None` when the amount is too large to carry
    /// two fractional digits.
    pub fn checked_new(amount: Decimal) -> Option<Self> {
        let money = Money::new(amount);
        (money.0.scale() == MONEY_SCALE).then_some(money)
    }

    /// Creates a Money value from minor units (paise, cents).
    ///
    /// ## Example
    /// ```rust
    /// use shopcart_core::money::Money;
    ///
    /// assert_eq!(Money::from_minor(2000).to_string(), "20.00");
    /// ```
    pub fn from_minor(minor: i64) -> Self {
        Money(Decimal::new(minor, MONEY_SCALE))
    }

    /// Creates a Money value from whole major units.
    pub fn from_major(major: i64) -> Self {
        Money::new(Decimal::from(major))
    }

    /// Returns zero money value.
    pub fn zero() -> Self {
        Money::new(Decimal::ZERO)
    }

    /// Returns the underlying decimal amount (always scale 2).
    #[inline]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Checks if the value is zero.
    #[inline]
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub fn is_negative(&self) -> bool {
        self.0.is_sign_negative() && !self.0.is_zero()
    }

    /// Multiplies a raw unit amount by a quantity and rounds the product.
    ///
    /// This is the line-cost rule: the unit amount itself is never rounded
    /// first, only the product. Returns `None` when the product does not fit
    /// in a `Decimal`.
    ///
    /// ## Example
    /// ```rust
    /// use rust_decimal::Decimal;
    /// use shopcart_core::money::Money;
    ///
    /// // 0.335 × 3 = 1.005 → 1.01
    /// let cost = Money::line_cost(Decimal::new(335, 3), 3).unwrap();
    /// assert_eq!(cost.to_string(), "1.01");
    /// ```
    pub fn line_cost(unit_amount: Decimal, quantity: u32) -> Option<Self> {
        unit_amount
            .checked_mul(Decimal::from(quantity))
            .and_then(Money::checked_new)
    }

    /// Multiplies this amount by a quantity.
    pub fn multiply_quantity(&self, quantity: u32) -> Option<Self> {
        Money::line_cost(self.0, quantity)
    }

    /// Multiplies this amount by an arbitrary decimal factor, rounding the
    /// product (e.g. a per-km rate times a distance).
    pub fn scale_by(&self, factor: Decimal) -> Option<Self> {
        self.0.checked_mul(factor).and_then(Money::checked_new)
    }

    /// Adds two amounts, `None` on overflow.
    pub fn checked_add(&self, other: Money) -> Option<Self> {
        self.0.checked_add(other.0).and_then(Money::checked_new)
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Display shows the amount with exactly two decimals and no currency
/// symbol; the storefront formats the currency.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl From<Decimal> for Money {
    fn from(amount: Decimal) -> Self {
        Money::new(amount)
    }
}

impl From<Money> for Decimal {
    fn from(money: Money) -> Self {
        money.0
    }
}

impl FromStr for Money {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Decimal::from_str(s.trim())
            .map(Money::new)
            .map_err(|e| ValidationError::InvalidFormat {
                field: "amount".to_string(),
                reason: e.to_string(),
            })
    }
}

/// Addition of two Money values. Both sides are already 2-digit amounts,
/// so the sum needs no further rounding, but it goes through `new` anyway
/// to keep the scale invariant in one place.
///
/// Panics past `Decimal::MAX`. Totals built from request input go through
/// [`Money::checked_add`].
impl Add for Money {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Money::new(self.0 + other.0)
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, other: Self) {
        *self = *self + other;
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), Add::add)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_round_half_up_ties_go_away_from_zero() {
        assert_eq!(round_half_up(dec!(0.125), 2), dec!(0.13));
        assert_eq!(round_half_up(dec!(0.135), 2), dec!(0.14));
        assert_eq!(round_half_up(dec!(-0.125), 2), dec!(-0.13));
        assert_eq!(round_half_up(dec!(0.124999), 2), dec!(0.12));
    }

    #[test]
    fn test_round_half_up_pads_scale() {
        let value = round_half_up(dec!(45), 2);
        assert_eq!(value.scale(), 2);
        assert_eq!(value.to_string(), "45.00");

        let distance = round_half_up(dec!(1.5), 8);
        assert_eq!(distance.to_string(), "1.50000000");
    }

    #[test]
    fn test_quantize_f64() {
        let d = quantize_f64(1.572_364_815_2, 8).unwrap();
        assert_eq!(d.to_string(), "1.57236482");
        assert_eq!(quantize_f64(0.0, 8).unwrap().to_string(), "0.00000000");
        assert!(quantize_f64(f64::NAN, 8).is_none());
        assert!(quantize_f64(f64::INFINITY, 8).is_none());
    }

    #[test]
    fn test_new_always_has_two_digits() {
        assert_eq!(Money::new(dec!(20)).to_string(), "20.00");
        assert_eq!(Money::new(dec!(12.345)).to_string(), "12.35");
        assert_eq!(Money::new(dec!(12.344)).to_string(), "12.34");
        assert_eq!(Money::zero().amount().scale(), 2);
    }

    #[test]
    fn test_from_minor_and_major() {
        assert_eq!(Money::from_minor(1099).amount(), dec!(10.99));
        assert_eq!(Money::from_major(20).to_string(), "20.00");
    }

    #[test]
    fn test_line_cost_rounds_product_not_unit() {
        // unit rounded first would give 0.34 × 3 = 1.02
        let cost = Money::line_cost(dec!(0.335), 3).unwrap();
        assert_eq!(cost.amount(), dec!(1.01));
    }

    #[test]
    fn test_checked_arithmetic_refuses_overflow() {
        assert!(Money::line_cost(Decimal::MAX, 2).is_none());
        // fits a Decimal, but leaves no room for two fractional digits
        assert!(Money::line_cost(Decimal::MAX, 1).is_none());
        assert!(Money::from_minor(100).scale_by(Decimal::MAX).is_none());

        let large = Decimal::from_str("500000000000000000000000000").unwrap();
        let half = Money::checked_new(large).unwrap();
        assert_eq!(half.amount().scale(), 2);
        assert!(half.checked_add(half).is_none());
        assert_eq!(
            Money::from_minor(4500).checked_add(Money::from_minor(2000)),
            Some(Money::from_minor(6500))
        );
    }

    #[test]
    fn test_arithmetic_and_sum() {
        let a = Money::from_minor(4500);
        let b = Money::from_minor(2000);
        assert_eq!((a + b).to_string(), "65.00");

        let mut total = Money::zero();
        total += a;
        total += b;
        assert_eq!(total, Money::from_minor(6500));

        let summed: Money = vec![a, b, b].into_iter().sum();
        assert_eq!(summed.to_string(), "85.00");
    }

    #[test]
    fn test_scale_by() {
        let rate = Money::from_major(10);
        assert_eq!(rate.scale_by(dec!(1.23456789)).unwrap().to_string(), "12.35");
    }

    #[test]
    fn test_sign_checks() {
        assert!(Money::zero().is_zero());
        assert!(!Money::zero().is_negative());
        assert!(Money::from_minor(-1).is_negative());
    }

    #[test]
    fn test_parse() {
        assert_eq!("15".parse::<Money>().unwrap().to_string(), "15.00");
        assert_eq!(" 15.005 ".parse::<Money>().unwrap().to_string(), "15.01");
        assert!("fifteen".parse::<Money>().is_err());
    }

    #[test]
    fn test_serde_uses_string_amounts() {
        let json = serde_json::to_string(&Money::from_minor(6500)).unwrap();
        assert_eq!(json, "\"65.00\"");

        let parsed: Money = serde_json::from_str("\"19.999\"").unwrap();
        assert_eq!(parsed.to_string(), "20.00");
    }
}
