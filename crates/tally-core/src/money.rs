//! # Money Module
//!
//! Provides the `Money` type for report amounts and the `Rate` type for
//! bonus percentages.
//!
//! ## Where Rounding Happens
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  ACCUMULATE IN f64, ROUND ONCE                                          │
//! │                                                                         │
//! │  Strategies return arbitrary reals:                                     │
//! │    30.00 × 3 × (1 − 7/100) = 83.7                                       │
//! │                                                                         │
//! │  Rounding every line item would drift the seller total by up to        │
//! │  half a cent per line. Instead:                                         │
//! │                                                                         │
//! │    fold pass:   profit += revenue − cost        (f64, exact as input)  │
//! │    emit row:    Money::from_decimal(profit)     (cents, half away 0)   │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use tally_core::money::Money;
//!
//! let profit = Money::from_decimal(40.005);
//! assert_eq!(profit.cents(), 4001);
//! assert_eq!(profit.to_string(), "$40.01");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Add;

// =============================================================================
// Money Type
// =============================================================================

/// Tolerance, in cents, applied before rounding to the nearest cent.
const ROUNDING_EPSILON: f64 = 1e-9;

/// A monetary value in cents.
///
/// Serialises as an integer number of cents. Report rows use
/// [`decimal`] instead so consumers see `12.34`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents.
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Rounds a decimal amount to the nearest cent, half away from zero.
    ///
    /// ## Example
    /// ```rust
    /// use tally_core::money::Money;
    ///
    /// assert_eq!(Money::from_decimal(6.0).cents(), 600);
    /// assert_eq!(Money::from_decimal(0.125).cents(), 13);
    /// assert_eq!(Money::from_decimal(-0.125).cents(), -13);
    /// assert_eq!(Money::from_decimal(f64::NAN).cents(), 0);
    /// ```
    pub fn from_decimal(amount: f64) -> Self {
        if !amount.is_finite() {
            return Money::zero();
        }
        // f64::round is half-away-from-zero. The epsilon absorbs binary
        // representation error such as 1.005 * 100 = 100.49999999999999.
        let scaled = amount * 100.0 + amount.signum() * ROUNDING_EPSILON;
        Money(scaled.round() as i64)
    }

    /// Returns the value in cents.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the value as a decimal amount (`1234` cents → `12.34`).
    #[inline]
    pub fn as_decimal(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Returns the major unit portion.
    #[inline]
    pub const fn dollars(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the minor unit portion (always 0-99).
    #[inline]
    pub const fn cents_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(
            f,
            "{}${}.{:02}",
            sign,
            self.dollars().abs(),
            self.cents_part()
        )
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

impl std::iter::Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), Add::add)
    }
}

// =============================================================================
// Decimal Serde Adapter
// =============================================================================

/// Serialises `Money` as a decimal number (`12.34`) instead of cents.
///
/// Use with `#[serde(with = "crate::money::decimal")]`.
pub mod decimal {
    use super::Money;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &Money, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_f64(value.as_decimal())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Money, D::Error>
    where
        D: Deserializer<'de>,
    {
        f64::deserialize(deserializer).map(Money::from_decimal)
    }
}

// =============================================================================
// Rate
// =============================================================================

/// A percentage represented in basis points (bps).
///
/// 1 basis point = 0.01%, so 1500 bps = 15%.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Rate(u32);

impl Rate {
    /// Creates a rate from basis points.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        Rate(bps)
    }

    /// Returns the rate as a fraction (1500 bps → 0.15).
    #[inline]
    pub fn fraction(&self) -> f64 {
        self.0 as f64 / 10_000.0
    }

    /// Applies the rate to an amount: `amount × bps / 10000`.
    #[inline]
    pub fn apply(&self, amount: f64) -> f64 {
        amount * self.fraction()
    }

    #[inline]
    pub const fn zero() -> Self {
        Rate(0)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
