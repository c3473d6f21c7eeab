//! Type-safe price representation using exact integer arithmetic.
//!
//! All amounts are held in piasters (1/100 of an Egyptian pound) as `i64`,
//! so repeated additions never drift the way floating-point totals do.
//! `rust_decimal` is used only at the display boundary to scale back to
//! pounds.

use core::iter::Sum;
use core::ops::Add;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A monetary amount in piasters (smallest EGP unit).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Price(i64);

impl Price {
    /// Zero pounds, zero piasters.
    pub const ZERO: Self = Self(0);

    /// Create a price from whole pounds.
    #[must_use]
    pub const fn from_pounds(pounds: i64) -> Self {
        Self(pounds * 100)
    }

    /// Create a price from piasters.
    #[must_use]
    pub const fn from_piasters(piasters: i64) -> Self {
        Self(piasters)
    }

    /// The amount in piasters.
    #[must_use]
    pub const fn piasters(&self) -> i64 {
        self.0
    }

    /// The amount in pounds as a fixed-point decimal (2 fractional digits).
    #[must_use]
    pub fn pounds(&self) -> Decimal {
        Decimal::new(self.0, 2)
    }

    /// Multiply a unit price by a line quantity.
    ///
    /// Saturates on overflow; a cart total can never exceed `i64::MAX`
    /// piasters in practice, but a hostile quantity must not wrap.
    #[must_use]
    #[allow(clippy::cast_lossless)] // u32 to i64 is widening; From is not const
    pub const fn times(&self, quantity: u32) -> Self {
        Self(self.0.saturating_mul(quantity as i64))
    }

    /// True when the amount is zero.
    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

impl Add for Price {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0.saturating_add(rhs.0))
    }
}

impl Sum for Price {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

impl core::fmt::Display for Price {
    /// Format for display, e.g. `EGP 350.00`.
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "EGP {:.2}", self.pounds())
    }
}
