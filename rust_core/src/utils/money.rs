//! Cent-precision money helpers for quoted prices.
//!
//! Prices travel as `f64` currency units at the edges (store rows, API
//! responses) but every price the engine quotes is rounded to whole cents
//! through [`Money`], so repeated refreshes never drift by fractions of a cent.
//!
//! ```rust
//! use laundry_pricing_core::utils::money::Money;
//!
//! let base = Money::from_amount(149.99);
//! assert_eq!(base.cents(), 14999);
//! assert_eq!(base.scale(1.1).cents(), 16499);
//! ```

use std::fmt;

/// Money value stored as integer cents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Money {
    cents: i64,
}

impl Money {
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Self { cents }
    }

    /// Create from currency units, rounding half away from zero.
    /// Non-finite input becomes zero.
    #[inline]
    pub fn from_amount(amount: f64) -> Self {
        if !amount.is_finite() {
            return Self::zero();
        }
        Self {
            cents: (amount * 100.0).round() as i64,
        }
    }

    #[inline]
    pub const fn zero() -> Self {
        Self { cents: 0 }
    }

    #[inline]
    pub const fn cents(&self) -> i64 {
        self.cents
    }

    #[inline]
    pub fn as_amount(&self) -> f64 {
        self.cents as f64 / 100.0
    }

    /// Multiply by a price multiplier, rounding the result to the nearest cent.
    #[inline]
    pub fn scale(self, factor: f64) -> Self {
        if !factor.is_finite() {
            return self;
        }
        Self {
            cents: (self.cents as f64 * factor).round() as i64,
        }
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.cents < 0 { "-" } else { "" };
        let abs = self.cents.abs();
        write!(f, "{}{}.{:02}", sign, abs / 100, abs % 100)
    }
}

/// Round a currency amount to whole cents.
#[inline]
pub fn round_to_cents(amount: f64) -> f64 {
    Money::from_amount(amount).as_amount()
}

/// Quote `base_price * multiplier`, rounded to cents.
#[inline]
pub fn apply_multiplier(base_price: f64, multiplier: f64) -> f64 {
    Money::from_amount(base_price).scale(multiplier).as_amount()
}
