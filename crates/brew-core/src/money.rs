//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In floating point:                                                     │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │                                                                         │
//! │  Loyalty math divides totals by 1000 and floors the result, so a       │
//! │  total of 24999.999999 instead of 25000 silently loses a point.        │
//! │                                                                         │
//! │  OUR SOLUTION: Integer minor units (hundredths)                        │
//! │    25000.00 is stored as 2_500_000 and divides exactly                 │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use brew_core::money::Money;
//!
//! let price = Money::from_major(15000);
//! let line_total = price.multiply_quantity(2);
//! assert_eq!(line_total, Money::from_major(30000));
//!
//! // Record files carry plain decimal text
//! let parsed: Money = "15000.50".parse().unwrap();
//! assert_eq!(parsed.minor(), 1_500_050);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Sub, SubAssign};
use std::str::FromStr;

use crate::error::ValidationError;

/// Minor units per major unit (two decimal places).
pub const MINOR_PER_MAJOR: i64 = 100;

// =============================================================================
// Money Type
// =============================================================================

/// Represents a monetary value in hundredths of the currency unit.
///
/// ## Design Decisions
/// - **i64 (signed)**: subtraction never wraps; negative values are rejected
///   at the edges (prices, parsing) instead of by the type
/// - **Single field tuple struct**: Zero-cost abstraction over i64
///
/// ## Where Money is Used
/// ```text
/// Product.price ──► LineItem.unit_price ──► LineItem.subtotal
///                                                 │
///                         Order.subtotal ◄────────┘
///                              │
///                              ├──► Order.discount (points × point value)
///                              ▼
///                         Order.total ──► points earned
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from minor units (hundredths).
    #[inline]
    pub const fn from_minor(minor: i64) -> Self {
        Money(minor)
    }

    /// Creates a Money value from whole currency units.
    ///
    /// ## Example
    /// ```rust
    /// use brew_core::money::Money;
    ///
    /// assert_eq!(Money::from_major(1000).minor(), 100_000);
    /// ```
    ///
    /// Saturates at the `i64` bounds; use [`checked_from_major`](Self::checked_from_major)
    /// for untrusted input.
    #[inline]
    pub const fn from_major(major: i64) -> Self {
        Money(major.saturating_mul(MINOR_PER_MAJOR))
    }

    /// Like [`from_major`](Self::from_major), `None` when the value does not fit.
    #[inline]
    pub const fn checked_from_major(major: i64) -> Option<Self> {
        match major.checked_mul(MINOR_PER_MAJOR) {
            Some(minor) => Some(Money(minor)),
            None => None,
        }
    }

    /// Returns the value in minor units.
    #[inline]
    pub const fn minor(&self) -> i64 {
        self.0
    }

    /// Returns the whole-unit portion (truncated toward zero).
    #[inline]
    pub const fn major(&self) -> i64 {
        self.0 / MINOR_PER_MAJOR
    }

    /// Returns the fractional portion in hundredths (always 0-99).
    #[inline]
    pub const fn minor_part(&self) -> i64 {
        (self.0 % MINOR_PER_MAJOR).abs()
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checks if the value is positive (greater than zero).
    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Multiplies money by a quantity.
    ///
    /// ## Example
    /// ```rust
    /// use brew_core::money::Money;
    ///
    /// let unit_price = Money::from_major(15000);
    /// assert_eq!(unit_price.multiply_quantity(3), Money::from_major(45000));
    /// ```
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0.saturating_mul(qty))
    }

    /// Exact product, `None` on overflow.
    #[inline]
    pub const fn checked_multiply_quantity(&self, qty: i64) -> Option<Self> {
        match self.0.checked_mul(qty) {
            Some(minor) => Some(Money(minor)),
            None => None,
        }
    }

    /// Exact sum, `None` on overflow.
    #[inline]
    pub const fn checked_add(&self, other: Money) -> Option<Self> {
        match self.0.checked_add(other.0) {
            Some(minor) => Some(Money(minor)),
            None => None,
        }
    }

    /// Returns how many whole `unit`s fit into this amount, rounding down.
    ///
    /// Zero when either side is not positive.
    ///
    /// ## Example
    /// ```rust
    /// use brew_core::money::Money;
    ///
    /// let total = Money::from_major(25_999);
    /// assert_eq!(total.whole_units_of(Money::from_major(1000)), 25);
    /// ```
    pub fn whole_units_of(&self, unit: Money) -> i64 {
        if self.0 <= 0 || unit.0 <= 0 {
            return 0;
        }
        self.0 / unit.0
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Display renders the record form: `15000` or `15000.50`.
///
/// Currency symbols are added by the front end.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let major = self.major().abs();
        if self.minor_part() == 0 {
            write!(f, "{}{}", sign, major)
        } else {
            write!(f, "{}{}.{:02}", sign, major, self.minor_part())
        }
    }
}

/// Parses non-negative decimal text with at most two fractional digits.
///
/// ## Accepted
/// `15000`, `15000.5`, `15000.50`, ` 12.00 `
///
/// ## Rejected
/// `-1`, `+1`, `1.`, `.5`, `1.234`, `1e3`, `abc`, values overflowing i64
impl FromStr for Money {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |reason: &str| ValidationError::InvalidFormat {
            field: "amount".to_string(),
            reason: reason.to_string(),
        };

        let s = s.trim();
        let (whole, fraction) = match s.split_once('.') {
            Some((whole, fraction)) => (whole, Some(fraction)),
            None => (s, None),
        };

        if whole.is_empty() || !whole.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid("expected a non-negative decimal number"));
        }

        let fraction_minor = match fraction {
            None => 0,
            Some(f) if f.is_empty() || f.len() > 2 || !f.bytes().all(|b| b.is_ascii_digit()) => {
                return Err(invalid("at most two decimal places are allowed"));
            }
            Some(f) => {
                let digits: i64 = f.parse().map_err(|_| invalid("bad fraction"))?;
                if f.len() == 1 {
                    digits * 10
                } else {
                    digits
                }
            }
        };

        let whole: i64 = whole.parse().map_err(|_| invalid("amount is too large"))?;
        whole
            .checked_mul(MINOR_PER_MAJOR)
            .and_then(|m| m.checked_add(fraction_minor))
            .map(Money)
            .ok_or_else(|| invalid("amount is too large"))
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0.saturating_add(other.0))
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 = self.0.saturating_add(other.0);
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0.saturating_sub(other.0))
    }
}

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 = self.0.saturating_sub(other.0);
    }
}

impl std::iter::Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), Add::add)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
