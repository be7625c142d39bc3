//! # Loyalty Program
//!
//! Program constants and the pure point/value conversions.
//!
//! ## Earning and Burning
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  EARN:   points = floor(total / points_per_unit)                        │
//! │          25000 total, 1000 per point ──► 25 points                      │
//! │                                                                         │
//! │  BURN:   discount = points × point_value                               │
//! │          50 points, 100 per point ──► 5000 off                         │
//! │                                                                         │
//! │  GATE:   min_redeem_points ≤ points ≤ balance                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::CustomerId;

/// Default monetary units of spend per point earned.
pub const DEFAULT_POINTS_PER_UNIT: i64 = 1000;

/// Default monetary value of one redeemed point.
pub const DEFAULT_POINT_VALUE: i64 = 100;

/// Default smallest non-zero redemption.
pub const DEFAULT_MIN_REDEEM_POINTS: i64 = 10;

/// Loyalty program constants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoyaltyPolicy {
    /// Spend needed to earn one point.
    pub points_per_unit: Money,
    /// Discount granted per redeemed point.
    pub point_value: Money,
    /// Smallest redemption accepted.
    pub min_redeem_points: i64,
}

impl Default for LoyaltyPolicy {
    fn default() -> Self {
        LoyaltyPolicy {
            points_per_unit: Money::from_major(DEFAULT_POINTS_PER_UNIT),
            point_value: Money::from_major(DEFAULT_POINT_VALUE),
            min_redeem_points: DEFAULT_MIN_REDEEM_POINTS,
        }
    }
}

impl LoyaltyPolicy {
    /// Whether `points` may be redeemed against `available_balance`.
    ///
    /// ## Example
    /// ```rust
    /// use brew_core::LoyaltyPolicy;
    ///
    /// let policy = LoyaltyPolicy::default();
    /// assert!(policy.can_redeem(10, 100));
    /// assert!(!policy.can_redeem(5, 100));   // below minimum
    /// assert!(!policy.can_redeem(200, 100)); // above balance
    /// ```
    pub fn can_redeem(&self, points: i64, available_balance: i64) -> bool {
        points >= self.min_redeem_points && points <= available_balance
    }

    /// Like [`can_redeem`](Self::can_redeem) but says why a request fails.
    pub fn check_redeem(
        &self,
        customer_id: CustomerId,
        points: i64,
        available_balance: i64,
    ) -> CoreResult<()> {
        if points < self.min_redeem_points {
            return Err(CoreError::BelowMinimumRedemption {
                requested: points,
                min: self.min_redeem_points,
            });
        }
        if points > available_balance {
            return Err(CoreError::InsufficientPoints {
                customer_id,
                available: available_balance,
                requested: points,
            });
        }
        Ok(())
    }

    /// Monetary value of `points`; zero for non-positive input.
    ///
    /// Saturates instead of overflowing. Orders clamp the discount to their
    /// subtotal, so a saturated value still yields a zero total.
    pub fn points_value(&self, points: i64) -> Money {
        if points <= 0 {
            return Money::zero();
        }
        self.point_value.multiply_quantity(points)
    }

    /// Points earned on `amount`; zero for non-positive amounts.
    ///
    /// ## Example
    /// ```rust
    /// use brew_core::{LoyaltyPolicy, Money};
    ///
    /// let policy = LoyaltyPolicy::default();
    /// assert_eq!(policy.points_for_amount(Money::from_major(25_000)), 25);
    /// assert_eq!(policy.points_for_amount(Money::from_major(999)), 0);
    /// ```
    pub fn points_for_amount(&self, amount: Money) -> i64 {
        amount.whole_units_of(self.points_per_unit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_can_redeem_bounds() {
        let policy = LoyaltyPolicy::default();
        assert!(!policy.can_redeem(9, 100));
        assert!(policy.can_redeem(10, 100));
        assert!(policy.can_redeem(100, 100));
        assert!(!policy.can_redeem(101, 100));
        assert!(!policy.can_redeem(10, 9));
        assert!(!policy.can_redeem(0, 100));
    }

    #[test]
    fn test_check_redeem_reasons() {
        let policy = LoyaltyPolicy::default();
        assert!(matches!(
            policy.check_redeem(1, 5, 100),
            Err(CoreError::BelowMinimumRedemption { requested: 5, min: 10 })
        ));
        assert!(matches!(
            policy.check_redeem(1, 200, 100),
            Err(CoreError::InsufficientPoints { available: 100, requested: 200, .. })
        ));
        assert!(policy.check_redeem(1, 50, 100).is_ok());
    }

    #[test]
    fn test_points_value() {
        let policy = LoyaltyPolicy::default();
        assert_eq!(policy.points_value(50), Money::from_major(5000));
        assert_eq!(policy.points_value(0), Money::zero());
        assert_eq!(policy.points_value(-3), Money::zero());
        assert_eq!(policy.points_value(i64::MAX / 2), Money::from_minor(i64::MAX));
    }

    #[test]
    fn test_points_for_amount() {
        let policy = LoyaltyPolicy::default();
        assert_eq!(policy.points_for_amount(Money::from_major(1000)), 1);
        assert_eq!(policy.points_for_amount(Money::from_minor(99_999)), 0);
        assert_eq!(policy.points_for_amount(Money::zero()), 0);
        assert_eq!(policy.points_for_amount(Money::from_minor(-500)), 0);
    }

    #[test]
    fn test_custom_policy() {
        let policy = LoyaltyPolicy {
            points_per_unit: Money::from_major(500),
            point_value: Money::from_major(50),
            min_redeem_points: 1,
        };
        assert_eq!(policy.points_for_amount(Money::from_major(1500)), 3);
        assert_eq!(policy.points_value(3), Money::from_major(150));
        assert!(policy.can_redeem(1, 1));
    }
}
