//! # Order Calculator
//!
//! The cart / transaction type and its total, discount and loyalty math.
//!
//! ## Recalculation Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Every mutation ends in recalculate()                 │
//! │                                                                         │
//! │  add_item ──────────┐                                                   │
//! │  remove_item ───────┤                                                   │
//! │  set_item_quantity ─┼──► recalculate()                                  │
//! │  set_points_used ───┤      1. subtotal = Σ unit_price × quantity        │
//! │  set_customer ──────┤      2. discount = min(points × value, subtotal)  │
//! │  clear_items ───────┘      3. total    = subtotal − discount            │
//! │                            4. earned   = floor(total / per_unit)        │
//! │                                                                         │
//! │  Derived fields are private, so they can never be observed stale.      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//! ```rust
//! use brew_core::{LoyaltyPolicy, Money, Order};
//!
//! let mut order = Order::new(LoyaltyPolicy::default());
//! order.add_item(1, "Latte", Money::from_major(15000), 2).unwrap();
//! order.set_points_used(50).unwrap();
//!
//! assert_eq!(order.subtotal(), Money::from_major(30000));
//! assert_eq!(order.discount(), Money::from_major(5000));
//! assert_eq!(order.total(), Money::from_major(25000));
//! assert_eq!(order.points_earned(), 25);
//! ```

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::loyalty::LoyaltyPolicy;
use crate::money::Money;
use crate::ports::Catalog;
use crate::types::{CustomerId, OrderId, ProductId};
use crate::validation::{validate_points, validate_price, validate_quantity};

// =============================================================================
// Line Item
// =============================================================================

/// One product entry within an order.
///
/// Name and unit price are frozen when the item is added, so later catalog
/// edits do not change an open cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    pub product_id: ProductId,
    pub product_name: String,
    pub unit_price: Money,
    pub quantity: i64,
}

impl LineItem {
    pub fn new(
        product_id: ProductId,
        product_name: impl Into<String>,
        unit_price: Money,
        quantity: i64,
    ) -> Self {
        LineItem {
            product_id,
            product_name: product_name.into(),
            unit_price,
            quantity,
        }
    }

    /// Unit price × quantity.
    #[inline]
    pub fn subtotal(&self) -> Money {
        self.unit_price.multiply_quantity(self.quantity)
    }
}

// =============================================================================
// Order
// =============================================================================

/// Persisted fields of a completed order, used to rebuild history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderSnapshot {
    pub id: OrderId,
    pub customer_id: Option<CustomerId>,
    pub completed_at: NaiveDateTime,
    pub total: Money,
    pub points_earned: i64,
    pub points_used: i64,
    pub items: Vec<LineItem>,
}

/// A cart while open, a transaction once completed.
///
/// ## Invariants
/// - Items are unique by `product_id` (adding again increases quantity)
/// - Every quantity is > 0
/// - `discount <= subtotal`, so `total >= 0`
/// - Derived fields match items and points after every mutation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    id: Option<OrderId>,
    customer_id: Option<CustomerId>,
    completed_at: Option<NaiveDateTime>,
    items: Vec<LineItem>,
    points_used: i64,
    subtotal: Money,
    discount: Money,
    total: Money,
    points_earned: i64,
    #[serde(skip)]
    policy: LoyaltyPolicy,
}

impl Default for Order {
    fn default() -> Self {
        Order::new(LoyaltyPolicy::default())
    }
}

impl Order {
    /// Creates an empty guest cart.
    pub fn new(policy: LoyaltyPolicy) -> Self {
        Order {
            id: None,
            customer_id: None,
            completed_at: None,
            items: Vec::new(),
            points_used: 0,
            subtotal: Money::zero(),
            discount: Money::zero(),
            total: Money::zero(),
            points_earned: 0,
            policy,
        }
    }

    /// Creates an empty cart for `customer_id` (`None` = guest).
    pub fn for_customer(policy: LoyaltyPolicy, customer_id: Option<CustomerId>) -> Self {
        let mut order = Order::new(policy);
        order.customer_id = customer_id;
        order
    }

    /// Rebuilds a completed order from its persisted fields.
    ///
    /// Stored totals are kept as-is; only discount and subtotal are derived
    /// (`discount = points_value(points_used)`, `subtotal = total + discount`).
    pub fn restore(snapshot: OrderSnapshot, policy: LoyaltyPolicy) -> Self {
        let discount = policy.points_value(snapshot.points_used);
        Order {
            id: Some(snapshot.id),
            customer_id: snapshot.customer_id,
            completed_at: Some(snapshot.completed_at),
            items: snapshot.items,
            points_used: snapshot.points_used.max(0),
            subtotal: snapshot.total + discount,
            discount,
            total: snapshot.total,
            points_earned: snapshot.points_earned.max(0),
            policy,
        }
    }

    // -------------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------------

    #[inline]
    pub fn id(&self) -> Option<OrderId> {
        self.id
    }

    #[inline]
    pub fn customer_id(&self) -> Option<CustomerId> {
        self.customer_id
    }

    #[inline]
    pub fn is_guest(&self) -> bool {
        self.customer_id.is_none()
    }

    #[inline]
    pub fn completed_at(&self) -> Option<NaiveDateTime> {
        self.completed_at
    }

    #[inline]
    pub fn is_completed(&self) -> bool {
        self.id.is_some()
    }

    #[inline]
    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    pub fn item(&self, product_id: ProductId) -> Option<&LineItem> {
        self.items.iter().find(|i| i.product_id == product_id)
    }

    #[inline]
    pub fn has_items(&self) -> bool {
        !self.items.is_empty()
    }

    /// Total quantity across all items.
    pub fn item_count(&self) -> i64 {
        self.items
            .iter()
            .fold(0, |count, i| count.saturating_add(i.quantity))
    }

    #[inline]
    pub fn points_used(&self) -> i64 {
        self.points_used
    }

    #[inline]
    pub fn subtotal(&self) -> Money {
        self.subtotal
    }

    #[inline]
    pub fn discount(&self) -> Money {
        self.discount
    }

    #[inline]
    pub fn total(&self) -> Money {
        self.total
    }

    #[inline]
    pub fn points_earned(&self) -> i64 {
        self.points_earned
    }

    #[inline]
    pub fn policy(&self) -> &LoyaltyPolicy {
        &self.policy
    }

    // -------------------------------------------------------------------------
    // Cart Operations
    // -------------------------------------------------------------------------

    /// Adds `quantity` of a product, merging with an existing line.
    ///
    /// ## Errors
    /// `ValidationError` if `quantity <= 0`, `unit_price` is negative, or
    /// the merged quantity or the order subtotal would not fit in an `i64`;
    /// the order is left untouched.
    pub fn add_item(
        &mut self,
        product_id: ProductId,
        name: impl Into<String>,
        unit_price: Money,
        quantity: i64,
    ) -> CoreResult<()> {
        validate_quantity(quantity)?;
        validate_price(unit_price)?;

        let (line_price, line_quantity) = match self.item(product_id) {
            Some(existing) => (
                existing.unit_price,
                existing
                    .quantity
                    .checked_add(quantity)
                    .ok_or_else(|| out_of_range("quantity", 1))?,
            ),
            None => (unit_price, quantity),
        };
        self.subtotal_with(product_id, line_price, line_quantity)?;

        match self.items.iter_mut().find(|i| i.product_id == product_id) {
            Some(existing) => existing.quantity = line_quantity,
            None => self
                .items
                .push(LineItem::new(product_id, name, unit_price, quantity)),
        }

        self.recalculate();
        Ok(())
    }

    /// Looks the product up in `catalog` and adds it with a frozen price.
    pub fn add_from_catalog<C>(
        &mut self,
        catalog: &C,
        product_id: ProductId,
        quantity: i64,
    ) -> CoreResult<()>
    where
        C: Catalog + ?Sized,
    {
        let entry = catalog
            .lookup(product_id)
            .ok_or(CoreError::ProductNotFound(product_id))?;
        self.add_item(product_id, entry.name, entry.unit_price, quantity)
    }

    /// Removes the line for `product_id`.
    ///
    /// ## Returns
    /// `true` if a line was removed.
    pub fn remove_item(&mut self, product_id: ProductId) -> bool {
        let before = self.items.len();
        self.items.retain(|i| i.product_id != product_id);

        if self.items.len() == before {
            return false;
        }
        self.recalculate();
        true
    }

    /// Overwrites the quantity of a line; `quantity <= 0` removes it.
    ///
    /// ## Returns
    /// `false` if no line matches `product_id`, or if the new quantity would
    /// overflow the subtotal (the order is unchanged then). Use
    /// [`try_set_item_quantity`](Self::try_set_item_quantity) to tell the two apart.
    pub fn set_item_quantity(&mut self, product_id: ProductId, quantity: i64) -> bool {
        self.try_set_item_quantity(product_id, quantity)
            .unwrap_or(false)
    }

    /// Like [`set_item_quantity`](Self::set_item_quantity), with overflow
    /// reported as a `ValidationError`.
    pub fn try_set_item_quantity(
        &mut self,
        product_id: ProductId,
        quantity: i64,
    ) -> CoreResult<bool> {
        if quantity <= 0 {
            return Ok(self.remove_item(product_id));
        }

        let Some(unit_price) = self.item(product_id).map(|i| i.unit_price) else {
            return Ok(false);
        };
        self.subtotal_with(product_id, unit_price, quantity)?;

        if let Some(item) = self.items.iter_mut().find(|i| i.product_id == product_id) {
            item.quantity = quantity;
        }
        self.recalculate();
        Ok(true)
    }

    /// Records how many points the customer wants to redeem.
    ///
    /// The ledger balance is NOT checked here; callers gate this with
    /// [`LoyaltyPolicy::can_redeem`] first.
    pub fn set_points_used(&mut self, points: i64) -> CoreResult<()> {
        validate_points(points)?;
        self.points_used = points;
        self.recalculate();
        Ok(())
    }

    /// Attaches a customer (or `None` for guest). Any redemption is reset.
    pub fn set_customer(&mut self, customer_id: Option<CustomerId>) {
        self.customer_id = customer_id;
        self.points_used = 0;
        self.recalculate();
    }

    /// Empties the cart, keeping customer and redemption.
    pub fn clear_items(&mut self) {
        self.items.clear();
        self.recalculate();
    }

    /// Recomputes subtotal, discount, total and points earned.
    ///
    /// Pure function of items, points used and policy; calling it twice in a
    /// row changes nothing.
    pub fn recalculate(&mut self) {
        self.subtotal = self.items.iter().map(LineItem::subtotal).sum();
        self.discount = self.policy.points_value(self.points_used).min(self.subtotal);
        self.total = self.subtotal - self.discount;
        self.points_earned = self.policy.points_for_amount(self.total);
    }

    /// Refreshes item names and unit prices from `catalog`.
    ///
    /// Used when rebuilding history, where the compact record stores only
    /// `product_id:quantity`. Stored totals are not recomputed. Products no
    /// longer in the catalog keep their current snapshot.
    pub fn resolve_items<C>(&mut self, catalog: &C)
    where
        C: Catalog + ?Sized,
    {
        for item in &mut self.items {
            if let Some(entry) = catalog.lookup(item.product_id) {
                item.product_name = entry.name;
                item.unit_price = entry.unit_price;
            }
        }
    }

    pub(crate) fn mark_completed(&mut self, id: OrderId, at: NaiveDateTime) {
        self.id = Some(id);
        self.completed_at = Some(at);
    }

    /// Subtotal with the `product_id` line set to `quantity` × `unit_price`,
    /// or an error when it does not fit.
    fn subtotal_with(
        &self,
        product_id: ProductId,
        unit_price: Money,
        quantity: i64,
    ) -> CoreResult<Money> {
        let line = unit_price
            .checked_multiply_quantity(quantity)
            .ok_or_else(|| out_of_range("line subtotal", 0))?;
        self.items
            .iter()
            .filter(|i| i.product_id != product_id)
            .try_fold(line, |sum, i| sum.checked_add(i.subtotal()))
            .ok_or_else(|| out_of_range("order subtotal", 0))
    }
}

fn out_of_range(field: &str, min: i64) -> CoreError {
    ValidationError::OutOfRange {
        field: field.to_string(),
        min,
        max: i64::MAX,
    }
    .into()
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::CatalogEntry;
    use std::collections::HashMap;

    fn order() -> Order {
        Order::new(LoyaltyPolicy::default())
    }

    fn assert_derived_consistent(order: &Order) {
        let expected: Money = order
            .items()
            .iter()
            .map(|i| i.unit_price.multiply_quantity(i.quantity))
            .sum();
        assert_eq!(order.subtotal(), expected);
        let discount = order
            .policy()
            .points_value(order.points_used())
            .min(order.subtotal());
        assert_eq!(order.discount(), discount);
        assert_eq!(order.total(), order.subtotal() - order.discount());
        assert!(!order.total().is_negative());
        assert_eq!(
            order.points_earned(),
            order.total().whole_units_of(Money::from_major(1000))
        );
    }

    #[test]
    fn test_scenario_redeem_fifty_points() {
        let mut o = order();
        o.add_item(1, "Latte", Money::from_major(15000), 2).unwrap();
        assert_eq!(o.subtotal(), Money::from_major(30000));

        o.set_points_used(50).unwrap();
        assert_eq!(o.discount(), Money::from_major(5000));
        assert_eq!(o.total(), Money::from_major(25000));
        assert_eq!(o.points_earned(), 25);
    }

    #[test]
    fn test_add_same_product_merges() {
        let mut o = order();
        o.add_item(7, "Mocha", Money::from_major(20000), 1).unwrap();
        o.add_item(7, "Mocha", Money::from_major(20000), 1).unwrap();

        assert_eq!(o.items().len(), 1);
        assert_eq!(o.item(7).unwrap().quantity, 2);
        assert_eq!(o.subtotal(), Money::from_major(40000));
    }

    #[test]
    fn test_add_item_keeps_insertion_order() {
        let mut o = order();
        o.add_item(3, "C", Money::from_major(1), 1).unwrap();
        o.add_item(1, "A", Money::from_major(1), 1).unwrap();
        o.add_item(3, "C", Money::from_major(1), 1).unwrap();
        o.add_item(2, "B", Money::from_major(1), 1).unwrap();

        let ids: Vec<_> = o.items().iter().map(|i| i.product_id).collect();
        assert_eq!(ids, vec![3, 1, 2]);
    }

    #[test]
    fn test_add_item_rejects_bad_input() {
        let mut o = order();
        assert!(o.add_item(1, "X", Money::from_major(10), 0).is_err());
        assert!(o.add_item(1, "X", Money::from_major(10), -1).is_err());
        assert!(o.add_item(1, "X", Money::from_minor(-1), 1).is_err());
        assert!(!o.has_items());
        assert_eq!(o.subtotal(), Money::zero());
    }

    #[test]
    fn test_remove_item() {
        let mut o = order();
        o.add_item(1, "A", Money::from_major(1000), 1).unwrap();
        o.add_item(2, "B", Money::from_major(2000), 1).unwrap();

        assert!(o.remove_item(1));
        assert!(!o.remove_item(1));
        assert_eq!(o.subtotal(), Money::from_major(2000));
        assert_derived_consistent(&o);
    }

    #[test]
    fn test_set_item_quantity() {
        let mut o = order();
        o.add_item(1, "A", Money::from_major(1000), 1).unwrap();

        assert!(o.set_item_quantity(1, 5));
        assert_eq!(o.subtotal(), Money::from_major(5000));
        assert!(!o.set_item_quantity(99, 5));

        assert!(o.set_item_quantity(1, 0));
        assert!(!o.has_items());
        assert!(!o.set_item_quantity(1, -3));
    }

    #[test]
    fn test_huge_quantities_are_rejected_without_changes() {
        let mut o = order();
        let err = o
            .add_item(1, "Latte", Money::from_major(15000), 10_000_000_000_000)
            .unwrap_err();
        assert!(matches!(err, CoreError::Validation(ValidationError::OutOfRange { .. })));
        assert!(!o.has_items());

        o.add_item(1, "Latte", Money::zero(), i64::MAX).unwrap();
        assert!(o.add_item(1, "Latte", Money::zero(), 1).is_err());
        assert_eq!(o.item(1).unwrap().quantity, i64::MAX);

        o.add_item(2, "Cake", Money::from_minor(i64::MAX), 1).unwrap();
        assert!(o.add_item(3, "Cookie", Money::from_minor(1), 1).is_err());
        assert!(o.item(3).is_none());
        assert_eq!(o.subtotal(), Money::from_minor(i64::MAX));
        assert_eq!(o.item_count(), i64::MAX);
        assert_derived_consistent(&o);
    }

    #[test]
    fn test_set_quantity_overflow_leaves_line() {
        let mut o = order();
        o.add_item(1, "Latte", Money::from_major(15000), 2).unwrap();

        assert!(o.try_set_item_quantity(1, i64::MAX).is_err());
        assert!(!o.set_item_quantity(1, i64::MAX));
        assert_eq!(o.item(1).unwrap().quantity, 2);
        assert!(!o.try_set_item_quantity(9, 3).unwrap());
        assert!(o.try_set_item_quantity(1, 3).unwrap());
        assert_derived_consistent(&o);
    }

    #[test]
    fn test_huge_redemption_clamps_to_subtotal() {
        let mut o = order();
        o.add_item(1, "Latte", Money::from_major(15000), 1).unwrap();
        o.set_points_used(i64::MAX / 2).unwrap();

        assert_eq!(o.discount(), Money::from_major(15000));
        assert_eq!(o.total(), Money::zero());
        assert_eq!(o.points_earned(), 0);
        assert_derived_consistent(&o);
    }

    #[test]
    fn test_discount_is_capped_at_subtotal() {
        let mut o = order();
        o.add_item(1, "Water", Money::from_major(3000), 1).unwrap();
        o.set_points_used(100).unwrap(); // worth 10000

        assert_eq!(o.discount(), Money::from_major(3000));
        assert_eq!(o.total(), Money::zero());
        assert_eq!(o.points_earned(), 0);
    }

    #[test]
    fn test_negative_points_rejected() {
        let mut o = order();
        o.add_item(1, "A", Money::from_major(5000), 1).unwrap();
        o.set_points_used(20).unwrap();

        assert!(o.set_points_used(-1).is_err());
        assert_eq!(o.points_used(), 20);
    }

    #[test]
    fn test_points_earned_zero_below_threshold() {
        let mut o = order();
        o.add_item(1, "Candy", Money::from_minor(99_999), 1).unwrap();
        assert_eq!(o.points_earned(), 0);
    }

    #[test]
    fn test_recalculate_is_idempotent() {
        let mut o = order();
        o.add_item(1, "A", Money::from_minor(123_456), 3).unwrap();
        o.set_points_used(12).unwrap();

        let before = o.clone();
        o.recalculate();
        o.recalculate();
        assert_eq!(o, before);
    }

    #[test]
    fn test_mutation_sequences_stay_consistent() {
        let mut o = order();
        o.add_item(1, "A", Money::from_major(1500), 2).unwrap();
        assert_derived_consistent(&o);
        o.add_item(2, "B", Money::from_minor(999), 7).unwrap();
        assert_derived_consistent(&o);
        o.set_points_used(15).unwrap();
        assert_derived_consistent(&o);
        o.set_item_quantity(1, 9);
        assert_derived_consistent(&o);
        o.remove_item(2);
        assert_derived_consistent(&o);
        o.set_item_quantity(1, 0);
        assert_derived_consistent(&o);
        assert_eq!(o.total(), Money::zero());
    }

    #[test]
    fn test_set_customer_resets_points() {
        let mut o = order();
        o.add_item(1, "A", Money::from_major(50000), 1).unwrap();
        o.set_customer(Some(4));
        o.set_points_used(30).unwrap();

        o.set_customer(Some(5));
        assert_eq!(o.points_used(), 0);
        assert_eq!(o.discount(), Money::zero());
        assert_eq!(o.customer_id(), Some(5));
    }

    #[test]
    fn test_clear_items() {
        let mut o = order();
        o.add_item(1, "A", Money::from_major(50000), 2).unwrap();
        o.clear_items();
        assert!(!o.has_items());
        assert_eq!(o.total(), Money::zero());
        assert_eq!(o.item_count(), 0);
    }

    #[test]
    fn test_add_from_catalog() {
        let mut catalog = HashMap::new();
        catalog.insert(
            3,
            CatalogEntry {
                name: "Cappuccino".to_string(),
                unit_price: Money::from_major(22000),
            },
        );

        let mut o = order();
        o.add_from_catalog(&catalog, 3, 2).unwrap();
        assert_eq!(o.item(3).unwrap().product_name, "Cappuccino");
        assert_eq!(o.subtotal(), Money::from_major(44000));

        assert!(matches!(
            o.add_from_catalog(&catalog, 9, 1),
            Err(CoreError::ProductNotFound(9))
        ));
    }

    #[test]
    fn test_restore_derives_discount_and_subtotal() {
        let at = chrono::NaiveDate::from_ymd_opt(2024, 5, 1)
            .unwrap()
            .and_hms_opt(9, 30, 0)
            .unwrap();
        let restored = Order::restore(
            OrderSnapshot {
                id: 12,
                customer_id: Some(2),
                completed_at: at,
                total: Money::from_major(25000),
                points_earned: 25,
                points_used: 50,
                items: vec![LineItem::new(1, "", Money::zero(), 2)],
            },
            LoyaltyPolicy::default(),
        );

        assert_eq!(restored.id(), Some(12));
        assert_eq!(restored.discount(), Money::from_major(5000));
        assert_eq!(restored.subtotal(), Money::from_major(30000));
        assert_eq!(restored.total(), Money::from_major(25000));
        assert!(restored.is_completed());
    }
}
