//! # Checkout
//!
//! Turns the open cart into a completed order and applies its loyalty
//! effects to the ledger.
//!
//! ## Completion Sequence
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  complete_order(cart, ledger, ids, now)                                 │
//! │                                                                         │
//! │  1. cart empty? ───────────────────────────────► Err(EmptyOrder)        │
//! │  2. recalculate()                                                       │
//! │  3. points_used > 0 ? ledger.debit() ── fails ─► Err(..), no effects    │
//! │  4. id = ids.next(), timestamp = now                                    │
//! │  5. points_earned > 0 && customer? ledger.credit()                      │
//! │  6. return completed order, cart = fresh guest order                    │
//! │                                                                         │
//! │  The debit is the only step that can fail after validation, and it     │
//! │  runs before anything else is touched.                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::NaiveDateTime;
use tracing::{info, warn};

use crate::error::{CoreError, CoreResult};
use crate::ids::IdSequence;
use crate::order::Order;
use crate::ports::CustomerLedger;

/// Completes `cart` and replaces it with a new empty guest order.
///
/// ## Returns
/// The completed order, ready to be appended to history.
///
/// ## Errors
/// - [`CoreError::EmptyOrder`] when the cart has no items
/// - [`CoreError::GuestCannotRedeem`] when a guest cart carries points
/// - whatever the ledger's debit reports (unknown customer, below minimum,
///   insufficient balance)
///
/// On error the cart, the ledger and `ids` are unchanged.
pub fn complete_order<L>(
    cart: &mut Order,
    ledger: &mut L,
    ids: &mut IdSequence,
    completed_at: NaiveDateTime,
) -> CoreResult<Order>
where
    L: CustomerLedger + ?Sized,
{
    if !cart.has_items() {
        return Err(CoreError::EmptyOrder);
    }

    cart.recalculate();
    let policy = *cart.policy();

    let points_used = cart.points_used();
    if points_used > 0 {
        let customer_id = cart.customer_id().ok_or(CoreError::GuestCannotRedeem)?;
        ledger.debit(customer_id, points_used, &policy)?;
    }

    let order_id = ids.next();
    cart.mark_completed(order_id, completed_at);

    let points_earned = cart.points_earned();
    if let Some(customer_id) = cart.customer_id() {
        if points_earned > 0 {
            if let Err(err) = ledger.credit(customer_id, points_earned) {
                warn!(order_id, customer_id, error = %err, "Failed to credit earned points");
            }
        }
    }

    info!(
        order_id,
        customer_id = ?cart.customer_id(),
        total = %cart.total(),
        points_used,
        points_earned,
        "Order completed"
    );

    Ok(std::mem::replace(cart, Order::new(policy)))
}
