//! # Cart Commands
//!
//! The cart view shared by every sale command and the interactive register.
//!
//! ## Register Session
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  $ brew register                                                        │
//! │  customer 1          → cart view                                        │
//! │  add 3 2             → cart view (2 × product 3)                        │
//! │  qty 3 1             → cart view                                        │
//! │  redeem 20           → cart view, discount applied                      │
//! │  checkout            → completed order, files saved, new guest cart     │
//! │  quit                                                                   │
//! │                                                                         │
//! │  One JSON line per input line. Errors are printed the same way and     │
//! │  leave the cart as it was. Blank lines and `#` comments are ignored.   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::io::{BufRead, Write};

use brew_core::{CustomerId, LineItem, Order, OrderId, ProductId};
use brew_store::record::DATE_TIME_FORMAT;
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::{debug, info};

use super::{respond, CommandResult};
use crate::error::ApiError;
use crate::state::{ConfigState, RegisterState};

// =============================================================================
// Responses
// =============================================================================

/// One cart line as shown to the operator.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LineResponse {
    pub product_id: ProductId,
    pub name: String,
    pub unit_price: String,
    pub quantity: i64,
    pub subtotal: String,
}

impl LineResponse {
    fn new(item: &LineItem, config: &ConfigState) -> Self {
        LineResponse {
            product_id: item.product_id,
            name: item.product_name.clone(),
            unit_price: config.format_currency(item.unit_price),
            quantity: item.quantity,
            subtotal: config.format_currency(item.subtotal()),
        }
    }
}

/// An open cart or a completed transaction.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<OrderId>,
    pub customer_id: Option<CustomerId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<String>,
    pub items: Vec<LineResponse>,
    pub item_count: i64,
    pub subtotal: String,
    pub discount: String,
    pub total: String,
    pub points_used: i64,
    pub points_earned: i64,
}

impl OrderResponse {
    pub fn new(order: &Order, config: &ConfigState) -> Self {
        OrderResponse {
            id: order.id(),
            customer_id: order.customer_id(),
            completed_at: order
                .completed_at()
                .map(|at| at.format(DATE_TIME_FORMAT).to_string()),
            items: order
                .items()
                .iter()
                .map(|item| LineResponse::new(item, config))
                .collect(),
            item_count: order.item_count(),
            subtotal: config.format_currency(order.subtotal()),
            discount: config.format_currency(order.discount()),
            total: config.format_currency(order.total()),
            points_used: order.points_used(),
            points_earned: order.points_earned(),
        }
    }
}

// =============================================================================
// Register Session
// =============================================================================

/// One line typed at the register.
#[derive(Debug, Parser)]
#[command(multicall = true)]
struct RegisterLine {
    #[command(subcommand)]
    command: CartCommand,
}

#[derive(Debug, Subcommand)]
enum CartCommand {
    /// Add a product to the cart
    Add {
        product_id: ProductId,
        #[arg(default_value_t = 1)]
        quantity: i64,
    },

    /// Remove a product line
    Remove { product_id: ProductId },

    /// Set a line's quantity; 0 or less removes it
    #[command(visible_alias = "qty")]
    Quantity {
        product_id: ProductId,
        #[arg(allow_negative_numbers = true)]
        quantity: i64,
    },

    /// Attach a member, or go back to guest without an id
    Customer { customer_id: Option<CustomerId> },

    /// Redeem points against the cart; 0 clears
    Redeem { points: i64 },

    /// Show the cart
    Show,

    /// Remove every line
    Clear,

    /// Complete the sale and save
    Checkout,

    /// Drop the cart
    Cancel,

    /// End the session
    #[command(visible_alias = "exit")]
    Quit,
}

enum Step {
    Continue(CommandResult),
    Quit,
}

fn apply(command: CartCommand, register: &mut RegisterState, config: &ConfigState) -> Step {
    let result = match command {
        CartCommand::Add {
            product_id,
            quantity,
        } => register.add_to_cart(product_id, quantity),
        CartCommand::Remove { product_id } => register.remove_from_cart(product_id),
        CartCommand::Quantity {
            product_id,
            quantity,
        } => register.update_quantity(product_id, quantity),
        CartCommand::Customer { customer_id } => register.set_customer(customer_id),
        CartCommand::Redeem { points } => register.set_points_to_use(points),
        CartCommand::Show => Ok(()),
        CartCommand::Clear => {
            register.clear_cart();
            Ok(())
        }
        CartCommand::Checkout => {
            return Step::Continue(
                register
                    .complete()
                    .and_then(|order| respond(&OrderResponse::new(&order, config))),
            );
        }
        CartCommand::Cancel => {
            register.cancel();
            Ok(())
        }
        CartCommand::Quit => return Step::Quit,
    };

    Step::Continue(result.and_then(|()| respond(&OrderResponse::new(register.cart(), config))))
}

fn write_line<W: Write, T: Serialize>(output: &mut W, body: &T) -> Result<(), ApiError> {
    let line = serde_json::to_string(body)
        .map_err(|e| ApiError::internal(format!("Failed to serialize response: {}", e)))?;
    writeln!(output, "{}", line).map_err(|e| ApiError::internal(format!("Failed to write output: {}", e)))
}

/// Runs register commands read from `input` until `quit` or end of input.
///
/// An unfinished cart is cancelled when the session ends. Returns the ids
/// of the orders completed during the session.
pub fn run_session<R, W>(
    register: &mut RegisterState,
    config: &ConfigState,
    input: R,
    mut output: W,
) -> CommandResult
where
    R: BufRead,
    W: Write,
{
    info!(store = %config.store_name, "Register session started");
    let mut order_ids: Vec<OrderId> = Vec::new();

    for line in input.lines() {
        let line = line.map_err(|e| ApiError::internal(format!("Failed to read input: {}", e)))?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let command = match RegisterLine::try_parse_from(trimmed.split_whitespace()) {
            Ok(parsed) => parsed.command,
            Err(err) => {
                debug!(line = trimmed, "Unparsed register line");
                let message = err.render().to_string();
                let first = message.lines().next().unwrap_or_default();
                write_line(&mut output, &ApiError::validation(first.trim_start_matches("error: ")))?;
                continue;
            }
        };

        match apply(command, register, config) {
            Step::Quit => break,
            Step::Continue(Ok(value)) => {
                if let Some(id) = value.get("id").and_then(|id| id.as_u64()) {
                    order_ids.push(id as OrderId);
                }
                write_line(&mut output, &value)?;
            }
            Step::Continue(Err(err)) => write_line(&mut output, &err)?,
        }
    }

    register.cancel();
    info!(orders = order_ids.len(), "Register session ended");
    respond(&serde_json::json!({
        "ordersCompleted": order_ids.len(),
        "orderIds": order_ids,
    }))
}
