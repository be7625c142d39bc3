//! # Sale Commands
//!
//! One-shot checkout and transaction history.
//!
//! ```text
//! brew sale checkout --customer 1 --item 3x2 --item 5 --redeem 20 [--dry-run]
//! brew sale history [--customer 1] [--from 2024-03-01] [--to 2024-03-31] [--recent 10]
//! brew sale revenue [--from ..] [--to ..]
//! brew sale show <id>
//! ```
//!
//! Checkout rings the items into a fresh cart with the same checks as the
//! interactive register, then completes it and saves every data file.

use std::str::FromStr;

use brew_core::{CustomerId, CustomerLedger, Order, OrderId, ProductId};
use brew_store::HistoryFilter;
use chrono::NaiveDate;
use clap::{Args, Subcommand};
use serde::Serialize;
use tracing::debug;

use super::cart::OrderResponse;
use super::{respond, CommandResult};
use crate::error::ApiError;
use crate::state::{ConfigState, RegisterState};

#[derive(Debug, Args)]
pub struct SaleCommand {
    #[command(subcommand)]
    command: SaleSubcommand,
}

#[derive(Debug, Subcommand)]
enum SaleSubcommand {
    /// Ring up and complete a sale
    Checkout {
        /// Member id; omit for a guest sale
        #[arg(long)]
        customer: Option<CustomerId>,

        /// PRODUCT or PRODUCTxQTY, repeatable
        #[arg(long = "item", required = true)]
        items: Vec<ItemSpec>,

        /// Points to redeem
        #[arg(long, default_value_t = 0)]
        redeem: i64,

        /// Show the totals without completing
        #[arg(long)]
        dry_run: bool,
    },

    /// List completed transactions, oldest first
    History {
        #[command(flatten)]
        filter: FilterArgs,

        #[arg(long)]
        customer: Option<CustomerId>,

        /// Only the N newest, newest first
        #[arg(long)]
        recent: Option<usize>,
    },

    /// Sum up completed transactions
    Revenue {
        #[command(flatten)]
        filter: FilterArgs,
    },

    /// Show one transaction
    Show { id: OrderId },
}

#[derive(Debug, Clone, Default, Args)]
struct FilterArgs {
    /// First day included (YYYY-MM-DD)
    #[arg(long)]
    from: Option<NaiveDate>,

    /// Last day included (YYYY-MM-DD)
    #[arg(long)]
    to: Option<NaiveDate>,
}

impl FilterArgs {
    fn to_filter(&self) -> Result<HistoryFilter, ApiError> {
        if let (Some(from), Some(to)) = (self.from, self.to) {
            if from > to {
                return Err(ApiError::validation(format!(
                    "--from {} is after --to {}",
                    from, to
                )));
            }
        }
        Ok(HistoryFilter {
            from: self.from,
            to: self.to,
            ..Default::default()
        })
    }
}

/// `--item` value: a product id with an optional `x<quantity>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ItemSpec {
    pub product_id: ProductId,
    pub quantity: i64,
}

impl FromStr for ItemSpec {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (id, qty) = match s.split_once(['x', 'X']) {
            Some((id, qty)) => (id, qty),
            None => (s, "1"),
        };
        let product_id = id
            .trim()
            .parse::<ProductId>()
            .map_err(|_| format!("invalid product id in '{}'", s))?;
        let quantity = qty
            .trim()
            .parse::<i64>()
            .map_err(|_| format!("invalid quantity in '{}'", s))?;
        if quantity <= 0 {
            return Err(format!("quantity must be positive in '{}'", s));
        }
        Ok(ItemSpec {
            product_id,
            quantity,
        })
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CheckoutResponse {
    completed: bool,
    order: OrderResponse,
    #[serde(skip_serializing_if = "Option::is_none")]
    customer_balance: Option<i64>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct HistoryResponse {
    count: usize,
    revenue: String,
    orders: Vec<OrderResponse>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RevenueResponse {
    orders: usize,
    revenue: String,
    discounts: String,
    points_issued: i64,
    points_redeemed: i64,
}

pub fn run(command: SaleCommand, register: &mut RegisterState, config: &ConfigState) -> CommandResult {
    match command.command {
        SaleSubcommand::Checkout {
            customer,
            items,
            redeem,
            dry_run,
        } => {
            if let Err(err) = ring_up(register, customer, &items, redeem) {
                register.cancel();
                return Err(err);
            }

            if dry_run {
                debug!("Dry run, cart left uncompleted");
                let response = CheckoutResponse {
                    completed: false,
                    order: OrderResponse::new(register.cart(), config),
                    customer_balance: customer
                        .and_then(|id| register.store().customers.balance(id)),
                };
                register.cancel();
                return respond(&response);
            }

            let order = register.complete()?;
            respond(&CheckoutResponse {
                completed: true,
                order: OrderResponse::new(&order, config),
                customer_balance: order
                    .customer_id()
                    .and_then(|id| register.store().customers.balance(id)),
            })
        }
        SaleSubcommand::History {
            filter,
            customer,
            recent,
        } => {
            let filter = HistoryFilter {
                customer_id: customer,
                recent,
                ..filter.to_filter()?
            };
            let orders = register.store().orders.find(&filter);
            respond(&HistoryResponse {
                count: orders.len(),
                revenue: config.format_currency(orders.iter().map(|o| o.total()).sum()),
                orders: orders
                    .into_iter()
                    .map(|o| OrderResponse::new(o, config))
                    .collect(),
            })
        }
        SaleSubcommand::Revenue { filter } => {
            let orders = register.store().orders.find(&filter.to_filter()?);
            respond(&RevenueResponse {
                orders: orders.len(),
                revenue: config.format_currency(orders.iter().map(|o| o.total()).sum()),
                discounts: config.format_currency(orders.iter().map(|o| o.discount()).sum()),
                points_issued: orders
                    .iter()
                    .fold(0, |sum, o| sum.saturating_add(o.points_earned())),
                points_redeemed: orders
                    .iter()
                    .fold(0, |sum, o| sum.saturating_add(o.points_used())),
            })
        }
        SaleSubcommand::Show { id } => {
            let order: &Order = register
                .store()
                .orders
                .get(id)
                .ok_or_else(|| ApiError::not_found("Transaction", id))?;
            respond(&OrderResponse::new(order, config))
        }
    }
}

fn ring_up(
    register: &mut RegisterState,
    customer: Option<CustomerId>,
    items: &[ItemSpec],
    redeem: i64,
) -> Result<(), ApiError> {
    register.set_customer(customer)?;
    for item in items {
        register.add_to_cart(item.product_id, item.quantity)?;
    }
    register.set_points_to_use(redeem)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use brew_core::Money;
    use clap::Parser;
    use tempfile::TempDir;

    #[derive(Debug, Parser)]
    struct TestCli {
        #[command(subcommand)]
        command: SaleSubcommand,
    }

    fn setup() -> (RegisterState, ConfigState, TempDir) {
        let temp = TempDir::new().expect("Failed to create temp dir");
        let config = ConfigState {
            data_dir: temp.path().to_path_buf(),
            ..Default::default()
        };
        let mut reg = RegisterState::open(&config).unwrap();
        let store = reg.store_mut();
        store
            .products
            .create_coffee("Latte", Money::from_major(15000), "double")
            .unwrap();
        store
            .products
            .create_snack("Donut", Money::from_major(9000), "pastry")
            .unwrap();
        let ayu = store.customers.create_customer("Ayu", "0812").unwrap();
        store.customers.credit(ayu.id, 100).unwrap();
        store.customers.create_customer("Budi", "0813").unwrap();
        (reg, config, temp)
    }

    fn exec(register: &mut RegisterState, config: &ConfigState, args: &[&str]) -> CommandResult {
        let parsed = TestCli::try_parse_from(std::iter::once("sale").chain(args.iter().copied()))
            .expect("arguments should parse");
        run(
            SaleCommand {
                command: parsed.command,
            },
            register,
            config,
        )
    }

    fn at(day: u32) -> chrono::NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, day)
            .unwrap()
            .and_hms_opt(9, 30, 0)
            .unwrap()
    }

    #[test]
    fn test_item_spec_parsing() {
        assert_eq!(
            "3x2".parse::<ItemSpec>(),
            Ok(ItemSpec {
                product_id: 3,
                quantity: 2
            })
        );
        assert_eq!("7".parse::<ItemSpec>().unwrap().quantity, 1);
        assert!("x2".parse::<ItemSpec>().is_err());
        assert!("3x0".parse::<ItemSpec>().is_err());
        assert!("3xmany".parse::<ItemSpec>().is_err());
    }

    #[test]
    fn test_checkout_completes_and_persists() {
        let (mut reg, config, _temp) = setup();

        let result = exec(
            &mut reg,
            &config,
            &["checkout", "--customer", "1", "--item", "1x2", "--item", "2", "--redeem", "20"],
        )
        .unwrap();

        assert_eq!(result["completed"], true);
        assert_eq!(result["order"]["id"], 1);
        assert_eq!(result["order"]["total"], "Rp37000");
        assert_eq!(result["order"]["pointsEarned"], 37);
        assert_eq!(result["customerBalance"], 117);

        let reopened = RegisterState::open(&config).unwrap();
        assert_eq!(reopened.store().orders.count(), 1);
        assert_eq!(reopened.store().customers.balance(1), Some(117));
    }

    #[test]
    fn test_dry_run_and_rejected_checkout_change_nothing() {
        let (mut reg, config, _temp) = setup();

        let preview = exec(&mut reg, &config, &["checkout", "--item", "1", "--dry-run"]).unwrap();
        assert_eq!(preview["completed"], false);
        assert!(preview["order"].get("id").is_none());

        let err = exec(&mut reg, &config, &["checkout", "--customer", "2", "--item", "1", "--redeem", "10"])
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::LoyaltyError);

        let err = exec(&mut reg, &config, &["checkout", "--item", "1", "--item", "42"]).unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);

        assert_eq!(reg.store().orders.count(), 0);
        assert!(!reg.cart().has_items());
        assert!(TestCli::try_parse_from(["sale", "checkout", "--customer", "1"]).is_err());
    }

    #[test]
    fn test_oversized_quantity_is_rejected() {
        let (mut reg, config, _temp) = setup();

        let err = exec(&mut reg, &config, &["checkout", "--item", "1x10000000000000"]).unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);

        let err = exec(
            &mut reg,
            &config,
            &["checkout", "--item", "2x6000000000000", "--item", "2x6000000000000"],
        )
        .unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);

        assert_eq!(reg.store().orders.count(), 0);
        assert!(!reg.cart().has_items());
    }

    #[test]
    fn test_history_and_revenue() {
        let (mut reg, config, _temp) = setup();
        for (day, customer) in [(1, Some(1)), (5, None), (9, Some(1))] {
            reg.set_customer(customer).unwrap();
            reg.add_to_cart(1, 1).unwrap();
            reg.complete_at(at(day)).unwrap();
        }

        let all = exec(&mut reg, &config, &["history"]).unwrap();
        assert_eq!(all["count"], 3);
        assert_eq!(all["revenue"], "Rp45000");
        assert_eq!(all["orders"][0]["completedAt"], "2024-03-01 09:30:00");

        let ayu = exec(&mut reg, &config, &["history", "--customer", "1", "--recent", "1"]).unwrap();
        assert_eq!(ayu["count"], 1);
        assert_eq!(ayu["orders"][0]["id"], 3);

        let window = exec(&mut reg, &config, &["revenue", "--from", "2024-03-02", "--to", "2024-03-09"]).unwrap();
        assert_eq!(window["orders"], 2);
        assert_eq!(window["revenue"], "Rp30000");
        assert_eq!(window["pointsIssued"], 30);

        let err = exec(&mut reg, &config, &["revenue", "--from", "2024-03-09", "--to", "2024-03-02"]).unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);

        let err = exec(&mut reg, &config, &["show", "8"]).unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
        let shown = exec(&mut reg, &config, &["show", "2"]).unwrap();
        assert_eq!(shown["customerId"], serde_json::Value::Null);
    }
}
