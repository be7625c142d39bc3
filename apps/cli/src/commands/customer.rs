//! # Customer Commands
//!
//! Loyalty member maintenance and balance lookups.
//!
//! ```text
//! brew customer list
//! brew customer add --name "Ayu Lestari" [--phone 0812-1000-2001]
//! brew customer search <term>          case-insensitive, part of the name
//! brew customer find-phone <phone>
//! brew customer update <id> [--name ..] [--phone ..]
//! brew customer remove <id>
//! brew customer points <id> [--add N]
//! ```

use brew_core::{Customer, CustomerId, CustomerLedger};
use clap::{Args, Subcommand};
use serde::Serialize;
use tracing::debug;

use super::{respond, CommandResult};
use crate::error::ApiError;
use crate::state::{ConfigState, RegisterState};

#[derive(Debug, Args)]
pub struct CustomerCommand {
    #[command(subcommand)]
    command: CustomerSubcommand,
}

#[derive(Debug, Subcommand)]
enum CustomerSubcommand {
    /// List all members
    List,

    /// Register a new member with 0 points
    Add {
        #[arg(long)]
        name: String,

        #[arg(long, default_value = "")]
        phone: String,
    },

    /// Find members by part of their name
    Search { term: String },

    /// Find a member by phone number
    FindPhone { phone: String },

    /// Change name or phone; the balance is kept
    Update {
        id: CustomerId,

        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        phone: Option<String>,
    },

    /// Remove a member
    Remove { id: CustomerId },

    /// Show a member's points, optionally crediting some first
    Points {
        id: CustomerId,

        /// Points to credit manually
        #[arg(long)]
        add: Option<i64>,
    },
}

/// Customer as shown to the operator.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerResponse {
    pub id: CustomerId,
    pub name: String,
    pub phone: String,
    pub loyalty_points: i64,
}

impl From<&Customer> for CustomerResponse {
    fn from(customer: &Customer) -> Self {
        CustomerResponse {
            id: customer.id,
            name: customer.name.clone(),
            phone: customer.phone.clone(),
            loyalty_points: customer.loyalty_points(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CustomerListResponse {
    count: usize,
    customers: Vec<CustomerResponse>,
}

impl<'a> FromIterator<&'a Customer> for CustomerListResponse {
    fn from_iter<I: IntoIterator<Item = &'a Customer>>(iter: I) -> Self {
        let customers: Vec<CustomerResponse> = iter.into_iter().map(Into::into).collect();
        CustomerListResponse {
            count: customers.len(),
            customers,
        }
    }
}

/// Balance and what it is worth at the counter.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PointsResponse {
    customer_id: CustomerId,
    name: String,
    loyalty_points: i64,
    redeemable_value: String,
    can_redeem: bool,
}

pub fn run(command: CustomerCommand, register: &mut RegisterState, config: &ConfigState) -> CommandResult {
    let policy = *register.store().policy();
    let customers = &mut register.store_mut().customers;

    match command.command {
        CustomerSubcommand::List => respond(&customers.all().iter().collect::<CustomerListResponse>()),
        CustomerSubcommand::Add { name, phone } => {
            let customer = customers.create_customer(&name, &phone)?;
            customers.save()?;
            respond(&CustomerResponse::from(&customer))
        }
        CustomerSubcommand::Search { term } => {
            debug!(%term, "customer search command");
            let found = customers.search_by_name(&term)?;
            respond(&found.into_iter().collect::<CustomerListResponse>())
        }
        CustomerSubcommand::FindPhone { phone } => {
            let customer = customers
                .get_by_phone(&phone)
                .ok_or_else(|| ApiError::not_found("Customer with phone", phone.trim()))?;
            respond(&CustomerResponse::from(customer))
        }
        CustomerSubcommand::Update { id, name, phone } => {
            let customer = customers.update_details(id, name.as_deref(), phone.as_deref())?;
            customers.save()?;
            respond(&CustomerResponse::from(&customer))
        }
        CustomerSubcommand::Remove { id } => {
            if !customers.remove(id) {
                return Err(ApiError::not_found("Customer", id));
            }
            customers.save()?;
            respond(&serde_json::json!({ "removed": id }))
        }
        CustomerSubcommand::Points { id, add } => {
            if let Some(points) = add {
                customers.credit(id, points)?;
                customers.save()?;
            }

            let customer = customers
                .get(id)
                .ok_or_else(|| ApiError::not_found("Customer", id))?;
            let balance = customer.loyalty_points();
            respond(&PointsResponse {
                customer_id: id,
                name: customer.name.clone(),
                loyalty_points: balance,
                redeemable_value: config.format_currency(policy.points_value(balance)),
                can_redeem: balance >= policy.min_redeem_points,
            })
        }
    }
}
