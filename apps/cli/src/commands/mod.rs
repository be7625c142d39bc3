//! # Commands Module
//!
//! Every `brew` subcommand, one module per area.
//!
//! ## Command Organization
//! ```text
//! commands/
//! ├── mod.rs       ◄─── You are here (dispatch + shared helpers)
//! ├── product.rs   ◄─── Catalog list / add / update / remove
//! ├── customer.rs  ◄─── Members, search, points
//! ├── cart.rs      ◄─── Cart views and the interactive register
//! ├── sale.rs      ◄─── Checkout, history, revenue
//! └── config.rs    ◄─── Effective configuration
//! ```
//!
//! ## How Commands Work
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  brew customer search ayu                                               │
//! │         │                                                               │
//! │         ▼  clap derive                                                  │
//! │  Commands::Customer(CustomerCommand { Search { term } })                │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  customer::run(command, &mut RegisterState, &ConfigState)               │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  Result<serde_json::Value, ApiError>                                    │
//! │     Ok  → pretty JSON on stdout                                         │
//! │     Err → {"code", "message"} on stderr, exit status 1                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod cart;
pub mod config;
pub mod customer;
pub mod product;
pub mod sale;

use clap::Subcommand;
use serde::Serialize;
use serde_json::Value;

use crate::error::ApiError;
use crate::state::{ConfigState, RegisterState};

/// What every command hands back to `main`.
pub type CommandResult = Result<Value, ApiError>;

/// Top-level subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Manage the product catalog
    Product(product::ProductCommand),

    /// Manage loyalty members
    Customer(customer::CustomerCommand),

    /// Check out carts and read transaction history
    Sale(sale::SaleCommand),

    /// Run an interactive register session on stdin
    Register,

    /// Show the effective configuration
    Config,
}

impl Commands {
    /// Runs the command against an opened register.
    pub fn run(self, register: &mut RegisterState, config: &ConfigState) -> CommandResult {
        match self {
            Commands::Product(command) => product::run(command, register, config),
            Commands::Customer(command) => customer::run(command, register, config),
            Commands::Sale(command) => sale::run(command, register, config),
            Commands::Register => {
                let stdin = std::io::stdin();
                let stdout = std::io::stdout();
                cart::run_session(register, config, stdin.lock(), stdout.lock())
            }
            Commands::Config => config::get_config(config),
        }
    }
}

/// Serializes a response body.
pub(crate) fn respond<T: Serialize>(body: &T) -> CommandResult {
    serde_json::to_value(body)
        .map_err(|e| ApiError::internal(format!("Failed to serialize response: {}", e)))
}
