//! # Brew CLI Library
//!
//! Everything behind the `brew` binary: argument parsing, logging setup and
//! command dispatch.
//!
//! ## Module Organization
//! ```text
//! brew_cli_lib/
//! ├── lib.rs          ◄─── You are here (CLI setup & run)
//! ├── state/
//! │   ├── mod.rs      ◄─── State type exports
//! │   ├── register.rs ◄─── Open store + current cart
//! │   └── config.rs   ◄─── Configuration state
//! ├── commands/
//! │   ├── mod.rs      ◄─── Command dispatch
//! │   ├── product.rs  ◄─── Catalog commands
//! │   ├── customer.rs ◄─── Member and points commands
//! │   ├── cart.rs     ◄─── Cart view + interactive register
//! │   ├── sale.rs     ◄─── Checkout and history commands
//! │   └── config.rs   ◄─── Config command
//! └── error.rs        ◄─── API error type for commands
//! ```
//!
//! ## Output
//! Successful commands print pretty JSON on stdout. Failures print the
//! `ApiError` JSON on stderr and exit with status 1. Logs go to stderr so
//! stdout stays machine readable.

pub mod commands;
pub mod error;
pub mod state;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use commands::{CommandResult, Commands};
use state::{ConfigState, RegisterState};

/// Point of sale register for a coffee shop.
#[derive(Debug, Parser)]
#[command(name = "brew", version, about)]
pub struct Cli {
    /// Directory holding products.txt, customers.txt and transactions.txt
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Runs the CLI.
///
/// ## Startup Sequence
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │                       Command Startup                                   │
/// │                                                                         │
/// │  1. Parse Arguments ──────────────────────────────────────────────────► │
/// │     • clap derive, `--help` and usage errors exit here                  │
/// │                                                                         │
/// │  2. Initialize Logging ───────────────────────────────────────────────► │
/// │     • tracing-subscriber with env filter, written to stderr             │
/// │                                                                         │
/// │  3. Build ConfigState ────────────────────────────────────────────────► │
/// │     • BREW_* environment, then --data-dir                               │
/// │                                                                         │
/// │  4. Open the Store ───────────────────────────────────────────────────► │
/// │     • Load the three data files (skipped for `config`)                  │
/// │                                                                         │
/// │  5. Run the Command ──────────────────────────────────────────────────► │
/// │     • Print the JSON result, map errors to the exit status              │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
pub fn run() -> ExitCode {
    let cli = Cli::parse();
    init_tracing();

    let config = ConfigState::from_env().with_data_dir(cli.data_dir);
    debug!(data_dir = %config.data_dir.display(), "Configuration resolved");

    match execute(cli.command, &config) {
        Ok(value) => {
            match serde_json::to_string_pretty(&value) {
                Ok(text) => println!("{}", text),
                Err(_) => println!("{}", value),
            }
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("{}", err.to_json());
            ExitCode::FAILURE
        }
    }
}

/// Opens the register when the command needs it and runs the command.
pub fn execute(command: Commands, config: &ConfigState) -> CommandResult {
    if let Commands::Config = command {
        return commands::config::get_config(config);
    }

    let mut register = RegisterState::open(config)?;
    info!(
        products = register.store().products.count(),
        customers = register.store().customers.count(),
        transactions = register.store().orders.count(),
        "Store opened"
    );
    command.run(&mut register, config)
}

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=brew_store=trace` - Show trace for the store crate only
/// - Default: WARN, with brew crates at INFO
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn,brew_core=info,brew_store=info,brew_cli_lib=info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use tempfile::TempDir;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_data_dir_flag_is_global() {
        let cli = Cli::try_parse_from(["brew", "product", "list", "--data-dir", "/tmp/shop"]).unwrap();
        assert_eq!(cli.data_dir, Some(PathBuf::from("/tmp/shop")));
    }

    #[test]
    fn test_execute_against_temp_dir() {
        let temp = TempDir::new().expect("Failed to create temp dir");
        let config = ConfigState {
            data_dir: temp.path().join("shop"),
            ..Default::default()
        };

        let cli = Cli::try_parse_from(["brew", "customer", "add", "--name", "Ayu"]).unwrap();
        let added = execute(cli.command, &config).unwrap();
        assert_eq!(added["id"], 1);
        assert!(temp.path().join("shop").join("customers.txt").exists());

        let cli = Cli::try_parse_from(["brew", "config"]).unwrap();
        let shown = execute(cli.command, &config).unwrap();
        assert_eq!(shown["storeName"], "Brew Coffee House");
    }
}
