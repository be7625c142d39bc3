//! # Brew CLI Entry Point
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        brew (command line)                              │
//! │                                                                         │
//! │  main.rs ────► hands off to brew_cli_lib::run                           │
//! │                                                                         │
//! │  lib.rs ─────► parses arguments, sets up logging and config             │
//! │                                                                         │
//! │  commands/ ──► product, customer, sale, register, config                │
//! │                                                                         │
//! │  state/ ─────► RegisterState, ConfigState                               │
//! │                              │                                          │
//! │                              ▼                                          │
//! │  data dir: products.txt  customers.txt  transactions.txt                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::process::ExitCode;

fn main() -> ExitCode {
    // The actual setup is in lib.rs for better testability
    brew_cli_lib::run()
}
