//! # State Module
//!
//! State the commands work against.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    State Architecture                                   │
//! │                                                                         │
//! │  ┌──────────────────────────────┐   ┌──────────────────────────────┐   │
//! │  │        ConfigState           │   │        RegisterState         │   │
//! │  │                              │   │                              │   │
//! │  │  data_dir                    │──►│  Store (3 repositories)      │   │
//! │  │  store_name, currency        │   │  cart: Order                 │   │
//! │  │  loyalty numbers             │   │                              │   │
//! │  └──────────────────────────────┘   └──────────────────────────────┘   │
//! │                                                                         │
//! │  Single-threaded: commands take `&mut RegisterState` directly.          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod config;
mod register;

pub use config::ConfigState;
pub use register::RegisterState;
