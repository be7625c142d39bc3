//! # brew-store: Flat-file Persistence Layer for Brew POS
//!
//! Keeps the catalog, the loyalty members and the transaction history in
//! memory and mirrors them to three `|` delimited text files.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    brew-store Architecture                              │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                         Store                                   │   │
//! │  │  products: ProductRepository   (impl Catalog)                   │   │
//! │  │  customers: CustomerRepository (impl CustomerLedger)            │   │
//! │  │  orders: OrderRepository       (append-only history)            │   │
//! │  └───────────────────────────┬─────────────────────────────────────┘   │
//! │                              │ Repository<T: Record>                   │
//! │  ┌───────────────────────────▼─────────────────────────────────────┐   │
//! │  │  record: Product / Customer / Order  ⇄  one line each           │   │
//! │  │  data_dir: csv reader/writer, '|' delimiter, '#' comments       │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust,ignore
//! use brew_store::{Store, StoreConfig};
//!
//! let mut store = Store::open(StoreConfig::new("data"))?;
//! let mut cart = store.new_cart();
//! cart.add_from_catalog(&store.products, 1, 2)?;
//! let order = store.complete_order(&mut cart, chrono::Local::now().naive_local())?;
//! store.save_all()?;
//! ```

pub mod data_dir;
pub mod error;
pub mod record;
pub mod repository;
pub mod store;

pub use data_dir::DataDir;
pub use error::{DecodeError, StoreError, StoreResult};
pub use record::Record;
pub use repository::{
    CustomerRepository, HistoryFilter, LoadSummary, OrderRepository, ProductRepository,
};
pub use store::{Store, StoreConfig, DEFAULT_DATA_DIR};
