//! # Seed Data Generator
//!
//! Populates a data directory with a demo menu and a few loyalty members.
//!
//! ## Usage
//! ```bash
//! # Seed ./data
//! cargo run -p brew-store --bin seed
//!
//! # Seed another directory and give every member opening points
//! cargo run -p brew-store --bin seed -- --data-dir /tmp/brew --points 50
//! ```
//!
//! ## Generated Data
//! - Coffee drinks with their shot size
//! - Snacks grouped by category
//! - Members with a name, phone and opening balance
//!
//! Seeding is skipped when the directory already has products.

use std::path::PathBuf;

use brew_core::{CustomerLedger, Money};
use brew_store::{Store, StoreConfig, DEFAULT_DATA_DIR};
use clap::Parser;
use tracing_subscriber::EnvFilter;

/// Coffee menu: name, price in whole currency units, shot size.
const COFFEES: &[(&str, i64, &str)] = &[
    ("Espresso", 15000, "single"),
    ("Doppio", 20000, "double"),
    ("Americano", 18000, "double"),
    ("Cappuccino", 25000, "double"),
    ("Flat White", 28000, "double"),
    ("Caffe Latte", 25000, "single"),
    ("Mocha", 30000, "double"),
    ("Kopi Susu Gula Aren", 22000, "double"),
    ("Ristretto", 17000, "single"),
    ("Iced Long Black", 21000, "triple"),
];

/// Snack menu: name, price in whole currency units, category.
const SNACKS: &[(&str, i64, &str)] = &[
    ("Butter Croissant", 18000, "pastry"),
    ("Pain au Chocolat", 22000, "pastry"),
    ("Banana Bread", 16000, "cake"),
    ("Cheesecake Slice", 32000, "cake"),
    ("Choco Chip Cookie", 12000, "cookie"),
    ("Pisang Goreng", 10000, "fried"),
    ("Tuna Sandwich", 35000, "savory"),
];

/// Members: name, phone.
const CUSTOMERS: &[(&str, &str)] = &[
    ("Ayu Lestari", "0812-1000-2001"),
    ("Budi Santoso", "0813-2000-3002"),
    ("Citra Dewi", "0857-3000-4003"),
    ("Dimas Pratama", ""),
];

#[derive(Debug, Parser)]
#[command(name = "seed", about = "Brew POS seed data generator")]
struct Args {
    /// Data directory to populate
    #[arg(short, long, default_value = DEFAULT_DATA_DIR)]
    data_dir: PathBuf,

    /// Opening loyalty balance for every seeded member
    #[arg(short, long, default_value_t = 0)]
    points: i64,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    println!("🌱 Brew POS Seed Data Generator");
    println!("================================");
    println!("Data directory: {}", args.data_dir.display());
    println!();

    let mut store = Store::open(StoreConfig::new(&args.data_dir))?;

    if store.products.count() > 0 {
        println!("⚠ Data directory already has {} products", store.products.count());
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the data files to regenerate.");
        return Ok(());
    }

    for (name, price, shot_size) in COFFEES {
        if let Err(e) = store
            .products
            .create_coffee(name, Money::from_major(*price), shot_size)
        {
            eprintln!("Failed to add {}: {}", name, e);
        }
    }
    for (name, price, category) in SNACKS {
        if let Err(e) = store
            .products
            .create_snack(name, Money::from_major(*price), category)
        {
            eprintln!("Failed to add {}: {}", name, e);
        }
    }
    println!("✓ Added {} products", store.products.count());

    if store.customers.count() == 0 {
        for (name, phone) in CUSTOMERS {
            let customer = store.customers.create_customer(name, phone)?;
            if args.points > 0 {
                store.customers.credit(customer.id, args.points)?;
            }
        }
        println!("✓ Added {} customers", store.customers.count());
    }

    store.save_all()?;

    println!();
    println!("✓ Seed complete!");
    Ok(())
}
