//! # Product Commands
//!
//! Catalog maintenance.
//!
//! ```text
//! brew product list [--type coffee|snack]
//! brew product show <id>
//! brew product add-coffee --name "Flat White" --price 28000 [--shot-size double]
//! brew product add-snack  --name "Croissant"  --price 18000 [--category pastry]
//! brew product update <id> [--name ..] [--price ..] [--extra ..]
//! brew product remove <id>
//! ```
//!
//! Mutating commands save `products.txt` before returning.

use brew_core::{Money, Product, ProductId, ProductKind, ProductType};
use clap::{Args, Subcommand};
use serde::Serialize;
use tracing::debug;

use super::{respond, CommandResult};
use crate::error::ApiError;
use crate::state::{ConfigState, RegisterState};

#[derive(Debug, Args)]
pub struct ProductCommand {
    #[command(subcommand)]
    command: ProductSubcommand,
}

#[derive(Debug, Subcommand)]
enum ProductSubcommand {
    /// List the catalog
    List {
        /// Only show one product type
        #[arg(long = "type")]
        product_type: Option<ProductType>,
    },

    /// Show one product
    Show { id: ProductId },

    /// Add a coffee drink
    AddCoffee {
        #[arg(long)]
        name: String,

        /// Unit price, e.g. 15000 or 15000.50
        #[arg(long)]
        price: Money,

        /// Defaults to "single"
        #[arg(long, default_value = "")]
        shot_size: String,
    },

    /// Add a snack
    AddSnack {
        #[arg(long)]
        name: String,

        /// Unit price, e.g. 15000 or 15000.50
        #[arg(long)]
        price: Money,

        /// Defaults to "other"
        #[arg(long, default_value = "")]
        category: String,
    },

    /// Change name, price or shot size / category
    Update {
        id: ProductId,

        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        price: Option<Money>,

        /// Shot size for coffee, category for snacks
        #[arg(long)]
        extra: Option<String>,
    },

    /// Remove a product from the catalog
    Remove { id: ProductId },
}

/// Product as shown to the operator.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductResponse {
    pub id: ProductId,
    pub name: String,
    pub product_type: ProductType,
    pub extra_field: String,
    pub price: String,
    pub description: String,
}

impl ProductResponse {
    pub fn new(product: &Product, config: &ConfigState) -> Self {
        ProductResponse {
            id: product.id,
            name: product.name.clone(),
            product_type: product.product_type(),
            extra_field: product.kind.extra_field().to_string(),
            price: config.format_currency(product.price),
            description: product.description(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ProductListResponse {
    count: usize,
    products: Vec<ProductResponse>,
}

pub fn run(command: ProductCommand, register: &mut RegisterState, config: &ConfigState) -> CommandResult {
    let products = &mut register.store_mut().products;

    match command.command {
        ProductSubcommand::List { product_type } => {
            debug!(?product_type, "product list command");
            let listed: Vec<&Product> = match product_type {
                Some(t) => products.by_type(t),
                None => products.all().iter().collect(),
            };
            respond(&ProductListResponse {
                count: listed.len(),
                products: listed
                    .into_iter()
                    .map(|p| ProductResponse::new(p, config))
                    .collect(),
            })
        }
        ProductSubcommand::Show { id } => {
            let product = products
                .get(id)
                .ok_or_else(|| ApiError::not_found("Product", id))?;
            respond(&ProductResponse::new(product, config))
        }
        ProductSubcommand::AddCoffee {
            name,
            price,
            shot_size,
        } => {
            let product = products.create_coffee(&name, price, &shot_size)?;
            products.save()?;
            respond(&ProductResponse::new(&product, config))
        }
        ProductSubcommand::AddSnack {
            name,
            price,
            category,
        } => {
            let product = products.create_snack(&name, price, &category)?;
            products.save()?;
            respond(&ProductResponse::new(&product, config))
        }
        ProductSubcommand::Update {
            id,
            name,
            price,
            extra,
        } => {
            let mut product = products
                .get(id)
                .cloned()
                .ok_or_else(|| ApiError::not_found("Product", id))?;

            if let Some(name) = name {
                product.name = name.trim().to_string();
            }
            if let Some(price) = price {
                product.price = price;
            }
            if let Some(extra) = extra {
                product.kind = ProductKind::from_parts(product.product_type(), &extra);
            }

            products.update(product.clone())?;
            products.save()?;
            respond(&ProductResponse::new(&product, config))
        }
        ProductSubcommand::Remove { id } => {
            if !products.remove(id) {
                return Err(ApiError::not_found("Product", id));
            }
            products.save()?;
            respond(&serde_json::json!({ "removed": id }))
        }
    }
}
