//! # Product Repository
//!
//! The catalog: coffee drinks and snacks, persisted in `products.txt`.
//!
//! The repository also serves as the [`Catalog`] the order calculator
//! prices items from.

use brew_core::validation::{validate_extra_field, validate_price, validate_product_name};
use brew_core::{Catalog, CatalogEntry, Money, Product, ProductId, ProductKind, ProductType};
use tracing::info;

use super::{LoadSummary, Repository};
use crate::data_dir::DataDir;
use crate::error::StoreResult;

/// Repository for catalog products.
///
/// ## Usage
/// ```rust,ignore
/// let mut products = ProductRepository::new(dir);
/// products.load()?;
///
/// let espresso = products.create_coffee("Espresso", Money::from_major(15000), "double")?;
/// let coffees = products.by_type(ProductType::Coffee);
/// ```
#[derive(Debug, Clone)]
pub struct ProductRepository {
    inner: Repository<Product>,
}

impl ProductRepository {
    pub fn new(dir: DataDir) -> Self {
        ProductRepository {
            inner: Repository::new(dir, ()),
        }
    }

    pub fn all(&self) -> &[Product] {
        self.inner.all()
    }

    pub fn get(&self, id: ProductId) -> Option<&Product> {
        self.inner.get(id)
    }

    pub fn count(&self) -> usize {
        self.inner.count()
    }

    /// Products of one type, in catalog order.
    pub fn by_type(&self, product_type: ProductType) -> Vec<&Product> {
        self.all()
            .iter()
            .filter(|p| p.product_type() == product_type)
            .collect()
    }

    pub fn count_by_type(&self, product_type: ProductType) -> usize {
        self.all()
            .iter()
            .filter(|p| p.product_type() == product_type)
            .count()
    }

    /// Validates, assigns the next id and inserts a coffee product.
    pub fn create_coffee(
        &mut self,
        name: &str,
        price: Money,
        shot_size: &str,
    ) -> StoreResult<Product> {
        self.create(name, price, ProductType::Coffee, shot_size)
    }

    /// Validates, assigns the next id and inserts a snack product.
    pub fn create_snack(&mut self, name: &str, price: Money, category: &str) -> StoreResult<Product> {
        self.create(name, price, ProductType::Snack, category)
    }

    fn create(
        &mut self,
        name: &str,
        price: Money,
        product_type: ProductType,
        extra_field: &str,
    ) -> StoreResult<Product> {
        validate_product_name(name)?;
        validate_price(price)?;
        validate_extra_field(extra_field)?;

        let product = Product {
            id: self.inner.next_id(),
            name: name.trim().to_string(),
            price,
            kind: ProductKind::from_parts(product_type, extra_field),
        };
        self.inner.add(product.clone())?;

        info!(id = product.id, name = %product.name, kind = %product_type, "Product created");
        Ok(product)
    }

    /// Inserts a product that already carries its id.
    pub fn add(&mut self, product: Product) -> StoreResult<()> {
        validate_product_name(&product.name)?;
        validate_extra_field(product.kind.extra_field())?;
        self.inner.add(product)
    }

    /// Replaces the product with the same id.
    pub fn update(&mut self, product: Product) -> StoreResult<()> {
        validate_product_name(&product.name)?;
        validate_price(product.price)?;
        validate_extra_field(product.kind.extra_field())?;
        self.inner.update(product)
    }

    /// Removes a product. Past transactions referencing it are untouched.
    pub fn remove(&mut self, id: ProductId) -> bool {
        self.inner.remove(id)
    }

    pub fn save(&self) -> StoreResult<usize> {
        self.inner.save()
    }

    pub fn load(&mut self) -> StoreResult<LoadSummary> {
        self.inner.load()
    }
}

impl Catalog for ProductRepository {
    fn lookup(&self, product_id: ProductId) -> Option<CatalogEntry> {
        self.all().lookup(product_id)
    }
}
