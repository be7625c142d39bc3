//! # Repository Module
//!
//! In-memory collections backed by one record file each.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern                                   │
//! │                                                                         │
//! │  CLI command                                                            │
//! │       │                                                                 │
//! │       │  store.products.by_type(ProductType::Coffee)                    │
//! │       ▼                                                                 │
//! │  ProductRepository / CustomerRepository / OrderRepository              │
//! │  ├── entity-specific queries                                           │
//! │  └── wraps Repository<T: Record>                                       │
//! │       │   ├── Vec<T> in insertion order                                │
//! │       │   ├── IdSequence (next id = max loaded id + 1)                 │
//! │       │   └── load() / save()                                          │
//! │       ▼                                                                 │
//! │  DataDir ──► products.txt / customers.txt / transactions.txt           │
//! │                                                                         │
//! │  Every mutation stays in memory until save() rewrites the file.         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`ProductRepository`] - Catalog CRUD and type filters
//! - [`CustomerRepository`] - Members, lookups and the points ledger
//! - [`OrderRepository`] - Append-only transaction history

pub mod customer;
pub mod order;
pub mod product;

pub use customer::CustomerRepository;
pub use order::{HistoryFilter, OrderRepository};
pub use product::ProductRepository;

use brew_core::IdSequence;
use tracing::{debug, info, warn};

use crate::data_dir::DataDir;
use crate::error::{StoreError, StoreResult};
use crate::record::Record;

/// Outcome of loading a record file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadSummary {
    pub loaded: usize,
    pub skipped: usize,
}

/// Generic record collection shared by every entity repository.
#[derive(Debug, Clone)]
pub struct Repository<T: Record> {
    dir: DataDir,
    records: Vec<T>,
    ids: IdSequence,
    context: T::Context,
}

impl<T: Record> Repository<T> {
    /// Creates an empty repository; nothing is read until [`load`](Self::load).
    pub fn new(dir: DataDir, context: T::Context) -> Self {
        Repository {
            dir,
            records: Vec::new(),
            ids: IdSequence::new(),
            context,
        }
    }

    pub fn all(&self) -> &[T] {
        &self.records
    }

    pub fn get(&self, id: u32) -> Option<&T> {
        self.records.iter().find(|r| r.id() == id)
    }

    pub fn get_mut(&mut self, id: u32) -> Option<&mut T> {
        self.records.iter_mut().find(|r| r.id() == id)
    }

    pub fn contains(&self, id: u32) -> bool {
        self.get(id).is_some()
    }

    pub fn count(&self) -> usize {
        self.records.len()
    }

    /// Allocates the next id. Ids are never reused within a session.
    pub fn next_id(&mut self) -> u32 {
        self.ids.next()
    }

    pub(crate) fn ids_mut(&mut self) -> &mut IdSequence {
        &mut self.ids
    }

    pub(crate) fn records_mut(&mut self) -> &mut Vec<T> {
        &mut self.records
    }

    /// Inserts a record.
    ///
    /// ## Errors
    /// - [`StoreError::InvalidRecord`] if the record fails its validity check
    /// - [`StoreError::Duplicate`] if the id is already taken
    pub fn add(&mut self, record: T) -> StoreResult<()> {
        if !record.is_valid() {
            return Err(StoreError::InvalidRecord {
                entity: T::ENTITY.to_string(),
                reason: format!("record {} failed validation", record.id()),
            });
        }
        if self.contains(record.id()) {
            return Err(StoreError::duplicate(T::ENTITY, record.id()));
        }

        self.ids.observe(record.id());
        debug!(entity = T::ENTITY, id = record.id(), "Added record");
        self.records.push(record);
        Ok(())
    }

    /// Replaces the record with the same id.
    pub fn update(&mut self, record: T) -> StoreResult<()> {
        if !record.is_valid() {
            return Err(StoreError::InvalidRecord {
                entity: T::ENTITY.to_string(),
                reason: format!("record {} failed validation", record.id()),
            });
        }

        let id = record.id();
        let slot = self
            .get_mut(id)
            .ok_or_else(|| StoreError::not_found(T::ENTITY, id))?;
        *slot = record;
        debug!(entity = T::ENTITY, id, "Updated record");
        Ok(())
    }

    /// Removes the record with `id`.
    ///
    /// ## Returns
    /// `true` if a record was removed.
    pub fn remove(&mut self, id: u32) -> bool {
        let before = self.records.len();
        self.records.retain(|r| r.id() != id);
        let removed = self.records.len() != before;
        if removed {
            debug!(entity = T::ENTITY, id, "Removed record");
        }
        removed
    }

    /// Rewrites the backing file from memory.
    pub fn save(&self) -> StoreResult<usize> {
        self.dir
            .write_records(T::FILE_NAME, self.records.iter().map(Record::to_fields))
    }

    /// Replaces the in-memory contents with the backing file.
    ///
    /// Malformed, invalid and duplicate lines are logged and skipped. The id
    /// sequence continues after the highest id loaded.
    pub fn load(&mut self) -> StoreResult<LoadSummary> {
        let raw = self.dir.read_records(T::FILE_NAME)?;

        self.records.clear();
        self.ids.reset();
        let mut summary = LoadSummary::default();

        for line in raw {
            let decoded = T::from_fields(&line.fields, &self.context)
                .map_err(|err| StoreError::Malformed {
                    file: T::FILE_NAME.to_string(),
                    line: line.line,
                    reason: err.to_string(),
                })
                .and_then(|record| self.add(record));

            match decoded {
                Ok(()) => summary.loaded += 1,
                Err(err) => {
                    summary.skipped += 1;
                    warn!(file = T::FILE_NAME, line = line.line, error = %err, "Skipping record");
                }
            }
        }

        info!(
            file = T::FILE_NAME,
            loaded = summary.loaded,
            skipped = summary.skipped,
            "Loaded records"
        );
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use brew_core::{Customer, Money, Product};
    use std::fs;
    use tempfile::TempDir;

    fn setup() -> (Repository<Product>, TempDir) {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let dir = DataDir::create(temp_dir.path()).unwrap();
        (Repository::new(dir, ()), temp_dir)
    }

    fn latte(id: u32) -> Product {
        Product::coffee(id, "Latte", Money::from_major(15000), "single")
    }

    #[test]
    fn test_add_rejects_invalid_and_duplicates() {
        let (mut repo, _temp) = setup();

        repo.add(latte(1)).unwrap();
        assert!(matches!(repo.add(latte(1)), Err(StoreError::Duplicate { .. })));
        assert!(matches!(repo.add(latte(0)), Err(StoreError::InvalidRecord { .. })));
        assert_eq!(repo.count(), 1);
    }

    #[test]
    fn test_next_id_follows_highest_added() {
        let (mut repo, _temp) = setup();
        repo.add(latte(7)).unwrap();
        repo.add(latte(3)).unwrap();

        assert_eq!(repo.next_id(), 8);
        assert_eq!(repo.next_id(), 9);
    }

    #[test]
    fn test_update_and_remove() {
        let (mut repo, _temp) = setup();
        repo.add(latte(1)).unwrap();

        let mut changed = latte(1);
        changed.name = "Oat Latte".to_string();
        repo.update(changed).unwrap();
        assert_eq!(repo.get(1).unwrap().name, "Oat Latte");

        assert!(matches!(repo.update(latte(2)), Err(StoreError::NotFound { .. })));
        assert!(repo.remove(1));
        assert!(!repo.remove(1));
        assert!(repo.all().is_empty());
    }

    #[test]
    fn test_save_then_load_restores_state() {
        let (mut repo, temp) = setup();
        repo.add(latte(1)).unwrap();
        repo.add(Product::snack(2, "Donut", Money::from_major(9000), "pastry"))
            .unwrap();
        repo.save().unwrap();

        let mut reloaded: Repository<Product> =
            Repository::new(DataDir::create(temp.path()).unwrap(), ());
        let summary = reloaded.load().unwrap();

        assert_eq!(summary, LoadSummary { loaded: 2, skipped: 0 });
        assert_eq!(reloaded.all(), repo.all());
        assert_eq!(reloaded.next_id(), 3);
    }

    #[test]
    fn test_load_skips_bad_lines() {
        let temp_dir = TempDir::new().unwrap();
        let dir = DataDir::create(temp_dir.path()).unwrap();
        fs::write(
            dir.path("customers.txt"),
            "1|Ayu|0812|10\nbroken line\n0|Nobody||0\n1|Ayu again||0\n4||0813|5\n9|Budi||3\n",
        )
        .unwrap();

        let mut repo: Repository<Customer> = Repository::new(dir, ());
        let summary = repo.load().unwrap();

        assert_eq!(summary, LoadSummary { loaded: 2, skipped: 4 });
        assert_eq!(repo.all().iter().map(|c| c.id).collect::<Vec<_>>(), vec![1, 9]);
        assert_eq!(repo.next_id(), 10);
    }

    #[test]
    fn test_load_replaces_memory() {
        let (mut repo, _temp) = setup();
        repo.add(latte(5)).unwrap();

        let summary = repo.load().unwrap();

        assert_eq!(summary.loaded, 0);
        assert!(repo.all().is_empty());
        assert_eq!(repo.next_id(), 1);
    }
}
