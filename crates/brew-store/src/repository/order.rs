//! # Order Repository
//!
//! Completed transactions persisted in `transactions.txt`.
//!
//! History is append-only: orders come in through checkout and are never
//! edited. Lines only store `product_id:quantity`, so item names and unit
//! prices are re-resolved from the catalog when loading.

use brew_core::{Catalog, CustomerId, IdSequence, LoyaltyPolicy, Money, Order, OrderId};
use chrono::NaiveDate;
use tracing::{debug, info};

use super::{LoadSummary, Repository};
use crate::data_dir::DataDir;
use crate::error::{StoreError, StoreResult};
use crate::record::Record;

/// Criteria for [`OrderRepository::find`]. Unset fields match everything.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HistoryFilter {
    pub customer_id: Option<CustomerId>,
    /// First day included.
    pub from: Option<NaiveDate>,
    /// Last day included.
    pub to: Option<NaiveDate>,
    /// Keep only this many of the newest matches.
    pub recent: Option<usize>,
}

impl HistoryFilter {
    pub fn matches(&self, order: &Order) -> bool {
        if let Some(customer_id) = self.customer_id {
            if order.customer_id() != Some(customer_id) {
                return false;
            }
        }
        if self.from.is_none() && self.to.is_none() {
            return true;
        }

        let Some(day) = order.completed_at().map(|at| at.date()) else {
            return false;
        };
        self.from.map_or(true, |from| from <= day) && self.to.map_or(true, |to| day <= to)
    }
}

/// Repository for transaction history.
#[derive(Debug, Clone)]
pub struct OrderRepository {
    inner: Repository<Order>,
}

impl OrderRepository {
    pub fn new(dir: DataDir, policy: LoyaltyPolicy) -> Self {
        OrderRepository {
            inner: Repository::new(dir, policy),
        }
    }

    pub fn all(&self) -> &[Order] {
        self.inner.all()
    }

    pub fn get(&self, id: OrderId) -> Option<&Order> {
        self.inner.get(id)
    }

    pub fn count(&self) -> usize {
        self.inner.count()
    }

    /// Sequence checkout draws order ids from.
    pub(crate) fn ids_mut(&mut self) -> &mut IdSequence {
        self.inner.ids_mut()
    }

    /// Appends a completed order.
    ///
    /// ## Errors
    /// - [`StoreError::InvalidRecord`] for an order without id, timestamp or items
    /// - [`StoreError::Duplicate`] if the id is already in history
    pub fn append(&mut self, order: Order) -> StoreResult<()> {
        if !order.is_completed() {
            return Err(StoreError::InvalidRecord {
                entity: Order::ENTITY.to_string(),
                reason: "order has not been completed".to_string(),
            });
        }
        self.inner.add(order)
    }

    /// Orders placed by `customer_id`, oldest first.
    pub fn by_customer(&self, customer_id: CustomerId) -> Vec<&Order> {
        self.find(&HistoryFilter {
            customer_id: Some(customer_id),
            ..Default::default()
        })
    }

    /// Orders completed on any day from `from` to `to`, both inclusive.
    pub fn by_date_range(&self, from: NaiveDate, to: NaiveDate) -> Vec<&Order> {
        self.find(&HistoryFilter {
            from: Some(from),
            to: Some(to),
            ..Default::default()
        })
    }

    /// Orders matching every criterion set in `filter`.
    ///
    /// Oldest first, unless `filter.recent` is set, in which case only that
    /// many are returned, newest first.
    pub fn find(&self, filter: &HistoryFilter) -> Vec<&Order> {
        let matching = self.all().iter().filter(|o| filter.matches(o));
        match filter.recent {
            Some(limit) => matching.rev().take(limit).collect(),
            None => matching.collect(),
        }
    }

    /// Sum of all order totals (after discounts).
    pub fn total_revenue(&self) -> Money {
        self.all().iter().map(Order::total).sum()
    }

    /// The `limit` most recent orders, newest first.
    pub fn recent(&self, limit: usize) -> Vec<&Order> {
        self.find(&HistoryFilter {
            recent: Some(limit),
            ..Default::default()
        })
    }

    pub fn save(&self) -> StoreResult<usize> {
        self.inner.save()
    }

    /// Loads history and fills item names and prices from `catalog`.
    pub fn load_with<C>(&mut self, catalog: &C) -> StoreResult<LoadSummary>
    where
        C: Catalog + ?Sized,
    {
        let summary = self.inner.load()?;

        let mut unresolved = 0;
        for order in self.inner.records_mut() {
            order.resolve_items(catalog);
            unresolved += order
                .items()
                .iter()
                .filter(|item| catalog.lookup(item.product_id).is_none())
                .count();
        }
        if unresolved > 0 {
            debug!(unresolved, "History references products missing from the catalog");
        }

        info!(
            orders = summary.loaded,
            revenue = %self.total_revenue(),
            "Transaction history ready"
        );
        Ok(summary)
    }
}
