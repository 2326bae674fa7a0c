//! Storage seam for orders.
//!
//! The core assumes a transactional store accessed by code and by
//! predicate; the concrete engine is not this crate's concern. `save` must
//! commit the aggregate and all of its items as one atomic write, so reads
//! never observe partially-updated totals.

use prato_core::{DomainResult, OrderCode};

use crate::filter::{OrderPredicate, SortKey, SortRequest};
use crate::order::Order;

/// Pagination + client sort keys for a query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    /// 0-based page index.
    pub page: u32,
    /// Page size (capped for safety).
    pub size: u32,
    /// Client-supplied sort keys; must pass allow-list translation before
    /// reaching the query engine.
    pub sort: Vec<SortRequest>,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 0,
            size: 10,
            sort: Vec::new(),
        }
    }
}

impl PageRequest {
    pub fn new(page: u32, size: u32) -> Self {
        Self {
            page,
            size: size.min(1000),
            sort: Vec::new(),
        }
    }

    pub fn sorted_by(mut self, request: SortRequest) -> Self {
        self.sort.push(request);
        self
    }

    pub fn offset(&self) -> usize {
        self.page as usize * self.size as usize
    }
}

/// One page of query results.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// Total matches across all pages.
    pub total: u64,
    pub page: u32,
    pub size: u32,
}

impl<T> Page<T> {
    pub fn has_more(&self) -> bool {
        let seen = (self.page as u64 + 1) * self.size as u64;
        seen < self.total
    }
}

/// Persistence contract for order aggregates.
pub trait OrderRepository: Send + Sync {
    /// Persist the aggregate and its items atomically.
    ///
    /// A write that conflicts with a concurrent commit on the same order
    /// code fails with `ConcurrentModification`; nothing is stored.
    fn save(&self, order: Order) -> DomainResult<Order>;

    /// Look an order up by its public code.
    fn find_by_code(&self, code: &OrderCode) -> DomainResult<Option<Order>>;

    /// Run a translated predicate + ordering as a paged query.
    fn query(
        &self,
        predicate: &OrderPredicate,
        ordering: &[SortKey],
        page: &PageRequest,
    ) -> DomainResult<Page<Order>>;
}
