use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use prato_core::{AggregateRoot, DomainError, DomainResult, OrderCode};
use prato_orders::{
    Order, OrderPredicate, OrderRepository, Page, PageRequest, SortDirection, SortField, SortKey,
};

use super::catalog::InMemoryCatalog;

/// In-memory order store.
///
/// Writes on the same code are serialized behind the lock; a save whose
/// aggregate version does not match the stored one is a conflicting
/// concurrent commit. The whole aggregate (items included) is swapped in
/// one insert, so reads only ever see pre- or post-commit state.
#[derive(Debug)]
pub struct InMemoryOrderStore {
    catalog: Arc<InMemoryCatalog>,
    orders: RwLock<HashMap<OrderCode, Order>>,
}

fn poisoned() -> DomainError {
    DomainError::validation("order store is unavailable")
}

impl InMemoryOrderStore {
    /// The catalog is needed to join customer/restaurant names during
    /// query execution.
    pub fn new(catalog: Arc<InMemoryCatalog>) -> Self {
        Self {
            catalog,
            orders: RwLock::new(HashMap::new()),
        }
    }

    fn compare(
        a: &(Order, String, String),
        b: &(Order, String, String),
        ordering: &[SortKey],
    ) -> Ordering {
        for key in ordering {
            let ord = match key.field {
                SortField::Code => {
                    let a_code = a.0.code().map(OrderCode::as_str).unwrap_or("");
                    let b_code = b.0.code().map(OrderCode::as_str).unwrap_or("");
                    a_code.cmp(b_code)
                }
                SortField::CustomerName => a.1.cmp(&b.1),
                SortField::RestaurantName => a.2.cmp(&b.2),
                SortField::Total => a.0.total().cmp(&b.0.total()),
            };
            let ord = match key.direction {
                SortDirection::Asc => ord,
                SortDirection::Desc => ord.reverse(),
            };
            if ord != Ordering::Equal {
                return ord;
            }
        }
        Ordering::Equal
    }
}

impl OrderRepository for InMemoryOrderStore {
    fn save(&self, mut order: Order) -> DomainResult<Order> {
        let code = order
            .code()
            .cloned()
            .ok_or_else(|| DomainError::validation("order has no code assigned"))?;

        let mut orders = self.orders.write().map_err(|_| poisoned())?;
        if let Some(existing) = orders.get(&code) {
            if existing.version() != order.version() {
                return Err(DomainError::concurrent_modification(&code));
            }
        }

        order.mark_persisted();
        orders.insert(code, order.clone());
        Ok(order)
    }

    fn find_by_code(&self, code: &OrderCode) -> DomainResult<Option<Order>> {
        Ok(self.orders.read().map_err(|_| poisoned())?.get(code).cloned())
    }

    fn query(
        &self,
        predicate: &OrderPredicate,
        ordering: &[SortKey],
        page: &PageRequest,
    ) -> DomainResult<Page<Order>> {
        let orders = self.orders.read().map_err(|_| poisoned())?;

        let mut matches: Vec<(Order, String, String)> = orders
            .values()
            .map(|order| {
                let customer_name = self.catalog.customer_name(order.customer_id());
                let restaurant_name = self.catalog.restaurant_name(order.restaurant_id());
                (order.clone(), customer_name, restaurant_name)
            })
            .filter(|(order, customer_name, restaurant_name)| {
                predicate.matches(order, customer_name, restaurant_name)
            })
            .collect();
        drop(orders);

        // Stable fallback so pagination is deterministic even without client sort keys.
        matches.sort_by(|a, b| {
            Self::compare(a, b, ordering).then_with(|| a.0.created_at().cmp(&b.0.created_at()))
        });

        let total = matches.len() as u64;
        let items = matches
            .into_iter()
            .skip(page.offset())
            .take(page.size as usize)
            .map(|(order, _, _)| order)
            .collect();

        Ok(Page {
            items,
            total,
            page: page.page,
            size: page.size,
        })
    }
}
