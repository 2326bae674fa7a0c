//! Order search: filter → predicate, and allow-list sort translation.
//!
//! Both halves translate untrusted client input into trusted query
//! parameters. The filter is structural (absent fields impose no
//! constraint); the sort keys are free-form dotted external names and go
//! through a static allow-list — anything unmapped is silently dropped,
//! never forwarded to the query engine. That drop is policy, not failure:
//! it is the guard against arbitrary field probing through user-controlled
//! sort input.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::order::{Order, OrderStatus};
use crate::repository::PageRequest;

/// Free-form search filter for orders. Every field is optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OrderFilter {
    /// Exact public order code.
    pub code: Option<String>,
    /// Customer-name fragment (case-sensitive substring).
    pub customer_name: Option<String>,
    /// Restaurant-name fragment (case-sensitive substring).
    pub restaurant_name: Option<String>,
    pub status: Option<OrderStatus>,
    /// Inclusive lower bound on creation time.
    pub created_from: Option<DateTime<Utc>>,
    /// Inclusive upper bound on creation time.
    pub created_until: Option<DateTime<Utc>>,
}

impl OrderFilter {
    /// Build the conjunction of predicates for the present fields.
    pub fn to_predicate(&self) -> OrderPredicate {
        let mut conditions = Vec::new();
        if let Some(code) = &self.code {
            conditions.push(Condition::CodeEquals(code.clone()));
        }
        if let Some(fragment) = &self.customer_name {
            conditions.push(Condition::CustomerNameContains(fragment.clone()));
        }
        if let Some(fragment) = &self.restaurant_name {
            conditions.push(Condition::RestaurantNameContains(fragment.clone()));
        }
        if let Some(status) = self.status {
            conditions.push(Condition::StatusEquals(status));
        }
        if let Some(from) = self.created_from {
            conditions.push(Condition::CreatedFrom(from));
        }
        if let Some(until) = self.created_until {
            conditions.push(Condition::CreatedUntil(until));
        }
        OrderPredicate { conditions }
    }
}

/// One conjunct of an order predicate.
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    CodeEquals(String),
    CustomerNameContains(String),
    RestaurantNameContains(String),
    StatusEquals(OrderStatus),
    CreatedFrom(DateTime<Utc>),
    CreatedUntil(DateTime<Utc>),
}

/// Finalized predicate: a conjunction of [`Condition`]s.
///
/// Opaque to callers beyond being handed to the paged-query contract. Name
/// fragments match against the joined customer/restaurant names, which the
/// query engine supplies.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderPredicate {
    conditions: Vec<Condition>,
}

impl OrderPredicate {
    pub fn conditions(&self) -> &[Condition] {
        &self.conditions
    }

    /// An empty conjunction matches everything.
    pub fn is_unconstrained(&self) -> bool {
        self.conditions.is_empty()
    }

    pub fn matches(&self, order: &Order, customer_name: &str, restaurant_name: &str) -> bool {
        self.conditions.iter().all(|condition| match condition {
            Condition::CodeEquals(code) => {
                order.code().map(|c| c.as_str() == code).unwrap_or(false)
            }
            Condition::CustomerNameContains(fragment) => customer_name.contains(fragment),
            Condition::RestaurantNameContains(fragment) => restaurant_name.contains(fragment),
            Condition::StatusEquals(status) => order.status() == *status,
            Condition::CreatedFrom(from) => order.created_at() >= *from,
            Condition::CreatedUntil(until) => order.created_at() <= *until,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

/// A client-supplied sort key: external dotted name + direction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortRequest {
    pub key: String,
    pub direction: SortDirection,
}

impl SortRequest {
    pub fn asc(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            direction: SortDirection::Asc,
        }
    }

    pub fn desc(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            direction: SortDirection::Desc,
        }
    }
}

/// Trusted internal sort fields. Only values of this enum ever reach the
/// query engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortField {
    Code,
    CustomerName,
    RestaurantName,
    Total,
}

impl SortField {
    /// Internal field path the storage layer sorts by.
    pub fn internal_path(self) -> &'static str {
        match self {
            SortField::Code => "codigo",
            SortField::CustomerName => "cliente.nome",
            SortField::RestaurantName => "restaurante.nome",
            SortField::Total => "valorTotal",
        }
    }
}

/// A translated, trusted sort key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortKey {
    pub field: SortField,
    pub direction: SortDirection,
}

/// External sort key → trusted internal field. Static by design: clients
/// can never smuggle an arbitrary field path through here.
const SORT_ALLOW_LIST: &[(&str, SortField)] = &[
    ("codigo", SortField::Code),
    ("restaurante.nome", SortField::RestaurantName),
    ("nomeCliente", SortField::CustomerName),
    ("valorTotal", SortField::Total),
];

/// Translate client sort keys through the allow-list.
///
/// Mapped keys translate 1:1, preserving direction and relative order;
/// unmapped keys are dropped without error.
pub fn translate_sort(requests: &[SortRequest]) -> Vec<SortKey> {
    requests
        .iter()
        .filter_map(|request| {
            let mapped = SORT_ALLOW_LIST
                .iter()
                .find(|(external, _)| *external == request.key)
                .map(|(_, field)| *field);
            match mapped {
                Some(field) => Some(SortKey {
                    field,
                    direction: request.direction,
                }),
                None => {
                    tracing::debug!(key = %request.key, "dropping unmapped sort key");
                    None
                }
            }
        })
        .collect()
}

/// Translate a filter and page request into a finalized predicate plus a
/// trusted ordering, ready for the paged-query contract.
pub fn translate(filter: &OrderFilter, page: &PageRequest) -> (OrderPredicate, Vec<SortKey>) {
    (filter.to_predicate(), translate_sort(&page.sort))
}
