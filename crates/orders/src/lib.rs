//! `prato-orders` — the order aggregate and its lifecycle engine.
//!
//! This crate owns the only genuinely rule-heavy part of the system:
//!
//! - [`item`]: a line entry that computes its own subtotal;
//! - [`order`]: the aggregate — totals, the status state machine, and the
//!   pending-event outbox drained after commit;
//! - [`filter`]: translation of client-supplied search criteria and sort
//!   keys into trusted query parameters (allow-list, drop-unmapped);
//! - [`repository`]: the storage seam orders are persisted/queried through;
//! - [`issuance`]: the orchestrator composing all of the above.

pub mod filter;
pub mod issuance;
pub mod item;
pub mod order;
pub mod repository;

pub use filter::{
    Condition, OrderFilter, OrderPredicate, SortDirection, SortField, SortKey, SortRequest,
    translate, translate_sort,
};
pub use issuance::{OrderInput, OrderIssuanceService, OrderItemInput};
pub use item::OrderItem;
pub use order::{Order, OrderCancelled, OrderConfirmed, OrderEvent, OrderStatus};
pub use repository::{OrderRepository, Page, PageRequest};
