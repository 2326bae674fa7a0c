//! In-memory stores (tests/dev). Not optimized for performance.

mod catalog;
mod orders;

pub use catalog::InMemoryCatalog;
pub use orders::InMemoryOrderStore;
