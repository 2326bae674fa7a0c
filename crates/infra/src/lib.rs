//! `prato-infra` — concrete implementations of the storage seams.
//!
//! The in-memory variants here back tests and development. A relational
//! store would implement the same contracts; the core never sees the
//! difference.

pub mod in_memory;

pub use in_memory::{InMemoryCatalog, InMemoryOrderStore};
