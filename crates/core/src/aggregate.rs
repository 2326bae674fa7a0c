//! Aggregate root trait for domain models.

/// Aggregate root marker + minimal interface.
///
/// An aggregate is the consistency boundary for a cluster of entities
/// (e.g. an order and its line items). It is mutated only through its own
/// behavior methods; storage treats it as a single atomic unit.
pub trait AggregateRoot {
    /// Strongly-typed aggregate identifier.
    type Id: Clone + Eq + core::hash::Hash + core::fmt::Debug;

    /// Returns the aggregate identifier.
    fn id(&self) -> &Self::Id;

    /// Monotonically increasing version of the aggregate's persisted state.
    ///
    /// Used by storage as the optimistic-concurrency token: a write whose
    /// version does not match the stored one is a conflicting commit.
    fn version(&self) -> u64;
}
