//! Aggregate root trait for session-owned mutable stores.

/// Aggregate root marker + minimal interface.
///
/// Session stores (cart ledger, wishlist, order history) are aggregates: every
/// mutation goes through the root, and the root counts its effective changes so
/// callers can tell whether anything moved since they last looked.
pub trait AggregateRoot {
    /// Strongly-typed aggregate identifier.
    type Id: Clone + Eq + core::hash::Hash + core::fmt::Debug;

    /// Returns the aggregate identifier.
    fn id(&self) -> &Self::Id;

    /// Monotonically increasing version of the aggregate's state.
    ///
    /// Incremented once per mutation that actually changed state; no-ops
    /// (removing an absent line, clearing an empty cart) leave it untouched.
    fn version(&self) -> u64;
}
