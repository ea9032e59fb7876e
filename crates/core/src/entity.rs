//! Entities: things the storefront tells apart by identifier, not by value.

/// A catalog product or a placed order.
///
/// Two entities with the same id are the same thing even if a snapshot of one
/// is older than the other.
pub trait Entity {
    type Id: Clone + Eq + core::hash::Hash + core::fmt::Debug + core::fmt::Display;

    fn id(&self) -> &Self::Id;

    /// Whether this entity is the one named by `id`.
    fn is(&self, id: &Self::Id) -> bool {
        self.id() == id
    }
}
