//! Entity trait: identity + continuity across state changes.

/// Entity marker + minimal interface.
///
/// Stored documents (inventory items) are entities: two records with the same
/// id are the same item, whatever their stock level.
pub trait Entity {
    /// Strongly-typed entity identifier.
    type Id: Clone + Eq + core::hash::Hash + core::fmt::Debug;

    /// Returns the entity identifier.
    fn id(&self) -> &Self::Id;
}
