//! Entity trait: identity + continuity across state changes.

/// Entity marker + minimal interface.
pub trait Entity {
    /// Strongly-typed entity identifier.
    type Id: Clone + Eq + core::hash::Hash + core::fmt::Debug;

    /// Returns the entity identifier, if one has been assigned yet.
    ///
    /// Identity is assigned by the persistence layer, so freshly drafted
    /// entities may not have one.
    fn id(&self) -> Option<&Self::Id>;
}
