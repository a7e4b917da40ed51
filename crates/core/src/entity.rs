//! Entity trait: identity + continuity across state changes.
//!
//! Everything the store holds (customers, estimates, jobs, invoices, ...)
//! is an entity: it keeps its identity while its fields change. Contrast
//! with [`crate::ValueObject`] types like `Money`, which have no identity.

/// Entity marker + minimal interface.
pub trait Entity {
    /// Strongly-typed entity identifier.
    type Id: Clone + Eq + core::hash::Hash + core::fmt::Debug;

    /// Returns the entity identifier.
    fn id(&self) -> &Self::Id;
}
