//! Identifiers for defined entities.

use std::fmt;

/// Handle to an entity defined in a [`SymbolTable`](crate::runtime::SymbolTable).
///
/// Every name bound to an entity (its canonical name and any aliases)
/// resolves to the same `EntityId`, so two names denote the same entity
/// exactly when their ids are equal.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct EntityId(u32);

impl EntityId {
    /// Create an EntityId from a raw slot index.
    #[inline]
    pub(crate) const fn new(slot: u32) -> Self {
        Self(slot)
    }

    /// Get the raw slot index.
    #[inline]
    pub const fn index(self) -> u32 {
        self.0
    }
}

impl fmt::Debug for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EntityId({})", self.0)
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "entity#{}", self.0)
    }
}
