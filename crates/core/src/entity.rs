//! Identity shared by every stored record.

/// Anything addressed by a stable id within its collection.
pub trait Entity {
    /// Identifier type; unique within one collection.
    type Id: Clone + Eq + core::hash::Hash + core::fmt::Debug + core::fmt::Display;

    fn id(&self) -> &Self::Id;

    /// True when this entity is addressed by `id`.
    fn is(&self, id: &Self::Id) -> bool {
        self.id() == id
    }
}
