//! The shared identity surface of model entities.

use crate::ids::ComponentId;

/// The structural parent of an entity that lives in a model tree.
///
/// A parent link is an arena index, not an ownership edge: children are
/// owned top-down by their containers, and the parent link exists for upward
/// identity queries. An entity has at most one parent at a time; re-homing
/// an entity rewrites the old and new containers together.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Parent {
    /// The entity sits directly under the model root.
    Model,
    /// The entity is nested under the given component.
    Component(ComponentId),
}

/// Common identity surface shared by every identifiable model entity.
///
/// Every entity can carry an optional opaque string identifier. The entity
/// itself enforces no uniqueness; detecting and repairing duplicated
/// identifiers across a model is the annotator's concern.
pub trait Entity {
    /// Returns the identifier of this entity, if one is set.
    fn id(&self) -> Option<&str>;

    /// Sets the identifier of this entity.
    fn set_id(&mut self, id: impl Into<String>);

    /// Removes the identifier of this entity, if one is set.
    fn remove_id(&mut self);
}
