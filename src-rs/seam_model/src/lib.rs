//! Core entity graph for Seam models.
//!
//! This crate defines the data structures that make up a Seam model: a named
//! root [`Model`] owning a tree of [`Component`]s, the [`Variable`]s that
//! live on them, model-scope [`Units`] definitions, and the import-source
//! registry that ties stub entities to the remote files they are defined in.
//!
//! Components and variables live in model-owned arenas and are addressed by
//! the copyable ids in [`ids`]. Parent links are arena indices, so the
//! exclusive-parent invariant is maintained by rewriting indices rather than
//! juggling shared pointers.
//!
//! The crate also owns the variable equivalence network: a symmetric,
//! many-to-many "same value" relation used to connect quantities across the
//! component tree before (or instead of) flattening.

pub mod component;
pub mod entity;
pub mod equivalence;
pub mod ids;
pub mod import;
pub mod model;
pub mod reset;
pub mod units;
pub mod variable;

pub use component::Component;
pub use entity::{Entity, Parent};
pub use equivalence::Equivalence;
pub use ids::{ComponentId, VariableId};
pub use import::{ImportKind, ImportRef, ImportSource};
pub use model::{Model, StructuralCycleError};
pub use reset::Reset;
pub use units::{Prefix, UnitTerm, Units};
pub use variable::{InitialValue, InterfaceType, Variable};
