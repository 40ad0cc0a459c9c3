//! Import resolution and model flattening for Seam models.
//!
//! A freshly built (or freshly parsed) model may contain import stubs:
//! components and units definitions that stand in for content defined in
//! other files. This crate turns such a model into a self-contained one in
//! two steps:
//!
//! - [`resolve_imports`] fetches every referenced file through a caller
//!   supplied [`FileLoader`], parses it into a model, recursively resolves
//!   that model's own imports, and attaches the result to the import-source
//!   registry. Distinct stubs referencing the same URL share one fetch, and
//!   cyclic import graphs are rejected with the offending chain.
//! - [`flatten`] destructively substitutes every stub with a deep, locally
//!   owned copy of its remote definition, re-homing equivalence edges from
//!   stub dummy variables onto the copied concrete variables.
//!
//! Failures during resolution are collected per branch rather than aborting
//! the whole walk: a model with three independent imports, one broken,
//! still resolves the other two, and a later retry revisits only what is
//! still unresolved.
//!
//! # Example
//!
//! ```ignore
//! use seam_loader::{flatten, resolve_imports, FileLoader};
//!
//! let mut model = build_model_with_imports();
//! resolve_imports(&mut model, "", &my_file_loader)?;
//! assert!(!model.has_unresolved_imports());
//!
//! let report = flatten(&mut model);
//! assert!(report.was_performed());
//! for dropped in report.dropped_equivalences() {
//!     eprintln!("warning: {dropped:?}");
//! }
//! ```

mod error;
mod flatten;
mod resolver;
mod util;

#[cfg(test)]
mod test;

pub use error::{ImportError, ResolveErrors};
pub use flatten::{flatten, DroppedEquivalence, FlattenReport};
pub use resolver::resolve_imports;
pub use util::{FileLoader, Stack};
