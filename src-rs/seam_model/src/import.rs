//! Import references and the shared import-source registry entries.

use std::rc::Rc;

use crate::entity::Entity;
use crate::model::Model;

/// The kind of entity an import reference designates in the remote file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportKind {
    /// The reference names a component in the remote model.
    Component,
    /// The reference names a units definition in the remote model.
    Units,
}

impl ImportKind {
    /// Returns the lowercase textual form of this kind.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Component => "component",
            Self::Units => "units",
        }
    }
}

/// Marks an entity as an import stub.
///
/// A stub holds the URL of the remote file and the name of the definition
/// inside that file which it stands in for. The fetched remote model itself
/// is not stored here: it lives on the [`ImportSource`] registered under the
/// same URL in the owning model's registry, so stubs that designate the same
/// file share one fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportRef {
    url: String,
    reference: String,
}

impl ImportRef {
    /// Creates an import reference to `reference` inside the file at `url`.
    #[must_use]
    pub fn new(url: impl Into<String>, reference: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            reference: reference.into(),
        }
    }

    /// Returns the URL of the remote file.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Returns the name of the remote definition this stub stands in for.
    #[must_use]
    pub fn reference(&self) -> &str {
        &self.reference
    }
}

/// A named remote-file handle plus the lazily resolved model it designates.
///
/// One source exists per distinct URL in a model's registry. Resolution
/// attaches the fetched remote model behind an `Rc`, so every source across
/// every model that designates the same file can share a single parse. An
/// attached model is immutable from the importing side.
#[derive(Debug, Clone, PartialEq)]
pub struct ImportSource {
    url: String,
    id: Option<String>,
    model: Option<Rc<Model>>,
}

impl ImportSource {
    /// Creates an unresolved source for the file at `url`.
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            id: None,
            model: None,
        }
    }

    /// Returns the URL of the remote file this source designates.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Returns the resolved remote model, if resolution has happened.
    #[must_use]
    pub const fn model(&self) -> Option<&Rc<Model>> {
        self.model.as_ref()
    }

    /// Returns true if a remote model is attached to this source.
    #[must_use]
    pub const fn is_resolved(&self) -> bool {
        self.model.is_some()
    }

    /// Attaches the resolved remote model to this source.
    pub fn set_model(&mut self, model: Rc<Model>) {
        self.model = Some(model);
    }

    /// Detaches the resolved remote model, returning this source to the
    /// unresolved state.
    pub fn remove_model(&mut self) {
        self.model = None;
    }
}

impl Entity for ImportSource {
    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn set_id(&mut self, id: impl Into<String>) {
        self.id = Some(id.into());
    }

    fn remove_id(&mut self) {
        self.id = None;
    }
}
