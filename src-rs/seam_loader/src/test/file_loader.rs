use std::cell::RefCell;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use seam_model::Model;

use crate::util::FileLoader;

/// An in-memory file loader backed by prebuilt models.
///
/// Every `parse_model` call is logged, resolved or not, so tests can assert
/// how many times a given file was fetched. Paths without an entry fail
/// with a unit error, standing in for an unreadable file.
pub(crate) struct TestModelLoader {
    models: HashMap<PathBuf, Model>,
    fetched: RefCell<Vec<PathBuf>>,
}

impl TestModelLoader {
    /// Creates a loader serving the given path-to-model entries.
    pub(crate) fn new(models: impl IntoIterator<Item = (&'static str, Model)>) -> Self {
        Self {
            models: models
                .into_iter()
                .map(|(path, model)| (PathBuf::from(path), model))
                .collect(),
            fetched: RefCell::new(vec![]),
        }
    }

    /// Creates a loader with no files; every fetch fails.
    pub(crate) fn empty() -> Self {
        Self {
            models: HashMap::new(),
            fetched: RefCell::new(vec![]),
        }
    }

    /// Returns how many fetches this loader served in total, failures
    /// included.
    pub(crate) fn fetch_count(&self) -> usize {
        self.fetched.borrow().len()
    }

    /// Returns how many times the given path was fetched.
    pub(crate) fn fetches_of(&self, path: &str) -> usize {
        let path = Path::new(path);
        self.fetched
            .borrow()
            .iter()
            .filter(|fetched| fetched.as_path() == path)
            .count()
    }
}

impl FileLoader for TestModelLoader {
    type ParseError = ();

    fn parse_model(&self, path: impl AsRef<Path>) -> Result<Model, Self::ParseError> {
        let path = path.as_ref().to_path_buf();
        self.fetched.borrow_mut().push(path.clone());
        self.models.get(&path).cloned().ok_or(())
    }
}
