//! Error types for import resolution.
//!
//! Resolution failures are anticipated outcomes in this domain: files go
//! missing, references rot, and import graphs grow cycles. They are
//! therefore collected into a [`ResolveErrors`] value that the caller
//! inspects, rather than aborting the walk at the first failure. A branch
//! that fails is left unresolved; sibling branches are still attempted.

use std::fmt;

use seam_error::{AsSeamError, Context};
use seam_model::ImportKind;

/// A single failure observed while resolving one import branch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportError<Ps> {
    /// The file at the given URL could not be read or parsed.
    File {
        /// The URL of the offending file, relative to the base directory
        url: String,
        /// The loader's own description of the failure
        error: Ps,
    },
    /// The fetched model does not define the referenced name.
    Reference {
        /// The URL of the fetched file
        url: String,
        /// The name that was expected inside the fetched model
        name: String,
        /// Whether a component or a units definition was expected
        kind: ImportKind,
    },
    /// The import graph contains a true cycle on the current path.
    Cycle {
        /// The chain of URLs forming the cycle, first element repeated last
        chain: Vec<String>,
    },
}

impl<Ps> ImportError<Ps> {
    /// Creates a new file error for the given URL.
    pub fn file(url: impl Into<String>, error: Ps) -> Self {
        Self::File {
            url: url.into(),
            error,
        }
    }

    /// Creates a new missing-reference error.
    pub fn reference(url: impl Into<String>, name: impl Into<String>, kind: ImportKind) -> Self {
        Self::Reference {
            url: url.into(),
            name: name.into(),
            kind,
        }
    }

    /// Creates a new cycle error from the offending chain of URLs.
    #[must_use]
    pub const fn cycle(chain: Vec<String>) -> Self {
        Self::Cycle { chain }
    }

    /// Returns the URL this error is tied to.
    ///
    /// For a cycle this is the URL that closed it, which is both the first
    /// and the last element of the chain.
    #[must_use]
    pub fn import_url(&self) -> Option<&str> {
        match self {
            Self::File { url, .. } | Self::Reference { url, .. } => Some(url),
            Self::Cycle { chain } => chain.first().map(String::as_str),
        }
    }
}

impl<Ps> fmt::Display for ImportError<Ps> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File { url, .. } => {
                write!(f, "the imported file `{url}` could not be read or parsed")
            }
            Self::Reference { url, name, kind } => {
                let kind = kind.as_str();
                write!(f, "`{url}` does not define a {kind} named `{name}`")
            }
            Self::Cycle { chain } => {
                let chain = chain.join(" -> ");
                write!(f, "import cycle detected: {chain}")
            }
        }
    }
}

impl<Ps: fmt::Debug> AsSeamError for ImportError<Ps> {
    fn message(&self) -> String {
        self.to_string()
    }

    fn url(&self) -> Option<String> {
        self.import_url().map(str::to_string)
    }

    fn context(&self) -> Vec<Context> {
        match self {
            Self::File { .. } => vec![Context::Help(
                "check that the file exists under the resolution base directory".to_string(),
            )],
            Self::Reference { kind, .. } => {
                let kind = kind.as_str();
                vec![Context::Note(format!(
                    "the import reference names a {kind} that the fetched model does not contain"
                ))]
            }
            Self::Cycle { chain } => chain
                .iter()
                .map(|url| Context::Note(format!("imports `{url}`")))
                .collect(),
        }
    }
}

/// The failures collected by one [`crate::resolve_imports`] call.
///
/// Each entry is local to one import branch. Sources named by these errors
/// were left unresolved; everything else was resolved and will not be
/// revisited by a retry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolveErrors<Ps> {
    errors: Vec<ImportError<Ps>>,
}

impl<Ps> ResolveErrors<Ps> {
    pub(crate) const fn new() -> Self {
        Self { errors: vec![] }
    }

    pub(crate) fn push(&mut self, error: ImportError<Ps>) {
        self.errors.push(error);
    }

    /// Returns true if no failures were collected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Returns the number of collected failures.
    #[must_use]
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Returns the collected failures, in discovery order.
    #[must_use]
    pub fn errors(&self) -> &[ImportError<Ps>] {
        &self.errors
    }
}
