/// Contextual information that can be attached to an error.
///
/// The `Context` enum provides a way to attach additional information to
/// error messages, helping users understand the situation in which an error
/// occurred and how to resolve it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Context {
    /// Additional information about the error.
    ///
    /// Notes provide supplementary details, for example the chain of import
    /// URLs that led to a cycle, or the name of the entity that could not be
    /// found.
    Note(String),

    /// A suggestion for resolving the error.
    ///
    /// Help text provides actionable advice, for example checking that a
    /// referenced file exists under the resolution base directory.
    Help(String),
}

impl Context {
    /// Returns the text of this context entry.
    #[must_use]
    pub fn text(&self) -> &str {
        match self {
            Self::Note(text) | Self::Help(text) => text,
        }
    }
}
