//! Unified error reporting for Seam.
//!
//! Every fallible Seam subsystem defines its own error enums close to the
//! code that produces them. This crate provides the common denominator those
//! types convert into for display to users: a [`SeamError`] carrying a
//! human-readable message, the URL of the model file involved (when there is
//! one), and optional [`Context`] entries with notes and suggestions.

use std::fmt;

mod context;
mod traits;

pub use context::Context;
pub use traits::AsSeamError;

/// Unified error representation for Seam.
///
/// This struct represents errors in a format suitable for display to users.
/// It includes the URL of the model file the error relates to (if any), a
/// human-readable message, and optional context entries for richer
/// reporting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeamError {
    /// The URL of the model file the error relates to, if known
    url: Option<String>,
    /// Human-readable error message
    message: String,
    /// Optional context information
    context: Vec<Context>,
}

impl SeamError {
    /// Builds a unified error from any type implementing [`AsSeamError`].
    pub fn from_error(error: &impl AsSeamError) -> Self {
        Self {
            url: error.url(),
            message: error.message(),
            context: error.context(),
        }
    }

    /// Returns the URL of the model file the error relates to.
    ///
    /// # Returns
    ///
    /// Returns `Some(url)` when the error is tied to a particular model
    /// file, or `None` for errors with no file association.
    #[must_use]
    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    /// Returns the human-readable error message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the context information attached to this error.
    #[must_use]
    pub fn context(&self) -> &[Context] {
        &self.context
    }
}

impl fmt::Display for SeamError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.url {
            Some(url) => write!(f, "{url}: {message}", message = self.message),
            None => write!(f, "{message}", message = self.message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Broken;

    impl AsSeamError for Broken {
        fn message(&self) -> String {
            "something broke".to_string()
        }

        fn url(&self) -> Option<String> {
            Some("models/broken.sm".to_string())
        }

        fn context(&self) -> Vec<Context> {
            vec![Context::Help("try fixing it".to_string())]
        }
    }

    #[test]
    fn from_error_carries_all_parts() {
        let error = SeamError::from_error(&Broken);

        assert_eq!(error.url(), Some("models/broken.sm"));
        assert_eq!(error.message(), "something broke");
        assert_eq!(
            error.context(),
            &[Context::Help("try fixing it".to_string())]
        );
    }

    #[test]
    fn display_includes_url_when_present() {
        let error = SeamError::from_error(&Broken);
        assert_eq!(error.to_string(), "models/broken.sm: something broke");
    }
}
