use crate::Context;

/// Trait for types that can be converted to Seam error messages.
///
/// This trait provides a standardized interface for error types to expose
/// their error message and associated context. It is implemented by the
/// error enums of the model and loader crates so that callers can report
/// every failure through one [`crate::SeamError`] shape.
pub trait AsSeamError {
    /// Returns the primary error message.
    ///
    /// This should be a concise, user-friendly description of what went
    /// wrong, understandable without further context.
    fn message(&self) -> String;

    /// Returns the URL of the model file the error relates to.
    ///
    /// Returns `None` for errors that are not tied to a particular file,
    /// which is the default.
    fn url(&self) -> Option<String> {
        None
    }

    /// Returns additional context information about the error.
    ///
    /// Context provides supplementary notes and suggestions. Returns an
    /// empty vector if no context is available, which is the default.
    fn context(&self) -> Vec<Context> {
        vec![]
    }
}
