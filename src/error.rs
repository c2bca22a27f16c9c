use serde::{Deserialize, Serialize};

/// The error surfaced when a report cannot be serialized into a PDF document.
///
/// Input-shape gaps (missing optional sub-records, empty text, absent prices) are
/// recovered locally by the templates and never become a `RenderError`; only a fault
/// in the document serialization itself is reported through this type. It carries a
/// context message and, when the failure was propagated from below, the source error.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct RenderError {
    pub context: String,
    pub source_error: Option<String>,
}

impl std::fmt::Display for RenderError {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.source_error {
            Some(source_error) => write!(
                formatter,
                "{}: {}",
                self.context,
                minimize_first_letter(source_error.to_string()),
            ),
            None => write!(formatter, "{}", self.context),
        }
    }
}

impl std::error::Error for RenderError {}

impl RenderError {
    /// Create a new `RenderError` with the given context.
    pub fn with_context<S: Into<String>>(context: S) -> RenderError {
        RenderError {
            context: context.into(),
            source_error: None,
        }
    }

    /// Create a new `RenderError` with the given context and source error.
    pub fn with_error<S: Into<String>>(context: S, error: &dyn std::error::Error) -> RenderError {
        RenderError {
            context: context.into(),
            source_error: Some(error.to_string()),
        }
    }
}

/// Minimizes the first letter of a string, it is used for standardizing the error message.
fn minimize_first_letter(string: String) -> String {
    let mut characters = string.chars();
    match characters.next() {
        None => String::new(),
        Some(character) => character.to_lowercase().chain(characters).collect(),
    }
}
