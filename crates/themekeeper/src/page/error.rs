//! Page errors.

use super::ControlHandle;

/// Error returned when the page rejects an operation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PageError {
    /// No stylesheet with this id is linked from the page
    #[error("no stylesheet with id '{0}'")]
    MissingStylesheet(String),
    /// The handle does not refer to an element of this page
    #[error("no element for control {0}")]
    UnknownControl(ControlHandle),
    /// The document refused the mutation
    #[error("document rejected the change: {0}")]
    Rejected(String),
    /// Markup for a control or snapshot could not be rendered
    #[error("failed to render markup: {0}")]
    Render(String),
}

impl From<minijinja::Error> for PageError {
    fn from(err: minijinja::Error) -> Self {
        PageError::Render(err.to_string())
    }
}
