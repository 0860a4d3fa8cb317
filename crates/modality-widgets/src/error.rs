//! Error types for modal components.

use modality_core::{ContextError, DomError};
use thiserror::Error;

/// Errors raised while rendering or updating a modal.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModalError {
    /// A modal part was rendered outside of a [`crate::Modal`].
    #[error(transparent)]
    Context(#[from] ContextError),

    /// A document operation failed.
    #[error("document error: {0}")]
    Dom(#[from] DomError),
}

/// Errors raised while loading modal configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The YAML document could not be parsed.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),

    /// A field parsed but carries an unusable value.
    #[error("Invalid value for '{field}': {message}")]
    InvalidValue {
        /// Field name
        field: String,
        /// Error message
        message: String,
    },
}
