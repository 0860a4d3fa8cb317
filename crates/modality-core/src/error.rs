//! Error types for modality-core.

use crate::dom::NodeId;
use thiserror::Error;

/// Errors raised by structural operations on a [`crate::Document`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomError {
    /// The node does not exist in this document.
    #[error("unknown node {0}")]
    UnknownNode(NodeId),

    /// Appending would make a node its own ancestor.
    #[error("cannot append {child} under {parent}: would create a cycle")]
    Cycle {
        /// Prospective parent.
        parent: NodeId,
        /// Node being appended.
        child: NodeId,
    },

    /// The document root cannot be moved or removed.
    #[error("the document root cannot be detached")]
    DetachRoot,
}

/// Errors raised when resolving a provided context.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContextError {
    /// A strict context was requested outside of any provider.
    #[error("{message}")]
    Missing {
        /// Context name.
        name: &'static str,
        /// Message describing the required ancestor.
        message: String,
    },
}

impl ContextError {
    /// Name of the context that could not be resolved.
    #[must_use]
    pub const fn context_name(&self) -> &'static str {
        match self {
            Self::Missing { name, .. } => name,
        }
    }
}
