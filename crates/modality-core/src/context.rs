//! Subtree-scoped context values.
//!
//! A provider publishes a value at a node; any descendant resolves it by
//! walking its ancestors to the nearest provider. [`Context::inject`] is the
//! strict lookup and fails with the context's message when no provider
//! exists. [`Context::get`] is the lenient form.

use crate::dom::{Document, NodeId};
use crate::error::ContextError;
use std::fmt;
use std::marker::PhantomData;
use std::rc::Rc;

/// Typed key for a value provided to a subtree.
pub struct Context<T: 'static> {
    name: &'static str,
    message: &'static str,
    _marker: PhantomData<fn() -> T>,
}

impl<T: 'static> Context<T> {
    /// Declare a context. `message` is reported by strict lookups that find
    /// no provider.
    #[must_use]
    pub const fn new(name: &'static str, message: &'static str) -> Self {
        Self {
            name,
            message,
            _marker: PhantomData,
        }
    }

    /// Context name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Publish `value` to `node` and its descendants.
    pub fn provide(&self, doc: &mut Document, node: NodeId, value: Rc<T>) {
        doc.provide_value(node, self.name, value);
    }

    /// Withdraw the value published at `node`.
    pub fn revoke(&self, doc: &mut Document, node: NodeId) -> bool {
        doc.revoke_value(node, self.name)
    }

    /// Nearest provided value at or above `node`.
    #[must_use]
    pub fn get(&self, doc: &Document, node: NodeId) -> Option<Rc<T>> {
        std::iter::once(node)
            .chain(doc.ancestors(node))
            .find_map(|n| doc.provided_value(n, self.name))
            .and_then(|value| value.downcast::<T>().ok())
    }

    /// Strict lookup.
    ///
    /// # Errors
    ///
    /// Returns [`ContextError::Missing`] when no ancestor provides a value.
    pub fn inject(&self, doc: &Document, node: NodeId) -> Result<Rc<T>, ContextError> {
        self.get(doc, node).ok_or_else(|| ContextError::Missing {
            name: self.name,
            message: self.message.to_string(),
        })
    }
}

impl<T> fmt::Debug for Context<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Context").field("name", &self.name).finish()
    }
}
