//! Background suppression for assistive technology.
//!
//! While a modal dialog is open, everything outside it must be invisible to
//! screen readers. [`hide_others`] marks every branch of the document that
//! does not lead to one of the kept nodes with `aria-hidden="true"` and
//! returns a [`HiddenSiblings`] record that undoes exactly those changes.

use crate::dom::{Document, NodeId};
use tracing::debug;

/// Attribute toggled on suppressed nodes.
pub const ARIA_HIDDEN: &str = "aria-hidden";

/// Nodes that [`hide_others`] marked hidden.
///
/// Only nodes the call actually changed are recorded: a node that was
/// already hidden stays hidden after [`HiddenSiblings::undo`].
#[derive(Debug, Default, Clone, PartialEq, Eq)]
#[must_use = "suppression stays applied until `undo` is called"]
pub struct HiddenSiblings {
    nodes: Vec<NodeId>,
}

impl HiddenSiblings {
    /// A record that hid nothing.
    pub const fn empty() -> Self {
        Self { nodes: Vec::new() }
    }

    /// Nodes marked by this record.
    #[must_use]
    pub fn nodes(&self) -> &[NodeId] {
        &self.nodes
    }

    /// Number of nodes marked.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether nothing was marked.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Remove the markers this record applied.
    pub fn undo(self, doc: &mut Document) {
        debug!(count = self.nodes.len(), "restoring hidden siblings");
        for node in self.nodes {
            doc.remove_attribute(node, ARIA_HIDDEN);
        }
    }
}

/// Hide every node outside `keep` (and outside their ancestor chains).
///
/// Walks from the body: children that contain a kept node are descended
/// into, kept nodes are skipped, and every other child is marked. Kept nodes
/// that are not connected to the document are ignored; if none is
/// connected nothing is hidden.
pub fn hide_others(doc: &mut Document, keep: &[NodeId]) -> HiddenSiblings {
    let keep: Vec<NodeId> = keep
        .iter()
        .copied()
        .filter(|&n| doc.is_connected(n))
        .collect();
    if keep.is_empty() {
        return HiddenSiblings::empty();
    }

    let mut hidden = Vec::new();
    let mut stack = vec![doc.body()];
    while let Some(parent) = stack.pop() {
        let children = doc.children(parent).to_vec();
        for child in children {
            if keep.contains(&child) {
                continue;
            }
            if keep.iter().any(|&k| doc.contains(child, k)) {
                stack.push(child);
                continue;
            }
            if doc.attribute(child, ARIA_HIDDEN) == Some("true") {
                continue;
            }
            doc.set_attribute(child, ARIA_HIDDEN, "true");
            hidden.push(child);
        }
    }

    debug!(count = hidden.len(), "hid background siblings");
    HiddenSiblings { nodes: hidden }
}

/// Whether `node` or one of its ancestors is hidden from assistive technology.
#[must_use]
pub fn is_hidden(doc: &Document, node: NodeId) -> bool {
    std::iter::once(node)
        .chain(doc.ancestors(node))
        .any(|n| doc.attribute(n, ARIA_HIDDEN) == Some("true"))
}
