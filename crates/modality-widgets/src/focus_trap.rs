//! Focus trap scoped to a subtree.
//!
//! While active, Tab and Shift+Tab cycle through the tabbable elements of
//! the container and never leave it. Activation moves focus inside and
//! remembers the previously focused element; deactivation restores focus.
//!
//! The trap does not deactivate itself on Escape or on outside clicks; the
//! owner decides when to deactivate it.

use modality_core::{
    Document, Event, EventType, Key, ListenerId, NodeId, SharedDocument, WeakDocument,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::rc::Rc;
use tracing::{debug, trace};

/// Element lookup evaluated when the trap needs it.
pub type FocusGetter = Rc<dyn Fn(&Document) -> Option<NodeId>>;

/// Reference to an element that should receive focus.
#[derive(Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FocusTarget {
    /// Element with this `id` attribute
    Id(String),
    /// Specific node
    Node(NodeId),
    /// Resolved on demand
    #[serde(skip)]
    Getter(FocusGetter),
}

impl FocusTarget {
    /// Build a getter target.
    pub fn getter<F>(f: F) -> Self
    where
        F: Fn(&Document) -> Option<NodeId> + 'static,
    {
        Self::Getter(Rc::new(f))
    }

    /// Resolve to a node that can currently take focus.
    ///
    /// Targets that no longer exist or cannot be focused resolve to `None`.
    #[must_use]
    pub fn resolve(&self, doc: &Document) -> Option<NodeId> {
        let node = match self {
            Self::Id(id) => doc.element_by_id(id),
            Self::Node(node) => Some(*node),
            Self::Getter(getter) => getter(doc),
        };
        node.filter(|&n| doc.is_focusable(n))
    }
}

impl fmt::Debug for FocusTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Id(id) => f.debug_tuple("Id").field(id).finish(),
            Self::Node(node) => f.debug_tuple("Node").field(node).finish(),
            Self::Getter(_) => f.write_str("Getter(..)"),
        }
    }
}

impl From<NodeId> for FocusTarget {
    fn from(node: NodeId) -> Self {
        Self::Node(node)
    }
}

/// Focus trap configuration.
#[derive(Debug, Clone, Default)]
pub struct FocusTrapOptions {
    /// Explicit element to focus on activation
    pub initial_focus: Option<FocusTarget>,
    /// Focus the first tabbable element (or the container) when no explicit
    /// initial focus resolves
    pub auto_focus: bool,
    /// Explicit element to focus on deactivation
    pub final_focus: Option<FocusTarget>,
    /// Return focus to the element focused before activation
    pub return_focus: bool,
}

/// Focus trap over a container node.
pub struct FocusTrap {
    doc: WeakDocument,
    container: NodeId,
    options: FocusTrapOptions,
    previous: Option<NodeId>,
    listener: Option<ListenerId>,
}

impl FocusTrap {
    /// Create an inactive trap.
    #[must_use]
    pub fn new(doc: &SharedDocument, container: NodeId, options: FocusTrapOptions) -> Self {
        Self {
            doc: Rc::downgrade(doc),
            container,
            options,
            previous: None,
            listener: None,
        }
    }

    /// Trapped container.
    #[must_use]
    pub const fn container(&self) -> NodeId {
        self.container
    }

    /// Whether the trap is active.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.listener.is_some()
    }

    /// Element that was focused when the trap activated.
    #[must_use]
    pub const fn previous_focus(&self) -> Option<NodeId> {
        self.previous
    }

    /// Activate: remember the focused element, install Tab cycling and move
    /// focus inside. Returns false if already active or the document is gone.
    pub fn activate(&mut self) -> bool {
        if self.is_active() {
            return false;
        }
        let Some(doc) = self.doc.upgrade() else {
            return false;
        };
        let mut doc = doc.borrow_mut();

        self.previous = doc.active_element();
        let container = self.container;
        let weak = self.doc.clone();
        let listener = doc.add_event_listener(
            container,
            EventType::KeyDown,
            Rc::new(move |event: &mut Event| {
                if let Some(doc) = weak.upgrade() {
                    cycle_focus(&mut doc.borrow_mut(), container, event);
                }
            }),
        );
        self.listener = Some(listener);

        let initial = self
            .options
            .initial_focus
            .as_ref()
            .and_then(|target| target.resolve(&doc))
            .or_else(|| {
                self.options.auto_focus.then(|| {
                    doc.tabbable_descendants(container)
                        .first()
                        .copied()
                        .unwrap_or(container)
                })
            });
        if let Some(node) = initial {
            doc.focus(node);
        }
        debug!(container = %container, initial = ?initial, "focus trap activated");
        true
    }

    /// Deactivate: remove Tab cycling and restore focus.
    ///
    /// The explicit final target wins; otherwise the previously focused
    /// element is restored when `return_focus` is set. Targets that can no
    /// longer take focus are skipped.
    pub fn deactivate(&mut self) {
        let Some(listener) = self.listener.take() else {
            return;
        };
        let Some(doc) = self.doc.upgrade() else {
            return;
        };
        let mut doc = doc.borrow_mut();
        doc.remove_event_listener(listener);

        let restore = self
            .options
            .final_focus
            .as_ref()
            .and_then(|target| target.resolve(&doc))
            .or_else(|| {
                self.previous
                    .filter(|&n| self.options.return_focus && doc.is_focusable(n))
            });
        if let Some(node) = restore {
            doc.focus(node);
        } else if doc
            .active_element()
            .is_some_and(|n| doc.contains(self.container, n))
        {
            doc.blur();
        }
        debug!(container = %self.container, restored = ?restore, "focus trap deactivated");
        self.previous = None;
    }
}

impl Drop for FocusTrap {
    fn drop(&mut self) {
        if let (Some(listener), Some(doc)) = (self.listener.take(), self.doc.upgrade()) {
            if let Ok(mut doc) = doc.try_borrow_mut() {
                doc.remove_event_listener(listener);
            }
        }
    }
}

impl fmt::Debug for FocusTrap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FocusTrap")
            .field("container", &self.container)
            .field("active", &self.is_active())
            .field("previous", &self.previous)
            .finish_non_exhaustive()
    }
}

/// Move focus to the next (or previous) tabbable element in `container`.
fn cycle_focus(doc: &mut Document, container: NodeId, event: &mut Event) {
    let Some(keyboard) = event.as_keyboard() else {
        return;
    };
    if keyboard.key != Key::Tab {
        return;
    }
    let backwards = keyboard.modifiers.shift;
    event.prevent_default();

    let tabbable = doc.tabbable_descendants(container);
    if tabbable.is_empty() {
        doc.focus(container);
        return;
    }

    let last = tabbable.len() - 1;
    let current = doc
        .active_element()
        .and_then(|active| tabbable.iter().position(|&n| n == active));
    let next = match (current, backwards) {
        (Some(0), true) | (None, true) => last,
        (Some(i), true) => i - 1,
        (Some(i), false) if i == last => 0,
        (Some(i), false) => i + 1,
        (None, false) => 0,
    };
    trace!(from = ?current, to = next, "focus trap cycling");
    doc.focus(tabbable[next]);
}
