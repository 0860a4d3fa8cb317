//! Headless document model.
//!
//! A [`Document`] is an arena of element nodes with attributes, inline
//! styles, text, keyboard focus and event listeners. It stands in for the
//! browser DOM so that dialog behavior (focus trapping, background
//! suppression, portals) can be expressed and tested without a renderer.
//!
//! Nodes are addressed by [`NodeId`]. Removing a node detaches its subtree
//! but keeps it in the arena, so a detached node can be re-attached later,
//! the same way a DOM node survives `removeChild`.

use crate::error::DomError;
use crate::event::EventType;
use serde::{Deserialize, Serialize};
use std::any::Any;
use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::rc::{Rc, Weak};

/// Shared, single-threaded handle to a document.
pub type SharedDocument = Rc<RefCell<Document>>;

/// Non-owning handle to a document, held by listeners stored inside it.
pub type WeakDocument = Weak<RefCell<Document>>;

/// Event listener callback.
pub type Listener = Rc<dyn Fn(&mut crate::event::Event)>;

/// Tags that are keyboard focusable without an explicit `tabindex`.
const NATIVELY_FOCUSABLE: &[&str] = &["button", "input", "select", "textarea", "summary"];

/// Identifier of a node in a [`Document`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub u64);

impl NodeId {
    /// Create a node ID.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Identifier of a registered event listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(pub u64);

#[derive(Debug, Clone)]
struct Node {
    tag: String,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    attributes: BTreeMap<String, String>,
    styles: BTreeMap<String, String>,
    text: Option<String>,
}

impl Node {
    fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_ascii_lowercase(),
            parent: None,
            children: Vec::new(),
            attributes: BTreeMap::new(),
            styles: BTreeMap::new(),
            text: None,
        }
    }
}

struct ListenerEntry {
    id: ListenerId,
    node: NodeId,
    event_type: EventType,
    listener: Listener,
}

/// Headless element tree.
pub struct Document {
    nodes: HashMap<NodeId, Node>,
    next_id: u64,
    root: NodeId,
    body: NodeId,
    focus: Option<NodeId>,
    scrollbar_width: f32,
    listeners: Vec<ListenerEntry>,
    next_listener_id: u64,
    provided: HashMap<(NodeId, &'static str), Rc<dyn Any>>,
}

impl Document {
    /// Create a document containing `<html><body></body></html>`.
    #[must_use]
    pub fn new() -> Self {
        let root = NodeId::new(0);
        let body = NodeId::new(1);
        let mut nodes = HashMap::new();
        let mut html = Node::new("html");
        html.children.push(body);
        let mut body_node = Node::new("body");
        body_node.parent = Some(root);
        nodes.insert(root, html);
        nodes.insert(body, body_node);

        Self {
            nodes,
            next_id: 2,
            root,
            body,
            focus: None,
            scrollbar_width: 0.0,
            listeners: Vec::new(),
            next_listener_id: 0,
            provided: HashMap::new(),
        }
    }

    /// Create a new document behind a shared handle.
    #[must_use]
    pub fn shared() -> SharedDocument {
        Rc::new(RefCell::new(Self::new()))
    }

    /// The `<html>` node.
    #[must_use]
    pub const fn root(&self) -> NodeId {
        self.root
    }

    /// The `<body>` node.
    #[must_use]
    pub const fn body(&self) -> NodeId {
        self.body
    }

    /// Number of nodes ever created and still stored.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always false: a document has at least `html` and `body`.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    // === Tree structure ===

    /// Create a detached element.
    pub fn create_element(&mut self, tag: &str) -> NodeId {
        let id = NodeId::new(self.next_id);
        self.next_id += 1;
        self.nodes.insert(id, Node::new(tag));
        id
    }

    /// Whether `node` exists in this document.
    #[must_use]
    pub fn exists(&self, node: NodeId) -> bool {
        self.nodes.contains_key(&node)
    }

    /// Append `child` as the last child of `parent`, moving it if attached.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), DomError> {
        if !self.exists(parent) {
            return Err(DomError::UnknownNode(parent));
        }
        if !self.exists(child) {
            return Err(DomError::UnknownNode(child));
        }
        if child == self.root {
            return Err(DomError::DetachRoot);
        }
        if self.contains(child, parent) {
            return Err(DomError::Cycle { parent, child });
        }

        self.unlink(child);
        if let Some(node) = self.nodes.get_mut(&child) {
            node.parent = Some(parent);
        }
        if let Some(node) = self.nodes.get_mut(&parent) {
            node.children.push(child);
        }
        Ok(())
    }

    /// Create an element and append it to `parent`.
    pub fn append_element(&mut self, parent: NodeId, tag: &str) -> Result<NodeId, DomError> {
        let id = self.create_element(tag);
        self.append_child(parent, id)?;
        Ok(id)
    }

    /// Detach `node` (and its subtree) from its parent.
    ///
    /// Focus inside the detached subtree is dropped, as a browser does.
    pub fn remove(&mut self, node: NodeId) -> Result<(), DomError> {
        if node == self.root {
            return Err(DomError::DetachRoot);
        }
        if !self.exists(node) {
            return Err(DomError::UnknownNode(node));
        }
        self.unlink(node);
        if self.focus.is_some_and(|f| self.contains(node, f)) {
            self.focus = None;
        }
        Ok(())
    }

    fn unlink(&mut self, node: NodeId) {
        let parent = self.nodes.get_mut(&node).and_then(|n| n.parent.take());
        if let Some(parent) = parent {
            if let Some(p) = self.nodes.get_mut(&parent) {
                p.children.retain(|&c| c != node);
            }
        }
    }

    /// Parent of `node`.
    #[must_use]
    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.nodes.get(&node).and_then(|n| n.parent)
    }

    /// Children of `node` in order (empty for unknown nodes).
    #[must_use]
    pub fn children(&self, node: NodeId) -> &[NodeId] {
        self.nodes.get(&node).map_or(&[], |n| n.children.as_slice())
    }

    /// Tag name of `node`, lowercase.
    #[must_use]
    pub fn tag(&self, node: NodeId) -> Option<&str> {
        self.nodes.get(&node).map(|n| n.tag.as_str())
    }

    /// Whether `node` is `ancestor` or one of its descendants.
    #[must_use]
    pub fn contains(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.parent(id);
        }
        false
    }

    /// Whether `node` is attached under the document root.
    #[must_use]
    pub fn is_connected(&self, node: NodeId) -> bool {
        self.exists(node) && self.contains(self.root, node)
    }

    /// Ancestors of `node`, nearest first.
    #[must_use]
    pub fn ancestors(&self, node: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut current = self.parent(node);
        while let Some(id) = current {
            out.push(id);
            current = self.parent(id);
        }
        out
    }

    /// Descendants of `node` in document (pre-)order, excluding `node`.
    #[must_use]
    pub fn descendants(&self, node: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.children(node).iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            out.push(id);
            stack.extend(self.children(id).iter().rev().copied());
        }
        out
    }

    /// Nodes an event targeting `node` visits while bubbling, target first.
    #[must_use]
    pub fn propagation_path(&self, node: NodeId) -> Vec<NodeId> {
        if !self.exists(node) {
            return Vec::new();
        }
        let mut path = vec![node];
        path.extend(self.ancestors(node));
        path
    }

    /// First connected element whose `id` attribute equals `id`.
    #[must_use]
    pub fn element_by_id(&self, id: &str) -> Option<NodeId> {
        std::iter::once(self.root)
            .chain(self.descendants(self.root))
            .find(|&n| self.attribute(n, "id") == Some(id))
    }

    // === Attributes, styles, text ===

    /// Set an attribute. Returns false for unknown nodes.
    pub fn set_attribute(&mut self, node: NodeId, name: &str, value: impl Into<String>) -> bool {
        self.nodes.get_mut(&node).is_some_and(|n| {
            n.attributes.insert(name.to_string(), value.into());
            true
        })
    }

    /// Remove an attribute, returning its previous value.
    pub fn remove_attribute(&mut self, node: NodeId, name: &str) -> Option<String> {
        self.nodes.get_mut(&node)?.attributes.remove(name)
    }

    /// Read an attribute.
    #[must_use]
    pub fn attribute(&self, node: NodeId, name: &str) -> Option<&str> {
        self.nodes
            .get(&node)?
            .attributes
            .get(name)
            .map(String::as_str)
    }

    /// Whether an attribute is present.
    #[must_use]
    pub fn has_attribute(&self, node: NodeId, name: &str) -> bool {
        self.attribute(node, name).is_some()
    }

    /// All attributes of `node`.
    #[must_use]
    pub fn attributes(&self, node: NodeId) -> Option<&BTreeMap<String, String>> {
        self.nodes.get(&node).map(|n| &n.attributes)
    }

    /// Set an inline style property. Returns false for unknown nodes.
    pub fn set_style(&mut self, node: NodeId, property: &str, value: impl Into<String>) -> bool {
        self.nodes.get_mut(&node).is_some_and(|n| {
            n.styles.insert(property.to_string(), value.into());
            true
        })
    }

    /// Remove an inline style property, returning its previous value.
    pub fn remove_style(&mut self, node: NodeId, property: &str) -> Option<String> {
        self.nodes.get_mut(&node)?.styles.remove(property)
    }

    /// Read an inline style property.
    #[must_use]
    pub fn style(&self, node: NodeId, property: &str) -> Option<&str> {
        self.nodes
            .get(&node)?
            .styles
            .get(property)
            .map(String::as_str)
    }

    /// All inline styles of `node`.
    #[must_use]
    pub fn styles(&self, node: NodeId) -> Option<&BTreeMap<String, String>> {
        self.nodes.get(&node).map(|n| &n.styles)
    }

    /// Set the text content of `node`.
    pub fn set_text(&mut self, node: NodeId, text: impl Into<String>) -> bool {
        self.nodes.get_mut(&node).is_some_and(|n| {
            n.text = Some(text.into());
            true
        })
    }

    /// Text content of `node`.
    #[must_use]
    pub fn text(&self, node: NodeId) -> Option<&str> {
        self.nodes.get(&node)?.text.as_deref()
    }

    // === Focus ===

    fn tab_index(&self, node: NodeId) -> Option<i32> {
        self.attribute(node, "tabindex")?.trim().parse().ok()
    }

    fn is_disabled(&self, node: NodeId) -> bool {
        self.has_attribute(node, "disabled") || self.has_attribute(node, "hidden")
    }

    fn is_natively_focusable(&self, node: NodeId) -> bool {
        match self.tag(node) {
            Some("a") => self.has_attribute(node, "href"),
            Some(tag) => NATIVELY_FOCUSABLE.contains(&tag),
            None => false,
        }
    }

    /// Whether `node` can receive focus programmatically.
    ///
    /// Elements with any `tabindex` (including `-1`) qualify, as do natively
    /// focusable elements. Disabled or disconnected nodes never do.
    #[must_use]
    pub fn is_focusable(&self, node: NodeId) -> bool {
        self.is_connected(node)
            && !self.is_disabled(node)
            && (self.tab_index(node).is_some() || self.is_natively_focusable(node))
    }

    /// Whether `node` participates in sequential (Tab) navigation.
    #[must_use]
    pub fn is_tabbable(&self, node: NodeId) -> bool {
        self.is_focusable(node) && self.tab_index(node).map_or(true, |t| t >= 0)
    }

    /// Tabbable descendants of `container` in Tab order.
    ///
    /// Positive `tabindex` values come first in ascending order, then the
    /// remaining elements in document order.
    #[must_use]
    pub fn tabbable_descendants(&self, container: NodeId) -> Vec<NodeId> {
        let mut tabbable: Vec<(usize, i32, NodeId)> = self
            .descendants(container)
            .into_iter()
            .filter(|&n| self.is_tabbable(n))
            .enumerate()
            .map(|(order, n)| (order, self.tab_index(n).unwrap_or(0), n))
            .collect();

        tabbable.sort_by(|a, b| match (a.1, b.1) {
            (0, 0) => a.0.cmp(&b.0),
            (0, _) => std::cmp::Ordering::Greater,
            (_, 0) => std::cmp::Ordering::Less,
            _ => a.1.cmp(&b.1).then(a.0.cmp(&b.0)),
        });

        tabbable.into_iter().map(|(_, _, n)| n).collect()
    }

    /// Move focus to `node`. Returns false (and leaves focus alone) if the
    /// node cannot be focused.
    pub fn focus(&mut self, node: NodeId) -> bool {
        if self.is_focusable(node) {
            self.focus = Some(node);
            true
        } else {
            false
        }
    }

    /// Drop focus back to the body.
    pub fn blur(&mut self) {
        self.focus = None;
    }

    /// The focused element, if any element other than the body has focus.
    #[must_use]
    pub fn active_element(&self) -> Option<NodeId> {
        self.focus.filter(|&n| self.is_connected(n))
    }

    /// Event target for keyboard input: the focused element or the body.
    #[must_use]
    pub fn key_target(&self) -> NodeId {
        self.active_element().unwrap_or(self.body)
    }

    // === Viewport ===

    /// Width of the classic scrollbar in pixels (0 for overlay scrollbars).
    #[must_use]
    pub const fn scrollbar_width(&self) -> f32 {
        self.scrollbar_width
    }

    /// Set the simulated scrollbar width.
    pub fn set_scrollbar_width(&mut self, width: f32) {
        self.scrollbar_width = width.max(0.0);
    }

    // === Listeners ===

    /// Register `listener` for `event_type` events reaching `node`.
    pub fn add_event_listener(
        &mut self,
        node: NodeId,
        event_type: EventType,
        listener: Listener,
    ) -> ListenerId {
        let id = ListenerId(self.next_listener_id);
        self.next_listener_id += 1;
        self.listeners.push(ListenerEntry {
            id,
            node,
            event_type,
            listener,
        });
        id
    }

    /// Unregister a listener. Returns false if it was not registered.
    pub fn remove_event_listener(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|entry| entry.id != id);
        self.listeners.len() != before
    }

    /// Listeners registered on `node` for `event_type`, in registration order.
    #[must_use]
    pub fn listeners_for(&self, node: NodeId, event_type: EventType) -> Vec<Listener> {
        self.listeners
            .iter()
            .filter(|entry| entry.node == node && entry.event_type == event_type)
            .map(|entry| Rc::clone(&entry.listener))
            .collect()
    }

    /// Number of registered listeners.
    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    // === Provided values (see `crate::context`) ===

    pub(crate) fn provide_value(&mut self, node: NodeId, key: &'static str, value: Rc<dyn Any>) {
        self.provided.insert((node, key), value);
    }

    pub(crate) fn revoke_value(&mut self, node: NodeId, key: &'static str) -> bool {
        self.provided.remove(&(node, key)).is_some()
    }

    pub(crate) fn provided_value(&self, node: NodeId, key: &'static str) -> Option<Rc<dyn Any>> {
        self.provided.get(&(node, key)).cloned()
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Document")
            .field("node_count", &self.nodes.len())
            .field("focus", &self.focus)
            .field("listener_count", &self.listeners.len())
            .field("provided_count", &self.provided.len())
            .finish_non_exhaustive()
    }
}
