//! Render scopes.
//!
//! Parts render into a [`Scope`]: a parent element plus a list of teardown
//! callbacks that run, in reverse order, when the subtree unmounts.

use crate::context::{use_modal_context, ModalContext};
use crate::error::ModalError;
use crate::theme::Style;
use modality_core::{Document, NodeId, SharedDocument};
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

/// Element attributes by name.
pub type Attributes = BTreeMap<String, String>;

/// Callback run when a rendered subtree unmounts.
pub type Teardown = Box<dyn FnOnce(&SharedDocument)>;

/// Child content renderer.
pub type RenderFn = Rc<dyn Fn(&mut Scope<'_>) -> Result<(), ModalError>>;

/// Wrap a closure as a [`RenderFn`].
pub fn render_fn<F>(f: F) -> RenderFn
where
    F: Fn(&mut Scope<'_>) -> Result<(), ModalError> + 'static,
{
    Rc::new(f)
}

/// Position in the document that content renders into.
pub struct Scope<'a> {
    doc: &'a SharedDocument,
    parent: NodeId,
    teardown: &'a mut Vec<Teardown>,
}

impl<'a> Scope<'a> {
    /// Scope rendering under `parent`.
    pub fn new(doc: &'a SharedDocument, parent: NodeId, teardown: &'a mut Vec<Teardown>) -> Self {
        Self {
            doc,
            parent,
            teardown,
        }
    }

    /// The document.
    #[must_use]
    pub const fn doc(&self) -> &'a SharedDocument {
        self.doc
    }

    /// Element new content is appended to.
    #[must_use]
    pub const fn parent(&self) -> NodeId {
        self.parent
    }

    /// Append an element to the parent.
    pub fn append(&mut self, tag: &str) -> Result<NodeId, ModalError> {
        Ok(self.doc.borrow_mut().append_element(self.parent, tag)?)
    }

    /// Append an element with text content.
    pub fn text(&mut self, tag: &str, text: &str) -> Result<NodeId, ModalError> {
        let node = self.append(tag)?;
        self.doc.borrow_mut().set_text(node, text);
        Ok(node)
    }

    /// Scope rendering under `parent` that shares this scope's teardown.
    pub fn nested(&mut self, parent: NodeId) -> Scope<'_> {
        Scope {
            doc: self.doc,
            parent,
            teardown: &mut *self.teardown,
        }
    }

    /// Render `children` under `parent`.
    pub fn render(&mut self, parent: NodeId, children: &RenderFn) -> Result<(), ModalError> {
        children(&mut self.nested(parent))
    }

    /// Run `f` when the subtree unmounts.
    pub fn on_unmount<F>(&mut self, f: F)
    where
        F: FnOnce(&SharedDocument) + 'static,
    {
        self.teardown.push(Box::new(f));
    }

    /// Strict lookup of the enclosing modal.
    pub fn context(&self) -> Result<Rc<ModalContext>, ModalError> {
        Ok(use_modal_context(&self.doc.borrow(), self.parent)?)
    }
}

/// Caller-supplied attributes, style, text and children of a part.
#[derive(Clone, Default)]
pub struct PartProps {
    /// Extra attributes
    pub attributes: Attributes,
    /// Extra inline style, applied over the theme
    pub style: Style,
    /// Text content
    pub text: Option<String>,
    /// Child content
    pub children: Option<RenderFn>,
}

impl PartProps {
    /// Apply style, attributes and text to `node`.
    pub fn apply(&self, doc: &mut Document, node: NodeId) {
        apply_style(doc, node, &self.style);
        apply_attributes(doc, node, &self.attributes);
        if let Some(text) = &self.text {
            doc.set_text(node, text.as_str());
        }
    }

    /// Render the children, if any, under `node`.
    pub fn render_children(&self, scope: &mut Scope<'_>, node: NodeId) -> Result<(), ModalError> {
        match &self.children {
            Some(children) => scope.render(node, children),
            None => Ok(()),
        }
    }
}

impl fmt::Debug for PartProps {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PartProps")
            .field("attributes", &self.attributes)
            .field("style", &self.style)
            .field("text", &self.text)
            .field("children", &self.children.is_some())
            .finish()
    }
}

/// Builder methods shared by every modal part.
pub trait PartBuilder: Sized {
    /// Mutable access to the part's props.
    fn part_props_mut(&mut self) -> &mut PartProps;

    /// Add an attribute.
    #[must_use]
    fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.part_props_mut()
            .attributes
            .insert(name.into(), value.into());
        self
    }

    /// Add an inline style declaration.
    #[must_use]
    fn style(mut self, property: impl Into<String>, value: impl Into<String>) -> Self {
        self.part_props_mut()
            .style
            .insert(property.into(), value.into());
        self
    }

    /// Set text content.
    #[must_use]
    fn text(mut self, text: impl Into<String>) -> Self {
        self.part_props_mut().text = Some(text.into());
        self
    }

    /// Set child content.
    #[must_use]
    fn children<F>(mut self, f: F) -> Self
    where
        F: Fn(&mut Scope<'_>) -> Result<(), ModalError> + 'static,
    {
        self.part_props_mut().children = Some(render_fn(f));
        self
    }
}

/// Set every style in `style` on `node`.
pub fn apply_style(doc: &mut Document, node: NodeId, style: &Style) {
    for (property, value) in style {
        doc.set_style(node, property, value.as_str());
    }
}

/// Set every attribute in `attributes` on `node`.
pub fn apply_attributes(doc: &mut Document, node: NodeId, attributes: &Attributes) {
    for (name, value) in attributes {
        doc.set_attribute(node, name, value.as_str());
    }
}

/// Fixed full-viewport box.
pub(crate) fn fixed_viewport() -> Style {
    [
        ("position", "fixed"),
        ("left", "0"),
        ("top", "0"),
        ("width", "100vw"),
        ("height", "100vh"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect()
}
