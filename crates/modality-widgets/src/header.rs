//! Dialog title.

use crate::error::ModalError;
use crate::scope::{apply_style, PartBuilder, PartProps, Scope};
use crate::theme::ModalPart;
use modality_core::NodeId;
use std::rc::Rc;

/// Title of the dialog.
///
/// While rendered, the dialog is labelled by it through `aria-labelledby`.
#[derive(Debug, Clone, Default)]
pub struct ModalHeader {
    props: PartProps,
}

impl PartBuilder for ModalHeader {
    fn part_props_mut(&mut self) -> &mut PartProps {
        &mut self.props
    }
}

impl ModalHeader {
    /// Create a header.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Render into `scope`.
    pub fn render(&self, scope: &mut Scope<'_>) -> Result<NodeId, ModalError> {
        let ctx = scope.context()?;
        let node = scope.append("header")?;
        {
            let mut doc = scope.doc().borrow_mut();
            apply_style(&mut doc, node, &ctx.style(ModalPart::Header));
            self.props.apply(&mut doc, node);
            let id = ctx.controller().borrow().ids().header.clone();
            doc.set_attribute(node, "id", id);
            ctx.register_header(&mut doc, true);
        }
        let owner = Rc::clone(&ctx);
        scope.on_unmount(move |doc| owner.register_header(&mut doc.borrow_mut(), false));
        self.props.render_children(scope, node)?;
        Ok(node)
    }
}
