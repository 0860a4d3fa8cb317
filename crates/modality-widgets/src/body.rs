//! Dialog main content.

use crate::error::ModalError;
use crate::scope::{apply_style, PartBuilder, PartProps, Scope};
use crate::theme::ModalPart;
use modality_core::NodeId;
use std::rc::Rc;

/// Main content of the dialog.
///
/// While rendered, the dialog is described by it through
/// `aria-describedby`.
#[derive(Debug, Clone, Default)]
pub struct ModalBody {
    props: PartProps,
}

impl PartBuilder for ModalBody {
    fn part_props_mut(&mut self) -> &mut PartProps {
        &mut self.props
    }
}

impl ModalBody {
    /// Create a body.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Render into `scope`.
    pub fn render(&self, scope: &mut Scope<'_>) -> Result<NodeId, ModalError> {
        let ctx = scope.context()?;
        let node = scope.append("div")?;
        {
            let mut doc = scope.doc().borrow_mut();
            apply_style(&mut doc, node, &ctx.style(ModalPart::Body));
            self.props.apply(&mut doc, node);
            let id = ctx.controller().borrow().ids().body.clone();
            doc.set_attribute(node, "id", id);
            ctx.register_body(&mut doc, true);
        }
        let owner = Rc::clone(&ctx);
        scope.on_unmount(move |doc| owner.register_body(&mut doc.borrow_mut(), false));
        self.props.render_children(scope, node)?;
        Ok(node)
    }
}
