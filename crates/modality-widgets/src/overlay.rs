//! Backdrop behind the dialog.

use crate::error::ModalError;
use crate::presence::Transition;
use crate::scope::{apply_style, fixed_viewport, PartBuilder, PartProps, Scope};
use crate::theme::ModalPart;
use modality_core::NodeId;
use std::rc::Rc;

/// Full-viewport backdrop that fades with the modal.
///
/// The overlay is decoration only. Clicks that close the modal are handled
/// by [`crate::ModalContent`]'s container.
#[derive(Debug, Clone, Default)]
pub struct ModalOverlay {
    props: PartProps,
}

impl PartBuilder for ModalOverlay {
    fn part_props_mut(&mut self) -> &mut PartProps {
        &mut self.props
    }
}

impl ModalOverlay {
    /// Create an overlay.
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
            apply_style(&mut doc, node, &fixed_viewport());
            apply_style(&mut doc, node, &ctx.style(ModalPart::Overlay));
            self.props.apply(&mut doc, node);
            ctx.animate(&mut doc, node, Transition::Fade);
        }
        let owner = Rc::clone(&ctx);
        scope.on_unmount(move |_| owner.forget_animated(node));
        self.props.render_children(scope, node)?;
        Ok(node)
    }
}
