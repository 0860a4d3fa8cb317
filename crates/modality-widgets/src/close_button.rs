//! Button that requests closing.

use crate::error::ModalError;
use crate::scope::{apply_style, PartBuilder, PartProps, Scope};
use crate::theme::ModalPart;
use modality_core::{Event, EventType, NodeId};
use std::rc::Rc;
use tracing::debug;

/// Accessible label of the close button.
pub const CLOSE_LABEL: &str = "Close";

/// Close button. Clicking it requests closing the modal.
#[derive(Debug, Clone, Default)]
pub struct ModalCloseButton {
    props: PartProps,
}

impl PartBuilder for ModalCloseButton {
    fn part_props_mut(&mut self) -> &mut PartProps {
        &mut self.props
    }
}

impl ModalCloseButton {
    /// Create a close button.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Render into `scope`.
    pub fn render(&self, scope: &mut Scope<'_>) -> Result<NodeId, ModalError> {
        let ctx = scope.context()?;
        let node = scope.append("button")?;
        let listener = {
            let mut doc = scope.doc().borrow_mut();
            doc.set_attribute(node, "type", "button");
            doc.set_attribute(node, "aria-label", CLOSE_LABEL);
            apply_style(&mut doc, node, &ctx.style(ModalPart::CloseButton));
            self.props.apply(&mut doc, node);

            let weak = Rc::downgrade(&ctx);
            doc.add_event_listener(
                node,
                EventType::Click,
                Rc::new(move |_: &mut Event| {
                    if let Some(ctx) = weak.upgrade() {
                        debug!("close button pressed");
                        ctx.close_modal();
                    }
                }),
            )
        };
        scope.on_unmount(move |doc| {
            doc.borrow_mut().remove_event_listener(listener);
        });
        self.props.render_children(scope, node)?;
        Ok(node)
    }
}
