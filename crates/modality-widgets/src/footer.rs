//! Dialog actions row.

use crate::error::ModalError;
use crate::scope::{apply_style, PartBuilder, PartProps, Scope};
use crate::theme::ModalPart;
use modality_core::NodeId;

/// Footer of the dialog, usually holding action buttons.
#[derive(Debug, Clone, Default)]
pub struct ModalFooter {
    props: PartProps,
}

impl PartBuilder for ModalFooter {
    fn part_props_mut(&mut self) -> &mut PartProps {
        &mut self.props
    }
}

impl ModalFooter {
    /// Create a footer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Render into `scope`.
    pub fn render(&self, scope: &mut Scope<'_>) -> Result<NodeId, ModalError> {
        let ctx = scope.context()?;
        let node = scope.append("footer")?;
        {
            let mut doc = scope.doc().borrow_mut();
            apply_style(&mut doc, node, &ctx.style(ModalPart::Footer));
            self.props.apply(&mut doc, node);
        }
        self.props.render_children(scope, node)?;
        Ok(node)
    }
}
