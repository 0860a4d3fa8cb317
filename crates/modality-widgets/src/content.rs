//! Dialog content: the overlay container and the dialog element.

use crate::controller::{bind_container, bind_dialog};
use crate::error::ModalError;
use crate::focus_scope::ModalFocusScope;
use crate::presence::Transition;
use crate::scope::{apply_style, fixed_viewport, PartBuilder, PartProps, Scope};
use crate::theme::ModalPart;
use modality_core::NodeId;
use std::rc::Rc;
use tracing::trace;

/// The dialog and the container that receives overlay clicks.
///
/// Renders a full-viewport `div` holding a `section` with `role="dialog"`.
/// Caller attributes land on the dialog, except that `role` and
/// `aria-modal` cannot be overridden.
#[derive(Debug, Clone, Default)]
pub struct ModalContent {
    props: PartProps,
}

impl PartBuilder for ModalContent {
    fn part_props_mut(&mut self) -> &mut PartProps {
        &mut self.props
    }
}

impl ModalContent {
    /// Create empty content.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Render into `scope`. Returns the dialog element.
    pub fn render(&self, scope: &mut Scope<'_>) -> Result<NodeId, ModalError> {
        let ctx = scope.context()?;
        let preset = ctx.props().motion_preset;

        let (container, dialog) = {
            let mut doc = scope.doc().borrow_mut();
            let container = doc.append_element(scope.parent(), "div")?;
            let mut container_style = fixed_viewport();
            container_style.insert("display".into(), "flex".into());
            container_style.insert("justify-content".into(), "center".into());
            container_style.extend(ctx.style(ModalPart::DialogContainer));
            apply_style(&mut doc, container, &container_style);

            let dialog = doc.append_element(container, "section")?;
            apply_style(&mut doc, dialog, &ctx.style(ModalPart::Dialog));
            apply_style(&mut doc, dialog, &self.props.style);
            if let Some(text) = &self.props.text {
                doc.set_text(dialog, text.as_str());
            }
            (container, dialog)
        };

        {
            let mut controller = ctx.controller().borrow_mut();
            controller.attach_container(Some(container));
            controller.attach_dialog(Some(dialog));
        }
        ctx.set_caller_attributes(self.props.attributes.clone());

        let listeners = {
            let mut doc = scope.doc().borrow_mut();
            ctx.refresh_dialog(&mut doc);
            ctx.animate(&mut doc, dialog, Transition::Preset(preset));
            let mut listeners = bind_container(ctx.controller(), &mut doc, container);
            listeners.extend(bind_dialog(ctx.controller(), &mut doc, dialog));
            listeners
        };
        trace!(dialog = %dialog, container = %container, "dialog rendered");

        let owner = Rc::clone(&ctx);
        scope.on_unmount(move |doc| {
            let mut doc = doc.borrow_mut();
            for id in listeners {
                doc.remove_event_listener(id);
            }
            owner.forget_animated(dialog);
            let mut controller = owner.controller().borrow_mut();
            controller.attach_dialog(None);
            controller.attach_container(None);
        });

        self.props.render_children(scope, dialog)?;
        ModalFocusScope::new().attach(scope, dialog)?;
        Ok(dialog)
    }
}
