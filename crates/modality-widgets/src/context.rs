//! State shared between a modal root and its parts.

use crate::config::ModalProps;
use crate::controller::{ModalController, ARIA_DESCRIBEDBY, ARIA_LABELLEDBY};
use crate::presence::Transition;
use crate::scope::Attributes;
use crate::theme::{ModalPart, PartStyles, Style};
use modality_core::{Context, ContextError, Document, Easing, NodeId, Scheduler};
use std::cell::{Cell, Ref, RefCell};
use std::fmt;
use std::rc::Rc;
use tracing::trace;

/// Message reported when a part renders outside of a modal.
pub const MODAL_CONTEXT_MESSAGE: &str = "useModalContext: `context` is undefined. Seems you forgot to wrap modal components in `<Modal />`";

/// Context key for [`ModalContext`].
pub static MODAL_CONTEXT: Context<ModalContext> =
    Context::new("ModalContext", MODAL_CONTEXT_MESSAGE);

/// Easing applied to enter and exit motion.
pub const MOTION_EASING: Easing = Easing::EaseOut;

/// Attributes the dialog keeps regardless of caller attributes.
const PROTECTED_ATTRIBUTES: [&str; 2] = ["role", "aria-modal"];

/// Everything a part needs from its modal.
pub struct ModalContext {
    controller: Rc<RefCell<ModalController>>,
    props: RefCell<ModalProps>,
    styles: RefCell<PartStyles>,
    close_modal: Rc<dyn Fn()>,
    scheduler: Scheduler,
    caller_attributes: RefCell<Attributes>,
    motion: RefCell<Vec<(NodeId, Transition)>>,
    progress: Cell<f64>,
}

impl ModalContext {
    /// Create a context.
    pub fn new(
        controller: Rc<RefCell<ModalController>>,
        props: ModalProps,
        styles: PartStyles,
        close_modal: Rc<dyn Fn()>,
        scheduler: Scheduler,
    ) -> Self {
        Self {
            controller,
            props: RefCell::new(props),
            styles: RefCell::new(styles),
            close_modal,
            scheduler,
            caller_attributes: RefCell::new(Attributes::new()),
            motion: RefCell::new(Vec::new()),
            progress: Cell::new(0.0),
        }
    }

    /// The modal's controller.
    #[must_use]
    pub const fn controller(&self) -> &Rc<RefCell<ModalController>> {
        &self.controller
    }

    /// Current props.
    #[must_use]
    pub fn props(&self) -> Ref<'_, ModalProps> {
        self.props.borrow()
    }

    /// Replace the props.
    pub fn set_props(&self, props: ModalProps) {
        *self.props.borrow_mut() = props;
    }

    /// Resolved style of one part.
    #[must_use]
    pub fn style(&self, part: ModalPart) -> Style {
        self.styles.borrow().get(part).clone()
    }

    /// Replace the resolved styles.
    pub fn set_styles(&self, styles: PartStyles) {
        *self.styles.borrow_mut() = styles;
    }

    /// Request closing.
    pub fn close_modal(&self) {
        (self.close_modal)();
    }

    /// Post-render job queue.
    #[must_use]
    pub const fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    /// Set attributes the caller passed to the dialog content.
    pub fn set_caller_attributes(&self, attributes: Attributes) {
        *self.caller_attributes.borrow_mut() = attributes;
    }

    /// Bring the dialog element's attributes up to date.
    pub fn refresh_dialog(&self, doc: &mut Document) {
        let controller = self.controller.borrow();
        let Some(dialog) = controller.dialog() else {
            return;
        };
        let merged = merge_dialog_attributes(
            &controller.dialog_attributes(),
            &self.caller_attributes.borrow(),
        );
        for name in [ARIA_LABELLEDBY, ARIA_DESCRIBEDBY] {
            if !merged.contains_key(name) {
                doc.remove_attribute(dialog, name);
            }
        }
        for (name, value) in merged {
            doc.set_attribute(dialog, &name, value);
        }
    }

    /// Mark one header as rendered (`true`) or unmounted (`false`).
    pub fn register_header(&self, doc: &mut Document, present: bool) {
        self.controller.borrow_mut().set_has_header(present);
        self.refresh_dialog(doc);
    }

    /// Mark one body as rendered (`true`) or unmounted (`false`).
    pub fn register_body(&self, doc: &mut Document, present: bool) {
        self.controller.borrow_mut().set_has_body(present);
        self.refresh_dialog(doc);
    }

    /// Animate `node` with `transition` and apply its current frame.
    pub fn animate(&self, doc: &mut Document, node: NodeId, transition: Transition) {
        self.motion.borrow_mut().push((node, transition));
        apply_frame(doc, node, transition, self.progress.get());
    }

    /// Stop animating `node`.
    pub fn forget_animated(&self, node: NodeId) {
        self.motion.borrow_mut().retain(|(n, _)| *n != node);
    }

    /// Current visibility progress.
    #[must_use]
    pub fn progress(&self) -> f64 {
        self.progress.get()
    }

    /// Apply visibility `progress` to every animated node.
    pub fn set_progress(&self, doc: &mut Document, progress: f64) {
        self.progress.set(progress);
        for &(node, transition) in self.motion.borrow().iter() {
            apply_frame(doc, node, transition, progress);
        }
    }
}

impl fmt::Debug for ModalContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModalContext")
            .field("controller", &self.controller)
            .field("progress", &self.progress.get())
            .finish_non_exhaustive()
    }
}

/// Strict lookup of the modal enclosing `node`.
///
/// # Errors
///
/// Returns [`ContextError::Missing`] with [`MODAL_CONTEXT_MESSAGE`] when
/// `node` is not inside a modal.
pub fn use_modal_context(doc: &Document, node: NodeId) -> Result<Rc<ModalContext>, ContextError> {
    MODAL_CONTEXT.inject(doc, node)
}

/// Merge caller attributes over the dialog's own attributes.
///
/// Callers may add attributes and override most of them, but `role` and
/// `aria-modal` always keep the dialog's values.
#[must_use]
pub fn merge_dialog_attributes(own: &Attributes, caller: &Attributes) -> Attributes {
    let mut merged = own.clone();
    for (name, value) in caller {
        if PROTECTED_ATTRIBUTES.contains(&name.as_str()) && own.contains_key(name) {
            continue;
        }
        merged.insert(name.clone(), value.clone());
    }
    merged
}

fn apply_frame(doc: &mut Document, node: NodeId, transition: Transition, progress: f64) {
    let frame = transition.style_at(progress, MOTION_EASING);
    if progress >= 1.0 || !transition.is_animated() {
        doc.remove_style(node, "opacity");
        doc.remove_style(node, "transform");
        return;
    }
    trace!(node = %node, progress, "motion frame");
    doc.set_style(node, "opacity", format!("{:.3}", frame.opacity));
    match frame.transform {
        Some(transform) => {
            doc.set_style(node, "transform", transform);
        }
        None => {
            doc.remove_style(node, "transform");
        }
    }
}
