//! Modal state controller.
//!
//! The controller owns the dialog's derived ids, its attachment points in
//! the document, the header/body presence flags and the event handlers of
//! the dialog and its container. It also keeps background content hidden
//! from assistive technology while the modal is open.
//!
//! It never changes the open state itself: close requests go through the
//! `close_modal` callback and the owner decides.

use crate::config::ModalProps;
use crate::ids::ModalIds;
use crate::scope::Attributes;
use modality_core::{
    hide_others, Cleanup, Document, Event, EventType, Key, KeyboardEvent, ListenerId,
    MouseEvent, NodeId, SharedDocument, Watcher,
};
use serde::{Deserialize, Serialize};
use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;
use tracing::{debug, trace};

/// `aria-labelledby` attribute name.
pub const ARIA_LABELLEDBY: &str = "aria-labelledby";
/// `aria-describedby` attribute name.
pub const ARIA_DESCRIBEDBY: &str = "aria-describedby";

/// Notifications a modal sends to its owner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ModalEvent {
    /// Request to change the open state
    UpdateIsOpen(bool),
    /// Escape was pressed inside the modal
    Escape(KeyboardEvent),
    /// The container was clicked; carries the requested open state
    Toggle(bool),
    /// The overlay requested closing
    Close,
    /// The dialog was clicked
    Click(MouseEvent),
    /// A key was pressed inside the modal
    KeyDown(KeyboardEvent),
    /// A mouse button went down on the container
    MouseDown(MouseEvent),
}

/// Controller inputs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModalOptions {
    /// Whether the modal is open
    pub is_open: bool,
    /// Id seed
    pub id: Option<String>,
    /// Close on overlay click
    pub close_on_overlay_click: bool,
    /// Close on Escape
    pub close_on_esc: bool,
    /// Hide background content while open
    pub use_inert: bool,
}

impl Default for ModalOptions {
    fn default() -> Self {
        Self {
            is_open: false,
            id: None,
            close_on_overlay_click: true,
            close_on_esc: true,
            use_inert: true,
        }
    }
}

impl From<&ModalProps> for ModalOptions {
    fn from(props: &ModalProps) -> Self {
        Self {
            is_open: props.is_open,
            id: props.id.clone(),
            close_on_overlay_click: props.close_on_overlay_click,
            close_on_esc: props.close_on_esc,
            use_inert: props.use_inert,
        }
    }
}

/// Callbacks the controller drives.
#[derive(Clone)]
pub struct ModalCallbacks {
    /// Request closing
    pub close_modal: Rc<dyn Fn()>,
    /// Escape was pressed, whether or not it closes
    pub handle_escape: Rc<dyn Fn(&KeyboardEvent)>,
    /// Owner notifications
    pub emit: Rc<dyn Fn(ModalEvent)>,
}

impl ModalCallbacks {
    /// Callbacks that do nothing.
    #[must_use]
    pub fn noop() -> Self {
        Self {
            close_modal: Rc::new(|| {}),
            handle_escape: Rc::new(|_| {}),
            emit: Rc::new(|_| {}),
        }
    }
}

impl fmt::Debug for ModalCallbacks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModalCallbacks").finish_non_exhaustive()
    }
}

/// Open/close bookkeeping for one modal instance.
pub struct ModalController {
    options: ModalOptions,
    ids: ModalIds,
    dialog: Option<NodeId>,
    container: Option<NodeId>,
    headers: usize,
    bodies: usize,
    mouse_down_target: Cell<Option<NodeId>>,
    callbacks: ModalCallbacks,
    suppression: Watcher<(Option<NodeId>, bool)>,
}

impl ModalController {
    /// Create a controller. Ids are derived once from `options.id`.
    pub fn new(doc: &SharedDocument, options: ModalOptions, callbacks: ModalCallbacks) -> Self {
        let ids = ModalIds::new(options.id.as_deref());
        let weak = Rc::downgrade(doc);
        let suppression = Watcher::new(
            move |&(dialog, hide): &(Option<NodeId>, bool)| -> Option<Cleanup> {
                let node = dialog.filter(|_| hide)?;
                let doc = weak.upgrade()?;
                let hidden = hide_others(&mut doc.borrow_mut(), &[node]);
                debug!(dialog = %node, hidden = hidden.len(), "background suppressed");
                let weak = weak.clone();
                Some(Box::new(move || {
                    if let Some(doc) = weak.upgrade() {
                        hidden.undo(&mut doc.borrow_mut());
                    }
                }))
            },
        );

        Self {
            options,
            ids,
            dialog: None,
            container: None,
            headers: 0,
            bodies: 0,
            mouse_down_target: Cell::new(None),
            callbacks,
            suppression,
        }
    }

    /// Current options.
    #[must_use]
    pub const fn options(&self) -> &ModalOptions {
        &self.options
    }

    /// Replace the options. Derived ids keep their original values.
    pub fn set_options(&mut self, options: ModalOptions) {
        self.options = options;
    }

    /// Update the open flag.
    pub fn set_open(&mut self, is_open: bool) {
        self.options.is_open = is_open;
    }

    /// Derived ids.
    #[must_use]
    pub const fn ids(&self) -> &ModalIds {
        &self.ids
    }

    /// Whether background content should be hidden right now.
    #[must_use]
    pub const fn should_suppress_background(&self) -> bool {
        self.options.is_open && self.options.use_inert
    }

    /// Whether background content is currently hidden by this controller.
    #[must_use]
    pub const fn is_suppressing(&self) -> bool {
        self.suppression.has_cleanup()
    }

    /// The dialog element, once rendered.
    #[must_use]
    pub const fn dialog(&self) -> Option<NodeId> {
        self.dialog
    }

    /// The overlay/container element, once rendered.
    #[must_use]
    pub const fn container(&self) -> Option<NodeId> {
        self.container
    }

    /// Attach or detach the dialog element.
    pub fn attach_dialog(&mut self, node: Option<NodeId>) {
        self.dialog = node;
    }

    /// Attach or detach the container element.
    pub fn attach_container(&mut self, node: Option<NodeId>) {
        self.container = node;
    }

    /// Whether at least one header is registered.
    #[must_use]
    pub const fn has_header(&self) -> bool {
        self.headers > 0
    }

    /// Register (`true`) or unregister (`false`) one header.
    pub fn set_has_header(&mut self, present: bool) {
        self.headers = count(self.headers, present);
    }

    /// Whether at least one body is registered.
    #[must_use]
    pub const fn has_body(&self) -> bool {
        self.bodies > 0
    }

    /// Register (`true`) or unregister (`false`) one body.
    pub fn set_has_body(&mut self, present: bool) {
        self.bodies = count(self.bodies, present);
    }

    /// Target of the last mousedown on the container.
    #[must_use]
    pub fn mouse_down_target(&self) -> Option<NodeId> {
        self.mouse_down_target.get()
    }

    /// Apply or undo background suppression to match the current state.
    ///
    /// Call after the document reflects the latest render. Any previous
    /// suppression is undone before new suppression is applied. Returns
    /// whether anything changed.
    pub fn sync_suppression(&mut self) -> bool {
        let state = (self.dialog, self.should_suppress_background());
        self.suppression.notify(&state)
    }

    /// Undo suppression for good.
    pub fn dispose(&mut self) {
        self.suppression.stop();
        debug!(dialog_id = %self.ids.dialog, "modal controller disposed");
    }

    /// Attributes of the dialog element.
    #[must_use]
    pub fn dialog_attributes(&self) -> Attributes {
        let mut attrs = Attributes::new();
        attrs.insert("role".into(), "dialog".into());
        attrs.insert("tabindex".into(), "-1".into());
        attrs.insert("id".into(), self.ids.dialog.clone());
        attrs.insert("aria-modal".into(), "true".into());
        if self.has_header() {
            attrs.insert(ARIA_LABELLEDBY.into(), self.ids.header.clone());
        }
        if self.has_body() {
            attrs.insert(ARIA_DESCRIBEDBY.into(), self.ids.body.clone());
        }
        attrs
    }

    // === Handlers ===

    /// Click on the dialog: contained, forwarded to the owner.
    pub fn on_dialog_click(&self, event: &mut Event) {
        event.stop_propagation();
        if let Some(mouse) = event.as_mouse() {
            (self.callbacks.emit)(ModalEvent::Click(mouse.clone()));
        }
    }

    /// Click on the container.
    ///
    /// Every click notifies the owner with `Toggle` and `Close`. Only
    /// clicks that start on the container itself count as overlay clicks
    /// for `close_modal`; clicks bubbling up from the dialog are ignored.
    pub fn on_container_click(&self, event: &mut Event) {
        (self.callbacks.emit)(ModalEvent::Toggle(!self.options.is_open));
        (self.callbacks.emit)(ModalEvent::Close);
        event.stop_propagation();
        if !event.as_mouse().is_some_and(MouseEvent::is_self_target) {
            trace!(target = %event.target(), "ignoring click from inside the container");
            return;
        }
        if self.options.close_on_overlay_click {
            debug!(dialog_id = %self.ids.dialog, "overlay click requests close");
            (self.callbacks.close_modal)();
        }
    }

    /// Key pressed inside the container.
    pub fn on_container_keydown(&self, event: &mut Event) {
        let Some(keyboard) = event.as_keyboard().cloned() else {
            return;
        };
        (self.callbacks.emit)(ModalEvent::KeyDown(keyboard.clone()));
        if keyboard.key != Key::Escape {
            return;
        }
        event.stop_propagation();
        if self.options.close_on_esc {
            debug!(dialog_id = %self.ids.dialog, "escape requests close");
            (self.callbacks.close_modal)();
        }
        (self.callbacks.handle_escape)(&keyboard);
    }

    /// Mouse button pressed on the container.
    pub fn on_container_mousedown(&self, event: &mut Event) {
        if let Some(mouse) = event.as_mouse() {
            self.mouse_down_target.set(Some(mouse.target));
            (self.callbacks.emit)(ModalEvent::MouseDown(mouse.clone()));
        }
    }
}

const fn count(current: usize, present: bool) -> usize {
    if present {
        current.saturating_add(1)
    } else {
        current.saturating_sub(1)
    }
}

impl fmt::Debug for ModalController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModalController")
            .field("options", &self.options)
            .field("ids", &self.ids)
            .field("dialog", &self.dialog)
            .field("container", &self.container)
            .field("headers", &self.headers)
            .field("bodies", &self.bodies)
            .field("suppressing", &self.is_suppressing())
            .finish_non_exhaustive()
    }
}

fn listener<F>(controller: &Rc<RefCell<ModalController>>, handler: F) -> modality_core::Listener
where
    F: Fn(&ModalController, &mut Event) + 'static,
{
    let weak = Rc::downgrade(controller);
    Rc::new(move |event: &mut Event| {
        if let Some(controller) = weak.upgrade() {
            handler(&controller.borrow(), event);
        }
    })
}

/// Install the dialog click handler on `node`.
pub fn bind_dialog(
    controller: &Rc<RefCell<ModalController>>,
    doc: &mut Document,
    node: NodeId,
) -> Vec<ListenerId> {
    vec![doc.add_event_listener(
        node,
        EventType::Click,
        listener(controller, ModalController::on_dialog_click),
    )]
}

/// Install the container click, keydown and mousedown handlers on `node`.
pub fn bind_container(
    controller: &Rc<RefCell<ModalController>>,
    doc: &mut Document,
    node: NodeId,
) -> Vec<ListenerId> {
    vec![
        doc.add_event_listener(
            node,
            EventType::Click,
            listener(controller, ModalController::on_container_click),
        ),
        doc.add_event_listener(
            node,
            EventType::KeyDown,
            listener(controller, ModalController::on_container_keydown),
        ),
        doc.add_event_listener(
            node,
            EventType::MouseDown,
            listener(controller, ModalController::on_container_mousedown),
        ),
    ]
}
