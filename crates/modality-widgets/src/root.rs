//! Modal root.
//!
//! The root owns the portal, the shared [`ModalContext`] and the presence
//! state of the dialog subtree. It is controlled: `is_open` only changes
//! when the owner calls [`Modal::set_open`] or [`Modal::update`]. Close
//! requests from inside the modal arrive as
//! [`ModalEvent::UpdateIsOpen`]`(false)`.
//!
//! ```text
//!   set_open(true)          tick            set_open(false)       tick
//! Closed ──────────▶ Opening ────▶ Open ─────────────────▶ Closing ────▶ Closed
//! ```

use crate::config::ModalProps;
use crate::context::{ModalContext, MODAL_CONTEXT};
use crate::controller::{ModalCallbacks, ModalController, ModalEvent, ModalOptions};
use crate::error::ModalError;
use crate::portal::Portal;
use crate::presence::{Presence, PresenceState, Transition};
use crate::scope::{render_fn, RenderFn, Scope, Teardown};
use crate::theme::ModalTheme;
use modality_core::{KeyboardEvent, NodeId, Scheduler, SharedDocument};
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use std::time::Duration;
use tracing::{debug, warn};

/// Lifecycle phase of a modal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ModalPhase {
    /// Nothing rendered
    #[default]
    Closed,
    /// Enter transition running
    Opening,
    /// Fully shown
    Open,
    /// Exit transition running
    Closing,
}

impl From<PresenceState> for ModalPhase {
    fn from(state: PresenceState) -> Self {
        match state {
            PresenceState::Absent => Self::Closed,
            PresenceState::Entering => Self::Opening,
            PresenceState::Present => Self::Open,
            PresenceState::Exiting => Self::Closing,
        }
    }
}

type EventHandler = Rc<dyn Fn(&ModalEvent)>;

#[derive(Default)]
struct EventLog {
    queue: Vec<ModalEvent>,
    handlers: Vec<EventHandler>,
}

fn emitter(log: &Rc<RefCell<EventLog>>) -> Rc<dyn Fn(ModalEvent)> {
    let log = Rc::clone(log);
    Rc::new(move |event: ModalEvent| {
        let handlers = {
            let mut log = log.borrow_mut();
            log.queue.push(event.clone());
            log.handlers.clone()
        };
        for handler in handlers {
            handler(&event);
        }
    })
}

struct Mounted {
    portal: Portal,
    context: Rc<ModalContext>,
    presence: Presence,
    slot: Option<NodeId>,
    teardown: Vec<Teardown>,
}

impl Mounted {
    fn render_slot(
        &mut self,
        doc: &SharedDocument,
        children: Option<&RenderFn>,
    ) -> Result<(), ModalError> {
        let slot = doc.borrow_mut().append_element(self.portal.host(), "span")?;
        self.slot = Some(slot);
        let result = match children {
            Some(children) => children(&mut Scope::new(doc, slot, &mut self.teardown)),
            None => Ok(()),
        };
        if let Err(err) = result {
            warn!(error = %err, "modal content failed to render");
            self.unmount_slot(doc)?;
            return Err(err);
        }
        debug!(slot = %slot, "modal content rendered");
        Ok(())
    }

    fn unmount_slot(&mut self, doc: &SharedDocument) -> Result<(), ModalError> {
        let teardown: Vec<Teardown> = self.teardown.drain(..).collect();
        for f in teardown.into_iter().rev() {
            f(doc);
        }
        if let Some(slot) = self.slot.take() {
            doc.borrow_mut().remove(slot)?;
            debug!(slot = %slot, "modal content unmounted");
        }
        Ok(())
    }

    fn queue_sync(&self) {
        let controller = Rc::downgrade(self.context.controller());
        self.context.scheduler().queue_post_flush(move || {
            if let Some(controller) = controller.upgrade() {
                controller.borrow_mut().sync_suppression();
            }
        });
    }
}

/// Root of a modal dialog.
pub struct Modal {
    doc: SharedDocument,
    props: ModalProps,
    theme: ModalTheme,
    children: Option<RenderFn>,
    portal_target: Option<NodeId>,
    events: Rc<RefCell<EventLog>>,
    scheduler: Scheduler,
    mounted: Option<Mounted>,
}

impl Modal {
    /// Create an unmounted modal.
    #[must_use]
    pub fn new(doc: &SharedDocument, props: ModalProps) -> Self {
        Self {
            doc: Rc::clone(doc),
            props,
            theme: ModalTheme::default(),
            children: None,
            portal_target: None,
            events: Rc::new(RefCell::new(EventLog::default())),
            scheduler: Scheduler::new(),
            mounted: None,
        }
    }

    /// Set the theme.
    #[must_use]
    pub fn theme(mut self, theme: ModalTheme) -> Self {
        self.theme = theme;
        self
    }

    /// Set the content rendered while the modal is open.
    #[must_use]
    pub fn children<F>(mut self, f: F) -> Self
    where
        F: Fn(&mut Scope<'_>) -> Result<(), ModalError> + 'static,
    {
        self.children = Some(render_fn(f));
        self
    }

    /// Render into `target` instead of the body.
    #[must_use]
    pub const fn portal_target(mut self, target: NodeId) -> Self {
        self.portal_target = Some(target);
        self
    }

    /// Current props.
    #[must_use]
    pub const fn props(&self) -> &ModalProps {
        &self.props
    }

    /// Whether the owner has the modal open.
    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.props.is_open
    }

    /// Register a handler called synchronously for every event.
    ///
    /// Handlers run while the modal is dispatching and must not call back
    /// into it. Use [`Modal::take_events`] to react with state changes.
    pub fn on_event<F>(&self, handler: F)
    where
        F: Fn(&ModalEvent) + 'static,
    {
        self.events.borrow_mut().handlers.push(Rc::new(handler));
    }

    /// Drain the events emitted since the last call.
    pub fn take_events(&self) -> Vec<ModalEvent> {
        std::mem::take(&mut self.events.borrow_mut().queue)
    }

    /// Whether the root is mounted.
    #[must_use]
    pub const fn is_mounted(&self) -> bool {
        self.mounted.is_some()
    }

    /// Mount the root. Content renders right away when `is_open` is set.
    pub fn mount(&mut self) -> Result<(), ModalError> {
        if self.mounted.is_some() {
            return Ok(());
        }
        let portal = Portal::mount(&mut self.doc.borrow_mut(), self.portal_target)?;

        let emit = emitter(&self.events);
        let close_modal: Rc<dyn Fn()> = {
            let emit = Rc::clone(&emit);
            Rc::new(move || emit(ModalEvent::UpdateIsOpen(false)))
        };
        let handle_escape: Rc<dyn Fn(&KeyboardEvent)> = {
            let emit = Rc::clone(&emit);
            Rc::new(move |event: &KeyboardEvent| emit(ModalEvent::Escape(event.clone())))
        };
        let callbacks = ModalCallbacks {
            close_modal: Rc::clone(&close_modal),
            handle_escape,
            emit,
        };

        let controller = Rc::new(RefCell::new(ModalController::new(
            &self.doc,
            ModalOptions::from(&self.props),
            callbacks,
        )));
        let context = Rc::new(ModalContext::new(
            controller,
            self.props.clone(),
            self.theme.resolve(self.props.style_variant()),
            close_modal,
            self.scheduler.clone(),
        ));
        MODAL_CONTEXT.provide(&mut self.doc.borrow_mut(), portal.host(), Rc::clone(&context));

        debug!(
            dialog_id = %context.controller().borrow().ids().dialog,
            host = %portal.host(),
            "modal mounted"
        );
        self.mounted = Some(Mounted {
            portal,
            context,
            presence: Presence::new(Transition::Preset(self.props.motion_preset)),
            slot: None,
            teardown: Vec::new(),
        });
        self.apply_open_state()
    }

    /// Open or close the modal.
    pub fn set_open(&mut self, is_open: bool) -> Result<(), ModalError> {
        let props = self.props.clone().open(is_open);
        self.update(props)
    }

    /// Replace the props.
    ///
    /// Option changes take effect immediately. Style and focus options of an
    /// already rendered dialog apply from its next opening.
    pub fn update(&mut self, props: ModalProps) -> Result<(), ModalError> {
        let toggled = props.is_open != self.props.is_open;
        self.props = props;
        let Some(mounted) = self.mounted.as_mut() else {
            return Ok(());
        };

        let context = &mounted.context;
        context.set_props(self.props.clone());
        context.set_styles(self.theme.resolve(self.props.style_variant()));
        context
            .controller()
            .borrow_mut()
            .set_options(ModalOptions::from(&self.props));
        context.refresh_dialog(&mut self.doc.borrow_mut());
        mounted
            .presence
            .set_transition(Transition::Preset(self.props.motion_preset));

        if toggled {
            debug!(is_open = self.props.is_open, "modal open state changed");
            self.apply_open_state()
        } else {
            mounted.queue_sync();
            self.scheduler.flush();
            Ok(())
        }
    }

    fn apply_open_state(&mut self) -> Result<(), ModalError> {
        let children = self.children.clone();
        let Some(mounted) = self.mounted.as_mut() else {
            return Ok(());
        };
        if self.props.is_open {
            if mounted.slot.is_none() {
                mounted.render_slot(&self.doc, children.as_ref())?;
            }
            mounted.presence.show();
        } else {
            mounted.presence.hide();
        }
        self.settle()
    }

    /// Advance running transitions by `delta`.
    pub fn tick(&mut self, delta: Duration) -> Result<ModalPhase, ModalError> {
        if let Some(mounted) = self.mounted.as_mut() {
            mounted.presence.tick(delta);
        }
        self.settle()?;
        Ok(self.phase())
    }

    /// Jump to the end of running transitions.
    pub fn finish_transitions(&mut self) -> Result<ModalPhase, ModalError> {
        if let Some(mounted) = self.mounted.as_mut() {
            mounted.presence.finish();
        }
        self.settle()?;
        Ok(self.phase())
    }

    fn settle(&mut self) -> Result<(), ModalError> {
        let Some(mounted) = self.mounted.as_mut() else {
            return Ok(());
        };
        mounted
            .context
            .set_progress(&mut self.doc.borrow_mut(), mounted.presence.progress());
        let result = if mounted.presence.state() == PresenceState::Absent {
            mounted.unmount_slot(&self.doc)
        } else {
            Ok(())
        };
        mounted.queue_sync();
        self.scheduler.flush();
        result
    }

    /// Current phase.
    #[must_use]
    pub fn phase(&self) -> ModalPhase {
        self.mounted
            .as_ref()
            .map_or(ModalPhase::Closed, |m| m.presence.state().into())
    }

    /// Shared context, while mounted.
    #[must_use]
    pub fn context(&self) -> Option<Rc<ModalContext>> {
        self.mounted.as_ref().map(|m| Rc::clone(&m.context))
    }

    /// Controller, while mounted.
    #[must_use]
    pub fn controller(&self) -> Option<Rc<RefCell<ModalController>>> {
        self.mounted
            .as_ref()
            .map(|m| Rc::clone(m.context.controller()))
    }

    /// Portal host element, while mounted.
    #[must_use]
    pub fn portal_host(&self) -> Option<NodeId> {
        self.mounted.as_ref().map(|m| m.portal.host())
    }

    /// Dialog element, while rendered.
    #[must_use]
    pub fn dialog(&self) -> Option<NodeId> {
        self.controller().and_then(|c| c.borrow().dialog())
    }

    /// Container element, while rendered.
    #[must_use]
    pub fn container(&self) -> Option<NodeId> {
        self.controller().and_then(|c| c.borrow().container())
    }

    /// Unmount the root and everything it rendered.
    ///
    /// Focus is restored and background suppression undone even if the
    /// modal is open.
    pub fn unmount(&mut self) -> Result<(), ModalError> {
        let Some(mut mounted) = self.mounted.take() else {
            return Ok(());
        };
        let content = mounted.unmount_slot(&self.doc);
        mounted.context.controller().borrow_mut().dispose();
        let portal = {
            let mut doc = self.doc.borrow_mut();
            MODAL_CONTEXT.revoke(&mut doc, mounted.portal.host());
            mounted.portal.unmount(&mut doc)
        };
        self.scheduler.flush();
        debug!("modal unmounted");
        content.and(portal.map_err(ModalError::from))
    }
}

impl Drop for Modal {
    fn drop(&mut self) {
        if let Err(err) = self.unmount() {
            warn!(error = %err, "modal unmount failed");
        }
    }
}

impl fmt::Debug for Modal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Modal")
            .field("props", &self.props)
            .field("phase", &self.phase())
            .field("portal_host", &self.portal_host())
            .finish_non_exhaustive()
    }
}
