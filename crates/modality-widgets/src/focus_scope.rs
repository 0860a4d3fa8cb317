//! Focus trap and scroll lock bound to the dialog's lifetime.

use crate::error::ModalError;
use crate::focus_trap::{FocusTrap, FocusTrapOptions};
use crate::scope::Scope;
use crate::scroll_lock::{ScrollLock, ScrollLockOptions};
use modality_core::NodeId;
use std::cell::RefCell;
use std::rc::Rc;
use tracing::debug;

#[derive(Default)]
struct FocusScopeState {
    trap: Option<FocusTrap>,
    lock: Option<ScrollLock>,
    unmounted: bool,
}

/// Focus management for the dialog.
///
/// Once the render pass has finished, traps focus inside the dialog (when
/// `trap_focus` is set) and locks body scrolling (when
/// `block_scroll_on_mount` is set). Both are released when the dialog
/// unmounts, restoring focus as configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct ModalFocusScope;

impl ModalFocusScope {
    /// Create a focus scope.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Attach to `root`, the dialog element.
    pub fn attach(self, scope: &mut Scope<'_>, root: NodeId) -> Result<(), ModalError> {
        let ctx = scope.context()?;
        let props = ctx.props().clone();
        let doc = Rc::clone(scope.doc());

        let trap = props.trap_focus.then(|| {
            FocusTrap::new(
                &doc,
                root,
                FocusTrapOptions {
                    initial_focus: props.initial_focus_ref.clone(),
                    auto_focus: props.auto_focus,
                    final_focus: props.final_focus_ref.clone(),
                    return_focus: props.return_focus_on_close,
                },
            )
        });
        let state = Rc::new(RefCell::new(FocusScopeState {
            trap,
            ..FocusScopeState::default()
        }));

        let lock_options = props.block_scroll_on_mount.then_some(ScrollLockOptions {
            allow_pinch_zoom: props.allow_pinch_zoom,
            preserve_scroll_bar_gap: props.preserve_scroll_bar_gap,
        });
        let pending = Rc::clone(&state);
        ctx.scheduler().queue_post_flush(move || {
            let mut state = pending.borrow_mut();
            if state.unmounted {
                return;
            }
            if let Some(options) = lock_options {
                state.lock = Some(ScrollLock::acquire(&mut doc.borrow_mut(), options));
            }
            if let Some(trap) = state.trap.as_mut() {
                trap.activate();
            }
            debug!(dialog = %root, "focus scope active");
        });

        scope.on_unmount(move |doc| {
            let mut state = state.borrow_mut();
            state.unmounted = true;
            if let Some(mut trap) = state.trap.take() {
                trap.deactivate();
            }
            if let Some(lock) = state.lock.take() {
                lock.release(&mut doc.borrow_mut());
            }
            debug!(dialog = %root, "focus scope released");
        });
        Ok(())
    }
}
