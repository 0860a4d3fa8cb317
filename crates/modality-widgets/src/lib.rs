//! Accessible modal dialog components for Modality.

pub mod body;
pub mod close_button;
pub mod config;
pub mod content;
pub mod context;
pub mod controller;
pub mod error;
pub mod focus_scope;
pub mod focus_trap;
pub mod footer;
pub mod header;
pub mod ids;
pub mod overlay;
pub mod portal;
pub mod presence;
pub mod root;
pub mod scope;
pub mod scroll_lock;
pub mod theme;

pub use body::ModalBody;
pub use close_button::{ModalCloseButton, CLOSE_LABEL};
pub use config::ModalProps;
pub use content::ModalContent;
pub use context::{
    merge_dialog_attributes, use_modal_context, ModalContext, MODAL_CONTEXT,
    MODAL_CONTEXT_MESSAGE,
};
pub use controller::{
    bind_container, bind_dialog, ModalCallbacks, ModalController, ModalEvent, ModalOptions,
    ARIA_DESCRIBEDBY, ARIA_LABELLEDBY,
};
pub use error::{ConfigError, ModalError};
pub use focus_scope::ModalFocusScope;
pub use focus_trap::{FocusGetter, FocusTarget, FocusTrap, FocusTrapOptions};
pub use footer::ModalFooter;
pub use header::ModalHeader;
pub use ids::{next_id, ModalIds};
pub use overlay::ModalOverlay;
pub use portal::{Portal, PORTAL_CLASS};
pub use presence::{MotionPreset, MotionStyle, Presence, PresenceState, Transition};
pub use root::{Modal, ModalPhase};
pub use scope::{render_fn, Attributes, PartBuilder, PartProps, RenderFn, Scope, Teardown};
pub use scroll_lock::{ScrollLock, ScrollLockOptions};
pub use theme::{
    ModalColors, ModalPart, ModalSize, ModalTheme, PartStyles, ScrollBehavior, Style,
    StyleVariant,
};
