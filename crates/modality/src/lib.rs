//! Modality: accessible modal dialogs on a headless document model.
//!
//! A [`Modal`] renders an overlay and a `role="dialog"` element into a
//! portal at the end of the body. While open it traps focus, locks body
//! scrolling and hides the rest of the page from assistive technology.
//! The modal is controlled: it reports close requests as
//! [`ModalEvent::UpdateIsOpen`] and the owner decides.
//!
//! ```
//! use modality::prelude::*;
//!
//! let doc = Document::shared();
//! let mut modal = Modal::new(&doc, ModalProps::new().id("confirm")).children(|scope| {
//!     ModalOverlay::new().render(scope)?;
//!     ModalContent::new()
//!         .children(|scope| {
//!             ModalHeader::new().text("Discard changes?").render(scope)?;
//!             ModalCloseButton::new().render(scope)?;
//!             Ok(())
//!         })
//!         .render(scope)?;
//!     Ok(())
//! });
//! modal.mount()?;
//! modal.set_open(true)?;
//!
//! press_key(&doc, Key::Escape);
//! if modal.take_events().contains(&ModalEvent::UpdateIsOpen(false)) {
//!     modal.set_open(false)?;
//! }
//! modal.finish_transitions()?;
//! assert_eq!(modal.phase(), ModalPhase::Closed);
//! # Ok::<(), ModalError>(())
//! ```

pub use modality_core::*;
pub use modality_widgets as widgets;
pub use modality_widgets::{
    use_modal_context, ConfigError, FocusTarget, Modal, ModalBody, ModalCloseButton,
    ModalContent, ModalContext, ModalError, ModalEvent, ModalFocusScope, ModalFooter,
    ModalHeader, ModalOverlay, ModalPhase, ModalProps, ModalSize, ModalTheme, MotionPreset,
    PartBuilder, Scope, ScrollBehavior,
};

/// Common imports.
pub mod prelude {
    pub use modality_core::{
        click, press_key, press_key_with, Document, Key, Modifiers, NodeId, SharedDocument,
    };
    pub use modality_widgets::{
        FocusTarget, Modal, ModalBody, ModalCloseButton, ModalContent, ModalError, ModalEvent,
        ModalFooter, ModalHeader, ModalOverlay, ModalPhase, ModalProps, ModalSize, ModalTheme,
        MotionPreset, PartBuilder, Scope, ScrollBehavior,
    };
}
