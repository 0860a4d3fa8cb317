//! Testing harness for Modality dialogs.
//!
//! - [`Harness`]: mounts a [`modality_widgets::Modal`], simulates pointer and
//!   keyboard input, and applies the modal's open-state requests like an
//!   owning application would
//! - [`Selector`]: CSS-like element queries
//! - [`DialogChecker`]: WAI-ARIA dialog pattern checks
//!
//! ```ignore
//! let mut harness = Harness::new(&doc, modal);
//! harness.open();
//! harness.assert_focused("[aria-label='Close']");
//! DialogChecker::check(&harness.doc(), dialog).assert_pass();
//! ```

mod a11y;
mod harness;
mod selector;

pub use a11y::{A11yConfig, A11yReport, A11yViolation, DialogChecker, Impact, DIALOG_ROLES};
pub use harness::Harness;
pub use selector::{Selector, SelectorError, SelectorParser};
