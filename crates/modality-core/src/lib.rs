//! Core primitives for modal dialogs.
//!
//! This crate provides the headless document model and the reactive,
//! accessibility and event plumbing the dialog widgets are built on:
//!
//! - [`Document`]: element tree with attributes, styles, focus and listeners
//! - [`dispatch()`]: bubbling event delivery
//! - [`hide_others`]: `aria-hidden` suppression of background content
//! - [`Watcher`] and [`Scheduler`]: change observers and post-flush jobs
//! - [`Context`]: subtree-scoped values with strict lookup

pub mod aria;
pub mod color;
pub mod context;
pub mod dispatch;
pub mod dom;
pub mod easing;
pub mod effect;
pub mod error;
pub mod event;

pub use aria::{hide_others, is_hidden, HiddenSiblings, ARIA_HIDDEN};
pub use color::{Color, ColorParseError};
pub use context::Context;
pub use dispatch::{click, dispatch, mouse_down, pointer_press, press_key, press_key_with};
pub use dom::{Document, Listener, ListenerId, NodeId, SharedDocument, WeakDocument};
pub use easing::Easing;
pub use effect::{Cleanup, Job, Scheduler, Watcher};
pub use error::{ContextError, DomError};
pub use event::{Event, EventType, Key, KeyboardEvent, Modifiers, MouseButton, MouseEvent};
