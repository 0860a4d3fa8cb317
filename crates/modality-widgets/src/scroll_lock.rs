//! Body scroll locking.
//!
//! Locking sets `overflow: hidden` on the body. With
//! `preserve_scroll_bar_gap` the scrollbar width is reserved as right
//! padding so content does not shift, and unless `allow_pinch_zoom` is set
//! touch gestures are disabled with `touch-action: none`.
//!
//! Locks are counted per document. The first lock applies the styles, later
//! locks only join it, and the last release restores the exact previous
//! inline values. Stacked modals can therefore close in any order.

use modality_core::{Context, Document};
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use tracing::debug;

const OVERFLOW: &str = "overflow";
const PADDING_RIGHT: &str = "padding-right";
const TOUCH_ACTION: &str = "touch-action";

/// Shared lock state, provided on the body while any lock is held.
#[derive(Debug)]
struct BodyLock {
    holders: Cell<usize>,
    saved: RefCell<Vec<(&'static str, Option<String>)>>,
}

static BODY_LOCK: Context<BodyLock> =
    Context::new("ScrollLock", "body scroll lock state is missing");

/// Scroll lock configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScrollLockOptions {
    /// Keep pinch-zoom gestures working while locked
    pub allow_pinch_zoom: bool,
    /// Pad the body by the scrollbar width
    pub preserve_scroll_bar_gap: bool,
}

/// One hold on the body scroll lock. Release it with [`ScrollLock::release`].
#[derive(Debug, PartialEq, Eq)]
#[must_use = "the body stays locked until `release` is called"]
pub struct ScrollLock {
    options: ScrollLockOptions,
}

impl ScrollLock {
    /// Lock scrolling of the document body.
    ///
    /// When the body is already locked this joins the existing lock and the
    /// styles of the first lock stay in place.
    pub fn acquire(doc: &mut Document, options: ScrollLockOptions) -> Self {
        let body = doc.body();
        if let Some(state) = BODY_LOCK.get(doc, body) {
            state.holders.set(state.holders.get() + 1);
            debug!(holders = state.holders.get(), "body scroll lock joined");
            return Self { options };
        }

        let mut changes: Vec<(&'static str, String)> = vec![(OVERFLOW, "hidden".into())];
        let gap = doc.scrollbar_width();
        if options.preserve_scroll_bar_gap && gap > 0.0 {
            changes.push((PADDING_RIGHT, format!("{gap}px")));
        }
        if !options.allow_pinch_zoom {
            changes.push((TOUCH_ACTION, "none".into()));
        }

        let saved = changes
            .into_iter()
            .map(|(property, value)| {
                let previous = doc.style(body, property).map(str::to_string);
                doc.set_style(body, property, value);
                (property, previous)
            })
            .collect();

        let state = BodyLock {
            holders: Cell::new(1),
            saved: RefCell::new(saved),
        };
        BODY_LOCK.provide(doc, body, Rc::new(state));
        debug!(?options, "body scroll locked");
        Self { options }
    }

    /// Options this hold was acquired with.
    #[must_use]
    pub const fn options(&self) -> ScrollLockOptions {
        self.options
    }

    /// Number of holds on the body lock of `doc`.
    #[must_use]
    pub fn holders(doc: &Document) -> usize {
        BODY_LOCK
            .get(doc, doc.body())
            .map_or(0, |state| state.holders.get())
    }

    /// Give up this hold. The last release restores the body styles that
    /// were in place before the first lock.
    pub fn release(self, doc: &mut Document) {
        let body = doc.body();
        let Some(state) = BODY_LOCK.get(doc, body) else {
            debug!("body scroll lock already released");
            return;
        };
        let remaining = state.holders.get().saturating_sub(1);
        state.holders.set(remaining);
        if remaining > 0 {
            debug!(holders = remaining, "body scroll lock left");
            return;
        }

        BODY_LOCK.revoke(doc, body);
        for (property, previous) in state.saved.take().into_iter().rev() {
            match previous {
                Some(value) => {
                    doc.set_style(body, property, value);
                }
                None => {
                    doc.remove_style(body, property);
                }
            }
        }
        debug!("body scroll released");
    }
}
