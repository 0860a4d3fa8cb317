//! Stable element ids for a modal instance.

use std::sync::atomic::{AtomicU64, Ordering};

/// Global counter for generated modal ids.
static MODAL_ID_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Prefix of the dialog element id.
pub const DIALOG_PREFIX: &str = "modal";
/// Prefix of the header element id.
pub const HEADER_PREFIX: &str = "modal--header";
/// Prefix of the body element id.
pub const BODY_PREFIX: &str = "modal--body";

/// Generate a process-unique id seed.
pub fn next_id() -> String {
    MODAL_ID_COUNTER.fetch_add(1, Ordering::Relaxed).to_string()
}

/// Ids wiring the dialog to its header and body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModalIds {
    /// `id` of the dialog element
    pub dialog: String,
    /// `id` of the header, referenced by `aria-labelledby`
    pub header: String,
    /// `id` of the body, referenced by `aria-describedby`
    pub body: String,
}

impl ModalIds {
    /// Derive ids from a caller-supplied seed, or generate one.
    #[must_use]
    pub fn new(id: Option<&str>) -> Self {
        let seed = id.map_or_else(next_id, str::to_string);
        Self {
            dialog: format!("{DIALOG_PREFIX}-{seed}"),
            header: format!("{HEADER_PREFIX}-{seed}"),
            body: format!("{BODY_PREFIX}-{seed}"),
        }
    }
}
