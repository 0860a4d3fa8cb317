//! Test harness for modal dialogs.
//!
//! The harness plays the owner of a [`Modal`]: it forwards
//! [`ModalEvent::UpdateIsOpen`] requests back into the modal after every
//! interaction, the way an application binding `is_open` to its own state
//! would.

use crate::selector::Selector;
use modality_core::{
    click, mouse_down, press_key, press_key_with, Document, Key, Modifiers, NodeId,
    SharedDocument,
};
use modality_widgets::{Modal, ModalError, ModalEvent, ModalPhase};
use std::cell::Ref;
use std::time::Duration;
use tracing::trace;

/// Test harness for interacting with a mounted modal.
pub struct Harness {
    doc: SharedDocument,
    modal: Modal,
    events: Vec<ModalEvent>,
    controlled: bool,
    finish_transitions: bool,
}

impl Harness {
    /// Mount `modal` and wrap it.
    ///
    /// # Panics
    ///
    /// Panics if the modal fails to mount.
    pub fn new(doc: &SharedDocument, mut modal: Modal) -> Self {
        if let Err(err) = modal.mount() {
            panic!("modal failed to mount: {err}");
        }
        let mut harness = Self {
            doc: SharedDocument::clone(doc),
            modal,
            events: Vec::new(),
            controlled: true,
            finish_transitions: true,
        };
        harness.settle();
        harness
    }

    /// Whether close requests are applied to the modal (default true).
    #[must_use]
    pub const fn controlled(mut self, controlled: bool) -> Self {
        self.controlled = controlled;
        self
    }

    /// Whether transitions complete instantly after each step (default true).
    #[must_use]
    pub fn finish_transitions(mut self, finish: bool) -> Self {
        self.finish_transitions = finish;
        self.settle();
        self
    }

    /// The document.
    #[must_use]
    pub fn doc(&self) -> Ref<'_, Document> {
        self.doc.borrow()
    }

    /// The modal under test.
    #[must_use]
    pub const fn modal(&self) -> &Modal {
        &self.modal
    }

    /// Mutable access to the modal under test.
    pub fn modal_mut(&mut self) -> &mut Modal {
        &mut self.modal
    }

    /// Events seen so far.
    #[must_use]
    pub fn events(&self) -> &[ModalEvent] {
        &self.events
    }

    /// Forget the events seen so far.
    pub fn clear_events(&mut self) -> &mut Self {
        self.events.clear();
        self
    }

    // === Owner actions ===

    /// Open the modal.
    pub fn open(&mut self) -> &mut Self {
        self.apply_open(true)
    }

    /// Close the modal.
    pub fn close(&mut self) -> &mut Self {
        self.apply_open(false)
    }

    /// Advance transitions by `delta`.
    pub fn tick(&mut self, delta: Duration) -> &mut Self {
        self.check(|modal| modal.tick(delta).map(|_| ()));
        self
    }

    /// Current phase.
    #[must_use]
    pub fn phase(&self) -> ModalPhase {
        self.modal.phase()
    }

    // === Event simulation ===

    /// Press and release the primary button on the element matching
    /// `selector`.
    pub fn click(&mut self, selector: &str) -> &mut Self {
        if let Some(node) = self.query(selector) {
            self.click_node(node);
        }
        self
    }

    /// Press and release the primary button on `node`.
    pub fn click_node(&mut self, node: NodeId) -> &mut Self {
        mouse_down(&self.doc, node);
        click(&self.doc, node);
        self.pump()
    }

    /// Press a key on the focused element.
    pub fn press_key(&mut self, key: Key) -> &mut Self {
        press_key(&self.doc, key);
        self.pump()
    }

    /// Press Tab, or Shift+Tab when `backward`.
    pub fn tab(&mut self, backward: bool) -> &mut Self {
        let modifiers = if backward {
            Modifiers::SHIFT
        } else {
            Modifiers::NONE
        };
        press_key_with(&self.doc, Key::Tab, modifiers);
        self.pump()
    }

    /// Focus the element matching `selector`.
    pub fn focus(&mut self, selector: &str) -> &mut Self {
        if let Some(node) = self.query(selector) {
            self.doc.borrow_mut().focus(node);
        }
        self
    }

    // === Queries ===

    /// First element matching `selector`.
    #[must_use]
    pub fn query(&self, selector: &str) -> Option<NodeId> {
        let sel = Selector::parse(selector).ok()?;
        sel.query(&self.doc.borrow())
    }

    /// All elements matching `selector`.
    #[must_use]
    pub fn query_all(&self, selector: &str) -> Vec<NodeId> {
        let Ok(sel) = Selector::parse(selector) else {
            return Vec::new();
        };
        sel.query_all(&self.doc.borrow())
    }

    /// Whether an element matches `selector`.
    #[must_use]
    pub fn exists(&self, selector: &str) -> bool {
        self.query(selector).is_some()
    }

    /// Text content of the element matching `selector`.
    #[must_use]
    pub fn text(&self, selector: &str) -> String {
        self.query(selector)
            .and_then(|node| self.doc.borrow().text(node).map(str::to_string))
            .unwrap_or_default()
    }

    /// Attribute of the element matching `selector`.
    #[must_use]
    pub fn attribute(&self, selector: &str, name: &str) -> Option<String> {
        let node = self.query(selector)?;
        self.doc.borrow().attribute(node, name).map(str::to_string)
    }

    /// The focused element.
    #[must_use]
    pub fn focused(&self) -> Option<NodeId> {
        self.doc.borrow().active_element()
    }

    // === Assertions ===

    /// Assert that an element exists.
    ///
    /// # Panics
    ///
    /// Panics if no element matches.
    pub fn assert_exists(&self, selector: &str) -> &Self {
        assert!(
            self.exists(selector),
            "Expected element matching '{selector}' to exist"
        );
        self
    }

    /// Assert that no element exists.
    ///
    /// # Panics
    ///
    /// Panics if an element matches.
    pub fn assert_not_exists(&self, selector: &str) -> &Self {
        assert!(
            !self.exists(selector),
            "Expected element matching '{selector}' to not exist"
        );
        self
    }

    /// Assert that the focused element matches `selector`.
    ///
    /// # Panics
    ///
    /// Panics if focus is elsewhere.
    pub fn assert_focused(&self, selector: &str) -> &Self {
        let expected = self.query(selector);
        let actual = self.focused();
        assert!(
            expected.is_some() && expected == actual,
            "Expected focus on '{selector}' ({expected:?}) but it is on {actual:?}"
        );
        self
    }

    /// Assert that an attribute has a value.
    ///
    /// # Panics
    ///
    /// Panics if the attribute differs or the element is missing.
    pub fn assert_attribute(&self, selector: &str, name: &str, expected: &str) -> &Self {
        let actual = self.attribute(selector, name);
        assert_eq!(
            actual.as_deref(),
            Some(expected),
            "Expected {name}='{expected}' on '{selector}'"
        );
        self
    }

    /// Assert the phase of the modal.
    ///
    /// # Panics
    ///
    /// Panics if the phase differs.
    pub fn assert_phase(&self, expected: ModalPhase) -> &Self {
        assert_eq!(self.phase(), expected, "unexpected modal phase");
        self
    }

    // === Internal ===

    fn apply_open(&mut self, is_open: bool) -> &mut Self {
        self.check(|modal| modal.set_open(is_open));
        self.settle();
        self
    }

    fn pump(&mut self) -> &mut Self {
        let events = self.modal.take_events();
        for event in &events {
            if let ModalEvent::UpdateIsOpen(is_open) = *event {
                trace!(is_open, "owner applies open state");
                if self.controlled {
                    self.check(|modal| modal.set_open(is_open));
                }
            }
        }
        self.events.extend(events);
        self.settle();
        self
    }

    fn settle(&mut self) {
        if self.finish_transitions {
            self.check(|modal| modal.finish_transitions().map(|_| ()));
        }
    }

    fn check<F>(&mut self, f: F)
    where
        F: FnOnce(&mut Modal) -> Result<(), ModalError>,
    {
        if let Err(err) = f(&mut self.modal) {
            panic!("modal operation failed: {err}");
        }
    }
}
