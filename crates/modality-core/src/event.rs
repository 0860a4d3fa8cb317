//! Input events routed through the document tree.

use crate::dom::NodeId;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;

/// Event types a listener can subscribe to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventType {
    /// Primary button click
    Click,
    /// Mouse button pressed
    MouseDown,
    /// Key pressed
    KeyDown,
}

/// Mouse button identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum MouseButton {
    /// Left mouse button
    #[default]
    Left,
    /// Right mouse button
    Right,
    /// Middle mouse button (wheel click)
    Middle,
}

/// Keyboard key identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    /// Escape key
    Escape,
    /// Enter/Return key
    Enter,
    /// Tab key
    Tab,
    /// Space key
    Space,
    /// Backspace key
    Backspace,
    /// Delete key
    Delete,
    /// Home key
    Home,
    /// End key
    End,
    /// Page Up key
    PageUp,
    /// Page Down key
    PageDown,
    /// Up arrow
    Up,
    /// Down arrow
    Down,
    /// Left arrow
    Left,
    /// Right arrow
    Right,
    /// Printable character
    Char(char),
}

impl Key {
    /// The `KeyboardEvent.key` value a browser reports for this key.
    #[must_use]
    pub fn dom_key(&self) -> Cow<'static, str> {
        let name = match self {
            Self::Escape => "Escape",
            Self::Enter => "Enter",
            Self::Tab => "Tab",
            Self::Space => " ",
            Self::Backspace => "Backspace",
            Self::Delete => "Delete",
            Self::Home => "Home",
            Self::End => "End",
            Self::PageUp => "PageUp",
            Self::PageDown => "PageDown",
            Self::Up => "ArrowUp",
            Self::Down => "ArrowDown",
            Self::Left => "ArrowLeft",
            Self::Right => "ArrowRight",
            Self::Char(c) => return Cow::Owned(c.to_string()),
        };
        Cow::Borrowed(name)
    }

    /// Parse a `KeyboardEvent.key` value.
    #[must_use]
    pub fn from_dom_key(key: &str) -> Option<Self> {
        let parsed = match key {
            "Escape" | "Esc" => Self::Escape,
            "Enter" => Self::Enter,
            "Tab" => Self::Tab,
            " " | "Spacebar" => Self::Space,
            "Backspace" => Self::Backspace,
            "Delete" => Self::Delete,
            "Home" => Self::Home,
            "End" => Self::End,
            "PageUp" => Self::PageUp,
            "PageDown" => Self::PageDown,
            "ArrowUp" => Self::Up,
            "ArrowDown" => Self::Down,
            "ArrowLeft" => Self::Left,
            "ArrowRight" => Self::Right,
            other => {
                let mut chars = other.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Self::Char(c),
                    _ => return None,
                }
            }
        };
        Some(parsed)
    }
}

/// Modifier keys held during a keyboard event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Modifiers {
    /// Shift held
    pub shift: bool,
    /// Control held
    pub ctrl: bool,
    /// Alt/Option held
    pub alt: bool,
    /// Meta/Command held
    pub meta: bool,
}

impl Modifiers {
    /// No modifiers.
    pub const NONE: Self = Self {
        shift: false,
        ctrl: false,
        alt: false,
        meta: false,
    };

    /// Shift only.
    pub const SHIFT: Self = Self {
        shift: true,
        ctrl: false,
        alt: false,
        meta: false,
    };
}

/// Mouse event payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MouseEvent {
    /// Node the event originated on
    pub target: NodeId,
    /// Node whose listener is currently running
    #[serde(default)]
    pub current_target: Option<NodeId>,
    /// Button involved
    #[serde(default)]
    pub button: MouseButton,
    #[serde(default)]
    propagation_stopped: bool,
    #[serde(default)]
    default_prevented: bool,
}

impl MouseEvent {
    /// Create a left-button mouse event targeting `target`.
    #[must_use]
    pub const fn new(target: NodeId) -> Self {
        Self {
            target,
            current_target: None,
            button: MouseButton::Left,
            propagation_stopped: false,
            default_prevented: false,
        }
    }

    /// Set the button.
    #[must_use]
    pub const fn with_button(mut self, button: MouseButton) -> Self {
        self.button = button;
        self
    }

    /// Whether the listener runs on the node the event originated on.
    #[must_use]
    pub fn is_self_target(&self) -> bool {
        self.current_target == Some(self.target)
    }
}

/// Keyboard event payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyboardEvent {
    /// Key pressed
    pub key: Key,
    /// Modifiers held
    #[serde(default)]
    pub modifiers: Modifiers,
    /// Node the event originated on
    pub target: NodeId,
    /// Node whose listener is currently running
    #[serde(default)]
    pub current_target: Option<NodeId>,
    #[serde(default)]
    propagation_stopped: bool,
    #[serde(default)]
    default_prevented: bool,
}

impl KeyboardEvent {
    /// Create a keyboard event for `key` targeting `target`.
    #[must_use]
    pub const fn new(target: NodeId, key: Key) -> Self {
        Self {
            key,
            modifiers: Modifiers::NONE,
            target,
            current_target: None,
            propagation_stopped: false,
            default_prevented: false,
        }
    }

    /// Set the modifiers.
    #[must_use]
    pub const fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }
}

/// An event travelling through the document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Event {
    /// Click
    Click(MouseEvent),
    /// Mouse button pressed
    MouseDown(MouseEvent),
    /// Key pressed
    KeyDown(KeyboardEvent),
}

impl Event {
    /// Click on `target`.
    #[must_use]
    pub const fn click(target: NodeId) -> Self {
        Self::Click(MouseEvent::new(target))
    }

    /// Mouse down on `target`.
    #[must_use]
    pub const fn mouse_down(target: NodeId) -> Self {
        Self::MouseDown(MouseEvent::new(target))
    }

    /// Key down on `target`.
    #[must_use]
    pub const fn key_down(target: NodeId, key: Key) -> Self {
        Self::KeyDown(KeyboardEvent::new(target, key))
    }

    /// Event type used for listener lookup.
    #[must_use]
    pub const fn event_type(&self) -> EventType {
        match self {
            Self::Click(_) => EventType::Click,
            Self::MouseDown(_) => EventType::MouseDown,
            Self::KeyDown(_) => EventType::KeyDown,
        }
    }

    /// Node the event originated on.
    #[must_use]
    pub const fn target(&self) -> NodeId {
        match self {
            Self::Click(e) | Self::MouseDown(e) => e.target,
            Self::KeyDown(e) => e.target,
        }
    }

    /// Node whose listener is currently running.
    #[must_use]
    pub const fn current_target(&self) -> Option<NodeId> {
        match self {
            Self::Click(e) | Self::MouseDown(e) => e.current_target,
            Self::KeyDown(e) => e.current_target,
        }
    }

    pub(crate) fn set_current_target(&mut self, node: Option<NodeId>) {
        match self {
            Self::Click(e) | Self::MouseDown(e) => e.current_target = node,
            Self::KeyDown(e) => e.current_target = node,
        }
    }

    /// Stop the event from reaching ancestors of the current target.
    pub fn stop_propagation(&mut self) {
        match self {
            Self::Click(e) | Self::MouseDown(e) => e.propagation_stopped = true,
            Self::KeyDown(e) => e.propagation_stopped = true,
        }
    }

    /// Whether `stop_propagation` was called.
    #[must_use]
    pub const fn is_propagation_stopped(&self) -> bool {
        match self {
            Self::Click(e) | Self::MouseDown(e) => e.propagation_stopped,
            Self::KeyDown(e) => e.propagation_stopped,
        }
    }

    /// Suppress the default action of the event.
    pub fn prevent_default(&mut self) {
        match self {
            Self::Click(e) | Self::MouseDown(e) => e.default_prevented = true,
            Self::KeyDown(e) => e.default_prevented = true,
        }
    }

    /// Whether `prevent_default` was called.
    #[must_use]
    pub const fn is_default_prevented(&self) -> bool {
        match self {
            Self::Click(e) | Self::MouseDown(e) => e.default_prevented,
            Self::KeyDown(e) => e.default_prevented,
        }
    }

    /// Mouse payload, if this is a mouse event.
    #[must_use]
    pub const fn as_mouse(&self) -> Option<&MouseEvent> {
        match self {
            Self::Click(e) | Self::MouseDown(e) => Some(e),
            Self::KeyDown(_) => None,
        }
    }

    /// Keyboard payload, if this is a keyboard event.
    #[must_use]
    pub const fn as_keyboard(&self) -> Option<&KeyboardEvent> {
        match self {
            Self::KeyDown(e) => Some(e),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_dom_names() {
        assert_eq!(Key::Escape.dom_key(), "Escape");
        assert_eq!(Key::Space.dom_key(), " ");
        assert_eq!(Key::Up.dom_key(), "ArrowUp");
        assert_eq!(Key::Char('q').dom_key(), "q");
    }

    #[test]
    fn test_key_from_dom_key() {
        assert_eq!(Key::from_dom_key("Escape"), Some(Key::Escape));
        assert_eq!(Key::from_dom_key("Esc"), Some(Key::Escape));
        assert_eq!(Key::from_dom_key("ArrowLeft"), Some(Key::Left));
        assert_eq!(Key::from_dom_key("x"), Some(Key::Char('x')));
        assert_eq!(Key::from_dom_key("F13"), None);
        assert_eq!(Key::from_dom_key(""), None);
    }

    #[test]
    fn test_event_accessors() {
        let mut event = Event::click(NodeId::new(3));
        assert_eq!(event.event_type(), EventType::Click);
        assert_eq!(event.target(), NodeId::new(3));
        assert_eq!(event.current_target(), None);
        assert!(event.as_mouse().is_some());
        assert!(event.as_keyboard().is_none());

        event.set_current_target(Some(NodeId::new(3)));
        assert!(event.as_mouse().is_some_and(MouseEvent::is_self_target));
    }

    #[test]
    fn test_event_propagation_flags() {
        let mut event = Event::key_down(NodeId::new(1), Key::Escape);
        assert!(!event.is_propagation_stopped());
        assert!(!event.is_default_prevented());

        event.stop_propagation();
        event.prevent_default();
        assert!(event.is_propagation_stopped());
        assert!(event.is_default_prevented());
    }

    #[test]
    fn test_keyboard_event_modifiers() {
        let event = KeyboardEvent::new(NodeId::new(1), Key::Tab).with_modifiers(Modifiers::SHIFT);
        assert!(event.modifiers.shift);
        assert!(!event.modifiers.ctrl);
    }

    #[test]
    fn test_event_serialization() {
        let event = Event::key_down(NodeId::new(4), Key::Enter);
        let json = serde_json::to_string(&event).unwrap();
        let back: Event = serde_json::from_str(&json).unwrap();
        assert_eq!(back, event);
    }
}
