//! Bubbling event dispatch over a [`SharedDocument`].
//!
//! Listeners are collected per node under a short borrow and invoked with the
//! borrow released, so a listener is free to mutate the document (move focus,
//! toggle attributes, remove nodes) while the event is in flight.

use crate::dom::{NodeId, SharedDocument};
use crate::event::{Event, Key, KeyboardEvent, Modifiers};
use tracing::trace;

/// Dispatch `event` from its target up to the document root.
///
/// Each node's listeners see `current_target` set to that node. Propagation
/// ends after the node whose listener called
/// [`Event::stop_propagation`]. The event is returned so callers can inspect
/// its flags.
pub fn dispatch(doc: &SharedDocument, mut event: Event) -> Event {
    let path = doc.borrow().propagation_path(event.target());
    let event_type = event.event_type();
    trace!(?event_type, target = %event.target(), depth = path.len(), "dispatch");

    for node in path {
        let listeners = doc.borrow().listeners_for(node, event_type);
        if listeners.is_empty() {
            continue;
        }
        event.set_current_target(Some(node));
        for listener in listeners {
            listener(&mut event);
        }
        if event.is_propagation_stopped() {
            trace!(node = %node, "propagation stopped");
            break;
        }
    }

    event.set_current_target(None);
    event
}

/// Click on `target`.
pub fn click(doc: &SharedDocument, target: NodeId) -> Event {
    dispatch(doc, Event::click(target))
}

/// Mouse button down on `target`.
pub fn mouse_down(doc: &SharedDocument, target: NodeId) -> Event {
    dispatch(doc, Event::mouse_down(target))
}

/// Full pointer press on `target`: mousedown followed by click.
pub fn pointer_press(doc: &SharedDocument, target: NodeId) -> Event {
    mouse_down(doc, target);
    click(doc, target)
}

/// Press `key` on the focused element (or the body when nothing is focused).
pub fn press_key(doc: &SharedDocument, key: Key) -> Event {
    press_key_with(doc, key, Modifiers::NONE)
}

/// Press `key` with `modifiers` on the focused element.
pub fn press_key_with(doc: &SharedDocument, key: Key, modifiers: Modifiers) -> Event {
    let target = doc.borrow().key_target();
    dispatch(
        doc,
        Event::KeyDown(KeyboardEvent::new(target, key).with_modifiers(modifiers)),
    )
}
