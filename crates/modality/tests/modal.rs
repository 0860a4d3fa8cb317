//! End-to-end behavior of a mounted modal inside a page.

#![allow(clippy::unwrap_used)]

use modality::prelude::*;
use modality::widgets::{Teardown, MODAL_CONTEXT_MESSAGE, PORTAL_CLASS};
use modality::ARIA_HIDDEN;
use modality_test::{A11yConfig, DialogChecker, Harness};
use proptest::prelude::*;
use std::time::Duration;

struct Page {
    doc: SharedDocument,
    trigger: NodeId,
    elsewhere: NodeId,
}

fn page() -> Page {
    let doc = Document::shared();
    let (trigger, elsewhere) = {
        let mut d = doc.borrow_mut();
        let body = d.body();
        let app = d.append_element(body, "main").unwrap();
        let trigger = d.append_element(app, "button").unwrap();
        d.set_attribute(trigger, "id", "trigger");
        let elsewhere = d.append_element(app, "button").unwrap();
        d.set_attribute(elsewhere, "id", "elsewhere");
        d.focus(trigger);
        (trigger, elsewhere)
    };
    Page {
        doc,
        trigger,
        elsewhere,
    }
}

fn confirm_dialog(doc: &SharedDocument, props: ModalProps) -> Modal {
    Modal::new(doc, props.id("e2e")).children(|scope| {
        ModalOverlay::new().render(scope)?;
        ModalContent::new()
            .children(|scope| {
                ModalHeader::new().text("Delete project").render(scope)?;
                ModalCloseButton::new().render(scope)?;
                ModalBody::new()
                    .text("All deployments will be stopped.")
                    .render(scope)?;
                ModalFooter::new()
                    .children(|scope| {
                        let save = scope.text("button", "Delete")?;
                        scope.doc().borrow_mut().set_attribute(save, "id", "save");
                        Ok(())
                    })
                    .render(scope)?;
                Ok(())
            })
            .render(scope)?;
        Ok(())
    })
}

fn harness(page: &Page, props: ModalProps) -> Harness {
    Harness::new(&page.doc, confirm_dialog(&page.doc, props))
}

fn body_style(h: &Harness, property: &str) -> Option<String> {
    let doc = h.doc();
    doc.style(doc.body(), property).map(str::to_string)
}

fn is_background_hidden(h: &Harness, node: NodeId) -> bool {
    modality::is_hidden(&h.doc(), node)
}

#[test]
fn test_closed_modal_renders_nothing() {
    let page = page();
    let h = harness(&page, ModalProps::new());

    h.assert_phase(ModalPhase::Closed)
        .assert_not_exists("[role='dialog']")
        .assert_exists(&format!(".{PORTAL_CLASS}"))
        .assert_focused("#trigger");
    assert!(h.modal().dialog().is_none());
    assert_eq!(h.doc().listener_count(), 0);
    assert!(!is_background_hidden(&h, page.trigger));
}

#[test]
fn test_open_renders_accessible_dialog() {
    let page = page();
    let mut h = harness(&page, ModalProps::new());
    h.open();

    h.assert_phase(ModalPhase::Open)
        .assert_attribute("section", "role", "dialog")
        .assert_attribute("section", "aria-modal", "true")
        .assert_attribute("section", "id", "modal-e2e")
        .assert_attribute("section", "aria-labelledby", "modal--header-e2e")
        .assert_attribute("section", "aria-describedby", "modal--body-e2e")
        .assert_focused("[aria-label='Close']");
    assert_eq!(h.text("#modal--header-e2e"), "Delete project");

    let dialog = h.modal().dialog().unwrap();
    DialogChecker::check(&h.doc(), dialog).assert_pass();
    assert!(is_background_hidden(&h, page.trigger));
    assert_eq!(
        h.doc().attribute(page.trigger, ARIA_HIDDEN),
        None,
        "only the top-level sibling carries the marker"
    );
}

#[test]
fn test_escape_closes_and_returns_focus() {
    let page = page();
    let mut h = harness(&page, ModalProps::new());
    h.open();
    h.press_key(Key::Escape);

    assert!(h
        .events()
        .iter()
        .any(|e| matches!(e, ModalEvent::Escape(k) if k.key == Key::Escape)));
    assert!(h.events().contains(&ModalEvent::UpdateIsOpen(false)));
    h.assert_phase(ModalPhase::Closed)
        .assert_not_exists("[role='dialog']")
        .assert_focused("#trigger");
    assert!(!is_background_hidden(&h, page.trigger));
    assert_eq!(body_style(&h, "overflow"), None);
    assert_eq!(h.doc().listener_count(), 0);
}

#[test]
fn test_escape_disabled_still_notifies_owner() {
    let page = page();
    let mut h = harness(&page, ModalProps::new().close_on_esc(false));
    h.open();
    h.press_key(Key::Escape);

    h.assert_phase(ModalPhase::Open);
    assert!(h.events().iter().any(|e| matches!(e, ModalEvent::Escape(_))));
    assert!(!h.events().contains(&ModalEvent::UpdateIsOpen(false)));
}

#[test]
fn test_other_keys_are_forwarded_only() {
    let page = page();
    let mut h = harness(&page, ModalProps::new());
    h.open();
    h.press_key(Key::Enter);

    h.assert_phase(ModalPhase::Open);
    assert!(h
        .events()
        .iter()
        .any(|e| matches!(e, ModalEvent::KeyDown(k) if k.key == Key::Enter)));
    assert!(!h.events().iter().any(|e| matches!(e, ModalEvent::Escape(_))));
}

#[test]
fn test_overlay_click_requests_close() {
    let page = page();
    let mut h = harness(&page, ModalProps::new());
    h.open();
    let container = h.modal().container().unwrap();
    h.click_node(container);

    let close = h.events().iter().position(|e| *e == ModalEvent::Close);
    let update = h
        .events()
        .iter()
        .position(|e| *e == ModalEvent::UpdateIsOpen(false));
    assert!(close.is_some() && update.is_some());
    assert!(close < update);
    h.assert_phase(ModalPhase::Closed).assert_focused("#trigger");
}

#[test]
fn test_clicks_inside_dialog_do_not_close() {
    let page = page();
    let mut h = harness(&page, ModalProps::new());
    h.open();
    h.click("#save").click("#modal--header-e2e").click("section");

    h.assert_phase(ModalPhase::Open);
    assert!(!h.events().contains(&ModalEvent::Close));
    assert!(!h.events().contains(&ModalEvent::UpdateIsOpen(false)));
    assert!(h.events().iter().any(|e| matches!(e, ModalEvent::Click(_))));
}

#[test]
fn test_close_button_requests_close() {
    let page = page();
    let mut h = harness(&page, ModalProps::new().close_on_overlay_click(false));
    h.open();
    h.click("[aria-label='Close']");

    assert!(h.events().contains(&ModalEvent::UpdateIsOpen(false)));
    h.assert_phase(ModalPhase::Closed);
}

proptest! {
    #[test]
    fn prop_close_requests_follow_options(overlay in any::<bool>(), esc in any::<bool>()) {
        let page = page();
        let props = ModalProps::new()
            .close_on_overlay_click(overlay)
            .close_on_esc(esc);
        let mut h = harness(&page, props).controlled(false);
        h.open();

        let container = h.modal().container().unwrap();
        h.click_node(container);
        prop_assert_eq!(h.events().contains(&ModalEvent::UpdateIsOpen(false)), overlay);
        prop_assert!(h.events().contains(&ModalEvent::Close));
        prop_assert!(h.events().contains(&ModalEvent::Toggle(false)));

        h.clear_events();
        h.press_key(Key::Escape);
        prop_assert_eq!(h.events().contains(&ModalEvent::UpdateIsOpen(false)), esc);
        prop_assert!(h.events().iter().any(|e| matches!(e, ModalEvent::Escape(_))));
        prop_assert_eq!(h.phase(), ModalPhase::Open);
    }
}

#[test]
fn test_dialog_without_header_or_body() {
    let page = page();
    let modal = Modal::new(&page.doc, ModalProps::new()).children(|scope| {
        ModalContent::new()
            .attr("aria-label", "Quick action")
            .children(|scope| {
                scope.text("button", "Go")?;
                Ok(())
            })
            .render(scope)?;
        Ok(())
    });
    let mut h = Harness::new(&page.doc, modal);
    h.open();

    assert_eq!(h.attribute("section", "aria-labelledby"), None);
    assert_eq!(h.attribute("section", "aria-describedby"), None);
    let dialog = h.modal().dialog().unwrap();
    DialogChecker::check(&h.doc(), dialog).assert_pass();
}

#[test]
fn test_caller_attributes_cannot_change_role() {
    let page = page();
    let modal = Modal::new(&page.doc, ModalProps::new()).children(|scope| {
        ModalContent::new()
            .attr("role", "region")
            .attr("aria-modal", "false")
            .attr("data-testid", "dialog")
            .style("max-width", "50rem")
            .render(scope)?;
        Ok(())
    });
    let mut h = Harness::new(&page.doc, modal);
    h.open();

    h.assert_attribute("[data-testid='dialog']", "role", "dialog")
        .assert_attribute("[data-testid='dialog']", "aria-modal", "true");
    let dialog = h.modal().dialog().unwrap();
    assert_eq!(h.doc().style(dialog, "max-width"), Some("50rem"));
}

#[test]
fn test_initial_and_final_focus_refs() {
    let page = page();
    let props = ModalProps::new()
        .initial_focus(FocusTarget::Id("save".into()))
        .final_focus(page.elsewhere);
    let mut h = harness(&page, props);
    h.open();
    h.assert_focused("#save");

    h.close();
    h.assert_focused("#elsewhere");
}

#[test]
fn test_return_focus_disabled() {
    let page = page();
    let mut h = harness(&page, ModalProps::new().return_focus_on_close(false));
    h.open();
    h.press_key(Key::Escape);

    h.assert_phase(ModalPhase::Closed);
    assert_ne!(h.focused(), Some(page.trigger));
}

#[test]
fn test_tab_stays_inside_dialog() {
    let page = page();
    let mut h = harness(&page, ModalProps::new());
    h.open();
    h.assert_focused("[aria-label='Close']");

    h.tab(false);
    h.assert_focused("#save");
    h.tab(false);
    h.assert_focused("[aria-label='Close']");
    h.tab(true);
    h.assert_focused("#save");
    assert_eq!(h.phase(), ModalPhase::Open);
}

#[test]
fn test_without_trap_focus_stays_put() {
    let page = page();
    let mut h = harness(&page, ModalProps::new().trap_focus(false));
    h.open();
    h.assert_focused("#trigger");

    h.close();
    h.assert_focused("#trigger");
}

#[test]
fn test_without_auto_focus() {
    let page = page();
    let mut h = harness(&page, ModalProps::new().auto_focus(false));
    h.open();
    h.assert_focused("#trigger");

    let dialog = h.modal().dialog().unwrap();
    let relaxed = A11yConfig {
        check_focus: false,
        ..A11yConfig::default()
    };
    assert!(DialogChecker::check_with_config(&h.doc(), dialog, &relaxed).is_passing());
    assert!(DialogChecker::check(&h.doc(), dialog).has("focus-inside"));
}

#[test]
fn test_scroll_lock_options() {
    let page = page();
    page.doc.borrow_mut().set_scrollbar_width(15.0);
    let mut h = harness(&page, ModalProps::new().preserve_scroll_bar_gap(true));
    h.open();
    assert_eq!(body_style(&h, "overflow").as_deref(), Some("hidden"));
    assert_eq!(body_style(&h, "padding-right").as_deref(), Some("15px"));
    assert_eq!(body_style(&h, "touch-action").as_deref(), Some("none"));

    h.close();
    assert_eq!(body_style(&h, "overflow"), None);
    assert_eq!(body_style(&h, "padding-right"), None);
    assert_eq!(body_style(&h, "touch-action"), None);
}

#[test]
fn test_stacked_modals_share_scroll_lock() {
    let page = page();
    let mut outer = harness(&page, ModalProps::new());
    let nested = Modal::new(&page.doc, ModalProps::new().id("nested")).children(|scope| {
        ModalOverlay::new().render(scope)?;
        ModalContent::new()
            .children(|scope| {
                ModalBody::new().text("Stopping deployments").render(scope)?;
                Ok(())
            })
            .render(scope)?;
        Ok(())
    });
    let mut inner = Harness::new(&page.doc, nested);

    outer.open();
    inner.open();
    outer.close();
    outer.assert_phase(ModalPhase::Closed);
    assert_eq!(body_style(&inner, "overflow").as_deref(), Some("hidden"));
    assert_eq!(body_style(&inner, "touch-action").as_deref(), Some("none"));

    inner.close();
    assert_eq!(body_style(&inner, "overflow"), None);
    assert_eq!(body_style(&inner, "touch-action"), None);
}

#[test]
fn test_overlay_click_notifies_when_closing_disabled() {
    let page = page();
    let mut h = harness(&page, ModalProps::new().close_on_overlay_click(false));
    h.open();
    let container = h.modal().container().unwrap();
    h.click_node(container);

    h.assert_phase(ModalPhase::Open);
    assert!(matches!(
        h.events(),
        [ModalEvent::MouseDown(_), ModalEvent::Toggle(false), ModalEvent::Close]
    ));
}

#[test]
fn test_scroll_lock_disabled_or_pinch_zoom() {
    let page = page();
    let mut h = harness(&page, ModalProps::new().block_scroll_on_mount(false));
    h.open();
    assert_eq!(body_style(&h, "overflow"), None);
    drop(h);

    let mut h = harness(&page, ModalProps::new().allow_pinch_zoom(true));
    h.open();
    assert_eq!(body_style(&h, "overflow").as_deref(), Some("hidden"));
    assert_eq!(body_style(&h, "touch-action"), None);
}

#[test]
fn test_use_inert_disabled_leaves_background() {
    let page = page();
    let mut h = harness(&page, ModalProps::new().use_inert(false));
    h.open();

    assert!(!is_background_hidden(&h, page.trigger));
    let dialog = h.modal().dialog().unwrap();
    let relaxed = A11yConfig {
        check_background: false,
        ..A11yConfig::default()
    };
    DialogChecker::check_with_config(&h.doc(), dialog, &relaxed).assert_pass();
    assert!(DialogChecker::check(&h.doc(), dialog).has("background-hidden"));
}

#[test]
fn test_toggling_inert_while_open() {
    let page = page();
    let mut h = harness(&page, ModalProps::new());
    h.open();
    assert!(is_background_hidden(&h, page.trigger));

    let props = h.modal().props().clone().use_inert(false);
    h.modal_mut().update(props).unwrap();
    assert!(!is_background_hidden(&h, page.trigger));

    let props = h.modal().props().clone().use_inert(true);
    h.modal_mut().update(props).unwrap();
    assert!(is_background_hidden(&h, page.trigger));
}

#[test]
fn test_exit_animation_timeline() {
    let page = page();
    let mut h = harness(&page, ModalProps::new()).finish_transitions(false);
    h.open();
    h.assert_phase(ModalPhase::Opening).assert_exists("[role='dialog']");
    h.tick(Duration::from_millis(200));
    h.assert_phase(ModalPhase::Open);

    h.close();
    h.assert_phase(ModalPhase::Closing)
        .assert_exists("[role='dialog']");
    assert!(!is_background_hidden(&h, page.trigger));

    h.tick(Duration::from_millis(100));
    h.assert_phase(ModalPhase::Closed)
        .assert_not_exists("[role='dialog']")
        .assert_focused("#trigger");
}

#[test]
fn test_unmount_while_open_cleans_up() {
    let page = page();
    let mut h = harness(&page, ModalProps::new());
    h.open();
    h.modal_mut().unmount().unwrap();

    h.assert_not_exists("[role='dialog']")
        .assert_not_exists(&format!(".{PORTAL_CLASS}"))
        .assert_focused("#trigger");
    assert!(!is_background_hidden(&h, page.trigger));
    assert_eq!(body_style(&h, "overflow"), None);
    assert_eq!(h.doc().listener_count(), 0);
}

#[test]
fn test_dropping_modal_cleans_up() {
    let page = page();
    let mut h = harness(&page, ModalProps::new());
    h.open();
    drop(h);

    let doc = page.doc.borrow();
    assert_eq!(doc.active_element(), Some(page.trigger));
    assert!(!modality::is_hidden(&doc, page.trigger));
    assert_eq!(doc.style(doc.body(), "overflow"), None);
    assert_eq!(doc.listener_count(), 0);
}

#[test]
fn test_parts_outside_modal_fail() {
    let page = page();
    let body = page.doc.borrow().body();
    let mut teardown: Vec<Teardown> = Vec::new();
    let mut scope = Scope::new(&page.doc, body, &mut teardown);

    let err = ModalHeader::new().render(&mut scope).unwrap_err();
    assert_eq!(err.to_string(), MODAL_CONTEXT_MESSAGE);
    let err = ModalContent::new().render(&mut scope).unwrap_err();
    assert_eq!(err.to_string(), MODAL_CONTEXT_MESSAGE);
    assert!(teardown.is_empty());
}

#[test]
fn test_props_and_theme_from_yaml() {
    let page = page();
    let props = ModalProps::from_yaml(
        "close_on_overlay_click: false\n\
         motion_preset: none\n\
         size: lg\n\
         initial_focus_ref:\n  id: save\n",
    )
    .unwrap();
    let theme = ModalTheme::from_yaml(
        "sizes:\n  lg: 40rem\n\
         parts:\n  header:\n    font-size: 2rem\n",
    )
    .unwrap();
    let modal = confirm_dialog(&page.doc, props).theme(theme);
    let mut h = Harness::new(&page.doc, modal);
    h.open();

    h.assert_attribute("section", "id", "modal-e2e")
        .assert_focused("#save");
    let dialog = h.modal().dialog().unwrap();
    assert_eq!(h.doc().style(dialog, "max-width"), Some("40rem"));
    let header = h.query("header").unwrap();
    assert_eq!(h.doc().style(header, "font-size"), Some("2rem"));

    let container = h.modal().container().unwrap();
    h.click_node(container);
    h.assert_phase(ModalPhase::Open);
}

#[test]
fn test_invalid_yaml_props() {
    assert!(ModalProps::from_yaml("is_open: true\nbogus: 1\n").is_err());
    let err = ModalProps::from_yaml("id: \"two words\"\n").unwrap_err();
    assert!(err.to_string().contains("'id'"));
}

#[test]
fn test_events_serialize() {
    let json = serde_json::to_string(&ModalEvent::UpdateIsOpen(false)).unwrap();
    assert_eq!(json, r#"{"UpdateIsOpen":false}"#);
    let back: ModalEvent = serde_json::from_str(r#""Close""#).unwrap();
    assert_eq!(back, ModalEvent::Close);
}
