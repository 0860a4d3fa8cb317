//! Modal props and their YAML form.

use crate::error::ConfigError;
use crate::focus_trap::FocusTarget;
use crate::presence::MotionPreset;
use crate::theme::{ModalSize, ScrollBehavior, StyleVariant};
use serde::{Deserialize, Serialize};

const fn default_true() -> bool {
    true
}

/// Props of the [`crate::Modal`] root.
///
/// Every field has a default, so a YAML document only needs the fields it
/// changes:
///
/// ```yaml
/// is_open: true
/// id: settings
/// close_on_overlay_click: false
/// motion_preset: slideInBottom
/// initial_focus_ref:
///   id: email
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ModalProps {
    /// Whether the modal is shown. Owned by the caller.
    #[serde(default)]
    pub is_open: bool,
    /// Seed for the dialog, header and body ids
    #[serde(default)]
    pub id: Option<String>,
    /// Close when the overlay is clicked
    #[serde(default = "default_true")]
    pub close_on_overlay_click: bool,
    /// Close when Escape is pressed
    #[serde(default = "default_true")]
    pub close_on_esc: bool,
    /// Hide everything outside the dialog from assistive technology
    #[serde(default = "default_true")]
    pub use_inert: bool,
    /// Focus the first tabbable element on open
    #[serde(default = "default_true")]
    pub auto_focus: bool,
    /// Keep Tab navigation inside the dialog
    #[serde(default = "default_true")]
    pub trap_focus: bool,
    /// Element to focus on open
    #[serde(default)]
    pub initial_focus_ref: Option<FocusTarget>,
    /// Element to focus on close
    #[serde(default)]
    pub final_focus_ref: Option<FocusTarget>,
    /// Return focus to the element focused before opening
    #[serde(default = "default_true")]
    pub return_focus_on_close: bool,
    /// Lock body scrolling while mounted
    #[serde(default = "default_true")]
    pub block_scroll_on_mount: bool,
    /// Keep pinch-zoom working under the scroll lock
    #[serde(default)]
    pub allow_pinch_zoom: bool,
    /// Reserve the scrollbar width as body padding
    #[serde(default)]
    pub preserve_scroll_bar_gap: bool,
    /// Dialog transition
    #[serde(default)]
    pub motion_preset: MotionPreset,
    /// Where overflowing content scrolls
    #[serde(default)]
    pub scroll_behavior: ScrollBehavior,
    /// Vertically center the dialog
    #[serde(default)]
    pub is_centered: bool,
    /// Dialog width preset
    #[serde(default)]
    pub size: ModalSize,
}

impl Default for ModalProps {
    fn default() -> Self {
        Self {
            is_open: false,
            id: None,
            close_on_overlay_click: true,
            close_on_esc: true,
            use_inert: true,
            auto_focus: true,
            trap_focus: true,
            initial_focus_ref: None,
            final_focus_ref: None,
            return_focus_on_close: true,
            block_scroll_on_mount: true,
            allow_pinch_zoom: false,
            preserve_scroll_bar_gap: false,
            motion_preset: MotionPreset::Scale,
            scroll_behavior: ScrollBehavior::Outside,
            is_centered: false,
            size: ModalSize::Md,
        }
    }
}

impl ModalProps {
    /// Create props with defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse props from YAML.
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        let props: Self = serde_yaml_ng::from_str(yaml)?;
        props.validate()?;
        Ok(props)
    }

    /// Serialize to YAML. Getter focus targets cannot be serialized.
    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        Ok(serde_yaml_ng::to_string(self)?)
    }

    /// Check values that parse but cannot be used.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(id) = &self.id {
            if id.trim().is_empty() || id.chars().any(char::is_whitespace) {
                return Err(ConfigError::InvalidValue {
                    field: "id".to_string(),
                    message: format!("{id:?} is not a usable element id"),
                });
            }
        }
        Ok(())
    }

    /// Style variation selected by these props.
    #[must_use]
    pub const fn style_variant(&self) -> StyleVariant {
        StyleVariant {
            size: self.size,
            scroll_behavior: self.scroll_behavior,
            is_centered: self.is_centered,
        }
    }

    /// Set the open flag.
    #[must_use]
    pub const fn open(mut self, is_open: bool) -> Self {
        self.is_open = is_open;
        self
    }

    /// Set the id seed.
    #[must_use]
    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Set overlay-click closing.
    #[must_use]
    pub const fn close_on_overlay_click(mut self, enabled: bool) -> Self {
        self.close_on_overlay_click = enabled;
        self
    }

    /// Set Escape closing.
    #[must_use]
    pub const fn close_on_esc(mut self, enabled: bool) -> Self {
        self.close_on_esc = enabled;
        self
    }

    /// Set background suppression.
    #[must_use]
    pub const fn use_inert(mut self, enabled: bool) -> Self {
        self.use_inert = enabled;
        self
    }

    /// Set initial auto-focus.
    #[must_use]
    pub const fn auto_focus(mut self, enabled: bool) -> Self {
        self.auto_focus = enabled;
        self
    }

    /// Set focus trapping.
    #[must_use]
    pub const fn trap_focus(mut self, enabled: bool) -> Self {
        self.trap_focus = enabled;
        self
    }

    /// Set the element focused on open.
    #[must_use]
    pub fn initial_focus(mut self, target: impl Into<FocusTarget>) -> Self {
        self.initial_focus_ref = Some(target.into());
        self
    }

    /// Set the element focused on close.
    #[must_use]
    pub fn final_focus(mut self, target: impl Into<FocusTarget>) -> Self {
        self.final_focus_ref = Some(target.into());
        self
    }

    /// Set focus restoration on close.
    #[must_use]
    pub const fn return_focus_on_close(mut self, enabled: bool) -> Self {
        self.return_focus_on_close = enabled;
        self
    }

    /// Set body scroll locking.
    #[must_use]
    pub const fn block_scroll_on_mount(mut self, enabled: bool) -> Self {
        self.block_scroll_on_mount = enabled;
        self
    }

    /// Set pinch-zoom passthrough.
    #[must_use]
    pub const fn allow_pinch_zoom(mut self, enabled: bool) -> Self {
        self.allow_pinch_zoom = enabled;
        self
    }

    /// Set scrollbar gap preservation.
    #[must_use]
    pub const fn preserve_scroll_bar_gap(mut self, enabled: bool) -> Self {
        self.preserve_scroll_bar_gap = enabled;
        self
    }

    /// Set the dialog transition.
    #[must_use]
    pub const fn motion_preset(mut self, preset: MotionPreset) -> Self {
        self.motion_preset = preset;
        self
    }

    /// Set the scroll behavior.
    #[must_use]
    pub const fn scroll_behavior(mut self, behavior: ScrollBehavior) -> Self {
        self.scroll_behavior = behavior;
        self
    }

    /// Set vertical centering.
    #[must_use]
    pub const fn centered(mut self, centered: bool) -> Self {
        self.is_centered = centered;
        self
    }

    /// Set the width preset.
    #[must_use]
    pub const fn size(mut self, size: ModalSize) -> Self {
        self.size = size;
        self
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn test_defaults() {
        let props = ModalProps::default();
        assert!(!props.is_open);
        assert!(props.id.is_none());
        assert!(props.close_on_overlay_click);
        assert!(props.close_on_esc);
        assert!(props.use_inert);
        assert!(props.auto_focus);
        assert!(props.trap_focus);
        assert!(props.return_focus_on_close);
        assert!(props.block_scroll_on_mount);
        assert!(!props.allow_pinch_zoom);
        assert!(!props.preserve_scroll_bar_gap);
        assert_eq!(props.motion_preset, MotionPreset::Scale);
        assert_eq!(props.scroll_behavior, ScrollBehavior::Outside);
        assert_eq!(props.size, ModalSize::Md);
    }

    #[test]
    fn test_empty_yaml_matches_defaults() {
        let props = ModalProps::from_yaml("{}").unwrap();
        assert!(props.close_on_esc);
        assert!(props.use_inert);
        assert_eq!(props.motion_preset, MotionPreset::Scale);
    }

    #[test]
    fn test_from_yaml() {
        let yaml = r"
is_open: true
id: settings
close_on_overlay_click: false
motion_preset: slideInRight
scroll_behavior: inside
size: 2xl
initial_focus_ref:
  id: email
";
        let props = ModalProps::from_yaml(yaml).unwrap();
        assert!(props.is_open);
        assert_eq!(props.id.as_deref(), Some("settings"));
        assert!(!props.close_on_overlay_click);
        assert!(props.close_on_esc);
        assert_eq!(props.motion_preset, MotionPreset::SlideInRight);
        assert_eq!(props.scroll_behavior, ScrollBehavior::Inside);
        assert_eq!(props.size, ModalSize::Xl2);
        assert!(matches!(props.initial_focus_ref, Some(FocusTarget::Id(ref id)) if id == "email"));
    }

    #[test]
    fn test_from_yaml_rejects_unknown_fields() {
        assert!(matches!(
            ModalProps::from_yaml("isOpen: true"),
            Err(ConfigError::Yaml(_))
        ));
    }

    #[test]
    fn test_from_yaml_rejects_blank_id() {
        let err = ModalProps::from_yaml("id: ' '").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { ref field, .. } if field == "id"));
    }

    #[test]
    fn test_yaml_round_trip_keeps_flags() {
        let props = ModalProps::new().close_on_esc(false).centered(true);
        let yaml = props.to_yaml().unwrap();
        let back = ModalProps::from_yaml(&yaml).unwrap();
        assert!(!back.close_on_esc);
        assert!(back.is_centered);
    }

    #[test]
    fn test_builder_and_variant() {
        let props = ModalProps::new()
            .open(true)
            .size(ModalSize::Lg)
            .scroll_behavior(ScrollBehavior::Inside)
            .centered(true);
        let variant = props.style_variant();
        assert_eq!(variant.size, ModalSize::Lg);
        assert_eq!(variant.scroll_behavior, ScrollBehavior::Inside);
        assert!(variant.is_centered);
    }
}
