//! Multi-part style resolution for modal components.
//!
//! A modal is styled per part (`overlay`, `dialogContainer`, `dialog`,
//! `header`, `closeButton`, `body`, `footer`). [`ModalTheme::resolve`]
//! combines the base part styles with the variations selected by size,
//! scroll behavior and centering.

use crate::error::ConfigError;
use modality_core::Color;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Inline style declarations, keyed by CSS property.
pub type Style = BTreeMap<String, String>;

/// Z-index shared by the overlay, container and dialog.
pub const MODAL_Z_INDEX: &str = "1400";

fn style(entries: &[(&str, &str)]) -> Style {
    entries
        .iter()
        .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
        .collect()
}

// ============================================================================
// Variations
// ============================================================================

/// Dialog width presets.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
pub enum ModalSize {
    /// 20rem
    #[serde(rename = "xs")]
    Xs,
    /// 24rem
    #[serde(rename = "sm")]
    Sm,
    /// 28rem
    #[default]
    #[serde(rename = "md")]
    Md,
    /// 32rem
    #[serde(rename = "lg")]
    Lg,
    /// 36rem
    #[serde(rename = "xl")]
    Xl,
    /// 42rem
    #[serde(rename = "2xl")]
    Xl2,
    /// 48rem
    #[serde(rename = "3xl")]
    Xl3,
    /// 56rem
    #[serde(rename = "4xl")]
    Xl4,
    /// 64rem
    #[serde(rename = "5xl")]
    Xl5,
    /// 72rem
    #[serde(rename = "6xl")]
    Xl6,
    /// Whole viewport
    #[serde(rename = "full")]
    Full,
}

impl ModalSize {
    /// Default dialog `max-width` for this size.
    #[must_use]
    pub const fn max_width(self) -> &'static str {
        match self {
            Self::Xs => "20rem",
            Self::Sm => "24rem",
            Self::Md => "28rem",
            Self::Lg => "32rem",
            Self::Xl => "36rem",
            Self::Xl2 => "42rem",
            Self::Xl3 => "48rem",
            Self::Xl4 => "56rem",
            Self::Xl5 => "64rem",
            Self::Xl6 => "72rem",
            Self::Full => "100vw",
        }
    }
}

/// Where overflowing modal content scrolls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ScrollBehavior {
    /// Only the body scrolls; the dialog is capped to the viewport
    Inside,
    /// The whole dialog scrolls within the container
    #[default]
    Outside,
}

/// Variation inputs for [`ModalTheme::resolve`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StyleVariant {
    /// Dialog width preset
    pub size: ModalSize,
    /// Scroll origin
    pub scroll_behavior: ScrollBehavior,
    /// Vertically center the dialog
    pub is_centered: bool,
}

// ============================================================================
// Parts
// ============================================================================

/// Styleable parts of a modal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ModalPart {
    /// Backdrop
    Overlay,
    /// Full-viewport flex wrapper around the dialog
    DialogContainer,
    /// The dialog element
    Dialog,
    /// Header
    Header,
    /// Close button
    CloseButton,
    /// Body
    Body,
    /// Footer
    Footer,
}

impl ModalPart {
    /// Every part, in render order.
    pub const ALL: [Self; 7] = [
        Self::Overlay,
        Self::DialogContainer,
        Self::Dialog,
        Self::Header,
        Self::CloseButton,
        Self::Body,
        Self::Footer,
    ];
}

/// One style per part.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PartStyles {
    /// Backdrop
    pub overlay: Style,
    /// Flex wrapper
    pub dialog_container: Style,
    /// Dialog
    pub dialog: Style,
    /// Header
    pub header: Style,
    /// Close button
    pub close_button: Style,
    /// Body
    pub body: Style,
    /// Footer
    pub footer: Style,
}

impl PartStyles {
    /// Style of `part`.
    #[must_use]
    pub const fn get(&self, part: ModalPart) -> &Style {
        match part {
            ModalPart::Overlay => &self.overlay,
            ModalPart::DialogContainer => &self.dialog_container,
            ModalPart::Dialog => &self.dialog,
            ModalPart::Header => &self.header,
            ModalPart::CloseButton => &self.close_button,
            ModalPart::Body => &self.body,
            ModalPart::Footer => &self.footer,
        }
    }

    /// Mutable style of `part`.
    pub fn get_mut(&mut self, part: ModalPart) -> &mut Style {
        match part {
            ModalPart::Overlay => &mut self.overlay,
            ModalPart::DialogContainer => &mut self.dialog_container,
            ModalPart::Dialog => &mut self.dialog,
            ModalPart::Header => &mut self.header,
            ModalPart::CloseButton => &mut self.close_button,
            ModalPart::Body => &mut self.body,
            ModalPart::Footer => &mut self.footer,
        }
    }

    /// Overlay `other` onto `self`, property by property.
    pub fn merge(&mut self, other: &Self) {
        for part in ModalPart::ALL {
            self.get_mut(part).extend(
                other
                    .get(part)
                    .iter()
                    .map(|(k, v)| (k.clone(), v.clone())),
            );
        }
    }
}

// ============================================================================
// Theme
// ============================================================================

/// Color roles used by the modal parts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModalColors {
    /// Backdrop color
    pub overlay: Color,
    /// Dialog background
    pub surface: Color,
    /// Dialog text color
    pub text: Color,
}

impl Default for ModalColors {
    fn default() -> Self {
        Self::light()
    }
}

impl ModalColors {
    /// Light color roles.
    #[must_use]
    pub fn light() -> Self {
        Self {
            overlay: Color::BLACK.with_alpha(0.48),
            surface: Color::WHITE,
            text: Color::rgb(0.1, 0.125, 0.173), // Gray 800
        }
    }

    /// Dark color roles.
    #[must_use]
    pub fn dark() -> Self {
        Self {
            overlay: Color::BLACK.with_alpha(0.48),
            surface: Color::rgb(0.176, 0.216, 0.282), // Gray 700
            text: Color::WHITE.with_alpha(0.92),
        }
    }
}

/// Modal style configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModalTheme {
    /// Color roles
    pub colors: ModalColors,
    /// Base style per part
    pub parts: PartStyles,
    /// Dialog `max-width` overrides per size
    pub sizes: BTreeMap<ModalSize, String>,
}

impl Default for ModalTheme {
    fn default() -> Self {
        Self::light()
    }
}

/// Partial theme accepted by [`ModalTheme::from_yaml`].
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct ThemeOverrides {
    colors: ColorOverrides,
    parts: PartStyles,
    sizes: BTreeMap<ModalSize, String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct ColorOverrides {
    overlay: Option<String>,
    surface: Option<String>,
    text: Option<String>,
}

fn parse_color(field: &str, hex: &str) -> Result<Color, ConfigError> {
    Color::from_hex(hex).map_err(|e| ConfigError::InvalidValue {
        field: format!("colors.{field}"),
        message: e.to_string(),
    })
}

impl ModalTheme {
    /// Light theme.
    #[must_use]
    pub fn light() -> Self {
        Self::with_colors(ModalColors::light())
    }

    /// Dark theme.
    #[must_use]
    pub fn dark() -> Self {
        Self::with_colors(ModalColors::dark())
    }

    fn with_colors(colors: ModalColors) -> Self {
        let parts = PartStyles {
            overlay: style(&[("z-index", MODAL_Z_INDEX)]),
            dialog_container: style(&[
                ("display", "flex"),
                ("justify-content", "center"),
                ("z-index", MODAL_Z_INDEX),
            ]),
            dialog: style(&[
                ("border-radius", "0.375rem"),
                (
                    "box-shadow",
                    "0 10px 15px -3px rgba(0, 0, 0, 0.1), 0 4px 6px -2px rgba(0, 0, 0, 0.05)",
                ),
                ("z-index", MODAL_Z_INDEX),
            ]),
            header: style(&[
                ("flex", "0 1 0%"),
                ("padding", "1rem 1.5rem"),
                ("font-size", "1.25rem"),
                ("font-weight", "600"),
            ]),
            close_button: style(&[
                ("position", "absolute"),
                ("top", "0.5rem"),
                ("inset-inline-end", "0.75rem"),
            ]),
            body: style(&[("padding", "0.5rem 1.5rem"), ("flex", "1 1 0%")]),
            footer: style(&[
                ("display", "flex"),
                ("align-items", "center"),
                ("justify-content", "flex-end"),
                ("padding", "1rem 1.5rem"),
            ]),
        };
        Self {
            colors,
            parts,
            sizes: BTreeMap::new(),
        }
    }

    /// Parse YAML overrides and merge them over the light theme.
    ///
    /// ```yaml
    /// colors:
    ///   overlay: "#0000007a"
    /// parts:
    ///   header:
    ///     font-size: 1.5rem
    /// sizes:
    ///   md: 30rem
    /// ```
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        let overrides: ThemeOverrides = serde_yaml_ng::from_str(yaml)?;
        let mut theme = Self::default();

        if let Some(hex) = &overrides.colors.overlay {
            theme.colors.overlay = parse_color("overlay", hex)?;
        }
        if let Some(hex) = &overrides.colors.surface {
            theme.colors.surface = parse_color("surface", hex)?;
        }
        if let Some(hex) = &overrides.colors.text {
            theme.colors.text = parse_color("text", hex)?;
        }
        theme.parts.merge(&overrides.parts);
        theme.sizes.extend(overrides.sizes);
        Ok(theme)
    }

    /// Dialog `max-width` for `size`.
    #[must_use]
    pub fn max_width(&self, size: ModalSize) -> &str {
        self.sizes
            .get(&size)
            .map_or_else(|| size.max_width(), String::as_str)
    }

    /// Resolve the style of every part for `variant`.
    ///
    /// Variant-derived declarations are applied first; the theme's part
    /// styles take precedence over them.
    #[must_use]
    pub fn resolve(&self, variant: StyleVariant) -> PartStyles {
        let inside = variant.scroll_behavior == ScrollBehavior::Inside;
        let full = variant.size == ModalSize::Full;
        let mut resolved = PartStyles::default();

        resolved
            .overlay
            .insert("background".into(), self.colors.overlay.to_css());

        let container = &mut resolved.dialog_container;
        container.insert(
            "align-items".into(),
            if variant.is_centered { "center" } else { "flex-start" }.into(),
        );
        container.insert(
            "overflow".into(),
            if inside { "hidden" } else { "auto" }.into(),
        );

        let dialog = &mut resolved.dialog;
        dialog.insert("background".into(), self.colors.surface.to_css());
        dialog.insert("color".into(), self.colors.text.to_css());
        dialog.insert("max-width".into(), self.max_width(variant.size).into());
        let margin = if full {
            "0"
        } else if variant.is_centered {
            "auto"
        } else {
            "3.75rem"
        };
        dialog.insert("margin-top".into(), margin.into());
        dialog.insert("margin-bottom".into(), margin.into());
        if full {
            dialog.insert("min-height".into(), "100vh".into());
            dialog.insert("border-radius".into(), "0".into());
        }
        if inside && !full {
            dialog.insert("max-height".into(), "calc(100% - 7.5rem)".into());
        }

        if inside {
            resolved.body.insert("overflow".into(), "auto".into());
        }

        let mut base = self.parts.clone();
        if full {
            base.dialog.remove("border-radius");
        }
        resolved.merge(&base);
        resolved
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    fn get<'a>(styles: &'a PartStyles, part: ModalPart, prop: &str) -> Option<&'a str> {
        styles.get(part).get(prop).map(String::as_str)
    }

    #[test]
    fn test_default_resolution() {
        let styles = ModalTheme::default().resolve(StyleVariant::default());
        assert_eq!(
            get(&styles, ModalPart::Overlay, "background"),
            Some("rgba(0, 0, 0, 0.48)")
        );
        assert_eq!(
            get(&styles, ModalPart::Overlay, "z-index"),
            Some(MODAL_Z_INDEX)
        );
        assert_eq!(
            get(&styles, ModalPart::DialogContainer, "align-items"),
            Some("flex-start")
        );
        assert_eq!(
            get(&styles, ModalPart::DialogContainer, "overflow"),
            Some("auto")
        );
        assert_eq!(get(&styles, ModalPart::Dialog, "max-width"), Some("28rem"));
        assert_eq!(get(&styles, ModalPart::Dialog, "margin-top"), Some("3.75rem"));
        assert_eq!(get(&styles, ModalPart::Dialog, "background"), Some("#ffffff"));
        assert_eq!(get(&styles, ModalPart::Dialog, "max-height"), None);
        assert_eq!(get(&styles, ModalPart::Body, "overflow"), None);
    }

    #[test]
    fn test_centered_inside_scroll() {
        let styles = ModalTheme::default().resolve(StyleVariant {
            size: ModalSize::Lg,
            scroll_behavior: ScrollBehavior::Inside,
            is_centered: true,
        });
        assert_eq!(
            get(&styles, ModalPart::DialogContainer, "align-items"),
            Some("center")
        );
        assert_eq!(
            get(&styles, ModalPart::DialogContainer, "overflow"),
            Some("hidden")
        );
        assert_eq!(get(&styles, ModalPart::Dialog, "margin-top"), Some("auto"));
        assert_eq!(
            get(&styles, ModalPart::Dialog, "max-height"),
            Some("calc(100% - 7.5rem)")
        );
        assert_eq!(get(&styles, ModalPart::Dialog, "max-width"), Some("32rem"));
        assert_eq!(get(&styles, ModalPart::Body, "overflow"), Some("auto"));
    }

    #[test]
    fn test_full_size() {
        let styles = ModalTheme::default().resolve(StyleVariant {
            size: ModalSize::Full,
            ..StyleVariant::default()
        });
        assert_eq!(get(&styles, ModalPart::Dialog, "max-width"), Some("100vw"));
        assert_eq!(get(&styles, ModalPart::Dialog, "min-height"), Some("100vh"));
        assert_eq!(get(&styles, ModalPart::Dialog, "margin-top"), Some("0"));
        assert_eq!(get(&styles, ModalPart::Dialog, "border-radius"), Some("0"));
    }

    #[test]
    fn test_dark_theme_surface() {
        let styles = ModalTheme::dark().resolve(StyleVariant::default());
        assert_eq!(get(&styles, ModalPart::Dialog, "background"), Some("#2d3748"));
    }

    #[test]
    fn test_from_yaml_merges_over_defaults() {
        let yaml = r##"
colors:
  overlay: "#00000080"
parts:
  header:
    font-size: 1.5rem
  footer:
    gap: 0.5rem
sizes:
  md: 30rem
"##;
        let theme = ModalTheme::from_yaml(yaml).unwrap();
        let styles = theme.resolve(StyleVariant::default());
        assert_eq!(get(&styles, ModalPart::Header, "font-size"), Some("1.5rem"));
        assert_eq!(get(&styles, ModalPart::Header, "font-weight"), Some("600"));
        assert_eq!(get(&styles, ModalPart::Footer, "gap"), Some("0.5rem"));
        assert_eq!(get(&styles, ModalPart::Dialog, "max-width"), Some("30rem"));
        assert_eq!(
            get(&styles, ModalPart::Overlay, "background"),
            Some("rgba(0, 0, 0, 0.5)")
        );
    }

    #[test]
    fn test_from_yaml_rejects_bad_color() {
        let err = ModalTheme::from_yaml("colors:\n  surface: nope\n").unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidValue { ref field, .. } if field == "colors.surface"
        ));
    }

    #[test]
    fn test_from_yaml_rejects_unknown_keys() {
        assert!(matches!(
            ModalTheme::from_yaml("palette: {}\n"),
            Err(ConfigError::Yaml(_))
        ));
    }

    #[test]
    fn test_size_serde_names() {
        let sizes: Vec<ModalSize> = serde_yaml_ng::from_str("[xs, 2xl, full]").unwrap();
        assert_eq!(sizes, vec![ModalSize::Xs, ModalSize::Xl2, ModalSize::Full]);
    }

    #[test]
    fn test_part_names() {
        let json = serde_json::to_string(&ModalPart::DialogContainer).unwrap();
        assert_eq!(json, "\"dialogContainer\"");
        let json = serde_json::to_string(&ModalPart::CloseButton).unwrap();
        assert_eq!(json, "\"closeButton\"");
    }
}
