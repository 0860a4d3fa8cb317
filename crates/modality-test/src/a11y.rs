//! Accessibility checks for modal dialogs.
//!
//! Implements the WAI-ARIA dialog pattern checks:
//! - Role and modality (4.1.2)
//! - Accessible name and description references (4.1.2, 1.3.1)
//! - Background content hidden from assistive technology (1.3.2)
//! - Focus contained in the dialog (2.4.3)
//! - Keyboard reachability of the dialog (2.1.1)

use modality_core::{is_hidden, Document, NodeId};
use serde::{Deserialize, Serialize};

/// Roles accepted on a dialog element.
pub const DIALOG_ROLES: [&str; 2] = ["dialog", "alertdialog"];

/// Dialog accessibility checker.
pub struct DialogChecker;

impl DialogChecker {
    /// Check an open dialog.
    #[must_use]
    pub fn check(doc: &Document, dialog: NodeId) -> A11yReport {
        Self::check_with_config(doc, dialog, &A11yConfig::default())
    }

    /// Check with custom configuration.
    #[must_use]
    pub fn check_with_config(doc: &Document, dialog: NodeId, config: &A11yConfig) -> A11yReport {
        let mut violations = Vec::new();

        if !doc.is_connected(dialog) {
            violations.push(A11yViolation::new(
                "dialog-connected",
                "Dialog element is not in the document",
                "4.1.2",
                Impact::Critical,
            ));
            return A11yReport { violations };
        }

        Self::check_role(doc, dialog, &mut violations);
        Self::check_name(doc, dialog, &mut violations);
        Self::check_reference(doc, dialog, "aria-describedby", "1.3.1", &mut violations);

        if !doc.has_attribute(dialog, "tabindex") && !doc.is_focusable(dialog) {
            violations.push(A11yViolation::new(
                "dialog-focusable",
                "Dialog cannot receive focus when it has no focusable content",
                "2.1.1",
                Impact::Moderate,
            ));
        }

        if config.check_background {
            Self::check_background(doc, dialog, &mut violations);
        }
        if config.check_focus {
            let inside = doc
                .active_element()
                .is_some_and(|focused| doc.contains(dialog, focused));
            if !inside {
                violations.push(A11yViolation::new(
                    "focus-inside",
                    "Focus is outside the open dialog",
                    "2.4.3",
                    Impact::Serious,
                ));
            }
        }

        A11yReport { violations }
    }

    fn check_role(doc: &Document, dialog: NodeId, violations: &mut Vec<A11yViolation>) {
        let role = doc.attribute(dialog, "role");
        if !role.is_some_and(|r| DIALOG_ROLES.contains(&r)) {
            violations.push(A11yViolation::new(
                "dialog-role",
                format!("Dialog has role {role:?}, expected \"dialog\""),
                "4.1.2",
                Impact::Critical,
            ));
        }
        if doc.attribute(dialog, "aria-modal") != Some("true") {
            violations.push(A11yViolation::new(
                "aria-modal",
                "Dialog is missing aria-modal=\"true\"",
                "4.1.2",
                Impact::Serious,
            ));
        }
    }

    fn check_name(doc: &Document, dialog: NodeId, violations: &mut Vec<A11yViolation>) {
        if doc.has_attribute(dialog, "aria-labelledby") {
            Self::check_reference(doc, dialog, "aria-labelledby", "4.1.2", violations);
        } else if doc
            .attribute(dialog, "aria-label")
            .map_or(true, |l| l.trim().is_empty())
        {
            violations.push(A11yViolation::new(
                "dialog-name",
                "Dialog has no accessible name",
                "4.1.2",
                Impact::Moderate,
            ));
        }
    }

    fn check_reference(
        doc: &Document,
        dialog: NodeId,
        attribute: &str,
        wcag: &str,
        violations: &mut Vec<A11yViolation>,
    ) {
        let Some(ids) = doc.attribute(dialog, attribute) else {
            return;
        };
        for id in ids.split_whitespace() {
            if doc.element_by_id(id).is_none() {
                violations.push(A11yViolation::new(
                    attribute,
                    format!("{attribute} references missing element '{id}'"),
                    wcag,
                    Impact::Critical,
                ));
            }
        }
    }

    fn check_background(doc: &Document, dialog: NodeId, violations: &mut Vec<A11yViolation>) {
        let exposed = doc
            .children(doc.body())
            .iter()
            .copied()
            .flat_map(|child| std::iter::once(child).chain(doc.descendants(child)))
            .filter(|&node| !doc.contains(node, dialog) && !doc.contains(dialog, node))
            .filter(|&node| !is_hidden(doc, node))
            .count();
        if exposed > 0 {
            violations.push(A11yViolation::new(
                "background-hidden",
                format!("{exposed} element(s) outside the dialog are exposed to assistive technology"),
                "1.3.2",
                Impact::Serious,
            ));
        }
    }
}

/// Accessibility check report.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct A11yReport {
    /// List of violations found
    pub violations: Vec<A11yViolation>,
}

impl A11yReport {
    /// Check if all accessibility tests passed.
    #[must_use]
    pub fn is_passing(&self) -> bool {
        self.violations.is_empty()
    }

    /// Get critical violations only.
    #[must_use]
    pub fn critical(&self) -> Vec<&A11yViolation> {
        self.violations
            .iter()
            .filter(|v| v.impact == Impact::Critical)
            .collect()
    }

    /// Whether a rule was violated.
    #[must_use]
    pub fn has(&self, rule: &str) -> bool {
        self.violations.iter().any(|v| v.rule == rule)
    }

    /// Assert that all accessibility tests pass.
    ///
    /// # Panics
    ///
    /// Panics if there are any violations.
    pub fn assert_pass(&self) {
        if !self.is_passing() {
            let messages: Vec<String> = self
                .violations
                .iter()
                .map(|v| {
                    format!(
                        "  [{:?}] {}: {} (WCAG {})",
                        v.impact, v.rule, v.message, v.wcag
                    )
                })
                .collect();

            panic!(
                "Accessibility check failed with {} violation(s):\n{}",
                self.violations.len(),
                messages.join("\n")
            );
        }
    }
}

/// A single accessibility violation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct A11yViolation {
    /// Rule that was violated
    pub rule: String,
    /// Human-readable message
    pub message: String,
    /// WCAG success criterion
    pub wcag: String,
    /// Impact level
    pub impact: Impact,
}

impl A11yViolation {
    fn new(rule: &str, message: impl Into<String>, wcag: &str, impact: Impact) -> Self {
        Self {
            rule: rule.to_string(),
            message: message.into(),
            wcag: wcag.to_string(),
            impact,
        }
    }
}

/// Impact level of an accessibility violation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Impact {
    /// Minor issue
    Minor,
    /// Moderate issue
    Moderate,
    /// Serious issue
    Serious,
    /// Critical issue - must fix
    Critical,
}

/// Configuration for dialog checks.
#[derive(Debug, Clone)]
pub struct A11yConfig {
    /// Require everything outside the dialog to be hidden
    pub check_background: bool,
    /// Require focus inside the dialog
    pub check_focus: bool,
}

impl Default for A11yConfig {
    fn default() -> Self {
        Self {
            check_background: true,
            check_focus: true,
        }
    }
}
