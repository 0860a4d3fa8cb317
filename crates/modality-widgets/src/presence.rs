//! Presence state machine and transition presets.
//!
//! [`Presence`] keeps a subtree mounted while its exit transition runs.
//! Visibility progress moves from 0.0 (hidden) to 1.0 (fully shown) while
//! entering and back while exiting; reversing mid-transition keeps the
//! current progress.
//!
//! State machine: Absent → Entering → Present → Exiting → Absent

use modality_core::Easing;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::trace;

/// Enter duration shared by the built-in presets.
pub const ENTER_DURATION: Duration = Duration::from_millis(200);
/// Exit duration shared by the built-in presets.
pub const EXIT_DURATION: Duration = Duration::from_millis(100);

/// Slide distance of the `slideIn*` presets, in pixels.
const SLIDE_OFFSET: f64 = 16.0;
/// Starting scale of the `scale` preset.
const INITIAL_SCALE: f64 = 0.95;

// ============================================================================
// Transitions
// ============================================================================

/// Transition applied to the dialog when it mounts and unmounts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MotionPreset {
    /// Slide up from below while fading in
    SlideInBottom,
    /// Slide in from the right while fading in
    SlideInRight,
    /// Grow from 95% while fading in
    #[default]
    Scale,
    /// Appear and disappear instantly
    None,
}

/// Transition of a single animated element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Transition {
    /// Opacity only (used by the overlay)
    Fade,
    /// Dialog preset
    Preset(MotionPreset),
}

/// Inline style values of an animated element at a point in its transition.
#[derive(Debug, Clone, PartialEq)]
pub struct MotionStyle {
    /// CSS opacity
    pub opacity: f64,
    /// CSS transform, if any
    pub transform: Option<String>,
}

impl MotionStyle {
    /// Style of a fully shown element.
    #[must_use]
    pub const fn visible() -> Self {
        Self {
            opacity: 1.0,
            transform: None,
        }
    }
}

impl Transition {
    /// Whether this transition animates at all.
    #[must_use]
    pub const fn is_animated(self) -> bool {
        !matches!(self, Self::Preset(MotionPreset::None))
    }

    /// Enter duration.
    #[must_use]
    pub const fn enter_duration(self) -> Duration {
        if self.is_animated() {
            ENTER_DURATION
        } else {
            Duration::ZERO
        }
    }

    /// Exit duration.
    #[must_use]
    pub const fn exit_duration(self) -> Duration {
        if self.is_animated() {
            EXIT_DURATION
        } else {
            Duration::ZERO
        }
    }

    /// Style at visibility `progress` (0.0 hidden, 1.0 shown).
    #[must_use]
    pub fn style_at(self, progress: f64, easing: Easing) -> MotionStyle {
        let p = easing.apply(progress);
        let hidden = 1.0 - p;
        match self {
            Self::Fade => MotionStyle {
                opacity: p,
                transform: None,
            },
            Self::Preset(MotionPreset::None) => MotionStyle::visible(),
            Self::Preset(MotionPreset::Scale) => MotionStyle {
                opacity: p,
                transform: Some(format!(
                    "scale({:.3})",
                    Easing::Linear.interpolate(INITIAL_SCALE, 1.0, p)
                )),
            },
            Self::Preset(MotionPreset::SlideInBottom) => MotionStyle {
                opacity: p,
                transform: Some(format!("translateY({:.1}px)", SLIDE_OFFSET * hidden)),
            },
            Self::Preset(MotionPreset::SlideInRight) => MotionStyle {
                opacity: p,
                transform: Some(format!("translateX({:.1}px)", SLIDE_OFFSET * hidden)),
            },
        }
    }
}

// ============================================================================
// Presence
// ============================================================================

/// Mount state of a presence-gated subtree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PresenceState {
    /// Not mounted
    #[default]
    Absent,
    /// Mounted, enter transition running
    Entering,
    /// Mounted, fully shown
    Present,
    /// Mounted, exit transition running
    Exiting,
}

impl PresenceState {
    /// Whether the subtree should be in the document.
    #[must_use]
    pub const fn is_mounted(self) -> bool {
        !matches!(self, Self::Absent)
    }

    /// Whether a transition is in progress.
    #[must_use]
    pub const fn is_animating(self) -> bool {
        matches!(self, Self::Entering | Self::Exiting)
    }
}

/// Presence tracker driven by `show`, `hide` and `tick`.
#[derive(Debug, Clone, PartialEq)]
pub struct Presence {
    state: PresenceState,
    progress: f64,
    transition: Transition,
}

impl Presence {
    /// Create an absent presence with the given transition.
    #[must_use]
    pub const fn new(transition: Transition) -> Self {
        Self {
            state: PresenceState::Absent,
            progress: 0.0,
            transition,
        }
    }

    /// Current state.
    #[must_use]
    pub const fn state(&self) -> PresenceState {
        self.state
    }

    /// Visibility progress in [0.0, 1.0].
    #[must_use]
    pub const fn progress(&self) -> f64 {
        self.progress
    }

    /// Transition in use.
    #[must_use]
    pub const fn transition(&self) -> Transition {
        self.transition
    }

    /// Change the transition for subsequent ticks.
    pub fn set_transition(&mut self, transition: Transition) {
        self.transition = transition;
    }

    /// Request the subtree to be shown.
    pub fn show(&mut self) {
        match self.state {
            PresenceState::Absent | PresenceState::Exiting => {
                self.state = PresenceState::Entering;
                self.settle();
            }
            PresenceState::Entering | PresenceState::Present => {}
        }
    }

    /// Request the subtree to be hidden.
    pub fn hide(&mut self) {
        match self.state {
            PresenceState::Present | PresenceState::Entering => {
                self.state = PresenceState::Exiting;
                self.settle();
            }
            PresenceState::Exiting | PresenceState::Absent => {}
        }
    }

    /// Jump to the end of the running transition.
    pub fn finish(&mut self) {
        match self.state {
            PresenceState::Entering => {
                self.progress = 1.0;
                self.state = PresenceState::Present;
            }
            PresenceState::Exiting => {
                self.progress = 0.0;
                self.state = PresenceState::Absent;
            }
            PresenceState::Absent | PresenceState::Present => {}
        }
    }

    /// Advance the running transition. Returns true if the state changed.
    pub fn tick(&mut self, delta: Duration) -> bool {
        let before = self.state;
        let secs = delta.as_secs_f64();
        match self.state {
            PresenceState::Entering => {
                let total = self.transition.enter_duration().as_secs_f64();
                self.progress = if total > 0.0 {
                    (self.progress + secs / total).min(1.0)
                } else {
                    1.0
                };
            }
            PresenceState::Exiting => {
                let total = self.transition.exit_duration().as_secs_f64();
                self.progress = if total > 0.0 {
                    (self.progress - secs / total).max(0.0)
                } else {
                    0.0
                };
            }
            PresenceState::Absent | PresenceState::Present => return false,
        }
        self.settle();
        if self.state != before {
            trace!(from = ?before, to = ?self.state, "presence transition finished");
        }
        self.state != before
    }

    fn settle(&mut self) {
        match self.state {
            PresenceState::Entering if self.progress >= 1.0 || !self.transition.is_animated() => {
                self.finish();
            }
            PresenceState::Exiting if self.progress <= 0.0 || !self.transition.is_animated() => {
                self.finish();
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const SCALE: Transition = Transition::Preset(MotionPreset::Scale);

    #[test]
    fn test_motion_preset_serde_names() {
        let json = serde_json::to_string(&MotionPreset::SlideInBottom).unwrap();
        assert_eq!(json, "\"slideInBottom\"");
        let parsed: MotionPreset = serde_json::from_str("\"none\"").unwrap();
        assert_eq!(parsed, MotionPreset::None);
        assert_eq!(MotionPreset::default(), MotionPreset::Scale);
    }

    #[test]
    fn test_full_lifecycle() {
        let mut presence = Presence::new(SCALE);
        assert_eq!(presence.state(), PresenceState::Absent);

        presence.show();
        assert_eq!(presence.state(), PresenceState::Entering);
        assert!(presence.state().is_mounted());

        assert!(!presence.tick(Duration::from_millis(100)));
        assert!((presence.progress() - 0.5).abs() < 1e-9);
        assert!(presence.tick(Duration::from_millis(100)));
        assert_eq!(presence.state(), PresenceState::Present);

        presence.hide();
        assert_eq!(presence.state(), PresenceState::Exiting);
        assert!(presence.tick(EXIT_DURATION));
        assert_eq!(presence.state(), PresenceState::Absent);
        assert_eq!(presence.progress(), 0.0);
    }

    #[test]
    fn test_none_preset_is_instant() {
        let mut presence = Presence::new(Transition::Preset(MotionPreset::None));
        presence.show();
        assert_eq!(presence.state(), PresenceState::Present);
        presence.hide();
        assert_eq!(presence.state(), PresenceState::Absent);
    }

    #[test]
    fn test_reverse_keeps_progress() {
        let mut presence = Presence::new(SCALE);
        presence.show();
        presence.tick(Duration::from_millis(100));
        presence.hide();
        assert_eq!(presence.state(), PresenceState::Exiting);
        assert!((presence.progress() - 0.5).abs() < 1e-9);

        presence.show();
        assert_eq!(presence.state(), PresenceState::Entering);
        assert!((presence.progress() - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_idle_states_ignore_ticks() {
        let mut presence = Presence::new(SCALE);
        assert!(!presence.tick(Duration::from_secs(1)));
        presence.hide();
        assert_eq!(presence.state(), PresenceState::Absent);
    }

    #[test]
    fn test_styles_at_endpoints() {
        let shown = SCALE.style_at(1.0, Easing::EaseOut);
        assert_eq!(shown.opacity, 1.0);
        assert_eq!(shown.transform.as_deref(), Some("scale(1.000)"));

        let hidden = SCALE.style_at(0.0, Easing::EaseOut);
        assert_eq!(hidden.opacity, 0.0);
        assert_eq!(hidden.transform.as_deref(), Some("scale(0.950)"));

        let slide = Transition::Preset(MotionPreset::SlideInBottom).style_at(0.0, Easing::Linear);
        assert_eq!(slide.transform.as_deref(), Some("translateY(16.0px)"));

        let right = Transition::Preset(MotionPreset::SlideInRight).style_at(1.0, Easing::Linear);
        assert_eq!(right.transform.as_deref(), Some("translateX(0.0px)"));

        assert_eq!(Transition::Fade.style_at(0.5, Easing::Linear).opacity, 0.5);
        assert_eq!(
            Transition::Preset(MotionPreset::None).style_at(0.0, Easing::Linear),
            MotionStyle::visible()
        );
    }

    proptest! {
        #[test]
        fn prop_progress_stays_in_unit_range(steps in proptest::collection::vec((any::<bool>(), 0u64..300), 1..30)) {
            let mut presence = Presence::new(SCALE);
            for (show, ms) in steps {
                if show { presence.show() } else { presence.hide() }
                presence.tick(Duration::from_millis(ms));
                prop_assert!((0.0..=1.0).contains(&presence.progress()));
                prop_assert_eq!(presence.state() == PresenceState::Absent, !presence.state().is_mounted());
            }
        }
    }
}
