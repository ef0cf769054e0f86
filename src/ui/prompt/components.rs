//! Prompt surface state and UI markers.
use std::time::Duration;

use bevy::prelude::*;

/// Marker for the on-screen prompt text node.
#[derive(Component, Debug)]
pub struct PromptText;

/// Single transient prompt line with an optional auto-dismiss timer.
///
/// A timed `show` arms a dismiss timer together with the exact text that
/// armed it; when the timer fires it clears the prompt only if that text is
/// still displayed, so a stale timer never blanks a newer prompt. While the
/// gather readout holds the surface, `hide` from other callers is ignored.
#[derive(Resource, Debug, Default)]
pub struct PromptSurface {
    text: Option<String>,
    dismiss: Option<PromptDismiss>,
    gather_lock: bool,
}

#[derive(Debug)]
struct PromptDismiss {
    timer: Timer,
    armed_text: String,
}

impl PromptSurface {
    /// Replaces the displayed text. `duration` of `None` persists the text
    /// until an explicit hide; an untimed show leaves any armed timer in
    /// place and relies on the text guard when it fires.
    pub fn show(&mut self, text: impl Into<String>, duration: Option<Duration>) {
        let text = text.into();
        if let Some(duration) = duration {
            self.dismiss = Some(PromptDismiss {
                timer: Timer::new(duration, TimerMode::Once),
                armed_text: text.clone(),
            });
        }
        self.text = Some(text);
    }

    /// Clears the prompt. No-op while the gather lock is held.
    pub fn hide(&mut self) {
        if self.gather_lock {
            return;
        }
        self.text = None;
        self.dismiss = None;
    }

    pub fn lock_for_gather(&mut self) {
        self.gather_lock = true;
    }

    pub fn release_gather_lock(&mut self) {
        self.gather_lock = false;
    }

    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    /// Advances the dismiss timer; clears the prompt only when the armed
    /// text is still the one on screen.
    pub fn tick(&mut self, delta: Duration) {
        let Some(dismiss) = self.dismiss.as_mut() else {
            return;
        };
        if !dismiss.timer.tick(delta).just_finished() {
            return;
        }

        let still_current = self.text.as_deref() == Some(dismiss.armed_text.as_str());
        self.dismiss = None;
        if still_current {
            self.text = None;
        }
    }
}
