//! Speech bubble components and settings.
use bevy::prelude::*;

/// A bubble tracking a speaking NPC in screen space.
#[derive(Component, Debug)]
pub struct SpeechBubble {
    speaker: Entity,
    lifetime: Timer,
}

impl SpeechBubble {
    pub fn new(speaker: Entity, lifetime_secs: f32) -> Self {
        Self {
            speaker,
            lifetime: Timer::from_seconds(lifetime_secs, TimerMode::Once),
        }
    }

    pub fn speaker(&self) -> Entity {
        self.speaker
    }

    pub fn tick(&mut self, delta: std::time::Duration) {
        self.lifetime.tick(delta);
    }

    pub fn is_finished(&self) -> bool {
        self.lifetime.is_finished()
    }

    /// 1.0 while fresh, falling to 0.0 over the final `fade_secs`.
    pub fn fade_alpha(&self, fade_secs: f32) -> f32 {
        let remaining = self.lifetime.remaining_secs();
        if remaining < fade_secs {
            (remaining / fade_secs).max(0.0)
        } else {
            1.0
        }
    }
}

/// Tunables for bubble display.
#[derive(Resource, Debug)]
pub struct SpeechBubbleSettings {
    pub lifetime_seconds: f32,
    pub fade_seconds: f32,
    pub vertical_offset: f32,
    pub font_size: f32,
}

impl Default for SpeechBubbleSettings {
    fn default() -> Self {
        Self {
            lifetime_seconds: 8.0,
            fade_seconds: 1.5,
            vertical_offset: 2.2,
            font_size: 15.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn bubble_fades_over_the_final_window() {
        let mut world = World::new();
        let speaker = world.spawn_empty().id();
        let mut bubble = SpeechBubble::new(speaker, 4.0);

        assert_eq!(bubble.fade_alpha(1.0), 1.0);

        bubble.tick(Duration::from_secs_f32(3.5));
        assert!(bubble.fade_alpha(1.0) < 0.6);
        assert!(!bubble.is_finished());

        bubble.tick(Duration::from_secs_f32(0.6));
        assert!(bubble.is_finished());
    }
}
