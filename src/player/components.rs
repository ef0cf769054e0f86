//! Components and resources for the player avatar.
use bevy::prelude::*;

/// Marker for the player avatar entity.
#[derive(Component, Debug)]
pub struct Player;

/// One-shot interact intent sampled from the keyboard each tick.
#[derive(Resource, Debug, Default)]
pub struct InteractInput {
    pressed: bool,
}

impl InteractInput {
    /// Overwrites the flag with this tick's sample.
    pub fn refresh(&mut self, pressed: bool) {
        self.pressed = pressed;
    }

    /// Consumes the press. Later callers in the same tick observe false.
    pub fn take(&mut self) -> bool {
        std::mem::take(&mut self.pressed)
    }

    #[cfg_attr(not(test), allow(dead_code))]
    pub fn is_armed(&self) -> bool {
        self.pressed
    }
}

/// Planar velocity estimate for the avatar, derived from per-tick
/// displacement. Rebased when an action deliberately zeroes motion.
#[derive(Resource, Debug, Default)]
pub struct PlayerMotion {
    velocity: Vec3,
    last_position: Option<Vec3>,
}

impl PlayerMotion {
    pub fn observe(&mut self, position: Vec3, delta_seconds: f32) {
        if let Some(last) = self.last_position {
            if delta_seconds > f32::EPSILON {
                self.velocity = (position - last) / delta_seconds;
            }
        }
        self.last_position = Some(position);
    }

    /// Zeroes the estimate and treats `position` as the new baseline.
    pub fn rebase(&mut self, position: Vec3) {
        self.velocity = Vec3::ZERO;
        self.last_position = Some(position);
    }

    pub fn planar_speed(&self) -> f32 {
        Vec3::new(self.velocity.x, 0.0, self.velocity.z).length()
    }

    /// Test hook for forcing a velocity without a position history.
    #[cfg(test)]
    pub fn set_velocity(&mut self, velocity: Vec3) {
        self.velocity = velocity;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn take_consumes_the_press_once() {
        let mut input = InteractInput::default();
        input.refresh(true);

        assert!(input.take());
        assert!(!input.take());

        input.refresh(false);
        assert!(!input.take());
    }

    #[test]
    fn motion_estimates_planar_speed_from_displacement() {
        let mut motion = PlayerMotion::default();
        motion.observe(Vec3::ZERO, 0.1);
        motion.observe(Vec3::new(1.0, 5.0, 0.0), 0.5);

        assert!((motion.planar_speed() - 2.0).abs() < 1e-4);
    }

    #[test]
    fn rebase_zeroes_the_estimate() {
        let mut motion = PlayerMotion::default();
        motion.observe(Vec3::ZERO, 0.1);
        motion.observe(Vec3::new(3.0, 0.0, 0.0), 0.1);
        assert!(motion.planar_speed() > 0.0);

        motion.rebase(Vec3::new(3.0, 0.0, 0.0));
        assert_eq!(motion.planar_speed(), 0.0);
    }
}
