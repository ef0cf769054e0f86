//! Day cycle: world clock resource and sun lighting.
use std::{f32::consts::TAU, fs, path::Path};

use bevy::prelude::*;
use serde::Deserialize;

use crate::core::plugin::SimulationClock;
use crate::world::components::PrimarySun;

const CONFIG_PATH: &str = "config/time.toml";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
struct RawTimeConfig {
    day_length_minutes: f32,
    noon_lux: f32,
    night_lux: f32,
}

impl Default for RawTimeConfig {
    fn default() -> Self {
        Self {
            day_length_minutes: 12.0,
            noon_lux: 40_000.0,
            night_lux: 10.0,
        }
    }
}

/// Tunable day-cycle parameters.
#[derive(Resource, Debug, Clone)]
pub struct WorldTimeSettings {
    pub seconds_per_day: f32,
    pub noon_lux: f32,
    pub night_lux: f32,
}

impl WorldTimeSettings {
    pub fn load_or_default() -> Self {
        let path = Path::new(CONFIG_PATH);
        match fs::read_to_string(path) {
            Ok(data) => match toml::from_str::<RawTimeConfig>(&data) {
                Ok(raw) => raw.into(),
                Err(err) => {
                    warn!(
                        "Failed to parse {} ({}). Falling back to defaults.",
                        CONFIG_PATH, err
                    );
                    RawTimeConfig::default().into()
                }
            },
            Err(err) => {
                warn!(
                    "Failed to read {} ({}). Falling back to defaults.",
                    CONFIG_PATH, err
                );
                RawTimeConfig::default().into()
            }
        }
    }
}

impl From<RawTimeConfig> for WorldTimeSettings {
    fn from(value: RawTimeConfig) -> Self {
        Self {
            seconds_per_day: value.day_length_minutes.max(0.1) * 60.0,
            noon_lux: value.noon_lux.max(value.night_lux),
            night_lux: value.night_lux.max(0.0),
        }
    }
}

/// Runtime state of the day cycle.
#[derive(Resource, Debug, Default)]
pub struct WorldClock {
    time_of_day: f32,
    day_count: u64,
}

impl WorldClock {
    /// Fraction of the current day in `[0, 1)`, midnight at zero.
    pub fn time_of_day(&self) -> f32 {
        self.time_of_day
    }

    #[cfg_attr(not(test), allow(dead_code))]
    pub fn day_count(&self) -> u64 {
        self.day_count
    }

    fn tick(&mut self, delta_seconds: f32, seconds_per_day: f32) {
        let mut fraction = delta_seconds / seconds_per_day;
        if !fraction.is_finite() {
            fraction = 0.0;
        }
        self.time_of_day = (self.time_of_day + fraction) % 1.0;
        if self.time_of_day < fraction {
            self.day_count = self.day_count.saturating_add(1);
        }
    }
}

/// Advances the world clock on scaled simulation time.
pub fn advance_world_clock(
    mut clock: ResMut<WorldClock>,
    settings: Res<WorldTimeSettings>,
    simulation_clock: Res<SimulationClock>,
) {
    let delta = simulation_clock.last_scaled_delta().as_secs_f32();
    clock.tick(delta, settings.seconds_per_day);
}

/// Rotates the sun with the day cycle and scales its intensity.
pub fn apply_sun_lighting(
    clock: Res<WorldClock>,
    settings: Res<WorldTimeSettings>,
    mut suns: Query<(&mut Transform, &mut DirectionalLight), With<PrimarySun>>,
) {
    let sun_angle = (clock.time_of_day() - 0.25) * TAU;
    let daylight = sun_angle.sin().max(0.0);
    let intensity = settings.night_lux + (settings.noon_lux - settings.night_lux) * daylight;

    for (mut transform, mut light) in suns.iter_mut() {
        transform.rotation = Quat::from_euler(EulerRot::ZYX, 0.0, 0.35, sun_angle).normalize();
        light.illuminance = intensity;
    }
}
