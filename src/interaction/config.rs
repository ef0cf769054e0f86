//! Tunables for targeting, gathering, and pickup throttling.
use std::{fs, path::Path, time::Duration};

use bevy::prelude::*;
use serde::Deserialize;

const CONFIG_PATH: &str = "config/interaction.toml";

#[derive(Debug, Clone, Deserialize, Default)]
struct RawInteractionConfig {
    #[serde(default)]
    targeting: RawTargetingSection,
    #[serde(default)]
    gather: RawGatherSection,
    #[serde(default)]
    pickup: RawPickupSection,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
struct RawTargetingSection {
    radius: f32,
    aim_cone_degrees: f32,
}

impl Default for RawTargetingSection {
    fn default() -> Self {
        Self {
            radius: 3.0,
            aim_cone_degrees: 50.0,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
struct RawGatherSection {
    motion_epsilon: f32,
    notice_seconds: f32,
}

impl Default for RawGatherSection {
    fn default() -> Self {
        Self {
            motion_epsilon: 0.02,
            notice_seconds: 2.5,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
struct RawPickupSection {
    retry_cooldown_seconds: f32,
}

impl Default for RawPickupSection {
    fn default() -> Self {
        Self {
            retry_cooldown_seconds: 0.5,
        }
    }
}

/// Runtime interaction settings derived from `config/interaction.toml`.
#[derive(Resource, Debug, Clone)]
pub struct InteractionSettings {
    /// Maximum distance at which anything can be targeted.
    pub interaction_radius: f32,
    /// Minimum facing alignment (cosine) for aimed resource targeting.
    pub aim_alignment: f32,
    /// Per-tick displacement above which an active gather is cancelled.
    pub motion_epsilon: f32,
    /// Lifetime of transient notices on the prompt surface.
    pub notice_duration: Duration,
    /// Throttle applied to an item after a failed pickup attempt.
    pub pickup_retry_cooldown: Duration,
}

impl InteractionSettings {
    pub fn load_or_default() -> Self {
        let path = Path::new(CONFIG_PATH);
        match fs::read_to_string(path) {
            Ok(data) => match toml::from_str::<RawInteractionConfig>(&data) {
                Ok(raw) => raw.into(),
                Err(err) => {
                    warn!(
                        "Failed to parse {} ({}). Falling back to defaults.",
                        CONFIG_PATH, err
                    );
                    RawInteractionConfig::default().into()
                }
            },
            Err(err) => {
                warn!(
                    "Failed to read {} ({}). Falling back to defaults.",
                    CONFIG_PATH, err
                );
                RawInteractionConfig::default().into()
            }
        }
    }
}

impl Default for InteractionSettings {
    fn default() -> Self {
        RawInteractionConfig::default().into()
    }
}

impl From<RawInteractionConfig> for InteractionSettings {
    fn from(value: RawInteractionConfig) -> Self {
        let cone = value.targeting.aim_cone_degrees.clamp(5.0, 180.0);
        Self {
            interaction_radius: value.targeting.radius.max(0.5),
            aim_alignment: (cone.to_radians() / 2.0).cos(),
            motion_epsilon: value.gather.motion_epsilon.max(0.0),
            notice_duration: Duration::from_secs_f32(value.gather.notice_seconds.max(0.5)),
            pickup_retry_cooldown: Duration::from_secs_f32(
                value.pickup.retry_cooldown_seconds.max(0.0),
            ),
        }
    }
}
