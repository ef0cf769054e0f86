//! Speech bubble plugin.
use bevy::prelude::*;

use crate::core::plugin::TickSet;

use super::{
    components::SpeechBubbleSettings,
    systems::{spawn_speech_bubbles, update_speech_bubbles},
};

pub struct SpeechBubblePlugin;

impl Plugin for SpeechBubblePlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<SpeechBubbleSettings>().add_systems(
            Update,
            (spawn_speech_bubbles, update_speech_bubbles)
                .chain()
                .in_set(TickSet::Surface),
        );
    }
}
