//! Prompt plugin wiring the surface resource and render systems.
use bevy::prelude::*;

use crate::core::plugin::TickSet;

use super::{
    components::PromptSurface,
    systems::{setup_prompt_ui, sync_prompt_text, tick_prompt_surface},
};

pub struct PromptPlugin;

impl Plugin for PromptPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<PromptSurface>()
            .add_systems(Startup, setup_prompt_ui)
            .add_systems(
                Update,
                (tick_prompt_surface, sync_prompt_text)
                    .chain()
                    .in_set(TickSet::Surface),
            );
    }
}
