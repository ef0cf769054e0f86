//! NPC plugin wiring spawning and wander systems.
use bevy::prelude::*;

use crate::core::plugin::TickSet;

use super::{
    components::NpcIdGenerator,
    systems::{spawn_npcs, wander_npcs},
};

pub struct NpcPlugin;

impl Plugin for NpcPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<NpcIdGenerator>()
            .add_systems(Startup, spawn_npcs)
            .add_systems(Update, wander_npcs.in_set(TickSet::Act));
    }
}
