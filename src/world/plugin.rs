//! World plugin wiring scene spawn and the day cycle.
use bevy::prelude::*;

use super::{
    systems::{spawn_dropped_items, spawn_resource_nodes, spawn_world_environment},
    time::{advance_world_clock, apply_sun_lighting, WorldClock, WorldTimeSettings},
};

pub struct WorldPlugin;

impl Plugin for WorldPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(WorldTimeSettings::load_or_default())
            .init_resource::<WorldClock>()
            .add_systems(
                Startup,
                (
                    spawn_world_environment,
                    spawn_resource_nodes,
                    spawn_dropped_items,
                ),
            )
            .add_systems(Update, (advance_world_clock, apply_sun_lighting).chain());
    }
}
