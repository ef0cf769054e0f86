//! Player plugin wiring input sampling, movement, and motion tracking.
use bevy::prelude::*;

use crate::core::plugin::TickSet;

use super::{
    components::{InteractInput, PlayerMotion},
    systems::{move_player, read_interact_input, spawn_player, track_player_motion},
};

pub struct PlayerPlugin;

impl Plugin for PlayerPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<InteractInput>()
            .init_resource::<PlayerMotion>()
            .add_systems(Startup, spawn_player)
            .add_systems(
                Update,
                (read_interact_input, move_player, track_player_motion)
                    .chain()
                    .in_set(TickSet::Input),
            );
    }
}
