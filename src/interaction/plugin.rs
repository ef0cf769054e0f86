//! Interaction plugin wiring targeting, gathering, and the orchestrator.
use bevy::prelude::*;

use crate::core::plugin::TickSet;

use super::{
    components::CurrentTarget,
    config::InteractionSettings,
    gather::{advance_gather_action, tick_node_respawns, tick_pickup_cooldowns, GatherAction},
    orchestrator::orchestrate_interactions,
};

pub struct InteractionPlugin;

impl Plugin for InteractionPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(InteractionSettings::load_or_default())
            .init_resource::<CurrentTarget>()
            .init_resource::<GatherAction>()
            .add_systems(
                Update,
                (
                    tick_pickup_cooldowns,
                    orchestrate_interactions,
                    advance_gather_action,
                    tick_node_respawns,
                )
                    .chain()
                    .in_set(TickSet::Act),
            );
    }
}
