//! Timed gather action with movement and re-target cancellation.
use std::time::Duration;

use bevy::prelude::*;

use crate::{
    chat::session::ChatSession,
    core::plugin::SimulationClock,
    inventory::{Inventory, ItemKind},
    journal::{JournalAction, JournalEvent},
    player::components::{InteractInput, Player, PlayerMotion},
    ui::prompt::PromptSurface,
};

use super::{
    components::{CurrentTarget, Interactable, NodeRespawn, PickupCooldown, ResourceNode,
        RespawnPolicy},
    config::InteractionSettings,
};

const CANCELLED_NOTICE: &str = "Gathering cancelled.";
const INVENTORY_FULL_NOTICE: &str = "Cannot gather: inventory full.";

/// The one gather action that may be in flight.
#[derive(Resource, Debug, Default, PartialEq, Eq)]
pub enum GatherAction {
    #[default]
    Idle,
    Gathering {
        target: Entity,
        yields: ItemKind,
        elapsed: Duration,
        duration: Duration,
    },
}

impl GatherAction {
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Gathering { .. })
    }

    #[cfg_attr(not(test), allow(dead_code))]
    pub fn target(&self) -> Option<Entity> {
        match self {
            Self::Gathering { target, .. } => Some(*target),
            Self::Idle => None,
        }
    }

    /// Starts a gather, replacing any previous state.
    pub fn begin(&mut self, target: Entity, yields: ItemKind, duration: Duration) {
        *self = Self::Gathering {
            target,
            yields,
            elapsed: Duration::ZERO,
            duration,
        };
    }

    pub fn reset(&mut self) {
        *self = Self::Idle;
    }

    /// Accumulates `delta` and returns the clamped progress fraction.
    pub fn advance(&mut self, delta: Duration) -> f32 {
        match self {
            Self::Gathering {
                elapsed, duration, ..
            } => {
                *elapsed = elapsed.saturating_add(delta);
                if duration.is_zero() {
                    1.0
                } else {
                    (elapsed.as_secs_f32() / duration.as_secs_f32()).min(1.0)
                }
            }
            Self::Idle => 0.0,
        }
    }

    pub fn progress_label(yields: ItemKind, progress: f32) -> String {
        format!(
            "Gathering {}... ({:.0}%)",
            yields.label(),
            (progress * 100.0).floor()
        )
    }
}

/// Advances an active gather: the cancellation check always runs before any
/// progress is applied within the tick.
#[allow(clippy::too_many_arguments)]
pub fn advance_gather_action(
    mut commands: Commands,
    clock: Res<SimulationClock>,
    settings: Res<InteractionSettings>,
    chat: Res<ChatSession>,
    mut gather: ResMut<GatherAction>,
    mut input: ResMut<InteractInput>,
    motion: Res<PlayerMotion>,
    mut current: ResMut<CurrentTarget>,
    mut prompt: ResMut<PromptSurface>,
    mut journal: MessageWriter<JournalEvent>,
    mut nodes: Query<(&mut Interactable, &ResourceNode, &Transform, &mut Visibility)>,
    mut players: Query<&mut Inventory, With<Player>>,
) {
    if chat.is_open() {
        return;
    }
    let (target, yields) = match *gather {
        GatherAction::Gathering { target, yields, .. } => (target, yields),
        GatherAction::Idle => return,
    };

    let delta = clock.last_scaled_delta();
    let displacement = motion.planar_speed() * delta.as_secs_f32();
    let fresh_press = input.take();
    if displacement > settings.motion_epsilon || fresh_press {
        gather.reset();
        current.clear();
        prompt.release_gather_lock();
        prompt.show(CANCELLED_NOTICE, Some(settings.notice_duration));
        journal.write(JournalEvent::new(
            "Player",
            JournalAction::GatherCancelled,
            format!("Stopped gathering {}.", yields.label()),
        ));
        return;
    }

    let valid_node = nodes
        .get_mut(target)
        .ok()
        .filter(|(interactable, ..)| interactable.enabled);
    let Some((mut interactable, node, node_transform, mut visibility)) = valid_node else {
        // The node vanished mid-action: cancel silently, no credit.
        debug!("Gather target disappeared; cancelling without yield");
        gather.reset();
        current.clear();
        prompt.release_gather_lock();
        prompt.hide();
        return;
    };

    let progress = gather.advance(delta);
    if progress < 1.0 {
        prompt.show(GatherAction::progress_label(yields, progress), None);
        return;
    }

    // Completion: the add attempt and its outcome are handled in this same
    // tick before any other inventory mutation can happen.
    let Ok(mut inventory) = players.single_mut() else {
        gather.reset();
        prompt.release_gather_lock();
        prompt.hide();
        return;
    };

    let outcome = inventory.add(yields, 1);
    prompt.release_gather_lock();

    if outcome.accepted_none() {
        prompt.show(INVENTORY_FULL_NOTICE, Some(settings.notice_duration));
        journal.write(
            JournalEvent::new(
                "Player",
                JournalAction::GatherCancelled,
                format!("Could not gather {}: inventory full.", yields.label()),
            )
            .with_details("inventory_full"),
        );
    } else {
        prompt.hide();
        journal.write(
            JournalEvent::new(
                "Player",
                JournalAction::Gathered,
                format!("Gathered 1 {}.", yields.label()),
            )
            .with_location(node_transform.translation),
        );

        match node.policy {
            RespawnPolicy::Respawn { delay } => {
                interactable.enabled = false;
                *visibility = Visibility::Hidden;
                commands.entity(target).insert(NodeRespawn::new(delay));
            }
            RespawnPolicy::SingleUse => {
                commands.entity(target).despawn();
            }
        }
    }

    gather.reset();
    current.clear();
}

/// Re-enables depleted nodes once their respawn delay has elapsed.
pub fn tick_node_respawns(
    mut commands: Commands,
    clock: Res<SimulationClock>,
    mut nodes: Query<(Entity, &mut NodeRespawn, &mut Interactable, &mut Visibility)>,
) {
    let delta = clock.last_scaled_delta();
    for (entity, mut respawn, mut interactable, mut visibility) in nodes.iter_mut() {
        if respawn.timer.tick(delta).just_finished() {
            interactable.enabled = true;
            *visibility = Visibility::Inherited;
            commands.entity(entity).remove::<NodeRespawn>();
        }
    }
}

/// Clears expired pickup throttles so the item can be targeted again.
pub fn tick_pickup_cooldowns(
    mut commands: Commands,
    time: Res<Time>,
    mut cooldowns: Query<(Entity, &mut PickupCooldown)>,
) {
    for (entity, mut cooldown) in cooldowns.iter_mut() {
        if cooldown.timer.tick(time.delta()).just_finished() {
            commands.entity(entity).remove::<PickupCooldown>();
        }
    }
}
