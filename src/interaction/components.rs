//! Components and resources describing interactable world entities.
use std::time::Duration;

use bevy::prelude::*;

use crate::inventory::ItemKind;

/// Shared interaction data carried by every targetable entity.
#[derive(Component, Debug, Clone)]
pub struct Interactable {
    /// Prompt line shown when this entity becomes the current target.
    pub prompt: Option<String>,
    /// Cleared while the entity cannot be acted on (e.g. a depleted node).
    pub enabled: bool,
}

impl Interactable {
    pub fn with_prompt(prompt: impl Into<String>) -> Self {
        Self {
            prompt: Some(prompt.into()),
            enabled: true,
        }
    }

    pub fn unlabelled() -> Self {
        Self {
            prompt: None,
            enabled: true,
        }
    }
}

/// Closed set of target categories, in priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetKind {
    Character,
    Resource,
    Item,
}

/// Resolved target snapshot for one tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TargetInfo {
    pub entity: Entity,
    pub kind: TargetKind,
    pub anchor: Vec3,
    pub distance: f32,
}

/// The single target the orchestrator currently holds.
///
/// Replaced wholesale every tick rather than mutated in place, so a kind
/// change can never leave a half-updated snapshot behind.
#[derive(Resource, Debug, Default)]
pub struct CurrentTarget(pub Option<TargetInfo>);

impl CurrentTarget {
    pub fn get(&self) -> Option<&TargetInfo> {
        self.0.as_ref()
    }

    pub fn clear(&mut self) {
        self.0 = None;
    }

    /// True when `candidate` names a different entity or kind than the held
    /// target. Distance changes alone do not count as a difference.
    pub fn differs_from(&self, candidate: Option<&TargetInfo>) -> bool {
        match (&self.0, candidate) {
            (None, None) => false,
            (Some(held), Some(new)) => held.entity != new.entity || held.kind != new.kind,
            _ => true,
        }
    }
}

/// A gatherable world node.
#[derive(Component, Debug, Clone)]
pub struct ResourceNode {
    pub yields: ItemKind,
    pub gather_duration: Duration,
    pub policy: RespawnPolicy,
}

/// What happens to a node once it has been gathered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RespawnPolicy {
    /// Disabled and hidden, then re-enabled after the delay.
    Respawn { delay: Duration },
    /// Removed from the world permanently.
    SingleUse,
}

/// Deferred re-enable for a depleted node.
#[derive(Component, Debug)]
pub struct NodeRespawn {
    pub timer: Timer,
}

impl NodeRespawn {
    pub fn new(delay: Duration) -> Self {
        Self {
            timer: Timer::new(delay, TimerMode::Once),
        }
    }
}

/// An item lying in the world, waiting to be collected.
#[derive(Component, Debug, Clone)]
pub struct DroppedItem {
    pub kind: ItemKind,
    pub count: u32,
}

/// Throttles re-attempts after a failed pickup. Successful pickups are never
/// throttled; the item is simply gone.
#[derive(Component, Debug)]
pub struct PickupCooldown {
    pub timer: Timer,
}

impl PickupCooldown {
    pub fn new(delay: Duration) -> Self {
        Self {
            timer: Timer::new(delay, TimerMode::Once),
        }
    }
}
