//! NPC components and supporting resources.
use std::fmt;

use bevy::prelude::*;

/// Unique identifier for an NPC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Component)]
pub struct NpcId(u64);

impl NpcId {
    pub fn new(value: u64) -> Self {
        Self(value)
    }
}

impl fmt::Display for NpcId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NPC-{:03}", self.0)
    }
}

/// Identity and conversational flavor for a living actor.
#[derive(Component, Debug, Clone)]
pub struct NpcActor {
    pub id: NpcId,
    pub name: String,
    pub persona: String,
    pub hook: NpcHook,
}

impl NpcActor {
    pub fn new(
        id: NpcId,
        name: impl Into<String>,
        persona: impl Into<String>,
        hook: NpcHook,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            persona: persona.into(),
            hook,
        }
    }
}

/// What pressing interact on this actor does.
#[derive(Debug, Clone)]
pub enum NpcHook {
    /// Opens a full chat session.
    Converse,
    /// Shows a short one-off line without opening a session.
    Remark(String),
}

/// Liveness flag consulted by targeting and the chat session.
#[derive(Component, Debug, Clone, Copy)]
pub struct Vitality {
    pub alive: bool,
}

impl Default for Vitality {
    fn default() -> Self {
        Self { alive: true }
    }
}

/// Marker held while the actor is locked into a conversation.
#[derive(Component, Debug, Default)]
pub struct InConversation;

/// Periodic destination picks around a home point.
#[derive(Component, Debug)]
pub struct Wander {
    pub home: Vec3,
    pub range: f32,
    pub speed: f32,
    pub destination: Option<Vec3>,
    pub decision: Timer,
}

impl Wander {
    pub fn new(home: Vec3, range: f32, speed: f32, decision_period_secs: f32) -> Self {
        Self {
            home,
            range,
            speed,
            destination: None,
            decision: Timer::from_seconds(decision_period_secs, TimerMode::Repeating),
        }
    }

    /// Restarts the decision timer and drops the current destination, so the
    /// actor stands still for a full period before moving again.
    pub fn reschedule(&mut self) {
        self.decision.reset();
        self.destination = None;
    }
}

/// Issues monotonically increasing NPC ids.
#[derive(Resource, Default)]
pub struct NpcIdGenerator {
    next: u64,
}

impl NpcIdGenerator {
    pub fn next_id(&mut self) -> NpcId {
        let id = self.next;
        self.next += 1;
        NpcId::new(id)
    }
}
