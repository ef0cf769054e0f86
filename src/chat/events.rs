//! Messages driving the chat session lifecycle.
use bevy::prelude::*;

/// Asks the session to open against a living actor.
#[derive(Message, Debug, Clone)]
pub struct ChatOpenRequest {
    pub npc: Entity,
}

/// Asks the session to close. Safe to send redundantly.
#[derive(Message, Debug, Clone)]
pub struct ChatCloseRequest;

/// Player-authored text to forward to the generation backend.
#[derive(Message, Debug, Clone)]
pub struct ChatSendRequest {
    pub text: String,
}

/// A completed player/NPC exchange, published for the UI surfaces and for
/// quest or objective checkers to inspect.
#[derive(Message, Debug, Clone)]
pub struct DialogueExchange {
    pub npc: Entity,
    pub npc_name: String,
    pub player_line: String,
    pub npc_line: String,
}
