//! Chat plugin wiring session resources and lifecycle systems.
use bevy::prelude::*;

use crate::core::plugin::TickSet;

use super::{
    events::{ChatCloseRequest, ChatOpenRequest, ChatSendRequest, DialogueExchange},
    session::ChatSession,
    systems::{
        close_chat_sessions, enforce_chat_target, open_chat_sessions, send_chat_messages,
        settle_generation, ActiveGeneration, ChatInputBuffer, ChatTranscript,
    },
};

pub struct ChatPlugin;

impl Plugin for ChatPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<ChatSession>()
            .init_resource::<ActiveGeneration>()
            .init_resource::<ChatTranscript>()
            .init_resource::<ChatInputBuffer>()
            .add_message::<ChatOpenRequest>()
            .add_message::<ChatCloseRequest>()
            .add_message::<ChatSendRequest>()
            .add_message::<DialogueExchange>()
            .add_systems(
                Update,
                (
                    open_chat_sessions,
                    close_chat_sessions,
                    enforce_chat_target,
                    send_chat_messages,
                    settle_generation,
                )
                    .chain()
                    .in_set(TickSet::Session),
            );
    }
}
