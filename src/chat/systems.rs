//! Chat session systems: open/close, send, and generation settlement.
use bevy::{
    prelude::*,
    tasks::{block_on, futures_lite::future, IoTaskPool, Task},
};
use serde::Deserialize;

use crate::{
    core::plugin::{PauseSource, SimulationPause},
    dialogue::{
        broker::{DialogueBrokerHandle, GenerationContext},
        errors::DialogueError,
    },
    journal::{JournalAction, JournalEvent},
    npc::components::{InConversation, NpcActor, Vitality, Wander},
};

use super::{
    events::{ChatCloseRequest, ChatOpenRequest, ChatSendRequest, DialogueExchange},
    session::ChatSession,
};

/// In-character line used whenever generation fails or returns nothing.
pub const FALLBACK_LINE: &str = "Hm? Sorry, I lost the thread of what I was saying.";

const PLAYER_SPEAKER: &str = "Player";

/// Text the player is composing for the active session.
#[derive(Resource, Debug, Default)]
pub struct ChatInputBuffer {
    text: String,
    focused: bool,
}

impl ChatInputBuffer {
    /// Clears the buffer and grabs focus, as on session open.
    pub fn reset(&mut self) {
        self.text.clear();
        self.focused = true;
    }

    pub fn focus(&mut self) {
        self.focused = true;
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    pub fn push_str(&mut self, text: &str) {
        self.text.push_str(text);
    }

    pub fn backspace(&mut self) {
        self.text.pop();
    }

    pub fn take_text(&mut self) -> String {
        std::mem::take(&mut self.text)
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

/// Who said a transcript line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Speaker {
    Player,
    Npc,
}

#[derive(Debug, Clone)]
pub struct TranscriptLine {
    pub speaker: Speaker,
    pub name: String,
    pub text: String,
}

/// Rolling transcript of the active session, cleared on open.
#[derive(Resource, Debug, Default)]
pub struct ChatTranscript {
    pub lines: Vec<TranscriptLine>,
}

impl ChatTranscript {
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    pub fn push(&mut self, speaker: Speaker, name: impl Into<String>, text: impl Into<String>) {
        self.lines.push(TranscriptLine {
            speaker,
            name: name.into(),
            text: text.into(),
        });
    }

    pub fn last_npc_line(&self) -> Option<&str> {
        self.lines
            .iter()
            .rev()
            .find(|line| line.speaker == Speaker::Npc)
            .map(|line| line.text.as_str())
    }
}

/// The in-flight generation call, if any.
///
/// `target_at_send` captures the session target at the moment the call was
/// issued; a settled response is applied only while the session is still open
/// against that exact entity. The task handle is kept alive here so an
/// abandoned call still runs to completion and is then discarded.
pub struct PendingGeneration {
    pub target_at_send: Entity,
    pub player_line: String,
    pub task: Task<Result<String, DialogueError>>,
}

#[derive(Resource, Default)]
pub struct ActiveGeneration(pub Option<PendingGeneration>);

/// Opens the session on request: pauses the simulation, resets the input
/// buffer, and forces the target quiescent.
pub fn open_chat_sessions(
    mut commands: Commands,
    mut requests: MessageReader<ChatOpenRequest>,
    mut session: ResMut<ChatSession>,
    mut pause: ResMut<SimulationPause>,
    mut transcript: ResMut<ChatTranscript>,
    mut buffer: ResMut<ChatInputBuffer>,
    mut journal: MessageWriter<JournalEvent>,
    actors: Query<(&NpcActor, &Vitality)>,
) {
    for request in requests.read() {
        let Ok((actor, vitality)) = actors.get(request.npc) else {
            continue;
        };
        if !vitality.alive {
            continue;
        }

        if !session.open(request.npc) {
            buffer.focus();
            continue;
        }

        pause.acquire(PauseSource::ChatModal);
        buffer.reset();
        transcript.clear();
        commands.entity(request.npc).insert(InConversation);
        journal.write(
            JournalEvent::new(
                PLAYER_SPEAKER,
                JournalAction::ChatOpened,
                format!("Started talking to {}.", actor.name),
            )
            .with_target(actor.name.clone()),
        );
    }
}

/// Closes the session on request, releasing the pause claim and the target.
pub fn close_chat_sessions(
    mut commands: Commands,
    mut requests: MessageReader<ChatCloseRequest>,
    mut session: ResMut<ChatSession>,
    mut pause: ResMut<SimulationPause>,
    mut journal: MessageWriter<JournalEvent>,
) {
    for _ in requests.read() {
        let Some(target) = session.close() else {
            continue;
        };
        pause.release(PauseSource::ChatModal);
        if let Ok(mut entity) = commands.get_entity(target) {
            entity.remove::<InConversation>();
        }
        journal.write(JournalEvent::new(
            PLAYER_SPEAKER,
            JournalAction::ChatClosed,
            "Ended the conversation.",
        ));
    }
}

/// Force-closes the session when its target dies or despawns, keeping the
/// open-implies-alive invariant.
pub fn enforce_chat_target(
    mut commands: Commands,
    mut session: ResMut<ChatSession>,
    mut pause: ResMut<SimulationPause>,
    vitals: Query<&Vitality>,
) {
    let Some(target) = session.target() else {
        return;
    };
    let alive = vitals.get(target).map(|v| v.alive).unwrap_or(false);
    if alive {
        return;
    }

    debug!("Chat target lost; closing session");
    session.close();
    pause.release(PauseSource::ChatModal);
    if let Ok(mut entity) = commands.get_entity(target) {
        entity.remove::<InConversation>();
    }
}

/// Forwards player text to the generation backend without blocking the tick
/// loop. The current target is captured by value before the call is issued.
pub fn send_chat_messages(
    mut requests: MessageReader<ChatSendRequest>,
    mut session: ResMut<ChatSession>,
    mut active: ResMut<ActiveGeneration>,
    mut transcript: ResMut<ChatTranscript>,
    mut journal: MessageWriter<JournalEvent>,
    broker: Res<DialogueBrokerHandle>,
    actors: Query<&NpcActor>,
) {
    for request in requests.read() {
        let text = request.text.trim();
        if text.is_empty() {
            continue;
        }
        let Some(target) = session.target() else {
            continue;
        };
        if session.input_locked() {
            debug!("Dropping chat send while a generation call is in flight");
            continue;
        }
        let Ok(actor) = actors.get(target) else {
            continue;
        };

        journal.write(
            JournalEvent::new(PLAYER_SPEAKER, JournalAction::Spoke, text)
                .with_target(actor.name.clone()),
        );

        let context = GenerationContext::new(actor.name.clone(), actor.persona.clone(), text);
        let context = match transcript.last_npc_line() {
            Some(previous) => context.with_previous_line(previous),
            None => context,
        };
        transcript.push(Speaker::Player, PLAYER_SPEAKER, text);

        session.lock_input();
        let target_at_send = target;
        let player_line = text.to_string();
        let broker = broker.0.clone();
        let task = IoTaskPool::get().spawn(async move { broker.generate(&context) });

        active.0 = Some(PendingGeneration {
            target_at_send,
            player_line,
            task,
        });
    }
}

/// Polls the in-flight generation call and applies the result if the session
/// context is unchanged. The input lock is released on every settlement path.
pub fn settle_generation(
    mut active: ResMut<ActiveGeneration>,
    mut session: ResMut<ChatSession>,
    mut transcript: ResMut<ChatTranscript>,
    mut journal: MessageWriter<JournalEvent>,
    mut exchanges: MessageWriter<DialogueExchange>,
    mut wanderers: Query<&mut Wander>,
    actors: Query<&NpcActor>,
) {
    let outcome = match active.0.as_mut() {
        Some(pending) => block_on(future::poll_once(&mut pending.task)),
        None => return,
    };
    let Some(outcome) = outcome else {
        return;
    };
    let Some(pending) = active.0.take() else {
        return;
    };

    session.unlock_input();

    let line = match outcome {
        Ok(raw) => parse_reply(&raw),
        Err(err) => {
            warn!(target: "dialogue", "Generation failed: {err}");
            FALLBACK_LINE.to_string()
        }
    };

    if !session.is_open_with(pending.target_at_send) {
        debug!(
            target: "dialogue",
            "Discarding stale generation result for {:?}", pending.target_at_send
        );
        return;
    }

    let npc = pending.target_at_send;
    let Ok(actor) = actors.get(npc) else {
        return;
    };

    transcript.push(Speaker::Npc, actor.name.clone(), line.clone());
    // Let the actor settle for a full decision period before wandering off.
    if let Ok(mut wander) = wanderers.get_mut(npc) {
        wander.reschedule();
    }
    journal.write(
        JournalEvent::new(actor.name.clone(), JournalAction::Spoke, line.clone())
            .with_target(PLAYER_SPEAKER),
    );
    exchanges.write(DialogueExchange {
        npc,
        npc_name: actor.name.clone(),
        player_line: pending.player_line,
        npc_line: line,
    });
}

#[derive(Debug, Deserialize)]
struct ReplyPayload {
    response: String,
}

/// Extracts the NPC line from a raw completion: a JSON `response` envelope
/// when present, the raw text otherwise, and the fixed fallback when empty.
pub fn parse_reply(raw: &str) -> String {
    let line = match serde_json::from_str::<ReplyPayload>(raw.trim()) {
        Ok(payload) => payload.response,
        Err(_) => raw.to_string(),
    };

    let line = line.trim();
    if line.is_empty() {
        FALLBACK_LINE.to_string()
    } else {
        line.to_string()
    }
}
