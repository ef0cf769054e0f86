//! Systems for spawning, feeding, and rendering the chat panel.
use bevy::{
    input::{
        keyboard::{Key, KeyboardInput},
        ButtonState,
    },
    prelude::*,
};

use crate::{
    chat::{
        events::{ChatCloseRequest, ChatSendRequest},
        session::ChatSession,
        systems::{ChatInputBuffer, ChatTranscript},
    },
    npc::components::NpcActor,
};

use super::components::{ChatPanel, ChatPanelBody, ChatPanelInputLine};

const BACKGROUND_COLOR: Color = Color::srgba(0.08, 0.08, 0.1, 0.95);
const BORDER_COLOR: Color = Color::srgb(0.3, 0.3, 0.32);
const NAME_COLOR: Color = Color::srgb(1.0, 0.9, 0.4);
const PANEL_WIDTH_PX: f32 = 420.0;
const TRANSCRIPT_LINES_SHOWN: usize = 6;
const THINKING_INDICATOR: &str = "...";

/// Spawns the panel when a session opens and tears it down when it closes.
pub fn manage_chat_panel(
    mut commands: Commands,
    session: Res<ChatSession>,
    panels: Query<Entity, With<ChatPanel>>,
    actors: Query<&NpcActor>,
) {
    let existing = panels.single().ok();

    match session.target() {
        Some(target) if existing.is_none() => {
            let title = actors
                .get(target)
                .map(|actor| actor.name.clone())
                .unwrap_or_else(|_| "???".to_string());
            spawn_panel(&mut commands, title);
        }
        None => {
            if let Some(panel) = existing {
                commands.entity(panel).despawn();
            }
        }
        _ => {}
    }
}

fn spawn_panel(commands: &mut Commands, title: String) {
    commands
        .spawn((
            Node {
                position_type: PositionType::Absolute,
                bottom: Val::Px(24.0),
                left: Val::Px(24.0),
                width: Val::Px(PANEL_WIDTH_PX),
                padding: UiRect::all(Val::Px(14.0)),
                border: UiRect::all(Val::Px(2.0)),
                flex_direction: FlexDirection::Column,
                row_gap: Val::Px(8.0),
                ..default()
            },
            BackgroundColor(BACKGROUND_COLOR),
            BorderColor::from(BORDER_COLOR),
            ZIndex(110),
            ChatPanel,
            Name::new("Chat Panel"),
        ))
        .with_children(|parent| {
            parent.spawn((
                Text::new(title),
                TextFont {
                    font_size: 17.0,
                    ..default()
                },
                TextColor(NAME_COLOR),
            ));

            parent.spawn((
                Text::new(""),
                TextFont {
                    font_size: 15.0,
                    ..default()
                },
                TextColor(Color::WHITE),
                ChatPanelBody,
            ));

            parent.spawn((
                Text::new("> _"),
                TextFont {
                    font_size: 15.0,
                    ..default()
                },
                TextColor(Color::srgb(0.75, 0.85, 0.75)),
                ChatPanelInputLine,
            ));
        });
}

/// Routes keystrokes into the input buffer while the session is open.
///
/// Enter submits, Escape closes; typing is ignored while a generation call
/// is in flight so a reply cannot be double-sent.
pub fn capture_chat_input(
    session: Res<ChatSession>,
    mut buffer: ResMut<ChatInputBuffer>,
    mut keys: MessageReader<KeyboardInput>,
    mut sends: MessageWriter<ChatSendRequest>,
    mut closes: MessageWriter<ChatCloseRequest>,
) {
    if !session.is_open() {
        keys.clear();
        return;
    }

    for event in keys.read() {
        if event.state != ButtonState::Pressed {
            continue;
        }

        match &event.logical_key {
            Key::Escape => {
                closes.write(ChatCloseRequest);
            }
            Key::Enter => {
                if session.input_locked() {
                    continue;
                }
                let text = buffer.take_text();
                if !text.trim().is_empty() {
                    sends.write(ChatSendRequest { text });
                }
            }
            Key::Backspace => {
                if !session.input_locked() {
                    buffer.backspace();
                }
            }
            Key::Space => {
                if !session.input_locked() {
                    buffer.push_str(" ");
                }
            }
            Key::Character(character) => {
                if !session.input_locked() {
                    buffer.push_str(character.as_str());
                }
            }
            _ => {}
        }
    }
}

/// Mirrors the transcript and input buffer into the panel text nodes.
pub fn render_chat_panel(
    session: Res<ChatSession>,
    buffer: Res<ChatInputBuffer>,
    transcript: Res<ChatTranscript>,
    mut bodies: Query<&mut Text, (With<ChatPanelBody>, Without<ChatPanelInputLine>)>,
    mut input_lines: Query<&mut Text, With<ChatPanelInputLine>>,
) {
    if !session.is_open() {
        return;
    }

    if let Ok(mut body) = bodies.single_mut() {
        let start = transcript.lines.len().saturating_sub(TRANSCRIPT_LINES_SHOWN);
        let rendered = transcript.lines[start..]
            .iter()
            .map(|line| format!("{}: {}", line.name, line.text))
            .collect::<Vec<_>>()
            .join("\n");
        if body.0 != rendered {
            body.0 = rendered;
        }
    }

    if let Ok(mut input_line) = input_lines.single_mut() {
        let rendered = if session.input_locked() {
            THINKING_INDICATOR.to_string()
        } else if buffer.is_focused() {
            format!("> {}_", buffer.text())
        } else {
            format!("> {}", buffer.text())
        };
        if input_line.0 != rendered {
            input_line.0 = rendered;
        }
    }
}
