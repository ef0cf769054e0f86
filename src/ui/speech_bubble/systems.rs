//! Systems spawning and positioning speech bubbles over NPCs.
use bevy::{prelude::*, window::PrimaryWindow};

use crate::{chat::events::DialogueExchange, world::components::WorldCamera};

use super::components::{SpeechBubble, SpeechBubbleSettings};

const BACKGROUND_COLOR: Color = Color::srgba(0.1, 0.1, 0.12, 0.85);
const TEXT_COLOR: Color = Color::WHITE;
const MAX_WIDTH_PX: f32 = 240.0;

/// Spawns (or replaces) a bubble whenever an exchange completes.
pub fn spawn_speech_bubbles(
    mut commands: Commands,
    settings: Res<SpeechBubbleSettings>,
    mut exchanges: MessageReader<DialogueExchange>,
    existing: Query<(Entity, &SpeechBubble)>,
) {
    for exchange in exchanges.read() {
        // One bubble per speaker: a newer line replaces the old one.
        for (entity, bubble) in existing.iter() {
            if bubble.speaker() == exchange.npc {
                commands.entity(entity).despawn();
            }
        }

        commands.spawn((
            Node {
                position_type: PositionType::Absolute,
                max_width: Val::Px(MAX_WIDTH_PX),
                padding: UiRect::all(Val::Px(6.0)),
                display: Display::None,
                ..default()
            },
            BackgroundColor(BACKGROUND_COLOR),
            ZIndex(100),
            SpeechBubble::new(exchange.npc, settings.lifetime_seconds),
            Text::new(exchange.npc_line.clone()),
            TextFont {
                font_size: settings.font_size,
                ..default()
            },
            TextColor(TEXT_COLOR),
            Name::new(format!("Speech Bubble ({})", exchange.npc_name)),
        ));
    }
}

/// Projects bubbles onto the screen above their speakers, fading them out
/// and despawning them when the lifetime expires or the speaker is gone.
pub fn update_speech_bubbles(
    mut commands: Commands,
    time: Res<Time>,
    settings: Res<SpeechBubbleSettings>,
    cameras: Query<(&Camera, &GlobalTransform), With<WorldCamera>>,
    windows: Query<&Window, With<PrimaryWindow>>,
    speakers: Query<&GlobalTransform>,
    mut bubbles: Query<(
        Entity,
        &mut SpeechBubble,
        &mut Node,
        &mut BackgroundColor,
        &mut TextColor,
    )>,
) {
    let Ok((camera, camera_transform)) = cameras.single() else {
        return;
    };
    let Ok(window) = windows.single() else {
        return;
    };
    let window_height = window.resolution.height();

    for (entity, mut bubble, mut node, mut background, mut text_color) in bubbles.iter_mut() {
        bubble.tick(time.delta());
        if bubble.is_finished() {
            commands.entity(entity).despawn();
            continue;
        }

        let Ok(speaker_transform) = speakers.get(bubble.speaker()) else {
            commands.entity(entity).despawn();
            continue;
        };

        let mut anchor = speaker_transform.translation();
        anchor.y += settings.vertical_offset;

        let Ok(viewport_position) = camera.world_to_viewport(camera_transform, anchor) else {
            node.display = Display::None;
            continue;
        };

        node.display = Display::Flex;
        node.left = Val::Px(viewport_position.x);
        node.top = Val::Px(window_height - viewport_position.y);

        let alpha = bubble.fade_alpha(settings.fade_seconds);
        text_color.0 = TEXT_COLOR.with_alpha(alpha);
        background.0 = BACKGROUND_COLOR.with_alpha(alpha * 0.85);
    }
}
