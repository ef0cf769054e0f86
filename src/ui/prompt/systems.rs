//! Systems rendering the prompt surface to a screen-space text node.
use bevy::prelude::*;

use super::components::{PromptSurface, PromptText};

const PROMPT_FONT_SIZE: f32 = 18.0;
const PROMPT_BOTTOM_PX: f32 = 64.0;
const BACKGROUND_COLOR: Color = Color::srgba(0.08, 0.08, 0.1, 0.8);

/// Spawns the prompt container centered near the bottom of the screen.
pub fn setup_prompt_ui(mut commands: Commands) {
    commands
        .spawn((
            Node {
                position_type: PositionType::Absolute,
                bottom: Val::Px(PROMPT_BOTTOM_PX),
                left: Val::Percent(50.0),
                padding: UiRect::axes(Val::Px(14.0), Val::Px(8.0)),
                ..default()
            },
            BackgroundColor(BACKGROUND_COLOR),
            ZIndex(90),
            Name::new("Interaction Prompt"),
        ))
        .with_children(|parent| {
            parent.spawn((
                Text::new(""),
                TextFont {
                    font_size: PROMPT_FONT_SIZE,
                    ..default()
                },
                TextColor(Color::WHITE),
                PromptText,
            ));
        });
}

/// Advances the dismiss timer on real time so notices expire even while the
/// simulation clock is held.
pub fn tick_prompt_surface(time: Res<Time>, mut prompt: ResMut<PromptSurface>) {
    prompt.tick(time.delta());
}

/// Mirrors the prompt resource into the text node, hiding the container
/// when there is nothing to show.
pub fn sync_prompt_text(
    prompt: Res<PromptSurface>,
    mut texts: Query<(&mut Text, &ChildOf), With<PromptText>>,
    mut containers: Query<&mut Node>,
) {
    let Ok((mut text, parent)) = texts.single_mut() else {
        return;
    };

    let display = prompt.text().unwrap_or("");
    if text.0 != display {
        text.0 = display.to_string();
    }

    if let Ok(mut node) = containers.get_mut(parent.parent()) {
        node.display = if display.is_empty() {
            Display::None
        } else {
            Display::Flex
        };
    }
}
