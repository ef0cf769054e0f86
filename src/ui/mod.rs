//! UI surfaces: prompt line, chat panel, and speech bubbles.
pub mod chat_panel;
pub mod prompt;
pub mod speech_bubble;

use bevy::prelude::*;

use chat_panel::ChatPanelPlugin;
use prompt::PromptPlugin;
use speech_bubble::SpeechBubblePlugin;

pub struct UiPlugin;

impl Plugin for UiPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins((PromptPlugin, ChatPanelPlugin, SpeechBubblePlugin));
    }
}
