//! Chat panel plugin.
use bevy::prelude::*;

use crate::core::plugin::TickSet;

use super::systems::{capture_chat_input, manage_chat_panel, render_chat_panel};

pub struct ChatPanelPlugin;

impl Plugin for ChatPanelPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            Update,
            (manage_chat_panel, capture_chat_input, render_chat_panel)
                .chain()
                .in_set(TickSet::Surface),
        );
    }
}
