use std::path::Path;

use bevy::prelude::*;

mod chat;
mod core;
mod dialogue;
mod interaction;
mod inventory;
mod journal;
mod npc;
mod player;
mod ui;
mod world;

use crate::{
    chat::ChatPlugin, core::CorePlugin, dialogue::DialoguePlugin, interaction::InteractionPlugin,
    journal::JournalPlugin, npc::NpcPlugin, player::PlayerPlugin, ui::UiPlugin, world::WorldPlugin,
};

fn main() {
    load_secrets_env();

    App::new()
        .add_plugins((
            DefaultPlugins,
            CorePlugin::default(),
            JournalPlugin,
            DialoguePlugin,
            ChatPlugin,
            InteractionPlugin,
            PlayerPlugin,
            NpcPlugin,
            WorldPlugin,
            UiPlugin, // After ChatPlugin to observe session state changes
        ))
        .run();
}

fn load_secrets_env() {
    const SECRETS_FILE: &str = "secrets.env";

    let path = Path::new(SECRETS_FILE);
    if !path.exists() {
        return;
    }

    if let Err(err) = dotenvy::from_filename(path) {
        eprintln!("Failed to load {}: {}", SECRETS_FILE, err);
    }
}
