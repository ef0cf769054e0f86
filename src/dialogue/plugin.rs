//! Dialogue plugin installing the active generation broker.
use bevy::prelude::*;

use super::broker::{openai::OpenAiDialogueBroker, DialogueBroker, DialogueBrokerHandle};

pub struct DialoguePlugin;

impl Plugin for DialoguePlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(DialogueBrokerHandle::new(OpenAiDialogueBroker::new()))
            .add_systems(Startup, log_dialogue_provider);
    }
}

fn log_dialogue_provider(broker: Res<DialogueBrokerHandle>) {
    info!(
        target: "dialogue",
        "DialoguePlugin initialised with provider: {}",
        broker.0.provider_kind()
    );
}
