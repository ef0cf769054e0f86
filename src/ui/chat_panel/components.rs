//! Markers for the chat panel widget tree.
use bevy::prelude::*;

/// Root node of the chat window.
#[derive(Component, Debug)]
pub struct ChatPanel;

/// Text node showing the running transcript.
#[derive(Component, Debug)]
pub struct ChatPanelBody;

/// Text node showing the player's in-progress input line.
#[derive(Component, Debug)]
pub struct ChatPanelInputLine;
