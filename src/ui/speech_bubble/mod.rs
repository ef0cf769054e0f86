//! Screen-space utterance bubbles above speaking NPCs.
pub mod components;
pub mod plugin;
pub mod systems;

pub use plugin::SpeechBubblePlugin;
