//! Transient prompt line shown to the player.
pub mod components;
pub mod plugin;
pub mod systems;

pub use components::PromptSurface;
pub use plugin::PromptPlugin;
