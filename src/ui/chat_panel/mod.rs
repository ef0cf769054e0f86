//! Modal chat window: transcript view and text entry.
pub mod components;
pub mod plugin;
pub mod systems;

pub use plugin::ChatPanelPlugin;
