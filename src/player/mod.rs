//! Player avatar, interact input, and motion tracking.
pub mod components;
pub mod plugin;
pub mod systems;

pub use plugin::PlayerPlugin;
