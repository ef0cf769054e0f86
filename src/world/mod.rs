//! World scaffolding: scene spawn, interactable population, day cycle.
pub mod components;
pub mod plugin;
pub mod systems;
pub mod time;

pub use plugin::WorldPlugin;
