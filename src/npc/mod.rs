//! NPC identity, liveness, and wander behavior.
pub mod components;
pub mod plugin;
pub mod systems;

pub use plugin::NpcPlugin;
