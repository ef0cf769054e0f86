//! Dialogue generation: broker abstraction and provider backends.
pub mod broker;
pub mod errors;
pub mod plugin;

pub use plugin::DialoguePlugin;
