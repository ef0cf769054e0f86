//! Modal chat session against an asynchronous generation backend.
pub mod events;
pub mod plugin;
pub mod session;
pub mod systems;

pub use plugin::ChatPlugin;
