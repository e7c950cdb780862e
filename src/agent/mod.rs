//! Agent module.
//!
//! An [`Agent`] is a role/goal/backstory persona bound to a language model.
//! Synthesized crews build one agent per suggested archetype.

pub mod core;

// Re-export the main Agent type.
pub use self::core::Agent;
