//! Save/load persistence for a small farming world
//!
//! The [`save`] module is the engine: a registry of savable entities, the
//! capture/restore contract, the JSON save document and the orchestrator.
//! The remaining modules are the entities that use it.

pub mod config;
pub mod creature;
pub mod farm;
pub mod game;
pub mod input_system;
pub mod inventory;
pub mod item;
pub mod player;
pub mod resource;
pub mod save;
pub mod spawner;
pub mod stats;
pub mod transform;
pub mod tree;
