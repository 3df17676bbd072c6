// Game module - the demo world wired into the save system
//
// This module contains:
// - world.rs: GameWorld, which owns every savable entity and registers
//   them with the save registry

pub mod world;

pub use world::GameWorld;
