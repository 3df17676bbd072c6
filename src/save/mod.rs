//! Save/Load system
//!
//! This module provides the persistence engine:
//! - A registry of currently active savable entities
//! - A uniform capture/restore contract ([`Saveable`])
//! - A single-file JSON save document keyed by entity identifier
//! - An orchestrator ([`SaveManager`]) that drives capture and restore
//!
//! # Architecture
//!
//! - `identity`: Fixed and generated entity identifiers
//! - `saveable`: Saveable trait and shared entity handles
//! - `registry`: SaveRegistry of active entities
//! - `store`: Reading/writing the save file
//! - `manager`: SaveManager orchestration
//! - `types`: Document, snapshot and error types
//!
//! Entities that are created and destroyed at runtime by an owner (see
//! `spawner`) are not registered here; their owner persists enough
//! structure to rebuild them.
//!
//! # Example Usage
//!
//! ```ignore
//! let registry = SaveRegistry::new();
//! let mut save_manager = SaveManager::new(&SaveConfig::default(), registry.clone())?;
//!
//! let player = share(Player::new(Vec3::ZERO));
//! registry.activate(player.clone());
//!
//! save_manager.save()?;   // F5
//! save_manager.load()?;   // F9
//! ```

pub mod identity;
pub mod manager;
pub mod registry;
pub mod saveable;
pub mod store;
pub mod types;

// Re-export commonly used types
pub use identity::UniqueId;
pub use manager::SaveManager;
pub use registry::SaveRegistry;
pub use saveable::{SavableHandle, Saveable, share};
pub use store::SaveStore;
pub use types::*;
