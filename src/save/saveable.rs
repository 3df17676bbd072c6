//! Saveable trait for entities that can be captured and restored
//!
//! Any entity that wants persistence implements this trait and is handed to
//! the [`SaveRegistry`](super::SaveRegistry) when it becomes active.

use super::types::{SaveError, Snapshot};
use std::cell::RefCell;
use std::rc::Rc;

/// Trait for entities that can be saved and loaded
///
/// # Design Pattern: Capture / Restore
///
/// Unlike a "build a new value from save data" constructor, `restore` is
/// applied to an entity that already exists in the world. That lets
/// world-placed entities keep their configuration (drop tables, respawn
/// timers, textures) while only their mutable state is replaced.
///
/// # Contract
///
/// - `id` is unique among all simultaneously registered entities.
/// - `capture` is a pure read.
/// - `restore` fully reinitializes observable state from the snapshot,
///   including the active flag, position, and anything derived from them.
///   It checks the snapshot variant before mutating anything, so a wrong
///   snapshot leaves the entity untouched.
pub trait Saveable {
    fn id(&self) -> &str;

    /// Whether the entity's owning node is active in the world
    fn is_active(&self) -> bool;

    fn set_active(&mut self, active: bool);

    fn capture(&self) -> Snapshot;

    fn restore(&mut self, snapshot: &Snapshot) -> Result<(), SaveError>;
}

/// Shared handle through which the registry reaches an entity
pub type SavableHandle = Rc<RefCell<dyn Saveable>>;

/// Wraps an entity in the shared-ownership cell the registry expects
pub fn share<T: Saveable + 'static>(entity: T) -> Rc<RefCell<T>> {
    Rc::new(RefCell::new(entity))
}
