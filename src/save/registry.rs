//! Registry of currently active savable entities
//!
//! The registry is a cheaply cloneable handle. Whoever needs to register or
//! unregister entities gets a clone of it, so there is no global instance.
//!
//! Capturing or restoring one entity may register or unregister others (a
//! spawner rebuilding its children, for example). The orchestrator therefore
//! never iterates the live list; it asks for [`SaveRegistry::snapshot`] and
//! walks that copy instead.

use super::saveable::{SavableHandle, Saveable};
use std::cell::RefCell;
use std::rc::Rc;

#[derive(Clone, Default)]
pub struct SaveRegistry {
    entries: Rc<RefCell<Vec<SavableHandle>>>,
}

impl SaveRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an entity if it is not already present
    ///
    /// Returns true if the entity was added.
    pub fn register(&self, entity: SavableHandle) -> bool {
        let mut entries = self.entries.borrow_mut();
        if entries.iter().any(|e| same_entity(e, &entity)) {
            return false;
        }
        entries.push(entity);
        true
    }

    /// Removes an entity if present; unknown entities are ignored
    ///
    /// Returns true if the entity was removed.
    pub fn unregister<T: Saveable + ?Sized>(&self, entity: &Rc<RefCell<T>>) -> bool {
        let mut entries = self.entries.borrow_mut();
        let before = entries.len();
        entries.retain(|e| !same_entity(e, entity));
        entries.len() != before
    }

    /// Marks the entity active, then registers it
    pub fn activate(&self, entity: SavableHandle) {
        entity.borrow_mut().set_active(true);
        self.register(entity);
    }

    /// Marks the entity inactive, then unregisters it
    pub fn deactivate<T: Saveable + ?Sized>(&self, entity: &Rc<RefCell<T>>) {
        entity.borrow_mut().set_active(false);
        self.unregister(entity);
    }

    pub fn contains<T: Saveable + ?Sized>(&self, entity: &Rc<RefCell<T>>) -> bool {
        self.entries.borrow().iter().any(|e| same_entity(e, entity))
    }

    /// Point-in-time copy of the registered entities
    pub fn snapshot(&self) -> Vec<SavableHandle> {
        self.entries.borrow().clone()
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }
}

fn same_entity<T: Saveable + ?Sized>(a: &SavableHandle, b: &Rc<RefCell<T>>) -> bool {
    std::ptr::addr_eq(Rc::as_ptr(a), Rc::as_ptr(b))
}
