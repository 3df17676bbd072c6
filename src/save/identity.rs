//! Stable identifiers for savable entities
//!
//! Two flavors exist:
//! - **Fixed**: literal constants owned by singleton managers ("player",
//!   "farming_manager"). Identical on every run.
//! - **Generated**: a UUID v4 created the first time the identifier is read
//!   and kept for the lifetime of the instance. A freshly spawned instance gets
//!   a different value on every run, which is why spawner children are rebuilt
//!   structurally instead of being matched by identifier.
//!
//! An identifier that was authored ahead of time (for example, stored with a
//! world layout) is never regenerated.

use std::cell::OnceCell;
use std::fmt;
use uuid::Uuid;

/// Identifier provider held by every savable entity
///
/// Not `Clone`: a copied entity must not share an identifier.
pub struct UniqueId {
    value: OnceCell<String>,
}

impl UniqueId {
    /// Identifier for a singleton-like manager
    pub fn fixed(id: &'static str) -> Self {
        Self::authored(id)
    }

    /// Identifier assigned when the entity was authored
    pub fn authored(id: impl Into<String>) -> Self {
        let value = OnceCell::new();
        let _ = value.set(id.into());
        UniqueId { value }
    }

    /// Identifier generated lazily on first access
    pub fn generated() -> Self {
        UniqueId {
            value: OnceCell::new(),
        }
    }

    /// Returns the identifier, generating it first if needed
    pub fn as_str(&self) -> &str {
        self.value.get_or_init(|| Uuid::new_v4().to_string())
    }

    /// True once a value exists (authored, or generated by a previous read)
    pub fn is_assigned(&self) -> bool {
        self.value.get().is_some()
    }
}

impl Default for UniqueId {
    fn default() -> Self {
        Self::generated()
    }
}

impl fmt::Debug for UniqueId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.value.get() {
            Some(id) => write!(f, "UniqueId({})", id),
            None => write!(f, "UniqueId(<unassigned>)"),
        }
    }
}
