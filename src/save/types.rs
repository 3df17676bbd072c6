//! Save data types for the persistence engine
//!
//! This module defines the save document, the per-entity snapshot sum type,
//! and the error/outcome types returned by save and load. Everything here is
//! serialized with Serde to a single pretty-printed JSON file.

use crate::creature::CreatureSnapshot;
use crate::farm::FarmSnapshot;
use crate::inventory::{PlayerItemsSnapshot, SlotSnapshot};
use crate::player::PlayerSnapshot;
use crate::resource::ResourceSnapshot;
use crate::spawner::ChildRecord;
use crate::tree::TreeSnapshot;
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// One entity's persisted state
///
/// Each entity kind owns exactly one variant. The orchestrator never looks
/// inside a snapshot; it only moves it between the entity and the document.
///
/// Serialized as `{"kind": "...", "state": ...}` so the owning entity can be
/// identified when reading a save file by hand.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "state", rename_all = "snake_case")]
pub enum Snapshot {
    Player(PlayerSnapshot),
    PlayerItems(PlayerItemsSnapshot),
    Container(Vec<SlotSnapshot>),
    Resource(ResourceSnapshot),
    Tree(TreeSnapshot),
    Creature(CreatureSnapshot),
    Farm(FarmSnapshot),
    Spawner(Vec<ChildRecord>),
    /// Payload defined by a collaborator outside this crate
    Opaque(serde_json::Value),
}

impl Snapshot {
    /// Name of the variant, matching the `kind` tag on disk
    pub fn kind(&self) -> &'static str {
        match self {
            Snapshot::Player(_) => "player",
            Snapshot::PlayerItems(_) => "player_items",
            Snapshot::Container(_) => "container",
            Snapshot::Resource(_) => "resource",
            Snapshot::Tree(_) => "tree",
            Snapshot::Creature(_) => "creature",
            Snapshot::Farm(_) => "farm",
            Snapshot::Spawner(_) => "spawner",
            Snapshot::Opaque(_) => "opaque",
        }
    }
}

/// The root save file structure
///
/// A single map from entity identifier to snapshot. There is no version
/// field; a file whose payload shapes no longer match fails to parse and the
/// load is aborted before any entity is touched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SaveDocument {
    #[serde(rename = "savedStates")]
    saved_states: BTreeMap<String, Snapshot>,
}

impl SaveDocument {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a snapshot, replacing any earlier one under the same identifier
    ///
    /// Returns true if an existing entry was overwritten.
    pub fn insert(&mut self, id: impl Into<String>, snapshot: Snapshot) -> bool {
        self.saved_states.insert(id.into(), snapshot).is_some()
    }

    pub fn get(&self, id: &str) -> Option<&Snapshot> {
        self.saved_states.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.saved_states.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.saved_states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.saved_states.is_empty()
    }

    pub fn clear(&mut self) {
        self.saved_states.clear();
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.saved_states.keys().map(String::as_str)
    }

    pub fn to_json_pretty(&self) -> Result<String, SaveError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parses a document, mapping every failure to [`SaveError::CorruptedData`]
    ///
    /// Takes raw bytes so that invalid UTF-8 is reported as corruption too.
    pub fn from_json(json: impl AsRef<[u8]>) -> Result<Self, SaveError> {
        serde_json::from_slice(json.as_ref()).map_err(|e| SaveError::CorruptedData(e.to_string()))
    }
}

/// How `save()` treats entries already present in the in-memory document
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SaveMode {
    /// Clear, then rebuild from the entities active right now.
    /// Inactive entities lose whatever they had persisted before.
    #[default]
    Rebuild,
    /// Keep earlier entries and overwrite only what was captured this call
    Merge,
}

/// Summary of a completed save
#[derive(Debug, Clone)]
pub struct SaveReport {
    pub path: PathBuf,
    pub entries: usize,
    pub captured: usize,
    pub saved_at: DateTime<Local>,
}

/// Result of a load that did not fail
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// No save file exists; nothing was touched
    NothingToLoad,
    Loaded {
        /// Entities that found their snapshot and accepted it
        restored: usize,
        /// Entities with no entry in the document, left at their current state
        untouched: usize,
        /// Entities that rejected their snapshot
        failed: usize,
    },
}

/// Error types for save/load operations
#[derive(Debug, thiserror::Error)]
pub enum SaveError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Corrupted save data: {0}")]
    CorruptedData(String),

    #[error("snapshot for '{id}' is a {found} snapshot, expected {expected}")]
    SnapshotMismatch {
        id: String,
        expected: &'static str,
        found: &'static str,
    },

    #[error("Could not replace save file: {0}")]
    Persist(#[from] tempfile::PersistError),

    #[error("Invalid save configuration: {0}")]
    Config(String),
}

impl SaveError {
    pub fn mismatch(id: &str, expected: &'static str, found: &Snapshot) -> Self {
        SaveError::SnapshotMismatch {
            id: id.to_string(),
            expected,
            found: found.kind(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_overwrites_same_id() {
        let mut doc = SaveDocument::new();
        assert!(!doc.insert("a", Snapshot::Opaque(serde_json::json!(1))));
        assert!(doc.insert("a", Snapshot::Opaque(serde_json::json!(2))));

        assert_eq!(doc.len(), 1);
        assert_eq!(doc.get("a"), Some(&Snapshot::Opaque(serde_json::json!(2))));
    }

    #[test]
    fn test_document_uses_saved_states_key() {
        let mut doc = SaveDocument::new();
        doc.insert("chest", Snapshot::Container(Vec::new()));

        let json = doc.to_json_pretty().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["savedStates"]["chest"]["kind"], "container");
    }

    #[test]
    fn test_missing_map_is_corrupted() {
        let result = SaveDocument::from_json("{}");
        assert!(matches!(result, Err(SaveError::CorruptedData(_))));

        let result = SaveDocument::from_json("{\"savedStates\": null}");
        assert!(matches!(result, Err(SaveError::CorruptedData(_))));
    }

    #[test]
    fn test_unknown_kind_is_corrupted() {
        let json = r#"{"savedStates": {"x": {"kind": "dragon", "state": {}}}}"#;
        assert!(matches!(
            SaveDocument::from_json(json),
            Err(SaveError::CorruptedData(_))
        ));
    }
}
