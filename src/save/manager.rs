//! Save manager: the orchestrator that drives capture and restore
//!
//! This module provides the SaveManager struct which handles:
//! - Capturing every active registered entity into one document
//! - Writing that document to the fixed save path
//! - Reading it back and handing each entity its own snapshot
//! - Autosave timing
//!
//! `save()` and `load()` run to completion synchronously. Callers must not
//! run them concurrently; the frame loop in `main.rs` handles at most one
//! control action per frame.

use super::registry::SaveRegistry;
use super::store::SaveStore;
use super::types::*;
use crate::config::SaveConfig;
use std::path::Path;
use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn};

pub struct SaveManager {
    registry: SaveRegistry,
    store: SaveStore,
    document: SaveDocument,
    save_mode: SaveMode,
    autosave_interval: Option<Duration>,
    last_save: Option<Instant>,
}

impl SaveManager {
    /// Creates a SaveManager for the given config and registry
    ///
    /// The save directory will be created if it doesn't exist. The in-memory
    /// document starts empty, as after [`SaveManager::new_game`].
    pub fn new(config: &SaveConfig, registry: SaveRegistry) -> Result<Self, SaveError> {
        config.validate()?;
        let store = SaveStore::new(&config.save_dir, &config.file_name)?;

        Ok(SaveManager {
            registry,
            store,
            document: SaveDocument::new(),
            save_mode: config.save_mode,
            autosave_interval: config.autosave_interval(),
            last_save: None,
        })
    }

    pub fn registry(&self) -> &SaveRegistry {
        &self.registry
    }

    pub fn document(&self) -> &SaveDocument {
        &self.document
    }

    pub fn save_path(&self) -> &Path {
        self.store.path()
    }

    pub fn save_exists(&self) -> bool {
        self.store.exists()
    }

    pub fn save_mode(&self) -> SaveMode {
        self.save_mode
    }

    /// Discards the in-memory document; registered entities are not touched
    pub fn new_game(&mut self) {
        self.document = SaveDocument::new();
        info!("New game started, default values will be used");
    }

    /// Captures every active registered entity and writes the save file
    ///
    /// # Strategy
    /// 1. Copy the registry, so captures that register/unregister are safe
    /// 2. Clear the document (Rebuild mode only)
    /// 3. Capture each active entity under its identifier, last write wins
    /// 4. Write the whole document, replacing the previous file
    pub fn save(&mut self) -> Result<SaveReport, SaveError> {
        let entities = self.registry.snapshot();
        info!(registered = entities.len(), mode = ?self.save_mode, "Saving game");

        if self.save_mode == SaveMode::Rebuild {
            self.document.clear();
        }

        let mut captured = 0;
        for entity in &entities {
            let entity = entity.borrow();
            if !entity.is_active() {
                debug!(id = entity.id(), "Skipping inactive entity");
                continue;
            }

            let id = entity.id().to_string();
            if self.document.insert(id.as_str(), entity.capture()) {
                debug!(id = %id, "Identifier already present, overwriting");
            }
            captured += 1;
        }

        let path = self.store.write(&self.document).inspect_err(|e| {
            error!(error = %e, path = %self.store.path().display(), "Save failed");
        })?;
        self.last_save = Some(Instant::now());

        let report = SaveReport {
            path,
            entries: self.document.len(),
            captured,
            saved_at: chrono::Local::now(),
        };
        info!(
            path = %report.path.display(),
            entries = report.entries,
            at = %report.saved_at.format("%Y-%m-%d %H:%M:%S"),
            "Game saved"
        );
        Ok(report)
    }

    /// Reads the save file and restores every registered entity found in it
    ///
    /// A missing file yields [`LoadOutcome::NothingToLoad`]. A corrupted file
    /// is an error and no entity is touched. An entity that rejects its
    /// snapshot is logged and skipped; the others are still restored.
    pub fn load(&mut self) -> Result<LoadOutcome, SaveError> {
        let document = match self.store.read() {
            Ok(Some(document)) => document,
            Ok(None) => {
                warn!(path = %self.store.path().display(), "No save file to load");
                return Ok(LoadOutcome::NothingToLoad);
            }
            Err(e) => {
                error!(error = %e, "Save file appears to be corrupted, load aborted");
                return Err(e);
            }
        };

        let entities = self.registry.snapshot();
        info!(registered = entities.len(), entries = document.len(), "Loading game");

        let mut restored = 0;
        let mut untouched = 0;
        let mut failed = 0;
        for entity in &entities {
            let mut entity = entity.borrow_mut();
            let Some(snapshot) = document.get(entity.id()) else {
                untouched += 1;
                continue;
            };

            match entity.restore(snapshot) {
                Ok(()) => restored += 1,
                Err(e) => {
                    warn!(id = entity.id(), error = %e, "Entity rejected its snapshot");
                    failed += 1;
                }
            }
        }

        self.document = document;
        info!(restored, untouched, failed, "Game loaded");
        Ok(LoadOutcome::Loaded {
            restored,
            untouched,
            failed,
        })
    }

    /// Check if autosave is due
    ///
    /// Always false when no interval is configured; true when an interval is
    /// configured and nothing has been saved yet.
    pub fn should_autosave(&self) -> bool {
        let Some(interval) = self.autosave_interval else {
            return false;
        };
        match self.last_save {
            Some(last_save) => last_save.elapsed() >= interval,
            None => true,
        }
    }
}
