use crate::save::{SaveError, Saveable, Snapshot, UniqueId};
use glam::Vec3;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeSnapshot {
    pub health: f32,
    pub cut: bool,
    pub position: Vec3,
}

/// A choppable tree
///
/// Cutting a tree leaves a stump: the tree stays active but its collider
/// is disabled until it regrows.
pub struct Tree {
    id: UniqueId,
    active: bool,
    pub position: Vec3,
    max_health: f32,
    health: f32,
    cut: bool,
    collider_enabled: bool,
    regrow_secs: f32,
    regrow_remaining: Option<f32>,
    wood_drop: RangeInclusive<u32>,
}

impl Tree {
    pub fn new(id: UniqueId, position: Vec3, max_health: f32, regrow_secs: f32) -> Self {
        Tree {
            id,
            active: true,
            position,
            max_health,
            health: max_health,
            cut: false,
            collider_enabled: true,
            regrow_secs,
            regrow_remaining: None,
            wood_drop: 1..=3,
        }
    }

    pub fn health(&self) -> f32 {
        self.health
    }

    pub fn is_cut(&self) -> bool {
        self.cut
    }

    pub fn collider_enabled(&self) -> bool {
        self.collider_enabled
    }

    /// Chops the tree, returning how much wood fell if this hit cut it
    pub fn on_hit<R: Rng + ?Sized>(&mut self, damage: f32, rng: &mut R) -> Option<u32> {
        if self.cut || self.health <= 0.0 {
            return None;
        }
        self.health -= damage;
        if self.health > 0.0 {
            return None;
        }

        debug!(id = self.id.as_str(), "Tree cut");
        self.fell();
        Some(rng.random_range(self.wood_drop.clone()))
    }

    pub fn update(&mut self, dt: f32) {
        let Some(remaining) = self.regrow_remaining.as_mut() else {
            return;
        };
        *remaining -= dt;
        if *remaining <= 0.0 {
            self.regrow();
        }
    }

    fn fell(&mut self) {
        self.health = self.health.max(0.0);
        self.cut = true;
        self.collider_enabled = false;
        self.regrow_remaining = Some(self.regrow_secs);
    }

    fn regrow(&mut self) {
        self.cut = false;
        self.health = self.max_health;
        self.collider_enabled = true;
        self.regrow_remaining = None;
    }
}

impl Saveable for Tree {
    fn id(&self) -> &str {
        self.id.as_str()
    }

    fn is_active(&self) -> bool {
        self.active
    }

    fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    fn capture(&self) -> Snapshot {
        Snapshot::Tree(TreeSnapshot {
            health: self.health,
            cut: self.cut,
            position: self.position,
        })
    }

    fn restore(&mut self, snapshot: &Snapshot) -> Result<(), SaveError> {
        let Snapshot::Tree(saved) = snapshot else {
            return Err(SaveError::mismatch(self.id(), "tree", snapshot));
        };

        self.position = saved.position;
        self.health = saved.health.clamp(0.0, self.max_health);
        if saved.cut || self.health <= 0.0 {
            self.fell();
        } else {
            self.cut = false;
            self.collider_enabled = true;
            self.regrow_remaining = None;
        }
        Ok(())
    }
}
