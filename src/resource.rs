use crate::item::ItemStack;
use crate::save::{SaveError, Saveable, Snapshot, UniqueId};
use glam::Vec3;
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceSnapshot {
    pub health: u32,
    pub destroyed: bool,
    pub position: Vec3,
}

/// A rock or ore node that breaks after a few hits
///
/// A destroyed node is deactivated. Respawnable nodes count down and
/// come back at full health.
pub struct MineableResource {
    id: UniqueId,
    active: bool,
    pub position: Vec3,
    max_health: u32,
    health: u32,
    destroyed: bool,
    respawn_secs: Option<f32>,
    respawn_remaining: Option<f32>,
    drop: ItemStack,
}

impl MineableResource {
    /// `respawn_secs` of `None` means the node is gone for good once mined
    pub fn new(
        id: UniqueId,
        position: Vec3,
        max_health: u32,
        respawn_secs: Option<f32>,
        drop: ItemStack,
    ) -> Self {
        MineableResource {
            id,
            active: true,
            position,
            max_health,
            health: max_health,
            destroyed: false,
            respawn_secs,
            respawn_remaining: None,
            drop,
        }
    }

    pub fn health(&self) -> u32 {
        self.health
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    pub fn is_respawning(&self) -> bool {
        self.respawn_remaining.is_some()
    }

    /// Damage stage for picking a sprite, 0 = intact
    ///
    /// A destroyed node always reports the last stage.
    pub fn damage_stage(&self, stage_count: usize) -> usize {
        if stage_count == 0 {
            return 0;
        }
        let last = stage_count - 1;
        if self.destroyed || self.health == 0 {
            return last;
        }
        ((self.max_health - self.health) as usize).min(last)
    }

    /// Hits the node, returning the drop if this hit destroyed it
    pub fn on_hit(&mut self, damage: u32) -> Option<ItemStack> {
        if self.destroyed || self.health == 0 {
            return None;
        }
        self.health = self.health.saturating_sub(damage);
        if self.health > 0 {
            return None;
        }

        debug!(id = self.id.as_str(), "Resource destroyed");
        self.destroy();
        Some(self.drop.clone())
    }

    /// Advances the respawn countdown
    pub fn update(&mut self, dt: f32) {
        let Some(remaining) = self.respawn_remaining.as_mut() else {
            return;
        };
        *remaining -= dt;
        if *remaining <= 0.0 {
            self.respawn();
        }
    }

    fn destroy(&mut self) {
        self.destroyed = true;
        self.active = false;
        self.respawn_remaining = self.respawn_secs;
    }

    fn respawn(&mut self) {
        debug!(id = self.id.as_str(), "Resource respawned");
        self.health = self.max_health;
        self.destroyed = false;
        self.respawn_remaining = None;
        self.active = true;
    }
}

impl Saveable for MineableResource {
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
        Snapshot::Resource(ResourceSnapshot {
            health: self.health,
            destroyed: self.destroyed,
            position: self.position,
        })
    }

    fn restore(&mut self, snapshot: &Snapshot) -> Result<(), SaveError> {
        let Snapshot::Resource(saved) = snapshot else {
            return Err(SaveError::mismatch(self.id(), "resource", snapshot));
        };

        self.position = saved.position;
        // A node with no health left can never be hit again, so treat it as mined
        if saved.destroyed || saved.health == 0 {
            self.health = 0;
            self.destroy();
        } else {
            self.health = saved.health.min(self.max_health);
            self.destroyed = false;
            self.respawn_remaining = None;
            self.active = true;
        }
        Ok(())
    }
}
