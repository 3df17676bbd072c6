use crate::save::{SaveError, Saveable, Snapshot, UniqueId};
use crate::stats::{Health, Stamina};
use glam::Vec3;
use serde::{Deserialize, Serialize};
use tracing::info;

/// Fixed save identifier of the player
pub const PLAYER_ID: &str = "player";

pub const MAX_HEALTH: f32 = 10.0;
pub const MAX_STAMINA: f32 = 100.0;

const STAMINA_REGEN_PER_SEC: f32 = 15.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerSnapshot {
    pub current_health: f32,
    pub current_stamina: f32,
    pub position: Vec3,
}

/// The player character's vitals and location
pub struct Player {
    id: UniqueId,
    active: bool,
    pub position: Vec3,
    health: Health,
    stamina: Stamina,
}

impl Player {
    pub fn new(position: Vec3) -> Self {
        Player {
            id: UniqueId::fixed(PLAYER_ID),
            active: true,
            position,
            health: Health::new(MAX_HEALTH),
            stamina: Stamina::new(MAX_STAMINA),
        }
    }

    pub fn health(&self) -> &Health {
        &self.health
    }

    pub fn stamina(&self) -> &Stamina {
        &self.stamina
    }

    pub fn is_alive(&self) -> bool {
        self.health.is_alive()
    }

    /// Applies damage; a fatal hit deactivates the player
    pub fn take_damage(&mut self, amount: f32) {
        let result = self.health.take_damage(amount);
        if result.is_fatal {
            info!("Player died");
            self.active = false;
        }
    }

    /// Spends stamina for an action such as a roll
    pub fn try_spend_stamina(&mut self, amount: f32) -> bool {
        self.stamina.spend(amount)
    }

    pub fn teleport_to(&mut self, position: Vec3) {
        self.position = position;
    }

    pub fn update(&mut self, dt: f32) {
        if self.is_alive() {
            self.stamina.recover(STAMINA_REGEN_PER_SEC * dt);
        }
    }
}

impl Saveable for Player {
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
        Snapshot::Player(PlayerSnapshot {
            current_health: self.health.current(),
            current_stamina: self.stamina.current(),
            position: self.position,
        })
    }

    fn restore(&mut self, snapshot: &Snapshot) -> Result<(), SaveError> {
        let Snapshot::Player(saved) = snapshot else {
            return Err(SaveError::mismatch(self.id(), "player", snapshot));
        };

        self.health.set_current(saved.current_health);
        self.stamina.set_current(saved.current_stamina);
        self.teleport_to(saved.position);
        self.active = self.health.is_alive();
        Ok(())
    }
}
