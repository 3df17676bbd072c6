use crate::save::{SaveError, Saveable, Snapshot, UniqueId};
use crate::stats::Health;
use glam::Vec3;
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq)]
enum CreatureBehavior {
    Idle,
    Jumping,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreatureSnapshot {
    pub position: Vec3,
    pub is_dead: bool,
}

/// A hostile creature that idles and hops in place
///
/// Dead creatures stay in the world deactivated so a save can record them.
pub struct Creature {
    id: UniqueId,
    active: bool,
    /// Ground position; the hop only offsets `height`
    pub position: Vec3,
    pub height: f32,
    health: Health,
    behavior: CreatureBehavior,
    behavior_timer: f32,
    jump_height: f32,
    jump_duration: f32,
}

impl Creature {
    pub fn new(id: UniqueId, position: Vec3, max_health: f32) -> Self {
        Creature {
            id,
            active: true,
            position,
            height: 0.0,
            health: Health::new(max_health),
            behavior: CreatureBehavior::Idle,
            behavior_timer: 0.0,
            jump_height: 0.4,
            jump_duration: 0.5,
        }
    }

    pub fn is_dead(&self) -> bool {
        !self.health.is_alive()
    }

    pub fn health(&self) -> &Health {
        &self.health
    }

    pub fn take_damage(&mut self, amount: f32) {
        if self.is_dead() {
            return;
        }
        if self.health.take_damage(amount).is_fatal {
            debug!(id = self.id.as_str(), "Creature died");
            self.active = false;
        }
    }

    pub fn update(&mut self, dt: f32) {
        if !self.active {
            return;
        }
        self.behavior_timer += dt;

        match self.behavior {
            CreatureBehavior::Idle => {
                // Idle for 2 seconds, then switch to jumping
                if self.behavior_timer >= 2.0 {
                    self.behavior = CreatureBehavior::Jumping;
                    self.behavior_timer = 0.0;
                }
                self.height = 0.0;
            }
            CreatureBehavior::Jumping => {
                if self.behavior_timer >= self.jump_duration {
                    self.behavior = CreatureBehavior::Idle;
                    self.behavior_timer = 0.0;
                    self.height = 0.0;
                } else {
                    let progress =
                        (self.behavior_timer * std::f32::consts::PI / self.jump_duration).sin();
                    self.height = progress * self.jump_height;
                }
            }
        }
    }

    fn warp(&mut self, position: Vec3) {
        self.position = position;
        self.height = 0.0;
        self.behavior = CreatureBehavior::Idle;
        self.behavior_timer = 0.0;
    }
}

impl Saveable for Creature {
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
        Snapshot::Creature(CreatureSnapshot {
            position: self.position,
            is_dead: self.is_dead(),
        })
    }

    fn restore(&mut self, snapshot: &Snapshot) -> Result<(), SaveError> {
        let Snapshot::Creature(saved) = snapshot else {
            return Err(SaveError::mismatch(self.id(), "creature", snapshot));
        };

        if saved.is_dead {
            self.health.set_current(0.0);
            self.active = false;
        } else {
            if !self.health.is_alive() {
                self.health.refill();
            }
            self.warp(saved.position);
            self.active = true;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slime() -> Creature {
        Creature::new(UniqueId::authored("slime-1"), Vec3::new(4.0, 1.0, 0.0), 3.0)
    }

    #[test]
    fn test_hop_cycle() {
        let mut creature = slime();
        creature.update(2.0);
        creature.update(0.25);
        assert!(creature.height > 0.0);
        creature.update(0.3);
        assert_eq!(creature.height, 0.0);
    }

    #[test]
    fn test_restore_dead_creature_deactivates() {
        let mut creature = slime();
        let saved = Snapshot::Creature(CreatureSnapshot {
            position: Vec3::ZERO,
            is_dead: true,
        });

        creature.restore(&saved).unwrap();
        assert!(creature.is_dead());
        assert!(!creature.is_active());
    }

    #[test]
    fn test_restore_alive_creature_warps_and_revives() {
        let mut creature = slime();
        let snapshot = creature.capture();

        creature.take_damage(10.0);
        creature.position = Vec3::ZERO;
        assert!(!creature.is_active());

        creature.restore(&snapshot).unwrap();
        assert!(creature.is_active());
        assert!(!creature.is_dead());
        assert_eq!(creature.position, Vec3::new(4.0, 1.0, 0.0));
    }
}
