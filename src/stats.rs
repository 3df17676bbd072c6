//! Vital meters shared by the player, creatures and other living things
//!
//! Both meters are f32 and clamp to `0..=max`, so fractional damage and
//! per-second regeneration need no rounding. Setters used by `restore`
//! clamp too, which keeps a hand-edited save from producing 500/10 health.

/// Hit points
///
/// # Example
///
/// ```rust
/// use savestate::stats::Health;
///
/// let mut health = Health::new(10.0);
/// let hit = health.take_damage(4.0);
/// assert!(!hit.is_fatal);
/// assert_eq!(health.current(), 6.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Health {
    current: f32,
    max: f32,
}

impl Health {
    /// Starts full
    pub fn new(max: f32) -> Self {
        Health { current: max, max }
    }

    pub fn current(&self) -> f32 {
        self.current
    }

    pub fn max(&self) -> f32 {
        self.max
    }

    /// Fraction of max remaining, 0.0 for a zero-max meter
    pub fn fraction(&self) -> f32 {
        if self.max > 0.0 {
            self.current / self.max
        } else {
            0.0
        }
    }

    pub fn is_alive(&self) -> bool {
        self.current > 0.0
    }

    /// Subtracts `amount`, never going below zero
    pub fn take_damage(&mut self, amount: f32) -> DamageResult {
        let amount = amount.max(0.0);
        let damage_dealt = amount.min(self.current);
        self.current -= damage_dealt;

        DamageResult {
            damage_dealt,
            is_fatal: !self.is_alive(),
            overkill: amount - damage_dealt,
        }
    }

    /// Adds `amount` up to max and returns the amount that actually applied
    pub fn heal(&mut self, amount: f32) -> f32 {
        let healed = amount.max(0.0).min(self.max - self.current);
        self.current += healed;
        healed
    }

    pub fn set_current(&mut self, value: f32) {
        self.current = value.clamp(0.0, self.max);
    }

    pub fn refill(&mut self) {
        self.current = self.max;
    }
}

/// What a single hit did
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DamageResult {
    pub damage_dealt: f32,
    pub is_fatal: bool,
    /// Damage beyond what was left
    pub overkill: f32,
}

/// Spent by running and rolling, recovered over time
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stamina {
    current: f32,
    max: f32,
}

impl Stamina {
    pub fn new(max: f32) -> Self {
        Stamina { current: max, max }
    }

    pub fn current(&self) -> f32 {
        self.current
    }

    /// All-or-nothing: fails without spending if there is not enough
    pub fn spend(&mut self, amount: f32) -> bool {
        if amount > self.current {
            return false;
        }
        self.current -= amount;
        true
    }

    pub fn recover(&mut self, amount: f32) {
        self.current = (self.current + amount.max(0.0)).min(self.max);
    }

    pub fn set_current(&mut self, value: f32) {
        self.current = value.clamp(0.0, self.max);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_hit() {
        let mut health = Health::new(10.0);
        let hit = health.take_damage(2.5);

        assert_eq!(hit.damage_dealt, 2.5);
        assert_eq!(hit.overkill, 0.0);
        assert!(!hit.is_fatal);
        assert_eq!(health.fraction(), 0.75);
    }

    #[test]
    fn test_killing_blow_reports_overkill() {
        let mut health = Health::new(10.0);
        let hit = health.take_damage(14.0);

        assert_eq!(hit.damage_dealt, 10.0);
        assert_eq!(hit.overkill, 4.0);
        assert!(hit.is_fatal);
        assert!(!health.is_alive());
    }

    #[test]
    fn test_heal_stops_at_max() {
        let mut health = Health::new(10.0);
        health.take_damage(3.0);

        assert_eq!(health.heal(8.0), 3.0);
        assert_eq!(health.current(), health.max());
    }

    #[test]
    fn test_set_current_clamps() {
        let mut health = Health::new(10.0);
        health.set_current(25.0);
        assert_eq!(health.current(), 10.0);
        health.set_current(-3.0);
        assert!(!health.is_alive());
    }

    #[test]
    fn test_stamina_spend_is_all_or_nothing() {
        let mut stamina = Stamina::new(100.0);
        assert!(stamina.spend(60.0));
        assert!(!stamina.spend(60.0));
        assert_eq!(stamina.current(), 40.0);
        stamina.recover(500.0);
        assert_eq!(stamina.current(), 100.0);
    }
}
