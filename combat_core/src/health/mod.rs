//! Vitality tracker - hit points, damage, death detection and healing

mod heal;

pub use heal::{ActiveHeal, HealMode};

use serde::{Deserialize, Serialize};

/// Outcome of applying one damage instance
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DamageOutcome {
    /// Hit points actually removed (clamped at zero)
    pub applied: f64,
    pub points_before: f64,
    pub points_after: f64,
    /// True only for the single Alive -> Dead transition
    pub is_killing_blow: bool,
}

/// State transition caused by an external restore
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VitalityTransition {
    None,
    /// Restore set the points to zero on a living combatant
    Died,
    /// Restore raised the points above zero on a dead combatant; the only
    /// dead -> alive path
    Revived,
}

/// Current hit points and the dead/alive state machine.
///
/// Hit points are seeded lazily: `force_init` runs during the deterministic
/// init pass before the first tick, and any mutation arriving earlier seeds
/// the value itself. Max health lives in the stat aggregator, so operations
/// that need it take the computed value as a parameter; the owner resolves
/// instigators and death side effects, keeping this type single-combatant.
///
/// The dead state is terminal: `take_damage` reports the transition exactly
/// once, healing a dead combatant is a no-op, and only `restore_state` can
/// bring the points back above zero.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Health {
    points: f64,
    initialized: bool,
    was_dead: bool,
    #[serde(default)]
    active_heals: Vec<ActiveHeal>,
}

impl Health {
    /// Create an uninitialized tracker
    pub fn new() -> Self {
        Health::default()
    }

    /// Seed the hit points from the aggregator's max health if not yet done
    pub fn force_init(&mut self, max_health: f64) {
        if !self.initialized {
            self.points = max_health;
            self.initialized = true;
        }
    }

    /// Whether the initial value has been seeded
    pub fn initialized(&self) -> bool {
        self.initialized
    }

    /// Current hit points
    pub fn points(&self) -> f64 {
        self.points
    }

    pub fn is_dead(&self) -> bool {
        self.initialized && self.points <= 0.0
    }

    /// Ratio of current to max hit points.
    ///
    /// Callers must guard `max_health == 0`.
    pub fn fraction(&self, max_health: f64) -> f64 {
        self.points / max_health
    }

    /// `fraction` scaled to 0-100
    pub fn percentage(&self, max_health: f64) -> f64 {
        100.0 * self.fraction(max_health)
    }

    /// Apply one damage instance, clamping at zero.
    ///
    /// `is_killing_blow` is set only for the first Alive -> Dead transition;
    /// further damage on a corpse reports zero effect. Negative amounts are
    /// a caller contract violation.
    pub fn take_damage(&mut self, amount: f64, max_health: f64) -> DamageOutcome {
        debug_assert!(amount >= 0.0, "damage must be non-negative");
        self.force_init(max_health);

        let points_before = self.points;
        self.points = (self.points - amount).max(0.0);

        let is_killing_blow = !self.was_dead && self.points <= 0.0;
        if is_killing_blow {
            self.was_dead = true;
            // Corpses do not keep regenerating
            self.active_heals.clear();
        }

        DamageOutcome {
            applied: points_before - self.points,
            points_before,
            points_after: self.points,
            is_killing_blow,
        }
    }

    /// Restore hit points, clamped to max health.
    ///
    /// Immediate heals land now; the over-time modes enqueue a state machine
    /// advanced by [`tick`](Health::tick). Healing a dead combatant is a
    /// no-op: death is only reversed by `restore_state`.
    pub fn heal(&mut self, amount: f64, mode: HealMode, max_health: f64) {
        debug_assert!(amount >= 0.0, "heal amount must be non-negative");
        self.force_init(max_health);
        if self.is_dead() {
            return;
        }

        match mode {
            HealMode::Immediate => {
                self.points = (self.points + amount).min(max_health);
            }
            HealMode::Ticking {
                duration,
                tick_interval,
            } => {
                self.active_heals
                    .push(ActiveHeal::ticking(amount, duration, tick_interval));
            }
            HealMode::Smooth { duration } => {
                self.active_heals.push(ActiveHeal::smooth(amount, duration));
            }
        }
    }

    /// Advance over-time heals by `dt` seconds
    pub fn tick(&mut self, dt: f64, max_health: f64) {
        if self.active_heals.is_empty() {
            return;
        }
        if self.is_dead() {
            self.active_heals.clear();
            return;
        }

        let mut healed = 0.0;
        for heal in &mut self.active_heals {
            healed += heal.tick(dt);
        }
        self.active_heals.retain(|h| !h.finished());

        self.points = (self.points + healed).min(max_health);
    }

    /// Number of heals still in flight
    pub fn active_heal_count(&self) -> usize {
        self.active_heals.len()
    }

    /// Cancel all heals in flight
    pub fn cancel_heals(&mut self) {
        self.active_heals.clear();
    }

    /// On level-up, current points rise to at least `percent` of the new
    /// maximum (never lowered)
    pub fn regenerate(&mut self, max_health: f64, percent: f64) {
        self.force_init(max_health);
        let floor = max_health * (percent / 100.0);
        self.points = self.points.max(floor);
    }

    /// Persistence scalar: the current hit points
    pub fn capture_state(&self) -> f64 {
        self.points
    }

    /// Restore the persistence scalar, reporting any dead/alive transition
    /// so the owner can run the matching side effects
    pub fn restore_state(&mut self, points: f64) -> VitalityTransition {
        let was_dead = self.was_dead;
        self.points = points.max(0.0);
        self.initialized = true;
        self.was_dead = self.points <= 0.0;
        self.active_heals.clear();

        match (was_dead, self.was_dead) {
            (false, true) => VitalityTransition::Died,
            (true, false) => VitalityTransition::Revived,
            _ => VitalityTransition::None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MAX: f64 = 100.0;

    fn make_health() -> Health {
        let mut health = Health::new();
        health.force_init(MAX);
        health
    }

    #[test]
    fn test_damage_clamps_at_zero() {
        let mut health = make_health();
        let outcome = health.take_damage(250.0, MAX);

        assert!((outcome.points_after).abs() < f64::EPSILON);
        assert!((outcome.applied - 100.0).abs() < f64::EPSILON);
        assert!(outcome.is_killing_blow);
    }

    #[test]
    fn test_death_transition_fires_exactly_once() {
        let mut health = make_health();

        assert!(!health.take_damage(30.0, MAX).is_killing_blow);
        assert!(!health.take_damage(30.0, MAX).is_killing_blow);
        assert!((health.points() - 40.0).abs() < f64::EPSILON);
        assert!(!health.is_dead());

        let lethal = health.take_damage(40.0, MAX);
        assert!(lethal.is_killing_blow);
        assert!(health.is_dead());

        // Further damage leaves the corpse untouched and silent
        let after = health.take_damage(10.0, MAX);
        assert!(!after.is_killing_blow);
        assert!((after.applied).abs() < f64::EPSILON);
        assert!((health.points()).abs() < f64::EPSILON);
    }

    #[test]
    fn test_lazy_init_on_first_mutation() {
        let mut health = Health::new();
        assert!(!health.initialized());

        let outcome = health.take_damage(30.0, MAX);
        assert!(health.initialized());
        assert!((outcome.points_after - 70.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_immediate_heal_clamps_to_max() {
        let mut health = make_health();
        health.take_damage(10.0, MAX);
        health.heal(50.0, HealMode::Immediate, MAX);

        assert!((health.points() - MAX).abs() < f64::EPSILON);
    }

    #[test]
    fn test_ticking_heal_over_time() {
        let mut health = make_health();
        health.take_damage(60.0, MAX);
        health.heal(
            40.0,
            HealMode::Ticking {
                duration: 4.0,
                tick_interval: 1.0,
            },
            MAX,
        );
        assert_eq!(health.active_heal_count(), 1);

        health.tick(1.0, MAX);
        assert!((health.points() - 50.0).abs() < 1e-9);

        for _ in 0..3 {
            health.tick(1.0, MAX);
        }
        assert!((health.points() - 80.0).abs() < 1e-9);
        assert_eq!(health.active_heal_count(), 0);
    }

    #[test]
    fn test_smooth_heal_never_exceeds_max() {
        let mut health = make_health();
        health.take_damage(20.0, MAX);
        health.heal(50.0, HealMode::Smooth { duration: 2.0 }, MAX);

        for _ in 0..40 {
            health.tick(0.1, MAX);
            assert!(health.points() <= MAX + 1e-9);
        }
        assert!((health.points() - MAX).abs() < 1e-9);
    }

    #[test]
    fn test_heal_while_dead_is_rejected() {
        let mut health = make_health();
        health.take_damage(200.0, MAX);
        assert!(health.is_dead());

        health.heal(50.0, HealMode::Immediate, MAX);
        assert!((health.points()).abs() < f64::EPSILON);
        assert!(health.is_dead());
    }

    #[test]
    fn test_death_stops_heals_in_flight() {
        let mut health = make_health();
        health.take_damage(50.0, MAX);
        health.heal(
            30.0,
            HealMode::Ticking {
                duration: 3.0,
                tick_interval: 1.0,
            },
            MAX,
        );

        health.take_damage(100.0, MAX);
        assert_eq!(health.active_heal_count(), 0);

        health.tick(5.0, MAX);
        assert!((health.points()).abs() < f64::EPSILON);
    }

    #[test]
    fn test_cancel_stops_heals_in_flight() {
        let mut health = make_health();
        health.take_damage(50.0, MAX);
        health.heal(
            30.0,
            HealMode::Ticking {
                duration: 3.0,
                tick_interval: 1.0,
            },
            MAX,
        );
        assert_eq!(health.active_heal_count(), 1);

        health.cancel_heals();
        health.tick(5.0, MAX);
        assert!((health.points() - 50.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_restore_state_revives() {
        let mut health = make_health();
        health.take_damage(200.0, MAX);
        assert!(health.is_dead());

        let transition = health.restore_state(75.0);
        assert_eq!(transition, VitalityTransition::Revived);
        assert!(!health.is_dead());
        assert!((health.points() - 75.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_restore_state_can_kill() {
        let mut health = make_health();
        let transition = health.restore_state(0.0);
        assert_eq!(transition, VitalityTransition::Died);
        assert!(health.is_dead());

        // A second zero restore is not a new transition
        assert_eq!(health.restore_state(0.0), VitalityTransition::None);
    }

    #[test]
    fn test_fraction() {
        let mut health = make_health();
        health.take_damage(25.0, MAX);
        assert!((health.fraction(MAX) - 0.75).abs() < f64::EPSILON);
        assert!((health.percentage(MAX) - 75.0).abs() < f64::EPSILON);
    }
}
