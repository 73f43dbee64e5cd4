//! Core types shared across the combat and progression modules

use serde::{Deserialize, Serialize};

/// Unique identifier for a combatant within a [`World`](crate::world::World)
///
/// Identity is stable for the combatant's lifetime; death changes its state
/// but never recycles the id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CombatantId(pub u32);

impl std::fmt::Display for CombatantId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Character class used for progression table lookups
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CharacterClass {
    Player,
    Grunt,
    Archer,
    Mage,
}

impl CharacterClass {
    /// Get all character classes
    pub fn all() -> &'static [CharacterClass] {
        &[
            CharacterClass::Player,
            CharacterClass::Grunt,
            CharacterClass::Archer,
            CharacterClass::Mage,
        ]
    }
}

/// Named stats resolved through the progression table and modifier providers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stat {
    /// Maximum hit points
    Health,
    /// Base damage dealt per hit, before mitigation
    Damage,
    /// Incoming-damage mitigation rating
    Defense,
    /// Experience awarded to the killer when this entity dies
    ExperienceReward,
    /// Cumulative experience needed to advance past a level
    ExperienceToLevelUp,
}

impl Stat {
    /// Get all stats
    pub fn all() -> &'static [Stat] {
        &[
            Stat::Health,
            Stat::Damage,
            Stat::Defense,
            Stat::ExperienceReward,
            Stat::ExperienceToLevelUp,
        ]
    }
}

/// Distinguishes the player-controlled combatant from AI-driven ones
///
/// Player combatants keep their physical colliders after death and are never
/// valid targets for other players.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CombatantTag {
    Player,
    Npc,
}

/// 2D position in world units
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f64,
    pub y: f64,
}

impl Vec2 {
    /// Create a new position
    pub fn new(x: f64, y: f64) -> Self {
        Vec2 { x, y }
    }

    /// Euclidean distance to another position
    pub fn distance(self, other: Vec2) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Position moved `step` units toward `dest`, never overshooting
    pub fn step_toward(self, dest: Vec2, step: f64) -> Vec2 {
        let dist = self.distance(dest);
        if dist <= step || dist == 0.0 {
            return dest;
        }
        let t = step / dist;
        Vec2 {
            x: self.x + (dest.x - self.x) * t,
            y: self.y + (dest.y - self.y) * t,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distance() {
        let a = Vec2::new(0.0, 0.0);
        let b = Vec2::new(3.0, 4.0);
        assert!((a.distance(b) - 5.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_step_toward_does_not_overshoot() {
        let a = Vec2::new(0.0, 0.0);
        let b = Vec2::new(10.0, 0.0);

        let moved = a.step_toward(b, 4.0);
        assert!((moved.x - 4.0).abs() < f64::EPSILON);

        let arrived = a.step_toward(b, 25.0);
        assert!((arrived.x - 10.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_stat_all_is_complete() {
        assert_eq!(Stat::all().len(), 5);
    }
}
