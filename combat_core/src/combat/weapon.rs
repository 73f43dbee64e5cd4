//! Weapon configuration

use crate::stats::{ModifierProvider, Stat};
use serde::{Deserialize, Serialize};

/// Configuration for an equippable weapon.
///
/// A weapon is itself a modifier provider: its flat and percentage bonuses
/// feed the wielder's `Damage` stat through the normal aggregation path.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeaponConfig {
    pub id: String,
    pub name: String,
    /// Maximum distance at which attacks connect
    pub range: f64,
    /// Attack cooldown in seconds
    pub time_between_attacks: f64,
    /// Flat bonus added to the wielder's damage stat
    #[serde(default)]
    pub damage_bonus: f64,
    /// Percentage bonus added to the wielder's damage stat
    #[serde(default)]
    pub percentage_bonus: f64,
    /// Whether hits launch a projectile instead of applying damage directly
    #[serde(default)]
    pub has_projectile: bool,
}

impl WeaponConfig {
    /// Bare fists, the fallback when nothing is equipped
    pub fn unarmed() -> Self {
        WeaponConfig {
            id: "unarmed".to_string(),
            name: "Unarmed".to_string(),
            range: 2.0,
            time_between_attacks: 1.0,
            damage_bonus: 0.0,
            percentage_bonus: 0.0,
            has_projectile: false,
        }
    }
}

impl Default for WeaponConfig {
    fn default() -> Self {
        WeaponConfig::unarmed()
    }
}

impl ModifierProvider for WeaponConfig {
    fn additive_modifiers(&self, stat: Stat) -> Vec<f64> {
        if stat == Stat::Damage && self.damage_bonus != 0.0 {
            vec![self.damage_bonus]
        } else {
            Vec::new()
        }
    }

    fn percentage_modifiers(&self, stat: Stat) -> Vec<f64> {
        if stat == Stat::Damage && self.percentage_bonus != 0.0 {
            vec![self.percentage_bonus]
        } else {
            Vec::new()
        }
    }
}
