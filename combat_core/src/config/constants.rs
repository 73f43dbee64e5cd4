//! Tunable combat constants

use super::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Tunable constants for targeting and vitality behaviour
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CombatConstants {
    #[serde(default)]
    pub targeting: TargetingConstants,
    #[serde(default)]
    pub vitality: VitalityConstants,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TargetingConstants {
    /// Radius scanned when acquiring a replacement target
    #[serde(default = "default_auto_attack_range")]
    pub auto_attack_range: f64,
    /// Stopping distance passed to the mover when closing on a target
    #[serde(default = "default_stopping_distance")]
    pub stopping_distance: f64,
}

impl Default for TargetingConstants {
    fn default() -> Self {
        TargetingConstants {
            auto_attack_range: 4.0,
            stopping_distance: 1.0,
        }
    }
}

fn default_auto_attack_range() -> f64 {
    4.0
}
fn default_stopping_distance() -> f64 {
    1.0
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VitalityConstants {
    /// On level-up, current hit points rise to at least this percent of the new maximum
    #[serde(default = "default_level_up_health_percent")]
    pub level_up_health_percent: f64,
    /// Death animation triggers, one picked uniformly at random per death.
    /// An empty set falls back to the "die" trigger.
    #[serde(default)]
    pub death_animation_triggers: Vec<String>,
}

impl Default for VitalityConstants {
    fn default() -> Self {
        VitalityConstants {
            level_up_health_percent: 90.0,
            death_animation_triggers: Vec::new(),
        }
    }
}

fn default_level_up_health_percent() -> f64 {
    90.0
}

/// Load combat constants from a TOML file
pub fn load_constants(path: &Path) -> Result<CombatConstants, ConfigError> {
    super::load_toml(path)
}

/// Get the default combat constants shipped with the crate
pub fn default_constants() -> CombatConstants {
    let toml = include_str!("../../config/constants.toml");
    super::parse_toml(toml).unwrap_or_default()
}
