//! Weapon configuration loading

use super::ConfigError;
use crate::combat::WeaponConfig;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// Container for weapon configurations
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeaponsConfig {
    #[serde(rename = "weapons")]
    pub weapons: Vec<WeaponConfig>,
}

/// Load weapon configurations from a TOML file
pub fn load_weapon_configs(path: &Path) -> Result<HashMap<String, WeaponConfig>, ConfigError> {
    let config: WeaponsConfig = super::load_toml(path)?;

    let mut map = HashMap::new();
    for weapon in config.weapons {
        map.insert(weapon.id.clone(), weapon);
    }

    Ok(map)
}

/// Load weapon configurations from a TOML string
pub fn parse_weapon_configs(content: &str) -> Result<HashMap<String, WeaponConfig>, ConfigError> {
    let config: WeaponsConfig = super::parse_toml(content)?;

    let mut map = HashMap::new();
    for weapon in config.weapons {
        map.insert(weapon.id.clone(), weapon);
    }

    Ok(map)
}

/// Get the default weapon configurations
pub fn default_weapons() -> HashMap<String, WeaponConfig> {
    let toml = include_str!("../../config/weapons.toml");
    parse_weapon_configs(toml).unwrap_or_else(|_| {
        let mut map = HashMap::new();
        map.insert("unarmed".to_string(), WeaponConfig::unarmed());
        map
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_weapons() {
        let toml = r#"
[[weapons]]
id = "longbow"
name = "Longbow"
range = 10.0
time_between_attacks = 1.5
damage_bonus = 6.0
has_projectile = true
"#;

        let weapons = parse_weapon_configs(toml).unwrap();
        let bow = &weapons["longbow"];
        assert!((bow.range - 10.0).abs() < f64::EPSILON);
        assert!(bow.has_projectile);
        assert!((bow.percentage_bonus).abs() < f64::EPSILON);
    }

    #[test]
    fn test_default_weapons_load() {
        let weapons = default_weapons();
        assert!(weapons.contains_key("unarmed"));

        for expected in ["unarmed", "sword", "longbow", "fireball_staff"] {
            assert!(weapons.contains_key(expected), "Missing weapon: {}", expected);
        }
    }
}
