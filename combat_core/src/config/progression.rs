//! Progression table loading

use super::ConfigError;
use crate::progression::Progression;
use crate::types::{CharacterClass, Stat};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Container for progression table configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressionConfig {
    #[serde(rename = "classes")]
    pub classes: Vec<ClassProgression>,
}

/// Per-class stat series
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassProgression {
    pub class: CharacterClass,
    pub stats: Vec<StatLevels>,
}

/// Per-level values for one stat
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatLevels {
    pub stat: Stat,
    pub levels: Vec<f64>,
}

impl From<ProgressionConfig> for Progression {
    fn from(config: ProgressionConfig) -> Self {
        let mut progression = Progression::new();
        for class_entry in config.classes {
            for stat_entry in class_entry.stats {
                progression.insert(class_entry.class, stat_entry.stat, stat_entry.levels);
            }
        }
        progression
    }
}

/// Load a progression table from a TOML file
pub fn load_progression(path: &Path) -> Result<Progression, ConfigError> {
    let config: ProgressionConfig = super::load_toml(path)?;
    Ok(config.into())
}

/// Load a progression table from a TOML string
pub fn parse_progression(content: &str) -> Result<Progression, ConfigError> {
    let config: ProgressionConfig = super::parse_toml(content)?;
    Ok(config.into())
}

/// Get the default progression table shipped with the crate
pub fn default_progression() -> Progression {
    let toml = include_str!("../../config/progression.toml");
    parse_progression(toml).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_progression() {
        let toml = r#"
[[classes]]
class = "player"

[[classes.stats]]
stat = "health"
levels = [100.0, 120.0, 140.0]

[[classes.stats]]
stat = "experience_to_level_up"
levels = [100.0, 250.0]
"#;

        let progression = parse_progression(toml).unwrap();
        assert!((progression.stat(Stat::Health, CharacterClass::Player, 2) - 120.0).abs() < f64::EPSILON);
        assert_eq!(progression.level_count(Stat::ExperienceToLevelUp, CharacterClass::Player), 2);
    }

    #[test]
    fn test_default_progression_covers_all_classes() {
        let progression = default_progression();

        for class in CharacterClass::all() {
            assert!(
                progression.level_count(Stat::Health, *class) > 0,
                "missing health series for {:?}",
                class
            );
        }

        // The player must be able to level
        assert!(progression.level_count(Stat::ExperienceToLevelUp, CharacterClass::Player) > 0);
    }
}
