//! combat_core - Real-time combat and character progression for action RPG
//! entities
//!
//! This library provides:
//! - Progression: pure per-class, per-level stat and experience tables
//! - Experience + BaseStats: leveling and modifier-aware stat aggregation
//! - Health: hit points, damage, death detection and over-time healing
//! - Fighter: target acquisition, attack cooldowns and hit resolution
//! - World: the fixed-rate tick loop coordinating all of the above
//!
//! Animation playback, movement and visual effects are external
//! collaborators reached through the traits in [`interfaces`].

pub mod combat;
pub mod config;
pub mod events;
pub mod health;
pub mod interfaces;
pub mod progression;
pub mod scheduler;
pub mod stats;
pub mod types;
pub mod world;

// Re-export core types for convenience
pub use combat::{resolve_hit_damage, Fighter, FighterDecision, WeaponConfig};
pub use config::{
    default_constants, default_progression, default_weapons, CombatConstants, ConfigError,
};
pub use events::{CombatEvent, CombatListener};
pub use health::{DamageOutcome, HealMode, Health};
pub use progression::Progression;
pub use scheduler::{ActionKind, ActionScheduler};
pub use stats::{BaseStats, EquippedItem, Experience, ModifierKind, ModifierProvider, StatModifier};
pub use types::{CharacterClass, CombatantId, CombatantTag, Stat, Vec2};
pub use world::{Combatant, CombatantSpec, World};
