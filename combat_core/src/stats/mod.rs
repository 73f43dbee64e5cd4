//! Stat aggregation - experience, level and modifier composition

mod base_stats;
mod experience;
mod modifier;

pub use base_stats::BaseStats;
pub use experience::Experience;
pub use modifier::{EquippedItem, ModifierKind, ModifierProvider, StatModifier};

pub use crate::types::Stat;
