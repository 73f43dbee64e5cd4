//! Modifier providers - components contributing stat adjustments

use crate::types::Stat;
use serde::{Deserialize, Serialize};

/// How a modifier combines with a base stat value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModifierKind {
    /// Added to the base value before percentage scaling
    Additive,
    /// Percent of the additive total (e.g. `10.0` = +10%)
    Percentage,
}

/// A single stat adjustment carried by an item or effect
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StatModifier {
    pub stat: Stat,
    pub value: f64,
    pub kind: ModifierKind,
}

/// Capability interface for anything attached to a combatant that adjusts
/// its stats.
///
/// The aggregator queries every attached provider on each lookup; providers
/// with no matching entries contribute zero. Results are never cached across
/// modifier-set changes.
pub trait ModifierProvider {
    /// Additive deltas this provider contributes for a stat
    fn additive_modifiers(&self, stat: Stat) -> Vec<f64>;

    /// Percentage deltas this provider contributes for a stat
    fn percentage_modifiers(&self, stat: Stat) -> Vec<f64>;
}

/// A piece of equipped gear carrying stat modifiers
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EquippedItem {
    pub id: String,
    pub name: String,
    modifiers: Vec<StatModifier>,
}

impl EquippedItem {
    /// Create a new item with no modifiers
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        EquippedItem {
            id: id.into(),
            name: name.into(),
            modifiers: Vec::new(),
        }
    }

    /// Add a modifier to this item
    pub fn with_modifier(mut self, stat: Stat, value: f64, kind: ModifierKind) -> Self {
        self.modifiers.push(StatModifier { stat, value, kind });
        self
    }

    /// All modifiers on this item
    pub fn modifiers(&self) -> &[StatModifier] {
        &self.modifiers
    }
}

impl ModifierProvider for EquippedItem {
    fn additive_modifiers(&self, stat: Stat) -> Vec<f64> {
        self.modifiers
            .iter()
            .filter(|m| m.stat == stat && m.kind == ModifierKind::Additive)
            .map(|m| m.value)
            .collect()
    }

    fn percentage_modifiers(&self, stat: Stat) -> Vec<f64> {
        self.modifiers
            .iter()
            .filter(|m| m.stat == stat && m.kind == ModifierKind::Percentage)
            .map(|m| m.value)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_modifiers_filter_by_stat_and_kind() {
        let item = EquippedItem::new("ring_of_might", "Ring of Might")
            .with_modifier(Stat::Damage, 5.0, ModifierKind::Additive)
            .with_modifier(Stat::Damage, 10.0, ModifierKind::Percentage)
            .with_modifier(Stat::Health, 20.0, ModifierKind::Additive);

        assert_eq!(item.additive_modifiers(Stat::Damage), vec![5.0]);
        assert_eq!(item.percentage_modifiers(Stat::Damage), vec![10.0]);
        assert_eq!(item.additive_modifiers(Stat::Health), vec![20.0]);
        assert!(item.percentage_modifiers(Stat::Health).is_empty());
        assert!(item.additive_modifiers(Stat::Defense).is_empty());
    }
}
