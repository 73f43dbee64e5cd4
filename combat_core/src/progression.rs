//! Progression table - per-class, per-level stat baselines

use crate::types::{CharacterClass, Stat};
use std::collections::HashMap;

/// Static lookup of stat baselines and experience thresholds.
///
/// A pure function of its inputs with no mutable state. Missing entries and
/// out-of-range levels fall back to `0.0` rather than erroring.
///
/// The `ExperienceToLevelUp` series is cumulative: entry for level `L` is the
/// total experience needed to advance past `L`. A series with `n` entries
/// therefore supports levels `1..=n + 1`.
#[derive(Debug, Clone, Default)]
pub struct Progression {
    tables: HashMap<(CharacterClass, Stat), Vec<f64>>,
}

impl Progression {
    /// Create an empty progression table
    pub fn new() -> Self {
        Progression::default()
    }

    /// Insert the per-level series for a class/stat pair, replacing any
    /// previous series
    pub fn insert(&mut self, class: CharacterClass, stat: Stat, levels: Vec<f64>) {
        self.tables.insert((class, stat), levels);
    }

    /// Look up a stat baseline at a 1-based level
    pub fn stat(&self, stat: Stat, class: CharacterClass, level: u32) -> f64 {
        if level == 0 {
            return 0.0;
        }
        self.tables
            .get(&(class, stat))
            .and_then(|levels| levels.get((level - 1) as usize))
            .copied()
            .unwrap_or(0.0)
    }

    /// Number of levels defined for a class/stat pair
    pub fn level_count(&self, stat: Stat, class: CharacterClass) -> usize {
        self.tables
            .get(&(class, stat))
            .map(|levels| levels.len())
            .unwrap_or(0)
    }
}
