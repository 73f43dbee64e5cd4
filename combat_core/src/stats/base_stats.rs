//! Stat aggregator - composes base stats, modifiers and level

use crate::progression::Progression;
use crate::stats::{Experience, ModifierProvider};
use crate::types::{CharacterClass, Stat};
use serde::{Deserialize, Serialize};

/// Derives a combatant's current level from accumulated experience and
/// composes base stat values with attached modifier providers.
///
/// The level cache is filled lazily: construction leaves it empty, and
/// either `force_init` (the deterministic init pass before the first tick)
/// or the first `refresh_level` seeds it. The cache only ever increases
/// during a session; a strict increase is reported so the caller can fan out
/// the level-up notification exactly once.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BaseStats {
    class: CharacterClass,
    starting_level: u32,
    max_level: u32,
    use_modifiers: bool,
    current_level: Option<u32>,
}

impl BaseStats {
    /// Create an uninitialized aggregator.
    ///
    /// `starting_level` is used when no experience tracker is attached;
    /// such combatants never level up.
    pub fn new(class: CharacterClass, starting_level: u32) -> Self {
        BaseStats {
            class,
            starting_level: starting_level.max(1),
            max_level: 5,
            use_modifiers: false,
            current_level: None,
        }
    }

    /// Set the level past which experience is no longer awarded
    pub fn with_max_level(mut self, max_level: u32) -> Self {
        self.max_level = max_level;
        self
    }

    /// Enable modifier aggregation from attached providers
    pub fn with_modifiers(mut self, use_modifiers: bool) -> Self {
        self.use_modifiers = use_modifiers;
        self
    }

    pub fn class(&self) -> CharacterClass {
        self.class
    }

    pub fn max_level(&self) -> u32 {
        self.max_level
    }

    /// Cached level, falling back to the starting level before init
    pub fn level(&self) -> u32 {
        self.current_level.unwrap_or(self.starting_level)
    }

    /// Seed the level cache if it has not been computed yet
    pub fn force_init(&mut self, progression: &Progression, experience: Option<&Experience>) {
        if self.current_level.is_none() {
            self.current_level = Some(self.calculate_level(progression, experience));
        }
    }

    /// Aggregate a stat value at the current level:
    /// `(base + Σ additive) × (1 + Σ percentage / 100)`
    pub fn stat(
        &self,
        stat: Stat,
        progression: &Progression,
        providers: &[&dyn ModifierProvider],
    ) -> f64 {
        (self.base_stat(stat, progression) + self.additive_modifier(stat, providers))
            * (1.0 + self.percentage_modifier(stat, providers) / 100.0)
    }

    fn base_stat(&self, stat: Stat, progression: &Progression) -> f64 {
        progression.stat(stat, self.class, self.level())
    }

    fn additive_modifier(&self, stat: Stat, providers: &[&dyn ModifierProvider]) -> f64 {
        if !self.use_modifiers {
            return 0.0;
        }
        providers
            .iter()
            .flat_map(|p| p.additive_modifiers(stat))
            .sum()
    }

    fn percentage_modifier(&self, stat: Stat, providers: &[&dyn ModifierProvider]) -> f64 {
        if !self.use_modifiers {
            return 0.0;
        }
        providers
            .iter()
            .flat_map(|p| p.percentage_modifiers(stat))
            .sum()
    }

    /// Level implied by the current experience total.
    ///
    /// Walks levels in order and returns the first whose cumulative
    /// experience threshold exceeds the total; past the last threshold the
    /// result is the top defined level. Without an experience tracker the
    /// configured starting level is returned.
    pub fn calculate_level(
        &self,
        progression: &Progression,
        experience: Option<&Experience>,
    ) -> u32 {
        let Some(experience) = experience else {
            return self.starting_level;
        };

        let current_xp = experience.points();
        let penultimate = progression.level_count(Stat::ExperienceToLevelUp, self.class) as u32;
        for level in 1..=penultimate {
            let threshold = progression.stat(Stat::ExperienceToLevelUp, self.class, level);
            if threshold > current_xp {
                return level;
            }
        }
        penultimate + 1
    }

    /// Recompute the level after an experience change.
    ///
    /// Returns `Some(new_level)` only on a strict increase over the cached
    /// value, so the caller signals level-up exactly once per increase. The
    /// first call on an uninitialized cache seeds it without reporting.
    pub fn refresh_level(
        &mut self,
        progression: &Progression,
        experience: Option<&Experience>,
    ) -> Option<u32> {
        let new_level = self.calculate_level(progression, experience);
        match self.current_level {
            None => {
                self.current_level = Some(new_level);
                None
            }
            Some(cached) if new_level > cached => {
                self.current_level = Some(new_level);
                Some(new_level)
            }
            Some(_) => None,
        }
    }

    /// Experience earned within the current level
    pub fn current_level_xp(&self, progression: &Progression, experience: &Experience) -> f64 {
        let total = experience.points();
        if self.level() > 1 {
            let past = progression.stat(Stat::ExperienceToLevelUp, self.class, self.level() - 1);
            (total - past).max(0.0)
        } else {
            total
        }
    }

    /// Experience span of the current level
    pub fn xp_to_level_up(&self, progression: &Progression) -> f64 {
        let threshold = progression.stat(Stat::ExperienceToLevelUp, self.class, self.level());
        if self.level() > 1 {
            let past = progression.stat(Stat::ExperienceToLevelUp, self.class, self.level() - 1);
            (threshold - past).max(0.0)
        } else {
            threshold
        }
    }

    /// Progress through the current level in `0.0..=1.0`; `1.0` once no
    /// further threshold is defined
    pub fn experience_fraction(&self, progression: &Progression, experience: &Experience) -> f64 {
        let span = self.xp_to_level_up(progression);
        if span <= 0.0 {
            return 1.0;
        }
        (self.current_level_xp(progression, experience) / span).clamp(0.0, 1.0)
    }
}
