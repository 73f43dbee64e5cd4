//! Property tests for the core invariants

use combat_core::{BaseStats, CharacterClass, HealMode, Health, Progression, Stat};
use proptest::prelude::*;

const MAX_HEALTH: f64 = 100.0;

fn heal_mode() -> impl Strategy<Value = HealMode> {
    prop_oneof![
        Just(HealMode::Immediate),
        (0.5f64..5.0, 0.1f64..1.0).prop_map(|(duration, tick_interval)| HealMode::Ticking {
            duration,
            tick_interval,
        }),
        (0.5f64..5.0).prop_map(|duration| HealMode::Smooth { duration }),
    ]
}

proptest! {
    /// Any damage sequence produces at most one Alive -> Dead transition,
    /// and exactly one when the total reaches the starting hit points.
    #[test]
    fn death_transition_fires_exactly_once(raw_amounts in prop::collection::vec(0u32..50, 1..40)) {
        // Whole-number amounts keep the running subtraction exact, so the
        // boundary comparison below cannot drift
        let amounts: Vec<f64> = raw_amounts.iter().map(|a| *a as f64).collect();
        let mut health = Health::new();
        health.force_init(MAX_HEALTH);

        let mut killing_blows = 0;
        for amount in &amounts {
            if health.take_damage(*amount, MAX_HEALTH).is_killing_blow {
                killing_blows += 1;
            }
        }

        let total: f64 = amounts.iter().sum();
        let expected = if total >= MAX_HEALTH { 1 } else { 0 };
        prop_assert_eq!(killing_blows, expected);
        prop_assert!((health.points() - (MAX_HEALTH - total).max(0.0)).abs() < 1e-9);
        prop_assert_eq!(health.is_dead(), total >= MAX_HEALTH);
    }

    /// With a non-decreasing per-level series, the aggregated stat never
    /// decreases as the level rises.
    #[test]
    fn stat_is_monotone_in_level(mut series in prop::collection::vec(0.0f64..1000.0, 1..12)) {
        series.sort_by(f64::total_cmp);

        let mut progression = Progression::new();
        let level_count = series.len() as u32;
        progression.insert(CharacterClass::Grunt, Stat::Health, series);

        let mut previous = f64::MIN;
        for level in 1..=level_count {
            let mut stats = BaseStats::new(CharacterClass::Grunt, level);
            stats.force_init(&progression, None);
            let value = stats.stat(Stat::Health, &progression, &[]);
            prop_assert!(value >= previous);
            previous = value;
        }
    }

    /// No heal mode can push hit points past max health, at any tick rate.
    #[test]
    fn healing_never_exceeds_max(
        damage in 0.0f64..100.0,
        amount in 0.0f64..250.0,
        mode in heal_mode(),
        dt in 0.05f64..0.5,
    ) {
        let mut health = Health::new();
        health.force_init(MAX_HEALTH);
        health.take_damage(damage, MAX_HEALTH);

        health.heal(amount, mode, MAX_HEALTH);
        let mut elapsed = 0.0;
        while elapsed < 6.0 {
            health.tick(dt, MAX_HEALTH);
            prop_assert!(health.points() <= MAX_HEALTH + 1e-9);
            elapsed += dt;
        }
    }

    /// The level derived from experience is monotone in the experience
    /// total and always within the defined range.
    #[test]
    fn level_is_monotone_in_experience(totals in prop::collection::vec(0.0f64..2000.0, 1..20)) {
        let mut progression = Progression::new();
        progression.insert(
            CharacterClass::Player,
            Stat::ExperienceToLevelUp,
            vec![100.0, 250.0, 450.0, 700.0],
        );
        let stats = BaseStats::new(CharacterClass::Player, 1);

        let mut sorted = totals.clone();
        sorted.sort_by(f64::total_cmp);

        let mut previous = 0;
        for total in sorted {
            let experience = combat_core::Experience::with_points(total);
            let level = stats.calculate_level(&progression, Some(&experience));
            prop_assert!(level >= previous);
            prop_assert!((1..=5).contains(&level));
            previous = level;
        }
    }
}
