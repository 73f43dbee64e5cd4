//! Combatant controller - cooldown, target pursuit and hit resolution

use crate::combat::targeting::{nearest_target, CandidateView};
use crate::combat::weapon::WeaponConfig;
use crate::config::TargetingConstants;
use crate::types::{CombatantId, Vec2};
use serde::{Deserialize, Serialize};

/// Animation trigger fired when an attack starts
pub const ATTACK_TRIGGER: &str = "attack";
/// Animation trigger fired when an attack sequence is cancelled
pub const STOP_ATTACK_TRIGGER: &str = "stopAttack";

/// What a fighter wants to do this tick, decided against the start-of-tick
/// snapshot and applied afterwards
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FighterDecision {
    /// Close the distance to the target
    MoveToward {
        target: CombatantId,
        destination: Vec2,
        stopping_distance: f64,
    },
    /// In range with the cooldown elapsed: stop moving and trigger the
    /// attack animation. Damage lands later, when the animation system
    /// confirms the hit.
    TriggerAttack { target: CombatantId },
    /// In range but still cooling down
    HoldPosition,
    /// Target lost with no replacement in range
    Disengage,
}

/// Attack state for one combatant: cooldown, equipped weapon and the
/// current (non-owning) target reference.
///
/// Rebuilt whenever combat starts; never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Fighter {
    weapon: WeaponConfig,
    target: Option<CombatantId>,
    time_since_last_attack: f64,
}

impl Fighter {
    /// Create a fighter wielding `weapon`, ready to attack immediately
    pub fn new(weapon: WeaponConfig) -> Self {
        Fighter {
            weapon,
            target: None,
            time_since_last_attack: f64::INFINITY,
        }
    }

    pub fn weapon(&self) -> &WeaponConfig {
        &self.weapon
    }

    /// Swap the equipped weapon mid-combat
    pub fn equip_weapon(&mut self, weapon: WeaponConfig) {
        self.weapon = weapon;
    }

    pub fn target(&self) -> Option<CombatantId> {
        self.target
    }

    /// Begin attacking `target`
    pub fn set_target(&mut self, target: CombatantId) {
        self.target = Some(target);
    }

    /// Drop the current target. Does not interrupt an attack animation
    /// already in flight.
    pub fn cancel(&mut self) {
        self.target = None;
    }

    /// Advance the attack cooldown by `dt` seconds
    pub fn advance_cooldown(&mut self, dt: f64) {
        self.time_since_last_attack += dt;
    }

    /// Whether enough time has passed since the last attack
    pub fn cooldown_elapsed(&self) -> bool {
        self.time_since_last_attack > self.weapon.time_between_attacks
    }

    /// Per-tick decision against the start-of-tick snapshot.
    ///
    /// Returns `None` when there is no target. A dead target is replaced by
    /// the nearest eligible candidate before giving up; triggering an attack
    /// resets the cooldown.
    pub fn decide(
        &mut self,
        own: &CandidateView,
        candidates: &[CandidateView],
        constants: &TargetingConstants,
        can_move_to: &dyn Fn(Vec2, Vec2) -> bool,
    ) -> Option<FighterDecision> {
        let target_id = self.target?;

        let mut view = match candidates.iter().find(|c| c.id == target_id) {
            Some(view) => *view,
            None => {
                self.target = None;
                return Some(FighterDecision::Disengage);
            }
        };

        if view.is_dead {
            match nearest_target(
                own,
                candidates,
                constants.auto_attack_range,
                self.weapon.range,
                can_move_to,
            ) {
                Some(replacement) => {
                    self.target = Some(replacement);
                    view = *candidates.iter().find(|c| c.id == replacement)?;
                }
                None => {
                    self.target = None;
                    return Some(FighterDecision::Disengage);
                }
            }
        }

        let distance = own.position.distance(view.position);
        if distance >= self.weapon.range {
            Some(FighterDecision::MoveToward {
                target: view.id,
                destination: view.position,
                stopping_distance: constants.stopping_distance,
            })
        } else if self.cooldown_elapsed() {
            self.time_since_last_attack = 0.0;
            Some(FighterDecision::TriggerAttack { target: view.id })
        } else {
            Some(FighterDecision::HoldPosition)
        }
    }
}

/// Mitigated damage for a confirmed hit.
///
/// Defense applies diminishing returns: `damage / (1 + defense / damage)`.
/// The formula is undefined at zero damage, so zero passes through untouched.
pub fn resolve_hit_damage(raw_damage: f64, defense: f64) -> f64 {
    if raw_damage <= 0.0 {
        return 0.0;
    }
    raw_damage / (1.0 + defense / raw_damage)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reachable(_: Vec2, _: Vec2) -> bool {
        true
    }

    fn view(id: u32, x: f64, is_dead: bool) -> CandidateView {
        CandidateView {
            id: CombatantId(id),
            position: Vec2::new(x, 0.0),
            is_dead,
            is_player: false,
        }
    }

    fn make_fighter() -> Fighter {
        Fighter::new(WeaponConfig::unarmed())
    }

    #[test]
    fn test_no_target_no_decision() {
        let mut fighter = make_fighter();
        let own = view(1, 0.0, false);
        assert_eq!(
            fighter.decide(&own, &[own], &TargetingConstants::default(), &reachable),
            None
        );
    }

    #[test]
    fn test_moves_when_out_of_range() {
        let mut fighter = make_fighter();
        fighter.set_target(CombatantId(2));
        let own = view(1, 0.0, false);
        let candidates = [own, view(2, 5.0, false)];

        let decision = fighter.decide(&own, &candidates, &TargetingConstants::default(), &reachable);
        assert!(matches!(
            decision,
            Some(FighterDecision::MoveToward { target: CombatantId(2), .. })
        ));
    }

    #[test]
    fn test_attacks_in_range_and_resets_cooldown() {
        let mut fighter = make_fighter();
        fighter.set_target(CombatantId(2));
        let own = view(1, 0.0, false);
        let candidates = [own, view(2, 1.0, false)];
        let constants = TargetingConstants::default();

        let decision = fighter.decide(&own, &candidates, &constants, &reachable);
        assert_eq!(
            decision,
            Some(FighterDecision::TriggerAttack { target: CombatantId(2) })
        );

        // Cooldown just reset: the next tick holds position
        fighter.advance_cooldown(0.1);
        let decision = fighter.decide(&own, &candidates, &constants, &reachable);
        assert_eq!(decision, Some(FighterDecision::HoldPosition));

        fighter.advance_cooldown(1.0);
        let decision = fighter.decide(&own, &candidates, &constants, &reachable);
        assert_eq!(
            decision,
            Some(FighterDecision::TriggerAttack { target: CombatantId(2) })
        );
    }

    #[test]
    fn test_dead_target_replaced_by_nearest() {
        let mut fighter = make_fighter();
        fighter.set_target(CombatantId(2));
        let own = view(1, 0.0, false);
        let candidates = [own, view(2, 1.0, true), view(3, 3.0, false)];

        let decision = fighter.decide(&own, &candidates, &TargetingConstants::default(), &reachable);
        assert_eq!(fighter.target(), Some(CombatantId(3)));
        assert!(matches!(
            decision,
            Some(FighterDecision::MoveToward { target: CombatantId(3), .. })
        ));
    }

    #[test]
    fn test_dead_target_without_replacement_disengages() {
        let mut fighter = make_fighter();
        fighter.set_target(CombatantId(2));
        let own = view(1, 0.0, false);
        let candidates = [own, view(2, 1.0, true)];

        let decision = fighter.decide(&own, &candidates, &TargetingConstants::default(), &reachable);
        assert_eq!(decision, Some(FighterDecision::Disengage));
        assert_eq!(fighter.target(), None);
    }

    #[test]
    fn test_despawned_target_disengages() {
        let mut fighter = make_fighter();
        fighter.set_target(CombatantId(9));
        let own = view(1, 0.0, false);

        let decision = fighter.decide(&own, &[own], &TargetingConstants::default(), &reachable);
        assert_eq!(decision, Some(FighterDecision::Disengage));
        assert_eq!(fighter.target(), None);
    }

    #[test]
    fn test_equip_weapon_swaps_mid_combat() {
        let mut fighter = make_fighter();
        fighter.set_target(CombatantId(2));
        assert!((fighter.weapon().range - 2.0).abs() < f64::EPSILON);

        fighter.equip_weapon(WeaponConfig {
            id: "sword".to_string(),
            name: "Sword".to_string(),
            range: 2.5,
            time_between_attacks: 0.8,
            damage_bonus: 8.0,
            percentage_bonus: 0.0,
            has_projectile: false,
        });

        // The swap keeps the target and takes effect immediately
        assert_eq!(fighter.target(), Some(CombatantId(2)));
        assert!((fighter.weapon().range - 2.5).abs() < f64::EPSILON);
        assert!((fighter.weapon().damage_bonus - 8.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_defense_mitigation() {
        // 50 damage vs 50 defense: 50 / (1 + 50/50) = 25
        assert!((resolve_hit_damage(50.0, 50.0) - 25.0).abs() < f64::EPSILON);
        assert!((resolve_hit_damage(50.0, 0.0) - 50.0).abs() < f64::EPSILON);
        assert!((resolve_hit_damage(0.0, 50.0)).abs() < f64::EPSILON);
    }
}
