//! Target eligibility and acquisition

use crate::types::{CombatantId, Vec2};

/// A combatant as seen by targeting queries at the start of a tick.
///
/// Views are built only for combatants that own a vitality tracker, so the
/// "has health" eligibility rule holds by construction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CandidateView {
    pub id: CombatantId,
    pub position: Vec2,
    pub is_dead: bool,
    pub is_player: bool,
}

/// Whether `target` is a valid victim for `attacker`.
///
/// Rejections are silent: self, the dead, player-on-player, and candidates
/// that are neither reachable nor already inside weapon range all simply
/// fail the check.
pub fn can_attack(
    attacker: &CandidateView,
    target: &CandidateView,
    weapon_range: f64,
    can_move_to: &dyn Fn(Vec2, Vec2) -> bool,
) -> bool {
    if target.id == attacker.id {
        return false;
    }
    if attacker.is_player && target.is_player {
        return false;
    }
    if target.is_dead {
        return false;
    }

    let in_range = attacker.position.distance(target.position) < weapon_range;
    in_range || can_move_to(attacker.position, target.position)
}

/// Nearest eligible candidate within `radius` of the attacker.
///
/// Strictly nearest wins; equal distances are broken by id, so repeat scans
/// over the same input always pick the same target.
pub fn nearest_target(
    attacker: &CandidateView,
    candidates: &[CandidateView],
    radius: f64,
    weapon_range: f64,
    can_move_to: &dyn Fn(Vec2, Vec2) -> bool,
) -> Option<CombatantId> {
    let mut eligible: Vec<(f64, CombatantId)> = candidates
        .iter()
        .filter(|c| can_attack(attacker, c, weapon_range, can_move_to))
        .map(|c| (attacker.position.distance(c.position), c.id))
        .filter(|(distance, _)| *distance <= radius)
        .collect();

    eligible.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));
    eligible.first().map(|(_, id)| *id)
}
