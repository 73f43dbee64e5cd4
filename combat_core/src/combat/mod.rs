//! Combatant controller - target acquisition, cooldowns and hit resolution

mod fighter;
mod targeting;
mod weapon;

pub use fighter::{
    resolve_hit_damage, Fighter, FighterDecision, ATTACK_TRIGGER, STOP_ATTACK_TRIGGER,
};
pub use targeting::{can_attack, nearest_target, CandidateView};
pub use weapon::WeaponConfig;
