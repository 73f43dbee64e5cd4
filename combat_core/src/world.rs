//! World - owns combatants and runs the fixed-rate simulation tick.
//!
//! The world is the choreography layer: fighters decide against a
//! start-of-tick snapshot, mutations land in the apply phase, and cross
//! combatant effects (experience awards, death side effects, animation hit
//! confirmations) are routed here where both parties are reachable. Damage
//! applied during a tick is therefore first visible to the next tick's
//! decisions, never retroactively to the current one.

use crate::combat::{
    self, CandidateView, Fighter, FighterDecision, WeaponConfig, ATTACK_TRIGGER,
    STOP_ATTACK_TRIGGER,
};
use crate::config::CombatConstants;
use crate::events::{CombatEvent, CombatListener, EventDispatcher};
use crate::health::{HealMode, Health, VitalityTransition};
use crate::interfaces::{
    AnimationDriver, EffectSpawner, Mover, NullAnimation, NullEffects, NullMover,
};
use crate::progression::Progression;
use crate::scheduler::{ActionKind, ActionScheduler};
use crate::stats::{BaseStats, EquippedItem, Experience, ModifierProvider};
use crate::types::{CharacterClass, CombatantId, CombatantTag, Stat, Vec2};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::BTreeMap;

/// Trigger used when the configured death-animation set is empty
pub const DEFAULT_DEATH_TRIGGER: &str = "die";
/// Effect spawned on level-up
pub const LEVEL_UP_EFFECT: &str = "level_up";
/// Effect spawned when a projectile weapon fires
pub const PROJECTILE_EFFECT: &str = "projectile";

/// An actor participating in combat and progression.
///
/// Owns its vitality tracker and stat aggregator exclusively; the fighter
/// holds only a non-owning id reference to its target.
#[derive(Debug)]
pub struct Combatant {
    pub id: CombatantId,
    pub name: String,
    pub tag: CombatantTag,
    pub position: Vec2,
    pub base_stats: BaseStats,
    pub health: Health,
    pub experience: Option<Experience>,
    pub fighter: Option<Fighter>,
    pub scheduler: ActionScheduler,
    equipment: Vec<EquippedItem>,
    physics_active: bool,
}

impl Combatant {
    /// Every modifier provider attached to this combatant: equipped gear
    /// plus the wielded weapon
    fn providers(&self) -> Vec<&dyn ModifierProvider> {
        let mut providers: Vec<&dyn ModifierProvider> = self
            .equipment
            .iter()
            .map(|item| item as &dyn ModifierProvider)
            .collect();
        if let Some(fighter) = &self.fighter {
            providers.push(fighter.weapon());
        }
        providers
    }

    /// Aggregated stat value at the current level
    pub fn stat(&self, stat: Stat, progression: &Progression) -> f64 {
        self.base_stats.stat(stat, progression, &self.providers())
    }

    /// Max hit points from the aggregator
    pub fn max_health(&self, progression: &Progression) -> f64 {
        self.stat(Stat::Health, progression)
    }

    pub fn is_dead(&self) -> bool {
        self.health.is_dead()
    }

    /// Whether the collision/rigid-body representation is still attached
    pub fn physics_active(&self) -> bool {
        self.physics_active
    }

    pub fn equipment(&self) -> &[EquippedItem] {
        &self.equipment
    }

    /// Attach a piece of stat-bearing gear
    pub fn equip(&mut self, item: EquippedItem) {
        self.equipment.push(item);
    }

    /// Remove a piece of gear by id
    pub fn unequip(&mut self, item_id: &str) -> Option<EquippedItem> {
        let index = self.equipment.iter().position(|i| i.id == item_id)?;
        Some(self.equipment.remove(index))
    }

    /// Deterministic init pass: level first, then the hit points that
    /// depend on it
    fn force_init(&mut self, progression: &Progression) {
        self.base_stats
            .force_init(progression, self.experience.as_ref());
        let max_health = self.stat(Stat::Health, progression);
        self.health.force_init(max_health);
    }
}

/// Blueprint for spawning a combatant
#[derive(Debug, Clone)]
pub struct CombatantSpec {
    name: String,
    tag: CombatantTag,
    class: CharacterClass,
    position: Vec2,
    starting_level: u32,
    max_level: u32,
    use_modifiers: bool,
    experience: Option<f64>,
    weapon: Option<WeaponConfig>,
    equipment: Vec<EquippedItem>,
}

impl CombatantSpec {
    /// An AI combatant at a fixed starting level, without an experience
    /// tracker
    pub fn new(name: impl Into<String>, class: CharacterClass) -> Self {
        CombatantSpec {
            name: name.into(),
            tag: CombatantTag::Npc,
            class,
            position: Vec2::default(),
            starting_level: 1,
            max_level: 5,
            use_modifiers: false,
            experience: None,
            weapon: None,
            equipment: Vec::new(),
        }
    }

    /// The player: leveling enabled, modifiers enabled
    pub fn player(name: impl Into<String>) -> Self {
        CombatantSpec::new(name, CharacterClass::Player)
            .with_tag(CombatantTag::Player)
            .with_experience(0.0)
            .with_modifiers(true)
    }

    pub fn at(mut self, position: Vec2) -> Self {
        self.position = position;
        self
    }

    pub fn with_tag(mut self, tag: CombatantTag) -> Self {
        self.tag = tag;
        self
    }

    pub fn with_starting_level(mut self, level: u32) -> Self {
        self.starting_level = level;
        self
    }

    pub fn with_max_level(mut self, max_level: u32) -> Self {
        self.max_level = max_level;
        self
    }

    /// Attach an experience tracker with an initial total
    pub fn with_experience(mut self, points: f64) -> Self {
        self.experience = Some(points);
        self
    }

    pub fn with_modifiers(mut self, use_modifiers: bool) -> Self {
        self.use_modifiers = use_modifiers;
        self
    }

    /// Arm the combatant; without a weapon it cannot fight
    pub fn with_weapon(mut self, weapon: WeaponConfig) -> Self {
        self.weapon = Some(weapon);
        self
    }

    pub fn with_item(mut self, item: EquippedItem) -> Self {
        self.equipment.push(item);
        self
    }
}

/// The simulation: all combatants plus the collaborators they command
pub struct World {
    combatants: BTreeMap<CombatantId, Combatant>,
    progression: Progression,
    constants: CombatConstants,
    dispatcher: EventDispatcher,
    mover: Box<dyn Mover>,
    animation: Box<dyn AnimationDriver>,
    effects: Box<dyn EffectSpawner>,
    pending_hits: Vec<CombatantId>,
    rng: StdRng,
    next_id: u32,
}

impl World {
    pub fn new(progression: Progression, constants: CombatConstants) -> Self {
        World {
            combatants: BTreeMap::new(),
            progression,
            constants,
            dispatcher: EventDispatcher::new(),
            mover: Box::new(NullMover),
            animation: Box::new(NullAnimation),
            effects: Box::new(NullEffects),
            pending_hits: Vec::new(),
            rng: StdRng::from_entropy(),
            next_id: 1,
        }
    }

    /// Create a world with a deterministic RNG (for reproducible runs)
    pub fn with_seed(progression: Progression, constants: CombatConstants, seed: u64) -> Self {
        let mut world = World::new(progression, constants);
        world.rng = StdRng::seed_from_u64(seed);
        world
    }

    pub fn set_mover(&mut self, mover: Box<dyn Mover>) {
        self.mover = mover;
    }

    pub fn set_animation(&mut self, animation: Box<dyn AnimationDriver>) {
        self.animation = animation;
    }

    pub fn set_effects(&mut self, effects: Box<dyn EffectSpawner>) {
        self.effects = effects;
    }

    /// Register a combat event listener; dispatch follows registration order
    pub fn register_listener(&mut self, listener: Box<dyn CombatListener>) {
        self.dispatcher.register(listener);
    }

    pub fn progression(&self) -> &Progression {
        &self.progression
    }

    pub fn constants(&self) -> &CombatConstants {
        &self.constants
    }

    /// Spawn a combatant and run its deterministic init pass before the
    /// first tick touches it
    pub fn spawn(&mut self, spec: CombatantSpec) -> CombatantId {
        let id = CombatantId(self.next_id);
        self.next_id += 1;

        let base_stats = BaseStats::new(spec.class, spec.starting_level)
            .with_max_level(spec.max_level)
            .with_modifiers(spec.use_modifiers);

        let mut combatant = Combatant {
            id,
            name: spec.name,
            tag: spec.tag,
            position: spec.position,
            base_stats,
            health: Health::new(),
            experience: spec.experience.map(Experience::with_points),
            fighter: spec.weapon.map(Fighter::new),
            scheduler: ActionScheduler::new(),
            equipment: spec.equipment,
            physics_active: true,
        };
        combatant.force_init(&self.progression);

        self.combatants.insert(id, combatant);
        id
    }

    pub fn combatant(&self, id: CombatantId) -> Option<&Combatant> {
        self.combatants.get(&id)
    }

    pub fn combatant_mut(&mut self, id: CombatantId) -> Option<&mut Combatant> {
        self.combatants.get_mut(&id)
    }

    /// All combatants in id order
    pub fn combatants(&self) -> impl Iterator<Item = &Combatant> {
        self.combatants.values()
    }

    fn snapshot(&self) -> Vec<CandidateView> {
        self.combatants
            .values()
            .map(|c| CandidateView {
                id: c.id,
                position: c.position,
                is_dead: c.health.is_dead(),
                is_player: c.tag == CombatantTag::Player,
            })
            .collect()
    }

    /// Order `attacker` to start attacking `target`.
    ///
    /// Eligibility is checked up front; ineligible orders return `false`
    /// without side effects. A successful order registers the attack with
    /// the combatant's action scheduler, displacing whatever ran before.
    pub fn attack(&mut self, attacker_id: CombatantId, target_id: CombatantId) -> bool {
        let snapshot = self.snapshot();
        let Some(attacker_view) = snapshot.iter().find(|v| v.id == attacker_id).copied() else {
            return false;
        };
        let Some(target_view) = snapshot.iter().find(|v| v.id == target_id).copied() else {
            return false;
        };
        if attacker_view.is_dead {
            return false;
        }
        let Some(weapon_range) = self
            .combatants
            .get(&attacker_id)
            .and_then(|c| c.fighter.as_ref())
            .map(|f| f.weapon().range)
        else {
            return false;
        };

        let mover = &*self.mover;
        let can_move = |from: Vec2, to: Vec2| mover.can_move_to(from, to);
        if !combat::can_attack(&attacker_view, &target_view, weapon_range, &can_move) {
            return false;
        }

        let displaced = {
            let Some(combatant) = self.combatants.get_mut(&attacker_id) else {
                return false;
            };
            let displaced = combatant.scheduler.start_action(ActionKind::Attack);
            if let Some(fighter) = combatant.fighter.as_mut() {
                fighter.set_target(target_id);
            }
            displaced
        };
        if displaced == Some(ActionKind::Move) {
            self.mover.cancel(attacker_id);
        }
        true
    }

    /// Cancel a combatant's current action: clears the fighter target,
    /// stops movement and fires the stop-attack trigger sequence. An attack
    /// animation already in flight is not interrupted.
    pub fn cancel_action(&mut self, id: CombatantId) {
        if let Some(combatant) = self.combatants.get_mut(&id) {
            combatant.scheduler.cancel_current_action();
            if let Some(fighter) = combatant.fighter.as_mut() {
                fighter.cancel();
            }
        }
        self.animation.reset_trigger(id, ATTACK_TRIGGER);
        self.animation.set_trigger(id, STOP_ATTACK_TRIGGER);
        self.mover.cancel(id);
    }

    /// Heal a combatant; dead combatants are unaffected
    pub fn heal(&mut self, id: CombatantId, amount: f64, mode: HealMode) {
        let Some(max_health) = self
            .combatants
            .get(&id)
            .map(|c| c.stat(Stat::Health, &self.progression))
        else {
            return;
        };
        if let Some(combatant) = self.combatants.get_mut(&id) {
            combatant.health.heal(amount, mode, max_health);
        }
    }

    /// Add experience to a combatant, recomputing its level and fanning out
    /// the notifications synchronously.
    ///
    /// A combatant without an experience tracker is a configuration
    /// fallback, not an error.
    pub fn gain_experience(&mut self, id: CombatantId, amount: f64) {
        let total = {
            let Some(combatant) = self.combatants.get_mut(&id) else {
                return;
            };
            let Some(experience) = combatant.experience.as_mut() else {
                log::debug!("{} has no experience tracker, gain ignored", combatant.name);
                return;
            };
            experience.gain(amount)
        };
        self.dispatcher
            .emit(CombatEvent::ExperienceGained { id, amount, total });

        let leveled = {
            let Some(combatant) = self.combatants.get_mut(&id) else {
                return;
            };
            combatant
                .base_stats
                .refresh_level(&self.progression, combatant.experience.as_ref())
        };

        if let Some(level) = leveled {
            self.effects.spawn(LEVEL_UP_EFFECT, id);
            self.dispatcher.emit(CombatEvent::LevelUp { id, level });

            // Level-up regeneration: never below the configured floor
            let Some(max_health) = self
                .combatants
                .get(&id)
                .map(|c| c.stat(Stat::Health, &self.progression))
            else {
                return;
            };
            let percent = self.constants.vitality.level_up_health_percent;
            if let Some(combatant) = self.combatants.get_mut(&id) {
                combatant.health.regenerate(max_health, percent);
            }
        }
    }

    /// Apply a damage instance to `target`, running death side effects on
    /// the single Alive -> Dead transition
    pub fn apply_damage(
        &mut self,
        target: CombatantId,
        instigator: Option<CombatantId>,
        amount: f64,
    ) {
        let Some(max_health) = self
            .combatants
            .get(&target)
            .map(|c| c.stat(Stat::Health, &self.progression))
        else {
            return;
        };
        let outcome = {
            let Some(combatant) = self.combatants.get_mut(&target) else {
                return;
            };
            combatant.health.take_damage(amount, max_health)
        };

        if outcome.is_killing_blow {
            self.on_death(target, instigator);
        } else if outcome.points_before > 0.0 {
            self.dispatcher.emit(CombatEvent::DamageTaken {
                id: target,
                instigator,
                amount: outcome.applied,
                points_remaining: outcome.points_after,
            });
        }
    }

    /// Death side effects, run exactly once per death: notification, random
    /// death animation, action cancellation, physics detach for non-players
    /// and the experience award to the instigator
    fn on_death(&mut self, victim: CombatantId, instigator: Option<CombatantId>) {
        let Some(reward) = self
            .combatants
            .get(&victim)
            .map(|c| c.stat(Stat::ExperienceReward, &self.progression))
        else {
            return;
        };

        self.dispatcher.emit(CombatEvent::Death {
            id: victim,
            instigator,
        });

        let trigger = {
            let set = &self.constants.vitality.death_animation_triggers;
            if set.is_empty() {
                DEFAULT_DEATH_TRIGGER.to_string()
            } else {
                set[self.rng.gen_range(0..set.len())].clone()
            }
        };
        self.animation.set_trigger(victim, &trigger);

        if let Some(combatant) = self.combatants.get_mut(&victim) {
            combatant.scheduler.cancel_current_action();
            if let Some(fighter) = combatant.fighter.as_mut() {
                fighter.cancel();
            }
            // The corpse stops interacting physically; players keep their
            // colliders
            if combatant.tag != CombatantTag::Player {
                combatant.physics_active = false;
            }
        }
        self.mover.cancel(victim);

        if let Some(instigator_id) = instigator {
            match self.combatants.get(&instigator_id) {
                None => {}
                Some(c) if c.base_stats.level() >= c.base_stats.max_level() => {
                    log::debug!("{} is already at max level, no experience awarded", c.name);
                }
                Some(_) => self.gain_experience(instigator_id, reward),
            }
        }
    }

    /// Animation collaborator callback: a previously triggered attack
    /// connected. Queued and resolved in the next tick's apply phase.
    pub fn notify_animation_hit(&mut self, attacker: CombatantId) {
        self.pending_hits.push(attacker);
    }

    /// Ranged weapons report their release through the same path
    pub fn notify_animation_shoot(&mut self, attacker: CombatantId) {
        self.notify_animation_hit(attacker);
    }

    fn resolve_hit(&mut self, attacker: CombatantId) {
        let Some((target, raw_damage, has_projectile)) =
            self.combatants.get(&attacker).and_then(|c| {
                let fighter = c.fighter.as_ref()?;
                let target = fighter.target()?;
                Some((
                    target,
                    c.stat(Stat::Damage, &self.progression),
                    fighter.weapon().has_projectile,
                ))
            })
        else {
            return;
        };
        let Some(defense) = self
            .combatants
            .get(&target)
            .map(|t| t.stat(Stat::Defense, &self.progression))
        else {
            return;
        };

        let damage = combat::resolve_hit_damage(raw_damage, defense);
        if has_projectile {
            // Damage application defers to projectile impact
            self.effects.spawn(PROJECTILE_EFFECT, attacker);
            self.dispatcher.emit(CombatEvent::ProjectileLaunched {
                attacker,
                target,
                damage,
            });
        } else {
            self.dispatcher.emit(CombatEvent::HitResolved {
                attacker,
                target,
                damage,
            });
            self.apply_damage(target, Some(attacker), damage);
        }
    }

    /// Projectile collaborator callback: a launched projectile landed
    pub fn apply_projectile_impact(
        &mut self,
        target: CombatantId,
        instigator: Option<CombatantId>,
        damage: f64,
    ) {
        if let Some(attacker) = instigator {
            self.dispatcher.emit(CombatEvent::HitResolved {
                attacker,
                target,
                damage,
            });
        }
        self.apply_damage(target, instigator, damage);
    }

    /// Persistence: capture the vitality scalar
    pub fn capture_health(&self, id: CombatantId) -> Option<f64> {
        self.combatants.get(&id).map(|c| c.health.capture_state())
    }

    /// Persistence: restore the vitality scalar, running the side effects
    /// of any dead/alive transition it causes
    pub fn restore_health(&mut self, id: CombatantId, points: f64) {
        let transition = {
            let Some(combatant) = self.combatants.get_mut(&id) else {
                return;
            };
            combatant.health.restore_state(points)
        };

        match transition {
            VitalityTransition::Died => self.on_death(id, None),
            VitalityTransition::Revived => {
                self.animation.rebind(id);
                if let Some(combatant) = self.combatants.get_mut(&id) {
                    combatant.physics_active = true;
                }
                self.dispatcher.emit(CombatEvent::Resurrected { id });
            }
            VitalityTransition::None => {}
        }
    }

    /// Advance the simulation by `dt` seconds and return everything that
    /// happened (including events emitted by commands since the last tick)
    pub fn tick(&mut self, dt: f64) -> Vec<CombatEvent> {
        // Phase 1: timers. Cooldowns and heals advance before decisions.
        let max_healths: Vec<(CombatantId, f64)> = self
            .combatants
            .values()
            .map(|c| (c.id, c.stat(Stat::Health, &self.progression)))
            .collect();
        for (id, max_health) in max_healths {
            if let Some(combatant) = self.combatants.get_mut(&id) {
                if let Some(fighter) = combatant.fighter.as_mut() {
                    fighter.advance_cooldown(dt);
                }
                combatant.health.tick(dt, max_health);
            }
        }

        // Phase 2: decisions against the start-of-tick snapshot
        let snapshot = self.snapshot();
        let fighter_ids: Vec<CombatantId> = self
            .combatants
            .values()
            .filter(|c| c.fighter.is_some() && !c.health.is_dead())
            .map(|c| c.id)
            .collect();

        let mut decisions: Vec<(CombatantId, FighterDecision)> = Vec::new();
        let mover = &*self.mover;
        let can_move = |from: Vec2, to: Vec2| mover.can_move_to(from, to);
        let targeting = &self.constants.targeting;
        for id in fighter_ids {
            let Some(own) = snapshot.iter().find(|v| v.id == id).copied() else {
                continue;
            };
            if let Some(combatant) = self.combatants.get_mut(&id) {
                if let Some(fighter) = combatant.fighter.as_mut() {
                    if let Some(decision) = fighter.decide(&own, &snapshot, targeting, &can_move) {
                        decisions.push((id, decision));
                    }
                }
            }
        }

        // Phase 3: apply decisions
        for (id, decision) in decisions {
            match decision {
                FighterDecision::MoveToward {
                    destination,
                    stopping_distance,
                    ..
                } => {
                    if let Some(combatant) = self.combatants.get_mut(&id) {
                        self.mover
                            .move_to(&mut combatant.position, destination, stopping_distance, dt);
                    }
                }
                FighterDecision::TriggerAttack { target } => {
                    self.mover.cancel(id);
                    self.animation.reset_trigger(id, STOP_ATTACK_TRIGGER);
                    self.animation.set_trigger(id, ATTACK_TRIGGER);
                    self.dispatcher.emit(CombatEvent::AttackTriggered {
                        attacker: id,
                        target,
                    });
                }
                FighterDecision::HoldPosition | FighterDecision::Disengage => {
                    self.mover.cancel(id);
                }
            }
        }

        // Phase 4: hit confirmations queued since the last tick
        let hits = std::mem::take(&mut self.pending_hits);
        for attacker in hits {
            self.resolve_hit(attacker);
        }

        self.dispatcher.drain()
    }
}
