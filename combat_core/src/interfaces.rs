//! Collaborator interfaces consumed by the core.
//!
//! Movement, animation playback and visual effects live outside this crate;
//! the core only issues commands through these traits. No-op implementations
//! are provided for headless use, plus a recording animation driver for
//! asserting trigger sequences in tests.

use crate::types::{CombatantId, Vec2};

/// Movement collaborator: carries bodies toward destinations between ticks
pub trait Mover {
    /// Advance `position` toward `destination`, coming to rest within
    /// `stopping_distance` of it
    fn move_to(&mut self, position: &mut Vec2, destination: Vec2, stopping_distance: f64, dt: f64);

    /// Halt any motion in progress for the body
    fn cancel(&mut self, id: CombatantId);

    /// Whether a path exists between two points
    fn can_move_to(&self, from: Vec2, to: Vec2) -> bool;
}

/// Animation collaborator: consumes named triggers.
///
/// Hit confirmations travel the other way, through
/// [`World::notify_animation_hit`](crate::world::World::notify_animation_hit).
pub trait AnimationDriver {
    fn set_trigger(&mut self, id: CombatantId, trigger: &str);
    fn reset_trigger(&mut self, id: CombatantId, trigger: &str);
    /// Reset the rig after a restore brings a combatant back to life
    fn rebind(&mut self, id: CombatantId);
}

/// Visual-effect collaborator; fire-and-forget
pub trait EffectSpawner {
    fn spawn(&mut self, effect: &str, at: CombatantId);
}

/// Mover that never moves and reports everything reachable
#[derive(Debug, Clone, Copy, Default)]
pub struct NullMover;

impl Mover for NullMover {
    fn move_to(&mut self, _position: &mut Vec2, _destination: Vec2, _stopping_distance: f64, _dt: f64) {}

    fn cancel(&mut self, _id: CombatantId) {}

    fn can_move_to(&self, _from: Vec2, _to: Vec2) -> bool {
        true
    }
}

/// Animation driver that ignores every trigger
#[derive(Debug, Clone, Copy, Default)]
pub struct NullAnimation;

impl AnimationDriver for NullAnimation {
    fn set_trigger(&mut self, _id: CombatantId, _trigger: &str) {}
    fn reset_trigger(&mut self, _id: CombatantId, _trigger: &str) {}
    fn rebind(&mut self, _id: CombatantId) {}
}

/// Effect spawner that discards every request
#[derive(Debug, Clone, Copy, Default)]
pub struct NullEffects;

impl EffectSpawner for NullEffects {
    fn spawn(&mut self, _effect: &str, _at: CombatantId) {}
}

/// Records triggers in order; shared handle for test assertions
#[derive(Debug, Clone, Default)]
pub struct RecordingAnimation {
    log: std::rc::Rc<std::cell::RefCell<Vec<AnimationCall>>>,
}

/// One recorded animation command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnimationCall {
    Set(CombatantId, String),
    Reset(CombatantId, String),
    Rebind(CombatantId),
}

impl RecordingAnimation {
    pub fn new() -> Self {
        RecordingAnimation::default()
    }

    /// Snapshot of every call recorded so far
    pub fn calls(&self) -> Vec<AnimationCall> {
        self.log.borrow().clone()
    }
}

impl AnimationDriver for RecordingAnimation {
    fn set_trigger(&mut self, id: CombatantId, trigger: &str) {
        self.log
            .borrow_mut()
            .push(AnimationCall::Set(id, trigger.to_string()));
    }

    fn reset_trigger(&mut self, id: CombatantId, trigger: &str) {
        self.log
            .borrow_mut()
            .push(AnimationCall::Reset(id, trigger.to_string()));
    }

    fn rebind(&mut self, id: CombatantId) {
        self.log.borrow_mut().push(AnimationCall::Rebind(id));
    }
}
