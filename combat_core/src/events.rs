//! Combat event fan-out

use crate::types::CombatantId;

/// Something that happened inside the core during a tick.
///
/// Events are values, not callbacks: transitions are described after the
/// fact so listeners can react without reaching back into mutable state.
#[derive(Debug, Clone, PartialEq)]
pub enum CombatEvent {
    /// Experience was added to a tracker
    ExperienceGained {
        id: CombatantId,
        amount: f64,
        total: f64,
    },
    /// The aggregator's level strictly increased
    LevelUp { id: CombatantId, level: u32 },
    /// Non-lethal damage landed
    DamageTaken {
        id: CombatantId,
        instigator: Option<CombatantId>,
        amount: f64,
        points_remaining: f64,
    },
    /// The single Alive -> Dead transition
    Death {
        id: CombatantId,
        instigator: Option<CombatantId>,
    },
    /// An external restore brought a dead combatant back
    Resurrected { id: CombatantId },
    /// An attack animation was triggered; the hit lands later
    AttackTriggered {
        attacker: CombatantId,
        target: CombatantId,
    },
    /// A confirmed hit resolved into a damage instance
    HitResolved {
        attacker: CombatantId,
        target: CombatantId,
        damage: f64,
    },
    /// A projectile left carrying precomputed damage; application is
    /// deferred to impact
    ProjectileLaunched {
        attacker: CombatantId,
        target: CombatantId,
        damage: f64,
    },
}

/// Observer notified of every combat event
pub trait CombatListener {
    fn on_event(&mut self, event: &CombatEvent);
}

/// Fan-out point for combat events.
///
/// Listeners are invoked synchronously at emit time, in registration order.
/// Emitted events are also kept in a per-tick log that the world drains and
/// returns from `tick`, so callers without a listener still see everything.
#[derive(Default)]
pub struct EventDispatcher {
    listeners: Vec<Box<dyn CombatListener>>,
    log: Vec<CombatEvent>,
}

impl EventDispatcher {
    pub fn new() -> Self {
        EventDispatcher::default()
    }

    /// Register a listener; dispatch order follows registration order
    pub fn register(&mut self, listener: Box<dyn CombatListener>) {
        self.listeners.push(listener);
    }

    /// Dispatch an event to every listener and record it in the log
    pub fn emit(&mut self, event: CombatEvent) {
        for listener in &mut self.listeners {
            listener.on_event(&event);
        }
        self.log.push(event);
    }

    /// Drain the accumulated event log
    pub fn drain(&mut self) -> Vec<CombatEvent> {
        std::mem::take(&mut self.log)
    }
}

impl std::fmt::Debug for EventDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventDispatcher")
            .field("listeners", &self.listeners.len())
            .field("log", &self.log)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    struct Tagger {
        tag: &'static str,
        seen: Rc<RefCell<Vec<&'static str>>>,
    }

    impl CombatListener for Tagger {
        fn on_event(&mut self, _event: &CombatEvent) {
            self.seen.borrow_mut().push(self.tag);
        }
    }

    #[test]
    fn test_listeners_run_in_registration_order() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut dispatcher = EventDispatcher::new();
        dispatcher.register(Box::new(Tagger { tag: "first", seen: Rc::clone(&seen) }));
        dispatcher.register(Box::new(Tagger { tag: "second", seen: Rc::clone(&seen) }));

        dispatcher.emit(CombatEvent::LevelUp {
            id: CombatantId(1),
            level: 2,
        });

        assert_eq!(*seen.borrow(), vec!["first", "second"]);
    }

    #[test]
    fn test_drain_empties_the_log() {
        let mut dispatcher = EventDispatcher::new();
        dispatcher.emit(CombatEvent::Resurrected { id: CombatantId(1) });

        assert_eq!(dispatcher.drain().len(), 1);
        assert!(dispatcher.drain().is_empty());
    }
}
