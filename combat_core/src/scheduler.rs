//! Action scheduler - at most one active high-level action per combatant

use serde::{Deserialize, Serialize};

/// High-level actions a combatant can perform
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    Attack,
    Move,
}

/// Enforces the one-active-action rule for a combatant.
///
/// Starting a new action implicitly cancels the previous one; the displaced
/// action is returned so the owner can run its teardown.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ActionScheduler {
    current: Option<ActionKind>,
}

impl ActionScheduler {
    pub fn new() -> Self {
        ActionScheduler::default()
    }

    /// Start an action, returning the one it displaced (if any)
    pub fn start_action(&mut self, action: ActionKind) -> Option<ActionKind> {
        let previous = self.current.take();
        self.current = Some(action);
        previous.filter(|p| *p != action)
    }

    /// Cancel whatever is running, returning it
    pub fn cancel_current_action(&mut self) -> Option<ActionKind> {
        self.current.take()
    }

    pub fn current(&self) -> Option<ActionKind> {
        self.current
    }
}
