//! Experience tracker

use serde::{Deserialize, Serialize};

/// Accumulated experience points for a combatant.
///
/// The tracker itself only stores the running total; the owning world emits
/// the experience-gained notification and recomputes the level in the same
/// call chain, so listeners observe the change synchronously rather than on
/// a later tick.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Experience {
    points: f64,
}

impl Experience {
    /// Create a tracker with zero experience
    pub fn new() -> Self {
        Experience::default()
    }

    /// Create a tracker with an initial total
    pub fn with_points(points: f64) -> Self {
        Experience { points }
    }

    /// Current accumulated total
    pub fn points(&self) -> f64 {
        self.points
    }

    /// Add experience and return the new total.
    ///
    /// Negative amounts are a caller contract violation.
    pub fn gain(&mut self, amount: f64) -> f64 {
        debug_assert!(amount >= 0.0, "experience gain must be non-negative");
        self.points += amount;
        self.points
    }
}
