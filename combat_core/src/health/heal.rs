//! Heal delivery modes and the over-time heal state machine

use serde::{Deserialize, Serialize};

/// How a heal is delivered
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum HealMode {
    /// Entire amount applied at once
    Immediate,
    /// Discrete steps every `tick_interval` seconds across `duration` seconds
    Ticking { duration: f64, tick_interval: f64 },
    /// Continuous interpolation toward the target across `duration` seconds
    Smooth { duration: f64 },
}

/// A heal in progress, advanced once per simulation tick.
///
/// Both variants restore the full amount within `duration` seconds and can
/// never overshoot it; the owning tracker additionally clamps to max health.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActiveHeal {
    amount: f64,
    remaining: f64,
    elapsed: f64,
    duration: f64,
    tick_interval: f64,
    time_until_tick: f64,
    smooth: bool,
}

impl ActiveHeal {
    /// Create a ticking heal stepping every `tick_interval` seconds
    pub fn ticking(amount: f64, duration: f64, tick_interval: f64) -> Self {
        debug_assert!(amount >= 0.0, "heal amount must be non-negative");
        let tick_interval = tick_interval.max(1e-6);
        ActiveHeal {
            amount,
            remaining: amount,
            elapsed: 0.0,
            duration: duration.max(1e-6),
            tick_interval,
            time_until_tick: tick_interval,
            smooth: false,
        }
    }

    /// Create a smooth heal interpolating every update
    pub fn smooth(amount: f64, duration: f64) -> Self {
        debug_assert!(amount >= 0.0, "heal amount must be non-negative");
        ActiveHeal {
            amount,
            remaining: amount,
            elapsed: 0.0,
            duration: duration.max(1e-6),
            tick_interval: 0.0,
            time_until_tick: 0.0,
            smooth: true,
        }
    }

    /// Advance by `dt` seconds, returning the amount restored this update
    pub fn tick(&mut self, dt: f64) -> f64 {
        self.elapsed += dt;

        let mut healed = 0.0;
        if self.smooth {
            let step = (self.amount * dt / self.duration).min(self.remaining);
            self.remaining -= step;
            healed += step;
        } else {
            self.time_until_tick -= dt;
            let per_tick = self.amount * self.tick_interval / self.duration;
            while self.time_until_tick <= 0.0 && self.remaining > 0.0 {
                let step = per_tick.min(self.remaining);
                self.remaining -= step;
                healed += step;
                self.time_until_tick += self.tick_interval;
            }
        }

        // The full amount lands within the stated duration
        if self.elapsed >= self.duration && self.remaining > 0.0 {
            healed += self.remaining;
            self.remaining = 0.0;
        }

        healed
    }

    /// Whether the heal has delivered its full amount
    pub fn finished(&self) -> bool {
        self.remaining <= 0.0
    }
}
