//! Frame clock
//!
//! Turns wall-clock readings into a variable per-tick delta. Time spent
//! paused is accumulated so runtime readouts have no gaps.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Clock {
    start: f64,
    latest: f64,
    dt: f32,
    paused_total: f64,
    last_reset: f64,
    since_reset: f64,
}

impl Clock {
    pub fn new(now: f64) -> Self {
        Self {
            start: now,
            latest: now,
            dt: 0.0,
            paused_total: 0.0,
            last_reset: now,
            since_reset: 0.0,
        }
    }

    /// Record a new wall-clock reading and return the delta since the last one
    ///
    /// A reading earlier than the last one yields a zero delta and is ignored.
    pub fn advance(&mut self, now: f64, paused: bool) -> f32 {
        let elapsed = if now.is_finite() && now > self.latest {
            now - self.latest
        } else {
            0.0
        };
        self.latest += elapsed;
        self.dt = elapsed as f32;

        if paused {
            self.paused_total += elapsed;
            // Keep time-since-reset frozen while paused
            self.last_reset = self.latest - self.since_reset;
        } else {
            self.since_reset = self.latest - self.last_reset;
        }
        self.dt
    }

    /// Delta produced by the last `advance`
    pub fn dt(&self) -> f32 {
        self.dt
    }

    /// Time run so far, excluding paused time
    pub fn runtime(&self) -> f64 {
        self.latest - self.start - self.paused_total
    }

    pub fn paused_total(&self) -> f64 {
        self.paused_total
    }

    pub fn time_since_reset(&self) -> f64 {
        self.since_reset
    }

    pub fn mark_reset(&mut self) {
        self.last_reset = self.latest;
        self.since_reset = 0.0;
    }
}
