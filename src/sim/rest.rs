//! Rest detection with hysteresis
//!
//! A body only latches to a surface after touching it on every one of the
//! last `SURFACE_HISTORY_LEN` ticks, so a single-frame graze mid-bounce
//! never stops it. Unlatching is immediate.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use super::environment::Surface;
use crate::consts::SURFACE_HISTORY_LEN;

/// Whether a body is latched to a surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RestState {
    #[default]
    Free,
    OnFloor,
    OnCeiling,
}

impl RestState {
    pub fn on(surface: Surface) -> Self {
        match surface {
            Surface::Floor => RestState::OnFloor,
            Surface::Ceiling => RestState::OnCeiling,
        }
    }

    pub fn surface(&self) -> Option<Surface> {
        match self {
            RestState::Free => None,
            RestState::OnFloor => Some(Surface::Floor),
            RestState::OnCeiling => Some(Surface::Ceiling),
        }
    }

    #[inline]
    pub fn is_resting(&self) -> bool {
        *self != RestState::Free
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RestTracker {
    state: RestState,
    /// Surface seen on each recent tick (oldest first)
    window: VecDeque<Option<Surface>>,
}

impl RestTracker {
    pub fn new() -> Self {
        Self {
            state: RestState::Free,
            window: VecDeque::with_capacity(SURFACE_HISTORY_LEN + 1),
        }
    }

    pub fn state(&self) -> RestState {
        self.state
    }

    /// Number of observations currently held
    pub fn observations(&self) -> usize {
        self.window.len()
    }

    /// Record this tick's surface contact
    ///
    /// Returns the surface if the body latched to it on this observation.
    /// Observations made while already resting are ignored.
    pub fn observe(&mut self, seen: Option<Surface>) -> Option<Surface> {
        if self.state.is_resting() {
            return None;
        }

        self.window.push_back(seen);
        if self.window.len() > SURFACE_HISTORY_LEN {
            self.window.pop_front();
        }

        let surface = seen?;
        if self.window.len() == SURFACE_HISTORY_LEN && self.window.iter().all(|s| *s == Some(surface)) {
            self.latch(surface);
            return Some(surface);
        }
        None
    }

    /// Force the latched state (clears the observation window)
    pub fn latch(&mut self, surface: Surface) {
        self.state = RestState::on(surface);
        self.window.clear();
    }

    /// Drop any latch immediately and forget earlier observations
    pub fn free(&mut self) {
        self.state = RestState::Free;
        self.window.clear();
    }
}
