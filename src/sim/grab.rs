//! Pointer grab and throw
//!
//! While held, the ball follows the pointer and its own integration is
//! suspended. The last few held positions are kept so that letting go
//! throws the ball with the pointer's recent velocity.

use std::collections::VecDeque;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::body::RigidBody;
use super::environment::Environment;
use crate::consts::{GRAB_HISTORY_LEN, NOMINAL_FRAME_RATE};

/// Throw velocity (m/s) from a window of held positions (pixels)
///
/// Sample timestamps are not kept, so the window is assumed to span
/// `count` frames at `NOMINAL_FRAME_RATE`. A single sample gives zero.
pub fn release_velocity(samples: &VecDeque<Vec2>, env: &Environment) -> Vec2 {
    let (Some(first), Some(last)) = (samples.front(), samples.back()) else {
        return Vec2::ZERO;
    };
    let count = samples.len() as f32;
    let px_per_sec = (*last - *first) * NOMINAL_FRAME_RATE / count;
    Vec2::new(env.px_to_m(px_per_sec.x), env.px_to_m(px_per_sec.y))
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GrabController {
    held: bool,
    /// Latest pointer position (pixels)
    pointer: Vec2,
    /// Held positions, oldest first
    samples: VecDeque<Vec2>,
}

impl GrabController {
    pub fn new() -> Self {
        Self {
            held: false,
            pointer: Vec2::ZERO,
            samples: VecDeque::with_capacity(GRAB_HISTORY_LEN),
        }
    }

    pub fn is_held(&self) -> bool {
        self.held
    }

    pub fn pointer(&self) -> Vec2 {
        self.pointer
    }

    pub fn samples(&self) -> &VecDeque<Vec2> {
        &self.samples
    }

    pub fn set_pointer(&mut self, pos: Vec2) {
        self.pointer = pos;
    }

    /// Grab the ball if the pointer is inside it
    pub fn try_grab(&mut self, body: &mut RigidBody, pos: Vec2, env: &Environment) -> bool {
        self.pointer = pos;
        if self.held {
            return true;
        }
        if pos.distance(body.pos) >= body.radius_px(env) {
            return false;
        }
        self.held = true;
        self.samples.clear();
        body.vel = Vec2::ZERO;
        body.prev_vel = Vec2::ZERO;
        body.remove_from_surface();
        log::debug!("Ball grabbed at ({:.1}, {:.1})", pos.x, pos.y);
        true
    }

    /// Pin the held ball to the pointer for this tick
    pub fn follow(&mut self, body: &mut RigidBody, env: &Environment) {
        if !self.held {
            return;
        }
        body.pos = self.pointer;
        body.clamp_to_bounds(env);
        body.vel = Vec2::ZERO;
        body.prev_vel = Vec2::ZERO;
        body.accel = Vec2::ZERO;
        body.remove_from_surface();

        if self.samples.len() == GRAB_HISTORY_LEN {
            self.samples.pop_front();
        }
        self.samples.push_back(body.pos);
    }

    /// Let go, throwing the ball with the reconstructed velocity
    pub fn release(&mut self, body: &mut RigidBody, env: &Environment) {
        if !self.held {
            return;
        }
        self.held = false;
        body.vel = release_velocity(&self.samples, env);
        self.samples.clear();
        log::debug!("Ball released with velocity ({:.3}, {:.3}) m/s", body.vel.x, body.vel.y);
    }

    /// Drop any grab without throwing
    pub fn cancel(&mut self) {
        self.held = false;
        self.samples.clear();
    }
}
