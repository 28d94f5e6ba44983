//! Gravity well: a fixed inverse-square attractor
//!
//! The pull constant scales with domain area so accelerations look the same
//! on any screen size.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GravityWell {
    /// Centre (pixels)
    pub pos: Vec2,
    /// Absorption radius (pixels)
    pub radius: f32,
    /// Pull constant (px³/s²)
    pub k: f32,
}

impl GravityWell {
    pub fn new(pos: Vec2, radius: f32, k: f32) -> Self {
        Self { pos, radius, k }
    }

    /// Well placed and tuned for a `width` x `height` domain
    pub fn for_domain(width: f32, height: f32) -> Self {
        let area = width * height;
        Self {
            pos: Vec2::new(WELL_X_FRACTION * width, WELL_Y_FRACTION * height),
            radius: WELL_RADIUS_FRACTION * width,
            k: area / WELL_PULL_DIVISOR * NOMINAL_FRAME_RATE * NOMINAL_FRAME_RATE,
        }
    }

    /// Acceleration (px/s²) on a unit mass at `p`
    ///
    /// `a = k / r² * (d / r)` toward the centre. The pull at the exact
    /// centre is undefined; this returns zero there rather than NaN, and no
    /// minimum radius softens the pull anywhere else.
    pub fn acceleration_at(&self, p: Vec2) -> Vec2 {
        let d = self.pos - p;
        let r2 = d.length_squared();
        if r2 == 0.0 {
            return Vec2::ZERO;
        }
        d.normalize_or_zero() * (self.k / r2)
    }

    /// True if a circle at `p` with `radius` lies wholly inside the horizon
    pub fn absorbs(&self, p: Vec2, radius: f32) -> bool {
        p.distance(self.pos) + radius < self.radius
    }
}
