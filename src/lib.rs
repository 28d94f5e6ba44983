//! Drop Lab - a 2D ball-drop physics lab and gravity-well particle field
//!
//! Core modules:
//! - `sim`: Per-frame simulation (ball integration, rest detection, grab, particles)
//! - `config`: Validated physical constants and presets
//! - `platform`: Browser/native platform abstraction (time, logging)
//! - `error`: Configuration parsing errors
//! - `web`: Browser bindings (wasm32 only)

pub mod config;
pub mod error;
pub mod platform;
pub mod sim;

#[cfg(target_arch = "wasm32")]
pub mod web;

pub use config::{ConfigChanges, ConfigInput, Field, PhysicsConfig, apply_config};
pub use error::{ConfigError, ConfigResult};

/// Simulation configuration constants
pub mod consts {
    /// Metres per pixel at zoom 1.0
    pub const DEFAULT_SCALE: f32 = 0.01;
    /// Frame rate assumed when reconstructing a throw from grab samples
    pub const NOMINAL_FRAME_RATE: f32 = 60.0;

    /// Ticks a surface must be observed before the ball latches to it
    pub const SURFACE_HISTORY_LEN: usize = 10;
    /// Distance (metres) under which the ball counts as touching a surface
    pub const REST_EPSILON_M: f32 = 0.01;
    /// Distance (pixels) from the floor within which friction acts
    pub const FRICTION_CONTACT_PX: f32 = 1.0;
    /// Pointer samples kept while the ball is held
    pub const GRAB_HISTORY_LEN: usize = 5;
    /// Chart points kept when no chart limit is set (about an hour at 60 fps)
    pub const HISTORY_CAP: usize = 216_000;

    /// Ball defaults
    pub const DEFAULT_BALL_RADIUS: f32 = 0.3;
    pub const DEFAULT_BALL_DENSITY: f32 = 7850.0;

    /// Chance per tick that a new particle spawns
    pub const SPAWN_CHANCE: f64 = 0.04;
    /// Particles despawn once their centre is this fraction of the domain past an edge
    pub const OVERSCAN: f32 = 0.5;
    /// Well placement and size as fractions of the domain
    pub const WELL_X_FRACTION: f32 = 0.508;
    pub const WELL_Y_FRACTION: f32 = 0.54;
    pub const WELL_RADIUS_FRACTION: f32 = 0.07;
    /// Domain-area divisors for particle tuning (per nominal frame)
    pub const WELL_PULL_DIVISOR: f32 = 65.0;
    pub const MAX_SPEED_DIVISOR: f32 = 81120.0;
    pub const MIN_SPEED_DIVISOR: f32 = 648960.0;
    pub const MAX_RADIUS_DIVISOR: f32 = 21632.0;
    pub const MIN_RADIUS_DIVISOR: f32 = 54080.0;
}

/// Sign of `v` as -1, 0 or 1
///
/// Unlike `f32::signum`, zero maps to zero so a stopped body has no direction.
#[inline]
pub fn sign(v: f32) -> f32 {
    if v > 0.0 {
        1.0
    } else if v < 0.0 {
        -1.0
    } else {
        0.0
    }
}
