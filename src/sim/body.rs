//! The ball: a rigid sphere under gravity, buoyancy, drag and friction
//!
//! Position is kept in pixels (screen coordinates, y grows downward) while
//! velocity is kept in metres per second with the same axis orientation.
//! The environment's pixel scale converts between the two.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::environment::{Environment, Side, Surface};
use super::rest::{RestState, RestTracker};
use crate::config::KeepConstant;
use crate::consts::*;
use crate::sign;

/// Slack (pixels) for treating a tangent body as touching a boundary.
/// The end-of-tick clamp leaves a penetrating body exactly tangent.
const CONTACT_SLOP_PX: f32 = 1e-3;

/// Reverse a velocity component keeping `retained` of its kinetic energy
///
/// `v' = -sign(v) * sqrt(2 * E * retained / m)` with `E = ½mv²`.
#[inline]
pub fn bounce_velocity(v: f32, mass: f32, retained: f32) -> f32 {
    let energy = 0.5 * mass * v * v * retained;
    -sign(v) * (2.0 * energy / mass).sqrt()
}

/// Slow `v` by a deceleration without letting it change sign
///
/// Returns exactly 0 if the step would overshoot through zero.
#[inline]
pub fn decelerate(v: f32, decel: f32, dt: f32) -> f32 {
    let direction = sign(v);
    let next = v - direction * decel * dt;
    if sign(next) != direction { 0.0 } else { next }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RigidBody {
    /// Centre position (pixels)
    pub pos: Vec2,
    /// Velocity (m/s, +y is down)
    pub vel: Vec2,
    /// Velocity at the end of the previous tick
    pub prev_vel: Vec2,
    /// Acceleration over the last tick, for display only
    pub accel: Vec2,
    radius: f32,
    density: f32,
    volume: f32,
    cross_section: f32,
    mass: f32,
    rest: RestTracker,
    /// Surface struck while moving into it during the last integrate
    #[serde(skip)]
    pub last_contact: Option<Surface>,
}

impl RigidBody {
    /// New ball centred in the domain
    pub fn new(radius: f32, density: f32, env: &Environment) -> Self {
        let mut body = Self {
            pos: Vec2::ZERO,
            vel: Vec2::ZERO,
            prev_vel: Vec2::ZERO,
            accel: Vec2::ZERO,
            radius,
            density,
            volume: 0.0,
            cross_section: 0.0,
            mass: 0.0,
            rest: RestTracker::new(),
            last_contact: None,
        };
        body.recompute(KeepConstant::Density);
        body.reset(env);
        body
    }

    /// Radius (m)
    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn radius_px(&self, env: &Environment) -> f32 {
        env.m_to_px(self.radius)
    }

    /// Density (kg/m³)
    pub fn density(&self) -> f32 {
        self.density
    }

    /// Volume (m³)
    pub fn volume(&self) -> f32 {
        self.volume
    }

    /// Cross-sectional area (m²)
    pub fn cross_section(&self) -> f32 {
        self.cross_section
    }

    /// Mass (kg)
    pub fn mass(&self) -> f32 {
        self.mass
    }

    pub fn rest_state(&self) -> RestState {
        self.rest.state()
    }

    fn recompute(&mut self, keep: KeepConstant) {
        self.volume = 4.0 / 3.0 * std::f32::consts::PI * self.radius.powi(3);
        self.cross_section = std::f32::consts::PI * self.radius * self.radius;
        match keep {
            KeepConstant::Density => self.mass = self.density * self.volume,
            KeepConstant::Mass => self.density = self.mass / self.volume,
        }
    }

    /// Change the radius, keeping either density or mass fixed
    pub fn set_radius(&mut self, radius: f32, keep: KeepConstant, env: &Environment) {
        self.radius = radius;
        self.recompute(keep);
        self.remove_from_surface();
        self.clamp_to_bounds(env);
    }

    /// Change the density; mass follows
    pub fn set_density(&mut self, density: f32) {
        self.density = density;
        self.mass = self.density * self.volume;
        self.remove_from_surface();
    }

    /// Recentre and stop the ball
    pub fn reset(&mut self, env: &Environment) {
        self.pos = Vec2::new(env.width / 2.0, env.height / 2.0);
        self.vel = Vec2::ZERO;
        self.prev_vel = Vec2::ZERO;
        self.accel = Vec2::ZERO;
        self.last_contact = None;
        self.remove_from_surface();
    }

    /// Teleport so the lower edge sits `height` metres above the floor
    pub fn set_height(&mut self, height: f32, env: &Environment) {
        if !height.is_finite() {
            return;
        }
        self.pos.y = env.height - self.radius_px(env) - env.m_to_px(height);
        self.vel = Vec2::ZERO;
        self.prev_vel = Vec2::ZERO;
        self.remove_from_surface();
        self.clamp_to_bounds(env);
    }

    /// Keep physical distances to the floor and left wall across a zoom change
    pub fn rescale(&mut self, old: &Environment, new: &Environment) {
        let above_floor = old.px_to_m(old.height - self.pos.y - self.radius_px(old));
        let from_wall = old.px_to_m(self.pos.x - self.radius_px(old));
        let r = self.radius_px(new);
        self.pos.y = new.height - new.m_to_px(above_floor) - r;
        self.pos.x = new.m_to_px(from_wall) + r;
        self.remove_from_surface();
    }

    /// Unlatch from any surface
    pub fn remove_from_surface(&mut self) {
        if self.rest.state().is_resting() {
            log::debug!("Ball released from {:?}", self.rest.state());
        }
        self.rest.free();
    }

    /// Surface within the rest epsilon this instant, if any
    pub fn surface_at(&self, env: &Environment) -> Option<Surface> {
        let r = self.radius_px(env);
        if env.px_to_m((self.pos.y + r - env.height).abs()) < REST_EPSILON_M {
            return Some(Surface::Floor);
        }
        if env.bounce_on_ceiling && env.px_to_m((self.pos.y - r).abs()) < REST_EPSILON_M {
            return Some(Surface::Ceiling);
        }
        None
    }

    /// Place the ball tangent to a side
    pub fn set_side(&mut self, side: Side, env: &Environment) {
        let r = self.radius_px(env);
        match side {
            Side::Bottom => self.pos.y = env.height - r,
            Side::Top => self.pos.y = r,
            Side::Right => self.pos.x = env.width - r,
            Side::Left => self.pos.x = r,
        }
    }

    /// Move the ball back inside any boundary it has crossed
    ///
    /// The ceiling only counts as a boundary when ceiling bounces are on.
    pub fn clamp_to_bounds(&mut self, env: &Environment) {
        let r = self.radius_px(env);
        if self.pos.y + r > env.height {
            self.set_side(Side::Bottom, env);
        } else if env.bounce_on_ceiling && self.pos.y - r < 0.0 {
            self.set_side(Side::Top, env);
        }
        if self.pos.x + r > env.width {
            self.set_side(Side::Right, env);
        } else if self.pos.x - r < 0.0 {
            self.set_side(Side::Left, env);
        }
    }

    /// Advance the ball by `dt` seconds
    ///
    /// Zero, negative or non-finite `dt` is treated as zero.
    pub fn integrate(&mut self, dt: f32, env: &Environment) {
        let dt = if dt.is_finite() && dt > 0.0 { dt } else { 0.0 };
        self.last_contact = None;

        if self.rest.state().is_resting() {
            self.vel.y = 0.0;
        } else {
            self.vel.y += env.g * dt;
            self.bounce_vertical(env, dt);
            self.vel.y -= self.volume * env.fluid_density * env.g / self.mass * dt;
            self.vel.y = decelerate(self.vel.y, self.drag_decel(self.prev_vel.y, env), dt);
        }
        self.vel.x = decelerate(self.vel.x, self.drag_decel(self.prev_vel.x, env), dt);
        self.apply_friction(env, dt);
        self.bounce_horizontal(env);

        self.pos += Vec2::new(env.m_to_px(self.vel.x * dt), env.m_to_px(self.vel.y * dt));

        if !self.rest.state().is_resting() {
            if let Some(surface) = self.rest.observe(self.surface_at(env)) {
                self.settle(surface, env);
            } else {
                let rise = self.clamp_rise_px(env);
                self.trade_height_energy(env.px_to_m(rise), env);
            }
        }

        self.clamp_to_bounds(env);

        if dt > 0.0 {
            self.accel = (self.vel - self.prev_vel) / dt;
        }
        self.prev_vel = self.vel;
    }

    /// Quadratic drag deceleration from the previous tick's speed
    fn drag_decel(&self, prev: f32, env: &Environment) -> f32 {
        let force = 0.5 * env.drag_coefficient * env.fluid_density * prev * prev * self.cross_section;
        force / self.mass
    }

    fn apply_friction(&mut self, env: &Environment, dt: f32) {
        let gap = self.pos.y + self.radius_px(env) - env.height;
        if gap.abs() < FRICTION_CONTACT_PX {
            // F = μmg, so the deceleration is μg
            self.vel.x = decelerate(self.vel.x, env.friction * env.g, dt);
        }
    }

    fn bounce_vertical(&mut self, env: &Environment, dt: f32) {
        let r = self.radius_px(env);
        let surface = if self.pos.y + r >= env.height - CONTACT_SLOP_PX {
            Surface::Floor
        } else if env.bounce_on_ceiling && self.pos.y - r <= CONTACT_SLOP_PX {
            Surface::Ceiling
        } else {
            return;
        };

        match surface {
            // The floor holds the ball for this tick, so its gravity kick is undone
            Surface::Floor if self.vel.y > 0.0 => {
                let incoming = (self.vel.y - env.g * dt).max(0.0);
                self.vel.y = bounce_velocity(incoming, self.mass, env.energy_retained);
                self.last_contact = Some(surface);
            }
            Surface::Ceiling if self.vel.y < 0.0 => {
                self.vel.y = bounce_velocity(self.vel.y, self.mass, env.energy_retained);
                self.last_contact = Some(surface);
            }
            _ => {}
        }

        // Snap tangent and pay for the height that gave back
        let penetration = match surface {
            Surface::Floor => self.pos.y + r - env.height,
            Surface::Ceiling => r - self.pos.y,
        };
        if penetration > 0.0 {
            let (side, rise) = match surface {
                Surface::Floor => (Side::Bottom, penetration),
                Surface::Ceiling => (Side::Top, -penetration),
            };
            self.set_side(side, env);
            self.trade_height_energy(env.px_to_m(rise), env);
        }
    }

    /// Upward shift (px) that `clamp_to_bounds` is about to apply vertically
    fn clamp_rise_px(&self, env: &Environment) -> f32 {
        let r = self.radius_px(env);
        if self.pos.y + r > env.height {
            self.pos.y + r - env.height
        } else if env.bounce_on_ceiling && self.pos.y - r < 0.0 {
            self.pos.y - r
        } else {
            0.0
        }
    }

    /// Keep `½mv² + mgh` fixed across a repositioning by `rise` metres
    ///
    /// Kinetic energy never goes below zero.
    fn trade_height_energy(&mut self, rise: f32, env: &Environment) {
        if rise == 0.0 {
            return;
        }
        let energy = (0.5 * self.mass * self.vel.y * self.vel.y - self.mass * env.g * rise).max(0.0);
        self.vel.y = sign(self.vel.y) * (2.0 * energy / self.mass).sqrt();
    }

    fn bounce_horizontal(&mut self, env: &Environment) {
        let r = self.radius_px(env);
        if self.pos.x + r >= env.width - CONTACT_SLOP_PX {
            if self.vel.x > 0.0 {
                self.vel.x = bounce_velocity(self.vel.x, self.mass, env.energy_retained);
            }
            self.set_side(Side::Right, env);
        } else if self.pos.x - r <= CONTACT_SLOP_PX {
            if self.vel.x < 0.0 {
                self.vel.x = bounce_velocity(self.vel.x, self.mass, env.energy_retained);
            }
            self.set_side(Side::Left, env);
        }
    }

    fn settle(&mut self, surface: Surface, env: &Environment) {
        log::debug!("Ball came to rest on {:?}", surface);
        self.vel.y = 0.0;
        self.prev_vel.y = 0.0;
        let side = match surface {
            Surface::Floor => Side::Bottom,
            Surface::Ceiling => Side::Top,
        };
        self.set_side(side, env);
    }

    // === Readouts (up is positive) ===

    /// Distance of the left edge from the left wall (m)
    pub fn display_x(&self, env: &Environment) -> f32 {
        env.px_to_m(self.pos.x - self.radius_px(env))
    }

    /// Height of the lower edge above the floor (m)
    pub fn height_above_floor(&self, env: &Environment) -> f32 {
        env.px_to_m(env.height - self.radius_px(env) - self.pos.y)
    }

    pub fn display_velocity(&self) -> Vec2 {
        Vec2::new(self.vel.x, -self.vel.y)
    }

    pub fn display_acceleration(&self) -> Vec2 {
        Vec2::new(self.accel.x, -self.accel.y)
    }

    /// Kinetic energy (J)
    pub fn kinetic_energy(&self) -> f32 {
        0.5 * self.mass * self.vel.length_squared()
    }

    /// Gravitational potential energy relative to the floor (J)
    pub fn potential_energy(&self, env: &Environment) -> f32 {
        self.mass * env.g * self.height_above_floor(env)
    }

    pub fn energy(&self, env: &Environment) -> f32 {
        self.kinetic_energy() + self.potential_energy(env)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PhysicsConfig;
    use proptest::prelude::*;

    /// 800x600 domain at 100 px/m with every force switched off
    fn still_env() -> Environment {
        let mut env = Environment::from_config(&PhysicsConfig::default(), 800.0, 600.0);
        env.g = 0.0;
        env.fluid_density = 0.0;
        env.friction = 0.0;
        env
    }

    fn ball(env: &Environment) -> RigidBody {
        RigidBody::new(DEFAULT_BALL_RADIUS, DEFAULT_BALL_DENSITY, env)
    }

    #[test]
    fn test_mass_follows_radius_and_density() {
        let env = still_env();
        let mut body = ball(&env);
        let expected = DEFAULT_BALL_DENSITY * 4.0 / 3.0 * std::f32::consts::PI * 0.027;
        assert!((body.mass() - expected).abs() / expected < 1e-5);

        body.set_radius(0.6, KeepConstant::Density, &env);
        assert!((body.mass() / expected - 8.0).abs() < 1e-3);
        assert_eq!(body.density(), DEFAULT_BALL_DENSITY);

        let mass = body.mass();
        body.set_radius(0.3, KeepConstant::Mass, &env);
        assert_eq!(body.mass(), mass);
        assert!((body.density() / DEFAULT_BALL_DENSITY - 8.0).abs() < 1e-3);

        body.set_density(1000.0);
        assert!((body.mass() - 1000.0 * body.volume()).abs() < 1e-4);
    }

    #[test]
    fn test_free_fall_time_and_impact_speed() {
        let mut env = still_env();
        env.g = 9.81;
        let mut body = ball(&env);
        let h = 2.0;
        body.set_height(h, &env);

        let dt = 1.0 / 600.0;
        let mut t = 0.0;
        while body.height_above_floor(&env) > 1e-4 {
            body.integrate(dt, &env);
            t += dt;
            assert!(t < 2.0, "ball never reached the floor");
        }
        let expected_t = (2.0 * h / env.g).sqrt();
        let expected_v = (2.0 * env.g * h).sqrt();
        assert!((t - expected_t).abs() < 0.01, "t = {t}, expected {expected_t}");
        assert!((body.vel.y - expected_v).abs() < 0.05, "v = {}", body.vel.y);
    }

    #[test]
    fn test_bounce_keeps_configured_energy() {
        let mut env = still_env();
        env.energy_retained = 0.36;
        let mut body = ball(&env);
        body.set_side(Side::Bottom, &env);
        body.vel.y = 5.0;
        body.prev_vel.y = 5.0;
        body.integrate(1.0 / 60.0, &env);
        assert!((body.vel.y + 5.0 * 0.6).abs() < 1e-5, "rebound {}", body.vel.y);
        assert_eq!(body.last_contact, Some(Surface::Floor));
    }

    #[test]
    fn test_bounce_velocity_formula() {
        assert!((bounce_velocity(4.0, 2.5, 0.25) + 2.0).abs() < 1e-6);
        assert!((bounce_velocity(-4.0, 0.1, 1.0) - 4.0).abs() < 1e-6);
        assert_eq!(bounce_velocity(3.0, 1.0, 0.0), 0.0);
    }

    #[test]
    fn test_penetration_correction_removes_energy() {
        let mut env = still_env();
        env.g = 10.0;
        env.energy_retained = 1.0;
        let mut body = ball(&env);
        // 0.1 m into the floor, moving down at 2 m/s
        body.pos.y = env.height - body.radius_px(&env) + 10.0;
        body.vel.y = 2.0;
        body.bounce_vertical(&env, 0.0);
        // ½v² - gh = 2 - 1 = 1  =>  |v| = sqrt(2)
        assert!((body.vel.y + 2.0f32.sqrt()).abs() < 1e-4);
        assert!((body.pos.y + body.radius_px(&env) - env.height).abs() < 1e-3);
    }

    #[test]
    fn test_elastic_bounces_never_gain_height() {
        let mut env = still_env();
        env.g = 9.81;
        env.energy_retained = 1.0;
        let mut body = ball(&env);
        let h = 2.0;
        body.set_height(h, &env);

        let mut peaks = Vec::new();
        let mut peak = 0.0f32;
        for _ in 0..60 * 20 {
            body.integrate(1.0 / 60.0, &env);
            if body.last_contact == Some(Surface::Floor) {
                peaks.push(peak);
                peak = 0.0;
            }
            peak = peak.max(body.height_above_floor(&env));
        }

        // The first entry is the initial fall
        assert!(peaks.len() > 10, "only {} bounces", peaks.len());
        for p in &peaks[1..] {
            assert!(*p <= h + 0.02, "bounced to {p} m after a drop from {h} m");
            assert!(*p > h - 0.1, "lost too much height: {p} m");
        }
    }

    #[test]
    fn test_rest_latch_after_ten_ticks() {
        let env = still_env();
        let mut body = ball(&env);
        body.set_side(Side::Bottom, &env);
        for _ in 0..SURFACE_HISTORY_LEN - 1 {
            body.integrate(1.0 / 60.0, &env);
        }
        assert_eq!(body.rest_state(), RestState::Free);
        body.integrate(1.0 / 60.0, &env);
        assert_eq!(body.rest_state(), RestState::OnFloor);
    }

    #[test]
    fn test_bouncing_ball_settles_on_floor() {
        let mut env = still_env();
        env.g = 9.81;
        let mut body = ball(&env);
        body.set_height(1.0, &env);
        for _ in 0..60 * 20 {
            body.integrate(1.0 / 60.0, &env);
        }
        assert_eq!(body.rest_state(), RestState::OnFloor);
        assert_eq!(body.vel.y, 0.0);
        assert!(body.height_above_floor(&env).abs() < 1e-3);
    }

    #[test]
    fn test_resting_vertical_velocity_stays_zero() {
        let mut env = still_env();
        env.g = 9.81;
        env.fluid_density = 997.0;
        let mut body = ball(&env);
        body.set_side(Side::Bottom, &env);
        body.rest.latch(Surface::Floor);
        body.vel = Vec2::new(1.0, -3.0);
        for _ in 0..30 {
            body.integrate(1.0 / 60.0, &env);
            assert_eq!(body.vel.y, 0.0);
            assert_eq!(body.rest_state(), RestState::OnFloor);
        }
    }

    #[test]
    fn test_friction_stops_rolling_ball() {
        let mut env = still_env();
        env.g = 9.81;
        env.friction = 0.5;
        let mut body = ball(&env);
        body.set_side(Side::Bottom, &env);
        body.rest.latch(Surface::Floor);
        body.vel.x = 1.0;
        // μg ≈ 4.9 m/s², stops within a quarter second
        for _ in 0..30 {
            body.integrate(1.0 / 60.0, &env);
            assert!(body.vel.x >= 0.0);
        }
        assert_eq!(body.vel.x, 0.0);
    }

    #[test]
    fn test_buoyant_ball_rises() {
        let mut env = still_env();
        env.g = 9.81;
        env.fluid_density = 997.0;
        let mut body = ball(&env);
        body.set_density(240.0);
        let start = body.pos.y;
        for _ in 0..10 {
            body.integrate(1.0 / 60.0, &env);
        }
        assert!(body.vel.y < 0.0);
        assert!(body.pos.y < start);
    }

    #[test]
    fn test_ceiling_bounce_and_rest() {
        let mut env = still_env();
        env.bounce_on_ceiling = true;
        let mut body = ball(&env);
        body.set_side(Side::Top, &env);
        body.vel.y = -2.0;
        body.integrate(1.0 / 60.0, &env);
        assert!(body.vel.y > 0.0);
        assert_eq!(body.last_contact, Some(Surface::Ceiling));

        let mut body = ball(&env);
        body.set_side(Side::Top, &env);
        for _ in 0..SURFACE_HISTORY_LEN {
            body.integrate(1.0 / 60.0, &env);
        }
        assert_eq!(body.rest_state(), RestState::OnCeiling);
    }

    #[test]
    fn test_wall_bounce_reverses_and_never_penetrates() {
        let mut env = still_env();
        env.energy_retained = 1.0;
        let mut body = ball(&env);
        body.vel.x = 30.0;
        for _ in 0..120 {
            body.integrate(1.0 / 60.0, &env);
            let r = body.radius_px(&env);
            assert!(body.pos.x + r <= env.width + 1e-3);
            assert!(body.pos.x - r >= -1e-3);
        }
    }

    #[test]
    fn test_zero_and_negative_dt_do_not_move() {
        let mut env = still_env();
        env.g = 9.81;
        let mut body = ball(&env);
        body.vel = Vec2::new(1.0, 1.0);
        body.prev_vel = body.vel;
        let pos = body.pos;
        body.integrate(-0.5, &env);
        body.integrate(f32::NAN, &env);
        assert_eq!(body.pos, pos);
        assert_eq!(body.vel, Vec2::new(1.0, 1.0));
    }

    #[test]
    fn test_rescale_keeps_physical_distances() {
        let env = still_env();
        let mut body = ball(&env);
        body.set_height(1.5, &env);
        let x = body.display_x(&env);
        let mut zoomed = env.clone();
        zoomed.zoom = 0.5;
        body.rescale(&env, &zoomed);
        assert!((body.height_above_floor(&zoomed) - 1.5).abs() < 1e-4);
        assert!((body.display_x(&zoomed) - x).abs() < 1e-4);
    }

    #[test]
    fn test_energy_readouts() {
        let mut env = still_env();
        env.g = 10.0;
        let mut body = ball(&env);
        body.set_height(2.0, &env);
        body.vel = Vec2::new(3.0, 4.0);
        let m = body.mass();
        assert!((body.kinetic_energy() - 12.5 * m).abs() / m < 1e-4);
        assert!((body.potential_energy(&env) - 20.0 * m).abs() / m < 1e-3);
        assert_eq!(body.display_velocity(), Vec2::new(3.0, -4.0));
    }

    proptest! {
        #[test]
        fn prop_drag_never_reverses_velocity(
            v in -50.0f32..50.0,
            prev in -50.0f32..50.0,
            dt in 0.0f32..0.5,
            fluid in 0.0f32..5000.0,
        ) {
            let mut env = still_env();
            env.fluid_density = fluid;
            let body = ball(&env);
            let next = decelerate(v, body.drag_decel(prev, &env), dt);
            prop_assert!(next == 0.0 || sign(next) == sign(v));
            prop_assert!(next.abs() <= v.abs());
        }
    }
}
