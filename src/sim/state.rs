//! Simulation state and read-only snapshots
//!
//! Everything a tick reads or writes lives in `SimState`. Hosts render from
//! the snapshot types rather than reaching into the state directly.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::body::RigidBody;
use super::clock::Clock;
use super::environment::Environment;
use super::grab::GrabController;
use super::history::{History, Sample};
use super::particles::ParticleField;
use super::rest::RestState;
use super::well::GravityWell;
use crate::config::PhysicsConfig;

/// Ball readouts (metres, up is positive)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BallSnapshot {
    /// Left edge distance from the left wall
    pub x: f32,
    /// Lower edge height above the floor
    pub y: f32,
    pub velocity: Vec2,
    pub acceleration: Vec2,
    pub radius: f32,
    pub mass: f32,
    pub density: f32,
    pub volume: f32,
    pub rest: RestState,
    pub held: bool,
    pub kinetic_energy: f32,
    pub potential_energy: f32,
    pub total_energy: f32,
    /// Seconds of unpaused simulation
    pub runtime: f64,
    pub time_since_reset: f64,
    pub paused: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParticleView {
    pub pos: Vec2,
    pub radius: f32,
}

/// Particle field readouts (pixels)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParticleSnapshot {
    pub well_pos: Vec2,
    pub well_radius: f32,
    pub particles: Vec<ParticleView>,
    pub absorbed_total: u64,
    pub escaped_total: u64,
}

/// Complete simulation state
#[derive(Debug, Clone)]
pub struct SimState {
    /// Seed for the particle field RNG
    pub seed: u64,
    /// Validated configuration the environment was built from
    pub config: PhysicsConfig,
    pub env: Environment,
    pub body: RigidBody,
    pub grab: GrabController,
    pub clock: Clock,
    pub paused: bool,
    pub well: GravityWell,
    pub field: ParticleField,
    pub history: History,
}

impl SimState {
    /// Fresh state for a `width` x `height` pixel domain with default config
    pub fn new(width: f32, height: f32, seed: u64, now: f64) -> Self {
        Self::with_config(PhysicsConfig::default(), width, height, seed, now)
    }

    pub fn with_config(config: PhysicsConfig, width: f32, height: f32, seed: u64, now: f64) -> Self {
        let config = config.clamped();
        let env = Environment::from_config(&config, width, height);
        let body = RigidBody::new(config.ball_radius, config.material_density, &env);
        let mut history = History::new();
        history.set_limit(Self::history_limit(&config));

        Self {
            seed,
            body,
            grab: GrabController::new(),
            clock: Clock::new(now),
            paused: false,
            well: GravityWell::for_domain(width, height),
            field: ParticleField::new(width, height, seed),
            history,
            env,
            config,
        }
    }

    pub(crate) fn history_limit(config: &PhysicsConfig) -> Option<usize> {
        config.chart_limit.then_some(config.chart_max_points)
    }

    pub fn width(&self) -> f32 {
        self.env.width
    }

    pub fn height(&self) -> f32 {
        self.env.height
    }

    /// Current readouts in the "up is positive" convention
    pub fn sample(&self) -> Sample {
        let vel = self.body.display_velocity();
        let accel = self.body.display_acceleration();
        Sample {
            position: [self.body.display_x(&self.env), self.body.height_above_floor(&self.env)],
            velocity: [vel.x, vel.y],
            acceleration: [accel.x, accel.y],
        }
    }

    pub fn ball_snapshot(&self) -> BallSnapshot {
        let kinetic = self.body.kinetic_energy();
        let potential = self.body.potential_energy(&self.env);
        BallSnapshot {
            x: self.body.display_x(&self.env),
            y: self.body.height_above_floor(&self.env),
            velocity: self.body.display_velocity(),
            acceleration: self.body.display_acceleration(),
            radius: self.body.radius(),
            mass: self.body.mass(),
            density: self.body.density(),
            volume: self.body.volume(),
            rest: self.body.rest_state(),
            held: self.grab.is_held(),
            kinetic_energy: kinetic,
            potential_energy: potential,
            total_energy: kinetic + potential,
            runtime: self.clock.runtime(),
            time_since_reset: self.clock.time_since_reset(),
            paused: self.paused,
        }
    }

    pub fn particle_snapshot(&self) -> ParticleSnapshot {
        ParticleSnapshot {
            well_pos: self.well.pos,
            well_radius: self.well.radius,
            particles: self
                .field
                .particles()
                .iter()
                .map(|p| ParticleView { pos: p.pos, radius: p.radius })
                .collect(),
            absorbed_total: self.field.absorbed_total(),
            escaped_total: self.field.escaped_total(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state_centres_ball() {
        let state = SimState::new(800.0, 600.0, 7, 0.0);
        assert_eq!(state.body.pos, Vec2::new(400.0, 300.0));
        assert_eq!(state.body.rest_state(), RestState::Free);
        assert!(!state.paused);
        assert!(state.field.is_empty());
        assert!(state.history.is_empty());
    }

    #[test]
    fn test_with_config_clamps() {
        let config = PhysicsConfig {
            gravity: -3.0,
            ball_radius: 4.0,
            ..Default::default()
        };
        let state = SimState::with_config(config, 800.0, 600.0, 1, 0.0);
        assert_eq!(state.config.gravity, 0.0);
        assert_eq!(state.env.g, 0.0);
        assert_eq!(state.body.radius(), 1.0);
    }

    #[test]
    fn test_ball_snapshot_readouts() {
        let state = SimState::new(800.0, 600.0, 7, 0.0);
        let snap = state.ball_snapshot();
        // Centre at 300 px, radius 30 px, 100 px/m
        assert!((snap.y - 2.7).abs() < 1e-4);
        assert!((snap.x - 3.7).abs() < 1e-4);
        assert_eq!(snap.kinetic_energy, 0.0);
        assert!((snap.total_energy - snap.mass * 9.81 * 2.7).abs() < 1e-2);
        let json = serde_json::to_string(&snap).expect("snapshot serializes");
        assert!(json.contains("\"rest\":\"Free\""));
    }

    #[test]
    fn test_history_limit_follows_config() {
        let config = PhysicsConfig {
            chart_limit: true,
            chart_max_points: 4,
            ..Default::default()
        };
        let state = SimState::with_config(config, 800.0, 600.0, 1, 0.0);
        assert_eq!(state.history.limit(), Some(4));
    }
}
