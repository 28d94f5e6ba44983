//! Simulation module
//!
//! All physics lives here. Nothing in this module touches the host:
//! - Time arrives as a wall-clock reading passed into `tick`
//! - Configuration arrives as raw text validated at the tick boundary
//! - Particle randomness comes from a seeded RNG
//! - No rendering or platform dependencies

pub mod body;
pub mod clock;
pub mod environment;
pub mod grab;
pub mod history;
pub mod particles;
pub mod rest;
pub mod state;
pub mod tick;
pub mod well;

pub use body::{RigidBody, bounce_velocity, decelerate};
pub use clock::Clock;
pub use environment::{Environment, Side, Surface};
pub use grab::{GrabController, release_velocity};
pub use history::{Axis, DataPoint, History, PlotKind, Sample};
pub use particles::{FieldStats, Particle, ParticleField, SpawnEdge, SpawnTuning};
pub use rest::{RestState, RestTracker};
pub use state::{BallSnapshot, ParticleSnapshot, ParticleView, SimState};
pub use tick::{
    TickInput, TickReport, pause, reset, reset_data, resume, set_height, tick, toggle_pause,
};
pub use well::GravityWell;
