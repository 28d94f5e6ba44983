//! Per-frame simulation tick and host commands
//!
//! The host calls `tick` once per animation frame with the wall-clock
//! reading and whatever input arrived since the last frame. Configuration
//! and pointer input are applied at the tick boundary, then the ball and
//! the particle field are advanced by the measured delta.

use glam::Vec2;

use super::environment::Environment;
use super::particles::FieldStats;
use super::state::SimState;
use crate::config::{ConfigChanges, ConfigInput, Field, apply_config};

/// Input gathered by the host for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Pointer pressed at this position (pixels)
    pub pointer_down: Option<Vec2>,
    /// Latest pointer position (pixels)
    pub pointer_move: Option<Vec2>,
    /// Pointer released
    pub pointer_up: bool,
    /// Pause toggle
    pub pause: bool,
    /// Pending configuration edits
    pub config: Option<ConfigInput>,
}

/// What a tick did, for the host to reflect back into its UI
#[derive(Debug, Clone, Default)]
pub struct TickReport {
    /// Seconds advanced this tick (zero while paused)
    pub dt: f32,
    pub config: ConfigChanges,
    pub particles: FieldStats,
    /// The ball struck a surface and `pause_on_surface` paused the run
    pub paused_on_surface: bool,
}

/// Advance the simulation to wall-clock time `now` (seconds)
pub fn tick(state: &mut SimState, input: &TickInput, now: f64) -> TickReport {
    let mut report = TickReport::default();

    if input.pause {
        toggle_pause(state);
    }

    let dt = state.clock.advance(now, state.paused);

    // Configuration lands before any physics so the whole tick sees one environment
    if let Some(proposed) = &input.config {
        report.config = apply_config_input(state, proposed);
    }

    // Pointer input is honoured even while paused
    if let Some(pos) = input.pointer_down {
        state.grab.try_grab(&mut state.body, pos, &state.env);
    }
    if let Some(pos) = input.pointer_move {
        state.grab.set_pointer(pos);
    }

    if state.grab.is_held() {
        state.grab.follow(&mut state.body, &state.env);
    } else if !state.paused {
        state.body.integrate(dt, &state.env);
        if state.config.pause_on_surface && state.body.last_contact.is_some() {
            log::info!("Paused on contact with {:?}", state.body.last_contact);
            state.paused = true;
            report.paused_on_surface = true;
        }
    }

    if input.pointer_up {
        state.grab.release(&mut state.body, &state.env);
    }

    if state.paused {
        return report;
    }

    report.dt = dt;
    report.particles = state.field.tick(dt, &state.well);
    let sample = state.sample();
    state.history.record(state.clock.runtime(), sample);

    report
}

/// Validate `proposed` against the current config and push the result into
/// the environment and ball
fn apply_config_input(state: &mut SimState, proposed: &ConfigInput) -> ConfigChanges {
    let (next, mut changes) = apply_config(&state.config, proposed);
    let old_env = state.env.clone();
    state.config = next;
    state.env = Environment::from_config(&state.config, old_env.width, old_env.height);

    if changes.is_changed(Field::Zoom) {
        state.body.rescale(&old_env, &state.env);
    }
    if changes.is_changed(Field::MaterialDensity) {
        state.body.set_density(state.config.material_density);
    }
    if changes.is_changed(Field::BallRadius) {
        state
            .body
            .set_radius(state.config.ball_radius, state.config.keep_constant, &state.env);
        // Keeping mass moves the density off the value that was typed, but
        // never outside the material bounds
        let density = Field::MaterialDensity.clamp(state.body.density());
        if density != state.body.density() {
            log::warn!(
                "Density {} after radius change is out of range, using {}",
                state.body.density(),
                density
            );
            state.body.set_density(density);
            changes.write_back.retain(|(field, _)| *field != Field::MaterialDensity);
            changes.write_back.push((Field::MaterialDensity, density));
        }
        state.config.material_density = density;
    }
    if changes.is_changed(Field::Zoom) || changes.is_changed(Field::BallRadius) {
        state.body.clamp_to_bounds(&state.env);
    }
    if changes.invalidates_rest() {
        state.body.remove_from_surface();
    }
    if changes.is_changed(Field::ChartMaxPoints) || proposed.chart_limit.is_some() {
        state.history.set_limit(SimState::history_limit(&state.config));
    }
    changes
}

// === Commands ===

pub fn pause(state: &mut SimState) {
    if !state.paused {
        log::info!("Simulation paused");
        state.paused = true;
    }
}

pub fn resume(state: &mut SimState) {
    if state.paused {
        log::info!("Simulation resumed");
        state.paused = false;
    }
}

pub fn toggle_pause(state: &mut SimState) {
    if state.paused {
        resume(state);
    } else {
        pause(state);
    }
}

/// Recentre and stop the ball, restart the reset timer and clear history
pub fn reset(state: &mut SimState) {
    log::info!("Simulation reset");
    state.grab.cancel();
    state.body.reset(&state.env);
    state.clock.mark_reset();
    state.history.clear();
}

/// Clear recorded history only
pub fn reset_data(state: &mut SimState) {
    log::info!("History cleared ({} points)", state.history.len());
    state.history.clear();
}

/// Teleport the ball so its lower edge is `height` metres above the floor
pub fn set_height(state: &mut SimState, height: f32) {
    if state.config.reset_on_set_height {
        reset(state);
    }
    state.body.set_height(height, &state.env);
    log::debug!("Ball height set to {:.3} m", state.body.height_above_floor(&state.env));
}
