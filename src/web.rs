//! Browser bindings
//!
//! The page owns the canvas, the controls and the animation frame loop. It
//! forwards pointer events and control edits here and draws from the JSON
//! snapshots.

use glam::Vec2;
use wasm_bindgen::prelude::*;

use crate::config::{ConfigInput, PhysicsConfig};
use crate::platform::{SystemTime, TimeSource, init_logging};
use crate::sim::{self, SimState, TickInput};

fn to_js_err(e: serde_json::Error) -> JsValue {
    JsValue::from_str(&e.to_string())
}

#[wasm_bindgen]
pub struct DropLab {
    state: SimState,
    time: SystemTime,
    /// Input gathered between animation frames
    pending: TickInput,
}

#[wasm_bindgen]
impl DropLab {
    /// Create a lab for a canvas of `width` x `height` pixels
    ///
    /// `config_json` may be empty for defaults.
    #[wasm_bindgen(constructor)]
    pub fn new(width: f32, height: f32, config_json: &str) -> Result<DropLab, JsValue> {
        init_logging();
        let config = if config_json.trim().is_empty() {
            PhysicsConfig::default()
        } else {
            PhysicsConfig::from_json(config_json).map_err(to_js_err)?
        };
        let time = SystemTime::new();
        let seed = js_sys::Date::now() as u64;
        log::info!("Drop Lab starting ({}x{}, seed {})", width, height, seed);
        Ok(DropLab {
            state: SimState::with_config(config, width, height, seed, time.now_secs()),
            time,
            pending: TickInput::default(),
        })
    }

    pub fn pointer_down(&mut self, x: f32, y: f32) {
        self.pending.pointer_down = Some(Vec2::new(x, y));
    }

    pub fn pointer_move(&mut self, x: f32, y: f32) {
        self.pending.pointer_move = Some(Vec2::new(x, y));
    }

    pub fn pointer_up(&mut self) {
        self.pending.pointer_up = true;
    }

    /// Queue control edits (a JSON `ConfigInput`) for the next frame
    pub fn set_config(&mut self, input_json: &str) -> Result<(), JsValue> {
        let input = ConfigInput::from_json(input_json).map_err(to_js_err)?;
        self.pending.config = Some(match self.pending.config.take() {
            Some(queued) => queued.merged(input),
            None => input,
        });
        Ok(())
    }

    /// Advance one animation frame; returns write-back values as JSON
    pub fn frame(&mut self) -> Result<String, JsValue> {
        let input = std::mem::take(&mut self.pending);
        let report = sim::tick(&mut self.state, &input, self.time.now_secs());
        serde_json::to_string(&report.config.write_back).map_err(to_js_err)
    }

    pub fn pause(&mut self) {
        sim::pause(&mut self.state);
    }

    pub fn resume(&mut self) {
        sim::resume(&mut self.state);
    }

    pub fn is_paused(&self) -> bool {
        self.state.paused
    }

    pub fn reset(&mut self) {
        sim::reset(&mut self.state);
    }

    pub fn reset_data(&mut self) {
        sim::reset_data(&mut self.state);
    }

    pub fn set_height(&mut self, height: f32) {
        sim::set_height(&mut self.state, height);
    }

    /// Ball position in canvas pixels and radius, for drawing
    pub fn ball_px(&self) -> Vec<f32> {
        let body = &self.state.body;
        vec![body.pos.x, body.pos.y, body.radius_px(&self.state.env)]
    }

    pub fn ball_json(&self) -> Result<String, JsValue> {
        serde_json::to_string(&self.state.ball_snapshot()).map_err(to_js_err)
    }

    pub fn particles_json(&self) -> Result<String, JsValue> {
        serde_json::to_string(&self.state.particle_snapshot()).map_err(to_js_err)
    }

    pub fn history_json(&self) -> Result<String, JsValue> {
        serde_json::to_string(&self.state.history).map_err(to_js_err)
    }

    pub fn config_json(&self) -> Result<String, JsValue> {
        self.state.config.to_json().map_err(to_js_err)
    }
}
