//! Physical environment the ball moves through
//!
//! Rebuilt from the validated config at each tick boundary and passed by
//! reference into every computation; nothing inside a tick mutates it.

use serde::{Deserialize, Serialize};

use crate::config::PhysicsConfig;

/// Horizontal surfaces a body can rest against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Surface {
    Floor,
    Ceiling,
}

/// Domain boundaries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Side {
    Bottom,
    Top,
    Left,
    Right,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Environment {
    /// Gravitational acceleration (m/s², positive is down the screen)
    pub g: f32,
    /// Fluid density (kg/m³)
    pub fluid_density: f32,
    pub drag_coefficient: f32,
    pub friction: f32,
    /// Domain size in pixels
    pub width: f32,
    pub height: f32,
    pub bounce_on_ceiling: bool,
    /// Fraction of axis kinetic energy kept per bounce, in [0, 1]
    pub energy_retained: f32,
    /// Metres per pixel at zoom 1.0
    pub scale: f32,
    pub zoom: f32,
}

impl Environment {
    pub fn from_config(config: &PhysicsConfig, width: f32, height: f32) -> Self {
        Self {
            g: config.gravity,
            fluid_density: config.fluid_density,
            drag_coefficient: config.drag_coefficient,
            friction: config.friction,
            width,
            height,
            bounce_on_ceiling: config.bounce_on_ceiling,
            energy_retained: config.energy_retained().clamp(0.0, 1.0),
            scale: config.scale,
            zoom: config.zoom,
        }
    }

    #[inline]
    pub fn pixels_per_metre(&self) -> f32 {
        self.zoom / self.scale
    }

    #[inline]
    pub fn px_to_m(&self, px: f32) -> f32 {
        px * self.scale / self.zoom
    }

    #[inline]
    pub fn m_to_px(&self, m: f32) -> f32 {
        m * self.zoom / self.scale
    }

    /// Domain area in square pixels
    pub fn area(&self) -> f32 {
        self.width * self.height
    }
}
