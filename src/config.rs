//! Physical constants, presets and input validation
//!
//! The UI hands over raw text for every numeric field. Text is parsed,
//! rejected if it is not a number, and clamped into the field's bounds.
//! Validation is a pure function of the current config and the proposed
//! input so it can run outside the tick as well as inside it.

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::{ConfigError, ConfigResult};

/// A user-editable numeric field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Field {
    Gravity,
    FluidDensity,
    DragCoefficient,
    Friction,
    EnergyLost,
    BallRadius,
    MaterialDensity,
    Zoom,
    ChartMaxPoints,
}

impl Field {
    pub const ALL: [Field; 9] = [
        Field::Gravity,
        Field::FluidDensity,
        Field::DragCoefficient,
        Field::Friction,
        Field::EnergyLost,
        Field::BallRadius,
        Field::MaterialDensity,
        Field::Zoom,
        Field::ChartMaxPoints,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Field::Gravity => "gravity",
            Field::FluidDensity => "fluid density",
            Field::DragCoefficient => "drag coefficient",
            Field::Friction => "friction coefficient",
            Field::EnergyLost => "energy lost on bounce",
            Field::BallRadius => "ball radius",
            Field::MaterialDensity => "material density",
            Field::Zoom => "zoom",
            Field::ChartMaxPoints => "chart max data points",
        }
    }

    /// Inclusive `(lower, upper)` bounds
    pub fn bounds(&self) -> (f32, f32) {
        match self {
            Field::Gravity => (0.0, 100.0),
            Field::FluidDensity => (0.0, 5000.0),
            Field::DragCoefficient => (0.0, 2.0),
            Field::Friction => (0.0, 1.5),
            Field::EnergyLost => (0.0, 100.0),
            Field::BallRadius => (0.1, 1.0),
            Field::MaterialDensity => (100.0, 20000.0),
            Field::Zoom => (0.1, 5.0),
            Field::ChartMaxPoints => (1.0, 100000.0),
        }
    }

    /// Clamp a value into this field's bounds
    pub fn clamp(&self, value: f32) -> f32 {
        let (lower, upper) = self.bounds();
        if value <= lower {
            lower
        } else if value >= upper {
            upper
        } else {
            value
        }
    }
}

/// Parse raw text as a finite number
pub fn parse_field(field: Field, text: &str) -> ConfigResult<f32> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(ConfigError::Empty { field });
    }
    match trimmed.parse::<f32>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(ConfigError::NotANumber {
            field,
            input: text.to_string(),
        }),
    }
}

/// Outcome of validating one field
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldUpdate {
    /// Value to store (already clamped)
    pub value: f32,
    /// True if clamping altered the parsed number
    pub corrected: bool,
}

/// Parse and clamp one field
pub fn validate_field(field: Field, text: &str) -> ConfigResult<FieldUpdate> {
    let parsed = parse_field(field, text)?;
    let value = field.clamp(parsed);
    Ok(FieldUpdate {
        value,
        corrected: value != parsed,
    })
}

/// Planet presets (surface gravity plus atmosphere)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Planet {
    EmptySpace,
    Moon,
    Mercury,
    Venus,
    Uranus,
    Earth,
    Saturn,
    Neptune,
    Jupiter,
}

impl Planet {
    pub fn as_str(&self) -> &'static str {
        match self {
            Planet::EmptySpace => "Empty space",
            Planet::Moon => "Moon",
            Planet::Mercury => "Mercury",
            Planet::Venus => "Venus",
            Planet::Uranus => "Uranus",
            Planet::Earth => "Earth",
            Planet::Saturn => "Saturn",
            Planet::Neptune => "Neptune",
            Planet::Jupiter => "Jupiter",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "emptyspace" | "empty space" | "space" => Some(Planet::EmptySpace),
            "moon" => Some(Planet::Moon),
            "mercury" => Some(Planet::Mercury),
            "venus" => Some(Planet::Venus),
            "uranus" => Some(Planet::Uranus),
            "earth" => Some(Planet::Earth),
            "saturn" => Some(Planet::Saturn),
            "neptune" => Some(Planet::Neptune),
            "jupiter" => Some(Planet::Jupiter),
            _ => None,
        }
    }

    /// Surface gravity (m/s²)
    pub fn gravity(&self) -> f32 {
        match self {
            Planet::EmptySpace => 0.0,
            Planet::Moon => 1.62,
            Planet::Mercury => 3.71,
            Planet::Venus => 8.87,
            Planet::Uranus => 9.0,
            Planet::Earth => 9.81,
            Planet::Saturn => 10.44,
            Planet::Neptune => 11.15,
            Planet::Jupiter => 24.79,
        }
    }

    pub fn atmosphere(&self) -> Fluid {
        match self {
            Planet::EmptySpace | Planet::Moon | Planet::Mercury => Fluid::Vacuum,
            Planet::Venus => Fluid::VenusAtmosphere,
            Planet::Uranus => Fluid::UranusAtmosphere,
            Planet::Earth => Fluid::Air,
            Planet::Saturn => Fluid::SaturnAtmosphere,
            Planet::Neptune => Fluid::NeptuneAtmosphere,
            Planet::Jupiter => Fluid::JupiterAtmosphere,
        }
    }
}

/// Fluid presets the ball can be immersed in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Fluid {
    Vacuum,
    Air,
    Water,
    VenusAtmosphere,
    UranusAtmosphere,
    SaturnAtmosphere,
    NeptuneAtmosphere,
    JupiterAtmosphere,
}

impl Fluid {
    pub fn as_str(&self) -> &'static str {
        match self {
            Fluid::Vacuum => "Vacuum",
            Fluid::Air => "Air",
            Fluid::Water => "Water",
            Fluid::VenusAtmosphere => "Venus atmosphere",
            Fluid::UranusAtmosphere => "Uranus atmosphere",
            Fluid::SaturnAtmosphere => "Saturn atmosphere",
            Fluid::NeptuneAtmosphere => "Neptune atmosphere",
            Fluid::JupiterAtmosphere => "Jupiter atmosphere",
        }
    }

    /// Accepts fluid names and planet names (meaning that planet's atmosphere)
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "vacuum" => Some(Fluid::Vacuum),
            "air" => Some(Fluid::Air),
            "water" => Some(Fluid::Water),
            other => Planet::from_str(other.trim_end_matches(" atmosphere")).map(|p| p.atmosphere()),
        }
    }

    /// Density (kg/m³)
    pub fn density(&self) -> f32 {
        match self {
            Fluid::Vacuum => 0.0,
            Fluid::Air => 1.23,
            Fluid::Water => 997.0,
            Fluid::VenusAtmosphere => 67.0,
            Fluid::UranusAtmosphere => 0.45,
            Fluid::SaturnAtmosphere => 0.13,
            Fluid::NeptuneAtmosphere => 1.64,
            Fluid::JupiterAtmosphere => 0.16,
        }
    }
}

/// Ball material presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Material {
    Cork,
    Ice,
    Yew,
    Water,
    Concrete,
    Titanium,
    Steel,
    Iron,
    Gold,
}

impl Material {
    pub fn as_str(&self) -> &'static str {
        match self {
            Material::Cork => "Cork",
            Material::Ice => "Ice",
            Material::Yew => "Yew",
            Material::Water => "Water",
            Material::Concrete => "Concrete",
            Material::Titanium => "Titanium",
            Material::Steel => "Steel",
            Material::Iron => "Iron",
            Material::Gold => "Gold",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "cork" => Some(Material::Cork),
            "ice" => Some(Material::Ice),
            "yew" | "woodyew" | "wood" => Some(Material::Yew),
            "water" => Some(Material::Water),
            "concrete" => Some(Material::Concrete),
            "titanium" => Some(Material::Titanium),
            "steel" => Some(Material::Steel),
            "iron" => Some(Material::Iron),
            "gold" => Some(Material::Gold),
            _ => None,
        }
    }

    /// Density (kg/m³)
    pub fn density(&self) -> f32 {
        match self {
            Material::Cork => 240.0,
            Material::Ice => 900.0,
            Material::Yew => 670.0,
            Material::Water => 997.0,
            Material::Concrete => 2400.0,
            Material::Titanium => 4540.0,
            Material::Steel => 7850.0,
            Material::Iron => 10000.0,
            Material::Gold => 19300.0,
        }
    }
}

/// Which property stays fixed when the ball radius changes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum KeepConstant {
    /// Mass is recomputed from the new volume
    #[default]
    Density,
    /// Density is recomputed from the new volume
    Mass,
}

/// Validated simulation configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    // === Environment ===
    /// Gravitational acceleration (m/s²)
    pub gravity: f32,
    /// Fluid density (kg/m³)
    pub fluid_density: f32,
    /// Selected fluid preset, None when the density was typed in
    pub fluid: Option<Fluid>,
    pub drag_coefficient: f32,
    pub friction: f32,
    /// Percentage of axis kinetic energy lost per bounce
    pub energy_lost_percent: f32,
    pub bounce_on_ceiling: bool,
    /// Metres per pixel at zoom 1.0
    pub scale: f32,
    pub zoom: f32,

    // === Ball ===
    /// Radius (m)
    pub ball_radius: f32,
    /// Density (kg/m³)
    pub material_density: f32,
    pub keep_constant: KeepConstant,

    // === Session behaviour ===
    /// Pause when the ball strikes the floor or ceiling
    pub pause_on_surface: bool,
    /// Run a full reset before `set_height`
    pub reset_on_set_height: bool,

    // === History ===
    /// Cap the recorded history at `chart_max_points`
    pub chart_limit: bool,
    pub chart_max_points: usize,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: Planet::Earth.gravity(),
            fluid_density: Fluid::Air.density(),
            fluid: Some(Fluid::Air),
            drag_coefficient: 0.47,
            friction: 0.2,
            energy_lost_percent: 50.0,
            bounce_on_ceiling: false,
            scale: DEFAULT_SCALE,
            zoom: 1.0,

            ball_radius: DEFAULT_BALL_RADIUS,
            material_density: DEFAULT_BALL_DENSITY,
            keep_constant: KeepConstant::Density,

            pause_on_surface: false,
            reset_on_set_height: false,

            chart_limit: false,
            chart_max_points: 10,
        }
    }
}

impl PhysicsConfig {
    /// Fraction of axis kinetic energy kept on each bounce
    pub fn energy_retained(&self) -> f32 {
        1.0 - self.energy_lost_percent / 100.0
    }

    /// Current value of a numeric field
    pub fn get(&self, field: Field) -> f32 {
        match field {
            Field::Gravity => self.gravity,
            Field::FluidDensity => self.fluid_density,
            Field::DragCoefficient => self.drag_coefficient,
            Field::Friction => self.friction,
            Field::EnergyLost => self.energy_lost_percent,
            Field::BallRadius => self.ball_radius,
            Field::MaterialDensity => self.material_density,
            Field::Zoom => self.zoom,
            Field::ChartMaxPoints => self.chart_max_points as f32,
        }
    }

    fn set(&mut self, field: Field, value: f32) {
        match field {
            Field::Gravity => self.gravity = value,
            Field::FluidDensity => self.fluid_density = value,
            Field::DragCoefficient => self.drag_coefficient = value,
            Field::Friction => self.friction = value,
            Field::EnergyLost => self.energy_lost_percent = value,
            Field::BallRadius => self.ball_radius = value,
            Field::MaterialDensity => self.material_density = value,
            Field::Zoom => self.zoom = value,
            Field::ChartMaxPoints => self.chart_max_points = value.round() as usize,
        }
    }

    /// Clamp every numeric field into bounds
    pub fn clamped(mut self) -> Self {
        for field in Field::ALL {
            let value = self.get(field);
            let fixed = if value.is_finite() {
                field.clamp(value)
            } else {
                Self::default().get(field)
            };
            self.set(field, fixed);
        }
        if !(self.scale.is_finite() && self.scale > 0.0) {
            self.scale = DEFAULT_SCALE;
        }
        self
    }

    /// Load from JSON; missing keys take defaults, numbers are clamped
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str::<Self>(json).map(Self::clamped)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Raw per-tick configuration snapshot from the UI
///
/// Every field is optional; `None` means "no edit pending".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfigInput {
    pub gravity: Option<String>,
    pub fluid_density: Option<String>,
    pub drag_coefficient: Option<String>,
    pub friction: Option<String>,
    pub energy_lost_percent: Option<String>,
    pub ball_radius: Option<String>,
    pub material_density: Option<String>,
    pub zoom: Option<String>,
    pub chart_max_points: Option<String>,
    pub bounce_on_ceiling: Option<bool>,
    /// Fluid preset name (fluid or planet)
    pub fluid: Option<String>,
    pub keep_constant: Option<KeepConstant>,
    pub pause_on_surface: Option<bool>,
    pub reset_on_set_height: Option<bool>,
    pub chart_limit: Option<bool>,
}

impl ConfigInput {
    /// Select a planet: sets gravity and the matching atmosphere
    pub fn with_planet(mut self, planet: Planet) -> Self {
        self.gravity = Some(planet.gravity().to_string());
        self.fluid = Some(planet.as_str().to_string());
        self.fluid_density = Some(planet.atmosphere().density().to_string());
        self
    }

    /// Select a material preset
    pub fn with_material(mut self, material: Material) -> Self {
        self.material_density = Some(material.density().to_string());
        self
    }

    /// Parse a control snapshot; absent keys mean no edit
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Combine with a later snapshot; edits in `later` win
    pub fn merged(self, later: ConfigInput) -> Self {
        ConfigInput {
            gravity: later.gravity.or(self.gravity),
            fluid_density: later.fluid_density.or(self.fluid_density),
            drag_coefficient: later.drag_coefficient.or(self.drag_coefficient),
            friction: later.friction.or(self.friction),
            energy_lost_percent: later.energy_lost_percent.or(self.energy_lost_percent),
            ball_radius: later.ball_radius.or(self.ball_radius),
            material_density: later.material_density.or(self.material_density),
            zoom: later.zoom.or(self.zoom),
            chart_max_points: later.chart_max_points.or(self.chart_max_points),
            bounce_on_ceiling: later.bounce_on_ceiling.or(self.bounce_on_ceiling),
            fluid: later.fluid.or(self.fluid),
            keep_constant: later.keep_constant.or(self.keep_constant),
            pause_on_surface: later.pause_on_surface.or(self.pause_on_surface),
            reset_on_set_height: later.reset_on_set_height.or(self.reset_on_set_height),
            chart_limit: later.chart_limit.or(self.chart_limit),
        }
    }

    fn text(&self, field: Field) -> Option<&str> {
        match field {
            Field::Gravity => self.gravity.as_deref(),
            Field::FluidDensity => self.fluid_density.as_deref(),
            Field::DragCoefficient => self.drag_coefficient.as_deref(),
            Field::Friction => self.friction.as_deref(),
            Field::EnergyLost => self.energy_lost_percent.as_deref(),
            Field::BallRadius => self.ball_radius.as_deref(),
            Field::MaterialDensity => self.material_density.as_deref(),
            Field::Zoom => self.zoom.as_deref(),
            Field::ChartMaxPoints => self.chart_max_points.as_deref(),
        }
    }
}

/// What `apply_config` did
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigChanges {
    /// Fields whose stored value changed
    pub changed: Vec<Field>,
    /// Values the UI should write back over the text it sent
    pub write_back: Vec<(Field, f32)>,
    /// Text that could not be parsed (previous value kept)
    pub rejected: Vec<ConfigError>,
    pub ceiling_toggled: bool,
}

impl ConfigChanges {
    pub fn is_changed(&self, field: Field) -> bool {
        self.changed.contains(&field)
    }

    pub fn any(&self) -> bool {
        !self.changed.is_empty() || self.ceiling_toggled
    }

    /// True if a body latched to a surface must be freed
    pub fn invalidates_rest(&self) -> bool {
        self.ceiling_toggled
            || self.changed.iter().any(|f| {
                matches!(
                    f,
                    Field::Gravity
                        | Field::FluidDensity
                        | Field::MaterialDensity
                        | Field::BallRadius
                        | Field::Zoom
                )
            })
    }
}

/// Validate a proposed input against the current config
///
/// Invalid text keeps the previous value; out-of-range numbers are clamped
/// and reported for write-back. Never fails.
pub fn apply_config(current: &PhysicsConfig, proposed: &ConfigInput) -> (PhysicsConfig, ConfigChanges) {
    let mut next = current.clone();
    let mut changes = ConfigChanges::default();

    // A fluid preset supplies the density unless the user typed one
    if let Some(name) = proposed.fluid.as_deref() {
        match Fluid::from_str(name) {
            Some(fluid) => {
                next.fluid = Some(fluid);
                if proposed.fluid_density.is_none() && fluid.density() != current.fluid_density {
                    next.fluid_density = fluid.density();
                    changes.changed.push(Field::FluidDensity);
                }
            }
            None => log::debug!("Ignoring unknown fluid preset '{}'", name),
        }
    }

    for field in Field::ALL {
        let Some(text) = proposed.text(field) else {
            continue;
        };
        let previous = current.get(field);
        match validate_field(field, text) {
            Ok(update) => {
                if update.corrected {
                    log::debug!("Clamped {} to {}", field.name(), update.value);
                    changes.write_back.push((field, update.value));
                }
                if update.value != previous {
                    next.set(field, update.value);
                    if !changes.is_changed(field) {
                        changes.changed.push(field);
                    }
                }
            }
            Err(err) => {
                log::warn!("Rejected config input: {}", err);
                changes.write_back.push((field, previous));
                changes.rejected.push(err);
            }
        }
    }

    // Typing a density that no longer matches the preset makes it custom
    if proposed.fluid.is_none()
        && changes.is_changed(Field::FluidDensity)
        && next.fluid.is_some_and(|f| f.density() != next.fluid_density)
    {
        next.fluid = None;
    }

    if let Some(ceiling) = proposed.bounce_on_ceiling {
        if ceiling != current.bounce_on_ceiling {
            next.bounce_on_ceiling = ceiling;
            changes.ceiling_toggled = true;
        }
    }
    if let Some(keep) = proposed.keep_constant {
        next.keep_constant = keep;
    }
    if let Some(pause) = proposed.pause_on_surface {
        next.pause_on_surface = pause;
    }
    if let Some(reset) = proposed.reset_on_set_height {
        next.reset_on_set_height = reset;
    }
    if let Some(limit) = proposed.chart_limit {
        next.chart_limit = limit;
    }

    (next, changes)
}
