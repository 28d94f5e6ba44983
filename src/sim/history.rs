//! Time-series history of the ball for charting
//!
//! One point per unpaused tick for position, velocity and acceleration on
//! each axis, keyed by runtime. Values use the readout convention (metres
//! from the left wall / floor, up is positive).

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::consts::HISTORY_CAP;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DataPoint {
    /// Runtime (s)
    pub t: f64,
    pub value: f32,
}

/// Quantity being charted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlotKind {
    Position,
    Velocity,
    Acceleration,
}

impl PlotKind {
    /// Chart title, including units
    pub fn title(&self, axis: Axis) -> String {
        let (what, unit) = match self {
            PlotKind::Position => ("position", "m"),
            PlotKind::Velocity => ("velocity", "ms-1"),
            PlotKind::Acceleration => ("acceleration", "ms-2"),
        };
        format!("{} {} over time ({})", axis.as_str(), what, unit)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Axis {
    X,
    Y,
}

impl Axis {
    pub fn as_str(&self) -> &'static str {
        match self {
            Axis::X => "X",
            Axis::Y => "Y",
        }
    }
}

/// One sample of the ball readouts
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Sample {
    pub position: [f32; 2],
    pub velocity: [f32; 2],
    pub acceleration: [f32; 2],
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct History {
    position: [VecDeque<DataPoint>; 2],
    velocity: [VecDeque<DataPoint>; 2],
    acceleration: [VecDeque<DataPoint>; 2],
    /// Oldest points are dropped beyond this many, or beyond `HISTORY_CAP`
    /// when unset
    limit: Option<usize>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.position[0].len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn limit(&self) -> Option<usize> {
        self.limit
    }

    /// Cap the number of stored points (None falls back to `HISTORY_CAP`)
    pub fn set_limit(&mut self, limit: Option<usize>) {
        self.limit = limit.map(|l| l.max(1));
        self.trim();
    }

    pub fn record(&mut self, t: f64, sample: Sample) {
        for axis in 0..2 {
            self.position[axis].push_back(DataPoint { t, value: sample.position[axis] });
            self.velocity[axis].push_back(DataPoint { t, value: sample.velocity[axis] });
            self.acceleration[axis].push_back(DataPoint { t, value: sample.acceleration[axis] });
        }
        self.trim();
    }

    fn trim(&mut self) {
        let limit = self.limit.unwrap_or(HISTORY_CAP).min(HISTORY_CAP);
        let excess = self.len().saturating_sub(limit);
        if excess == 0 {
            return;
        }
        for series in self
            .position
            .iter_mut()
            .chain(self.velocity.iter_mut())
            .chain(self.acceleration.iter_mut())
        {
            series.drain(..excess);
        }
    }

    pub fn clear(&mut self) {
        for series in self
            .position
            .iter_mut()
            .chain(self.velocity.iter_mut())
            .chain(self.acceleration.iter_mut())
        {
            series.clear();
        }
    }

    pub fn series(&self, kind: PlotKind, axis: Axis) -> &VecDeque<DataPoint> {
        let i = match axis {
            Axis::X => 0,
            Axis::Y => 1,
        };
        match kind {
            PlotKind::Position => &self.position[i],
            PlotKind::Velocity => &self.velocity[i],
            PlotKind::Acceleration => &self.acceleration[i],
        }
    }
}
