//! Time-varying flow field over a coarse grid

use std::f32::consts::TAU;

use glam::Vec2;

/// Spatial frequency of the field (per grid cell)
const SPATIAL_FREQ: f32 = 0.01;
/// Temporal frequency of the field (per frame)
const TEMPORAL_FREQ: f32 = 0.001;

/// Grid of angles, one per `resolution`-sized cell
#[derive(Debug, Clone, Default)]
pub struct FlowField {
    pub resolution: f32,
    pub cols: usize,
    pub rows: usize,
    angles: Vec<f32>,
}

impl FlowField {
    pub fn new(resolution: f32, width: f32, height: f32) -> Self {
        let mut field = Self {
            resolution,
            ..Default::default()
        };
        field.resize(width, height);
        field
    }

    /// Recompute grid dimensions for a new canvas size
    pub fn resize(&mut self, width: f32, height: f32) {
        if self.resolution > 0.0 {
            self.cols = (width.max(0.0) / self.resolution).floor() as usize;
            self.rows = (height.max(0.0) / self.resolution).floor() as usize;
        } else {
            self.cols = 0;
            self.rows = 0;
        }
        self.angles = vec![0.0; self.cols * self.rows];
    }

    /// Closed-form field angle at grid cell (col, row) and frame `time`
    pub fn angle_fn(col: usize, row: usize, time: u64) -> f32 {
        let t = time as f32 * TEMPORAL_FREQ;
        (col as f32 * SPATIAL_FREQ + t).cos() * (row as f32 * SPATIAL_FREQ + t).sin() * TAU
    }

    /// Recompute every cell for frame `time`
    pub fn update(&mut self, time: u64) {
        for row in 0..self.rows {
            for col in 0..self.cols {
                self.angles[row * self.cols + col] = Self::angle_fn(col, row, time);
            }
        }
    }

    /// Angle stored for a grid cell
    pub fn cell(&self, col: usize, row: usize) -> Option<f32> {
        if col < self.cols && row < self.rows {
            self.angles.get(row * self.cols + col).copied()
        } else {
            None
        }
    }

    /// Angle under a canvas position; 0 outside the grid
    pub fn lookup(&self, pos: Vec2) -> f32 {
        if self.resolution <= 0.0 || !pos.is_finite() || pos.x < 0.0 || pos.y < 0.0 {
            return 0.0;
        }
        let col = (pos.x / self.resolution).floor() as usize;
        let row = (pos.y / self.resolution).floor() as usize;
        self.cell(col, row).unwrap_or(0.0)
    }
}
