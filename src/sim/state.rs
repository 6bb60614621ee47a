//! Particle field state
//!
//! Everything the flow-field background needs between frames lives here.

use std::f32::consts::TAU;

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::flow::FlowField;
use crate::settings::FieldSettings;

/// Hue range of the blue-cyan palette (degrees)
pub const HUE_MIN: f32 = 180.0;
pub const HUE_MAX: f32 = 240.0;
/// Particle radius range (glow radius is 3x)
pub const SIZE_MIN: f32 = 0.5;
pub const SIZE_MAX: f32 = 2.5;
/// Lifetime range in frames
pub const LIFE_MIN: f32 = 100.0;
pub const LIFE_MAX: f32 = 300.0;
/// Frames over which a dying particle fades out
pub const FADE_FRAMES: f32 = 50.0;

/// A particle advected by the flow field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Frames left before respawn
    pub life: f32,
    pub max_life: f32,
    pub size: f32,
    pub hue: f32,
}

impl Particle {
    /// Fresh particle at `pos` with random size, hue and lifetime
    pub fn spawn<R: Rng>(rng: &mut R, pos: Vec2) -> Self {
        let max_life = rng.random_range(LIFE_MIN..LIFE_MAX).floor();
        Self {
            pos,
            vel: Vec2::ZERO,
            life: max_life,
            max_life,
            size: rng.random_range(SIZE_MIN..SIZE_MAX),
            hue: rng.random_range(HUE_MIN..HUE_MAX),
        }
    }

    /// Opacity, fading out over the last frames of life
    pub fn alpha(&self) -> f32 {
        (self.life / FADE_FRAMES).clamp(0.0, 1.0) * 0.8
    }

    pub fn is_dead(&self) -> bool {
        self.life <= 0.0
    }
}

/// Uniform coordinate in `[0, extent)`, or 0 for an empty extent
fn random_coord<R: Rng>(rng: &mut R, extent: f32) -> f32 {
    if extent > 0.0 {
        rng.random_range(0.0..extent)
    } else {
        0.0
    }
}

/// Complete particle field state
#[derive(Debug, Clone)]
pub struct FieldState {
    pub width: f32,
    pub height: f32,
    pub field: FlowField,
    pub particles: Vec<Particle>,
    /// Last known pointer position
    pub pointer: Vec2,
    /// Frame counter driving the field
    pub time: u64,
    pub settings: FieldSettings,
    rng: Pcg32,
}

impl FieldState {
    /// Create a field for a `width` x `height` canvas
    pub fn new(width: f32, height: f32, settings: FieldSettings, seed: u64) -> Self {
        let mut state = Self {
            width: 0.0,
            height: 0.0,
            field: FlowField::new(settings.resolution, 0.0, 0.0),
            particles: Vec::new(),
            pointer: Vec2::ZERO,
            time: 0,
            settings,
            rng: Pcg32::seed_from_u64(seed),
        };
        state.resize(width, height);
        state
    }

    /// Steady-state pool size for a canvas: one particle per `area_per_particle`, capped
    pub fn steady_count(&self, width: f32, height: f32) -> usize {
        if self.settings.area_per_particle <= 0.0 {
            return self.settings.max_particles;
        }
        let by_area = (width.max(0.0) * height.max(0.0) / self.settings.area_per_particle).floor();
        (by_area as usize).min(self.settings.max_particles)
    }

    /// New canvas size: reshape the grid, recenter the pointer, reseed the pool
    pub fn resize(&mut self, width: f32, height: f32) {
        self.width = width.max(0.0);
        self.height = height.max(0.0);
        self.field.resize(self.width, self.height);
        self.pointer = Vec2::new(self.width / 2.0, self.height / 2.0);

        let count = self.steady_count(self.width, self.height);
        self.particles.clear();
        for _ in 0..count {
            let p = self.random_particle();
            self.particles.push(p);
        }
        log::info!(
            "field resized to {}x{} ({}x{} cells, {} particles)",
            self.width,
            self.height,
            self.field.cols,
            self.field.rows,
            count
        );
    }

    /// Particle at a random canvas position
    pub fn random_particle(&mut self) -> Particle {
        let pos = Vec2::new(
            random_coord(&mut self.rng, self.width),
            random_coord(&mut self.rng, self.height),
        );
        Particle::spawn(&mut self.rng, pos)
    }

    /// Inject a burst of particles at `at`.
    ///
    /// The whole burst is always inserted, even past the steady-state count;
    /// the oldest particles are evicted only to respect the hard cap.
    pub fn burst(&mut self, at: Vec2) {
        let cap = self.settings.max_particles;
        let count = self.settings.burst_count.min(cap);
        let overflow = (self.particles.len() + count).saturating_sub(cap);
        if overflow > 0 {
            self.particles.drain(..overflow.min(self.particles.len()));
        }

        for _ in 0..count {
            let mut p = Particle::spawn(&mut self.rng, at);
            let heading = self.rng.random_range(0.0..TAU);
            p.vel = Vec2::from_angle(heading) * self.rng.random_range(0.5..2.0);
            self.particles.push(p);
        }
        log::debug!("burst at ({:.0}, {:.0}), pool {}", at.x, at.y, self.particles.len());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state(width: f32, height: f32) -> FieldState {
        FieldState::new(width, height, FieldSettings::default(), 42)
    }

    #[test]
    fn test_resize_recomputes_pool() {
        let mut s = state(800.0, 600.0);
        assert_eq!(s.particles.len(), 60);
        assert_eq!((s.field.cols, s.field.rows), (40, 30));

        s.resize(1600.0, 1200.0);
        assert_eq!(s.particles.len(), 240);
        assert_eq!((s.field.cols, s.field.rows), (80, 60));
        assert_eq!(s.pointer, Vec2::new(800.0, 600.0));
    }

    #[test]
    fn test_pool_capped_on_huge_canvas() {
        let s = state(4000.0, 3000.0);
        assert_eq!(s.particles.len(), 300);
    }

    #[test]
    fn test_spawned_inside_canvas() {
        let s = state(320.0, 240.0);
        for p in &s.particles {
            assert!(p.pos.x >= 0.0 && p.pos.x < 320.0);
            assert!(p.pos.y >= 0.0 && p.pos.y < 240.0);
            assert!((HUE_MIN..HUE_MAX).contains(&p.hue));
            assert!((SIZE_MIN..SIZE_MAX).contains(&p.size));
            assert_eq!(p.life, p.max_life);
        }
    }

    #[test]
    fn test_burst_adds_twenty_at_point() {
        let mut s = state(800.0, 600.0);
        let before = s.particles.len();
        s.burst(Vec2::new(100.0, 100.0));
        assert_eq!(s.particles.len(), before + 20);
        assert!(s.particles[before..]
            .iter()
            .all(|p| p.pos == Vec2::new(100.0, 100.0)));
    }

    #[test]
    fn test_burst_past_steady_count() {
        let mut s = state(800.0, 600.0);
        for _ in 0..5 {
            s.burst(Vec2::new(10.0, 10.0));
        }
        assert_eq!(s.particles.len(), 60 + 100);
    }

    #[test]
    fn test_burst_respects_hard_cap() {
        let mut s = state(4000.0, 3000.0);
        s.burst(Vec2::new(5.0, 5.0));
        assert_eq!(s.particles.len(), 300);
        // Newest burst survives, oldest particles went
        assert!(s.particles[280..].iter().all(|p| p.pos == Vec2::new(5.0, 5.0)));
    }

    #[test]
    fn test_zero_canvas() {
        let mut s = state(0.0, 0.0);
        assert!(s.particles.is_empty());
        assert_eq!((s.field.cols, s.field.rows), (0, 0));
        s.burst(Vec2::ZERO);
        assert_eq!(s.particles.len(), 20);
    }

    #[test]
    fn test_alpha_fades_near_death() {
        let mut p = Particle::spawn(&mut Pcg32::seed_from_u64(1), Vec2::ZERO);
        assert!((p.alpha() - 0.8).abs() < 1e-6);
        p.life = 25.0;
        assert!((p.alpha() - 0.4).abs() < 1e-6);
        p.life = -1.0;
        assert_eq!(p.alpha(), 0.0);
        assert!(p.is_dead());
    }
}
