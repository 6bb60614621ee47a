//! Portfolio FX - Text reveal effects and a flow-field particle background
//!
//! Core modules:
//! - `fx`: Text effects (typewriter, scramble, glitch), box draw animator, reveal sequencer
//! - `sim`: Deterministic particle flow-field simulation
//! - `page`: Composes the sequencer, effects and boxes over a content manifest
//! - `renderer`: Color helpers and the canvas 2D backend (wasm only)
//! - `settings`: Tunable timings, speeds and particle limits

pub mod content;
pub mod fx;
pub mod page;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use content::Manifest;
pub use page::Page;
pub use settings::{QualityPreset, Settings};

/// Timing and simulation constants
pub mod consts {
    /// Greeting typewriter cadence (ms per character)
    pub const GREETING_MS_PER_CHAR: f64 = 100.0;
    /// Intro scramble cadence (ms)
    pub const INTRO_SCRAMBLE_MS: f64 = 35.0;
    /// Project title scramble cadence (ms)
    pub const PROJECT_SCRAMBLE_MS: f64 = 40.0;

    /// Glyphs shown in place of unrevealed scramble characters
    pub const SCRAMBLE_GLYPHS: &str = "-----/---<<-----//----[]--";
    /// Glyphs used by the hover glitch effect
    pub const GLITCH_GLYPHS: &str = "!<>-_\\/[]{}=+*^?#";

    /// Flow field cell size in pixels
    pub const FIELD_RESOLUTION: f32 = 20.0;
    /// Canvas area (px²) per steady-state particle
    pub const AREA_PER_PARTICLE: f32 = 8000.0;
    /// Hard cap on the particle pool
    pub const MAX_PARTICLES: usize = 300;
    /// Particles injected per click
    pub const BURST_COUNT: usize = 20;
    /// Pointer repulsion radius (px)
    pub const POINTER_RADIUS: f32 = 150.0;
}

/// Linear interpolation
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Wrap a coordinate into `[0, extent)`
#[inline]
pub fn wrap(value: f32, extent: f32) -> f32 {
    if extent <= 0.0 {
        return 0.0;
    }
    let wrapped = value.rem_euclid(extent);
    // rem_euclid can round up to `extent` for tiny negative inputs
    if wrapped >= extent { 0.0 } else { wrapped }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrap_stays_in_range() {
        assert_eq!(wrap(0.0, 100.0), 0.0);
        assert_eq!(wrap(100.0, 100.0), 0.0);
        assert!((wrap(-1.0, 100.0) - 99.0).abs() < 1e-4);
        assert!((wrap(250.0, 100.0) - 50.0).abs() < 1e-4);
        assert!(wrap(-1e-9, 100.0) < 100.0);
    }

    #[test]
    fn test_wrap_zero_extent() {
        assert_eq!(wrap(42.0, 0.0), 0.0);
    }
}
