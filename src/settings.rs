//! Effect settings
//!
//! Every timing, speed and limit the engines use lives here so a host can
//! tune them from a JSON blob instead of editing constants.

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Smallest flow field cell accepted from configuration (px)
const MIN_FIELD_RESOLUTION: f32 = 1.0;

/// Quality preset levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum QualityPreset {
    Low,
    #[default]
    Medium,
    High,
}

impl QualityPreset {
    pub fn as_str(&self) -> &'static str {
        match self {
            QualityPreset::Low => "Low",
            QualityPreset::Medium => "Medium",
            QualityPreset::High => "High",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "low" => Some(QualityPreset::Low),
            "medium" | "med" => Some(QualityPreset::Medium),
            "high" => Some(QualityPreset::High),
            _ => None,
        }
    }

    /// Scale applied to the particle hard cap
    pub fn particle_scale(&self) -> f32 {
        match self {
            QualityPreset::Low => 0.4,
            QualityPreset::Medium => 1.0,
            QualityPreset::High => 1.0,
        }
    }

    /// Whether particles draw connecting lines
    pub fn links_enabled(&self) -> bool {
        match self {
            QualityPreset::Low => false,
            QualityPreset::Medium => true,
            QualityPreset::High => true,
        }
    }
}

/// Text effect timings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TextSettings {
    /// Typewriter cadence
    pub ms_per_char: f64,
    /// Fixed part of a scramble run's duration
    pub scramble_base_ms: f64,
    /// Per-character part of a scramble run's duration
    pub scramble_per_char_ms: f64,
    /// Scales the whole scramble duration
    pub duration_multiplier: f64,
    /// Placeholder glyph refresh window (lower bound)
    pub placeholder_min_ms: f64,
    /// Placeholder glyph refresh window (upper bound)
    pub placeholder_max_ms: f64,
    /// Glitch re-roll cadence while hovered
    pub glitch_interval_ms: f64,
    /// Probability that a character is glitched on each re-roll (0-1)
    pub glitch_intensity: f32,
}

impl Default for TextSettings {
    fn default() -> Self {
        Self {
            ms_per_char: 80.0,
            scramble_base_ms: 400.0,
            scramble_per_char_ms: 25.0,
            duration_multiplier: 1.0,
            placeholder_min_ms: 80.0,
            placeholder_max_ms: 180.0,
            glitch_interval_ms: 50.0,
            glitch_intensity: 0.3,
        }
    }
}

/// Box draw animator timings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BoxSettings {
    /// Height expansion duration
    pub expand_ms: f64,
    /// Border stroke duration
    pub draw_ms: f64,
    /// Pause between expansion and drawing
    pub delay_ms: f64,
    /// Border corner radius (px)
    pub corner_radius: f32,
}

impl Default for BoxSettings {
    fn default() -> Self {
        Self {
            expand_ms: 400.0,
            draw_ms: 1200.0,
            delay_ms: 0.0,
            corner_radius: 6.0,
        }
    }
}

/// Particle field tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldSettings {
    /// Flow field cell size (px)
    pub resolution: f32,
    /// Pointer repulsion radius (px)
    pub pointer_radius: f32,
    /// Hard cap on the pool, bursts included
    pub max_particles: usize,
    /// Canvas area per steady-state particle (px²)
    pub area_per_particle: f32,
    /// Particles injected per click
    pub burst_count: usize,
    /// Flow field force magnitude per frame
    pub flow_force: f32,
    /// Pointer repulsion strength
    pub pointer_force: f32,
    /// Velocity damping per frame
    pub damping: f32,
    /// Trail fade overlay alpha
    pub fade_alpha: f32,
    /// Max distance for a connecting line (px)
    pub link_distance: f32,
    /// How many following particles each particle tries to link to
    pub link_neighbors: usize,
}

impl Default for FieldSettings {
    fn default() -> Self {
        Self {
            resolution: FIELD_RESOLUTION,
            pointer_radius: POINTER_RADIUS,
            max_particles: MAX_PARTICLES,
            area_per_particle: AREA_PER_PARTICLE,
            burst_count: BURST_COUNT,
            flow_force: 0.3,
            pointer_force: 2.0,
            damping: 0.95,
            fade_alpha: 0.05,
            link_distance: 100.0,
            link_neighbors: 5,
        }
    }
}

/// All effect settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Graphics quality preset
    pub quality: QualityPreset,
    /// Skip text animations (effects finish on their first tick)
    pub reduced_motion: bool,
    pub text: TextSettings,
    pub boxes: BoxSettings,
    pub field: FieldSettings,
}

impl Settings {
    /// Create settings from a quality preset
    pub fn from_preset(preset: QualityPreset) -> Self {
        Self {
            quality: preset,
            ..Self::default()
        }
    }

    /// Parse settings from JSON; missing fields keep their defaults
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Effective particle hard cap for the active preset
    pub fn max_particles(&self) -> usize {
        (self.field.max_particles as f32 * self.quality.particle_scale()) as usize
    }

    /// Field settings with the preset applied
    pub fn effective_field(&self) -> FieldSettings {
        let mut field = self.field.clone();
        field.max_particles = self.max_particles();
        // Sub-pixel cells would blow the grid up to millions of entries
        field.resolution = field.resolution.max(MIN_FIELD_RESOLUTION);
        if !self.quality.links_enabled() {
            field.link_neighbors = 0;
        }
        field
    }

    /// Load settings from an inline `<script id="fx-settings">` element (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let json = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id(Self::ELEMENT_ID))
            .and_then(|el| el.text_content());

        if let Some(json) = json {
            match Self::from_json(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings from #{}", Self::ELEMENT_ID);
                    return settings;
                }
                Err(e) => log::warn!("Ignoring malformed settings: {}", e),
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Native stub
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }

    /// Id of the element holding inline JSON settings
    #[allow(dead_code)]
    const ELEMENT_ID: &'static str = "fx-settings";
}
