//! Hover glitch: characters flicker to random glyphs while the pointer is over the text

use rand::Rng;
use rand_pcg::Pcg32;

use crate::consts::GLITCH_GLYPHS;
use crate::settings::TextSettings;

#[derive(Debug, Clone)]
pub struct Glitch {
    chars: Vec<char>,
    glyphs: Vec<char>,
    hovered: bool,
    interval_ms: f64,
    intensity: f32,
    next_roll_ms: f64,
    displayed: String,
    rng: Pcg32,
}

impl Glitch {
    pub fn new(source: &str, settings: &TextSettings, rng: Pcg32) -> Self {
        Self {
            chars: source.chars().collect(),
            glyphs: GLITCH_GLYPHS.chars().collect(),
            hovered: false,
            interval_ms: settings.glitch_interval_ms.max(1.0),
            intensity: settings.glitch_intensity.clamp(0.0, 1.0),
            next_roll_ms: f64::NEG_INFINITY,
            displayed: source.to_string(),
            rng,
        }
    }

    pub fn displayed(&self) -> &str {
        &self.displayed
    }

    pub fn is_hovered(&self) -> bool {
        self.hovered
    }

    /// Pointer entered the text
    pub fn enter(&mut self) {
        self.hovered = true;
        self.next_roll_ms = f64::NEG_INFINITY;
    }

    /// Pointer left; the source is restored immediately
    pub fn leave(&mut self) {
        self.hovered = false;
        self.displayed.clear();
        self.displayed.extend(self.chars.iter());
    }

    /// Re-roll glitched characters if hovered and the interval has passed
    pub fn tick(&mut self, now_ms: f64) -> &str {
        if !self.hovered || now_ms < self.next_roll_ms {
            return &self.displayed;
        }
        self.next_roll_ms = now_ms + self.interval_ms;

        self.displayed.clear();
        for &c in &self.chars {
            let glitched = !c.is_whitespace() && self.rng.random::<f32>() < self.intensity;
            if glitched {
                self.displayed
                    .push(self.glyphs[self.rng.random_range(0..self.glyphs.len())]);
            } else {
                self.displayed.push(c);
            }
        }
        &self.displayed
    }
}
