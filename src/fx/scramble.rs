//! Scramble effect
//!
//! Two interleaved phases driven by elapsed time:
//! - fill: the visible prefix grows with ease-out
//! - reveal: once the prefix passes a threshold, positions flip from a
//!   placeholder glyph to their real character, earlier words first
//!
//! Whitespace is always shown verbatim and never counts as a placeholder.

use rand::Rng;
use rand_pcg::Pcg32;

use super::TextPhase;
use super::easing::{ease_out_cubic, ease_out_quad, progress};
use super::words::WordWeighting;
use crate::consts::SCRAMBLE_GLYPHS;
use crate::settings::TextSettings;

/// Share of the total duration spent growing the prefix
const FILL_SHARE: f64 = 0.4;
/// Minimum share of the total duration given to the reveal phase
const MIN_REVEAL_SHARE: f64 = 0.25;
/// Placeholder characters added to the prefix per cadence tick
const FILL_PER_TICK: f64 = 6.0;
/// Average letters revealed per cadence tick
const REVEAL_PER_TICK: f64 = 2.75;

/// Duration of a scramble paced by a tick cadence.
///
/// The prefix grows `FILL_PER_TICK` characters and the reveal averages
/// `REVEAL_PER_TICK` letters per tick, whichever takes longer; never shorter
/// than `scramble_base_ms`.
pub fn cadence_total_ms(source: &str, settings: &TextSettings, cadence_ms: f64) -> f64 {
    let len = source.chars().count() as f64;
    let letters = source.chars().filter(|c| !c.is_whitespace()).count() as f64;
    let ticks = (len / FILL_PER_TICK).max(letters / REVEAL_PER_TICK);
    (ticks * cadence_ms.max(0.0)).max(settings.scramble_base_ms) * settings.duration_multiplier
}

/// Placeholder glyph for one unrevealed slot
#[derive(Debug, Clone, Copy)]
struct Placeholder {
    glyph: char,
    next_update_ms: f64,
}

#[derive(Debug, Clone)]
pub struct Scramble {
    chars: Vec<char>,
    words: WordWeighting,
    revealed: Vec<bool>,
    placeholders: Vec<Placeholder>,
    glyphs: Vec<char>,
    /// Visible prefix length
    visible: usize,
    /// Non-whitespace characters in the source
    letters: usize,
    /// Non-whitespace characters revealed so far
    revealed_letters: usize,
    /// Visible prefix needed before reveals start
    threshold: usize,
    start_ms: f64,
    total_ms: f64,
    reveal_start_ms: Option<f64>,
    reveal_ms: f64,
    refresh_ms: (f64, f64),
    phase: TextPhase,
    displayed: String,
    rng: Pcg32,
}

impl Scramble {
    /// Create a scramble run starting at `start_ms`.
    ///
    /// `multiplier` scales the duration on top of the settings' own multiplier.
    pub fn new(
        source: &str,
        settings: &TextSettings,
        multiplier: f64,
        start_ms: f64,
        rng: Pcg32,
    ) -> Self {
        let len = source.chars().count();
        let total_ms = (settings.scramble_base_ms + len as f64 * settings.scramble_per_char_ms)
            * settings.duration_multiplier
            * multiplier;
        Self::with_total(source, settings, total_ms, start_ms, rng)
    }

    /// Create a scramble run paced by a tick cadence (see [`cadence_total_ms`])
    pub fn with_cadence(
        source: &str,
        settings: &TextSettings,
        cadence_ms: f64,
        start_ms: f64,
        rng: Pcg32,
    ) -> Self {
        let total_ms = cadence_total_ms(source, settings, cadence_ms);
        Self::with_total(source, settings, total_ms, start_ms, rng)
    }

    fn with_total(
        source: &str,
        settings: &TextSettings,
        total_ms: f64,
        start_ms: f64,
        rng: Pcg32,
    ) -> Self {
        let chars: Vec<char> = source.chars().collect();
        let len = chars.len();
        let revealed: Vec<bool> = chars.iter().map(|c| c.is_whitespace()).collect();
        let letters = revealed.iter().filter(|r| !**r).count();
        let glyphs: Vec<char> = SCRAMBLE_GLYPHS.chars().collect();
        let (lo, hi) = (settings.placeholder_min_ms, settings.placeholder_max_ms);

        Self {
            words: WordWeighting::new(&chars),
            placeholders: vec![
                Placeholder {
                    glyph: glyphs[0],
                    next_update_ms: f64::NEG_INFINITY,
                };
                len
            ],
            revealed,
            glyphs,
            visible: 0,
            letters,
            revealed_letters: 0,
            threshold: 3usize.max(len / 5).min(len),
            start_ms,
            total_ms: total_ms.max(0.0),
            reveal_start_ms: None,
            reveal_ms: 0.0,
            refresh_ms: (lo.min(hi), lo.max(hi)),
            phase: TextPhase::Idle,
            displayed: String::with_capacity(source.len()),
            chars,
            rng,
        }
    }

    pub fn displayed(&self) -> &str {
        &self.displayed
    }

    pub fn phase(&self) -> TextPhase {
        self.phase
    }

    pub fn is_done(&self) -> bool {
        self.phase == TextPhase::Done
    }

    pub fn total_ms(&self) -> f64 {
        self.total_ms
    }

    /// Whether position `i` shows its real character
    pub fn is_revealed(&self, i: usize) -> bool {
        self.revealed.get(i).copied().unwrap_or(false)
    }

    pub fn visible_len(&self) -> usize {
        self.visible
    }

    /// Advance to `now_ms` and return the displayed text
    pub fn tick(&mut self, now_ms: f64) -> &str {
        let elapsed = now_ms - self.start_ms;
        if self.is_done() || elapsed < 0.0 {
            return &self.displayed;
        }

        self.advance_fill(elapsed);
        self.advance_reveal(now_ms);
        self.refresh_placeholders(now_ms);
        self.render();

        if self.visible == self.chars.len() && self.revealed_letters == self.letters {
            self.phase = TextPhase::Done;
            log::debug!("scramble done after {:.0}ms", elapsed);
        }
        &self.displayed
    }

    /// Finish immediately
    pub fn complete(&mut self) {
        self.visible = self.chars.len();
        self.revealed.iter_mut().for_each(|r| *r = true);
        self.revealed_letters = self.letters;
        self.phase = TextPhase::Done;
        self.render();
    }

    fn advance_fill(&mut self, elapsed: f64) {
        let len = self.chars.len();
        let t = ease_out_quad(progress(elapsed, self.total_ms * FILL_SHARE));
        let target = ((len as f64 * t).ceil() as usize).min(len);
        self.visible = self.visible.max(target);

        if self.phase == TextPhase::Idle {
            self.phase = TextPhase::Filling;
        }
    }

    fn advance_reveal(&mut self, now_ms: f64) {
        let reveal_start = match self.reveal_start_ms {
            Some(t) => t,
            None if self.visible >= self.threshold => {
                let spent = now_ms - self.start_ms;
                self.reveal_ms = (self.total_ms - spent).max(self.total_ms * MIN_REVEAL_SHARE);
                self.reveal_start_ms = Some(now_ms);
                self.phase = TextPhase::Revealing;
                now_ms
            }
            None => return,
        };

        let t = ease_out_cubic(progress(now_ms - reveal_start, self.reveal_ms));
        let target = ((self.letters as f64 * t).ceil() as usize).min(self.letters);

        let mut candidates = Vec::new();
        while self.revealed_letters < target {
            candidates.clear();
            candidates.extend((0..self.visible).filter(|&i| !self.revealed[i]));
            let Some(pos) = self.words.pick(&candidates, &mut self.rng) else {
                // Everything visible is revealed; the fill has to catch up
                break;
            };
            self.revealed[pos] = true;
            self.revealed_letters += 1;
        }
    }

    fn refresh_placeholders(&mut self, now_ms: f64) {
        let (lo, hi) = self.refresh_ms;
        for i in 0..self.visible {
            if self.revealed[i] {
                continue;
            }
            let slot = &mut self.placeholders[i];
            if now_ms >= slot.next_update_ms {
                slot.glyph = self.glyphs[self.rng.random_range(0..self.glyphs.len())];
                slot.next_update_ms = now_ms + self.rng.random_range(lo..=hi);
            }
        }
    }

    fn render(&mut self) {
        self.displayed.clear();
        for i in 0..self.visible {
            let c = if self.revealed[i] {
                self.chars[i]
            } else {
                self.placeholders[i].glyph
            };
            self.displayed.push(c);
        }
    }
}
