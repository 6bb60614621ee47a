//! Typewriter effect: strict left-to-right reveal at a fixed cadence

use super::TextPhase;

/// Reveals one more character every `ms_per_char`
#[derive(Debug, Clone)]
pub struct Typewriter {
    chars: Vec<char>,
    ms_per_char: f64,
    start_ms: f64,
    /// Number of emissions produced so far (emission k shows k chars)
    emitted: usize,
    displayed: String,
}

impl Typewriter {
    pub fn new(source: &str, ms_per_char: f64, start_ms: f64) -> Self {
        Self {
            chars: source.chars().collect(),
            ms_per_char: ms_per_char.max(0.0),
            start_ms,
            emitted: 0,
            displayed: String::new(),
        }
    }

    pub fn source_len(&self) -> usize {
        self.chars.len()
    }

    pub fn displayed(&self) -> &str {
        &self.displayed
    }

    pub fn phase(&self) -> TextPhase {
        if self.emitted == 0 {
            TextPhase::Idle
        } else if self.is_done() {
            TextPhase::Done
        } else {
            TextPhase::Revealing
        }
    }

    /// All `len + 1` emissions have been produced
    pub fn is_done(&self) -> bool {
        self.emitted > self.chars.len()
    }

    /// Time at which emission `k` becomes due
    fn due_at(&self, k: usize) -> f64 {
        self.start_ms + k as f64 * self.ms_per_char
    }

    /// Produce the next emission if it is due at `now_ms`.
    ///
    /// Call in a loop to drain every emission a late frame skipped over.
    pub fn step(&mut self, now_ms: f64) -> Option<&str> {
        if self.is_done() || now_ms < self.due_at(self.emitted) {
            return None;
        }
        let k = self.emitted;
        if k > 0 {
            self.displayed.push(self.chars[k - 1]);
        }
        self.emitted += 1;
        Some(&self.displayed)
    }

    /// Finish immediately
    pub fn complete(&mut self) {
        self.displayed = self.chars.iter().collect();
        self.emitted = self.chars.len() + 1;
    }
}
