//! Effect arena
//!
//! One record per running text effect, keyed by a stable id. Cancelling an
//! effect is removing its id; siblings are untouched.

use std::collections::BTreeMap;

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::TextPhase;
use super::glitch::Glitch;
use super::scramble::Scramble;
use super::typewriter::Typewriter;
use crate::settings::TextSettings;

/// Handle to a text effect instance
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EffectId(pub u32);

/// A running text effect
#[derive(Debug, Clone)]
pub enum TextEffect {
    Typewriter(Typewriter),
    Scramble(Scramble),
    Glitch(Glitch),
}

impl TextEffect {
    pub fn displayed(&self) -> &str {
        match self {
            TextEffect::Typewriter(t) => t.displayed(),
            TextEffect::Scramble(s) => s.displayed(),
            TextEffect::Glitch(g) => g.displayed(),
        }
    }

    pub fn phase(&self) -> TextPhase {
        match self {
            TextEffect::Typewriter(t) => t.phase(),
            TextEffect::Scramble(s) => s.phase(),
            TextEffect::Glitch(g) if g.is_hovered() => TextPhase::Revealing,
            TextEffect::Glitch(_) => TextPhase::Idle,
        }
    }

    /// Glitches never finish; they live until cancelled
    pub fn is_done(&self) -> bool {
        match self {
            TextEffect::Typewriter(t) => t.is_done(),
            TextEffect::Scramble(s) => s.is_done(),
            TextEffect::Glitch(_) => false,
        }
    }

    fn complete(&mut self) {
        match self {
            TextEffect::Typewriter(t) => t.complete(),
            TextEffect::Scramble(s) => s.complete(),
            TextEffect::Glitch(_) => {}
        }
    }
}

/// Notification produced by [`Effects::tick`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EffectEvent {
    /// Displayed text may have changed
    Updated(EffectId),
    /// The effect reached its final text (reported once)
    Done(EffectId),
}

#[derive(Debug, Clone)]
struct Entry {
    effect: TextEffect,
    done_reported: bool,
}

/// Arena of concurrently running text effects
#[derive(Debug, Clone)]
pub struct Effects {
    entries: BTreeMap<EffectId, Entry>,
    next_id: u32,
    settings: TextSettings,
    reduced_motion: bool,
    /// Seeds per-effect RNGs so a whole run is reproducible from one seed
    seeder: Pcg32,
}

impl Effects {
    pub fn new(settings: TextSettings, seed: u64) -> Self {
        Self {
            entries: BTreeMap::new(),
            next_id: 1,
            settings,
            reduced_motion: false,
            seeder: Pcg32::seed_from_u64(seed),
        }
    }

    /// Effects spawned from now on finish on their first tick
    pub fn set_reduced_motion(&mut self, reduced: bool) {
        self.reduced_motion = reduced;
    }

    pub fn settings(&self) -> &TextSettings {
        &self.settings
    }

    fn insert(&mut self, mut effect: TextEffect) -> EffectId {
        if self.reduced_motion {
            effect.complete();
        }
        let id = EffectId(self.next_id);
        self.next_id += 1;
        self.entries.insert(
            id,
            Entry {
                effect,
                done_reported: false,
            },
        );
        id
    }

    fn child_rng(&mut self) -> Pcg32 {
        Pcg32::seed_from_u64(self.seeder.random())
    }

    /// Start a typewriter; `ms_per_char` overrides the settings cadence when given
    pub fn spawn_typewriter(
        &mut self,
        source: &str,
        ms_per_char: Option<f64>,
        now_ms: f64,
    ) -> EffectId {
        let cadence = ms_per_char.unwrap_or(self.settings.ms_per_char);
        self.insert(TextEffect::Typewriter(Typewriter::new(source, cadence, now_ms)))
    }

    /// Start a scramble whose duration is scaled by `multiplier`
    pub fn spawn_scramble(&mut self, source: &str, multiplier: f64, now_ms: f64) -> EffectId {
        let rng = self.child_rng();
        let scramble = Scramble::new(source, &self.settings, multiplier, now_ms, rng);
        self.insert(TextEffect::Scramble(scramble))
    }

    /// Start a scramble paced by a tick cadence (ms per tick)
    pub fn spawn_scramble_paced(&mut self, source: &str, cadence_ms: f64, now_ms: f64) -> EffectId {
        let rng = self.child_rng();
        let scramble = Scramble::with_cadence(source, &self.settings, cadence_ms, now_ms, rng);
        self.insert(TextEffect::Scramble(scramble))
    }

    /// Attach an (initially idle) hover glitch to `source`
    pub fn spawn_glitch(&mut self, source: &str) -> EffectId {
        let rng = self.child_rng();
        let glitch = Glitch::new(source, &self.settings, rng);
        self.insert(TextEffect::Glitch(glitch))
    }

    /// Stop an effect and free its slot
    pub fn cancel(&mut self, id: EffectId) -> bool {
        self.entries.remove(&id).is_some()
    }

    pub fn cancel_all(&mut self) {
        self.entries.clear();
    }

    pub fn get(&self, id: EffectId) -> Option<&TextEffect> {
        self.entries.get(&id).map(|e| &e.effect)
    }

    pub fn displayed(&self, id: EffectId) -> Option<&str> {
        self.get(id).map(TextEffect::displayed)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Pointer entered/left a glitch effect. Non-glitch ids are ignored.
    pub fn set_hover(&mut self, id: EffectId, hovered: bool) {
        if let Some(Entry {
            effect: TextEffect::Glitch(g),
            ..
        }) = self.entries.get_mut(&id)
        {
            if hovered {
                g.enter();
            } else {
                g.leave();
            }
        }
    }

    /// Advance every effect to `now_ms`
    pub fn tick(&mut self, now_ms: f64) -> Vec<EffectEvent> {
        let mut events = Vec::new();

        for (&id, entry) in self.entries.iter_mut() {
            let changed = match &mut entry.effect {
                TextEffect::Typewriter(t) => {
                    let mut stepped = false;
                    while t.step(now_ms).is_some() {
                        stepped = true;
                    }
                    stepped
                }
                TextEffect::Scramble(s) => {
                    let was_done = s.is_done();
                    s.tick(now_ms);
                    !was_done
                }
                TextEffect::Glitch(g) => {
                    g.tick(now_ms);
                    g.is_hovered()
                }
            };

            if changed {
                events.push(EffectEvent::Updated(id));
            }
            if entry.effect.is_done() && !entry.done_reported {
                entry.done_reported = true;
                events.push(EffectEvent::Done(id));
            }
        }

        events
    }
}
