//! Section reveal sequencer
//!
//! Pure scheduling policy over an ordered list of sections. A section opens
//! either at a fixed offset from mount or once another section has completed
//! every item. Items inside an open section are either staggered on a fixed
//! cadence or chained, each waiting for the previous item's completion.
//!
//! A completion that never arrives leaves its dependents hidden for good.

use super::schedule::Scheduler;

/// When a section opens
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Gate {
    /// Fixed offset from mount (ms)
    Delay(f64),
    /// After every item of `section` completed, plus `delay_ms`
    AfterSection { section: usize, delay_ms: f64 },
}

/// How items inside an open section are released
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Stagger {
    /// Item `i` shows at `open + first_ms + i * step_ms`
    Fixed { first_ms: f64, step_ms: f64 },
    /// Item 0 shows at `open + delay_ms`; item `i + 1` shows `delay_ms` after item `i` completes
    Chained { delay_ms: f64 },
}

#[derive(Debug, Clone, PartialEq)]
pub struct SectionPlan {
    pub key: String,
    pub gate: Gate,
    pub items: usize,
    pub stagger: Stagger,
}

impl SectionPlan {
    pub fn new(key: &str, gate: Gate, items: usize, stagger: Stagger) -> Self {
        Self {
            key: key.to_string(),
            gate,
            items,
            stagger,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SequenceEvent {
    SectionShown(usize),
    ItemShown { section: usize, item: usize },
    SectionCompleted(usize),
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Cue {
    Section { section: usize, at_ms: f64 },
    Item { section: usize, item: usize },
}

#[derive(Debug, Clone, Default)]
struct SectionState {
    shown: bool,
    items_shown: Vec<bool>,
    items_done: Vec<bool>,
    completed: bool,
}

#[derive(Debug, Clone)]
pub struct Sequencer {
    plan: Vec<SectionPlan>,
    sections: Vec<SectionState>,
    cues: Scheduler<Cue>,
    /// Events raised outside `tick` (completions), flushed on the next tick
    outbox: Vec<SequenceEvent>,
    mounted: bool,
}

impl Sequencer {
    pub fn new(plan: Vec<SectionPlan>) -> Self {
        let sections = plan
            .iter()
            .map(|p| SectionState {
                items_shown: vec![false; p.items],
                items_done: vec![false; p.items],
                ..Default::default()
            })
            .collect();
        Self {
            plan,
            sections,
            cues: Scheduler::new(),
            outbox: Vec::new(),
            mounted: false,
        }
    }

    pub fn plan(&self) -> &[SectionPlan] {
        &self.plan
    }

    /// Index of the section named `key`
    pub fn section_index(&self, key: &str) -> Option<usize> {
        self.plan.iter().position(|p| p.key == key)
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    pub fn is_section_shown(&self, section: usize) -> bool {
        self.sections.get(section).is_some_and(|s| s.shown)
    }

    pub fn is_item_shown(&self, section: usize, item: usize) -> bool {
        self.sections
            .get(section)
            .and_then(|s| s.items_shown.get(item))
            .copied()
            .unwrap_or(false)
    }

    pub fn is_section_completed(&self, section: usize) -> bool {
        self.sections.get(section).is_some_and(|s| s.completed)
    }

    /// Pending cues (timers) not yet fired
    pub fn pending(&self) -> usize {
        self.cues.pending()
    }

    /// Start the sequence; fixed gates are measured from `now_ms`
    pub fn mount(&mut self, now_ms: f64) {
        self.reset();
        self.mounted = true;
        for (section, plan) in self.plan.iter().enumerate() {
            if let Gate::Delay(ms) = plan.gate {
                let at_ms = now_ms + ms;
                self.cues.schedule(at_ms, Cue::Section { section, at_ms });
            }
        }
        log::info!("sequencer mounted with {} sections", self.plan.len());
    }

    /// Cancel every pending cue; later completions are ignored
    pub fn unmount(&mut self) {
        if self.mounted {
            log::info!("sequencer unmounted, {} cues cancelled", self.cues.pending());
        }
        self.mounted = false;
        self.cues.cancel_all();
        self.outbox.clear();
    }

    /// Unmount and forget everything that was shown
    pub fn reset(&mut self) {
        self.unmount();
        for (state, plan) in self.sections.iter_mut().zip(&self.plan) {
            *state = SectionState {
                items_shown: vec![false; plan.items],
                items_done: vec![false; plan.items],
                ..Default::default()
            };
        }
    }

    /// Fire due cues and flush queued events
    pub fn tick(&mut self, now_ms: f64) -> Vec<SequenceEvent> {
        if !self.mounted {
            return Vec::new();
        }
        let mut events = std::mem::take(&mut self.outbox);

        // Zero-item sections complete as they open, which can open dependents
        // due at the same instant, so poll until nothing is due.
        loop {
            let due = self.cues.poll(now_ms);
            if due.is_empty() {
                break;
            }
            for cue in due {
                match cue {
                    Cue::Section { section, at_ms } => {
                        self.open_section(section, at_ms, &mut events);
                    }
                    Cue::Item { section, item } => {
                        if let Some(shown) = self.sections[section].items_shown.get_mut(item) {
                            *shown = true;
                            events.push(SequenceEvent::ItemShown { section, item });
                        }
                    }
                }
            }
            events.append(&mut self.outbox);
        }
        events
    }

    /// Completion signal for a shown item
    pub fn item_completed(&mut self, section: usize, item: usize, now_ms: f64) {
        if !self.mounted || !self.is_item_shown(section, item) {
            return;
        }
        let state = &mut self.sections[section];
        if state.items_done[item] {
            return;
        }
        state.items_done[item] = true;

        if let Stagger::Chained { delay_ms } = self.plan[section].stagger {
            let next = item + 1;
            if next < self.plan[section].items {
                self.cues
                    .schedule(now_ms + delay_ms, Cue::Item { section, item: next });
            }
        }

        if self.sections[section].items_done.iter().all(|d| *d) {
            self.complete_section(section, now_ms);
        }
    }

    fn open_section(&mut self, section: usize, at_ms: f64, events: &mut Vec<SequenceEvent>) {
        let state = &mut self.sections[section];
        if state.shown {
            return;
        }
        state.shown = true;
        events.push(SequenceEvent::SectionShown(section));
        log::debug!("section '{}' shown", self.plan[section].key);

        let items = self.plan[section].items;
        if items == 0 {
            self.complete_section(section, at_ms);
            return;
        }
        match self.plan[section].stagger {
            Stagger::Fixed { first_ms, step_ms } => {
                for item in 0..items {
                    let due = at_ms + first_ms + item as f64 * step_ms;
                    self.cues.schedule(due, Cue::Item { section, item });
                }
            }
            Stagger::Chained { delay_ms } => {
                self.cues
                    .schedule(at_ms + delay_ms, Cue::Item { section, item: 0 });
            }
        }
    }

    fn complete_section(&mut self, section: usize, now_ms: f64) {
        if self.sections[section].completed {
            return;
        }
        self.sections[section].completed = true;
        self.outbox.push(SequenceEvent::SectionCompleted(section));
        log::debug!("section '{}' completed", self.plan[section].key);

        for (dependent, plan) in self.plan.iter().enumerate() {
            if let Gate::AfterSection { section: s, delay_ms } = plan.gate
                && s == section
            {
                let at_ms = now_ms + delay_ms;
                self.cues.schedule(
                    at_ms,
                    Cue::Section {
                        section: dependent,
                        at_ms,
                    },
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plan() -> Vec<SectionPlan> {
        vec![
            SectionPlan::new("greeting", Gate::Delay(500.0), 1, Stagger::Fixed {
                first_ms: 0.0,
                step_ms: 0.0,
            }),
            SectionPlan::new("projects", Gate::Delay(1000.0), 3, Stagger::Fixed {
                first_ms: 500.0,
                step_ms: 100.0,
            }),
            SectionPlan::new(
                "experience",
                Gate::AfterSection {
                    section: 1,
                    delay_ms: 0.0,
                },
                2,
                Stagger::Chained { delay_ms: 50.0 },
            ),
            SectionPlan::new(
                "contacts",
                Gate::AfterSection {
                    section: 2,
                    delay_ms: 200.0,
                },
                0,
                Stagger::Fixed {
                    first_ms: 0.0,
                    step_ms: 100.0,
                },
            ),
        ]
    }

    #[test]
    fn test_fixed_delays_and_stagger() {
        let mut seq = Sequencer::new(plan());
        seq.mount(0.0);
        assert!(seq.tick(499.0).is_empty());
        assert_eq!(
            seq.tick(500.0),
            [
                SequenceEvent::SectionShown(0),
                SequenceEvent::ItemShown {
                    section: 0,
                    item: 0
                }
            ]
        );
        assert_eq!(seq.tick(1000.0), [SequenceEvent::SectionShown(1)]);
        assert_eq!(seq.tick(1550.0), [SequenceEvent::ItemShown {
            section: 1,
            item: 0
        }]);
        assert_eq!(seq.tick(1700.0).len(), 2);
        assert!(seq.is_item_shown(1, 2));
    }

    #[test]
    fn test_dependent_gates_and_chain() {
        let mut seq = Sequencer::new(plan());
        seq.mount(0.0);
        seq.tick(2000.0);
        assert!(!seq.is_section_shown(2));

        for item in 0..3 {
            seq.item_completed(1, item, 2000.0);
        }
        let events = seq.tick(2000.0);
        assert!(events.contains(&SequenceEvent::SectionCompleted(1)));
        assert!(events.contains(&SequenceEvent::SectionShown(2)));

        // Chained: second box waits for the first
        assert_eq!(seq.tick(2050.0), [SequenceEvent::ItemShown {
            section: 2,
            item: 0
        }]);
        assert!(seq.tick(5000.0).is_empty());
        seq.item_completed(2, 0, 5000.0);
        assert!(seq.tick(5049.0).is_empty());
        assert_eq!(seq.tick(5050.0), [SequenceEvent::ItemShown {
            section: 2,
            item: 1
        }]);

        // Last box done: contacts open 200ms later and, having no items, complete at once
        seq.item_completed(2, 1, 6000.0);
        let events = seq.tick(6000.0);
        assert_eq!(events, [SequenceEvent::SectionCompleted(2)]);
        assert!(!seq.is_section_shown(3));
        let events = seq.tick(6200.0);
        assert_eq!(events, [
            SequenceEvent::SectionShown(3),
            SequenceEvent::SectionCompleted(3)
        ]);
    }

    #[test]
    fn test_missing_completion_blocks_dependents() {
        let mut seq = Sequencer::new(plan());
        seq.mount(0.0);
        seq.tick(2000.0);
        seq.item_completed(1, 0, 2000.0);
        seq.item_completed(1, 1, 2000.0);
        seq.tick(100_000.0);
        assert!(!seq.is_section_shown(2));
        assert!(!seq.is_section_shown(3));
    }

    #[test]
    fn test_completion_for_unshown_item_ignored() {
        let mut seq = Sequencer::new(plan());
        seq.mount(0.0);
        seq.tick(1000.0);
        for item in 0..3 {
            seq.item_completed(1, item, 1000.0);
        }
        assert!(!seq.is_section_completed(1));
        seq.item_completed(9, 0, 1000.0);
    }

    #[test]
    fn test_unmount_cancels_everything() {
        let mut seq = Sequencer::new(plan());
        seq.mount(0.0);
        seq.tick(600.0);
        assert!(seq.pending() > 0);
        seq.unmount();
        assert_eq!(seq.pending(), 0);
        assert!(seq.tick(10_000.0).is_empty());
        seq.item_completed(0, 0, 10_000.0);
        assert!(seq.tick(20_000.0).is_empty());
    }

    #[test]
    fn test_remount_starts_over() {
        let mut seq = Sequencer::new(plan());
        seq.mount(0.0);
        seq.tick(600.0);
        assert!(seq.is_section_shown(0));
        seq.mount(1000.0);
        assert!(!seq.is_section_shown(0));
        assert!(seq.tick(1499.0).is_empty());
        assert!(seq.tick(1500.0).contains(&SequenceEvent::SectionShown(0)));
    }

    #[test]
    fn test_section_index() {
        let seq = Sequencer::new(plan());
        assert_eq!(seq.section_index("contacts"), Some(3));
        assert_eq!(seq.section_index("nope"), None);
    }
}
