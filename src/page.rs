//! Page composition
//!
//! Owns the reveal sequencer, the effect arena and the experience boxes for
//! one content manifest. The host calls [`Page::tick`] once per animation
//! frame, forwards pointer and measurement input, and renders [`Page::view`].

use std::collections::BTreeMap;

use crate::consts::{GREETING_MS_PER_CHAR, INTRO_SCRAMBLE_MS, PROJECT_SCRAMBLE_MS};
use crate::content::Manifest;
use crate::fx::{
    BoxAnimator, BoxFrame, EffectEvent, EffectId, Effects, Gate, SectionPlan, SequenceEvent,
    Sequencer, Stagger,
};
use crate::settings::{BoxSettings, Settings};

pub const GREETING: usize = 0;
pub const INFO: usize = 1;
pub const SKILLS: usize = 2;
pub const PROJECTS: usize = 3;
pub const EXPERIENCE: usize = 4;
pub const CONTACTS: usize = 5;

/// Pause between one experience box finishing and the next one appearing
const EXPERIENCE_CHAIN_MS: f64 = 100.0;

/// Reveal plan for a manifest: fixed gates for the top of the page, then the
/// experience boxes after the last project, then contacts after the last box
pub fn default_plan(manifest: &Manifest) -> Vec<SectionPlan> {
    vec![
        SectionPlan::new("greeting", Gate::Delay(500.0), 1, Stagger::Fixed {
            first_ms: 0.0,
            step_ms: 0.0,
        }),
        SectionPlan::new("info", Gate::Delay(2000.0), 1, Stagger::Fixed {
            first_ms: 0.0,
            step_ms: 0.0,
        }),
        SectionPlan::new(
            "skills",
            Gate::Delay(3000.0),
            manifest.skills.len(),
            Stagger::Fixed {
                first_ms: 0.0,
                step_ms: 50.0,
            },
        ),
        SectionPlan::new(
            "projects",
            Gate::Delay(4500.0),
            manifest.projects.len(),
            Stagger::Fixed {
                first_ms: 500.0,
                step_ms: 100.0,
            },
        ),
        SectionPlan::new(
            "experience",
            Gate::AfterSection {
                section: PROJECTS,
                delay_ms: 0.0,
            },
            manifest.experience.len(),
            Stagger::Chained {
                delay_ms: EXPERIENCE_CHAIN_MS,
            },
        ),
        SectionPlan::new(
            "contacts",
            Gate::AfterSection {
                section: EXPERIENCE,
                delay_ms: 0.0,
            },
            manifest.contacts.len(),
            Stagger::Fixed {
                first_ms: 0.0,
                step_ms: 100.0,
            },
        ),
    ]
}

/// What the host renders for one item
#[derive(Debug, Clone, PartialEq)]
pub struct ItemView<'a> {
    pub shown: bool,
    /// Current text (empty until an effect writes to it)
    pub text: &'a str,
    /// Box animation, experience items only
    pub frame: Option<BoxFrame>,
    /// Detail panel open for this item
    pub expanded: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SectionView<'a> {
    pub key: &'a str,
    pub shown: bool,
    pub items: Vec<ItemView<'a>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PageView<'a> {
    pub sections: Vec<SectionView<'a>>,
}

pub struct Page {
    manifest: Manifest,
    settings: Settings,
    sequencer: Sequencer,
    effects: Effects,
    /// Effect currently rendering each shown item
    items: BTreeMap<(usize, usize), EffectId>,
    /// Effects whose completion still has to reach the sequencer
    pending: BTreeMap<EffectId, (usize, usize)>,
    boxes: Vec<BoxAnimator>,
    /// Project whose detail panel is open
    detail: Option<usize>,
    seed: u64,
}

impl Page {
    pub fn new(manifest: Manifest, settings: Settings, seed: u64) -> Self {
        let sequencer = Sequencer::new(default_plan(&manifest));
        let effects = Self::make_effects(&settings, seed);
        let boxes = Self::make_boxes(&manifest, &settings);
        Self {
            manifest,
            settings,
            sequencer,
            effects,
            items: BTreeMap::new(),
            pending: BTreeMap::new(),
            boxes,
            detail: None,
            seed,
        }
    }

    fn make_effects(settings: &Settings, seed: u64) -> Effects {
        let mut effects = Effects::new(settings.text.clone(), seed);
        effects.set_reduced_motion(settings.reduced_motion);
        effects
    }

    fn make_boxes(manifest: &Manifest, settings: &Settings) -> Vec<BoxAnimator> {
        let box_settings = if settings.reduced_motion {
            BoxSettings {
                expand_ms: 0.0,
                draw_ms: 0.0,
                delay_ms: 0.0,
                ..settings.boxes.clone()
            }
        } else {
            settings.boxes.clone()
        };
        manifest
            .experience
            .iter()
            .map(|_| BoxAnimator::new(box_settings.clone()))
            .collect()
    }

    pub fn manifest(&self) -> &Manifest {
        &self.manifest
    }

    pub fn sequencer(&self) -> &Sequencer {
        &self.sequencer
    }

    /// Running effect count
    pub fn active_effects(&self) -> usize {
        self.effects.len()
    }

    /// Start (or restart) the reveal sequence
    pub fn mount(&mut self, now_ms: f64) {
        self.teardown();
        self.effects = Self::make_effects(&self.settings, self.seed);
        self.sequencer.mount(now_ms);
    }

    /// Cancel every timer and effect and hide every box
    pub fn teardown(&mut self) {
        self.sequencer.reset();
        self.effects.cancel_all();
        self.items.clear();
        self.pending.clear();
        for b in &mut self.boxes {
            b.set_visible(false);
        }
        self.detail = None;
    }

    /// Text an item animates towards
    fn source(&self, section: usize, item: usize) -> Option<String> {
        let m = &self.manifest;
        match section {
            GREETING => Some(m.greeting.clone()),
            INFO => Some(m.intro.clone()),
            SKILLS => m.skills.get(item).cloned(),
            PROJECTS => m.projects.get(item).map(|p| p.title.clone()),
            EXPERIENCE => m.experience.get(item).map(|r| r.headline()),
            CONTACTS => m.contacts.get(item).map(|c| c.label.clone()),
            _ => None,
        }
    }

    fn item_shown(&mut self, section: usize, item: usize, now_ms: f64) {
        if section == EXPERIENCE {
            if let Some(b) = self.boxes.get_mut(item) {
                b.set_visible(true);
            }
            return;
        }
        let Some(source) = self.source(section, item) else {
            return;
        };
        let id = match section {
            GREETING => {
                self.effects
                    .spawn_typewriter(&source, Some(GREETING_MS_PER_CHAR), now_ms)
            }
            INFO => self
                .effects
                .spawn_scramble_paced(&source, INTRO_SCRAMBLE_MS, now_ms),
            PROJECTS | CONTACTS => {
                self.effects
                    .spawn_scramble_paced(&source, PROJECT_SCRAMBLE_MS, now_ms)
            }
            _ => self.effects.spawn_scramble(&source, 1.0, now_ms),
        };
        self.items.insert((section, item), id);
        self.pending.insert(id, (section, item));
    }

    fn effect_done(&mut self, id: EffectId, now_ms: f64) {
        let Some((section, item)) = self.pending.remove(&id) else {
            return;
        };
        // Finished links get a hover glitch over their final text
        if matches!(section, PROJECTS | CONTACTS)
            && let Some(source) = self.source(section, item)
        {
            self.effects.cancel(id);
            let glitch = self.effects.spawn_glitch(&source);
            self.items.insert((section, item), glitch);
        }
        self.sequencer.item_completed(section, item, now_ms);
    }

    /// Advance everything to `now_ms`; returns the sequencer events of this frame
    pub fn tick(&mut self, now_ms: f64) -> Vec<SequenceEvent> {
        let events = self.sequencer.tick(now_ms);
        for event in &events {
            if let SequenceEvent::ItemShown { section, item } = *event {
                self.item_shown(section, item, now_ms);
            }
        }

        let mut drawn = Vec::new();
        for (item, b) in self.boxes.iter_mut().enumerate() {
            if b.tick(now_ms) {
                drawn.push(item);
            }
        }
        for item in drawn {
            log::debug!("experience box {} drawn", item);
            // Content appears once the border is done; the chain moves on immediately
            if let Some(source) = self.source(EXPERIENCE, item) {
                let id = self.effects.spawn_scramble(&source, 1.0, now_ms);
                self.items.insert((EXPERIENCE, item), id);
            }
            self.sequencer.item_completed(EXPERIENCE, item, now_ms);
        }

        for event in self.effects.tick(now_ms) {
            if let EffectEvent::Done(id) = event {
                self.effect_done(id, now_ms);
            }
        }

        events
    }

    /// Natural size of an experience box's content, measured by the host probe
    pub fn measured(&mut self, item: usize, width: f32, height: f32, now_ms: f64) -> bool {
        self.boxes
            .get_mut(item)
            .is_some_and(|b| b.measured(width, height, now_ms))
    }

    /// Pointer entered or left an item; only finished links react
    pub fn hover(&mut self, section: usize, item: usize, hovered: bool) {
        if let Some(&id) = self.items.get(&(section, item)) {
            self.effects.set_hover(id, hovered);
        }
    }

    /// Open a project's detail panel, or close it if it is already open.
    /// Only one panel is open at a time.
    pub fn toggle_detail(&mut self, project: usize) -> Option<usize> {
        if !self.sequencer.is_item_shown(PROJECTS, project) {
            return self.detail;
        }
        self.detail = if self.detail == Some(project) {
            None
        } else {
            Some(project)
        };
        self.detail
    }

    /// A click landed outside every detail panel
    pub fn outside_click(&mut self) {
        self.detail = None;
    }

    pub fn detail(&self) -> Option<usize> {
        self.detail
    }

    /// Read-only snapshot for rendering at `now_ms`
    pub fn view(&self, now_ms: f64) -> PageView<'_> {
        let sections = self
            .sequencer
            .plan()
            .iter()
            .enumerate()
            .map(|(section, plan)| SectionView {
                key: plan.key.as_str(),
                shown: self.sequencer.is_section_shown(section),
                items: (0..plan.items)
                    .map(|item| ItemView {
                        shown: self.sequencer.is_item_shown(section, item),
                        text: self
                            .items
                            .get(&(section, item))
                            .and_then(|id| self.effects.displayed(*id))
                            .unwrap_or(""),
                        frame: if section == EXPERIENCE {
                            self.boxes.get(item).map(|b| b.frame(now_ms))
                        } else {
                            None
                        },
                        expanded: section == PROJECTS && self.detail == Some(item),
                    })
                    .collect(),
            })
            .collect();
        PageView { sections }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::{Contact, Project, Role};
    use crate::fx::BoxState;

    fn small_manifest() -> Manifest {
        Manifest {
            greeting: "Hello".to_string(),
            intro: "Intro text".to_string(),
            skills: vec!["Rust".to_string()],
            projects: vec![
                Project {
                    id: "000".to_string(),
                    title: "Soup".to_string(),
                    detail: Some("More".to_string()),
                },
                Project {
                    id: "001".to_string(),
                    title: "Field".to_string(),
                    detail: None,
                },
            ],
            experience: vec![
                Role {
                    company: "A".to_string(),
                    role: "Dev".to_string(),
                    period: "Then".to_string(),
                    summary: String::new(),
                },
                Role {
                    company: "B".to_string(),
                    role: "Dev".to_string(),
                    period: "Now".to_string(),
                    summary: String::new(),
                },
            ],
            contacts: vec![Contact {
                label: "Email".to_string(),
                href: "#".to_string(),
            }],
        }
    }

    fn page() -> Page {
        Page::new(small_manifest(), Settings::default(), 99)
    }

    /// Tick in 16ms frames up to `until`, measuring any box that asks for it
    fn run(page: &mut Page, from: f64, until: f64, measure: bool) -> f64 {
        let mut now = from;
        while now <= until {
            page.tick(now);
            if measure {
                for item in 0..page.boxes.len() {
                    if page.boxes[item].state() == BoxState::Measuring {
                        page.measured(item, 300.0, 120.0, now);
                    }
                }
            }
            now += 16.0;
        }
        now
    }

    #[test]
    fn test_greeting_types_after_gate() {
        let mut p = page();
        p.mount(0.0);
        p.tick(499.0);
        assert!(!p.view(499.0).sections[GREETING].shown);

        p.tick(500.0);
        let view = p.view(500.0);
        assert!(view.sections[GREETING].items[0].shown);
        assert_eq!(view.sections[GREETING].items[0].text, "");

        p.tick(700.0);
        assert_eq!(p.view(700.0).sections[GREETING].items[0].text, "He");
        p.tick(1100.0);
        assert_eq!(p.view(1100.0).sections[GREETING].items[0].text, "Hello");
    }

    #[test]
    fn test_full_sequence_reaches_contacts() {
        let mut p = page();
        p.mount(0.0);
        run(&mut p, 0.0, 30_000.0, true);

        let view = p.view(30_000.0);
        assert!(view.sections.iter().all(|s| s.shown));
        assert_eq!(view.sections[INFO].items[0].text, "Intro text");
        assert_eq!(view.sections[PROJECTS].items[1].text, "Field");
        assert_eq!(view.sections[EXPERIENCE].items[1].text, "B / Dev / Now");
        assert!(view.sections[EXPERIENCE].items[1].frame.is_some_and(|f| f.content));
        assert_eq!(view.sections[CONTACTS].items[0].text, "Email");
        assert!(p.sequencer().is_section_completed(CONTACTS));
    }

    #[test]
    fn test_contacts_wait_for_last_box() {
        let mut p = page();
        p.mount(0.0);
        let mut now = run(&mut p, 0.0, 20_000.0, false);
        assert!(p.sequencer().is_section_completed(PROJECTS));
        assert_eq!(p.boxes[0].state(), BoxState::Measuring);
        assert!(!p.sequencer().is_section_shown(CONTACTS));

        // First box only: the second appears but contacts stay hidden
        p.measured(0, 200.0, 80.0, now);
        now = run(&mut p, now, now + 2000.0, false);
        assert_eq!(p.boxes[0].state(), BoxState::Done);
        assert_eq!(p.boxes[1].state(), BoxState::Measuring);
        assert!(!p.sequencer().is_section_shown(CONTACTS));

        p.measured(1, 200.0, 80.0, now);
        run(&mut p, now, now + 2000.0, false);
        assert!(p.sequencer().is_section_shown(CONTACTS));
    }

    #[test]
    fn test_zero_measurement_stalls_chain() {
        let mut p = page();
        p.mount(0.0);
        let now = run(&mut p, 0.0, 20_000.0, false);
        assert!(!p.measured(0, 0.0, 120.0, now));
        run(&mut p, now, now + 10_000.0, false);
        assert_eq!(p.boxes[0].state(), BoxState::Measuring);
        assert!(!p.sequencer().is_item_shown(EXPERIENCE, 1));
        let view = p.view(now);
        assert!(!view.sections[EXPERIENCE].items[0].frame.is_some_and(|f| f.content));
    }

    #[test]
    fn test_teardown_cancels_everything() {
        let mut p = page();
        p.mount(0.0);
        run(&mut p, 0.0, 5200.0, true);
        assert!(p.active_effects() > 0);

        p.teardown();
        assert_eq!(p.active_effects(), 0);
        assert_eq!(p.sequencer().pending(), 0);
        assert!(p.tick(60_000.0).is_empty());
        assert!(!p.view(60_000.0).sections[GREETING].shown);
    }

    #[test]
    fn test_remount_replays() {
        let mut p = page();
        p.mount(0.0);
        run(&mut p, 0.0, 1000.0, false);
        p.mount(2000.0);
        p.tick(2499.0);
        assert!(!p.sequencer().is_section_shown(GREETING));
        p.tick(2500.0);
        assert!(p.sequencer().is_section_shown(GREETING));
    }

    #[test]
    fn test_detail_panel_single_and_outside_click() {
        let mut p = page();
        p.mount(0.0);
        assert_eq!(p.toggle_detail(0), None);

        run(&mut p, 0.0, 5200.0, false);
        assert_eq!(p.toggle_detail(0), Some(0));
        assert_eq!(p.toggle_detail(1), Some(1));
        assert!(p.view(5200.0).sections[PROJECTS].items[1].expanded);
        assert_eq!(p.toggle_detail(1), None);

        p.toggle_detail(0);
        p.outside_click();
        assert_eq!(p.detail(), None);
    }

    #[test]
    fn test_hover_glitches_finished_project() {
        let mut p = page();
        p.mount(0.0);
        let now = run(&mut p, 0.0, 15_000.0, false);
        assert_eq!(p.view(now).sections[PROJECTS].items[0].text, "Soup");

        p.hover(PROJECTS, 0, true);
        p.tick(now + 100.0);
        assert_eq!(p.view(now).sections[PROJECTS].items[0].text.chars().count(), 4);
        p.hover(PROJECTS, 0, false);
        assert_eq!(p.view(now).sections[PROJECTS].items[0].text, "Soup");
    }

    #[test]
    fn test_reduced_motion_skips_animation() {
        let settings = Settings {
            reduced_motion: true,
            ..Settings::default()
        };
        let mut p = Page::new(small_manifest(), settings, 1);
        p.mount(0.0);
        p.tick(500.0);
        p.tick(501.0);
        assert_eq!(p.view(501.0).sections[GREETING].items[0].text, "Hello");
    }

    #[test]
    fn test_intro_scrambles_at_its_cadence() {
        let mut p = Page::new(Manifest::default(), Settings::default(), 3);
        p.mount(0.0);
        // Intro opens at 2000ms and resolves about 3.2s later
        run(&mut p, 0.0, 4000.0, false);
        assert_ne!(p.view(4000.0).sections[INFO].items[0].text, p.manifest().intro);
        let now = run(&mut p, 4016.0, 5300.0, false);
        assert_eq!(p.view(now).sections[INFO].items[0].text, p.manifest().intro);
    }

    #[test]
    fn test_default_manifest_plan() {
        let plan = default_plan(&Manifest::default());
        assert_eq!(plan.len(), 6);
        assert_eq!(plan[PROJECTS].items, 21);
        assert_eq!(plan[CONTACTS].key, "contacts");
        assert_eq!(plan[EXPERIENCE].gate, Gate::AfterSection {
            section: PROJECTS,
            delay_ms: 0.0
        });
    }
}
