//! Text and box reveal effects
//!
//! Every effect is an explicit state struct advanced by `tick(now_ms)`:
//! - No timers of its own; the host drives time
//! - Seeded RNG only, so runs replay exactly in tests
//! - Cancelling is dropping the state (or removing its id from an arena)

pub mod boxdraw;
pub mod easing;
pub mod effects;
pub mod glitch;
pub mod schedule;
pub mod scramble;
pub mod sequencer;
pub mod typewriter;
pub mod words;

use serde::{Deserialize, Serialize};

pub use boxdraw::{BoxAnimator, BoxFrame, BoxState, rounded_rect_perimeter};
pub use effects::{EffectEvent, EffectId, Effects, TextEffect};
pub use glitch::Glitch;
pub use schedule::{Scheduler, TimerId};
pub use scramble::Scramble;
pub use sequencer::{Gate, SectionPlan, SequenceEvent, Sequencer, Stagger};
pub use typewriter::Typewriter;
pub use words::{WordSpan, WordWeighting};

/// Progress of a revealable text
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum TextPhase {
    /// Not started yet
    Idle,
    /// Placeholder prefix growing, nothing revealed
    Filling,
    /// Real characters appearing
    Revealing,
    /// Displayed text equals the source
    Done,
}
