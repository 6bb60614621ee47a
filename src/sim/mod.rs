//! Deterministic particle flow-field simulation
//!
//! The background canvas lives here. This module must stay pure:
//! - One `tick` per display frame, time is a frame counter
//! - Seeded RNG only
//! - Output is a display list, never direct drawing

pub mod draw;
pub mod flow;
pub mod state;
pub mod tick;

pub use draw::DrawCmd;
pub use flow::FlowField;
pub use state::{FieldState, Particle};
pub use tick::{TickInput, tick};
