//! Display list emitted by the simulation each frame

use glam::Vec2;

/// One canvas drawing operation, in paint order
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DrawCmd {
    /// Translucent background fill over the whole canvas (leaves fading trails)
    Fade { alpha: f32 },
    /// Radial-gradient dot
    Glow {
        pos: Vec2,
        radius: f32,
        hue: f32,
        alpha: f32,
    },
    /// Thin connecting line between two particles
    Link {
        from: Vec2,
        to: Vec2,
        hue: f32,
        alpha: f32,
    },
}
