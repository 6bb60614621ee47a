//! Canvas rendering
//!
//! Color strings shared by the canvas backend. The backend itself only
//! exists on wasm; everything here is plain string formatting so it can be
//! tested natively.

#[cfg(target_arch = "wasm32")]
pub mod canvas;

#[cfg(target_arch = "wasm32")]
pub use canvas::CanvasRenderer;

/// Page background color
pub const BACKGROUND: (u8, u8, u8) = (10, 10, 10);
/// Width of particle links (px)
pub const LINK_WIDTH: f64 = 0.5;

/// CSS `hsla()` color; saturation and lightness in percent
pub fn hsla(hue: f32, saturation: f32, lightness: f32, alpha: f32) -> String {
    format!(
        "hsla({}, {}%, {}%, {})",
        hue,
        saturation,
        lightness,
        alpha.clamp(0.0, 1.0)
    )
}

/// Translucent background used to fade the previous frame into trails
pub fn fade_style(alpha: f32) -> String {
    let (r, g, b) = BACKGROUND;
    format!("rgba({}, {}, {}, {})", r, g, b, alpha.clamp(0.0, 1.0))
}

/// Radial gradient stops for a particle glow: bright core, half-alpha middle, clear edge
pub fn glow_stops(hue: f32, alpha: f32) -> [(f32, String); 3] {
    [
        (0.0, hsla(hue, 80.0, 60.0, alpha)),
        (0.5, hsla(hue, 70.0, 50.0, alpha * 0.5)),
        (1.0, hsla(hue, 60.0, 40.0, 0.0)),
    ]
}

/// Stroke color of a link between two particles
pub fn link_style(hue: f32, alpha: f32) -> String {
    hsla(hue, 70.0, 60.0, alpha)
}
