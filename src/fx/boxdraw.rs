//! Box draw animator
//!
//! `Hidden → Measuring → Expanding → Drawing → Done`, strictly forward. Hiding
//! the box resets it to `Hidden` and forgets the measurement.
//!
//! Real content is only rendered in `Done`; before that the host shows an
//! off-screen probe (while measuring) and an empty, growing container.

use std::f32::consts::PI;

use super::easing::{ease_out_cubic, progress};
use crate::lerp;
use crate::settings::BoxSettings;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum BoxState {
    Hidden,
    Measuring,
    Expanding,
    Drawing,
    Done,
}

/// What the host should render for a box at a given instant
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoxFrame {
    pub state: BoxState,
    /// Measured content width (px)
    pub width: f32,
    /// Container height (px)
    pub height: f32,
    /// Border corner radius (px)
    pub corner_radius: f32,
    /// Border stroke progress along the perimeter (0-1)
    pub stroke: f32,
    /// Stroke length already drawn (px)
    pub stroke_len: f32,
    /// Full perimeter of the rounded rectangle (px)
    pub perimeter: f32,
    /// Mount the off-screen measurement probe
    pub probe: bool,
    /// Render the real content with a static border
    pub content: bool,
}

impl BoxFrame {
    /// Dash offset that shows exactly `stroke_len` of a border dashed at `perimeter`
    pub fn dash_offset(&self) -> f32 {
        (self.perimeter - self.stroke_len).max(0.0)
    }
}

/// Perimeter of a rounded rectangle; the radius is clamped to fit
pub fn rounded_rect_perimeter(width: f32, height: f32, radius: f32) -> f32 {
    if width <= 0.0 || height <= 0.0 {
        return 0.0;
    }
    let r = radius.max(0.0).min(width / 2.0).min(height / 2.0);
    2.0 * (width + height) - 8.0 * r + 2.0 * PI * r
}

#[derive(Debug, Clone)]
pub struct BoxAnimator {
    state: BoxState,
    /// Natural content size, frozen once measured
    size: Option<(f32, f32)>,
    /// Start of the current timed phase
    phase_start_ms: f64,
    settings: BoxSettings,
}

impl BoxAnimator {
    pub fn new(settings: BoxSettings) -> Self {
        Self {
            state: BoxState::Hidden,
            size: None,
            phase_start_ms: 0.0,
            settings,
        }
    }

    pub fn state(&self) -> BoxState {
        self.state
    }

    pub fn size(&self) -> Option<(f32, f32)> {
        self.size
    }

    /// Visibility input. Showing a hidden box starts measuring; hiding resets.
    pub fn set_visible(&mut self, visible: bool) {
        match (visible, self.state) {
            (true, BoxState::Hidden) => {
                self.state = BoxState::Measuring;
            }
            (false, BoxState::Hidden) | (true, _) => {}
            (false, _) => {
                self.state = BoxState::Hidden;
                self.size = None;
            }
        }
    }

    /// Report the probe's natural size. Only a strictly positive size while
    /// measuring advances the box; anything else is ignored.
    pub fn measured(&mut self, width: f32, height: f32, now_ms: f64) -> bool {
        if self.state != BoxState::Measuring || !(width > 0.0 && height > 0.0) {
            return false;
        }
        self.size = Some((width, height));
        self.state = BoxState::Expanding;
        self.phase_start_ms = now_ms;
        log::debug!("box measured {}x{}", width, height);
        true
    }

    /// Advance timed phases. Returns true exactly once, when drawing completes.
    pub fn tick(&mut self, now_ms: f64) -> bool {
        if self.state == BoxState::Expanding {
            let draw_at = self.phase_start_ms + self.settings.expand_ms + self.settings.delay_ms;
            if now_ms >= draw_at {
                self.state = BoxState::Drawing;
                self.phase_start_ms = draw_at;
            }
        }
        if self.state == BoxState::Drawing
            && now_ms >= self.phase_start_ms + self.settings.draw_ms
        {
            self.state = BoxState::Done;
            return true;
        }
        false
    }

    /// Render description at `now_ms`
    pub fn frame(&self, now_ms: f64) -> BoxFrame {
        let (w, h) = self.size.unwrap_or((0.0, 0.0));
        let perimeter = rounded_rect_perimeter(w, h, self.settings.corner_radius);
        let elapsed = now_ms - self.phase_start_ms;

        let (height, stroke) = match self.state {
            BoxState::Hidden | BoxState::Measuring => (0.0, 0.0),
            BoxState::Expanding => {
                let t = ease_out_cubic(progress(elapsed, self.settings.expand_ms)) as f32;
                (lerp(0.0, h, t), 0.0)
            }
            BoxState::Drawing => {
                let t = ease_out_cubic(progress(elapsed, self.settings.draw_ms)) as f32;
                (h, t)
            }
            BoxState::Done => (h, 1.0),
        };

        BoxFrame {
            state: self.state,
            width: w,
            height,
            corner_radius: self.settings.corner_radius,
            stroke,
            stroke_len: perimeter * stroke,
            perimeter,
            probe: self.state == BoxState::Measuring,
            content: self.state == BoxState::Done,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn animator() -> BoxAnimator {
        BoxAnimator::new(BoxSettings::default())
    }

    #[test]
    fn test_expand_then_draw_timeline() {
        let mut b = animator();
        b.set_visible(true);
        assert_eq!(b.state(), BoxState::Measuring);
        assert!(b.frame(0.0).probe);
        assert!(b.measured(300.0, 120.0, 0.0));

        assert!(!b.tick(200.0));
        let mid = b.frame(200.0);
        assert!(mid.height > 0.0 && mid.height < 120.0);
        assert!(!mid.content);

        assert!(!b.tick(400.0));
        assert_eq!(b.state(), BoxState::Drawing);
        assert_eq!(b.frame(400.0).height, 120.0);
        assert_eq!(b.frame(400.0).stroke, 0.0);

        assert!(!b.tick(1599.0));
        assert!(!b.frame(1599.0).content);
        assert!(b.tick(1600.0));
        assert_eq!(b.state(), BoxState::Done);
        let done = b.frame(1600.0);
        assert!(done.content);
        assert_eq!(done.stroke, 1.0);
        assert_eq!(done.stroke_len, done.perimeter);

        // Completion fires once
        assert!(!b.tick(5000.0));
    }

    #[test]
    fn test_delay_pushes_drawing() {
        let settings = BoxSettings {
            delay_ms: 100.0,
            ..BoxSettings::default()
        };
        let mut b = BoxAnimator::new(settings);
        b.set_visible(true);
        b.measured(10.0, 10.0, 0.0);
        b.tick(450.0);
        assert_eq!(b.state(), BoxState::Expanding);
        b.tick(500.0);
        assert_eq!(b.state(), BoxState::Drawing);
        assert!(!b.tick(1699.0));
        assert!(b.tick(1700.0));
    }

    #[test]
    fn test_late_tick_completes_in_one_call() {
        let mut b = animator();
        b.set_visible(true);
        b.measured(50.0, 40.0, 0.0);
        assert!(b.tick(10_000.0));
        assert_eq!(b.state(), BoxState::Done);
    }

    #[test]
    fn test_zero_measurement_stalls() {
        let mut b = animator();
        b.set_visible(true);
        assert!(!b.measured(0.0, 120.0, 0.0));
        assert!(!b.measured(300.0, 0.0, 0.0));
        assert!(!b.measured(f32::NAN, 10.0, 0.0));
        assert!(!b.tick(10_000.0));
        assert_eq!(b.state(), BoxState::Measuring);
        assert!(!b.frame(10_000.0).content);
    }

    #[test]
    fn test_measure_ignored_unless_measuring() {
        let mut b = animator();
        assert!(!b.measured(10.0, 10.0, 0.0));
        assert_eq!(b.state(), BoxState::Hidden);

        b.set_visible(true);
        b.measured(10.0, 10.0, 0.0);
        assert!(!b.measured(99.0, 99.0, 1.0));
        assert_eq!(b.size(), Some((10.0, 10.0)));
    }

    #[test]
    fn test_hide_resets() {
        let mut b = animator();
        b.set_visible(true);
        b.measured(10.0, 10.0, 0.0);
        b.tick(500.0);
        b.set_visible(false);
        assert_eq!(b.state(), BoxState::Hidden);
        assert_eq!(b.size(), None);
        assert_eq!(b.frame(600.0).height, 0.0);

        b.set_visible(true);
        assert_eq!(b.state(), BoxState::Measuring);
    }

    #[test]
    fn test_states_only_move_forward() {
        let mut b = animator();
        b.set_visible(true);
        b.measured(80.0, 30.0, 0.0);
        let mut last = b.state();
        let mut now = 0.0;
        while now < 2000.0 {
            b.tick(now);
            b.set_visible(true);
            assert!(b.state() >= last);
            last = b.state();
            now += 7.0;
        }
        assert_eq!(last, BoxState::Done);
    }

    #[test]
    fn test_dash_offset_tracks_stroke() {
        let mut b = animator();
        b.set_visible(true);
        b.measured(300.0, 120.0, 0.0);
        assert_eq!(b.frame(100.0).dash_offset(), b.frame(100.0).perimeter);

        b.tick(400.0);
        let mid = b.frame(1000.0);
        assert!(mid.dash_offset() > 0.0 && mid.dash_offset() < mid.perimeter);
        assert_eq!(mid.width, 300.0);
        assert_eq!(mid.corner_radius, 6.0);

        b.tick(1600.0);
        assert_eq!(b.frame(1600.0).dash_offset(), 0.0);
    }

    #[test]
    fn test_perimeter() {
        assert_eq!(rounded_rect_perimeter(100.0, 50.0, 0.0), 300.0);
        let r = 10.0;
        let expected = 300.0 - 8.0 * r + 2.0 * PI * r;
        assert!((rounded_rect_perimeter(100.0, 50.0, r) - expected).abs() < 1e-3);
        // Radius clamps to half the short side: a full circle-ended pill
        let pill = rounded_rect_perimeter(100.0, 20.0, 50.0);
        assert!((pill - (2.0 * 80.0 + 2.0 * PI * 10.0)).abs() < 1e-3);
        assert_eq!(rounded_rect_perimeter(0.0, 50.0, 5.0), 0.0);
    }
}
