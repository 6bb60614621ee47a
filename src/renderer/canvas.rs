//! Canvas 2D backend
//!
//! Paints the particle display list. Any call the browser rejects is logged
//! and the command is skipped; a bad frame never stops the loop.

use std::f64::consts::TAU;

use wasm_bindgen::JsCast;
use wasm_bindgen::JsValue;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use super::{LINK_WIDTH, fade_style, glow_stops, link_style};
use crate::sim::DrawCmd;

pub struct CanvasRenderer {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    pub size: (u32, u32),
}

impl CanvasRenderer {
    pub fn new(canvas: HtmlCanvasElement) -> Result<Self, JsValue> {
        let ctx = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("canvas has no 2d context"))?
            .dyn_into::<CanvasRenderingContext2d>()?;
        let size = (canvas.width(), canvas.height());
        Ok(Self { canvas, ctx, size })
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.canvas.set_width(width);
        self.canvas.set_height(height);
        self.size = (width, height);
    }

    /// Paint one frame's display list in order
    pub fn render(&self, cmds: &[DrawCmd]) {
        let mut failures = 0;
        for cmd in cmds {
            if let Err(e) = self.draw(cmd) {
                failures += 1;
                if failures == 1 {
                    log::warn!("Canvas draw failed: {:?}", e);
                }
            }
        }
        if failures > 1 {
            log::warn!("{} canvas draws failed this frame", failures);
        }
    }

    fn draw(&self, cmd: &DrawCmd) -> Result<(), JsValue> {
        let ctx = &self.ctx;
        match *cmd {
            DrawCmd::Fade { alpha } => {
                ctx.set_fill_style_str(&fade_style(alpha));
                ctx.fill_rect(0.0, 0.0, self.size.0 as f64, self.size.1 as f64);
            }
            DrawCmd::Glow {
                pos,
                radius,
                hue,
                alpha,
            } => {
                let (x, y, r) = (pos.x as f64, pos.y as f64, radius as f64);
                let gradient = ctx.create_radial_gradient(x, y, 0.0, x, y, r)?;
                for (offset, color) in glow_stops(hue, alpha) {
                    gradient.add_color_stop(offset, &color)?;
                }
                ctx.set_fill_style_canvas_gradient(&gradient);
                ctx.begin_path();
                ctx.arc(x, y, r, 0.0, TAU)?;
                ctx.fill();
            }
            DrawCmd::Link {
                from,
                to,
                hue,
                alpha,
            } => {
                ctx.set_stroke_style_str(&link_style(hue, alpha));
                ctx.set_line_width(LINK_WIDTH);
                ctx.begin_path();
                ctx.move_to(from.x as f64, from.y as f64);
                ctx.line_to(to.x as f64, to.y as f64);
                ctx.stroke();
            }
        }
        Ok(())
    }
}
