//! Per-frame particle step
//!
//! One call is one display frame: fade, recompute the field, move, wrap,
//! draw and respawn every particle.

use glam::Vec2;

use super::draw::DrawCmd;
use super::state::FieldState;
use crate::wrap;

/// Input gathered since the previous frame
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Latest pointer position
    pub pointer: Option<Vec2>,
    /// Click positions, in order
    pub clicks: Vec<Vec2>,
    /// New canvas size
    pub resize: Option<(f32, f32)>,
}

impl TickInput {
    /// Clear one-shot inputs after a frame consumed them
    pub fn clear_events(&mut self) {
        self.clicks.clear();
        self.resize = None;
    }
}

/// Advance the field by one frame and write the frame's display list into `draw`
pub fn tick(state: &mut FieldState, input: &TickInput, draw: &mut Vec<DrawCmd>) {
    draw.clear();

    if let Some((w, h)) = input.resize {
        state.resize(w, h);
    }
    if let Some(pointer) = input.pointer {
        state.pointer = pointer;
    }
    for &click in &input.clicks {
        state.burst(click);
    }

    draw.push(DrawCmd::Fade {
        alpha: state.settings.fade_alpha,
    });

    state.field.update(state.time);

    let radius = state.settings.pointer_radius;
    let link_range = state.settings.link_distance;
    let (width, height) = (state.width, state.height);

    for i in 0..state.particles.len() {
        let p = &mut state.particles[i];

        // Flow field
        let angle = state.field.lookup(p.pos);
        p.vel += Vec2::from_angle(angle) * state.settings.flow_force;

        // Pointer repulsion, falling off linearly to zero at `radius`
        let to_pointer = state.pointer - p.pos;
        let distance = to_pointer.length();
        if radius > 0.0 && distance < radius {
            let force = (radius - distance) / radius;
            p.vel -= to_pointer.normalize_or_zero() * force * state.settings.pointer_force;
        }

        p.vel *= state.settings.damping;
        p.pos += p.vel;
        p.pos.x = wrap(p.pos.x, width);
        p.pos.y = wrap(p.pos.y, height);
        p.life -= 1.0;

        let (pos, hue) = (p.pos, p.hue);
        draw.push(DrawCmd::Glow {
            pos,
            radius: p.size * 3.0,
            hue,
            alpha: p.alpha(),
        });

        let last = i
            .saturating_add(state.settings.link_neighbors)
            .min(state.particles.len() - 1);
        for other in &state.particles[i + 1..=last] {
            let distance = pos.distance(other.pos);
            if distance < link_range {
                draw.push(DrawCmd::Link {
                    from: pos,
                    to: other.pos,
                    hue: (hue + other.hue) / 2.0,
                    alpha: (link_range - distance) / link_range * 0.15,
                });
            }
        }

        if state.particles[i].is_dead() {
            state.particles[i] = state.random_particle();
        }
    }

    state.time += 1;
}
