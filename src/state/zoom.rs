//! Pan/zoom transform of a chart canvas

use egui::{pos2, Pos2, Vec2};
use std::time::Instant;

use crate::constants::timing::ZOOM_RESET;

/// Scale `k` then translate by (`x`, `y`), in plot-local pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoomTransform {
    pub k: f32,
    pub x: f32,
    pub y: f32,
}

impl ZoomTransform {
    pub const IDENTITY: Self = Self {
        k: 1.0,
        x: 0.0,
        y: 0.0,
    };

    pub fn apply(&self, p: Pos2) -> Pos2 {
        pos2(p.x * self.k + self.x, p.y * self.k + self.y)
    }

    pub fn invert(&self, p: Pos2) -> Pos2 {
        pos2((p.x - self.x) / self.k, (p.y - self.y) / self.k)
    }

    /// Away from identity: zoomed in or panned
    pub fn is_transformed(&self) -> bool {
        self.k > 1.0 || self.x != 0.0 || self.y != 0.0
    }

    fn lerp(from: Self, to: Self, t: f32) -> Self {
        Self {
            k: from.k + (to.k - from.k) * t,
            x: from.x + (to.x - from.x) * t,
            y: from.y + (to.y - from.y) * t,
        }
    }
}

impl Default for ZoomTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

#[derive(Debug, Clone, Copy)]
struct ResetAnimation {
    from: ZoomTransform,
    started: Instant,
}

/// Saved transform of one chart plus an in-flight reset animation
#[derive(Debug, Clone)]
pub struct ZoomState {
    transform: ZoomTransform,
    max_scale: f32,
    animation: Option<ResetAnimation>,
}

impl ZoomState {
    pub fn new(max_scale: f32) -> Self {
        Self {
            transform: ZoomTransform::IDENTITY,
            max_scale: max_scale.max(1.0),
            animation: None,
        }
    }

    pub fn transform(&self) -> ZoomTransform {
        self.transform
    }

    /// Multiply the scale by `factor` keeping `anchor` fixed on screen
    pub fn zoom_at(&mut self, anchor: Pos2, factor: f32) {
        self.animation = None;
        let t = self.transform;
        let k = (t.k * factor).clamp(1.0, self.max_scale);
        let ratio = k / t.k;
        self.transform = ZoomTransform {
            k,
            x: anchor.x - (anchor.x - t.x) * ratio,
            y: anchor.y - (anchor.y - t.y) * ratio,
        };
    }

    pub fn pan(&mut self, delta: Vec2) {
        self.animation = None;
        self.transform.x += delta.x;
        self.transform.y += delta.y;
    }

    /// Start animating back to identity
    pub fn reset(&mut self, now: Instant) {
        if self.transform.is_transformed() {
            self.animation = Some(ResetAnimation {
                from: self.transform,
                started: now,
            });
        }
    }

    /// Advance the reset animation; true while it is still running
    pub fn tick(&mut self, now: Instant) -> bool {
        let Some(anim) = self.animation else {
            return false;
        };
        let elapsed = now.saturating_duration_since(anim.started);
        if elapsed >= ZOOM_RESET {
            self.transform = ZoomTransform::IDENTITY;
            self.animation = None;
            return false;
        }
        let t = elapsed.as_secs_f32() / ZOOM_RESET.as_secs_f32();
        self.transform = ZoomTransform::lerp(anim.from, ZoomTransform::IDENTITY, ease_cubic_in_out(t));
        true
    }

    pub fn is_animating(&self) -> bool {
        self.animation.is_some()
    }

    /// Reset control visibility; hidden as soon as a reset starts
    pub fn show_reset(&self) -> bool {
        self.animation.is_none() && self.transform.is_transformed()
    }
}

fn ease_cubic_in_out(t: f32) -> f32 {
    if t < 0.5 {
        4.0 * t * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
    }
}
