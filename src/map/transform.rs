//! Pinch/pan view transform over the fixed-size campus map image.
//!
//! The transform is a uniform scale about the viewport centre followed by a
//! translation. Gesture frames are folded into [`TransformState`] by
//! [`reduce`]; clamping only happens when a gesture ends, so an in-progress
//! pan may overscroll and then settle back.

use std::time::Duration;

use kurbo::{Affine, Point, Size, Vec2};

/// The image can never be shown smaller than the viewport.
pub const MIN_SCALE: f64 = 1.0;

/// Duration of the settle after a pan is released.
pub const PAN_SETTLE_DURATION: Duration = Duration::from_millis(200);

/// Natural frequency (rad/s) of the critically damped settle spring.
const SPRING_OMEGA: f64 = 10.0;

/// A spring settle is at rest once it is this close to its target.
const SPRING_REST_DISPLACEMENT: f64 = 0.01;

/// Ephemeral pan/zoom state of the map screen.
///
/// `last_*` fields hold the baseline that the next gesture frame is applied
/// on top of; they only move when a gesture ends.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TransformState {
    pub scale: f64,
    pub translate: Vec2,
    pub last_scale: f64,
    pub last_translate: Vec2,
}

impl Default for TransformState {
    fn default() -> Self {
        Self {
            scale: MIN_SCALE,
            translate: Vec2::ZERO,
            last_scale: MIN_SCALE,
            last_translate: Vec2::ZERO,
        }
    }
}

/// One frame of a pinch or pan gesture.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum GestureEvent {
    /// Cumulative pinch factor since the pinch began.
    PinchUpdate { factor: f64 },
    PinchEnd,
    /// Cumulative finger translation since the pan began.
    PanUpdate { translation: Vec2 },
    PanEnd,
}

/// How the displayed translation travels to its clamped target.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SettleKind {
    /// Critically damped spring; used when a pinch ends.
    Spring,
    /// Ease-out over a fixed duration; used when a pan ends.
    Timed(Duration),
}

/// Animation from an overscrolled translation back inside bounds.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Settle {
    pub from: Vec2,
    pub to: Vec2,
    pub kind: SettleKind,
}

impl Settle {
    /// Translation to display `elapsed` after the gesture ended.
    pub fn value_at(&self, elapsed: Duration) -> Vec2 {
        if self.is_complete(elapsed) {
            return self.to;
        }
        let t = elapsed.as_secs_f64();
        let remaining = match self.kind {
            SettleKind::Spring => spring_envelope(t),
            SettleKind::Timed(duration) => {
                let progress = (t / duration.as_secs_f64()).clamp(0.0, 1.0);
                (1.0 - progress).powi(3)
            }
        };
        self.to + (self.from - self.to) * remaining
    }

    pub fn is_complete(&self, elapsed: Duration) -> bool {
        match self.kind {
            SettleKind::Spring => {
                let offset = (self.from - self.to).hypot();
                offset * spring_envelope(elapsed.as_secs_f64()) < SPRING_REST_DISPLACEMENT
            }
            SettleKind::Timed(duration) => elapsed >= duration,
        }
    }
}

/// Remaining fraction of a critically damped spring released at rest.
fn spring_envelope(t: f64) -> f64 {
    let wt = SPRING_OMEGA * t;
    (1.0 + wt) * (-wt).exp()
}

/// Result of folding one gesture frame into the state.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Reduced {
    pub state: TransformState,
    /// Present when a gesture ended and the translation has to settle.
    pub settle: Option<Settle>,
}

pub fn clamp_scale(scale: f64) -> f64 {
    scale.max(MIN_SCALE)
}

/// Largest translation on each axis that keeps the scaled image covering
/// the viewport.
pub fn max_translate(scale: f64, viewport: Size) -> Vec2 {
    Vec2::new(
        ((scale * viewport.width - viewport.width) / 2.0).max(0.0),
        ((scale * viewport.height - viewport.height) / 2.0).max(0.0),
    )
}

pub fn clamp_translate(translate: Vec2, scale: f64, viewport: Size) -> Vec2 {
    let max = max_translate(scale, viewport);
    Vec2::new(
        translate.x.clamp(-max.x, max.x),
        translate.y.clamp(-max.y, max.y),
    )
}

/// Fold one gesture frame into `state`.
///
/// Frames with non-finite input are ignored.
pub fn reduce(state: &TransformState, event: GestureEvent, viewport: Size) -> Reduced {
    let mut next = *state;
    let settle = match event {
        GestureEvent::PinchUpdate { factor } => {
            if factor.is_finite() && factor > 0.0 {
                next.scale = clamp_scale(state.last_scale * factor);
            }
            None
        }
        GestureEvent::PinchEnd => {
            next.scale = clamp_scale(state.scale);
            next.last_scale = next.scale;
            let target = clamp_translate(state.translate, next.scale, viewport);
            next.translate = target;
            next.last_translate = target;
            Some(Settle {
                from: state.translate,
                to: target,
                kind: SettleKind::Spring,
            })
        }
        GestureEvent::PanUpdate { translation } => {
            if translation.is_finite() {
                next.translate = state.last_translate + translation;
            }
            None
        }
        GestureEvent::PanEnd => {
            let target = clamp_translate(state.translate, state.scale, viewport);
            next.translate = target;
            next.last_translate = target;
            Some(Settle {
                from: state.translate,
                to: target,
                kind: SettleKind::Timed(PAN_SETTLE_DURATION),
            })
        }
    };
    Reduced {
        state: next,
        settle,
    }
}

impl TransformState {
    /// Affine mapping map-image coordinates into view coordinates.
    pub fn view_transform(&self, viewport: Size) -> Affine {
        let center = viewport.to_vec2() / 2.0;
        Affine::translate(center + self.translate)
            * Affine::scale(self.scale)
            * Affine::translate(-center)
    }

    /// Map a point in view coordinates (e.g. a tap) back onto the image.
    pub fn view_to_image(&self, point: Point, viewport: Size) -> Point {
        self.view_transform(viewport).inverse() * point
    }
}
