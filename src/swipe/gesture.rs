//! Per-card gesture state machine.
//!
//! ```text
//! Idle ──begin_drag──▶ Dragging ──end_drag (|x| > threshold)──▶ Committing ──settle──▶ Advancing ──finish_advance──▶ Idle
//!  ▲                      │
//!  └──settle── Cancelling ◀── end_drag (|x| <= threshold)
//! ```

use std::time::Duration;

use super::spring::Spring;
use super::visual::{derive_visual_state, Offset, SwipeDirection, SwipeGeometry, VisualState};

// Offsets are in surface units (pixels or terminal cells)
const OFFSET_REST: f64 = 0.5;
const OFFSET_REST_VELOCITY: f64 = 5.0;
const OPACITY_REST: f64 = 0.01;
const OPACITY_REST_VELOCITY: f64 = 0.05;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Dragging,
    /// Flying off screen after a release past the threshold
    Committing(SwipeDirection),
    /// Springing back to rest after a short release
    Cancelling,
    /// Off screen; waiting for the owner to advance the deck
    Advancing(SwipeDirection),
}

/// Reported by [`CardGesture::tick`] when an animation comes to rest.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Settled {
    /// The fly-off finished. Emitted once per commit.
    Committed(SwipeDirection),
    /// The card is back at rest.
    Returned,
}

#[derive(Debug, Clone)]
pub struct CardGesture {
    geometry: SwipeGeometry,
    phase: Phase,
    offset: Offset,
    drag_origin: Offset,
    spring_x: Spring,
    spring_y: Spring,
    spring_opacity: Spring,
}

impl CardGesture {
    pub fn new(geometry: SwipeGeometry) -> Self {
        Self {
            geometry,
            phase: Phase::Idle,
            offset: Offset::ZERO,
            drag_origin: Offset::ZERO,
            spring_x: Spring::resting(0.0),
            spring_y: Spring::resting(0.0),
            spring_opacity: Spring::resting(1.0),
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn offset(&self) -> Offset {
        self.offset
    }

    pub fn geometry(&self) -> SwipeGeometry {
        self.geometry
    }

    /// Resize the surface. A card already flying off is retargeted to the new edge.
    pub fn set_geometry(&mut self, geometry: SwipeGeometry) {
        self.geometry = geometry;
        if let Phase::Committing(direction) = self.phase {
            self.spring_x.set_target(direction.sign() * geometry.width);
        }
    }

    /// Whether new drag or keyboard input would be accepted.
    pub fn accepts_input(&self) -> bool {
        matches!(self.phase, Phase::Idle | Phase::Cancelling)
    }

    /// How the card should be drawn right now.
    pub fn visual(&self) -> VisualState {
        match self.phase {
            Phase::Committing(_) | Phase::Advancing(_) => {
                let derived = derive_visual_state(self.offset, self.geometry);
                VisualState {
                    opacity: self.spring_opacity.position().clamp(0.0, 1.0),
                    ..derived
                }
            }
            _ => derive_visual_state(self.offset, self.geometry),
        }
    }

    // ========================================================================
    // Input
    // ========================================================================

    /// Start a drag from wherever the card currently is. Grabbing a card
    /// that is springing back is allowed; one that is leaving is not.
    pub fn begin_drag(&mut self) -> bool {
        if !self.accepts_input() {
            return false;
        }
        self.drag_origin = self.offset;
        self.phase = Phase::Dragging;
        true
    }

    /// Move the card to `drag origin + translation`.
    pub fn update_drag(&mut self, translation: Offset) {
        if self.phase == Phase::Dragging {
            self.offset = self.drag_origin + translation;
        }
    }

    /// Release the card, choosing between fly-off and spring-back.
    pub fn end_drag(&mut self) -> Phase {
        if self.phase != Phase::Dragging {
            return self.phase;
        }

        if self.geometry.crosses_threshold(self.offset) {
            let direction = SwipeDirection::from_offset(self.offset.x);
            let opacity = derive_visual_state(self.offset, self.geometry).opacity;
            self.start_commit(direction, opacity);
        } else {
            self.spring_x = offset_spring(self.offset.x, 0.0);
            self.spring_y = offset_spring(self.offset.y, 0.0);
            self.phase = Phase::Cancelling;
        }
        self.phase
    }

    /// Throw the card off screen without a drag (keyboard swipe).
    pub fn fling(&mut self, direction: SwipeDirection) -> bool {
        if self.phase != Phase::Idle {
            return false;
        }
        self.start_commit(direction, 1.0);
        true
    }

    fn start_commit(&mut self, direction: SwipeDirection, opacity: f64) {
        self.spring_x =
            offset_spring(self.offset.x, direction.sign() * self.geometry.width).critically_damped();
        self.spring_opacity = Spring::new(opacity, 0.0)
            .critically_damped()
            .with_rest_thresholds(OPACITY_REST, OPACITY_REST_VELOCITY);
        self.phase = Phase::Committing(direction);
        tracing::trace!(?direction, x = self.offset.x, "Swipe committed");
    }

    // ========================================================================
    // Animation
    // ========================================================================

    /// Advance running animations by `dt`.
    pub fn tick(&mut self, dt: Duration) -> Option<Settled> {
        match self.phase {
            Phase::Committing(direction) => {
                self.spring_x.advance(dt);
                self.spring_opacity.advance(dt);
                // y stays where the card was released
                self.offset.x = self.spring_x.position();

                if self.spring_x.is_at_rest() && self.spring_opacity.is_at_rest() {
                    self.phase = Phase::Advancing(direction);
                    return Some(Settled::Committed(direction));
                }
                None
            }
            Phase::Cancelling => {
                self.spring_x.advance(dt);
                self.spring_y.advance(dt);
                self.offset = Offset::new(self.spring_x.position(), self.spring_y.position());

                if self.spring_x.is_at_rest() && self.spring_y.is_at_rest() {
                    self.reset();
                    return Some(Settled::Returned);
                }
                None
            }
            Phase::Idle | Phase::Dragging | Phase::Advancing(_) => None,
        }
    }

    /// Return to Idle after the deck advanced. Only valid while Advancing.
    pub fn finish_advance(&mut self) -> bool {
        if !matches!(self.phase, Phase::Advancing(_)) {
            return false;
        }
        self.reset();
        true
    }

    /// Drop any gesture or animation and show the card at rest.
    pub fn reset(&mut self) {
        self.phase = Phase::Idle;
        self.offset = Offset::ZERO;
        self.drag_origin = Offset::ZERO;
        self.spring_x = Spring::resting(0.0);
        self.spring_y = Spring::resting(0.0);
        self.spring_opacity = Spring::resting(1.0);
    }
}

fn offset_spring(from: f64, to: f64) -> Spring {
    Spring::new(from, to).with_rest_thresholds(OFFSET_REST, OFFSET_REST_VELOCITY)
}
