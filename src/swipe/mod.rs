//! Gesture-driven card deck.
//!
//! - [`visual`] - Pure offset → rotation/opacity derivation
//! - [`spring`] - Damped spring used for fly-off and spring-back
//! - [`gesture`] - Per-card drag/animation state machine
//! - [`deck`] - Ordered items and the current position
//! - [`session`] - Ties the above to a [`NewsSource`](crate::news::NewsSource) for reloads

pub mod deck;
pub mod gesture;
pub mod session;
pub mod spring;
pub mod visual;

pub use deck::{Advance, Deck};
pub use gesture::{CardGesture, Phase, Settled};
pub use session::{ReloadError, ReloadResult, ReloadTicket, SwipeSession};
pub use visual::{derive_visual_state, interpolate, Offset, SwipeDirection, SwipeGeometry, VisualState};
