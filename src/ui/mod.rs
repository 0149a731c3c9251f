//! Terminal User Interface.
//!
//! - `loop_runner` - Main event loop and terminal management
//! - `input` - Keyboard and mouse handling
//! - `events` - Background task event processing
//! - `render` - View dispatch, header and overlays
//! - `helpers` - Task spawning and link opening
//! - `card` - The swipeable card stack
//! - `saved` - Saved articles list
//! - `status` - Status bar widget

mod card;
mod events;
mod helpers;
mod input;
mod loop_runner;
mod render;
mod saved;
mod status;

pub use loop_runner::{run, Action};
