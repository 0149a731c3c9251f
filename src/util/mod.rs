//! Small helpers shared by the UI:
//!
//! - **Text**: Unicode-aware width, truncation and control-character stripping
//! - **Links**: scheme check before opening an article link in the browser

mod link;
mod text;

pub use link::{validate_link, LinkError};
pub use text::{display_width, strip_control_chars, truncate_to_width};
