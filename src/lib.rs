//! newsdeck: a terminal card-deck news reader.
//!
//! - [`swipe`] - Gesture physics, deck position and reload coordination
//! - [`storage`] - SQLite-backed saved items and preferences
//! - [`news`] - News API client with built-in sample fallback
//! - [`server`] - The read-only news API (`newsdeck --serve`)
//! - [`ui`] - ratatui front end

pub mod app;
pub mod config;
pub mod news;
pub mod server;
pub mod storage;
pub mod swipe;
pub mod theme;
pub mod ui;
pub mod util;
