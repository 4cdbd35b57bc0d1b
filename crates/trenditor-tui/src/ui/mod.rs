//! Terminal UI module using ratatui.
//!
//! - `render`: frame layout, navigation bar, status bar and overlays
//! - `input`: keyboard event handling
//! - `styles`: colour palette and text styling
//! - `views`: per-page content (forms, trends, toots, history)

pub mod input;
pub mod render;
pub mod styles;
pub mod views;
