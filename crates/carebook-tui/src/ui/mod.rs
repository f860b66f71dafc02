//! Terminal UI module using ratatui.
//!
//! - `fields`: which fields each step shows
//! - `render`: frame rendering and layout
//! - `input`: keyboard event handling
//! - `styles`: colors and text styling

pub mod fields;
pub mod input;
pub mod render;
pub mod styles;
