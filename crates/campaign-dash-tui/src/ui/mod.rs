//! Terminal UI module using ratatui.
//!
//! This module provides the TUI rendering and input handling:
//!
//! - `render`: Main frame rendering and layout
//! - `input`: Keyboard and mouse event handling
//! - `styles`: Color schemes and text styling
//! - `dashboard`: Metric tile widget and hit-testing
//! - `views`: Per-view content rendering (picker, campaign, recipients)

pub mod dashboard;
pub mod input;
pub mod render;
pub mod styles;
pub mod views;
