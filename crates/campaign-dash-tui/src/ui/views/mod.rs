//! Per-view content rendering.

pub mod campaign;
pub mod picker;
pub mod recipients;
