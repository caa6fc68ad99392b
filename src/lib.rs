//! Street layout and procedural rendering library
//!
//! Computes street cross-section layout (occupied/remaining width, segment
//! warnings, per-segment pixel positions, popup hover geometry) and
//! procedurally composites buildings and segments onto a drawing surface.

pub mod layout;
pub mod render;
