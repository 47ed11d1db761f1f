//! Frame quality analysis.
//!
//! Decides whether a frame can be trusted before any geometry is
//! computed from it.

mod gate;

pub use gate::{GateConfig, GateResult, VisibilityGate};
