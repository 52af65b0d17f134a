//! `locomotion_host`
//!
//! Host-side systems:
//! - Fixed timestep frame loop
//! - Input queue drained once per frame
//! - Runtime tuning console
//! - Scripted / random input sources
//! - Frame trace recording

pub mod host;
pub mod source;

pub use host::SimHost;
