//! `locomotion_controller`
//!
//! Per-frame third-person locomotion:
//! - Input intent sampling
//! - Facing toward movement
//! - Gravity and jump arc integration
//! - Walk/run displacement composition
//! - Animation flag sync (write on change only)

pub mod animation;
pub mod controller;
pub mod input;
pub mod locomotion;
pub mod orientation;
pub mod vertical;

pub use controller::{FrameReport, LocomotionController};
