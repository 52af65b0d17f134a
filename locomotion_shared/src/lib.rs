//! `locomotion_shared`
//!
//! Shared libraries used by the controller and its hosts.
//!
//! Design goals:
//! - Deterministic and modular where practical.
//! - Clear separation of concerns (math, config, input events, collaborators).
//! - Traits for abstraction and dependency injection.
//! - No `unsafe`.

pub mod animation;
pub mod config;
pub mod event;
pub mod math;
pub mod physics;
pub mod trace;
pub mod tuning;

pub mod prelude {
    //! Commonly used exports.

    pub use crate::animation::*;
    pub use crate::config::*;
    pub use crate::event::*;
    pub use crate::math::*;
    pub use crate::physics::*;
}
