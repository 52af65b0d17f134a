//! Vertical motion: gravity, grounded pinning and the jump state machine.
//!
//! Per frame, after the mover has resolved this frame's displacement:
//! 1. gravity step (grounded pin, or averaged integration while airborne)
//! 2. jump transition check
//!
//! The velocity produced here is consumed by the mover on the next frame.
//!
//! Airborne integration uses the mean of the pre-step and naive post-step
//! velocity:
//!
//! ```text
//! v_next = (v + (v + g * k * dt)) / 2      k = fall_multiplier when v <= 0, else 1
//! ```

use locomotion_shared::{
    config::{ControllerConfig, GravityModel, CONSTANT_AIRBORNE_VELOCITY, CONSTANT_GROUNDED_VELOCITY},
    math::Vec2,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Gravity and take-off speed derived from apex height and total air time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct JumpProfile {
    /// Always negative.
    pub gravity: f32,
    /// Always positive.
    pub initial_jump_velocity: f32,
}

impl JumpProfile {
    /// `time_to_apex = max_jump_time / 2`
    /// `gravity = -2h / time_to_apex^2`
    /// `initial_jump_velocity = 2h / time_to_apex`
    pub fn from_height_and_time(max_jump_height: f32, max_jump_time: f32) -> Self {
        let time_to_apex = max_jump_time / 2.0;
        Self {
            gravity: (-2.0 * max_jump_height) / (time_to_apex * time_to_apex),
            initial_jump_velocity: (2.0 * max_jump_height) / time_to_apex,
        }
    }

    /// Per-second velocity change while rising under averaged integration.
    ///
    /// Each airborne step adds `gravity * dt / 2`, so the arc behaves as if
    /// gravity were half the kinematic value.
    pub fn effective_gravity(&self) -> f32 {
        self.gravity * 0.5
    }
}

/// Mutable motion state of the character.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MotionState {
    /// Horizontal velocity requested this frame (x, z).
    pub horizontal: Vec2,
    /// Vertical velocity. Persists across frames.
    pub vertical: f32,
    /// Mover contact as read after this frame's move.
    pub is_grounded: bool,
    /// Airborne because of a jump. Cleared only once grounded with jump released.
    pub is_jumping: bool,
    /// Jump animation pending; cleared on the first grounded gravity step.
    pub is_jump_animating: bool,
}

/// What changed during one vertical step.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VerticalStep {
    /// Grounded contact cleared a pending jump animation.
    pub landed: bool,
    pub jump_started: bool,
    pub jump_ended: bool,
}

/// Owns gravity and jump-arc physics.
#[derive(Debug, Clone)]
pub struct VerticalIntegrator {
    profile: JumpProfile,
    model: GravityModel,
    grounded_bias: f32,
    fall_multiplier: f32,
    impulse_scale: f32,
    terminal_velocity: Option<f32>,
}

impl VerticalIntegrator {
    pub fn from_config(cfg: &ControllerConfig) -> Self {
        Self {
            profile: JumpProfile::from_height_and_time(cfg.max_jump_height, cfg.max_jump_time),
            model: cfg.gravity_model,
            grounded_bias: cfg.grounded_gravity_bias,
            fall_multiplier: cfg.fall_multiplier,
            impulse_scale: cfg.jump_impulse_scale,
            terminal_velocity: cfg.terminal_velocity,
        }
    }

    pub fn profile(&self) -> JumpProfile {
        self.profile
    }

    pub fn model(&self) -> GravityModel {
        self.model
    }

    /// Vertical velocity set at take-off.
    pub fn jump_off_velocity(&self) -> f32 {
        self.profile.initial_jump_velocity * self.impulse_scale
    }

    /// Full per-frame vertical update: gravity first, then jump transitions.
    pub fn step(&self, state: &mut MotionState, grounded: bool, jump_held: bool, dt: f32) -> VerticalStep {
        state.is_grounded = grounded;
        let landed = self.apply_gravity(state, dt);
        let (jump_started, jump_ended) = self.handle_jump(state, jump_held);
        VerticalStep {
            landed,
            jump_started,
            jump_ended,
        }
    }

    /// Gravity/grounded policy. Returns true if a pending jump animation was cleared.
    pub fn apply_gravity(&self, state: &mut MotionState, dt: f32) -> bool {
        if state.is_grounded {
            state.vertical = match self.model {
                GravityModel::Arc => self.grounded_bias,
                GravityModel::Constant => CONSTANT_GROUNDED_VELOCITY,
            };
            if state.is_jump_animating {
                state.is_jump_animating = false;
                debug!("landed, jump animation cleared");
                return true;
            }
            return false;
        }

        state.vertical = match self.model {
            GravityModel::Constant => CONSTANT_AIRBORNE_VELOCITY,
            GravityModel::Arc => {
                let scale = if state.vertical <= 0.0 {
                    self.fall_multiplier
                } else {
                    1.0
                };
                let previous = state.vertical;
                let naive = previous + self.profile.gravity * scale * dt;
                let next = (previous + naive) * 0.5;
                match self.terminal_velocity {
                    Some(limit) => next.max(limit),
                    None => next,
                }
            }
        };
        false
    }

    /// Jump state machine. Returns `(started, ended)`.
    ///
    /// The constant model never starts a jump, but still releases one left
    /// over from a switch out of the arc model.
    pub fn handle_jump(&self, state: &mut MotionState, jump_held: bool) -> (bool, bool) {
        let can_start = self.model == GravityModel::Arc;

        if can_start && !state.is_jumping && state.is_grounded && jump_held {
            state.is_jumping = true;
            state.is_jump_animating = true;
            state.vertical = self.jump_off_velocity();
            debug!(velocity = state.vertical, "jump started");
            (true, false)
        } else if !jump_held && state.is_jumping && state.is_grounded {
            state.is_jumping = false;
            debug!("jump ended");
            (false, true)
        } else {
            (false, false)
        }
    }
}
