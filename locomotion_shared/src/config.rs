//! Configuration system.
//!
//! Loads controller and host configuration from JSON strings/files (file IO left to app).
//! Every field has a default so partial JSON documents are accepted.

use anyhow::{bail, Context};
use serde::{Deserialize, Serialize};

/// Vertical model selected at configuration time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum GravityModel {
    /// Physically-derived jump arc with averaged integration and fall multiplier.
    #[default]
    Arc,
    /// Fixed fall speed, no jumping.
    Constant,
}

/// Vertical velocity used by [`GravityModel::Constant`] while grounded.
pub const CONSTANT_GROUNDED_VELOCITY: f32 = -0.5;
/// Vertical velocity used by [`GravityModel::Constant`] while airborne.
pub const CONSTANT_AIRBORNE_VELOCITY: f32 = -9.8;

/// Controller tunables.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ControllerConfig {
    /// Slerp factor per second when turning toward movement.
    pub rotation_speed: f32,
    /// Horizontal speed scale while running.
    pub run_multiplier: f32,
    /// Apex height of a full jump, world units.
    pub max_jump_height: f32,
    /// Seconds from take-off to landing for a full jump.
    pub max_jump_time: f32,
    /// Vertical velocity pinned while grounded. Must be <= 0.
    pub grounded_gravity_bias: f32,
    /// Gravity scale while descending. Must be >= 1.
    pub fall_multiplier: f32,
    /// Fraction of the nominal initial jump velocity applied at take-off.
    pub jump_impulse_scale: f32,
    /// Optional lower bound on vertical velocity (negative).
    pub terminal_velocity: Option<f32>,
    /// Clamp axes to [-1, 1] and map NaN to zero at the input boundary.
    pub clamp_input: bool,
    pub gravity_model: GravityModel,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            rotation_speed: 15.0,
            run_multiplier: 3.0,
            max_jump_height: 4.0,
            max_jump_time: 0.75,
            grounded_gravity_bias: -0.05,
            fall_multiplier: 2.0,
            jump_impulse_scale: 0.5,
            terminal_velocity: None,
            clamp_input: false,
            gravity_model: GravityModel::Arc,
        }
    }
}

impl ControllerConfig {
    /// Parses config from JSON and validates it.
    pub fn from_json_str(s: &str) -> anyhow::Result<Self> {
        let cfg: Self = serde_json::from_str(s).context("parse controller config")?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Checks ranges the integrator relies on.
    pub fn validate(&self) -> anyhow::Result<()> {
        let finite = [
            ("rotation_speed", self.rotation_speed),
            ("run_multiplier", self.run_multiplier),
            ("max_jump_height", self.max_jump_height),
            ("max_jump_time", self.max_jump_time),
            ("grounded_gravity_bias", self.grounded_gravity_bias),
            ("fall_multiplier", self.fall_multiplier),
            ("jump_impulse_scale", self.jump_impulse_scale),
        ];
        for (name, value) in finite {
            if !value.is_finite() {
                bail!("{name} must be finite, got {value}");
            }
        }

        if self.rotation_speed < 0.0 {
            bail!("rotation_speed must be >= 0, got {}", self.rotation_speed);
        }
        if self.run_multiplier <= 0.0 {
            bail!("run_multiplier must be > 0, got {}", self.run_multiplier);
        }
        if self.max_jump_height <= 0.0 {
            bail!("max_jump_height must be > 0, got {}", self.max_jump_height);
        }
        if self.max_jump_time <= 0.0 {
            bail!("max_jump_time must be > 0, got {}", self.max_jump_time);
        }
        if self.grounded_gravity_bias > 0.0 {
            bail!(
                "grounded_gravity_bias must be <= 0, got {}",
                self.grounded_gravity_bias
            );
        }
        if self.fall_multiplier < 1.0 {
            bail!("fall_multiplier must be >= 1, got {}", self.fall_multiplier);
        }
        if self.jump_impulse_scale < 0.0 {
            bail!(
                "jump_impulse_scale must be >= 0, got {}",
                self.jump_impulse_scale
            );
        }
        if let Some(v) = self.terminal_velocity {
            if !v.is_finite() || v >= 0.0 {
                bail!("terminal_velocity must be a negative number, got {v}");
            }
        }
        Ok(())
    }
}

/// Root configuration for the host loop.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HostConfig {
    /// Fixed frame rate.
    #[serde(default = "default_tick_hz")]
    pub tick_hz: u32,
    /// Frames kept in the trace ring.
    #[serde(default = "default_trace_capacity")]
    pub trace_capacity: usize,
    #[serde(default)]
    pub controller: ControllerConfig,
}

fn default_tick_hz() -> u32 {
    60
}

fn default_trace_capacity() -> usize {
    600
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            tick_hz: default_tick_hz(),
            trace_capacity: default_trace_capacity(),
            controller: ControllerConfig::default(),
        }
    }
}

impl HostConfig {
    /// Parses config from JSON.
    pub fn from_json_str(s: &str) -> anyhow::Result<Self> {
        let cfg: Self = serde_json::from_str(s).context("parse host config")?;
        if cfg.tick_hz == 0 {
            bail!("tick_hz must be > 0");
        }
        cfg.controller.validate().context("controller section")?;
        Ok(cfg)
    }

    /// Seconds per frame.
    pub fn frame_dt(&self) -> f32 {
        1.0 / self.tick_hz as f32
    }
}
