//! Runtime tuning console.
//!
//! Console-variable style access to [`ControllerConfig`]:
//! - `<name>` prints the current value
//! - `set <name> <value>` or `<name> <value>` assigns
//! - `tunables` lists everything
//!
//! Assignments go through [`ControllerConfig::validate`] and are applied
//! all-or-nothing.

use anyhow::{bail, Context};

use crate::config::{ControllerConfig, GravityModel};

/// A tunable controller parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tunable {
    RotationSpeed,
    RunMultiplier,
    MaxJumpHeight,
    MaxJumpTime,
    GroundedGravityBias,
    FallMultiplier,
    JumpImpulseScale,
    TerminalVelocity,
    ClampInput,
    GravityModel,
}

impl Tunable {
    pub const ALL: [Tunable; 10] = [
        Tunable::RotationSpeed,
        Tunable::RunMultiplier,
        Tunable::MaxJumpHeight,
        Tunable::MaxJumpTime,
        Tunable::GroundedGravityBias,
        Tunable::FallMultiplier,
        Tunable::JumpImpulseScale,
        Tunable::TerminalVelocity,
        Tunable::ClampInput,
        Tunable::GravityModel,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Tunable::RotationSpeed => "rotation_speed",
            Tunable::RunMultiplier => "run_multiplier",
            Tunable::MaxJumpHeight => "max_jump_height",
            Tunable::MaxJumpTime => "max_jump_time",
            Tunable::GroundedGravityBias => "grounded_gravity_bias",
            Tunable::FallMultiplier => "fall_multiplier",
            Tunable::JumpImpulseScale => "jump_impulse_scale",
            Tunable::TerminalVelocity => "terminal_velocity",
            Tunable::ClampInput => "clamp_input",
            Tunable::GravityModel => "gravity_model",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.name() == name)
    }

    /// True if changing this tunable changes the derived jump profile.
    pub fn affects_jump_profile(self) -> bool {
        matches!(self, Tunable::MaxJumpHeight | Tunable::MaxJumpTime)
    }

    pub fn get(self, cfg: &ControllerConfig) -> String {
        match self {
            Tunable::RotationSpeed => cfg.rotation_speed.to_string(),
            Tunable::RunMultiplier => cfg.run_multiplier.to_string(),
            Tunable::MaxJumpHeight => cfg.max_jump_height.to_string(),
            Tunable::MaxJumpTime => cfg.max_jump_time.to_string(),
            Tunable::GroundedGravityBias => cfg.grounded_gravity_bias.to_string(),
            Tunable::FallMultiplier => cfg.fall_multiplier.to_string(),
            Tunable::JumpImpulseScale => cfg.jump_impulse_scale.to_string(),
            Tunable::TerminalVelocity => match cfg.terminal_velocity {
                Some(v) => v.to_string(),
                None => "none".to_string(),
            },
            Tunable::ClampInput => cfg.clamp_input.to_string(),
            Tunable::GravityModel => match cfg.gravity_model {
                GravityModel::Arc => "arc".to_string(),
                GravityModel::Constant => "constant".to_string(),
            },
        }
    }

    fn set(self, cfg: &mut ControllerConfig, raw: &str) -> anyhow::Result<()> {
        let float = || -> anyhow::Result<f32> {
            raw.parse::<f32>()
                .with_context(|| format!("{} expects a number, got '{}'", self.name(), raw))
        };
        match self {
            Tunable::RotationSpeed => cfg.rotation_speed = float()?,
            Tunable::RunMultiplier => cfg.run_multiplier = float()?,
            Tunable::MaxJumpHeight => cfg.max_jump_height = float()?,
            Tunable::MaxJumpTime => cfg.max_jump_time = float()?,
            Tunable::GroundedGravityBias => cfg.grounded_gravity_bias = float()?,
            Tunable::FallMultiplier => cfg.fall_multiplier = float()?,
            Tunable::JumpImpulseScale => cfg.jump_impulse_scale = float()?,
            Tunable::TerminalVelocity => {
                cfg.terminal_velocity = match raw {
                    "none" | "off" => None,
                    _ => Some(float()?),
                }
            }
            Tunable::ClampInput => {
                cfg.clamp_input = match raw {
                    "1" | "true" | "on" => true,
                    "0" | "false" | "off" => false,
                    _ => bail!("clamp_input expects true/false, got '{raw}'"),
                }
            }
            Tunable::GravityModel => {
                cfg.gravity_model = match raw {
                    "arc" => GravityModel::Arc,
                    "constant" => GravityModel::Constant,
                    _ => bail!("gravity_model expects arc|constant, got '{raw}'"),
                }
            }
        }
        Ok(())
    }
}

/// Result of one console line.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct TuningOutcome {
    pub output: Vec<String>,
    /// Tunable that was assigned, if any.
    pub changed: Option<Tunable>,
}

/// Line-oriented tuning console with history.
pub struct TuningConsole {
    history: Vec<String>,
    max_history: usize,
}

impl Default for TuningConsole {
    fn default() -> Self {
        Self::new()
    }
}

impl TuningConsole {
    pub fn new() -> Self {
        Self {
            history: Vec::new(),
            max_history: 100,
        }
    }

    /// Executes a console line against `cfg`.
    pub fn exec(&mut self, line: &str, cfg: &mut ControllerConfig) -> anyhow::Result<TuningOutcome> {
        let line = line.trim();
        if line.is_empty() || line.starts_with("//") {
            return Ok(TuningOutcome::default());
        }

        self.history.push(line.to_string());
        if self.history.len() > self.max_history {
            self.history.remove(0);
        }

        let tokens: Vec<&str> = line.split_whitespace().collect();
        let mut out = TuningOutcome::default();

        match tokens.as_slice() {
            ["tunables"] => {
                for t in Tunable::ALL {
                    out.output.push(format!("  {} = {}", t.name(), t.get(cfg)));
                }
            }
            ["set", name, value] | [name, value] if *name != "set" => {
                let tunable = lookup(name)?;
                let mut next = cfg.clone();
                tunable.set(&mut next, value)?;
                next.validate()
                    .with_context(|| format!("rejected {} = {}", tunable.name(), value))?;
                *cfg = next;
                out.output.push(format!("{} = {}", tunable.name(), tunable.get(cfg)));
                out.changed = Some(tunable);
            }
            ["set", ..] => bail!("usage: set <tunable> <value>"),
            [name] => {
                let tunable = lookup(name)?;
                out.output.push(format!("{} = {}", tunable.name(), tunable.get(cfg)));
            }
            _ => bail!("unknown command: {line}"),
        }
        Ok(out)
    }

    pub fn history(&self) -> &[String] {
        &self.history
    }
}

fn lookup(name: &str) -> anyhow::Result<Tunable> {
    Tunable::from_name(name).with_context(|| format!("unknown tunable: {name}"))
}
