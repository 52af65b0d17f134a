//! Controller implementation.
//!
//! Runs the per-frame pipeline in a fixed order:
//! 1. facing toward movement intent
//! 2. walking/running animation flags
//! 3. compose displacement (this frame's intent, last frame's vertical velocity) and move
//! 4. vertical step against the grounded status the move just produced
//!
//! A jump started in step 4 replaces the vertical velocity and is picked up by
//! the mover on the following frame.
//!
//! Intent and motion state exist only while the controller is active.

use anyhow::Context;
use locomotion_shared::{
    animation::{AnimationFlags, AnimationSink},
    config::ControllerConfig,
    event::InputEvent,
    math::Vec3,
    physics::{Mover, TransformHandle},
};
use tracing::{info, trace};

use crate::{
    animation::AnimationStateSync,
    input::{InputIntent, InputSampler},
    locomotion::LocomotionComposer,
    orientation::OrientationController,
    vertical::{JumpProfile, MotionState, VerticalIntegrator, VerticalStep},
};

/// Outcome of one `update` call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameReport {
    pub frame: u64,
    /// Displacement handed to the mover.
    pub displacement: Vec3,
    /// Motion state after the vertical step.
    pub motion: MotionState,
    pub flags: AnimationFlags,
    /// Animation parameter writes issued this frame.
    pub anim_writes: u32,
    pub vertical: VerticalStep,
}

/// Per-activation state.
#[derive(Debug)]
struct Session {
    sampler: InputSampler,
    motion: MotionState,
    anim: AnimationStateSync,
    frame: u64,
}

/// Third-person locomotion controller.
#[derive(Debug)]
pub struct LocomotionController {
    cfg: ControllerConfig,
    orientation: OrientationController,
    composer: LocomotionComposer,
    vertical: VerticalIntegrator,
    session: Option<Session>,
}

impl LocomotionController {
    /// Creates an inactive controller.
    pub fn new(cfg: ControllerConfig) -> anyhow::Result<Self> {
        cfg.validate().context("controller config")?;
        Ok(Self {
            orientation: OrientationController::new(cfg.rotation_speed),
            composer: LocomotionComposer::new(cfg.run_multiplier),
            vertical: VerticalIntegrator::from_config(&cfg),
            cfg,
            session: None,
        })
    }

    pub fn config(&self) -> &ControllerConfig {
        &self.cfg
    }

    /// Replaces the tunables. Motion state of an active session is kept.
    pub fn reconfigure(&mut self, cfg: ControllerConfig) -> anyhow::Result<()> {
        cfg.validate().context("controller config")?;
        self.orientation = OrientationController::new(cfg.rotation_speed);
        self.composer = LocomotionComposer::new(cfg.run_multiplier);
        self.vertical = VerticalIntegrator::from_config(&cfg);
        if let Some(session) = self.session.as_mut() {
            session.sampler.set_clamp(cfg.clamp_input);
        }
        info!(profile = ?self.vertical.profile(), model = ?cfg.gravity_model, "controller reconfigured");
        self.cfg = cfg;
        Ok(())
    }

    pub fn jump_profile(&self) -> JumpProfile {
        self.vertical.profile()
    }

    pub fn jump_off_velocity(&self) -> f32 {
        self.vertical.jump_off_velocity()
    }

    /// Starts a fresh session. No-op if already active.
    pub fn activate(&mut self) {
        if self.session.is_some() {
            return;
        }
        self.session = Some(Session {
            sampler: InputSampler::new(self.cfg.clamp_input),
            motion: MotionState::default(),
            anim: AnimationStateSync::new(),
            frame: 0,
        });
        info!("locomotion controller activated");
    }

    /// Discards intent, motion and animation mirror.
    pub fn deactivate(&mut self) {
        if let Some(session) = self.session.take() {
            info!(frames = session.frame, "locomotion controller deactivated");
        }
    }

    pub fn is_active(&self) -> bool {
        self.session.is_some()
    }

    /// Applies an input event. Ignored (returns false) while inactive.
    pub fn handle_input(&mut self, event: InputEvent) -> bool {
        match self.session.as_mut() {
            Some(session) => {
                session.sampler.apply(event);
                true
            }
            None => false,
        }
    }

    pub fn intent(&self) -> Option<&InputIntent> {
        self.session.as_ref().map(|s| s.sampler.intent())
    }

    pub fn motion(&self) -> Option<&MotionState> {
        self.session.as_ref().map(|s| &s.motion)
    }

    pub fn flags(&self) -> AnimationFlags {
        self.session
            .as_ref()
            .map(|s| s.anim.flags())
            .unwrap_or_default()
    }

    /// Runs one frame. Returns `None` while inactive.
    pub fn update<B, S>(&mut self, body: &mut B, sink: &mut S, dt: f32) -> Option<FrameReport>
    where
        B: Mover + TransformHandle,
        S: AnimationSink,
    {
        let session = self.session.as_mut()?;
        let intent = *session.sampler.intent();
        let pressed = intent.is_movement_pressed();

        self.orientation.update(body, intent.planar(), pressed, dt);

        let mut anim_writes = session.anim.sync_locomotion(&intent, sink);

        let (velocity, displacement) = self.composer.drive(body, &intent, session.motion.vertical, dt);
        session.motion.horizontal = velocity.horizontal();

        let vstep = self.vertical.step(
            &mut session.motion,
            body.is_grounded(),
            intent.jump_held,
            dt,
        );
        if vstep.landed {
            anim_writes += session.anim.set_jumping(false, sink);
        }
        if vstep.jump_started {
            anim_writes += session.anim.set_jumping(true, sink);
        }

        let report = FrameReport {
            frame: session.frame,
            displacement,
            motion: session.motion,
            flags: session.anim.flags(),
            anim_writes,
            vertical: vstep,
        };
        session.frame += 1;

        trace!(
            frame = report.frame,
            vy = report.motion.vertical,
            grounded = report.motion.is_grounded,
            jumping = report.motion.is_jumping,
            "frame"
        );
        Some(report)
    }
}

#[cfg(test)]
mod tests {
    use locomotion_shared::{animation::RecordingSink, physics::FlatGroundMover};

    use super::*;

    const DT: f32 = 1.0 / 60.0;

    fn active() -> LocomotionController {
        let mut c = LocomotionController::new(ControllerConfig::default()).unwrap();
        c.activate();
        c
    }

    #[test]
    fn inactive_controller_ignores_everything() {
        let mut c = LocomotionController::new(ControllerConfig::default()).unwrap();
        let mut body = FlatGroundMover::new(0.0);
        let mut sink = RecordingSink::new();
        assert!(!c.handle_input(InputEvent::movement(0.0, 1.0)));
        assert!(c.update(&mut body, &mut sink, DT).is_none());
        assert_eq!(body.move_count(), 0);
        assert!(c.intent().is_none());
    }

    #[test]
    fn deactivate_discards_state() {
        let mut c = active();
        let mut body = FlatGroundMover::new(0.0);
        let mut sink = RecordingSink::new();
        c.handle_input(InputEvent::movement(1.0, 0.0));
        c.update(&mut body, &mut sink, DT).unwrap();
        assert!(c.flags().contains(AnimationFlags::WALKING));

        c.deactivate();
        assert!(!c.is_active());
        c.activate();
        assert_eq!(c.intent(), Some(&InputIntent::default()));
        assert_eq!(c.motion(), Some(&MotionState::default()));
        assert_eq!(c.flags(), AnimationFlags::empty());
    }

    #[test]
    fn jump_impulse_reaches_mover_next_frame() {
        let mut c = active();
        let mut body = FlatGroundMover::new(0.0);
        let mut sink = RecordingSink::new();

        c.handle_input(InputEvent::jump(true));
        let first = c.update(&mut body, &mut sink, DT).unwrap();
        assert!(first.vertical.jump_started);
        // This frame's move used the velocity from before the jump.
        assert_eq!(first.displacement.y, 0.0);
        assert_eq!(first.motion.vertical, c.jump_off_velocity());
        assert!(sink.get("isJumping"));

        let second = c.update(&mut body, &mut sink, DT).unwrap();
        assert_eq!(second.displacement.y, c.jump_off_velocity() * DT);
        assert!(!second.motion.is_grounded);
    }

    #[test]
    fn reconfigure_recomputes_profile() {
        let mut c = active();
        let before = c.jump_profile();
        let cfg = ControllerConfig {
            max_jump_height: 2.0,
            ..ControllerConfig::default()
        };
        c.reconfigure(cfg).unwrap();
        assert_eq!(c.jump_profile().initial_jump_velocity, before.initial_jump_velocity / 2.0);
        assert!(c.is_active());

        let bad = ControllerConfig {
            max_jump_time: -1.0,
            ..ControllerConfig::default()
        };
        assert!(c.reconfigure(bad).is_err());
        assert_eq!(c.config().max_jump_height, 2.0);
    }

    #[test]
    fn new_rejects_invalid_config() {
        let cfg = ControllerConfig {
            fall_multiplier: 0.0,
            ..ControllerConfig::default()
        };
        assert!(LocomotionController::new(cfg).is_err());
    }
}
