//! Shared fixtures for the integration tests.

use locomotion_controller::{FrameReport, LocomotionController};
use locomotion_shared::{
    animation::RecordingSink,
    config::ControllerConfig,
    event::InputEvent,
    physics::FlatGroundMover,
};

pub const DT: f32 = 1.0 / 60.0;

/// Installs a test-friendly subscriber once per process.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("debug")
        .with_test_writer()
        .try_init();
}

/// A controller wired to a flat-floor body and a recording sink.
pub struct Rig {
    pub controller: LocomotionController,
    pub body: FlatGroundMover,
    pub sink: RecordingSink,
}

impl Rig {
    pub fn new(cfg: ControllerConfig) -> anyhow::Result<Self> {
        Self::with_body(cfg, FlatGroundMover::new(0.0))
    }

    pub fn with_body(cfg: ControllerConfig, body: FlatGroundMover) -> anyhow::Result<Self> {
        let mut controller = LocomotionController::new(cfg)?;
        controller.activate();
        Ok(Self {
            controller,
            body,
            sink: RecordingSink::new(),
        })
    }

    pub fn send(&mut self, event: InputEvent) {
        self.controller.handle_input(event);
    }

    pub fn frame(&mut self) -> FrameReport {
        self.controller
            .update(&mut self.body, &mut self.sink, DT)
            .expect("rig controller is active")
    }

    /// Runs `n` frames and returns every report.
    pub fn frames(&mut self, n: usize) -> Vec<FrameReport> {
        (0..n).map(|_| self.frame()).collect()
    }
}
