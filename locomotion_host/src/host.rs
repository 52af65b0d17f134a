//! Host implementation.
//!
//! A fixed-timestep frame loop around one controller:
//! - Console tuning lines (applied before input)
//! - Input queue drained exactly once per frame
//! - Controller update against a kinematic body
//! - Frame trace recording
//!
//! Determinism notes:
//! - Keep simulation in a fixed timestep.
//! - Wall-clock pacing (`realtime`) only affects sleeping, never the step.

use anyhow::Context;
use locomotion_controller::{FrameReport, LocomotionController};
use locomotion_shared::{
    animation::RecordingSink,
    config::HostConfig,
    event::{InputQueue, InputSender},
    physics::FlatGroundMover,
    trace::{FrameRecord, FrameTrace},
    tuning::TuningConsole,
};
use tokio::{sync::mpsc, time::Instant};
use tracing::{debug, info, warn};

use crate::source::InputSource;

/// Headless host for a single character.
pub struct SimHost {
    pub cfg: HostConfig,
    controller: LocomotionController,
    body: FlatGroundMover,
    sink: RecordingSink,

    input_tx: InputSender,
    input: InputQueue,

    console: TuningConsole,
    console_rx: Option<mpsc::Receiver<String>>,

    trace: FrameTrace,
    frame: u64,
}

impl SimHost {
    /// Creates a host with an activated controller.
    pub fn new(cfg: HostConfig, body: FlatGroundMover) -> anyhow::Result<Self> {
        let mut controller =
            LocomotionController::new(cfg.controller.clone()).context("create controller")?;
        controller.activate();
        let (input_tx, input) = InputQueue::channel();

        Ok(Self {
            trace: FrameTrace::new(cfg.trace_capacity),
            cfg,
            controller,
            body,
            sink: RecordingSink::new(),
            input_tx,
            input,
            console: TuningConsole::new(),
            console_rx: None,
            frame: 0,
        })
    }

    /// Handle for producers on other threads/tasks.
    pub fn input_sender(&self) -> InputSender {
        self.input_tx.clone()
    }

    /// Sets the console input receiver.
    pub fn set_console_input(&mut self, rx: mpsc::Receiver<String>) {
        self.console_rx = Some(rx);
    }

    pub fn controller(&self) -> &LocomotionController {
        &self.controller
    }

    pub fn body(&self) -> &FlatGroundMover {
        &self.body
    }

    pub fn sink(&self) -> &RecordingSink {
        &self.sink
    }

    pub fn trace(&self) -> &FrameTrace {
        &self.trace
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Executes a tuning line and applies any change to the controller.
    pub fn exec_console(&mut self, line: &str) -> anyhow::Result<Vec<String>> {
        let mut cfg = self.controller.config().clone();
        let outcome = self.console.exec(line, &mut cfg)?;
        if let Some(tunable) = outcome.changed {
            self.controller.reconfigure(cfg.clone())?;
            self.cfg.controller = cfg;
            if tunable.affects_jump_profile() {
                info!(profile = ?self.controller.jump_profile(), "jump profile recomputed");
            }
        }
        Ok(outcome.output)
    }

    fn process_console_commands(&mut self) {
        // Collect lines first to avoid borrow conflict
        let lines: Vec<String> = if let Some(ref mut rx) = self.console_rx {
            let mut collected = Vec::new();
            while let Ok(line) = rx.try_recv() {
                collected.push(line);
            }
            collected
        } else {
            Vec::new()
        };

        for line in lines {
            match self.exec_console(&line) {
                Ok(output) => {
                    for out in output {
                        println!("{out}");
                    }
                }
                Err(e) => warn!(error = %e, line = %line, "console command failed"),
            }
        }
    }

    /// Executes one fixed step.
    pub fn step(&mut self, dt: f32) -> Option<FrameReport> {
        self.process_console_commands();

        let events = self.input.drain();
        if !events.is_empty() {
            debug!(frame = self.frame, count = events.len(), "input drained");
        }
        for ev in events {
            self.controller.handle_input(ev);
        }

        let report = self.controller.update(&mut self.body, &mut self.sink, dt);
        if let Some(r) = &report {
            self.trace.push(FrameRecord {
                frame: self.frame,
                dt,
                position: self.body.position(),
                displacement: r.displacement,
                vertical_velocity: r.motion.vertical,
                grounded: r.motion.is_grounded,
                is_jumping: r.motion.is_jumping,
                flags: r.flags,
                anim_writes: r.anim_writes,
            });
        }
        self.frame += 1;
        report
    }

    /// Runs `frames` steps, feeding `source` through the input queue.
    ///
    /// With `realtime` the loop sleeps to the configured tick rate.
    pub async fn run_for_frames(
        &mut self,
        frames: u64,
        source: &mut dyn InputSource,
        realtime: bool,
    ) -> anyhow::Result<()> {
        let dt = self.cfg.frame_dt();
        let tick = std::time::Duration::from_secs_f32(dt);
        let mut next = Instant::now();
        let tx = self.input_sender();

        info!(frames, tick_hz = self.cfg.tick_hz, realtime, "Running host");
        for _ in 0..frames {
            for ev in source.poll(self.frame).await.context("poll input source")? {
                if !tx.send(ev) {
                    warn!(frame = self.frame, event = ?ev, "input queue closed, event dropped");
                }
            }
            self.step(dt);
            if realtime {
                next += tick;
                tokio::time::sleep_until(next).await;
            }
        }
        info!(
            frames = self.frame,
            position = ?self.body.position(),
            anim_writes = self.sink.total_writes(),
            "Host finished"
        );
        Ok(())
    }
}
