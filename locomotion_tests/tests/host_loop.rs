//! Host loop tests: input queue draining, tuning console, scripted runs.

use locomotion_host::{
    source::{RandomInput, ScriptedInput},
    SimHost,
};
use locomotion_shared::{
    animation::AnimationFlags,
    config::HostConfig,
    event::InputEvent,
    physics::{FlatGroundMover, Mover},
};
use locomotion_tests::init_tracing;
use tracing::info;

fn host() -> SimHost {
    SimHost::new(HostConfig::default(), FlatGroundMover::new(0.0)).unwrap()
}

#[test]
fn queued_events_apply_before_the_frame() {
    let mut host = host();
    let tx = host.input_sender();
    let dt = host.cfg.frame_dt();

    tx.send(InputEvent::movement(0.0, 1.0));
    tx.send(InputEvent::run(true));
    let r = host.step(dt).unwrap();
    assert!((r.displacement.z - 3.0 * dt).abs() < 1e-6);
    assert!(r.flags.contains(AnimationFlags::RUNNING));

    // Nothing new queued: intent persists.
    let r = host.step(dt).unwrap();
    assert!((r.displacement.z - 3.0 * dt).abs() < 1e-6);
}

#[test]
fn queue_is_drained_once_per_frame() {
    let mut host = host();
    let tx = host.input_sender();
    let dt = host.cfg.frame_dt();

    // A press and release within one frame collapse to the final state.
    tx.send(InputEvent::jump(true));
    tx.send(InputEvent::jump(false));
    let r = host.step(dt).unwrap();
    assert!(!r.vertical.jump_started);

    // Events sent after a step wait for the next one.
    tx.send(InputEvent::jump(true));
    assert!(!host.controller().intent().unwrap().jump_held);
    let r = host.step(dt).unwrap();
    assert!(r.vertical.jump_started);
}

#[test]
fn producer_thread_feeds_queue() {
    let mut host = host();
    let tx = host.input_sender();
    let dt = host.cfg.frame_dt();

    std::thread::spawn(move || {
        tx.send(InputEvent::movement(1.0, 0.0));
    })
    .join()
    .unwrap();

    let r = host.step(dt).unwrap();
    assert!((r.displacement.x - dt).abs() < 1e-6);
}

#[test]
fn console_retunes_controller() {
    let mut host = host();
    let out = host.exec_console("set run_multiplier 2").unwrap();
    assert_eq!(out, vec!["run_multiplier = 2".to_string()]);
    assert_eq!(host.controller().config().run_multiplier, 2.0);
    assert_eq!(host.cfg.controller.run_multiplier, 2.0);

    let before = host.controller().jump_profile();
    host.exec_console("max_jump_height 8").unwrap();
    assert!(host.controller().jump_profile().initial_jump_velocity > before.initial_jump_velocity);

    assert!(host.exec_console("set fall_multiplier -1").is_err());
    assert_eq!(host.controller().config().fall_multiplier, 2.0);
}

#[test]
fn switching_to_constant_gravity_mid_jump_releases_jump() {
    let mut host = host();
    let tx = host.input_sender();
    let dt = host.cfg.frame_dt();

    tx.send(InputEvent::jump(true));
    assert!(host.step(dt).unwrap().vertical.jump_started);
    tx.send(InputEvent::jump(false));
    host.step(dt);

    host.exec_console("set gravity_model constant").unwrap();
    for _ in 0..600 {
        let r = host.step(dt).unwrap();
        assert!(!r.vertical.jump_started);
        if r.motion.is_grounded {
            assert!(!r.motion.is_jumping, "frame {}", r.frame);
        }
    }
    let motion = host.controller().motion().unwrap();
    assert!(motion.is_grounded);
    assert!(!motion.is_jumping);
    assert_eq!(motion.vertical, -0.5);
    assert!(!host.controller().flags().contains(AnimationFlags::JUMPING));
}

#[tokio::test]
async fn console_channel_applies_on_step() {
    let mut host = host();
    let (tx, rx) = tokio::sync::mpsc::channel(4);
    host.set_console_input(rx);
    tx.send("set rotation_speed 5".to_string()).await.unwrap();

    host.step(host.cfg.frame_dt());
    assert_eq!(host.controller().config().rotation_speed, 5.0);
}

#[tokio::test]
async fn scripted_jump_run_lands_and_records_trace() -> anyhow::Result<()> {
    init_tracing();
    let mut host = host();
    let mut script = ScriptedInput::builtin("jump").unwrap();
    host.run_for_frames(200, &mut script, false).await?;

    assert_eq!(host.frame(), 200);
    assert!(host.body().is_grounded());
    assert!(host.body().position().z > 0.0);
    let peak = host.trace().peak_height().unwrap();
    info!(peak, "scripted jump peak");
    assert!(peak > 1.5, "peak {peak}");
    assert_eq!(host.trace().len(), 200);
    assert!(!host.controller().flags().contains(AnimationFlags::JUMPING));
    Ok(())
}

#[tokio::test]
async fn ledge_script_falls_without_jump_flag() -> anyhow::Result<()> {
    let body = FlatGroundMover::new(0.0).with_ledge(1.0);
    let mut host = SimHost::new(HostConfig::default(), body)?;
    let mut script = ScriptedInput::builtin("ledge").unwrap();
    host.run_for_frames(120, &mut script, false).await?;

    assert!(!host.body().is_grounded());
    assert!(host.body().position().y < 0.0);
    assert_eq!(host.sink().writes("isJumping"), 0);
    assert!(host.trace().records().all(|r| !r.is_jumping));
    Ok(())
}

#[tokio::test]
async fn random_soak_keeps_invariants() -> anyhow::Result<()> {
    let mut host = host();
    let mut source = RandomInput::new(42);
    host.run_for_frames(2_000, &mut source, false).await?;

    let cfg = host.cfg.controller.clone();
    for r in host.trace().records() {
        if r.grounded {
            // Grounded frames either pin the bias or just took off.
            assert!(r.vertical_velocity == cfg.grounded_gravity_bias || r.is_jumping);
        }
        assert!(r.vertical_velocity.is_finite());
        assert!(r.anim_writes <= 3);
    }
    Ok(())
}

#[tokio::test]
async fn realtime_run_paces_frames() -> anyhow::Result<()> {
    let cfg = HostConfig {
        tick_hz: 200,
        ..HostConfig::default()
    };
    let mut host = SimHost::new(cfg, FlatGroundMover::new(0.0))?;
    let mut script = ScriptedInput::builtin("walk").unwrap();

    let started = std::time::Instant::now();
    host.run_for_frames(20, &mut script, true).await?;
    assert!(started.elapsed() >= std::time::Duration::from_millis(90));
    assert_eq!(host.frame(), 20);
    Ok(())
}
