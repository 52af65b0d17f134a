//! Standalone headless host binary.
//!
//! Usage:
//!   cargo run -p locomotion_host -- [--tick-hz 60] [--frames 300] [--config host.json]
//!                                   [--script walk|run|jump|ledge|random] [--seed 1]
//!                                   [--trace trace.json] [--realtime]
//!
//! Runs one character over a flat floor (with a ledge for the `ledge` script)
//! and prints a summary. Stdin lines are tuning commands, e.g.
//! `set fall_multiplier 3` or `tunables`; they are only read with `--realtime`.

use std::env;
use std::io::{BufRead, Write};
use std::path::PathBuf;

use anyhow::Context;
use locomotion_host::{
    source::{InputSource, RandomInput, ScriptedInput},
    SimHost,
};
use locomotion_shared::{
    config::HostConfig,
    physics::{FlatGroundMover, Mover},
};
use tokio::sync::mpsc;
use tracing::info;

struct Args {
    cfg: HostConfig,
    frames: u64,
    script: String,
    seed: u64,
    trace: Option<PathBuf>,
    realtime: bool,
}

fn parse_args() -> anyhow::Result<Args> {
    let mut args = Args {
        cfg: HostConfig::default(),
        frames: 300,
        script: "jump".to_string(),
        seed: 1,
        trace: None,
        realtime: false,
    };
    let mut tick_hz = None;
    let argv: Vec<String> = env::args().collect();
    let mut i = 1;
    while i < argv.len() {
        match argv[i].as_str() {
            "--config" if i + 1 < argv.len() => {
                let path = &argv[i + 1];
                let text = std::fs::read_to_string(path)
                    .with_context(|| format!("read config {path}"))?;
                args.cfg = HostConfig::from_json_str(&text)?;
                i += 2;
            }
            "--tick-hz" if i + 1 < argv.len() => {
                tick_hz = Some(argv[i + 1].parse::<u32>().context("--tick-hz")?);
                i += 2;
            }
            "--frames" if i + 1 < argv.len() => {
                args.frames = argv[i + 1].parse::<u64>().context("--frames")?;
                i += 2;
            }
            "--script" if i + 1 < argv.len() => {
                args.script = argv[i + 1].clone();
                i += 2;
            }
            "--seed" if i + 1 < argv.len() => {
                args.seed = argv[i + 1].parse::<u64>().context("--seed")?;
                i += 2;
            }
            "--trace" if i + 1 < argv.len() => {
                args.trace = Some(PathBuf::from(&argv[i + 1]));
                i += 2;
            }
            "--realtime" => {
                args.realtime = true;
                i += 1;
            }
            _ => i += 1,
        }
    }
    // Command line wins over the config file regardless of order.
    if let Some(hz) = tick_hz {
        anyhow::ensure!(hz > 0, "--tick-hz must be > 0");
        args.cfg.tick_hz = hz;
    }
    Ok(args)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .init();

    let args = parse_args()?;
    info!(tick_hz = args.cfg.tick_hz, frames = args.frames, script = %args.script, "Starting host");

    let mut source: Box<dyn InputSource> = if args.script == "random" {
        Box::new(RandomInput::new(args.seed))
    } else {
        Box::new(
            ScriptedInput::builtin(&args.script)
                .with_context(|| format!("unknown script '{}'", args.script))?,
        )
    };

    let body = if args.script == "ledge" {
        FlatGroundMover::new(0.0).with_ledge(2.0)
    } else {
        FlatGroundMover::new(0.0)
    };
    let mut host = SimHost::new(args.cfg.clone(), body).context("create host")?;

    if args.realtime {
        // Set up console input channel.
        let (console_tx, console_rx) = mpsc::channel::<String>(32);
        host.set_console_input(console_rx);

        // Spawn stdin reader thread.
        std::thread::spawn(move || {
            let stdin = std::io::stdin();
            let mut stdout = std::io::stdout();
            loop {
                print!("] ");
                let _ = stdout.flush();
                let mut line = String::new();
                if stdin.lock().read_line(&mut line).is_err() {
                    break;
                }
                let line = line.trim().to_string();
                if !line.is_empty() && console_tx.blocking_send(line).is_err() {
                    break;
                }
            }
        });
    }

    host.run_for_frames(args.frames, source.as_mut(), args.realtime)
        .await
        .context("run host")?;

    let pos = host.body().position();
    println!();
    println!("Frames:        {}", host.frame());
    println!("Position:      ({:.3}, {:.3}, {:.3})", pos.x, pos.y, pos.z);
    println!("Peak height:   {:.3}", host.trace().peak_height().unwrap_or(0.0));
    println!("Grounded:      {}", host.body().is_grounded());
    println!("Anim writes:   {}", host.sink().total_writes());
    println!("Flags:         {:?}", host.controller().flags());

    if let Some(path) = args.trace {
        let json = host.trace().to_json_pretty().context("encode trace")?;
        std::fs::write(&path, json).with_context(|| format!("write {}", path.display()))?;
        println!("Trace written: {}", path.display());
    }

    Ok(())
}
