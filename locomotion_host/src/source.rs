//! Input sources.
//!
//! A source is polled once per frame for the events that should be queued
//! before that frame runs. Real devices, scripted playback and fuzzing all
//! look the same to the host.

use async_trait::async_trait;
use locomotion_shared::event::InputEvent;
use rand::{rngs::StdRng, Rng, SeedableRng};

#[async_trait]
pub trait InputSource: Send {
    /// Events to deliver before `frame` is simulated.
    async fn poll(&mut self, frame: u64) -> anyhow::Result<Vec<InputEvent>>;
}

/// Frame-indexed playback.
#[derive(Debug, Clone, Default)]
pub struct ScriptedInput {
    timeline: Vec<(u64, InputEvent)>,
    cursor: usize,
}

impl ScriptedInput {
    pub fn new(mut timeline: Vec<(u64, InputEvent)>) -> Self {
        timeline.sort_by_key(|(frame, _)| *frame);
        Self {
            timeline,
            cursor: 0,
        }
    }

    /// Named demo scripts: `walk`, `run`, `jump`, `ledge`.
    pub fn builtin(name: &str) -> Option<Self> {
        let timeline = match name {
            "walk" => vec![
                (0, InputEvent::movement(0.0, 1.0)),
                (60, InputEvent::movement(1.0, 0.0)),
                (120, InputEvent::movement(0.0, 0.0)),
            ],
            "run" => vec![
                (0, InputEvent::movement(0.0, 1.0)),
                (10, InputEvent::run(true)),
                (70, InputEvent::movement(0.0, 0.0)),
                (90, InputEvent::run(false)),
            ],
            "jump" => vec![
                (5, InputEvent::jump(true)),
                (15, InputEvent::jump(false)),
                (80, InputEvent::movement(0.0, 1.0)),
                (85, InputEvent::jump(true)),
                (90, InputEvent::jump(false)),
            ],
            "ledge" => vec![
                (0, InputEvent::movement(0.0, 1.0)),
                (150, InputEvent::movement(0.0, 0.0)),
            ],
            _ => return None,
        };
        Some(Self::new(timeline))
    }

    /// Last frame with a scripted event.
    pub fn last_frame(&self) -> u64 {
        self.timeline.last().map_or(0, |(frame, _)| *frame)
    }

    /// Events due at or before `frame` not yet delivered.
    pub fn due(&mut self, frame: u64) -> Vec<InputEvent> {
        let mut out = Vec::new();
        while let Some((at, ev)) = self.timeline.get(self.cursor) {
            if *at > frame {
                break;
            }
            out.push(*ev);
            self.cursor += 1;
        }
        out
    }
}

#[async_trait]
impl InputSource for ScriptedInput {
    async fn poll(&mut self, frame: u64) -> anyhow::Result<Vec<InputEvent>> {
        Ok(self.due(frame))
    }
}

/// Seeded random input for soak runs.
#[derive(Debug)]
pub struct RandomInput {
    rng: StdRng,
    run: bool,
    jump: bool,
}

impl RandomInput {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            run: false,
            jump: false,
        }
    }

    pub fn next_events(&mut self) -> Vec<InputEvent> {
        let mut out = Vec::new();
        if self.rng.gen_bool(0.1) {
            let x = self.rng.gen_range(-1i8..=1) as f32;
            let y = self.rng.gen_range(-1i8..=1) as f32;
            out.push(InputEvent::movement(x, y));
        }
        if self.rng.gen_bool(0.05) {
            self.run = !self.run;
            out.push(InputEvent::run(self.run));
        }
        if self.rng.gen_bool(0.05) {
            self.jump = !self.jump;
            out.push(InputEvent::jump(self.jump));
        }
        out
    }
}

#[async_trait]
impl InputSource for RandomInput {
    async fn poll(&mut self, _frame: u64) -> anyhow::Result<Vec<InputEvent>> {
        Ok(self.next_events())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scripted_delivers_each_event_once() {
        let mut s = ScriptedInput::new(vec![
            (3, InputEvent::jump(true)),
            (0, InputEvent::movement(0.0, 1.0)),
            (3, InputEvent::jump(false)),
        ]);
        assert_eq!(s.due(0), vec![InputEvent::movement(0.0, 1.0)]);
        assert!(s.due(2).is_empty());
        assert_eq!(s.due(5).len(), 2);
        assert!(s.due(6).is_empty());
        assert_eq!(s.last_frame(), 3);
    }

    #[test]
    fn builtins_exist() {
        for name in ["walk", "run", "jump", "ledge"] {
            assert!(ScriptedInput::builtin(name).is_some(), "{name}");
        }
        assert!(ScriptedInput::builtin("moonwalk").is_none());
    }

    #[test]
    fn random_is_deterministic_per_seed() {
        let mut a = RandomInput::new(7);
        let mut b = RandomInput::new(7);
        for _ in 0..200 {
            assert_eq!(a.next_events(), b.next_events());
        }
    }
}
