//! Input events and the per-frame input queue.
//!
//! Input may be produced on any thread (window pump, gamepad poller, scripted
//! playback). Producers push whole events through an [`InputSender`]; the frame
//! owner drains the [`InputQueue`] exactly once before stepping the controller,
//! so a frame never observes half-applied intent.

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

use crate::math::Vec2;

/// Lifecycle stage of an input action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InputPhase {
    Started,
    Performed,
    Canceled,
}

/// A single logical input signal.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum InputEvent {
    /// Continuous 2D movement (x = strafe, y = forward).
    Move { phase: InputPhase, axes: Vec2 },
    /// Run button edge.
    Run { phase: InputPhase, pressed: bool },
    /// Jump button edge.
    Jump { phase: InputPhase, pressed: bool },
}

impl InputEvent {
    /// Movement change. A zero vector is reported as `Canceled`.
    pub fn movement(x: f32, y: f32) -> Self {
        let axes = Vec2::new(x, y);
        let phase = if axes.is_nonzero() {
            InputPhase::Performed
        } else {
            InputPhase::Canceled
        };
        InputEvent::Move { phase, axes }
    }

    pub fn run(pressed: bool) -> Self {
        InputEvent::Run {
            phase: button_phase(pressed),
            pressed,
        }
    }

    pub fn jump(pressed: bool) -> Self {
        InputEvent::Jump {
            phase: button_phase(pressed),
            pressed,
        }
    }

    pub fn phase(&self) -> InputPhase {
        match *self {
            InputEvent::Move { phase, .. }
            | InputEvent::Run { phase, .. }
            | InputEvent::Jump { phase, .. } => phase,
        }
    }
}

fn button_phase(pressed: bool) -> InputPhase {
    if pressed {
        InputPhase::Started
    } else {
        InputPhase::Canceled
    }
}

/// Producer side of the input queue.
#[derive(Debug, Clone)]
pub struct InputSender {
    tx: mpsc::UnboundedSender<InputEvent>,
}

impl InputSender {
    /// Queues an event. Returns false once the queue has been dropped.
    pub fn send(&self, event: InputEvent) -> bool {
        self.tx.send(event).is_ok()
    }
}

/// Consumer side of the input queue, owned by the frame loop.
#[derive(Debug)]
pub struct InputQueue {
    rx: mpsc::UnboundedReceiver<InputEvent>,
}

impl InputQueue {
    pub fn channel() -> (InputSender, InputQueue) {
        let (tx, rx) = mpsc::unbounded_channel();
        (InputSender { tx }, InputQueue { rx })
    }

    /// Takes every event queued so far, in arrival order.
    pub fn drain(&mut self) -> Vec<InputEvent> {
        let mut out = Vec::new();
        while let Ok(ev) = self.rx.try_recv() {
            out.push(ev);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drain_preserves_order_and_empties() {
        let (tx, mut queue) = InputQueue::channel();
        tx.send(InputEvent::movement(0.0, 1.0));
        tx.send(InputEvent::run(true));
        tx.send(InputEvent::jump(true));

        let events = queue.drain();
        assert_eq!(events.len(), 3);
        assert_eq!(events[1], InputEvent::run(true));
        assert!(queue.drain().is_empty());
    }

    #[test]
    fn sender_works_across_threads() {
        let (tx, mut queue) = InputQueue::channel();
        let handle = std::thread::spawn(move || {
            for i in 0..10 {
                tx.send(InputEvent::movement(i as f32 / 10.0, 0.0));
            }
        });
        handle.join().unwrap();
        assert_eq!(queue.drain().len(), 10);
    }

    #[test]
    fn send_reports_closed_queue() {
        let (tx, queue) = InputQueue::channel();
        assert!(tx.send(InputEvent::run(true)));
        drop(queue);
        assert!(!tx.send(InputEvent::run(false)));
    }

    #[test]
    fn zero_movement_is_canceled() {
        assert_eq!(InputEvent::movement(0.0, 0.0).phase(), InputPhase::Canceled);
        assert_eq!(InputEvent::movement(0.0, -1.0).phase(), InputPhase::Performed);
        assert_eq!(InputEvent::jump(false).phase(), InputPhase::Canceled);
    }
}
