//! Input handling.
//!
//! Raw bindings live outside this crate. Whatever polls the devices turns them
//! into [`InputEvent`]s; the sampler folds each event into [`InputIntent`],
//! which persists between frames until the next event.

use locomotion_shared::{
    event::{InputEvent, InputPhase},
    math::{Vec2, Vec3},
};
use serde::{Deserialize, Serialize};

/// The caller's desired input state, independent of physics outcome.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct InputIntent {
    pub move_axes: Vec2,
    pub run_held: bool,
    pub jump_held: bool,
}

impl InputIntent {
    /// Either axis non-zero. Exact comparison, no deadzone.
    pub fn is_movement_pressed(&self) -> bool {
        self.move_axes.is_nonzero()
    }

    /// Movement on the ground plane: stick x to world x, stick y to world z.
    pub fn planar(&self) -> Vec3 {
        Vec3::new(self.move_axes.x, 0.0, self.move_axes.y)
    }
}

/// Folds input events into intent.
#[derive(Debug, Default)]
pub struct InputSampler {
    intent: InputIntent,
    clamp: bool,
}

impl InputSampler {
    pub fn new(clamp: bool) -> Self {
        Self {
            intent: InputIntent::default(),
            clamp,
        }
    }

    pub fn intent(&self) -> &InputIntent {
        &self.intent
    }

    pub fn set_clamp(&mut self, clamp: bool) {
        self.clamp = clamp;
    }

    /// Applies one event as a whole replacement of the affected signal.
    pub fn apply(&mut self, event: InputEvent) {
        match event {
            InputEvent::Move { phase, axes } => {
                let axes = match phase {
                    InputPhase::Canceled => Vec2::ZERO,
                    InputPhase::Started | InputPhase::Performed => axes,
                };
                self.intent.move_axes = if self.clamp {
                    axes.clamp_unit_axes()
                } else {
                    axes
                };
            }
            InputEvent::Run { phase, pressed } => {
                self.intent.run_held = pressed && phase != InputPhase::Canceled;
            }
            InputEvent::Jump { phase, pressed } => {
                self.intent.jump_held = pressed && phase != InputPhase::Canceled;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn movement_pressed_is_exact_nonzero() {
        let mut s = InputSampler::new(false);
        assert!(!s.intent().is_movement_pressed());

        s.apply(InputEvent::movement(0.0, 1e-9));
        assert!(s.intent().is_movement_pressed());

        s.apply(InputEvent::movement(0.0, 0.0));
        assert!(!s.intent().is_movement_pressed());
    }

    #[test]
    fn cancel_clears_signal() {
        let mut s = InputSampler::new(false);
        s.apply(InputEvent::Move {
            phase: InputPhase::Canceled,
            axes: Vec2::new(1.0, 1.0),
        });
        assert_eq!(s.intent().move_axes, Vec2::ZERO);

        s.apply(InputEvent::run(true));
        s.apply(InputEvent::jump(true));
        assert!(s.intent().run_held && s.intent().jump_held);
        s.apply(InputEvent::run(false));
        assert!(!s.intent().run_held);
        assert!(s.intent().jump_held);
    }

    #[test]
    fn out_of_range_passes_through_unless_clamped() {
        let mut raw = InputSampler::new(false);
        raw.apply(InputEvent::movement(2.0, -3.0));
        assert_eq!(raw.intent().move_axes, Vec2::new(2.0, -3.0));

        let mut clamped = InputSampler::new(true);
        clamped.apply(InputEvent::movement(2.0, f32::NAN));
        assert_eq!(clamped.intent().move_axes, Vec2::new(1.0, 0.0));
    }

    #[test]
    fn planar_maps_y_to_z() {
        let mut s = InputSampler::new(false);
        s.apply(InputEvent::movement(0.5, -1.0));
        assert_eq!(s.intent().planar(), Vec3::new(0.5, 0.0, -1.0));
    }
}
