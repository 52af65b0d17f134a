//! Movement composition.
//!
//! Builds one displacement per frame from horizontal intent and the current
//! vertical velocity, then hands it to the mover.

use locomotion_shared::{
    math::{Vec2, Vec3},
    physics::Mover,
};

use crate::input::InputIntent;

/// Walk and run velocity variants for one frame.
///
/// Both carry the same vertical term, so toggling run mid-air never
/// interrupts vertical motion.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ComposedVelocity {
    pub walk: Vec3,
    pub run: Vec3,
    /// Whether `run` is the selected variant.
    pub running: bool,
}

impl ComposedVelocity {
    pub fn selected(&self) -> Vec3 {
        if self.running {
            self.run
        } else {
            self.walk
        }
    }

    /// Horizontal part of the selected variant as (x, z).
    pub fn horizontal(&self) -> Vec2 {
        let v = self.selected();
        Vec2::new(v.x, v.z)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct LocomotionComposer {
    pub run_multiplier: f32,
}

impl LocomotionComposer {
    pub fn new(run_multiplier: f32) -> Self {
        Self { run_multiplier }
    }

    pub fn compose(&self, intent: &InputIntent, vertical: f32) -> ComposedVelocity {
        let axes = intent.move_axes;
        let walk = Vec3::new(axes.x, vertical, axes.y);
        let run = Vec3::new(
            axes.x * self.run_multiplier,
            vertical,
            axes.y * self.run_multiplier,
        );
        ComposedVelocity {
            walk,
            run,
            running: intent.run_held && intent.is_movement_pressed(),
        }
    }

    /// Composes and moves. Returns the displacement that was requested.
    pub fn drive(&self, mover: &mut impl Mover, intent: &InputIntent, vertical: f32, dt: f32) -> (ComposedVelocity, Vec3) {
        let velocity = self.compose(intent, vertical);
        let displacement = velocity.selected() * dt;
        mover.move_by(displacement);
        (velocity, displacement)
    }
}

#[cfg(test)]
mod tests {
    use locomotion_shared::physics::FlatGroundMover;

    use super::*;

    fn intent(x: f32, y: f32, run: bool) -> InputIntent {
        InputIntent {
            move_axes: Vec2::new(x, y),
            run_held: run,
            jump_held: false,
        }
    }

    #[test]
    fn walk_and_run_horizontal_magnitude() {
        let composer = LocomotionComposer::new(3.0);
        let dt = 0.02;

        let mut body = FlatGroundMover::new(0.0);
        let (_, walk) = composer.drive(&mut body, &intent(0.0, 1.0, false), -0.05, dt);
        assert!((walk.horizontal().length() - 1.0 * dt).abs() < 1e-6);

        let (_, run) = composer.drive(&mut body, &intent(0.0, 1.0, true), -0.05, dt);
        assert!((run.horizontal().length() - 3.0 * dt).abs() < 1e-6);
        assert_eq!(body.move_count(), 2);
    }

    #[test]
    fn vertical_shared_between_variants() {
        let composer = LocomotionComposer::new(3.0);
        let v = composer.compose(&intent(0.5, -0.5, true), 7.25);
        assert_eq!(v.walk.y, 7.25);
        assert_eq!(v.run.y, 7.25);
        assert!(v.running);
    }

    #[test]
    fn run_without_movement_is_not_running() {
        let composer = LocomotionComposer::new(3.0);
        let v = composer.compose(&intent(0.0, 0.0, true), -0.05);
        assert!(!v.running);
        assert_eq!(v.selected(), Vec3::new(0.0, -0.05, 0.0));
    }
}
