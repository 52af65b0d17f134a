//! Facing.
//!
//! Turns the character toward its horizontal movement intent with a per-frame
//! slerp. With no movement held the current facing is kept as is.

use locomotion_shared::{
    math::{Quat, Vec3},
    physics::TransformHandle,
};

#[derive(Debug, Clone, Copy)]
pub struct OrientationController {
    pub rotation_speed: f32,
}

impl OrientationController {
    pub fn new(rotation_speed: f32) -> Self {
        Self { rotation_speed }
    }

    /// Rotation after one frame of turning from `current` toward `movement`.
    ///
    /// Returns `None` when nothing should change.
    pub fn next_rotation(&self, current: Quat, movement: Vec3, pressed: bool, dt: f32) -> Option<Quat> {
        if !pressed {
            return None;
        }
        let target = Quat::look_rotation(movement.horizontal())?;
        Some(current.slerp(target, self.rotation_speed * dt))
    }

    /// Applies one frame of turning to `transform`.
    pub fn update(&self, transform: &mut impl TransformHandle, movement: Vec3, pressed: bool, dt: f32) {
        if let Some(next) = self.next_rotation(transform.rotation(), movement, pressed, dt) {
            transform.set_rotation(next);
        }
    }
}
