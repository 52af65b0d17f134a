//! Physics abstraction.
//!
//! The controller never resolves collisions itself. It hands a displacement to
//! a [`Mover`] and reads back grounded contact. Facing is written through a
//! [`TransformHandle`]. Both are usually the same engine object.

use crate::math::{Quat, Vec3};

/// Capsule mover: applies a world-space displacement and resolves it.
pub trait Mover {
    fn move_by(&mut self, displacement: Vec3);

    /// Contact with walkable ground after the last resolved move.
    fn is_grounded(&self) -> bool;
}

/// Read/write access to the character's orientation.
pub trait TransformHandle {
    fn rotation(&self) -> Quat;
    fn set_rotation(&mut self, rotation: Quat);
}

/// Kinematic body over an infinite floor plane.
///
/// With `ledge_z` set, the floor only exists for `z <= ledge_z`; past it the
/// body falls without bound. Good enough for headless runs and tests.
#[derive(Debug, Clone)]
pub struct FlatGroundMover {
    pub floor_y: f32,
    pub ledge_z: Option<f32>,
    position: Vec3,
    rotation: Quat,
    grounded: bool,
    moves: u64,
}

impl FlatGroundMover {
    /// Spawns standing on the floor at the origin.
    pub fn new(floor_y: f32) -> Self {
        Self {
            floor_y,
            ledge_z: None,
            position: Vec3::new(0.0, floor_y, 0.0),
            rotation: Quat::IDENTITY,
            grounded: true,
            moves: 0,
        }
    }

    pub fn with_ledge(mut self, ledge_z: f32) -> Self {
        self.ledge_z = Some(ledge_z);
        self
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// Number of `move_by` calls so far.
    pub fn move_count(&self) -> u64 {
        self.moves
    }

    fn has_floor_at(&self, p: Vec3) -> bool {
        self.ledge_z.map_or(true, |edge| p.z <= edge)
    }
}

impl Mover for FlatGroundMover {
    fn move_by(&mut self, displacement: Vec3) {
        self.moves += 1;
        let was_above = self.position.y >= self.floor_y;
        let mut next = self.position + displacement;

        if was_above && self.has_floor_at(next) && next.y <= self.floor_y {
            next.y = self.floor_y;
            self.grounded = true;
        } else {
            self.grounded = false;
        }
        self.position = next;
    }

    fn is_grounded(&self) -> bool {
        self.grounded
    }
}

impl TransformHandle for FlatGroundMover {
    fn rotation(&self) -> Quat {
        self.rotation
    }

    fn set_rotation(&mut self, rotation: Quat) {
        self.rotation = rotation;
    }
}
