//! World transform (position, rotation, scale)
//!
//! Spawner child records store transforms in this shape.

use glam::{IVec2, Quat, Vec2, Vec3};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Transform {
    pub const IDENTITY: Transform = Transform {
        position: Vec3::ZERO,
        rotation: Quat::IDENTITY,
        scale: Vec3::ONE,
    };

    pub fn at(position: Vec3) -> Self {
        Transform {
            position,
            ..Self::IDENTITY
        }
    }

    /// Component-wise comparison within `epsilon`
    pub fn approx_eq(&self, other: &Transform, epsilon: f32) -> bool {
        self.position.abs_diff_eq(other.position, epsilon)
            && self.rotation.abs_diff_eq(other.rotation, epsilon)
            && self.scale.abs_diff_eq(other.scale, epsilon)
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Grid cell containing a world position
pub fn cell_of(position: Vec3, cell_size: f32) -> IVec2 {
    (Vec2::new(position.x, position.y) / cell_size)
        .floor()
        .as_ivec2()
}
