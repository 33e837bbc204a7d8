//! `glam` interop.

use glam::{Affine2, Vec2};

use crate::{LimbId, LimbTree, Offset, Point};

impl Offset {
    /// Scale, then rotate, then translate.
    pub fn to_affine2(&self) -> Affine2 {
        Affine2::from_scale_angle_translation(
            Vec2::from(self.scale),
            self.rot.to_radians(),
            Vec2::from(self.pos),
        )
    }
}

pub fn to_vec2(point: Point) -> Vec2 {
    Vec2::from(point)
}

pub fn from_vec2(v: Vec2) -> Point {
    v.to_array()
}

impl LimbTree {
    /// Matrix mapping `id`'s body frame into world space.
    pub fn world_affine(&self, id: LimbId) -> Affine2 {
        let frame = self.frame(id);
        let origin = self.frame_origin(id);
        frame.to_affine2() * Affine2::from_translation(-Vec2::from(origin))
    }
}
