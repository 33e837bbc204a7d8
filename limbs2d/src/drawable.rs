//! The capability set a limb needs from the visual entity it places.
//!
//! Rendering, physics and asset handling live outside this crate; integrations implement
//! [`Drawable`] for their sprite type and hand boxed instances to a [`crate::LimbTree`].

use crate::{Offset, Point};

pub trait Drawable {
    fn position(&self) -> Point;
    fn set_position(&mut self, position: Point);

    /// Rotation in degrees.
    fn rotation(&self) -> f32;
    fn set_rotation(&mut self, degrees: f32);

    fn scale(&self) -> Point;
    fn set_scale(&mut self, scale: Point);

    /// Local point of the drawable that sits at [`Drawable::position`].
    fn origin(&self) -> Point {
        [0.0, 0.0]
    }

    fn set_origin(&mut self, _origin: Point) {}

    fn is_destroyed(&self) -> bool {
        false
    }

    fn is_dead(&self) -> bool {
        false
    }

    /// Paint/physics tick, invoked once per limb per frame.
    fn update(&mut self);

    /// Independent copy with no behaviour attached.
    fn copy_frozen(&self) -> Box<dyn Drawable> {
        Box::new(FrozenDrawable::snapshot(self))
    }

    /// Called when the drawable is bound to a limb.
    fn on_bound(&mut self) {}

    /// Called right after [`Drawable::update`] during the paint pass.
    fn on_post_update(&mut self) {}

    fn transform(&self) -> Offset {
        Offset {
            pos: self.position(),
            rot: self.rotation(),
            scale: self.scale(),
        }
    }

    fn is_gone(&self) -> bool {
        self.is_destroyed() || self.is_dead()
    }
}

/// A transform-only drawable. `update` does nothing.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct FrozenDrawable {
    pub transform: Offset,
    pub origin: Point,
}

impl FrozenDrawable {
    pub fn new(transform: Offset) -> Self {
        Self {
            transform,
            origin: [0.0, 0.0],
        }
    }

    pub fn snapshot<D: Drawable + ?Sized>(drawable: &D) -> Self {
        Self {
            transform: drawable.transform(),
            origin: drawable.origin(),
        }
    }
}

impl Default for FrozenDrawable {
    fn default() -> Self {
        Self::new(Offset::IDENTITY)
    }
}

impl Drawable for FrozenDrawable {
    fn position(&self) -> Point {
        self.transform.pos
    }

    fn set_position(&mut self, position: Point) {
        self.transform.pos = position;
    }

    fn rotation(&self) -> f32 {
        self.transform.rot
    }

    fn set_rotation(&mut self, degrees: f32) {
        self.transform.rot = degrees;
    }

    fn scale(&self) -> Point {
        self.transform.scale
    }

    fn set_scale(&mut self, scale: Point) {
        self.transform.scale = scale;
    }

    fn origin(&self) -> Point {
        self.origin
    }

    fn set_origin(&mut self, origin: Point) {
        self.origin = origin;
    }

    fn update(&mut self) {}

    fn copy_frozen(&self) -> Box<dyn Drawable> {
        Box::new(*self)
    }
}
