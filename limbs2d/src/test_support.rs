use std::cell::RefCell;
use std::rc::Rc;

use crate::{Drawable, FrozenDrawable, Offset, Point};

pub(crate) type PaintLog = Rc<RefCell<Vec<&'static str>>>;

/// Drawable that records its paint ticks into a shared log.
pub(crate) struct RecordingSprite {
    pub transform: Offset,
    pub origin: Point,
    pub name: &'static str,
    pub log: PaintLog,
    pub dead: bool,
}

impl RecordingSprite {
    pub fn boxed(name: &'static str, log: &PaintLog) -> Box<dyn Drawable> {
        Box::new(Self {
            transform: Offset::IDENTITY,
            origin: [0.0, 0.0],
            name,
            log: Rc::clone(log),
            dead: false,
        })
    }
}

impl Drawable for RecordingSprite {
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

    fn is_dead(&self) -> bool {
        self.dead
    }

    fn update(&mut self) {
        self.log.borrow_mut().push(self.name);
    }
}

pub(crate) fn paint_log() -> PaintLog {
    Rc::new(RefCell::new(Vec::new()))
}

pub(crate) fn sprite(pos: Point, rot: f32, scale: Point) -> Box<dyn Drawable> {
    Box::new(FrozenDrawable::new(Offset::new(pos, rot, scale)))
}

pub(crate) fn assert_approx(actual: f32, expected: f32) {
    let diff = (actual - expected).abs();
    assert!(
        diff <= 1.0e-4,
        "expected {expected}, got {actual} (diff {diff})"
    );
}

pub(crate) fn assert_point(actual: Point, expected: Point) {
    let diff = (actual[0] - expected[0]).abs().max((actual[1] - expected[1]).abs());
    assert!(
        diff <= 1.0e-4,
        "expected {expected:?}, got {actual:?} (diff {diff})"
    );
}
