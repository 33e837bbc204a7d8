//! Plain 2D transform values shared by limbs, drawables and tweens.

use std::ops::BitOr;

/// A 2D point or vector, `[x, y]`.
pub type Point = [f32; 2];

/// Transform channel selector used by locks and dirty tracking.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Axis {
    Pos,
    Rot,
    Scale,
    /// Shorthand for all three channels.
    All,
}

impl Axis {
    /// The individual channels this selector covers.
    pub fn channels(self) -> &'static [Axis] {
        match self {
            Axis::Pos => &[Axis::Pos],
            Axis::Rot => &[Axis::Rot],
            Axis::Scale => &[Axis::Scale],
            Axis::All => &[Axis::Pos, Axis::Rot, Axis::Scale],
        }
    }
}

/// One boolean per transform channel.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AxisFlags {
    pub pos: bool,
    pub rot: bool,
    pub scale: bool,
}

impl AxisFlags {
    pub const NONE: AxisFlags = AxisFlags {
        pos: false,
        rot: false,
        scale: false,
    };

    pub const ALL: AxisFlags = AxisFlags {
        pos: true,
        rot: true,
        scale: true,
    };

    /// Returns `true` only if every channel covered by `axis` is set.
    pub fn get(&self, axis: Axis) -> bool {
        match axis {
            Axis::Pos => self.pos,
            Axis::Rot => self.rot,
            Axis::Scale => self.scale,
            Axis::All => self.pos && self.rot && self.scale,
        }
    }

    pub fn set(&mut self, axis: Axis, value: bool) {
        for channel in axis.channels() {
            match channel {
                Axis::Pos => self.pos = value,
                Axis::Rot => self.rot = value,
                Axis::Scale => self.scale = value,
                Axis::All => {}
            }
        }
    }

    pub fn any(&self) -> bool {
        self.pos || self.rot || self.scale
    }
}

impl BitOr for AxisFlags {
    type Output = AxisFlags;

    fn bitor(self, rhs: AxisFlags) -> AxisFlags {
        AxisFlags {
            pos: self.pos || rhs.pos,
            rot: self.rot || rhs.rot,
            scale: self.scale || rhs.scale,
        }
    }
}

/// Position, rotation (degrees) and independent x/y scale.
///
/// Used both for a limb's offset relative to its parent and for a drawable's observed world
/// transform.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Offset {
    pub pos: Point,
    pub rot: f32,
    pub scale: Point,
}

impl Offset {
    pub const IDENTITY: Offset = Offset {
        pos: [0.0, 0.0],
        rot: 0.0,
        scale: [1.0, 1.0],
    };

    pub fn new(pos: Point, rot: f32, scale: Point) -> Self {
        Self { pos, rot, scale }
    }

    pub fn at(x: f32, y: f32) -> Self {
        Self {
            pos: [x, y],
            ..Self::IDENTITY
        }
    }

    /// Per-channel inequality against `other`.
    pub fn changed_from(&self, other: &Offset) -> AxisFlags {
        AxisFlags {
            pos: self.pos != other.pos,
            rot: self.rot != other.rot,
            scale: self.scale != other.scale,
        }
    }

    /// Copies the channels selected by `axis` from `other`.
    pub fn assign(&mut self, axis: Axis, other: &Offset) {
        for channel in axis.channels() {
            match channel {
                Axis::Pos => self.pos = other.pos,
                Axis::Rot => self.rot = other.rot,
                Axis::Scale => self.scale = other.scale,
                Axis::All => {}
            }
        }
    }
}

impl Default for Offset {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Rotates `v` counter-clockwise by `degrees` (y-down screens see it clockwise).
pub fn rotate(v: Point, degrees: f32) -> Point {
    let (sin, cos) = degrees.to_radians().sin_cos();
    [v[0] * cos - v[1] * sin, v[0] * sin + v[1] * cos]
}

pub(crate) fn add(a: Point, b: Point) -> Point {
    [a[0] + b[0], a[1] + b[1]]
}

pub(crate) fn sub(a: Point, b: Point) -> Point {
    [a[0] - b[0], a[1] - b[1]]
}

pub(crate) fn mul(a: Point, b: Point) -> Point {
    [a[0] * b[0], a[1] * b[1]]
}
