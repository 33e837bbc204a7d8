//! Interpolation kernels and easing curves, and the builder that pairs them into a [`Tween`].

use crate::Tween;

/// Maps a normalized time fraction to an eased fraction.
pub type EasingFn = fn(f32) -> f32;

/// `(t, from, change, duration, easing) -> value`.
pub type InterpolationFn = fn(f32, f32, f32, f32, EasingFn) -> f32;

/// `change * ease(t / duration) + from`. A non-positive duration evaluates at the end.
pub fn linear(t: f32, from: f32, change: f32, duration: f32, ease: EasingFn) -> f32 {
    if duration <= 0.0 {
        return change * ease(1.0) + from;
    }
    change * ease(t / duration) + from
}

pub fn none(t: f32) -> f32 {
    t
}

fn ease_in(t: f32, degree: i32) -> f32 {
    t.powi(degree)
}

fn ease_out(t: f32, degree: i32) -> f32 {
    1.0 - (1.0 - t).powi(degree)
}

fn ease_in_out(t: f32, degree: i32) -> f32 {
    if t < 0.5 {
        ease_in(t * 2.0, degree) / 2.0
    } else {
        0.5 + ease_out(t * 2.0 - 1.0, degree) / 2.0
    }
}

pub fn quadratic_in(t: f32) -> f32 {
    ease_in(t, 2)
}

pub fn quadratic_out(t: f32) -> f32 {
    ease_out(t, 2)
}

pub fn quadratic_in_out(t: f32) -> f32 {
    ease_in_out(t, 2)
}

pub fn cubic_in(t: f32) -> f32 {
    ease_in(t, 3)
}

pub fn cubic_out(t: f32) -> f32 {
    ease_out(t, 3)
}

pub fn cubic_in_out(t: f32) -> f32 {
    ease_in_out(t, 3)
}

pub fn quartic_in(t: f32) -> f32 {
    ease_in(t, 4)
}

pub fn quartic_out(t: f32) -> f32 {
    ease_out(t, 4)
}

pub fn quartic_in_out(t: f32) -> f32 {
    ease_in_out(t, 4)
}

/// The in/out/in-out variants of one polynomial degree.
#[derive(Copy, Clone, Debug)]
pub struct EasingFamily {
    pub ease_in: EasingFn,
    pub ease_out: EasingFn,
    pub ease_in_out: EasingFn,
}

/// Named easing curve, for configuration and serialization.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Easing {
    #[default]
    Identity,
    QuadraticIn,
    QuadraticOut,
    QuadraticInOut,
    CubicIn,
    CubicOut,
    CubicInOut,
    QuarticIn,
    QuarticOut,
    QuarticInOut,
}

impl Easing {
    pub fn function(self) -> EasingFn {
        match self {
            Easing::Identity => none,
            Easing::QuadraticIn => quadratic_in,
            Easing::QuadraticOut => quadratic_out,
            Easing::QuadraticInOut => quadratic_in_out,
            Easing::CubicIn => cubic_in,
            Easing::CubicOut => cubic_out,
            Easing::CubicInOut => cubic_in_out,
            Easing::QuarticIn => quartic_in,
            Easing::QuarticOut => quartic_out,
            Easing::QuarticInOut => quartic_in_out,
        }
    }

    pub fn apply(self, t: f32) -> f32 {
        (self.function())(t)
    }
}

pub struct TweenBuilder;

impl TweenBuilder {
    pub const LINEAR: InterpolationFn = linear;

    pub const NONE: EasingFn = none;

    pub const QUADRATIC: EasingFamily = EasingFamily {
        ease_in: quadratic_in,
        ease_out: quadratic_out,
        ease_in_out: quadratic_in_out,
    };

    pub const CUBIC: EasingFamily = EasingFamily {
        ease_in: cubic_in,
        ease_out: cubic_out,
        ease_in_out: cubic_in_out,
    };

    pub const QUARTIC: EasingFamily = EasingFamily {
        ease_in: quartic_in,
        ease_out: quartic_out,
        ease_in_out: quartic_in_out,
    };

    pub fn build(interpolation: InterpolationFn, easing: EasingFn) -> Tween {
        Tween::new(interpolation, easing)
    }

    /// Linear kernel with the given easing.
    pub fn linear(easing: Easing) -> Tween {
        Self::build(Self::LINEAR, easing.function())
    }

    /// Linear kernel tweening `start → end` over `duration` milliseconds.
    pub fn between(start: &[f32], end: &[f32], duration: f32, easing: Easing) -> Tween {
        let mut tween = Self::linear(easing);
        tween.to(start, end).duration(duration);
        tween
    }
}
