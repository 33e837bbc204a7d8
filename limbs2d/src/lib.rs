//! Hierarchical 2D limb transforms with tweened skeleton actions.
//!
//! This crate is renderer-agnostic: it places and paints anything implementing [`Drawable`].

#![forbid(unsafe_code)]

#[cfg(feature = "glam")]
mod affine;
mod drawable;
mod error;
mod runtime;
mod transform;
mod tween;
mod tween_builder;

#[cfg(feature = "glam")]
pub use affine::*;
pub use drawable::*;
pub use error::*;
pub use runtime::*;
pub use transform::*;
pub use tween::*;
pub use tween_builder::*;

#[cfg(test)]
mod test_support;
