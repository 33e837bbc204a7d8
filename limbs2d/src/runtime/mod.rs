mod action;
mod clock;
mod limb;
mod skeleton;

pub use action::*;
pub use clock::*;
pub use limb::*;
pub use skeleton::*;

#[cfg(test)]
mod limb_tests;
