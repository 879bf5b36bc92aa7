//! xform - transform kernel demo
//!
//! Configuration loading and a camera rig built on top of `xform_math`.

pub mod camera;
pub mod config;

pub use xform_math;
