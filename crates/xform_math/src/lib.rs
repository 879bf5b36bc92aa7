//! Transform kernel
//!
//! Value types for building model, view and projection transforms and for
//! moving rotations between their three encodings.
//!
//! ## Core Types
//!
//! - [`Mat4`] - 4x4 transform matrix (composition, inversion, camera builders)
//! - [`Quat`] - unit quaternion (composition, matrix conversion, slerp)
//! - [`OrthonormalBasis`] - three basis vectors forming a rotation frame
//!
//! ## Vector Types
//!
//! - [`Vec3`] - 3D vector used for axes, points and directions
//! - [`Vec4`] - homogeneous vector for matrix-vector transforms
//!
//! Degenerate inputs that the kernel detects are reported as
//! [`TransformError`]. A matrix upper-left 3x3 block, an orthonormal basis
//! and a unit quaternion are interchangeable:
//!
//! ```
//! use xform_math::{Mat4, Quat, Vec3};
//!
//! let q = Quat::from_axis_angle(0.5, Vec3::Y);
//! let m = q.to_mat4();
//! let back = Quat::from_mat4(&m);
//! assert!((back.w - q.w).abs() < 1e-5);
//! ```

mod error;
mod vec3;
mod vec4;
pub mod mat4;
pub mod quat;
pub mod onb;

pub use error::TransformError;
pub use vec3::Vec3;
pub use vec4::Vec4;
pub use mat4::Mat4;
pub use quat::Quat;
pub use onb::OrthonormalBasis;
