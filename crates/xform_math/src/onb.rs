//! Orthonormal basis
//!
//! Three basis vectors `u`, `v`, `w` that become the rows of a rotation
//! block. Nothing here checks or restores orthogonality.

use crate::{Mat4, Vec3};

/// Rotation frame given by three (assumed) orthonormal vectors
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OrthonormalBasis {
    pub u: Vec3,
    pub v: Vec3,
    pub w: Vec3,
}

impl Default for OrthonormalBasis {
    /// `u = +Z`, `v = +Y`, `w = +X`
    fn default() -> Self {
        Self {
            u: Vec3::Z,
            v: Vec3::Y,
            w: Vec3::X,
        }
    }
}

impl OrthonormalBasis {
    pub const fn new(u: Vec3, v: Vec3, w: Vec3) -> Self {
        Self { u, v, w }
    }

    #[inline]
    pub fn copy(&self) -> Self {
        *self
    }

    /// Overwrite with another basis
    pub fn set(&mut self, other: &Self) -> &mut Self {
        self.set3(other.u, other.v, other.w)
    }

    pub fn set3(&mut self, u: Vec3, v: Vec3, w: Vec3) -> &mut Self {
        self.u = u;
        self.v = v;
        self.w = w;
        self
    }

    /// Overwrite from `[ux, uy, uz, vx, vy, vz, wx, wy, wz]`
    pub fn set9(&mut self, c: [f32; 9]) -> &mut Self {
        self.set3(
            Vec3::new(c[0], c[1], c[2]),
            Vec3::new(c[3], c[4], c[5]),
            Vec3::new(c[6], c[7], c[8]),
        )
    }

    /// Reset `out` to identity and write the basis into its rotation block
    pub fn write_matrix<'a>(&self, out: &'a mut Mat4) -> &'a mut Mat4 {
        out.set_identity()
            .set_rotation_from_onb(self.u, self.v, self.w)
    }

    /// Rotation matrix with the basis vectors as rows
    pub fn to_mat4(&self) -> Mat4 {
        Mat4::from_onb(self.u, self.v, self.w)
    }
}
