//! Homogeneous 4-component vector

use bytemuck::{Pod, Zeroable};

use crate::{Mat4, Vec3};

/// Homogeneous vector with x, y, z, w components
///
/// Points carry `w = 1`, directions `w = 0`.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct Vec4 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub w: f32,
}

impl Vec4 {
    pub const ZERO: Self = Self { x: 0.0, y: 0.0, z: 0.0, w: 0.0 };
    /// The origin as a homogeneous point
    pub const ORIGIN: Self = Self { x: 0.0, y: 0.0, z: 0.0, w: 1.0 };

    /// Create a new Vec4
    #[inline]
    pub const fn new(x: f32, y: f32, z: f32, w: f32) -> Self {
        Self { x, y, z, w }
    }

    /// Extend a Vec3 with the given w
    #[inline]
    pub const fn from_vec3(v: Vec3, w: f32) -> Self {
        Self::new(v.x, v.y, v.z, w)
    }

    /// Extract the xyz components
    #[inline]
    pub fn xyz(self) -> Vec3 {
        Vec3::new(self.x, self.y, self.z)
    }

    /// Dot product
    #[inline]
    pub fn dot(self, other: Self) -> f32 {
        self.x * other.x + self.y * other.y + self.z * other.z + self.w * other.w
    }

    /// Transform in place by a 4x4 matrix, returning the result
    ///
    /// Uses the kernel's storage convention: the translation lives in
    /// components 12..15, so `x' = m[0]x + m[4]y + m[8]z + m[12]w`.
    pub fn multiply_by_mat4(&mut self, m: &Mat4) -> &mut Self {
        let m = m.as_array();
        let (x, y, z, w) = (self.x, self.y, self.z, self.w);
        self.x = m[0] * x + m[4] * y + m[8] * z + m[12] * w;
        self.y = m[1] * x + m[5] * y + m[9] * z + m[13] * w;
        self.z = m[2] * x + m[6] * y + m[10] * z + m[14] * w;
        self.w = m[3] * x + m[7] * y + m[11] * z + m[15] * w;
        self
    }

    /// Transformed copy
    #[inline]
    pub fn transformed(mut self, m: &Mat4) -> Self {
        *self.multiply_by_mat4(m)
    }

    /// Linear interpolation between two vectors
    #[inline]
    pub fn lerp(self, other: Self, t: f32) -> Self {
        Self::new(
            self.x + (other.x - self.x) * t,
            self.y + (other.y - self.y) * t,
            self.z + (other.z - self.z) * t,
            self.w + (other.w - self.w) * t,
        )
    }
}
