//! Unit quaternion for 3D rotations
//!
//! Components are stored as `(x, y, z, w)` with `w` the scalar part.
//! Constructors that build rotations leave the result normalized; plain
//! arithmetic ([`Quat::multiply`], [`Quat::conjugate`]) does not, so long
//! composition chains should call [`Quat::normalize`] now and then.

use bytemuck::{Pod, Zeroable};

use crate::{Mat4, TransformError, Vec3};

/// Lengths at or below this are left alone by [`Quat::normalize`] (2^-24)
pub const EPSILON: f32 = 5.960_464_5e-8;

/// Below this `1 - cos(omega)`, slerp falls back to a linear blend
const SLERP_LINEAR_THRESHOLD: f32 = 0.000001;

/// Quaternion `x*i + y*j + z*k + w`
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct Quat {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub w: f32,
}

impl Default for Quat {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Quat {
    /// Identity quaternion (no rotation)
    pub const IDENTITY: Self = Self { x: 0.0, y: 0.0, z: 0.0, w: 1.0 };

    /// Create a quaternion from raw components (not normalized)
    #[inline]
    pub const fn new(x: f32, y: f32, z: f32, w: f32) -> Self {
        Self { x, y, z, w }
    }

    /// Explicit duplicate
    #[inline]
    pub fn copy(&self) -> Self {
        *self
    }

    /// Overwrite with the components of another quaternion
    pub fn set(&mut self, other: &Self) -> &mut Self {
        *self = *other;
        self
    }

    /// Reset to identity
    pub fn set_identity(&mut self) -> &mut Self {
        *self = Self::IDENTITY;
        self
    }

    #[inline]
    pub fn dot(&self, other: &Self) -> f32 {
        self.x * other.x + self.y * other.y + self.z * other.z + self.w * other.w
    }

    #[inline]
    pub fn length(&self) -> f32 {
        self.dot(self).sqrt()
    }

    /// Hamilton product in place: `self = self * other`
    pub fn multiply(&mut self, other: &Self) -> &mut Self {
        let Self { x: ax, y: ay, z: az, w: aw } = *self;
        let Self { x: bx, y: by, z: bz, w: bw } = *other;

        self.x = aw * bx + ax * bw + ay * bz - az * by;
        self.y = aw * by + ay * bw + az * bx - ax * bz;
        self.z = aw * bz + az * bw + ax * by - ay * bx;
        self.w = aw * bw - ax * bx - ay * by - az * bz;
        self
    }

    /// Inverse: `conjugate / |q|^2`
    ///
    /// A zero quaternion has no inverse and comes back as all zeros.
    pub fn invert(&mut self) -> &mut Self {
        let len_sq = self.dot(self);
        let inv = if len_sq != 0.0 { 1.0 / len_sq } else { 0.0 };

        self.x *= -inv;
        self.y *= -inv;
        self.z *= -inv;
        self.w *= inv;
        self
    }

    /// Negate the vector part
    pub fn conjugate(&mut self) -> &mut Self {
        self.x = -self.x;
        self.y = -self.y;
        self.z = -self.z;
        self
    }

    /// Scale to unit length; lengths at or below [`EPSILON`] are left as is
    pub fn normalize(&mut self) -> &mut Self {
        let len = self.length();
        if len > EPSILON {
            let inv = 1.0 / len;
            self.x *= inv;
            self.y *= inv;
            self.z *= inv;
            self.w *= inv;
        }
        self
    }

    /// Check that every component is finite
    pub fn check_finite(&self) -> Result<&Self, TransformError> {
        if self.x.is_finite() && self.y.is_finite() && self.z.is_finite() && self.w.is_finite() {
            Ok(self)
        } else {
            Err(TransformError::UnrecoverableNumeric)
        }
    }

    // ==================== Construction ====================

    /// Rotation of `angle` radians about `axis`, normalized afterwards
    ///
    /// Unlike [`Mat4::set_rotation`] the axis length is not validated: a
    /// zero axis yields `(0, 0, 0, cos(angle / 2))` normalized, which is
    /// the identity or its negation.
    pub fn set_axis_angle(&mut self, angle: f32, axis: Vec3) -> &mut Self {
        let (sin_half, cos_half) = (angle * 0.5).sin_cos();
        self.x = axis.x * sin_half;
        self.y = axis.y * sin_half;
        self.z = axis.z * sin_half;
        self.w = cos_half;
        self.normalize()
    }

    pub fn from_axis_angle(angle: f32, axis: Vec3) -> Self {
        let mut q = Self::IDENTITY;
        q.set_axis_angle(angle, axis);
        q
    }

    /// Extract the rotation of a 3x3 block given in row order
    ///
    /// Pivots on the trace when it is non-negative and otherwise on the
    /// largest diagonal entry, so the divisor never gets close to zero.
    pub fn set_from_mat3(&mut self, m: &[f32; 9]) -> &mut Self {
        let [m0, m1, m2, m3, m4, m5, m6, m7, m8] = *m;
        let trace = m0 + m4 + m8;

        if trace >= 0.0 {
            let s = (trace + 1.0).sqrt();
            self.w = 0.5 * s;
            let s = 0.5 / s;
            self.x = (m5 - m7) * s;
            self.y = (m6 - m2) * s;
            self.z = (m1 - m3) * s;
        } else if m0 > m4 && m0 > m8 {
            let s = (1.0 + m0 - m4 - m8).sqrt();
            self.x = s * 0.5;
            let s = 0.5 / s;
            self.y = (m1 + m3) * s;
            self.z = (m6 + m2) * s;
            self.w = (m5 - m7) * s;
        } else if m4 > m8 {
            let s = (1.0 + m4 - m0 - m8).sqrt();
            self.y = s * 0.5;
            let s = 0.5 / s;
            self.x = (m1 + m3) * s;
            self.z = (m5 + m7) * s;
            self.w = (m6 - m2) * s;
        } else {
            let s = (1.0 + m8 - m0 - m4).sqrt();
            self.z = s * 0.5;
            let s = 0.5 / s;
            self.x = (m6 + m2) * s;
            self.y = (m5 + m7) * s;
            self.w = (m1 - m3) * s;
        }
        self
    }

    pub fn from_mat3(m: &[f32; 9]) -> Self {
        let mut q = Self::IDENTITY;
        q.set_from_mat3(m);
        q
    }

    /// Extract the rotation of the upper 3x3 block of `m`
    pub fn set_from_mat4(&mut self, m: &Mat4) -> &mut Self {
        self.set_from_mat3(&m.rotation_block())
    }

    pub fn from_mat4(m: &Mat4) -> Self {
        let mut q = Self::IDENTITY;
        q.set_from_mat4(m);
        q
    }

    /// Rotation whose matrix has rows `x`, `y`, `z`
    pub fn set_axes(&mut self, x: Vec3, y: Vec3, z: Vec3) -> &mut Self {
        self.set_from_mat3(&[x.x, x.y, x.z, y.x, y.y, y.z, z.x, z.y, z.z])
    }

    /// Orientation facing along `direction`
    ///
    /// Builds tangent (the normalized direction), bitangent (`up x tangent`)
    /// and normal (`tangent x bitangent`) and extracts the quaternion from
    /// that basis. `up` defaults to +Y.
    pub fn set_from_direction(&mut self, direction: Vec3, up: Option<Vec3>) -> &mut Self {
        let up = up.unwrap_or(Vec3::Y);
        let tangent = direction.normalized();
        let bitangent = up.cross(tangent).normalized();
        let normal = tangent.cross(bitangent);
        self.set_axes(bitangent, normal, tangent)
    }

    pub fn from_direction(direction: Vec3, up: Option<Vec3>) -> Self {
        let mut q = Self::IDENTITY;
        q.set_from_direction(direction, up);
        q
    }

    /// Orientation facing from `from` towards `to`
    pub fn set_from_to(&mut self, from: Vec3, to: Vec3, up: Vec3) -> &mut Self {
        self.set_from_direction((to - from).normalized(), Some(up))
    }

    pub fn from_to(from: Vec3, to: Vec3, up: Vec3) -> Self {
        let mut q = Self::IDENTITY;
        q.set_from_to(from, to, up);
        q
    }

    /// Rotation from yaw, pitch and roll (radians)
    ///
    /// Roll acts about X, pitch about Y and yaw about Z; the composition is
    /// yaw * pitch * roll.
    pub fn set_euler(&mut self, yaw: f32, pitch: f32, roll: f32) -> &mut Self {
        let (spitch, cpitch) = (pitch * 0.5).sin_cos();
        let (syaw, cyaw) = (yaw * 0.5).sin_cos();
        let (sroll, croll) = (roll * 0.5).sin_cos();
        let cpitch_cyaw = cpitch * cyaw;
        let spitch_syaw = spitch * syaw;

        self.x = sroll * cpitch_cyaw - croll * spitch_syaw;
        self.y = croll * spitch * cyaw + sroll * cpitch * syaw;
        self.z = croll * cpitch * syaw - sroll * spitch * cyaw;
        self.w = croll * cpitch_cyaw + sroll * spitch_syaw;
        self
    }

    pub fn from_euler(yaw: f32, pitch: f32, roll: f32) -> Self {
        let mut q = Self::IDENTITY;
        q.set_euler(yaw, pitch, roll);
        q
    }

    // ==================== Extraction ====================

    /// Rotation angle in radians: `2 * acos(w)`
    #[inline]
    pub fn angle(&self) -> f32 {
        self.w.acos() * 2.0
    }

    /// Rotation axis: the vector part divided by `sqrt(1 - w^2)`
    ///
    /// Returns [`TransformError::DegenerateAngleExtraction`] when
    /// `1 - w^2 <= 0`, i.e. for the identity rotation where no axis exists.
    pub fn axis(&self) -> Result<Vec3, TransformError> {
        let sin_sq = 1.0 - self.w * self.w;
        if sin_sq <= 0.0 {
            log::debug!("axis: no rotation axis for w = {}", self.w);
            return Err(TransformError::DegenerateAngleExtraction { w: self.w });
        }
        let s = 1.0 / sin_sq.sqrt();
        Ok(Vec3::new(self.x * s, self.y * s, self.z * s))
    }

    /// Axis and angle together
    pub fn axis_angle(&self) -> Result<(Vec3, f32), TransformError> {
        Ok((self.axis()?, self.angle()))
    }

    /// Rotation matrix
    #[inline]
    pub fn to_mat4(&self) -> Mat4 {
        Mat4::from_quat(self)
    }

    /// Rotate a vector: `q * v * q^-1`
    pub fn rotate_vec3(&self, v: Vec3) -> Vec3 {
        let Self { x: qx, y: qy, z: qz, w: qw } = *self;

        let ix = qw * v.x + qy * v.z - qz * v.y;
        let iy = qw * v.y + qz * v.x - qx * v.z;
        let iz = qw * v.z + qx * v.y - qy * v.x;
        let iw = -qx * v.x - qy * v.y - qz * v.z;

        Vec3::new(
            ix * qw + iw * -qx + iy * -qz - iz * -qy,
            iy * qw + iw * -qy + iz * -qx - ix * -qz,
            iz * qw + iw * -qz + ix * -qy - iy * -qx,
        )
    }

    // ==================== Interpolation ====================

    /// Spherical interpolation from `self` (t = 0) to `other` (t = 1)
    ///
    /// Takes the shorter arc: when the quaternions point into opposite
    /// hemispheres `other` is negated first.
    pub fn slerp(&mut self, other: &Self, t: f32) -> &mut Self {
        let a = *self;
        let mut cos_omega = a.dot(other);
        let mut b = *other;

        if cos_omega < 0.0 {
            cos_omega = -cos_omega;
            b = Self::new(-b.x, -b.y, -b.z, -b.w);
        }

        let (scale0, scale1) = if 1.0 - cos_omega > SLERP_LINEAR_THRESHOLD {
            let omega = cos_omega.acos();
            let sin_omega = omega.sin();
            (
                ((1.0 - t) * omega).sin() / sin_omega,
                (t * omega).sin() / sin_omega,
            )
        } else {
            (1.0 - t, t)
        };

        self.x = scale0 * a.x + scale1 * b.x;
        self.y = scale0 * a.y + scale1 * b.y;
        self.z = scale0 * a.z + scale1 * b.z;
        self.w = scale0 * a.w + scale1 * b.w;
        self
    }

    /// Interpolated copy
    pub fn slerped(&self, other: &Self, t: f32) -> Self {
        let mut q = *self;
        q.slerp(other, t);
        q
    }
}
