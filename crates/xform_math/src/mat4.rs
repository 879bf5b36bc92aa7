//! 4x4 transform matrix
//!
//! Storage is 16 floats where row `i`, column `j` lives at index `4 * i + j`.
//! Rows 0..3 hold the rotation/scale basis and row 3 holds the translation,
//! so a vector is transformed as `x' = m[0]x + m[4]y + m[8]z + m[12]w`.
//! This is the same memory layout an OpenGL-style column-major API expects;
//! the kernel never changes it internally.
//!
//! Every mutator takes `&mut self` and hands `self` back, so chains like
//! `m.translate(t).rotate_xyz(r).scale(s)` read in the order the transforms
//! are composed.

use bytemuck::{Pod, Zeroable};

use crate::{Quat, TransformError, Vec3};

/// Axes shorter than this are rejected by the axis-angle builders
pub const MIN_AXIS_LENGTH: f32 = 0.0001;

/// Per-axis distance below which `look_at` treats eye and target as equal
pub const LOOK_AT_EPSILON: f32 = 0.000001;

/// 4x4 transform matrix (16 components, see module docs for layout)
#[repr(transparent)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct Mat4(pub [f32; 16]);

impl Default for Mat4 {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Mat4 {
    /// Identity matrix
    pub const IDENTITY: Self = Self([
        1.0, 0.0, 0.0, 0.0,
        0.0, 1.0, 0.0, 0.0,
        0.0, 0.0, 1.0, 0.0,
        0.0, 0.0, 0.0, 1.0,
    ]);

    /// All components zero (singular)
    pub const ZERO: Self = Self([0.0; 16]);

    /// Identity matrix
    #[inline]
    pub const fn identity() -> Self {
        Self::IDENTITY
    }

    /// Build a matrix from 16 components in storage order
    #[inline]
    pub const fn from_components(m: [f32; 16]) -> Self {
        Self(m)
    }

    /// Components in storage order
    #[inline]
    pub const fn as_array(&self) -> &[f32; 16] {
        &self.0
    }

    /// Explicit duplicate, for call sites that mutate a copy
    #[inline]
    pub fn copy(&self) -> Self {
        *self
    }

    /// Overwrite with the components of another matrix
    pub fn set(&mut self, other: &Self) -> &mut Self {
        self.0 = other.0;
        self
    }

    /// Overwrite with 16 components in storage order
    pub fn set_components(&mut self, m: [f32; 16]) -> &mut Self {
        self.0 = m;
        self
    }

    /// Reset to identity
    pub fn set_identity(&mut self) -> &mut Self {
        self.0 = Self::IDENTITY.0;
        self
    }

    /// Compose `other` onto this matrix: `self = other * self`
    ///
    /// Transforming a vector by the result applies `other` first and then
    /// the transform previously held in `self`.
    pub fn multiply(&mut self, other: &Self) -> &mut Self {
        self.multiply_components(&other.0)
    }

    /// Same as [`Mat4::multiply`] with the 16 components of `other` given
    /// directly, so callers need not build a temporary matrix.
    pub fn multiply_components(&mut self, b: &[f32; 16]) -> &mut Self {
        let a = self.0;
        for row in 0..4 {
            let r = row * 4;
            for col in 0..4 {
                self.0[r + col] = b[r] * a[col]
                    + b[r + 1] * a[4 + col]
                    + b[r + 2] * a[8 + col]
                    + b[r + 3] * a[12 + col];
            }
        }
        self
    }

    /// Determinant by cofactor expansion
    pub fn determinant(&self) -> f32 {
        let m = &self.0;
        let adj = adjugate(m);
        m[0] * adj[0] + m[1] * adj[4] + m[2] * adj[8] + m[3] * adj[12]
    }

    /// Invert in place
    ///
    /// Returns [`TransformError::Singular`] and leaves the matrix untouched
    /// when the determinant is exactly zero.
    pub fn invert(&mut self) -> Result<&mut Self, TransformError> {
        let m = &self.0;
        let adj = adjugate(m);
        let det = m[0] * adj[0] + m[1] * adj[4] + m[2] * adj[8] + m[3] * adj[12];

        if det == 0.0 {
            log::debug!("invert: singular matrix {:?}", self.0);
            return Err(TransformError::Singular);
        }

        let inv_det = 1.0 / det;
        for (dst, cofactor) in self.0.iter_mut().zip(adj) {
            *dst = cofactor * inv_det;
        }
        Ok(self)
    }

    /// Transpose in place (diagonal untouched)
    pub fn transpose(&mut self) -> &mut Self {
        let m = &mut self.0;
        m.swap(1, 4);
        m.swap(2, 8);
        m.swap(3, 12);
        m.swap(6, 9);
        m.swap(7, 13);
        m.swap(11, 14);
        self
    }

    /// Check that every component is finite
    pub fn check_finite(&self) -> Result<&Self, TransformError> {
        if self.0.iter().all(|c| c.is_finite()) {
            Ok(self)
        } else {
            Err(TransformError::UnrecoverableNumeric)
        }
    }

    // ==================== Scale ====================

    /// Write the scale diagonal, leaving every other component as is
    pub fn set_scale(&mut self, s: Vec3) -> &mut Self {
        self.0[0] = s.x;
        self.0[5] = s.y;
        self.0[10] = s.z;
        self
    }

    /// Compose a scale onto this matrix
    pub fn scale(&mut self, s: Vec3) -> &mut Self {
        self.multiply_components(&[
            s.x, 0.0, 0.0, 0.0,
            0.0, s.y, 0.0, 0.0,
            0.0, 0.0, s.z, 0.0,
            0.0, 0.0, 0.0, 1.0,
        ])
    }

    /// Scale matrix
    pub fn from_scale(s: Vec3) -> Self {
        let mut m = Self::IDENTITY;
        m.set_scale(s);
        m
    }

    // ==================== Translation ====================

    /// Write the translation row, leaving every other component as is
    pub fn set_translation(&mut self, t: Vec3) -> &mut Self {
        self.0[12] = t.x;
        self.0[13] = t.y;
        self.0[14] = t.z;
        self
    }

    /// Compose a translation onto this matrix
    pub fn translate(&mut self, t: Vec3) -> &mut Self {
        self.multiply_components(&[
            1.0, 0.0, 0.0, 0.0,
            0.0, 1.0, 0.0, 0.0,
            0.0, 0.0, 1.0, 0.0,
            t.x, t.y, t.z, 1.0,
        ])
    }

    /// Translation matrix
    pub fn from_translation(t: Vec3) -> Self {
        let mut m = Self::IDENTITY;
        m.set_translation(t);
        m
    }

    /// Translation part
    #[inline]
    pub fn translation(&self) -> Vec3 {
        Vec3::new(self.0[12], self.0[13], self.0[14])
    }

    // ==================== Rotation ====================

    /// Write a counter-clockwise rotation of `angle` radians about `axis`
    /// into the upper 3x3 block (column 3 of the first three rows is zeroed,
    /// the translation row is kept).
    ///
    /// The axis is normalized first. Axes shorter than [`MIN_AXIS_LENGTH`]
    /// give [`TransformError::DegenerateAxis`] and the matrix is not touched.
    ///
    /// # Example
    /// ```
    /// use xform_math::{Mat4, Vec3};
    ///
    /// let mut m = Mat4::IDENTITY;
    /// assert!(m.set_rotation(1.0, Vec3::ZERO).is_err());
    /// assert_eq!(m, Mat4::IDENTITY);
    /// ```
    pub fn set_rotation(&mut self, angle: f32, axis: Vec3) -> Result<&mut Self, TransformError> {
        let block = axis_angle_block(angle, axis)?;
        Ok(self.write_rotation_block(&block))
    }

    /// Compose an axis-angle rotation onto this matrix
    ///
    /// Same axis rules as [`Mat4::set_rotation`].
    pub fn rotate(&mut self, angle: f32, axis: Vec3) -> Result<&mut Self, TransformError> {
        let block = axis_angle_block(angle, axis)?;
        Ok(self.multiply_components(&expand_block(&block)))
    }

    /// Axis-angle rotation matrix
    pub fn from_rotation(angle: f32, axis: Vec3) -> Result<Self, TransformError> {
        let mut m = Self::IDENTITY;
        m.set_rotation(angle, axis)?;
        Ok(m)
    }

    /// Write the rotation for per-axis angles (radians): X first, then Y,
    /// then Z.
    pub fn set_rotation_xyz(&mut self, angles: Vec3) -> &mut Self {
        let block = euler_xyz_block(angles);
        self.0[0] = block[0];
        self.0[1] = block[1];
        self.0[2] = block[2];
        self.0[4] = block[3];
        self.0[5] = block[4];
        self.0[6] = block[5];
        self.0[8] = block[6];
        self.0[9] = block[7];
        self.0[10] = block[8];
        self
    }

    /// Compose a per-axis rotation onto this matrix
    pub fn rotate_xyz(&mut self, angles: Vec3) -> &mut Self {
        self.multiply_components(&expand_block(&euler_xyz_block(angles)))
    }

    /// Per-axis rotation matrix
    pub fn from_rotation_xyz(angles: Vec3) -> Self {
        let mut m = Self::IDENTITY;
        m.set_rotation_xyz(angles);
        m
    }

    /// Write basis vectors `u`, `v`, `w` as the first three rows of the
    /// rotation block. Nothing is orthogonalized.
    pub fn set_rotation_from_onb(&mut self, u: Vec3, v: Vec3, w: Vec3) -> &mut Self {
        self.0[0] = u.x;
        self.0[1] = u.y;
        self.0[2] = u.z;

        self.0[4] = v.x;
        self.0[5] = v.y;
        self.0[6] = v.z;

        self.0[8] = w.x;
        self.0[9] = w.y;
        self.0[10] = w.z;
        self
    }

    /// Rotation matrix from basis vectors
    pub fn from_onb(u: Vec3, v: Vec3, w: Vec3) -> Self {
        let mut m = Self::IDENTITY;
        m.set_rotation_from_onb(u, v, w);
        m
    }

    /// Overwrite with the pure rotation described by `q`
    ///
    /// Translation is cleared and `m[15]` set to 1. `q` is assumed to be
    /// unit length.
    pub fn set_rotation_from_quat(&mut self, q: &Quat) -> &mut Self {
        let x2 = q.x + q.x;
        let y2 = q.y + q.y;
        let z2 = q.z + q.z;

        let xx = q.x * x2;
        let xy = q.x * y2;
        let xz = q.x * z2;

        let yy = q.y * y2;
        let yz = q.y * z2;
        let zz = q.z * z2;

        let wx = q.w * x2;
        let wy = q.w * y2;
        let wz = q.w * z2;

        self.0 = [
            1.0 - (yy + zz), xy + wz, xz - wy, 0.0,
            xy - wz, 1.0 - (xx + zz), yz + wx, 0.0,
            xz + wy, yz - wx, 1.0 - (xx + yy), 0.0,
            0.0, 0.0, 0.0, 1.0,
        ];
        self
    }

    /// Rotation matrix from a unit quaternion
    pub fn from_quat(q: &Quat) -> Self {
        let mut m = Self::IDENTITY;
        m.set_rotation_from_quat(q);
        m
    }

    /// Overwrite with a 3x3 rotation (9 components, same row layout)
    ///
    /// Translation is cleared and `m[15]` set to 1.
    pub fn set_rotation_from_mat3(&mut self, b: &[f32; 9]) -> &mut Self {
        self.0 = [
            b[0], b[1], b[2], 0.0,
            b[3], b[4], b[5], 0.0,
            b[6], b[7], b[8], 0.0,
            0.0, 0.0, 0.0, 1.0,
        ];
        self
    }

    /// Rotation matrix from a 3x3 block
    pub fn from_mat3(b: &[f32; 9]) -> Self {
        let mut m = Self::IDENTITY;
        m.set_rotation_from_mat3(b);
        m
    }

    /// Upper 3x3 block in row order
    pub fn rotation_block(&self) -> [f32; 9] {
        let m = &self.0;
        [m[0], m[1], m[2], m[4], m[5], m[6], m[8], m[9], m[10]]
    }

    // ==================== Camera / projection ====================

    /// Off-axis perspective projection (OpenGL clip conventions)
    pub fn set_frustum(
        &mut self,
        left: f32,
        right: f32,
        bottom: f32,
        top: f32,
        near: f32,
        far: f32,
    ) -> &mut Self {
        let rl = 1.0 / (right - left);
        let tb = 1.0 / (top - bottom);
        let nf = 1.0 / (near - far);
        let near2 = near * 2.0;

        self.0 = [
            near2 * rl, 0.0, 0.0, 0.0,
            0.0, near2 * tb, 0.0, 0.0,
            (right + left) * rl, (top + bottom) * tb, (far + near) * nf, -1.0,
            0.0, 0.0, (far * near2) * nf, 0.0,
        ];
        self
    }

    /// Off-axis perspective projection matrix
    pub fn frustum(left: f32, right: f32, bottom: f32, top: f32, near: f32, far: f32) -> Self {
        let mut m = Self::IDENTITY;
        m.set_frustum(left, right, bottom, top, near, far);
        m
    }

    /// Symmetric perspective projection
    ///
    /// `fov_degrees` is the vertical field of view. The depth range maps to
    /// `[-1, 1]` and `w' = -z`.
    pub fn set_perspective(&mut self, fov_degrees: f32, aspect: f32, near: f32, far: f32) -> &mut Self {
        let f = 1.0 / (fov_degrees.to_radians() * 0.5).tan();
        let nf = 1.0 / (near - far);

        self.0 = [
            f / aspect, 0.0, 0.0, 0.0,
            0.0, f, 0.0, 0.0,
            0.0, 0.0, (far + near) * nf, -1.0,
            0.0, 0.0, (2.0 * far * near) * nf, 0.0,
        ];
        self
    }

    /// Symmetric perspective projection matrix
    pub fn perspective(fov_degrees: f32, aspect: f32, near: f32, far: f32) -> Self {
        let mut m = Self::IDENTITY;
        m.set_perspective(fov_degrees, aspect, near, far);
        m
    }

    /// Parallel projection mapping the box to `[-1, 1]^3`
    pub fn set_ortho(
        &mut self,
        left: f32,
        right: f32,
        bottom: f32,
        top: f32,
        near: f32,
        far: f32,
    ) -> &mut Self {
        let lr = left - right;
        let bt = bottom - top;
        let nf = near - far;

        self.0 = [
            -2.0 / lr, 0.0, 0.0, 0.0,
            0.0, -2.0 / bt, 0.0, 0.0,
            0.0, 0.0, 2.0 / nf, 0.0,
            (left + right) / lr, (top + bottom) / bt, (far + near) / nf, 1.0,
        ];
        self
    }

    /// Parallel projection matrix
    pub fn ortho(left: f32, right: f32, bottom: f32, top: f32, near: f32, far: f32) -> Self {
        let mut m = Self::IDENTITY;
        m.set_ortho(left, right, bottom, top, near, far);
        m
    }

    /// Right-handed view matrix looking from `eye` towards `target`
    ///
    /// The eye maps to the origin and the view direction to `-Z`. When eye
    /// and target are closer than [`LOOK_AT_EPSILON`] on every axis the
    /// result is the identity.
    pub fn set_look_at(&mut self, eye: Vec3, target: Vec3, up: Vec3) -> &mut Self {
        if (eye.x - target.x).abs() < LOOK_AT_EPSILON
            && (eye.y - target.y).abs() < LOOK_AT_EPSILON
            && (eye.z - target.z).abs() < LOOK_AT_EPSILON
        {
            log::debug!("look_at: eye and target coincide at {:?}, using identity", eye);
            return self.set_identity();
        }

        let z = (eye - target).normalized();
        // Zero when up is parallel to the view direction
        let x = up.cross(z).normalized();
        let y = z.cross(x).normalized();

        self.0 = [
            x.x, y.x, z.x, 0.0,
            x.y, y.y, z.y, 0.0,
            x.z, y.z, z.z, 0.0,
            -x.dot(eye), -y.dot(eye), -z.dot(eye), 1.0,
        ];
        self
    }

    /// View matrix looking from `eye` towards `target`
    pub fn look_at(eye: Vec3, target: Vec3, up: Vec3) -> Self {
        let mut m = Self::IDENTITY;
        m.set_look_at(eye, target, up);
        m
    }

    fn write_rotation_block(&mut self, block: &[f32; 9]) -> &mut Self {
        self.0[0] = block[0];
        self.0[1] = block[1];
        self.0[2] = block[2];
        self.0[3] = 0.0;
        self.0[4] = block[3];
        self.0[5] = block[4];
        self.0[6] = block[5];
        self.0[7] = 0.0;
        self.0[8] = block[6];
        self.0[9] = block[7];
        self.0[10] = block[8];
        self.0[11] = 0.0;
        self
    }
}

impl std::ops::Index<usize> for Mat4 {
    type Output = f32;
    #[inline]
    fn index(&self, i: usize) -> &f32 {
        &self.0[i]
    }
}

impl std::ops::IndexMut<usize> for Mat4 {
    #[inline]
    fn index_mut(&mut self, i: usize) -> &mut f32 {
        &mut self.0[i]
    }
}

impl From<[f32; 16]> for Mat4 {
    #[inline]
    fn from(m: [f32; 16]) -> Self {
        Self(m)
    }
}

/// Transposed matrix of cofactors
#[rustfmt::skip]
fn adjugate(m: &[f32; 16]) -> [f32; 16] {
    let mut inv = [0.0f32; 16];

    inv[0]  =  m[5] * m[10] * m[15] - m[5] * m[11] * m[14] - m[9] * m[6] * m[15] + m[9] * m[7] * m[14] + m[13] * m[6] * m[11] - m[13] * m[7] * m[10];
    inv[4]  = -m[4] * m[10] * m[15] + m[4] * m[11] * m[14] + m[8] * m[6] * m[15] - m[8] * m[7] * m[14] - m[12] * m[6] * m[11] + m[12] * m[7] * m[10];
    inv[8]  =  m[4] * m[9]  * m[15] - m[4] * m[11] * m[13] - m[8] * m[5] * m[15] + m[8] * m[7] * m[13] + m[12] * m[5] * m[11] - m[12] * m[7] * m[9];
    inv[12] = -m[4] * m[9]  * m[14] + m[4] * m[10] * m[13] + m[8] * m[5] * m[14] - m[8] * m[6] * m[13] - m[12] * m[5] * m[10] + m[12] * m[6] * m[9];

    inv[1]  = -m[1] * m[10] * m[15] + m[1] * m[11] * m[14] + m[9] * m[2] * m[15] - m[9] * m[3] * m[14] - m[13] * m[2] * m[11] + m[13] * m[3] * m[10];
    inv[5]  =  m[0] * m[10] * m[15] - m[0] * m[11] * m[14] - m[8] * m[2] * m[15] + m[8] * m[3] * m[14] + m[12] * m[2] * m[11] - m[12] * m[3] * m[10];
    inv[9]  = -m[0] * m[9]  * m[15] + m[0] * m[11] * m[13] + m[8] * m[1] * m[15] - m[8] * m[3] * m[13] - m[12] * m[1] * m[11] + m[12] * m[3] * m[9];
    inv[13] =  m[0] * m[9]  * m[14] - m[0] * m[10] * m[13] - m[8] * m[1] * m[14] + m[8] * m[2] * m[13] + m[12] * m[1] * m[10] - m[12] * m[2] * m[9];

    inv[2]  =  m[1] * m[6]  * m[15] - m[1] * m[7]  * m[14] - m[5] * m[2] * m[15] + m[5] * m[3] * m[14] + m[13] * m[2] * m[7]  - m[13] * m[3] * m[6];
    inv[6]  = -m[0] * m[6]  * m[15] + m[0] * m[7]  * m[14] + m[4] * m[2] * m[15] - m[4] * m[3] * m[14] - m[12] * m[2] * m[7]  + m[12] * m[3] * m[6];
    inv[10] =  m[0] * m[5]  * m[15] - m[0] * m[7]  * m[13] - m[4] * m[1] * m[15] + m[4] * m[3] * m[13] + m[12] * m[1] * m[7]  - m[12] * m[3] * m[5];
    inv[14] = -m[0] * m[5]  * m[14] + m[0] * m[6]  * m[13] + m[4] * m[1] * m[14] - m[4] * m[2] * m[13] - m[12] * m[1] * m[6]  + m[12] * m[2] * m[5];

    inv[3]  = -m[1] * m[6]  * m[11] + m[1] * m[7]  * m[10] + m[5] * m[2] * m[11] - m[5] * m[3] * m[10] - m[9]  * m[2] * m[7]  + m[9]  * m[3] * m[6];
    inv[7]  =  m[0] * m[6]  * m[11] - m[0] * m[7]  * m[10] - m[4] * m[2] * m[11] + m[4] * m[3] * m[10] + m[8]  * m[2] * m[7]  - m[8]  * m[3] * m[6];
    inv[11] = -m[0] * m[5]  * m[11] + m[0] * m[7]  * m[9]  + m[4] * m[1] * m[11] - m[4] * m[3] * m[9]  - m[8]  * m[1] * m[7]  + m[8]  * m[3] * m[5];
    inv[15] =  m[0] * m[5]  * m[10] - m[0] * m[6]  * m[9]  - m[4] * m[1] * m[10] + m[4] * m[2] * m[9]  + m[8]  * m[1] * m[6]  - m[8]  * m[2] * m[5];

    inv
}

/// Axis-angle rotation block in row order, axis normalized
fn axis_angle_block(angle: f32, axis: Vec3) -> Result<[f32; 9], TransformError> {
    let len = axis.length();
    if len < MIN_AXIS_LENGTH {
        log::debug!("rotation axis {:?} too short ({})", axis, len);
        return Err(TransformError::DegenerateAxis { length: len });
    }

    let inv_len = 1.0 / len;
    let x = axis.x * inv_len;
    let y = axis.y * inv_len;
    let z = axis.z * inv_len;

    let s = angle.sin();
    let c = angle.cos();
    let t = 1.0 - c;

    Ok([
        x * x * t + c,
        y * x * t + z * s,
        z * x * t - y * s,
        x * y * t - z * s,
        y * y * t + c,
        z * y * t + x * s,
        x * z * t + y * s,
        y * z * t - x * s,
        z * z * t + c,
    ])
}

/// Rotation block for X, then Y, then Z rotations (radians)
fn euler_xyz_block(angles: Vec3) -> [f32; 9] {
    let (sinx, cosx) = angles.x.sin_cos();
    let (siny, cosy) = angles.y.sin_cos();
    let (sinz, cosz) = angles.z.sin_cos();

    [
        cosy * cosz,
        cosy * sinz,
        -siny,
        -cosx * sinz + sinx * siny * cosz,
        cosx * cosz + sinx * siny * sinz,
        sinx * cosy,
        sinx * sinz + cosx * siny * cosz,
        -sinx * cosz + cosx * siny * sinz,
        cosx * cosy,
    ]
}

/// Embed a 3x3 block in an otherwise-identity 4x4
fn expand_block(b: &[f32; 9]) -> [f32; 16] {
    [
        b[0], b[1], b[2], 0.0,
        b[3], b[4], b[5], 0.0,
        b[6], b[7], b[8], 0.0,
        0.0, 0.0, 0.0, 1.0,
    ]
}
