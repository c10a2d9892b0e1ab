//! 4x4 transform matrix.
//!
//! Storage is row-major: element `(row, col)` lives at `row * 4 + col`.
//! Vectors are columns, so `a * b` applies `b` first. Uploads go through
//! [`Mat4::to_cols_array`], which yields the column-major layout OpenGL and
//! WebGL expect with `transpose = false`.

use std::ops::{Index, IndexMut, Mul, MulAssign};

use bytemuck::{Pod, Zeroable};

use crate::error::MathError;
use crate::vec::{Vec3, Vec4};
use crate::EPSILON;

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct Mat4 {
    m: [f32; 16],
}

impl Default for Mat4 {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Mat4 {
    pub const IDENTITY: Self = Self {
        m: [
            1.0, 0.0, 0.0, 0.0, //
            0.0, 1.0, 0.0, 0.0, //
            0.0, 0.0, 1.0, 0.0, //
            0.0, 0.0, 0.0, 1.0,
        ],
    };

    pub const ZERO: Self = Self { m: [0.0; 16] };

    #[inline]
    pub fn identity() -> Self {
        Self::IDENTITY
    }

    /// Builds a matrix from sixteen values given row by row.
    #[inline]
    pub const fn from_rows_array(m: [f32; 16]) -> Self {
        Self { m }
    }

    pub fn from_rows(rows: [[f32; 4]; 4]) -> Self {
        let mut m = [0.0; 16];
        for (r, row) in rows.iter().enumerate() {
            m[r * 4..r * 4 + 4].copy_from_slice(row);
        }
        Self { m }
    }

    /// Builds a matrix from sixteen values given column by column.
    pub fn from_cols_array(cols: [f32; 16]) -> Self {
        Self { m: cols }.transpose()
    }

    /// Row-major copy of the elements.
    #[inline]
    pub fn to_rows_array(&self) -> [f32; 16] {
        self.m
    }

    /// Column-major copy of the elements, ready for `glUniformMatrix4fv`
    /// with `transpose = GL_FALSE`.
    #[inline]
    pub fn to_cols_array(&self) -> [f32; 16] {
        self.transpose().m
    }

    #[inline]
    pub fn as_rows_slice(&self) -> &[f32] {
        &self.m
    }

    #[inline]
    pub fn row(&self, r: usize) -> Vec4 {
        Vec4::new(self[(r, 0)], self[(r, 1)], self[(r, 2)], self[(r, 3)])
    }

    #[inline]
    pub fn col(&self, c: usize) -> Vec4 {
        Vec4::new(self[(0, c)], self[(1, c)], self[(2, c)], self[(3, c)])
    }

    pub fn translation(t: Vec3) -> Self {
        Self::translation_xyz(t.x, t.y, t.z)
    }

    pub fn translation_xyz(x: f32, y: f32, z: f32) -> Self {
        Self::from_rows([
            [1.0, 0.0, 0.0, x],
            [0.0, 1.0, 0.0, y],
            [0.0, 0.0, 1.0, z],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    pub fn scaling(sx: f32, sy: f32, sz: f32) -> Self {
        Self::from_rows([
            [sx, 0.0, 0.0, 0.0],
            [0.0, sy, 0.0, 0.0],
            [0.0, 0.0, sz, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    pub fn uniform_scaling(s: f32) -> Self {
        Self::scaling(s, s, s)
    }

    /// Right-handed rotation about +X, angle in degrees.
    pub fn rotation_x(degrees: f32) -> Self {
        let (s, c) = degrees.to_radians().sin_cos();
        Self::from_rows([
            [1.0, 0.0, 0.0, 0.0],
            [0.0, c, -s, 0.0],
            [0.0, s, c, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    /// Right-handed rotation about +Y, angle in degrees.
    pub fn rotation_y(degrees: f32) -> Self {
        let (s, c) = degrees.to_radians().sin_cos();
        Self::from_rows([
            [c, 0.0, s, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [-s, 0.0, c, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    /// Right-handed rotation about +Z, angle in degrees.
    pub fn rotation_z(degrees: f32) -> Self {
        let (s, c) = degrees.to_radians().sin_cos();
        Self::from_rows([
            [c, -s, 0.0, 0.0],
            [s, c, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    /// Rotation about an arbitrary axis (Rodrigues). The axis is normalized
    /// here and must be non-zero.
    pub fn rotation_axis(axis: Vec3, degrees: f32) -> Self {
        let Vec3 { x, y, z } = axis.normalize();
        let (s, c) = degrees.to_radians().sin_cos();
        let t = 1.0 - c;
        Self::from_rows([
            [t * x * x + c, t * x * y - s * z, t * x * z + s * y, 0.0],
            [t * x * y + s * z, t * y * y + c, t * y * z - s * x, 0.0],
            [t * x * z - s * y, t * y * z + s * x, t * z * z + c, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    /// Orthographic projection of the view-space box
    /// `[left, right] x [bottom, top] x [-near, -far]` onto `[-1, 1]^3`.
    ///
    /// `z = -near` lands on `-1` and `z = -far` on `+1`. Coinciding bounds
    /// produce infinities; see [`Self::try_ortho`].
    pub fn ortho(left: f32, right: f32, bottom: f32, top: f32, near: f32, far: f32) -> Self {
        let w = right - left;
        let h = top - bottom;
        let d = far - near;
        Self::from_rows([
            [2.0 / w, 0.0, 0.0, -(right + left) / w],
            [0.0, 2.0 / h, 0.0, -(top + bottom) / h],
            [0.0, 0.0, -2.0 / d, -(far + near) / d],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    pub fn try_ortho(
        left: f32,
        right: f32,
        bottom: f32,
        top: f32,
        near: f32,
        far: f32,
    ) -> Result<Self, MathError> {
        if (right - left).abs() <= EPSILON
            || (top - bottom).abs() <= EPSILON
            || (far - near).abs() <= EPSILON
        {
            log::debug!(
                "degenerate ortho volume l={} r={} b={} t={} n={} f={}",
                left,
                right,
                bottom,
                top,
                near,
                far
            );
            return Err(MathError::DegenerateVolume);
        }
        Ok(Self::ortho(left, right, bottom, top, near, far))
    }

    /// Symmetric perspective projection.
    ///
    /// `fov_y` is the full vertical field of view in degrees and `aspect`
    /// is width / height. The near-plane centre maps to NDC `z = -1`, the far
    /// plane to `+1`, and depth grows monotonically with distance.
    pub fn perspective(fov_y: f32, aspect: f32, near: f32, far: f32) -> Self {
        let f = 1.0 / (fov_y.to_radians() * 0.5).tan();
        let d = near - far;
        Self::from_rows([
            [f / aspect, 0.0, 0.0, 0.0],
            [0.0, f, 0.0, 0.0],
            [0.0, 0.0, (far + near) / d, 2.0 * far * near / d],
            [0.0, 0.0, -1.0, 0.0],
        ])
    }

    pub fn try_perspective(
        fov_y: f32,
        aspect: f32,
        near: f32,
        far: f32,
    ) -> Result<Self, MathError> {
        if !(fov_y > 0.0 && fov_y < 180.0) {
            return Err(MathError::InvalidFieldOfView);
        }
        if !(aspect > 0.0 && aspect.is_finite()) {
            return Err(MathError::InvalidAspectRatio);
        }
        if !(near > 0.0 && far > near) || (far - near) <= EPSILON {
            log::debug!("invalid perspective clip planes near={} far={}", near, far);
            return Err(MathError::InvalidClipPlanes);
        }
        Ok(Self::perspective(fov_y, aspect, near, far))
    }

    /// Right-handed view matrix with the camera at `eye` looking at `center`.
    ///
    /// `up` must not be parallel to the view direction; otherwise the result
    /// contains NaN. See [`Self::try_look_at`].
    pub fn look_at(eye: Vec3, center: Vec3, up: Vec3) -> Self {
        let f = (center - eye).normalize();
        let s = f.cross(up).normalize();
        let u = s.cross(f);
        Self::from_rows([
            [s.x, s.y, s.z, -s.dot(eye)],
            [u.x, u.y, u.z, -u.dot(eye)],
            [-f.x, -f.y, -f.z, f.dot(eye)],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    pub fn try_look_at(eye: Vec3, center: Vec3, up: Vec3) -> Result<Self, MathError> {
        let f = (center - eye).try_normalize()?;
        let up = up.try_normalize()?;
        if f.cross(up).length() <= EPSILON {
            return Err(MathError::ParallelUp);
        }
        Ok(Self::look_at(eye, center, up))
    }

    pub fn transpose(&self) -> Self {
        let mut out = Self::ZERO;
        for r in 0..4 {
            for c in 0..4 {
                out[(c, r)] = self[(r, c)];
            }
        }
        out
    }

    pub fn determinant(&self) -> f32 {
        let (s, c) = self.minors();
        cofactor_determinant(&s, &c)
    }

    /// 2x2 minors of the top two rows (`s`) and the bottom two rows (`c`),
    /// shared by the determinant and the inverse.
    fn minors(&self) -> ([f32; 6], [f32; 6]) {
        let a = &self.m;
        let s = [
            a[0] * a[5] - a[4] * a[1],
            a[0] * a[6] - a[4] * a[2],
            a[0] * a[7] - a[4] * a[3],
            a[1] * a[6] - a[5] * a[2],
            a[1] * a[7] - a[5] * a[3],
            a[2] * a[7] - a[6] * a[3],
        ];
        let c = [
            a[8] * a[13] - a[12] * a[9],
            a[8] * a[14] - a[12] * a[10],
            a[8] * a[15] - a[12] * a[11],
            a[9] * a[14] - a[13] * a[10],
            a[9] * a[15] - a[13] * a[11],
            a[10] * a[15] - a[14] * a[11],
        ];
        (s, c)
    }

    /// Inverse by cofactor expansion.
    ///
    /// The matrix must be non-singular. A singular input divides by zero and
    /// the result holds Inf/NaN; use [`Self::try_inverse`] to detect it.
    pub fn inverse(&self) -> Self {
        let (s, c) = self.minors();
        let det = cofactor_determinant(&s, &c);
        self.adjugate(&s, &c) * (1.0 / det)
    }

    /// Checked inverse. The determinant is compared against the product of
    /// the column lengths, its largest possible magnitude, so scale alone
    /// never makes a matrix singular.
    pub fn try_inverse(&self) -> Result<Self, MathError> {
        let (s, c) = self.minors();
        let det = cofactor_determinant(&s, &c);
        let bound: f32 = (0..4).map(|i| self.col(i).length()).product();
        if det.abs() <= EPSILON * bound || !det.is_finite() {
            log::debug!("matrix not invertible, det={} bound={}", det, bound);
            return Err(MathError::Singular);
        }
        Ok(self.adjugate(&s, &c) * (1.0 / det))
    }

    fn adjugate(&self, s: &[f32; 6], c: &[f32; 6]) -> Self {
        let a = &self.m;
        Self::from_rows_array([
            a[5] * c[5] - a[6] * c[4] + a[7] * c[3],
            -a[1] * c[5] + a[2] * c[4] - a[3] * c[3],
            a[13] * s[5] - a[14] * s[4] + a[15] * s[3],
            -a[9] * s[5] + a[10] * s[4] - a[11] * s[3],
            -a[4] * c[5] + a[6] * c[2] - a[7] * c[1],
            a[0] * c[5] - a[2] * c[2] + a[3] * c[1],
            -a[12] * s[5] + a[14] * s[2] - a[15] * s[1],
            a[8] * s[5] - a[10] * s[2] + a[11] * s[1],
            a[4] * c[4] - a[5] * c[2] + a[7] * c[0],
            -a[0] * c[4] + a[1] * c[2] - a[3] * c[0],
            a[12] * s[4] - a[13] * s[2] + a[15] * s[0],
            -a[8] * s[4] + a[9] * s[2] - a[11] * s[0],
            -a[4] * c[3] + a[5] * c[1] - a[6] * c[0],
            a[0] * c[3] - a[1] * c[1] + a[2] * c[0],
            -a[12] * s[3] + a[13] * s[1] - a[14] * s[0],
            a[8] * s[3] - a[9] * s[1] + a[10] * s[0],
        ])
    }

    /// Inverse-transpose, the matrix normals are multiplied with.
    pub fn normal_matrix(&self) -> Self {
        self.inverse().transpose()
    }

    /// Transforms a point (`w = 1`) and divides by the resulting `w`.
    pub fn transform_point(&self, p: Vec3) -> Vec3 {
        (*self * Vec4::point(p)).dehomogenize()
    }

    /// Transforms a direction (`w = 0`); translation has no effect.
    pub fn transform_vector(&self, v: Vec3) -> Vec3 {
        (*self * Vec4::direction(v)).xyz()
    }

    pub fn approx_eq(&self, other: &Self, eps: f32) -> bool {
        self.m.iter().zip(other.m.iter()).all(|(a, b)| (a - b).abs() <= eps)
    }

    pub fn is_finite(&self) -> bool {
        self.m.iter().all(|v| v.is_finite())
    }
}

#[inline]
fn cofactor_determinant(s: &[f32; 6], c: &[f32; 6]) -> f32 {
    s[0] * c[5] - s[1] * c[4] + s[2] * c[3] + s[3] * c[2] - s[4] * c[1] + s[5] * c[0]
}

impl Index<(usize, usize)> for Mat4 {
    type Output = f32;

    fn index(&self, (row, col): (usize, usize)) -> &f32 {
        assert!(row < 4 && col < 4, "Mat4 index ({}, {}) out of range", row, col);
        &self.m[row * 4 + col]
    }
}

impl IndexMut<(usize, usize)> for Mat4 {
    fn index_mut(&mut self, (row, col): (usize, usize)) -> &mut f32 {
        assert!(row < 4 && col < 4, "Mat4 index ({}, {}) out of range", row, col);
        &mut self.m[row * 4 + col]
    }
}

impl Mul for Mat4 {
    type Output = Mat4;

    fn mul(self, rhs: Mat4) -> Mat4 {
        let mut out = Mat4::ZERO;
        for r in 0..4 {
            for c in 0..4 {
                out[(r, c)] = (0..4).map(|k| self[(r, k)] * rhs[(k, c)]).sum();
            }
        }
        out
    }
}

impl MulAssign for Mat4 {
    fn mul_assign(&mut self, rhs: Mat4) {
        *self = *self * rhs;
    }
}

impl Mul<Vec4> for Mat4 {
    type Output = Vec4;

    fn mul(self, v: Vec4) -> Vec4 {
        Vec4::new(
            self.row(0).dot(v),
            self.row(1).dot(v),
            self.row(2).dot(v),
            self.row(3).dot(v),
        )
    }
}

impl Mul<f32> for Mat4 {
    type Output = Mat4;

    fn mul(self, k: f32) -> Mat4 {
        Mat4 {
            m: self.m.map(|v| v * k),
        }
    }
}
