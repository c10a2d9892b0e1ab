//! 3x3 matrix, row-major like [`Mat4`]. Mostly used for normal matrices.

use std::ops::{Index, IndexMut, Mul};

use bytemuck::{Pod, Zeroable};

use crate::error::MathError;
use crate::mat4::Mat4;
use crate::vec::Vec3;
use crate::EPSILON;

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct Mat3 {
    m: [f32; 9],
}

impl Default for Mat3 {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Mat3 {
    pub const IDENTITY: Self = Self {
        m: [1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0],
    };

    #[inline]
    pub fn identity() -> Self {
        Self::IDENTITY
    }

    pub const fn from_rows_array(m: [f32; 9]) -> Self {
        Self { m }
    }

    pub fn from_rows(rows: [[f32; 3]; 3]) -> Self {
        let [a, b, c] = rows;
        Self {
            m: [a[0], a[1], a[2], b[0], b[1], b[2], c[0], c[1], c[2]],
        }
    }

    /// Upper-left 3x3 block.
    pub fn from_mat4(m: &Mat4) -> Self {
        Self::from_rows([
            [m[(0, 0)], m[(0, 1)], m[(0, 2)]],
            [m[(1, 0)], m[(1, 1)], m[(1, 2)]],
            [m[(2, 0)], m[(2, 1)], m[(2, 2)]],
        ])
    }

    /// Inverse-transpose of the model matrix's upper 3x3.
    pub fn normal_matrix(model: &Mat4) -> Self {
        Self::from_mat4(model).inverse().transpose()
    }

    pub fn try_normal_matrix(model: &Mat4) -> Result<Self, MathError> {
        Ok(Self::from_mat4(model).try_inverse()?.transpose())
    }

    #[inline]
    pub fn to_rows_array(&self) -> [f32; 9] {
        self.m
    }

    /// Column-major copy for `glUniformMatrix3fv` with `transpose = GL_FALSE`.
    #[inline]
    pub fn to_cols_array(&self) -> [f32; 9] {
        self.transpose().m
    }

    pub fn row(&self, r: usize) -> Vec3 {
        Vec3::new(self[(r, 0)], self[(r, 1)], self[(r, 2)])
    }

    pub fn col(&self, c: usize) -> Vec3 {
        Vec3::new(self[(0, c)], self[(1, c)], self[(2, c)])
    }

    pub fn transpose(&self) -> Self {
        let m = &self.m;
        Self {
            m: [m[0], m[3], m[6], m[1], m[4], m[7], m[2], m[5], m[8]],
        }
    }

    pub fn determinant(&self) -> f32 {
        self.row(0).dot(self.row(1).cross(self.row(2)))
    }

    /// Adjugate over determinant. Singular input yields Inf/NaN.
    pub fn inverse(&self) -> Self {
        self.adjugate() * (1.0 / self.determinant())
    }

    /// Fails when the determinant is negligible next to the product of the
    /// column lengths.
    pub fn try_inverse(&self) -> Result<Self, MathError> {
        let det = self.determinant();
        let bound: f32 = (0..3).map(|i| self.col(i).length()).product();
        if det.abs() <= EPSILON * bound || !det.is_finite() {
            log::debug!("3x3 matrix not invertible, det={} bound={}", det, bound);
            return Err(MathError::Singular);
        }
        Ok(self.adjugate() * (1.0 / det))
    }

    fn adjugate(&self) -> Self {
        let (r0, r1, r2) = (self.row(0), self.row(1), self.row(2));
        // columns of the inverse are the cross products of row pairs
        Self::from_rows([
            r1.cross(r2).to_array(),
            r2.cross(r0).to_array(),
            r0.cross(r1).to_array(),
        ])
        .transpose()
    }

    pub fn approx_eq(&self, other: &Self, eps: f32) -> bool {
        self.m.iter().zip(other.m.iter()).all(|(a, b)| (a - b).abs() <= eps)
    }
}

impl From<Mat4> for Mat3 {
    fn from(m: Mat4) -> Self {
        Self::from_mat4(&m)
    }
}

impl Index<(usize, usize)> for Mat3 {
    type Output = f32;

    fn index(&self, (row, col): (usize, usize)) -> &f32 {
        assert!(row < 3 && col < 3, "Mat3 index ({}, {}) out of range", row, col);
        &self.m[row * 3 + col]
    }
}

impl IndexMut<(usize, usize)> for Mat3 {
    fn index_mut(&mut self, (row, col): (usize, usize)) -> &mut f32 {
        assert!(row < 3 && col < 3, "Mat3 index ({}, {}) out of range", row, col);
        &mut self.m[row * 3 + col]
    }
}

impl Mul for Mat3 {
    type Output = Mat3;

    fn mul(self, rhs: Mat3) -> Mat3 {
        let mut m = [0.0; 9];
        for r in 0..3 {
            for c in 0..3 {
                m[r * 3 + c] = (0..3).map(|k| self[(r, k)] * rhs[(k, c)]).sum();
            }
        }
        Mat3 { m }
    }
}

impl Mul<Vec3> for Mat3 {
    type Output = Vec3;

    fn mul(self, v: Vec3) -> Vec3 {
        Vec3::new(self.row(0).dot(v), self.row(1).dot(v), self.row(2).dot(v))
    }
}

impl Mul<f32> for Mat3 {
    type Output = Mat3;

    fn mul(self, k: f32) -> Mat3 {
        Mat3 {
            m: self.m.map(|v| v * k),
        }
    }
}
