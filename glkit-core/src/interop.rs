//! Conversions to and from `nalgebra`, enabled by the `nalgebra` feature.

use nalgebra::{Matrix3, Matrix4, Point3, Vector3, Vector4};

use crate::mat3::Mat3;
use crate::mat4::Mat4;
use crate::vec::{Vec3, Vec4};

impl From<Mat4> for Matrix4<f32> {
    fn from(m: Mat4) -> Self {
        Matrix4::from_row_slice(&m.to_rows_array())
    }
}

impl From<Matrix4<f32>> for Mat4 {
    fn from(m: Matrix4<f32>) -> Self {
        // nalgebra stores columns contiguously
        let mut cols = [0.0; 16];
        cols.copy_from_slice(m.as_slice());
        Mat4::from_cols_array(cols)
    }
}

impl From<Mat3> for Matrix3<f32> {
    fn from(m: Mat3) -> Self {
        Matrix3::from_row_slice(&m.to_rows_array())
    }
}

impl From<Matrix3<f32>> for Mat3 {
    fn from(m: Matrix3<f32>) -> Self {
        Mat3::from_rows([
            [m[(0, 0)], m[(0, 1)], m[(0, 2)]],
            [m[(1, 0)], m[(1, 1)], m[(1, 2)]],
            [m[(2, 0)], m[(2, 1)], m[(2, 2)]],
        ])
    }
}

impl From<Vec3> for Vector3<f32> {
    fn from(v: Vec3) -> Self {
        Vector3::new(v.x, v.y, v.z)
    }
}

impl From<Vector3<f32>> for Vec3 {
    fn from(v: Vector3<f32>) -> Self {
        Vec3::new(v.x, v.y, v.z)
    }
}

impl From<Vec3> for Point3<f32> {
    fn from(v: Vec3) -> Self {
        Point3::new(v.x, v.y, v.z)
    }
}

impl From<Vec4> for Vector4<f32> {
    fn from(v: Vec4) -> Self {
        Vector4::new(v.x, v.y, v.z, v.w)
    }
}

impl From<Vector4<f32>> for Vec4 {
    fn from(v: Vector4<f32>) -> Self {
        Vec4::new(v.x, v.y, v.z, v.w)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mat4_layout_survives() {
        let m = Mat4::translation_xyz(1.0, 2.0, 3.0) * Mat4::rotation_z(30.0);
        let n: Matrix4<f32> = m.into();
        assert_eq!(n[(0, 3)], 1.0);
        assert_eq!(n[(2, 3)], 3.0);
        assert_eq!(Mat4::from(n), m);
    }

    #[test]
    fn test_mat3_and_vectors() {
        let m = Mat3::from_rows([[1.0, 2.0, 3.0], [4.0, 5.0, 6.0], [7.0, 8.0, 10.0]]);
        let n: Matrix3<f32> = m.into();
        assert_eq!(n[(1, 2)], 6.0);
        assert_eq!(Mat3::from(n), m);

        let v = Vec3::new(1.0, -2.0, 3.0);
        let nv: Vector3<f32> = v.into();
        assert_eq!(Vec3::from(n * nv), m * v);
        assert_eq!(Vec4::from(Vector4::from(v.extend(1.0))), v.extend(1.0));
    }
}
