use glkit_core::{Mat3, Mat4, Vec3, Vec4};
use nalgebra::{Matrix4, Point3, Vector3};

const EPS: f32 = 1e-5;

fn assert_close(ours: &Mat4, theirs: &Matrix4<f32>, eps: f32) {
    for r in 0..4 {
        for c in 0..4 {
            let (a, b) = (ours[(r, c)], theirs[(r, c)]);
            assert!((a - b).abs() <= eps * b.abs().max(1.0), "({r}, {c}): {a} vs {b}");
        }
    }
}

fn to_nalgebra(m: &Mat4) -> Matrix4<f32> {
    Matrix4::from_row_slice(&m.to_rows_array())
}

/// A handful of well-conditioned model matrices.
fn sample_matrices() -> Vec<Mat4> {
    vec![
        Mat4::identity(),
        Mat4::translation_xyz(1.0, -2.0, 3.5),
        Mat4::rotation_x(33.0) * Mat4::rotation_y(-71.0),
        Mat4::scaling(2.0, 0.5, 4.0) * Mat4::rotation_z(12.0),
        Mat4::translation_xyz(-4.0, 0.25, 9.0)
            * Mat4::rotation_axis(Vec3::new(1.0, 1.0, 0.0), 50.0)
            * Mat4::uniform_scaling(3.0),
        Mat4::look_at(Vec3::new(3.0, 4.0, 5.0), Vec3::ZERO, Vec3::Y),
        Mat4::perspective(45.0, 1.6, 0.5, 50.0),
    ]
}

#[test]
fn identity_leaves_vectors_alone() {
    for v in [Vec4::new(1.0, 2.0, 3.0, 1.0), Vec4::new(-0.5, 0.0, 7.0, 0.0), Vec4::ZERO] {
        assert_eq!(Mat4::identity() * v, v);
    }
}

#[test]
fn rotation_undone_by_negative_angle() {
    for degrees in [-270.0, -45.0, 0.0, 10.0, 90.0, 123.4, 360.0] {
        let x = Mat4::rotation_x(degrees) * Mat4::rotation_x(-degrees);
        let y = Mat4::rotation_y(degrees) * Mat4::rotation_y(-degrees);
        let z = Mat4::rotation_z(degrees) * Mat4::rotation_z(-degrees);
        for m in [x, y, z] {
            assert!(m.approx_eq(&Mat4::identity(), EPS), "{degrees}: {m:?}");
        }
    }
}

#[test]
fn inverse_round_trips() {
    for m in sample_matrices() {
        let inv = m.try_inverse().unwrap();
        assert!((m * inv).approx_eq(&Mat4::identity(), 1e-4), "{m:?}");
        assert!(inv.inverse().approx_eq(&m, 1e-3), "{m:?}");
        let oracle = to_nalgebra(&m).try_inverse().unwrap();
        assert_close(&inv, &oracle, 1e-4);
    }
}

#[test]
fn transpose_reverses_products() {
    let samples = sample_matrices();
    for m in &samples {
        for n in &samples {
            let lhs = (*m * *n).transpose();
            let rhs = n.transpose() * m.transpose();
            assert!(lhs.approx_eq(&rhs, 1e-4));
        }
    }
}

#[test]
fn product_matches_nalgebra() {
    let samples = sample_matrices();
    for m in &samples {
        for n in &samples {
            assert_close(&(*m * *n), &(to_nalgebra(m) * to_nalgebra(n)), 1e-4);
        }
    }
}

#[test]
fn unit_scaling_is_identity() {
    assert_eq!(Mat4::scaling(1.0, 1.0, 1.0), Mat4::identity());
}

#[test]
fn unit_ortho_mirrors_z() {
    let ortho = Mat4::ortho(-1.0, 1.0, -1.0, 1.0, -1.0, 1.0);
    assert_eq!(ortho.transform_point(Vec3::ZERO), Vec3::ZERO);
    assert!(ortho
        .transform_point(Vec3::new(1.0, 1.0, 1.0))
        .approx_eq(Vec3::new(1.0, 1.0, -1.0), EPS));
}

#[test]
fn ortho_matches_nalgebra() {
    let ours = Mat4::ortho(-3.0, 5.0, -1.0, 2.0, 0.1, 40.0);
    let theirs = Matrix4::new_orthographic(-3.0, 5.0, -1.0, 2.0, 0.1, 40.0);
    assert_close(&ours, &theirs, EPS);
}

#[test]
fn perspective_near_plane_maps_to_minus_one() {
    let p = Mat4::perspective(90.0, 1.0, 1.0, 100.0);
    let ndc = (p * Vec4::new(0.0, 0.0, -1.0, 1.0)).dehomogenize();
    assert!((ndc.z + 1.0).abs() < EPS);
    let far = (p * Vec4::new(0.0, 0.0, -100.0, 1.0)).dehomogenize();
    assert!((far.z - 1.0).abs() < 1e-4);
}

#[test]
fn perspective_matches_nalgebra() {
    let cases = [(60.0f32, 1.5, 0.1, 10000.0), (90.0, 1.0, 1.0, 100.0), (30.0, 0.75, 2.0, 20.0)];
    for (fov, aspect, near, far) in cases {
        let ours = Mat4::perspective(fov, aspect, near, far);
        let theirs = Matrix4::new_perspective(aspect, fov.to_radians(), near, far);
        assert_close(&ours, &theirs, 1e-4);
    }
}

#[test]
fn look_at_matches_nalgebra() {
    let eye = Vec3::new(1.0, 2.0, 3.0);
    let center = Vec3::new(-2.0, 0.5, -4.0);
    let ours = Mat4::look_at(eye, center, Vec3::Y);
    let theirs = Matrix4::look_at_rh(
        &Point3::new(eye.x, eye.y, eye.z),
        &Point3::new(center.x, center.y, center.z),
        &Vector3::y(),
    );
    assert_close(&ours, &theirs, 1e-5);
}

#[test]
fn translate_after_rotate_scenario() {
    let m = Mat4::translation(Vec3::new(1.0, 2.0, 3.0)) * Mat4::rotation_z(90.0);
    let p = m * Vec4::new(1.0, 0.0, 0.0, 1.0);
    assert!(p.approx_eq(Vec4::new(1.0, 3.0, 3.0, 1.0), EPS));
}

#[test]
fn scaling_scenario() {
    let p = Mat4::scaling(2.0, 3.0, 4.0) * Vec4::new(1.0, 1.0, 1.0, 1.0);
    assert_eq!(p, Vec4::new(2.0, 3.0, 4.0, 1.0));
}

#[test]
fn cross_is_right_handed() {
    assert_eq!(Vec3::new(1.0, 0.0, 0.0).cross(Vec3::new(0.0, 1.0, 0.0)), Vec3::new(0.0, 0.0, 1.0));
}

#[test]
fn normal_matrix_keeps_normals_perpendicular() {
    let model = Mat4::scaling(4.0, 1.0, 0.5) * Mat4::rotation_y(30.0);
    let normal = Mat3::normal_matrix(&model);
    let tangent = Vec3::new(1.0, -1.0, 0.0);
    let n = Vec3::new(1.0, 1.0, 0.0);
    let tangent_world = model.transform_vector(tangent);
    let n_world = normal * n;
    assert!(tangent_world.dot(n_world).abs() < 1e-5);
}

#[test]
fn upload_layout_is_column_major() {
    let m = Mat4::translation_xyz(7.0, 8.0, 9.0);
    let cols = m.to_cols_array();
    assert_eq!(&cols[12..15], &[7.0, 8.0, 9.0]);
    assert_eq!(to_nalgebra(&m).as_slice(), &cols[..]);
}
