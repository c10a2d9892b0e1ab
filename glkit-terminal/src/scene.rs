//! The two demo scenes.

use glkit_core::draw::{push_vertex, POS_COLOR};
use glkit_core::projection::fit_ortho;
use glkit_core::transform::mvp;
use glkit_core::{
    Mat3, Mat4, Mesh, RotationState, Transform, Triangle, TrisDrawType, Vec3, Vec4, ViewPose,
};

use crate::config::DemoConfig;
use crate::renderer::AsciiRenderer;

/// Something the terminal app can draw at a given animation time.
pub trait Scene {
    fn name(&self) -> &'static str;

    /// Draws into a cleared renderer. `time` is in seconds.
    fn render(&self, renderer: &mut AsciiRenderer, time: f32);
}

const SQRT3: f32 = 1.732_050_8;

/// Three triangles forming a triforce, each spinning about its own pivot.
pub struct TriforceScene {
    degrees_per_second: f32,
    /// One `POS_COLOR` triangle list per piece.
    pieces: [Vec<f32>; 3],
}

impl TriforceScene {
    pub fn new(degrees_per_second: f32) -> Self {
        let magenta = Vec4::new(1.0, 0.0, 1.0, 1.0);
        let cyan = Vec4::new(0.0, 1.0, 1.0, 1.0);
        let yellow = Vec4::new(1.0, 1.0, 0.0, 1.0);
        let piece = |corners: [(Vec3, Vec4); 3]| {
            let mut data = Vec::with_capacity(3 * POS_COLOR);
            for (p, c) in corners {
                push_vertex(&mut data, p, c);
            }
            data
        };

        let pieces = [
            piece([
                (Vec3::new(-2.0, -SQRT3, 0.0), Vec4::new(0.0, 0.0, 1.0, 1.0)),
                (Vec3::new(0.0, -SQRT3, 0.0), cyan),
                (Vec3::new(-1.0, 0.0, 0.0), magenta),
            ]),
            piece([
                (Vec3::new(0.0, -SQRT3, 0.0), cyan),
                (Vec3::new(2.0, -SQRT3, 0.0), Vec4::new(0.0, 1.0, 0.0, 1.0)),
                (Vec3::new(1.0, 0.0, 0.0), yellow),
            ]),
            piece([
                (Vec3::new(-1.0, 0.0, 0.0), magenta),
                (Vec3::new(1.0, 0.0, 0.0), yellow),
                (Vec3::new(0.0, SQRT3, 0.0), Vec4::new(1.0, 0.0, 0.0, 1.0)),
            ]),
        ];

        Self {
            degrees_per_second,
            pieces,
        }
    }

    /// Model matrices of the three pieces: the bottom left one turns about Z
    /// around its centroid, the bottom right one about Y around its vertical
    /// centre line and the top one about X around its horizontal centre line.
    pub fn model_matrices(&self, time: f32) -> [Mat4; 3] {
        let angle = time * self.degrees_per_second;
        let centroid = Vec3::new(-1.0, -2.0 * SQRT3 / 3.0, 0.0);
        [
            Transform::about_pivot(centroid, &Mat4::rotation_z(angle)),
            Transform::about_pivot(Vec3::new(1.0, -SQRT3 / 2.0, 0.0), &Mat4::rotation_y(angle)),
            Transform::about_pivot(Vec3::new(0.0, SQRT3 / 2.0, 0.0), &Mat4::rotation_x(angle)),
        ]
    }

    pub fn projection(aspect: f32) -> Mat4 {
        fit_ortho(aspect, 2.0, SQRT3, -10.0, 10.0)
    }
}

impl Scene for TriforceScene {
    fn name(&self) -> &'static str {
        "triforce"
    }

    fn render(&self, renderer: &mut AsciiRenderer, time: f32) {
        let projection = Self::projection(renderer.viewport().aspect());
        for (piece, model) in self.pieces.iter().zip(self.model_matrices(time)) {
            // pieces turned edge-on go dim
            let facing = (Mat3::normal_matrix(&model) * Vec3::Z).normalize().z.abs();
            let mvp = projection * model;
            let drawn = renderer
                .draw_arrays(piece, POS_COLOR, TrisDrawType::List, &mvp, facing)
                .and_then(|_| renderer.draw_outline(piece, TrisDrawType::List, 1.0, &mvp));
            if let Err(e) = drawn {
                log::warn!("failed to draw triforce piece: {}", e);
            }
        }
    }
}

const AMBIENT: f32 = 0.1;

/// Lambert term for one face of a mesh drawn with `model`.
pub fn lambert(model: &Mat4, normal_matrix: &Mat3, triangle: &Triangle, light: Vec3) -> f32 {
    let normal = (*normal_matrix * triangle.face_normal()).normalize();
    let to_light = (light - model.transform_point(triangle.centroid())).normalize();
    let diffuse = normal.dot(to_light);
    if diffuse.is_nan() {
        return AMBIENT;
    }
    AMBIENT + (1.0 - AMBIENT) * diffuse.max(0.0)
}

/// A large floor, a centre mesh and a light orbiting the centre, under a
/// perspective camera.
pub struct ShadingScene {
    floor: Mesh,
    subject: Mesh,
    light_marker: Mesh,
    view: ViewPose,
    fov_y: f32,
    near: f32,
    far: f32,
    light_position: Vec3,
    degrees_per_second: f32,
}

impl ShadingScene {
    pub fn new(config: &DemoConfig, subject: Mesh) -> Self {
        let [rx, ry, rz] = config.view_rotation;
        Self {
            floor: Mesh::unit_plane(),
            subject,
            light_marker: Mesh::cube(3.0),
            view: ViewPose::new(config.view_position(), RotationState::new(rx, ry, rz)),
            fov_y: config.fov_y,
            near: config.near,
            far: config.far,
            light_position: config.light_position(),
            degrees_per_second: config.degrees_per_second,
        }
    }

    /// Model matrix of the light marker; the light orbits the Y axis.
    pub fn light_model(&self, time: f32) -> Mat4 {
        Mat4::rotation_y(time * self.degrees_per_second) * Mat4::translation(self.light_position)
    }
}

impl Scene for ShadingScene {
    fn name(&self) -> &'static str {
        "shading"
    }

    fn render(&self, renderer: &mut AsciiRenderer, time: f32) {
        let aspect = renderer.viewport().aspect();
        let projection = Mat4::perspective(self.fov_y, aspect, self.near, self.far);
        let view = self.view.matrix();

        let light_model = self.light_model(time);
        let light = light_model.transform_point(Vec3::ZERO);
        let marker_mvp = mvp(&light_model, &view, &projection);
        let marker_color = Vec4::new(1.0, 1.0, 0.6, 1.0);
        renderer.render_mesh(&self.light_marker, &marker_mvp, marker_color, |_| 1.0);

        let objects = [
            (&self.floor, Mat4::uniform_scaling(100.0), Vec4::new(0.8, 0.2, 0.2, 1.0)),
            (&self.subject, Mat4::identity(), Vec4::new(0.3, 0.5, 0.9, 1.0)),
        ];
        for (mesh, model, color) in objects {
            let normal_matrix = Mat3::normal_matrix(&model);
            let mvp = mvp(&model, &view, &projection);
            renderer.render_mesh(mesh, &mvp, color, |t| lambert(&model, &normal_matrix, t, light));
        }
    }
}
