//! Viewports, projection presets and the clip-to-screen mapping.

use crate::mat4::Mat4;
use crate::transform::RotationState;
use crate::vec::{Vec3, Vec4};
use crate::EPSILON;

/// Render target size.
///
/// `pixel_aspect` is the width/height ratio of a single pixel: 1.0 for a
/// window, roughly 0.5 for terminal character cells.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
    pub pixel_aspect: f32,
}

impl Viewport {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixel_aspect: 1.0,
        }
    }

    pub fn with_pixel_aspect(mut self, pixel_aspect: f32) -> Self {
        self.pixel_aspect = pixel_aspect;
        self
    }

    /// Visible width over height. A zero height yields infinity.
    pub fn aspect(&self) -> f32 {
        self.width as f32 * self.pixel_aspect / self.height as f32
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(640, 480)
    }
}

/// Projection preset, turned into a matrix once the aspect is known.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Projection {
    /// Keeps `[-half_width, half_width] x [-half_height, half_height]`
    /// visible whatever the aspect; see [`fit_ortho`].
    Orthographic {
        half_width: f32,
        half_height: f32,
        near: f32,
        far: f32,
    },
    Perspective {
        fov_y: f32,
        near: f32,
        far: f32,
    },
}

impl Projection {
    pub fn matrix(&self, aspect: f32) -> Mat4 {
        match *self {
            Projection::Orthographic {
                half_width,
                half_height,
                near,
                far,
            } => fit_ortho(aspect, half_width, half_height, near, far),
            Projection::Perspective { fov_y, near, far } => {
                Mat4::perspective(fov_y, aspect, near, far)
            }
        }
    }
}

/// Orthographic projection that widens whichever axis has spare room so the
/// content rectangle stays fully visible and undistorted.
pub fn fit_ortho(aspect: f32, half_width: f32, half_height: f32, near: f32, far: f32) -> Mat4 {
    if aspect * half_height >= half_width {
        let x = aspect * half_height;
        Mat4::ortho(-x, x, -half_height, half_height, near, far)
    } else {
        let y = half_width / aspect;
        Mat4::ortho(-half_width, half_width, -y, y, near, far)
    }
}

/// Camera placed by translation and Euler angles (degrees).
///
/// The view matrix is `T(position) * Rx * Ry * Rz`: the scene is first
/// turned about Z, Y, X and then pushed away by `position`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ViewPose {
    pub position: Vec3,
    pub rotation: RotationState,
}

impl ViewPose {
    pub fn new(position: Vec3, rotation: RotationState) -> Self {
        Self { position, rotation }
    }

    pub fn matrix(&self) -> Mat4 {
        Mat4::translation(self.position)
            * Mat4::rotation_x(self.rotation.x)
            * Mat4::rotation_y(self.rotation.y)
            * Mat4::rotation_z(self.rotation.z)
    }

    /// Camera position in world space.
    pub fn eye(&self) -> Vec3 {
        self.matrix().inverse().transform_point(Vec3::ZERO)
    }
}

/// Screen-space position (origin top-left, y down) plus NDC depth.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenPoint {
    pub x: f32,
    pub y: f32,
    pub depth: f32,
}

/// Maps a point through `mvp`, divides by `w` and lands it on the viewport.
///
/// Points behind the eye (`w <= 0`) or outside the near/far range are
/// rejected; x and y may fall outside the viewport and are left to the
/// rasterizer to clip.
pub fn project_to_viewport(mvp: &Mat4, point: Vec3, viewport: &Viewport) -> Option<ScreenPoint> {
    let clip = *mvp * Vec4::point(point);

    // Prevent division by near-zero depth values
    if clip.w <= EPSILON {
        return None;
    }

    let ndc = clip.dehomogenize();
    if !(-1.0..=1.0).contains(&ndc.z) {
        return None;
    }

    Some(ScreenPoint {
        x: (ndc.x + 1.0) * 0.5 * viewport.width as f32,
        y: (1.0 - ndc.y) * 0.5 * viewport.height as f32,
        depth: ndc.z,
    })
}
