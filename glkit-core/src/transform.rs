//! Model transforms and the stock-shader uniform set.

use bytemuck::{Pod, Zeroable};

use crate::mat3::Mat3;
use crate::mat4::Mat4;
use crate::vec::Vec3;

/// Euler rotation around the three axes, in degrees.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RotationState {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl RotationState {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub fn zero() -> Self {
        Self::default()
    }

    /// Rotate by delta amounts (in degrees)
    pub fn rotate(&mut self, dx: f32, dy: f32, dz: f32) {
        self.x += dx;
        self.y += dy;
        self.z += dz;
    }

    /// Applies X first, then Y, then Z: `Rz * Ry * Rx`.
    pub fn matrix(&self) -> Mat4 {
        Mat4::rotation_z(self.z) * Mat4::rotation_y(self.y) * Mat4::rotation_x(self.x)
    }
}

/// Translation, rotation and scale of one object.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub translation: Vec3,
    pub rotation: RotationState,
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}

impl Transform {
    pub fn identity() -> Self {
        Self {
            translation: Vec3::ZERO,
            rotation: RotationState::zero(),
            scale: Vec3::splat(1.0),
        }
    }

    pub fn from_translation(translation: Vec3) -> Self {
        Self {
            translation,
            ..Self::identity()
        }
    }

    pub fn with_rotation(mut self, rotation: RotationState) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn with_scale(mut self, scale: Vec3) -> Self {
        self.scale = scale;
        self
    }

    pub fn with_uniform_scale(self, s: f32) -> Self {
        self.with_scale(Vec3::splat(s))
    }

    /// Model matrix `T * R * S`.
    pub fn matrix(&self) -> Mat4 {
        Mat4::translation(self.translation)
            * self.rotation.matrix()
            * Mat4::scaling(self.scale.x, self.scale.y, self.scale.z)
    }

    /// Rotation about `pivot` instead of the origin: `T(p) * R * T(-p)`.
    pub fn about_pivot(pivot: Vec3, rotation: &Mat4) -> Mat4 {
        Mat4::translation(pivot) * *rotation * Mat4::translation(-pivot)
    }
}

/// Model-view-projection product, applied right to left.
pub fn mvp(model: &Mat4, view: &Mat4, projection: &Mat4) -> Mat4 {
    *projection * *view * *model
}

/// Uniform values consumed by the stock shaders: `MVP`, `MV` and `MVit`.
///
/// All three are stored column-major so the block can be uploaded as is.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct ShaderUniforms {
    pub mvp: [f32; 16],
    pub model_view: [f32; 16],
    pub model_view_inverse_transpose: [f32; 16],
}

/// Projection and model-view state of the draw helpers.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ShaderTransforms {
    projection: Mat4,
    model_view: Mat4,
    model_view_inverse: Mat4,
}

impl ShaderTransforms {
    pub fn new(projection: Mat4, model_view: Mat4) -> Self {
        Self {
            projection,
            model_view,
            model_view_inverse: model_view.inverse(),
        }
    }

    pub fn set_projection(&mut self, projection: Mat4) {
        self.projection = projection;
    }

    /// Replaces the model-view matrix and refreshes its cached inverse.
    pub fn set_model_view(&mut self, model_view: Mat4) {
        self.model_view = model_view;
        self.model_view_inverse = model_view.inverse();
    }

    pub fn projection(&self) -> Mat4 {
        self.projection
    }

    pub fn model_view(&self) -> Mat4 {
        self.model_view
    }

    pub fn model_view_inverse(&self) -> Mat4 {
        self.model_view_inverse
    }

    pub fn mvp(&self) -> Mat4 {
        self.projection * self.model_view
    }

    pub fn normal_matrix(&self) -> Mat3 {
        Mat3::from_mat4(&self.model_view_inverse).transpose()
    }

    pub fn uniforms(&self) -> ShaderUniforms {
        ShaderUniforms {
            mvp: self.mvp().to_cols_array(),
            model_view: self.model_view.to_cols_array(),
            model_view_inverse_transpose: self.model_view_inverse.transpose().to_cols_array(),
        }
    }
}
