//! glkit web - the transform library exposed to JavaScript.
//!
//! `SceneTransforms` keeps projection, view and model matrices and hands out
//! the stock uniforms (`MVP`, `MV`, the normal matrix) as column-major
//! `Float32Array`s for `uniformMatrix*fv(location, false, data)`.

use glkit_core::{
    AnimationClock, Mat3, Mat4, MathError, RotationState, ShaderTransforms, Transform, Vec3,
};
use wasm_bindgen::prelude::*;
use web_sys::{WebGl2RenderingContext, WebGlUniformLocation};

fn to_js(err: MathError) -> JsValue {
    JsValue::from_str(&err.to_string())
}

#[wasm_bindgen]
#[derive(Debug, Clone, Default)]
pub struct SceneTransforms {
    view: Mat4,
    model: Mat4,
    shader: ShaderTransforms,
}

/// Rust-side API; the methods exported to JavaScript wrap these.
impl SceneTransforms {
    fn refresh(&mut self) {
        self.shader.set_model_view(self.view * self.model);
    }

    pub fn try_set_perspective(
        &mut self,
        fov_y: f32,
        aspect: f32,
        near: f32,
        far: f32,
    ) -> Result<(), MathError> {
        self.shader.set_projection(Mat4::try_perspective(fov_y, aspect, near, far)?);
        Ok(())
    }

    pub fn try_set_ortho(
        &mut self,
        left: f32,
        right: f32,
        bottom: f32,
        top: f32,
        near: f32,
        far: f32,
    ) -> Result<(), MathError> {
        self.shader
            .set_projection(Mat4::try_ortho(left, right, bottom, top, near, far)?);
        Ok(())
    }

    pub fn try_set_look_at(&mut self, eye: Vec3, center: Vec3, up: Vec3) -> Result<(), MathError> {
        self.view = Mat4::try_look_at(eye, center, up)?;
        self.refresh();
        Ok(())
    }

    pub fn set_view_matrix(&mut self, view: Mat4) {
        self.view = view;
        self.refresh();
    }

    pub fn set_model_matrix(&mut self, model: Mat4) {
        self.model = model;
        self.refresh();
    }

    pub fn shader(&self) -> &ShaderTransforms {
        &self.shader
    }

    /// Eye-space normal matrix, the inverse transpose of `MV`'s upper 3x3.
    pub fn normal_matrix3(&self) -> Mat3 {
        self.shader.normal_matrix()
    }
}

#[wasm_bindgen]
impl SceneTransforms {
    #[wasm_bindgen(constructor)]
    pub fn new() -> SceneTransforms {
        SceneTransforms::default()
    }

    /// `fov_y` in degrees.
    pub fn set_perspective(
        &mut self,
        fov_y: f32,
        aspect: f32,
        near: f32,
        far: f32,
    ) -> Result<(), JsValue> {
        self.try_set_perspective(fov_y, aspect, near, far).map_err(to_js)
    }

    pub fn set_ortho(
        &mut self,
        left: f32,
        right: f32,
        bottom: f32,
        top: f32,
        near: f32,
        far: f32,
    ) -> Result<(), JsValue> {
        self.try_set_ortho(left, right, bottom, top, near, far).map_err(to_js)
    }

    #[allow(clippy::too_many_arguments)]
    pub fn set_look_at(
        &mut self,
        eye_x: f32,
        eye_y: f32,
        eye_z: f32,
        center_x: f32,
        center_y: f32,
        center_z: f32,
        up_x: f32,
        up_y: f32,
        up_z: f32,
    ) -> Result<(), JsValue> {
        self.try_set_look_at(
            Vec3::new(eye_x, eye_y, eye_z),
            Vec3::new(center_x, center_y, center_z),
            Vec3::new(up_x, up_y, up_z),
        )
        .map_err(to_js)
    }

    /// Sets the model matrix from 16 column-major floats.
    pub fn set_model(&mut self, cols: &[f32]) -> Result<(), JsValue> {
        let cols: [f32; 16] = cols
            .try_into()
            .map_err(|_| JsValue::from_str("model matrix needs exactly 16 floats"))?;
        self.set_model_matrix(Mat4::from_cols_array(cols));
        Ok(())
    }

    /// Sets the model matrix from translation, Euler angles in degrees and a
    /// uniform scale.
    #[allow(clippy::too_many_arguments)]
    pub fn set_model_trs(
        &mut self,
        tx: f32,
        ty: f32,
        tz: f32,
        rx: f32,
        ry: f32,
        rz: f32,
        scale: f32,
    ) {
        let transform = Transform::from_translation(Vec3::new(tx, ty, tz))
            .with_rotation(RotationState::new(rx, ry, rz))
            .with_uniform_scale(scale);
        self.set_model_matrix(transform.matrix());
    }

    pub fn mvp(&self) -> Vec<f32> {
        self.shader.mvp().to_cols_array().to_vec()
    }

    pub fn model_view(&self) -> Vec<f32> {
        self.shader.model_view().to_cols_array().to_vec()
    }

    /// 3x3, column-major.
    pub fn normal_matrix(&self) -> Vec<f32> {
        self.normal_matrix3().to_cols_array().to_vec()
    }

    /// Uploads `MVP`, `MV` and the normal matrix to whichever locations are
    /// present, all with `transpose = false`.
    pub fn upload(
        &self,
        gl: &WebGl2RenderingContext,
        mvp: Option<WebGlUniformLocation>,
        model_view: Option<WebGlUniformLocation>,
        normal: Option<WebGlUniformLocation>,
    ) {
        let uniforms = self.shader.uniforms();
        if mvp.is_some() {
            gl.uniform_matrix4fv_with_f32_array(mvp.as_ref(), false, &uniforms.mvp);
        }
        if model_view.is_some() {
            gl.uniform_matrix4fv_with_f32_array(model_view.as_ref(), false, &uniforms.model_view);
        }
        if normal.is_some() {
            let normal_matrix = self.normal_matrix3().to_cols_array();
            gl.uniform_matrix3fv_with_f32_array(normal.as_ref(), false, &normal_matrix);
        }
    }
}

/// Pausable animation time driven by `performance.now()` (milliseconds).
#[wasm_bindgen]
#[derive(Debug, Clone, Copy)]
pub struct AnimationTimer {
    clock: AnimationClock,
}

#[wasm_bindgen]
impl AnimationTimer {
    #[wasm_bindgen(constructor)]
    pub fn new(now_ms: f64) -> AnimationTimer {
        AnimationTimer {
            clock: AnimationClock::new(now_ms / 1000.0),
        }
    }

    pub fn set_active(&mut self, active: bool, now_ms: f64) {
        self.clock.set_active(active, now_ms / 1000.0);
    }

    pub fn is_active(&self) -> bool {
        self.clock.is_active()
    }

    pub fn reset(&mut self, now_ms: f64) {
        self.clock.reset(now_ms / 1000.0);
    }

    /// Animation time in seconds.
    pub fn time(&self, now_ms: f64) -> f64 {
        self.clock.time(now_ms / 1000.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_identity() {
        let scene = SceneTransforms::new();
        assert_eq!(scene.mvp(), Mat4::identity().to_cols_array().to_vec());
        assert_eq!(scene.normal_matrix(), Mat3::identity().to_cols_array().to_vec());
    }

    #[test]
    fn test_mvp_is_column_major() {
        let mut scene = SceneTransforms::new();
        scene.try_set_perspective(60.0, 1.5, 0.1, 100.0).unwrap();
        scene
            .try_set_look_at(Vec3::new(0.0, 0.0, 5.0), Vec3::ZERO, Vec3::Y)
            .unwrap();
        scene.set_model_trs(1.0, 0.0, 0.0, 0.0, 0.0, 0.0, 1.0);

        let expected = Mat4::perspective(60.0, 1.5, 0.1, 100.0)
            * Mat4::look_at(Vec3::new(0.0, 0.0, 5.0), Vec3::ZERO, Vec3::Y)
            * Mat4::translation_xyz(1.0, 0.0, 0.0);
        let mvp = scene.mvp();
        for (a, b) in mvp.iter().zip(expected.to_cols_array()) {
            assert!((a - b).abs() < 1e-5);
        }
        // w row of a perspective matrix is (0, 0, -1, 0): column-major index 11
        assert_eq!(mvp[11], -1.0);

        let mv = scene.model_view();
        assert!((mv[12] - 1.0).abs() < 1e-6 && (mv[14] + 5.0).abs() < 1e-6);
    }

    #[test]
    fn test_normal_matrix_undoes_nonuniform_scale() {
        let mut scene = SceneTransforms::new();
        scene.set_model_matrix(Mat4::scaling(2.0, 1.0, 1.0));
        let n = scene.normal_matrix3();
        let expected = Mat3::from_rows([[0.5, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]]);
        assert!(n.approx_eq(&expected, 1e-6));
    }

    #[test]
    fn test_checked_setters_reject_bad_input() {
        let mut scene = SceneTransforms::new();
        assert_eq!(
            scene.try_set_perspective(60.0, 0.0, 0.1, 10.0),
            Err(MathError::InvalidAspectRatio)
        );
        assert_eq!(
            scene.try_set_ortho(1.0, 1.0, -1.0, 1.0, 0.1, 10.0),
            Err(MathError::DegenerateVolume)
        );
        assert_eq!(scene.try_set_look_at(Vec3::ZERO, Vec3::Y, Vec3::Y), Err(MathError::ParallelUp));
        assert_eq!(scene.shader().projection(), Mat4::identity());
    }

    #[test]
    fn test_timer_uses_milliseconds() {
        let mut timer = AnimationTimer::new(1000.0);
        assert_eq!(timer.time(3500.0), 2.5);
        timer.set_active(false, 3500.0);
        assert_eq!(timer.time(9000.0), 2.5);
        timer.reset(9000.0);
        assert_eq!(timer.time(9000.0), 0.0);
    }
}
