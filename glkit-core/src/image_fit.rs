//! Transforms that place an image on the unit quad `[-1, 1]^2` without
//! distorting it.
//!
//! All functions take the image size in pixels and the window aspect
//! (width / height) and return a model matrix for the quad.

use crate::mat4::Mat4;
use crate::vec::Vec3;

fn image_aspect(image_size: (u32, u32)) -> f32 {
    image_size.0 as f32 / image_size.1 as f32
}

/// Scales the quad so the image's longer side (relative to the window)
/// fills the window.
pub fn fit_image(image_size: (u32, u32), window_aspect: f32) -> Mat4 {
    let ratio = image_aspect(image_size) / window_aspect;
    if ratio > 1.0 {
        Mat4::scaling(1.0, 1.0 / ratio, 1.0)
    } else {
        Mat4::scaling(ratio, 1.0, 1.0)
    }
}

/// Pins the quad's half-height to `height` (1.0 spans the whole window)
/// and centres it on `center`.
pub fn fit_image_height(
    image_size: (u32, u32),
    window_aspect: f32,
    height: f32,
    center: Vec3,
) -> Mat4 {
    let width = height * image_aspect(image_size) / window_aspect;
    Mat4::translation(center) * Mat4::scaling(width, height, 1.0)
}

/// Pins the quad's half-width to `width` and centres it on `center`.
pub fn fit_image_width(
    image_size: (u32, u32),
    window_aspect: f32,
    width: f32,
    center: Vec3,
) -> Mat4 {
    let height = width * window_aspect / image_aspect(image_size);
    Mat4::translation(center) * Mat4::scaling(width, height, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wide_image_in_square_window() {
        let m = fit_image((200, 100), 1.0);
        let corner = m.transform_point(Vec3::new(1.0, 1.0, 0.0));
        assert!(corner.approx_eq(Vec3::new(1.0, 0.5, 0.0), 1e-6));
    }

    #[test]
    fn test_tall_image_in_wide_window() {
        let m = fit_image((100, 100), 2.0);
        let corner = m.transform_point(Vec3::new(1.0, 1.0, 0.0));
        assert!(corner.approx_eq(Vec3::new(0.5, 1.0, 0.0), 1e-6));
    }

    #[test]
    fn test_matching_aspect_is_identity() {
        assert_eq!(fit_image((640, 480), 640.0 / 480.0), Mat4::identity());
    }

    #[test]
    fn test_fixed_height() {
        let m = fit_image_height((300, 100), 1.5, 0.5, Vec3::new(0.25, 0.0, 0.0));
        let corner = m.transform_point(Vec3::new(1.0, 1.0, 0.0));
        assert!(corner.approx_eq(Vec3::new(1.25, 0.5, 0.0), 1e-6));
    }

    #[test]
    fn test_fixed_width() {
        let m = fit_image_width((300, 100), 1.5, 1.0, Vec3::ZERO);
        let corner = m.transform_point(Vec3::new(1.0, 1.0, 0.0));
        assert!(corner.approx_eq(Vec3::new(1.0, 0.5, 0.0), 1e-6));
    }
}
