//! glkit core - the transform library and CPU-side draw helpers shared by the
//! demos.
//!
//! Matrices are row-major with column vectors (`projection * view * model`).
//! Every upload helper emits column-major arrays meant for
//! `glUniformMatrix*fv(.., transpose = false, ..)`.

pub mod animation;
pub mod draw;
pub mod error;
pub mod geometry;
pub mod image_fit;
#[cfg(feature = "nalgebra")]
pub mod interop;
pub mod mat3;
pub mod mat4;
pub mod projection;
pub mod stl;
pub mod transform;
pub mod vec;

/// Threshold below which a determinant or a length counts as zero.
pub const EPSILON: f32 = 1e-6;

// Re-export commonly used types
pub use animation::AnimationClock;
pub use draw::{DrawError, LineDrawType, TrisDrawType};
pub use error::MathError;
pub use geometry::{Mesh, Triangle, Vertex};
pub use mat3::Mat3;
pub use mat4::Mat4;
pub use projection::{Projection, ScreenPoint, ViewPose, Viewport};
pub use stl::StlError;
pub use transform::{RotationState, ShaderTransforms, ShaderUniforms, Transform};
pub use vec::{Vec2, Vec3, Vec4};
