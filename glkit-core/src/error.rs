use thiserror::Error;

/// Precondition violations reported by the checked (`try_*`) operations.
///
/// The unchecked counterparts never fail; they let IEEE NaN/Inf propagate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MathError {
    #[error("matrix is singular (|det| below epsilon)")]
    Singular,
    #[error("cannot normalize a zero-length vector")]
    ZeroLength,
    #[error("projection volume is degenerate: left/right, bottom/top or near/far coincide")]
    DegenerateVolume,
    #[error("clip planes must satisfy 0 < near < far")]
    InvalidClipPlanes,
    #[error("aspect ratio must be positive and finite")]
    InvalidAspectRatio,
    #[error("field of view must lie strictly between 0 and 180 degrees")]
    InvalidFieldOfView,
    #[error("up vector is parallel to the view direction")]
    ParallelUp,
}
