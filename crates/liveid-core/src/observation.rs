use serde::{Deserialize, Serialize};

/// One detected face in a single video frame.
///
/// Produced per frame by the host's face-landmark stage and consumed
/// immediately by the gesture detectors; never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FacialObservation {
    /// Normalized left-eye landmark points (6-point convention, ≥ 6 expected).
    pub left_eye: Vec<(f32, f32)>,
    /// Normalized right-eye landmark points (6-point convention, ≥ 6 expected).
    pub right_eye: Vec<(f32, f32)>,
    /// Signed head yaw. Negative = turned left, positive = turned right.
    pub yaw: f32,
}
