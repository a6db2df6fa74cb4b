//! Stateless gesture classifiers.
//!
//! Each function classifies a single [`FacialObservation`] against a fixed
//! threshold and never signals failure: a frame with unusable landmarks is
//! a no-op for the caller, not an error. Edge detection (blink firing once
//! per closed-eye episode) lives in the state machine, which tracks the
//! previous frame's eye state.

use crate::geometry::eye_aspect_ratio;
use crate::observation::FacialObservation;

/// Default average-EAR threshold below which the eyes count as closed.
pub const DEFAULT_BLINK_EAR_THRESHOLD: f32 = 0.025;

/// Default baseline EAR for a fully open eye. Retained as a tunable for
/// hosts that calibrate their own landmark source; the detection logic
/// itself only reads the blink threshold.
pub const DEFAULT_OPEN_EYE_EAR_BASELINE: f32 = 0.019;

/// Default absolute yaw beyond which a head turn registers.
pub const DEFAULT_YAW_THRESHOLD: f32 = 0.3;

/// Default countdown length in whole seconds before the selfie capture.
pub const DEFAULT_COUNTDOWN_SECONDS: u8 = 3;

/// Tunable thresholds for the gesture detectors and countdown.
#[derive(Debug, Clone, Copy)]
pub struct DetectorConfig {
    /// Average EAR below which the eyes are considered closed.
    pub blink_ear_threshold: f32,
    /// Baseline EAR of a fully open eye (tunable, not read by detection).
    pub open_eye_ear_baseline: f32,
    /// Absolute yaw a head turn must strictly exceed.
    pub yaw_threshold: f32,
    /// Whole seconds counted down before the selfie capture fires.
    pub countdown_seconds: u8,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            blink_ear_threshold: DEFAULT_BLINK_EAR_THRESHOLD,
            open_eye_ear_baseline: DEFAULT_OPEN_EYE_EAR_BASELINE,
            yaw_threshold: DEFAULT_YAW_THRESHOLD,
            countdown_seconds: DEFAULT_COUNTDOWN_SECONDS,
        }
    }
}

/// Classify whether the eyes are closed in this frame.
///
/// Averages the left and right EAR and compares against `threshold`.
/// Returns `None` when either eye yields an EAR of 0.0 (fewer than six
/// landmark points or degenerate geometry) — the frame carries no usable
/// blink signal and must not update edge-detection state.
pub fn eyes_closed(observation: &FacialObservation, threshold: f32) -> Option<bool> {
    let left = eye_aspect_ratio(&observation.left_eye);
    let right = eye_aspect_ratio(&observation.right_eye);
    if left == 0.0 || right == 0.0 {
        return None;
    }
    Some((left + right) / 2.0 < threshold)
}

/// True when the head is turned left strictly beyond the threshold.
pub fn turned_left(yaw: f32, threshold: f32) -> bool {
    yaw < -threshold
}

/// True when the head is turned right strictly beyond the threshold.
pub fn turned_right(yaw: f32, threshold: f32) -> bool {
    yaw > threshold
}
