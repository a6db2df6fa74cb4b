//! liveid-core — the liveness-detection core.
//!
//! Pure domain logic for the gesture-based liveness check: eye landmark
//! geometry, stateless gesture classifiers, and the session state machine
//! that sequences blink → left turn → right turn → countdown → selfie.
//! No I/O, no timers, no camera — hosts feed events in and act on the
//! directives that come out.

pub mod detector;
pub mod geometry;
pub mod observation;
pub mod state_machine;

pub use detector::DetectorConfig;
pub use observation::FacialObservation;
pub use state_machine::{Directive, LivenessEvent, LivenessSession, LivenessState, Prompt};
