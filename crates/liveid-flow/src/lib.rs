//! liveid-flow — the eKYC session flow.
//!
//! Everything around the liveness core that makes a full verification run:
//! env-driven configuration, per-session artifacts, the camera seam, the
//! verification HTTP client, the capture & upload pipeline, the engine
//! that sequences it all, and the service surface the application calls.

pub mod camera;
pub mod config;
pub mod engine;
pub mod http;
pub mod pipeline;
pub mod service;
pub mod session;

pub use camera::{CameraError, SelfieCamera};
pub use config::Config;
pub use engine::{EngineError, EngineHandle, FrameEvent, UiUpdate};
pub use http::{BackendError, VerificationBackend, VerifyApiClient};
pub use pipeline::{PipelineError, ResultPresenter};
pub use service::{EkycFlow, EkycService, ServiceError};
pub use session::{OcrRecord, SessionArtifacts};
