//! Application-facing service surface.
//!
//! This is the contract the surrounding application consumes: the two
//! trivial bridge functions kept for compatibility, and `show_ekyc_ui`,
//! which starts a liveness session and returns its handles. The original
//! fire-once "reference id received" event is modelled as a oneshot
//! returned directly from the start call — no subscribe/unsubscribe
//! lifecycle to leak.

use thiserror::Error;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

use crate::camera::{CameraError, SelfieCamera};
use crate::config::Config;
use crate::engine::{self, EngineError, EngineHandle, UiUpdate};
use crate::http::VerificationBackend;
use crate::pipeline::ResultPresenter;
use crate::session::{OcrRecord, SessionArtifacts};

#[derive(Error, Debug)]
pub enum ServiceError {
    /// The host could not provide a surface to present the flow on.
    #[error("no presentation surface available")]
    NoPresentationSurface,
    #[error("camera error: {0}")]
    Camera(#[from] CameraError),
}

/// Bridge compatibility shim.
pub fn multiply(a: f64, b: f64) -> f64 {
    a * b
}

/// Bridge compatibility shim.
pub fn hello_world() -> &'static str {
    "HelloWorld"
}

/// A running eKYC flow.
#[derive(Debug)]
pub struct EkycFlow {
    /// Feed per-frame observations here.
    pub frames: EngineHandle,
    /// Resolves once with the OCR reference identifier for this session.
    pub reference_id: oneshot::Receiver<String>,
    /// Resolves with the finished session artifacts, or
    /// [`EngineError::Aborted`] when the host tears the flow down early.
    pub outcome: JoinHandle<Result<SessionArtifacts, EngineError>>,
}

/// Entry point for presenting the eKYC liveness flow.
pub struct EkycService {
    config: Config,
}

impl EkycService {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Present the eKYC flow and start a liveness session.
    ///
    /// `presenter` is the host's result-presentation capability; `None`
    /// means the host has no valid container to present on, which rejects
    /// the launch. The camera is acquired before the engine spawns so
    /// device failures surface here rather than mid-session.
    pub fn show_ekyc_ui<C, B, P>(
        &self,
        ocr: OcrRecord,
        mut camera: C,
        backend: B,
        presenter: Option<P>,
        ui: mpsc::UnboundedSender<UiUpdate>,
    ) -> Result<EkycFlow, ServiceError>
    where
        C: SelfieCamera + Send + 'static,
        B: VerificationBackend + Send + Sync + 'static,
        P: ResultPresenter + 'static,
    {
        let presenter = presenter.ok_or(ServiceError::NoPresentationSurface)?;
        camera.start()?;

        let (frames, reference_id, outcome) =
            engine::spawn(self.config.clone(), ocr, camera, backend, presenter, ui);

        Ok(EkycFlow {
            frames,
            reference_id,
            outcome,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::BackendError;
    use reqwest::Url;

    struct NullCamera {
        available: bool,
    }

    impl SelfieCamera for NullCamera {
        fn start(&mut self) -> Result<(), CameraError> {
            if self.available {
                Ok(())
            } else {
                Err(CameraError::Unavailable("no front camera".to_string()))
            }
        }
        fn capture_photo(&mut self) -> Result<Vec<u8>, CameraError> {
            Ok(Vec::new())
        }
        fn stop(&mut self) {}
    }

    struct NullBackend;

    impl VerificationBackend for NullBackend {
        async fn fetch_reference_image(&self, _url: &Url) -> Result<Vec<u8>, BackendError> {
            Ok(Vec::new())
        }
        async fn submit(
            &self,
            _reference_image: &[u8],
            _candidate_image: &[u8],
            _reference_id: &str,
        ) -> Result<serde_json::Value, BackendError> {
            Ok(serde_json::json!({}))
        }
    }

    struct NullPresenter;

    impl ResultPresenter for NullPresenter {
        fn present(&mut self, _result: &serde_json::Value) {}
    }

    fn ocr() -> OcrRecord {
        OcrRecord {
            reference_id: "REF-1".to_string(),
            face_image_url: None,
            full_name: None,
            document_number: None,
        }
    }

    #[test]
    fn bridge_shims_behave() {
        assert_eq!(multiply(6.0, 7.0), 42.0);
        assert_eq!(hello_world(), "HelloWorld");
    }

    #[tokio::test]
    async fn missing_presentation_surface_rejects_launch() {
        let service = EkycService::new(Config::from_env());
        let (ui_tx, _ui_rx) = mpsc::unbounded_channel();

        let err = service
            .show_ekyc_ui(
                ocr(),
                NullCamera { available: true },
                NullBackend,
                None::<NullPresenter>,
                ui_tx,
            )
            .unwrap_err();
        assert!(matches!(err, ServiceError::NoPresentationSurface));
    }

    #[tokio::test]
    async fn camera_failure_rejects_launch() {
        let service = EkycService::new(Config::from_env());
        let (ui_tx, _ui_rx) = mpsc::unbounded_channel();

        let err = service
            .show_ekyc_ui(
                ocr(),
                NullCamera { available: false },
                NullBackend,
                Some(NullPresenter),
                ui_tx,
            )
            .unwrap_err();
        assert!(matches!(err, ServiceError::Camera(_)));
    }

    #[tokio::test]
    async fn launch_delivers_reference_id_once() {
        let service = EkycService::new(Config::from_env());
        let (ui_tx, _ui_rx) = mpsc::unbounded_channel();

        let flow = service
            .show_ekyc_ui(
                ocr(),
                NullCamera { available: true },
                NullBackend,
                Some(NullPresenter),
                ui_tx,
            )
            .unwrap();

        assert_eq!(flow.reference_id.await.unwrap(), "REF-1");

        drop(flow.frames);
        let err = flow.outcome.await.unwrap().unwrap_err();
        assert!(matches!(err, EngineError::Aborted));
    }
}
