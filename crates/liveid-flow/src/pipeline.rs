//! Capture & upload pipeline.
//!
//! Runs once per session, after the selfie capture: resolve the reference
//! face URL, download the reference bytes, submit both images plus the
//! reference identifier, store the parsed result, and hand off to the
//! result presenter. Each step is gated on the previous one; any failure
//! aborts the run with no retry and leaves `verification_result` unset.
//! Surfacing an aborted run to the user is the host's responsibility — the
//! pipeline's contract is only to never present a result that did not
//! complete.

use std::time::Duration;

use reqwest::Url;
use thiserror::Error;

use crate::config::Config;
use crate::http::{BackendError, VerificationBackend};
use crate::session::SessionArtifacts;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("no selfie captured for this session")]
    MissingSelfie,
    #[error("no reference image URL in session")]
    MissingReferenceUrl,
    #[error("malformed reference image URL: {0}")]
    InvalidReferenceUrl(String),
    #[error("no reference identifier in session")]
    MissingReferenceId,
    #[error("reference image download failed")]
    Download(#[source] BackendError),
    #[error("verification request failed")]
    Verification(#[source] BackendError),
}

/// The single presentation capability the flow needs: show the verification
/// outcome. Invoked exactly once, only after a fully successful run.
pub trait ResultPresenter: Send {
    fn present(&mut self, result: &serde_json::Value);
}

/// Execute the verification pipeline against the session's artifacts.
pub async fn run<B, P>(
    config: &Config,
    backend: &B,
    presenter: &mut P,
    session: &mut SessionArtifacts,
) -> Result<(), PipelineError>
where
    B: VerificationBackend,
    P: ResultPresenter,
{
    if session.selfie.is_none() {
        return Err(PipelineError::MissingSelfie);
    }

    let raw_url = session
        .reference_image_url
        .as_deref()
        .ok_or(PipelineError::MissingReferenceUrl)?;
    let url =
        Url::parse(raw_url).map_err(|e| PipelineError::InvalidReferenceUrl(e.to_string()))?;

    let reference_bytes = backend
        .fetch_reference_image(&url)
        .await
        .map_err(PipelineError::Download)?;
    session.reference_image = Some(reference_bytes.clone());

    // Pacing delay inherited from the original flow; configurable down to 0.
    if config.pre_verify_delay_secs > 0 {
        tokio::time::sleep(Duration::from_secs(config.pre_verify_delay_secs)).await;
    }

    let reference_id = session
        .reference_id
        .clone()
        .ok_or(PipelineError::MissingReferenceId)?;
    let selfie = session.selfie.as_deref().ok_or(PipelineError::MissingSelfie)?;

    let result = backend
        .submit(&reference_bytes, selfie, &reference_id)
        .await
        .map_err(PipelineError::Verification)?;

    tracing::info!(
        session_id = %session.session_id,
        reference_id = %reference_id,
        "verification complete"
    );

    session.verification_result = Some(result.clone());
    presenter.present(&result);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use tokio::sync::Mutex;

    /// Scripted backend double that records every call.
    struct MockBackend {
        fetch_response: Result<Vec<u8>, u16>,
        submit_response: Result<serde_json::Value, u16>,
        fetches: AtomicUsize,
        submits: AtomicUsize,
        submitted: Mutex<Option<(Vec<u8>, Vec<u8>, String)>>,
    }

    impl MockBackend {
        fn new(
            fetch_response: Result<Vec<u8>, u16>,
            submit_response: Result<serde_json::Value, u16>,
        ) -> Self {
            Self {
                fetch_response,
                submit_response,
                fetches: AtomicUsize::new(0),
                submits: AtomicUsize::new(0),
                submitted: Mutex::new(None),
            }
        }
    }

    impl VerificationBackend for MockBackend {
        async fn fetch_reference_image(&self, _url: &Url) -> Result<Vec<u8>, BackendError> {
            self.fetches.fetch_add(1, Ordering::SeqCst);
            self.fetch_response.clone().map_err(BackendError::Status)
        }

        async fn submit(
            &self,
            reference_image: &[u8],
            candidate_image: &[u8],
            reference_id: &str,
        ) -> Result<serde_json::Value, BackendError> {
            self.submits.fetch_add(1, Ordering::SeqCst);
            *self.submitted.lock().await = Some((
                reference_image.to_vec(),
                candidate_image.to_vec(),
                reference_id.to_string(),
            ));
            self.submit_response.clone().map_err(BackendError::Status)
        }
    }

    #[derive(Clone, Default)]
    struct CountingPresenter {
        calls: Arc<AtomicUsize>,
        last: Arc<std::sync::Mutex<Option<serde_json::Value>>>,
    }

    impl ResultPresenter for CountingPresenter {
        fn present(&mut self, result: &serde_json::Value) {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last.lock().unwrap() = Some(result.clone());
        }
    }

    fn config() -> Config {
        let mut config = Config::from_env();
        config.pre_verify_delay_secs = 0;
        config
    }

    fn ready_session() -> SessionArtifacts {
        let mut session = SessionArtifacts::new();
        session.reference_id = Some("REF-42".to_string());
        session.reference_image_url = Some("https://cdn.example/face.jpg".to_string());
        session.selfie = Some(vec![0xFF, 0xD8, 0x01]);
        session
    }

    #[tokio::test]
    async fn successful_run_stores_result_and_presents_once() {
        let backend = MockBackend::new(
            Ok(vec![1, 2, 3]),
            Ok(json!({"match": true, "score": 0.97})),
        );
        let mut presenter = CountingPresenter::default();
        let mut session = ready_session();

        run(&config(), &backend, &mut presenter, &mut session)
            .await
            .unwrap();

        assert_eq!(
            session.verification_result,
            Some(json!({"match": true, "score": 0.97}))
        );
        assert_eq!(session.reference_image.as_deref(), Some(&[1u8, 2, 3][..]));
        assert_eq!(presenter.calls.load(Ordering::SeqCst), 1);

        let submitted = backend.submitted.lock().await.clone().unwrap();
        assert_eq!(submitted.0, vec![1, 2, 3]);
        assert_eq!(submitted.1, vec![0xFF, 0xD8, 0x01]);
        assert_eq!(submitted.2, "REF-42");
    }

    #[tokio::test]
    async fn download_failure_never_submits() {
        let backend = MockBackend::new(Err(404), Ok(json!({"match": true})));
        let mut presenter = CountingPresenter::default();
        let mut session = ready_session();

        let err = run(&config(), &backend, &mut presenter, &mut session)
            .await
            .unwrap_err();

        assert!(matches!(err, PipelineError::Download(_)));
        assert_eq!(backend.submits.load(Ordering::SeqCst), 0);
        assert!(session.verification_result.is_none());
        assert_eq!(presenter.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn verification_failure_leaves_result_unset() {
        let backend = MockBackend::new(Ok(vec![1]), Err(500));
        let mut presenter = CountingPresenter::default();
        let mut session = ready_session();

        let err = run(&config(), &backend, &mut presenter, &mut session)
            .await
            .unwrap_err();

        assert!(matches!(err, PipelineError::Verification(_)));
        assert!(session.verification_result.is_none());
        assert_eq!(presenter.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn missing_reference_url_aborts_before_any_network_call() {
        let backend = MockBackend::new(Ok(vec![1]), Ok(json!({})));
        let mut presenter = CountingPresenter::default();
        let mut session = ready_session();
        session.reference_image_url = None;

        let err = run(&config(), &backend, &mut presenter, &mut session)
            .await
            .unwrap_err();

        assert!(matches!(err, PipelineError::MissingReferenceUrl));
        assert_eq!(backend.fetches.load(Ordering::SeqCst), 0);
        assert_eq!(backend.submits.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn malformed_reference_url_aborts_before_any_network_call() {
        let backend = MockBackend::new(Ok(vec![1]), Ok(json!({})));
        let mut presenter = CountingPresenter::default();
        let mut session = ready_session();
        session.reference_image_url = Some("not a url".to_string());

        let err = run(&config(), &backend, &mut presenter, &mut session)
            .await
            .unwrap_err();

        assert!(matches!(err, PipelineError::InvalidReferenceUrl(_)));
        assert_eq!(backend.fetches.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn missing_reference_id_aborts_before_submit() {
        let backend = MockBackend::new(Ok(vec![1]), Ok(json!({})));
        let mut presenter = CountingPresenter::default();
        let mut session = ready_session();
        session.reference_id = None;

        let err = run(&config(), &backend, &mut presenter, &mut session)
            .await
            .unwrap_err();

        assert!(matches!(err, PipelineError::MissingReferenceId));
        assert_eq!(backend.submits.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn missing_selfie_aborts_immediately() {
        let backend = MockBackend::new(Ok(vec![1]), Ok(json!({})));
        let mut presenter = CountingPresenter::default();
        let mut session = ready_session();
        session.selfie = None;

        let err = run(&config(), &backend, &mut presenter, &mut session)
            .await
            .unwrap_err();

        assert!(matches!(err, PipelineError::MissingSelfie));
        assert_eq!(backend.fetches.load(Ordering::SeqCst), 0);
    }
}
