//! Session engine.
//!
//! Owns the state machine, the countdown ticker, the camera, and the
//! session artifacts for one eKYC run. All inputs — host-fed frames and
//! ticker ticks — are funnelled into a single `select!` loop and handed to
//! the state machine strictly one at a time, so state transitions are
//! never raced. The frame channel is bounded; [`EngineHandle::submit`]
//! drops a frame while the previous one is still being processed, keeping
//! the hot path at-most-one-in-flight.

use thiserror::Error;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Duration, Instant};

use liveid_core::{Directive, FacialObservation, LivenessEvent, LivenessSession, Prompt};

use crate::camera::{CameraError, SelfieCamera};
use crate::config::Config;
use crate::http::VerificationBackend;
use crate::pipeline::{self, ResultPresenter};
use crate::session::{OcrRecord, SessionArtifacts};

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("camera error: {0}")]
    Camera(#[from] CameraError),
    #[error("session aborted before capture")]
    Aborted,
}

/// Per-frame input from the host's landmark stage.
#[derive(Debug, Clone)]
pub enum FrameEvent {
    /// Exactly one face was detected in the frame.
    Face(FacialObservation),
    /// No detectable face in the frame.
    NoFace,
}

/// UI mutations, delivered to the host's UI-owning context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiUpdate {
    Prompt(Prompt),
    /// `Some(n)` shows the countdown at n seconds; `None` hides it.
    Countdown(Option<u8>),
    Loading(bool),
}

/// Clone-safe handle for feeding frames to the engine.
#[derive(Clone, Debug)]
pub struct EngineHandle {
    tx: mpsc::Sender<FrameEvent>,
}

impl EngineHandle {
    /// Submit a frame, dropping it when the previous frame is still in
    /// flight. The preferred call on the camera hot path.
    pub fn submit(&self, event: FrameEvent) -> bool {
        self.tx.try_send(event).is_ok()
    }

    /// Queue a frame, waiting for channel capacity. For hosts that prefer
    /// queueing over dropping.
    pub async fn send(&self, event: FrameEvent) -> bool {
        self.tx.send(event).await.is_ok()
    }
}

/// Spawn the engine task for one session.
///
/// Seeds the session from the OCR record and pushes the reference
/// identifier once through the returned oneshot. The join handle resolves
/// with the finished session artifacts: after the capture and pipeline run
/// (successful or not), or with [`EngineError::Aborted`] when every frame
/// sender is dropped first (leaving the screen). Either way the camera is
/// released and any pending countdown is invalidated before the task ends.
pub fn spawn<C, B, P>(
    config: Config,
    ocr: OcrRecord,
    camera: C,
    backend: B,
    presenter: P,
    ui: mpsc::UnboundedSender<UiUpdate>,
) -> (
    EngineHandle,
    oneshot::Receiver<String>,
    JoinHandle<Result<SessionArtifacts, EngineError>>,
)
where
    C: SelfieCamera + Send + 'static,
    B: VerificationBackend + Send + Sync + 'static,
    P: ResultPresenter + 'static,
{
    let (tx, rx) = mpsc::channel(config.frame_queue_depth.max(1));
    let (reference_tx, reference_rx) = oneshot::channel();

    let session = SessionArtifacts::from_ocr(&ocr);
    tracing::info!(
        session_id = %session.session_id,
        reference_id = %ocr.reference_id,
        "liveness session started"
    );
    // Fire-once reference id hand-off to the application layer.
    let _ = reference_tx.send(ocr.reference_id);

    let task = tokio::spawn(run(config, session, rx, camera, backend, presenter, ui));

    (EngineHandle { tx }, reference_rx, task)
}

async fn run<C, B, P>(
    config: Config,
    mut session: SessionArtifacts,
    mut rx: mpsc::Receiver<FrameEvent>,
    mut camera: C,
    backend: B,
    mut presenter: P,
    ui: mpsc::UnboundedSender<UiUpdate>,
) -> Result<SessionArtifacts, EngineError>
where
    C: SelfieCamera + Send,
    B: VerificationBackend + Send,
    P: ResultPresenter,
{
    let mut machine = LivenessSession::new(config.detector());

    // The ticker is polled only while a countdown is active; it is
    // re-created on each countdown start so the first tick lands a full
    // second later.
    let mut ticker = interval_at(Instant::now(), Duration::from_secs(1));
    let mut ticking = false;

    loop {
        let directives = tokio::select! {
            maybe_frame = rx.recv() => match maybe_frame {
                Some(FrameEvent::Face(observation)) => {
                    machine.handle(LivenessEvent::Face(observation))
                }
                Some(FrameEvent::NoFace) => machine.handle(LivenessEvent::NoFace),
                None => {
                    // Frame source gone: the host left the screen. Release
                    // the camera and drop the countdown so no dangling
                    // timer can fire capture logic on a torn-down view.
                    tracing::info!(session_id = %session.session_id, "frame source closed — aborting session");
                    camera.stop();
                    return Err(EngineError::Aborted);
                }
            },
            _ = ticker.tick(), if ticking => machine.handle(LivenessEvent::Tick),
        };

        for directive in directives {
            match directive {
                Directive::Prompt(prompt) => {
                    let _ = ui.send(UiUpdate::Prompt(prompt));
                }
                Directive::ShowCountdown(remaining) => {
                    if !ticking {
                        ticker = interval_at(
                            Instant::now() + Duration::from_secs(1),
                            Duration::from_secs(1),
                        );
                        ticking = true;
                    }
                    let _ = ui.send(UiUpdate::Countdown(Some(remaining)));
                }
                Directive::HideCountdown => {
                    ticking = false;
                    let _ = ui.send(UiUpdate::Countdown(None));
                }
                Directive::CaptureSelfie => {
                    let _ = ui.send(UiUpdate::Loading(true));

                    let selfie = match camera.capture_photo() {
                        Ok(bytes) => bytes,
                        Err(e) => {
                            tracing::error!(error = %e, "selfie capture failed");
                            camera.stop();
                            return Err(EngineError::Camera(e));
                        }
                    };
                    camera.stop();
                    tracing::info!(
                        session_id = %session.session_id,
                        len = selfie.len(),
                        "selfie captured — camera released"
                    );
                    session.selfie = Some(selfie);
                    machine.selfie_captured();

                    // Pipeline failures abort silently from the flow's
                    // perspective; the session hands back with
                    // verification_result unset and the host decides what
                    // to surface.
                    if let Err(e) =
                        pipeline::run(&config, &backend, &mut presenter, &mut session).await
                    {
                        tracing::warn!(
                            session_id = %session.session_id,
                            error = %e,
                            "verification pipeline aborted"
                        );
                    }
                    let _ = ui.send(UiUpdate::Loading(false));
                    return Ok(session);
                }
            }
        }
    }
}
