use thiserror::Error;

#[derive(Error, Debug)]
pub enum CameraError {
    #[error("camera device unavailable: {0}")]
    Unavailable(String),
    #[error("photo capture failed: {0}")]
    CaptureFailed(String),
}

/// Still-capture seam over the host's front camera.
///
/// The live preview stream stays host-owned — the host runs its own
/// landmark stage and feeds observations to the engine. This trait covers
/// only what the flow itself needs: starting the device, taking the final
/// selfie, and releasing the device when the flow is done or torn down.
pub trait SelfieCamera {
    /// Acquire the device. Fails when no front camera is available or its
    /// input cannot be configured.
    fn start(&mut self) -> Result<(), CameraError>;

    /// Capture one still photo and return its encoded bytes.
    fn capture_photo(&mut self) -> Result<Vec<u8>, CameraError>;

    /// Release the device. Idempotent; the flow never reacquires it.
    fn stop(&mut self);
}
