//! Liveness gesture sequencing.
//!
//! The session advances through a fixed gesture order — blink, head turn
//! left, head turn right — then counts down and captures a selfie. All
//! inputs arrive as [`LivenessEvent`]s on one logical queue and are
//! processed strictly in order: per-frame face observations, no-face
//! frames, and countdown ticks. The machine owns no timers and touches no
//! UI; it emits [`Directive`]s for the host to act on.
//!
//! Losing the face momentarily cancels an active countdown but never
//! resets gesture progress — the user is not forced to restart the whole
//! sequence over a dropped frame.

use crate::detector::{eyes_closed, turned_left, turned_right, DetectorConfig};
use crate::observation::FacialObservation;

/// Phase of the liveness session. Terminal phases (`CapturingSelfie`,
/// `Loading`) are reached once and never re-entered within a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LivenessState {
    WaitingForBlink,
    WaitingForLeftTurn,
    WaitingForRightTurn,
    CountingDown,
    CapturingSelfie,
    Loading,
}

/// One input to the session, delivered in arrival order.
#[derive(Debug, Clone)]
pub enum LivenessEvent {
    /// A frame with exactly one detected face.
    Face(FacialObservation),
    /// A frame with no detectable face.
    NoFace,
    /// One elapsed second of an active countdown.
    Tick,
}

/// User guidance emitted by the session. Emitted only when the prompt
/// changes; rendering and localization are the host's concern.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Prompt {
    /// No face in view — ask the user to center their face.
    PlaceFace,
    Blink,
    TurnLeft,
    TurnRight,
    /// Countdown running — hold still for the selfie.
    GetReady,
    /// Capture done, verification in flight.
    Processing,
}

/// Host-facing output of one processed event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Directive {
    Prompt(Prompt),
    /// Display the countdown with this many seconds remaining.
    ShowCountdown(u8),
    /// Hide the countdown display.
    HideCountdown,
    /// Take the selfie now. Emitted exactly once per session.
    CaptureSelfie,
}

/// The liveness state machine for one capture session.
pub struct LivenessSession {
    config: DetectorConfig,
    state: LivenessState,
    /// Eye state of the previous usable frame; blink fires on the
    /// open→closed edge so a held-closed eye cannot re-fire.
    last_eyes_closed: bool,
    /// Remaining whole seconds; `Some` means a countdown is active.
    countdown: Option<u8>,
    last_prompt: Option<Prompt>,
}

impl LivenessSession {
    pub fn new(config: DetectorConfig) -> Self {
        Self {
            config,
            state: LivenessState::WaitingForBlink,
            last_eyes_closed: false,
            countdown: None,
            last_prompt: None,
        }
    }

    pub fn state(&self) -> LivenessState {
        self.state
    }

    /// Remaining countdown seconds, if a countdown is active.
    pub fn countdown_remaining(&self) -> Option<u8> {
        self.countdown
    }

    pub fn countdown_active(&self) -> bool {
        self.countdown.is_some()
    }

    /// Process one event and return the directives it produced.
    pub fn handle(&mut self, event: LivenessEvent) -> Vec<Directive> {
        match event {
            LivenessEvent::Face(observation) => self.on_face(&observation),
            LivenessEvent::NoFace => self.on_no_face(),
            LivenessEvent::Tick => self.on_tick(),
        }
    }

    /// Notify the machine that the selfie capture completed.
    pub fn selfie_captured(&mut self) {
        if self.state == LivenessState::CapturingSelfie {
            self.state = LivenessState::Loading;
        }
    }

    fn on_face(&mut self, observation: &FacialObservation) -> Vec<Directive> {
        let mut out = Vec::new();
        match self.state {
            LivenessState::WaitingForBlink => {
                self.push_prompt(&mut out, Prompt::Blink);
                // A frame without a usable eye signal neither fires nor
                // updates the edge state.
                if let Some(closed) = eyes_closed(observation, self.config.blink_ear_threshold) {
                    if closed && !self.last_eyes_closed {
                        tracing::debug!("blink detected — waiting for left turn");
                        self.state = LivenessState::WaitingForLeftTurn;
                        self.push_prompt(&mut out, Prompt::TurnLeft);
                    }
                    self.last_eyes_closed = closed;
                }
            }
            LivenessState::WaitingForLeftTurn => {
                self.push_prompt(&mut out, Prompt::TurnLeft);
                if turned_left(observation.yaw, self.config.yaw_threshold) {
                    tracing::debug!(yaw = observation.yaw, "left turn detected");
                    self.state = LivenessState::WaitingForRightTurn;
                    self.push_prompt(&mut out, Prompt::TurnRight);
                }
            }
            LivenessState::WaitingForRightTurn => {
                self.push_prompt(&mut out, Prompt::TurnRight);
                if turned_right(observation.yaw, self.config.yaw_threshold) {
                    tracing::debug!(yaw = observation.yaw, "right turn detected — counting down");
                    self.state = LivenessState::CountingDown;
                    self.push_prompt(&mut out, Prompt::GetReady);
                    self.start_countdown(&mut out);
                }
            }
            LivenessState::CountingDown => {
                self.push_prompt(&mut out, Prompt::GetReady);
                // Restarts only after a no-face cancellation; a running
                // countdown is left untouched.
                self.start_countdown(&mut out);
            }
            LivenessState::CapturingSelfie | LivenessState::Loading => {
                self.push_prompt(&mut out, Prompt::Processing);
            }
        }
        out
    }

    fn on_no_face(&mut self) -> Vec<Directive> {
        let mut out = Vec::new();
        self.push_prompt(&mut out, Prompt::PlaceFace);
        // Abandon the countdown but keep the current gesture state.
        if self.countdown.take().is_some() {
            tracing::debug!(state = ?self.state, "face lost — countdown cancelled");
            out.push(Directive::HideCountdown);
        }
        out
    }

    fn on_tick(&mut self) -> Vec<Directive> {
        let mut out = Vec::new();
        if self.state != LivenessState::CountingDown {
            // Stale tick from a torn-down countdown.
            self.countdown = None;
            return out;
        }
        let Some(remaining) = self.countdown else {
            return out;
        };
        let remaining = remaining.saturating_sub(1);
        if remaining == 0 {
            tracing::debug!("countdown complete — capturing selfie");
            self.countdown = None;
            self.state = LivenessState::CapturingSelfie;
            out.push(Directive::HideCountdown);
            self.push_prompt(&mut out, Prompt::Processing);
            out.push(Directive::CaptureSelfie);
        } else {
            self.countdown = Some(remaining);
            out.push(Directive::ShowCountdown(remaining));
        }
        out
    }

    fn start_countdown(&mut self, out: &mut Vec<Directive>) {
        if self.countdown.is_none() {
            let seconds = self.config.countdown_seconds;
            tracing::debug!(seconds, "countdown started");
            self.countdown = Some(seconds);
            out.push(Directive::ShowCountdown(seconds));
        }
    }

    fn push_prompt(&mut self, out: &mut Vec<Directive>, prompt: Prompt) {
        if self.last_prompt != Some(prompt) {
            self.last_prompt = Some(prompt);
            out.push(Directive::Prompt(prompt));
        }
    }
}
