use liveid_core::detector;
use liveid_core::DetectorConfig;

/// Flow configuration, loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Verification API endpoint (multipart POST).
    pub verify_endpoint: String,
    /// Static API key sent in the `api-key` header.
    pub api_key: String,
    /// Average EAR below which the eyes count as closed.
    pub blink_ear_threshold: f32,
    /// Baseline EAR of a fully open eye (tunable, not read by detection).
    pub open_eye_ear_baseline: f32,
    /// Absolute yaw a head turn must strictly exceed.
    pub yaw_threshold: f32,
    /// Whole seconds counted down before the selfie capture.
    pub countdown_seconds: u8,
    /// Pacing delay between the reference-image download and the
    /// verification call. Not a correctness requirement; set to 0 to
    /// remove it.
    pub pre_verify_delay_secs: u64,
    /// Frame channel depth. Depth 1 drops overlapping frames so state
    /// transitions stay strictly sequential.
    pub frame_queue_depth: usize,
}

impl Config {
    /// Load configuration from `LIVEID_*` environment variables with defaults.
    pub fn from_env() -> Self {
        Self {
            verify_endpoint: std::env::var("LIVEID_VERIFY_ENDPOINT")
                .unwrap_or_else(|_| "https://api.innovitegrasuite.online/neuro/verify".to_string()),
            api_key: std::env::var("LIVEID_API_KEY").unwrap_or_else(|_| "testapikey".to_string()),
            blink_ear_threshold: env_f32(
                "LIVEID_BLINK_EAR_THRESHOLD",
                detector::DEFAULT_BLINK_EAR_THRESHOLD,
            ),
            open_eye_ear_baseline: env_f32(
                "LIVEID_OPEN_EYE_EAR_BASELINE",
                detector::DEFAULT_OPEN_EYE_EAR_BASELINE,
            ),
            yaw_threshold: env_f32("LIVEID_YAW_THRESHOLD", detector::DEFAULT_YAW_THRESHOLD),
            countdown_seconds: env_u8(
                "LIVEID_COUNTDOWN_SECONDS",
                detector::DEFAULT_COUNTDOWN_SECONDS,
            ),
            pre_verify_delay_secs: env_u64("LIVEID_PRE_VERIFY_DELAY_SECS", 3),
            frame_queue_depth: env_usize("LIVEID_FRAME_QUEUE_DEPTH", 1),
        }
    }

    /// Detector thresholds for the state machine.
    pub fn detector(&self) -> DetectorConfig {
        DetectorConfig {
            blink_ear_threshold: self.blink_ear_threshold,
            open_eye_ear_baseline: self.open_eye_ear_baseline,
            yaw_threshold: self.yaw_threshold,
            countdown_seconds: self.countdown_seconds,
        }
    }
}

fn env_f32(key: &str, default: f32) -> f32 {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn env_u8(key: &str, default: u8) -> u8 {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn env_u64(key: &str, default: u64) -> u64 {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn env_usize(key: &str, default: usize) -> usize {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
