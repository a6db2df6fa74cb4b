//! Per-session artifacts.
//!
//! `SessionArtifacts` replaces a process-wide shared store with a single
//! explicitly owned struct threaded through the flow. Every field is
//! populated at one well-defined pipeline point and absence is an ordinary
//! state, not an error — readers that require a field check for it at
//! their own step.

use serde::{Deserialize, Serialize};

/// Structured record produced by the upstream document-OCR step.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OcrRecord {
    /// Reference identifier assigned by the OCR service.
    pub reference_id: String,
    /// Hosted URL of the face crop extracted from the document.
    pub face_image_url: Option<String>,
    /// Full name as read from the document, when available.
    pub full_name: Option<String>,
    /// Document number as read from the document, when available.
    pub document_number: Option<String>,
}

/// Everything one eKYC session accumulates, owned by the engine and
/// handed back when the session finishes.
#[derive(Debug)]
pub struct SessionArtifacts {
    pub session_id: uuid::Uuid,
    pub started_at: chrono::DateTime<chrono::Utc>,
    /// Reference identifier from the OCR step.
    pub reference_id: Option<String>,
    /// Hosted URL of the document face crop.
    pub reference_image_url: Option<String>,
    /// Downloaded document face crop bytes (pipeline step 3).
    pub reference_image: Option<Vec<u8>>,
    /// Captured selfie bytes (pipeline step 1).
    pub selfie: Option<Vec<u8>>,
    /// Parsed verification response; set only on a fully successful run.
    pub verification_result: Option<serde_json::Value>,
}

impl SessionArtifacts {
    pub fn new() -> Self {
        Self {
            session_id: uuid::Uuid::new_v4(),
            started_at: chrono::Utc::now(),
            reference_id: None,
            reference_image_url: None,
            reference_image: None,
            selfie: None,
            verification_result: None,
        }
    }

    /// Seed a fresh session from an upstream OCR record.
    pub fn from_ocr(ocr: &OcrRecord) -> Self {
        let mut session = Self::new();
        session.reference_id = Some(ocr.reference_id.clone());
        session.reference_image_url = ocr.face_image_url.clone();
        session
    }
}

impl Default for SessionArtifacts {
    fn default() -> Self {
        Self::new()
    }
}
