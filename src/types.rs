//! Request, result, and wire message types for the scoring worker
//!
//! Field names on the wire types match the JSON contract shared with the
//! exercise service (`ExerciseId`, `AudioUrl`, `ReferenceText` inbound;
//! `RecognizedIPA`, `AccuracyScore`, `PronunciationErrors`, `Feedback`
//! outbound).

use crate::error::{Error, Result};
use crate::phonemes::PhonemeSequence;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Placeholder for "no phoneme" in error reports (omitted or inserted side)
pub const ABSENT: &str = "-";

/// Opaque exercise identifier.
///
/// Producers disagree on the concrete type (integer vs string GUID), so the
/// worker never interprets it and echoes it back unchanged in the result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExerciseId(pub Value);

impl std::fmt::Display for ExerciseId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Inbound scoring request, immutable once received
#[derive(Debug, Clone, Deserialize)]
pub struct PronunciationRequest {
    /// Opaque identifier, echoed back unchanged
    #[serde(rename = "ExerciseId")]
    pub exercise_id: ExerciseId,
    /// Locator of the audio clip to score (path or URL)
    #[serde(rename = "AudioUrl")]
    pub audio_url: String,
    /// Text the speaker was supposed to say, in target-language orthography
    #[serde(rename = "ReferenceText")]
    pub reference_text: String,
}

impl PronunciationRequest {
    /// Parse and validate an inbound message body.
    ///
    /// Fails fast on malformed JSON or empty required fields rather than
    /// propagating empty values into the acquisition calls.
    pub fn from_bytes(body: &[u8]) -> Result<Self> {
        let request: PronunciationRequest = serde_json::from_slice(body)
            .map_err(|e| Error::MalformedRequest(e.to_string()))?;

        if request.audio_url.trim().is_empty() {
            return Err(Error::MalformedRequest("AudioUrl is empty".to_string()));
        }
        if request.reference_text.trim().is_empty() {
            return Err(Error::MalformedRequest(
                "ReferenceText is empty".to_string(),
            ));
        }

        Ok(request)
    }
}

/// Classification of a single pronunciation error
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorKind {
    /// Expected phoneme replaced by a different one
    Mispronunciation,
    /// Expected phoneme missing from the utterance
    Omission,
    /// Extra phoneme present in the utterance
    Insertion,
}

/// One pronunciation error, suitable for UI highlighting
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PronunciationError {
    /// Expected phoneme symbol, or "-" when a phoneme was inserted
    #[serde(rename = "Expected")]
    pub expected: String,
    /// Heard phoneme symbol, or "-" when a phoneme was omitted
    #[serde(rename = "Actual")]
    pub actual: String,
    /// Error classification
    #[serde(rename = "Type")]
    pub kind: ErrorKind,
}

/// Scoring outcome for one request, created once and published once
#[derive(Debug, Clone)]
pub struct PronunciationResult {
    pub exercise_id: ExerciseId,
    /// Ideal transcription derived from the reference text
    pub reference_ipa: PhonemeSequence,
    /// Transcription recognized from the audio clip
    pub recognized_ipa: PhonemeSequence,
    /// Accuracy percentage in [0, 100]
    pub accuracy_score: f64,
    /// Classified errors in edit-script order; empty iff the edit distance is 0
    pub errors: Vec<PronunciationError>,
}

/// Outcome tag on the outbound result message.
///
/// A failed recognition produces an explicit `Failed` result instead of
/// silently dropping the request, so the originator can detect and retry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResultStatus {
    Done,
    Failed,
}

/// Outbound result message (wire schema)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResultMessage {
    #[serde(rename = "ExerciseId")]
    pub exercise_id: ExerciseId,
    #[serde(rename = "Status")]
    pub status: ResultStatus,
    /// Space-separated reference IPA; absent on failures before acquisition
    #[serde(rename = "ReferenceIPA", default, skip_serializing_if = "Option::is_none")]
    pub reference_ipa: Option<String>,
    /// Space-separated recognized IPA; absent on failed recognition
    #[serde(rename = "RecognizedIPA", default, skip_serializing_if = "Option::is_none")]
    pub recognized_ipa: Option<String>,
    /// Omitted (not zeroed) on failures so consumers cannot mistake a
    /// failure for a scored zero
    #[serde(rename = "AccuracyScore", default, skip_serializing_if = "Option::is_none")]
    pub accuracy_score: Option<f64>,
    #[serde(rename = "PronunciationErrors", default)]
    pub pronunciation_errors: Vec<PronunciationError>,
    /// Human-readable summary for display
    #[serde(rename = "Feedback")]
    pub feedback: String,
}

// ============================================================================
// Tests
// ============================================================================
