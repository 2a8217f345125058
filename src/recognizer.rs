//! Acoustic phoneme recognition
//!
//! Maps an audio clip to the phoneme sequence that was actually spoken.
//! The shipped implementation shells out to a universal phoneme recognizer
//! CLI (Allosaurus-compatible), which prints a space-separated IPA
//! transcription on stdout. The language hint only biases symbol
//! likelihoods; output is free-form IPA, not constrained to a dictionary.

use crate::error::{Error, Result};
use crate::phonemes::PhonemeSequence;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::process::Command;
use tracing::debug;

/// Maps an audio reference to the recognized phoneme sequence.
///
/// Implementations are process-wide, read-only after construction, and safe
/// for repeated sequential invocation. Recognition is synchronous from the
/// worker's point of view: the call runs for the full duration of model
/// inference with no timeout.
#[async_trait]
pub trait PhonemeRecognizer: Send + Sync {
    /// Recognize the phonemes spoken in the referenced audio clip.
    ///
    /// # Errors
    /// Returns `Error::Recognition` when the audio is unreadable or
    /// unsupported, or when the underlying model fails.
    async fn recognize(&self, audio_ref: &str) -> Result<PhonemeSequence>;
}

/// Recognizer backed by an external CLI tool.
///
/// Invoked as `<binary> --lang <hint> -i <audio_path>`; the transcription is
/// read from stdout. An empty transcription is valid (silent audio), while
/// a missing binary, a nonzero exit, or an unreadable audio file all map to
/// a recognition error.
pub struct CliRecognizer {
    binary: PathBuf,
    language_hint: String,
}

impl CliRecognizer {
    pub fn new(binary: impl Into<PathBuf>, language_hint: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
            language_hint: language_hint.into(),
        }
    }
}

#[async_trait]
impl PhonemeRecognizer for CliRecognizer {
    async fn recognize(&self, audio_ref: &str) -> Result<PhonemeSequence> {
        if !Path::new(audio_ref).is_file() {
            return Err(Error::Recognition(format!(
                "audio file not found: {}",
                audio_ref
            )));
        }

        debug!(binary = %self.binary.display(), audio = %audio_ref, "Running phoneme recognizer");

        let output = Command::new(&self.binary)
            .arg("--lang")
            .arg(&self.language_hint)
            .arg("-i")
            .arg(audio_ref)
            .output()
            .await
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    Error::Recognition(format!(
                        "recognizer binary not found: {}",
                        self.binary.display()
                    ))
                } else {
                    Error::Recognition(format!("failed to run recognizer: {}", e))
                }
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(Error::Recognition(format!(
                "recognizer exited with {}: {}",
                output.status,
                stderr.trim()
            )));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let sequence = PhonemeSequence::parse(&stdout);
        debug!(phonemes = %sequence, "Recognition complete");

        Ok(sequence)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_audio_file_is_recognition_error() {
        let recognizer = CliRecognizer::new("allosaurus", "ukr");
        let err = recognizer
            .recognize("/nonexistent/clip.wav")
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Recognition(_)));
    }

    #[tokio::test]
    async fn test_missing_binary_is_recognition_error() {
        let audio = tempfile::NamedTempFile::new().unwrap();
        let recognizer = CliRecognizer::new("/nonexistent/recognizer-bin", "ukr");
        let err = recognizer
            .recognize(audio.path().to_str().unwrap())
            .await
            .unwrap_err();
        match err {
            Error::Recognition(msg) => assert!(msg.contains("not found"), "got: {}", msg),
            other => panic!("expected recognition error, got {:?}", other),
        }
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_stdout_is_tokenized() {
        use std::os::unix::fs::PermissionsExt;

        // shell script standing in for the recognizer binary
        let dir = tempfile::tempdir().unwrap();
        let script = dir.path().join("fake-recognizer");
        std::fs::write(&script, "#!/bin/sh\necho 'l ɪ b a'\n").unwrap();
        std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();

        let audio = dir.path().join("clip.wav");
        std::fs::write(&audio, b"RIFF").unwrap();

        let recognizer = CliRecognizer::new(&script, "ukr");
        let sequence = recognizer
            .recognize(audio.to_str().unwrap())
            .await
            .unwrap();
        assert_eq!(sequence.tokens(), &["l", "ɪ", "b", "a"]);
    }
}
