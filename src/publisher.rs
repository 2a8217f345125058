//! Result publishing
//!
//! Formats scoring outcomes into the wire schema and emits them on the
//! topic exchange. Fire-and-forget: no delivery confirmation is awaited
//! and a failed publish is not retried here; the worker loop decides
//! what to do with the inbound delivery instead.

use crate::error::{Error, Result};
use crate::phonemes::PhonemeSequence;
use crate::types::{ExerciseId, PronunciationResult, ResultMessage, ResultStatus};
use async_trait::async_trait;
use lapin::{options::BasicPublishOptions, BasicProperties, Channel};
use tracing::debug;

/// Outbound side of the worker: emits one message per finished request.
///
/// The worker loop depends on this seam rather than on a broker channel,
/// so dispatch decisions can be tested with a fake sink.
#[async_trait]
pub trait ResultSink: Send + Sync {
    /// Emit a successful scoring result.
    async fn publish_result(&self, result: &PronunciationResult) -> Result<()>;

    /// Emit an explicit failure result for a request that reached a
    /// terminal state without a score.
    async fn publish_failure(
        &self,
        exercise_id: &ExerciseId,
        reference_ipa: Option<&PhonemeSequence>,
        reason: &str,
    ) -> Result<()>;
}

/// Publishes result messages under fixed routing keys
pub struct ResultPublisher {
    channel: Channel,
    exchange: String,
    done_routing_key: String,
    failed_routing_key: String,
}

impl ResultPublisher {
    pub fn new(
        channel: Channel,
        exchange: impl Into<String>,
        done_routing_key: impl Into<String>,
        failed_routing_key: impl Into<String>,
    ) -> Self {
        Self {
            channel,
            exchange: exchange.into(),
            done_routing_key: done_routing_key.into(),
            failed_routing_key: failed_routing_key.into(),
        }
    }

    async fn publish(&self, routing_key: &str, message: &ResultMessage) -> Result<()> {
        let payload = serde_json::to_vec(message)?;

        // fire-and-forget: the publisher confirm is never awaited
        let _confirm = self
            .channel
            .basic_publish(
                &self.exchange,
                routing_key,
                BasicPublishOptions::default(),
                &payload,
                BasicProperties::default().with_content_type("application/json".into()),
            )
            .await
            .map_err(|e| Error::Publish(e.to_string()))?;

        debug!(
            exercise_id = %message.exercise_id,
            routing_key = %routing_key,
            "Result published"
        );
        Ok(())
    }
}

#[async_trait]
impl ResultSink for ResultPublisher {
    async fn publish_result(&self, result: &PronunciationResult) -> Result<()> {
        let message = ResultMessage {
            exercise_id: result.exercise_id.clone(),
            status: ResultStatus::Done,
            reference_ipa: Some(result.reference_ipa.to_string()),
            recognized_ipa: Some(result.recognized_ipa.to_string()),
            accuracy_score: Some(result.accuracy_score),
            pronunciation_errors: result.errors.clone(),
            feedback: done_feedback(result),
        };
        self.publish(&self.done_routing_key, &message).await
    }

    /// A failure result lets the originator detect the failed attempt and
    /// retry, instead of the request vanishing silently.
    async fn publish_failure(
        &self,
        exercise_id: &ExerciseId,
        reference_ipa: Option<&PhonemeSequence>,
        reason: &str,
    ) -> Result<()> {
        let message = ResultMessage {
            exercise_id: exercise_id.clone(),
            status: ResultStatus::Failed,
            reference_ipa: reference_ipa.map(|seq| seq.to_string()),
            recognized_ipa: None,
            accuracy_score: None,
            pronunciation_errors: Vec::new(),
            feedback: format!("Scoring failed: {}", reason),
        };
        self.publish(&self.failed_routing_key, &message).await
    }
}

/// Human-readable summary shown to the learner
pub fn done_feedback(result: &PronunciationResult) -> String {
    format!(
        "Accuracy: {:.1}%. Heard: [{}]",
        result.accuracy_score, result.recognized_ipa
    )
}
