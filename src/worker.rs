//! Sequential scoring worker loop
//!
//! One request is in flight at a time: receive a delivery, acquire the two
//! phoneme sequences (text path and audio path), score them, publish the
//! result, acknowledge, and return to receiving. The delivery is
//! acknowledged only after a result (success or explicit failure) has been
//! published, so a crash mid-request leaves the message unacknowledged and
//! the broker redelivers it. A redelivered message that fails again is
//! treated as poison and routed to the dead-letter path instead of
//! retrying forever.

use crate::alignment;
use crate::error::{Error, Result};
use crate::g2p::Transliterator;
use crate::phonemes::PhonemeSequence;
use crate::publisher::ResultSink;
use crate::recognizer::PhonemeRecognizer;
use crate::types::{PronunciationRequest, PronunciationResult};
use futures::StreamExt;
use lapin::options::{BasicAckOptions, BasicNackOptions};
use lapin::Consumer;
use std::sync::Arc;
use tracing::{error, info, warn};

/// What to do with the inbound delivery once handling finished
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    /// Terminal state reached (result or failure result published)
    Ack,
    /// Transient failure on a first attempt: let the broker redeliver
    Requeue,
    /// Malformed or repeatedly failing message: dead-letter it
    DeadLetter,
}

/// Acquisition and scoring stages, broker-free for testability
pub struct ScoringPipeline {
    transliterator: Arc<dyn Transliterator>,
    recognizer: Arc<dyn PhonemeRecognizer>,
}

impl ScoringPipeline {
    pub fn new(
        transliterator: Arc<dyn Transliterator>,
        recognizer: Arc<dyn PhonemeRecognizer>,
    ) -> Self {
        Self {
            transliterator,
            recognizer,
        }
    }

    /// Ideal transcription of the reference text (deterministic, offline)
    pub fn reference_phonemes(&self, request: &PronunciationRequest) -> PhonemeSequence {
        self.transliterator.to_phonemes(&request.reference_text)
    }

    /// Run one request through acquisition and scoring.
    pub async fn process(&self, request: &PronunciationRequest) -> Result<PronunciationResult> {
        let reference_ipa = self.reference_phonemes(request);
        let recognized_ipa = self.recognizer.recognize(&request.audio_url).await?;

        let scored = alignment::score(&reference_ipa, &recognized_ipa);

        Ok(PronunciationResult {
            exercise_id: request.exercise_id.clone(),
            reference_ipa,
            recognized_ipa,
            accuracy_score: scored.accuracy,
            errors: scored.errors,
        })
    }
}

/// Message-driven worker: drives one delivery at a time through the pipeline
pub struct WorkerLoop {
    pipeline: ScoringPipeline,
    publisher: Arc<dyn ResultSink>,
}

impl WorkerLoop {
    pub fn new(pipeline: ScoringPipeline, publisher: Arc<dyn ResultSink>) -> Self {
        Self {
            pipeline,
            publisher,
        }
    }

    /// Consume deliveries until the stream ends or the broker errors out.
    ///
    /// Per-request failures never abort the loop; only channel-level errors
    /// propagate to the caller.
    pub async fn run(&self, mut consumer: Consumer) -> Result<()> {
        info!("Worker loop started");

        while let Some(delivery) = consumer.next().await {
            let delivery = delivery?;

            let disposition = self
                .handle_message(&delivery.data, delivery.redelivered)
                .await;

            match disposition {
                Disposition::Ack => delivery.ack(BasicAckOptions::default()).await?,
                Disposition::Requeue => {
                    delivery
                        .nack(BasicNackOptions {
                            requeue: true,
                            ..Default::default()
                        })
                        .await?
                }
                Disposition::DeadLetter => {
                    delivery
                        .nack(BasicNackOptions {
                            requeue: false,
                            ..Default::default()
                        })
                        .await?
                }
            }
        }

        info!("Consumer stream ended, worker loop stopping");
        Ok(())
    }

    /// Handle one message body through to a disposition.
    pub async fn handle_message(&self, body: &[u8], redelivered: bool) -> Disposition {
        let request = match PronunciationRequest::from_bytes(body) {
            Ok(request) => request,
            Err(e) => {
                // a retry cannot fix a malformed payload
                warn!(error = %e, "Dead-lettering malformed request");
                return Disposition::DeadLetter;
            }
        };

        info!(
            exercise_id = %request.exercise_id,
            reference_text = %request.reference_text,
            audio = %request.audio_url,
            "Processing pronunciation request"
        );

        match self.pipeline.process(&request).await {
            Ok(result) => match self.publisher.publish_result(&result).await {
                Ok(()) => {
                    info!(
                        exercise_id = %result.exercise_id,
                        accuracy = result.accuracy_score,
                        errors = result.errors.len(),
                        "Result published"
                    );
                    Disposition::Ack
                }
                Err(e) => {
                    error!(exercise_id = %result.exercise_id, error = %e, "Result publish failed");
                    retry_disposition(redelivered)
                }
            },

            Err(Error::Recognition(reason)) => {
                warn!(
                    exercise_id = %request.exercise_id,
                    error = %reason,
                    "Recognition failed, publishing failure result"
                );
                let reference_ipa = self.pipeline.reference_phonemes(&request);
                match self
                    .publisher
                    .publish_failure(&request.exercise_id, Some(&reference_ipa), &reason)
                    .await
                {
                    Ok(()) => Disposition::Ack,
                    Err(e) => {
                        error!(exercise_id = %request.exercise_id, error = %e, "Failure publish failed");
                        retry_disposition(redelivered)
                    }
                }
            }

            Err(e) => {
                error!(exercise_id = %request.exercise_id, error = %e, "Request processing failed");
                retry_disposition(redelivered)
            }
        }
    }
}

/// First failure gets one broker-driven retry; a redelivered message that
/// fails again is poison and goes to the dead-letter path.
fn retry_disposition(redelivered: bool) -> Disposition {
    if redelivered {
        Disposition::DeadLetter
    } else {
        Disposition::Requeue
    }
}
