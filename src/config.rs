//! Configuration for the scoring worker
//!
//! Everything is resolvable from the command line with environment-variable
//! fallbacks (clap `env` attributes in `main.rs`); the defaults here match
//! the broker topology the exercise service declares on its side.

use std::path::PathBuf;

/// Broker endpoint and topology names
#[derive(Debug, Clone)]
pub struct BrokerConfig {
    /// AMQP endpoint, e.g. `amqp://localhost:5672/%2f`
    pub url: String,
    /// Topic exchange shared with the exercise service
    pub exchange: String,
    /// Queue this worker consumes requests from
    pub request_queue: String,
    /// Wildcard binding pattern for the request class
    pub request_binding: String,
    /// Routing key for successful results
    pub result_routing_key: String,
    /// Routing key for failure results
    pub failed_routing_key: String,
    /// Dead-letter exchange for poison messages
    pub dead_letter_exchange: String,
    /// Queue bound to the dead-letter exchange
    pub dead_letter_queue: String,
}

impl Default for BrokerConfig {
    fn default() -> Self {
        Self {
            url: "amqp://localhost:5672/%2f".to_string(),
            exchange: "speech_exchange".to_string(),
            request_queue: "exercise.audio".to_string(),
            request_binding: "exercise.audio.*".to_string(),
            result_routing_key: "speech.result.done".to_string(),
            failed_routing_key: "speech.result.failed".to_string(),
            dead_letter_exchange: "speech_dlx".to_string(),
            dead_letter_queue: "exercise.audio.dead".to_string(),
        }
    }
}

/// Acoustic recognizer tool settings
#[derive(Debug, Clone)]
pub struct RecognizerConfig {
    /// Recognizer CLI binary (Allosaurus-compatible)
    pub binary: PathBuf,
    /// Language hint passed to the recognizer; biases symbol likelihoods
    /// without constraining the output vocabulary
    pub language: String,
}

impl Default for RecognizerConfig {
    fn default() -> Self {
        Self {
            binary: PathBuf::from("allosaurus"),
            language: "ukr".to_string(),
        }
    }
}

/// Full worker configuration
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub broker: BrokerConfig,
    pub recognizer: RecognizerConfig,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_exercise_service_topology() {
        let config = Config::default();
        assert_eq!(config.broker.exchange, "speech_exchange");
        assert_eq!(config.broker.request_queue, "exercise.audio");
        assert_eq!(config.broker.request_binding, "exercise.audio.*");
        assert_eq!(config.broker.result_routing_key, "speech.result.done");
    }
}
