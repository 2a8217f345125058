//! vymova-sw - Pronunciation Scoring Worker
//!
//! Scores a spoken utterance against the expected reference text by
//! comparing phoneme transcriptions. Consumes pronunciation requests from
//! the speech exchange, runs grapheme-to-phoneme transliteration and
//! acoustic phoneme recognition, aligns the two transcriptions, and
//! publishes an accuracy score with classified errors.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::signal;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use vymova_sw::broker::Broker;
use vymova_sw::config::{BrokerConfig, Config, RecognizerConfig};
use vymova_sw::g2p::UkrainianTransliterator;
use vymova_sw::publisher::ResultPublisher;
use vymova_sw::recognizer::CliRecognizer;
use vymova_sw::worker::{ScoringPipeline, WorkerLoop};

/// Command-line arguments for vymova-sw
#[derive(Parser, Debug)]
#[command(name = "vymova-sw")]
#[command(about = "Pronunciation scoring worker")]
#[command(version)]
struct Args {
    /// AMQP broker endpoint
    #[arg(long, default_value = "amqp://localhost:5672/%2f", env = "VYMOVA_AMQP_URL")]
    amqp_url: String,

    /// Phoneme recognizer binary (Allosaurus-compatible CLI)
    #[arg(long, default_value = "allosaurus", env = "VYMOVA_RECOGNIZER_BIN")]
    recognizer_bin: PathBuf,

    /// Language hint passed to the recognizer
    #[arg(long, default_value = "ukr", env = "VYMOVA_RECOGNIZER_LANG")]
    recognizer_lang: String,
}

impl Args {
    fn into_config(self) -> Config {
        Config {
            broker: BrokerConfig {
                url: self.amqp_url,
                ..Default::default()
            },
            recognizer: RecognizerConfig {
                binary: self.recognizer_bin,
                language: self.recognizer_lang,
            },
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "vymova_sw=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Args::parse().into_config();

    info!("Starting vymova-sw (Pronunciation Scoring Worker)");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));
    info!(
        "Recognizer: {} (lang hint: {})",
        config.recognizer.binary.display(),
        config.recognizer.language
    );

    // Acquisition collaborators are built once and shared for the process
    // lifetime; both are read-only after construction.
    let transliterator = Arc::new(UkrainianTransliterator::new());
    let recognizer = Arc::new(CliRecognizer::new(
        config.recognizer.binary.clone(),
        config.recognizer.language.clone(),
    ));
    info!("Acquisition models initialized");

    let broker = Broker::connect(&config.broker)
        .await
        .context("Failed to connect to broker")?;
    let consumer = broker
        .consume_requests(&config.broker)
        .await
        .context("Failed to start consuming requests")?;

    let publisher = Arc::new(ResultPublisher::new(
        broker.channel().clone(),
        config.broker.exchange.clone(),
        config.broker.result_routing_key.clone(),
        config.broker.failed_routing_key.clone(),
    ));
    let worker = WorkerLoop::new(ScoringPipeline::new(transliterator, recognizer), publisher);

    tokio::select! {
        result = worker.run(consumer) => {
            result.context("Worker loop error")?;
        }
        _ = shutdown_signal() => {
            info!("Shutdown signal received");
        }
    }

    info!("Worker shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        },
        _ = terminate => {
            info!("Received terminate signal, shutting down");
        },
    }
}
