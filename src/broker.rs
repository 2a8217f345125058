//! AMQP connection and topology declaration
//!
//! Declares the topic exchange, the request queue (bound with the
//! wildcard request pattern), and the dead-letter path poison messages
//! are routed to. Declarations are idempotent on the broker side, so the
//! worker and the exercise service can each declare the shared pieces.

use crate::config::BrokerConfig;
use crate::error::Result;
use lapin::{
    options::{
        BasicConsumeOptions, BasicQosOptions, ExchangeDeclareOptions, QueueBindOptions,
        QueueDeclareOptions,
    },
    types::{AMQPValue, FieldTable},
    Channel, Connection, ConnectionProperties, Consumer, ExchangeKind,
};
use tracing::info;

/// Live broker connection with its single worker channel
pub struct Broker {
    // Held so the connection outlives the channel
    _connection: Connection,
    channel: Channel,
}

impl Broker {
    /// Connect to the broker and declare the full topology.
    pub async fn connect(config: &BrokerConfig) -> Result<Self> {
        let connection =
            Connection::connect(&config.url, ConnectionProperties::default()).await?;
        let channel = connection.create_channel().await?;
        info!(url = %config.url, "Connected to broker");

        declare_topology(&channel, config).await?;

        Ok(Self {
            _connection: connection,
            channel,
        })
    }

    pub fn channel(&self) -> &Channel {
        &self.channel
    }

    /// Start consuming requests, one unacknowledged delivery at a time.
    ///
    /// `prefetch = 1` plus manual acknowledgment gives the sequential,
    /// one-request-in-flight processing model.
    pub async fn consume_requests(&self, config: &BrokerConfig) -> Result<Consumer> {
        self.channel
            .basic_qos(1, BasicQosOptions::default())
            .await?;

        let consumer = self
            .channel
            .basic_consume(
                &config.request_queue,
                "vymova-sw",
                BasicConsumeOptions {
                    no_ack: false,
                    ..Default::default()
                },
                FieldTable::default(),
            )
            .await?;

        info!(queue = %config.request_queue, "Consuming pronunciation requests");
        Ok(consumer)
    }
}

async fn declare_topology(channel: &Channel, config: &BrokerConfig) -> Result<()> {
    channel
        .exchange_declare(
            &config.exchange,
            ExchangeKind::Topic,
            ExchangeDeclareOptions::default(),
            FieldTable::default(),
        )
        .await?;

    // Dead-letter path: poison requests are nacked without requeue and end
    // up on this queue for operator inspection instead of retrying forever.
    channel
        .exchange_declare(
            &config.dead_letter_exchange,
            ExchangeKind::Fanout,
            ExchangeDeclareOptions::default(),
            FieldTable::default(),
        )
        .await?;
    channel
        .queue_declare(
            &config.dead_letter_queue,
            QueueDeclareOptions::default(),
            FieldTable::default(),
        )
        .await?;
    channel
        .queue_bind(
            &config.dead_letter_queue,
            &config.dead_letter_exchange,
            "",
            QueueBindOptions::default(),
            FieldTable::default(),
        )
        .await?;

    let mut request_queue_args = FieldTable::default();
    request_queue_args.insert(
        "x-dead-letter-exchange".into(),
        AMQPValue::LongString(config.dead_letter_exchange.clone().into()),
    );
    channel
        .queue_declare(
            &config.request_queue,
            QueueDeclareOptions::default(),
            request_queue_args,
        )
        .await?;
    channel
        .queue_bind(
            &config.request_queue,
            &config.exchange,
            &config.request_binding,
            QueueBindOptions::default(),
            FieldTable::default(),
        )
        .await?;

    info!(
        exchange = %config.exchange,
        queue = %config.request_queue,
        binding = %config.request_binding,
        "Broker topology declared"
    );
    Ok(())
}
