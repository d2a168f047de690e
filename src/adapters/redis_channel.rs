//! Redis-streams implementation of the notification channel.
//!
//! One stream per group key keeps messages for the same original
//! transaction in submission order; a shared dedup set keyed by the
//! derived transaction id suppresses retried publishes before they
//! reach the stream.

use async_trait::async_trait;
use redis::AsyncCommands;
use tracing::debug;

use crate::domain::NotificationMessage;
use crate::ports::{ChannelError, NotificationChannel};

const DEDUP_SET_SUFFIX: &str = "dedup";

#[derive(Clone)]
pub struct RedisNotificationChannel {
    client: redis::Client,
    stream_prefix: String,
}

impl RedisNotificationChannel {
    pub fn new(redis_url: &str, stream_prefix: String) -> anyhow::Result<Self> {
        let client = redis::Client::open(redis_url)?;
        Ok(Self {
            client,
            stream_prefix,
        })
    }

    fn stream_key(&self, group_key: &str) -> String {
        format!("{}:{}", self.stream_prefix, group_key)
    }

    fn dedup_key(&self) -> String {
        format!("{}:{}", self.stream_prefix, DEDUP_SET_SUFFIX)
    }
}

#[async_trait]
impl NotificationChannel for RedisNotificationChannel {
    async fn publish(&self, message: &NotificationMessage) -> Result<(), ChannelError> {
        let mut conn = self
            .client
            .get_multiplexed_async_connection()
            .await
            .map_err(backend)?;

        // SADD returns 0 when the member already exists; the retried
        // publish is then suppressed without touching the stream.
        let first_seen: i64 = conn
            .sadd(self.dedup_key(), &message.dedup_key)
            .await
            .map_err(backend)?;
        if first_seen == 0 {
            debug!(
                dedup_key = %message.dedup_key,
                "duplicate notification suppressed"
            );
            return Ok(());
        }

        let payload = serde_json::to_string(&message.event)
            .map_err(|err| ChannelError::Backend(err.to_string()))?;

        let _: String = conn
            .xadd(
                self.stream_key(&message.group_key),
                "*",
                &[
                    ("dedup_key", message.dedup_key.as_str()),
                    ("payload", payload.as_str()),
                ],
            )
            .await
            .map_err(backend)?;

        Ok(())
    }
}

fn backend(err: redis::RedisError) -> ChannelError {
    ChannelError::Backend(err.to_string())
}
