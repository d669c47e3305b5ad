//! # LogWriter — notification logger
//!
//! A minimal subscriber that logs every incoming [`Notification`] at `info`
//! level. Use it for test or demo.
//!
//! ## Example output
//! ```text
//! INFO topicvisor: notification topic=NEW_ITEM seq=0 payload=true
//! ```

use async_trait::async_trait;

use crate::error::SubscriberError;
use crate::events::Notification;
use crate::subscribers::Subscribe;

/// Notification logger subscriber.
#[derive(Default)]
pub struct LogWriter;

impl LogWriter {
    /// Construct a new [`LogWriter`].
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Subscribe for LogWriter {
    async fn accept(&self, n: &Notification) -> Result<(), SubscriberError> {
        tracing::info!(
            topic = %n.topic,
            seq = n.seq,
            payload = n.payload.is_some(),
            "notification"
        );
        Ok(())
    }

    fn name(&self) -> &'static str {
        "LogWriter"
    }
}
