//! # EmailListener — email-style channel
//!
//! Renders one message per accepted notification and keeps it in an
//! in-memory outbox. Nothing is actually sent.
//!
//! ## Example output
//! ```text
//! email1.com, you've got a new Email Message for NEW_ITEM
//! ```

use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;

use crate::error::SubscriberError;
use crate::events::Notification;
use crate::subscribers::Subscribe;

/// Email-style subscriber bound to one address.
pub struct EmailListener {
    address: String,
    outbox: Mutex<Vec<String>>,
}

impl EmailListener {
    /// Creates a listener for `address`.
    #[must_use]
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            outbox: Mutex::new(Vec::new()),
        }
    }

    /// Address this listener writes to.
    pub fn address(&self) -> &str {
        &self.address
    }

    /// Messages rendered so far, oldest first.
    #[must_use]
    pub fn outbox(&self) -> Vec<String> {
        self.outbox
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl Subscribe for EmailListener {
    async fn accept(&self, n: &Notification) -> Result<(), SubscriberError> {
        if self.address.trim().is_empty() {
            return Err(SubscriberError::rejected("email address is empty"));
        }
        let message = format!(
            "{}, you've got a new Email Message for {}",
            self.address, n.topic
        );
        tracing::info!(channel = "email", to = %self.address, topic = %n.topic, seq = n.seq, "{message}");
        self.outbox
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(message);
        Ok(())
    }

    fn name(&self) -> &'static str {
        "EmailListener"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::Topic;

    #[tokio::test]
    async fn renders_message_into_outbox() {
        let l = EmailListener::new("email1.com");
        l.accept(&Notification::new(Topic::new("NEW_ITEM"), 0))
            .await
            .unwrap();
        assert_eq!(
            l.outbox(),
            vec!["email1.com, you've got a new Email Message for NEW_ITEM".to_string()]
        );
    }

    #[tokio::test]
    async fn empty_address_is_rejected() {
        let l = EmailListener::new("  ");
        let err = l
            .accept(&Notification::new(Topic::new("SALE"), 0))
            .await
            .unwrap_err();
        assert_eq!(err.as_label(), "subscriber_rejected");
        assert!(l.outbox().is_empty());
    }
}
