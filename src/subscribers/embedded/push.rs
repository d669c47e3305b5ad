//! # PushListener — push-notification-style channel
//!
//! ## Example output
//! ```text
//! ana21, you've got a new Notification for SALE
//! ```

use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;

use crate::error::SubscriberError;
use crate::events::Notification;
use crate::subscribers::Subscribe;

/// Push-style subscriber bound to one app user.
pub struct PushListener {
    username: String,
    inbox: Mutex<Vec<String>>,
}

impl PushListener {
    #[must_use]
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            inbox: Mutex::new(Vec::new()),
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    /// Notifications shown so far, oldest first.
    #[must_use]
    pub fn inbox(&self) -> Vec<String> {
        self.inbox
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl Subscribe for PushListener {
    async fn accept(&self, n: &Notification) -> Result<(), SubscriberError> {
        if self.username.trim().is_empty() {
            return Err(SubscriberError::unavailable("no device registered for user"));
        }
        let message = format!("{}, you've got a new Notification for {}", self.username, n.topic);
        tracing::info!(channel = "push", user = %self.username, topic = %n.topic, seq = n.seq, "{message}");
        self.inbox
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(message);
        Ok(())
    }

    fn name(&self) -> &'static str {
        "PushListener"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::Topic;

    #[tokio::test]
    async fn renders_notification() {
        let l = PushListener::new("ana21");
        l.accept(&Notification::new(Topic::new("SALE"), 3))
            .await
            .unwrap();
        assert_eq!(l.inbox(), vec!["ana21, you've got a new Notification for SALE"]);
    }
}
