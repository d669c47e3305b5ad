//! Error types used by the dispatcher and by subscribers.
//!
//! This module defines two main error enums:
//!
//! - [`DispatchError`] — structural errors returned directly to the caller of a
//!   registry or dispatcher operation.
//! - [`SubscriberError`] — errors raised by a subscriber while accepting a
//!   notification. These never escape `publish`; they are collected into the
//!   round's [`Delivery`](crate::Delivery).
//!
//! Both types provide helper methods (`as_label`, `as_message`) for logging/metrics.

use thiserror::Error;

use crate::events::Topic;

/// # Errors produced by the registry or dispatcher.
///
/// Reported synchronously and locally. Not retried: the caller has to declare
/// the topic first.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DispatchError {
    /// The topic was never declared on this registry.
    #[error("unknown topic: {topic}")]
    UnknownTopic {
        /// The topic that was looked up.
        topic: Topic,
    },
}

impl DispatchError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use topicvisor::{DispatchError, Topic};
    ///
    /// let err = DispatchError::UnknownTopic { topic: Topic::new("SALE") };
    /// assert_eq!(err.as_label(), "dispatch_unknown_topic");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            DispatchError::UnknownTopic { .. } => "dispatch_unknown_topic",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            DispatchError::UnknownTopic { topic } => {
                format!("topic {topic:?} was never declared")
            }
        }
    }
}

/// # Errors produced by a subscriber during delivery.
///
/// Contained by the dispatcher: one failing subscriber never stops delivery to
/// the others in the same round.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SubscriberError {
    /// The subscriber refused this notification (bad payload, policy, ...).
    #[error("notification rejected: {reason}")]
    Rejected {
        /// Why the notification was refused.
        reason: String,
    },

    /// The subscriber's downstream channel could not be reached.
    #[error("channel unavailable: {reason}")]
    Unavailable {
        /// Description of the channel failure.
        reason: String,
    },

    /// The subscriber panicked inside `accept`; the panic was caught.
    #[error("subscriber panicked: {info}")]
    Panicked {
        /// Panic payload rendered as text.
        info: String,
    },
}

impl SubscriberError {
    /// Shorthand for [`SubscriberError::Rejected`].
    pub fn rejected(reason: impl Into<String>) -> Self {
        SubscriberError::Rejected {
            reason: reason.into(),
        }
    }

    /// Shorthand for [`SubscriberError::Unavailable`].
    pub fn unavailable(reason: impl Into<String>) -> Self {
        SubscriberError::Unavailable {
            reason: reason.into(),
        }
    }

    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use topicvisor::SubscriberError;
    ///
    /// let err = SubscriberError::rejected("empty payload");
    /// assert_eq!(err.as_label(), "subscriber_rejected");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            SubscriberError::Rejected { .. } => "subscriber_rejected",
            SubscriberError::Unavailable { .. } => "subscriber_unavailable",
            SubscriberError::Panicked { .. } => "subscriber_panicked",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            SubscriberError::Rejected { reason } => format!("rejected: {reason}"),
            SubscriberError::Unavailable { reason } => format!("unavailable: {reason}"),
            SubscriberError::Panicked { info } => format!("panicked: {info}"),
        }
    }

    /// Indicates whether the failure came from a caught panic.
    pub fn is_panic(&self) -> bool {
        matches!(self, SubscriberError::Panicked { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_unknown_topic() {
        let err = DispatchError::UnknownTopic {
            topic: Topic::new("NEW_ITEM"),
        };
        assert_eq!(err.to_string(), "unknown topic: NEW_ITEM");
        assert_eq!(err.as_message(), "topic \"NEW_ITEM\" was never declared");
    }

    #[test]
    fn subscriber_labels_are_stable() {
        assert_eq!(
            SubscriberError::unavailable("smtp down").as_label(),
            "subscriber_unavailable"
        );
        assert_eq!(
            SubscriberError::Panicked { info: "boom".into() }.as_label(),
            "subscriber_panicked"
        );
    }

    #[test]
    fn display_subscriber_errors() {
        assert_eq!(
            SubscriberError::rejected("no payload").to_string(),
            "notification rejected: no payload"
        );
        assert_eq!(
            SubscriberError::unavailable("smtp down").as_message(),
            "unavailable: smtp down"
        );
    }

    #[test]
    fn only_panics_report_is_panic() {
        assert!(SubscriberError::Panicked { info: "x".into() }.is_panic());
        assert!(!SubscriberError::rejected("x").is_panic());
    }
}
