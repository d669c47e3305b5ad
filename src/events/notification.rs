//! # Notification handed to subscribers during one publish round.
//!
//! A [`Notification`] is built once per `publish` call and shared by reference
//! with every subscriber in the topic snapshot.
//!
//! ## Ordering guarantees
//! Each dispatcher stamps its rounds with a sequence number (`seq`) that
//! increases monotonically. Use `seq` to restore publish order when
//! notifications from concurrent rounds are observed out of order.
//!
//! ## Example
//! ```rust
//! use topicvisor::{Notification, Payload, Topic};
//!
//! let n = Notification::new(Topic::new("SALE"), 7).with_payload(Payload::new("50% off"));
//!
//! assert_eq!(n.topic.as_str(), "SALE");
//! assert_eq!(n.seq, 7);
//! assert_eq!(n.payload_as::<&str>(), Some(&"50% off"));
//! ```

use std::any::Any;
use std::time::SystemTime;

use super::{Payload, Topic};

/// One delivery round's notification.
///
/// - `topic`: the topic the round was published on
/// - `payload`: optional opaque value, identical for every subscriber
/// - `seq`: per-dispatcher monotonic round number
/// - `at`: wall-clock timestamp (for logs)
#[derive(Clone, Debug)]
pub struct Notification {
    /// Topic this notification was published on.
    pub topic: Topic,
    /// Optional value attached by the publisher.
    pub payload: Option<Payload>,
    /// Monotonically increasing round number.
    pub seq: u64,
    /// Wall-clock timestamp.
    pub at: SystemTime,
}

impl Notification {
    /// Creates a notification without payload, stamped with the current time.
    pub fn new(topic: Topic, seq: u64) -> Self {
        Self {
            topic,
            payload: None,
            seq,
            at: SystemTime::now(),
        }
    }

    /// Attaches a payload.
    #[inline]
    pub fn with_payload(mut self, payload: Payload) -> Self {
        self.payload = Some(payload);
        self
    }

    /// Attaches an optional payload.
    #[inline]
    pub(crate) fn with_payload_opt(mut self, payload: Option<Payload>) -> Self {
        self.payload = payload;
        self
    }

    /// Returns the payload downcast to `T`, if present and of that type.
    #[inline]
    pub fn payload_as<T: Any>(&self) -> Option<&T> {
        self.payload.as_ref().and_then(Payload::downcast_ref::<T>)
    }
}
