//! # Subscribers: the capability an observer implements.
//!
//! This module provides the [`Subscribe`] trait, the [`SubscriberId`] identity
//! registrations are keyed on, and (feature `channels`) reference channels.
//!
//! ## Architecture
//! ```text
//! Dispatcher::publish(topic, payload)
//!     │
//!     └──► snapshot(topic) ──► [ (id1, sub1), (id2, sub2), ... ]   (insertion order)
//!                                   │             │
//!                                   ▼             ▼
//!                            sub1.accept(&n)  sub2.accept(&n)  ...
//!                                   │             │
//!                                 Ok/Err        Ok/Err  ──► Delivery { delivered, failed }
//! ```
//!
//! ## Implementing custom subscribers
//! ```no_run
//! use topicvisor::{Notification, Subscribe, SubscriberError};
//! use async_trait::async_trait;
//!
//! struct Sms { number: String }
//!
//! #[async_trait]
//! impl Subscribe for Sms {
//!     async fn accept(&self, n: &Notification) -> Result<(), SubscriberError> {
//!         if self.number.is_empty() {
//!             return Err(SubscriberError::rejected("no phone number"));
//!         }
//!         // send the text message for n.topic ...
//!         Ok(())
//!     }
//!
//!     fn name(&self) -> &'static str { "sms" }
//! }
//! ```

mod id;
mod subscribe;

#[cfg(feature = "channels")]
mod embedded;

pub use id::SubscriberId;
pub use subscribe::Subscribe;

#[cfg(feature = "channels")]
pub use embedded::{EmailListener, LogWriter, PushListener};
