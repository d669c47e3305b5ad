//! Notification data model: topics, payloads and the per-round record.
//!
//! ## Contents
//! - [`Topic`] immutable channel name subscribers register against
//! - [`Payload`] optional opaque value attached at publish time
//! - [`Notification`] what each subscriber receives in one publish round
//!
//! ## Quick reference
//! - **Producers**: `Dispatcher::publish` builds exactly one [`Notification`] per round.
//! - **Consumers**: every [`Subscribe`](crate::Subscribe) in the topic snapshot
//!   receives a reference to that same notification.

mod notification;
mod payload;
mod topic;

pub use notification::Notification;
pub use payload::Payload;
pub use topic::Topic;
