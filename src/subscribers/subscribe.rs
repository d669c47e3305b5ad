//! # Core subscriber trait
//!
//! `Subscribe` is the single capability the dispatcher needs from an observer:
//! accept a notification for a topic. The dispatcher and the registry are
//! polymorphic over it and never look at the concrete type, so new channels
//! are added by implementing the trait alone.
//!
//! ## Contract
//! - `accept` is awaited in place, sequentially, inside the publisher's
//!   round. A slow subscriber delays only the current round.
//! - Errors are returned, not thrown: the dispatcher records them in the
//!   round's failure list and moves on to the next subscriber.
//! - Panics are caught by the dispatcher (unless disabled via
//!   [`Config::catch_panics`](crate::Config)) and recorded as
//!   [`SubscriberError::Panicked`].
//! - No registry lock is held while `accept` runs, so an implementation may
//!   call `subscribe`, `unsubscribe` or `publish` on the same dispatcher.
//!   Such changes apply from the next round on.
//!
//! ## Example (skeleton)
//! ```rust
//! use topicvisor::{Notification, Subscribe, SubscriberError};
//!
//! struct Audit;
//!
//! #[async_trait::async_trait]
//! impl Subscribe for Audit {
//!     async fn accept(&self, n: &Notification) -> Result<(), SubscriberError> {
//!         let _ = n.topic.as_str(); // write audit record...
//!         Ok(())
//!     }
//!     fn name(&self) -> &'static str { "audit" }
//! }
//! ```

use async_trait::async_trait;

use crate::error::SubscriberError;
use crate::events::Notification;

/// Contract for notification subscribers.
///
/// ### Implementation requirements
/// - Keep `accept` bounded; there is no delivery timeout.
/// - Map channel failures into [`SubscriberError`]; do not panic.
/// - Cancellation is cooperative: check your own token inside `accept`.
#[async_trait]
pub trait Subscribe: Send + Sync + 'static {
    /// Accepts one notification.
    ///
    /// # Parameters
    /// - `notification`: topic, optional payload and round metadata
    ///   (shared with the other subscribers of the round)
    async fn accept(&self, notification: &Notification) -> Result<(), SubscriberError>;

    /// Human-readable name (for logs/metrics).
    ///
    /// The default uses `type_name::<Self>()`, which can be verbose - override it when possible.
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}
