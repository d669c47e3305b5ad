//! # topicvisor
//!
//! **Topicvisor** is a small, topic-keyed notification dispatcher for Rust.
//!
//! Subscribers register under named topics; a publish call delivers one
//! notification to every subscriber of that topic, in subscription order,
//! over a point-in-time snapshot of the subscriber list. One subscriber's
//! failure never keeps the others from being notified.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!     ┌──────────────┐   ┌──────────────┐   ┌──────────────┐
//!     │ EmailListener│   │ PushListener │   │  your type   │
//!     │ (Subscribe)  │   │ (Subscribe)  │   │ (Subscribe)  │
//!     └──────┬───────┘   └──────┬───────┘   └──────┬───────┘
//!            │ subscribe(topic, id, Arc<dyn Subscribe>)│
//!            ▼                  ▼                  ▼
//! ┌───────────────────────────────────────────────────────────────────┐
//! │  Dispatcher (cheap clone, Send + Sync)                            │
//! │  - TopicRegistry: RwLock<HashMap<Topic, ordered registrations>>   │
//! │  - round sequence counter                                         │
//! │  - panic guard (catch_unwind, configurable)                       │
//! └──────┬────────────────────────────────────────────────────────────┘
//!        │ publish(topic, payload)
//!        ▼
//!   snapshot(topic) ──► [A, B, C]   (lock released here)
//!        │
//!        ├─► A.accept(&n) ─► Ok        ─► delivered
//!        ├─► B.accept(&n) ─► Err(e)    ─► failed (round continues)
//!        └─► C.accept(&n) ─► Ok        ─► delivered
//!        ▼
//!   Delivery { delivered: [A, C], failed: [(B, e)] }
//! ```
//!
//! ## Features
//! | Area               | Description                                                   | Key types / traits                         |
//! |--------------------|---------------------------------------------------------------|--------------------------------------------|
//! | **Subscriber API** | One capability: accept a notification for a topic.            | [`Subscribe`], [`SubscriberId`]            |
//! | **Registry**       | Declared topics, ordered registrations, snapshots.            | [`TopicRegistry`], [`Snapshot`]            |
//! | **Dispatch**       | Snapshot delivery with failure containment.                   | [`Dispatcher`], [`Delivery`], [`Failure`]  |
//! | **Facade**         | Publish domain events on a fixed topic.                       | [`Publisher`]                              |
//! | **Errors**         | Typed structural and subscriber errors.                       | [`DispatchError`], [`SubscriberError`]     |
//! | **Configuration**  | Pre-declared topics, auto-declaration, panic catching.        | [`Config`], [`DispatcherBuilder`]          |
//! | **Global**         | Optional process-wide instance with explicit teardown.        | [`global`]                                 |
//!
//! ## Optional features
//! - `channels` (default): reference subscribers [`EmailListener`],
//!   [`PushListener`] and [`LogWriter`] _(demo/reference only)_.
//!
//! ## Logging
//! The crate emits `tracing` events (structural edits and rounds at `debug`,
//! subscriber failures at `warn`) and never installs a subscriber itself.
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use topicvisor::{Dispatcher, Notification, Subscribe, SubscriberError};
//!
//! struct Printer;
//!
//! #[async_trait::async_trait]
//! impl Subscribe for Printer {
//!     async fn accept(&self, n: &Notification) -> Result<(), SubscriberError> {
//!         println!("got {}", n.topic);
//!         Ok(())
//!     }
//! }
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let hub = Dispatcher::new();
//!     hub.declare_topic("NEW_ITEM");
//!     hub.subscribe("NEW_ITEM", "printer", Arc::new(Printer))?;
//!
//!     let round = hub.publish("NEW_ITEM", None).await?;
//!     assert_eq!(round.delivered.len(), 1);
//!
//!     assert!(hub.publish("UNDECLARED", None).await.is_err());
//!     Ok(())
//! }
//! ```
mod dispatch;
mod error;
mod events;
mod subscribers;

// ---- Public re-exports ----

pub use dispatch::global;
pub use dispatch::{
    Config, Delivery, Dispatcher, DispatcherBuilder, Failure, Publisher, Registration, Snapshot,
    TopicRegistry,
};
pub use error::{DispatchError, SubscriberError};
pub use events::{Notification, Payload, Topic};
pub use subscribers::{Subscribe, SubscriberId};

// Optional: built-in reference channels (demo/reference).
// Disable with: `--no-default-features`
#[cfg(feature = "channels")]
pub use subscribers::{EmailListener, LogWriter, PushListener};
