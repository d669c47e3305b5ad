//! Dispatch layer: registry, delivery rounds and construction.
//!
//! The public API from this module is [`Dispatcher`] (with its builder and
//! [`Config`]), plus the registry types it exposes.
//!
//! Internal modules:
//! - [`registry`]: per-topic ordered registrations and snapshots;
//! - [`dispatcher`]: subscribe/unsubscribe/publish, failure containment;
//! - [`delivery`]: per-round outcome;
//! - [`publisher`]: fixed-topic facade;
//! - [`builder`]: dispatcher construction from [`Config`];
//! - [`global`]: optional process-wide instance.

mod builder;
mod config;
mod delivery;
mod dispatcher;
pub mod global;
mod publisher;
mod registry;

pub use builder::DispatcherBuilder;
pub use config::Config;
pub use delivery::{Delivery, Failure};
pub use dispatcher::Dispatcher;
pub use publisher::Publisher;
pub use registry::{Registration, Snapshot, TopicRegistry};
