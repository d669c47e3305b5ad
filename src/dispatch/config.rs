//! # Dispatcher configuration.
//!
//! Provides [`Config`] centralized settings for a [`Dispatcher`](crate::Dispatcher).
//!
//! Config is used in one place: `Dispatcher::builder(config)`; the builder
//! copies the relevant values into the registry and the dispatcher.
//!
//! ## Topic namespace
//! - `topics` empty + `auto_declare = false` → open namespace, explicit
//!   `declare_topic` required before subscribing (default)
//! - `topics` non-empty → those topics exist from construction on
//!   (fixed set known up front, like an enum of events)
//! - `auto_declare = true` → `subscribe` declares missing topics itself;
//!   `publish`/`snapshot` still report unknown topics

use crate::events::Topic;

/// Configuration for a dispatcher.
///
/// ## Field semantics
/// - `topics`: topics declared at construction
/// - `auto_declare`: let `subscribe` declare unknown topics instead of failing
/// - `catch_panics`: convert subscriber panics into `SubscriberError::Panicked`
#[derive(Clone, Debug)]
pub struct Config {
    /// Topics declared when the dispatcher is built.
    pub topics: Vec<String>,

    /// Whether `subscribe` declares missing topics.
    ///
    /// Off by default so that a misspelt topic surfaces as `UnknownTopic`.
    pub auto_declare: bool,

    /// Whether panics inside `Subscribe::accept` are caught.
    ///
    /// - `true` = the panic is recorded as a failure of that subscriber and
    ///   the round continues
    /// - `false` = the panic unwinds out of `publish`
    ///
    /// **Warning**: catching relies on `AssertUnwindSafe`; a subscriber that
    /// panics while holding its own lock may leave that state poisoned.
    pub catch_panics: bool,
}

impl Config {
    /// Returns the pre-declared topics as [`Topic`] values.
    #[inline]
    pub fn initial_topics(&self) -> impl Iterator<Item = Topic> + '_ {
        self.topics.iter().map(|t| Topic::new(t.as_str()))
    }
}

impl Default for Config {
    /// Default configuration:
    ///
    /// - `topics = []` (declare at runtime)
    /// - `auto_declare = false`
    /// - `catch_panics = true`
    fn default() -> Self {
        Self {
            topics: Vec::new(),
            auto_declare: false,
            catch_panics: true,
        }
    }
}
