//! # Topic registry - ordered subscriber lists per topic.
//!
//! The registry owns, per declared topic, the ordered sequence of
//! registrations. It never calls subscribers; delivery is the dispatcher's job.
//!
//! ## Architecture
//! ```text
//! RwLock<HashMap<Topic, TopicEntry>>
//!    └─► TopicEntry { next_seq, regs: Arc<Vec<Registration>> }
//!                                   │
//!          snapshot(topic) ─────────┘  (Arc clone under read lock)
//!          subscribe / unsubscribe ──► Arc::make_mut under write lock
//! ```
//!
//! ## Rules
//! - Within a topic, an id is registered at most once (duplicates are no-ops).
//! - Order is strictly increasing by per-topic `seq`, never reshuffled by removal.
//! - Locks are held only for the structural edit or the `Arc` clone; a
//!   [`Snapshot`] stays valid and unchanged after the lock is released.
//! - Copy-on-write: an edit while a snapshot is alive clones the list, so
//!   in-flight rounds keep iterating the old one.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::error::DispatchError;
use crate::events::Topic;
use crate::subscribers::{Subscribe, SubscriberId};

/// One subscriber registered under one topic.
#[derive(Clone)]
pub struct Registration {
    topic: Topic,
    id: SubscriberId,
    seq: u64,
    subscriber: Arc<dyn Subscribe>,
}

impl Registration {
    pub fn topic(&self) -> &Topic {
        &self.topic
    }

    pub fn id(&self) -> &SubscriberId {
        &self.id
    }

    /// Per-topic insertion sequence number (delivery order key).
    pub fn seq(&self) -> u64 {
        self.seq
    }

    pub fn subscriber(&self) -> &Arc<dyn Subscribe> {
        &self.subscriber
    }
}

impl fmt::Debug for Registration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registration")
            .field("topic", &self.topic)
            .field("id", &self.id)
            .field("seq", &self.seq)
            .field("subscriber", &self.subscriber.name())
            .finish()
    }
}

/// Immutable point-in-time copy of one topic's registrations.
#[derive(Clone, Debug)]
pub struct Snapshot {
    topic: Topic,
    regs: Arc<Vec<Registration>>,
}

impl Snapshot {
    pub fn topic(&self) -> &Topic {
        &self.topic
    }

    /// Registrations in delivery order.
    pub fn iter(&self) -> std::slice::Iter<'_, Registration> {
        self.regs.iter()
    }

    /// Subscriber ids in delivery order.
    pub fn ids(&self) -> Vec<SubscriberId> {
        self.regs.iter().map(|r| r.id.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.regs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regs.is_empty()
    }
}

impl<'a> IntoIterator for &'a Snapshot {
    type Item = &'a Registration;
    type IntoIter = std::slice::Iter<'a, Registration>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[derive(Default)]
struct TopicEntry {
    next_seq: u64,
    regs: Arc<Vec<Registration>>,
}

/// Registry of declared topics and their ordered registrations.
///
/// Thread-safe; share it behind an `Arc` (the [`Dispatcher`](crate::Dispatcher) does).
pub struct TopicRegistry {
    topics: RwLock<HashMap<Topic, TopicEntry>>,
    auto_declare: bool,
}

impl TopicRegistry {
    /// Creates an empty registry. Topics must be declared before use.
    #[must_use]
    pub fn new() -> Self {
        Self {
            topics: RwLock::new(HashMap::new()),
            auto_declare: false,
        }
    }

    /// Creates a registry with every topic of `topics` pre-declared.
    #[must_use]
    pub fn with_topics<I, T>(topics: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Topic>,
    {
        let reg = Self::new();
        for t in topics {
            reg.declare_topic(t);
        }
        reg
    }

    /// When enabled, `subscribe` declares missing topics instead of failing.
    #[must_use]
    pub fn auto_declare(mut self, enabled: bool) -> Self {
        self.auto_declare = enabled;
        self
    }

    /// Declares `topic` if absent. Returns `true` if it was newly declared.
    pub fn declare_topic(&self, topic: impl Into<Topic>) -> bool {
        let topic = topic.into();
        let mut topics = self.write();
        if topics.contains_key(&topic) {
            return false;
        }
        tracing::debug!(topic = %topic, "topic declared");
        topics.insert(topic, TopicEntry::default());
        true
    }

    /// Registers `id` under `topic`.
    ///
    /// Returns `Ok(true)` if a registration was added and `Ok(false)` if `id`
    /// was already registered there (the existing entry is kept as is).
    ///
    /// # Errors
    /// [`DispatchError::UnknownTopic`] if `topic` was never declared and
    /// auto-declaration is off.
    pub fn subscribe(
        &self,
        topic: impl Into<Topic>,
        id: impl Into<SubscriberId>,
        subscriber: Arc<dyn Subscribe>,
    ) -> Result<bool, DispatchError> {
        let topic = topic.into();
        let id = id.into();
        let mut topics = self.write();

        if self.auto_declare && !topics.contains_key(&topic) {
            tracing::debug!(topic = %topic, "topic declared on subscribe");
            topics.insert(topic.clone(), TopicEntry::default());
        }
        let Some(entry) = topics.get_mut(&topic) else {
            return Err(DispatchError::UnknownTopic { topic });
        };

        if entry.regs.iter().any(|r| r.id == id) {
            tracing::debug!(topic = %topic, subscriber = %id, "duplicate subscribe ignored");
            return Ok(false);
        }

        let seq = entry.next_seq;
        entry.next_seq += 1;
        tracing::debug!(topic = %topic, subscriber = %id, seq, name = subscriber.name(), "subscribed");
        Arc::make_mut(&mut entry.regs).push(Registration {
            topic,
            id,
            seq,
            subscriber,
        });
        Ok(true)
    }

    /// Removes `id` from `topic`. Returns `true` if a registration was removed.
    ///
    /// Never fails: absent registrations and undeclared topics are no-ops.
    pub fn unsubscribe(&self, topic: &str, id: &SubscriberId) -> bool {
        let mut topics = self.write();
        let Some(entry) = topics.get_mut(topic) else {
            tracing::debug!(topic, subscriber = %id, "unsubscribe from undeclared topic ignored");
            return false;
        };
        let removed = Self::remove_id(entry, id);
        if removed {
            tracing::debug!(topic, subscriber = %id, "unsubscribed");
        }
        removed
    }

    /// Removes `id` from every topic. Returns the number of registrations removed.
    pub fn unsubscribe_all(&self, id: &SubscriberId) -> usize {
        let mut topics = self.write();
        let mut count = 0;
        for entry in topics.values_mut() {
            if Self::remove_id(entry, id) {
                count += 1;
            }
        }
        if count > 0 {
            tracing::debug!(subscriber = %id, count, "unsubscribed from all topics");
        }
        count
    }

    /// Point-in-time copy of `topic`'s registrations, in delivery order.
    ///
    /// # Errors
    /// [`DispatchError::UnknownTopic`] if `topic` was never declared.
    pub fn snapshot(&self, topic: &str) -> Result<Snapshot, DispatchError> {
        let topics = self.read();
        match topics.get_key_value(topic) {
            Some((key, entry)) => Ok(Snapshot {
                topic: key.clone(),
                regs: Arc::clone(&entry.regs),
            }),
            None => Err(DispatchError::UnknownTopic {
                topic: Topic::new(topic),
            }),
        }
    }

    pub fn contains_topic(&self, topic: &str) -> bool {
        self.read().contains_key(topic)
    }

    /// Declared topics, sorted by name.
    pub fn topics(&self) -> Vec<Topic> {
        let mut v: Vec<Topic> = self.read().keys().cloned().collect();
        v.sort_unstable();
        v
    }

    /// Number of live registrations under `topic` (`None` if undeclared).
    pub fn subscriber_count(&self, topic: &str) -> Option<usize> {
        self.read().get(topic).map(|e| e.regs.len())
    }

    // ---------------------------
    // Helpers
    // ---------------------------

    fn remove_id(entry: &mut TopicEntry, id: &SubscriberId) -> bool {
        match entry.regs.iter().position(|r| &r.id == id) {
            Some(pos) => {
                // Vec::remove keeps the relative order of the rest.
                Arc::make_mut(&mut entry.regs).remove(pos);
                true
            }
            None => false,
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, HashMap<Topic, TopicEntry>> {
        self.topics.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<Topic, TopicEntry>> {
        self.topics.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for TopicRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for TopicRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TopicRegistry")
            .field("topics", &self.topics())
            .field("auto_declare", &self.auto_declare)
            .finish()
    }
}
