use crate::error::SubscriberError;
use crate::events::Topic;
use crate::subscribers::SubscriberId;

/// A subscriber that failed during a round, with its error.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Failure {
    pub id: SubscriberId,
    pub error: SubscriberError,
}

/// Outcome of one publish round.
///
/// `delivered` and `failed` are each in snapshot (insertion) order. Every
/// subscriber of the snapshot appears in exactly one of the two lists.
#[derive(Clone, Debug)]
pub struct Delivery {
    /// Topic the round was published on.
    pub topic: Topic,
    /// Round sequence number (matches `Notification::seq`).
    pub seq: u64,
    /// Subscribers whose `accept` returned `Ok`.
    pub delivered: Vec<SubscriberId>,
    /// Subscribers whose `accept` failed or panicked.
    pub failed: Vec<Failure>,
}

impl Delivery {
    pub(crate) fn new(topic: Topic, seq: u64, capacity: usize) -> Self {
        Self {
            topic,
            seq,
            delivered: Vec::with_capacity(capacity),
            failed: Vec::new(),
        }
    }

    /// True if no subscriber failed.
    #[inline]
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }

    /// Number of subscribers the round was attempted on.
    #[inline]
    pub fn attempted(&self) -> usize {
        self.delivered.len() + self.failed.len()
    }

    /// Ids of the failed subscribers, in snapshot order.
    pub fn failed_ids(&self) -> Vec<SubscriberId> {
        self.failed.iter().map(|f| f.id.clone()).collect()
    }

    /// Error recorded for `id` in this round, if it failed.
    pub fn error_for(&self, id: &SubscriberId) -> Option<&SubscriberError> {
        self.failed.iter().find(|f| &f.id == id).map(|f| &f.error)
    }
}
