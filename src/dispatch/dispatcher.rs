//! # Dispatcher - subscribe, unsubscribe and publish over a shared registry.
//!
//! The dispatcher is the orchestration layer on top of [`TopicRegistry`]:
//! it delegates structure to the registry and runs delivery rounds.
//!
//! ## Publish round
//! ```text
//! publish(topic, payload)
//!   ├─► registry.snapshot(topic)          (UnknownTopic → return Err, nothing delivered)
//!   ├─► seq += 1, build Notification
//!   ├─► for reg in snapshot (insertion order):
//!   │       accept(&notification)
//!   │         ├─ Ok     ─► delivered.push(id)
//!   │         ├─ Err(e) ─► failed.push((id, e)), continue
//!   │         └─ panic  ─► failed.push((id, Panicked)), continue
//!   └─► Ok(Delivery { delivered, failed })
//! ```
//!
//! ## Rules
//! - The registry lock is never held while a subscriber runs.
//! - A round iterates its snapshot only; edits made meanwhile (including from
//!   inside `accept`) apply from the next round on.
//! - Subscriber failures never abort a round and never surface as `Err`.

use std::panic::AssertUnwindSafe;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::sync::Arc;

use futures::FutureExt;
use tokio::task::JoinHandle;

use crate::dispatch::builder::DispatcherBuilder;
use crate::dispatch::delivery::{Delivery, Failure};
use crate::dispatch::publisher::Publisher;
use crate::dispatch::registry::{Registration, Snapshot, TopicRegistry};
use crate::dispatch::Config;
use crate::error::{DispatchError, SubscriberError};
use crate::events::{Notification, Payload, Topic};
use crate::subscribers::{Subscribe, SubscriberId};

struct Inner {
    registry: TopicRegistry,
    catch_panics: bool,
    round_seq: AtomicU64,
}

/// Topic-keyed notification dispatcher.
///
/// Cheap to clone: clones share the same registry. `Send + Sync`, so one
/// instance can be used from many tasks and threads, and handed to
/// subscribers that need to edit subscriptions from inside `accept`.
#[derive(Clone)]
pub struct Dispatcher {
    inner: Arc<Inner>,
}

impl Dispatcher {
    /// Creates a dispatcher with default configuration and no topics.
    #[must_use]
    pub fn new() -> Self {
        Self::builder(Config::default()).build()
    }

    /// Starts building a dispatcher from `cfg`.
    pub fn builder(cfg: Config) -> DispatcherBuilder {
        DispatcherBuilder::new(cfg)
    }

    pub(crate) fn from_parts(registry: TopicRegistry, catch_panics: bool) -> Self {
        Self {
            inner: Arc::new(Inner {
                registry,
                catch_panics,
                round_seq: AtomicU64::new(0),
            }),
        }
    }

    /// Underlying registry (read-side queries, advanced use).
    pub fn registry(&self) -> &TopicRegistry {
        &self.inner.registry
    }

    /// Declares `topic` if absent. Returns `true` if it was newly declared.
    pub fn declare_topic(&self, topic: impl Into<Topic>) -> bool {
        self.inner.registry.declare_topic(topic)
    }

    /// Registers `subscriber` under `topic` with identity `id`.
    ///
    /// Subscribing an id that is already registered under `topic` is a no-op
    /// and returns `Ok(false)`.
    ///
    /// # Errors
    /// [`DispatchError::UnknownTopic`] if `topic` was never declared.
    pub fn subscribe(
        &self,
        topic: impl Into<Topic>,
        id: impl Into<SubscriberId>,
        subscriber: Arc<dyn Subscribe>,
    ) -> Result<bool, DispatchError> {
        self.inner.registry.subscribe(topic, id, subscriber)
    }

    /// Removes `id` from `topic`. Always succeeds; returns whether anything was removed.
    pub fn unsubscribe(&self, topic: impl AsRef<str>, id: impl Into<SubscriberId>) -> bool {
        self.inner.registry.unsubscribe(topic.as_ref(), &id.into())
    }

    /// Removes `id` from every topic. Returns the number of registrations removed.
    pub fn unsubscribe_all(&self, id: impl Into<SubscriberId>) -> usize {
        self.inner.registry.unsubscribe_all(&id.into())
    }

    /// Point-in-time copy of `topic`'s subscribers.
    ///
    /// # Errors
    /// [`DispatchError::UnknownTopic`] if `topic` was never declared.
    pub fn snapshot(&self, topic: impl AsRef<str>) -> Result<Snapshot, DispatchError> {
        self.inner.registry.snapshot(topic.as_ref())
    }

    /// Declared topics, sorted by name.
    pub fn topics(&self) -> Vec<Topic> {
        self.inner.registry.topics()
    }

    /// Returns a facade bound to `topic`.
    pub fn publisher(&self, topic: impl Into<Topic>) -> Publisher {
        Publisher::new(self.clone(), topic.into())
    }

    /// Delivers one notification to every subscriber of `topic`.
    ///
    /// Subscribers are awaited one after another in insertion order. Their
    /// failures are collected into the returned [`Delivery`].
    ///
    /// # Errors
    /// [`DispatchError::UnknownTopic`] if `topic` was never declared. This is
    /// the only error; subscriber failures are never returned as `Err`.
    pub async fn publish(
        &self,
        topic: impl Into<Topic>,
        payload: Option<Payload>,
    ) -> Result<Delivery, DispatchError> {
        let topic = topic.into();
        let snapshot = self.inner.registry.snapshot(topic.as_str())?;

        let seq = self.inner.round_seq.fetch_add(1, AtomicOrdering::Relaxed);
        let notification = Notification::new(topic.clone(), seq).with_payload_opt(payload);
        let mut delivery = Delivery::new(topic, seq, snapshot.len());

        tracing::debug!(topic = %delivery.topic, seq, subscribers = snapshot.len(), "publish round started");

        for reg in &snapshot {
            match self.deliver_one(reg, &notification).await {
                Ok(()) => delivery.delivered.push(reg.id().clone()),
                Err(error) => {
                    tracing::warn!(
                        topic = %delivery.topic,
                        seq,
                        subscriber = %reg.id(),
                        name = reg.subscriber().name(),
                        label = error.as_label(),
                        "subscriber failed: {error}"
                    );
                    delivery.failed.push(Failure {
                        id: reg.id().clone(),
                        error,
                    });
                }
            }
        }

        tracing::debug!(
            topic = %delivery.topic,
            seq,
            delivered = delivery.delivered.len(),
            failed = delivery.failed.len(),
            "publish round finished"
        );
        Ok(delivery)
    }

    /// Shorthand for `publish(topic, Some(Payload::new(value)))`.
    ///
    /// # Errors
    /// Same as [`Dispatcher::publish`].
    pub async fn publish_value<T>(
        &self,
        topic: impl Into<Topic>,
        value: T,
    ) -> Result<Delivery, DispatchError>
    where
        T: std::any::Any + Send + Sync,
    {
        self.publish(topic, Some(Payload::new(value))).await
    }

    /// Runs a publish round on a separate Tokio task and returns its handle.
    ///
    /// The topic is checked when the task runs, not when this is called.
    ///
    /// # Panics
    /// Panics if called outside a Tokio runtime.
    pub fn spawn_publish(
        &self,
        topic: impl Into<Topic>,
        payload: Option<Payload>,
    ) -> JoinHandle<Result<Delivery, DispatchError>> {
        let me = self.clone();
        let topic = topic.into();
        tokio::spawn(async move { me.publish(topic, payload).await })
    }

    async fn deliver_one(
        &self,
        reg: &Registration,
        notification: &Notification,
    ) -> Result<(), SubscriberError> {
        let fut = reg.subscriber().accept(notification);
        if !self.inner.catch_panics {
            return fut.await;
        }
        match AssertUnwindSafe(fut).catch_unwind().await {
            Ok(res) => res,
            Err(panic_err) => {
                let any = &*panic_err;
                let info = if let Some(msg) = any.downcast_ref::<&'static str>() {
                    (*msg).to_string()
                } else if let Some(msg) = any.downcast_ref::<String>() {
                    msg.clone()
                } else {
                    "unknown panic".to_string()
                };
                Err(SubscriberError::Panicked { info })
            }
        }
    }
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("registry", &self.inner.registry)
            .field("catch_panics", &self.inner.catch_panics)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    type Log = Arc<Mutex<Vec<String>>>;

    /// Appends "<label>@<topic>" to a shared log.
    struct Recorder {
        label: &'static str,
        log: Log,
    }

    #[async_trait]
    impl Subscribe for Recorder {
        async fn accept(&self, n: &Notification) -> Result<(), SubscriberError> {
            self.log
                .lock()
                .unwrap()
                .push(format!("{}@{}", self.label, n.topic));
            Ok(())
        }
    }

    struct Failing;

    #[async_trait]
    impl Subscribe for Failing {
        async fn accept(&self, _n: &Notification) -> Result<(), SubscriberError> {
            Err(SubscriberError::unavailable("smtp down"))
        }
    }

    struct Panicking;

    #[async_trait]
    impl Subscribe for Panicking {
        async fn accept(&self, _n: &Notification) -> Result<(), SubscriberError> {
            panic!("boom");
        }
    }

    fn recorder(label: &'static str, log: &Log) -> Arc<dyn Subscribe> {
        Arc::new(Recorder {
            label,
            log: Arc::clone(log),
        })
    }

    fn ids(list: &[&str]) -> Vec<SubscriberId> {
        list.iter().map(|s| SubscriberId::new(*s)).collect()
    }

    fn dispatcher(topics: &[&str]) -> Dispatcher {
        let d = Dispatcher::new();
        for t in topics {
            d.declare_topic(*t);
        }
        d
    }

    #[tokio::test]
    async fn store_scenario() {
        let log = Log::default();
        let d = dispatcher(&["NEW_ITEM", "SALE"]);
        d.subscribe("NEW_ITEM", "A", recorder("A", &log)).unwrap();
        d.subscribe("NEW_ITEM", "B", recorder("B", &log)).unwrap();
        d.subscribe("SALE", "B", recorder("B", &log)).unwrap();

        let r = d.publish("NEW_ITEM", None).await.unwrap();
        assert_eq!(r.delivered, ids(&["A", "B"]));
        assert!(r.is_complete());

        let r = d.publish("SALE", None).await.unwrap();
        assert_eq!(r.delivered, ids(&["B"]));

        assert!(d.unsubscribe("NEW_ITEM", "A"));
        let r = d.publish("NEW_ITEM", None).await.unwrap();
        assert_eq!(r.delivered, ids(&["B"]));

        let err = d.publish("UNDECLARED_TOPIC", None).await.unwrap_err();
        assert_eq!(err.as_label(), "dispatch_unknown_topic");

        assert_eq!(
            *log.lock().unwrap(),
            vec!["A@NEW_ITEM", "B@NEW_ITEM", "B@SALE", "B@NEW_ITEM"]
        );
    }

    #[tokio::test]
    async fn empty_topic_delivers_nothing() {
        let d = dispatcher(&["QUIET"]);
        let r = d.publish("QUIET", None).await.unwrap();
        assert!(r.delivered.is_empty());
        assert!(r.failed.is_empty());
        assert_eq!(r.attempted(), 0);
    }

    #[tokio::test]
    async fn topics_are_isolated() {
        let log = Log::default();
        let d = dispatcher(&["X", "Y"]);
        d.subscribe("X", "x", recorder("x", &log)).unwrap();

        let r = d.publish("Y", None).await.unwrap();
        assert!(r.delivered.is_empty());
        assert!(log.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn failure_is_contained_and_reported_once() {
        let log = Log::default();
        let d = dispatcher(&["T"]);
        d.subscribe("T", "a", recorder("a", &log)).unwrap();
        d.subscribe("T", "bad", Arc::new(Failing)).unwrap();
        d.subscribe("T", "c", recorder("c", &log)).unwrap();

        let r = d.publish("T", None).await.unwrap();
        assert_eq!(r.delivered, ids(&["a", "c"]));
        assert_eq!(r.failed_ids(), ids(&["bad"]));
        assert_eq!(
            r.error_for(&SubscriberId::new("bad")),
            Some(&SubscriberError::unavailable("smtp down"))
        );
        assert_eq!(r.attempted(), 3);
        assert_eq!(*log.lock().unwrap(), vec!["a@T", "c@T"]);
    }

    #[tokio::test]
    async fn panic_is_caught_as_failure() {
        let log = Log::default();
        let d = dispatcher(&["T"]);
        d.subscribe("T", "p", Arc::new(Panicking)).unwrap();
        d.subscribe("T", "after", recorder("after", &log)).unwrap();

        let r = d.publish("T", None).await.unwrap();
        assert_eq!(r.delivered, ids(&["after"]));
        assert_eq!(r.failed.len(), 1);
        assert_eq!(
            r.failed[0].error,
            SubscriberError::Panicked {
                info: "boom".into()
            }
        );
    }

    #[tokio::test]
    async fn payload_is_shared_unchanged() {
        struct Grab(Mutex<Vec<Payload>>);

        #[async_trait]
        impl Subscribe for Grab {
            async fn accept(&self, n: &Notification) -> Result<(), SubscriberError> {
                match &n.payload {
                    Some(p) => {
                        self.0.lock().unwrap().push(p.clone());
                        Ok(())
                    }
                    None => Err(SubscriberError::rejected("missing payload")),
                }
            }
        }

        let d = dispatcher(&["T"]);
        let g1 = Arc::new(Grab(Mutex::new(Vec::new())));
        let g2 = Arc::new(Grab(Mutex::new(Vec::new())));
        d.subscribe("T", "g1", g1.clone()).unwrap();
        d.subscribe("T", "g2", g2.clone()).unwrap();

        let payload = Payload::new(String::from("spring sale"));
        let r = d.publish("T", Some(payload.clone())).await.unwrap();
        assert!(r.is_complete());

        let seen1 = g1.0.lock().unwrap()[0].clone();
        let seen2 = g2.0.lock().unwrap()[0].clone();
        assert!(seen1.ptr_eq(&payload));
        assert!(seen2.ptr_eq(&payload));
        assert_eq!(seen1.downcast_ref::<String>().map(String::as_str), Some("spring sale"));
    }

    #[tokio::test]
    async fn round_sequence_increases() {
        let d = dispatcher(&["T"]);
        let a = d.publish("T", None).await.unwrap();
        let b = d.publish_value("T", 1u8).await.unwrap();
        assert!(b.seq > a.seq);
    }

    /// Unsubscribes itself and subscribes a newcomer from inside `accept`.
    struct Reshuffler {
        dispatcher: Dispatcher,
        log: Log,
    }

    #[async_trait]
    impl Subscribe for Reshuffler {
        async fn accept(&self, n: &Notification) -> Result<(), SubscriberError> {
            self.log.lock().unwrap().push(format!("shuffle@{}", n.topic));
            self.dispatcher.unsubscribe("T", "shuffle");
            self.dispatcher.unsubscribe("T", "victim");
            self.dispatcher
                .subscribe("T", "late", recorder("late", &self.log))
                .map_err(|e| SubscriberError::rejected(e.to_string()))?;
            Ok(())
        }
    }

    #[tokio::test]
    async fn edits_inside_accept_apply_to_next_round() {
        let log = Log::default();
        let d = dispatcher(&["T"]);
        d.subscribe(
            "T",
            "shuffle",
            Arc::new(Reshuffler {
                dispatcher: d.clone(),
                log: Arc::clone(&log),
            }),
        )
        .unwrap();
        d.subscribe("T", "victim", recorder("victim", &log)).unwrap();

        let first = d.publish("T", None).await.unwrap();
        assert_eq!(first.delivered, ids(&["shuffle", "victim"]));

        let second = d.publish("T", None).await.unwrap();
        assert_eq!(second.delivered, ids(&["late"]));

        assert_eq!(
            *log.lock().unwrap(),
            vec!["shuffle@T", "victim@T", "late@T"]
        );
    }

    /// Publishes on another topic from inside `accept`.
    struct Relay {
        dispatcher: Dispatcher,
    }

    #[async_trait]
    impl Subscribe for Relay {
        async fn accept(&self, _n: &Notification) -> Result<(), SubscriberError> {
            let r = self
                .dispatcher
                .publish("DOWNSTREAM", None)
                .await
                .map_err(|e| SubscriberError::rejected(e.to_string()))?;
            if r.is_complete() {
                Ok(())
            } else {
                Err(SubscriberError::rejected("downstream failed"))
            }
        }
    }

    #[tokio::test]
    async fn nested_publish_does_not_deadlock() {
        let log = Log::default();
        let d = dispatcher(&["UPSTREAM", "DOWNSTREAM"]);
        d.subscribe(
            "UPSTREAM",
            "relay",
            Arc::new(Relay {
                dispatcher: d.clone(),
            }),
        )
        .unwrap();
        d.subscribe("DOWNSTREAM", "sink", recorder("sink", &log))
            .unwrap();

        let r = d.publish("UPSTREAM", None).await.unwrap();
        assert_eq!(r.delivered, ids(&["relay"]));
        assert_eq!(*log.lock().unwrap(), vec!["sink@DOWNSTREAM"]);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_subscribe_and_publish() {
        let log = Log::default();
        let d = dispatcher(&["T"]);

        let mut handles = Vec::new();
        for i in 0..32 {
            let d = d.clone();
            let log = Arc::clone(&log);
            handles.push(tokio::spawn(async move {
                let id = format!("s{i}");
                d.subscribe("T", id.as_str(), recorder("s", &log)).unwrap();
                d.publish("T", None).await.unwrap();
                if i % 2 == 0 {
                    d.unsubscribe("T", id.as_str());
                }
            }));
        }
        for h in handles {
            h.await.unwrap();
        }

        assert_eq!(d.registry().subscriber_count("T"), Some(16));
        let snap = d.snapshot("T").unwrap();
        let seqs: Vec<u64> = snap.iter().map(Registration::seq).collect();
        assert!(seqs.windows(2).all(|w| w[0] < w[1]));

        let r = d.publish("T", None).await.unwrap();
        assert_eq!(r.delivered, snap.ids());
    }

    #[tokio::test]
    async fn spawn_publish_runs_round() {
        let log = Log::default();
        let d = dispatcher(&["T"]);
        d.subscribe("T", "a", recorder("a", &log)).unwrap();

        let r = d.spawn_publish("T", None).await.unwrap().unwrap();
        assert_eq!(r.delivered, ids(&["a"]));

        let err = d.spawn_publish("NOPE", None).await.unwrap().unwrap_err();
        assert!(matches!(err, DispatchError::UnknownTopic { .. }));
    }
}
