use std::sync::Arc;

use crate::dispatch::{Config, Dispatcher, TopicRegistry};
use crate::events::Topic;
use crate::subscribers::{Subscribe, SubscriberId};

/// Builder for constructing a [`Dispatcher`] with pre-declared topics and
/// initial subscriptions.
pub struct DispatcherBuilder {
    cfg: Config,
    topics: Vec<Topic>,
    subscriptions: Vec<(Topic, SubscriberId, Arc<dyn Subscribe>)>,
}

impl DispatcherBuilder {
    /// Creates a new builder with the given configuration.
    pub fn new(cfg: Config) -> Self {
        Self {
            cfg,
            topics: Vec::new(),
            subscriptions: Vec::new(),
        }
    }

    /// Declares additional topics (on top of `Config::topics`).
    pub fn with_topics<I, T>(mut self, topics: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Topic>,
    {
        self.topics.extend(topics.into_iter().map(Into::into));
        self
    }

    /// Registers a subscriber at build time.
    ///
    /// The topic is declared if needed, so initial subscriptions never fail.
    pub fn with_subscription(
        mut self,
        topic: impl Into<Topic>,
        id: impl Into<SubscriberId>,
        subscriber: Arc<dyn Subscribe>,
    ) -> Self {
        self.subscriptions
            .push((topic.into(), id.into(), subscriber));
        self
    }

    /// Builds the dispatcher.
    ///
    /// Declaration order: `Config::topics`, then `with_topics`, then the
    /// topics of `with_subscription` entries. Initial subscriptions are
    /// registered in the order they were added.
    pub fn build(self) -> Dispatcher {
        let registry = TopicRegistry::with_topics(self.cfg.initial_topics())
            .auto_declare(self.cfg.auto_declare);
        for topic in self.topics {
            registry.declare_topic(topic);
        }
        for (topic, id, sub) in self.subscriptions {
            registry.declare_topic(topic.clone());
            // Declared right above; the call cannot report UnknownTopic.
            let _ = registry.subscribe(topic, id, sub);
        }
        tracing::debug!(
            topics = registry.topics().len(),
            auto_declare = self.cfg.auto_declare,
            catch_panics = self.cfg.catch_panics,
            "dispatcher built"
        );
        Dispatcher::from_parts(registry, self.cfg.catch_panics)
    }
}
