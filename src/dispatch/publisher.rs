use std::any::Any;

use crate::dispatch::{Delivery, Dispatcher};
use crate::error::DispatchError;
use crate::events::{Payload, Topic};

/// Facade that publishes domain events on one fixed topic.
///
/// Holds no state besides the binding; every call is a plain
/// [`Dispatcher::publish`].
///
/// ```rust
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// use topicvisor::Dispatcher;
///
/// let d = Dispatcher::new();
/// d.declare_topic("NEW_ITEM");
/// let new_items = d.publisher("NEW_ITEM");
///
/// let round = new_items.announce(None).await.unwrap();
/// assert!(round.delivered.is_empty());
/// # }
/// ```
#[derive(Clone, Debug)]
pub struct Publisher {
    dispatcher: Dispatcher,
    topic: Topic,
}

impl Publisher {
    pub(crate) fn new(dispatcher: Dispatcher, topic: Topic) -> Self {
        Self { dispatcher, topic }
    }

    /// Topic this publisher is bound to.
    pub fn topic(&self) -> &Topic {
        &self.topic
    }

    /// Publishes on the bound topic.
    ///
    /// # Errors
    /// [`DispatchError::UnknownTopic`] if the bound topic is not declared.
    pub async fn announce(&self, payload: Option<Payload>) -> Result<Delivery, DispatchError> {
        self.dispatcher.publish(self.topic.clone(), payload).await
    }

    /// Publishes `value` as payload on the bound topic.
    ///
    /// # Errors
    /// Same as [`Publisher::announce`].
    pub async fn announce_value<T>(&self, value: T) -> Result<Delivery, DispatchError>
    where
        T: Any + Send + Sync,
    {
        self.announce(Some(Payload::new(value))).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SubscriberError;
    use crate::events::Notification;
    use crate::subscribers::{Subscribe, SubscriberId};
    use async_trait::async_trait;
    use std::sync::{Arc, Mutex};

    struct Seen(Mutex<Vec<(String, Option<u32>)>>);

    #[async_trait]
    impl Subscribe for Seen {
        async fn accept(&self, n: &Notification) -> Result<(), SubscriberError> {
            self.0
                .lock()
                .unwrap()
                .push((n.topic.to_string(), n.payload_as::<u32>().copied()));
            Ok(())
        }
    }

    #[tokio::test]
    async fn announces_on_bound_topic_only() {
        let d = Dispatcher::new();
        d.declare_topic("NEW_ITEM");
        d.declare_topic("SALE");
        let seen = Arc::new(Seen(Mutex::new(Vec::new())));
        d.subscribe("NEW_ITEM", "s", seen.clone()).unwrap();
        d.subscribe("SALE", "s", seen.clone()).unwrap();

        let sale = d.publisher("SALE");
        assert_eq!(sale.topic().as_str(), "SALE");
        let r = sale.announce_value(30u32).await.unwrap();
        assert_eq!(r.delivered, vec![SubscriberId::new("s")]);

        assert_eq!(
            *seen.0.lock().unwrap(),
            vec![("SALE".to_string(), Some(30))]
        );
    }

    #[tokio::test]
    async fn undeclared_binding_reports_unknown_topic() {
        let d = Dispatcher::new();
        let p = d.publisher("GHOST");
        assert!(matches!(
            p.announce(None).await,
            Err(DispatchError::UnknownTopic { .. })
        ));
    }
}
