//! # Example: store
//!
//! A store announces new items and sales; customers pick a channel.
//!
//! Shows how to:
//! - Declare the store's topics up front via [`Config::topics`].
//! - Subscribe email-style and push-style listeners per topic.
//! - Wrap topics in [`Publisher`] facades for domain actions.
//! - Read the per-round [`Delivery`](topicvisor::Delivery) outcome.
//!
//! ## Run
//! ```bash
//! RUST_LOG=debug cargo run --example store
//! ```

use std::sync::Arc;

use topicvisor::{
    Config, DispatchError, Dispatcher, EmailListener, LogWriter, Publisher, PushListener,
};
use tracing_subscriber::EnvFilter;

const NEW_ITEM: &str = "NEW_ITEM";
const SALE: &str = "SALE";

/// Domain facade: maps store actions to topic publishes.
struct Store {
    dispatcher: Dispatcher,
    new_items: Publisher,
    sales: Publisher,
}

impl Store {
    fn new() -> Self {
        let dispatcher = Dispatcher::builder(Config {
            topics: vec![NEW_ITEM.into(), SALE.into()],
            ..Config::default()
        })
        .build();
        Self {
            new_items: dispatcher.publisher(NEW_ITEM),
            sales: dispatcher.publisher(SALE),
            dispatcher,
        }
    }

    fn notifications(&self) -> &Dispatcher {
        &self.dispatcher
    }

    async fn new_item_promotion(&self, item: &'static str) -> Result<(), DispatchError> {
        let round = self.new_items.announce_value(item).await?;
        println!(
            "[store] new item {item:?}: delivered={:?} failed={:?}",
            round.delivered,
            round.failed_ids()
        );
        Ok(())
    }

    async fn sale_promotion(&self, percent: u8) -> Result<(), DispatchError> {
        let round = self.sales.announce_value(percent).await?;
        println!(
            "[store] sale {percent}%: delivered={:?} failed={:?}",
            round.delivered,
            round.failed_ids()
        );
        Ok(())
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let store = Store::new();
    let hub = store.notifications();

    let email1 = Arc::new(EmailListener::new("email1.com"));
    hub.subscribe(NEW_ITEM, "email1.com", email1.clone())?;
    hub.subscribe(NEW_ITEM, "ana21", Arc::new(PushListener::new("ana21")))?;
    hub.subscribe(SALE, "email2.com", Arc::new(EmailListener::new("email2.com")))?;
    // A misconfigured customer: rejected on every round, others unaffected.
    hub.subscribe(SALE, "nobody", Arc::new(EmailListener::new("")))?;
    hub.subscribe(SALE, "audit", Arc::new(LogWriter::new()))?;

    store.new_item_promotion("garden gnome").await?;
    store.sale_promotion(30).await?;

    hub.unsubscribe(NEW_ITEM, "email1.com");
    store.new_item_promotion("bird feeder").await?;

    println!("[store] email1.com outbox: {:?}", email1.outbox());

    if let Err(e) = hub.publish("CLEARANCE", None).await {
        println!("[store] {} ({})", e, e.as_label());
    }
    Ok(())
}
