//! Per-controller event bus.
//!
//! Handlers run on the publishing thread in subscription order. Hosts that
//! would rather poll (e.g. from a tokio task) can take a broadcast receiver.

use std::fmt;

use parking_lot::RwLock;
use tokio::sync::broadcast;
use uuid::Uuid;

use super::events::{EventCategory, ViewerEvent};

/// Events a polling receiver may fall behind by before it starts lagging
const RECEIVER_BACKLOG: usize = 256;

/// Handle returned by [`EventBus::subscribe`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(Uuid);

impl fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sub-{}", self.0.simple())
    }
}

/// Which events a handler sees
#[derive(Debug, Clone, Default)]
pub enum EventFilter {
    #[default]
    All,
    Categories(Vec<EventCategory>),
}

impl EventFilter {
    pub fn only(category: EventCategory) -> Self {
        EventFilter::Categories(vec![category])
    }

    pub fn matches(&self, event: &ViewerEvent) -> bool {
        match self {
            EventFilter::All => true,
            EventFilter::Categories(categories) => categories.contains(&event.category()),
        }
    }
}

struct Subscriber {
    id: SubscriptionId,
    filter: EventFilter,
    handler: Box<dyn Fn(ViewerEvent) + Send + Sync>,
}

/// Synchronous fan-out of [`ViewerEvent`]s
pub struct EventBus {
    subscribers: RwLock<Vec<Subscriber>>,
    sender: broadcast::Sender<ViewerEvent>,
}

impl EventBus {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(RECEIVER_BACKLOG);
        Self {
            subscribers: RwLock::new(Vec::new()),
            sender,
        }
    }

    /// Deliver `event` to every matching handler, then to any receivers
    ///
    /// Returns how many handlers and receivers got it. Handlers must not
    /// subscribe or unsubscribe while being called.
    pub fn publish(&self, event: ViewerEvent) -> usize {
        let mut delivered = 0;
        for subscriber in self.subscribers.read().iter() {
            if subscriber.filter.matches(&event) {
                (subscriber.handler)(event.clone());
                delivered += 1;
            }
        }
        // Only fails when nobody is polling.
        delivered + self.sender.send(event).unwrap_or(0)
    }

    pub fn subscribe<F>(&self, filter: EventFilter, handler: F) -> SubscriptionId
    where
        F: Fn(ViewerEvent) + Send + Sync + 'static,
    {
        let id = SubscriptionId(Uuid::new_v4());
        self.subscribers.write().push(Subscriber {
            id,
            filter,
            handler: Box::new(handler),
        });
        tracing::debug!("Subscription {} added", id);
        id
    }

    /// Remove a handler; `false` if it was already gone
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut subscribers = self.subscribers.write();
        let before = subscribers.len();
        subscribers.retain(|s| s.id != id);
        let removed = subscribers.len() != before;
        if removed {
            tracing::debug!("Subscription {} removed", id);
        }
        removed
    }

    /// Receiver that sees every event published from now on
    pub fn receiver(&self) -> broadcast::Receiver<ViewerEvent> {
        self.sender.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.read().len()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("subscribers", &self.subscriber_count())
            .field("receivers", &self.sender.receiver_count())
            .finish()
    }
}
