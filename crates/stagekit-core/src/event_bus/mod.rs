//! # Event Bus Module
//!
//! Typed publish/subscribe between the interaction layer and whatever
//! turns intents into remote calls.
//!
//! - Publishers emit [`ViewerEvent`]s without knowing subscribers
//! - Subscribers filter by [`EventCategory`] and can unsubscribe later
//! - Async hosts can poll a broadcast receiver instead
//!
//! ## Usage
//!
//! ```rust
//! use stagekit_core::event_bus::{EventBus, EventCategory, EventFilter, Intent, ViewerEvent};
//!
//! let bus = EventBus::new();
//! let subscription = bus.subscribe(EventFilter::only(EventCategory::Intent), |event| {
//!     if let ViewerEvent::Intent(intent) = event {
//!         println!("intent: {:?}", intent);
//!     }
//! });
//!
//! assert_eq!(bus.publish(ViewerEvent::Intent(Intent::Move { x: 0.0, y: 0.0 })), 1);
//! assert!(bus.unsubscribe(subscription));
//! ```

mod bus;
mod events;

pub use bus::*;
pub use events::*;
