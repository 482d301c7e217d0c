//! Remote command channel
//!
//! A channel carries named calls out to the stage controller and delivers
//! named signals back. Calls are fire-and-forget; anything the remote side
//! wants to say comes back as a signal.

mod json_lines;
mod loopback;

pub use json_lines::JsonLinesChannel;
pub use loopback::{LoopbackChannel, RecordedCall};

use serde_json::Value;
use tracing::debug;

use stagekit_core::{thread_safe_rw_map, ChannelError, DataCallback, ThreadSafeRwMap};

use crate::messages::CALL_FETCH_CONFIG;

/// Handler for an inbound signal payload
pub type SignalHandler = DataCallback<Value>;

/// Trait for remote command channels
pub trait RemoteChannel: Send + Sync {
    /// Send a named call with positional arguments
    fn call(&self, name: &str, args: Value) -> Result<(), ChannelError>;

    /// Register a handler for a named signal
    ///
    /// Handlers are additive; every handler registered for a name runs, in
    /// registration order.
    fn signal(&self, name: &str, handler: SignalHandler) -> Result<(), ChannelError>;

    /// Ask the remote side to send its current config
    fn fetch_config(&self) -> Result<(), ChannelError> {
        self.call(CALL_FETCH_CONFIG, Value::Array(Vec::new()))
    }
}

/// Signal name to handler table shared by the channel implementations
#[derive(Clone)]
pub(crate) struct SignalRegistry {
    handlers: ThreadSafeRwMap<String, Vec<SignalHandler>>,
}

impl SignalRegistry {
    pub(crate) fn new() -> Self {
        Self {
            handlers: thread_safe_rw_map(),
        }
    }

    pub(crate) fn register(&self, name: &str, handler: SignalHandler) {
        self.handlers
            .write()
            .entry(name.to_string())
            .or_default()
            .push(handler);
        debug!("Signal handler registered for '{}'", name);
    }

    /// Run every handler for `name`; returns how many ran
    pub(crate) fn dispatch(&self, name: &str, payload: &Value) -> usize {
        let handlers = self.handlers.read();
        match handlers.get(name) {
            Some(list) => {
                for handler in list {
                    handler(payload.clone());
                }
                list.len()
            }
            None => {
                debug!("No handlers for signal '{}'", name);
                0
            }
        }
    }
}

impl std::fmt::Debug for SignalRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<String> = self.handlers.read().keys().cloned().collect();
        f.debug_struct("SignalRegistry")
            .field("signals", &names)
            .finish()
    }
}
