use serde_json::Value;

use stagekit_core::{thread_safe, thread_safe_vec, ChannelError, ThreadSafe, ThreadSafeVec};

use super::{RemoteChannel, SignalHandler, SignalRegistry};
use crate::messages::{CALL_FETCH_CONFIG, SIGNAL_CONFIG_CHANGED};

/// A call seen by a [`LoopbackChannel`]
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    pub name: String,
    pub args: Value,
}

/// In-memory channel
///
/// Records every outbound call and lets the host deliver signals by hand.
/// When a config is set, `fetch_config` answers immediately with a
/// `config_changed` signal.
#[derive(Debug)]
pub struct LoopbackChannel {
    calls: ThreadSafeVec<RecordedCall>,
    registry: SignalRegistry,
    config: ThreadSafe<Option<Value>>,
    closed: ThreadSafe<bool>,
}

impl Default for LoopbackChannel {
    fn default() -> Self {
        Self::new()
    }
}

impl LoopbackChannel {
    pub fn new() -> Self {
        Self {
            calls: thread_safe_vec(),
            registry: SignalRegistry::new(),
            config: thread_safe(None),
            closed: thread_safe(false),
        }
    }

    /// Answer `fetch_config` with this payload
    pub fn with_config(self, config: Value) -> Self {
        *self.config.lock() = Some(config);
        self
    }

    pub fn set_config(&self, config: Value) {
        *self.config.lock() = Some(config);
    }

    /// Deliver an inbound signal; returns how many handlers ran
    pub fn deliver(&self, signal: &str, payload: Value) -> usize {
        self.registry.dispatch(signal, &payload)
    }

    /// Every call so far, oldest first
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().clone()
    }

    /// Names of every call so far
    pub fn call_names(&self) -> Vec<String> {
        self.calls.lock().iter().map(|c| c.name.clone()).collect()
    }

    pub fn clear_calls(&self) {
        self.calls.lock().clear();
    }

    /// Make later calls fail with [`ChannelError::Closed`]
    pub fn close(&self) {
        *self.closed.lock() = true;
    }
}

impl RemoteChannel for LoopbackChannel {
    fn call(&self, name: &str, args: Value) -> Result<(), ChannelError> {
        if *self.closed.lock() {
            return Err(ChannelError::Closed);
        }
        self.calls.lock().push(RecordedCall {
            name: name.to_string(),
            args,
        });
        Ok(())
    }

    fn signal(&self, name: &str, handler: SignalHandler) -> Result<(), ChannelError> {
        self.registry.register(name, handler);
        Ok(())
    }

    fn fetch_config(&self) -> Result<(), ChannelError> {
        self.call(CALL_FETCH_CONFIG, Value::Array(Vec::new()))?;
        let config = self.config.lock().clone();
        if let Some(config) = config {
            self.deliver(SIGNAL_CONFIG_CHANGED, config);
        }
        Ok(())
    }
}
