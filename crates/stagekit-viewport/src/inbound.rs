//! Inbound update queue
//!
//! Code outside this crate changes a controller's snapshot only by pushing
//! [`StateUpdate`]s here and letting the controller drain them with
//! [`ViewportController::drain`](crate::ViewportController::drain). Pushes may
//! come from any thread; draining applies them in arrival order.

use std::fmt;

use stagekit_core::{thread_safe_deque, ThreadSafeDeque};

use crate::controller::StateUpdate;

#[derive(Clone)]
pub struct InboundQueue {
    updates: ThreadSafeDeque<StateUpdate>,
}

impl InboundQueue {
    pub fn new() -> Self {
        Self {
            updates: thread_safe_deque(),
        }
    }

    pub fn push(&self, update: StateUpdate) {
        self.updates.lock().push_back(update);
    }

    pub fn len(&self) -> usize {
        self.updates.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.updates.lock().is_empty()
    }

    /// Everything queued so far, oldest first
    pub(crate) fn take(&self) -> Vec<StateUpdate> {
        self.updates.lock().drain(..).collect()
    }
}

impl Default for InboundQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for InboundQueue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InboundQueue")
            .field("pending", &self.len())
            .finish()
    }
}
