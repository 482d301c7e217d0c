//! Session glue: a controller plus its bindings, flushed after every input
//! and every delivered message.
//!
//! Updates the host delivers itself (e.g. thumbnails arriving outside the
//! channel) go through the session's own inbound queue, drained after the
//! bindings' queues.

use std::sync::Arc;

use stagekit_core::{ChannelError, Intent, MapperError};
use stagekit_viewport::{
    ClickMode, InboundQueue, KeyEvent, PointerEvent, RenderSurface, ResizeRequest, StateUpdate,
    ViewportController,
};

use crate::binding::{BindSet, BindingOptions, RemoteBinding};
use crate::channel::RemoteChannel;

#[derive(Debug)]
pub struct StageSession<S: RenderSurface> {
    controller: ViewportController<S>,
    bindings: Vec<RemoteBinding>,
    host: InboundQueue,
}

impl<S: RenderSurface> StageSession<S> {
    pub fn new(controller: ViewportController<S>) -> Self {
        Self {
            controller,
            bindings: Vec::new(),
            host: InboundQueue::new(),
        }
    }

    /// Bind a channel and apply whatever it answered with
    pub fn bind(
        &mut self,
        channel: Arc<dyn RemoteChannel>,
        set: BindSet,
        options: BindingOptions,
    ) -> Result<(), ChannelError> {
        let binding = RemoteBinding::bind(&mut self.controller, channel, set, options)?;
        self.bindings.push(binding);
        self.flush();
        Ok(())
    }

    pub fn handle_pointer(&mut self, event: PointerEvent) -> Vec<Intent> {
        let intents = self.controller.handle_pointer(event);
        self.flush();
        intents
    }

    pub fn handle_key(&mut self, event: KeyEvent) -> Vec<Intent> {
        let intents = self.controller.handle_key(event);
        self.flush();
        intents
    }

    /// Run a delivery (e.g. a channel's `deliver` or `dispatch_line`), then flush
    pub fn receive<R>(&mut self, deliver: impl FnOnce() -> R) -> R {
        let result = deliver();
        self.flush();
        result
    }

    /// Apply a host-delivered update, after anything already queued
    pub fn apply(&mut self, update: StateUpdate) {
        self.host.push(update);
        self.flush();
    }

    pub fn resize(&mut self, request: ResizeRequest) -> Result<(), MapperError> {
        self.flush();
        self.controller.resize(request)
    }

    pub fn set_click_mode(&mut self, mode: ClickMode) {
        self.controller.set_click_mode(mode);
    }

    /// Apply queued inbound updates; returns how many were applied
    pub fn flush(&mut self) -> usize {
        let mut applied = 0;
        for binding in &self.bindings {
            applied += binding.flush(&mut self.controller);
        }
        applied + self.controller.drain(&self.host)
    }

    pub fn controller(&self) -> &ViewportController<S> {
        &self.controller
    }

    pub fn controller_mut(&mut self) -> &mut ViewportController<S> {
        &mut self.controller
    }

    pub fn bindings(&self) -> &[RemoteBinding] {
        &self.bindings
    }

    /// Tear down the bindings and hand back the controller
    pub fn into_controller(self) -> ViewportController<S> {
        let StageSession {
            controller,
            bindings,
            host,
        } = self;
        drop(bindings);
        if !host.is_empty() {
            tracing::warn!("Discarding {} undrained host updates", host.len());
        }
        controller
    }
}
