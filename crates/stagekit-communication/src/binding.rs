//! Remote binding
//!
//! Wires a [`ViewportController`] to a [`RemoteChannel`]:
//! intents published on the controller's bus become outbound calls, and
//! inbound signals become [`StateUpdate`]s. Signal handlers may run on any
//! thread, so updates are queued and applied by [`RemoteBinding::flush`] in
//! arrival order.
//!
//! Bindings are additive. Binding twice doubles the handlers; a binding
//! forwards intents for as long as it is alive.

use std::sync::Arc;

use serde_json::{json, Value};
use tracing::{debug, error, warn};

use stagekit_core::{
    ChannelError, EventBus, EventCategory, EventFilter, Intent, SubscriptionId, ViewerEvent,
    WorldPoint,
};
use stagekit_settings::BindingSettings;
use stagekit_viewport::{InboundQueue, RenderSurface, StateUpdate, ViewportController};

use crate::channel::RemoteChannel;
use crate::messages::{
    intent_call, parse_config, parse_position, parse_tile, TileSignal, CALL_POLL_POSITION,
    SIGNAL_CONFIG_CHANGED, SIGNAL_NEW_POSITION, SIGNAL_NEW_TILE,
};

/// Which concerns to bind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BindSet {
    /// Moves out, positions in
    pub position: bool,
    /// Tiles and fov in
    pub tiles: bool,
    /// ROI edits out, ROI and slot in
    pub rois: bool,
}

impl BindSet {
    pub const ALL: BindSet = BindSet {
        position: true,
        tiles: true,
        rois: true,
    };

    pub const NONE: BindSet = BindSet {
        position: false,
        tiles: false,
        rois: false,
    };
}

impl Default for BindSet {
    fn default() -> Self {
        Self::ALL
    }
}

impl From<&BindingSettings> for BindSet {
    fn from(settings: &BindingSettings) -> Self {
        Self {
            position: settings.position,
            tiles: settings.tiles,
            rois: settings.rois,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BindingOptions {
    /// Set the local position as soon as a move is sent
    pub optimistic_position: bool,
}

impl Default for BindingOptions {
    fn default() -> Self {
        Self {
            optimistic_position: true,
        }
    }
}

impl From<&BindingSettings> for BindingOptions {
    fn from(settings: &BindingSettings) -> Self {
        Self {
            optimistic_position: settings.optimistic_position,
        }
    }
}

fn send(channel: &dyn RemoteChannel, name: &str, args: Value) {
    if let Err(e) = channel.call(name, args) {
        error!("Remote call '{}' failed: {}", name, e);
    }
}

/// A live binding between one controller and one channel
///
/// Dropping the binding stops intent forwarding. Signal handlers already
/// registered on the channel stay, but only feed a queue nobody drains.
pub struct RemoteBinding {
    channel: Arc<dyn RemoteChannel>,
    queue: InboundQueue,
    bus: Arc<EventBus>,
    subscription: SubscriptionId,
    set: BindSet,
    options: BindingOptions,
}

impl RemoteBinding {
    /// Bind `channel` to `controller`
    ///
    /// Registers the inbound signal handlers for `set`, then the outbound
    /// intent forwarder, polls the position when positions are bound, and
    /// fetches the remote config. Anything the channel answers with
    /// synchronously is queued; call [`flush`](Self::flush) to apply it.
    pub fn bind<S: RenderSurface>(
        controller: &mut ViewportController<S>,
        channel: Arc<dyn RemoteChannel>,
        set: BindSet,
        options: BindingOptions,
    ) -> Result<Self, ChannelError> {
        let queue = InboundQueue::new();

        if set.position {
            let queue = queue.clone();
            channel.signal(
                SIGNAL_NEW_POSITION,
                Box::new(move |payload| match parse_position(&payload) {
                    Ok(p) => queue.push(StateUpdate::Position(p)),
                    Err(e) => warn!("Dropping message: {}", e),
                }),
            )?;
        }

        if set.rois {
            let queue = queue.clone();
            channel.signal(
                SIGNAL_CONFIG_CHANGED,
                Box::new(move |payload| match parse_config(&payload) {
                    Ok(config) => {
                        match config.montage.roi {
                            Some(roi) => queue.push(StateUpdate::Rois(vec![roi])),
                            None => warn!("Config has no montage ROI"),
                        }
                        if let Some(center) = config.slot_center {
                            queue.push(StateUpdate::Slot(center));
                        }
                    }
                    Err(e) => warn!("Dropping message: {}", e),
                }),
            )?;
        }

        if set.tiles {
            let tile_queue = queue.clone();
            channel.signal(
                SIGNAL_NEW_TILE,
                Box::new(move |payload| match parse_tile(&payload) {
                    Ok(TileSignal::Append(record)) => {
                        tile_queue.push(StateUpdate::TileAcquired(record))
                    }
                    Ok(TileSignal::Clear) => tile_queue.push(StateUpdate::ClearTiles),
                    Err(e) => warn!("Dropping message: {}", e),
                }),
            )?;

            let fov_queue = queue.clone();
            channel.signal(
                SIGNAL_CONFIG_CHANGED,
                Box::new(move |payload| match parse_config(&payload) {
                    Ok(config) => {
                        if let Some(fov) = config.montage.fov {
                            fov_queue.push(StateUpdate::Fov(fov));
                        }
                    }
                    Err(e) => warn!("Dropping message: {}", e),
                }),
            )?;
        }

        let bus = controller.bus().clone();
        let subscription = {
            let channel = channel.clone();
            let queue = queue.clone();
            bus.subscribe(EventFilter::only(EventCategory::Intent), move |event| {
                let ViewerEvent::Intent(intent) = event else {
                    return;
                };
                let forward = match intent {
                    Intent::Move { .. } => set.position,
                    Intent::SetRoi { .. } => set.rois,
                };
                if !forward {
                    return;
                }
                let (name, args) = intent_call(&intent);
                debug!("Forwarding {}", intent.description());
                send(channel.as_ref(), name, args);
                if let Intent::Move { x, y } = intent {
                    if options.optimistic_position {
                        queue.push(StateUpdate::Position(WorldPoint::new(x, y)));
                    }
                }
            })
        };

        if set.position {
            send(channel.as_ref(), CALL_POLL_POSITION, json!([]));
        }
        if let Err(e) = channel.fetch_config() {
            error!("Remote call 'fetch_config' failed: {}", e);
        }

        Ok(Self {
            channel,
            queue,
            bus,
            subscription,
            set,
            options,
        })
    }

    /// Apply queued updates in arrival order; returns how many were applied
    pub fn flush<S: RenderSurface>(&self, controller: &mut ViewportController<S>) -> usize {
        controller.drain(&self.queue)
    }

    /// Updates waiting for [`flush`](Self::flush)
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    pub fn channel(&self) -> &Arc<dyn RemoteChannel> {
        &self.channel
    }

    pub fn set(&self) -> BindSet {
        self.set
    }

    pub fn options(&self) -> BindingOptions {
        self.options
    }
}

impl Drop for RemoteBinding {
    fn drop(&mut self) {
        self.bus.unsubscribe(self.subscription);
    }
}

impl std::fmt::Debug for RemoteBinding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RemoteBinding")
            .field("set", &self.set)
            .field("options", &self.options)
            .field("pending", &self.pending())
            .finish_non_exhaustive()
    }
}
