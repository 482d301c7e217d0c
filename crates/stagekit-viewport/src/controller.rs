//! Viewport controller
//!
//! Owns the mapper, the snapshot, the gesture machine, and a render surface,
//! and keeps the surface in sync with all three. Intents produced by input
//! are published on the controller's [`EventBus`] so a remote binding can
//! forward them; remote updates come back in through an [`InboundQueue`]
//! drained by [`ViewportController::drain`].

use std::sync::Arc;

use tracing::{debug, warn};

use stagekit_core::{
    EventBus, Fov, Intent, MapperError, Rect, StateEvent, TileRecord, ViewEvent, ViewerEvent,
    WorldPoint,
};
use stagekit_settings::{InteractionSettings, SlotSettings, ViewerConfig};

use crate::inbound::InboundQueue;
use crate::interaction::{
    Action, ClickMode, GesturePolicy, InteractionContext, InteractionMachine, KeyEvent,
    PointerEvent,
};
use crate::mapper::{CoordinateMapper, PanMode, ResizeRequest, ZoomDirection};
use crate::render::{Layer, RenderSurface, Shape, ShapeKind};
use crate::state::ViewportState;

/// Radius of the position marker, in pixels
pub const POSITION_MARKER_RADIUS: f64 = 4.0;

/// A change to the snapshot, usually from the remote side
#[derive(Debug, Clone, PartialEq)]
pub enum StateUpdate {
    Position(WorldPoint),
    Rois(Vec<Rect>),
    /// Slot centre
    Slot(WorldPoint),
    TileAcquired(TileRecord),
    ClearTiles,
    /// A thumbnail; missing centre or size fall back to position and fov
    ImageAvailable {
        src: String,
        center: Option<WorldPoint>,
        size: Option<(f64, f64)>,
    },
    ClearImages,
    Fov(Fov),
}

pub struct ViewportController<S: RenderSurface> {
    mapper: CoordinateMapper,
    state: ViewportState,
    machine: InteractionMachine,
    surface: S,
    bus: Arc<EventBus>,
    interaction: InteractionSettings,
    slot: SlotSettings,
    images_suppressed: bool,
}

impl<S: RenderSurface> ViewportController<S> {
    /// Build a controller and draw the empty viewport
    pub fn new(config: &ViewerConfig, surface: S) -> Result<Self, MapperError> {
        let mapper = CoordinateMapper::from_settings(&config.canvas, &config.axis)?;
        let mut controller = Self {
            mapper,
            state: ViewportState::new(
                config.interaction.default_fov,
                config.buffers.image_capacity,
            ),
            machine: InteractionMachine::new(GesturePolicy::from(&config.interaction)),
            surface,
            bus: Arc::new(EventBus::new()),
            interaction: config.interaction.clone(),
            slot: config.slot.clone(),
            images_suppressed: false,
        };
        controller.redraw();
        Ok(controller)
    }

    pub fn state(&self) -> &ViewportState {
        &self.state
    }

    pub fn mapper(&self) -> &CoordinateMapper {
        &self.mapper
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn bus(&self) -> &Arc<EventBus> {
        &self.bus
    }

    pub fn machine(&self) -> &InteractionMachine {
        &self.machine
    }

    pub fn click_mode(&self) -> ClickMode {
        self.machine.mode()
    }

    pub fn set_click_mode(&mut self, mode: ClickMode) {
        debug!("Click mode: {:?}", mode);
        self.machine.set_mode(mode);
    }

    /// Pick up changed interaction, axis, buffer, and slot settings
    pub fn configure(&mut self, config: &ViewerConfig) {
        self.interaction = config.interaction.clone();
        self.slot = config.slot.clone();
        self.machine
            .set_policy(GesturePolicy::from(&config.interaction));
        self.mapper
            .set_tick_format(config.axis.tick_count, config.axis.tick_divisor);
        let evicted = self
            .state
            .set_image_capacity(config.buffers.image_capacity);
        if !evicted.is_empty() {
            debug!("Capacity change evicted {} images", evicted.len());
        }
        self.redraw();
    }

    /// Change domains, extent, or margins and replay the snapshot
    pub fn resize(&mut self, request: ResizeRequest) -> Result<(), MapperError> {
        self.mapper.resize(request)?;
        self.images_suppressed = false;
        self.redraw();
        self.publish(ViewerEvent::View(ViewEvent::Resized {
            width: self.mapper.width(),
            height: self.mapper.height(),
        }));
        Ok(())
    }

    /// Feed one pointer event; returns the intents it produced
    pub fn handle_pointer(&mut self, event: PointerEvent) -> Vec<Intent> {
        let ctx = InteractionContext {
            mapper: &self.mapper,
            position: self.state.position(),
            fov: self.state.fov(),
        };
        let actions = self.machine.handle_pointer(event, &ctx);
        let intents = self.perform(actions);

        if matches!(event, PointerEvent::Up { .. }) && self.images_suppressed {
            self.images_suppressed = false;
            self.draw_images();
        }
        intents
    }

    /// Feed one key event; returns the intents it produced
    pub fn handle_key(&mut self, event: KeyEvent) -> Vec<Intent> {
        let ctx = InteractionContext {
            mapper: &self.mapper,
            position: self.state.position(),
            fov: self.state.fov(),
        };
        let actions = self.machine.handle_key(event, &ctx);
        self.perform(actions)
    }

    fn perform(&mut self, actions: Vec<Action>) -> Vec<Intent> {
        let mut intents = Vec::new();
        for action in actions {
            match action {
                Action::Emit(intent) => {
                    self.publish(ViewerEvent::Intent(intent));
                    intents.push(intent);
                }
                Action::Zoom(direction) => {
                    if let Err(e) = self.zoom(direction) {
                        warn!("Zoom rejected: {}", e);
                    }
                }
                Action::Pan { dx, dy, mode } => {
                    if let Err(e) = self.pan(dx, dy, mode) {
                        warn!("Pan rejected: {}", e);
                    }
                }
            }
        }
        intents
    }

    /// Scale both domains about their centres
    pub fn zoom(&mut self, direction: ZoomDirection) -> Result<(), MapperError> {
        let factor = match direction {
            ZoomDirection::In => self.interaction.zoom_in_factor,
            ZoomDirection::Out => self.interaction.zoom_out_factor,
        };
        let (x_domain, y_domain) = self.mapper.zoomed_domains(factor);
        self.mapper
            .resize(ResizeRequest::domains(x_domain, y_domain))?;
        self.images_suppressed = false;
        self.redraw();
        self.publish(ViewerEvent::View(ViewEvent::Zoomed {
            x_span: x_domain[1] - x_domain[0],
            y_span: y_domain[1] - y_domain[0],
        }));
        Ok(())
    }

    /// Translate both domains by a pixel delta
    ///
    /// A provisional pan leaves the image layer empty on the surface until
    /// the next full redraw; the image window itself is untouched.
    pub fn pan(&mut self, dx: f64, dy: f64, mode: PanMode) -> Result<(), MapperError> {
        let (x_domain, y_domain) = self.mapper.panned_domains(dx, dy);
        self.mapper
            .resize(ResizeRequest::domains(x_domain, y_domain))?;
        self.images_suppressed = mode == PanMode::Provisional;
        self.redraw();
        self.publish(ViewerEvent::View(ViewEvent::Panned {
            dx,
            dy,
            provisional: mode == PanMode::Provisional,
        }));
        Ok(())
    }

    /// Apply everything waiting in `queue`, oldest first; returns the count
    pub fn drain(&mut self, queue: &InboundQueue) -> usize {
        let updates = queue.take();
        let count = updates.len();
        for update in updates {
            self.apply(update);
        }
        count
    }

    /// Change the snapshot and redraw what it affects
    pub(crate) fn apply(&mut self, update: StateUpdate) {
        match update {
            StateUpdate::Position(p) => {
                self.state.set_position(p);
                self.draw_position();
                self.publish(ViewerEvent::State(StateEvent::PositionChanged { x: p.x, y: p.y }));
            }
            StateUpdate::Rois(rois) => {
                let count = rois.len();
                self.state.set_rois(rois);
                self.draw_rois();
                self.publish(ViewerEvent::State(StateEvent::RoisChanged { count }));
            }
            StateUpdate::Slot(center) => {
                self.state.set_slot(center);
                self.draw_slot();
            }
            StateUpdate::TileAcquired(record) => {
                let index = self.state.push_tile(record);
                self.draw_tiles(false);
                self.draw_position();
                self.publish(ViewerEvent::State(StateEvent::TileAppended { index }));
            }
            StateUpdate::ClearTiles => {
                self.state.clear_tiles();
                self.draw_tiles(false);
                self.publish(ViewerEvent::State(StateEvent::TrailCleared));
            }
            StateUpdate::ImageAvailable { src, center, size } => {
                match self.state.push_image(src, center, size) {
                    Some((index, evicted)) => {
                        if !self.images_suppressed {
                            self.draw_images();
                        }
                        self.publish(ViewerEvent::State(StateEvent::ImageAppended {
                            index,
                            evicted: evicted.len(),
                        }));
                    }
                    None => warn!("Dropping image without a centre or known position"),
                }
            }
            StateUpdate::ClearImages => {
                self.state.clear_images();
                self.draw_images();
            }
            StateUpdate::Fov(fov) => {
                self.state.set_fov(fov);
                self.draw_position();
                self.draw_tiles(true);
                self.publish(ViewerEvent::State(StateEvent::FovChanged {
                    width: fov.width,
                    height: fov.height,
                }));
            }
        }
    }

    fn publish(&self, event: ViewerEvent) {
        let description = event.description();
        if self.bus.publish(event) == 0 {
            debug!("No listeners for: {}", description);
        }
    }

    /// Replay the whole snapshot onto the surface
    fn redraw(&mut self) {
        let frame = self.mapper.frame();
        self.surface.set_frame(&frame);
        self.surface.set_axes(self.mapper.ticks(), &frame);
        self.draw_position();
        self.draw_tiles(true);
        self.draw_rois();
        self.draw_slot();
        if self.images_suppressed {
            self.surface.clear_layer(Layer::Images);
        } else {
            self.draw_images();
        }
    }

    /// Canvas rectangle for a world rectangle given by its top-left corner
    fn world_rect(&self, left: f64, top: f64, width: f64, height: f64) -> (f64, f64, f64, f64) {
        let corner = self.mapper.world_to_canvas(WorldPoint::new(left, top));
        (
            corner.x,
            corner.y,
            self.mapper.length_x(width),
            self.mapper.length_y(height),
        )
    }

    fn centered_rect(&self, center: WorldPoint, width: f64, height: f64) -> (f64, f64, f64, f64) {
        self.world_rect(center.x - width / 2.0, center.y - height / 2.0, width, height)
    }

    fn draw_position(&mut self) {
        let Some(position) = self.state.position() else {
            self.surface.clear_layer(Layer::Position);
            return;
        };
        let fov = self.state.fov();
        let marker = self.mapper.world_to_canvas(position);
        let (x, y, width, height) = self.centered_rect(position, fov.width, fov.height);
        let shapes = vec![
            Shape::new(
                "fov",
                "fov",
                ShapeKind::Rect {
                    x,
                    y,
                    width,
                    height,
                    rx: 0.0,
                    ry: 0.0,
                    stroke: None,
                },
            ),
            Shape::new(
                "position",
                "position",
                ShapeKind::Circle {
                    cx: marker.x,
                    cy: marker.y,
                    r: POSITION_MARKER_RADIUS,
                },
            ),
        ];
        self.surface.join(Layer::Position, shapes, true);
    }

    fn draw_tiles(&mut self, update_existing: bool) {
        let fov = self.state.fov();
        let shapes = self
            .state
            .tiles()
            .tiles()
            .iter()
            .map(|tile| {
                let center = WorldPoint::new(tile.meta.x, tile.meta.y);
                let (x, y, width, height) = self.centered_rect(center, fov.width, fov.height);
                Shape::new(
                    tile.index.to_string(),
                    "tile",
                    ShapeKind::Rect {
                        x,
                        y,
                        width,
                        height,
                        rx: 0.0,
                        ry: 0.0,
                        stroke: Some(tile.stroke()),
                    },
                )
            })
            .collect();
        self.surface.join(Layer::Tiles, shapes, update_existing);
    }

    fn draw_rois(&mut self) {
        let mut shapes = Vec::new();
        for (i, roi) in self.state.rois().iter().enumerate() {
            match roi.resolve_bounds() {
                Ok(Some(b)) => {
                    let (x, y, width, height) = self.world_rect(b.left, b.top, b.width, b.height);
                    shapes.push(Shape::new(
                        i.to_string(),
                        "roi",
                        ShapeKind::Rect {
                            x,
                            y,
                            width,
                            height,
                            rx: 0.0,
                            ry: 0.0,
                            stroke: None,
                        },
                    ));
                }
                Ok(None) => debug!("ROI {} is underconstrained, not drawn", i),
                Err(e) => warn!("ROI {} not drawn: {}", i, e),
            }
        }
        self.surface.join(Layer::Rois, shapes, true);
    }

    fn draw_slot(&mut self) {
        let Some(center) = self.state.slot() else {
            self.surface.clear_layer(Layer::Slot);
            return;
        };
        let (x, y, width, height) = self.centered_rect(center, self.slot.width, self.slot.height);
        let shape = Shape::new(
            "slot",
            "slot",
            ShapeKind::Rect {
                x,
                y,
                width,
                height,
                rx: self.mapper.length_x(self.slot.corner_radius),
                ry: self.mapper.length_y(self.slot.corner_radius),
                stroke: None,
            },
        );
        self.surface.join(Layer::Slot, vec![shape], true);
    }

    fn draw_images(&mut self) {
        let shapes = self
            .state
            .images()
            .iter()
            .map(|entry| {
                let (x, y, width, height) = self.world_rect(entry.x, entry.y, entry.w, entry.h);
                Shape::new(
                    entry.index.to_string(),
                    "image",
                    ShapeKind::Image {
                        x,
                        y,
                        width,
                        height,
                        href: entry.src.clone(),
                    },
                )
            })
            .collect();
        self.surface.join(Layer::Images, shapes, true);
    }
}

impl<S: RenderSurface + std::fmt::Debug> std::fmt::Debug for ViewportController<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ViewportController")
            .field("mapper", &self.mapper)
            .field("state", &self.state)
            .field("machine", &self.machine)
            .field("surface", &self.surface)
            .finish_non_exhaustive()
    }
}
