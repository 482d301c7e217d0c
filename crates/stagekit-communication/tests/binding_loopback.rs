//! Binding tests against the in-memory channel

use std::sync::Arc;

use serde_json::json;
use stagekit_communication::{
    BindSet, BindingOptions, JsonLinesChannel, LoopbackChannel, RemoteBinding, RemoteChannel,
    SignalHandler, StageSession,
};
use stagekit_core::{ChannelError, Fov, PixelPoint, RoiHandle, WorldPoint};
use stagekit_settings::ViewerConfig;
use stagekit_viewport::{
    Button, ClickMode, Key, KeyEvent, Layer, Modifiers, PointerEvent, SvgSurface,
    ViewportController,
};

const CENTER: PixelPoint = PixelPoint { x: 300.0, y: 300.0 };

fn remote_config() -> serde_json::Value {
    json!({
        "montage": {
            "roi": {"left": -100000, "right": 100000, "top": -50000, "bottom": 50000},
            "fov": [20000, 10000]
        },
        "slot_center": {"x": 0, "y": 0}
    })
}

fn session() -> StageSession<SvgSurface> {
    let controller = ViewportController::new(&ViewerConfig::default(), SvgSurface::new()).unwrap();
    StageSession::new(controller)
}

fn click(button: Button) -> PointerEvent {
    PointerEvent::Down {
        pos: CENTER,
        button,
        modifiers: Modifiers::NONE,
    }
}

#[test]
fn test_bind_polls_then_fetches_config() {
    let channel = Arc::new(LoopbackChannel::new().with_config(remote_config()));
    let mut session = session();
    session
        .bind(channel.clone(), BindSet::ALL, BindingOptions::default())
        .unwrap();

    assert_eq!(channel.call_names(), vec!["poll_position", "fetch_config"]);

    let state = session.controller().state();
    assert_eq!(state.fov(), Fov::new(20000.0, 10000.0));
    assert_eq!(state.rois().len(), 1);
    assert_eq!(state.slot(), Some(WorldPoint::new(0.0, 0.0)));
    assert_eq!(session.controller().surface().layer(Layer::Rois).len(), 1);
}

#[test]
fn test_move_is_forwarded_and_optimistic() {
    let channel = Arc::new(LoopbackChannel::new());
    let mut session = session();
    session
        .bind(channel.clone(), BindSet::ALL, BindingOptions::default())
        .unwrap();
    channel.clear_calls();

    session.handle_pointer(click(Button::Primary));
    let calls = channel.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].name, "move");
    assert_eq!(calls[0].args, json!([0.0, 0.0]));
    assert_eq!(
        session.controller().state().position(),
        Some(WorldPoint::new(0.0, 0.0))
    );
}

#[test]
fn test_without_optimistic_position_waits_for_remote() {
    let channel = Arc::new(LoopbackChannel::new());
    let mut session = session();
    session
        .bind(
            channel.clone(),
            BindSet::ALL,
            BindingOptions {
                optimistic_position: false,
            },
        )
        .unwrap();

    session.handle_pointer(click(Button::Primary));
    assert_eq!(session.controller().state().position(), None);

    session.receive(|| channel.deliver("new_position", json!({"x": 5, "y": 6})));
    assert_eq!(
        session.controller().state().position(),
        Some(WorldPoint::new(5.0, 6.0))
    );
}

#[test]
fn test_set_roi_forwarded_only_when_bound() {
    let channel = Arc::new(LoopbackChannel::new());
    let mut session = session();
    session
        .bind(
            channel.clone(),
            BindSet {
                position: true,
                tiles: false,
                rois: false,
            },
            BindingOptions::default(),
        )
        .unwrap();
    channel.clear_calls();

    session.set_click_mode(ClickMode::EditRoi(RoiHandle::Left));
    let intents = session.handle_pointer(click(Button::Primary));
    assert_eq!(intents.len(), 1);
    assert!(channel.calls().is_empty());
}

#[test]
fn test_set_roi_call_shape() {
    let channel = Arc::new(LoopbackChannel::new());
    let mut session = session();
    session
        .bind(channel.clone(), BindSet::ALL, BindingOptions::default())
        .unwrap();
    channel.clear_calls();

    session.set_click_mode(ClickMode::EditRoi(RoiHandle::BottomLeft));
    session.handle_pointer(click(Button::Primary));
    let calls = channel.calls();
    assert_eq!(calls[0].name, "set_roi");
    assert_eq!(calls[0].args, json!(["bottom_left", 0.0, 0.0]));
    // ROI edits do not move the local position
    assert_eq!(session.controller().state().position(), None);
}

#[test]
fn test_tiles_append_and_clear() {
    let channel = Arc::new(LoopbackChannel::new());
    let mut session = session();
    session
        .bind(channel.clone(), BindSet::ALL, BindingOptions::default())
        .unwrap();

    for x in [0, 1000] {
        session.receive(|| {
            channel.deliver(
                "new_tile.connect",
                json!([[{"meta": {"x": x, "y": 0}, "vetoed": false}]]),
            )
        });
    }
    let state = session.controller().state();
    assert_eq!(state.tiles().len(), 2);
    assert_eq!(state.position(), Some(WorldPoint::new(1000.0, 0.0)));

    session.receive(|| channel.deliver("new_tile.connect", json!([[[]]])));
    assert!(session.controller().state().tiles().is_empty());
    assert!(session
        .controller()
        .surface()
        .layer(Layer::Tiles)
        .is_empty());
}

#[test]
fn test_malformed_messages_are_dropped() {
    let channel = Arc::new(LoopbackChannel::new());
    let mut session = session();
    session
        .bind(channel.clone(), BindSet::ALL, BindingOptions::default())
        .unwrap();

    session.receive(|| channel.deliver("new_position", json!("nowhere")));
    session.receive(|| channel.deliver("config_changed", json!([])));
    session.receive(|| channel.deliver("new_tile.connect", json!({})));
    let state = session.controller().state();
    assert_eq!(state.position(), None);
    assert!(state.rois().is_empty());
    assert!(state.tiles().is_empty());
}

#[test]
fn test_transport_failure_is_logged_not_fatal() {
    let channel = Arc::new(LoopbackChannel::new());
    let mut session = session();
    session
        .bind(channel.clone(), BindSet::ALL, BindingOptions::default())
        .unwrap();
    channel.close();

    let intents = session.handle_pointer(click(Button::Primary));
    assert_eq!(intents.len(), 1);
    // Optimistic update still applies
    assert!(session.controller().state().position().is_some());
}

#[test]
fn test_arrow_keys_go_out_as_moves() {
    let channel = Arc::new(LoopbackChannel::new().with_config(remote_config()));
    let mut session = session();
    session
        .bind(channel.clone(), BindSet::ALL, BindingOptions::default())
        .unwrap();
    session.receive(|| channel.deliver("new_position", json!({"x": 0, "y": 0})));
    channel.clear_calls();

    session.handle_key(KeyEvent::new(Key::ArrowRight, Modifiers::NONE));
    session.handle_key(KeyEvent::new(Key::ArrowRight, Modifiers::NONE));
    let args: Vec<_> = channel.calls().into_iter().map(|c| c.args).collect();
    assert_eq!(args, vec![json!([20000.0, 0.0]), json!([40000.0, 0.0])]);
}

#[test]
fn test_json_lines_round_trip() {
    let channel = Arc::new(JsonLinesChannel::new(Vec::<u8>::new()));
    let mut session = session();
    session
        .bind(channel.clone(), BindSet::ALL, BindingOptions::default())
        .unwrap();

    let ran = session
        .receive(|| channel.dispatch_line(r#"{"signal":"new_position","payload":{"x":7,"y":8}}"#))
        .unwrap();
    assert_eq!(ran, 1);
    assert_eq!(
        session.controller().state().position(),
        Some(WorldPoint::new(7.0, 8.0))
    );

    let out = channel
        .with_writer(|w| String::from_utf8(w.clone()).unwrap())
        .unwrap();
    let names: Vec<String> = out
        .lines()
        .map(|l| serde_json::from_str::<serde_json::Value>(l).unwrap()["call"].to_string())
        .collect();
    assert_eq!(names, vec!["\"poll_position\"", "\"fetch_config\""]);
    assert!(channel.call("move", json!([1, 2])).is_ok());
}

/// Records calls but refuses to register one signal
struct RefusingChannel {
    refuse: &'static str,
    calls: parking_lot::Mutex<Vec<String>>,
}

impl RemoteChannel for RefusingChannel {
    fn call(&self, name: &str, _args: serde_json::Value) -> Result<(), ChannelError> {
        self.calls.lock().push(name.to_string());
        Ok(())
    }

    fn signal(&self, name: &str, _handler: SignalHandler) -> Result<(), ChannelError> {
        if name == self.refuse {
            return Err(ChannelError::Closed);
        }
        Ok(())
    }
}

#[test]
fn test_dropped_binding_stops_forwarding() {
    let mut controller =
        ViewportController::new(&ViewerConfig::default(), SvgSurface::new()).unwrap();
    let channel = Arc::new(LoopbackChannel::new());
    let binding = RemoteBinding::bind(
        &mut controller,
        channel.clone(),
        BindSet::ALL,
        BindingOptions::default(),
    )
    .unwrap();
    assert_eq!(controller.bus().subscriber_count(), 1);

    drop(binding);
    channel.clear_calls();
    controller.handle_pointer(click(Button::Primary));

    assert!(channel.calls().is_empty());
    assert_eq!(controller.bus().subscriber_count(), 0);
}

#[test]
fn test_failed_bind_leaves_no_forwarder() {
    let mut controller =
        ViewportController::new(&ViewerConfig::default(), SvgSurface::new()).unwrap();
    let channel = Arc::new(RefusingChannel {
        refuse: "new_tile.connect",
        calls: parking_lot::Mutex::new(Vec::new()),
    });

    let result = RemoteBinding::bind(
        &mut controller,
        channel.clone(),
        BindSet::ALL,
        BindingOptions::default(),
    );
    assert!(matches!(result, Err(ChannelError::Closed)));
    assert_eq!(controller.bus().subscriber_count(), 0);

    controller.handle_pointer(click(Button::Primary));
    assert!(channel.calls.lock().is_empty());
}

#[test]
fn test_host_updates_apply_after_queued_remote_updates() {
    let channel = Arc::new(LoopbackChannel::new());
    let mut session = session();
    session
        .bind(channel.clone(), BindSet::ALL, BindingOptions::default())
        .unwrap();

    channel.deliver("new_position", json!({"x": 5000, "y": -5000}));
    session.apply(stagekit_viewport::StateUpdate::ImageAvailable {
        src: "thumb.png".to_string(),
        center: None,
        size: None,
    });

    let state = session.controller().state();
    assert_eq!(state.position(), Some(WorldPoint::new(5000.0, -5000.0)));
    let image = state.images().iter().next().unwrap();
    assert_eq!(image.src, "thumb.png");
    assert_eq!(session.controller().surface().layer(Layer::Images).len(), 1);
}
