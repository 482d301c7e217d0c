//! # StageKit Communication
//!
//! Remote command channels and the binding that connects them to a
//! viewport controller.
//!
//! - [`RemoteChannel`]: named calls out, named signals in
//! - [`LoopbackChannel`] for tests and headless hosts
//! - [`JsonLinesChannel`] for newline-delimited JSON transports
//! - [`RemoteBinding`] and [`StageSession`] to wire it all up

pub mod binding;
pub mod channel;
pub mod messages;
pub mod session;

pub use binding::{BindSet, BindingOptions, RemoteBinding};
pub use channel::{JsonLinesChannel, LoopbackChannel, RecordedCall, RemoteChannel, SignalHandler};
pub use messages::{ConfigSnapshot, MontageConfig, TileSignal};
pub use session::StageSession;
