use std::io::Write;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, trace};

use stagekit_core::{ChannelError, MessageError};

use super::{RemoteChannel, SignalHandler, SignalRegistry};

#[derive(Debug, Serialize)]
struct CallFrame<'a> {
    call: &'a str,
    args: &'a Value,
}

#[derive(Debug, Deserialize)]
struct SignalFrame {
    signal: String,
    #[serde(default)]
    payload: Value,
}

/// Newline-delimited JSON channel over any writer
///
/// Each call is written as `{"call": name, "args": [...]}` on its own line.
/// Inbound lines of the form `{"signal": name, "payload": ...}` are handed
/// to [`JsonLinesChannel::dispatch_line`] by whoever reads the transport.
#[derive(Debug)]
pub struct JsonLinesChannel<W: Write + Send> {
    writer: Mutex<Option<W>>,
    registry: SignalRegistry,
}

impl<W: Write + Send> JsonLinesChannel<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer: Mutex::new(Some(writer)),
            registry: SignalRegistry::new(),
        }
    }

    /// Parse one inbound line and run its handlers
    ///
    /// Blank lines are skipped. Returns how many handlers ran.
    pub fn dispatch_line(&self, line: &str) -> Result<usize, MessageError> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(0);
        }
        let frame: SignalFrame =
            serde_json::from_str(line).map_err(|e| MessageError::InvalidFrame(e.to_string()))?;
        trace!("Inbound signal '{}'", frame.signal);
        Ok(self.registry.dispatch(&frame.signal, &frame.payload))
    }

    /// Stop writing; later calls fail with [`ChannelError::Closed`]
    pub fn close(&self) -> Option<W> {
        self.writer.lock().take()
    }

    pub fn is_closed(&self) -> bool {
        self.writer.lock().is_none()
    }

    /// Run `f` against the writer, if still open
    pub fn with_writer<R>(&self, f: impl FnOnce(&mut W) -> R) -> Option<R> {
        self.writer.lock().as_mut().map(f)
    }
}

impl<W: Write + Send> RemoteChannel for JsonLinesChannel<W> {
    fn call(&self, name: &str, args: Value) -> Result<(), ChannelError> {
        let mut guard = self.writer.lock();
        let writer = guard.as_mut().ok_or(ChannelError::Closed)?;

        let send_failed = |reason: String| ChannelError::SendFailed {
            name: name.to_string(),
            reason,
        };
        let mut line = serde_json::to_string(&CallFrame { call: name, args: &args })
            .map_err(|e| send_failed(e.to_string()))?;
        line.push('\n');
        writer
            .write_all(line.as_bytes())
            .and_then(|_| writer.flush())
            .map_err(|e| send_failed(e.to_string()))?;
        debug!("Sent '{}'", name);
        Ok(())
    }

    fn signal(&self, name: &str, handler: SignalHandler) -> Result<(), ChannelError> {
        self.registry.register(name, handler);
        Ok(())
    }
}
