//! Transport framer.
//!
//! Turns the raw byte channel into blocking-with-timeout frame operations.
//! Waiting is a 1 ms busy-poll against a budget measured from the start of
//! the wait: lines of the wrong kind are discarded without giving time back,
//! so a noisy DUT can exhaust a wait before the wanted frame shows up.
//! Timing-sensitive scenarios rely on this, keep it.
//!
//! A framer without a channel is a dry run: sends do nothing and every wait
//! returns `None` immediately.

pub mod codec;

pub use codec::{decode_bytes, decode_line, encode_packet, encode_signal, Frame, FrameKind};

use crate::port::SerialChannel;
use std::time::{Duration, Instant};
use tracing::{debug, trace, warn};

/// Granularity of the receive poll loop.
pub const POLL_INTERVAL: Duration = Duration::from_millis(1);

/// Target used for the verbose line echo.
pub const WIRE_TARGET: &str = "dut_harness::wire";

/// Frame-level view of the serial channel.
pub struct Framer {
    channel: Option<Box<dyn SerialChannel>>,
    /// Bytes of the line currently being received.
    line: Vec<u8>,
    poll_interval: Duration,
}

impl Framer {
    /// Framer driving the given channel.
    pub fn new(channel: Box<dyn SerialChannel>) -> Self {
        Self {
            channel: Some(channel),
            line: Vec::new(),
            poll_interval: POLL_INTERVAL,
        }
    }

    /// Framer with no transport: every operation is a silent no-op.
    pub fn detached() -> Self {
        Self {
            channel: None,
            line: Vec::new(),
            poll_interval: POLL_INTERVAL,
        }
    }

    /// Override the poll granularity.
    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval.max(Duration::from_micros(100));
        self
    }

    pub fn is_attached(&self) -> bool {
        self.channel.is_some()
    }

    /// Name of the underlying channel, if any.
    pub fn channel_name(&self) -> Option<&str> {
        self.channel.as_deref().map(|c| c.name())
    }

    /// Send a packet line. No acknowledgement is awaited.
    pub fn send_packet(&mut self, bytes: &[u8]) {
        self.send_line(&encode_packet(bytes));
    }

    /// Send a signal line carrying `value`.
    pub fn send_signal(&mut self, value: u32) {
        self.send_line(&encode_signal(value));
    }

    fn send_line(&mut self, line: &str) {
        let Some(channel) = self.channel.as_mut() else {
            return;
        };
        let result = channel
            .write_bytes(line.as_bytes())
            .and_then(|()| channel.write_newline());
        match result {
            Ok(()) => debug!(target: WIRE_TARGET, "> {line}"),
            Err(e) => warn!("write to {} failed, line dropped: {e}", channel.name()),
        }
    }

    /// Wait up to `timeout` for a frame of the given kind.
    ///
    /// Frames of other kinds and malformed lines are discarded. The budget is
    /// wall-clock time since entry, so reading buffered noise uses it up as
    /// much as idle polling does. Returns `None` once it is spent, or
    /// immediately without a channel.
    pub fn await_frame(&mut self, kind: FrameKind, timeout: Duration) -> Option<Frame> {
        let channel = self.channel.as_mut()?;
        let started = Instant::now();
        let expired = || {
            let spent = started.elapsed() >= timeout;
            if spent {
                trace!("no {kind} frame within {timeout:?}");
            }
            spent
        };

        loop {
            match channel.bytes_available() {
                Ok(n) if n > 0 => {}
                Ok(_) => {
                    if expired() {
                        return None;
                    }
                    let remaining = timeout.saturating_sub(started.elapsed());
                    std::thread::sleep(self.poll_interval.min(remaining));
                    continue;
                }
                Err(e) => {
                    warn!("polling {} failed: {e}", channel.name());
                    return None;
                }
            }

            let byte = match channel.read_byte() {
                Ok(byte) => byte,
                Err(e) => {
                    warn!("reading {} failed: {e}", channel.name());
                    return None;
                }
            };
            if byte != b'\n' {
                self.line.push(byte);
                continue;
            }

            let raw = std::mem::take(&mut self.line);
            match decode_bytes(&raw) {
                Some(frame) if frame.kind() == kind => {
                    debug!(target: WIRE_TARGET, "<*{}", String::from_utf8_lossy(&raw));
                    return Some(frame);
                }
                _ => debug!(target: WIRE_TARGET, "< {}", String::from_utf8_lossy(&raw)),
            }
            if expired() {
                return None;
            }
        }
    }

    /// Wait for a packet from the DUT.
    pub fn receive_packet(&mut self, timeout: Duration) -> Option<Vec<u8>> {
        match self.await_frame(FrameKind::Packet, timeout)? {
            Frame::Packet(bytes) => Some(bytes),
            _ => None,
        }
    }

    /// Wait for a signal value from the DUT.
    pub fn await_signal(&mut self, timeout: Duration) -> Option<u32> {
        match self.await_frame(FrameKind::Signal, timeout)? {
            Frame::Signal(value) => Some(value),
            _ => None,
        }
    }

    /// Discard stale frames until a drain marker arrives or `timeout` expires.
    ///
    /// Returns whether a marker was seen.
    pub fn drain(&mut self, timeout: Duration) -> bool {
        self.await_frame(FrameKind::Drain, timeout).is_some()
    }
}

impl std::fmt::Debug for Framer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Framer")
            .field("channel", &self.channel)
            .field("buffered", &self.line.len())
            .field("poll_interval", &self.poll_interval)
            .finish()
    }
}
