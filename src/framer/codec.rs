//! Line codec for the serial protocol.
//!
//! Every frame is one ASCII line with a one-letter type prefix:
//!
//! ```text
//! P: <hex bytes>     raw link-layer packet
//! T: <decimal>       test identifier or verdict code
//! D: <anything>      debug output from the DUT, used as a drain marker
//! ```
//!
//! Anything else is transport noise and decodes to `None`.

use once_cell::sync::Lazy;
use regex::Regex;

static PACKET_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^P:\s*([0-9A-Fa-f]+)$").expect("packet line pattern"));
static SIGNAL_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^T:\s*([0-9]+)$").expect("signal line pattern"));
static DRAIN_LINE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^D:").expect("drain line pattern"));

/// A decoded inbound line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Frame {
    /// Raw link-layer packet.
    Packet(Vec<u8>),
    /// Test identifier or verdict code.
    Signal(u32),
    /// Synchronisation marker.
    Drain,
}

/// The variant a caller is waiting for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FrameKind {
    Packet,
    Signal,
    Drain,
}

impl Frame {
    pub fn kind(&self) -> FrameKind {
        match self {
            Self::Packet(_) => FrameKind::Packet,
            Self::Signal(_) => FrameKind::Signal,
            Self::Drain => FrameKind::Drain,
        }
    }
}

impl std::fmt::Display for FrameKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Packet => write!(f, "packet"),
            Self::Signal => write!(f, "signal"),
            Self::Drain => write!(f, "drain"),
        }
    }
}

/// Encode a packet line, without terminator.
pub fn encode_packet(bytes: &[u8]) -> String {
    format!("P: {}", hex::encode_upper(bytes))
}

/// Encode a signal line, without terminator.
pub fn encode_signal(value: u32) -> String {
    format!("T: {value}")
}

/// Decode one line received from the DUT.
///
/// A trailing carriage return is ignored. Returns `None` for anything that is
/// not a well-formed frame: unknown prefixes, odd-length hex, signal values
/// that overflow `u32`.
pub fn decode_line(line: &str) -> Option<Frame> {
    let line = line.strip_suffix('\r').unwrap_or(line);

    if let Some(caps) = PACKET_LINE.captures(line) {
        return hex::decode(&caps[1]).ok().map(Frame::Packet);
    }
    if let Some(caps) = SIGNAL_LINE.captures(line) {
        return caps[1].parse().ok().map(Frame::Signal);
    }
    if DRAIN_LINE.is_match(line) {
        return Some(Frame::Drain);
    }
    None
}

/// Decode raw line bytes; non-UTF-8 garbage is malformed.
pub fn decode_bytes(line: &[u8]) -> Option<Frame> {
    std::str::from_utf8(line).ok().and_then(decode_line)
}
