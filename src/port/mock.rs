//! Mock serial channel for testing.
//!
//! `MockSerialPort` plays the device under test without hardware: bytes can
//! be queued for immediate or delayed delivery, every written line is logged,
//! and replies can be scripted to fire when the host writes a given line.

use super::error::PortError;
use super::traits::SerialChannel;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// A chunk of bytes that becomes readable at `ready_at`.
#[derive(Debug)]
struct Delivery {
    ready_at: Instant,
    bytes: VecDeque<u8>,
}

/// A reply released once the host writes `trigger` as a full line.
#[derive(Debug)]
struct Rule {
    trigger: String,
    delay: Duration,
    reply: Vec<u8>,
}

#[derive(Debug, Default)]
struct MockPortState {
    /// Pending inbound deliveries, in arrival order.
    inbound: VecDeque<Delivery>,
    /// Bytes written by the host that do not yet form a full line.
    partial_line: Vec<u8>,
    /// Every complete line written by the host, without the terminator.
    written_lines: Vec<String>,
    /// Scripted replies, consumed first-match-first.
    rules: Vec<Rule>,
}

impl MockPortState {
    fn push(&mut self, delay: Duration, data: &[u8]) {
        // An empty chunk at the front would hide the ones behind it.
        if data.is_empty() {
            return;
        }
        // Later deliveries never overtake earlier ones.
        let mut ready_at = Instant::now() + delay;
        if let Some(last) = self.inbound.back() {
            ready_at = ready_at.max(last.ready_at);
        }
        self.inbound.push_back(Delivery {
            ready_at,
            bytes: data.iter().copied().collect(),
        });
    }

    fn ready_bytes(&self, now: Instant) -> usize {
        self.inbound
            .iter()
            .take_while(|d| d.ready_at <= now)
            .map(|d| d.bytes.len())
            .sum()
    }

    fn line_completed(&mut self, line: String) {
        if let Some(pos) = self.rules.iter().position(|r| r.trigger == line) {
            let rule = self.rules.remove(pos);
            self.push(rule.delay, &rule.reply);
        }
        self.written_lines.push(line);
    }
}

/// Mock serial channel.
///
/// Clones share state, so a test can hand one clone to the framer and keep
/// another to script the DUT and inspect what the host sent.
///
/// # Example
/// ```
/// use dut_harness::port::{MockSerialPort, SerialChannel};
///
/// let mut port = MockSerialPort::new("MOCK0");
/// port.enqueue_read(b"T: 0\n");
/// assert_eq!(port.bytes_available().unwrap(), 5);
/// assert_eq!(port.read_byte().unwrap(), b'T');
///
/// port.write_bytes(b"T: 17").unwrap();
/// port.write_newline().unwrap();
/// assert_eq!(port.written_lines(), vec!["T: 17".to_string()]);
/// ```
#[derive(Clone)]
pub struct MockSerialPort {
    name: String,
    state: Arc<Mutex<MockPortState>>,
}

impl MockSerialPort {
    /// Create a new mock channel with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            state: Arc::new(Mutex::new(MockPortState::default())),
        }
    }

    /// Queue bytes that are readable immediately.
    pub fn enqueue_read(&mut self, data: &[u8]) {
        self.state.lock().push(Duration::ZERO, data);
    }

    /// Queue bytes that become readable after `delay`.
    pub fn enqueue_read_after(&mut self, delay: Duration, data: &[u8]) {
        self.state.lock().push(delay, data);
    }

    /// Queue a full line (terminator appended) after `delay`.
    pub fn enqueue_line_after(&mut self, delay: Duration, line: &str) {
        let mut data = line.as_bytes().to_vec();
        data.push(b'\n');
        self.enqueue_read_after(delay, &data);
    }

    /// Deliver `reply` `delay` after the host writes exactly `trigger`.
    ///
    /// Each rule fires once; rules with the same trigger fire in the order
    /// they were added.
    pub fn respond_to(&mut self, trigger: impl Into<String>, delay: Duration, reply: &[u8]) {
        self.state.lock().rules.push(Rule {
            trigger: trigger.into(),
            delay,
            reply: reply.to_vec(),
        });
    }

    /// Deliver the line `reply` `delay` after the host writes `trigger`.
    pub fn respond_line_to(&mut self, trigger: impl Into<String>, delay: Duration, reply: &str) {
        let mut data = reply.as_bytes().to_vec();
        data.push(b'\n');
        self.respond_to(trigger, delay, &data);
    }

    /// Every complete line written so far.
    pub fn written_lines(&self) -> Vec<String> {
        self.state.lock().written_lines.clone()
    }

    /// Forget the write log.
    pub fn clear_written(&mut self) {
        let mut state = self.state.lock();
        state.written_lines.clear();
        state.partial_line.clear();
    }

    /// Number of queued inbound bytes, ready or not.
    pub fn pending_bytes(&self) -> usize {
        self.state
            .lock()
            .inbound
            .iter()
            .map(|d| d.bytes.len())
            .sum()
    }

    /// Number of scripted replies that have not fired yet.
    pub fn pending_rules(&self) -> usize {
        self.state.lock().rules.len()
    }
}

impl SerialChannel for MockSerialPort {
    fn bytes_available(&self) -> Result<usize, PortError> {
        Ok(self.state.lock().ready_bytes(Instant::now()))
    }

    fn read_byte(&mut self) -> Result<u8, PortError> {
        let mut state = self.state.lock();
        let now = Instant::now();

        let front = match state.inbound.front_mut() {
            Some(d) if d.ready_at <= now => d,
            _ => return Err(PortError::empty(&self.name)),
        };
        let byte = front.bytes.pop_front();
        if front.bytes.is_empty() {
            state.inbound.pop_front();
        }
        byte.ok_or_else(|| PortError::empty(&self.name))
    }

    fn write_bytes(&mut self, data: &[u8]) -> Result<(), PortError> {
        let mut state = self.state.lock();
        for &byte in data {
            if byte == b'\n' {
                let line = String::from_utf8_lossy(&state.partial_line).into_owned();
                state.partial_line.clear();
                state.line_completed(line);
            } else {
                state.partial_line.push(byte);
            }
        }
        Ok(())
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl std::fmt::Debug for MockSerialPort {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockSerialPort")
            .field("name", &self.name)
            .field("pending_bytes", &self.pending_bytes())
            .finish()
    }
}
