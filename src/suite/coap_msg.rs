//! Minimal CoAP (RFC 7252) message view.
//!
//! Enough to check header fields, token, payload marker and payload of
//! messages the DUT emits, and to build the acknowledgements and responses
//! the scenarios send back. Option values are kept opaque.

use thiserror::Error;

pub const COAP_VERSION: u8 = 1;
const PAYLOAD_MARKER: u8 = 0xff;

/// Request/response codes used by the scenarios, as `class << 5 | detail`.
pub mod codes {
    pub const EMPTY: u8 = 0x00;
    pub const POST: u8 = 0x02;
    pub const CREATED: u8 = 0x41;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageType {
    Confirmable = 0,
    NonConfirmable = 1,
    Acknowledgement = 2,
    Reset = 3,
}

impl MessageType {
    fn from_bits(bits: u8) -> Self {
        match bits & 0x03 {
            0 => Self::Confirmable,
            1 => Self::NonConfirmable,
            2 => Self::Acknowledgement,
            _ => Self::Reset,
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoapError {
    #[error("message shorter than its header ({0} bytes)")]
    Truncated(usize),
    #[error("token length {0} is reserved")]
    BadTokenLength(u8),
    #[error("malformed option at offset {0}")]
    BadOption(usize),
    #[error("payload marker without payload")]
    EmptyPayload,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoapOption {
    pub number: u16,
    pub value: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoapMessage {
    pub version: u8,
    pub mtype: MessageType,
    pub code: u8,
    pub message_id: u16,
    pub token: Vec<u8>,
    pub options: Vec<CoapOption>,
    /// `Some` only when a payload marker was present.
    pub payload: Option<Vec<u8>>,
}

impl CoapMessage {
    /// A message without options or payload.
    pub fn new(mtype: MessageType, code: u8, message_id: u16, token: &[u8]) -> Self {
        Self {
            version: COAP_VERSION,
            mtype,
            code,
            message_id,
            token: token.to_vec(),
            options: Vec::new(),
            payload: None,
        }
    }

    pub fn with_payload(mut self, payload: &[u8]) -> Self {
        self.payload = Some(payload.to_vec());
        self
    }

    pub fn parse(bytes: &[u8]) -> Result<Self, CoapError> {
        if bytes.len() < 4 {
            return Err(CoapError::Truncated(bytes.len()));
        }
        let version = bytes[0] >> 6;
        let mtype = MessageType::from_bits(bytes[0] >> 4);
        let tkl = bytes[0] & 0x0f;
        if tkl > 8 {
            return Err(CoapError::BadTokenLength(tkl));
        }
        let code = bytes[1];
        let message_id = u16::from_be_bytes([bytes[2], bytes[3]]);

        let token_end = 4 + usize::from(tkl);
        let token = bytes
            .get(4..token_end)
            .ok_or(CoapError::Truncated(bytes.len()))?
            .to_vec();

        let mut options = Vec::new();
        let mut number = 0u16;
        let mut pos = token_end;
        let mut payload = None;
        while pos < bytes.len() {
            let head = bytes[pos];
            if head == PAYLOAD_MARKER {
                let rest = &bytes[pos + 1..];
                if rest.is_empty() {
                    return Err(CoapError::EmptyPayload);
                }
                payload = Some(rest.to_vec());
                break;
            }
            let start = pos;
            pos += 1;
            let delta = read_extended(bytes, &mut pos, head >> 4).ok_or(CoapError::BadOption(start))?;
            let length =
                read_extended(bytes, &mut pos, head & 0x0f).ok_or(CoapError::BadOption(start))?;
            let value = bytes
                .get(pos..pos + usize::from(length))
                .ok_or(CoapError::BadOption(start))?;
            pos += usize::from(length);
            number = number.checked_add(delta).ok_or(CoapError::BadOption(start))?;
            options.push(CoapOption {
                number,
                value: value.to_vec(),
            });
        }

        Ok(Self {
            version,
            mtype,
            code,
            message_id,
            token,
            options,
            payload,
        })
    }

    /// Serialise. Options go out in number order, repeats keeping theirs.
    pub fn encode(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(4 + self.token.len());
        out.push((self.version << 6) | ((self.mtype as u8) << 4) | (self.token.len() as u8 & 0x0f));
        out.push(self.code);
        out.extend_from_slice(&self.message_id.to_be_bytes());
        out.extend_from_slice(&self.token);

        let mut options: Vec<&CoapOption> = self.options.iter().collect();
        options.sort_by_key(|option| option.number);

        let mut previous = 0u16;
        for option in options {
            let delta = option.number - previous;
            previous = option.number;
            let (delta_nibble, delta_ext) = split_extended(delta);
            let (length_nibble, length_ext) = split_extended(option.value.len() as u16);
            out.push((delta_nibble << 4) | length_nibble);
            out.extend_from_slice(&delta_ext);
            out.extend_from_slice(&length_ext);
            out.extend_from_slice(&option.value);
        }

        if let Some(payload) = &self.payload {
            out.push(PAYLOAD_MARKER);
            out.extend_from_slice(payload);
        }
        out
    }
}

fn read_extended(bytes: &[u8], pos: &mut usize, nibble: u8) -> Option<u16> {
    match nibble {
        0..=12 => Some(u16::from(nibble)),
        13 => {
            let value = *bytes.get(*pos)?;
            *pos += 1;
            Some(u16::from(value) + 13)
        }
        14 => {
            let raw = bytes.get(*pos..*pos + 2)?;
            *pos += 2;
            u16::from_be_bytes([raw[0], raw[1]]).checked_add(269)
        }
        _ => None,
    }
}

fn split_extended(value: u16) -> (u8, Vec<u8>) {
    match value {
        0..=12 => (value as u8, Vec::new()),
        13..=268 => (13, vec![(value - 13) as u8]),
        _ => (14, (value - 269).to_be_bytes().to_vec()),
    }
}
