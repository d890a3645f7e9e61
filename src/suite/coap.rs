//! CoAP scenarios (0x6_).
//!
//! The DUT's CoAP client posts to the host. Each scenario validates the
//! request it emits and, where the exchange calls for it, answers from the
//! CoAP port: a non-confirmable response, an empty acknowledgement, an
//! acknowledgement followed by a separate response, or a piggybacked one.

use super::coap_msg::{codes, CoapMessage, MessageType, COAP_VERSION};
use super::packets::{check, parse_ipv6};
use super::udp::{host_datagram, valid_checksum};
use super::{expect_reply, inject, COAP_PORT, DUT_PORT};
use crate::framer::Framer;
use crate::harness::{TestCase, Verdict};
use pnet::packet::ip::IpNextHeaderProtocols;
use pnet::packet::udp::UdpPacket;
use pnet::packet::Packet;
use tracing::debug;

/// Payload the firmware posts.
const PAYLOAD: &[u8] = b"test";
/// Message id used for responses the host originates.
const HOST_MESSAGE_ID: u16 = 0;

pub fn cases() -> Vec<TestCase> {
    vec![
        TestCase::new(0x61, "coap_noncf_send_nodata", noncf_send_nodata),
        TestCase::new(0x62, "coap_noncf_send_data", noncf_send_data),
        TestCase::new(0x63, "coap_noncf_send_data_resp", noncf_send_data_resp),
        TestCase::new(0x64, "coap_cf_send_nodata", cf_send_nodata),
        TestCase::new(0x65, "coap_cf_send_data", cf_send_data),
        TestCase::new(0x66, "coap_cf_send_data_ackresp", cf_send_data_ackresp),
        TestCase::new(0x67, "coap_cf_send_data_piggybacked", cf_send_data_piggybacked),
    ]
}

/// What the DUT's request must look like.
#[derive(Debug, Clone, Copy)]
struct Expected {
    udp_length: u16,
    mtype: MessageType,
    token: u8,
    payload: Option<&'static [u8]>,
}

impl Expected {
    const fn non(udp_length: u16, token: u8, payload: Option<&'static [u8]>) -> Self {
        Self {
            udp_length,
            mtype: MessageType::NonConfirmable,
            token,
            payload,
        }
    }

    const fn con(udp_length: u16, token: u8, payload: Option<&'static [u8]>) -> Self {
        Self {
            udp_length,
            mtype: MessageType::Confirmable,
            token,
            payload,
        }
    }
}

/// Wait for the DUT's request; `Err` carries the verdict when it is wrong
/// or missing.
fn receive_request(framer: &mut Framer, expected: Expected) -> Result<CoapMessage, Verdict> {
    let mut request = None;
    let verdict = expect_reply(framer, |frame| {
        request = Some(validate_request(frame, &expected)?);
        Some(())
    });
    match request {
        Some(message) if verdict == Verdict::Ok => Ok(message),
        _ => Err(verdict),
    }
}

fn validate_request(frame: &[u8], expected: &Expected) -> Option<CoapMessage> {
    let ip = parse_ipv6(frame)?;
    check(ip.get_next_header() == IpNextHeaderProtocols::Udp, "next header")?;
    let segment = UdpPacket::new(ip.payload())?;
    check(segment.get_length() == expected.udp_length, "udp length")?;
    check(valid_checksum(&segment, &ip), "udp checksum")?;

    let message = match CoapMessage::parse(segment.payload()) {
        Ok(message) => message,
        Err(e) => {
            debug!("unparseable coap message: {e}");
            return None;
        }
    };
    check(message.version == COAP_VERSION, "coap version")?;
    check(message.mtype == expected.mtype, "message type")?;
    check(message.token == [expected.token], "token")?;
    check(message.code == codes::POST, "request code")?;
    check(message.payload.as_deref() == expected.payload, "payload")?;
    Some(message)
}

fn send_message(framer: &mut Framer, message: &CoapMessage) {
    let frame = host_datagram(COAP_PORT, DUT_PORT, None, &message.encode());
    inject(framer, &frame);
}

fn ack(request: &CoapMessage, code: u8) -> CoapMessage {
    CoapMessage::new(
        MessageType::Acknowledgement,
        code,
        request.message_id,
        &request.token,
    )
}

fn noncf_send_nodata(framer: &mut Framer) -> Verdict {
    match receive_request(framer, Expected::non(13, 0x12, None)) {
        Ok(_) => Verdict::Ok,
        Err(verdict) => verdict,
    }
}

fn noncf_send_data(framer: &mut Framer) -> Verdict {
    match receive_request(framer, Expected::non(28, 0x34, Some(PAYLOAD))) {
        Ok(_) => Verdict::Ok,
        Err(verdict) => verdict,
    }
}

fn noncf_send_data_resp(framer: &mut Framer) -> Verdict {
    let request = match receive_request(framer, Expected::non(28, 0x56, Some(PAYLOAD))) {
        Ok(request) => request,
        Err(verdict) => return verdict,
    };
    let response = CoapMessage::new(
        MessageType::NonConfirmable,
        codes::CREATED,
        HOST_MESSAGE_ID,
        &request.token,
    );
    send_message(framer, &response);
    Verdict::Ok
}

fn cf_send_nodata(framer: &mut Framer) -> Verdict {
    let request = match receive_request(framer, Expected::con(23, 0x78, None)) {
        Ok(request) => request,
        Err(verdict) => return verdict,
    };
    send_message(framer, &ack(&request, codes::EMPTY));
    Verdict::Ok
}

fn cf_send_data(framer: &mut Framer) -> Verdict {
    let request = match receive_request(framer, Expected::con(28, 0x9a, Some(PAYLOAD))) {
        Ok(request) => request,
        Err(verdict) => return verdict,
    };
    send_message(framer, &ack(&request, codes::EMPTY));
    Verdict::Ok
}

/// Empty acknowledgement first, then the response as its own confirmable
/// message.
fn cf_send_data_ackresp(framer: &mut Framer) -> Verdict {
    let request = match receive_request(framer, Expected::con(28, 0xbc, Some(PAYLOAD))) {
        Ok(request) => request,
        Err(verdict) => return verdict,
    };
    send_message(framer, &ack(&request, codes::EMPTY));
    let response = CoapMessage::new(
        MessageType::Confirmable,
        codes::CREATED,
        HOST_MESSAGE_ID,
        &request.token,
    );
    send_message(framer, &response);
    Verdict::Ok
}

fn cf_send_data_piggybacked(framer: &mut Framer) -> Verdict {
    let request = match receive_request(framer, Expected::con(28, 0xde, Some(PAYLOAD))) {
        Ok(request) => request,
        Err(verdict) => return verdict,
    };
    send_message(framer, &ack(&request, codes::CREATED));
    Verdict::Ok
}
