//! The conformance scenarios run against the DUT firmware.
//!
//! Identifiers follow the firmware's numbering: the high nibble names the
//! layer under test, the low nibble the scenario. `recv` scenarios inject a
//! frame the DUT must accept or drop (its own verdict decides), `send`
//! scenarios validate a frame the DUT emits on its own.

pub mod coap;
pub mod coap_msg;
pub mod ip6;
pub mod mac;
pub mod ndp;
pub mod packets;
pub mod udp;

use crate::framer::Framer;
use crate::harness::{Group, RegistryError, TestCase, TestRegistry, Verdict};
use pnet::util::MacAddr;
use std::net::Ipv6Addr;
use std::time::Duration;

/// How long a scenario waits for the DUT's reply packet.
pub const REPLY_TIMEOUT: Duration = Duration::from_millis(500);

pub const HOST_MAC: MacAddr = MacAddr(0x76, 0x88, 0x99, 0xaa, 0xbb, 0xcc);
pub const DUT_MAC: MacAddr = MacAddr(0x10, 0x22, 0x33, 0x44, 0x55, 0x66);

pub const HOST_IP: Ipv6Addr = Ipv6Addr::new(0x2001, 1, 2, 3, 0xa, 0xb, 0xc, 0xd);
pub const DUT_IP: Ipv6Addr = Ipv6Addr::new(0x2001, 1, 2, 3, 0xf, 0xe, 0xd, 0xc);
pub const HOST_LINK_LOCAL: Ipv6Addr = Ipv6Addr::new(0xfe80, 0, 0, 0, 0xa, 0xb, 0xc, 0xd);
pub const DUT_LINK_LOCAL: Ipv6Addr = Ipv6Addr::new(0xfe80, 0, 0, 0, 0xf, 0xe, 0xd, 0xc);

pub const HOST_PORT: u16 = 5678;
pub const DUT_PORT: u16 = 1234;
pub const COAP_PORT: u16 = 5683;

/// Layer blocks of the identifier space.
pub fn groups() -> Vec<Group> {
    vec![
        Group::new("mac", 0x10..=0x1f),
        Group::new("ip6", 0x20..=0x2f),
        Group::new("ndp", 0x30..=0x3f),
        Group::new("udp", 0x50..=0x5f),
        Group::new("coap", 0x60..=0x6f),
    ]
}

/// Every scenario of the suite.
pub fn all_cases() -> Vec<TestCase> {
    [mac::cases(), ip6::cases(), ndp::cases(), udp::cases(), coap::cases()].concat()
}

/// Registry holding the full suite and its groups.
pub fn registry() -> Result<TestRegistry, RegistryError> {
    let mut registry = TestRegistry::new();
    for group in groups() {
        registry.add_group(group);
    }
    registry.register_all(all_cases())?;
    Ok(registry)
}

/// Send a frame to the DUT and leave the verdict to it.
pub(crate) fn inject(framer: &mut Framer, frame: &[u8]) -> Verdict {
    packets::trace_packet("tx", frame);
    framer.send_packet(frame);
    Verdict::Ok
}

/// Wait for one frame from the DUT and judge it with `validate`.
pub(crate) fn expect_reply(
    framer: &mut Framer,
    validate: impl FnOnce(&[u8]) -> Option<()>,
) -> Verdict {
    let Some(frame) = framer.receive_packet(REPLY_TIMEOUT) else {
        tracing::debug!("no reply within {REPLY_TIMEOUT:?}");
        return Verdict::Nok;
    };
    packets::trace_packet("rx", &frame);
    Verdict::from_bool(validate(&frame).is_some())
}

/// Pass only if the DUT stays silent.
pub(crate) fn expect_silence(framer: &mut Framer) -> Verdict {
    match framer.receive_packet(REPLY_TIMEOUT) {
        Some(frame) => {
            packets::trace_packet("unexpected rx", &frame);
            Verdict::Nok
        }
        None => Verdict::Ok,
    }
}
