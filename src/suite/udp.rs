//! UDP scenarios (0x5_).

use super::packets::{check, ethernet, parse_ipv6, udp, Ipv6Header, UDP_HEADER_LEN};
use super::{expect_reply, inject, DUT_IP, DUT_MAC, DUT_PORT, HOST_IP, HOST_MAC, HOST_PORT};
use crate::framer::Framer;
use crate::harness::{TestCase, Verdict};
use pnet::packet::ethernet::EtherTypes;
use pnet::packet::ip::IpNextHeaderProtocols;
use pnet::packet::udp::{self as udp_packet, UdpPacket};
use pnet::packet::Packet;

const FOREIGN_SRC_PORT: u16 = 5670;
const FOREIGN_DST_PORT: u16 = 1230;
/// Length field far beyond the bytes on the wire.
const OVERSTATED_LENGTH: u16 = 1500;

pub fn cases() -> Vec<TestCase> {
    vec![
        TestCase::new(0x51, "udp_recv_nodata", recv_nodata),
        TestCase::new(0x52, "udp_recv_data", recv_data),
        TestCase::new(0x53, "udp_recv_badsrc", recv_badsrc),
        TestCase::new(0x54, "udp_recv_baddst", recv_baddst),
        TestCase::new(0x55, "udp_recv_badlen", recv_badlen),
        TestCase::new(0x56, "udp_send_nodata", send_nodata),
        TestCase::new(0x57, "udp_send_data", send_data),
    ]
}

/// Frame a datagram from the host to the DUT.
pub(crate) fn host_datagram(src_port: u16, dst_port: u16, length: Option<u16>, payload: &[u8]) -> Vec<u8> {
    let segment = udp(HOST_IP, DUT_IP, src_port, dst_port, length, payload);
    let ip = Ipv6Header::new(HOST_IP, DUT_IP, IpNextHeaderProtocols::Udp).build(&segment);
    ethernet(HOST_MAC, DUT_MAC, EtherTypes::Ipv6, &ip)
}

fn recv_nodata(framer: &mut Framer) -> Verdict {
    inject(framer, &host_datagram(HOST_PORT, DUT_PORT, None, &[]))
}

fn recv_data(framer: &mut Framer) -> Verdict {
    inject(framer, &host_datagram(HOST_PORT, DUT_PORT, None, b"test"))
}

fn recv_badsrc(framer: &mut Framer) -> Verdict {
    inject(framer, &host_datagram(FOREIGN_SRC_PORT, DUT_PORT, None, b"test"))
}

fn recv_baddst(framer: &mut Framer) -> Verdict {
    inject(framer, &host_datagram(HOST_PORT, FOREIGN_DST_PORT, None, b"test"))
}

fn recv_badlen(framer: &mut Framer) -> Verdict {
    let frame = host_datagram(HOST_PORT, DUT_PORT, Some(OVERSTATED_LENGTH), b"test");
    inject(framer, &frame)
}

fn send_nodata(framer: &mut Framer) -> Verdict {
    expect_reply(framer, |frame| validate_datagram(frame, &[]))
}

fn send_data(framer: &mut Framer) -> Verdict {
    expect_reply(framer, |frame| validate_datagram(frame, b"test"))
}

fn validate_datagram(frame: &[u8], payload: &[u8]) -> Option<()> {
    let ip = parse_ipv6(frame)?;
    check(ip.get_next_header() == IpNextHeaderProtocols::Udp, "next header")?;
    let segment = UdpPacket::new(ip.payload())?;
    check(segment.get_source() == DUT_PORT, "source port")?;
    check(segment.get_destination() == HOST_PORT, "destination port")?;
    check(
        usize::from(segment.get_length()) == UDP_HEADER_LEN + payload.len(),
        "udp length",
    )?;
    check(segment.payload() == payload, "payload")?;
    check(valid_checksum(&segment, &ip), "udp checksum")
}

/// Checksum over the IPv6 pseudo-header, as the DUT must compute it.
pub(crate) fn valid_checksum(segment: &UdpPacket<'_>, ip: &pnet::packet::ipv6::Ipv6Packet<'_>) -> bool {
    let computed = udp_packet::ipv6_checksum(segment, &ip.get_source(), &ip.get_destination());
    computed == segment.get_checksum()
}
