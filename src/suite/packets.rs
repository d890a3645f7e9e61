//! Packet construction and inspection on top of `pnet::packet`.
//!
//! Builders lay out headers into a sized buffer and fill in checksums the
//! way the DUT expects them. Parsers return `None` as soon as a layer is
//! missing or truncated.

use pnet::packet::ethernet::{EtherType, EtherTypes, EthernetPacket, MutableEthernetPacket};
use pnet::packet::icmpv6::ndp::{MutableNeighborSolicitPacket, NeighborSolicitPacket};
use pnet::packet::icmpv6::{self, Icmpv6Code, Icmpv6Packet, Icmpv6Types};
use pnet::packet::ip::{IpNextHeaderProtocol, IpNextHeaderProtocols};
use pnet::packet::ipv6::{Ipv6Packet, MutableIpv6Packet};
use pnet::packet::udp::{self, MutableUdpPacket, UdpPacket};
use pnet::packet::Packet;
use pnet::util::MacAddr;
use std::fmt::Write as _;
use std::net::Ipv6Addr;
use tracing::debug;

pub const ETHERNET_HEADER_LEN: usize = 14;
pub const IPV6_HEADER_LEN: usize = 40;
pub const UDP_HEADER_LEN: usize = 8;

/// Experimental ethertype used for raw link-layer tests.
pub const ETHERTYPE_LOOPBACK: EtherType = EtherType(0x9000);

const DEFAULT_HOP_LIMIT: u8 = 64;
/// Hop limit required on neighbor discovery messages.
pub const ND_HOP_LIMIT: u8 = 255;
const NDP_OPTION_SOURCE_LLADDR: u8 = 1;

/// Value for a 16-bit length field.
///
/// Lengths past `u16::MAX` saturate rather than wrap, so an oversized packet
/// can never claim to be a short one.
fn length_field(len: usize) -> u16 {
    u16::try_from(len).unwrap_or(u16::MAX)
}

pub fn mac_octets(mac: MacAddr) -> [u8; 6] {
    let MacAddr(a, b, c, d, e, f) = mac;
    [a, b, c, d, e, f]
}

/// Ethernet II frame around `payload`.
pub fn ethernet(src: MacAddr, dst: MacAddr, ethertype: EtherType, payload: &[u8]) -> Vec<u8> {
    let mut buf = vec![0u8; ETHERNET_HEADER_LEN + payload.len()];
    {
        let Some(mut eth) = MutableEthernetPacket::new(&mut buf) else {
            unreachable!("buffer holds an ethernet header");
        };
        eth.set_source(src);
        eth.set_destination(dst);
        eth.set_ethertype(ethertype);
    }
    buf[ETHERNET_HEADER_LEN..].copy_from_slice(payload);
    buf
}

/// IPv6 header fields that scenarios vary.
#[derive(Debug, Clone, Copy)]
pub struct Ipv6Header {
    pub src: Ipv6Addr,
    pub dst: Ipv6Addr,
    pub next_header: IpNextHeaderProtocol,
    /// Overrides the computed payload length when set.
    pub payload_length: Option<u16>,
    pub hop_limit: u8,
}

impl Ipv6Header {
    pub fn new(src: Ipv6Addr, dst: Ipv6Addr, next_header: IpNextHeaderProtocol) -> Self {
        Self {
            src,
            dst,
            next_header,
            payload_length: None,
            hop_limit: DEFAULT_HOP_LIMIT,
        }
    }

    pub fn payload_length(mut self, length: u16) -> Self {
        self.payload_length = Some(length);
        self
    }

    pub fn hop_limit(mut self, hop_limit: u8) -> Self {
        self.hop_limit = hop_limit;
        self
    }

    /// Serialise the header followed by `payload`.
    pub fn build(&self, payload: &[u8]) -> Vec<u8> {
        let mut buf = vec![0u8; IPV6_HEADER_LEN + payload.len()];
        {
            let Some(mut ip) = MutableIpv6Packet::new(&mut buf) else {
                unreachable!("buffer holds an ipv6 header");
            };
            ip.set_version(6);
            ip.set_traffic_class(0);
            ip.set_flow_label(0);
            ip.set_payload_length(
                self.payload_length
                    .unwrap_or_else(|| length_field(payload.len())),
            );
            ip.set_next_header(self.next_header);
            ip.set_hop_limit(self.hop_limit);
            ip.set_source(self.src);
            ip.set_destination(self.dst);
        }
        buf[IPV6_HEADER_LEN..].copy_from_slice(payload);
        buf
    }
}

/// UDP datagram with a valid checksum over the IPv6 pseudo-header.
///
/// `length` overrides the header length field; the checksum always covers
/// the bytes actually sent.
pub fn udp(
    src: Ipv6Addr,
    dst: Ipv6Addr,
    src_port: u16,
    dst_port: u16,
    length: Option<u16>,
    payload: &[u8],
) -> Vec<u8> {
    let mut buf = vec![0u8; UDP_HEADER_LEN + payload.len()];
    buf[UDP_HEADER_LEN..].copy_from_slice(payload);
    {
        let Some(mut segment) = MutableUdpPacket::new(&mut buf) else {
            unreachable!("buffer holds a udp header");
        };
        segment.set_source(src_port);
        segment.set_destination(dst_port);
        segment.set_length(length.unwrap_or_else(|| length_field(UDP_HEADER_LEN + payload.len())));
        segment.set_checksum(0);
        let checksum = udp::ipv6_checksum(&segment.to_immutable(), &src, &dst);
        segment.set_checksum(checksum);
    }
    buf
}

/// Neighbor solicitation carrying a source link-layer address option, with
/// the ICMPv6 checksum filled in.
pub fn neighbor_solicit(
    src: Ipv6Addr,
    dst: Ipv6Addr,
    target: Ipv6Addr,
    source_lladdr: MacAddr,
) -> Vec<u8> {
    let header_len = NeighborSolicitPacket::minimum_packet_size();
    let mut buf = vec![0u8; header_len + 8];
    buf[header_len] = NDP_OPTION_SOURCE_LLADDR;
    buf[header_len + 1] = 1;
    buf[header_len + 2..].copy_from_slice(&mac_octets(source_lladdr));
    {
        let Some(mut ns) = MutableNeighborSolicitPacket::new(&mut buf) else {
            unreachable!("buffer holds a neighbor solicitation");
        };
        ns.set_icmpv6_type(Icmpv6Types::NeighborSolicit);
        ns.set_icmpv6_code(Icmpv6Code::new(0));
        ns.set_checksum(0);
        ns.set_reserved(0);
        ns.set_target_addr(target);
    }
    let checksum = Icmpv6Packet::new(&buf)
        .map(|icmp| icmpv6::checksum(&icmp, &src, &dst))
        .unwrap_or_default();
    if let Some(mut ns) = MutableNeighborSolicitPacket::new(&mut buf) {
        ns.set_checksum(checksum);
    }
    buf
}

/// The IPv6 layer of an ethernet frame, if it carries one.
pub fn parse_ipv6(frame: &[u8]) -> Option<Ipv6Packet<'_>> {
    let eth = EthernetPacket::new(frame)?;
    if eth.get_ethertype() != EtherTypes::Ipv6 {
        return None;
    }
    Ipv6Packet::new(&frame[ETHERNET_HEADER_LEN..])
}

/// Log a failed expectation and turn the condition into an `Option` for `?`.
pub fn check(condition: bool, what: &str) -> Option<()> {
    if !condition {
        debug!("reply mismatch: {what}");
    }
    condition.then_some(())
}

/// One-line description of an ethernet frame for verbose traces.
pub fn describe(frame: &[u8]) -> String {
    let Some(eth) = EthernetPacket::new(frame) else {
        return format!("truncated frame ({} bytes)", frame.len());
    };
    let ethertype = eth.get_ethertype();
    let mut out = format!(
        "eth {} > {} type {:#06x}",
        eth.get_source(),
        eth.get_destination(),
        ethertype.0
    );

    if ethertype != EtherTypes::Ipv6 {
        let _ = write!(out, " | {} bytes", eth.payload().len());
        return out;
    }
    let Some(ip) = Ipv6Packet::new(eth.payload()) else {
        out.push_str(" | truncated ipv6");
        return out;
    };
    let next = ip.get_next_header();
    let _ = write!(
        out,
        " | ipv6 {} > {} nh {} plen {}",
        ip.get_source(),
        ip.get_destination(),
        next.0,
        ip.get_payload_length()
    );

    if next == IpNextHeaderProtocols::Udp {
        if let Some(segment) = UdpPacket::new(ip.payload()) {
            let _ = write!(
                out,
                " | udp {} > {} len {} sum {:#06x}",
                segment.get_source(),
                segment.get_destination(),
                segment.get_length(),
                segment.get_checksum()
            );
        }
    } else if next == IpNextHeaderProtocols::Icmpv6 {
        if let Some(icmp) = Icmpv6Packet::new(ip.payload()) {
            let _ = write!(
                out,
                " | icmpv6 type {} code {}",
                icmp.get_icmpv6_type().0,
                icmp.get_icmpv6_code().0
            );
        }
    }
    out
}

/// Emit the description of `frame` at debug level.
pub fn trace_packet(direction: &str, frame: &[u8]) {
    debug!("{direction} {}", describe(frame));
}
