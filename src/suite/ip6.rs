//! IPv6 scenarios (0x2_).

use super::packets::{check, ethernet, parse_ipv6, Ipv6Header};
use super::{expect_reply, inject, DUT_IP, DUT_MAC, HOST_IP, HOST_MAC};
use crate::framer::Framer;
use crate::harness::{TestCase, Verdict};
use pnet::packet::ethernet::EtherTypes;
use pnet::packet::ip::{IpNextHeaderProtocol, IpNextHeaderProtocols};
use pnet::packet::Packet;
use std::net::Ipv6Addr;

/// Next header value reserved for experimentation.
const NH_EXPERIMENTAL: IpNextHeaderProtocol = IpNextHeaderProtocol(253);
const FOREIGN_SRC: Ipv6Addr = Ipv6Addr::new(0x2001, 1, 2, 3, 0xd, 0xc, 0xb, 0xa);
const FOREIGN_DST: Ipv6Addr = Ipv6Addr::new(0x2001, 1, 2, 3, 0xc, 0xd, 0xe, 0xf);

pub fn cases() -> Vec<TestCase> {
    vec![
        TestCase::new(0x21, "ip6_recv_nodata", recv_nodata),
        TestCase::new(0x22, "ip6_recv_data", recv_data),
        TestCase::new(0x23, "ip6_recv_badnh", recv_badnh),
        TestCase::new(0x24, "ip6_recv_badsrc", recv_badsrc),
        TestCase::new(0x25, "ip6_recv_baddst", recv_baddst),
        TestCase::new(0x26, "ip6_recv_badlen", recv_badlen),
        TestCase::new(0x27, "ip6_send_nodata", send_nodata),
        TestCase::new(0x28, "ip6_send_data", send_data),
    ]
}

fn inject_ip(framer: &mut Framer, header: Ipv6Header, payload: &[u8]) -> Verdict {
    let frame = ethernet(HOST_MAC, DUT_MAC, EtherTypes::Ipv6, &header.build(payload));
    inject(framer, &frame)
}

fn recv_nodata(framer: &mut Framer) -> Verdict {
    let header = Ipv6Header::new(HOST_IP, DUT_IP, IpNextHeaderProtocols::Ipv6NoNxt);
    inject_ip(framer, header, &[])
}

fn recv_data(framer: &mut Framer) -> Verdict {
    inject_ip(framer, Ipv6Header::new(HOST_IP, DUT_IP, NH_EXPERIMENTAL), b"test")
}

fn recv_badnh(framer: &mut Framer) -> Verdict {
    let header = Ipv6Header::new(HOST_IP, DUT_IP, IpNextHeaderProtocols::Tcp);
    inject_ip(framer, header, &[])
}

fn recv_badsrc(framer: &mut Framer) -> Verdict {
    let header = Ipv6Header::new(FOREIGN_SRC, DUT_IP, IpNextHeaderProtocols::Ipv6NoNxt);
    inject_ip(framer, header, &[])
}

fn recv_baddst(framer: &mut Framer) -> Verdict {
    let header = Ipv6Header::new(HOST_IP, FOREIGN_DST, IpNextHeaderProtocols::Ipv6NoNxt);
    inject_ip(framer, header, &[])
}

fn recv_badlen(framer: &mut Framer) -> Verdict {
    let header = Ipv6Header::new(HOST_IP, FOREIGN_DST, NH_EXPERIMENTAL).payload_length(1550);
    inject_ip(framer, header, b"test")
}

fn send_nodata(framer: &mut Framer) -> Verdict {
    expect_reply(framer, |frame| {
        let ip = parse_ipv6(frame)?;
        check(ip.get_source() == DUT_IP, "source address")?;
        check(ip.get_destination() == HOST_IP, "destination address")?;
        check(ip.get_payload_length() == 0, "payload length")?;
        check(ip.get_next_header() == IpNextHeaderProtocols::Ipv6NoNxt, "next header")
    })
}

fn send_data(framer: &mut Framer) -> Verdict {
    expect_reply(framer, |frame| {
        let ip = parse_ipv6(frame)?;
        check(ip.get_source() == DUT_IP, "source address")?;
        check(ip.get_destination() == HOST_IP, "destination address")?;
        check(ip.get_payload_length() == 4, "payload length")?;
        check(ip.get_next_header() == NH_EXPERIMENTAL, "next header")?;
        check(ip.payload() == b"test", "payload")
    })
}
