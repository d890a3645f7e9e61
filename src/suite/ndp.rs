//! Neighbor discovery scenarios (0x3_).
//!
//! Each scenario sends a neighbor solicitation and expects a solicited,
//! overriding advertisement for the DUT's own address carrying its
//! link-layer address, except `badtgt` which asks for a foreign target and
//! expects no answer at all.

use super::packets::{
    check, ethernet, mac_octets, neighbor_solicit, parse_ipv6, Ipv6Header, ND_HOP_LIMIT,
};
use super::{
    expect_reply, expect_silence, inject, DUT_IP, DUT_LINK_LOCAL, DUT_MAC, HOST_IP,
    HOST_LINK_LOCAL, HOST_MAC,
};
use crate::framer::Framer;
use crate::harness::{TestCase, Verdict};
use pnet::packet::ethernet::EtherTypes;
use pnet::packet::icmpv6::ndp::{NdpOptionTypes, NeighborAdvertFlags, NeighborAdvertPacket};
use pnet::packet::icmpv6::{self, Icmpv6Packet, Icmpv6Types};
use pnet::packet::ip::IpNextHeaderProtocols;
use pnet::packet::Packet;
use pnet::util::MacAddr;
use std::net::Ipv6Addr;

const ALL_NODES_MAC: MacAddr = MacAddr(0x33, 0x33, 0x00, 0x00, 0x00, 0x01);
/// Link-layer mapping of the DUT's solicited-node group.
const SOLICITED_NODE_MAC: MacAddr = MacAddr(0x33, 0x33, 0xff, 0x0d, 0x00, 0x0c);
const SOLICITED_NODE_IP: Ipv6Addr = Ipv6Addr::new(0xff02, 0, 0, 0, 0, 1, 0xff0d, 0x000c);
const ALL_NODES_IP: Ipv6Addr = Ipv6Addr::new(0xff02, 0, 0, 0, 0, 0, 0, 1);
const FOREIGN_TARGET: Ipv6Addr = Ipv6Addr::new(0x2001, 1, 2, 3, 0xc, 0xd, 0xe, 0xf);
const FOREIGN_LLADDR: MacAddr = MacAddr(0xaa, 0xbb, 0xcc, 0xdd, 0xee, 0xff);

const EXPECTED_FLAGS: u8 = NeighborAdvertFlags::Solicited | NeighborAdvertFlags::Override;

pub fn cases() -> Vec<TestCase> {
    vec![
        TestCase::new(0x31, "ndp_nsna_recv_uc", nsna_recv_uc),
        TestCase::new(0x32, "ndp_nsna_recv_lla", nsna_recv_lla),
        TestCase::new(0x33, "ndp_nsna_recv_mcsn", nsna_recv_mcsn),
        TestCase::new(0x34, "ndp_nsna_recv_dad", nsna_recv_dad),
        TestCase::new(0x35, "ndp_nsna_recv_badtgt", nsna_recv_badtgt),
    ]
}

/// Addressing of one solicitation.
struct Solicitation {
    eth_dst: MacAddr,
    src: Ipv6Addr,
    dst: Ipv6Addr,
    target: Ipv6Addr,
    lladdr: MacAddr,
}

impl Solicitation {
    fn send(&self, framer: &mut Framer) -> Verdict {
        let icmp = neighbor_solicit(self.src, self.dst, self.target, self.lladdr);
        let ip = Ipv6Header::new(self.src, self.dst, IpNextHeaderProtocols::Icmpv6)
            .hop_limit(ND_HOP_LIMIT)
            .build(&icmp);
        inject(framer, &ethernet(HOST_MAC, self.eth_dst, EtherTypes::Ipv6, &ip))
    }
}

fn solicit_and_expect(framer: &mut Framer, ns: Solicitation, reply_dst: Ipv6Addr) -> Verdict {
    ns.send(framer);
    expect_reply(framer, |frame| validate_advert(frame, reply_dst, ns.target))
}

fn nsna_recv_uc(framer: &mut Framer) -> Verdict {
    let ns = Solicitation {
        eth_dst: ALL_NODES_MAC,
        src: HOST_IP,
        dst: DUT_IP,
        target: DUT_IP,
        lladdr: HOST_MAC,
    };
    solicit_and_expect(framer, ns, HOST_IP)
}

fn nsna_recv_lla(framer: &mut Framer) -> Verdict {
    let ns = Solicitation {
        eth_dst: ALL_NODES_MAC,
        src: HOST_LINK_LOCAL,
        dst: DUT_LINK_LOCAL,
        target: DUT_LINK_LOCAL,
        lladdr: HOST_MAC,
    };
    solicit_and_expect(framer, ns, HOST_LINK_LOCAL)
}

fn nsna_recv_mcsn(framer: &mut Framer) -> Verdict {
    let ns = Solicitation {
        eth_dst: SOLICITED_NODE_MAC,
        src: HOST_LINK_LOCAL,
        dst: SOLICITED_NODE_IP,
        target: DUT_IP,
        lladdr: HOST_MAC,
    };
    solicit_and_expect(framer, ns, HOST_LINK_LOCAL)
}

/// Duplicate address detection: the unspecified source forces the answer
/// onto the all-nodes group.
fn nsna_recv_dad(framer: &mut Framer) -> Verdict {
    let ns = Solicitation {
        eth_dst: ALL_NODES_MAC,
        src: Ipv6Addr::UNSPECIFIED,
        dst: DUT_IP,
        target: DUT_IP,
        lladdr: HOST_MAC,
    };
    solicit_and_expect(framer, ns, ALL_NODES_IP)
}

fn nsna_recv_badtgt(framer: &mut Framer) -> Verdict {
    let ns = Solicitation {
        eth_dst: ALL_NODES_MAC,
        src: HOST_LINK_LOCAL,
        dst: ALL_NODES_IP,
        target: FOREIGN_TARGET,
        lladdr: FOREIGN_LLADDR,
    };
    ns.send(framer);
    expect_silence(framer)
}

fn validate_advert(frame: &[u8], dst: Ipv6Addr, target: Ipv6Addr) -> Option<()> {
    let ip = parse_ipv6(frame)?;
    check(ip.get_destination() == dst, "destination address")?;
    check(ip.get_next_header() == IpNextHeaderProtocols::Icmpv6, "next header")?;

    let na = NeighborAdvertPacket::new(ip.payload())?;
    check(na.get_icmpv6_type() == Icmpv6Types::NeighborAdvert, "icmpv6 type")?;
    check(na.get_icmpv6_code().0 == 0, "icmpv6 code")?;
    check(na.get_flags() == EXPECTED_FLAGS, "advertisement flags")?;
    check(na.get_reserved() == 0, "reserved bits")?;
    check(na.get_target_addr() == target, "target address")?;

    let option = na
        .get_options_iter()
        .find(|opt| opt.get_option_type() == NdpOptionTypes::TargetLLAddr);
    let option = check(option.is_some(), "target link-layer option").and(option)?;
    check(option.get_length() == 1, "option length")?;
    check(option.payload().get(..6) == Some(&mac_octets(DUT_MAC)[..]), "link-layer address")?;

    let icmp = Icmpv6Packet::new(ip.payload())?;
    let computed = icmpv6::checksum(&icmp, &ip.get_source(), &ip.get_destination());
    check(computed == icmp.get_checksum(), "icmpv6 checksum")
}
