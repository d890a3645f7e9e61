//! Link-layer scenarios (0x1_).

use super::packets::{check, ethernet, ETHERNET_HEADER_LEN, ETHERTYPE_LOOPBACK};
use super::{expect_reply, inject, DUT_MAC, HOST_MAC};
use crate::framer::Framer;
use crate::harness::{TestCase, Verdict};
use pnet::packet::ethernet::{EtherType, EtherTypes, EthernetPacket};
use pnet::util::MacAddr;

/// All-nodes multicast as seen on the link layer.
const ALL_NODES_MAC: MacAddr = MacAddr(0x33, 0x33, 0x00, 0x00, 0x00, 0x01);
const FOREIGN_MAC: MacAddr = MacAddr(0x10, 0x22, 0x33, 0x44, 0x55, 0x60);

pub fn cases() -> Vec<TestCase> {
    vec![
        TestCase::new(0x11, "mac_recv_nodata", recv_nodata),
        TestCase::new(0x12, "mac_recv_data_ucast", recv_data_ucast),
        TestCase::new(0x13, "mac_recv_data_mcast", recv_data_mcast),
        TestCase::new(0x14, "mac_recv_badethtype", recv_badethtype),
        TestCase::new(0x15, "mac_recv_baddst", recv_baddst),
        TestCase::new(0x16, "mac_send_nodata", send_nodata),
        TestCase::new(0x17, "mac_send_data", send_data),
    ]
}

fn recv_nodata(framer: &mut Framer) -> Verdict {
    inject(framer, &ethernet(HOST_MAC, DUT_MAC, ETHERTYPE_LOOPBACK, &[]))
}

fn recv_data_ucast(framer: &mut Framer) -> Verdict {
    inject(framer, &ethernet(HOST_MAC, DUT_MAC, ETHERTYPE_LOOPBACK, b"test"))
}

fn recv_data_mcast(framer: &mut Framer) -> Verdict {
    inject(framer, &ethernet(HOST_MAC, ALL_NODES_MAC, ETHERTYPE_LOOPBACK, b"test"))
}

fn recv_badethtype(framer: &mut Framer) -> Verdict {
    inject(framer, &ethernet(HOST_MAC, DUT_MAC, EtherTypes::Ipv4, b"test"))
}

fn recv_baddst(framer: &mut Framer) -> Verdict {
    inject(framer, &ethernet(HOST_MAC, FOREIGN_MAC, EtherTypes::Ipv4, b"test"))
}

fn send_nodata(framer: &mut Framer) -> Verdict {
    expect_reply(framer, |frame| validate_header(frame, ETHERTYPE_LOOPBACK))
}

fn send_data(framer: &mut Framer) -> Verdict {
    expect_reply(framer, |frame| {
        validate_header(frame, ETHERTYPE_LOOPBACK)?;
        // Short frames may be padded by the DUT's MAC.
        check(frame[ETHERNET_HEADER_LEN..].starts_with(b"test"), "payload")
    })
}

fn validate_header(frame: &[u8], ethertype: EtherType) -> Option<()> {
    let eth = EthernetPacket::new(frame)?;
    check(eth.get_source() == DUT_MAC, "source mac")?;
    check(eth.get_destination() == HOST_MAC, "destination mac")?;
    check(eth.get_ethertype() == ethertype, "ethertype")
}
