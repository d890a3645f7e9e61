//! Shared test utilities for the harness integration tests.
//!
//! This module provides:
//! - Scripted DUT construction on top of `MockSerialPort`
//! - Short orchestration timings so tests run in milliseconds
//! - Builders for the frames a well-behaved DUT emits

#![allow(dead_code)]

use dut_harness::framer::{decode_line, encode_packet, encode_signal, Frame, Framer};
use dut_harness::harness::{Orchestrator, Timings, VERDICT_NOK, VERDICT_OK};
use dut_harness::port::MockSerialPort;
use dut_harness::suite::packets::{ethernet, udp, Ipv6Header};
use dut_harness::suite::{DUT_IP, DUT_MAC, DUT_PORT, HOST_IP, HOST_MAC};
use pnet::packet::ethernet::EtherTypes;
use pnet::packet::ip::IpNextHeaderProtocols;
use std::time::Duration;

/// Delay before a scripted DUT answers.
pub const DUT_LATENCY: Duration = Duration::from_millis(2);

/// Timings short enough for unit-speed tests but long enough for the mock's
/// scripted latencies.
pub fn quick_timings() -> Timings {
    Timings {
        drain: Duration::from_millis(20),
        remote_verdict: Duration::from_millis(100),
    }
}

/// A mock port standing in for the DUT.
pub fn scripted_dut() -> MockSerialPort {
    MockSerialPort::new("MOCK0")
}

/// Orchestrator over a clone of `port`, with quick timings.
pub fn orchestrator_for(port: &MockSerialPort) -> Orchestrator {
    Orchestrator::with_timings(Framer::new(Box::new(port.clone())), quick_timings())
}

/// Script the DUT to answer test `id` with `code`.
pub fn verdict_on_start(port: &mut MockSerialPort, id: u32, code: u32) {
    port.respond_line_to(encode_signal(id), DUT_LATENCY, &encode_signal(code));
}

/// Script the DUT to answer test `id` with a verdict of OK.
pub fn passes_on_start(port: &mut MockSerialPort, id: u32) {
    verdict_on_start(port, id, VERDICT_OK);
}

/// Script the DUT to answer test `id` with a verdict of NOK.
pub fn fails_on_start(port: &mut MockSerialPort, id: u32) {
    verdict_on_start(port, id, VERDICT_NOK);
}

/// Script the DUT to emit `frame` and then its verdict once test `id` starts.
pub fn emits_on_start(port: &mut MockSerialPort, id: u32, frame: &[u8], code: u32) {
    let reply = format!("{}\n{}\n", encode_packet(frame), encode_signal(code));
    port.respond_to(encode_signal(id), DUT_LATENCY, reply.as_bytes());
}

/// Every packet the host has written, decoded.
pub fn sent_packets(port: &MockSerialPort) -> Vec<Vec<u8>> {
    port.written_lines()
        .iter()
        .filter_map(|line| match decode_line(line) {
            Some(Frame::Packet(bytes)) => Some(bytes),
            _ => None,
        })
        .collect()
}

/// Every signal the host has written, in order.
pub fn sent_signals(port: &MockSerialPort) -> Vec<u32> {
    port.written_lines()
        .iter()
        .filter_map(|line| match decode_line(line) {
            Some(Frame::Signal(value)) => Some(value),
            _ => None,
        })
        .collect()
}

/// A UDP datagram from the DUT's stack to `dst_port` on the host.
pub fn dut_datagram(dst_port: u16, payload: &[u8]) -> Vec<u8> {
    let segment = udp(DUT_IP, HOST_IP, DUT_PORT, dst_port, None, payload);
    let ip = Ipv6Header::new(DUT_IP, HOST_IP, IpNextHeaderProtocols::Udp).build(&segment);
    ethernet(DUT_MAC, HOST_MAC, EtherTypes::Ipv6, &ip)
}
