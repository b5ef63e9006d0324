//! Frame builders shared by the unit tests.

use pnet::packet::ethernet::{EtherType, MutableEthernetPacket};
use pnet::packet::ip::IpNextHeaderProtocol;
use pnet::packet::ipv4::MutableIpv4Packet;
use pnet::packet::ipv6::MutableIpv6Packet;
use pnet::packet::tcp;
use pnet::packet::udp::MutableUdpPacket;
use pnet::util::MacAddr;
use std::net::{Ipv4Addr, Ipv6Addr};

use crate::packet::TcpFlags;

pub const LOCAL_MAC: MacAddr = MacAddr(0x00, 0x53, 0x5e, 0xaf, 0x00, 0xd0);
pub const REMOTE_MAC: MacAddr = MacAddr(0x00, 0x53, 0xc0, 0xff, 0xee, 0x11);

pub fn ethernet_frame(
    source: MacAddr,
    destination: MacAddr,
    ethertype: EtherType,
    payload: &[u8],
) -> Vec<u8> {
    let mut buffer = vec![0u8; 14 + payload.len()];
    {
        let mut ethernet = MutableEthernetPacket::new(&mut buffer).unwrap();
        ethernet.set_source(source);
        ethernet.set_destination(destination);
        ethernet.set_ethertype(ethertype);
        ethernet.set_payload(payload);
    }
    buffer
}

pub fn ipv4_packet(
    source: Ipv4Addr,
    destination: Ipv4Addr,
    protocol: IpNextHeaderProtocol,
    payload: &[u8],
) -> Vec<u8> {
    let mut buffer = vec![0u8; 20 + payload.len()];
    {
        let mut ip = MutableIpv4Packet::new(&mut buffer).unwrap();
        ip.set_version(4);
        ip.set_header_length(5);
        ip.set_total_length((20 + payload.len()) as u16);
        ip.set_ttl(64);
        ip.set_next_level_protocol(protocol);
        ip.set_source(source);
        ip.set_destination(destination);
        ip.set_payload(payload);
    }
    buffer
}

pub fn ipv6_packet(
    source: Ipv6Addr,
    destination: Ipv6Addr,
    next_header: IpNextHeaderProtocol,
    payload: &[u8],
) -> Vec<u8> {
    let mut buffer = vec![0u8; 40 + payload.len()];
    {
        let mut ip = MutableIpv6Packet::new(&mut buffer).unwrap();
        ip.set_version(6);
        ip.set_payload_length(payload.len() as u16);
        ip.set_next_header(next_header);
        ip.set_hop_limit(64);
        ip.set_source(source);
        ip.set_destination(destination);
        ip.set_payload(payload);
    }
    buffer
}

pub fn udp_datagram(source_port: u16, destination_port: u16, payload: &[u8]) -> Vec<u8> {
    let mut buffer = vec![0u8; 8 + payload.len()];
    {
        let mut udp = MutableUdpPacket::new(&mut buffer).unwrap();
        udp.set_source(source_port);
        udp.set_destination(destination_port);
        udp.set_length((8 + payload.len()) as u16);
        udp.set_payload(payload);
    }
    buffer
}

pub fn tcp_segment(
    source_port: u16,
    destination_port: u16,
    flags: TcpFlags,
    payload: &[u8],
) -> Vec<u8> {
    let mut bits = 0;
    if flags.fin {
        bits |= tcp::TcpFlags::FIN;
    }
    if flags.syn {
        bits |= tcp::TcpFlags::SYN;
    }
    if flags.rst {
        bits |= tcp::TcpFlags::RST;
    }
    if flags.ack {
        bits |= tcp::TcpFlags::ACK;
    }

    let mut buffer = vec![0u8; 20 + payload.len()];
    {
        let mut segment = tcp::MutableTcpPacket::new(&mut buffer).unwrap();
        segment.set_source(source_port);
        segment.set_destination(destination_port);
        segment.set_data_offset(5);
        segment.set_window(64240);
        segment.set_flags(bits);
        segment.set_payload(payload);
    }
    buffer
}

/// ICMP echo request with id 1, sequence 1, followed by `data`
pub fn icmp_echo(data: &[u8]) -> Vec<u8> {
    let mut buffer = vec![8, 0, 0, 0, 0, 1, 0, 1];
    buffer.extend_from_slice(data);
    buffer
}
