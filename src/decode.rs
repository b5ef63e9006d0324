use pnet::packet::ethernet::{EtherType, EtherTypes, EthernetPacket};
use pnet::packet::ip::{IpNextHeaderProtocol, IpNextHeaderProtocols};
use pnet::packet::ipv4::Ipv4Packet;
use pnet::packet::ipv6::Ipv6Packet;
use pnet::packet::tcp::{self, TcpPacket};
use pnet::packet::udp::UdpPacket;
use pnet::packet::vlan::VlanPacket;
use pnet::packet::Packet;
use pnet::util::MacAddr;
use std::net::IpAddr;
use thiserror::Error;

use crate::packet::{DecodedPacket, TcpFlags, TransportKind};

/// Linux cooked capture (SLL) header length
const SLL_HEADER_LEN: usize = 16;

/// ICMP/ICMPv6 header: type, code, checksum and the 4-byte rest-of-header
const ICMP_HEADER_LEN: usize = 8;

/// How the captured bytes start, derived from the capture's data-link type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkKind {
    Ethernet,
    /// Bare IP packet, version nibble selects IPv4 or IPv6
    RawIp,
    Ipv4,
    Ipv6,
    LinuxSll,
}

impl LinkKind {
    /// Map a pcap DLT value. Anything unrecognised is decoded as Ethernet.
    pub fn from_dlt(dlt: i32) -> Self {
        match dlt {
            12 | 14 | 101 => LinkKind::RawIp,
            113 => LinkKind::LinuxSll,
            228 => LinkKind::Ipv4,
            229 => LinkKind::Ipv6,
            _ => LinkKind::Ethernet,
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DecodeError {
    #[error("no network layer")]
    NoNetworkLayer,

    #[error("unsupported network layer (ethertype 0x{0:04x})")]
    UnsupportedNetworkLayer(u16),
}

/// Link layer view: addresses (Ethernet only) and what follows it
struct LinkFrame<'a> {
    macs: Option<(MacAddr, MacAddr)>,
    ethertype: EtherType,
    payload: &'a [u8],
}

/// Transport layer summary, owned so it can outlive the IP view it came from
struct TransportLayer {
    kind: TransportKind,
    source_port: u16,
    destination_port: u16,
    tcp_flags: Option<TcpFlags>,
    application: &'static str,
}

impl TransportLayer {
    fn portless(kind: TransportKind) -> Self {
        Self {
            kind,
            source_port: 0,
            destination_port: 0,
            tcp_flags: None,
            application: "",
        }
    }
}

/// Extract the fields the classifier needs from one captured frame.
///
/// `length` is the on-wire length from the capture header, which can be
/// larger than `frame` when the capture used a snap length.
pub fn decode(frame: &[u8], length: u32, link: LinkKind) -> Result<DecodedPacket, DecodeError> {
    let link_frame = link_layer(frame, link)?;

    let (source, destination, transport) = match link_frame.ethertype {
        EtherTypes::Ipv4 => {
            let ip = Ipv4Packet::new(link_frame.payload)
                .filter(|ip| ip.get_version() == 4)
                .ok_or(DecodeError::NoNetworkLayer)?;
            (
                IpAddr::V4(ip.get_source()),
                IpAddr::V4(ip.get_destination()),
                transport_layer(ip.get_next_level_protocol(), ip.payload()),
            )
        }
        EtherTypes::Ipv6 => {
            let ip = Ipv6Packet::new(link_frame.payload)
                .filter(|ip| ip.get_version() == 6)
                .ok_or(DecodeError::NoNetworkLayer)?;
            (
                IpAddr::V6(ip.get_source()),
                IpAddr::V6(ip.get_destination()),
                transport_layer(ip.get_next_header(), ip.payload()),
            )
        }
        // ARP sits directly on the link layer
        EtherTypes::Arp | EtherTypes::Rarp => return Err(DecodeError::NoNetworkLayer),
        other => return Err(DecodeError::UnsupportedNetworkLayer(other.0)),
    };

    let (source_mac, destination_mac) = match link_frame.macs {
        Some((src, dst)) => (Some(src), Some(dst)),
        None => (None, None),
    };

    Ok(DecodedPacket {
        length,
        source,
        destination,
        source_mac,
        destination_mac,
        transport: transport.kind,
        source_port: transport.source_port,
        destination_port: transport.destination_port,
        tcp_flags: transport.tcp_flags,
        application: transport.application.to_string(),
    })
}

fn link_layer(frame: &[u8], link: LinkKind) -> Result<LinkFrame<'_>, DecodeError> {
    match link {
        LinkKind::Ethernet => {
            let ethernet = EthernetPacket::new(frame).ok_or(DecodeError::NoNetworkLayer)?;
            let macs = Some((ethernet.get_source(), ethernet.get_destination()));
            let mut ethertype = ethernet.get_ethertype();
            let mut payload = &frame[EthernetPacket::minimum_packet_size()..];

            // Single 802.1Q tag
            if ethertype == EtherTypes::Vlan {
                let vlan = VlanPacket::new(payload).ok_or(DecodeError::NoNetworkLayer)?;
                ethertype = vlan.get_ethertype();
                payload = &payload[VlanPacket::minimum_packet_size()..];
            }

            Ok(LinkFrame { macs, ethertype, payload })
        }
        LinkKind::RawIp => {
            let ethertype = match frame.first().map(|b| b >> 4) {
                Some(4) => EtherTypes::Ipv4,
                Some(6) => EtherTypes::Ipv6,
                _ => return Err(DecodeError::NoNetworkLayer),
            };
            Ok(LinkFrame { macs: None, ethertype, payload: frame })
        }
        LinkKind::Ipv4 => Ok(LinkFrame { macs: None, ethertype: EtherTypes::Ipv4, payload: frame }),
        LinkKind::Ipv6 => Ok(LinkFrame { macs: None, ethertype: EtherTypes::Ipv6, payload: frame }),
        LinkKind::LinuxSll => {
            if frame.len() < SLL_HEADER_LEN {
                return Err(DecodeError::NoNetworkLayer);
            }
            let protocol = u16::from_be_bytes([frame[14], frame[15]]);
            Ok(LinkFrame {
                macs: None,
                ethertype: EtherType(protocol),
                payload: &frame[SLL_HEADER_LEN..],
            })
        }
    }
}

fn transport_layer(protocol: IpNextHeaderProtocol, payload: &[u8]) -> TransportLayer {
    match protocol {
        IpNextHeaderProtocols::Udp => match UdpPacket::new(payload) {
            Some(udp) => {
                let (source_port, destination_port) = (udp.get_source(), udp.get_destination());
                TransportLayer {
                    kind: TransportKind::Udp,
                    source_port,
                    destination_port,
                    tcp_flags: None,
                    application: application_label(
                        TransportKind::Udp,
                        source_port,
                        destination_port,
                        udp.payload(),
                    ),
                }
            }
            None => TransportLayer::portless(TransportKind::Unknown),
        },
        IpNextHeaderProtocols::Tcp => match TcpPacket::new(payload) {
            Some(segment) => {
                let (source_port, destination_port) =
                    (segment.get_source(), segment.get_destination());
                let bits = segment.get_flags();
                let flags = TcpFlags {
                    syn: bits & tcp::TcpFlags::SYN != 0,
                    ack: bits & tcp::TcpFlags::ACK != 0,
                    fin: bits & tcp::TcpFlags::FIN != 0,
                    rst: bits & tcp::TcpFlags::RST != 0,
                };
                TransportLayer {
                    kind: TransportKind::Tcp,
                    source_port,
                    destination_port,
                    tcp_flags: Some(flags),
                    application: application_label(
                        TransportKind::Tcp,
                        source_port,
                        destination_port,
                        segment.payload(),
                    ),
                }
            }
            None => TransportLayer::portless(TransportKind::Unknown),
        },
        IpNextHeaderProtocols::Icmp => icmp_layer(TransportKind::Icmpv4, payload),
        IpNextHeaderProtocols::Icmpv6 => icmp_layer(TransportKind::Icmpv6, payload),
        _ => TransportLayer::portless(TransportKind::Unknown),
    }
}

/// ICMP carries no ports; any data after its header is opaque payload
fn icmp_layer(kind: TransportKind, payload: &[u8]) -> TransportLayer {
    let data = payload.get(ICMP_HEADER_LEN..).unwrap_or_default();
    TransportLayer {
        application: if data.is_empty() { "" } else { "Payload" },
        ..TransportLayer::portless(kind)
    }
}

/// Best-effort name of the protocol carried above UDP/TCP
fn application_label(
    transport: TransportKind,
    source_port: u16,
    destination_port: u16,
    payload: &[u8],
) -> &'static str {
    if payload.is_empty() {
        return "";
    }

    let on_port = |port: u16| source_port == port || destination_port == port;
    let udp = transport == TransportKind::Udp;
    let tcp = transport == TransportKind::Tcp;

    if on_port(53) {
        "DNS"
    } else if udp && (on_port(67) || on_port(68)) {
        "DHCPv4"
    } else if udp && on_port(123) {
        "NTP"
    } else if on_port(5060) {
        "SIP"
    } else if is_tls_record(payload) {
        "TLS"
    } else if tcp && (on_port(80) || on_port(8080)) && is_http(payload) {
        "HTTP"
    } else {
        "Payload"
    }
}

fn is_tls_record(payload: &[u8]) -> bool {
    // content type (change_cipher_spec..application_data), version major 3
    payload.len() >= 5 && (20..=23).contains(&payload[0]) && payload[1] == 3
}

fn is_http(payload: &[u8]) -> bool {
    const PREFIXES: [&[u8]; 8] = [
        b"GET ", b"POST ", b"PUT ", b"HEAD ", b"DELETE ", b"OPTIONS ", b"PATCH ", b"HTTP/",
    ];
    PREFIXES.iter().any(|prefix| payload.starts_with(prefix))
}
