use pnet::util::MacAddr;
use std::net::IpAddr;

/// One frame as read from the capture, before any dissection.
#[derive(Debug, Clone)]
pub struct CapturedFrame {
    pub timestamp: f64,       // Capture timestamp (seconds since epoch)
    pub length: u32,          // On-wire length recorded by the capture
    pub data: Vec<u8>,        // Captured bytes, starting at the link layer
}

impl CapturedFrame {
    pub fn new(timestamp: f64, length: u32, data: Vec<u8>) -> Self {
        Self {
            timestamp,
            length,
            data,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportKind {
    Udp,
    Tcp,
    Icmpv4,
    Icmpv6,
    Unknown,
}

impl TransportKind {
    /// Name carried in outbound records and console lines
    pub fn name(self) -> &'static str {
        match self {
            TransportKind::Udp => "udp",
            TransportKind::Tcp => "tcp",
            TransportKind::Icmpv4 => "icmp4",
            TransportKind::Icmpv6 => "icmp6",
            TransportKind::Unknown => "unknown",
        }
    }
}

/// The TCP control bits that produce triggers
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TcpFlags {
    pub syn: bool,
    pub ack: bool,
    pub fin: bool,
    pub rst: bool,
}

impl TcpFlags {
    pub fn is_empty(&self) -> bool {
        !(self.syn || self.ack || self.fin || self.rst)
    }
}

/// Fields extracted from one frame that carried an IPv4 or IPv6 header
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedPacket {
    pub length: u32,
    pub source: IpAddr,
    pub destination: IpAddr,
    pub source_mac: Option<MacAddr>,
    pub destination_mac: Option<MacAddr>,
    pub transport: TransportKind,
    pub source_port: u16,
    pub destination_port: u16,
    pub tcp_flags: Option<TcpFlags>,
    pub application: String,
}
