use crate::direction::Direction;
use crate::packet::{DecodedPacket, TransportKind};

/// A discrete event derived from one packet.
///
/// The direction family (`Direction`) and the protocol family (everything
/// else) are separate variants so one can never stand in for the other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Trigger {
    Direction(Direction),
    UdpSeen,
    /// TCP segment with none of SYN, ACK, FIN, RST set
    TcpNoFlags,
    TcpSyn,
    TcpAck,
    TcpFin,
    TcpRst,
    Icmp,
    /// Not produced by `classify` today
    #[allow(dead_code)]
    Unknown,
}

impl Trigger {
    /// OSC address the receiver dispatches on
    pub fn osc_address(self) -> &'static str {
        match self {
            Trigger::Direction(Direction::Incoming) => "/type/incoming",
            Trigger::Direction(Direction::Outgoing) => "/type/outgoing",
            Trigger::UdpSeen => "/type/udp",
            Trigger::TcpNoFlags => "/type/tcp_nsa",
            Trigger::TcpSyn => "/type/tcp_syn",
            Trigger::TcpAck => "/type/tcp_ack",
            Trigger::TcpFin => "/type/tcp_fin",
            Trigger::TcpRst => "/type/tcp_rst",
            Trigger::Icmp => "/type/icmp",
            Trigger::Unknown => "/type/unknown",
        }
    }

    pub fn is_direction(self) -> bool {
        matches!(self, Trigger::Direction(_))
    }
}

/// Map a decoded packet to its triggers.
///
/// Protocol triggers come first, the direction trigger is always last, so
/// the result holds between one and five elements.
pub fn classify(packet: &DecodedPacket, direction: Direction) -> Vec<Trigger> {
    let mut triggers = Vec::with_capacity(5);

    match packet.transport {
        TransportKind::Udp => triggers.push(Trigger::UdpSeen),
        TransportKind::Tcp => {
            let flags = packet.tcp_flags.unwrap_or_default();
            if flags.is_empty() {
                triggers.push(Trigger::TcpNoFlags);
            } else {
                if flags.fin {
                    triggers.push(Trigger::TcpFin);
                }
                if flags.rst {
                    triggers.push(Trigger::TcpRst);
                }
                if flags.ack {
                    triggers.push(Trigger::TcpAck);
                }
                if flags.syn {
                    triggers.push(Trigger::TcpSyn);
                }
            }
        }
        TransportKind::Icmpv4 | TransportKind::Icmpv6 => triggers.push(Trigger::Icmp),
        TransportKind::Unknown => {}
    }

    triggers.push(Trigger::Direction(direction));
    triggers
}
