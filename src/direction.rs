use pnet::util::MacAddr;
use std::net::IpAddr;

use crate::packet::DecodedPacket;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Incoming,
    Outgoing,
}

impl Direction {
    /// Integer code the receiver reads as the first message argument
    pub fn wire_code(self) -> i32 {
        match self {
            Direction::Incoming => 10,
            Direction::Outgoing => 11,
        }
    }

    pub fn arrow(self) -> &'static str {
        match self {
            Direction::Incoming => "<-",
            Direction::Outgoing => "->",
        }
    }
}

/// Decides whether a packet left the local host or arrived at it.
///
/// With a local MAC configured the decision is an exact match on the
/// packet's source MAC. Without one, IPv4 sources in 10/8, 172.16/12 and
/// 192.168/16 count as local. IPv6 sources are never considered local by
/// that heuristic.
#[derive(Debug, Clone, Default)]
pub struct DirectionResolver {
    local_mac: Option<MacAddr>,
}

impl DirectionResolver {
    pub fn new(local_mac: Option<MacAddr>) -> Self {
        Self { local_mac }
    }

    pub fn resolve(&self, packet: &DecodedPacket) -> Direction {
        match self.local_mac {
            Some(local) if packet.source_mac == Some(local) => Direction::Outgoing,
            Some(_) => Direction::Incoming,
            None if is_private_source(packet.source) => Direction::Outgoing,
            None => Direction::Incoming,
        }
    }
}

fn is_private_source(address: IpAddr) -> bool {
    match address {
        IpAddr::V4(v4) => v4.is_private(),
        IpAddr::V6(_) => false,
    }
}
