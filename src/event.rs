use rosc::{OscMessage, OscType};
use std::net::IpAddr;

use crate::classify::Trigger;
use crate::direction::Direction;
use crate::packet::DecodedPacket;

/// One outbound event, ready for the transport.
///
/// Field order matches the argument order of the OSC message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundRecord {
    pub trigger: Trigger,
    pub direction: Direction,
    pub length: u32,
    pub source_port: u16,
    pub destination_port: u16,
    pub application: String,
    pub transport: &'static str,
    pub source_tag: u8,
    pub destination_tag: u8,
}

impl OutboundRecord {
    pub fn address(&self) -> &'static str {
        self.trigger.osc_address()
    }

    pub fn to_osc(&self) -> OscMessage {
        OscMessage {
            addr: self.address().to_string(),
            args: vec![
                OscType::Int(self.direction.wire_code()),
                OscType::Int(self.length as i32),
                OscType::Int(i32::from(self.source_port)),
                OscType::Int(i32::from(self.destination_port)),
                OscType::String(self.application.clone()),
                OscType::String(self.transport.to_string()),
                OscType::Int(i32::from(self.source_tag)),
                OscType::Int(i32::from(self.destination_tag)),
            ],
        }
    }
}

pub fn build(packet: &DecodedPacket, direction: Direction, trigger: Trigger) -> OutboundRecord {
    OutboundRecord {
        trigger,
        direction,
        length: packet.length,
        source_port: packet.source_port,
        destination_port: packet.destination_port,
        application: packet.application.clone(),
        transport: packet.transport.name(),
        source_tag: address_tag(packet.source),
        destination_tag: address_tag(packet.destination),
    }
}

/// High byte of the address as a big-endian u32 (last four bytes for IPv6)
pub fn address_tag(address: IpAddr) -> u8 {
    let value = match address {
        IpAddr::V4(v4) => u32::from(v4),
        IpAddr::V6(v6) => {
            let octets = v6.octets();
            u32::from_be_bytes([octets[12], octets[13], octets[14], octets[15]])
        }
    };
    (value >> 24) as u8
}
