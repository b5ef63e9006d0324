use anyhow::{anyhow, Context, Result};
use rosc::{encoder, OscPacket};
use socket2::{Domain, Protocol, SockAddr, Socket, Type};
use std::net::{SocketAddr, ToSocketAddrs};
use tracing::debug;

use crate::event::OutboundRecord;

/// Destination for outbound records
pub trait EventSink {
    fn send(&mut self, record: &OutboundRecord) -> Result<()>;
}

/// Sends each record as one OSC message in its own UDP datagram.
/// Fire-and-forget: nothing is acknowledged or retried.
pub struct OscSender {
    socket: Socket,
    target: SocketAddr,
}

impl OscSender {
    pub fn connect(host: &str, port: u16) -> Result<Self> {
        let target = (host, port)
            .to_socket_addrs()
            .with_context(|| format!("Failed to resolve OSC target {}:{}", host, port))?
            .next()
            .ok_or_else(|| anyhow!("No address found for OSC target {}:{}", host, port))?;

        let domain = if target.is_ipv4() { Domain::IPV4 } else { Domain::IPV6 };
        let socket = Socket::new(domain, Type::DGRAM, Some(Protocol::UDP))
            .context("Failed to create UDP socket")?;

        debug!("OSC sender ready for {}", target);

        Ok(Self { socket, target })
    }

    pub fn target(&self) -> SocketAddr {
        self.target
    }
}

impl EventSink for OscSender {
    fn send(&mut self, record: &OutboundRecord) -> Result<()> {
        let packet = OscPacket::Message(record.to_osc());
        let datagram = encoder::encode(&packet)
            .map_err(|e| anyhow!("Failed to encode OSC message {}: {:?}", record.address(), e))?;

        let target = SockAddr::from(self.target);
        self.socket
            .send_to(&datagram, &target)
            .with_context(|| format!("Failed to send to {}", self.target))?;
        Ok(())
    }
}
