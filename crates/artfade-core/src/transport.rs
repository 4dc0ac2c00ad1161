//! UDP output for encoded packets.
//!
//! One socket is opened at startup and lives as long as the transport. Sends
//! from concurrent fades are serialized through a mutex; there is no
//! acknowledgement and no retry.

use std::net::{Ipv4Addr, SocketAddr, UdpSocket};

use parking_lot::Mutex;
use thiserror::Error;

use crate::protocols::artnet::ArtDmxPacket;

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("failed to open UDP socket: {0}")]
    Bind(#[source] std::io::Error),
    #[error("failed to send to {destination}: {source}")]
    Send {
        destination: SocketAddr,
        #[source]
        source: std::io::Error,
    },
}

/// Destination for encoded packets.
///
/// The fade engine only sees this trait, so tests can record frames instead
/// of opening sockets.
pub trait PacketSink: Send + Sync {
    /// Send one packet and return the number of bytes written.
    fn send(&self, packet: &ArtDmxPacket) -> Result<usize, TransportError>;
}

/// Art-Net node reached over UDP.
#[derive(Debug)]
pub struct UdpTransport {
    socket: Mutex<UdpSocket>,
    destination: SocketAddr,
}

impl UdpTransport {
    /// Bind an ephemeral local port for sending to `destination`.
    ///
    /// # Errors
    /// Returns `TransportError::Bind` when no socket can be opened; callers
    /// treat this as fatal.
    pub fn open(destination: SocketAddr) -> Result<Self, TransportError> {
        let socket =
            UdpSocket::bind((Ipv4Addr::UNSPECIFIED, 0)).map_err(TransportError::Bind)?;
        // Broadcast destinations (e.g. 2.255.255.255) are valid Art-Net targets.
        socket.set_broadcast(true).map_err(TransportError::Bind)?;
        tracing::info!(%destination, "Art-Net transport opened");
        Ok(Self {
            socket: Mutex::new(socket),
            destination,
        })
    }

    pub fn destination(&self) -> SocketAddr {
        self.destination
    }

    pub fn local_addr(&self) -> Result<SocketAddr, TransportError> {
        self.socket.lock().local_addr().map_err(TransportError::Bind)
    }

    /// Send one datagram to an explicit destination.
    pub fn send_to(&self, destination: SocketAddr, bytes: &[u8]) -> Result<usize, TransportError> {
        let socket = self.socket.lock();
        socket
            .send_to(bytes, destination)
            .map_err(|source| TransportError::Send {
                destination,
                source,
            })
    }
}

impl PacketSink for UdpTransport {
    fn send(&self, packet: &ArtDmxPacket) -> Result<usize, TransportError> {
        let sent = self.send_to(self.destination, packet.as_bytes())?;
        tracing::trace!(bytes = sent, destination = %self.destination, "sent ArtDMX packet");
        Ok(sent)
    }
}
