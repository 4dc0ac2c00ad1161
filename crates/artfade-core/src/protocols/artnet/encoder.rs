use super::error::ArtNetError;
use super::layout;
use super::port_address::PortAddress;
use super::writer::ArtNetWriter;
use crate::universe::{DmxSnapshot, UNIVERSE_SIZE, slot_index};

/// An encoded ArtDMX datagram. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtDmxPacket {
    bytes: Vec<u8>,
}

impl ArtDmxPacket {
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Payload bytes after the header.
    pub fn data(&self) -> &[u8] {
        &self.bytes[layout::DMX_DATA_OFFSET..]
    }
}

/// Encode `data` (channel 1 first) as an ArtDMX datagram.
///
/// # Errors
/// Returns `ArtNetError::InvalidLength` for an empty payload or one longer
/// than 512 slots.
pub fn encode_artdmx(data: &[u8], port_address: PortAddress) -> Result<ArtDmxPacket, ArtNetError> {
    if data.is_empty() || data.len() > layout::DMX_MAX_SLOTS {
        return Err(ArtNetError::InvalidLength { length: data.len() });
    }
    Ok(write_packet(data, port_address))
}

/// Encode a full 512-slot universe.
///
/// # Examples
/// ```
/// use artfade_core::{DmxSnapshot, PortAddress, encode_universe};
///
/// let packet = encode_universe(&DmxSnapshot::zeroed(), PortAddress::default());
/// assert_eq!(packet.len(), 18 + 512);
/// assert_eq!(&packet.as_bytes()[16..18], &[0x02, 0x00]);
/// ```
pub fn encode_universe(snapshot: &DmxSnapshot, port_address: PortAddress) -> ArtDmxPacket {
    write_packet(snapshot.slots(), port_address)
}

/// Encode sparse `(channel, value)` pairs as a full universe.
///
/// Later pairs override earlier ones for the same channel; channels not
/// mentioned encode as 0.
pub fn encode_channels(
    channels: &[(u16, u8)],
    port_address: PortAddress,
) -> Result<ArtDmxPacket, ArtNetError> {
    let mut slots = [0u8; UNIVERSE_SIZE];
    for &(channel, value) in channels {
        let idx = slot_index(channel).map_err(|_| ArtNetError::InvalidChannel { channel })?;
        slots[idx] = value;
    }
    Ok(write_packet(&slots, port_address))
}

fn write_packet(data: &[u8], port_address: PortAddress) -> ArtDmxPacket {
    let mut writer = ArtNetWriter::with_capacity(layout::DMX_DATA_OFFSET + data.len());
    writer.write_slice(layout::ARTNET_ID);
    writer.write_u16_le(layout::ARTDMX_OPCODE);
    writer.write_u16_be(layout::PROTOCOL_VERSION);
    debug_assert_eq!(writer.position(), layout::SEQUENCE_OFFSET);
    writer.write_u8(layout::SEQUENCE_DISABLED);
    writer.write_u8(layout::PHYSICAL_PORT);
    writer.write_u16_be(port_address.to_u16());
    // Callers bound data to 512 slots.
    writer.write_u16_be(data.len() as u16);
    debug_assert_eq!(writer.position(), layout::DMX_DATA_OFFSET);
    writer.write_slice(data);
    ArtDmxPacket {
        bytes: writer.finish(),
    }
}
