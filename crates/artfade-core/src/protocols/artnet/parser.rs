use super::error::ArtNetError;
use super::layout;
use super::port_address::PortAddress;
use super::reader::ArtNetReader;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtDmx {
    pub protocol_version: u16,
    pub sequence: Option<u8>,
    pub physical: u8,
    pub port_address: PortAddress,
    pub length: u16,
    pub slots: [u8; layout::DMX_MAX_SLOTS],
}

impl ArtDmx {
    /// Value of a one-indexed channel; channels past `length` read as 0.
    pub fn channel(&self, channel: u16) -> Option<u8> {
        let idx = usize::from(channel).checked_sub(1)?;
        self.slots.get(idx).copied()
    }
}

/// Decode an ArtDMX datagram.
///
/// Returns `Ok(None)` when the payload is not Art-Net or carries a different
/// opcode.
pub fn parse_artdmx(payload: &[u8]) -> Result<Option<ArtDmx>, ArtNetError> {
    let reader = ArtNetReader::new(payload);
    reader.require_len(layout::DMX_DATA_OFFSET)?;

    let signature = reader.read_signature()?;
    if signature != layout::ARTNET_ID {
        return Ok(None);
    }

    let opcode = reader.read_u16_le(layout::OP_CODE_RANGE.clone())?;
    if opcode != layout::ARTDMX_OPCODE {
        return Ok(None);
    }

    let protocol_version = reader.read_u16_be(layout::PROTOCOL_VERSION_RANGE.clone())?;
    let sequence = reader.read_optional_nonzero_u8(layout::SEQUENCE_OFFSET)?;
    let physical = reader.read_u8(layout::PHYSICAL_OFFSET)?;
    let port_address =
        PortAddress::from_u16(reader.read_u16_be(layout::PORT_ADDRESS_RANGE.clone())?);
    let length = reader.read_u16_be(layout::LENGTH_RANGE.clone())?;
    if length == 0 || length as usize > layout::DMX_MAX_SLOTS {
        return Err(ArtNetError::InvalidLength {
            length: length as usize,
        });
    }

    let data_len = length as usize;
    let needed = layout::DMX_DATA_OFFSET + data_len;
    reader.require_len(needed)?;
    let data = reader.read_slice(layout::DMX_DATA_OFFSET..needed)?;
    let mut slots = [0u8; layout::DMX_MAX_SLOTS];
    slots[..data_len].copy_from_slice(data);

    Ok(Some(ArtDmx {
        protocol_version,
        sequence,
        physical,
        port_address,
        length,
        slots,
    }))
}
