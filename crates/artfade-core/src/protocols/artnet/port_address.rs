use serde::{Deserialize, Serialize};

use super::error::ArtNetError;

pub const MAX_NET: u8 = 0x7f;
pub const MAX_SUBNET: u8 = 0x0f;
pub const MAX_UNIVERSE: u8 = 0x0f;

/// 15-bit Art-Net port-address: net (7 bits), subnet (4 bits), universe
/// (4 bits).
///
/// # Examples
/// ```
/// use artfade_core::PortAddress;
///
/// let address = PortAddress::new(1, 2, 3)?;
/// assert_eq!(address.to_u16(), 0x0123);
/// assert_eq!(PortAddress::default().to_u16(), 0);
/// # Ok::<(), artfade_core::protocols::artnet::ArtNetError>(())
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PortAddress {
    pub net: u8,
    pub subnet: u8,
    pub universe: u8,
}

impl PortAddress {
    pub fn new(net: u8, subnet: u8, universe: u8) -> Result<Self, ArtNetError> {
        let address = Self {
            net,
            subnet,
            universe,
        };
        address.validate()?;
        Ok(address)
    }

    pub fn validate(&self) -> Result<(), ArtNetError> {
        check_field("net", self.net, MAX_NET)?;
        check_field("subnet", self.subnet, MAX_SUBNET)?;
        check_field("universe", self.universe, MAX_UNIVERSE)
    }

    /// Pack into the wire value; out-of-range fields are masked.
    ///
    /// Bit layout follows the Art-Net Port-Address definition: net in bits
    /// 14-8, subnet in bits 7-4, universe in bits 3-0.
    pub fn to_u16(&self) -> u16 {
        (u16::from(self.net & MAX_NET) << 8)
            | (u16::from(self.subnet & MAX_SUBNET) << 4)
            | u16::from(self.universe & MAX_UNIVERSE)
    }

    /// Unpack a wire value, ignoring the unused top bit.
    pub fn from_u16(value: u16) -> Self {
        Self {
            net: ((value >> 8) as u8) & MAX_NET,
            subnet: ((value >> 4) as u8) & MAX_SUBNET,
            universe: (value as u8) & MAX_UNIVERSE,
        }
    }
}

fn check_field(field: &'static str, value: u8, max: u8) -> Result<(), ArtNetError> {
    if value > max {
        return Err(ArtNetError::InvalidPortAddress { field, value, max });
    }
    Ok(())
}
