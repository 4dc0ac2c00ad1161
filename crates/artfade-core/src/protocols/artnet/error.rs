use thiserror::Error;

/// Errors returned by ArtDMX encoding and decoding.
///
/// # Examples
/// ```
/// use artfade_core::protocols::artnet::ArtNetError;
///
/// let err = ArtNetError::InvalidLength { length: 0 };
/// assert!(err.to_string().contains("invalid ArtDMX length"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ArtNetError {
    #[error("payload too short: need {needed} bytes, got {actual}")]
    TooShort { needed: usize, actual: usize },
    #[error("invalid ArtDMX length: {length}")]
    InvalidLength { length: usize },
    #[error("invalid DMX channel: {channel}")]
    InvalidChannel { channel: u16 },
    #[error("invalid port-address {field}: {value} exceeds {max}")]
    InvalidPortAddress {
        field: &'static str,
        value: u8,
        max: u8,
    },
}
