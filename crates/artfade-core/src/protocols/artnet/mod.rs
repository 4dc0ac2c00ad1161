//! Art-Net ArtDMX encoding and decoding.
//!
//! The encoder turns a universe snapshot into a bit-exact ArtDMX datagram:
//! signature, little-endian opcode, big-endian protocol version, a zero
//! sequence (sequencing disabled), a zero physical field, the big-endian
//! port-address, the big-endian data length and the slot payload. The parser
//! reads the same format back and is used to check what a node receives.
//!
//! Version française (résumé):
//! Le module encode et décode les trames ArtDMX (signature, opcode, version,
//! séquence désactivée, adresse de port, longueur, données). Les positions
//! sont dans `layout`, les conventions d'accès dans `reader` et `writer`.

pub mod encoder;
pub mod error;
pub mod layout;
pub mod parser;
pub mod port_address;
pub mod reader;
pub mod writer;

pub use encoder::{ArtDmxPacket, encode_artdmx, encode_channels, encode_universe};
pub use error::ArtNetError;
pub use parser::{ArtDmx, parse_artdmx};
pub use port_address::PortAddress;
