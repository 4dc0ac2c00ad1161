//! Protocol encoding and decoding modules.
//!
//! Each protocol follows a layered structure:
//! - `layout`: byte offsets and ranges (source of truth)
//! - `reader` / `writer`: safe byte access and protocol conventions
//! - `parser` / `encoder`: domain-level decoding and encoding (no direct
//!   byte indexing)
//! - `error`: explicit, actionable errors
//!
//! Encoders and parsers are pure and contain no I/O; the transport layer
//! owns the socket.

pub mod artnet;
