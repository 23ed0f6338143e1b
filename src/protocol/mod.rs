//! FSP wire format core
//!
//! This module provides the frame layout constants and the stateless codec.

mod codec;
mod error;

pub use codec::{crc16, decode, encode, is_frame_valid};
pub use error::{Error, Result};

/// Frame start marker.
pub const MAGIC: [u8; 2] = [0xC5, 0x5C];

/// Fixed bytes per frame: magic (2) + length (2) + crc (2).
pub const FRAME_OVERHEAD: usize = 6;

/// Largest encodable frame; the length field is 16 bits wide.
pub const MAX_FRAME_SIZE: usize = u16::MAX as usize;

/// Byte offset of the big-endian length field.
pub(crate) const LEN_OFFSET: usize = 2;

/// Byte offset of the big-endian CRC field.
pub(crate) const CRC_OFFSET: usize = 4;
