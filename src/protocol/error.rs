//! FSP error types

use thiserror::Error;

/// FSP protocol errors
#[derive(Error, Debug)]
pub enum Error {
    /// Frame magic bytes did not match
    #[error("invalid magic: expected 0xC55C, got {found:#06x}")]
    InvalidMagic {
        /// Found leading two bytes
        found: u16,
    },

    /// Length field disagrees with the actual buffer size
    #[error("frame length mismatch: length field says {declared} bytes, buffer holds {actual}")]
    LengthMismatch {
        /// Value of the length field
        declared: usize,
        /// Actual buffer size
        actual: usize,
    },

    /// CRC field disagrees with the payload checksum
    #[error("crc mismatch: frame carries {stored:#06x}, payload computes to {computed:#06x}")]
    CrcMismatch {
        /// CRC carried in the frame
        stored: u16,
        /// CRC computed over the payload
        computed: u16,
    },

    /// Payload too large for the 16-bit length field
    #[error("payload too large: {size} bytes (max {max})")]
    PayloadTooLarge {
        /// Payload size
        size: usize,
        /// Maximum allowed
        max: usize,
    },

    /// Buffer shorter than a minimal frame
    #[error("buffer too small: need {needed} bytes, got {got}")]
    BufferTooSmall {
        /// Needed size
        needed: usize,
        /// Actual size
        got: usize,
    },

    /// Channel table is full
    #[error("channel limit reached: {max} channels already registered")]
    ChannelLimitReached {
        /// Configured channel limit
        max: usize,
    },

    /// Channel id already registered
    #[error("channel {id} already registered")]
    DuplicateChannel {
        /// Offending channel id
        id: u32,
    },

    /// Channel id not registered
    #[error("unknown channel: {id}")]
    UnknownChannel {
        /// Offending channel id
        id: u32,
    },

    /// Transport send failure
    #[error("transport send failed: {0}")]
    Transport(#[from] std::io::Error),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
