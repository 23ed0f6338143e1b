//! FSP frame codec (encode/decode)
//!
//! Pure, stateless conversions between payloads and complete wire frames.
//! Incremental deframing of a byte stream lives in [`crate::engine`]; this
//! module handles standalone frame buffers only.

use crc::{CRC_16_IBM_3740, Crc};

use super::{CRC_OFFSET, Error, FRAME_OVERHEAD, LEN_OFFSET, MAGIC, MAX_FRAME_SIZE, Result};

const CRC16_ALG: Crc<u16> = Crc::<u16>::new(&CRC_16_IBM_3740);

/// Compute the FSP frame checksum over payload bytes.
///
/// CRC-16/IBM-3740 (CCITT-FALSE). A stored CRC of zero marks the check as
/// disabled, so a frame whose payload happens to sum to zero is still
/// accepted - the wire format trades that corner away for a cheap opt-out.
#[must_use]
pub fn crc16(payload: &[u8]) -> u16 {
    CRC16_ALG.checksum(payload)
}

/// Encode a payload into a complete wire frame.
///
/// # Format
///
/// ```text
/// [MAGIC (2)] [LENGTH (2, BE)] [CRC (2, BE)] [PAYLOAD (length - 6)]
/// ```
///
/// `LENGTH` counts the whole frame including the six fixed bytes. With
/// `need_crc == false` the CRC field is written as zero and receivers skip
/// the check.
///
/// # Errors
///
/// Returns [`Error::PayloadTooLarge`] when `payload.len() + 6` overflows the
/// 16-bit length field.
pub fn encode(payload: &[u8], need_crc: bool) -> Result<Vec<u8>> {
    let total = payload.len() + FRAME_OVERHEAD;
    if total > MAX_FRAME_SIZE {
        return Err(Error::PayloadTooLarge {
            size: payload.len(),
            max: MAX_FRAME_SIZE - FRAME_OVERHEAD,
        });
    }

    let mut frame = Vec::with_capacity(total);
    frame.extend_from_slice(&MAGIC);
    frame.extend_from_slice(&(total as u16).to_be_bytes());

    let crc = if need_crc { crc16(payload) } else { 0 };
    frame.extend_from_slice(&crc.to_be_bytes());
    frame.extend_from_slice(payload);

    Ok(frame)
}

/// Decode a complete wire frame, returning its payload slice.
///
/// # Errors
///
/// Returns an error if:
/// - Buffer is shorter than the six fixed bytes
/// - Magic bytes don't match
/// - Length field disagrees with the buffer size
/// - CRC is nonzero and doesn't match the payload
pub fn decode(frame: &[u8]) -> Result<&[u8]> {
    if frame.len() < FRAME_OVERHEAD {
        return Err(Error::BufferTooSmall {
            needed: FRAME_OVERHEAD,
            got: frame.len(),
        });
    }

    if frame[0..2] != MAGIC {
        return Err(Error::InvalidMagic {
            found: u16::from_be_bytes([frame[0], frame[1]]),
        });
    }

    let declared =
        u16::from_be_bytes([frame[LEN_OFFSET], frame[LEN_OFFSET + 1]]) as usize;
    if declared != frame.len() {
        return Err(Error::LengthMismatch {
            declared,
            actual: frame.len(),
        });
    }

    let payload = &frame[FRAME_OVERHEAD..];
    let stored = u16::from_be_bytes([frame[CRC_OFFSET], frame[CRC_OFFSET + 1]]);
    if stored != 0 {
        let computed = crc16(payload);
        if stored != computed {
            return Err(Error::CrcMismatch { stored, computed });
        }
    }

    Ok(payload)
}

/// Check whether a buffer holds exactly one valid wire frame.
#[must_use]
pub fn is_frame_valid(frame: &[u8]) -> bool {
    decode(frame).is_ok()
}
