//! Per-channel deframing context and parse state machine.

use std::net::SocketAddr;
use std::sync::Mutex;
use std::time::Duration;

use bytes::{BufMut, BytesMut};
use tracing::warn;

use crate::protocol::{CRC_OFFSET, FRAME_OVERHEAD, LEN_OFFSET, MAGIC, crc16};

use super::queue::ByteQueue;

/// Per-channel deframing limits.
#[derive(Debug, Clone)]
pub struct ChannelConfig {
    /// Largest acceptable frame, including the six fixed bytes.
    pub max_frame_len: usize,
    /// How long a partially assembled frame may sit idle before the parser
    /// discards it and resumes magic-search.
    pub timeout: Duration,
    /// Capacity of the inbound byte queue feeding this channel.
    pub queue_capacity: usize,
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self {
            max_frame_len: 1024,
            timeout: Duration::from_millis(500),
            queue_capacity: 4096,
        }
    }
}

/// Parse states, in wire order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ParseState {
    MagicHigh,
    MagicLow,
    LenHigh,
    LenLow,
    Data,
}

/// What one input byte did to the state machine.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum FeedEvent {
    /// Nothing observable; keep feeding.
    Consumed,
    /// Length field out of `[6, max_frame_len]`; parser has reset.
    LengthError {
        declared: usize,
    },
    /// Completed frame failed its checksum; parser has reset.
    CrcError {
        stored: u16,
        computed: u16,
    },
    /// A frame completed and validated; read it with
    /// [`FrameParser::payload`], then call [`FrameParser::reset`].
    Complete,
}

/// Incremental frame parser.
///
/// Fed one byte at a time; all resumable state (assembly buffer, target
/// length, activity timestamp) lives in explicit fields so parsing survives
/// arbitrary chunk boundaries between worker invocations.
#[derive(Debug)]
pub(crate) struct FrameParser {
    /// Assembles the whole frame, fixed six bytes included.
    buf: BytesMut,
    state: ParseState,
    /// Total frame length, known once both length bytes arrive.
    target: usize,
    max_frame_len: usize,
    /// Last time bytes were processed, monotonic microseconds.
    pub(crate) last_activity: u64,
}

impl FrameParser {
    pub(crate) fn new(max_frame_len: usize) -> Self {
        assert!(
            max_frame_len >= FRAME_OVERHEAD,
            "max_frame_len must cover the six fixed frame bytes"
        );
        Self {
            buf: BytesMut::with_capacity(max_frame_len),
            state: ParseState::MagicHigh,
            target: 0,
            max_frame_len,
            last_activity: 0,
        }
    }

    /// True while a frame is mid-assembly (timeout applies only then).
    pub(crate) fn mid_frame(&self) -> bool {
        self.state != ParseState::MagicHigh
    }

    /// Bytes accumulated toward the current frame.
    pub(crate) fn assembled(&self) -> usize {
        self.buf.len()
    }

    pub(crate) fn max_frame_len(&self) -> usize {
        self.max_frame_len
    }

    /// Discard any partial frame and resume magic-search.
    pub(crate) fn reset(&mut self) {
        self.buf.clear();
        self.state = ParseState::MagicHigh;
        self.target = 0;
    }

    /// Payload of the frame just completed (valid after [`FeedEvent::Complete`]).
    pub(crate) fn payload(&self) -> &[u8] {
        &self.buf[FRAME_OVERHEAD..self.target]
    }

    /// Advance the state machine by one input byte.
    pub(crate) fn feed(&mut self, byte: u8) -> FeedEvent {
        match self.state {
            ParseState::MagicHigh => {
                if byte == MAGIC[0] {
                    self.buf.put_u8(byte);
                    self.state = ParseState::MagicLow;
                }
                FeedEvent::Consumed
            }
            ParseState::MagicLow => {
                if byte == MAGIC[1] {
                    self.buf.put_u8(byte);
                    self.state = ParseState::LenHigh;
                } else {
                    // Overlap-tolerant resync: the rejected byte may itself
                    // start a new magic sequence (e.g. 0xC5 0xC5 0x5C).
                    self.reset();
                    if byte == MAGIC[0] {
                        self.buf.put_u8(byte);
                        self.state = ParseState::MagicLow;
                    }
                }
                FeedEvent::Consumed
            }
            ParseState::LenHigh => {
                self.buf.put_u8(byte);
                self.state = ParseState::LenLow;
                FeedEvent::Consumed
            }
            ParseState::LenLow => {
                self.buf.put_u8(byte);
                let declared = u16::from_be_bytes([self.buf[LEN_OFFSET], byte]) as usize;
                if declared < FRAME_OVERHEAD || declared > self.max_frame_len {
                    self.reset();
                    return FeedEvent::LengthError { declared };
                }
                self.target = declared;
                self.state = ParseState::Data;
                FeedEvent::Consumed
            }
            ParseState::Data => {
                self.buf.put_u8(byte);
                if self.buf.len() < self.target {
                    return FeedEvent::Consumed;
                }

                let stored =
                    u16::from_be_bytes([self.buf[CRC_OFFSET], self.buf[CRC_OFFSET + 1]]);
                if stored != 0 {
                    let computed = crc16(self.payload());
                    if stored != computed {
                        self.reset();
                        return FeedEvent::CrcError { stored, computed };
                    }
                }
                FeedEvent::Complete
            }
        }
    }
}

/// One logical byte stream with independent framing state.
///
/// The queue's write side belongs to transport producers; everything else is
/// mutated only by the worker holding the parser lock.
#[derive(Debug)]
pub(crate) struct ChannelContext {
    pub(crate) id: u32,
    pub(crate) timeout_micros: u64,
    pub(crate) queue: ByteQueue,
    pub(crate) parser: Mutex<FrameParser>,
    /// Origin of the most recent datagram, for datagram-style transports.
    pub(crate) origin: Mutex<Option<SocketAddr>>,
}

impl ChannelContext {
    pub(crate) fn new(id: u32, config: &ChannelConfig) -> Self {
        Self {
            id,
            timeout_micros: u64::try_from(config.timeout.as_micros()).unwrap_or(u64::MAX),
            queue: ByteQueue::new(config.queue_capacity),
            parser: Mutex::new(FrameParser::new(config.max_frame_len)),
            origin: Mutex::new(None),
        }
    }

    /// Producer-side entry: enqueue a chunk, all-or-nothing.
    pub(crate) fn enqueue(&self, bytes: &[u8], origin: Option<SocketAddr>) -> bool {
        if !self.queue.try_write(bytes) {
            warn!(
                channel = self.id,
                len = bytes.len(),
                "inbound queue full, dropping chunk"
            );
            return false;
        }
        if origin.is_some() {
            *self.origin.lock().expect("origin mutex poisoned") = origin;
        }
        true
    }

    pub(crate) fn last_origin(&self) -> Option<SocketAddr> {
        *self.origin.lock().expect("origin mutex poisoned")
    }
}
