//! FSP (Frame Split Protocol) - multi-channel byte-stream deframing
//!
//! FSP turns an unbounded stream of bytes arriving in arbitrary-sized chunks,
//! possibly interleaved across many logical channels, into validated,
//! length-bounded frames delivered to registered observers - and encodes
//! payloads into transmittable wire frames for the reverse direction.
//!
//! # Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//! use fsp::{ChannelConfig, Engine, EngineConfig, FrameSink};
//!
//! struct Printer;
//! impl FrameSink for Printer {
//!     fn on_frame(&self, payload: &[u8], channel: u32, _origin: Option<std::net::SocketAddr>) {
//!         println!("channel {channel}: {payload:?}");
//!     }
//! }
//!
//! let engine = Engine::new(EngineConfig::default());
//! engine.add_channel(0, ChannelConfig::default())?;
//! engine.subscribe(Arc::new(Printer));
//!
//! // Producer side: feed raw transport bytes.
//! let frame = fsp::encode(b"hello", true)?;
//! engine.receive(0, &frame);
//!
//! // Consumer side: one bounded unit of work per scheduler tick.
//! engine.step();
//! # Ok::<(), fsp::Error>(())
//! ```
//!
//! # Features
//!
//! - **Incremental deframing** - per-channel state machine, chunk-size agnostic
//! - **Timeout resynchronization** - stalled partial frames are discarded
//! - **Bounded backpressure** - producers never block, overflow drops whole chunks
//! - **Round-robin scheduling** - one cooperative worker fairly services all channels

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod engine;
pub mod protocol;

pub use engine::{
    ChannelConfig, Clock, Engine, EngineConfig, FrameSink, MonotonicClock, StatsSnapshot,
    StepOutcome, Transport, send_frame,
};
pub use protocol::{
    Error, FRAME_OVERHEAD, MAGIC, MAX_FRAME_SIZE, Result, crc16, decode, encode, is_frame_valid,
};

/// FSP wire format version.
pub const VERSION: &str = "1.0.0";
