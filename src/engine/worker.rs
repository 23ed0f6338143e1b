//! The deframing worker and its owning engine context.
//!
//! One `Engine` holds the channel table, observer list, telemetry, and the
//! round-robin cursor. An external cooperative scheduler drives it by
//! calling [`Engine::step`] repeatedly; each call services at most one
//! channel and returns promptly.

use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use tracing::{debug, trace, warn};

use crate::protocol::Result;

use super::channel::{ChannelConfig, ChannelContext, FeedEvent};
use super::clock::{Clock, MonotonicClock};
use super::observer::{FrameSink, ObserverRegistry};
use super::registry::ChannelRegistry;
use super::stats::{EngineStats, StatsSnapshot};

/// Engine-wide limits.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Upper bound on registered channels.
    pub max_channels: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self { max_channels: 16 }
    }
}

/// What one call to [`Engine::step`] accomplished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// No channel had work this tick.
    Idle,
    /// One channel was serviced.
    Processed {
        /// Channel that got the tick.
        channel: u32,
        /// Bytes drained from its queue and fed to the parser.
        bytes: usize,
        /// Validated frames delivered to observers.
        frames: usize,
    },
}

/// Multi-channel deframing engine.
///
/// Producers call [`Engine::receive`] from any thread; bytes land in the
/// addressed channel's bounded queue without blocking. A single cooperative
/// worker consumes via [`Engine::step`]. Per-channel errors (bad length,
/// bad CRC, timeout) are recovered locally and never escape a step.
pub struct Engine {
    registry: ChannelRegistry,
    observers: ObserverRegistry,
    stats: EngineStats,
    clock: Arc<dyn Clock>,
    cursor: AtomicUsize,
}

impl Engine {
    /// Create an engine with the default monotonic clock.
    #[must_use]
    pub fn new(config: EngineConfig) -> Self {
        Self::with_clock(config, Arc::new(MonotonicClock::new()))
    }

    /// Create an engine with an injected time source.
    #[must_use]
    pub fn with_clock(config: EngineConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            registry: ChannelRegistry::new(config.max_channels),
            observers: ObserverRegistry::default(),
            stats: EngineStats::default(),
            clock,
            cursor: AtomicUsize::new(0),
        }
    }

    /// Register a channel. All-or-nothing; fails when the channel table is
    /// full or the id is already taken.
    pub fn add_channel(&self, id: u32, config: ChannelConfig) -> Result<()> {
        self.registry.register(id, &config)
    }

    /// Subscribe a frame sink. Re-subscribing the same `Arc` is a no-op.
    pub fn subscribe(&self, sink: Arc<dyn FrameSink>) -> bool {
        self.observers.register(sink)
    }

    /// Whether a channel id is registered.
    #[must_use]
    pub fn has_channel(&self, id: u32) -> bool {
        self.registry.lookup(id).is_some()
    }

    /// Number of registered channels.
    #[must_use]
    pub fn channel_count(&self) -> usize {
        self.registry.len()
    }

    /// Enqueue transport bytes for a channel (stream-style).
    ///
    /// Never blocks. Returns `false` when the bytes were dropped: unknown
    /// channel, or queue full (in which case the whole chunk is discarded).
    pub fn receive(&self, channel: u32, bytes: &[u8]) -> bool {
        self.receive_inner(channel, bytes, None)
    }

    /// Enqueue transport bytes along with their datagram origin.
    pub fn receive_from(&self, channel: u32, bytes: &[u8], origin: SocketAddr) -> bool {
        self.receive_inner(channel, bytes, Some(origin))
    }

    fn receive_inner(&self, channel: u32, bytes: &[u8], origin: Option<SocketAddr>) -> bool {
        let Some(ctx) = self.registry.lookup(channel) else {
            trace!(channel, len = bytes.len(), "bytes for unknown channel dropped");
            return false;
        };
        if !ctx.enqueue(bytes, origin) {
            self.stats.record_chunk_dropped();
            return false;
        }
        true
    }

    /// Run one bounded unit of deframing work.
    ///
    /// Services the next channel in round-robin order: timeout check first,
    /// then a single drain bounded by the assembly buffer's headroom, fed
    /// through the state machine with completed frames fanned out to
    /// observers. Returns [`StepOutcome::Idle`] when the chosen channel has
    /// no pending bytes (or no channels exist).
    pub fn step(&self) -> StepOutcome {
        let count = self.registry.len();
        if count == 0 {
            return StepOutcome::Idle;
        }
        let index = self.cursor.fetch_add(1, Ordering::Relaxed) % count;
        match self.registry.at(index) {
            Some(ctx) => self.service(&ctx),
            None => StepOutcome::Idle,
        }
    }

    fn service(&self, ctx: &ChannelContext) -> StepOutcome {
        let now = self.clock.now_micros();
        let mut parser = ctx.parser.lock().expect("parser mutex poisoned");

        // A channel that stopped sending mid-frame must not wedge forever.
        if parser.mid_frame() && now.saturating_sub(parser.last_activity) > ctx.timeout_micros {
            warn!(
                channel = ctx.id,
                assembled = parser.assembled(),
                "frame assembly timed out, discarding partial frame"
            );
            parser.reset();
            self.stats.record_rx_timeout();
        }

        let readable = ctx.queue.readable();
        if readable == 0 {
            return StepOutcome::Idle;
        }

        let budget = readable.min(parser.max_frame_len() - parser.assembled());
        let mut scratch = vec![0u8; budget];
        let drained = ctx.queue.read_into(&mut scratch);
        parser.last_activity = now;

        let origin = ctx.last_origin();
        let mut frames = 0;
        for &byte in &scratch[..drained] {
            match parser.feed(byte) {
                FeedEvent::Consumed => {}
                FeedEvent::LengthError { declared } => {
                    warn!(channel = ctx.id, declared, "frame length out of bounds");
                    self.stats.record_length_error();
                }
                FeedEvent::CrcError { stored, computed } => {
                    warn!(
                        channel = ctx.id,
                        stored, computed, "frame crc mismatch, discarding"
                    );
                    self.stats.record_crc_error();
                }
                FeedEvent::Complete => {
                    let payload = parser.payload();
                    debug!(channel = ctx.id, len = payload.len(), "frame received");
                    self.observers.dispatch(payload, ctx.id, origin);
                    self.stats.record_frame_delivered();
                    frames += 1;
                    parser.reset();
                }
            }
        }

        StepOutcome::Processed {
            channel: ctx.id,
            bytes: drained,
            frames,
        }
    }

    /// Current telemetry counters.
    #[must_use]
    pub fn stats(&self) -> StatsSnapshot {
        self.stats.snapshot()
    }
}
