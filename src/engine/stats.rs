//! Engine telemetry counters.
//!
//! Increment-only, fire-and-forget, instance-held so independent engines
//! (and tests) never share state.

use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Debug, Default)]
pub(crate) struct EngineStats {
    rx_timeouts: AtomicU64,
    length_errors: AtomicU64,
    crc_errors: AtomicU64,
    frames_delivered: AtomicU64,
    chunks_dropped: AtomicU64,
}

impl EngineStats {
    #[inline]
    pub(crate) fn record_rx_timeout(&self) {
        self.rx_timeouts.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn record_length_error(&self) {
        self.length_errors.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn record_crc_error(&self) {
        self.crc_errors.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn record_frame_delivered(&self) {
        self.frames_delivered.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn record_chunk_dropped(&self) {
        self.chunks_dropped.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            rx_timeouts: self.rx_timeouts.load(Ordering::Relaxed),
            length_errors: self.length_errors.load(Ordering::Relaxed),
            crc_errors: self.crc_errors.load(Ordering::Relaxed),
            frames_delivered: self.frames_delivered.load(Ordering::Relaxed),
            chunks_dropped: self.chunks_dropped.load(Ordering::Relaxed),
        }
    }
}

/// Point-in-time copy of the engine counters.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatsSnapshot {
    /// Partial frames discarded because a channel stalled past its timeout.
    pub rx_timeouts: u64,
    /// Frames rejected for a length field outside `[6, max_frame_len]`.
    pub length_errors: u64,
    /// Frames rejected for a checksum mismatch.
    pub crc_errors: u64,
    /// Validated frames handed to observers.
    pub frames_delivered: u64,
    /// Inbound chunks dropped at the backpressure boundary.
    pub chunks_dropped: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counters_accumulate_independently() {
        let stats = EngineStats::default();
        stats.record_rx_timeout();
        stats.record_length_error();
        stats.record_length_error();
        stats.record_crc_error();
        stats.record_frame_delivered();
        stats.record_chunk_dropped();

        let snap = stats.snapshot();
        assert_eq!(snap.rx_timeouts, 1);
        assert_eq!(snap.length_errors, 2);
        assert_eq!(snap.crc_errors, 1);
        assert_eq!(snap.frames_delivered, 1);
        assert_eq!(snap.chunks_dropped, 1);
    }

    #[test]
    fn snapshot_is_a_copy() {
        let stats = EngineStats::default();
        let before = stats.snapshot();
        stats.record_crc_error();
        assert_eq!(before.crc_errors, 0);
        assert_eq!(stats.snapshot().crc_errors, 1);
    }
}
