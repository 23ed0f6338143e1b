//! Observer registry: ordered frame fan-out to subscribers.

use std::net::SocketAddr;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::{Arc, RwLock};

use tracing::{trace, warn};

/// Consumer of fully decoded frame payloads.
///
/// `payload` is a read-only borrow valid only for the duration of the call;
/// a sink that needs the bytes afterwards must copy them.
pub trait FrameSink: Send + Sync {
    /// Called once per validated frame, in subscription order across sinks.
    fn on_frame(&self, payload: &[u8], channel: u32, origin: Option<SocketAddr>);
}

/// Ordered set of subscribers, deduplicated by `Arc` identity.
#[derive(Default)]
pub(crate) struct ObserverRegistry {
    sinks: RwLock<Vec<Arc<dyn FrameSink>>>,
}

impl ObserverRegistry {
    /// Add a subscriber. Re-registering the same `Arc` is an idempotent
    /// no-op that still reports success.
    pub(crate) fn register(&self, sink: Arc<dyn FrameSink>) -> bool {
        let mut sinks = self.sinks.write().expect("observer list lock poisoned");
        if sinks.iter().any(|s| Arc::ptr_eq(s, &sink)) {
            return true;
        }
        sinks.push(sink);
        true
    }

    /// Deliver a payload to every subscriber, in registration order.
    ///
    /// A panicking sink is isolated so the remaining sinks still see the
    /// frame; the handoff is synchronous and non-owning either way.
    pub(crate) fn dispatch(&self, payload: &[u8], channel: u32, origin: Option<SocketAddr>) {
        let sinks = self.sinks.read().expect("observer list lock poisoned");
        trace!(channel, len = payload.len(), sinks = sinks.len(), "dispatching frame");
        for sink in sinks.iter() {
            if catch_unwind(AssertUnwindSafe(|| sink.on_frame(payload, channel, origin))).is_err()
            {
                warn!(channel, "observer panicked during frame dispatch");
            }
        }
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.sinks.read().expect("observer list lock poisoned").len()
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::net::SocketAddr;
    use std::sync::Mutex;

    use super::FrameSink;

    /// Records every delivery for assertions.
    #[derive(Default)]
    pub(crate) struct RecordingSink {
        pub(crate) frames: Mutex<Vec<(u32, Vec<u8>, Option<SocketAddr>)>>,
    }

    impl RecordingSink {
        pub(crate) fn payloads(&self) -> Vec<Vec<u8>> {
            self.frames
                .lock()
                .unwrap()
                .iter()
                .map(|(_, p, _)| p.clone())
                .collect()
        }
    }

    impl FrameSink for RecordingSink {
        fn on_frame(&self, payload: &[u8], channel: u32, origin: Option<SocketAddr>) {
            self.frames
                .lock()
                .unwrap()
                .push((channel, payload.to_vec(), origin));
        }
    }
}
