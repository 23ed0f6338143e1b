//! FSP deframing engine
//!
//! Stateful side of the protocol: per-channel parse contexts, the bounded
//! byte queues feeding them, observer fan-out, and the cooperative worker
//! that round-robins across channels one bounded step at a time.

mod channel;
mod clock;
mod observer;
mod queue;
mod registry;
mod stats;
mod transport;
mod worker;

pub use channel::ChannelConfig;
pub use clock::{Clock, MonotonicClock};
pub use observer::FrameSink;
pub use stats::StatsSnapshot;
pub use transport::{Transport, send_frame};
pub use worker::{Engine, EngineConfig, StepOutcome};
