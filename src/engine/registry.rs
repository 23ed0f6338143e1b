//! Bounded table of registered channels.

use std::sync::{Arc, RwLock};

use crate::protocol::{Error, Result};

use super::channel::{ChannelConfig, ChannelContext};

/// Maps channel ids to their contexts; bounded, append-only.
///
/// Registration is rare and read access dominates, so the table sits behind
/// an `RwLock`. Channels live for the registry's lifetime.
#[derive(Debug)]
pub(crate) struct ChannelRegistry {
    channels: RwLock<Vec<Arc<ChannelContext>>>,
    max_channels: usize,
}

impl ChannelRegistry {
    pub(crate) fn new(max_channels: usize) -> Self {
        Self {
            channels: RwLock::new(Vec::with_capacity(max_channels)),
            max_channels,
        }
    }

    /// Register a channel; all-or-nothing.
    pub(crate) fn register(&self, id: u32, config: &ChannelConfig) -> Result<()> {
        let mut channels = self.channels.write().expect("channel table lock poisoned");
        if channels.len() >= self.max_channels {
            return Err(Error::ChannelLimitReached {
                max: self.max_channels,
            });
        }
        if channels.iter().any(|c| c.id == id) {
            return Err(Error::DuplicateChannel { id });
        }
        channels.push(Arc::new(ChannelContext::new(id, config)));
        Ok(())
    }

    pub(crate) fn lookup(&self, id: u32) -> Option<Arc<ChannelContext>> {
        self.channels
            .read()
            .expect("channel table lock poisoned")
            .iter()
            .find(|c| c.id == id)
            .cloned()
    }

    /// Channel at a registration-order position, for round-robin scheduling.
    pub(crate) fn at(&self, index: usize) -> Option<Arc<ChannelContext>> {
        self.channels
            .read()
            .expect("channel table lock poisoned")
            .get(index)
            .cloned()
    }

    pub(crate) fn len(&self) -> usize {
        self.channels
            .read()
            .expect("channel table lock poisoned")
            .len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_and_lookup() {
        let registry = ChannelRegistry::new(4);
        registry.register(10, &ChannelConfig::default()).unwrap();

        assert!(registry.lookup(10).is_some());
        assert!(registry.lookup(11).is_none());
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn duplicate_id_rejected() {
        let registry = ChannelRegistry::new(4);
        registry.register(10, &ChannelConfig::default()).unwrap();

        let err = registry.register(10, &ChannelConfig::default()).unwrap_err();
        assert!(matches!(err, Error::DuplicateChannel { id: 10 }));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn channel_limit_enforced() {
        let registry = ChannelRegistry::new(2);
        registry.register(0, &ChannelConfig::default()).unwrap();
        registry.register(1, &ChannelConfig::default()).unwrap();

        let err = registry.register(2, &ChannelConfig::default()).unwrap_err();
        assert!(matches!(err, Error::ChannelLimitReached { max: 2 }));
    }

    #[test]
    fn indexing_follows_registration_order() {
        let registry = ChannelRegistry::new(4);
        for id in [5, 3, 9] {
            registry.register(id, &ChannelConfig::default()).unwrap();
        }

        let ids: Vec<u32> = (0..registry.len())
            .map(|i| registry.at(i).unwrap().id)
            .collect();
        assert_eq!(ids, vec![5, 3, 9]);
        assert!(registry.at(3).is_none());
    }
}
