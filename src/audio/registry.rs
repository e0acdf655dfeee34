//! Per-device subscription bookkeeping.

use super::device::DeviceHandle;
use std::collections::HashSet;

/// Devices whose notification channels are already attached.
///
/// Append-only: a handle is subscribed at most once for the life of the
/// process, so rediscovering a device never doubles its notifications.
#[derive(Debug, Default)]
pub struct SubscriptionRegistry {
    subscribed: HashSet<DeviceHandle>,
}

impl SubscriptionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `subscribe` for `device` unless it has succeeded before.
    ///
    /// `subscribe` reports whether anything was attached. The device is only
    /// recorded on success, so a failed attempt is retried next time. Returns
    /// true if `subscribe` was invoked.
    pub fn ensure_subscribed<F>(&mut self, device: DeviceHandle, subscribe: F) -> bool
    where
        F: FnOnce() -> bool,
    {
        if self.subscribed.contains(&device) {
            return false;
        }
        if subscribe() {
            self.subscribed.insert(device);
        }
        true
    }

    pub fn contains(&self, device: DeviceHandle) -> bool {
        self.subscribed.contains(&device)
    }

    pub fn len(&self) -> usize {
        self.subscribed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subscribed.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subscribe_runs_once_per_device() {
        let mut registry = SubscriptionRegistry::new();
        let mut calls = 0;

        assert!(registry.ensure_subscribed(DeviceHandle(7), || {
            calls += 1;
            true
        }));
        assert!(!registry.ensure_subscribed(DeviceHandle(7), || {
            calls += 1;
            true
        }));
        assert_eq!(calls, 1);
        assert!(registry.contains(DeviceHandle(7)));
    }

    #[test]
    fn test_distinct_devices_each_subscribe() {
        let mut registry = SubscriptionRegistry::new();
        let mut calls = 0;

        for device in [DeviceHandle(7), DeviceHandle(9), DeviceHandle(7)] {
            registry.ensure_subscribed(device, || {
                calls += 1;
                true
            });
        }

        assert_eq!(calls, 2);
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_failed_subscribe_is_retried() {
        let mut registry = SubscriptionRegistry::new();
        let mut calls = 0;

        assert!(registry.ensure_subscribed(DeviceHandle(7), || {
            calls += 1;
            false
        }));
        assert!(!registry.contains(DeviceHandle(7)));

        assert!(registry.ensure_subscribed(DeviceHandle(7), || {
            calls += 1;
            true
        }));
        assert!(!registry.ensure_subscribed(DeviceHandle(7), || {
            calls += 1;
            true
        }));
        assert_eq!(calls, 2);
        assert!(registry.contains(DeviceHandle(7)));
    }
}
