//! Property change notifications.
//!
//! Listeners are attached per `(device, channel)`. The platform calls them on
//! its own thread with a batch of changed channels; the dispatch table
//! demultiplexes the batch and the handlers forward [`MonitorEvent`]s onto a
//! channel drained by the monitor loop.

use super::device::{AudioError, ChannelIdentity, DeviceHandle, Element, MonitorEvent, Selector};
use super::hardware::AudioHardware;
use crate::config::SubscriptionPolicy;
use std::collections::HashMap;
use std::sync::mpsc::{Receiver, Sender};
use std::sync::Arc;
use tracing::{debug, warn};

/// Handler invoked for one changed channel.
pub type ChannelHandler = Arc<dyn Fn(ChannelIdentity) + Send + Sync + 'static>;

/// Selector-keyed handlers for one dispatch context.
#[derive(Clone, Default)]
pub struct DispatchTable {
    device: DeviceHandle,
    handlers: HashMap<Selector, ChannelHandler>,
}

impl DispatchTable {
    pub fn new(device: DeviceHandle) -> Self {
        Self {
            device,
            handlers: HashMap::new(),
        }
    }

    pub fn insert(&mut self, selector: Selector, handler: ChannelHandler) {
        self.handlers.insert(selector, handler);
    }

    /// Invoke the matching handler once per batch entry.
    ///
    /// Entries with no handler are logged and dropped. Returns the number of
    /// handlers invoked.
    pub fn dispatch(&self, batch: &[ChannelIdentity]) -> usize {
        let mut handled = 0;
        for channel in batch {
            match self.handlers.get(&channel.selector) {
                Some(handler) => {
                    handler(*channel);
                    handled += 1;
                }
                None => {
                    warn!(device = %self.device, %channel, "Unexpected property notification");
                }
            }
        }
        handled
    }
}

/// Attaches listeners and routes their notifications to the monitor loop.
pub struct NotificationDispatcher {
    sender: Sender<MonitorEvent>,
    policy: SubscriptionPolicy,
}

impl NotificationDispatcher {
    pub fn new(sender: Sender<MonitorEvent>, policy: SubscriptionPolicy) -> Self {
        Self { sender, policy }
    }

    pub fn policy(&self) -> SubscriptionPolicy {
        self.policy
    }

    /// Register `handler` for change notifications on `(device, channel)`.
    pub fn register_channel<H: AudioHardware + ?Sized>(
        &self,
        hardware: &H,
        device: DeviceHandle,
        channel: ChannelIdentity,
        handler: ChannelHandler,
    ) -> Result<(), AudioError> {
        let mut table = DispatchTable::new(device);
        table.insert(channel.selector, handler);

        hardware.add_listener(
            device,
            channel,
            Box::new(move |batch: &[ChannelIdentity]| {
                table.dispatch(batch);
            }),
        )?;
        debug!(%device, %channel, "Added property listener");
        Ok(())
    }

    /// Listen for the system default output device changing.
    pub fn subscribe_to_default_device<H: AudioHardware + ?Sized>(
        &self,
        hardware: &H,
    ) -> Result<(), AudioError> {
        let sender = self.sender.clone();
        self.register_channel(
            hardware,
            DeviceHandle::SYSTEM_OBJECT,
            ChannelIdentity::default_output_device(),
            Arc::new(move |_: ChannelIdentity| {
                let _ = sender.send(MonitorEvent::DefaultDeviceChanged);
            }),
        )
    }

    /// Listen for mute and volume changes on `device`.
    ///
    /// Failures are logged per channel and do not stop the remaining
    /// registrations. Returns the number of channels attached.
    pub fn subscribe_to_device_volume<H: AudioHardware + ?Sized>(
        &self,
        hardware: &H,
        device: DeviceHandle,
    ) -> usize {
        let mut channels = vec![ChannelIdentity::mute()];
        match self.policy {
            SubscriptionPolicy::Unconditional => {
                channels.extend(
                    [Element::MAIN, Element::LEFT, Element::RIGHT].map(ChannelIdentity::volume),
                );
            }
            SubscriptionPolicy::Probed => {
                let main = ChannelIdentity::volume(Element::MAIN);
                if hardware.has_channel(device, main) {
                    channels.push(main);
                } else {
                    debug!(%device, "No main volume channel, using left and right");
                    channels.push(ChannelIdentity::volume(Element::LEFT));
                    channels.push(ChannelIdentity::volume(Element::RIGHT));
                }
            }
        }

        let mut attached = 0;
        for channel in channels {
            let sender = self.sender.clone();
            let handler: ChannelHandler = Arc::new(move |channel: ChannelIdentity| {
                let _ = sender.send(MonitorEvent::VolumeOrMuteChanged { device, channel });
            });

            match self.register_channel(hardware, device, channel, handler) {
                Ok(()) => attached += 1,
                Err(e) => warn!(error = %e, "Failed to add volume listener"),
            }
        }
        attached
    }
}

/// Creates an event channel for monitor events.
pub fn create_event_channel() -> (Sender<MonitorEvent>, Receiver<MonitorEvent>) {
    std::sync::mpsc::channel()
}
