//! Volume monitor state machine.
//!
//! Owns the subscription registry and drives the presentation sink. All
//! state changes happen on the thread that calls [`VolumeMonitor::run`] or
//! [`VolumeMonitor::process_pending`]; notification callbacks only enqueue
//! [`MonitorEvent`]s.

use crate::audio::notifications::create_event_channel;
use crate::audio::{
    AudioHardware, DeviceDirectory, DeviceHandle, MonitorEvent, NormalizedVolumeState,
    NotificationDispatcher, SubscriptionRegistry, VolumeResolver,
};
use crate::config::MonitorConfig;
use crate::ui::PresentationSink;
use std::sync::mpsc::Receiver;
use tracing::{debug, info, warn};

/// Tracks the default output device and reports its effective volume.
pub struct VolumeMonitor<H: AudioHardware, S: PresentationSink> {
    hardware: H,
    sink: S,
    registry: SubscriptionRegistry,
    dispatcher: NotificationDispatcher,
    events: Receiver<MonitorEvent>,
    last_state: Option<NormalizedVolumeState>,
}

impl<H: AudioHardware, S: PresentationSink> VolumeMonitor<H, S> {
    pub fn new(hardware: H, sink: S, config: &MonitorConfig) -> Self {
        let (sender, events) = create_event_channel();
        Self {
            hardware,
            sink,
            registry: SubscriptionRegistry::new(),
            dispatcher: NotificationDispatcher::new(sender, config.subscription_policy),
            events,
            last_state: None,
        }
    }

    /// Subscribe to the default-device channel and the current device, then
    /// emit the initial state.
    pub fn start(&mut self) -> NormalizedVolumeState {
        info!(policy = ?self.dispatcher.policy(), "Starting volume monitor");

        if let Err(e) = self.dispatcher.subscribe_to_default_device(&self.hardware) {
            warn!(error = %e, "Failed to listen for default device changes");
        }

        let device = self.directory().current_default_output_device();
        self.subscribe(device);
        self.emit(device)
    }

    /// Handle one event and emit the resulting state.
    pub fn handle_event(&mut self, event: MonitorEvent) -> NormalizedVolumeState {
        match event {
            MonitorEvent::DefaultDeviceChanged => {
                let device = self.directory().current_default_output_device();
                info!(%device, "Default output device changed");
                self.subscribe(device);
                self.emit(device)
            }
            MonitorEvent::VolumeOrMuteChanged { device, channel } => {
                debug!(%device, %channel, "Volume or mute changed");
                // The default may have moved on since this notification fired.
                let current = self.directory().current_default_output_device();
                self.emit(current)
            }
        }
    }

    /// Handle every queued event without blocking. Returns how many were handled.
    pub fn process_pending(&mut self) -> usize {
        let mut handled = 0;
        while let Ok(event) = self.events.try_recv() {
            self.handle_event(event);
            handled += 1;
        }
        handled
    }

    /// Handle events as they arrive. Does not return while listeners are alive.
    pub fn run(&mut self) {
        while let Ok(event) = self.events.recv() {
            self.handle_event(event);
        }
    }

    pub fn last_state(&self) -> Option<NormalizedVolumeState> {
        self.last_state
    }

    pub fn registry(&self) -> &SubscriptionRegistry {
        &self.registry
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    fn directory(&self) -> DeviceDirectory<'_, H> {
        DeviceDirectory::new(&self.hardware)
    }

    /// Attach mute and volume listeners to `device` the first time it is seen.
    fn subscribe(&mut self, device: DeviceHandle) {
        if device.is_none() {
            debug!("No output device to subscribe to");
            return;
        }

        let hardware = &self.hardware;
        let dispatcher = &self.dispatcher;
        let added = self.registry.ensure_subscribed(device, || {
            let attached = dispatcher.subscribe_to_device_volume(hardware, device);
            if attached == 0 {
                warn!(%device, "No volume listeners attached, will retry");
                return false;
            }
            info!(%device, attached, "Listening for volume changes");
            true
        });
        if !added {
            debug!(%device, "Already listening for volume changes");
        }
    }

    fn emit(&mut self, device: DeviceHandle) -> NormalizedVolumeState {
        let state = VolumeResolver::new(&self.hardware).effective_volume(device);
        debug!(%device, muted = state.is_muted(), level = state.level(), "Emitting volume state");
        self.sink.update(state);
        self.last_state = Some(state);
        state
    }
}
