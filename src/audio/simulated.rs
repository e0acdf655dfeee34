//! In-memory audio hardware for tests.

use super::device::{AudioError, ChannelIdentity, DeviceHandle, Element, Selector};
use super::hardware::{AudioHardware, PropertyListener};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

const STATUS_UNKNOWN_PROPERTY: i32 = 0x7768_6f3f; // 'who?'

/// A simulated output device.
#[derive(Debug, Clone)]
pub struct SimulatedDevice {
    /// `None` makes the mute read fail
    pub mute: Option<bool>,
    /// `None` makes the volume read fail
    pub volume: Option<f32>,
    /// Whether the device exposes the aggregate volume channel
    pub has_main_channel: bool,
}

impl Default for SimulatedDevice {
    fn default() -> Self {
        Self {
            mute: Some(false),
            volume: Some(1.0),
            has_main_channel: true,
        }
    }
}

impl SimulatedDevice {
    pub fn with_volume(volume: f32) -> Self {
        Self {
            volume: Some(volume),
            ..Self::default()
        }
    }

    pub fn muted(mut self, muted: bool) -> Self {
        self.mute = Some(muted);
        self
    }

    pub fn without_mute(mut self) -> Self {
        self.mute = None;
        self
    }

    pub fn without_volume(mut self) -> Self {
        self.volume = None;
        self
    }

    pub fn without_main_channel(mut self) -> Self {
        self.has_main_channel = false;
        self
    }

    fn exposes(&self, channel: ChannelIdentity) -> bool {
        !(channel.selector == Selector::VolumeScalar
            && channel.element == Element::MAIN
            && !self.has_main_channel)
    }
}

struct Registration {
    device: DeviceHandle,
    channel: ChannelIdentity,
    listener: Arc<dyn Fn(&[ChannelIdentity]) + Send + Sync>,
}

#[derive(Default)]
struct State {
    default_device: Option<DeviceHandle>,
    devices: HashMap<DeviceHandle, SimulatedDevice>,
    registrations: Vec<Registration>,
    rejected: HashSet<DeviceHandle>,
    volume_reads: usize,
}

/// Shared, cloneable simulated hardware.
///
/// Clones observe the same state, so a test can keep one handle while the
/// monitor owns another.
#[derive(Clone, Default)]
pub struct SimulatedHardware {
    state: Arc<Mutex<State>>,
}

impl SimulatedHardware {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_device(&self, device: DeviceHandle, config: SimulatedDevice) {
        self.state.lock().unwrap().devices.insert(device, config);
    }

    pub fn set_default(&self, device: DeviceHandle) {
        self.state.lock().unwrap().default_device = Some(device);
    }

    /// Make the default-device query fail until the next `set_default`.
    pub fn fail_default_query(&self) {
        self.state.lock().unwrap().default_device = None;
    }

    /// Make every listener registration on `device` fail while `reject` is set.
    pub fn reject_listeners(&self, device: DeviceHandle, reject: bool) {
        let mut state = self.state.lock().unwrap();
        if reject {
            state.rejected.insert(device);
        } else {
            state.rejected.remove(&device);
        }
    }

    pub fn update_device(&self, device: DeviceHandle, update: impl FnOnce(&mut SimulatedDevice)) {
        if let Some(config) = self.state.lock().unwrap().devices.get_mut(&device) {
            update(config);
        }
    }

    /// All accepted registrations, in order.
    pub fn registrations(&self) -> Vec<(DeviceHandle, ChannelIdentity)> {
        self.state
            .lock()
            .unwrap()
            .registrations
            .iter()
            .map(|r| (r.device, r.channel))
            .collect()
    }

    pub fn registrations_for(&self, device: DeviceHandle) -> Vec<ChannelIdentity> {
        self.registrations()
            .into_iter()
            .filter(|(d, _)| *d == device)
            .map(|(_, channel)| channel)
            .collect()
    }

    pub fn volume_reads(&self) -> usize {
        self.state.lock().unwrap().volume_reads
    }

    /// Deliver a batch to every listener on `device` whose channel is in the batch.
    ///
    /// Returns the number of listeners invoked.
    pub fn fire(&self, device: DeviceHandle, batch: &[ChannelIdentity]) -> usize {
        let listeners: Vec<_> = self
            .state
            .lock()
            .unwrap()
            .registrations
            .iter()
            .filter(|r| r.device == device && batch.contains(&r.channel))
            .map(|r| Arc::clone(&r.listener))
            .collect();

        for listener in &listeners {
            listener(batch);
        }
        listeners.len()
    }

    /// Deliver a batch verbatim to the listener registered for `(device, channel)`.
    pub fn fire_raw(&self, device: DeviceHandle, channel: ChannelIdentity, batch: &[ChannelIdentity]) {
        let listener = self
            .state
            .lock()
            .unwrap()
            .registrations
            .iter()
            .find(|r| r.device == device && r.channel == channel)
            .map(|r| Arc::clone(&r.listener));

        if let Some(listener) = listener {
            listener(batch);
        }
    }
}

impl AudioHardware for SimulatedHardware {
    fn default_output_device(&self) -> Result<DeviceHandle, AudioError> {
        self.state
            .lock()
            .unwrap()
            .default_device
            .ok_or(AudioError::PropertyRead {
                device: DeviceHandle::SYSTEM_OBJECT,
                channel: ChannelIdentity::default_output_device(),
                status: STATUS_UNKNOWN_PROPERTY,
            })
    }

    fn mute(&self, device: DeviceHandle) -> Result<bool, AudioError> {
        let state = self.state.lock().unwrap();
        state
            .devices
            .get(&device)
            .and_then(|d| d.mute)
            .ok_or(AudioError::PropertyRead {
                device,
                channel: ChannelIdentity::mute(),
                status: STATUS_UNKNOWN_PROPERTY,
            })
    }

    fn virtual_main_volume(&self, device: DeviceHandle) -> Result<f32, AudioError> {
        let mut state = self.state.lock().unwrap();
        state.volume_reads += 1;
        state
            .devices
            .get(&device)
            .and_then(|d| d.volume)
            .ok_or(AudioError::PropertyRead {
                device,
                channel: ChannelIdentity::virtual_main_volume(),
                status: STATUS_UNKNOWN_PROPERTY,
            })
    }

    fn has_channel(&self, device: DeviceHandle, channel: ChannelIdentity) -> bool {
        self.state
            .lock()
            .unwrap()
            .devices
            .get(&device)
            .map(|d| d.exposes(channel))
            .unwrap_or(false)
    }

    fn add_listener(
        &self,
        device: DeviceHandle,
        channel: ChannelIdentity,
        listener: PropertyListener,
    ) -> Result<(), AudioError> {
        let mut state = self.state.lock().unwrap();

        let exposed = state
            .devices
            .get(&device)
            .map(|d| d.exposes(channel))
            .unwrap_or(false);
        let accepted = device == DeviceHandle::SYSTEM_OBJECT
            || (exposed && !state.rejected.contains(&device));
        if !accepted {
            return Err(AudioError::ListenerAdd {
                device,
                channel,
                status: STATUS_UNKNOWN_PROPERTY,
            });
        }

        state.registrations.push(Registration {
            device,
            channel,
            listener: Arc::from(listener),
        });
        Ok(())
    }
}
