//! The OS audio notification subsystem, as seen by the monitor.
//!
//! Everything the monitor needs from the platform goes through
//! [`AudioHardware`]: synchronous property reads, a capability probe, and
//! listener registration. On macOS this is the CoreAudio HAL.

use super::device::{AudioError, ChannelIdentity, DeviceHandle};

/// Callback invoked by the platform with a batch of changed channels.
///
/// Runs on the platform's notification context, which is never the monitor
/// thread.
pub type PropertyListener = Box<dyn Fn(&[ChannelIdentity]) + Send + Sync + 'static>;

/// Audio hardware queries and notification registration.
pub trait AudioHardware {
    /// Read the default output device from the system object.
    fn default_output_device(&self) -> Result<DeviceHandle, AudioError>;

    /// Read the output mute flag of a device.
    fn mute(&self, device: DeviceHandle) -> Result<bool, AudioError>;

    /// Read the aggregate virtual main volume of a device (0.0 to 1.0).
    fn virtual_main_volume(&self, device: DeviceHandle) -> Result<f32, AudioError>;

    /// Whether the device exposes the given channel.
    fn has_channel(&self, device: DeviceHandle, channel: ChannelIdentity) -> bool;

    /// Attach a listener to one channel of an audio object.
    ///
    /// There is no matching removal: listeners live until the process exits.
    fn add_listener(
        &self,
        device: DeviceHandle,
        channel: ChannelIdentity,
        listener: PropertyListener,
    ) -> Result<(), AudioError>;
}
