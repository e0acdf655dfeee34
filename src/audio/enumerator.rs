//! Default output device lookup.

use super::device::DeviceHandle;
use super::hardware::AudioHardware;
use tracing::warn;

/// Answers "what is the current default output device?".
pub struct DeviceDirectory<'a, H: AudioHardware + ?Sized> {
    hardware: &'a H,
}

impl<'a, H: AudioHardware + ?Sized> DeviceDirectory<'a, H> {
    pub fn new(hardware: &'a H) -> Self {
        Self { hardware }
    }

    /// Get the current default output device.
    ///
    /// Returns [`DeviceHandle::NONE`] when the query fails: having no output
    /// device is a normal condition during hot-plug.
    pub fn current_default_output_device(&self) -> DeviceHandle {
        match self.hardware.default_output_device() {
            Ok(device) => device,
            Err(e) => {
                warn!(error = %e, "Failed to get default output device");
                DeviceHandle::NONE
            }
        }
    }
}
