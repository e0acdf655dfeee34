//! Mute and volume resolution.
//!
//! The hardware does not fold mute into the scalar volume, so the effective
//! volume is resolved in two steps: mute first, then the aggregate volume.

use super::device::{DeviceHandle, NormalizedVolumeState};
use super::hardware::AudioHardware;
use tracing::warn;

/// Resolves a device's effective volume.
pub struct VolumeResolver<'a, H: AudioHardware + ?Sized> {
    hardware: &'a H,
}

impl<'a, H: AudioHardware + ?Sized> VolumeResolver<'a, H> {
    pub fn new(hardware: &'a H) -> Self {
        Self { hardware }
    }

    /// Get the effective normalized volume of a device.
    ///
    /// A failed mute read counts as unmuted. A failed volume read yields 0.0.
    pub fn effective_volume(&self, device: DeviceHandle) -> NormalizedVolumeState {
        let muted = match self.hardware.mute(device) {
            Ok(muted) => muted,
            Err(e) => {
                warn!(%device, error = %e, "Failed to read mute state, assuming unmuted");
                false
            }
        };

        // A muted device's scalar is not what the user hears.
        if muted {
            return NormalizedVolumeState::muted();
        }

        match self.hardware.virtual_main_volume(device) {
            Ok(level) => NormalizedVolumeState::at_level(level),
            Err(e) => {
                warn!(%device, error = %e, "Failed to read device volume");
                NormalizedVolumeState::at_level(0.0)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::simulated::{SimulatedDevice, SimulatedHardware};

    const DEVICE: DeviceHandle = DeviceHandle(51);

    fn resolve(device: SimulatedDevice) -> NormalizedVolumeState {
        let hardware = SimulatedHardware::new();
        hardware.add_device(DEVICE, device);
        VolumeResolver::new(&hardware).effective_volume(DEVICE)
    }

    #[test]
    fn test_mute_dominates_volume() {
        for volume in [0.0, 0.25, 0.8, 1.0] {
            let state = resolve(SimulatedDevice::with_volume(volume).muted(true));
            assert_eq!(state, NormalizedVolumeState::muted());
        }
    }

    #[test]
    fn test_unmuted_level_passes_through() {
        for volume in [0.0, 0.1, 0.5, 0.99, 1.0] {
            let state = resolve(SimulatedDevice::with_volume(volume));
            assert!(!state.is_muted());
            assert_eq!(state.level(), volume);
        }
    }

    #[test]
    fn test_muted_device_skips_volume_read() {
        let hardware = SimulatedHardware::new();
        hardware.add_device(DEVICE, SimulatedDevice::with_volume(0.8).muted(true));

        VolumeResolver::new(&hardware).effective_volume(DEVICE);
        assert_eq!(hardware.volume_reads(), 0);
    }

    #[test]
    fn test_mute_read_failure_is_fail_open() {
        let state = resolve(SimulatedDevice::with_volume(0.6).without_mute());
        assert_eq!(state, NormalizedVolumeState::at_level(0.6));
    }

    #[test]
    fn test_volume_read_failure_yields_zero() {
        let state = resolve(SimulatedDevice::default().without_volume());
        assert_eq!(state, NormalizedVolumeState::at_level(0.0));
    }

    #[test]
    fn test_out_of_range_volume_is_clamped() {
        assert_eq!(resolve(SimulatedDevice::with_volume(1.3)).level(), 1.0);
    }

    #[test]
    fn test_unknown_device_resolves_to_fallback() {
        let hardware = SimulatedHardware::new();
        let state = VolumeResolver::new(&hardware).effective_volume(DeviceHandle::NONE);
        assert_eq!(state, NormalizedVolumeState::at_level(0.0));
    }
}
