//! Audio module for CoreAudio output-device interactions.
//!
//! This module provides default output device lookup, mute/volume
//! resolution, per-device subscription bookkeeping and property change
//! notifications.

#[cfg(target_os = "macos")]
pub mod coreaudio;
pub mod device;
pub mod enumerator;
pub mod hardware;
pub mod notifications;
pub mod registry;
#[cfg(test)]
pub(crate) mod simulated;
pub mod volume;

#[cfg(target_os = "macos")]
pub use coreaudio::CoreAudioHardware;
pub use device::{
    AudioError, ChannelIdentity, DeviceHandle, Element, MonitorEvent, NormalizedVolumeState, Scope,
    Selector,
};
pub use enumerator::DeviceDirectory;
pub use hardware::{AudioHardware, PropertyListener};
pub use notifications::{ChannelHandler, DispatchTable, NotificationDispatcher};
pub use registry::SubscriptionRegistry;
pub use volume::VolumeResolver;
