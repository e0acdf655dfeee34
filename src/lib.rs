//! MenuBar Volume - Library
//!
//! Tracks the volume and mute state of the current default macOS output
//! device and reports it to a status indicator.
//!
//! ## Features
//!
//! - Follows the default output device as it changes at runtime
//! - Listens for mute and per-channel volume changes, once per device
//! - Resolves mute before volume so a muted device always shows 0%
//! - Icon tier and/or percentage display, driven by two saved preferences

pub mod app;
pub mod audio;
pub mod config;
pub mod platform;
pub mod ui;

pub use app::VolumeMonitor;
#[cfg(target_os = "macos")]
pub use audio::CoreAudioHardware;
pub use audio::{AudioError, AudioHardware, DeviceHandle, MonitorEvent, NormalizedVolumeState};
pub use config::{MonitorConfig, SubscriptionPolicy};
pub use platform::{DisplayPreferences, PreferencesStore};
pub use ui::{PresentationSink, StatusLineSink, VolumeTier};
