//! Audio device data models.
//!
//! Defines the core data structures for identifying output devices and their
//! notification channels, the normalized volume state derived from them, and
//! the events that flow from the OS callback context into the monitor loop.

use std::fmt;
use thiserror::Error;

/// Builds a CoreAudio four-character code.
const fn fourcc(code: &[u8; 4]) -> u32 {
    u32::from_be_bytes(*code)
}

/// Opaque identifier for an audio object, as assigned by the OS audio subsystem.
///
/// Not stable across device reconnection. Value 0 means "no device".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct DeviceHandle(pub u32);

impl DeviceHandle {
    /// Returned by the device directory when no default output device is available.
    pub const NONE: DeviceHandle = DeviceHandle(0);

    /// The global system audio object that owns the default-device property.
    pub const SYSTEM_OBJECT: DeviceHandle = DeviceHandle(1);

    /// True for the "no device" sentinel.
    pub fn is_none(&self) -> bool {
        *self == Self::NONE
    }
}

impl fmt::Display for DeviceHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Property class of a notification channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Selector {
    /// System-wide default output device (`dOut`)
    DefaultOutputDevice,

    /// Device mute flag (`mute`)
    Mute,

    /// Per-channel volume scalar, the property that actually fires notifications (`volm`)
    VolumeScalar,

    /// Read-only aggregate volume service property (`vmvc`)
    VirtualMainVolume,

    /// Any selector this crate does not interpret
    Other(u32),
}

impl Selector {
    const DEFAULT_OUTPUT_DEVICE: u32 = fourcc(b"dOut");
    const MUTE: u32 = fourcc(b"mute");
    const VOLUME_SCALAR: u32 = fourcc(b"volm");
    const VIRTUAL_MAIN_VOLUME: u32 = fourcc(b"vmvc");

    /// Map a raw four-character selector onto the known variants.
    pub fn from_raw(raw: u32) -> Self {
        match raw {
            Self::DEFAULT_OUTPUT_DEVICE => Selector::DefaultOutputDevice,
            Self::MUTE => Selector::Mute,
            Self::VOLUME_SCALAR => Selector::VolumeScalar,
            Self::VIRTUAL_MAIN_VOLUME => Selector::VirtualMainVolume,
            other => Selector::Other(other),
        }
    }

    pub fn as_raw(&self) -> u32 {
        match self {
            Selector::DefaultOutputDevice => Self::DEFAULT_OUTPUT_DEVICE,
            Selector::Mute => Self::MUTE,
            Selector::VolumeScalar => Self::VOLUME_SCALAR,
            Selector::VirtualMainVolume => Self::VIRTUAL_MAIN_VOLUME,
            Selector::Other(raw) => *raw,
        }
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let raw = self.as_raw().to_be_bytes();
        if raw.iter().all(|b| b.is_ascii_graphic()) {
            write!(f, "'{}'", String::from_utf8_lossy(&raw))
        } else {
            write!(f, "{:#010x}", self.as_raw())
        }
    }
}

/// Logical direction of a notification channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scope {
    Global,
    Output,
    Other(u32),
}

impl Scope {
    const GLOBAL: u32 = fourcc(b"glob");
    const OUTPUT: u32 = fourcc(b"outp");

    pub fn from_raw(raw: u32) -> Self {
        match raw {
            Self::GLOBAL => Scope::Global,
            Self::OUTPUT => Scope::Output,
            other => Scope::Other(other),
        }
    }

    pub fn as_raw(&self) -> u32 {
        match self {
            Scope::Global => Self::GLOBAL,
            Scope::Output => Self::OUTPUT,
            Scope::Other(raw) => *raw,
        }
    }
}

/// Channel element: 0 is the aggregate ("main") channel, 1 and 2 are left and right.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Element(pub u32);

impl Element {
    pub const MAIN: Element = Element(0);
    pub const LEFT: Element = Element(1);
    pub const RIGHT: Element = Element(2);
}

/// One hardware notification channel on one audio object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChannelIdentity {
    pub selector: Selector,
    pub scope: Scope,
    pub element: Element,
}

impl ChannelIdentity {
    pub fn new(selector: Selector, scope: Scope, element: Element) -> Self {
        Self {
            selector,
            scope,
            element,
        }
    }

    /// System-wide "default output device changed" channel.
    pub fn default_output_device() -> Self {
        Self::new(Selector::DefaultOutputDevice, Scope::Global, Element::MAIN)
    }

    /// Output mute flag on the main element.
    pub fn mute() -> Self {
        Self::new(Selector::Mute, Scope::Output, Element::MAIN)
    }

    /// Output volume scalar on the given element.
    pub fn volume(element: Element) -> Self {
        Self::new(Selector::VolumeScalar, Scope::Output, element)
    }

    /// Aggregate volume service property. Readable, but never fires notifications.
    pub fn virtual_main_volume() -> Self {
        Self::new(Selector::VirtualMainVolume, Scope::Output, Element::MAIN)
    }
}

impl fmt::Display for ChannelIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{:?}/{}", self.selector, self.scope, self.element.0)
    }
}

/// Effective volume of a device as the user perceives it.
///
/// Only built through [`muted`](Self::muted) and [`at_level`](Self::at_level),
/// so a muted state always has level 0.0 and the level is always in range.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct NormalizedVolumeState {
    is_muted: bool,
    level: f32,
}

impl NormalizedVolumeState {
    pub fn muted() -> Self {
        Self {
            is_muted: true,
            level: 0.0,
        }
    }

    /// Unmuted state at the given scalar, clamped into range. NaN maps to 0.0.
    pub fn at_level(level: f32) -> Self {
        let level = if level.is_nan() {
            0.0
        } else {
            level.clamp(0.0, 1.0)
        };
        Self {
            is_muted: false,
            level,
        }
    }

    pub fn is_muted(&self) -> bool {
        self.is_muted
    }

    /// Volume level as scalar (0.0 to 1.0), 0.0 when muted.
    pub fn level(&self) -> f32 {
        self.level
    }

    /// Volume as percentage (0-100).
    pub fn volume_percent(&self) -> u8 {
        (self.level * 100.0).round() as u8
    }
}

/// Events delivered from the OS notification context to the monitor loop.
#[derive(Debug, Clone, PartialEq)]
pub enum MonitorEvent {
    /// The system default output device changed
    DefaultDeviceChanged,

    /// Volume or mute changed on a device
    VolumeOrMuteChanged {
        device: DeviceHandle,
        channel: ChannelIdentity,
    },
}

/// Audio service error types.
#[derive(Debug, Error)]
pub enum AudioError {
    #[error("Failed to read {channel} on device {device}: OSStatus {status}")]
    PropertyRead {
        device: DeviceHandle,
        channel: ChannelIdentity,
        status: i32,
    },

    #[error("Failed to add listener for {channel} on device {device}: OSStatus {status}")]
    ListenerAdd {
        device: DeviceHandle,
        channel: ChannelIdentity,
        status: i32,
    },

    #[error("Failed to configure the audio hardware: OSStatus {0}")]
    HardwareConfig(i32),
}
