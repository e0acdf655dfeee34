//! CoreAudio HAL implementation of [`AudioHardware`].
//!
//! Property reads go through `AudioObjectGetPropertyData`; listeners are
//! attached with `AudioObjectAddPropertyListener` and a C trampoline that
//! forwards each batch of changed addresses to the boxed Rust listener.

use super::device::{AudioError, ChannelIdentity, DeviceHandle, Element, Scope, Selector};
use super::hardware::{AudioHardware, PropertyListener};
use coreaudio_sys::{
    AudioObjectAddPropertyListener, AudioObjectGetPropertyData, AudioObjectHasProperty,
    AudioObjectID, AudioObjectPropertyAddress, AudioObjectSetPropertyData, OSStatus,
};
use std::ffi::c_void;
use std::panic::{self, AssertUnwindSafe};
use std::{mem, ptr};
use tracing::{debug, error};

const NO_ERROR: OSStatus = 0;

/// `kAudioHardwarePropertyRunLoop`
const RUN_LOOP_SELECTOR: u32 = u32::from_be_bytes(*b"rnlp");

/// The CoreAudio HAL.
pub struct CoreAudioHardware {
    _private: (),
}

impl CoreAudioHardware {
    /// Prepare the HAL for use from a process without a main CFRunLoop.
    ///
    /// Sets the HAL notification run loop to null so listeners are called on
    /// the HAL's own thread; the monitor thread blocks on its event channel
    /// and never services a run loop.
    pub fn new() -> Result<Self, AudioError> {
        let address = AudioObjectPropertyAddress {
            mSelector: RUN_LOOP_SELECTOR,
            mScope: Scope::Global.as_raw(),
            mElement: Element::MAIN.0,
        };
        let run_loop: *const c_void = ptr::null();

        let status = unsafe {
            AudioObjectSetPropertyData(
                DeviceHandle::SYSTEM_OBJECT.0,
                &address,
                0,
                ptr::null(),
                mem::size_of::<*const c_void>() as u32,
                &run_loop as *const *const c_void as *const c_void,
            )
        };
        if status != NO_ERROR {
            return Err(AudioError::HardwareConfig(status));
        }

        debug!("CoreAudio notifications will use the HAL thread");
        Ok(Self { _private: () })
    }

    fn address(channel: ChannelIdentity) -> AudioObjectPropertyAddress {
        AudioObjectPropertyAddress {
            mSelector: channel.selector.as_raw(),
            mScope: channel.scope.as_raw(),
            mElement: channel.element.0,
        }
    }

    /// Read a fixed-size property value.
    fn read<T: Copy + Default>(
        &self,
        device: DeviceHandle,
        channel: ChannelIdentity,
    ) -> Result<T, AudioError> {
        let address = Self::address(channel);
        let mut value = T::default();
        let mut size = mem::size_of::<T>() as u32;

        let status = unsafe {
            AudioObjectGetPropertyData(
                device.0,
                &address,
                0,
                ptr::null(),
                &mut size,
                &mut value as *mut T as *mut c_void,
            )
        };

        if status != NO_ERROR {
            return Err(AudioError::PropertyRead {
                device,
                channel,
                status,
            });
        }
        Ok(value)
    }
}

impl AudioHardware for CoreAudioHardware {
    fn default_output_device(&self) -> Result<DeviceHandle, AudioError> {
        let id: AudioObjectID = self.read(
            DeviceHandle::SYSTEM_OBJECT,
            ChannelIdentity::default_output_device(),
        )?;
        Ok(DeviceHandle(id))
    }

    fn mute(&self, device: DeviceHandle) -> Result<bool, AudioError> {
        let muted: u32 = self.read(device, ChannelIdentity::mute())?;
        Ok(muted != 0)
    }

    fn virtual_main_volume(&self, device: DeviceHandle) -> Result<f32, AudioError> {
        self.read(device, ChannelIdentity::virtual_main_volume())
    }

    fn has_channel(&self, device: DeviceHandle, channel: ChannelIdentity) -> bool {
        let address = Self::address(channel);
        unsafe { AudioObjectHasProperty(device.0, &address) != 0 }
    }

    fn add_listener(
        &self,
        device: DeviceHandle,
        channel: ChannelIdentity,
        listener: PropertyListener,
    ) -> Result<(), AudioError> {
        let address = Self::address(channel);
        // Owned by the HAL for the rest of the process; never removed.
        let client_data = Box::into_raw(Box::new(listener));

        let status = unsafe {
            AudioObjectAddPropertyListener(
                device.0,
                &address,
                Some(property_listener),
                client_data as *mut c_void,
            )
        };

        if status != NO_ERROR {
            unsafe {
                drop(Box::from_raw(client_data));
            }
            return Err(AudioError::ListenerAdd {
                device,
                channel,
                status,
            });
        }
        Ok(())
    }
}

/// Convert a raw HAL property address.
fn channel_from_address(address: &AudioObjectPropertyAddress) -> ChannelIdentity {
    ChannelIdentity::new(
        Selector::from_raw(address.mSelector),
        Scope::from_raw(address.mScope),
        Element(address.mElement),
    )
}

/// Called by the HAL on its notification thread.
unsafe extern "C" fn property_listener(
    object: AudioObjectID,
    address_count: u32,
    addresses: *const AudioObjectPropertyAddress,
    client_data: *mut c_void,
) -> OSStatus {
    if addresses.is_null() || client_data.is_null() {
        return NO_ERROR;
    }

    let listener = &*(client_data as *const PropertyListener);
    let batch: Vec<ChannelIdentity> = std::slice::from_raw_parts(addresses, address_count as usize)
        .iter()
        .map(channel_from_address)
        .collect();

    // Never unwind into the HAL.
    if panic::catch_unwind(AssertUnwindSafe(|| listener(&batch))).is_err() {
        error!(object, "Property listener panicked");
    }
    NO_ERROR
}
