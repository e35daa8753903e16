//! Joystick enumeration and polling.
//!
//! `activate` is a one-shot enumeration of the host joystick devices; it
//! opens every device it finds and hands the caller a list of static
//! descriptors. Afterwards the device run loop calls `poll` once per
//! iteration: all pending raw deltas are drained from each stick and folded
//! into its persistent snapshot, and the snapshot is re-emitted whether or
//! not any new hardware data arrived, so downstream consumers always
//! observe a current-state heartbeat once per tick.
//!
//! Exactly one platform backend is compiled in: the Linux kernel joystick
//! interface (`/dev/input/js*`), or a fallback that reports no devices
//! elsewhere.

use super::events::{JoystickEvent, JOYSTICK_AXES};

/// The maximum number of joystick devices probed by `activate`.
pub const MAX_JOYSTICKS: usize = 32;

/// Whether a joystick has a directional hat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PovHat {
    Present,
    Absent,
    /// The platform cannot tell; hats usually surface as two extra axes.
    Unknown,
}

/// The static description of one enumerated joystick.
#[derive(Debug, Clone)]
pub struct JoystickDescriptor {
    /// The index used as `JoystickEvent::id`.
    pub joystick: u8,
    pub axes: u32,
    pub buttons: u32,
    pub name: String,
    pub pov_hat: PovHat,
}

/// A raw device delta, as reported by the platform backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum RawDelta {
    Button { index: u8, pressed: bool },
    Axis { index: u8, value: i16 },
}

/// Folds one raw delta into a snapshot. Button deltas set or clear single
/// bits; axis deltas overwrite the addressed slot. Out-of-range indices
/// leave the snapshot unchanged.
pub(crate) fn apply_delta(snapshot: &mut JoystickEvent, delta: RawDelta) {
    match delta {
        RawDelta::Button { index, pressed } => {
            if u32::from(index) >= 32 {
                trace!("joystick button index {} out of range", index);
                return;
            }
            if pressed {
                snapshot.buttons |= 1 << u32::from(index);
            } else {
                snapshot.buttons &= !(1 << u32::from(index));
            }
        }
        RawDelta::Axis { index, value } => {
            if usize::from(index) >= JOYSTICK_AXES {
                trace!("joystick axis index {} out of range", index);
                return;
            }
            snapshot.axes[usize::from(index)] = value;
        }
    }
}

struct JoystickState {
    handle: platform::Handle,
    snapshot: JoystickEvent,
}

/// Owns the open joystick handles and their persistent snapshots. Handles
/// are closed when the manager is dropped, which the device does during its
/// teardown.
pub struct JoystickManager {
    sticks: Vec<JoystickState>,
}

impl JoystickManager {
    pub fn new() -> Self {
        JoystickManager { sticks: Vec::new() }
    }

    /// Enumerates and opens up to [`MAX_JOYSTICKS`] devices, replacing any
    /// previously active set.
    pub fn activate(&mut self) -> Vec<JoystickDescriptor> {
        self.sticks.clear();

        let mut descriptors = Vec::new();
        for (handle, descriptor) in platform::enumerate() {
            info!(
                "found joystick {}, {} axes, {} buttons '{}'",
                descriptor.joystick, descriptor.axes, descriptor.buttons, descriptor.name
            );

            self.sticks.push(JoystickState {
                handle,
                snapshot: JoystickEvent::new(descriptor.joystick),
            });
            descriptors.push(descriptor);
        }

        descriptors
    }

    /// Drains pending deltas for every active stick and pushes each
    /// snapshot into `out` unconditionally. Sticks whose handle has gone
    /// invalid are skipped without error.
    pub fn poll(&mut self, out: &mut Vec<JoystickEvent>) {
        for stick in &mut self.sticks {
            if !stick.handle.is_valid() {
                continue;
            }

            platform::drain(&stick.handle, &mut stick.snapshot);
            out.push(stick.snapshot);
        }
    }
}

impl Default for JoystickManager {
    fn default() -> Self {
        JoystickManager::new()
    }
}

#[cfg(target_os = "linux")]
mod platform {
    //! The Linux kernel joystick interface.

    use std::ffi::CStr;
    use std::mem;
    use std::os::raw::{c_char, c_int, c_void};

    use super::{JoystickDescriptor, PovHat, RawDelta, MAX_JOYSTICKS};
    use crate::device::events::JoystickEvent;

    // Fixed ABI of <linux/joystick.h>.
    const JSIOCGAXES: libc::c_ulong = 0x8001_6A11;
    const JSIOCGBUTTONS: libc::c_ulong = 0x8001_6A12;
    const JSIOCGNAME_128: libc::c_ulong = 0x8080_6A13;

    const JS_EVENT_BUTTON: u8 = 0x01;
    const JS_EVENT_AXIS: u8 = 0x02;
    const JS_EVENT_INIT: u8 = 0x80;

    #[repr(C)]
    struct JsEvent {
        time: u32,
        value: i16,
        kind: u8,
        number: u8,
    }

    pub struct Handle {
        fd: c_int,
    }

    impl Handle {
        #[inline]
        pub fn is_valid(&self) -> bool {
            self.fd >= 0
        }
    }

    impl Drop for Handle {
        fn drop(&mut self) {
            if self.fd >= 0 {
                unsafe {
                    libc::close(self.fd);
                }
            }
        }
    }

    pub fn enumerate() -> Vec<(Handle, JoystickDescriptor)> {
        let mut result = Vec::new();

        for index in 0..MAX_JOYSTICKS {
            let path = format!("/dev/input/js{}\0", index);
            let fd = unsafe {
                libc::open(
                    path.as_ptr() as *const c_char,
                    libc::O_RDONLY | libc::O_NONBLOCK,
                )
            };
            if fd < 0 {
                continue;
            }

            let mut axes: u8 = 0;
            let mut buttons: u8 = 0;
            let mut name = [0 as c_char; 128];
            unsafe {
                libc::ioctl(fd, JSIOCGAXES, &mut axes as *mut u8);
                libc::ioctl(fd, JSIOCGBUTTONS, &mut buttons as *mut u8);
                libc::ioctl(fd, JSIOCGNAME_128, name.as_mut_ptr());
            }

            let name = unsafe { CStr::from_ptr(name.as_ptr()) }
                .to_string_lossy()
                .into_owned();

            result.push((
                Handle { fd },
                JoystickDescriptor {
                    joystick: index as u8,
                    axes: u32::from(axes),
                    buttons: u32::from(buttons),
                    name,
                    // The kernel interface reports hats as two extra axes.
                    pov_hat: PovHat::Unknown,
                },
            ));
        }

        result
    }

    pub fn drain(handle: &Handle, snapshot: &mut JoystickEvent) {
        let mut event = JsEvent {
            time: 0,
            value: 0,
            kind: 0,
            number: 0,
        };

        loop {
            let read = unsafe {
                libc::read(
                    handle.fd,
                    &mut event as *mut JsEvent as *mut c_void,
                    mem::size_of::<JsEvent>(),
                )
            };
            if read != mem::size_of::<JsEvent>() as isize {
                break;
            }

            match event.kind & !JS_EVENT_INIT {
                JS_EVENT_BUTTON => super::apply_delta(
                    snapshot,
                    RawDelta::Button {
                        index: event.number,
                        pressed: event.value != 0,
                    },
                ),
                JS_EVENT_AXIS => super::apply_delta(
                    snapshot,
                    RawDelta::Axis {
                        index: event.number,
                        value: event.value,
                    },
                ),
                _ => {}
            }
        }
    }
}

#[cfg(not(target_os = "linux"))]
mod platform {
    use super::JoystickDescriptor;
    use crate::device::events::JoystickEvent;

    pub struct Handle;

    impl Handle {
        #[inline]
        pub fn is_valid(&self) -> bool {
            false
        }
    }

    pub fn enumerate() -> Vec<(Handle, JoystickDescriptor)> {
        info!("joystick support is not available on this platform");
        Vec::new()
    }

    pub fn drain(_: &Handle, _: &mut JoystickEvent) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn button_deltas_are_idempotent_per_bit() {
        let mut snapshot = JoystickEvent::new(0);
        snapshot.buttons = 0b1000;

        apply_delta(
            &mut snapshot,
            RawDelta::Button {
                index: 1,
                pressed: true,
            },
        );
        assert_eq!(snapshot.buttons, 0b1010);

        apply_delta(
            &mut snapshot,
            RawDelta::Button {
                index: 1,
                pressed: false,
            },
        );
        assert_eq!(snapshot.buttons, 0b1000);
    }

    #[test]
    fn axis_deltas_overwrite_their_slot() {
        let mut snapshot = JoystickEvent::new(0);
        apply_delta(
            &mut snapshot,
            RawDelta::Axis {
                index: 2,
                value: -32768,
            },
        );
        assert_eq!(snapshot.axes[2], -32768);

        apply_delta(
            &mut snapshot,
            RawDelta::Axis {
                index: 2,
                value: 500,
            },
        );
        assert_eq!(snapshot.axes[2], 500);
    }

    #[test]
    fn out_of_range_deltas_leave_the_snapshot_unchanged() {
        let mut snapshot = JoystickEvent::new(0);
        snapshot.buttons = 0b1;
        snapshot.axes[0] = 7;
        let before = snapshot;

        apply_delta(
            &mut snapshot,
            RawDelta::Axis {
                index: JOYSTICK_AXES as u8,
                value: 123,
            },
        );
        apply_delta(
            &mut snapshot,
            RawDelta::Button {
                index: 32,
                pressed: true,
            },
        );

        assert_eq!(snapshot, before);
    }
}
