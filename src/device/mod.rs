//! The platform device.
//!
//! A `Device` owns one window and its rendering context, the video driver
//! bound to that context, and the input machinery that turns host events
//! into the normalized event model. Everything runs on one thread: the
//! application calls [`Device::run`] once per frame, the device drains the
//! pending host events and hands each to the registered receiver
//! synchronously, polls the joysticks, and reports whether it intends to
//! keep running.
//!
//! ```rust,no_run
//! use lantern::prelude::*;
//!
//! let mut device = Device::new(DeviceParams::default()).unwrap();
//! while device.run() {
//!     if let Some(_driver) = device.driver_mut() {
//!         // _driver.begin_scene(...) / draw / _driver.end_scene()
//!     }
//! }
//! ```

pub mod backends;
pub mod cursor;
pub mod events;
pub mod joystick;
pub mod keymap;
pub mod mouse;
pub mod time;
pub mod touch;

use std::thread;
use std::time::Duration;

use crate::errors::Result;
use crate::math::prelude::{Rect, Vector2};
use crate::video::{self, ColorFormat, Driver, DriverType};

use self::backends::{VideoMode, Visitor};
use self::cursor::{CursorControl, CursorIconId, CursorSprite};
use self::events::{Event, EventReceiver, JoystickEvent, UserEvent};
use self::joystick::{JoystickDescriptor, JoystickManager};
use self::time::Timer;

/// A structure containing configuration data for the device, consumed once
/// at construction to set up the window, the rendering context and the
/// driver bound to it.
pub struct DeviceParams {
    /// The rendering backend to instantiate. The null driver creates no
    /// window or context at all.
    pub driver_type: DriverType,
    /// The initial window caption.
    pub title: String,
    /// The size in pixels of the window client area.
    pub size: Vector2<u32>,
    /// Color depth of the window surface, 16 or 32.
    pub bits: u8,
    /// Depth-buffer precision.
    pub depth_bits: u8,
    pub fullscreen: bool,
    pub vsync: bool,
    /// Request a stereo framebuffer for quad-buffer stereo rendering.
    pub stereo: bool,
    pub double_buffer: bool,
    /// Request an alpha channel on the window surface.
    pub with_alpha: bool,
    /// The multisampling level to request; 0 or 1 disables antialiasing.
    pub antialias: u8,
    /// The receiver the run loop dispatches events to. Can also be
    /// installed later through [`Device::set_event_receiver`].
    pub event_receiver: Option<Box<dyn EventReceiver>>,
}

impl Default for DeviceParams {
    fn default() -> Self {
        DeviceParams {
            driver_type: DriverType::OpenGl,
            title: "Lantern".to_owned(),
            size: Vector2::new(800, 600),
            bits: 32,
            depth_bits: 24,
            fullscreen: false,
            vsync: false,
            stereo: false,
            double_buffer: true,
            with_alpha: false,
            antialias: 0,
            event_receiver: None,
        }
    }
}

/// The platform device. See the module documentation.
pub struct Device {
    timer: Timer,
    receiver: Option<Box<dyn EventReceiver>>,
    driver: Option<Box<dyn Driver>>,
    cursor: CursorControl,
    joysticks: JoystickManager,
    events: Vec<Event>,
    joystick_events: Vec<JoystickEvent>,
    close: bool,
    driver_type: DriverType,
    color_format: ColorFormat,
    // Dropped last: the window and context must outlive everything that
    // derives from them.
    visitor: Box<dyn Visitor>,
}

impl Device {
    /// Creates a device per `params`.
    ///
    /// Failure to create the window or context for a supported driver type
    /// is fatal and reported as `Err`. A driver type that is not compiled
    /// into the build is not: the error is logged, no window is created
    /// and the device comes up without a driver; callers are expected to
    /// check [`Device::driver`] and shut down in an orderly fashion.
    pub fn new(mut params: DeviceParams) -> Result<Self> {
        info!("lantern {}", env!("CARGO_PKG_VERSION"));
        info!(
            "os: {} {}",
            ::std::env::consts::OS,
            ::std::env::consts::ARCH
        );

        let receiver = params.event_receiver.take();
        let requested = params.driver_type;
        let compiled_in = video::backends::is_compiled_in(requested);
        if !compiled_in {
            error!("no {} support compiled in", requested);
        }

        let mut visitor: Box<dyn Visitor> =
            if requested == DriverType::Null || !compiled_in {
                backends::new_headless(&params)
            } else {
                backends::new(&params)?
            };

        let driver = if compiled_in {
            let loader = |symbol: &str| visitor.proc_address(symbol);
            video::backends::create_driver(requested, params.size, &loader)
        } else {
            None
        };

        // Cursor resources derive from the context, so the controller is
        // built only now.
        let cursor = CursorControl::new(visitor.as_mut());

        Ok(Device {
            timer: Timer::new(),
            receiver,
            driver,
            cursor,
            joysticks: JoystickManager::new(),
            events: Vec::new(),
            joystick_events: Vec::new(),
            close: false,
            driver_type: requested,
            color_format: color_format_from_bits(params.bits, params.with_alpha),
            visitor,
        })
    }

    /// Runs one iteration of the device loop: drains all pending host
    /// events, dispatches each to the receiver, then polls the joysticks.
    /// Returns `false` once the device wants to be dropped, after an
    /// explicit [`Device::close`] or a host close request.
    pub fn run(&mut self) -> bool {
        self.timer.tick();

        if self.close {
            return false;
        }

        let mut events = ::std::mem::take(&mut self.events);
        self.visitor.poll_events(&mut events);
        for event in events.drain(..) {
            if self.close {
                break;
            }
            if let Event::WindowResized { size } = event {
                self.visitor.resize_surface(size);
                if let Some(driver) = self.driver.as_mut() {
                    driver.on_resize(size);
                }
            }
            self.post_event(event);
        }
        self.events = events;

        if self.visitor.close_requested() {
            self.close = true;
        }

        if !self.close {
            let mut snapshots = ::std::mem::take(&mut self.joystick_events);
            self.joysticks.poll(&mut snapshots);
            for snapshot in snapshots.drain(..) {
                self.post_event(Event::Joystick(snapshot));
            }
            self.joystick_events = snapshots;

            let now = self.timer.real_time();
            self.cursor.animate(self.visitor.as_mut(), now);
        }

        !self.close
    }

    /// Hands an event to the registered receiver. Returns whether the
    /// receiver consumed it; without a receiver every event falls through.
    pub fn post_event(&mut self, event: Event) -> bool {
        match self.receiver.as_mut() {
            Some(receiver) => receiver.on_event(&event),
            None => false,
        }
    }

    /// Notifies the device that it should close itself; the current and
    /// any further [`Device::run`] report not-running.
    pub fn close(&mut self) {
        self.close = true;
    }

    pub fn set_event_receiver(&mut self, receiver: Option<Box<dyn EventReceiver>>) {
        self.receiver = receiver;
    }

    /// Posts an application event behind the pending host events; it is
    /// delivered through the receiver like any other event.
    pub fn post_user_event(&mut self, data1: i32, data2: i32) {
        self.visitor.post_user_event(UserEvent { data1, data2 });
    }

    /// The driver bound to the window context, absent when driver creation
    /// failed or the requested backend is not part of the build.
    #[inline]
    pub fn driver(&self) -> Option<&dyn Driver> {
        self.driver.as_deref()
    }

    #[inline]
    pub fn driver_mut(&mut self) -> Option<&mut (dyn Driver + 'static)> {
        self.driver.as_deref_mut()
    }

    #[inline]
    pub fn timer(&self) -> &Timer {
        &self.timer
    }

    #[inline]
    pub fn timer_mut(&mut self) -> &mut Timer {
        &mut self.timer
    }

    /// Pauses briefly so other host processes can run, without a
    /// measurable delay for the device.
    pub fn yield_now(&self) {
        thread::yield_now();
    }

    /// Pauses execution for `duration`. With `pause_timer` the device
    /// timer is stopped around the wait, so idle time is not counted as
    /// elapsed virtual time.
    pub fn sleep(&mut self, duration: Duration, pause_timer: bool) {
        let was_stopped = self.timer.is_stopped();
        if pause_timer && !was_stopped {
            self.timer.stop();
        }

        thread::sleep(duration);

        if pause_timer && !was_stopped {
            self.timer.start();
        }
    }

    /// Enumerates the attached joysticks and starts polling them once per
    /// run-loop iteration. One-shot; the returned descriptors are static.
    pub fn activate_joysticks(&mut self) -> Vec<JoystickDescriptor> {
        self.joysticks.activate()
    }

    // ------------------------------------------------------------------
    // Window pass-throughs.

    /// Sets the window caption. A no-op under the null driver.
    pub fn set_window_caption(&mut self, caption: &str) {
        if self.driver_type == DriverType::Null {
            return;
        }
        self.visitor.set_caption(caption);
    }

    /// Asks the host to resize the window client area. The actual resize
    /// arrives later as an [`Event::WindowResized`].
    pub fn set_window_size(&mut self, size: Vector2<u32>) {
        self.visitor.set_dimensions(size);
    }

    pub fn set_resizable(&mut self, resizable: bool) {
        self.visitor.set_resizable(resizable);
    }

    pub fn minimize_window(&mut self) {
        self.visitor.minimize();
    }

    pub fn maximize_window(&mut self) {
        self.visitor.maximize();
    }

    pub fn restore_window(&mut self) {
        self.visitor.restore();
    }

    #[inline]
    pub fn window_position(&self) -> Vector2<i32> {
        self.visitor.position()
    }

    /// The size in pixels of the window client area.
    #[inline]
    pub fn dimensions(&self) -> Vector2<u32> {
        self.visitor.dimensions()
    }

    /// True while the window is focused and not minimized; nothing needs
    /// to be drawn otherwise.
    pub fn is_window_active(&self) -> bool {
        self.visitor.is_focused() && !self.visitor.is_minimized()
    }

    #[inline]
    pub fn is_window_focused(&self) -> bool {
        self.visitor.is_focused()
    }

    #[inline]
    pub fn is_window_minimized(&self) -> bool {
        self.visitor.is_minimized()
    }

    /// The display modes supported by the monitor the window sits on.
    pub fn video_modes(&self) -> Vec<VideoMode> {
        self.visitor.video_modes()
    }

    /// The color format of the window surface.
    #[inline]
    pub fn color_format(&self) -> ColorFormat {
        self.color_format
    }

    /// Presents the back buffer.
    pub fn swap_buffers(&mut self) -> Result<()> {
        self.visitor.swap_buffers()
    }

    // ------------------------------------------------------------------
    // Cursor pass-throughs.

    pub fn set_cursor_visible(&mut self, visible: bool) {
        self.cursor.set_visible(self.visitor.as_mut(), visible);
    }

    #[inline]
    pub fn is_cursor_visible(&self) -> bool {
        self.cursor.is_visible()
    }

    /// Activates a cursor icon; see [`CursorControl::set_active`].
    pub fn set_active_cursor(&mut self, id: CursorIconId) {
        let now = self.timer.real_time();
        self.cursor.set_active(self.visitor.as_mut(), id, now);
    }

    #[inline]
    pub fn active_cursor(&self) -> CursorIconId {
        self.cursor.active()
    }

    /// Converts a sprite into a new cursor icon.
    pub fn add_cursor_icon(&mut self, sprite: &CursorSprite) -> Result<CursorIconId> {
        self.cursor.add_icon(self.visitor.as_mut(), sprite)
    }

    /// Replaces the frames behind an existing cursor icon.
    pub fn change_cursor_icon(&mut self, id: CursorIconId, sprite: &CursorSprite) -> Result<()> {
        self.cursor.change_icon(self.visitor.as_mut(), id, sprite)
    }

    /// The pointer position clamped into the window extent.
    pub fn cursor_position(&self) -> Vector2<i32> {
        self.cursor.position(self.visitor.as_ref())
    }

    /// The pointer position normalized against the reference rectangle or
    /// the window extent.
    pub fn cursor_relative_position(&self) -> Vector2<f32> {
        self.cursor.relative_position(self.visitor.as_ref())
    }

    /// Warps the pointer.
    pub fn set_cursor_position(&mut self, position: Vector2<i32>) {
        self.cursor.set_position(self.visitor.as_mut(), position);
    }

    /// Installs or removes the rectangle relative cursor coordinates are
    /// normalized against, e.g. for captured-mouse input.
    pub fn set_cursor_reference_rect(&mut self, rect: Option<Rect>) {
        self.cursor.set_reference_rect(rect);
    }

    #[inline]
    pub fn cursor_reference_rect(&self) -> Option<Rect> {
        self.cursor.reference_rect()
    }
}

impl Drop for Device {
    fn drop(&mut self) {
        // Cursor resources first, then the driver; the visitor field (and
        // with it the context and window) goes last.
        self.cursor.clear(self.visitor.as_mut());
        self.driver = None;
    }
}

fn color_format_from_bits(bits: u8, with_alpha: bool) -> ColorFormat {
    match bits {
        16 => {
            if with_alpha {
                ColorFormat::A1R5G5B5
            } else {
                ColorFormat::R5G6B5
            }
        }
        _ => ColorFormat::A8R8G8B8,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn color_formats_follow_the_requested_depth() {
        assert_eq!(color_format_from_bits(16, false), ColorFormat::R5G6B5);
        assert_eq!(color_format_from_bits(16, true), ColorFormat::A1R5G5B5);
        assert_eq!(color_format_from_bits(32, false), ColorFormat::A8R8G8B8);
        assert_eq!(color_format_from_bits(32, true), ColorFormat::A8R8G8B8);
    }
}
