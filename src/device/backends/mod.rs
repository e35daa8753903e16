//! The host windowing backends.
//!
//! Everything the device needs from the host window system goes through the
//! `Visitor` trait, so exactly one backend is active per build and the rest
//! of the crate never learns which one: the winit/glutin visitor for
//! windowed devices, or the headless visitor when the null driver was
//! requested and no window or context must exist.

mod headless;

use std::os::raw::c_void;

use crate::errors::Result;
use crate::math::prelude::Vector2;

use super::cursor::CursorStyle;
use super::events::{Event, UserEvent};
use super::DeviceParams;

/// An opaque host cursor resource, owned by the backend registry. Handles
/// are created by `named_cursor`/`create_cursor` and must be released
/// through `delete_cursor` exactly once, strictly before the backend (and
/// with it the rendering context) is dropped.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CursorHandle(pub(crate) u64);

/// An RGBA cursor image ready for host cursor creation, as produced by the
/// cursor controller from a sprite source.
#[derive(Debug, Clone)]
pub struct CursorImage {
    /// Tightly packed RGBA8 rows, `width * height * 4` bytes.
    pub rgba: Vec<u8>,
    pub width: u32,
    pub height: u32,
    /// The click position inside the image.
    pub hotspot: Vector2<u32>,
}

/// One display mode supported by the monitor the window sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VideoMode {
    pub dimensions: Vector2<u32>,
    pub bits: u16,
    pub refresh_millihertz: u32,
}

pub trait Visitor {
    /// The size in pixels of the window client area.
    fn dimensions(&self) -> Vector2<u32>;

    /// The position of the window frame on screen.
    fn position(&self) -> Vector2<i32>;

    fn set_caption(&mut self, caption: &str);

    /// Asks the host to resize the window client area.
    fn set_dimensions(&mut self, dimensions: Vector2<u32>);

    fn set_resizable(&mut self, resizable: bool);
    fn minimize(&mut self);
    fn maximize(&mut self);
    fn restore(&mut self);
    fn is_focused(&self) -> bool;
    fn is_minimized(&self) -> bool;
    fn video_modes(&self) -> Vec<VideoMode>;

    /// Drains all pending host events, translating each into zero or more
    /// normalized events. Non-blocking.
    fn poll_events(&mut self, events: &mut Vec<Event>);

    /// True once the host has asked the window to close.
    fn close_requested(&self) -> bool;

    /// Enqueues an application event behind the pending host events.
    fn post_user_event(&mut self, event: UserEvent);

    fn resize_surface(&mut self, dimensions: Vector2<u32>);
    fn swap_buffers(&mut self) -> Result<()>;
    fn proc_address(&self, symbol: &str) -> *const c_void;

    fn named_cursor(&mut self, style: CursorStyle) -> CursorHandle;
    fn create_cursor(&mut self, image: CursorImage) -> Result<CursorHandle>;
    fn set_cursor(&mut self, cursor: &CursorHandle);
    fn delete_cursor(&mut self, cursor: CursorHandle);
    fn set_cursor_visible(&mut self, visible: bool);

    /// The raw pointer position as last reported by the host, unclamped.
    fn cursor_position(&self) -> Vector2<i32>;

    /// Warps the host pointer.
    fn set_cursor_position(&mut self, position: Vector2<i32>);
}

pub(crate) fn new_headless(params: &DeviceParams) -> Box<dyn Visitor> {
    Box::new(self::headless::HeadlessVisitor::new(params.size))
}

#[cfg(test)]
pub(crate) use self::headless::HeadlessVisitor;

#[cfg(not(target_arch = "wasm32"))]
mod winit;

#[cfg(not(target_arch = "wasm32"))]
pub(crate) fn new(params: &DeviceParams) -> Result<Box<dyn Visitor>> {
    let visitor = self::winit::WinitVisitor::new(params)?;
    Ok(Box::new(visitor))
}
