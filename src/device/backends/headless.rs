//! The headless backend used by null-driver devices. No window or context
//! exists; window operations are silent no-ops, cursor resources are plain
//! handles, and only user events flow through the queue.

use std::os::raw::c_void;
use std::ptr;

use crate::errors::Result;
use crate::math::prelude::Vector2;

use super::super::cursor::CursorStyle;
use super::super::events::{Event, UserEvent};
use super::{CursorHandle, CursorImage, VideoMode, Visitor};

pub struct HeadlessVisitor {
    dimensions: Vector2<u32>,
    raw_cursor_position: Vector2<i32>,
    user_events: Vec<UserEvent>,
    next_cursor: u64,
    live_cursors: Vec<u64>,
    cursor_sets: Vec<u64>,
}

impl HeadlessVisitor {
    pub fn new(dimensions: Vector2<u32>) -> Self {
        HeadlessVisitor {
            dimensions,
            raw_cursor_position: Vector2::new(0, 0),
            user_events: Vec::new(),
            next_cursor: 0,
            live_cursors: Vec::new(),
            cursor_sets: Vec::new(),
        }
    }

    fn register_cursor(&mut self) -> CursorHandle {
        let id = self.next_cursor;
        self.next_cursor += 1;
        self.live_cursors.push(id);
        CursorHandle(id)
    }

    /// Pretends the host reported the pointer here. Used by the cursor
    /// controller tests to exercise clamping without a window system.
    #[cfg(test)]
    pub(crate) fn set_raw_cursor_position(&mut self, position: Vector2<i32>) {
        self.raw_cursor_position = position;
    }

    /// The history of host cursor activations, in order.
    #[cfg(test)]
    pub(crate) fn cursor_sets(&self) -> &[u64] {
        &self.cursor_sets
    }

    /// The cursor resources that have not been released yet.
    #[cfg(test)]
    pub(crate) fn live_cursors(&self) -> &[u64] {
        &self.live_cursors
    }
}

impl Visitor for HeadlessVisitor {
    #[inline]
    fn dimensions(&self) -> Vector2<u32> {
        self.dimensions
    }

    #[inline]
    fn position(&self) -> Vector2<i32> {
        Vector2::new(0, 0)
    }

    fn set_caption(&mut self, _: &str) {}

    fn set_dimensions(&mut self, dimensions: Vector2<u32>) {
        self.dimensions = dimensions;
    }

    fn set_resizable(&mut self, _: bool) {}
    fn minimize(&mut self) {}
    fn maximize(&mut self) {}
    fn restore(&mut self) {}

    #[inline]
    fn is_focused(&self) -> bool {
        false
    }

    #[inline]
    fn is_minimized(&self) -> bool {
        false
    }

    fn video_modes(&self) -> Vec<VideoMode> {
        Vec::new()
    }

    fn poll_events(&mut self, events: &mut Vec<Event>) {
        events.extend(self.user_events.drain(..).map(Event::User));
    }

    #[inline]
    fn close_requested(&self) -> bool {
        false
    }

    fn post_user_event(&mut self, event: UserEvent) {
        self.user_events.push(event);
    }

    fn resize_surface(&mut self, dimensions: Vector2<u32>) {
        self.dimensions = dimensions;
    }

    fn swap_buffers(&mut self) -> Result<()> {
        Ok(())
    }

    fn proc_address(&self, _: &str) -> *const c_void {
        ptr::null()
    }

    fn named_cursor(&mut self, _: CursorStyle) -> CursorHandle {
        self.register_cursor()
    }

    fn create_cursor(&mut self, _: CursorImage) -> Result<CursorHandle> {
        Ok(self.register_cursor())
    }

    fn set_cursor(&mut self, cursor: &CursorHandle) {
        self.cursor_sets.push(cursor.0);
    }

    fn delete_cursor(&mut self, cursor: CursorHandle) {
        match self.live_cursors.iter().position(|&v| v == cursor.0) {
            Some(index) => {
                self.live_cursors.swap_remove(index);
            }
            None => warn!("cursor resource {} released twice", cursor.0),
        }
    }

    fn set_cursor_visible(&mut self, _: bool) {}

    #[inline]
    fn cursor_position(&self) -> Vector2<i32> {
        self.raw_cursor_position
    }

    fn set_cursor_position(&mut self, position: Vector2<i32>) {
        self.raw_cursor_position = position;
    }
}
