//! Mouse state folding for the host event translation.
//!
//! The host reports pointer motion and button transitions as independent
//! deltas; every outgoing mouse event carries the folded position and the
//! translated button-state mask. Successive presses of the same button
//! within a small time/distance window are counted so the device can
//! synthesize double- and triple-click events the way the host-independent
//! layer expects them.

use std::time::Duration;

use crate::math::prelude::Vector2;

use super::events::{MouseButton, MouseButtons};
use super::time::Timestamp;

/// The recognition windows for successive clicks.
#[derive(Debug, Clone, Copy)]
pub struct ClickParams {
    /// The maximum time between two presses that still count as one
    /// sequence.
    pub timeout: Duration,
    /// The maximum pointer travel between two presses, per axis in pixels.
    pub max_distance: i32,
}

impl Default for ClickParams {
    fn default() -> Self {
        ClickParams {
            timeout: Duration::from_millis(500),
            max_distance: 3,
        }
    }
}

/// Counts successive same-button presses. The count saturates at three and
/// restarts afterwards, so a fourth rapid press begins a new sequence.
pub struct ClickCounter {
    last_time: Timestamp,
    last_position: Vector2<i32>,
    last_button: Option<MouseButton>,
    count: u32,
    params: ClickParams,
}

impl ClickCounter {
    pub fn new(params: ClickParams) -> Self {
        ClickCounter {
            last_time: Timestamp::from_millis(0),
            last_position: Vector2::new(0, 0),
            last_button: None,
            count: 0,
            params,
        }
    }

    /// Folds a press into the counter and returns the successive-click
    /// count for this press: 1 for a single click, 2 for a double, 3 for a
    /// triple.
    pub fn on_pressed(
        &mut self,
        now: Timestamp,
        position: Vector2<i32>,
        button: MouseButton,
    ) -> u32 {
        let continues = self.last_button == Some(button)
            && now - self.last_time <= self.params.timeout
            && (position.x - self.last_position.x).abs() <= self.params.max_distance
            && (position.y - self.last_position.y).abs() <= self.params.max_distance
            && self.count < 3;

        self.count = if continues { self.count + 1 } else { 1 };
        self.last_time = now;
        self.last_position = position;
        self.last_button = Some(button);
        self.count
    }
}

/// The folded mouse state owned by the host backend.
pub struct MouseState {
    position: Vector2<i32>,
    buttons: MouseButtons,
    clicks: ClickCounter,
}

impl MouseState {
    pub fn new(params: ClickParams) -> Self {
        MouseState {
            position: Vector2::new(0, 0),
            buttons: MouseButtons::empty(),
            clicks: ClickCounter::new(params),
        }
    }

    #[inline]
    pub fn on_moved(&mut self, position: Vector2<i32>) {
        self.position = position;
    }

    /// Folds a press and returns the successive-click count for it.
    pub fn on_pressed(&mut self, now: Timestamp, button: MouseButton) -> u32 {
        self.buttons.insert(button.mask());
        self.clicks.on_pressed(now, self.position, button)
    }

    pub fn on_released(&mut self, button: MouseButton) {
        self.buttons.remove(button.mask());
    }

    /// The last reported pointer position, unclamped.
    #[inline]
    pub fn position(&self) -> Vector2<i32> {
        self.position
    }

    /// The translated button-state mask.
    #[inline]
    pub fn buttons(&self) -> MouseButtons {
        self.buttons
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(v: u64) -> Timestamp {
        Timestamp::from_millis(v)
    }

    #[test]
    fn press_and_release_fold_the_translated_mask() {
        let mut mouse = MouseState::new(ClickParams::default());
        mouse.on_pressed(ms(0), MouseButton::Left);
        mouse.on_pressed(ms(1), MouseButton::Right);
        assert_eq!(mouse.buttons(), MouseButtons::LEFT | MouseButtons::RIGHT);

        mouse.on_released(MouseButton::Left);
        assert_eq!(mouse.buttons(), MouseButtons::RIGHT);

        // Untracked buttons never leak host bits into the mask.
        mouse.on_pressed(ms(2), MouseButton::Other(11));
        assert_eq!(mouse.buttons(), MouseButtons::RIGHT);
    }

    #[test]
    fn successive_clicks_count_up_to_three() {
        let mut mouse = MouseState::new(ClickParams::default());
        assert_eq!(mouse.on_pressed(ms(0), MouseButton::Left), 1);
        assert_eq!(mouse.on_pressed(ms(100), MouseButton::Left), 2);
        assert_eq!(mouse.on_pressed(ms(200), MouseButton::Left), 3);
        // A fourth rapid press starts a new sequence.
        assert_eq!(mouse.on_pressed(ms(300), MouseButton::Left), 1);
    }

    #[test]
    fn slow_or_travelled_presses_start_over() {
        let mut mouse = MouseState::new(ClickParams::default());
        assert_eq!(mouse.on_pressed(ms(0), MouseButton::Left), 1);
        assert_eq!(mouse.on_pressed(ms(1000), MouseButton::Left), 1);

        mouse.on_moved(Vector2::new(50, 0));
        assert_eq!(mouse.on_pressed(ms(1050), MouseButton::Left), 1);
    }

    #[test]
    fn switching_buttons_starts_over() {
        let mut mouse = MouseState::new(ClickParams::default());
        assert_eq!(mouse.on_pressed(ms(0), MouseButton::Left), 1);
        assert_eq!(mouse.on_pressed(ms(50), MouseButton::Right), 1);
    }
}
