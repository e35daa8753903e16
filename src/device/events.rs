//! The normalized event model.
//!
//! Host window-system events are translated into the closed set of variants
//! below before they reach the application. Every event is a plain value;
//! it is handed to the registered [`EventReceiver`] synchronously during
//! [`Device::run`](crate::device::Device::run) and never queued beyond the
//! current dispatch.

use crate::math::prelude::Vector2;

use super::keymap::Key;

/// The number of axis slots carried by a joystick snapshot. Axis deltas
/// addressing a slot outside this range are dropped.
pub const JOYSTICK_AXES: usize = 6;

/// Describes a button of a mouse controller.
#[derive(Debug, Hash, PartialEq, Eq, Clone, Copy, Serialize, Deserialize)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
    Extra1,
    Extra2,
    Other(u16),
}

bitflags! {
    /// The pressed-button state carried by every mouse event.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct MouseButtons: u32 {
        const LEFT = 0b0000_0001;
        const RIGHT = 0b0000_0010;
        const MIDDLE = 0b0000_0100;
        const EXTRA1 = 0b0000_1000;
        const EXTRA2 = 0b0001_0000;
    }
}

impl MouseButton {
    /// The state-mask bit of this button. Buttons beyond the tracked five
    /// have no bit and never appear in the mask.
    pub fn mask(self) -> MouseButtons {
        match self {
            MouseButton::Left => MouseButtons::LEFT,
            MouseButton::Right => MouseButtons::RIGHT,
            MouseButton::Middle => MouseButtons::MIDDLE,
            MouseButton::Extra1 => MouseButtons::EXTRA1,
            MouseButton::Extra2 => MouseButtons::EXTRA2,
            MouseButton::Other(_) => MouseButtons::empty(),
        }
    }
}

/// What happened to the mouse.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MouseAction {
    Moved,
    Pressed(MouseButton),
    Released(MouseButton),
    /// Synthesized when a button is pressed twice in quick succession at
    /// roughly the same spot. Always preceded by the plain `Pressed` event.
    DoubleClick(MouseButton),
    /// Synthesized on the third press of a quick succession.
    TripleClick(MouseButton),
    /// A wheel movement; the payload is the vertical delta in lines.
    Wheel(f32),
}

/// A mouse input event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MouseEvent {
    pub action: MouseAction,
    /// The pointer position in pixels, relative to the top-left corner of
    /// the client area.
    pub position: Vector2<i32>,
    /// The state of all tracked buttons at the time of the event.
    pub buttons: MouseButtons,
    pub shift: bool,
    pub control: bool,
}

/// A keyboard input event.
///
/// `key` is the engine key code resolved through the device key map; an
/// unmapped native key arrives as [`Key::Unknown`]. Text input is reported
/// through `character` independently of the key map, one event pair
/// (down, up) per produced character.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KeyEvent {
    pub key: Key,
    pub character: Option<char>,
    pub down: bool,
    pub shift: bool,
    pub control: bool,
}

/// The lifecycle phase of a touch contact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TouchPhase {
    Began,
    Moved,
    Ended,
    Cancelled,
}

/// A touch input event. `id` is the stable contact id assigned by the
/// device touch tracker for the lifetime of the contact.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TouchEvent {
    pub id: u64,
    pub phase: TouchPhase,
    pub position: Vector2<i32>,
    /// The number of live contacts, including this one.
    pub touched_count: usize,
}

/// The latest known full state of one joystick, re-broadcast once per
/// run-loop iteration whether or not new hardware data arrived.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JoystickEvent {
    /// The joystick index reported by `activate_joysticks`.
    pub id: u8,
    /// One bit per button, bit `n` set while button `n` is held.
    pub buttons: u32,
    pub axes: [i16; JOYSTICK_AXES],
}

impl JoystickEvent {
    pub fn new(id: u8) -> Self {
        JoystickEvent {
            id,
            buttons: 0,
            axes: [0; JOYSTICK_AXES],
        }
    }

    #[inline]
    pub fn is_button_pressed(&self, button: u8) -> bool {
        u32::from(button) < 32 && self.buttons & (1 << u32::from(button)) != 0
    }
}

/// An application-defined event posted through
/// [`Device::post_user_event`](crate::device::Device::post_user_event).
/// It round-trips through the host event queue and is delivered in order
/// with the host events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UserEvent {
    pub data1: i32,
    pub data2: i32,
}

/// The enumeration of all events produced by a device.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Event {
    Mouse(MouseEvent),
    Key(KeyEvent),
    Touch(TouchEvent),
    Joystick(JoystickEvent),
    /// The size of the window client area has changed.
    WindowResized { size: Vector2<u32> },
    User(UserEvent),
}

/// The receiver end of the device event stream.
///
/// Dispatch is a direct call on the run-loop thread; the loop does not
/// proceed to the next host event until `on_event` returns. The return
/// value reports whether the event was consumed.
pub trait EventReceiver {
    fn on_event(&mut self, event: &Event) -> bool;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn button_masks_are_translated() {
        assert_eq!(MouseButton::Left.mask(), MouseButtons::LEFT);
        assert_eq!(MouseButton::Extra2.mask(), MouseButtons::EXTRA2);
        assert!(MouseButton::Other(7).mask().is_empty());
    }

    #[test]
    fn joystick_button_queries() {
        let mut ev = JoystickEvent::new(0);
        ev.buttons = 0b101;
        assert!(ev.is_button_pressed(0));
        assert!(!ev.is_button_pressed(1));
        assert!(ev.is_button_pressed(2));
        assert!(!ev.is_button_pressed(40));
    }
}
