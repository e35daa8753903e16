pub use crate::device::backends::VideoMode;
pub use crate::device::cursor::{
    CursorIconId, CursorSprite, CursorSpriteBank, CursorSpriteFrame, CursorStyle,
};
pub use crate::device::events::{
    Event, EventReceiver, JoystickEvent, KeyEvent, MouseAction, MouseButton, MouseButtons,
    MouseEvent, TouchEvent, TouchPhase, UserEvent,
};
pub use crate::device::joystick::{JoystickDescriptor, PovHat};
pub use crate::device::keymap::Key;
pub use crate::device::time::Timestamp;
pub use crate::device::{Device, DeviceParams};
pub use crate::math::prelude::*;
pub use crate::video::{Color, ColorFormat, Driver, DriverType};
