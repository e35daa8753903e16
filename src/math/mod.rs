//! The minimal math facade shared by the device and video modules.

pub mod rect;

pub mod prelude {
    pub use cgmath::prelude::*;
    pub use cgmath::{Point2, Vector2};

    pub use super::rect::Rect;
}

pub use cgmath::{Point2, Vector2};

pub use self::rect::Rect;
