//! The video driver seam.
//!
//! A driver is the concrete rendering-API backend bound to the window
//! context by the device bootstrap. The closed set of driver types mirrors
//! the build: each GL family is compiled in behind a cargo feature, the
//! null driver is always available, and the rest of the engine talks to
//! whichever one was instantiated exclusively through the `Driver` trait.

pub mod backends;
pub mod image;

use std::fmt;

use crate::errors::Result;
use crate::math::prelude::Vector2;

/// The selectable rendering backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DriverType {
    /// No rendering at all; the device creates neither window nor context.
    Null,
    /// The software rasterizer. A parallel backend not compiled into this
    /// crate; requesting it yields no driver.
    Software,
    /// Desktop OpenGL.
    OpenGl,
    /// OpenGL ES 1.x.
    GlEs1,
    /// OpenGL ES 2.0.
    GlEs2,
    /// The WebGL subset of ES 2.0, only reachable from browser builds.
    WebGl,
}

impl fmt::Display for DriverType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match *self {
            DriverType::Null => "null",
            DriverType::Software => "software",
            DriverType::OpenGl => "OpenGL",
            DriverType::GlEs1 => "OpenGL ES 1",
            DriverType::GlEs2 => "OpenGL ES 2",
            DriverType::WebGl => "WebGL",
        };
        write!(f, "{}", name)
    }
}

/// The color layouts a window surface or image can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ColorFormat {
    A1R5G5B5,
    R5G6B5,
    R8G8B8,
    A8R8G8B8,
}

impl ColorFormat {
    #[inline]
    pub fn bytes_per_pixel(self) -> usize {
        match self {
            ColorFormat::A1R5G5B5 | ColorFormat::R5G6B5 => 2,
            ColorFormat::R8G8B8 => 3,
            ColorFormat::A8R8G8B8 => 4,
        }
    }
}

/// A normalized RGBA color.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const BLACK: Color = Color {
        r: 0.0,
        g: 0.0,
        b: 0.0,
        a: 1.0,
    };

    #[inline]
    pub fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Color { r, g, b, a }
    }
}

/// The capability interface every rendering backend implements. The heavy
/// machinery (materials, geometry) lives with the backends themselves and
/// is out of scope here; the device only needs lifecycle control.
pub trait Driver {
    fn driver_type(&self) -> DriverType;

    /// A human-readable backend description for diagnostics.
    fn name(&self) -> &str;

    fn screen_size(&self) -> Vector2<u32>;

    /// Notifies the backend that the window surface changed size.
    fn on_resize(&mut self, size: Vector2<u32>);

    /// Starts a frame by clearing the back buffer.
    fn begin_scene(&mut self, clear: Color) -> Result<()>;

    /// Finishes the frame; presentation happens through the device.
    fn end_scene(&mut self) -> Result<()>;
}
