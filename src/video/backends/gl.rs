//! The desktop OpenGL driver.

use crate::errors::Result;
use crate::math::prelude::Vector2;

use super::super::{Color, Driver, DriverType};
use super::{gl_string, ProcAddressLoader};

pub struct OpenGlDriver {
    name: String,
    screen_size: Vector2<u32>,
}

impl OpenGlDriver {
    pub fn new(screen_size: Vector2<u32>, loader: ProcAddressLoader) -> Result<Self> {
        ::gl::load_with(|symbol| loader(symbol));

        let version = gl_string(::gl::VERSION);
        let renderer = gl_string(::gl::RENDERER);
        info!("OpenGL renderer: {}", renderer);
        info!("OpenGL version: {}", version);

        unsafe {
            ::gl::Viewport(0, 0, screen_size.x as i32, screen_size.y as i32);
        }

        Ok(OpenGlDriver {
            name: format!("OpenGL {}", version),
            screen_size,
        })
    }
}

impl Driver for OpenGlDriver {
    #[inline]
    fn driver_type(&self) -> DriverType {
        DriverType::OpenGl
    }

    #[inline]
    fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    fn screen_size(&self) -> Vector2<u32> {
        self.screen_size
    }

    fn on_resize(&mut self, size: Vector2<u32>) {
        self.screen_size = size;
        unsafe {
            ::gl::Viewport(0, 0, size.x as i32, size.y as i32);
        }
    }

    fn begin_scene(&mut self, clear: Color) -> Result<()> {
        unsafe {
            ::gl::ClearColor(clear.r, clear.g, clear.b, clear.a);
            ::gl::Clear(::gl::COLOR_BUFFER_BIT | ::gl::DEPTH_BUFFER_BIT);
        }
        Ok(())
    }

    fn end_scene(&mut self) -> Result<()> {
        unsafe {
            ::gl::Flush();
        }
        Ok(())
    }
}
