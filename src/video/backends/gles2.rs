//! The OpenGL ES 2.0 driver.

use crate::errors::Result;
use crate::math::prelude::Vector2;

use super::super::{Color, Driver, DriverType};
use super::{gl_string, ProcAddressLoader};

pub struct GlEs2Driver {
    name: String,
    screen_size: Vector2<u32>,
}

impl GlEs2Driver {
    pub fn new(screen_size: Vector2<u32>, loader: ProcAddressLoader) -> Result<Self> {
        ::gl::load_with(|symbol| loader(symbol));

        let version = gl_string(::gl::VERSION);
        let shading = gl_string(::gl::SHADING_LANGUAGE_VERSION);
        info!("OpenGL ES version: {}", version);
        info!("GLSL ES version: {}", shading);

        unsafe {
            ::gl::Viewport(0, 0, screen_size.x as i32, screen_size.y as i32);
        }

        Ok(GlEs2Driver {
            name: format!("OpenGL ES 2 ({})", version),
            screen_size,
        })
    }
}

impl Driver for GlEs2Driver {
    #[inline]
    fn driver_type(&self) -> DriverType {
        DriverType::GlEs2
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
