//! The null driver: no rendering, no window, no context. It exists so a
//! device can run its event machinery headless.

use crate::errors::Result;
use crate::math::prelude::Vector2;

use super::super::{Color, Driver, DriverType};

pub struct NullDriver {
    screen_size: Vector2<u32>,
}

impl NullDriver {
    pub fn new(screen_size: Vector2<u32>) -> Self {
        NullDriver { screen_size }
    }
}

impl Driver for NullDriver {
    #[inline]
    fn driver_type(&self) -> DriverType {
        DriverType::Null
    }

    #[inline]
    fn name(&self) -> &str {
        "null"
    }

    #[inline]
    fn screen_size(&self) -> Vector2<u32> {
        self.screen_size
    }

    fn on_resize(&mut self, size: Vector2<u32>) {
        self.screen_size = size;
    }

    fn begin_scene(&mut self, _: Color) -> Result<()> {
        Ok(())
    }

    fn end_scene(&mut self) -> Result<()> {
        Ok(())
    }
}
