//! Driver factories.
//!
//! One constructor per backend family, each compiled in behind its cargo
//! feature. The device bootstrap selects exactly one based on the requested
//! driver type; asking for a backend that is not part of the build is a
//! logged error and yields no driver, never a crash.

mod null;

#[cfg(feature = "opengl")]
mod gl;
#[cfg(feature = "gles1")]
mod gles1;
#[cfg(feature = "gles2")]
mod gles2;

use std::os::raw::c_void;

use crate::math::prelude::Vector2;

use super::{Driver, DriverType};

pub use self::null::NullDriver;

/// The GL symbol loader handed to a driver factory, backed by the live
/// window context.
pub type ProcAddressLoader<'a> = &'a dyn Fn(&str) -> *const c_void;

/// Whether the requested backend family is part of this build.
pub fn is_compiled_in(driver_type: DriverType) -> bool {
    match driver_type {
        DriverType::Null => true,
        DriverType::OpenGl => cfg!(feature = "opengl"),
        DriverType::GlEs1 => cfg!(feature = "gles1"),
        DriverType::GlEs2 => cfg!(feature = "gles2"),
        DriverType::Software | DriverType::WebGl => false,
    }
}

/// Instantiates the backend for `driver_type`, or `None` with a logged
/// error when the backend is unavailable or failed to start.
pub(crate) fn create_driver(
    driver_type: DriverType,
    size: Vector2<u32>,
    loader: ProcAddressLoader,
) -> Option<Box<dyn Driver>> {
    match driver_type {
        DriverType::Null => Some(Box::new(NullDriver::new(size))),

        DriverType::OpenGl => {
            #[cfg(feature = "opengl")]
            {
                match self::gl::OpenGlDriver::new(size, loader) {
                    Ok(driver) => Some(Box::new(driver)),
                    Err(err) => {
                        error!("could not create the OpenGL driver: {}", err);
                        None
                    }
                }
            }
            #[cfg(not(feature = "opengl"))]
            {
                let _ = loader;
                error!("no OpenGL support compiled in");
                None
            }
        }

        DriverType::GlEs1 => {
            #[cfg(feature = "gles1")]
            {
                match self::gles1::GlEs1Driver::new(size, loader) {
                    Ok(driver) => Some(Box::new(driver)),
                    Err(err) => {
                        error!("could not create the OpenGL ES 1 driver: {}", err);
                        None
                    }
                }
            }
            #[cfg(not(feature = "gles1"))]
            {
                error!("no OpenGL ES 1 support compiled in");
                None
            }
        }

        DriverType::GlEs2 => {
            #[cfg(feature = "gles2")]
            {
                match self::gles2::GlEs2Driver::new(size, loader) {
                    Ok(driver) => Some(Box::new(driver)),
                    Err(err) => {
                        error!("could not create the OpenGL ES 2 driver: {}", err);
                        None
                    }
                }
            }
            #[cfg(not(feature = "gles2"))]
            {
                error!("no OpenGL ES 2 support compiled in");
                None
            }
        }

        DriverType::Software => {
            error!("no software rasterizer support compiled in");
            None
        }

        DriverType::WebGl => {
            error!("the WebGL driver is only available in browser builds");
            None
        }
    }
}

#[cfg(any(feature = "opengl", feature = "gles1", feature = "gles2"))]
pub(crate) fn gl_string(name: ::gl::types::GLenum) -> String {
    unsafe {
        let ptr = ::gl::GetString(name);
        if ptr.is_null() {
            "unknown".to_owned()
        } else {
            ::std::ffi::CStr::from_ptr(ptr as *const _)
                .to_string_lossy()
                .into_owned()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_is_always_compiled_in() {
        assert!(is_compiled_in(DriverType::Null));
        assert!(!is_compiled_in(DriverType::Software));
        assert!(!is_compiled_in(DriverType::WebGl));
    }

    #[test]
    fn unavailable_backends_yield_no_driver() {
        let loader: ProcAddressLoader = &|_| ::std::ptr::null();
        assert!(create_driver(DriverType::Software, Vector2::new(64, 64), loader).is_none());
        assert!(create_driver(DriverType::WebGl, Vector2::new(64, 64), loader).is_none());
    }

    #[test]
    fn the_null_driver_is_always_available() {
        let loader: ProcAddressLoader = &|_| ::std::ptr::null();
        let driver = create_driver(DriverType::Null, Vector2::new(320, 200), loader)
            .expect("null driver");
        assert_eq!(driver.driver_type(), DriverType::Null);
        assert_eq!(driver.screen_size(), Vector2::new(320, 200));
    }
}
