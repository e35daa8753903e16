//! # Lantern
//!
//! Lantern is a small, portable platform device layer for real-time
//! rendering. It owns the window and the rendering context, normalizes the
//! host's input events into a uniform event model, and binds exactly one
//! video driver out of a closed set to the context it created.
//!
//! The building blocks, leaves first:
//!
//! - the normalized event model ([`device::events`]);
//! - the native-to-engine key translation table ([`device::keymap`]);
//! - the touch contact tracker ([`device::touch`]);
//! - the joystick manager ([`device::joystick`]);
//! - the cursor controller ([`device::cursor`]);
//! - the device bootstrap and run loop ([`device`]) composing all of the
//!   above over a single host backend ([`device::backends`]) and driver
//!   factory ([`video::backends`]).
//!
//! Everything is single-threaded and cooperative: [`device::Device::run`]
//! pumps the host once per call, dispatches every translated event
//! synchronously, polls the joysticks and returns whether the device wants
//! to keep running.

#[macro_use]
extern crate bitflags;
#[macro_use]
extern crate failure;
#[macro_use]
extern crate log;
#[macro_use]
extern crate serde;

pub mod device;
pub mod errors;
pub mod math;
pub mod prelude;
pub mod video;

pub use self::device::{Device, DeviceParams};
pub use self::video::DriverType;
