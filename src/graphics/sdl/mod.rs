//!
//! SDL2 backend for the graphics device.
//!

pub mod sdl2;

pub use self::sdl2::{HostEvent, SdlHost};
