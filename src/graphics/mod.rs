//!
//! Display mode negotiation and screen buffers.

pub mod clip;
pub mod config;
pub mod device;
pub mod host;
pub mod icon;
pub mod mode;
#[cfg(feature = "sdl")]
pub mod sdl;

pub use clip::ClipRect;
pub use config::{GraphicsConfig, Res};
pub use device::{mode_str, GraphicsDevice, GraphicsError, GraphicsResult, SurfaceState};
pub use host::{DisplayHost, DisplayMode, HostError, HostResult, SurfaceRequest, WindowFlags};
pub use icon::IconImage;
pub use mode::{GraphicsMode, ModeCatalog};
