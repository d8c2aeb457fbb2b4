//!
//! Host windowing layer seam.
//!
//! The device never talks to the windowing library directly. Everything that
//! touches a real window, renderer, or streaming texture goes through
//! [`DisplayHost`], which the SDL2 backend implements and tests replace with
//! a recording double.
//!

use crate::graphics::icon::IconImage;

/// Errors reported by the host windowing layer.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HostError {
    /// Video subsystem could not be brought up.
    #[error("video subsystem unavailable: {0}")]
    VideoUnavailable(String),
    /// Display mode enumeration failed.
    #[error("cannot get display modes: {0}")]
    DisplayModes(String),
    /// Window or renderer creation failed.
    #[error("cannot create window or renderer: {0}")]
    WindowCreation(String),
    /// Renderer logical size could not be applied.
    #[error("cannot set renderer logical size: {0}")]
    LogicalSize(String),
    /// Streaming screen texture could not be created.
    #[error("cannot create screen texture: {0}")]
    TextureCreation(String),
    /// Operation needs a surface but none exists.
    #[error("no surface")]
    NoSurface,
    /// Presenting a frame failed.
    #[error("cannot present frame: {0}")]
    Present(String),
}

/// Result type for host operations.
pub type HostResult<T> = Result<T, HostError>;

/// A physical display mode reported by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayMode {
    /// Width in physical pixels.
    pub width: i32,
    /// Height in physical pixels.
    pub height: i32,
}

impl DisplayMode {
    #[must_use]
    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }
}

/// Window flags requested for a surface, mirroring `SDL_WINDOW_*`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowFlags {
    pub resizable: bool,
    pub fullscreen: bool,
}

impl WindowFlags {
    /// Resizable window, optionally fullscreen.
    #[must_use]
    pub const fn for_fullscreen(fullscreen: bool) -> Self {
        Self {
            resizable: true,
            fullscreen,
        }
    }
}

/// Everything the host needs to build a window, renderer and texture.
#[derive(Debug, Clone, Copy)]
pub struct SurfaceRequest<'a> {
    /// Logical width; also the initial window width.
    pub width: u32,
    /// Logical height; also the initial window height.
    pub height: u32,
    pub flags: WindowFlags,
    pub title: &'a str,
    pub icon: Option<&'a IconImage>,
}

/// Host windowing/rendering collaborator.
///
/// Implementations own the window, renderer, pixel format and texture
/// handles. Releasing is always safe to repeat: an empty slot is a no-op.
pub trait DisplayHost {
    /// Enumerate the hardware display modes of the primary display.
    ///
    /// Individual modes the host cannot describe are skipped by the
    /// implementation; an error means enumeration as a whole failed.
    fn display_modes(&mut self) -> HostResult<Vec<DisplayMode>>;

    /// Release texture, renderer, pixel format and window, in that order.
    fn release_surface(&mut self);

    /// Create window and renderer, then configure them and create the
    /// ARGB8888 streaming texture at the requested logical size.
    ///
    /// On error the host may hold a partially built surface; the next
    /// [`DisplayHost::release_surface`] clears it.
    fn create_surface(&mut self, request: &SurfaceRequest<'_>) -> HostResult<()>;

    /// Upload `pixels` (ARGB8888, `width * height` entries) and present.
    fn present(&mut self, pixels: &[u32], width: u32, height: u32) -> HostResult<()>;

    /// Release every handle and shut the video subsystem down.
    fn shutdown(&mut self);
}
