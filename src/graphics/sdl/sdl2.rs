//!
//! SDL2 implementation of the host windowing layer.
//!
//! **Supported:**
//! - Display mode enumeration on the primary display
//! - Window + accelerated renderer creation, resizable or fullscreen
//! - Window title and icon
//! - Linear render scaling at a fixed logical size
//! - Per-frame upload of the ARGB8888 screen buffer
//! - Keyboard and quit events for the launcher
//!
//! **NOT Supported:**
//! - Multiple displays (display 0 only)
//! - Dirty-rectangle uploads (the full frame is streamed every time)
//!
//! The streaming texture is created per frame from the stored texture
//! creator rather than kept alive, which keeps the renderer lifetime out of
//! the struct. Its size and format are checked once at surface creation.
//!

use sdl2::{
    event::Event,
    keyboard::Keycode,
    pixels::PixelFormatEnum,
    render::{Canvas, TextureCreator},
    surface::Surface,
    video::{Window, WindowContext},
    EventPump, Sdl, VideoSubsystem,
};

use crate::graphics::host::{DisplayHost, DisplayMode, HostError, HostResult, SurfaceRequest};
use crate::graphics::icon::IconImage;

/// Screen texture format; matches the `u32` ARGB buffers.
const SCREEN_FORMAT: PixelFormatEnum = PixelFormatEnum::ARGB8888;

/// Packed format whose memory order is R, G, B, A.
#[cfg(target_endian = "little")]
const ICON_FORMAT: PixelFormatEnum = PixelFormatEnum::ABGR8888;

#[cfg(target_endian = "big")]
const ICON_FORMAT: PixelFormatEnum = PixelFormatEnum::RGBA8888;

const SCALE_QUALITY_HINT: &str = "SDL_RENDER_SCALE_QUALITY";

/// Host events the launcher cares about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostEvent {
    /// Window closed or quit requested.
    Quit,
    /// Key pressed.
    KeyDown(Keycode),
    /// Anything else.
    Other,
}

/// SDL2 windowing host.
///
/// SDL must be initialized on the main thread, and every method must be
/// called from that thread.
pub struct SdlHost {
    sdl_context: Option<Sdl>,
    video_subsystem: Option<VideoSubsystem>,
    event_pump: Option<EventPump>,
    canvas: Option<Canvas<Window>>,
    texture_creator: Option<TextureCreator<WindowContext>>,
}

impl SdlHost {
    /// Initialize SDL and its video subsystem.
    pub fn new() -> HostResult<Self> {
        let sdl_context =
            sdl2::init().map_err(|e| HostError::VideoUnavailable(format!("SDL2 init: {}", e)))?;
        let video_subsystem = sdl_context
            .video()
            .map_err(|e| HostError::VideoUnavailable(format!("video subsystem: {}", e)))?;
        log::info!("SDL2 video driver: {}", video_subsystem.current_video_driver());

        let event_pump = sdl_context
            .event_pump()
            .map_err(|e| HostError::VideoUnavailable(format!("event pump: {}", e)))?;

        Ok(Self {
            sdl_context: Some(sdl_context),
            video_subsystem: Some(video_subsystem),
            event_pump: Some(event_pump),
            canvas: None,
            texture_creator: None,
        })
    }

    /// Drain pending events.
    pub fn poll_events(&mut self) -> Vec<HostEvent> {
        let Some(event_pump) = self.event_pump.as_mut() else {
            return Vec::new();
        };

        event_pump
            .poll_iter()
            .map(|event| match event {
                Event::Quit { .. } => HostEvent::Quit,
                Event::KeyDown {
                    keycode: Some(keycode),
                    ..
                } => HostEvent::KeyDown(keycode),
                _ => HostEvent::Other,
            })
            .collect()
    }

    fn video(&self) -> HostResult<&VideoSubsystem> {
        self.video_subsystem
            .as_ref()
            .ok_or_else(|| HostError::VideoUnavailable("video subsystem shut down".to_string()))
    }
}

/// Copy decoded icon pixels into an SDL surface.
fn icon_surface(icon: &IconImage) -> Result<Surface<'static>, String> {
    if icon.width == 0 || icon.height == 0 {
        return Err(format!("empty icon {}x{}", icon.width, icon.height));
    }
    let mut surface = Surface::new(icon.width, icon.height, ICON_FORMAT)?;
    let dst_pitch = surface.pitch() as usize;
    let src_pitch = icon.pitch();
    surface.with_lock_mut(|pixels| {
        for (row, src) in icon.rgba.chunks_exact(src_pitch).enumerate() {
            let start = row * dst_pitch;
            pixels[start..start + src_pitch].copy_from_slice(src);
        }
    });
    Ok(surface)
}

impl DisplayHost for SdlHost {
    fn display_modes(&mut self) -> HostResult<Vec<DisplayMode>> {
        let video = self.video()?;
        let count = video
            .num_display_modes(0)
            .map_err(HostError::DisplayModes)?;

        let mut modes = Vec::with_capacity(count.max(0) as usize);
        for index in 0..count {
            match video.display_mode(0, index) {
                Ok(mode) => modes.push(DisplayMode::new(mode.w, mode.h)),
                Err(e) => log::error!("cannot get display mode: {}", e),
            }
        }
        Ok(modes)
    }

    fn release_surface(&mut self) {
        self.texture_creator = None;
        self.canvas = None;
    }

    fn create_surface(&mut self, request: &SurfaceRequest<'_>) -> HostResult<()> {
        let mut builder = self
            .video()?
            .window(request.title, request.width, request.height);
        builder.position_centered();
        if request.flags.resizable {
            builder.resizable();
        }
        if request.flags.fullscreen {
            builder.fullscreen();
        }
        let mut window = builder
            .build()
            .map_err(|e| HostError::WindowCreation(e.to_string()))?;

        log::debug!("setting caption and icon...");
        if let Some(icon) = request.icon {
            match icon_surface(icon) {
                Ok(surface) => window.set_icon(surface),
                Err(e) => log::warn!("cannot set window icon: {}", e),
            }
        }

        log::debug!("window pixel format: {:?}", window.window_pixel_format());

        let mut canvas = window
            .into_canvas()
            .accelerated()
            .build()
            .map_err(|e| HostError::WindowCreation(e.to_string()))?;
        log::info!("SDL2 renderer: {}", canvas.info().name);

        if !sdl2::hint::set(SCALE_QUALITY_HINT, "linear") {
            log::warn!("cannot set render quality hint: {}", sdl2::get_error());
        }

        canvas
            .set_logical_size(request.width, request.height)
            .map_err(|e| HostError::LogicalSize(e.to_string()))?;

        let texture_creator = canvas.texture_creator();
        {
            let _screen = texture_creator
                .create_texture_streaming(SCREEN_FORMAT, request.width, request.height)
                .map_err(|e| HostError::TextureCreation(e.to_string()))?;
        }

        self.canvas = Some(canvas);
        self.texture_creator = Some(texture_creator);
        Ok(())
    }

    fn present(&mut self, pixels: &[u32], width: u32, height: u32) -> HostResult<()> {
        let canvas = self.canvas.as_mut().ok_or(HostError::NoSurface)?;
        let texture_creator = self.texture_creator.as_ref().ok_or(HostError::NoSurface)?;

        let mut texture = texture_creator
            .create_texture_streaming(SCREEN_FORMAT, width, height)
            .map_err(|e| HostError::TextureCreation(e.to_string()))?;

        let row_len = width as usize;
        texture
            .with_lock(None, |buffer: &mut [u8], pitch: usize| {
                for (y, row) in pixels.chunks_exact(row_len).take(height as usize).enumerate() {
                    let line = &mut buffer[y * pitch..y * pitch + row_len * 4];
                    for (dst, pixel) in line.chunks_exact_mut(4).zip(row) {
                        dst.copy_from_slice(&pixel.to_ne_bytes());
                    }
                }
            })
            .map_err(HostError::Present)?;

        canvas.clear();
        canvas
            .copy(&texture, None, None)
            .map_err(HostError::Present)?;
        canvas.present();
        Ok(())
    }

    fn shutdown(&mut self) {
        log::info!("Cleaning up SDL2 host");
        self.release_surface();
        self.event_pump = None;
        self.video_subsystem = None;
        self.sdl_context = None;
    }
}
