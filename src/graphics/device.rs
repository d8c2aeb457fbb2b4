//!
//! Graphics device: mode negotiation and screen buffer ownership.
//!
//! The device caches the graphics configuration, validates it against the
//! mode catalog, and rebuilds the host surface only when the cached
//! configuration changed since the last successful build. Every rebuild
//! reallocates the two ARGB8888 screen buffers (`buf` is presented, `bkg`
//! holds the static background) at the logical resolution.
//!
//! Lifecycle is owned by the caller: [`GraphicsDevice::new`] once,
//! [`GraphicsDevice::initialize`] whenever the config may have changed, and
//! [`GraphicsDevice::terminate`] once, which consumes the device.
//!

use std::path::PathBuf;

use crate::config::{Config, KEY_FULLSCREEN, KEY_RES_HEIGHT, KEY_RES_WIDTH, KEY_SCALE};
use crate::graphics::clip::ClipRect;
use crate::graphics::config::{GraphicsConfig, Res, BYTES_PER_PIXEL};
use crate::graphics::host::{DisplayHost, HostError, SurfaceRequest, WindowFlags};
use crate::graphics::icon::{self, IconImage, ICON_FILE};
use crate::graphics::mode::{GraphicsMode, ModeCatalog};

/// Alpha mask of the ARGB8888 screen format.
pub const ARGB_AMASK: u32 = 0xFF00_0000;
/// Alpha shift of the ARGB8888 screen format.
pub const ARGB_ASHIFT: u32 = 24;

/// Errors from device operations. All of them are logged where they occur.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GraphicsError {
    /// Display mode enumeration failed or reported nothing.
    #[error("no valid display modes: {0}")]
    HostQuery(String),
    /// Configured mode is not in the catalog.
    #[error("invalid Video Mode {width}x{height} {scale}x")]
    InvalidMode { width: i32, height: i32, scale: i32 },
    /// Window, renderer or texture could not be built.
    #[error("surface creation failed: {0}")]
    SurfaceCreation(HostError),
    /// Operation needs a ready surface.
    #[error("graphics device not initialized")]
    NotInitialized,
    /// Host failure outside of surface creation.
    #[error(transparent)]
    Host(HostError),
}

/// Result type for device operations.
pub type GraphicsResult<T> = Result<T, GraphicsError>;

/// Surface lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SurfaceState {
    /// Nothing queried or created yet.
    #[default]
    Uninitialized,
    /// Icon loaded and catalog populated; no usable surface.
    WindowReady,
    /// Surface and buffers match the cached config.
    SurfaceReady,
}

/// Window title for the game or the editor.
#[must_use]
pub fn window_title(is_editor: bool) -> String {
    format!(
        "C-Dogs SDL {}{}",
        if is_editor { "Editor " } else { "" },
        env!("CARGO_PKG_VERSION")
    )
}

/// Mode currently stored in the config, as `WxH Sx`.
#[must_use]
pub fn mode_str(config: &Config) -> String {
    GraphicsMode::new(
        config.get_int(KEY_RES_WIDTH),
        config.get_int(KEY_RES_HEIGHT),
        config.get_int(KEY_SCALE),
    )
    .to_string()
}

fn write_mode(config: &mut Config, mode: &GraphicsMode) {
    config.set_int(KEY_RES_WIDTH, mode.width);
    config.set_int(KEY_RES_HEIGHT, mode.height);
    config.set_int(KEY_SCALE, mode.scale_factor);
}

/// Display mode manager over a host windowing layer.
pub struct GraphicsDevice<H: DisplayHost> {
    host: H,
    catalog: ModeCatalog,
    cached_config: GraphicsConfig,
    /// Settings the live surface and buffers were built with.
    applied: GraphicsConfig,
    state: SurfaceState,
    clipping: ClipRect,
    buf: Vec<u32>,
    bkg: Vec<u32>,
    icon: Option<IconImage>,
    data_dir: PathBuf,
    amask: u32,
    ashift: u32,
}

impl<H: DisplayHost> GraphicsDevice<H> {
    /// Create the device with the default mode catalog and the graphics
    /// settings from `config`. Nothing is created on the host yet.
    pub fn new(host: H, config: &Config, data_dir: impl Into<PathBuf>) -> Self {
        let mut cached_config = GraphicsConfig::default();
        cached_config.set_from_config(config);
        Self {
            host,
            catalog: ModeCatalog::with_defaults(),
            cached_config,
            applied: GraphicsConfig::default(),
            state: SurfaceState::Uninitialized,
            clipping: ClipRect::default(),
            buf: Vec::new(),
            bkg: Vec::new(),
            icon: None,
            data_dir: data_dir.into(),
            amask: 0,
            ashift: 0,
        }
    }

    /// Bring the surface in line with the cached config.
    ///
    /// Returns immediately when the surface is ready and nothing changed, so
    /// calling this every frame does not flicker. `force` skips catalog
    /// validation, as does editor mode.
    ///
    /// On an invalid mode the previous surface is left alone but the device
    /// reports not initialized. On a host failure the old surface is already
    /// gone and the device stays not initialized until a later call succeeds.
    pub fn initialize(&mut self, force: bool) -> GraphicsResult<()> {
        if self.is_initialized() && !self.cached_config.needs_restart {
            return Ok(());
        }

        if self.state == SurfaceState::Uninitialized {
            self.load_icon();
            if let Err(err) = self.add_supported_modes() {
                log::error!("{}", err);
            }
        }

        self.state = SurfaceState::WindowReady;

        let flags = WindowFlags::for_fullscreen(self.cached_config.fullscreen);
        let Res { x: w, y: h } = self.cached_config.res;
        let scale = self.cached_config.scale_factor;
        let is_editor = self.cached_config.is_editor;

        if !force && !is_editor {
            match self.catalog.find(w, h, scale) {
                Some(index) => self.catalog.set_index(index),
                None => {
                    self.catalog.set_index(0);
                    let err = GraphicsError::InvalidMode {
                        width: w,
                        height: h,
                        scale,
                    };
                    log::error!("{}", err);
                    return Err(err);
                }
            }
        }

        let (width, height) = match (u32::try_from(w), u32::try_from(h)) {
            (Ok(width), Ok(height)) if width > 0 && height > 0 => (width, height),
            _ => {
                let err = GraphicsError::SurfaceCreation(HostError::WindowCreation(format!(
                    "invalid size {}x{}",
                    w, h
                )));
                log::error!("{}", err);
                return Err(err);
            }
        };

        log::info!("graphics mode({}x{} {}x)", w, h, scale);
        self.host.release_surface();

        let title = window_title(is_editor);
        let request = SurfaceRequest {
            width,
            height,
            flags,
            title: &title,
            icon: self.icon.as_ref(),
        };
        if let Err(err) = self.host.create_surface(&request) {
            let err = GraphicsError::SurfaceCreation(err);
            log::error!("{}", err);
            return Err(err);
        }

        self.amask = ARGB_AMASK;
        self.ashift = ARGB_ASHIFT;

        self.cached_config.res = Res::new(w, h);
        self.cached_config.needs_restart = false;
        self.applied = self.cached_config;

        let pixels = self.applied.screen_size();
        self.buf = vec![0; pixels];
        self.bkg = vec![0; pixels];
        log::debug!("Changed video mode...");

        self.reset_clip();
        log::debug!("Internal dimensions:\t{}x{}", w, h);

        self.state = SurfaceState::SurfaceReady;
        Ok(())
    }

    fn load_icon(&mut self) {
        let path = self.data_dir.join(ICON_FILE);
        match icon::load_icon(&path) {
            Ok(image) => self.icon = Some(image),
            Err(err) => log::warn!("cannot load icon {}: {}", path.display(), err),
        }
    }

    /// Merge the host's display modes into the catalog. On failure the
    /// catalog keeps what it had.
    fn add_supported_modes(&mut self) -> GraphicsResult<usize> {
        let modes = self
            .host
            .display_modes()
            .map_err(|err| GraphicsError::HostQuery(err.to_string()))?;
        if modes.is_empty() {
            return Err(GraphicsError::HostQuery(
                "host reported zero display modes".to_string(),
            ));
        }
        let added = self.catalog.add_supported_modes(&modes);
        log::debug!(
            "{} host display modes gave {} new graphics modes",
            modes.len(),
            added
        );
        Ok(added)
    }

    /// Release everything the device owns and shut the host video down.
    /// Returns the host with all of its handles released.
    pub fn terminate(mut self) -> H {
        log::debug!("Shutting down video...");
        self.catalog.clear();
        self.icon = None;
        self.host.shutdown();
        self.buf = Vec::new();
        self.bkg = Vec::new();
        self.applied = GraphicsConfig::default();
        self.state = SurfaceState::Uninitialized;
        self.host
    }

    /// Record new graphics settings; a difference schedules a rebuild.
    pub fn apply_config(&mut self, res: Res, fullscreen: bool, scale_factor: i32) -> bool {
        self.cached_config.set(res, fullscreen, scale_factor)
    }

    /// Record the graphics settings held in `config`.
    pub fn apply_from_config(&mut self, config: &Config) -> bool {
        self.cached_config.set_from_config(config)
    }

    /// Select the next catalog mode and write it to `config`.
    pub fn mode_next(&mut self, config: &mut Config) -> Option<GraphicsMode> {
        let mode = self.catalog.next()?;
        write_mode(config, &mode);
        Some(mode)
    }

    /// Select the previous catalog mode and write it to `config`.
    pub fn mode_prev(&mut self, config: &mut Config) -> Option<GraphicsMode> {
        let mode = self.catalog.previous()?;
        write_mode(config, &mode);
        Some(mode)
    }

    /// Write the settings of the last successful rebuild back to `config`.
    /// Returns false when no rebuild has succeeded yet.
    pub fn revert_config(&self, config: &mut Config) -> bool {
        let Res { x, y } = self.applied.res;
        if x <= 0 || y <= 0 {
            return false;
        }
        write_mode(config, &GraphicsMode::new(x, y, self.applied.scale_factor));
        config.set_bool(KEY_FULLSCREEN, self.applied.fullscreen);
        true
    }

    pub fn set_clip(&mut self, left: i32, top: i32, right: i32, bottom: i32) {
        self.clipping = ClipRect::new(left, top, right, bottom);
    }

    /// Clip to the whole surface as last built.
    pub fn reset_clip(&mut self) {
        let Res { x, y } = self.applied.res;
        self.clipping = ClipRect::full(x, y);
    }

    /// Upload the front buffer and present it.
    pub fn present(&mut self) -> GraphicsResult<()> {
        if !self.is_initialized() {
            return Err(GraphicsError::NotInitialized);
        }
        let Res { x, y } = self.applied.res;
        self.host
            .present(&self.buf, x as u32, y as u32)
            .map_err(GraphicsError::Host)
    }

    #[must_use]
    pub fn is_initialized(&self) -> bool {
        self.state == SurfaceState::SurfaceReady
    }

    #[must_use]
    pub fn is_window_initialized(&self) -> bool {
        self.state != SurfaceState::Uninitialized
    }

    #[must_use]
    pub const fn state(&self) -> SurfaceState {
        self.state
    }

    #[must_use]
    pub const fn clip(&self) -> ClipRect {
        self.clipping
    }

    #[must_use]
    pub const fn cached_config(&self) -> &GraphicsConfig {
        &self.cached_config
    }

    /// Resolution of the live surface, which lags the cached config until
    /// the next rebuild.
    #[must_use]
    pub const fn applied_res(&self) -> Res {
        self.applied.res
    }

    #[must_use]
    pub const fn catalog(&self) -> &ModeCatalog {
        &self.catalog
    }

    #[must_use]
    pub const fn mode_index(&self) -> usize {
        self.catalog.index()
    }

    /// Pixels per buffer.
    #[must_use]
    pub fn screen_size(&self) -> usize {
        self.applied.screen_size()
    }

    /// Bytes per buffer.
    #[must_use]
    pub fn mem_size(&self) -> usize {
        self.applied.mem_size()
    }

    /// Bytes per buffer row.
    #[must_use]
    pub fn pitch(&self) -> usize {
        self.applied.res.x.max(0) as usize * BYTES_PER_PIXEL
    }

    #[must_use]
    pub fn buf(&self) -> &[u32] {
        &self.buf
    }

    pub fn buf_mut(&mut self) -> &mut [u32] {
        &mut self.buf
    }

    #[must_use]
    pub fn bkg(&self) -> &[u32] {
        &self.bkg
    }

    pub fn bkg_mut(&mut self) -> &mut [u32] {
        &mut self.bkg
    }

    /// Copy the background buffer over the front buffer.
    pub fn restore_background(&mut self) {
        self.buf.copy_from_slice(&self.bkg);
    }

    #[must_use]
    pub const fn amask(&self) -> u32 {
        self.amask
    }

    #[must_use]
    pub const fn ashift(&self) -> u32 {
        self.ashift
    }

    #[must_use]
    pub fn icon(&self) -> Option<&IconImage> {
        self.icon.as_ref()
    }

    #[must_use]
    pub const fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }
}
