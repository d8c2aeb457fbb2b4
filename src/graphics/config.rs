//! Cached graphics configuration and change tracking.

use crate::config::{Config, KEY_EDITOR, KEY_FULLSCREEN, KEY_RES_HEIGHT, KEY_RES_WIDTH, KEY_SCALE};

/// Bytes per pixel of the ARGB8888 buffers.
pub const BYTES_PER_PIXEL: usize = std::mem::size_of::<u32>();

/// Logical resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Res {
    pub x: i32,
    pub y: i32,
}

impl Res {
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Graphics settings as last applied to, or pending for, the surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GraphicsConfig {
    pub res: Res,
    pub fullscreen: bool,
    pub scale_factor: i32,
    pub is_editor: bool,
    /// Set when a field changed since the last successful surface rebuild.
    pub needs_restart: bool,
}

/// Overwrite `field` with `value` if they differ, reporting whether it did.
fn update_field<T: PartialEq>(field: &mut T, value: T) -> bool {
    if *field == value {
        return false;
    }
    *field = value;
    true
}

impl GraphicsConfig {
    /// Apply new settings. Any difference flags a restart; an identical set
    /// leaves the flag as it was.
    pub fn set(&mut self, res: Res, fullscreen: bool, scale_factor: i32) -> bool {
        let mut changed = update_field(&mut self.res, res);
        changed |= update_field(&mut self.fullscreen, fullscreen);
        changed |= update_field(&mut self.scale_factor, scale_factor);
        if changed {
            self.needs_restart = true;
        }
        changed
    }

    /// Toggle editor mode. Changes the window title, so it also flags a
    /// restart.
    pub fn set_editor(&mut self, is_editor: bool) -> bool {
        let changed = update_field(&mut self.is_editor, is_editor);
        if changed {
            self.needs_restart = true;
        }
        changed
    }

    /// Pull the graphics keys out of the config store.
    pub fn set_from_config(&mut self, config: &Config) -> bool {
        let res = Res::new(config.get_int(KEY_RES_WIDTH), config.get_int(KEY_RES_HEIGHT));
        let changed = self.set(res, config.get_bool(KEY_FULLSCREEN), config.get_int(KEY_SCALE));
        self.set_editor(config.get_bool(KEY_EDITOR)) | changed
    }

    /// Pixel count of one buffer.
    #[must_use]
    pub fn screen_size(&self) -> usize {
        self.res.x.max(0) as usize * self.res.y.max(0) as usize
    }

    /// Byte size of one buffer.
    #[must_use]
    pub fn mem_size(&self) -> usize {
        self.screen_size() * BYTES_PER_PIXEL
    }
}
