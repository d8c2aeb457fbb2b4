//! Window icon asset.

use std::path::Path;

/// File name of the window icon inside the data directory.
pub const ICON_FILE: &str = "cdogs_icon.bmp";

/// Decoded icon pixels, RGBA8 row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IconImage {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

impl IconImage {
    /// Bytes per row of the RGBA data.
    #[must_use]
    pub fn pitch(&self) -> usize {
        self.width as usize * 4
    }
}

/// Decode the icon at `path`. Any format the `image` crate can sniff works.
pub fn load_icon(path: &Path) -> image::ImageResult<IconImage> {
    let decoded = image::open(path)?.into_rgba8();
    let (width, height) = decoded.dimensions();
    Ok(IconImage {
        width,
        height,
        rgba: decoded.into_raw(),
    })
}
