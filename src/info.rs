use crate::document::{Version, pixel_aspect_ratio};
use crate::error::GifError;
use crate::gif;

/// Header-level facts about a GIF, read from its first 13 bytes without
/// decoding any blocks.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ImageInfo {
    /// Logical screen width.
    pub width: u16,
    /// Logical screen height.
    pub height: u16,
    pub version: Version,
    pub has_global_color_table: bool,
    /// Entries in the global color table; 0 when there is none.
    pub global_color_table_len: usize,
    pub background_color_index: u8,
    /// 0.0 when unspecified.
    pub pixel_aspect_ratio: f32,
}

impl ImageInfo {
    /// Probe the header and logical screen descriptor.
    pub fn from_bytes(data: &[u8]) -> Result<Self, GifError> {
        let preamble = gif::parse_preamble(data)?;
        let screen = preamble.screen_descriptor;
        let has_global_color_table = screen.packed.global_color_table_flag;
        Ok(Self {
            width: screen.width,
            height: screen.height,
            version: preamble.header.version,
            has_global_color_table,
            global_color_table_len: if has_global_color_table {
                screen.packed.global_color_table_len()
            } else {
                0
            },
            background_color_index: screen.background_color_index,
            pixel_aspect_ratio: pixel_aspect_ratio(screen.pixel_aspect_ratio_raw),
        })
    }
}

/// Shorthand for [`ImageInfo::from_bytes`].
pub fn probe(data: &[u8]) -> Result<ImageInfo, GifError> {
    ImageInfo::from_bytes(data)
}
