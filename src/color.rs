//! RGB colors and color tables.

use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

use crate::error::GifError;

/// Bytes per color table entry (red, green, blue).
pub(crate) const COLOR_BYTES: usize = 3;

/// Color substituted for palette indices outside the active table.
pub const MISSING_COLOR: Color = Color::new(0, 0, 0);

/// An 8-bit RGB triple.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub fn to_array(self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }

    /// Uppercase `#RRGGBB` form.
    pub fn to_hex(self) -> String {
        alloc::format!("{self}")
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

impl From<[u8; 3]> for Color {
    fn from([r, g, b]: [u8; 3]) -> Self {
        Self { r, g, b }
    }
}

/// Number of entries encoded by a 3-bit color table size field: `2^(field+1)`.
pub fn color_table_len(size_field: u8) -> usize {
    1usize << ((size_field & 0b111) + 1)
}

/// An ordered palette of colors, global or local to a frame.
///
/// The length is always a power of two in `2..=256`. Lookups are checked by
/// callers through [`ColorTable::get`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ColorTable {
    colors: Vec<Color>,
}

impl ColorTable {
    /// Build a table from raw `r,g,b,r,g,b,...` bytes. Trailing partial
    /// triples are ignored.
    pub(crate) fn from_rgb_bytes(bytes: &[u8]) -> Self {
        let colors = bytes
            .chunks_exact(COLOR_BYTES)
            .map(|c| Color::new(c[0], c[1], c[2]))
            .collect();
        Self { colors }
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<Color> {
        self.colors.get(index).copied()
    }

    pub fn colors(&self) -> &[Color] {
        &self.colors
    }

    pub fn iter(&self) -> impl Iterator<Item = &Color> {
        self.colors.iter()
    }
}

impl TryFrom<Vec<Color>> for ColorTable {
    type Error = GifError;

    /// Fails unless the length is one a size field can encode.
    fn try_from(colors: Vec<Color>) -> Result<Self, GifError> {
        let len = colors.len();
        if !(2..=256).contains(&len) || !len.is_power_of_two() {
            return Err(GifError::InvalidInput(alloc::format!(
                "{len} colors is not a valid color table length"
            )));
        }
        Ok(Self { colors })
    }
}

impl core::ops::Index<usize> for ColorTable {
    type Output = Color;

    fn index(&self, index: usize) -> &Color {
        &self.colors[index]
    }
}
