use crate::color::Color;

/// One decoded pixel: a palette color, or the frame's transparent index.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Pixel {
    Color(Color),
    /// The pixel matched the frame's transparent color index.
    Transparent,
}

impl Pixel {
    pub fn is_transparent(&self) -> bool {
        matches!(self, Self::Transparent)
    }

    /// The color, or `None` for a transparent pixel.
    pub fn color(&self) -> Option<Color> {
        match self {
            Self::Color(c) => Some(*c),
            Self::Transparent => None,
        }
    }

    /// RGBA bytes; transparent pixels become `[0, 0, 0, 0]`.
    pub fn to_rgba(&self) -> [u8; 4] {
        match self {
            Self::Color(c) => [c.r, c.g, c.b, 0xFF],
            Self::Transparent => [0; 4],
        }
    }
}

impl From<Color> for Pixel {
    fn from(c: Color) -> Self {
        Self::Color(c)
    }
}

/// Which palette a frame's indices were resolved against.
#[non_exhaustive]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ColorTableSource {
    /// The frame's own local color table.
    Local,
    /// The document's global color table.
    Global,
    /// Neither table was present; every opaque pixel is the missing color.
    None,
}

#[cfg(feature = "rgb")]
impl From<Color> for rgb::RGB8 {
    fn from(c: Color) -> Self {
        rgb::RGB8::new(c.r, c.g, c.b)
    }
}

#[cfg(feature = "rgb")]
impl From<Pixel> for rgb::RGBA8 {
    fn from(p: Pixel) -> Self {
        let [r, g, b, a] = p.to_rgba();
        rgb::RGBA8::new(r, g, b, a)
    }
}
