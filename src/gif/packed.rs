//! Packed bit-field bytes.
//!
//! GIF numbers bits MSB-first inside the three packed bytes: the first
//! field listed in a layout occupies the most significant bits.

use crate::color::color_table_len;

/// Split `byte` into fields of the given bit widths, most significant first.
/// The widths must sum to 8.
pub(crate) fn unpack<const N: usize>(byte: u8, widths: [u8; N]) -> [u8; N] {
    debug_assert_eq!(widths.iter().map(|w| u32::from(*w)).sum::<u32>(), 8);
    let mut out = [0u8; N];
    let mut shift = 8u8;
    for (field, width) in out.iter_mut().zip(widths) {
        shift -= width;
        let mask = ((1u16 << width) - 1) as u8;
        *field = (byte >> shift) & mask;
    }
    out
}

/// Packed byte of the logical screen descriptor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScreenPacked {
    pub raw: u8,
    pub global_color_table_flag: bool,
    /// Bits per primary color minus one.
    pub color_resolution: u8,
    pub sort_flag: bool,
    /// 3-bit size field; the table holds `2^(size+1)` entries.
    pub global_color_table_size: u8,
}

impl ScreenPacked {
    const LAYOUT: [u8; 4] = [1, 3, 1, 3];

    pub fn from_byte(raw: u8) -> Self {
        let [gct, resolution, sort, size] = unpack(raw, Self::LAYOUT);
        Self {
            raw,
            global_color_table_flag: gct == 1,
            color_resolution: resolution,
            sort_flag: sort == 1,
            global_color_table_size: size,
        }
    }

    /// Entries in the global color table, whether or not the flag is set.
    pub fn global_color_table_len(&self) -> usize {
        color_table_len(self.global_color_table_size)
    }
}

/// Frame disposal instruction from the graphic control extension.
#[non_exhaustive]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DisposalMethod {
    Unspecified,
    DoNotDispose,
    RestoreToBackground,
    RestoreToPrevious,
    /// Values 4-7 are reserved by the format.
    Reserved(u8),
}

impl DisposalMethod {
    pub fn from_bits(bits: u8) -> Self {
        match bits & 0b111 {
            0 => Self::Unspecified,
            1 => Self::DoNotDispose,
            2 => Self::RestoreToBackground,
            3 => Self::RestoreToPrevious,
            n => Self::Reserved(n),
        }
    }

    pub fn to_bits(self) -> u8 {
        match self {
            Self::Unspecified => 0,
            Self::DoNotDispose => 1,
            Self::RestoreToBackground => 2,
            Self::RestoreToPrevious => 3,
            Self::Reserved(n) => n,
        }
    }

    /// Human-readable name. Reserved values read as "Unspecified".
    pub fn label(self) -> &'static str {
        match self {
            Self::Unspecified | Self::Reserved(_) => "Unspecified",
            Self::DoNotDispose => "Do Not Dispose",
            Self::RestoreToBackground => "Restore to Background",
            Self::RestoreToPrevious => "Restore to Previous",
        }
    }
}

/// Packed byte of the graphic control extension.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GraphicControlPacked {
    pub raw: u8,
    pub reserved: u8,
    pub disposal_method: DisposalMethod,
    pub user_input_flag: bool,
    pub transparent_color_flag: bool,
}

impl GraphicControlPacked {
    const LAYOUT: [u8; 4] = [3, 3, 1, 1];

    pub fn from_byte(raw: u8) -> Self {
        let [reserved, disposal, user_input, transparent] = unpack(raw, Self::LAYOUT);
        Self {
            raw,
            reserved,
            disposal_method: DisposalMethod::from_bits(disposal),
            user_input_flag: user_input == 1,
            transparent_color_flag: transparent == 1,
        }
    }
}

/// Packed byte of the image descriptor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ImageDescriptorPacked {
    pub raw: u8,
    pub local_color_table_flag: bool,
    pub interlace_flag: bool,
    pub sort_flag: bool,
    pub reserved: u8,
    /// 3-bit size field; the table holds `2^(size+1)` entries.
    pub local_color_table_size: u8,
}

impl ImageDescriptorPacked {
    const LAYOUT: [u8; 5] = [1, 1, 1, 2, 3];

    pub fn from_byte(raw: u8) -> Self {
        let [lct, interlace, sort, reserved, size] = unpack(raw, Self::LAYOUT);
        Self {
            raw,
            local_color_table_flag: lct == 1,
            interlace_flag: interlace == 1,
            sort_flag: sort == 1,
            reserved,
            local_color_table_size: size,
        }
    }

    pub fn local_color_table_len(&self) -> usize {
        color_table_len(self.local_color_table_size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unpack_reads_most_significant_bits_first() {
        assert_eq!(unpack(0b1011_0110, [1, 3, 1, 3]), [1, 0b011, 0, 0b110]);
        assert_eq!(unpack(0b1100_0001, [1, 1, 1, 2, 3]), [1, 1, 0, 0, 1]);
        assert_eq!(unpack(0xFF, [8]), [0xFF]);
    }

    #[test]
    fn screen_packed_fields() {
        let p = ScreenPacked::from_byte(0xF7);
        assert!(p.global_color_table_flag);
        assert_eq!(p.color_resolution, 7);
        assert!(!p.sort_flag);
        assert_eq!(p.global_color_table_size, 7);
        assert_eq!(p.global_color_table_len(), 256);

        let p = ScreenPacked::from_byte(0x08);
        assert!(!p.global_color_table_flag);
        assert!(p.sort_flag);
        assert_eq!(p.global_color_table_len(), 2);
    }

    #[test]
    fn graphic_control_packed_fields() {
        // reserved=0b101, disposal=2, user input=0, transparent=1
        let p = GraphicControlPacked::from_byte(0b1010_1001);
        assert_eq!(p.reserved, 0b101);
        assert_eq!(p.disposal_method, DisposalMethod::RestoreToBackground);
        assert!(!p.user_input_flag);
        assert!(p.transparent_color_flag);

        let p = GraphicControlPacked::from_byte(0b0001_1110);
        assert_eq!(p.disposal_method, DisposalMethod::Reserved(7));
        assert!(p.user_input_flag);
        assert!(!p.transparent_color_flag);
    }

    #[test]
    fn image_descriptor_packed_fields() {
        let p = ImageDescriptorPacked::from_byte(0b1001_1010);
        assert!(p.local_color_table_flag);
        assert!(!p.interlace_flag);
        assert!(!p.sort_flag);
        assert_eq!(p.reserved, 0b11);
        assert_eq!(p.local_color_table_size, 0b010);
        assert_eq!(p.local_color_table_len(), 8);

        let p = ImageDescriptorPacked::from_byte(0b0110_0000);
        assert!(!p.local_color_table_flag);
        assert!(p.interlace_flag);
        assert!(p.sort_flag);
    }

    #[test]
    fn disposal_labels() {
        let labels: alloc::vec::Vec<_> = (0u8..8).map(|b| DisposalMethod::from_bits(b).label()).collect();
        assert_eq!(
            labels,
            [
                "Unspecified",
                "Do Not Dispose",
                "Restore to Background",
                "Restore to Previous",
                "Unspecified",
                "Unspecified",
                "Unspecified",
                "Unspecified",
            ]
        );
        for b in 0u8..8 {
            assert_eq!(DisposalMethod::from_bits(b).to_bits(), b);
        }
    }
}
