//! Hand-built GIF streams for the integration tests.
#![allow(dead_code)]

pub const TRAILER: u8 = 0x3B;

fn size_field(len: usize) -> u8 {
    assert!(len.is_power_of_two() && (2..=256).contains(&len));
    (len.trailing_zeros() - 1) as u8
}

/// Header plus logical screen descriptor, with an optional global table.
pub fn screen(version: &[u8; 3], width: u16, height: u16, global: Option<&[[u8; 3]]>) -> Vec<u8> {
    let mut out = b"GIF".to_vec();
    out.extend_from_slice(version);
    out.extend_from_slice(&width.to_le_bytes());
    out.extend_from_slice(&height.to_le_bytes());
    match global {
        Some(colors) => {
            out.extend_from_slice(&[0x80 | 0x70 | size_field(colors.len()), 0, 0]);
            out.extend(colors.iter().flatten());
        }
        None => out.extend_from_slice(&[0x70, 0, 0]),
    }
    out
}

pub fn graphic_control(disposal: u8, transparent: Option<u8>, delay: u16) -> Vec<u8> {
    let packed = (disposal & 0b111) << 2 | u8::from(transparent.is_some());
    let mut out = vec![0x21, 0xF9, 4, packed];
    out.extend_from_slice(&delay.to_le_bytes());
    out.push(transparent.unwrap_or(0));
    out.push(0);
    out
}

/// Wrap a payload in 255-byte sub-blocks plus the terminator.
pub fn sub_blocks(payload: &[u8]) -> Vec<u8> {
    let mut out = Vec::new();
    for chunk in payload.chunks(255) {
        out.push(chunk.len() as u8);
        out.extend_from_slice(chunk);
    }
    out.push(0);
    out
}

pub fn comment(text: &str) -> Vec<u8> {
    let mut out = vec![0x21, 0xFE];
    out.extend(sub_blocks(text.as_bytes()));
    out
}

pub fn netscape_loop(count: u16) -> Vec<u8> {
    let mut out = vec![0x21, 0xFF, 11];
    out.extend_from_slice(b"NETSCAPE2.0");
    out.extend_from_slice(&[3, 1]);
    out.extend_from_slice(&count.to_le_bytes());
    out.push(0);
    out
}

/// Pack codes LSB-first, widening exactly when a decoder would.
pub fn pack_codes(min_code_size: u8, codes: &[u16]) -> Vec<u8> {
    let clear = 1u16 << min_code_size;
    let mut available = clear + 2;
    let mut code_size = min_code_size + 1;
    let mut after_clear = true;
    let mut out = Vec::new();
    let mut acc = 0u32;
    let mut bits = 0u8;
    for &code in codes {
        acc |= u32::from(code) << bits;
        bits += code_size;
        while bits >= 8 {
            out.push(acc as u8);
            acc >>= 8;
            bits -= 8;
        }
        if code == clear {
            available = clear + 2;
            code_size = min_code_size + 1;
            after_clear = true;
        } else if after_clear {
            after_clear = false;
        } else if available < 4096 {
            available += 1;
            if available == 1 << code_size && available < 4096 {
                code_size += 1;
            }
        }
    }
    if bits > 0 {
        out.push(acc as u8);
    }
    out
}

/// Clear, every index as a literal, end-of-information.
pub fn literal_codes(min_code_size: u8, indices: &[u8]) -> Vec<u16> {
    let clear = 1u16 << min_code_size;
    let mut codes = vec![clear];
    codes.extend(indices.iter().map(|&i| u16::from(i)));
    codes.push(clear + 1);
    codes
}

pub struct Image<'a> {
    pub left: u16,
    pub top: u16,
    pub width: u16,
    pub height: u16,
    pub local: Option<&'a [[u8; 3]]>,
    pub min_code_size: u8,
    pub codes: Vec<u16>,
}

impl Image<'_> {
    /// A `width x height` image at the origin encoded as literals.
    pub fn literals(width: u16, height: u16, min_code_size: u8, indices: &[u8]) -> Self {
        Image {
            left: 0,
            top: 0,
            width,
            height,
            local: None,
            min_code_size,
            codes: literal_codes(min_code_size, indices),
        }
    }

    pub fn encode(&self) -> Vec<u8> {
        let mut out = vec![0x2C];
        for v in [self.left, self.top, self.width, self.height] {
            out.extend_from_slice(&v.to_le_bytes());
        }
        match self.local {
            Some(colors) => {
                out.push(0x80 | size_field(colors.len()));
                out.extend(colors.iter().flatten());
            }
            None => out.push(0),
        }
        out.push(self.min_code_size);
        out.extend(sub_blocks(&pack_codes(self.min_code_size, &self.codes)));
        out
    }
}

pub fn concat(parts: &[&[u8]]) -> Vec<u8> {
    parts.concat()
}
