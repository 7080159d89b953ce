//! GIF-flavoured variable-width LZW decompression.
//!
//! Codes are packed least-significant-bit first. The code width starts at
//! `min_code_size + 1` and grows up to 12 bits as the table fills. The
//! decoder always yields exactly `pixel_count` indices: if the stream ends
//! early, hits the end-of-information code, or contains an invalid code,
//! the remaining positions are filled with index 0.

use alloc::vec::Vec;

use crate::error::LzwFailure;

/// Widest code the format allows.
pub(crate) const MAX_CODE_SIZE: u8 = 12;
const TABLE_SIZE: usize = 1 << MAX_CODE_SIZE;
/// Largest minimum code size whose literals fit in a palette index.
const MAX_MIN_CODE_SIZE: u8 = 8;

/// Decompressed indices plus the reason decoding stopped short, if it did.
#[derive(Debug)]
pub(crate) struct LzwOutput {
    pub indices: Vec<u8>,
    /// Number of indices taken from the stream before padding.
    pub produced: usize,
    pub failure: Option<LzwFailure>,
}

/// Decompress one frame's image data into `pixel_count` palette indices.
pub(crate) fn decompress(min_code_size: u8, data: &[u8], pixel_count: usize) -> LzwOutput {
    let mut indices = Vec::with_capacity(pixel_count);
    let failure = if min_code_size == 0 || min_code_size > MAX_MIN_CODE_SIZE {
        Some(LzwFailure::UnsupportedCodeSize(min_code_size))
    } else {
        Decoder::new(min_code_size).run(data, pixel_count, &mut indices)
    };
    let produced = indices.len();
    indices.resize(pixel_count, 0);
    LzwOutput {
        indices,
        produced,
        failure,
    }
}

/// Pulls LSB-first codes of a caller-chosen width out of a byte slice.
struct CodeReader<'a> {
    bytes: core::slice::Iter<'a, u8>,
    datum: u32,
    bits: u8,
}

impl<'a> CodeReader<'a> {
    fn new(data: &'a [u8]) -> Self {
        Self {
            bytes: data.iter(),
            datum: 0,
            bits: 0,
        }
    }

    fn next_code(&mut self, code_size: u8) -> Option<u16> {
        while self.bits < code_size {
            let byte = *self.bytes.next()?;
            self.datum |= u32::from(byte) << self.bits;
            self.bits += 8;
        }
        let code = (self.datum & ((1 << code_size) - 1)) as u16;
        self.datum >>= code_size;
        self.bits -= code_size;
        Some(code)
    }
}

struct Decoder {
    min_code_size: u8,
    clear: u16,
    end_of_information: u16,
    /// Next code to be allocated.
    available: u16,
    code_size: u8,
    code_mask: u16,
    prefix: [u16; TABLE_SIZE],
    suffix: [u8; TABLE_SIZE],
    /// Chain output in reverse order.
    stack: Vec<u8>,
}

impl Decoder {
    fn new(min_code_size: u8) -> Self {
        let clear = 1u16 << min_code_size;
        let mut suffix = [0u8; TABLE_SIZE];
        for (code, s) in suffix.iter_mut().enumerate().take(usize::from(clear)) {
            *s = code as u8;
        }
        let mut decoder = Self {
            min_code_size,
            clear,
            end_of_information: clear + 1,
            available: 0,
            code_size: 0,
            code_mask: 0,
            prefix: [0; TABLE_SIZE],
            suffix,
            stack: Vec::with_capacity(TABLE_SIZE + 1),
        };
        decoder.reset();
        decoder
    }

    fn reset(&mut self) {
        self.code_size = self.min_code_size + 1;
        self.code_mask = (1 << self.code_size) - 1;
        self.available = self.clear + 2;
    }

    fn run(&mut self, data: &[u8], pixel_count: usize, out: &mut Vec<u8>) -> Option<LzwFailure> {
        let mut reader = CodeReader::new(data);
        let mut previous: Option<u16> = None;
        let mut first: u8 = 0;

        while out.len() < pixel_count {
            let Some(code) = reader.next_code(self.code_size) else {
                return Some(LzwFailure::InputExhausted);
            };
            if code == self.end_of_information {
                return Some(LzwFailure::EarlyEndOfInformation);
            }
            if code > self.available {
                return Some(LzwFailure::InvalidCode {
                    code,
                    available: self.available,
                });
            }
            if code == self.clear {
                self.reset();
                previous = None;
                continue;
            }

            let Some(prev) = previous else {
                // First code after a clear must be a literal.
                if code > self.clear {
                    return Some(LzwFailure::InvalidCode {
                        code,
                        available: self.available,
                    });
                }
                first = self.suffix[usize::from(code)];
                out.push(first);
                previous = Some(code);
                continue;
            };

            let mut walk = code;
            if code == self.available {
                self.stack.push(first);
                walk = prev;
            }
            while walk > self.clear {
                self.stack.push(self.suffix[usize::from(walk)]);
                walk = self.prefix[usize::from(walk)];
            }
            first = self.suffix[usize::from(walk)];
            self.stack.push(first);

            if usize::from(self.available) < TABLE_SIZE {
                self.prefix[usize::from(self.available)] = prev;
                self.suffix[usize::from(self.available)] = first;
                self.available += 1;
                if self.available & self.code_mask == 0 && usize::from(self.available) < TABLE_SIZE
                {
                    self.code_size += 1;
                    self.code_mask += self.available;
                }
            }
            previous = Some(code);

            while let Some(index) = self.stack.pop() {
                if out.len() == pixel_count {
                    self.stack.clear();
                    break;
                }
                out.push(index);
            }
        }
        None
    }
}
