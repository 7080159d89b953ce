//! Explicit-offset reads over the input buffer.

use crate::error::GifError;

/// Random-access reader over the borrowed input.
///
/// Reads take an explicit offset and never move any internal position;
/// callers compute the next offset from what they consumed so every parser
/// can report exact byte spans.
#[derive(Clone, Copy, Debug)]
pub(crate) struct ByteCursor<'a> {
    data: &'a [u8],
}

impl<'a> ByteCursor<'a> {
    pub(crate) fn new(data: &'a [u8]) -> Self {
        Self { data }
    }

    pub(crate) fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether `offset` is at or past the end of the buffer.
    pub(crate) fn at_end(&self, offset: usize) -> bool {
        offset >= self.data.len()
    }

    pub(crate) fn read_u8(&self, offset: usize) -> Result<u8, GifError> {
        self.data
            .get(offset)
            .copied()
            .ok_or_else(|| self.truncated(offset, 1))
    }

    pub(crate) fn read_u16_le(&self, offset: usize) -> Result<u16, GifError> {
        let b = self.read_bytes(offset, 2)?;
        Ok(u16::from_le_bytes([b[0], b[1]]))
    }

    pub(crate) fn read_bytes(&self, offset: usize, n: usize) -> Result<&'a [u8], GifError> {
        offset
            .checked_add(n)
            .and_then(|end| self.data.get(offset..end))
            .ok_or_else(|| self.truncated(offset, n))
    }

    pub(crate) fn read_array<const N: usize>(&self, offset: usize) -> Result<[u8; N], GifError> {
        let mut buf = [0u8; N];
        buf.copy_from_slice(self.read_bytes(offset, N)?);
        Ok(buf)
    }

    fn truncated(&self, offset: usize, needed: usize) -> GifError {
        GifError::TruncatedInput {
            offset,
            needed,
            len: self.data.len(),
        }
    }
}
