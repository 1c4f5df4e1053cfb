// PNG chunk walker.
// Every step is bounds-checked against the buffer; a length field that
// points past the end yields Malformed(ChunkScan) once and then stops.
// CRCs are read but not verified.

use crate::error::{DecodeError, Stage};

pub const PNG_SIG: [u8; 8] = [137, 80, 78, 71, 13, 10, 26, 10];

pub const CHUNK_IHDR: [u8; 4] = *b"IHDR";
pub const CHUNK_IDAT: [u8; 4] = *b"IDAT";
pub const CHUNK_IEND: [u8; 4] = *b"IEND";

// length + type + crc
const CHUNK_OVERHEAD: usize = 12;

// big-endian u32 (PNG uses network byte order)
#[inline]
pub(crate) fn be_u32(d: &[u8], o: usize) -> u32 {
    u32::from_be_bytes([d[o], d[o + 1], d[o + 2], d[o + 3]])
}

/// One chunk located inside a PNG buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Chunk {
    pub kind: [u8; 4],
    pub length: u32,
    /// Offset of the first payload byte in the scanned buffer.
    pub payload_offset: usize,
    /// Stored CRC, unchecked.
    pub crc: u32,
}

impl Chunk {
    #[inline]
    pub fn payload_len(&self) -> usize {
        self.length as usize
    }

    #[inline]
    pub fn is(&self, tag: [u8; 4]) -> bool {
        self.kind == tag
    }

    /// Payload bytes within `data`, which must be the buffer this chunk
    /// was scanned from.
    pub fn payload<'a>(&self, data: &'a [u8]) -> &'a [u8] {
        &data[self.payload_offset..self.payload_offset + self.payload_len()]
    }
}

/// Lazy, fused iterator over the chunks of a PNG buffer.
///
/// Stops after yielding `IEND`, when the buffer ends exactly on a chunk
/// boundary, or after reporting a truncated chunk.
pub struct ChunkScanner<'a> {
    data: &'a [u8],
    pos: usize,
    done: bool,
}

impl<'a> ChunkScanner<'a> {
    pub fn new(data: &'a [u8], offset: usize) -> Self {
        Self {
            data,
            pos: offset,
            done: false,
        }
    }

    /// Scanner positioned after the 8-byte signature. Does not check it.
    pub fn after_signature(data: &'a [u8]) -> Self {
        Self::new(data, PNG_SIG.len())
    }

    /// Offset of the next chunk to be read.
    pub fn position(&self) -> usize {
        self.pos
    }

    fn fail(&mut self) -> Option<Result<Chunk, DecodeError>> {
        self.done = true;
        Some(Err(DecodeError::malformed(Stage::ChunkScan)))
    }
}

impl<'a> Iterator for ChunkScanner<'a> {
    type Item = Result<Chunk, DecodeError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        if self.pos >= self.data.len() {
            self.done = true;
            return None;
        }
        if self.data.len() - self.pos < CHUNK_OVERHEAD {
            log::debug!("png: {} trailing bytes at {}", self.data.len() - self.pos, self.pos);
            return self.fail();
        }

        let length = be_u32(self.data, self.pos);
        let mut kind = [0u8; 4];
        kind.copy_from_slice(&self.data[self.pos + 4..self.pos + 8]);
        let payload_offset = self.pos + 8;

        let crc_offset = match payload_offset.checked_add(length as usize) {
            Some(end) if end.checked_add(4).is_some_and(|e| e <= self.data.len()) => end,
            _ => {
                log::debug!("png: chunk length {} at {} overruns buffer", length, self.pos);
                return self.fail();
            }
        };

        let chunk = Chunk {
            kind,
            length,
            payload_offset,
            crc: be_u32(self.data, crc_offset),
        };

        self.pos = crc_offset + 4;
        if chunk.is(CHUNK_IEND) {
            self.done = true;
        }
        Some(Ok(chunk))
    }
}

impl core::iter::FusedIterator for ChunkScanner<'_> {}
