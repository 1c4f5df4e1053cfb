// Test-only PNG assembly. IDAT payloads here are raw filter-tagged
// scanlines; pair them with `passthrough` instead of a real inflater.

use alloc::vec::Vec;

use crate::chunk::PNG_SIG;
use crate::inflate::InflateError;

pub struct PngBuilder {
    ihdr: [u8; 13],
    chunks: Vec<([u8; 4], Vec<u8>)>,
}

impl PngBuilder {
    pub fn new(width: u32, height: u32, bit_depth: u8, color_type: u8) -> Self {
        let mut ihdr = [0u8; 13];
        ihdr[0..4].copy_from_slice(&width.to_be_bytes());
        ihdr[4..8].copy_from_slice(&height.to_be_bytes());
        ihdr[8] = bit_depth;
        ihdr[9] = color_type;
        Self {
            ihdr,
            chunks: Vec::new(),
        }
    }

    pub fn chunk(mut self, kind: &[u8; 4], payload: &[u8]) -> Self {
        self.chunks.push((*kind, payload.to_vec()));
        self
    }

    pub fn idat(self, payload: &[u8]) -> Self {
        self.chunk(b"IDAT", payload)
    }

    pub fn build(&self) -> Vec<u8> {
        let mut out = PNG_SIG.to_vec();
        push_chunk(&mut out, b"IHDR", &self.ihdr);
        for (kind, payload) in &self.chunks {
            push_chunk(&mut out, kind, payload);
        }
        push_chunk(&mut out, b"IEND", &[]);
        out
    }
}

fn push_chunk(out: &mut Vec<u8>, kind: &[u8; 4], payload: &[u8]) {
    out.extend_from_slice(&(payload.len() as u32).to_be_bytes());
    out.extend_from_slice(kind);
    out.extend_from_slice(payload);
    out.extend_from_slice(&[0; 4]); // CRC is never checked
}

/// Identity "decompressor" for stored test payloads.
pub fn passthrough(input: &[u8], output: &mut [u8]) -> Result<usize, InflateError> {
    if input.len() > output.len() {
        return Err(InflateError::OutputOverflow);
    }
    output[..input.len()].copy_from_slice(input);
    Ok(input.len())
}
