// Minimal PNG writer for tests: forward filters, zlib via miniz_oxide,
// IDAT split into fixed-size pieces. CRC fields are zero.
#![allow(dead_code)]

use miniz_oxide::deflate::compress_to_vec_zlib;

pub const PNG_SIG: [u8; 8] = [137, 80, 78, 71, 13, 10, 26, 10];

pub fn components(color_type: u8) -> usize {
    match color_type {
        0 => 1,
        2 => 3,
        4 => 2,
        6 => 4,
        _ => 1,
    }
}

pub fn stride(width: u32, bit_depth: u8, color_type: u8) -> usize {
    (width as usize * bit_depth as usize * components(color_type)).div_ceil(8)
}

pub fn bytes_per_pixel(bit_depth: u8, color_type: u8) -> usize {
    (bit_depth as usize * components(color_type)).div_ceil(8)
}

pub fn push_chunk(out: &mut Vec<u8>, kind: &[u8; 4], payload: &[u8]) {
    out.extend_from_slice(&(payload.len() as u32).to_be_bytes());
    out.extend_from_slice(kind);
    out.extend_from_slice(payload);
    out.extend_from_slice(&[0; 4]);
}

pub fn ihdr(width: u32, height: u32, bit_depth: u8, color_type: u8, interlace: u8) -> [u8; 13] {
    let mut h = [0u8; 13];
    h[0..4].copy_from_slice(&width.to_be_bytes());
    h[4..8].copy_from_slice(&height.to_be_bytes());
    h[8] = bit_depth;
    h[9] = color_type;
    h[12] = interlace;
    h
}

fn reference_paeth(a: u8, b: u8, c: u8) -> u8 {
    let p = a as i32 + b as i32 - c as i32;
    let (pa, pb, pc) = ((p - a as i32).abs(), (p - b as i32).abs(), (p - c as i32).abs());
    if pa <= pb && pa <= pc {
        a
    } else if pb <= pc {
        b
    } else {
        c
    }
}

/// Apply `filter` to one unfiltered row.
pub fn filter_row(filter: u8, row: &[u8], prev: Option<&[u8]>, bpp: usize) -> Vec<u8> {
    let zero = vec![0u8; row.len()];
    let prev = prev.unwrap_or(&zero);
    (0..row.len())
        .map(|i| {
            let a = if i >= bpp { row[i - bpp] } else { 0 };
            let b = prev[i];
            let c = if i >= bpp { prev[i - bpp] } else { 0 };
            let pred = match filter {
                0 => 0,
                1 => a,
                2 => b,
                3 => ((a as u16 + b as u16) / 2) as u8,
                4 => reference_paeth(a, b, c),
                _ => panic!("bad filter {filter}"),
            };
            row[i].wrapping_sub(pred)
        })
        .collect()
}

/// Filter-tagged scanlines for `pixels`; `filters` is cycled over rows.
pub fn filter_image(pixels: &[u8], filters: &[u8], stride: usize, bpp: usize) -> Vec<u8> {
    let mut raw = Vec::with_capacity(pixels.len() + pixels.len() / stride.max(1));
    for (y, row) in pixels.chunks(stride).enumerate() {
        let filter = filters[y % filters.len()];
        let prev = (y > 0).then(|| &pixels[(y - 1) * stride..y * stride]);
        raw.push(filter);
        raw.extend(filter_row(filter, row, prev, bpp));
    }
    raw
}

/// Deterministic non-trivial pixel bytes.
pub fn pattern(len: usize, seed: u32) -> Vec<u8> {
    let mut state = seed.wrapping_mul(0x9E37_79B9) | 1;
    (0..len)
        .map(|_| {
            state ^= state << 13;
            state ^= state >> 17;
            state ^= state << 5;
            (state >> 24) as u8
        })
        .collect()
}

pub struct Encoder {
    pub width: u32,
    pub height: u32,
    pub bit_depth: u8,
    pub color_type: u8,
    pub interlace: u8,
    pub filters: Vec<u8>,
    pub idat_piece: usize,
    pub extra_chunks: Vec<([u8; 4], Vec<u8>)>,
}

impl Encoder {
    pub fn new(width: u32, height: u32, bit_depth: u8, color_type: u8) -> Self {
        Self {
            width,
            height,
            bit_depth,
            color_type,
            interlace: 0,
            filters: vec![0, 1, 2, 3, 4],
            idat_piece: 64,
            extra_chunks: Vec::new(),
        }
    }

    pub fn stride(&self) -> usize {
        stride(self.width, self.bit_depth, self.color_type)
    }

    pub fn scanlines(&self, pixels: &[u8]) -> Vec<u8> {
        let bpp = bytes_per_pixel(self.bit_depth, self.color_type);
        filter_image(pixels, &self.filters, self.stride(), bpp)
    }

    /// Wrap already filter-tagged scanlines.
    pub fn encode_raw(&self, raw: &[u8]) -> Vec<u8> {
        let compressed = compress_to_vec_zlib(raw, 6);
        let mut out = PNG_SIG.to_vec();
        push_chunk(
            &mut out,
            b"IHDR",
            &ihdr(self.width, self.height, self.bit_depth, self.color_type, self.interlace),
        );
        for (kind, payload) in &self.extra_chunks {
            push_chunk(&mut out, kind, payload);
        }
        for piece in compressed.chunks(self.idat_piece.max(1)) {
            push_chunk(&mut out, b"IDAT", piece);
        }
        push_chunk(&mut out, b"IEND", &[]);
        out
    }

    pub fn encode(&self, pixels: &[u8]) -> Vec<u8> {
        assert_eq!(pixels.len(), self.stride() * self.height as usize);
        self.encode_raw(&self.scanlines(pixels))
    }
}
