// Sample access over the bit-packed pixel buffer.
// luma() folds any format to 0-255 grey for display use: BT.601 weights,
// alpha pre-blended against white (e-paper background).

use crate::header::ImageDescriptor;
use crate::image::ImageHandle;

impl ImageHandle {
    /// Raw value of one channel of one pixel, at the image's bit depth.
    ///
    /// Channels are in PNG order (grey, alpha / red, green, blue, alpha).
    pub fn sample(&self, x: u32, y: u32, channel: u32) -> Option<u16> {
        let desc = self.descriptor()?;
        if x >= desc.width || channel >= desc.format.components() {
            return None;
        }
        sample_in_row(self.row(y)?, desc, x, channel)
    }

    /// 8-bit grey value of one pixel.
    pub fn luma(&self, x: u32, y: u32) -> Option<u8> {
        let desc = self.descriptor()?;
        if x >= desc.width {
            return None;
        }
        let row = self.row(y)?;
        let depth = desc.format.bit_depth();
        let chan = |c: u32| sample_in_row(row, desc, x, c).map(|v| to_8bit(v, depth));

        let grey = match desc.format.components() {
            1 => chan(0)?,
            2 => blend_white(chan(0)?, chan(1)?),
            3 => rgb_to_grey(chan(0)?, chan(1)?, chan(2)?),
            _ => blend_white(rgb_to_grey(chan(0)?, chan(1)?, chan(2)?), chan(3)?),
        };
        Some(grey)
    }
}

fn sample_in_row(row: &[u8], desc: &ImageDescriptor, x: u32, channel: u32) -> Option<u16> {
    let depth = desc.format.bit_depth() as usize;
    let bit = (x as usize * desc.format.components() as usize + channel as usize) * depth;
    let byte = bit / 8;
    match depth {
        16 => Some(u16::from_be_bytes([*row.get(byte)?, *row.get(byte + 1)?])),
        8 => row.get(byte).map(|&v| v as u16),
        _ => {
            // MSB-first packing
            let shift = 8 - depth - bit % 8;
            let mask = (1u8 << depth) - 1;
            row.get(byte).map(|&v| ((v >> shift) & mask) as u16)
        }
    }
}

// scale a sample to 0-255; 16-bit keeps the high byte
#[inline]
fn to_8bit(v: u16, bit_depth: u32) -> u8 {
    match bit_depth {
        16 => (v >> 8) as u8,
        8 => v as u8,
        bd => {
            let max = (1u16 << bd) - 1;
            (v * 255 / max) as u8
        }
    }
}

// BT.601 luma from 8-bit RGB channels
#[inline]
fn rgb_to_grey(r: u8, g: u8, b: u8) -> u8 {
    ((r as u16 * 77 + g as u16 * 150 + b as u16 * 29) >> 8) as u8
}

// alpha-blend grey against white: out = grey*a/255 + 255*(255-a)/255
#[inline]
fn blend_white(grey: u8, alpha: u8) -> u8 {
    let g = grey as u16;
    let a = alpha as u16;
    ((g * a + 255 * (255 - a)) / 255) as u8
}
