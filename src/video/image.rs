//! A plain pixel image in one of the window color formats.
//!
//! This is the read-only input side of cursor sprite conversion; decoding
//! happens pixel-wise into RGBA8, which every host cursor path consumes.

use crate::errors::Result;
use crate::math::prelude::Vector2;

use super::ColorFormat;

pub struct Image {
    format: ColorFormat,
    dimensions: Vector2<u32>,
    bytes: Vec<u8>,
}

impl Image {
    /// Wraps a pixel buffer. The buffer length must match
    /// `width * height * bytes_per_pixel` exactly.
    pub fn new(format: ColorFormat, dimensions: Vector2<u32>, bytes: Vec<u8>) -> Result<Self> {
        let expected = dimensions.x as usize * dimensions.y as usize * format.bytes_per_pixel();
        if bytes.len() != expected {
            bail!(
                "image buffer is {} bytes, expected {} for {}x{} {:?}",
                bytes.len(),
                expected,
                dimensions.x,
                dimensions.y,
                format
            );
        }

        Ok(Image {
            format,
            dimensions,
            bytes,
        })
    }

    #[inline]
    pub fn format(&self) -> ColorFormat {
        self.format
    }

    #[inline]
    pub fn dimensions(&self) -> Vector2<u32> {
        self.dimensions
    }

    /// Decodes the pixel at (x, y) into `[r, g, b, a]`. Coordinates must be
    /// inside the image.
    pub fn rgba(&self, x: u32, y: u32) -> [u8; 4] {
        debug_assert!(x < self.dimensions.x && y < self.dimensions.y);

        let bpp = self.format.bytes_per_pixel();
        let offset = (y as usize * self.dimensions.x as usize + x as usize) * bpp;
        let bytes = &self.bytes[offset..offset + bpp];

        match self.format {
            ColorFormat::A8R8G8B8 => [bytes[1], bytes[2], bytes[3], bytes[0]],
            ColorFormat::R8G8B8 => [bytes[0], bytes[1], bytes[2], 0xFF],
            ColorFormat::R5G6B5 => {
                let v = u16::from_le_bytes([bytes[0], bytes[1]]);
                [
                    expand5((v >> 11) & 0x1F),
                    expand6((v >> 5) & 0x3F),
                    expand5(v & 0x1F),
                    0xFF,
                ]
            }
            ColorFormat::A1R5G5B5 => {
                let v = u16::from_le_bytes([bytes[0], bytes[1]]);
                [
                    expand5((v >> 10) & 0x1F),
                    expand5((v >> 5) & 0x1F),
                    expand5(v & 0x1F),
                    if v & 0x8000 != 0 { 0xFF } else { 0x00 },
                ]
            }
        }
    }
}

// Widens a 5/6-bit channel to 8 bits, replicating the high bits into the
// low ones so full intensity maps to 255.
#[inline]
fn expand5(v: u16) -> u8 {
    ((v << 3) | (v >> 2)) as u8
}

#[inline]
fn expand6(v: u16) -> u8 {
    ((v << 2) | (v >> 4)) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn buffer_length_is_validated() {
        assert!(Image::new(ColorFormat::A8R8G8B8, Vector2::new(2, 2), vec![0; 16]).is_ok());
        assert!(Image::new(ColorFormat::A8R8G8B8, Vector2::new(2, 2), vec![0; 15]).is_err());
        assert!(Image::new(ColorFormat::R5G6B5, Vector2::new(2, 1), vec![0; 4]).is_ok());
    }

    #[test]
    fn decodes_argb8() {
        let bytes = vec![0x80, 0x11, 0x22, 0x33];
        let image = Image::new(ColorFormat::A8R8G8B8, Vector2::new(1, 1), bytes).unwrap();
        assert_eq!(image.rgba(0, 0), [0x11, 0x22, 0x33, 0x80]);
    }

    #[test]
    fn decodes_packed_16bit_extremes() {
        let white = 0xFFFFu16.to_le_bytes().to_vec();
        let image = Image::new(ColorFormat::R5G6B5, Vector2::new(1, 1), white).unwrap();
        assert_eq!(image.rgba(0, 0), [0xFF, 0xFF, 0xFF, 0xFF]);

        let transparent_black = 0x0000u16.to_le_bytes().to_vec();
        let image = Image::new(ColorFormat::A1R5G5B5, Vector2::new(1, 1), transparent_black).unwrap();
        assert_eq!(image.rgba(0, 0), [0x00, 0x00, 0x00, 0x00]);
    }
}
