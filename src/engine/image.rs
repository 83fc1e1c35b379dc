//! Pixel Buffer
//!
//! The in-memory raster type shared by loaded bitmaps, crops and renders.
//! Pixels are 4 bytes each in B, G, R, A order, row-major, top-down, with
//! (0, 0) at the visual top-left.

use crate::error::{Result, StrataError};

// ============================================================================
// Constants
// ============================================================================

/// Bytes per pixel (B, G, R, A)
pub const BYTES_PER_PIXEL: usize = 4;

/// Opaque white in BGRA order
pub const OPAQUE_WHITE: [u8; BYTES_PER_PIXEL] = [255, 255, 255, 255];

// ============================================================================
// Image
// ============================================================================

/// A BGRA pixel buffer
///
/// Invariant: `pixels.len() == width * height * 4`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Image {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl Image {
    /// Allocate an image filled with one color.
    ///
    /// The buffer is reserved fallibly, so a canvas too large for memory
    /// surfaces as `OutOfMemory` instead of aborting the process.
    pub fn filled(width: u32, height: u32, color: [u8; BYTES_PER_PIXEL]) -> Result<Self> {
        let len = buffer_len(width, height).ok_or_else(|| StrataError::OutOfMemory {
            details: format!("{}x{} image exceeds the address space", width, height),
        })?;

        let mut pixels = Vec::new();
        pixels
            .try_reserve_exact(len)
            .map_err(|e| StrataError::out_of_memory("image buffer", e))?;
        for _ in 0..(len / BYTES_PER_PIXEL) {
            pixels.extend_from_slice(&color);
        }

        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Wrap an existing pixel buffer.
    ///
    /// Returns `None` when the buffer length does not match the dimensions.
    pub fn from_pixels(width: u32, height: u32, pixels: Vec<u8>) -> Option<Self> {
        if buffer_len(width, height)? != pixels.len() {
            return None;
        }
        Some(Self {
            width,
            height,
            pixels,
        })
    }

    /// Width in pixels
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Raw BGRA bytes
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Mutable raw BGRA bytes
    pub fn pixels_mut(&mut self) -> &mut [u8] {
        &mut self.pixels
    }

    /// Bytes in one row
    pub fn row_len(&self) -> usize {
        self.width as usize * BYTES_PER_PIXEL
    }

    /// One row of pixels, top-down indexing
    pub fn row(&self, y: u32) -> &[u8] {
        let len = self.row_len();
        let start = y as usize * len;
        &self.pixels[start..start + len]
    }

    /// Byte offset of pixel (x, y)
    #[inline]
    pub fn offset(&self, x: u32, y: u32) -> usize {
        (y as usize * self.width as usize + x as usize) * BYTES_PER_PIXEL
    }

    /// The four BGRA bytes at (x, y)
    pub fn pixel(&self, x: u32, y: u32) -> [u8; BYTES_PER_PIXEL] {
        let i = self.offset(x, y);
        [
            self.pixels[i],
            self.pixels[i + 1],
            self.pixels[i + 2],
            self.pixels[i + 3],
        ]
    }

    /// Overwrite the pixel at (x, y)
    pub fn set_pixel(&mut self, x: u32, y: u32, bgra: [u8; BYTES_PER_PIXEL]) {
        let i = self.offset(x, y);
        self.pixels[i..i + BYTES_PER_PIXEL].copy_from_slice(&bgra);
    }

    /// Reverse the row order in place (row i swaps with row height-1-i).
    ///
    /// Converts between the on-disk bottom-up layout and the in-memory
    /// top-down layout. Applying it twice is the identity.
    pub fn flip_rows(&mut self) {
        let len = self.row_len();
        let height = self.height as usize;
        for top in 0..height / 2 {
            let bottom = height - 1 - top;
            let (upper, lower) = self.pixels.split_at_mut(bottom * len);
            upper[top * len..(top + 1) * len].swap_with_slice(&mut lower[..len]);
        }
    }
}

/// `width * height * 4`, or `None` on overflow
pub fn buffer_len(width: u32, height: u32) -> Option<usize> {
    (width as usize)
        .checked_mul(height as usize)?
        .checked_mul(BYTES_PER_PIXEL)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn numbered(width: u32, height: u32) -> Image {
        let len = buffer_len(width, height).unwrap();
        let pixels = (0..len).map(|i| i as u8).collect();
        Image::from_pixels(width, height, pixels).unwrap()
    }

    #[test]
    fn test_filled_image() {
        let image = Image::filled(3, 2, OPAQUE_WHITE).unwrap();
        assert_eq!(image.pixels().len(), 3 * 2 * 4);
        assert!(image.pixels().iter().all(|&b| b == 255));
    }

    #[test]
    fn test_from_pixels_rejects_wrong_length() {
        assert!(Image::from_pixels(2, 2, vec![0; 15]).is_none());
        assert!(Image::from_pixels(2, 2, vec![0; 16]).is_some());
    }

    #[test]
    fn test_pixel_access() {
        let mut image = Image::filled(4, 3, [0, 0, 0, 255]).unwrap();
        image.set_pixel(3, 2, [1, 2, 3, 4]);
        assert_eq!(image.pixel(3, 2), [1, 2, 3, 4]);
        assert_eq!(image.offset(3, 2), (2 * 4 + 3) * 4);
        assert_eq!(image.pixel(0, 0), [0, 0, 0, 255]);
    }

    #[test]
    fn test_flip_rows_odd_height() {
        let original = numbered(2, 3);
        let mut flipped = original.clone();
        flipped.flip_rows();

        assert_eq!(flipped.row(0), original.row(2));
        assert_eq!(flipped.row(1), original.row(1));
        assert_eq!(flipped.row(2), original.row(0));

        flipped.flip_rows();
        assert_eq!(flipped, original);
    }

    #[test]
    fn test_flip_rows_single_row() {
        let original = numbered(5, 1);
        let mut flipped = original.clone();
        flipped.flip_rows();
        assert_eq!(flipped, original);
    }
}
