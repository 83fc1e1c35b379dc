//! Blend Modes
//!
//! Per-pixel rules for flattening a layer onto the canvas. Every mode
//! combines B, G and R independently, ignores the destination alpha and
//! leaves the destination fully opaque. The arithmetic truncates rather than
//! rounds so output matches reference renders byte for byte.

use std::fmt;

use crate::engine::BYTES_PER_PIXEL;
use crate::error::{Result, StrataError};

const ALPHA: usize = 3;

/// How a layer's pixels combine with what is already on the canvas
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BlendMode {
    /// Alpha-weighted overwrite
    #[default]
    Normal,
    /// `dst * src / 255`
    Multiply,
    /// `|dst - src|`
    Difference,
}

impl BlendMode {
    /// Parse a one-character command code: `n`, `m` or `s`
    pub fn from_code(code: &str) -> Result<Self> {
        match code {
            "n" => Ok(BlendMode::Normal),
            "m" => Ok(BlendMode::Multiply),
            "s" => Ok(BlendMode::Difference),
            _ => Err(StrataError::InvalidBlendMode {
                mode: code.to_string(),
            }),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            BlendMode::Normal => "Normal",
            BlendMode::Multiply => "Multiply",
            BlendMode::Difference => "Difference",
        }
    }

    /// Blend one BGRA source pixel into one BGRA destination pixel in place.
    ///
    /// Both slices must hold at least four bytes.
    #[inline]
    pub fn blend_pixel(&self, dst: &mut [u8], src: &[u8]) {
        match self {
            BlendMode::Normal => {
                let alpha = f64::from(src[ALPHA]) / 255.0;
                for c in 0..ALPHA {
                    let a = f64::from(dst[c]);
                    let b = f64::from(src[c]);
                    dst[c] = (alpha * b + (1.0 - alpha) * a) as u8;
                }
            }
            BlendMode::Multiply => {
                for c in 0..ALPHA {
                    dst[c] = (u16::from(dst[c]) * u16::from(src[c]) / 255) as u8;
                }
            }
            BlendMode::Difference => {
                for c in 0..ALPHA {
                    dst[c] = dst[c].abs_diff(src[c]);
                }
            }
        }
        dst[ALPHA] = 255;
    }

    /// Blend a whole row of source pixels onto a row of destination pixels
    pub fn blend_row(&self, dst: &mut [u8], src: &[u8]) {
        for (d, s) in dst
            .chunks_exact_mut(BYTES_PER_PIXEL)
            .zip(src.chunks_exact(BYTES_PER_PIXEL))
        {
            self.blend_pixel(d, s);
        }
    }
}

impl fmt::Display for BlendMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    fn blend(mode: BlendMode, dst: [u8; 4], src: [u8; 4]) -> [u8; 4] {
        let mut out = dst;
        mode.blend_pixel(&mut out, &src);
        out
    }

    #[test_case("n", BlendMode::Normal ; "normal")]
    #[test_case("m", BlendMode::Multiply ; "multiply")]
    #[test_case("s", BlendMode::Difference ; "difference")]
    fn test_from_code(code: &str, expected: BlendMode) {
        assert_eq!(BlendMode::from_code(code).unwrap(), expected);
    }

    #[test_case("x" ; "unknown letter")]
    #[test_case("N" ; "upper case")]
    #[test_case("nn" ; "too long")]
    #[test_case("" ; "empty")]
    fn test_from_code_rejects(code: &str) {
        assert!(matches!(
            BlendMode::from_code(code),
            Err(StrataError::InvalidBlendMode { .. })
        ));
    }

    #[test]
    fn test_normal_opaque_overwrites() {
        let out = blend(BlendMode::Normal, [200, 100, 50, 7], [1, 2, 3, 255]);
        assert_eq!(out, [1, 2, 3, 255]);
    }

    #[test]
    fn test_normal_transparent_keeps_channels() {
        let out = blend(BlendMode::Normal, [200, 100, 50, 255], [1, 2, 3, 0]);
        assert_eq!(out, [200, 100, 50, 255]);
    }

    #[test]
    fn test_normal_half_alpha_truncates() {
        // alpha = 128/255; 128/255*0 + 127/255*255 = 127.0 exactly
        let out = blend(BlendMode::Normal, [255, 255, 255, 255], [0, 0, 0, 128]);
        assert_eq!(out, [127, 127, 127, 255]);
    }

    #[test_case([255, 255, 255, 0], [10, 20, 30, 0], [10, 20, 30, 255] ; "white identity")]
    #[test_case([100, 100, 100, 255], [0, 0, 0, 255], [0, 0, 0, 255] ; "black absorbs")]
    #[test_case([100, 200, 50, 255], [128, 128, 128, 9], [50, 100, 25, 255] ; "truncates")]
    fn test_multiply(dst: [u8; 4], src: [u8; 4], expected: [u8; 4]) {
        assert_eq!(blend(BlendMode::Multiply, dst, src), expected);
    }

    #[test_case([255, 255, 255, 255], [255, 0, 0, 255], [0, 255, 255, 255] ; "inverts on white")]
    #[test_case([10, 200, 30, 40], [30, 100, 30, 0], [20, 100, 0, 255] ; "absolute value")]
    fn test_difference(dst: [u8; 4], src: [u8; 4], expected: [u8; 4]) {
        assert_eq!(blend(BlendMode::Difference, dst, src), expected);
    }

    #[test]
    fn test_multiply_never_brightens() {
        for value in [0u8, 1, 17, 128, 254, 255] {
            let src = [value, value, value, 255];
            let mut dst = src;
            for _ in 0..8 {
                let before = dst;
                BlendMode::Multiply.blend_pixel(&mut dst, &src);
                for c in 0..3 {
                    assert!(dst[c] <= before[c], "channel {} grew from {}", c, before[c]);
                }
            }
        }
    }

    #[test]
    fn test_blend_row() {
        let mut dst = vec![255u8; 8];
        let src = [0, 0, 255, 255, 0, 0, 0, 0];
        BlendMode::Normal.blend_row(&mut dst, &src);
        assert_eq!(dst, vec![0, 0, 255, 255, 255, 255, 255, 255]);
    }
}
