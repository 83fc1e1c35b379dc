//! Rendering
//!
//! Flattens the path from the root to the active layer onto an opaque white
//! canvas, cuts rectangular crops out of bitmaps, and draws images as
//! truecolor terminal previews.

use std::fmt::Write;

use log::debug;

use crate::engine::{Bitmap, BitmapLibrary, Image, OPAQUE_WHITE};
use crate::error::{Result, StrataError};
use crate::layers::{Layer, LayerTree};

/// Default glyph drawn for each pixel in a terminal preview
pub const DEFAULT_PIXEL_GLYPH: &str = "███";

/// Composite the active path of `tree` into a canvas-sized image.
///
/// The canvas starts opaque white; layers are blended root-to-cursor so the
/// active layer is painted last.
pub fn render(tree: &LayerTree, library: &BitmapLibrary) -> Result<Image> {
    let canvas = tree.canvas();
    let mut image = Image::filled(canvas.width, canvas.height, OPAQUE_WHITE)?;

    let path = tree.path_to_active();
    for layer in &path {
        blend_layer(&mut image, layer, library)?;
    }

    debug!(
        "Rendered {} layer(s) onto {} canvas",
        path.len(),
        tree.canvas()
    );

    Ok(image)
}

/// Blend one layer's bitmap onto `canvas` at the layer's placement.
///
/// The root has no placement and draws nothing.
pub fn blend_layer(canvas: &mut Image, layer: &Layer, library: &BitmapLibrary) -> Result<()> {
    let Some(placement) = layer.placement() else {
        return Ok(());
    };
    let source = library.get(placement.bitmap)?.image();

    let src_row_len = source.row_len();
    for y in 0..source.height() {
        let start = canvas.offset(placement.x, placement.y + y);
        let dst = &mut canvas.pixels_mut()[start..start + src_row_len];
        placement.blend.blend_row(dst, source.row(y));
    }

    Ok(())
}

/// Copy the 1-based inclusive rectangle `(top_x, top_y)`..`(bottom_x, bottom_y)`
/// out of `bitmap` into a new image.
///
/// # Errors
/// * `OutOfRange` - If a corner lies outside the bitmap
/// * `InvalidRectangle` - If the bottom-right corner is above or left of the
///   top-left corner
/// * `OutOfMemory` - If the new buffer cannot be allocated
pub fn crop(bitmap: &Bitmap, top_x: u32, top_y: u32, bottom_x: u32, bottom_y: u32) -> Result<Image> {
    if top_x == 0 || top_y == 0 || bottom_x > bitmap.width() || bottom_y > bitmap.height() {
        return Err(StrataError::OutOfRange);
    }
    if bottom_x < top_x || bottom_y < top_y {
        return Err(StrataError::InvalidRectangle);
    }

    let width = bottom_x - top_x + 1;
    let height = bottom_y - top_y + 1;
    let source = bitmap.image();

    let mut cropped = Image::filled(width, height, [0; 4])?;
    let row_len = cropped.row_len();
    for y in 0..height {
        let start = source.offset(top_x - 1, top_y - 1 + y);
        let dst_start = y as usize * row_len;
        cropped.pixels_mut()[dst_start..dst_start + row_len]
            .copy_from_slice(&source.pixels()[start..start + row_len]);
    }

    Ok(cropped)
}

/// Draw an image as rows of truecolor glyphs with 1-based row and column
/// rulers.
pub fn preview(image: &Image, glyph: &str) -> String {
    let mut out = String::new();

    out.push_str("   ");
    for column in 1..=image.width() {
        let _ = write!(out, " {:02}", column);
    }
    out.push('\n');

    for y in 0..image.height() {
        let _ = write!(out, "{:02}|", y + 1);
        for x in 0..image.width() {
            let [b, g, r, _] = image.pixel(x, y);
            let _ = write!(out, "\x1b[38;2;{};{};{}m{}\x1b[0m", r, g, b, glyph);
        }
        out.push_str("|\n");
    }

    out.push_str("  ");
    out.push_str(&"-".repeat(image.width() as usize * 3 + 2));
    out.push('\n');

    out
}

// ============================================================================
// Tests
// ============================================================================
