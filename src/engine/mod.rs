//! Bitmap Engine Module
//!
//! Core raster storage:
//! - Pixel buffer type
//! - BMP file I/O
//! - The session's bitmap library

pub mod image;
pub mod io;
pub mod library;

pub use image::{Image, BYTES_PER_PIXEL, OPAQUE_WHITE};
pub use io::{decode, encode};
pub use library::{Bitmap, BitmapId, BitmapLibrary};
