//! Compositor
//!
//! Blend modes and the operations that turn a layer tree into pixels.

mod blend;
mod render;

pub use blend::BlendMode;
pub use render::{blend_layer, crop, preview, render, DEFAULT_PIXEL_GLYPH};
