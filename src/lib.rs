//! Strata - Layered BMP Compositor
//!
//! Strata composes 32-bit BMP images on a fixed-size canvas. Images are
//! loaded (or cropped) into a bitmap library and placed as layers in a tree.
//! Rendering blends only the path from the root to the active layer.
//!
//! # Architecture
//!
//! - `engine`: pixel buffers, the bitmap library and BMP file I/O
//! - `layers`: the layer tree with its active-layer cursor
//! - `compositor`: blend modes, rendering, cropping and terminal preview
//! - `session`: validates commands and runs them against the state
//! - `cli`: argument parsing and the interactive prompt loop

pub mod cli;
pub mod compositor;
pub mod config;
pub mod engine;
pub mod error;
pub mod layers;
pub mod session;

pub use error::{Result, StrataError};
