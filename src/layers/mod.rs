//! Layer Model Module
//!
//! Implements the layer tree:
//! - Layer nodes with a bitmap placement and blend mode
//! - The arena-backed tree with its active cursor

mod layer;
mod tree;

pub use layer::{CanvasSize, Layer, LayerId, Placement};
pub use tree::{DepthFirst, LayerTree};
