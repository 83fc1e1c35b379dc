//! Layer Tree
//!
//! Arena of layers rooted at the empty canvas layer. Layers are stored in a
//! `Vec` indexed by their id; parents are referenced by id, so the tree needs
//! no back-pointers. A single cursor (`active`) selects the layer that
//! `place`, `undo` and rendering operate on.
//!
//! Layers are never removed. Ids are therefore dense and double as arena
//! indices, and the next id is simply the arena length.

use log::debug;

use super::layer::{CanvasSize, Layer, LayerId, Placement};
use crate::compositor::BlendMode;
use crate::engine::Bitmap;
use crate::error::{Result, StrataError};

/// The layer tree of one session
#[derive(Debug, Clone)]
pub struct LayerTree {
    nodes: Vec<Layer>,
    active: LayerId,
    canvas: CanvasSize,
}

impl LayerTree {
    /// Create a tree holding only the root, with the cursor on it
    pub fn new(canvas: CanvasSize) -> Self {
        Self {
            nodes: vec![Layer::root()],
            active: LayerId::ROOT,
            canvas,
        }
    }

    pub fn canvas(&self) -> CanvasSize {
        self.canvas
    }

    /// Id of the active layer
    pub fn active_id(&self) -> LayerId {
        self.active
    }

    pub fn active(&self) -> &Layer {
        &self.nodes[self.active.0]
    }

    pub fn root(&self) -> &Layer {
        &self.nodes[LayerId::ROOT.0]
    }

    pub fn get(&self, id: LayerId) -> Option<&Layer> {
        self.nodes.get(id.0)
    }

    /// Number of layers including the root
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always false; the root cannot be removed
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Id the next placed layer will receive
    pub fn next_id(&self) -> LayerId {
        LayerId(self.nodes.len())
    }

    /// Place a bitmap as a new child of the active layer.
    ///
    /// `x` and `y` are 1-based canvas coordinates of the bitmap's top-left
    /// corner. On success the new layer becomes active. On error the tree is
    /// left untouched.
    ///
    /// # Errors
    /// * `InvalidCoordinates` - If `x` or `y` is 0
    /// * `DoesNotFit` - If the bitmap would extend past the canvas
    /// * `OutOfMemory` - If the arena or child list cannot grow
    pub fn place(&mut self, bitmap: &Bitmap, x: u32, y: u32, blend: BlendMode) -> Result<LayerId> {
        if x == 0 || y == 0 {
            return Err(StrataError::InvalidCoordinates);
        }
        let (x, y) = (x - 1, y - 1);
        if !self.canvas.contains(x, y, bitmap.width(), bitmap.height()) {
            return Err(StrataError::DoesNotFit);
        }

        let parent = self.active;
        let id = self.next_id();
        let layer = Layer::child(
            id,
            parent,
            Placement {
                bitmap: bitmap.id(),
                x,
                y,
                blend,
            },
        );

        // Reserve both allocations before linking anything.
        self.nodes
            .try_reserve(1)
            .map_err(|e| StrataError::out_of_memory("layer arena", e))?;
        self.nodes[parent.0]
            .children_mut()
            .try_reserve(1)
            .map_err(|e| StrataError::out_of_memory("layer children", e))?;

        self.nodes.push(layer);
        self.nodes[parent.0].children_mut().push(id);
        self.active = id;

        debug!(
            "Placed bitmap {} as layer {} under layer {} at ({}, {}) with {} blend",
            bitmap.id(),
            id,
            parent,
            x,
            y,
            blend
        );

        Ok(id)
    }

    /// Move the cursor to the parent of the active layer
    pub fn undo(&mut self) -> Result<LayerId> {
        let parent = self.active().parent().ok_or(StrataError::AlreadyAtRoot)?;
        self.active = parent;
        Ok(parent)
    }

    /// Move the cursor to any layer in the tree.
    ///
    /// Searches depth-first from the root, so the target does not need to be
    /// related to the current active layer.
    pub fn switch_to(&mut self, id: LayerId) -> Result<()> {
        let found = self
            .depth_first()
            .map(|(_, layer)| layer.id())
            .find(|&candidate| candidate == id)
            .ok_or_else(|| StrataError::LayerNotFound { id: id.to_string() })?;
        self.active = found;
        Ok(())
    }

    /// Layers from just below the root down to the active layer.
    ///
    /// This is the paint order: earlier layers are drawn first. Empty when
    /// the root is active.
    pub fn path_to_active(&self) -> Vec<&Layer> {
        let mut path = Vec::new();
        let mut current = self.active();
        while let Some(parent) = current.parent() {
            path.push(current);
            current = &self.nodes[parent.0];
        }
        path.reverse();
        path
    }

    /// Pre-order traversal from the root yielding `(depth, layer)`
    pub fn depth_first(&self) -> DepthFirst<'_> {
        DepthFirst {
            tree: self,
            stack: vec![(0, LayerId::ROOT)],
        }
    }
}

/// Pre-order iterator over a [`LayerTree`], children in insertion order
///
/// Created by [`LayerTree::depth_first`].
#[derive(Debug)]
pub struct DepthFirst<'a> {
    tree: &'a LayerTree,
    stack: Vec<(usize, LayerId)>,
}

impl<'a> Iterator for DepthFirst<'a> {
    type Item = (usize, &'a Layer);

    fn next(&mut self) -> Option<Self::Item> {
        let (depth, id) = self.stack.pop()?;
        let tree = self.tree;
        let layer = &tree.nodes[id.0];
        self.stack
            .extend(layer.children().iter().rev().map(|&child| (depth + 1, child)));
        Some((depth, layer))
    }
}

// ============================================================================
// Tests
// ============================================================================
