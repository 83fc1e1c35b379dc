//! Layer Node
//!
//! A single node of the layer tree. Non-root layers reference one bitmap in
//! the library by id and record where and how it is drawn.

use std::fmt;

use crate::compositor::BlendMode;
use crate::engine::BitmapId;

/// Id of a layer; also its index in the tree's arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LayerId(pub usize);

impl LayerId {
    /// The canvas root
    pub const ROOT: LayerId = LayerId(0);

    pub fn is_root(&self) -> bool {
        *self == Self::ROOT
    }
}

impl fmt::Display for LayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Fixed canvas dimensions for a session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CanvasSize {
    pub width: u32,
    pub height: u32,
}

impl CanvasSize {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Whether a `width` x `height` footprint at 0-based (x, y) stays inside
    pub fn contains(&self, x: u32, y: u32, width: u32, height: u32) -> bool {
        u64::from(x) + u64::from(width) <= u64::from(self.width)
            && u64::from(y) + u64::from(height) <= u64::from(self.height)
    }
}

impl fmt::Display for CanvasSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} x {}", self.width, self.height)
    }
}

/// Where and how a layer draws its bitmap
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    pub bitmap: BitmapId,
    /// 0-based canvas column of the bitmap's left edge
    pub x: u32,
    /// 0-based canvas row of the bitmap's top edge
    pub y: u32,
    pub blend: BlendMode,
}

/// A node in the layer tree
#[derive(Debug, Clone)]
pub struct Layer {
    id: LayerId,
    /// `None` only for the root
    placement: Option<Placement>,
    parent: Option<LayerId>,
    /// Children in insertion order
    children: Vec<LayerId>,
}

impl Layer {
    pub(crate) fn root() -> Self {
        Self {
            id: LayerId::ROOT,
            placement: None,
            parent: None,
            children: Vec::new(),
        }
    }

    pub(crate) fn child(id: LayerId, parent: LayerId, placement: Placement) -> Self {
        Self {
            id,
            placement: Some(placement),
            parent: Some(parent),
            children: Vec::new(),
        }
    }

    pub fn id(&self) -> LayerId {
        self.id
    }

    pub fn placement(&self) -> Option<&Placement> {
        self.placement.as_ref()
    }

    pub fn parent(&self) -> Option<LayerId> {
        self.parent
    }

    pub fn children(&self) -> &[LayerId] {
        &self.children
    }

    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    pub(crate) fn children_mut(&mut self) -> &mut Vec<LayerId> {
        &mut self.children
    }
}
