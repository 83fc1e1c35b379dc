//! Editing Session
//!
//! Ties the bitmap library and the layer tree together for one canvas.
//! The command loop hands over commands with their arguments still as the
//! user typed them; the session validates their content (numeric syntax,
//! ranges, existence) and returns a typed outcome for the caller to print.
//!
//! Every failed command leaves the library and the tree exactly as they
//! were.

use std::path::{Path, PathBuf};

use log::{debug, info};

use crate::compositor::{self, BlendMode};
use crate::engine::{self, BitmapId, BitmapLibrary, Image};
use crate::error::{Result, StrataError};
use crate::layers::{CanvasSize, LayerId, LayerTree};

/// A command with its arguments as raw tokens
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Load {
        path: String,
    },
    Crop {
        id: String,
        top_x: String,
        top_y: String,
        bottom_x: String,
        bottom_y: String,
    },
    Place {
        id: String,
        x: String,
        y: String,
        mode: String,
    },
    Undo,
    Print,
    Switch {
        id: String,
    },
    Tree,
    Bmps,
    Save {
        path: String,
    },
}

/// One line of a tree dump
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeEntry {
    pub depth: usize,
    pub layer: LayerId,
    /// `None` for the root
    pub bitmap: Option<BitmapId>,
    /// 1-based canvas column, 0 for the root
    pub x: u32,
    /// 1-based canvas row, 0 for the root
    pub y: u32,
}

/// Size summary of one library entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BitmapSummary {
    pub id: BitmapId,
    pub width: u32,
    pub height: u32,
    pub origin: Option<PathBuf>,
}

/// What a successful command produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Loaded {
        path: String,
        id: BitmapId,
        width: u32,
        height: u32,
    },
    Cropped {
        source: BitmapId,
        id: BitmapId,
        width: u32,
        height: u32,
    },
    /// The cursor moved (place, undo, switch)
    Switched { layer: LayerId },
    Rendered(Image),
    Tree(Vec<TreeEntry>),
    Bitmaps(Vec<BitmapSummary>),
    Saved { path: String },
}

/// State of one editing session
#[derive(Debug)]
pub struct Session {
    library: BitmapLibrary,
    tree: LayerTree,
}

impl Session {
    /// Start an empty session on a fixed-size canvas
    pub fn new(canvas: CanvasSize) -> Self {
        info!("Starting session on {} canvas", canvas);
        Self {
            library: BitmapLibrary::new(),
            tree: LayerTree::new(canvas),
        }
    }

    pub fn canvas(&self) -> CanvasSize {
        self.tree.canvas()
    }

    pub fn library(&self) -> &BitmapLibrary {
        &self.library
    }

    pub fn tree(&self) -> &LayerTree {
        &self.tree
    }

    /// Validate a command's arguments and run it
    pub fn execute(&mut self, command: Command) -> Result<Outcome> {
        debug!("Executing {:?}", command);

        match command {
            Command::Load { path } => {
                let id = self.load(Path::new(&path))?;
                let bitmap = self.library.get(id)?;
                Ok(Outcome::Loaded {
                    width: bitmap.width(),
                    height: bitmap.height(),
                    path,
                    id,
                })
            }
            Command::Crop {
                id,
                top_x,
                top_y,
                bottom_x,
                bottom_y,
            } => {
                let source = self.bitmap_id(&id)?;
                let [id_syntax, tx, ty, bx, by] = [&id, &top_x, &top_y, &bottom_x, &bottom_y]
                    .map(|token| parse_unsigned(token).ok_or(StrataError::OutOfRange));
                id_syntax?;
                let id = self.crop(source, tx?, ty?, bx?, by?)?;
                let bitmap = self.library.get(id)?;
                Ok(Outcome::Cropped {
                    source,
                    id,
                    width: bitmap.width(),
                    height: bitmap.height(),
                })
            }
            Command::Place { id, x, y, mode } => {
                let bitmap = self.bitmap_id(&id)?;
                parse_unsigned(&id).ok_or(StrataError::InvalidCoordinates)?;
                let x = parse_unsigned(&x).ok_or(StrataError::InvalidCoordinates)?;
                let y = parse_unsigned(&y).ok_or(StrataError::InvalidCoordinates)?;
                let layer = self.place_checked(bitmap, x, y, &mode)?;
                Ok(Outcome::Switched { layer })
            }
            Command::Undo => Ok(Outcome::Switched { layer: self.undo()? }),
            Command::Print => Ok(Outcome::Rendered(self.render()?)),
            Command::Switch { id } => {
                // Non-numeric layer ids share the coordinate error message.
                let id = parse_unsigned(&id).ok_or(StrataError::InvalidCoordinates)?;
                let layer = LayerId(id as usize);
                self.switch_to(layer)?;
                Ok(Outcome::Switched { layer })
            }
            Command::Tree => Ok(Outcome::Tree(self.tree_entries())),
            Command::Bmps => Ok(Outcome::Bitmaps(self.bitmaps())),
            Command::Save { path } => {
                self.save(Path::new(&path))?;
                Ok(Outcome::Saved { path })
            }
        }
    }

    /// Decode a bitmap file and add it to the library
    pub fn load(&mut self, path: &Path) -> Result<BitmapId> {
        let image = engine::decode(path)?;
        let id = self.library.insert(image, Some(path.to_path_buf()))?;
        info!("Loaded {} as bitmap {}", path.display(), id);
        Ok(id)
    }

    /// Crop a library bitmap into a new library entry (1-based inclusive corners)
    pub fn crop(
        &mut self,
        source: BitmapId,
        top_x: u32,
        top_y: u32,
        bottom_x: u32,
        bottom_y: u32,
    ) -> Result<BitmapId> {
        let bitmap = self.library.get(source)?;
        let image = compositor::crop(bitmap, top_x, top_y, bottom_x, bottom_y)?;
        let id = self.library.insert(image, None)?;
        info!("Cropped bitmap {} into bitmap {}", source, id);
        Ok(id)
    }

    /// Place a library bitmap under the active layer (1-based coordinates)
    pub fn place(&mut self, bitmap: BitmapId, x: u32, y: u32, blend: BlendMode) -> Result<LayerId> {
        let bitmap = self.library.get(bitmap)?;
        self.tree.place(bitmap, x, y, blend)
    }

    /// Place with the blend mode still as a command code.
    ///
    /// The geometry is checked before the blend code, so a misplaced bitmap
    /// reports `DoesNotFit` even when the code is also wrong.
    fn place_checked(&mut self, bitmap: BitmapId, x: u32, y: u32, mode: &str) -> Result<LayerId> {
        let size = self.library.get(bitmap)?;
        if x == 0 || y == 0 {
            return Err(StrataError::InvalidCoordinates);
        }
        if !self
            .canvas()
            .contains(x - 1, y - 1, size.width(), size.height())
        {
            return Err(StrataError::DoesNotFit);
        }
        let blend = BlendMode::from_code(mode)?;
        self.place(bitmap, x, y, blend)
    }

    /// Move the cursor to the active layer's parent
    pub fn undo(&mut self) -> Result<LayerId> {
        self.tree.undo()
    }

    /// Move the cursor to any layer
    pub fn switch_to(&mut self, layer: LayerId) -> Result<()> {
        self.tree.switch_to(layer)
    }

    /// Composite the active path
    pub fn render(&self) -> Result<Image> {
        compositor::render(&self.tree, &self.library)
    }

    /// Composite the active path and write it as a bitmap file
    pub fn save(&self, path: &Path) -> Result<()> {
        let image = self.render()?;
        engine::encode(path, &image)?;
        info!("Saved {} canvas to {}", self.canvas(), path.display());
        Ok(())
    }

    /// Depth-first listing of every layer
    pub fn tree_entries(&self) -> Vec<TreeEntry> {
        self.tree
            .depth_first()
            .map(|(depth, layer)| match layer.placement() {
                Some(p) => TreeEntry {
                    depth,
                    layer: layer.id(),
                    bitmap: Some(p.bitmap),
                    x: p.x + 1,
                    y: p.y + 1,
                },
                None => TreeEntry {
                    depth,
                    layer: layer.id(),
                    bitmap: None,
                    x: 0,
                    y: 0,
                },
            })
            .collect()
    }

    /// Every library entry in id order
    pub fn bitmaps(&self) -> Vec<BitmapSummary> {
        self.library
            .iter()
            .map(|b| BitmapSummary {
                id: b.id(),
                width: b.width(),
                height: b.height(),
                origin: b.origin().map(Path::to_path_buf),
            })
            .collect()
    }

    /// Resolve a bitmap id from the leading number of `token`.
    ///
    /// The token's full syntax is checked afterwards with the command's other
    /// numeric arguments, so `place 0x 1 1 n` is a coordinate error when
    /// bitmap 0 exists.
    fn bitmap_id(&self, token: &str) -> Result<BitmapId> {
        let not_found = || StrataError::BitmapNotFound {
            id: token.to_string(),
        };
        let id = usize::try_from(leading_number(token)).map_err(|_| not_found())?;
        let id = BitmapId(id);
        self.library.get(id).map_err(|_| not_found())?;
        Ok(id)
    }
}

/// Read the optionally signed run of digits at the start of `token`.
///
/// Anything after the digits is ignored and a token without digits reads as
/// 0. Magnitudes beyond `i64` saturate.
pub fn leading_number(token: &str) -> i64 {
    let (negative, digits) = match token.as_bytes().first() {
        Some(b'-') => (true, &token[1..]),
        Some(b'+') => (false, &token[1..]),
        _ => (false, token),
    };
    let magnitude = digits
        .bytes()
        .take_while(u8::is_ascii_digit)
        .fold(0i64, |acc, d| {
            acc.saturating_mul(10).saturating_add(i64::from(d - b'0'))
        });
    if negative {
        -magnitude
    } else {
        magnitude
    }
}

/// Parse a token made only of ASCII digits.
///
/// Values too large for `u32` saturate, which every caller then rejects as
/// out of range.
pub fn parse_unsigned(token: &str) -> Option<u32> {
    if token.is_empty() || !token.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    Some(token.parse::<u32>().unwrap_or(u32::MAX))
}

// ============================================================================
// Tests
// ============================================================================
